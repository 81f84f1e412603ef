//! Combatant state

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::moves::Move;

/// One creature instance fighting on a side's roster
///
/// Stats are the raw numbers supplied by the roster provider; the engine
/// never recomputes them from species data. `attack_boost` and
/// `defense_boost` are additive in-battle modifiers shared across the
/// physical and special categories.
///
/// Invariant: `0 <= hp <= max_hp` after any mutation through this type's
/// methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub level: i32,
    pub attack: i32,
    pub defense: i32,
    pub sp_attack: i32,
    pub sp_defense: i32,
    pub speed: i32,

    /// Primary and optional secondary element
    #[serde(rename = "element")]
    pub elements: (Element, Option<Element>),

    /// Known moves (typically at most two)
    #[serde(default)]
    pub moves: Vec<Move>,

    #[serde(default)]
    pub attack_boost: i32,
    #[serde(default)]
    pub defense_boost: i32,
}

impl Combatant {
    /// Create a combatant at full HP.
    ///
    /// `stats` is `[attack, defense, sp_attack, sp_defense, speed]`.
    pub fn new(
        name: impl Into<String>,
        max_hp: i32,
        level: i32,
        stats: [i32; 5],
        element: Element,
    ) -> Self {
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            level,
            attack: stats[0],
            defense: stats[1],
            sp_attack: stats[2],
            sp_defense: stats[3],
            speed: stats[4],
            elements: (element, None),
            moves: Vec::new(),
            attack_boost: 0,
            defense_boost: 0,
        }
    }

    /// Builder-style secondary element
    pub fn with_second_element(mut self, element: Element) -> Self {
        self.elements.1 = Some(element);
        self
    }

    /// Builder-style move list
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether the combatant's move's element matches one of its own
    pub fn has_element(&self, element: Element) -> bool {
        self.elements.0 == element || self.elements.1 == Some(element)
    }

    /// Subtract damage, flooring HP at 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    /// Restore HP, capped at `max_hp`. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Clear in-battle boosts (win-outcome cleanup)
    pub fn reset_boosts(&mut self) {
        self.attack_boost = 0;
        self.defense_boost = 0;
    }
}
