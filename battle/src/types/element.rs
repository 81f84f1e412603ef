//! Elemental type system and effectiveness chart

use serde::{Deserialize, Serialize};

/// Elemental types carried by combatants and moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Element {
    /// All 18 elements
    pub const ALL: [Element; 18] = [
        Element::Normal,
        Element::Fire,
        Element::Water,
        Element::Electric,
        Element::Grass,
        Element::Ice,
        Element::Fighting,
        Element::Poison,
        Element::Ground,
        Element::Flying,
        Element::Psychic,
        Element::Bug,
        Element::Rock,
        Element::Ghost,
        Element::Dragon,
        Element::Dark,
        Element::Steel,
        Element::Fairy,
    ];

    /// Effectiveness of an attack of this element against a single defending
    /// element.
    ///
    /// The chart is sparse: pairings without an entry are neutral (1.0),
    /// and 0.0 marks total immunity.
    pub fn effectiveness(&self, defender: Element) -> f64 {
        use Element::*;
        match (self, defender) {
            (Fire, Grass) => 2.0,
            (Fire, Water) => 0.5,
            (Fire, Fire) => 0.5,
            (Fire, Ice) => 2.0,
            (Fire, Bug) => 2.0,
            (Fire, Steel) => 2.0,

            (Water, Fire) => 2.0,
            (Water, Grass) => 0.5,
            (Water, Water) => 0.5,
            (Water, Ground) => 2.0,
            (Water, Rock) => 2.0,
            (Water, Dragon) => 0.5,

            (Grass, Water) => 2.0,
            (Grass, Fire) => 0.5,
            (Grass, Grass) => 0.5,
            (Grass, Ground) => 2.0,
            (Grass, Rock) => 2.0,
            (Grass, Poison) => 0.5,
            (Grass, Flying) => 0.5,
            (Grass, Bug) => 0.5,
            (Grass, Dragon) => 0.5,

            (Electric, Water) => 2.0,
            (Electric, Flying) => 2.0,
            (Electric, Electric) => 0.5,
            (Electric, Grass) => 0.5,
            (Electric, Ground) => 0.0,
            (Electric, Dragon) => 0.5,

            (Normal, Rock) => 0.5,
            (Normal, Ghost) => 0.0,
            (Normal, Steel) => 0.5,

            (Flying, Grass) => 2.0,
            (Flying, Fighting) => 2.0,
            (Flying, Bug) => 2.0,
            (Flying, Electric) => 0.5,
            (Flying, Rock) => 0.5,
            (Flying, Steel) => 0.5,

            (Ghost, Ghost) => 2.0,
            (Ghost, Psychic) => 2.0,
            (Ghost, Normal) => 0.0,
            (Ghost, Dark) => 0.5,

            (Dragon, Dragon) => 2.0,
            (Dragon, Steel) => 0.5,
            (Dragon, Fairy) => 0.0,

            (Poison, Grass) => 2.0,
            (Poison, Fairy) => 2.0,
            (Poison, Poison) => 0.5,
            (Poison, Ground) => 0.5,
            (Poison, Rock) => 0.5,
            (Poison, Ghost) => 0.5,
            (Poison, Steel) => 0.0,

            (Bug, Grass) => 2.0,
            (Bug, Psychic) => 2.0,
            (Bug, Dark) => 2.0,
            (Bug, Fire) => 0.5,
            (Bug, Fighting) => 0.5,
            (Bug, Poison) => 0.5,
            (Bug, Flying) => 0.5,
            (Bug, Ghost) => 0.5,
            (Bug, Steel) => 0.5,
            (Bug, Fairy) => 0.5,

            (Fairy, Fighting) => 2.0,
            (Fairy, Dragon) => 2.0,
            (Fairy, Dark) => 2.0,
            (Fairy, Fire) => 0.5,
            (Fairy, Poison) => 0.5,
            (Fairy, Steel) => 0.5,

            _ => 1.0,
        }
    }

    /// Effectiveness against a defender's element pair (multiplied).
    pub fn effectiveness_against(&self, defender: &(Element, Option<Element>)) -> f64 {
        let mut multiplier = self.effectiveness(defender.0);
        if let Some(second) = defender.1 {
            multiplier *= self.effectiveness(second);
        }
        multiplier
    }

    /// Canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Normal => "Normal",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Electric => "Electric",
            Element::Grass => "Grass",
            Element::Ice => "Ice",
            Element::Fighting => "Fighting",
            Element::Poison => "Poison",
            Element::Ground => "Ground",
            Element::Flying => "Flying",
            Element::Psychic => "Psychic",
            Element::Bug => "Bug",
            Element::Rock => "Rock",
            Element::Ghost => "Ghost",
            Element::Dragon => "Dragon",
            Element::Dark => "Dark",
            Element::Steel => "Steel",
            Element::Fairy => "Fairy",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
