//! Moves and move categories

use serde::{Deserialize, Serialize};

use super::element::Element;

/// Which stat pair a move's damage is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
}

/// One attack known by a combatant
///
/// A power of 0 marks a status move: it deals no damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub power: u32,
    #[serde(rename = "type")]
    pub element: Element,
    pub category: MoveCategory,
}

impl Move {
    pub fn new(
        name: impl Into<String>,
        power: u32,
        element: Element,
        category: MoveCategory,
    ) -> Self {
        Self {
            name: name.into(),
            power,
            element,
            category,
        }
    }

    /// Whether this move deals damage at all
    pub fn is_damaging(&self) -> bool {
        self.power > 0
    }
}
