//! Consumable items

use serde::{Deserialize, Serialize};

/// What using an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffect {
    Heal,
    AttackBoost,
    DefenseBoost,
    None,
}

/// A stack of consumable items in a side's bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub count: u32,
    pub effect: ItemEffect,
    pub value: i32,
}

impl Item {
    pub fn new(name: impl Into<String>, count: u32, effect: ItemEffect, value: i32) -> Self {
        Self {
            name: name.into(),
            count,
            effect,
            value,
        }
    }
}
