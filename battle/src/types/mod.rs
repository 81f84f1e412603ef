//! Battle domain types

pub mod combatant;
pub mod element;
pub mod item;
pub mod moves;

pub use combatant::Combatant;
pub use element::Element;
pub use item::{Item, ItemEffect};
pub use moves::{Move, MoveCategory};
