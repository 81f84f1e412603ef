//! Domain types and pure battle math for turn-based creature battles.
//!
//! This crate is the leaf of the engine: it knows nothing about sessions,
//! participants, or concurrency.
//!
//! # Overview
//!
//! `skirmish-battle` sits below the session engine:
//!
//! ```text
//! skirmish-session (registry + turn resolution)
//!        │
//!        ▼
//! skirmish-battle (domain types + calculator) ← THIS CRATE
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Element`] - elemental types with effectiveness chart
//! - [`Combatant`] - one creature instance (hp, stats, moves, boosts)
//! - [`Move`], [`MoveCategory`] - attacks, physical or special
//! - [`Item`], [`ItemEffect`] - consumables usable mid-battle
//!
//! ## Calculator
//! - [`calculate_damage`] - total damage function, never fails
//! - [`apply_item`] - item effect application
//!
//! # Example Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use skirmish_battle::{calculate_damage, Combatant, Element, Move, MoveCategory};
//!
//! let attacker = Combatant::new("Sparkit", 50, 10, [55, 40, 50, 50, 90], Element::Electric);
//! let defender = Combatant::new("Finely", 50, 10, [40, 40, 40, 40, 60], Element::Water);
//! let bolt = Move::new("Spark", 40, Element::Electric, MoveCategory::Special);
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let outcome = calculate_damage(&attacker, &defender, &bolt, &mut rng);
//! assert!(outcome.amount >= 1);
//! assert!(outcome.messages.iter().any(|m| m.contains("super effective")));
//! ```

pub mod calc;
pub mod types;

// Re-export main types at crate root for convenience
pub use calc::{apply_item, calculate_damage, DamageOutcome, ItemOutcome};
pub use types::{Combatant, Element, Item, ItemEffect, Move, MoveCategory};
