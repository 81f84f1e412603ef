//! Session registry and turn resolution for two-participant battles.
//!
//! This crate runs the encounter: it owns every active session, synchronizes
//! the two independently-submitted actions per turn, resolves them
//! deterministically (modulo one random tie-break and damage variance), and
//! answers status polls.
//!
//! # Overview
//!
//! `skirmish-session` sits above the pure domain crate:
//!
//! ```text
//! caller (presentation / transport, external)
//!        │
//!        ▼
//! skirmish-session (registry + sessions + resolver) ← THIS CRATE
//!        │
//!        ▼
//! skirmish-battle (domain types + calculator)
//! ```
//!
//! # Main Types
//!
//! - [`SessionRegistry`] - entry point; owns all sessions behind one lock
//! - [`BattleSession`] - one encounter's full state
//! - [`ActionKind`] - a participant's intent for the current turn
//! - [`StatusView`] - serializable snapshot returned to polling callers
//!
//! # Example Usage
//!
//! ```
//! use skirmish_battle::{Combatant, Element, Move, MoveCategory};
//! use skirmish_session::{ActionKind, ParticipantId, SessionRegistry, TeamLoadout};
//!
//! let registry = SessionRegistry::new();
//! let (alice, bob) = (ParticipantId(1), ParticipantId(2));
//!
//! let tackle = Move::new("Tackle", 40, Element::Normal, MoveCategory::Physical);
//! let roster = vec![
//!     Combatant::new("Rumblet", 50, 10, [50, 50, 50, 50, 50], Element::Normal)
//!         .with_moves(vec![tackle]),
//! ];
//!
//! let id = registry
//!     .create(alice, bob, TeamLoadout::from_roster(roster.clone()), TeamLoadout::from_roster(roster))
//!     .unwrap();
//!
//! registry.submit_action(id, alice, ActionKind::Attack { move_index: 0 });
//! registry.submit_action(id, bob, ActionKind::Attack { move_index: 0 });
//!
//! let view = registry.get_status(id, alice).unwrap();
//! assert_eq!(view.turn_count, 1);
//! ```
//!
//! # Concurrency model
//!
//! One coarse mutex guards the whole registry: creation, submission
//! (including the synchronous resolution it may trigger), status reads
//! (including the pull-based timeout check), `end`, and `delete`. Every
//! operation is in-memory and bounded by roster size, so nothing holds the
//! lock across I/O or suspension points.

pub mod action;
pub mod error;
pub mod registry;
pub(crate) mod resolver;
pub mod session;
pub mod timeout;
pub mod view;

// Re-export main types at crate root for convenience
pub use action::{Action, ActionKind};
pub use error::RegistryError;
pub use registry::SessionRegistry;
pub use session::{
    BattleSession, ParticipantId, SessionId, SessionStatus, Side, TeamLoadout, TurnResult,
};
pub use timeout::BATTLE_TIMEOUT;
pub use view::StatusView;

// Re-export commonly used domain types
pub use skirmish_battle::{Combatant, Element, Item, ItemEffect, Move, MoveCategory};
