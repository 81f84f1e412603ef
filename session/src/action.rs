//! Submitted actions

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::session::ParticipantId;

/// A participant's intent for the current turn.
///
/// The payload is validated at the registry boundary only as far as its
/// shape; a bad move index or switch target degrades gracefully inside the
/// turn instead of rejecting it, because the other side has already
/// committed an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Attack { move_index: usize },
    UseItem { item_name: String },
    Switch { target_index: usize },
}

impl ActionKind {
    /// Ordering class within a turn: switches always resolve before
    /// attacks and item uses. Equal classes are coin-flipped by the
    /// resolver (the speed stat is deliberately not consulted).
    pub(crate) fn priority(&self) -> u8 {
        match self {
            ActionKind::Switch { .. } => 0,
            ActionKind::Attack { .. } | ActionKind::UseItem { .. } => 1,
        }
    }
}

/// One stored action slot, consumed at end-of-turn resolution
#[derive(Debug, Clone)]
pub struct Action {
    pub participant: ParticipantId,
    pub kind: ActionKind,
    pub submitted_at: Instant,
}

impl Action {
    pub fn new(participant: ParticipantId, kind: ActionKind) -> Self {
        Self {
            participant,
            kind,
            submitted_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_classes() {
        assert_eq!(ActionKind::Switch { target_index: 1 }.priority(), 0);
        assert_eq!(ActionKind::Attack { move_index: 0 }.priority(), 1);
        assert_eq!(
            ActionKind::UseItem {
                item_name: "Potion".into()
            }
            .priority(),
            1
        );
    }

    #[test]
    fn test_action_kind_wire_shape() {
        let kind: ActionKind =
            serde_json::from_str(r#"{"type": "attack", "move_index": 1}"#).unwrap();
        assert_eq!(kind, ActionKind::Attack { move_index: 1 });

        let kind: ActionKind =
            serde_json::from_str(r#"{"type": "use_item", "item_name": "Potion"}"#).unwrap();
        assert_eq!(
            kind,
            ActionKind::UseItem {
                item_name: "Potion".into()
            }
        );

        let kind: ActionKind =
            serde_json::from_str(r#"{"type": "switch", "target_index": 2}"#).unwrap();
        assert_eq!(kind, ActionKind::Switch { target_index: 2 });
    }
}
