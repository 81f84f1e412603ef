//! Status snapshots for polling callers

use serde::Serialize;

use skirmish_battle::{Combatant, Item};

use crate::session::{BattleSession, ParticipantId, SessionId, SessionStatus, Side, TurnResult};

/// Everything a polling caller sees of a session.
///
/// Both full rosters (movesets included) are returned to either
/// participant; there is no information hiding between sides. A caller
/// detects a new turn by comparing `turn_count` against the last value it
/// observed, not by the act of polling.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub session_id: SessionId,
    pub participant_a: ParticipantId,
    pub participant_b: ParticipantId,
    pub turn_count: u32,
    pub status: SessionStatus,
    pub roster_a: Vec<Combatant>,
    pub roster_b: Vec<Combatant>,
    pub items_a: Vec<Item>,
    pub items_b: Vec<Item>,
    pub active_index_a: usize,
    pub active_index_b: usize,
    pub winner: Option<ParticipantId>,
    pub last_result: Option<TurnResult>,
    pub action_submitted_a: bool,
    pub action_submitted_b: bool,
}

impl StatusView {
    pub(crate) fn from_session(session: &BattleSession) -> Self {
        Self {
            session_id: session.id,
            participant_a: session.participant(Side::A),
            participant_b: session.participant(Side::B),
            turn_count: session.turn_count,
            status: session.status,
            roster_a: session.roster(Side::A).to_vec(),
            roster_b: session.roster(Side::B).to_vec(),
            items_a: session.items(Side::A).to_vec(),
            items_b: session.items(Side::B).to_vec(),
            active_index_a: session.active_index(Side::A),
            active_index_b: session.active_index(Side::B),
            winner: session.winner,
            last_result: session.last_result.clone(),
            action_submitted_a: session.action_submitted(Side::A),
            action_submitted_b: session.action_submitted(Side::B),
        }
    }
}
