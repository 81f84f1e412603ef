//! Pull-based session expiry
//!
//! There is no background sweep: the check runs only when a caller polls
//! `get_status`, so a session nobody polls never expires on its own.

use std::time::{Duration, Instant};

use tracing::info;

use crate::session::{BattleSession, SessionStatus, Side, TurnResult};

/// How long a session may sit in `WaitingActions` before the next status
/// poll declares it expired, measured from `last_update`.
pub const BATTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Expire the session if its action window has lapsed. Returns whether it
/// was expired by this call.
///
/// The side that never submitted loses; if neither side submitted, side A
/// loses by default.
pub(crate) fn check_timeout(session: &mut BattleSession, now: Instant) -> bool {
    if session.status != SessionStatus::WaitingActions {
        return false;
    }

    if now.saturating_duration_since(session.last_update) <= BATTLE_TIMEOUT {
        return false;
    }

    let loser_side = if session.action_submitted(Side::A) {
        Side::B
    } else {
        Side::A
    };
    let loser = session.participant(loser_side);
    let winner = session.participant(loser_side.opponent());

    info!(session = %session.id, %winner, %loser, "session timed out");

    session.finish(Some(winner));
    session.last_result = Some(TurnResult {
        messages: vec![
            format!("Player {} timed out!", loser),
            format!("Player {} wins!", winner),
        ],
        winner: Some(winner),
    });
    true
}
