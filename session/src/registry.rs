//! Session registry: the engine's single entry point
//!
//! One coarse mutex guards every session and the participant mapping.
//! Every operation is in-memory and bounded by roster size, so the critical
//! section never blocks on anything; if contention ever becomes real, the
//! split is a map-only lock plus one lock per session body.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::action::{Action, ActionKind};
use crate::error::RegistryError;
use crate::resolver::resolve_turn;
use crate::session::{BattleSession, ParticipantId, SessionId, SessionStatus, TeamLoadout};
use crate::timeout::check_timeout;
use crate::view::StatusView;

struct RegistryState {
    sessions: HashMap<SessionId, BattleSession>,
    by_participant: HashMap<ParticipantId, SessionId>,
    /// Drives the turn-order coin flip and damage variance. Owned here so
    /// a seeded registry replays identically.
    rng: SmallRng,
}

/// Owns all active sessions and the participant → session mapping.
///
/// Construct one per process and share it (`Arc<SessionRegistry>`); all
/// methods take `&self`.
pub struct SessionRegistry {
    state: Mutex<RegistryState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// A registry whose random choices are reproducible, for tests and
    /// replay tooling
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                sessions: HashMap::new(),
                by_participant: HashMap::new(),
                rng,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        // A poisoning panic cannot leave the map structurally broken, so
        // recover the guard rather than propagating the poison
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a session between two distinct participants.
    ///
    /// The session owns its copies of both loadouts; the caller's originals
    /// can be mutated freely afterwards. Any prior participant mapping is
    /// overwritten: a participant is in at most one session at a time from
    /// the registry's point of view.
    pub fn create(
        &self,
        participant_a: ParticipantId,
        participant_b: ParticipantId,
        loadout_a: TeamLoadout,
        loadout_b: TeamLoadout,
    ) -> Result<SessionId, RegistryError> {
        if participant_a == participant_b {
            return Err(RegistryError::DuplicateParticipant);
        }
        if loadout_a.roster.is_empty() || loadout_b.roster.is_empty() {
            return Err(RegistryError::InvalidRoster);
        }

        let id = SessionId::generate();
        let session = BattleSession::new(id, participant_a, participant_b, loadout_a, loadout_b);

        let mut state = self.lock();
        state.sessions.insert(id, session);
        state.by_participant.insert(participant_a, id);
        state.by_participant.insert(participant_b, id);

        info!(session = %id, a = %participant_a, b = %participant_b, "battle created");
        Ok(id)
    }

    /// Snapshot of a session by id
    pub fn get(&self, session_id: SessionId) -> Option<BattleSession> {
        self.lock().sessions.get(&session_id).cloned()
    }

    /// Snapshot of the session a participant is currently mapped to
    pub fn get_for_participant(&self, participant: ParticipantId) -> Option<BattleSession> {
        let state = self.lock();
        let id = state.by_participant.get(&participant)?;
        state.sessions.get(id).cloned()
    }

    /// The session a participant is mapped to, if any. A presentation
    /// layer polls this to detect an incoming challenge.
    pub fn find_session_for(&self, participant: ParticipantId) -> Option<SessionId> {
        self.lock().by_participant.get(&participant).copied()
    }

    /// Store one participant's action for the current turn.
    ///
    /// Returns `false` for an unknown session, a participant not in it, a
    /// session not waiting for actions, or a slot already filled this turn
    /// (no unsubmit, no overwrite). When this call fills the second slot
    /// the turn resolves synchronously before returning.
    pub fn submit_action(
        &self,
        session_id: SessionId,
        participant: ParticipantId,
        kind: ActionKind,
    ) -> bool {
        let mut state = self.lock();
        let state = &mut *state;
        let Some(session) = state.sessions.get_mut(&session_id) else {
            return false;
        };
        if session.status != SessionStatus::WaitingActions {
            return false;
        }
        let Some(side) = session.side_of(participant) else {
            return false;
        };
        if session.side(side).pending_action.is_some() {
            return false;
        }

        session.side_mut(side).pending_action = Some(Action::new(participant, kind));
        debug!(session = %session_id, %participant, "action submitted");

        if session.both_submitted() {
            resolve_turn(session, &mut state.rng);
        }
        true
    }

    /// Force a session to `Finished` without removing it, so both sides
    /// can still observe the result before teardown.
    pub fn end(&self, session_id: SessionId) -> bool {
        let mut state = self.lock();
        let Some(session) = state.sessions.get_mut(&session_id) else {
            return false;
        };
        session.status = SessionStatus::Finished;
        info!(session = %session_id, "battle ended");
        true
    }

    /// Remove a session and both participant mappings. Call only once
    /// every interested party has observed the terminal result; the other
    /// side's next poll gets `None` and must read it as "battle ended
    /// early", not as an error.
    pub fn delete(&self, session_id: SessionId) -> bool {
        let mut state = self.lock();
        let Some(session) = state.sessions.remove(&session_id) else {
            return false;
        };
        // Stale or missing mappings are fine; removal is idempotent
        for side in &session.sides {
            state.by_participant.remove(&side.participant);
        }
        info!(session = %session_id, "battle deleted");
        true
    }

    /// Status snapshot for a participant of the session.
    ///
    /// This is the only trigger for timeout detection: an unpolled session
    /// never expires.
    pub fn get_status(
        &self,
        session_id: SessionId,
        participant: ParticipantId,
    ) -> Option<StatusView> {
        self.status_at(session_id, participant, Instant::now())
    }

    fn status_at(
        &self,
        session_id: SessionId,
        participant: ParticipantId,
        now: Instant,
    ) -> Option<StatusView> {
        let mut state = self.lock();
        let session = state.sessions.get_mut(&session_id)?;
        session.side_of(participant)?;

        check_timeout(session, now);
        Some(StatusView::from_session(session))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
