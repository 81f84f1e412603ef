//! Battle session state

use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skirmish_battle::{Combatant, Item};

use crate::action::Action;

/// Opaque caller-supplied participant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session lifecycle states.
///
/// `Processing` is held only inside the resolution critical section; an
/// external observer only ever sees `WaitingActions` or `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    WaitingActions,
    Processing,
    Finished,
}

/// Messages from the most recent resolved turn, for polling clients.
///
/// `winner` is set only on the turn (or timeout check) that ended the
/// session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    pub messages: Vec<String>,
    pub winner: Option<ParticipantId>,
}

/// Everything one side brings into a battle: an ordered roster and an item
/// bag. Supplied by the roster provider at creation; the session owns its
/// own copy, so later mutation of the caller's data never leaks in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamLoadout {
    pub roster: Vec<Combatant>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl TeamLoadout {
    pub fn new(roster: Vec<Combatant>, items: Vec<Item>) -> Self {
        Self { roster, items }
    }

    /// A loadout with an empty item bag
    pub fn from_roster(roster: Vec<Combatant>) -> Self {
        Self {
            roster,
            items: Vec::new(),
        }
    }
}

/// Which of the two sides of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A = 0,
    B = 1,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// One participant's half of the session
#[derive(Debug, Clone)]
pub(crate) struct SideState {
    pub participant: ParticipantId,
    pub roster: Vec<Combatant>,
    pub items: Vec<Item>,
    /// Index into `roster` of the combatant currently fighting. Always
    /// points at a living combatant unless the whole roster is exhausted,
    /// which is terminal.
    pub active_index: usize,
    pub pending_action: Option<Action>,
}

impl SideState {
    fn new(participant: ParticipantId, loadout: TeamLoadout) -> Self {
        Self {
            participant,
            roster: loadout.roster,
            items: loadout.items,
            active_index: 0,
            pending_action: None,
        }
    }

    pub fn active(&self) -> &Combatant {
        &self.roster[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut Combatant {
        &mut self.roster[self.active_index]
    }

    /// Index of the next living roster mate other than the current active,
    /// scanning from the front. `None` means the roster is exhausted.
    pub fn next_alive_index(&self) -> Option<usize> {
        self.roster
            .iter()
            .enumerate()
            .find(|(i, c)| *i != self.active_index && c.is_alive())
            .map(|(i, _)| i)
    }
}

/// One two-participant encounter and all its mutable state.
///
/// Created by the registry, mutated only by the turn resolver and the
/// timeout check, transitioned to `Finished` exactly once, and destroyed
/// only by an explicit delete.
#[derive(Debug, Clone)]
pub struct BattleSession {
    pub id: SessionId,
    pub(crate) sides: [SideState; 2],
    pub status: SessionStatus,
    /// Incremented at the start of each resolution, not its completion
    pub turn_count: u32,
    /// Refreshed at creation and at the end of each resolved turn; the
    /// timeout window is measured from here
    pub(crate) last_update: Instant,
    pub last_result: Option<TurnResult>,
    pub winner: Option<ParticipantId>,
}

impl BattleSession {
    pub(crate) fn new(
        id: SessionId,
        participant_a: ParticipantId,
        participant_b: ParticipantId,
        loadout_a: TeamLoadout,
        loadout_b: TeamLoadout,
    ) -> Self {
        Self {
            id,
            sides: [
                SideState::new(participant_a, loadout_a),
                SideState::new(participant_b, loadout_b),
            ],
            status: SessionStatus::WaitingActions,
            turn_count: 0,
            last_update: Instant::now(),
            last_result: None,
            winner: None,
        }
    }

    pub(crate) fn side(&self, side: Side) -> &SideState {
        &self.sides[side as usize]
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side as usize]
    }

    /// Which side a participant is on, if any
    pub fn side_of(&self, participant: ParticipantId) -> Option<Side> {
        if self.sides[0].participant == participant {
            Some(Side::A)
        } else if self.sides[1].participant == participant {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Mutable access to the acting side and its opponent at once
    pub(crate) fn acting_and_opposing_mut(
        &mut self,
        acting: Side,
    ) -> (&mut SideState, &mut SideState) {
        let (a, b) = self.sides.split_at_mut(1);
        match acting {
            Side::A => (&mut a[0], &mut b[0]),
            Side::B => (&mut b[0], &mut a[0]),
        }
    }

    pub fn participant(&self, side: Side) -> ParticipantId {
        self.side(side).participant
    }

    pub fn roster(&self, side: Side) -> &[Combatant] {
        &self.side(side).roster
    }

    pub fn items(&self, side: Side) -> &[Item] {
        &self.side(side).items
    }

    pub fn active_index(&self, side: Side) -> usize {
        self.side(side).active_index
    }

    /// The combatant currently fighting for a side
    pub fn active(&self, side: Side) -> &Combatant {
        self.side(side).active()
    }

    pub fn action_submitted(&self, side: Side) -> bool {
        self.side(side).pending_action.is_some()
    }

    pub(crate) fn both_submitted(&self) -> bool {
        self.sides.iter().all(|s| s.pending_action.is_some())
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    /// Terminal transition. Winner boosts are cleared here as the win
    /// outcome cleanup; a loser or timed-out side keeps its stale boosts.
    pub(crate) fn finish(&mut self, winner: Option<ParticipantId>) {
        self.status = SessionStatus::Finished;
        self.winner = winner;
        if let Some(w) = winner {
            if let Some(side) = self.side_of(w) {
                for combatant in &mut self.side_mut(side).roster {
                    combatant.reset_boosts();
                }
            }
        }
    }
}
