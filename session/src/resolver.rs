//! Turn resolution
//!
//! Invoked synchronously, under the registry lock, the moment the second
//! action slot fills. Mutates nothing but the session it is handed.

use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use skirmish_battle::{apply_item, calculate_damage};

use crate::action::ActionKind;
use crate::session::{BattleSession, ParticipantId, SessionStatus, Side, TurnResult};

/// Resolve one turn. Both action slots must be filled.
pub(crate) fn resolve_turn(session: &mut BattleSession, rng: &mut impl Rng) {
    session.status = SessionStatus::Processing;
    session.turn_count += 1;
    debug!(session = %session.id, turn = session.turn_count, "resolving turn");

    let mut messages = Vec::new();

    for side in schedule(session, rng) {
        let Some(kind) = session
            .side(side)
            .pending_action
            .as_ref()
            .map(|a| a.kind.clone())
        else {
            continue;
        };

        let actor = session.active(side);
        if !actor.is_alive() {
            messages.push(format!("{} cannot attack (fainted)!", actor.name));
            continue;
        }

        match kind {
            ActionKind::Attack { move_index } => {
                if let AttackResult::Knockout(winner) =
                    execute_attack(session, side, move_index, rng, &mut messages)
                {
                    messages.push(format!("Player {} wins!", winner));
                    info!(session = %session.id, winner = %winner, "battle finished by knockout");
                    session.finish(Some(winner));
                    session.last_result = Some(TurnResult {
                        messages: std::mem::take(&mut messages),
                        winner: Some(winner),
                    });
                    // Whatever was scheduled after this action never runs
                    return;
                }
            }
            ActionKind::UseItem { item_name } => {
                execute_item(session, side, &item_name, &mut messages);
            }
            ActionKind::Switch { target_index } => {
                execute_switch(session, side, target_index, &mut messages);
            }
        }
    }

    for side_state in &mut session.sides {
        side_state.pending_action = None;
    }
    session.status = SessionStatus::WaitingActions;
    session.last_update = Instant::now();
    session.last_result = Some(TurnResult {
        messages,
        winner: None,
    });
}

/// Execution order for the two pending actions: switches before everything
/// else, equal priority classes decided by a coin flip. Speed is
/// deliberately not consulted.
fn schedule(session: &BattleSession, rng: &mut impl Rng) -> [Side; 2] {
    let priority = |side: Side| {
        session
            .side(side)
            .pending_action
            .as_ref()
            .map_or(1, |a| a.kind.priority())
    };

    let (pa, pb) = (priority(Side::A), priority(Side::B));
    if pa < pb {
        [Side::A, Side::B]
    } else if pb < pa {
        [Side::B, Side::A]
    } else if rng.gen_bool(0.5) {
        [Side::A, Side::B]
    } else {
        [Side::B, Side::A]
    }
}

enum AttackResult {
    Continue,
    /// The defender's whole roster is down; the attacker wins
    Knockout(ParticipantId),
}

fn execute_attack(
    session: &mut BattleSession,
    side: Side,
    move_index: usize,
    rng: &mut impl Rng,
    messages: &mut Vec<String>,
) -> AttackResult {
    let (acting, opposing) = session.acting_and_opposing_mut(side);
    let attacker = &acting.roster[acting.active_index];
    let defender = &mut opposing.roster[opposing.active_index];

    match attacker.moves.get(move_index) {
        Some(mv) => {
            let outcome = calculate_damage(attacker, defender, mv, rng);
            messages.extend(outcome.messages);
            let old_hp = defender.hp;
            defender.take_damage(outcome.amount);
            messages.push(format!("{}: {} -> {} HP", defender.name, old_hp, defender.hp));
        }
        None => {
            // Bad move index or empty move list degrades to a basic hit
            // rather than voiding the committed turn
            let damage = attacker.level.max(1);
            let old_hp = defender.hp;
            defender.take_damage(damage);
            messages.push(format!("{} attacked for {} damage!", attacker.name, damage));
            messages.push(format!("{}: {} -> {} HP", defender.name, old_hp, defender.hp));
        }
    }

    if opposing.roster[opposing.active_index].is_alive() {
        return AttackResult::Continue;
    }

    messages.push(format!(
        "{} fainted!",
        opposing.roster[opposing.active_index].name
    ));

    match opposing.next_alive_index() {
        Some(next) => {
            opposing.active_index = next;
            messages.push(format!(
                "Player {} sent out {}!",
                opposing.participant, opposing.roster[next].name
            ));
            AttackResult::Continue
        }
        None => AttackResult::Knockout(acting.participant),
    }
}

fn execute_item(session: &mut BattleSession, side: Side, item_name: &str, messages: &mut Vec<String>) {
    let side_state = session.side_mut(side);
    let Some(pos) = side_state
        .items
        .iter()
        .position(|it| it.name == item_name && it.count > 0)
    else {
        messages.push(format!("No {} to use!", item_name));
        return;
    };

    let item = side_state.items[pos].clone();
    let outcome = apply_item(side_state.active_mut(), &item);
    messages.extend(outcome.messages);

    // A failed use (heal at full HP, unusable effect) must not consume
    if outcome.success {
        side_state.items[pos].count -= 1;
        debug!(
            item = %item.name,
            remaining = side_state.items[pos].count,
            "item consumed"
        );
    }
}

fn execute_switch(
    session: &mut BattleSession,
    side: Side,
    target_index: usize,
    messages: &mut Vec<String>,
) {
    let side_state = session.side_mut(side);
    match side_state.roster.get(target_index) {
        Some(target) if target.is_alive() => {
            let name = target.name.clone();
            side_state.active_index = target_index;
            messages.push(format!(
                "Player {} switched to {}!",
                side_state.participant, name
            ));
        }
        Some(target) => {
            messages.push(format!("Cannot switch to fainted {}!", target.name));
        }
        None => {
            messages.push("Invalid switch target!".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use skirmish_battle::{Combatant, Element, Item, ItemEffect, Move, MoveCategory};

    use super::*;
    use crate::action::Action;
    use crate::session::{SessionId, TeamLoadout};

    const ALICE: ParticipantId = ParticipantId(1);
    const BOB: ParticipantId = ParticipantId(2);

    fn tackle() -> Move {
        Move::new("Tackle", 40, Element::Normal, MoveCategory::Physical)
    }

    fn combatant(name: &str) -> Combatant {
        Combatant::new(name, 50, 10, [50, 50, 50, 50, 50], Element::Normal)
            .with_moves(vec![tackle()])
    }

    fn session_with(loadout_a: TeamLoadout, loadout_b: TeamLoadout) -> BattleSession {
        BattleSession::new(SessionId::generate(), ALICE, BOB, loadout_a, loadout_b)
    }

    fn submit(session: &mut BattleSession, side: Side, kind: ActionKind) {
        let participant = session.participant(side);
        session.side_mut(side).pending_action = Some(Action::new(participant, kind));
    }

    #[test]
    fn test_both_attack_resolves_one_turn() {
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Alpha")]),
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(11);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.turn_count, 1);
        assert_eq!(session.status, SessionStatus::WaitingActions);
        assert!(session.active(Side::A).hp < 50);
        assert!(session.active(Side::B).hp < 50);
        assert!(!session.action_submitted(Side::A));
        assert!(!session.action_submitted(Side::B));

        let result = session.last_result.as_ref().unwrap();
        assert!(result.winner.is_none());
        assert!(!result.messages.is_empty());
    }

    #[test]
    fn test_hp_bounds_hold_after_resolution() {
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Alpha")]),
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(12);
        resolve_turn(&mut session, &mut rng);

        for side in [Side::A, Side::B] {
            for c in session.roster(side) {
                assert!(c.hp >= 0 && c.hp <= c.max_hp);
            }
        }
    }

    #[test]
    fn test_switch_resolves_before_attack() {
        // A switches, B attacks: the hit must land on the newly switched-in
        // combatant regardless of the coin flip
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Lead"), combatant("Bench")]),
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        submit(&mut session, Side::A, ActionKind::Switch { target_index: 1 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(13);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.active_index(Side::A), 1);
        assert_eq!(session.roster(Side::A)[0].hp, 50, "old lead untouched");
        assert!(session.roster(Side::A)[1].hp < 50, "new active took the hit");
    }

    #[test]
    fn test_double_switch_both_apply() {
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("A1"), combatant("A2")]),
            TeamLoadout::from_roster(vec![combatant("B1"), combatant("B2")]),
        );
        submit(&mut session, Side::A, ActionKind::Switch { target_index: 1 });
        submit(&mut session, Side::B, ActionKind::Switch { target_index: 1 });

        let mut rng = SmallRng::seed_from_u64(14);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.active_index(Side::A), 1);
        assert_eq!(session.active_index(Side::B), 1);
        assert_eq!(session.status, SessionStatus::WaitingActions);
    }

    #[test]
    fn test_switch_to_fainted_target_fails() {
        let mut loadout = TeamLoadout::from_roster(vec![combatant("Lead"), combatant("Down")]);
        loadout.roster[1].hp = 0;
        let mut session = session_with(
            loadout,
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        submit(&mut session, Side::A, ActionKind::Switch { target_index: 1 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(15);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.active_index(Side::A), 0);
        let result = session.last_result.as_ref().unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m == "Cannot switch to fainted Down!"));
    }

    #[test]
    fn test_switch_out_of_range_fails() {
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Alpha")]),
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        submit(&mut session, Side::A, ActionKind::Switch { target_index: 5 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(16);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.active_index(Side::A), 0);
        let result = session.last_result.as_ref().unwrap();
        assert!(result.messages.iter().any(|m| m == "Invalid switch target!"));
    }

    #[test]
    fn test_bad_move_index_falls_back_to_basic_attack() {
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Alpha")]),
            TeamLoadout::from_roster(vec![
                Combatant::new("Moveless", 50, 10, [50, 50, 50, 50, 50], Element::Normal),
            ]),
        );
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 7 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(17);
        resolve_turn(&mut session, &mut rng);

        // Both sides fell back to max(1, level) = 10 flat damage
        assert_eq!(session.active(Side::A).hp, 40);
        assert_eq!(session.active(Side::B).hp, 40);
        let result = session.last_result.as_ref().unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m == "Alpha attacked for 10 damage!"));
    }

    #[test]
    fn test_knockout_of_last_combatant_cancels_later_action() {
        // Both actives sit at 1 HP, so any hit is a knockout: whichever
        // side the coin flip schedules first wins, and the loser's attack
        // never happens
        let mut glass_a = combatant("GlassA");
        glass_a.hp = 1;
        let mut glass_b = combatant("GlassB");
        glass_b.hp = 1;

        let mut session = session_with(
            TeamLoadout::from_roster(vec![glass_a]),
            TeamLoadout::from_roster(vec![glass_b]),
        );
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        for seed in 0..8 {
            let mut fresh = session.clone();
            let mut rng = SmallRng::seed_from_u64(seed);
            resolve_turn(&mut fresh, &mut rng);

            assert_eq!(fresh.status, SessionStatus::Finished);
            let winner = fresh.winner.expect("knockout must set a winner");
            let winner_side = fresh.side_of(winner).unwrap();
            assert_eq!(fresh.active(winner_side.opponent()).hp, 0);
            // The loser never acted: the winner still has its 1 HP
            assert_eq!(fresh.active(winner_side).hp, 1);

            let result = fresh.last_result.as_ref().unwrap();
            assert_eq!(result.winner, Some(winner));
            assert!(result
                .messages
                .iter()
                .any(|m| *m == format!("Player {} wins!", winner)));
        }
    }

    #[test]
    fn test_faint_brings_in_next_alive_combatant() {
        let mut frail = combatant("Frail");
        frail.hp = 1;

        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Crusher")]),
            TeamLoadout::from_roster(vec![frail, combatant("Backup")]),
        );
        // B's action is a harmless missing-item use, so A's attack is the
        // only damage source this turn whichever order the flip picks
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(
            &mut session,
            Side::B,
            ActionKind::UseItem {
                item_name: "Nothing".into(),
            },
        );

        let mut rng = SmallRng::seed_from_u64(19);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.status, SessionStatus::WaitingActions);
        assert_eq!(session.active_index(Side::B), 1);
        let result = session.last_result.as_ref().unwrap();
        assert!(result.messages.iter().any(|m| m == "Frail fainted!"));
        assert!(result
            .messages
            .iter()
            .any(|m| *m == format!("Player {} sent out Backup!", BOB)));
    }

    #[test]
    fn test_fainted_replacement_acts_or_not_depending_on_order() {
        // When the first scheduled attack faints the active but a bench
        // remains, resolution continues; the session does not finish
        let mut strong = combatant("Crusher");
        strong.attack = 10_000;

        let mut session = session_with(
            TeamLoadout::from_roster(vec![strong]),
            TeamLoadout::from_roster(vec![combatant("First"), combatant("Second")]),
        );
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(21);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.status, SessionStatus::WaitingActions);
        assert!(session.winner.is_none());
        assert_eq!(session.turn_count, 1);
    }

    #[test]
    fn test_item_consumed_only_on_success() {
        let mut wounded = combatant("Wounded");
        wounded.hp = 20;
        let mut session = session_with(
            TeamLoadout::new(
                vec![wounded],
                vec![Item::new("Potion", 2, ItemEffect::Heal, 20)],
            ),
            TeamLoadout::new(
                vec![combatant("Fit")],
                vec![Item::new("Potion", 2, ItemEffect::Heal, 20)],
            ),
        );
        submit(
            &mut session,
            Side::A,
            ActionKind::UseItem {
                item_name: "Potion".into(),
            },
        );
        submit(
            &mut session,
            Side::B,
            ActionKind::UseItem {
                item_name: "Potion".into(),
            },
        );

        let mut rng = SmallRng::seed_from_u64(22);
        resolve_turn(&mut session, &mut rng);

        // A healed and consumed; B was at full HP, so the potion stays
        assert_eq!(session.active(Side::A).hp, 40);
        assert_eq!(session.items(Side::A)[0].count, 1);
        assert_eq!(session.items(Side::B)[0].count, 2);
    }

    #[test]
    fn test_missing_item_degrades_with_message() {
        let mut session = session_with(
            TeamLoadout::from_roster(vec![combatant("Alpha")]),
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        submit(
            &mut session,
            Side::A,
            ActionKind::UseItem {
                item_name: "Elixir".into(),
            },
        );
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(23);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.status, SessionStatus::WaitingActions);
        let result = session.last_result.as_ref().unwrap();
        assert!(result.messages.iter().any(|m| m == "No Elixir to use!"));
    }

    #[test]
    fn test_boost_item_raises_later_damage() {
        let mut session = session_with(
            TeamLoadout::new(
                vec![combatant("Booster")],
                vec![Item::new("X Attack", 1, ItemEffect::AttackBoost, 100)],
            ),
            TeamLoadout::from_roster(vec![combatant("Target")]),
        );
        submit(
            &mut session,
            Side::A,
            ActionKind::UseItem {
                item_name: "X Attack".into(),
            },
        );
        submit(
            &mut session,
            Side::B,
            ActionKind::UseItem {
                item_name: "Nothing".into(),
            },
        );

        let mut rng = SmallRng::seed_from_u64(24);
        resolve_turn(&mut session, &mut rng);
        assert_eq!(session.active(Side::A).attack_boost, 100);

        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(
            &mut session,
            Side::B,
            ActionKind::UseItem {
                item_name: "Nothing".into(),
            },
        );
        resolve_turn(&mut session, &mut rng);

        // Boosted 150 atk vs 50 def at level 10, power 40, STAB:
        // base = 0.12 * 3 * 40 + 2 = 16.4; damage >= floor(16.4 * 1.5 * 0.85)
        let dealt = 50 - session.active(Side::B).hp;
        assert!(dealt >= 20, "boosted hit only dealt {}", dealt);
    }

    #[test]
    fn test_fainted_actor_is_skipped() {
        let mut down = combatant("Down");
        down.hp = 0;
        let mut loadout_a = TeamLoadout::from_roster(vec![down, combatant("Up")]);
        loadout_a.roster[0].hp = 0;
        let mut session = session_with(
            loadout_a,
            TeamLoadout::from_roster(vec![combatant("Beta")]),
        );
        // Active A is fainted (degenerate state): its action is skipped
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(
            &mut session,
            Side::B,
            ActionKind::UseItem {
                item_name: "Nothing".into(),
            },
        );

        let mut rng = SmallRng::seed_from_u64(25);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.active(Side::B).hp, 50);
        let result = session.last_result.as_ref().unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m == "Down cannot attack (fainted)!"));
    }

    #[test]
    fn test_equal_priority_order_is_coin_flipped() {
        // Over many seeds both orders must occur. Each side pokes for a
        // deterministic 10 via the basic-attack fallback; first actor is
        // identified by the first message
        let mut a_first = 0;
        let mut b_first = 0;
        for seed in 0..64 {
            let mut session = session_with(
                TeamLoadout::from_roster(vec![
                    Combatant::new("Echo", 50, 10, [50, 50, 50, 50, 50], Element::Normal),
                ]),
                TeamLoadout::from_roster(vec![
                    Combatant::new("Foxtrot", 50, 10, [50, 50, 50, 50, 50], Element::Normal),
                ]),
            );
            submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
            submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

            let mut rng = SmallRng::seed_from_u64(seed);
            resolve_turn(&mut session, &mut rng);

            let first = &session.last_result.as_ref().unwrap().messages[0];
            if first.starts_with("Echo") {
                a_first += 1;
            } else {
                b_first += 1;
            }
        }
        assert!(a_first > 0, "side A never acted first in 64 seeds");
        assert!(b_first > 0, "side B never acted first in 64 seeds");
    }

    #[test]
    fn test_winner_boosts_reset_on_knockout() {
        let mut strong = combatant("Crusher");
        strong.attack = 10_000;
        strong.attack_boost = 55;
        let mut frail = combatant("Frail");
        frail.hp = 1;
        frail.moves = Vec::new();
        // A fallback poke from Frail cannot KO, keeping the outcome fixed
        let mut session = session_with(
            TeamLoadout::from_roster(vec![strong]),
            TeamLoadout::from_roster(vec![frail]),
        );
        submit(&mut session, Side::A, ActionKind::Attack { move_index: 0 });
        submit(&mut session, Side::B, ActionKind::Attack { move_index: 0 });

        let mut rng = SmallRng::seed_from_u64(26);
        resolve_turn(&mut session, &mut rng);

        assert_eq!(session.winner, Some(ALICE));
        assert_eq!(session.roster(Side::A)[0].attack_boost, 0);
    }
}
