//! Pure battle math: damage formula and item effects
//!
//! Both entry points are total. Bad numeric inputs are clamped or defaulted
//! before use, so the session layer never has to handle a calculator
//! failure mid-turn.

use rand::Rng;

use crate::types::{Combatant, Item, ItemEffect, Move, MoveCategory};

/// Result of one damage calculation
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOutcome {
    /// Damage to subtract from the defender (0 for status moves/immunity)
    pub amount: i32,
    /// Battle log lines, in display order
    pub messages: Vec<String>,
}

/// Result of one item application
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    /// Whether the item had any effect (a failed use must not consume it)
    pub success: bool,
    pub messages: Vec<String>,
}

/// Compute the damage of `mv` from `attacker` against `defender`.
///
/// Formula:
///
/// ```text
/// base = ((2 * level + 10) / 250) * (atk / def) * power + 2
/// damage = floor(base * stab * type_effectiveness * uniform(0.85, 1.0))
/// ```
///
/// STAB is 1.5 when the move's element matches either of the attacker's.
/// The stat pair follows the move category; both categories share the same
/// additive boost fields. A positive type multiplier clamps the result to
/// at least 1; a multiplier of 0 forces it to 0.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    mv: &Move,
    rng: &mut impl Rng,
) -> DamageOutcome {
    let mut messages = vec![format!("{} used {}!", attacker.name, mv.name)];

    if !mv.is_damaging() {
        messages.push("But nothing happened...".to_string());
        return DamageOutcome {
            amount: 0,
            messages,
        };
    }

    let (atk, def) = match mv.category {
        MoveCategory::Physical => (
            attacker.attack + attacker.attack_boost,
            defender.defense + defender.defense_boost,
        ),
        MoveCategory::Special => (
            attacker.sp_attack + attacker.attack_boost,
            defender.sp_defense + defender.defense_boost,
        ),
    };
    // Defense floor keeps the division total
    let def = def.max(1);

    let base = ((2.0 * attacker.level as f64 + 10.0) / 250.0) * (atk as f64 / def as f64)
        * mv.power as f64
        + 2.0;

    let stab = if attacker.has_element(mv.element) {
        1.5
    } else {
        1.0
    };

    let type_mult = mv.element.effectiveness_against(&defender.elements);
    let random_factor: f64 = rng.gen_range(0.85..1.0);

    let mut amount = (base * stab * type_mult * random_factor) as i32;
    if type_mult > 0.0 {
        amount = amount.max(1);
    }

    if type_mult == 0.0 {
        messages.push(format!("It doesn't affect {}...", defender.name));
        amount = 0;
    } else if type_mult >= 2.0 {
        messages.push("It's super effective!".to_string());
    } else if type_mult <= 0.5 {
        messages.push("It's not very effective...".to_string());
    }

    DamageOutcome { amount, messages }
}

/// Apply an item to a combatant.
///
/// A heal at full HP fails without touching the combatant; the caller must
/// not decrement the item count in that case. Boost items always succeed.
pub fn apply_item(combatant: &mut Combatant, item: &Item) -> ItemOutcome {
    match item.effect {
        ItemEffect::Heal => {
            let restored = combatant.heal(item.value);
            if restored > 0 {
                ItemOutcome {
                    success: true,
                    messages: vec![
                        format!("Used {}!", item.name),
                        format!("{} recovered {} HP!", combatant.name, restored),
                    ],
                }
            } else {
                ItemOutcome {
                    success: false,
                    messages: vec![format!("{}'s HP is already full!", combatant.name)],
                }
            }
        }
        ItemEffect::AttackBoost => {
            combatant.attack_boost += item.value;
            ItemOutcome {
                success: true,
                messages: vec![
                    format!("Used {}!", item.name),
                    format!("{}'s Attack rose!", combatant.name),
                ],
            }
        }
        ItemEffect::DefenseBoost => {
            combatant.defense_boost += item.value;
            ItemOutcome {
                success: true,
                messages: vec![
                    format!("Used {}!", item.name),
                    format!("{}'s Defense rose!", combatant.name),
                ],
            }
        }
        ItemEffect::None => ItemOutcome {
            success: false,
            messages: vec![format!("Cannot use {} in battle!", item.name)],
        },
    }
}
