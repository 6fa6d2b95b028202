//! How long the acting combatant can expect to stay in.
//!
//! The projection walks the opponent's possible fast and special sequences
//! over the acting combatant's next fast-move window and records the earliest
//! turn it could faint. `LastChanceThrow` uses it to fire a special before
//! that happens.

use crate::action::Action;
use crate::battle::ai::{Strategist, TurnView, Verdict};
use crate::battle::context::DecisionContext;
use crate::combatant::CombatantSnapshot;
use schema::{MAX_ENERGY, TURN_MS};

#[derive(Debug, Clone, Copy)]
struct Threat {
    hp: i64,
    opponent_energy: u8,
    turn: u32,
    shields: u8,
}

/// Earliest turn the opponent could knock `me` out, or `None` if no line of
/// play within the window does.
pub fn project_turns_to_live(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> Option<u32> {
    let opponent_fast_damage = ctx.fast_damage(opponent, me) as i64;
    let opponent_fast_turns = opponent.fast_move.turns();
    let opponent_gain = opponent.fast_move.energy_gain;
    let fast_turns = me.fast_move.turns();
    let window = if me.wins_cmp(opponent) {
        fast_turns
    } else {
        fast_turns + 1
    };

    let start = if opponent.cooldown_ms > 0 {
        Threat {
            hp: me.hp as i64 - opponent_fast_damage,
            opponent_energy: opponent.energy.saturating_add(opponent_gain).min(MAX_ENERGY),
            turn: (opponent.cooldown_ms / TURN_MS) as u32,
            shields: me.shields,
        }
    } else {
        Threat {
            hp: me.hp as i64,
            opponent_energy: opponent.energy,
            turn: 0,
            shields: me.shields,
        }
    };

    let mut turns_to_live: Option<u32> = None;
    let mut record = |turn: u32| {
        turns_to_live = Some(turns_to_live.map_or(turn, |current| current.min(turn)));
    };

    let mut pending = vec![start];
    let mut visited = 0;
    while let Some(threat) = pending.pop() {
        visited += 1;
        if visited > ctx.config.state_ceiling {
            break;
        }

        if threat.hp > opponent_fast_damage && threat.turn > window {
            continue;
        }

        if threat.shields > 0 {
            // The opponent spends its cheapest special to strip a shield.
            if let Some(cheapest) = opponent.cheapest_special() {
                if threat.opponent_energy >= cheapest.energy_cost {
                    pending.push(Threat {
                        hp: threat.hp - 1,
                        opponent_energy: threat.opponent_energy - cheapest.energy_cost,
                        turn: threat.turn + 1,
                        shields: threat.shields - 1,
                    });
                }
            }
        } else {
            for special in &opponent.special_moves {
                if threat.opponent_energy < special.energy_cost {
                    continue;
                }
                let damage = ctx.damage(opponent, me, special) as i64;
                if damage >= threat.hp {
                    let loses_tie = me.attack_stat > opponent.attack_stat
                        && opponent.fast_move.cooldown_ms.checked_rem(me.fast_move.cooldown_ms) == Some(0);
                    record(threat.turn + loses_tie as u32);
                    break;
                }
                pending.push(Threat {
                    hp: threat.hp - damage,
                    opponent_energy: threat.opponent_energy - special.energy_cost,
                    turn: threat.turn + 1,
                    shields: threat.shields,
                });
            }
        }

        if threat.hp - opponent_fast_damage <= 0 {
            record(threat.turn + opponent_fast_turns);
            break;
        }

        pending.push(Threat {
            hp: threat.hp - opponent_fast_damage,
            opponent_energy: threat.opponent_energy.saturating_add(opponent_gain).min(MAX_ENERGY),
            turn: threat.turn + opponent_fast_turns,
            shields: threat.shields,
        });
    }

    // Two quick hits from a 500ms fast move arrive a turn sooner than projected.
    if me.hp as i64 <= opponent_fast_damage * 2 && opponent.fast_move.cooldown_ms == TURN_MS {
        turns_to_live = turns_to_live.map(|turns| turns.saturating_sub(1));
    }

    // A slow fast move already in flight lands when its cooldown runs out.
    if opponent.cooldown_ms > 0
        && opponent.fast_move.cooldown_ms > TURN_MS
        && me.hp as i64 <= opponent_fast_damage
    {
        let mut turns = (opponent.cooldown_ms / TURN_MS) as u32;
        if opponent.hp > ctx.fast_damage(me, opponent) {
            turns = turns.saturating_sub(1);
        }
        turns_to_live = Some(turns);
    }

    // An idle opponent whose fast move is no more than a turn slower lands it
    // while `me` is still mid fast move.
    if opponent.cooldown_ms == 0
        && opponent.fast_move.cooldown_ms <= me.fast_move.cooldown_ms.saturating_add(TURN_MS)
        && me.hp as i64 <= opponent_fast_damage
        && opponent.hp > ctx.fast_damage(me, opponent)
    {
        turns_to_live = turns_to_live.map(|turns| turns.saturating_sub(1));
    }

    turns_to_live
}

/// Whether `me` would faint before its next fast move completes.
pub fn must_act_now(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    turns_to_live: u32,
) -> bool {
    let time_left = turns_to_live * TURN_MS as u32;
    let cooldown = me.fast_move.cooldown_ms as u32;

    time_left < cooldown
        || (time_left == cooldown && !me.wins_cmp(opponent))
        || (time_left == cooldown && me.hp <= ctx.fast_damage(opponent, me))
}

/// Hardest hitting affordable special, counting a double throw when `me`
/// holds the energy for two and moves first.
pub fn strongest_affordable(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> Option<usize> {
    me.affordable_specials()
        .map(|(index, special)| {
            let damage = ctx.damage(me, opponent, special);
            let throws_twice = me.energy as u32 >= special.energy_cost as u32 * 2
                && me.attack_stat > opponent.attack_stat;
            let total = if throws_twice { damage * 2 } else { damage };
            (index, total)
        })
        .max_by_key(|&(index, total)| (total, index))
        .map(|(index, _)| index)
}

/// Throws the strongest available special when the combatant is about to faint.
pub struct LastChanceThrow;

impl Strategist for LastChanceThrow {
    fn name(&self) -> &'static str {
        "last chance"
    }

    fn review(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>, _candidate: Action) -> Verdict {
        let me = view.me;
        if me.farm_energy {
            return Verdict::NoOpinion;
        }
        let Some(turns_to_live) = view.turns_to_live else {
            return Verdict::NoOpinion;
        };
        if !must_act_now(ctx, me, view.opponent, turns_to_live) {
            return Verdict::NoOpinion;
        }

        match strongest_affordable(ctx, me, view.opponent) {
            Some(index) => {
                ctx.trace(
                    me,
                    &format!(
                        "throws {} with {} turns to live",
                        me.special_moves[index].id, turns_to_live
                    ),
                );
                Verdict::Finish(Action::UseSpecialMove(index))
            }
            None => Verdict::NoOpinion,
        }
    }
}
