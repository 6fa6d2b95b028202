//! Avoids throwing a special while the opponent's fast move is mid-flight.
//!
//! A special thrown at the wrong moment hands the opponent a fast attack it
//! would otherwise have lost. When the numbers allow it, one more fast move
//! lines the throw up with the opponent's cooldown instead.

use crate::action::Action;
use crate::battle::ai::{Strategist, TurnView, Verdict};
use crate::battle::context::DecisionContext;
use crate::combatant::CombatantSnapshot;
use schema::{MAX_ENERGY, TURN_MS};

/// No timing advantage exists when the cooldowns match or ours is a whole
/// multiple of theirs.
pub fn should_disable_timing_optimization(me: &CombatantSnapshot, opponent: &CombatantSnapshot) -> bool {
    let mine = me.fast_move.cooldown_ms;
    let theirs = opponent.fast_move.cooldown_ms;

    if mine == theirs {
        return true;
    }
    theirs > 0 && mine > theirs && mine % theirs == 0
}

/// Opponent cooldown (ms) at which a throw lands cleanly.
pub fn target_cooldown(me: &CombatantSnapshot, opponent: &CombatantSnapshot) -> u16 {
    let mine = me.fast_move.cooldown_ms;
    let theirs = opponent.fast_move.cooldown_ms;

    if mine >= 2000 || (mine >= 1500 && theirs == 2500) || (mine == 1000 && theirs == 2000) {
        1000
    } else {
        TURN_MS
    }
}

/// `me` survives every opponent fast attack that lands while it waits.
fn survives_wait(ctx: &DecisionContext<'_>, me: &CombatantSnapshot, opponent: &CombatantSnapshot) -> bool {
    let opponent_fast_damage = ctx.fast_damage(opponent, me);
    let theirs = opponent.fast_move.cooldown_ms.max(1) as u32;
    let hits_in_window = (me.fast_move.cooldown_ms as u32 + TURN_MS as u32) / theirs;

    me.hp > opponent_fast_damage && me.hp > opponent_fast_damage * hits_in_window
}

/// Queued fast moves plus the extra one stay within the energy cap.
fn energy_stays_capped(ctx: &DecisionContext<'_>, me: &CombatantSnapshot) -> bool {
    let fast_moves = ctx.queued_fast_moves(me.slot) as u32 + 1;
    me.energy as u32 + me.fast_move.energy_gain as u32 * fast_moves <= MAX_ENERGY as u32
}

/// The wait fits the plan, gives up no knockout, and survives the opponent's specials.
fn strategically_safe(ctx: &DecisionContext<'_>, view: &TurnView<'_>) -> bool {
    let me = view.me;
    let opponent = view.opponent;

    // --- Plan length against turns to live ---
    if let Some(cheapest) = me.cheapest_special() {
        let mut planned_turns = me.fast_move.turns() + (me.energy / cheapest.energy_cost.max(1)) as u32;
        if me.attack_stat < opponent.attack_stat {
            planned_turns += 1;
        }

        let opponent_dpt =
            ctx.fast_damage(opponent, me) as f64 / opponent.fast_move.turns() as f64;
        let turns_to_live = view.turns_to_live.or_else(|| me.turns_to_live(opponent_dpt));
        if turns_to_live.is_some_and(|ttl| planned_turns > ttl) {
            return false;
        }
    }

    // --- Never pass up a knockout ---
    if opponent.shields == 0
        && me
            .affordable_specials()
            .any(|(_, special)| ctx.damage(me, opponent, special) >= opponent.hp)
    {
        return false;
    }

    // --- Opponent specials landing inside the window ---
    let opponent_fast_damage = ctx.fast_damage(opponent, me);
    let hits_in_window =
        me.fast_move.cooldown_ms as u32 / opponent.fast_move.cooldown_ms.max(1) as u32;
    for special in &opponent.special_moves {
        let Some(fast_needed) = opponent.fast_moves_until(special.energy_cost) else {
            continue;
        };
        let turns_until_thrown = fast_needed * opponent.fast_move.turns() + 1;
        let special_damage = if me.shields > 0 {
            1
        } else {
            ctx.damage(opponent, me, special)
        };
        let total_damage = special_damage + opponent_fast_damage * hits_in_window;

        if turns_until_thrown <= me.fast_move.turns() && total_damage >= me.hp {
            return false;
        }
    }

    true
}

/// Swaps a special for a fast move when that steals a turn from the opponent.
pub struct TimingOptimizer;

impl TimingOptimizer {
    pub fn should_delay(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>) -> bool {
        let me = view.me;
        let opponent = view.opponent;
        if !me.optimize_timing {
            return false;
        }

        let target = if should_disable_timing_optimization(me, opponent) {
            0
        } else {
            target_cooldown(me, opponent)
        };
        let opponent_cooldown = opponent.cooldown_ms;
        if target == 0 || !(opponent_cooldown == 0 || opponent_cooldown > target) {
            return false;
        }

        survives_wait(ctx, me, opponent)
            && energy_stays_capped(ctx, me)
            && strategically_safe(ctx, view)
    }
}

impl Strategist for TimingOptimizer {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn review(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>, candidate: Action) -> Verdict {
        if !candidate.is_special() || !self.should_delay(ctx, view) {
            return Verdict::NoOpinion;
        }

        ctx.trace(
            view.me,
            &format!(
                "waits one more {} for the opponent's cooldown",
                view.me.fast_move.id
            ),
        );
        Verdict::Finish(Action::UseFastMove)
    }
}
