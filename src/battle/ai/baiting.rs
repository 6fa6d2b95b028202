//! Shield baiting: spend a cheap special to pull a shield before the big one.

use crate::action::Action;
use crate::battle::ai::shielding::would_shield;
use crate::battle::ai::{Strategist, TurnView, Verdict};
use crate::battle::context::DecisionContext;
use crate::combatant::{damage_per_energy, CombatantSnapshot};
use ordered_float::OrderedFloat;

const CHEAP: usize = 0;
const EXPENSIVE: usize = 1;

/// Low health or a lethal opponent special turns baiting off.
pub fn baiting_suppressed(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> bool {
    let config = ctx.config;
    if me.health_ratio() < config.low_health_ratio && me.energy < config.low_health_energy {
        return true;
    }

    me.shields == 0
        && opponent
            .affordable_specials()
            .any(|(_, special)| ctx.damage(opponent, me, special) >= me.hp)
}

/// Affordable special dealing the most damage.
pub fn most_damaging_affordable(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> Option<usize> {
    me.affordable_specials()
        .max_by_key(|&(index, special)| (ctx.damage(me, opponent, special), index))
        .map(|(index, _)| index)
}

/// The special to bait with. A self-debuffing cheapest move gives way to an
/// affordable non-debuffing one of similar cost.
pub fn preferred_bait(ctx: &DecisionContext<'_>, me: &CombatantSnapshot) -> usize {
    let Some(cheapest) = me.special_moves.get(CHEAP) else {
        return CHEAP;
    };
    if !me.is_self_debuffing(cheapest) {
        return CHEAP;
    }

    me.affordable_specials()
        .filter(|&(index, special)| {
            index != CHEAP
                && !me.is_self_debuffing(special)
                && special.energy_cost.abs_diff(cheapest.energy_cost) <= ctx.config.close_energy_window
        })
        .min_by_key(|&(index, special)| (special.energy_cost.abs_diff(cheapest.energy_cost), index))
        .map_or(CHEAP, |(index, _)| index)
}

/// Damage a special is expected to deal given the chance it gets shielded.
fn expected_value(damage: u32, shield_probability: f64) -> f64 {
    (1.0 - shield_probability) * damage as f64 + shield_probability
}

/// Chooses between the two cheapest specials when both are affordable.
fn compare_expected_value(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> usize {
    let config = ctx.config;
    let cheap = &me.special_moves[CHEAP];
    let expensive = &me.special_moves[EXPENSIVE];

    let cheap_shield = would_shield(ctx, me, opponent, cheap);
    let expensive_shield = would_shield(ctx, me, opponent, expensive);

    let mut cheap_value = expected_value(
        ctx.damage(me, opponent, cheap),
        cheap_shield.shield_probability(ctx.mode),
    );
    let mut expensive_value = expected_value(
        ctx.damage(me, opponent, expensive),
        expensive_shield.shield_probability(ctx.mode),
    );

    if expensive_shield.value {
        cheap_value *= config.bait_shield_weight;
    }
    if me.energy as u32 + config.nuke_reach_window as u32 >= expensive.energy_cost as u32 * 2 {
        expensive_value *= config.nuke_reach_weight;
    }

    if OrderedFloat(expensive_value) > OrderedFloat(cheap_value) {
        EXPENSIVE
    } else {
        CHEAP
    }
}

/// Whether the second-cheapest special beats the cheapest on damage per
/// energy by more than the configured ratio.
fn dpe_favours_expensive(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> bool {
    let scaling = ctx.config.buff_dpe_scaling;
    let cheap = &me.special_moves[CHEAP];
    let expensive = &me.special_moves[EXPENSIVE];
    let cheap_dpe = damage_per_energy(cheap, ctx.damage(me, opponent, cheap), scaling);
    let expensive_dpe = damage_per_energy(expensive, ctx.damage(me, opponent, expensive), scaling);
    expensive_dpe > cheap_dpe * ctx.config.bait_dpe_ratio
}

pub struct ShieldBaiter;

impl ShieldBaiter {
    /// The replacement action, or `None` to keep `candidate`.
    pub fn choose(
        &self,
        ctx: &DecisionContext<'_>,
        me: &CombatantSnapshot,
        opponent: &CombatantSnapshot,
        candidate: Action,
    ) -> Option<Action> {
        if !me.bait_shields.is_enabled() || opponent.shields == 0 || me.special_moves.len() < 2 {
            return None;
        }

        // --- Step 1: Too risky to play games ---
        let suppressed = baiting_suppressed(ctx, me, opponent);
        if !candidate.is_special() {
            if suppressed || me.farm_energy {
                return None;
            }
        } else if suppressed {
            return most_damaging_affordable(ctx, me, opponent).map(Action::UseSpecialMove);
        }

        // --- Step 2: Compare efficiency of the two cheapest moves ---
        let cheap = &me.special_moves[CHEAP];
        let expensive = &me.special_moves[EXPENSIVE];
        let favours_expensive = dpe_favours_expensive(ctx, me, opponent);

        // A self-buffing cheap move is worth throwing whatever the candidate was.
        if cheap.is_self_buffing() && !favours_expensive && me.can_afford(cheap) {
            return Some(Action::UseSpecialMove(CHEAP));
        }
        if !candidate.is_special() {
            return None;
        }

        if favours_expensive
            && !me.can_afford(expensive)
            && candidate == Action::UseSpecialMove(CHEAP)
        {
            return Some(Action::UseFastMove);
        }

        // --- Step 3: Both in hand, bait if it draws a shield ---
        if !(me.can_afford(cheap) && me.can_afford(expensive)) {
            return None;
        }

        let bait = preferred_bait(ctx, me);
        if would_shield(ctx, me, opponent, &me.special_moves[bait]).value {
            return Some(Action::UseSpecialMove(bait));
        }

        Some(Action::UseSpecialMove(compare_expected_value(ctx, me, opponent)))
    }
}

impl Strategist for ShieldBaiter {
    fn name(&self) -> &'static str {
        "baiting"
    }

    fn review(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>, candidate: Action) -> Verdict {
        let Some(action) = self.choose(ctx, view.me, view.opponent, candidate) else {
            return Verdict::NoOpinion;
        };

        if action != candidate {
            let message = match action {
                Action::UseSpecialMove(index) => {
                    format!("throws {} at {}'s shields", view.me.special_moves[index].id, view.opponent.name)
                }
                _ => "builds energy for the more efficient special".to_string(),
            };
            ctx.trace(view.me, &message);
        }
        Verdict::Override(action)
    }
}
