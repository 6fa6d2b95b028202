//! Weighted random play for non-optimal opponents.
//!
//! Every viable action gets a weight; knockouts are boosted and plainly bad
//! throws are zeroed, then one option is sampled in proportion to its weight.

use crate::action::Action;
use crate::battle::ai::lethal::is_lethal;
use crate::battle::ai::stacking::{bait_override, should_stack};
use crate::battle::ai::Behavior;
use crate::battle::context::DecisionContext;
use crate::combatant::CombatantSnapshot;
use rand::Rng;
use schema::MAX_ENERGY;

/// A candidate action and how likely it is to be picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOption {
    pub name: String,
    pub action: Action,
    pub weight: u32,
}

impl DecisionOption {
    pub fn new(name: &str, action: Action, weight: u32) -> Self {
        Self {
            name: name.to_string(),
            action,
            weight,
        }
    }
}

/// Builds the weighted options for `me`. The fast move always comes first.
pub fn build_options(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> Vec<DecisionOption> {
    let weights = &ctx.config.random;

    let mut options = vec![DecisionOption::new(
        &me.fast_move.id,
        Action::UseFastMove,
        weights.base,
    )];
    if !me.farm_energy {
        options.extend(me.affordable_specials().map(|(index, special)| {
            DecisionOption::new(&special.id, Action::UseSpecialMove(index), weights.base)
        }));
    }

    for option in &mut options {
        // --- Knockouts ---
        if is_lethal(ctx, me, opponent, option.action) {
            option.weight *= weights.lethal_multiplier;
            match option.action.special_index() {
                None => option.weight *= weights.lethal_fast_multiplier,
                Some(index) if me.special_moves[index].energy_cost <= weights.cheap_energy_cost => {
                    option.weight =
                        (option.weight as f64 * weights.cheap_lethal_multiplier).round() as u32;
                }
                Some(_) => {}
            }
        }

        let Some(index) = option.action.special_index() else {
            continue;
        };
        let special = &me.special_moves[index];

        // --- Capped energy ---
        if me.energy >= MAX_ENERGY {
            option.weight *= weights.full_energy_multiplier;
        }

        // --- Strictly worse throws ---
        let special_damage = ctx.damage(me, opponent, special);
        let outclassed = me.special_moves[..index].iter().any(|cheaper| {
            cheaper.energy_cost < special.energy_cost
                && ctx.damage(me, opponent, cheaper) >= special_damage
        });
        if outclassed && !special.is_self_buffing() {
            option.weight = 0;
        }

        // --- Debuffing moves waiting on energy or a better bait ---
        if should_stack(ctx, me, opponent, index) || bait_override(ctx, me, opponent, index).is_some() {
            option.weight = 0;
        }
    }

    options
}

/// Samples one option in proportion to its weight. When every weight is zero
/// the first option is returned.
pub fn choose_option<'a, R: Rng>(
    options: &'a [DecisionOption],
    rng: &mut R,
) -> Option<&'a DecisionOption> {
    let total: u32 = options.iter().map(|option| option.weight).sum();
    if total == 0 {
        return options.first();
    }

    let mut roll = rng.random_range(0..total);
    for option in options {
        if roll < option.weight {
            return Some(option);
        }
        roll -= option.weight;
    }
    options.first()
}

/// An AI that picks among weighted options at random.
pub struct WeightedRandomAI<R: Rng> {
    rng: R,
}

impl<R: Rng> WeightedRandomAI<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Behavior for WeightedRandomAI<R> {
    fn decide_action(
        &mut self,
        ctx: &DecisionContext<'_>,
        me: &CombatantSnapshot,
        opponent: &CombatantSnapshot,
    ) -> Action {
        if me.cooldown_ms > 0 {
            return Action::Wait;
        }

        let options = build_options(ctx, me, opponent);
        let chosen = choose_option(&options, &mut self.rng);
        if let Some(option) = chosen {
            ctx.trace(me, &format!("randomly picks {} (weight {})", option.name, option.weight));
        }
        chosen.map_or(Action::UseFastMove, |option| option.action)
    }
}
