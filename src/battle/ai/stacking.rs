//! Holds self-debuffing specials until they can be chained.
//!
//! A move that lowers the user's own stats is cheapest to live with when it
//! is thrown back to back, so the planner banks energy for as many
//! consecutive uses as the cap allows before committing.

use crate::action::Action;
use crate::battle::ai::lethal::lethality_damage;
use crate::battle::ai::shielding::would_shield;
use crate::battle::ai::{Strategist, TurnView, Verdict};
use crate::battle::context::{BattleMode, DecisionContext};
use crate::combatant::CombatantSnapshot;
use schema::MAX_ENERGY;

/// Energy for the most whole consecutive uses of a move costing `energy_cost`.
pub fn target_energy(energy_cost: u8) -> u8 {
    if energy_cost == 0 {
        return 0;
    }
    (MAX_ENERGY / energy_cost) * energy_cost
}

/// Whether `me`'s fast move cycles faster than the opponent's by more than the configured margin.
pub fn has_timing_advantage(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> bool {
    let advantage = opponent.fast_move.cooldown_ms as i32 - me.fast_move.cooldown_ms as i32;
    advantage > ctx.config.stacking_timing_advantage_ms as i32
}

pub fn can_wait_safely(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> bool {
    let opponent_fast_damage = ctx.fast_damage(opponent, me);
    me.hp > opponent_fast_damage * ctx.config.stacking_safety_hits
        || has_timing_advantage(ctx, me, opponent)
}

/// Whether the special at `index` should wait for more energy.
pub fn should_stack(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    index: usize,
) -> bool {
    let Some(special) = me.special_moves.get(index) else {
        return false;
    };
    if !me.is_self_debuffing(special) {
        return false;
    }

    let secures_kill =
        opponent.shields == 0 && ctx.damage(me, opponent, special) >= opponent.hp;

    me.energy < target_energy(special.energy_cost)
        && !secures_kill
        && can_wait_safely(ctx, me, opponent)
}

/// A cheaper non-debuffing special to throw instead of the debuffing one at
/// `index` while the opponent still has shields.
pub fn bait_override(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    index: usize,
) -> Option<usize> {
    let special = me.special_moves.get(index)?;
    if !me.bait_shields.is_enabled()
        || opponent.shields == 0
        || !me.is_self_debuffing(special)
        || me.energy < target_energy(special.energy_cost)
    {
        return None;
    }

    let alternative_index = 0;
    if alternative_index == index {
        return None;
    }
    let alternative = me.special_moves.get(alternative_index)?;
    let close_in_cost = special.energy_cost.abs_diff(alternative.energy_cost)
        <= ctx.config.close_energy_window;
    if me.is_self_debuffing(alternative) || !me.can_afford(alternative) || !close_in_cost {
        return None;
    }

    let prefer_alternative = alternative.is_self_buffing()
        || would_shield(ctx, me, opponent, special).value;
    prefer_alternative.then_some(alternative_index)
}

/// Whether a combatant in its charging form should keep farming before it transforms.
pub fn should_build_for_form_change(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> bool {
    let Some(policy) = me.form_policy.filter(|policy| policy.in_charging_form) else {
        return false;
    };
    if me.energy as f64 >= policy.energy_threshold(me.fast_move.energy_gain) {
        return false;
    }

    match ctx.mode {
        BattleMode::EmulateHuman => true,
        BattleMode::Optimal => me
            .special_moves
            .iter()
            .max_by_key(|special| ctx.damage(me, opponent, special))
            .is_some_and(|special| lethality_damage(ctx, me, opponent, special) < opponent.hp),
    }
}

/// Defers self-debuffing specials and swaps them for bait when that is the better throw.
pub struct EnergyStacker;

impl Strategist for EnergyStacker {
    fn name(&self) -> &'static str {
        "stacking"
    }

    fn review(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>, candidate: Action) -> Verdict {
        let Some(index) = candidate.special_index() else {
            return Verdict::NoOpinion;
        };
        let me = view.me;
        let opponent = view.opponent;

        if should_build_for_form_change(ctx, me, opponent) {
            ctx.trace(me, "builds energy before changing form");
            return Verdict::Finish(Action::UseFastMove);
        }

        if should_stack(ctx, me, opponent, index) {
            let special = &me.special_moves[index];
            let stacks = target_energy(special.energy_cost) / special.energy_cost.max(1);
            ctx.trace(
                me,
                &format!(
                    "doesn't use {} to build energy; can stack the move {} times to minimize time debuffed",
                    special.id, stacks
                ),
            );
            return Verdict::Finish(Action::UseFastMove);
        }

        if let Some(alternative) = bait_override(ctx, me, opponent, index) {
            ctx.trace(
                me,
                &format!(
                    "throws {} instead of {} to draw a shield",
                    me.special_moves[alternative].id, me.special_moves[index].id
                ),
            );
            return Verdict::Finish(Action::UseSpecialMove(alternative));
        }

        Verdict::NoOpinion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::FormTransitionPolicy;
    use crate::config::EngineConfig;
    use rstest::rstest;
    use schema::{BuffEffect, MoveAttributes, StatDeltas};

    fn self_debuff() -> BuffEffect {
        BuffEffect::User {
            stages: StatDeltas::new(-1, -1),
            chance: 1.0,
        }
    }

    fn stacker(energy: u8) -> CombatantSnapshot {
        CombatantSnapshot::new(
            "Stacker",
            150,
            110.0,
            MoveAttributes::fast("COUNTER", 6, 7, 1000),
            vec![
                MoveAttributes::special("ICE_PUNCH", 45, 40),
                MoveAttributes::special("CLOSE_COMBAT", 100, 45).with_buff(self_debuff()),
            ],
        )
        .expect("valid snapshot")
        .with_energy(energy)
    }

    fn opponent(hp: u32, shields: u8) -> CombatantSnapshot {
        CombatantSnapshot::new(
            "Opponent",
            200,
            100.0,
            MoveAttributes::fast("SNARL", 4, 9, 1000),
            vec![MoveAttributes::special("FOUL_PLAY", 70, 45)],
        )
        .expect("valid snapshot")
        .with_hp(hp)
        .with_shields(shields)
    }

    #[rstest]
    #[case(35, 70)]
    #[case(40, 80)]
    #[case(45, 90)]
    #[case(50, 100)]
    #[case(55, 55)]
    #[case(0, 0)]
    fn test_target_energy(#[case] cost: u8, #[case] expected: u8) {
        assert_eq!(target_energy(cost), expected);
    }

    #[test]
    fn test_stacks_below_target() {
        let config = EngineConfig::default();
        let ctx = DecisionContext::new(&config);
        let me = stacker(50);
        let opp = opponent(180, 0);

        assert!(should_stack(&ctx, &me, &opp, 1));
        assert!(!should_stack(&ctx, &me, &opp, 0), "non-debuffing moves never stack");
        assert!(!should_stack(&ctx, &me.clone().with_energy(90), &opp, 1));
    }

    #[test]
    fn test_kill_is_never_deferred() {
        let config = EngineConfig::default();
        let ctx = DecisionContext::new(&config);
        let me = stacker(50);

        assert!(!should_stack(&ctx, &me, &opponent(90, 0), 1));
        assert!(
            should_stack(&ctx, &me, &opponent(90, 1), 1),
            "a shield takes the kill away"
        );
    }

    #[test]
    fn test_low_hp_only_waits_with_timing_advantage() {
        let config = EngineConfig::default();
        let ctx = DecisionContext::new(&config);
        let me = stacker(50).with_hp(8);
        let opp = opponent(180, 0);
        assert!(!should_stack(&ctx, &me, &opp, 1));

        let mut slow_opponent = opp.clone();
        slow_opponent.fast_move.cooldown_ms = 2000;
        assert!(should_stack(&ctx, &me, &slow_opponent, 1));

        // Exactly 500ms is not an advantage.
        let mut slightly_slower = opp.clone();
        slightly_slower.fast_move.cooldown_ms = 1500;
        assert!(!should_stack(&ctx, &me, &slightly_slower, 1));
    }

    #[test]
    fn test_bait_override_swaps_to_cheaper_move() {
        let config = EngineConfig::default();
        let ctx = DecisionContext::new(&config);
        let me = stacker(90);
        let opp = opponent(120, 1);

        // 100 damage into 120 HP with the heavy-hitter rule draws a shield.
        assert!(would_shield(&ctx, &me, &opp, &me.special_moves[1]).value);
        assert_eq!(bait_override(&ctx, &me, &opp, 1), Some(0));

        let view = TurnView {
            me: &me,
            opponent: &opp,
            turns_to_live: None,
        };
        assert_eq!(
            EnergyStacker.review(&ctx, &view, Action::UseSpecialMove(1)),
            Verdict::Finish(Action::UseSpecialMove(0))
        );
    }

    #[test]
    fn test_bait_override_needs_shields_and_enabled_baiting() {
        let config = EngineConfig::default();
        let ctx = DecisionContext::new(&config);
        let me = stacker(90);

        assert_eq!(bait_override(&ctx, &me, &opponent(120, 0), 1), None);

        let never = me.clone().with_bait_shields(crate::combatant::BaitShields::Never);
        assert_eq!(bait_override(&ctx, &never, &opponent(120, 1), 1), None);
    }

    #[test]
    fn test_charging_form_builds_energy() {
        let config = EngineConfig::default();
        let me = stacker(60).with_form_policy(FormTransitionPolicy::charging());
        let opp = opponent(180, 1);

        let optimal = DecisionContext::new(&config);
        assert!(should_build_for_form_change(&optimal, &me, &opp));

        // 100 - 7 * 0.5 = 96.5, so 97 is enough.
        let ready = me.clone().with_energy(97);
        assert!(!should_build_for_form_change(&optimal, &ready, &opp));

        // A shieldless opponent in range of the strongest special is finished instead.
        let low = opponent(90, 0);
        assert!(!should_build_for_form_change(&optimal, &me, &low));
        let human = DecisionContext::new(&config).with_mode(BattleMode::EmulateHuman);
        assert!(should_build_for_form_change(&human, &me, &low));
    }

    #[test]
    fn test_review_ignores_fast_candidates() {
        let config = EngineConfig::default();
        let ctx = DecisionContext::new(&config);
        let me = stacker(50);
        let opp = opponent(180, 0);
        let view = TurnView {
            me: &me,
            opponent: &opp,
            turns_to_live: None,
        };

        assert_eq!(EnergyStacker.review(&ctx, &view, Action::UseFastMove), Verdict::NoOpinion);
        assert_eq!(
            EnergyStacker.review(&ctx, &view, Action::UseSpecialMove(1)),
            Verdict::Finish(Action::UseFastMove)
        );
    }
}
