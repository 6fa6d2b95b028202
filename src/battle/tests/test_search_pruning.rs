#[cfg(test)]
mod tests {
    use crate::battle::ai::search::{search_with, SearchOptions, SearchOutcome, StateOutcome};
    use crate::battle::context::DecisionContext;
    use crate::battle::tests::common::{test_config, TestCombatantBuilder};
    use crate::combatant::CombatantSnapshot;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use schema::{BuffEffect, StatDeltas};

    const CEILING: usize = 500_000;

    /// A small matchup the unpruned search can still exhaust.
    fn scenario(rng: &mut StdRng) -> (CombatantSnapshot, CombatantSnapshot) {
        let mut me = TestCombatantBuilder::new("Searcher")
            .with_max_hp(200)
            .with_fast("FAST", rng.random_range(6..=10), rng.random_range(6..=12), 500)
            .with_special("LIGHT", rng.random_range(25..=45), rng.random_range(35..=45))
            .with_energy(rng.random_range(0..=100));
        if rng.random_bool(0.5) {
            me = me.with_buffed_special(
                "POWER_UP",
                rng.random_range(30..=60),
                rng.random_range(45..=60),
                BuffEffect::User {
                    stages: StatDeltas::new(1, 0),
                    chance: 1.0,
                },
            );
        } else {
            me = me.with_special("HEAVY", rng.random_range(60..=90), rng.random_range(50..=65));
        }

        let opponent = TestCombatantBuilder::new("Target")
            .with_max_hp(60)
            .with_hp(rng.random_range(20..=50))
            .with_shields(rng.random_range(0..=1))
            .with_fast("CHIP", rng.random_range(1..=3), 4, rng.random_range(1..=3) * 500)
            .build();
        (me.build(), opponent)
    }

    fn run(me: &CombatantSnapshot, opponent: &CombatantSnapshot, prune: bool) -> SearchOutcome {
        let config = test_config();
        let ctx = DecisionContext::new(&config);
        search_with(
            &ctx,
            me,
            opponent,
            SearchOptions {
                state_ceiling: CEILING,
                prune_dominated: prune,
            },
        )
    }

    #[test]
    fn test_pruning_never_changes_the_best_result() {
        let mut compared = 0;
        for seed in 0..40u64 {
            // Arrange
            let mut rng = StdRng::seed_from_u64(seed);
            let (me, opponent) = scenario(&mut rng);

            // Act
            let pruned = run(&me, &opponent, true);
            let unpruned = run(&me, &opponent, false);
            if unpruned.hit_ceiling {
                continue;
            }
            compared += 1;

            // Assert
            assert!(!pruned.hit_ceiling, "seed {}", seed);
            assert_eq!(pruned.best.outcome, StateOutcome::Victory, "seed {}", seed);
            assert_eq!(
                (pruned.best.chance, pruned.best.turn),
                (unpruned.best.chance, unpruned.best.turn),
                "seed {}",
                seed
            );
            assert!(
                (pruned.best.score - unpruned.best.score).abs() < 1e-9,
                "seed {}: {} vs {}",
                seed,
                pruned.best.score,
                unpruned.best.score
            );
        }
        assert!(compared > 0, "every scenario overflowed the unpruned search");
    }

    #[test]
    fn test_pruning_shrinks_the_search() {
        // Fast and special steps commute, so many lines meet in the same state.
        let me = TestCombatantBuilder::new("Searcher")
            .with_fast("FAST", 6, 8, 500)
            .with_special("LIGHT", 30, 35)
            .with_special("HEAVY", 70, 55)
            .with_energy(100)
            .build();
        let opponent = TestCombatantBuilder::new("Target")
            .with_max_hp(60)
            .with_hp(50)
            .with_shields(1)
            .build();

        let pruned = run(&me, &opponent, true);
        let unpruned = run(&me, &opponent, false);

        assert!(pruned.generated < unpruned.generated);
        assert_eq!(pruned.best.outcome, StateOutcome::Victory);
        assert_eq!(pruned.best.turn, unpruned.best.turn);
    }
}
