//! A module for defining AI behaviors for PvP combatants.
//!
//! `OptimalAI` searches for the best line of play and then hands the first
//! action of that line to an ordered pipeline of strategists. Each one may keep
//! it, replace it, or settle the decision outright.

pub mod baiting;
pub mod lethal;
pub mod random;
pub mod search;
pub mod shielding;
pub mod stacking;
pub mod survival;
pub mod timing;

use crate::action::Action;
use crate::battle::context::DecisionContext;
use crate::combatant::CombatantSnapshot;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects both combatants and decides on the next action for `me`.
    fn decide_action(
        &mut self,
        ctx: &DecisionContext<'_>,
        me: &CombatantSnapshot,
        opponent: &CombatantSnapshot,
    ) -> Action;
}

/// The two combatants plus facts computed once per decision.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub me: &'a CombatantSnapshot,
    pub opponent: &'a CombatantSnapshot,
    /// Projected turns before `me` faints, if a threat was found.
    pub turns_to_live: Option<u32>,
}

/// What a strategist thinks of the current candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NoOpinion,
    /// Replace the candidate and let later strategists review the new one.
    Override(Action),
    /// Replace the candidate and stop the pipeline.
    Finish(Action),
}

/// One step of the decision pipeline.
pub trait Strategist {
    fn name(&self) -> &'static str;

    fn review(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>, candidate: Action) -> Verdict;
}

/// The standard pipeline in precedence order.
pub fn default_pipeline() -> Vec<Box<dyn Strategist>> {
    vec![
        Box::new(lethal::LethalFinisher),
        Box::new(survival::LastChanceThrow),
        Box::new(timing::TimingOptimizer),
        Box::new(stacking::EnergyStacker),
        Box::new(baiting::ShieldBaiter),
    ]
}

pub struct OptimalAI {
    pipeline: Vec<Box<dyn Strategist>>,
}

impl Default for OptimalAI {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimalAI {
    pub fn new() -> Self {
        Self {
            pipeline: default_pipeline(),
        }
    }

    /// Uses a custom set of strategists, run in the given order.
    pub fn with_pipeline(pipeline: Vec<Box<dyn Strategist>>) -> Self {
        Self { pipeline }
    }

    /// The search's opening move, or the fast move when no special is in reach.
    fn search_candidate(
        &self,
        ctx: &DecisionContext<'_>,
        me: &CombatantSnapshot,
        opponent: &CombatantSnapshot,
    ) -> Action {
        if me.farm_energy || !me.can_afford_any_special() {
            return Action::UseFastMove;
        }

        let outcome = search::search(ctx, me, opponent);
        let candidate = outcome.first_action();
        match candidate.special_index() {
            Some(index) if !me.can_afford(&me.special_moves[index]) => Action::UseFastMove,
            _ => candidate,
        }
    }

    /// Runs the pipeline over `candidate`.
    pub fn run_pipeline(
        &self,
        ctx: &DecisionContext<'_>,
        view: &TurnView<'_>,
        mut candidate: Action,
    ) -> Action {
        for strategist in &self.pipeline {
            match strategist.review(ctx, view, candidate) {
                Verdict::NoOpinion => {}
                Verdict::Override(action) => {
                    if action != candidate {
                        tracing::debug!(
                            strategist = strategist.name(),
                            from = %candidate,
                            to = %action,
                            "candidate overridden"
                        );
                    }
                    candidate = action;
                }
                Verdict::Finish(action) => {
                    tracing::debug!(strategist = strategist.name(), action = %action, "decision settled");
                    return action;
                }
            }
        }
        candidate
    }
}

impl Behavior for OptimalAI {
    fn decide_action(
        &mut self,
        ctx: &DecisionContext<'_>,
        me: &CombatantSnapshot,
        opponent: &CombatantSnapshot,
    ) -> Action {
        // --- Step 1: Still mid fast move ---
        if me.cooldown_ms > 0 {
            return Action::Wait;
        }

        // --- Step 2: Search for the best line of play ---
        let candidate = self.search_candidate(ctx, me, opponent);

        // --- Step 3: Let the strategists review it ---
        let view = TurnView {
            me,
            opponent,
            turns_to_live: survival::project_turns_to_live(ctx, me, opponent),
        };
        self.run_pipeline(ctx, &view, candidate)
    }
}

/// Decides one action with the standard `OptimalAI`.
pub fn decide_action(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> Action {
    OptimalAI::new().decide_action(ctx, me, opponent)
}
