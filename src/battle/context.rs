use crate::action::{Action, QueuedAction};
use crate::battle::calculators::{DamageModel, StageScaledDamage};
use crate::battle::trace::{DecisionLog, NoopLog};
use crate::combatant::CombatantSnapshot;
use crate::config::EngineConfig;
use schema::MoveAttributes;
use serde::{Deserialize, Serialize};

/// How strictly the engine plays.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BattleMode {
    #[default]
    Optimal,
    EmulateHuman,
}

static DEFAULT_DAMAGE: StageScaledDamage = StageScaledDamage;
static DEFAULT_LOG: NoopLog = NoopLog;

/// Everything a decision may consult besides the two combatants.
///
/// Borrowed for the length of one decision; nothing in it is mutated.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub mode: BattleMode,
    pub queued_actions: &'a [QueuedAction],
    pub config: &'a EngineConfig,
    pub damage_model: &'a dyn DamageModel,
    pub log: &'a dyn DecisionLog,
}

impl<'a> DecisionContext<'a> {
    /// Optimal mode, no queued actions, cached-damage model and a silent log.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            mode: BattleMode::Optimal,
            queued_actions: &[],
            config,
            damage_model: &DEFAULT_DAMAGE,
            log: &DEFAULT_LOG,
        }
    }

    pub fn with_mode(mut self, mode: BattleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_queued_actions(mut self, queued_actions: &'a [QueuedAction]) -> Self {
        self.queued_actions = queued_actions;
        self
    }

    pub fn with_damage_model(mut self, damage_model: &'a dyn DamageModel) -> Self {
        self.damage_model = damage_model;
        self
    }

    pub fn with_log(mut self, log: &'a dyn DecisionLog) -> Self {
        self.log = log;
        self
    }

    pub fn damage(
        &self,
        attacker: &CombatantSnapshot,
        defender: &CombatantSnapshot,
        move_: &MoveAttributes,
    ) -> u32 {
        self.damage_model.damage(attacker, defender, move_)
    }

    pub fn fast_damage(&self, attacker: &CombatantSnapshot, defender: &CombatantSnapshot) -> u32 {
        self.damage(attacker, defender, &attacker.fast_move)
    }

    /// Fast moves `actor` already has queued this turn cycle.
    pub fn queued_fast_moves(&self, actor: usize) -> usize {
        self.queued_actions
            .iter()
            .filter(|queued| queued.actor == actor && queued.action == Action::UseFastMove)
            .count()
    }

    pub fn trace(&self, combatant: &CombatantSnapshot, message: &str) {
        self.log.log(&combatant.name, message);
    }
}
