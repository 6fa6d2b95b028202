// In: src/lib.rs

//! PvP Action Logic
//!
//! The decision engine for one side of a turn-based PvP battle. Given a
//! snapshot of both combatants it returns a single action: fast move, special
//! move, or wait. A bounded search proposes the candidate and an ordered
//! pipeline of strategists (lethal finish, last-chance throw, timing, energy
//! stacking, shield baiting) may refine it.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod action;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pvp-action-logic` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Re-export the move and buff definitions the snapshots are built from.
pub use schema::{
    BuffEffect, MoveAttributes, MoveCategory, StatDeltas, MAX_ENERGY, MAX_STAGE, MIN_STAGE,
    TURN_MS,
};

// --- From this crate's modules (`src/`) ---

// Inputs and outputs of a decision.
pub use action::{Action, QueuedAction};
pub use combatant::{BaitShields, CombatantSnapshot, FormTransitionPolicy};

// Decision entry points.
pub use battle::ai::random::WeightedRandomAI;
pub use battle::ai::{decide_action, Behavior, OptimalAI};

// Collaborators a caller can plug in.
pub use battle::calculators::{DamageModel, StageScaledDamage};
pub use battle::context::{BattleMode, DecisionContext};
pub use battle::trace::{DecisionLog, NoopLog, TracingLog};
pub use config::{EngineConfig, RandomWeights};

// Crate-specific error and result types.
pub use errors::{
    ConfigError, ConfigResult, EngineError, EngineResult, SnapshotError, SnapshotResult,
};
