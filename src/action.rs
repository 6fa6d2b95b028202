use serde::{Deserialize, Serialize};
use std::fmt;

/// The single decision the engine hands back to the battle loop.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    UseFastMove,
    // The index refers to the move's position in the energy-sorted special move list.
    UseSpecialMove(usize),
    // The fast move in progress has not finished yet.
    Wait,
}

impl Action {
    pub fn special_index(&self) -> Option<usize> {
        match self {
            Action::UseSpecialMove(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Action::UseSpecialMove(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::UseFastMove => write!(f, "fast move"),
            Action::UseSpecialMove(index) => write!(f, "special move #{}", index),
            Action::Wait => write!(f, "wait"),
        }
    }
}

/// An action already locked in by either side during the current turn cycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedAction {
    /// Slot of the combatant that queued it.
    pub actor: usize,
    pub action: Action,
}

impl QueuedAction {
    pub fn new(actor: usize, action: Action) -> Self {
        Self { actor, action }
    }
}
