use serde::{Deserialize, Serialize};

/// Lowest and highest stat stage a combatant can hold.
pub const MIN_STAGE: i8 = -4;
pub const MAX_STAGE: i8 = 4;

/// Clamps a stat stage into the legal [-4, 4] range.
pub fn clamp_stage(stage: i32) -> i8 {
    stage.clamp(MIN_STAGE as i32, MAX_STAGE as i32) as i8
}

/// Attack and defense stage changes carried by a buff.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatDeltas {
    pub attack: i8,
    pub defense: i8,
}

impl StatDeltas {
    pub const fn new(attack: i8, defense: i8) -> Self {
        Self { attack, defense }
    }

    /// Sum of both deltas, signed.
    pub fn net(&self) -> i32 {
        self.attack as i32 + self.defense as i32
    }

    pub fn has_increase(&self) -> bool {
        self.attack > 0 || self.defense > 0
    }

    pub fn has_decrease(&self) -> bool {
        self.attack < 0 || self.defense < 0
    }
}

/// The stat-stage side effect of a move, resolved once when the move data is loaded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum BuffEffect {
    #[default]
    None,
    /// Stages applied to the move's user with the given probability (0.0..=1.0).
    User { stages: StatDeltas, chance: f64 },
    /// Stages applied to the move's target with the given probability (0.0..=1.0).
    Opponent { stages: StatDeltas, chance: f64 },
}

impl BuffEffect {
    /// Application probability, clamped to [0, 1]. Zero for `None`.
    pub fn chance(&self) -> f64 {
        match self {
            BuffEffect::None => 0.0,
            BuffEffect::User { chance, .. } | BuffEffect::Opponent { chance, .. } => {
                chance.clamp(0.0, 1.0)
            }
        }
    }

    /// Stage swing in the user's favour: raising your own stats or lowering the opponent's
    /// both count as positive.
    pub fn magnitude(&self) -> i32 {
        match self {
            BuffEffect::None => 0,
            BuffEffect::User { stages, .. } => stages.net(),
            BuffEffect::Opponent { stages, .. } => -stages.net(),
        }
    }

    pub fn is_self_buffing(&self) -> bool {
        matches!(self, BuffEffect::User { stages, .. } if stages.has_increase())
    }

    pub fn is_self_debuffing(&self) -> bool {
        matches!(self, BuffEffect::User { stages, .. } if stages.has_decrease())
    }

    pub fn is_self_attack_debuffing(&self) -> bool {
        matches!(self, BuffEffect::User { stages, .. } if stages.attack < 0)
    }
}
