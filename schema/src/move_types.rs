use crate::buff_data::BuffEffect;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Length of one battle turn in milliseconds.
pub const TURN_MS: u16 = 500;

/// Energy never exceeds this value.
pub const MAX_ENERGY: u8 = 100;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum MoveCategory {
    Fast,
    Special,
}

/// Combat-relevant attributes of a single move against the current matchup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveAttributes {
    pub id: String,
    pub category: MoveCategory,
    /// Energy spent by a special move. Zero for fast moves.
    #[serde(default)]
    pub energy_cost: u8,
    /// Energy generated by a fast move. Zero for special moves.
    #[serde(default)]
    pub energy_gain: u8,
    /// Cooldown in milliseconds. Special moves take one turn.
    pub cooldown_ms: u16,
    /// Damage against the current opponent at neutral stat stages.
    pub damage: u32,
    #[serde(default)]
    pub buff: BuffEffect,
}

impl MoveAttributes {
    pub fn fast(id: &str, damage: u32, energy_gain: u8, cooldown_ms: u16) -> Self {
        Self {
            id: id.to_string(),
            category: MoveCategory::Fast,
            energy_cost: 0,
            energy_gain,
            cooldown_ms,
            damage,
            buff: BuffEffect::None,
        }
    }

    pub fn special(id: &str, damage: u32, energy_cost: u8) -> Self {
        Self {
            id: id.to_string(),
            category: MoveCategory::Special,
            energy_cost,
            energy_gain: 0,
            cooldown_ms: TURN_MS,
            damage,
            buff: BuffEffect::None,
        }
    }

    pub fn with_buff(mut self, buff: BuffEffect) -> Self {
        self.buff = buff;
        self
    }

    pub fn is_fast(&self) -> bool {
        self.category == MoveCategory::Fast
    }

    /// Turns the move occupies (cooldown / 500ms), at least one.
    pub fn turns(&self) -> u32 {
        (self.cooldown_ms / TURN_MS).max(1) as u32
    }

    pub fn is_self_buffing(&self) -> bool {
        self.buff.is_self_buffing()
    }

    pub fn is_self_debuffing(&self) -> bool {
        self.buff.is_self_debuffing()
    }

    pub fn is_self_attack_debuffing(&self) -> bool {
        self.buff.is_self_attack_debuffing()
    }

    /// Unresolved move data: a blank id, a free special, or a fast move with no cooldown.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
            || match self.category {
                MoveCategory::Special => self.energy_cost == 0,
                MoveCategory::Fast => self.cooldown_ms == 0,
            }
    }
}
