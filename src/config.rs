//! Tunable thresholds for the decision engine.
//!
//! Every number the strategists compare against lives here so it can be
//! adjusted from a RON file without touching the logic.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of search states generated per decision.
    pub state_ceiling: usize,
    /// Two special moves whose costs differ by at most this much are interchangeable.
    pub close_energy_window: u8,
    /// Minimum DPE ratio (strict) for the expensive move to be worth saving for.
    pub bait_dpe_ratio: f64,
    /// Expected-value boost for a cheap move when the opponent would shield the nuke.
    pub bait_shield_weight: f64,
    /// Expected-value boost for an expensive move that is almost affordable twice.
    pub nuke_reach_weight: f64,
    /// Energy distance that counts as "almost affordable".
    pub nuke_reach_window: u8,
    /// Health ratio below which baiting stops.
    pub low_health_ratio: f64,
    /// Energy below which a low-health combatant stops baiting.
    pub low_health_energy: u8,
    /// A special dealing at least HP / this is a heavy hitter.
    pub shield_heavy_hit_divisor: f64,
    /// A special dealing at least HP / this is a nuke.
    pub shield_nuke_divisor: f64,
    /// Fast damage per turn above which heavy hitters are shielded.
    pub shield_heavy_fast_dpt: f64,
    /// Fast damage per turn above which nukes are strongly shielded.
    pub shield_nuke_fast_dpt: f64,
    /// Damage share above which a self-attack-debuffing move is shielded.
    pub self_attack_debuff_ratio: f64,
    /// Stacking waits only while HP exceeds this many opponent fast attacks.
    pub stacking_safety_hits: u32,
    /// Cooldown lead (strict, ms) that lets a combatant stack regardless of HP.
    pub stacking_timing_advantage_ms: u16,
    /// Scales how much a buff counts toward damage-per-energy.
    pub buff_dpe_scaling: f64,
    pub random: RandomWeights,
}

/// Weights used by the weighted random decision mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWeights {
    pub base: u32,
    pub lethal_multiplier: u32,
    pub lethal_fast_multiplier: u32,
    pub cheap_lethal_multiplier: f64,
    pub cheap_energy_cost: u8,
    pub full_energy_multiplier: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_ceiling: 3000,
            close_energy_window: 10,
            bait_dpe_ratio: 1.5,
            bait_shield_weight: 1.3,
            nuke_reach_weight: 1.2,
            nuke_reach_window: 5,
            low_health_ratio: 0.25,
            low_health_energy: 70,
            shield_heavy_hit_divisor: 1.4,
            shield_nuke_divisor: 2.0,
            shield_heavy_fast_dpt: 1.5,
            shield_nuke_fast_dpt: 2.0,
            self_attack_debuff_ratio: 0.55,
            stacking_safety_hits: 2,
            stacking_timing_advantage_ms: 500,
            buff_dpe_scaling: 1.0,
            random: RandomWeights::default(),
        }
    }
}

impl Default for RandomWeights {
    fn default() -> Self {
        Self {
            base: 1,
            lethal_multiplier: 10,
            lethal_fast_multiplier: 2,
            cheap_lethal_multiplier: 1.5,
            cheap_energy_cost: 35,
            full_energy_multiplier: 2,
        }
    }
}

impl EngineConfig {
    /// Parses a config from RON text. Missing fields take their defaults.
    pub fn from_ron(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a RON file on disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.state_ceiling == 0 {
            return Err(invalid("state_ceiling", "must be at least 1"));
        }

        let ratios = [
            ("bait_dpe_ratio", self.bait_dpe_ratio),
            ("bait_shield_weight", self.bait_shield_weight),
            ("nuke_reach_weight", self.nuke_reach_weight),
            ("shield_heavy_hit_divisor", self.shield_heavy_hit_divisor),
            ("shield_nuke_divisor", self.shield_nuke_divisor),
            ("cheap_lethal_multiplier", self.random.cheap_lethal_multiplier),
        ];
        for (field, value) in ratios {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, &format!("{} is not a positive number", value)));
            }
        }

        if !(0.0..=1.0).contains(&self.low_health_ratio) {
            return Err(invalid("low_health_ratio", "must lie in [0, 1]"));
        }
        if self.low_health_energy > 100 {
            return Err(invalid("low_health_energy", "must not exceed 100"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = EngineConfig::from_ron("(state_ceiling: 250, bait_dpe_ratio: 1.6)")
            .expect("config should parse");

        assert_eq!(config.state_ceiling, 250);
        assert_eq!(config.bait_dpe_ratio, 1.6);
        assert_eq!(config.close_energy_window, 10);
        assert_eq!(config.random, RandomWeights::default());
    }

    #[test]
    fn test_nested_random_weights() {
        let config = EngineConfig::from_ron("(random: (lethal_multiplier: 20))")
            .expect("config should parse");
        assert_eq!(config.random.lethal_multiplier, 20);
        assert_eq!(config.random.base, 1);
    }

    #[test]
    fn test_rejects_zero_ceiling() {
        let err = EngineConfig::from_ron("(state_ceiling: 0)").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "state_ceiling",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_text() {
        let err = EngineConfig::from_ron("(state_ceiling: \"lots\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
