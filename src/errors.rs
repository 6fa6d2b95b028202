//! Error types for the action logic engine.
//!
//! Decisions themselves never fail; errors only surface when building
//! snapshots or loading configuration.

use thiserror::Error;

/// Top-level error for anything the engine can reject
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error related to an invalid combatant snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    /// Error related to loading or validating configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while validating a combatant snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A special move was supplied where the fast move belongs
    #[error("Expected a fast move, got special move {0}")]
    NotAFastMove(String),
    /// A fast move was supplied in the special move list
    #[error("Expected a special move, got fast move {0}")]
    NotASpecialMove(String),
    /// Special move costs must lie in 1..=100
    #[error("Special move {id} has invalid energy cost {cost}")]
    InvalidEnergyCost { id: String, cost: u8 },
    /// Fast moves must take at least one turn
    #[error("Fast move {0} has no cooldown")]
    ZeroCooldown(String),
    /// Current HP above the maximum
    #[error("Current HP {hp} exceeds max HP {max_hp}")]
    HpExceedsMax { hp: u32, max_hp: u32 },
    /// Energy above the 100 cap
    #[error("Energy {0} exceeds the cap of 100")]
    EnergyOutOfRange(u8),
}

/// Errors raised while loading or validating an `EngineConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// A threshold outside its meaningful range
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using SnapshotError
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::CombatantSnapshot;
    use crate::config::EngineConfig;
    use schema::MoveAttributes;

    fn setup(config_text: &str, fast: MoveAttributes) -> EngineResult<(EngineConfig, CombatantSnapshot)> {
        let config = EngineConfig::from_ron(config_text)?;
        let snapshot = CombatantSnapshot::new("Medicham", 120, 105.0, fast, Vec::new())?;
        Ok((config, snapshot))
    }

    #[test]
    fn test_engine_error_wraps_each_area() {
        let snapshot_error = setup("()", MoveAttributes::special("ICE_PUNCH", 45, 40))
            .expect_err("special in the fast slot");
        assert!(matches!(
            snapshot_error,
            EngineError::Snapshot(SnapshotError::NotAFastMove(ref id)) if id == "ICE_PUNCH"
        ));
        assert!(snapshot_error.to_string().starts_with("Snapshot error: "));

        let config_error = setup("(state_ceiling: )", MoveAttributes::fast("COUNTER", 8, 7, 1000))
            .expect_err("malformed RON");
        assert!(matches!(config_error, EngineError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_valid_inputs_pass_through() {
        let (config, snapshot) = setup("()", MoveAttributes::fast("COUNTER", 8, 7, 1000))
            .expect("valid inputs");
        assert_eq!(config.state_ceiling, EngineConfig::default().state_ceiling);
        assert_eq!(snapshot.name, "Medicham");
    }
}
