use crate::combatant::{BaitShields, CombatantSnapshot};
use crate::config::EngineConfig;
use crate::errors::SnapshotResult;
use schema::{BuffEffect, MoveAttributes};

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```
/// let combatant = TestCombatantBuilder::new("Azumarill")
///     .with_fast("BUBBLE", 7, 11, 1500)
///     .with_special("ICE_BEAM", 90, 55)
///     .with_energy(55)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    max_hp: u32,
    hp: Option<u32>,
    attack_stat: f64,
    fast_move: MoveAttributes,
    special_moves: Vec<MoveAttributes>,
    energy: u8,
    shields: u8,
    cooldown_ms: u16,
    bait_shields: BaitShields,
    optimize_timing: bool,
}

impl TestCombatantBuilder {
    /// Creates a builder with 150 HP, a weak 500ms fast move and no specials.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            max_hp: 150,
            hp: None,
            attack_stat: 100.0,
            fast_move: MoveAttributes::fast("TACKLE", 3, 3, 500),
            special_moves: Vec::new(),
            energy: 0,
            shields: 0,
            cooldown_ms: 0,
            bait_shields: BaitShields::Selective,
            optimize_timing: false,
        }
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_attack_stat(mut self, attack_stat: f64) -> Self {
        self.attack_stat = attack_stat;
        self
    }

    pub fn with_fast(mut self, id: &str, damage: u32, energy_gain: u8, cooldown_ms: u16) -> Self {
        self.fast_move = MoveAttributes::fast(id, damage, energy_gain, cooldown_ms);
        self
    }

    pub fn with_special(mut self, id: &str, damage: u32, energy_cost: u8) -> Self {
        self.special_moves
            .push(MoveAttributes::special(id, damage, energy_cost));
        self
    }

    pub fn with_buffed_special(
        mut self,
        id: &str,
        damage: u32,
        energy_cost: u8,
        buff: BuffEffect,
    ) -> Self {
        self.special_moves
            .push(MoveAttributes::special(id, damage, energy_cost).with_buff(buff));
        self
    }

    pub fn with_energy(mut self, energy: u8) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_shields(mut self, shields: u8) -> Self {
        self.shields = shields;
        self
    }

    pub fn with_cooldown(mut self, cooldown_ms: u16) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn with_bait_shields(mut self, bait_shields: BaitShields) -> Self {
        self.bait_shields = bait_shields;
        self
    }

    pub fn with_timing_optimization(mut self) -> Self {
        self.optimize_timing = true;
        self
    }

    /// Builds the snapshot, surfacing validation errors.
    pub fn try_build(self) -> SnapshotResult<CombatantSnapshot> {
        let snapshot = CombatantSnapshot::new(
            &self.name,
            self.max_hp,
            self.attack_stat,
            self.fast_move,
            self.special_moves,
        )?
        .with_hp(self.hp.unwrap_or(self.max_hp))
        .with_energy(self.energy)
        .with_shields(self.shields)
        .with_cooldown(self.cooldown_ms)
        .with_bait_shields(self.bait_shields)
        .with_timing_optimization(self.optimize_timing);
        Ok(snapshot)
    }

    /// Builds the snapshot.
    pub fn build(self) -> CombatantSnapshot {
        let name = self.name.clone();
        match self.try_build() {
            Ok(snapshot) => snapshot,
            Err(err) => panic!("Failed to build test combatant {}: {}", name, err),
        }
    }
}

/// Default engine configuration for tests.
pub fn test_config() -> EngineConfig {
    EngineConfig::default()
}
