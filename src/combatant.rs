use crate::errors::{SnapshotError, SnapshotResult};
use schema::{clamp_stage, MoveAttributes, MAX_ENERGY};
use serde::{Deserialize, Serialize};

/// How eagerly a combatant throws cheap moves to draw out shields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BaitShields {
    Never,
    #[default]
    Selective,
    Always,
}

impl BaitShields {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, BaitShields::Never)
    }
}

/// Capability for combatants that switch forms when they throw a special move.
///
/// While in the charging form the combatant deals little damage, so it banks
/// energy before transforming and treats every special as a self-debuff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormTransitionPolicy {
    pub in_charging_form: bool,
    /// Share of one fast move's energy gain kept below the cap before transforming.
    pub reserve_fraction: f64,
    /// Let light hits through instead of shielding them while charging.
    pub conserves_shields: bool,
}

impl FormTransitionPolicy {
    pub fn charging() -> Self {
        Self {
            in_charging_form: true,
            reserve_fraction: 0.5,
            conserves_shields: true,
        }
    }

    pub fn released() -> Self {
        Self {
            in_charging_form: false,
            ..Self::charging()
        }
    }

    /// Energy the combatant wants before it leaves the charging form.
    pub fn energy_threshold(&self, fast_energy_gain: u8) -> f64 {
        MAX_ENERGY as f64 - fast_energy_gain as f64 * self.reserve_fraction
    }
}

/// Read-only view of one combatant at the moment a decision is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub name: String,
    /// Which side of the battle this combatant occupies.
    pub slot: usize,
    pub hp: u32,
    pub max_hp: u32,
    pub energy: u8,
    pub attack_stage: i8,
    pub defense_stage: i8,
    /// Raw attack stat, used to settle simultaneous special moves.
    pub attack_stat: f64,
    pub fast_move: MoveAttributes,
    /// Sorted by ascending energy cost.
    pub special_moves: Vec<MoveAttributes>,
    pub shields: u8,
    /// Milliseconds left on the fast move currently in progress.
    pub cooldown_ms: u16,
    pub form_policy: Option<FormTransitionPolicy>,
    pub bait_shields: BaitShields,
    pub optimize_timing: bool,
    pub farm_energy: bool,
}

impl CombatantSnapshot {
    /// Builds a full-health snapshot with no energy or shields.
    pub fn new(
        name: &str,
        max_hp: u32,
        attack_stat: f64,
        fast_move: MoveAttributes,
        mut special_moves: Vec<MoveAttributes>,
    ) -> SnapshotResult<Self> {
        special_moves.sort_by_key(|m| m.energy_cost);

        let snapshot = Self {
            name: name.to_string(),
            slot: 0,
            hp: max_hp,
            max_hp,
            energy: 0,
            attack_stage: 0,
            defense_stage: 0,
            attack_stat,
            fast_move,
            special_moves,
            shields: 0,
            cooldown_ms: 0,
            form_policy: None,
            bait_shields: BaitShields::default(),
            optimize_timing: false,
            farm_energy: false,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = slot;
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn with_energy(mut self, energy: u8) -> Self {
        self.energy = energy.min(MAX_ENERGY);
        self
    }

    pub fn with_stages(mut self, attack: i32, defense: i32) -> Self {
        self.attack_stage = clamp_stage(attack);
        self.defense_stage = clamp_stage(defense);
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

    pub fn with_form_policy(mut self, policy: FormTransitionPolicy) -> Self {
        self.form_policy = Some(policy);
        self
    }

    pub fn with_bait_shields(mut self, bait: BaitShields) -> Self {
        self.bait_shields = bait;
        self
    }

    pub fn with_timing_optimization(mut self, enabled: bool) -> Self {
        self.optimize_timing = enabled;
        self
    }

    pub fn with_farm_energy(mut self, enabled: bool) -> Self {
        self.farm_energy = enabled;
        self
    }

    /// Checks the invariants the engine relies on. Snapshots built with `new`
    /// and the `with_*` setters always pass; deserialized ones may not.
    pub fn validate(&self) -> SnapshotResult<()> {
        if !self.fast_move.is_fast() {
            return Err(SnapshotError::NotAFastMove(self.fast_move.id.clone()));
        }
        if self.fast_move.cooldown_ms == 0 {
            return Err(SnapshotError::ZeroCooldown(self.fast_move.id.clone()));
        }
        for special in &self.special_moves {
            if special.is_fast() {
                return Err(SnapshotError::NotASpecialMove(special.id.clone()));
            }
            if special.energy_cost == 0 || special.energy_cost > MAX_ENERGY {
                return Err(SnapshotError::InvalidEnergyCost {
                    id: special.id.clone(),
                    cost: special.energy_cost,
                });
            }
        }
        if self.hp > self.max_hp {
            return Err(SnapshotError::HpExceedsMax {
                hp: self.hp,
                max_hp: self.max_hp,
            });
        }
        if self.energy > MAX_ENERGY {
            return Err(SnapshotError::EnergyOutOfRange(self.energy));
        }
        Ok(())
    }

    // --- Derived accessors ---

    pub fn can_afford(&self, special: &MoveAttributes) -> bool {
        self.energy >= special.energy_cost
    }

    /// Special moves the combatant can throw right now, with their indices.
    pub fn affordable_specials(&self) -> impl Iterator<Item = (usize, &MoveAttributes)> + '_ {
        self.special_moves
            .iter()
            .enumerate()
            .filter(move |(_, special)| self.can_afford(special))
    }

    pub fn cheapest_special(&self) -> Option<&MoveAttributes> {
        self.special_moves.first()
    }

    pub fn can_afford_any_special(&self) -> bool {
        self.cheapest_special().is_some_and(|m| self.can_afford(m))
    }

    /// Whether this combatant goes first when both throw a special on the same turn.
    pub fn wins_cmp(&self, opponent: &CombatantSnapshot) -> bool {
        self.attack_stat >= opponent.attack_stat
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    pub fn in_charging_form(&self) -> bool {
        self.form_policy.is_some_and(|p| p.in_charging_form)
    }

    /// Self-debuffing as far as strategy goes. Every special counts while in a charging form.
    pub fn is_self_debuffing(&self, special: &MoveAttributes) -> bool {
        special.is_self_debuffing() || (!special.is_fast() && self.in_charging_form())
    }

    /// Fast moves needed before `cost` energy is available. `None` if the fast
    /// move generates no energy and the cost is out of reach.
    pub fn fast_moves_until(&self, cost: u8) -> Option<u32> {
        if self.energy >= cost {
            return Some(0);
        }
        let gain = self.fast_move.energy_gain as u32;
        if gain == 0 {
            return None;
        }
        Some(((cost - self.energy) as u32).div_ceil(gain))
    }

    /// Whole turns this combatant survives against `opponent_dpt` damage per turn.
    pub fn turns_to_live(&self, opponent_dpt: f64) -> Option<u32> {
        if opponent_dpt <= 0.0 || !opponent_dpt.is_finite() {
            return None;
        }
        Some((self.hp as f64 / opponent_dpt).floor() as u32)
    }
}

/// Expected-value multiplier a buff adds to a move's damage-per-energy.
pub fn buff_dpe_multiplier(special: &MoveAttributes, scaling: f64) -> f64 {
    let magnitude = special.buff.magnitude() as f64;
    let chance = special.buff.chance();
    ((4.0 + magnitude * scaling * chance) / 4.0).max(0.0)
}

/// Damage per point of energy, weighted by the move's buff effect.
pub fn damage_per_energy(special: &MoveAttributes, damage: u32, scaling: f64) -> f64 {
    if special.energy_cost == 0 {
        return 0.0;
    }
    damage as f64 / special.energy_cost as f64 * buff_dpe_multiplier(special, scaling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{BuffEffect, StatDeltas};

    fn snapshot() -> CombatantSnapshot {
        CombatantSnapshot::new(
            "Medicham",
            140,
            105.0,
            MoveAttributes::fast("COUNTER", 8, 7, 1000),
            vec![
                MoveAttributes::special("DYNAMIC_PUNCH", 90, 50),
                MoveAttributes::special("ICE_PUNCH", 55, 40),
            ],
        )
        .expect("valid snapshot")
    }

    #[test]
    fn test_specials_sorted_by_energy() {
        let snap = snapshot();
        let costs: Vec<u8> = snap.special_moves.iter().map(|m| m.energy_cost).collect();
        assert_eq!(costs, vec![40, 50]);
    }

    #[test]
    fn test_setters_saturate() {
        let snap = snapshot().with_energy(140).with_hp(999).with_stages(9, -7);
        assert_eq!(snap.energy, 100);
        assert_eq!(snap.hp, 140);
        assert_eq!((snap.attack_stage, snap.defense_stage), (4, -4));
    }

    #[test]
    fn test_validation_rejects_fast_special() {
        let err = CombatantSnapshot::new(
            "Broken",
            100,
            100.0,
            MoveAttributes::fast("TACKLE", 3, 3, 500),
            vec![MoveAttributes::fast("BITE", 4, 2, 500)],
        )
        .unwrap_err();
        assert_eq!(err, SnapshotError::NotASpecialMove("BITE".to_string()));
    }

    #[test]
    fn test_fast_moves_until_affordable() {
        let snap = snapshot().with_energy(30);
        assert_eq!(snap.fast_moves_until(40), Some(2));
        assert_eq!(snap.fast_moves_until(30), Some(0));

        let mut starved = snap.clone();
        starved.fast_move.energy_gain = 0;
        assert_eq!(starved.fast_moves_until(40), None);
    }

    #[test]
    fn test_turns_to_live_floors() {
        let snap = snapshot().with_hp(25);
        assert_eq!(snap.turns_to_live(4.0), Some(6));
        assert_eq!(snap.turns_to_live(0.0), None);
    }

    #[test]
    fn test_buff_adjusted_dpe() {
        let power_up = MoveAttributes::special("POWER_UP_PUNCH", 40, 35).with_buff(BuffEffect::User {
            stages: StatDeltas::new(1, 0),
            chance: 1.0,
        });
        // (4 + 1) / 4 = 1.25
        assert!((damage_per_energy(&power_up, 35, 1.0) - 1.25).abs() < 1e-9);

        let plain = MoveAttributes::special("BODY_SLAM", 50, 35);
        assert!((damage_per_energy(&plain, 70, 1.0) - 2.0).abs() < 1e-9);

        let free = MoveAttributes::special("PLACEHOLDER", 50, 0);
        assert_eq!(damage_per_energy(&free, 70, 1.0), 0.0);
    }

    #[test]
    fn test_charging_form_marks_specials_self_debuffing() {
        let snap = snapshot().with_form_policy(FormTransitionPolicy::charging());
        assert!(snap.is_self_debuffing(&snap.special_moves[0]));
        assert!(!snap.is_self_debuffing(&snap.fast_move));

        let released = snapshot().with_form_policy(FormTransitionPolicy::released());
        assert!(!released.is_self_debuffing(&released.special_moves[0]));
    }
}
