//! Predicts whether a defender would spend a shield on an incoming special.

use crate::battle::context::{BattleMode, DecisionContext};
use crate::combatant::{BaitShields, CombatantSnapshot};
use schema::MoveAttributes;

/// Prediction plus the relative weight of the shield and no-shield branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShieldDecision {
    pub value: bool,
    pub shield_weight: u32,
    pub no_shield_weight: u32,
}

impl ShieldDecision {
    /// The defender lets the hit through.
    pub fn pass() -> Self {
        Self {
            value: false,
            shield_weight: 1,
            no_shield_weight: 2,
        }
    }

    /// Chance the defender actually shields. Optimal play always follows the
    /// prediction; emulated players roll between the two branches.
    pub fn shield_probability(&self, mode: BattleMode) -> f64 {
        if !self.value {
            return 0.0;
        }
        match mode {
            BattleMode::Optimal => 1.0,
            BattleMode::EmulateHuman => {
                let total = self.shield_weight + self.no_shield_weight;
                if total == 0 {
                    0.0
                } else {
                    self.shield_weight as f64 / total as f64
                }
            }
        }
    }
}

/// Estimates whether `defender` shields `special` thrown by `attacker`.
///
/// Anything unresolved (no shields left, placeholder move data) yields a pass.
pub fn would_shield(
    ctx: &DecisionContext<'_>,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    special: &MoveAttributes,
) -> ShieldDecision {
    if defender.shields == 0 || special.is_placeholder() || attacker.fast_move.is_placeholder() {
        return ShieldDecision::pass();
    }

    let config = ctx.config;
    let damage = ctx.damage(attacker, defender, special);
    let hp = defender.hp as i64;

    // A charging-form defender saves its shields for hits that really hurt.
    if let Some(policy) = defender.form_policy {
        if policy.in_charging_form && policy.conserves_shields && (damage as i64) * 2 < hp {
            return ShieldDecision::pass();
        }
    }

    let mut decision = ShieldDecision::pass();
    let post_move_hp = hp - damage as i64;

    // Farm damage taken while the attacker rebuilds for another throw, once per shield.
    let fast_damage = ctx.fast_damage(attacker, defender) as i64;
    let cycle_damage = match cycle_fast_attacks(attacker, special) {
        Some(fast_attacks) => (fast_attacks as i64 * fast_damage + 1) * defender.shields as i64,
        None => 0,
    };

    if post_move_hp <= cycle_damage {
        decision.value = true;
        decision.shield_weight = 2;
    }

    let fast_dpt = fast_damage as f64 / attacker.fast_move.turns() as f64;
    for other in &attacker.special_moves {
        let charged_damage = ctx.damage(attacker, defender, other) as f64;

        if charged_damage >= hp as f64 / config.shield_heavy_hit_divisor
            && fast_dpt > config.shield_heavy_fast_dpt
        {
            decision.value = true;
            decision.shield_weight = 4;
        }

        if charged_damage >= (hp - cycle_damage) as f64 {
            decision.value = true;
            decision.shield_weight = 4;
        }

        if charged_damage >= hp as f64 / config.shield_nuke_divisor
            && fast_dpt > config.shield_nuke_fast_dpt
        {
            decision.shield_weight = 12;
        }
    }

    if special.is_self_attack_debuffing()
        && hp > 0
        && damage as f64 / hp as f64 > config.self_attack_debuff_ratio
    {
        decision.value = true;
        decision.shield_weight = 4;
    }

    if ctx.mode == BattleMode::Optimal && attacker.bait_shields == BaitShields::Always {
        decision.value = true;
    }

    decision
}

/// Fast attacks the attacker needs after `special` to afford it again, plus the throw itself.
fn cycle_fast_attacks(attacker: &CombatantSnapshot, special: &MoveAttributes) -> Option<u32> {
    let gain = attacker.fast_move.energy_gain as u32;
    if gain == 0 {
        return None;
    }
    let remaining = attacker.energy.saturating_sub(special.energy_cost);
    let missing = special.energy_cost.saturating_sub(remaining) as u32;
    Some(missing.div_ceil(gain) + 1)
}
