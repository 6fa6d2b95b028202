use crate::battle::stats::rescale_damage;
use crate::combatant::CombatantSnapshot;
use schema::MoveAttributes;

/// Damage oracle supplied by the data layer.
///
/// The engine treats it as a black box and only ever asks "how much would
/// this move do right now".
pub trait DamageModel {
    fn damage(
        &self,
        attacker: &CombatantSnapshot,
        defender: &CombatantSnapshot,
        move_: &MoveAttributes,
    ) -> u32;
}

impl<F> DamageModel for F
where
    F: Fn(&CombatantSnapshot, &CombatantSnapshot, &MoveAttributes) -> u32,
{
    fn damage(
        &self,
        attacker: &CombatantSnapshot,
        defender: &CombatantSnapshot,
        move_: &MoveAttributes,
    ) -> u32 {
        self(attacker, defender, move_)
    }
}

/// Uses each move's cached neutral-stage damage, scaled by the attacker's
/// attack stage and the defender's defense stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageScaledDamage;

impl DamageModel for StageScaledDamage {
    fn damage(
        &self,
        attacker: &CombatantSnapshot,
        defender: &CombatantSnapshot,
        move_: &MoveAttributes,
    ) -> u32 {
        rescale_damage(
            move_.damage.max(1),
            0,
            attacker.attack_stage,
            0,
            defender.defense_stage,
        )
    }
}
