use schema::{clamp_stage, MAX_STAGE, MIN_STAGE};

/// Multiplier applied to attack or defense at a given stat stage.
///
/// Positive stages scale by (4 + s) / 4, negative ones by 4 / (4 - s), so the
/// full range runs from 0.5 at -4 to 2.0 at +4.
pub fn stage_multiplier(stage: i8) -> f64 {
    let clamped_stage = stage.clamp(MIN_STAGE, MAX_STAGE);

    if clamped_stage >= 0 {
        (4.0 + clamped_stage as f64) / 4.0
    } else {
        4.0 / (4.0 - clamped_stage as f64)
    }
}

/// Applies a stage change, keeping the result within [-4, 4].
pub fn shift_stage(stage: i8, delta: i8) -> i8 {
    clamp_stage(stage as i32 + delta as i32)
}

/// Rescales `damage` computed at `from_attack`/`from_defense` stages to the
/// `to_attack`/`to_defense` stages. Never drops below 1.
pub fn rescale_damage(
    damage: u32,
    from_attack: i8,
    to_attack: i8,
    from_defense: i8,
    to_defense: i8,
) -> u32 {
    if damage == 0 {
        return 0;
    }
    if from_attack == to_attack && from_defense == to_defense {
        return damage;
    }

    let attack_ratio = stage_multiplier(to_attack) / stage_multiplier(from_attack);
    let defense_ratio = stage_multiplier(from_defense) / stage_multiplier(to_defense);
    ((damage as f64 * attack_ratio * defense_ratio).floor() as u32).max(1)
}
