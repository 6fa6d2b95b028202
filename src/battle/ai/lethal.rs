use crate::action::Action;
use crate::battle::ai::{Strategist, TurnView, Verdict};
use crate::battle::context::DecisionContext;
use crate::combatant::CombatantSnapshot;
use schema::MoveAttributes;
use std::cmp::Reverse;

/// A knockout available this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LethalChoice {
    pub action: Action,
    /// Damage counted toward the knockout (1 for a shielded special).
    pub damage: u32,
}

/// Damage a special is credited with when judging a knockout. A shield
/// blocks everything but a single point.
pub fn lethality_damage(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    special: &MoveAttributes,
) -> u32 {
    if opponent.shields > 0 {
        1
    } else {
        ctx.damage(me, opponent, special)
    }
}

/// Finds the cheapest action that knocks the opponent out this turn.
///
/// The fast move wins whenever it is enough; otherwise the lowest energy
/// special, then the hardest hitting one.
pub fn find_lethal(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> Option<LethalChoice> {
    let fast_damage = ctx.fast_damage(me, opponent);
    if fast_damage >= opponent.hp {
        return Some(LethalChoice {
            action: Action::UseFastMove,
            damage: fast_damage,
        });
    }

    if me.farm_energy {
        return None;
    }

    me.affordable_specials()
        .filter_map(|(index, special)| {
            let damage = lethality_damage(ctx, me, opponent, special);
            (damage >= opponent.hp).then(|| {
                let raw_damage = ctx.damage(me, opponent, special);
                (index, special.energy_cost, raw_damage, damage)
            })
        })
        .min_by_key(|&(index, cost, raw_damage, _)| (cost, Reverse(raw_damage), index))
        .map(|(index, _, _, damage)| LethalChoice {
            action: Action::UseSpecialMove(index),
            damage,
        })
}

/// Whether `action` on its own knocks the opponent out.
pub fn is_lethal(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    action: Action,
) -> bool {
    match action {
        Action::UseFastMove => ctx.fast_damage(me, opponent) >= opponent.hp,
        Action::UseSpecialMove(index) => me
            .special_moves
            .get(index)
            .filter(|special| me.can_afford(special) && !me.farm_energy)
            .is_some_and(|special| lethality_damage(ctx, me, opponent, special) >= opponent.hp),
        Action::Wait => false,
    }
}

/// Takes any available knockout and ends the pipeline.
pub struct LethalFinisher;

impl Strategist for LethalFinisher {
    fn name(&self) -> &'static str {
        "lethal"
    }

    fn review(&self, ctx: &DecisionContext<'_>, view: &TurnView<'_>, _candidate: Action) -> Verdict {
        match find_lethal(ctx, view.me, view.opponent) {
            Some(choice) => {
                let move_name = match choice.action {
                    Action::UseSpecialMove(index) => view.me.special_moves[index].id.as_str(),
                    _ => view.me.fast_move.id.as_str(),
                };
                ctx.trace(
                    view.me,
                    &format!("uses {} to knock out {}", move_name, view.opponent.name),
                );
                Verdict::Finish(choice.action)
            }
            None => Verdict::NoOpinion,
        }
    }
}
