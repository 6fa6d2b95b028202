//! Bounded forward search over "fast attack or throw a special" sequences.
//!
//! States advance one action at a time. The queue is kept ordered by turn, so
//! the first certain knockout popped is also the fastest one; everything
//! queued at or before that turn is still examined for a better finish.

use crate::action::Action;
use crate::battle::context::DecisionContext;
use crate::battle::stats::{rescale_damage, shift_stage};
use crate::combatant::CombatantSnapshot;
use crate::config::EngineConfig;
use ordered_float::OrderedFloat;
use schema::{BuffEffect, MAX_ENERGY, TURN_MS};
use std::cmp::{Ordering, Reverse};
use std::collections::VecDeque;

/// One action along a searched line of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    // Declared first so lower indices win ties ahead of farming.
    Special(usize),
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateOutcome {
    Open,
    Victory,
    Defeat,
}

impl StateOutcome {
    fn rank(&self) -> u8 {
        match self {
            StateOutcome::Defeat => 0,
            StateOutcome::Open => 1,
            StateOutcome::Victory => 2,
        }
    }
}

/// A projected future. Created and discarded by the thousands per decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub turn: u32,
    pub energy: u8,
    pub hp: u32,
    pub opponent_energy: u8,
    pub opponent_hp: u32,
    pub opponent_shields: u8,
    pub attack_stage: i8,
    pub opponent_defense_stage: i8,
    pub steps: Vec<Step>,
    /// Probability that every buff roll along `steps` went the assumed way.
    pub chance: f64,
    pub score: f64,
    pub outcome: StateOutcome,
}

impl SearchState {
    /// True if `self` is at least as good as `other` in every tracked dimension
    /// and got there no later. Identical states fall back to priority order.
    pub fn dominates(&self, other: &SearchState) -> bool {
        let no_worse = self.turn <= other.turn
            && self.opponent_hp <= other.opponent_hp
            && self.energy >= other.energy
            && self.attack_stage >= other.attack_stage
            && self.opponent_defense_stage <= other.opponent_defense_stage
            && self.opponent_shields <= other.opponent_shields
            && self.chance >= other.chance;
        if !no_worse {
            return false;
        }

        let identical = self.turn == other.turn
            && self.opponent_hp == other.opponent_hp
            && self.energy == other.energy
            && self.attack_stage == other.attack_stage
            && self.opponent_defense_stage == other.opponent_defense_stage
            && self.opponent_shields == other.opponent_shields
            && self.chance == other.chance;
        !identical || self.steps <= other.steps
    }

    /// Total order used to pick the best state. `Greater` means `self` is better.
    pub fn compare(&self, other: &SearchState) -> Ordering {
        let by_outcome = self.outcome.rank().cmp(&other.outcome.rank());
        if by_outcome != Ordering::Equal {
            return by_outcome;
        }

        let primary = if self.outcome == StateOutcome::Victory {
            (OrderedFloat(self.chance), Reverse(self.turn), OrderedFloat(self.score)).cmp(&(
                OrderedFloat(other.chance),
                Reverse(other.turn),
                OrderedFloat(other.score),
            ))
        } else {
            (OrderedFloat(self.score), OrderedFloat(self.chance), Reverse(self.turn)).cmp(&(
                OrderedFloat(other.score),
                OrderedFloat(other.chance),
                Reverse(other.turn),
            ))
        };

        // Earlier entries in priority order win the final tie.
        primary.then_with(|| other.steps.cmp(&self.steps))
    }

    /// The action this line of play starts with.
    pub fn first_action(&self) -> Action {
        match self.steps.first() {
            Some(Step::Special(index)) => Action::UseSpecialMove(*index),
            Some(Step::Fast) | None => Action::UseFastMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub state_ceiling: usize,
    pub prune_dominated: bool,
}

impl From<&EngineConfig> for SearchOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            state_ceiling: config.state_ceiling,
            prune_dominated: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: SearchState,
    /// States created, root included. Never exceeds the ceiling.
    pub generated: usize,
    pub expanded: usize,
    pub hit_ceiling: bool,
}

impl SearchOutcome {
    pub fn first_action(&self) -> Action {
        self.best.first_action()
    }
}

/// Everything about the matchup that stays fixed while searching.
pub(crate) struct Matchup {
    fast_damage: u32,
    fast_turns: u32,
    fast_gain: u8,
    special_damage: Vec<u32>,
    special_costs: Vec<u8>,
    special_buffs: Vec<BuffEffect>,
    base_attack_stage: i8,
    base_defense_stage: i8,
    hp: u32,
    max_hp: u32,
    opponent_max_hp: u32,
    opponent_energy: u8,
    opponent_fast_damage: u32,
    opponent_fast_turns: u32,
    opponent_fast_gain: u8,
    opponent_first_hit: u32,
    root: SearchState,
}

impl Matchup {
    pub(crate) fn new(
        ctx: &DecisionContext<'_>,
        me: &CombatantSnapshot,
        opponent: &CombatantSnapshot,
    ) -> Self {
        // A farming combatant only ever throws its fast move.
        let specials = if me.farm_energy {
            &me.special_moves[..0]
        } else {
            &me.special_moves[..]
        };

        let opponent_first_hit = if opponent.cooldown_ms > 0 {
            (opponent.cooldown_ms as u32).div_ceil(TURN_MS as u32)
        } else {
            opponent.fast_move.turns()
        };

        let mut matchup = Self {
            fast_damage: ctx.fast_damage(me, opponent),
            fast_turns: me.fast_move.turns(),
            fast_gain: me.fast_move.energy_gain,
            special_damage: specials.iter().map(|m| ctx.damage(me, opponent, m)).collect(),
            special_costs: specials.iter().map(|m| m.energy_cost).collect(),
            special_buffs: specials.iter().map(|m| m.buff).collect(),
            base_attack_stage: me.attack_stage,
            base_defense_stage: opponent.defense_stage,
            hp: me.hp,
            max_hp: me.max_hp.max(1),
            opponent_max_hp: opponent.max_hp.max(1),
            opponent_energy: opponent.energy,
            opponent_fast_damage: ctx.fast_damage(opponent, me),
            opponent_fast_turns: opponent.fast_move.turns(),
            opponent_fast_gain: opponent.fast_move.energy_gain,
            opponent_first_hit,
            root: SearchState {
                turn: 0,
                energy: me.energy.min(MAX_ENERGY),
                hp: me.hp,
                opponent_energy: opponent.energy.min(MAX_ENERGY),
                opponent_hp: opponent.hp,
                opponent_shields: opponent.shields,
                attack_stage: me.attack_stage,
                opponent_defense_stage: opponent.defense_stage,
                steps: Vec::new(),
                chance: 1.0,
                score: 0.0,
                outcome: StateOutcome::Open,
            },
        };
        let mut root = matchup.root.clone();
        matchup.settle(&mut root);
        matchup.root = root;
        matchup
    }

    pub(crate) fn root(&self) -> SearchState {
        self.root.clone()
    }

    /// Opponent fast attacks landed by the end of `turn`.
    fn opponent_hits_by(&self, turn: u32) -> u32 {
        if turn < self.opponent_first_hit {
            0
        } else {
            1 + (turn - self.opponent_first_hit) / self.opponent_fast_turns.max(1)
        }
    }

    fn scaled(&self, damage: u32, state: &SearchState) -> u32 {
        rescale_damage(
            damage,
            self.base_attack_stage,
            state.attack_stage,
            self.base_defense_stage,
            state.opponent_defense_stage,
        )
    }

    /// Recomputes the opponent's side, the outcome flag and the score.
    fn settle(&self, state: &mut SearchState) {
        let hits = self.opponent_hits_by(state.turn);
        state.hp = self
            .hp
            .saturating_sub(self.opponent_fast_damage.saturating_mul(hits));
        let gained = self.opponent_fast_gain as u32 * hits;
        state.opponent_energy =
            (self.opponent_energy as u32 + gained).min(MAX_ENERGY as u32) as u8;

        state.outcome = if state.opponent_hp == 0 {
            StateOutcome::Victory
        } else if state.hp == 0 {
            StateOutcome::Defeat
        } else {
            StateOutcome::Open
        };
        state.score = self.heuristic(state);
    }

    /// Net HP differential, plus small credits for energy and stat stages and a
    /// small debit for the opponent's banked energy.
    fn heuristic(&self, state: &SearchState) -> f64 {
        let hp_term =
            state.hp as f64 / self.max_hp as f64 - state.opponent_hp as f64 / self.opponent_max_hp as f64;
        let energy_term = state.energy as f64 / MAX_ENERGY as f64 * 0.1;
        let buff_term = (state.attack_stage as f64 - state.opponent_defense_stage as f64) * 0.05;
        let threat_term = state.opponent_energy as f64 / MAX_ENERGY as f64 * 0.05;
        hp_term + energy_term + buff_term - threat_term
    }

    pub(crate) fn successors(&self, state: &SearchState) -> Vec<SearchState> {
        let mut next = Vec::with_capacity(1 + self.special_costs.len() * 2);

        // --- Fast attack ---
        let mut fast = state.clone();
        fast.turn += self.fast_turns;
        fast.energy = state.energy.saturating_add(self.fast_gain).min(MAX_ENERGY);
        fast.opponent_hp = state
            .opponent_hp
            .saturating_sub(self.scaled(self.fast_damage, state));
        fast.steps.push(Step::Fast);
        self.settle(&mut fast);
        next.push(fast);

        // --- Special moves that are affordable now ---
        for (index, &cost) in self.special_costs.iter().enumerate() {
            if state.energy < cost {
                continue;
            }

            let mut thrown = state.clone();
            thrown.turn += 1;
            thrown.energy = state.energy - cost;
            if state.opponent_shields > 0 {
                thrown.opponent_shields -= 1;
                thrown.opponent_hp = state.opponent_hp.saturating_sub(1);
            } else {
                let damage = self.scaled(self.special_damage[index], state);
                thrown.opponent_hp = state.opponent_hp.saturating_sub(damage);
            }
            thrown.steps.push(Step::Special(index));

            for mut branch in self.apply_buff(thrown, &self.special_buffs[index]) {
                self.settle(&mut branch);
                next.push(branch);
            }
        }

        next
    }

    /// Splits a state on a buff roll. Certain buffs give one state, uncertain
    /// ones give the applied and missed branches.
    fn apply_buff(&self, state: SearchState, buff: &BuffEffect) -> Vec<SearchState> {
        let mut buffed = state.clone();
        match buff {
            BuffEffect::None => return vec![state],
            BuffEffect::User { stages, .. } => {
                buffed.attack_stage = shift_stage(state.attack_stage, stages.attack);
            }
            BuffEffect::Opponent { stages, .. } => {
                buffed.opponent_defense_stage =
                    shift_stage(state.opponent_defense_stage, stages.defense);
            }
        }

        let chance = buff.chance();
        let unchanged = buffed.attack_stage == state.attack_stage
            && buffed.opponent_defense_stage == state.opponent_defense_stage;
        if unchanged || chance <= 0.0 {
            return vec![state];
        }
        if chance >= 1.0 {
            return vec![buffed];
        }

        buffed.chance = state.chance * chance;
        let mut missed = state;
        missed.chance *= 1.0 - chance;
        vec![buffed, missed]
    }
}

/// Runs the search with the limits from the context's config.
pub fn search(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
) -> SearchOutcome {
    search_with(ctx, me, opponent, SearchOptions::from(ctx.config))
}

pub fn search_with(
    ctx: &DecisionContext<'_>,
    me: &CombatantSnapshot,
    opponent: &CombatantSnapshot,
    options: SearchOptions,
) -> SearchOutcome {
    let matchup = Matchup::new(ctx, me, opponent);
    let root = matchup.root();

    let mut best = root.clone();
    let mut queue = VecDeque::from([root]);
    let mut generated = 1;
    let mut expanded = 0;
    let mut hit_ceiling = false;
    // Turn of the earliest certain knockout seen so far.
    let mut horizon: Option<u32> = None;

    'search: while let Some(state) = queue.pop_front() {
        if horizon.is_some_and(|h| state.turn > h) {
            queue.push_front(state);
            break;
        }
        if state.compare(&best) == Ordering::Greater {
            best = state.clone();
        }

        match state.outcome {
            StateOutcome::Victory => {
                if state.chance >= 1.0 {
                    horizon = Some(horizon.map_or(state.turn, |h| h.min(state.turn)));
                }
                continue;
            }
            StateOutcome::Defeat => continue,
            StateOutcome::Open if horizon.is_some() => continue,
            StateOutcome::Open => {}
        }

        expanded += 1;
        for successor in matchup.successors(&state) {
            if generated >= options.state_ceiling {
                hit_ceiling = true;
                break 'search;
            }
            generated += 1;

            if successor.outcome == StateOutcome::Defeat {
                if successor.compare(&best) == Ordering::Greater {
                    best = successor;
                }
                continue;
            }
            enqueue(&mut queue, successor, options.prune_dominated);
        }
    }

    // Whatever is still queued was generated too; a ceiling stop may have left
    // the best line here.
    for state in queue {
        if state.compare(&best) == Ordering::Greater {
            best = state;
        }
    }

    if hit_ceiling {
        tracing::debug!(
            combatant = %me.name,
            generated,
            expanded,
            "search ceiling reached, using best state so far"
        );
    } else {
        tracing::trace!(combatant = %me.name, generated, expanded, "search finished");
    }

    SearchOutcome {
        best,
        generated,
        expanded,
        hit_ceiling,
    }
}

/// Inserts after every state with an equal or earlier turn, unless one of
/// those already dominates it.
fn enqueue(queue: &mut VecDeque<SearchState>, state: SearchState, prune: bool) -> bool {
    let position = queue
        .iter()
        .position(|queued| queued.turn > state.turn)
        .unwrap_or(queue.len());

    if prune && queue.range(..position).any(|queued| queued.dominates(&state)) {
        return false;
    }
    queue.insert(position, state);
    true
}
