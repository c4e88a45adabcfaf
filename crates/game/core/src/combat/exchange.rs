//! Sequencing of a full exchange between an attacker and a defender.

use std::mem;

use crate::env::{GameEnv, RollContext, compute_seed};
use crate::state::{GameState, Position, TeamId, Unit, UnitId};

use super::error::CombatError;
use super::experience::{ExperienceAward, bonus_ceiling, experience_points};
use super::round::{CombatRolls, RoundReport, resolve_strike};
use super::strikes::{StrikeCounts, number_of_attacks};

/// A unit that died in the exchange and has already left the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Casualty {
    pub unit: UnitId,
    pub team: TeamId,
    pub position: Position,
}

/// Everything that happened in one exchange, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub distance: u32,
    pub strikes: StrikeCounts,
    pub rounds: Vec<RoundReport>,
    pub casualty: Option<Casualty>,
    pub experience: Option<ExperienceAward>,
}

impl BattleReport {
    /// Total health `unit` removed from the other side.
    pub fn damage_dealt_by(&self, unit: UnitId) -> u32 {
        self.rounds
            .iter()
            .filter(|round| round.attacker == unit)
            .map(|round| round.damage)
            .sum()
    }
}

fn validate<'s>(
    state: &'s GameState,
    attacker: UnitId,
    defender: UnitId,
) -> Result<(&'s Unit, &'s Unit), CombatError> {
    if attacker == defender {
        return Err(CombatError::SelfTarget { unit: attacker });
    }
    let a = state
        .unit(attacker)
        .ok_or(CombatError::UnitNotFound { unit: attacker })?;
    let d = state
        .unit(defender)
        .ok_or(CombatError::UnitNotFound { unit: defender })?;
    if a.played {
        return Err(CombatError::AlreadyPlayed { unit: attacker });
    }
    for unit in [a, d] {
        if !unit.is_alive() {
            return Err(CombatError::UnitDead { unit: unit.id });
        }
    }
    Ok((a, d))
}

/// Resolves a battle between `attacker` and `defender`.
///
/// Contract violations are reported before anything changes. Otherwise the
/// sides strike in turn until both run out of strikes or one dies; the winner
/// earns experience, the attacker is marked as played and a dead unit is taken
/// off the field. Each strike consumes one roll nonce.
///
/// The turn order follows a strict hand-over: after every iteration the
/// initiative passes to the other side if it still has strikes left, even when
/// the current side has not struck yet. With counts `(2, 1)` the order is
/// attacker, defender, attacker.
pub fn resolve_exchange(
    state: &mut GameState,
    env: &GameEnv<'_>,
    attacker: UnitId,
    defender: UnitId,
) -> Result<BattleReport, CombatError> {
    let (a, d) = validate(state, attacker, defender).inspect_err(|error| {
        tracing::warn!(%attacker, %defender, %error, "rejected combat");
    })?;
    let distance = a.position.manhattan_distance(d.position);
    let strikes = number_of_attacks(a, d, distance);

    let mut rounds = Vec::with_capacity(strikes.total() as usize);
    let (mut striker, mut target) = (attacker, defender);
    let (mut remaining, mut waiting) = (strikes.attacker, strikes.defender);

    while remaining > 0 || waiting > 0 {
        if remaining > 0 {
            remaining -= 1;
            let round = strike(state, env, striker, target)?;
            let lethal = round.defender_health == 0;
            rounds.push(round);
            if lethal {
                break;
            }
        }
        if waiting > 0 {
            mem::swap(&mut striker, &mut target);
            mem::swap(&mut remaining, &mut waiting);
        }
    }

    let mut report = BattleReport {
        attacker,
        defender,
        distance,
        strikes,
        rounds,
        casualty: None,
        experience: None,
    };

    report.experience = award_experience(state, env, &report)?;

    if let Some(unit) = state.unit_mut(attacker) {
        unit.played = true;
    }

    let dead = [attacker, defender]
        .into_iter()
        .find(|&id| state.unit(id).is_some_and(|unit| !unit.is_alive()));
    if let Some(removed) = dead.and_then(|id| state.remove_unit(id)) {
        tracing::info!(unit = %removed.id, team = %removed.team, at = %removed.position, "unit defeated");
        report.casualty = Some(Casualty {
            unit: removed.id,
            team: removed.team,
            position: removed.position,
        });
    }

    Ok(report)
}

fn strike(
    state: &mut GameState,
    env: &GameEnv<'_>,
    striker: UnitId,
    target: UnitId,
) -> Result<RoundReport, CombatError> {
    let nonce = state.turn.nonce;
    state.turn.nonce = nonce.wrapping_add(1);

    let rng = env.rng();
    let rolls = CombatRolls::new(
        rng.roll_percent(compute_seed(state.game_seed, nonce, striker.0, RollContext::Hit)),
        rng.roll_percent(compute_seed(state.game_seed, nonce, striker.0, RollContext::Critical)),
    );

    let decided = {
        let a = state
            .unit(striker)
            .ok_or(CombatError::UnitNotFound { unit: striker })?;
        let d = state
            .unit(target)
            .ok_or(CombatError::UnitNotFound { unit: target })?;
        resolve_strike(a, d, rolls, env.config().crit_multiplier)
    };

    let victim = state
        .unit_mut(target)
        .ok_or(CombatError::UnitNotFound { unit: target })?;
    let damage = victim.health.drain(decided.damage);
    let defender_health = victim.health.current;

    let weapon = if decided.wears_weapon {
        state
            .unit_mut(striker)
            .and_then(|unit| unit.inventory.active_mut())
            .map(|weapon| weapon.consume_use())
    } else {
        None
    };

    tracing::debug!(
        %striker,
        %target,
        outcome = %decided.outcome,
        damage,
        defender_health,
        hit_roll = rolls.hit,
        crit_roll = rolls.crit,
        "strike resolved"
    );

    Ok(RoundReport {
        attacker: striker,
        defender: target,
        outcome: decided.outcome,
        damage,
        defender_health,
        weapon,
    })
}

/// The survivor wins; if both live, whoever removed more health, ties going
/// to the attacker.
fn winner_of(state: &GameState, report: &BattleReport) -> (UnitId, UnitId) {
    let alive = |id: UnitId| state.unit(id).is_some_and(Unit::is_alive);
    let (a, d) = (report.attacker, report.defender);
    match (alive(a), alive(d)) {
        (true, false) => (a, d),
        (false, true) => (d, a),
        _ if report.damage_dealt_by(d) > report.damage_dealt_by(a) => (d, a),
        _ => (a, d),
    }
}

fn award_experience(
    state: &mut GameState,
    env: &GameEnv<'_>,
    report: &BattleReport,
) -> Result<Option<ExperienceAward>, CombatError> {
    let (winner_id, victim_id) = winner_of(state, report);
    let damage = report.damage_dealt_by(winner_id);

    let points = {
        let winner = state
            .unit(winner_id)
            .ok_or(CombatError::UnitNotFound { unit: winner_id })?;
        let victim = state
            .unit(victim_id)
            .ok_or(CombatError::UnitNotFound { unit: victim_id })?;
        if !winner.is_alive() {
            return Ok(None);
        }
        let bonus = if damage > 0 {
            let seed = compute_seed(
                state.game_seed,
                state.turn.nonce,
                winner_id.0,
                RollContext::ExperienceBonus,
            );
            env.rng().range(seed, 0, bonus_ceiling(winner))
        } else {
            0
        };
        experience_points(winner, victim, damage, !victim.is_alive(), bonus)
    };

    let winner = state
        .unit_mut(winner_id)
        .ok_or(CombatError::UnitNotFound { unit: winner_id })?;
    let new_level = winner.gain_experience(points);
    if let Some(level) = new_level {
        tracing::info!(unit = %winner_id, level, "level up");
    }

    Ok(Some(ExperienceAward {
        unit: winner_id,
        points,
        new_level,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{MapDimensions, PcgRng, Terrain};
    use crate::error::{ErrorSeverity, GameError};
    use crate::state::{CoreStats, Grid, Team, Weapon};

    fn battlefield() -> GameState {
        let grid = Grid::uniform(MapDimensions::new(4, 1), Terrain::plain());
        GameState::new(
            grid,
            vec![Team::new(TeamId(0), "Blue", 0), Team::new(TeamId(1), "Red", 3)],
        )
    }

    fn soldier(id: u32, team: u16, x: i32) -> Unit {
        Unit::new(UnitId(id), "soldier", TeamId(team), CoreStats::new(5, 5, 5, 0, 2, 0), 20)
            .at(Position::new(x, 0))
    }

    #[test]
    fn rejects_self_target_without_changes() {
        let mut state = battlefield();
        state.deploy(soldier(1, 0, 0)).unwrap();
        let before = state.clone();
        let config = GameConfig::default();
        let env = GameEnv::new(&config, &PcgRng);

        let error = resolve_exchange(&mut state, &env, UnitId(1), UnitId(1)).unwrap_err();
        assert_eq!(error, CombatError::SelfTarget { unit: UnitId(1) });
        assert_eq!(state, before);
    }

    #[test]
    fn rejects_played_attacker_without_changes() {
        let mut state = battlefield();
        let mut attacker = soldier(1, 0, 0);
        attacker.played = true;
        state.deploy(attacker).unwrap();
        state.deploy(soldier(2, 1, 1)).unwrap();
        let before = state.clone();
        let config = GameConfig::default();
        let env = GameEnv::new(&config, &PcgRng);

        let error = resolve_exchange(&mut state, &env, UnitId(1), UnitId(2)).unwrap_err();
        assert!(matches!(error, CombatError::AlreadyPlayed { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn rejects_dead_defender_without_changes() {
        let mut state = battlefield();
        state.deploy(soldier(1, 0, 0)).unwrap();
        state.deploy(soldier(2, 1, 1)).unwrap();
        if let Some(defender) = state.unit_mut(UnitId(2)) {
            defender.health.current = 0;
        }
        let before = state.clone();
        let config = GameConfig::default();
        let env = GameEnv::new(&config, &PcgRng);

        let error = resolve_exchange(&mut state, &env, UnitId(1), UnitId(2)).unwrap_err();
        assert_eq!(error, CombatError::UnitDead { unit: UnitId(2) });
        assert_eq!(error.severity(), ErrorSeverity::Fatal);
        assert_eq!(state, before);
    }

    #[test]
    fn out_of_reach_exchange_only_marks_played() {
        let mut state = battlefield();
        state.deploy(soldier(1, 0, 0)).unwrap();
        state.deploy(soldier(2, 1, 3)).unwrap();
        let config = GameConfig::default();
        let env = GameEnv::new(&config, &PcgRng);

        let report = resolve_exchange(&mut state, &env, UnitId(1), UnitId(2)).unwrap();
        assert!(report.rounds.is_empty());
        assert_eq!(report.strikes, StrikeCounts::new(0, 0));
        assert!(state.unit(UnitId(1)).unwrap().played);
        assert_eq!(state.turn.nonce, 0);
        assert_eq!(report.experience.map(|award| award.points), Some(1));
    }

    #[test]
    fn each_strike_advances_nonce_and_wears_weapon_on_landing() {
        let mut state = battlefield();
        state
            .deploy(soldier(1, 0, 0).with_weapon(Weapon::new("Sword", 3, 100, 0, 10)))
            .unwrap();
        state.deploy(soldier(2, 1, 1)).unwrap();
        let config = GameConfig::default();
        let env = GameEnv::new(&config, &PcgRng);

        let report = resolve_exchange(&mut state, &env, UnitId(1), UnitId(2)).unwrap();
        assert_eq!(report.rounds.len(), 2);
        assert_eq!(state.turn.nonce, 2);

        let landed = report.rounds[0].outcome.lands();
        let uses = state.unit(UnitId(1)).unwrap().inventory.active().unwrap().uses;
        assert_eq!(uses, if landed { 9 } else { 10 });
    }
}
