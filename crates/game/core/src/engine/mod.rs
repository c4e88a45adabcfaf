//! Selection flow, combat dispatch and turn rotation.
//!
//! The caller owns a [`GameState`] and a [`Session`] and lends both to a
//! short-lived [`GameEngine`] for each input. Every operation returns the
//! [`EngineEvent`]s it produced; the engine keeps no state of its own.

mod errors;
mod events;
mod selection;
mod turns;

pub use errors::EngineError;
pub use events::EngineEvent;
pub use selection::{ActionChoice, ActionMenu, SelectionState};

use crate::combat::{BattleReport, CombatForecast, forecast, resolve_exchange};
use crate::env::GameEnv;
use crate::pathfinding::Pathfinder;
use crate::state::{GameState, Position, StateError, TeamId, Unit, UnitId, WeaponWear};

/// Per-player interaction state that lives between engine calls.
#[derive(Clone, Debug, Default)]
pub struct Session {
    selection: SelectionState,
    pathfinder: Pathfinder,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Query access for hosts that want areas or paths outside the selection
    /// flow. Results are cached until the next occupancy change made through
    /// the engine.
    pub fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }
}

/// Drives one battle.
///
/// The engine borrows everything it touches; create one per input and drop
/// it afterwards.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    session: &'a mut Session,
    env: GameEnv<'a>,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState, session: &'a mut Session, env: GameEnv<'a>) -> Self {
        Self {
            state,
            session,
            env,
        }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    pub fn selection(&self) -> &SelectionState {
        &self.session.selection
    }

    /// Rejects input once the battle has a winner.
    fn ensure_running(&self) -> Result<(), EngineError> {
        match self.state.turn.winner {
            Some(winner) => {
                tracing::warn!(%winner, "input after victory");
                Err(EngineError::GameOver { winner })
            }
            None => Ok(()),
        }
    }

    /// Whether `unit` belongs to the acting team and has not played yet.
    fn can_act(&self, unit: UnitId) -> bool {
        self.state
            .unit(unit)
            .is_some_and(|unit| !unit.played && self.state.turn.is_active(unit.team))
    }

    fn unit_or_error(&self, unit: UnitId) -> Result<&Unit, EngineError> {
        self.state
            .unit(unit)
            .ok_or(EngineError::State(StateError::UnitNotFound { unit }))
    }

    /// Moves a unit and drops cached searches.
    fn relocate(
        &mut self,
        unit: UnitId,
        from: Position,
        to: Position,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), EngineError> {
        if from == to {
            return Ok(());
        }
        self.state.move_unit(from, to).inspect_err(|error| {
            tracing::warn!(%unit, %from, %to, %error, "rejected move");
        })?;
        self.session.pathfinder.invalidate();
        tracing::debug!(%unit, %from, %to, "unit moved");
        events.push(EngineEvent::UnitMoved { unit, from, to });
        Ok(())
    }

    /// Places a reinforcement on the field.
    pub fn deploy(&mut self, unit: Unit) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let (team, position) = (unit.team, unit.position);
        let id = self.state.deploy(unit)?;
        self.session.pathfinder.invalidate();
        tracing::info!(unit = %id, %team, %position, "unit deployed");
        Ok(vec![EngineEvent::UnitDeployed {
            unit: id,
            team,
            position,
        }])
    }

    /// Expected numbers if the selected unit engaged `target` from where it
    /// stands now.
    pub fn preview(&self, target: UnitId) -> Result<CombatForecast, EngineError> {
        let attacker = self
            .session
            .selection
            .acting_unit()
            .ok_or(EngineError::NoActiveSelection)?;
        let attacker = self.unit_or_error(attacker)?;
        let defender = self.unit_or_error(target)?;
        let distance = attacker.position.manhattan_distance(defender.position);
        Ok(forecast(attacker, defender, distance))
    }

    /// Resolves combat directly, outside the selection flow.
    ///
    /// The attacker fights from where it stands. Any pending selection is
    /// discarded without undoing moves.
    pub fn attack(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let mut events = Vec::new();
        self.engage(attacker, defender, &mut events)?;
        Ok(events)
    }

    /// Runs an exchange and everything that follows from it.
    fn engage(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), EngineError> {
        let report = resolve_exchange(self.state, &self.env, attacker, defender)?;
        self.session.selection = SelectionState::Idle;
        self.report_combat(report, events);
        events.push(EngineEvent::SelectionReset);
        self.rotate_if_exhausted(events);
        Ok(())
    }

    fn report_combat(&mut self, report: BattleReport, events: &mut Vec<EngineEvent>) {
        let broke: Vec<UnitId> = report
            .rounds
            .iter()
            .filter(|round| round.weapon == Some(WeaponWear::Broken))
            .map(|round| round.attacker)
            .collect();
        let level_up = report
            .experience
            .and_then(|award| award.new_level.map(|level| (award.unit, level)));
        let casualty = report.casualty;

        events.push(EngineEvent::CombatResolved(report));
        events.extend(broke.into_iter().map(|unit| EngineEvent::WeaponBroke { unit }));
        if let Some((unit, level)) = level_up {
            events.push(EngineEvent::LevelUp { unit, level });
        }
        if let Some(casualty) = casualty {
            self.session.pathfinder.invalidate();
            events.push(EngineEvent::UnitDefeated {
                unit: casualty.unit,
                team: casualty.team,
            });
            self.settle_casualty(casualty.unit, casualty.team, events);
        }
    }

    pub fn active_team(&self) -> Option<TeamId> {
        self.state.turn.active_team_id()
    }

    pub fn round(&self) -> u32 {
        self.state.turn.round
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.state.turn.winner
    }
}
