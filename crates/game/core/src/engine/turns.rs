use crate::state::{TeamId, UnitId};

use super::{EngineError, EngineEvent, GameEngine};

/// Team rotation, defeat and victory.
impl GameEngine<'_> {
    /// Ends the acting team's turn now, cancelling any pending selection.
    pub fn end_turn(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        self.ensure_running()?;
        let mut events = Vec::new();
        self.reset(&mut events)?;
        self.rotate(&mut events);
        Ok(events)
    }

    /// Whether every unit of the acting team has played.
    pub fn active_team_exhausted(&self) -> bool {
        self.state.turn.active_team().is_none_or(|team| {
            team.units()
                .iter()
                .all(|&id| self.state.unit(id).is_none_or(|unit| unit.played))
        })
    }

    /// Checked after every completed action.
    pub(super) fn rotate_if_exhausted(&mut self, events: &mut Vec<EngineEvent>) {
        if self.active_team_exhausted() {
            self.rotate(events);
        }
    }

    /// Hands the turn to the next undefeated team and readies its units.
    fn rotate(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state.turn.is_over() {
            return;
        }
        let from = self.state.turn.active;
        if let Some(team) = self.state.turn.active_team_id() {
            tracing::info!(%team, round = self.state.turn.round, "turn ended");
            events.push(EngineEvent::TurnEnded { team });
        }

        let Some(next) = self.state.turn.next_undefeated_after(from) else {
            return;
        };
        if next <= from {
            self.state.turn.round += 1;
        }
        self.state.turn.active = next;

        let Some((team, roster)) = self
            .state
            .turn
            .active_team()
            .map(|team| (team.id, team.units().to_vec()))
        else {
            return;
        };
        for id in roster {
            if let Some(unit) = self.state.unit_mut(id) {
                unit.played = false;
            }
        }

        let round = self.state.turn.round;
        tracing::info!(%team, round, "turn started");
        events.push(EngineEvent::TurnStarted { team, round });
    }

    /// Follows up a death: boss rout, team defeat and victory.
    pub(super) fn settle_casualty(
        &mut self,
        unit: UnitId,
        team: TeamId,
        events: &mut Vec<EngineEvent>,
    ) {
        let routed = self.env.config().rout_on_boss_defeat
            && self
                .state
                .turn
                .team(team)
                .is_some_and(|side| side.boss == Some(unit));
        if routed {
            self.rout(team, events);
        }

        if self
            .state
            .turn
            .team(team)
            .is_some_and(|side| side.is_defeated())
        {
            tracing::info!(%team, "team defeated");
            events.push(EngineEvent::TeamDefeated { team });
        }

        self.check_victory(events);
    }

    /// Takes every remaining member of `team` off the field.
    fn rout(&mut self, team: TeamId, events: &mut Vec<EngineEvent>) {
        let roster = self
            .state
            .turn
            .team(team)
            .map(|side| side.units().to_vec())
            .unwrap_or_default();
        tracing::info!(%team, remaining = roster.len(), "boss fell, team routed");
        events.push(EngineEvent::TeamRouted { team });

        for id in roster {
            if self.state.remove_unit(id).is_some() {
                events.push(EngineEvent::UnitDefeated { unit: id, team });
            }
        }
        self.session.pathfinder.invalidate();
    }

    /// Declares the winner once a single undefeated team remains.
    fn check_victory(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state.turn.is_over() {
            return;
        }
        let standing: Vec<TeamId> = self.state.turn.undefeated().map(|team| team.id).collect();
        if let [winner] = standing[..] {
            self.state.turn.winner = Some(winner);
            tracing::info!(team = %winner, round = self.state.turn.round, "victory");
            events.push(EngineEvent::Victory { team: winner });
        }
    }
}
