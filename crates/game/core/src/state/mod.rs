//! Authoritative battle state.
//!
//! This module owns the grid, the unit roster and the turn bookkeeping. The
//! caller owns a [`GameState`] and lends it to the engine for every operation;
//! occupancy changes go through [`GameState::move_unit`] and
//! [`GameState::remove_unit`] so that the grid and unit positions never drift.
mod error;
pub mod types;

use std::collections::BTreeMap;

pub use error::{GridError, StateError};
pub use types::{
    Alliance, CardinalDirection, CoreStats, Grid, Inventory, InventoryError, Neighbors, Position,
    RangeBand, ResourceMeter, Team, TeamId, TurnState, Unit, UnitId, Weapon, WeaponWear,
};

/// Canonical snapshot of the battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed for deterministic combat rolls.
    ///
    /// Combined with `turn.nonce` to generate unique seeds for each strike.
    pub game_seed: u64,

    pub grid: Grid,

    units: BTreeMap<UnitId, Unit>,

    /// Team order, acting team and roll nonce.
    pub turn: TurnState,
}

impl GameState {
    /// Creates a battle with no units deployed yet. The first team acts first.
    pub fn new(grid: Grid, teams: Vec<Team>) -> Self {
        Self {
            game_seed: 0,
            grid,
            units: BTreeMap::new(),
            turn: TurnState::new(teams),
        }
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }

    /// Places a unit at its stored position and enlists it in its team.
    pub fn deploy(&mut self, unit: Unit) -> Result<UnitId, StateError> {
        let id = unit.id;
        if self.units.contains_key(&id) {
            return Err(StateError::DuplicateUnit { unit: id });
        }
        if !unit.is_alive() {
            return Err(StateError::DeadOnArrival { unit: id });
        }
        if self.turn.team(unit.team).is_none() {
            return Err(StateError::UnknownTeam {
                unit: id,
                team: unit.team,
            });
        }

        self.grid.place(unit.position, id)?;
        if let Some(team) = self.turn.team_mut(unit.team) {
            team.enlist(id);
        }
        self.units.insert(id, unit);
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable access for stat changes. Never change `position` through this;
    /// use [`GameState::move_unit`].
    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_at(&self, position: Position) -> Option<&Unit> {
        let id = self.grid.unit_at(position).ok().flatten()?;
        self.units.get(&id)
    }

    pub fn team_of(&self, unit: UnitId) -> Option<&Team> {
        let team = self.units.get(&unit)?.team;
        self.turn.team(team)
    }

    pub fn team_units(&self, team: TeamId) -> impl Iterator<Item = &Unit> {
        self.turn
            .team(team)
            .map(|team| team.units())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.units.get(id))
    }

    /// Standing between the teams of two units.
    pub fn alliance_between(&self, a: UnitId, b: UnitId) -> Option<Alliance> {
        let team_a = self.team_of(a)?;
        let team_b = self.team_of(b)?;
        Some(team_a.alliance_with(team_b))
    }

    pub fn are_enemies(&self, a: UnitId, b: UnitId) -> bool {
        self.alliance_between(a, b)
            .is_some_and(|alliance| alliance.is_hostile())
    }

    /// Whether `position` blocks `asking`.
    ///
    /// A cell is an obstacle when an enemy of the asking unit stands on it or
    /// its terrain does not admit the asking unit's class. Without an asking
    /// unit nothing is an obstacle.
    pub fn is_obstacle(&self, position: Position, asking: Option<UnitId>) -> Result<bool, GridError> {
        let terrain = self.grid.terrain_at(position)?;
        let occupant = self.grid.unit_at(position)?;
        let Some(asking) = asking.and_then(|id| self.units.get(&id)) else {
            return Ok(false);
        };

        if !terrain.admits(asking.class) {
            return Ok(true);
        }
        Ok(occupant.is_some_and(|other| other != asking.id && self.are_enemies(asking.id, other)))
    }

    /// Moves the occupant of `from` to `to`, updating grid and unit together.
    pub fn move_unit(&mut self, from: Position, to: Position) -> Result<UnitId, GridError> {
        let unit = self.grid.move_unit(from, to)?;
        if let Some(record) = self.units.get_mut(&unit) {
            record.position = to;
        }
        Ok(unit)
    }

    /// Takes a unit off the field: grid cell, team roster and unit table.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        if let Ok(Some(occupant)) = self.grid.unit_at(unit.position) {
            if occupant == id {
                let _ = self.grid.vacate(unit.position);
            }
        }
        if let Some(team) = self.turn.team_mut(unit.team) {
            team.discharge(id);
        }
        Some(unit)
    }

    /// Enemies of `unit` that its current weapon band reaches from `from`.
    pub fn enemies_in_range(&self, unit: UnitId, from: Position) -> Vec<UnitId> {
        let Some(attacker) = self.units.get(&unit) else {
            return Vec::new();
        };
        let band = attacker.range_band();
        self.units
            .values()
            .filter(|other| other.id != unit && other.is_alive())
            .filter(|other| band.contains(from.manhattan_distance(other.position)))
            .filter(|other| self.are_enemies(unit, other.id))
            .map(|other| other.id)
            .collect()
    }

    /// Checks that every unit sits on exactly its own cell and that no cell
    /// references a missing unit.
    pub fn validate_occupancy(&self) -> Result<(), StateError> {
        for unit in self.units.values() {
            if self.grid.unit_at(unit.position)? != Some(unit.id) {
                return Err(StateError::OccupancyDesync {
                    unit: unit.id,
                    position: unit.position,
                });
            }
        }
        for (position, occupant) in self.grid.occupants() {
            match self.units.get(&occupant) {
                Some(unit) if unit.position == position => {}
                _ => {
                    return Err(StateError::OccupancyDesync {
                        unit: occupant,
                        position,
                    });
                }
            }
        }
        Ok(())
    }
}
