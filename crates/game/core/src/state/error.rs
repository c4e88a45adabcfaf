//! State management errors.
//!
//! Errors raised by grid queries, occupancy changes and battle setup.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, TeamId, UnitId};

/// Errors raised by grid queries and occupancy updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    /// Coordinate is outside the map bounds.
    #[error("position {position} is out of bounds (map size: {width}x{height})")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    /// Destination already holds a unit.
    #[error("position {position} is already occupied by unit {occupant}")]
    Occupied {
        position: Position,
        occupant: UnitId,
    },

    /// Source cell of a move holds no unit.
    #[error("position {position} holds no unit")]
    Vacant { position: Position },

    /// A terrain or occupancy layer does not cover the grid exactly.
    #[error("grid layer has {actual} cells, expected {expected}")]
    TerrainMismatch { expected: usize, actual: usize },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GridError::OutOfBounds { .. } | GridError::TerrainMismatch { .. } => {
                ErrorSeverity::Validation
            }
            GridError::Occupied { .. } => ErrorSeverity::Recoverable,
            GridError::Vacant { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::OutOfBounds { .. } => "GRID_OUT_OF_BOUNDS",
            GridError::Occupied { .. } => "GRID_OCCUPIED",
            GridError::Vacant { .. } => "GRID_VACANT",
            GridError::TerrainMismatch { .. } => "GRID_TERRAIN_MISMATCH",
        }
    }
}

/// Errors that occur while assembling or inspecting a [`GameState`](super::GameState).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Unit refers to a team that was never registered.
    #[error("unit {unit} refers to unknown team {team}")]
    UnknownTeam { unit: UnitId, team: TeamId },

    /// Two units share the same identifier.
    #[error("unit {unit} is already deployed")]
    DuplicateUnit { unit: UnitId },

    /// A unit was deployed with no health.
    #[error("unit {unit} cannot be deployed without health")]
    DeadOnArrival { unit: UnitId },

    /// Unit id is not on the field.
    #[error("unit {unit} not found")]
    UnitNotFound { unit: UnitId },

    /// Grid cell and unit record disagree about where a unit stands.
    #[error("occupancy desync for unit {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: Position },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StateError::Grid(error) => error.severity(),
            StateError::UnknownTeam { .. }
            | StateError::DuplicateUnit { .. }
            | StateError::DeadOnArrival { .. }
            | StateError::UnitNotFound { .. } => ErrorSeverity::Validation,
            StateError::OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StateError::Grid(error) => error.error_code(),
            StateError::UnknownTeam { .. } => "STATE_UNKNOWN_TEAM",
            StateError::DuplicateUnit { .. } => "STATE_DUPLICATE_UNIT",
            StateError::DeadOnArrival { .. } => "STATE_DEAD_ON_ARRIVAL",
            StateError::UnitNotFound { .. } => "STATE_UNIT_NOT_FOUND",
            StateError::OccupancyDesync { .. } => "STATE_OCCUPANCY_DESYNC",
        }
    }
}
