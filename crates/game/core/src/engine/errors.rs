//! Errors surfaced by the game engine.

use crate::combat::CombatError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GridError, InventoryError, StateError, TeamId};

use super::ActionChoice;

/// Errors surfaced while driving the battle through the engine.
///
/// A failed call leaves the state as it was before the call, except for
/// selection resets noted on the individual operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    State(#[from] StateError),

    /// The battle already has a winner; no further input is accepted.
    #[error("battle is over, {winner} won")]
    GameOver { winner: TeamId },

    /// The call needs a selected unit.
    #[error("no unit is selected")]
    NoActiveSelection,

    /// The call needs the action menu to be open.
    #[error("action menu is not open")]
    MenuNotOpen,

    #[error("menu does not offer {choice}")]
    ChoiceUnavailable { choice: ActionChoice },
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Grid(error) => error.severity(),
            EngineError::Combat(error) => error.severity(),
            EngineError::Inventory(error) => error.severity(),
            EngineError::State(error) => error.severity(),
            EngineError::GameOver { .. } => ErrorSeverity::Recoverable,
            EngineError::NoActiveSelection
            | EngineError::MenuNotOpen
            | EngineError::ChoiceUnavailable { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::Grid(error) => error.error_code(),
            EngineError::Combat(error) => error.error_code(),
            EngineError::Inventory(error) => error.error_code(),
            EngineError::State(error) => error.error_code(),
            EngineError::GameOver { .. } => "ENGINE_GAME_OVER",
            EngineError::NoActiveSelection => "ENGINE_NO_ACTIVE_SELECTION",
            EngineError::MenuNotOpen => "ENGINE_MENU_NOT_OPEN",
            EngineError::ChoiceUnavailable { .. } => "ENGINE_CHOICE_UNAVAILABLE",
        }
    }
}
