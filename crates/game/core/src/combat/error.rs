//! Contract violations when starting an exchange.

use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitId;

/// Raised before any state is touched; the exchange does not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("unit {unit} is not on the field")]
    UnitNotFound { unit: UnitId },

    #[error("unit {unit} cannot attack itself")]
    SelfTarget { unit: UnitId },

    #[error("unit {unit} has already played this turn")]
    AlreadyPlayed { unit: UnitId },

    #[error("unit {unit} is dead")]
    UnitDead { unit: UnitId },
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::UnitNotFound { .. } => "COMBAT_UNIT_NOT_FOUND",
            CombatError::SelfTarget { .. } => "COMBAT_SELF_TARGET",
            CombatError::AlreadyPlayed { .. } => "COMBAT_ALREADY_PLAYED",
            CombatError::UnitDead { .. } => "COMBAT_UNIT_DEAD",
        }
    }
}
