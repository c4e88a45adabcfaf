//! Severity classification shared by every error in the crate.
//!
//! `GridError`, `CombatError` and the rest live next to the operations that
//! raise them and implement [`GameError`].

/// How a host should react to a rejected input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Another input may succeed (occupied destination, battle over).
    Recoverable,
    /// Malformed input such as an out-of-bounds cell or unknown unit.
    Validation,
    /// Occupancy map and unit table disagree.
    Internal,
    /// Broken call contract: combat with a dead or already played unit.
    /// The action is aborted before any mutation.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Whether the error points at a bug rather than bad player input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error enum in the crate.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, e.g. `COMBAT_SELF_TARGET`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
