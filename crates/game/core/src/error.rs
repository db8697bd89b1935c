//! Common error infrastructure for game-core.
//!
//! Domain errors (`MoveError`, `CombatError`, `TransitionError`, ...) live
//! next to the component that raises them. They all implement [`GameError`]
//! so callers can classify a rejection without matching every variant.
//!
//! Every rejection leaves state untouched; the engine facade turns them into
//! logged no-ops.

/// Severity level of an error, used for logging and recovery decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Worth retrying later or from elsewhere.
    ///
    /// Examples: wall in the way, no arrival tile found.
    Recoverable,

    /// Invalid input, retrying unchanged fails the same way.
    ///
    /// Examples: unknown skill id, target index out of range.
    Validation,

    /// State inconsistency that indicates a bug.
    ///
    /// Examples: combat turn pointing at a missing participant.
    Internal,
}

impl ErrorSeverity {
    /// Whether the error points at a bug rather than at the request.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
