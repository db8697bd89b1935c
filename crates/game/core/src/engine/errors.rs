//! Error type for engine commands.

use crate::combat::CombatError;
use crate::dev::DevError;
use crate::dialogue::DialogueError;
use crate::error::{ErrorSeverity, GameError};
use crate::mode::GameMode;
use crate::world::{MoveError, TransitionError};

use super::timers::SchedulerFull;

/// Errors surfaced by [`super::GameEngine`] commands.
///
/// A command that returns an error has left the state untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("move rejected: {0}")]
    Move(#[from] MoveError),

    #[error("transition failed: {0}")]
    Transition(#[from] TransitionError),

    #[error("combat action rejected: {0}")]
    Combat(#[from] CombatError),

    #[error("dialogue rejected: {0}")]
    Dialogue(#[from] DialogueError),

    #[error("dev tool rejected: {0}")]
    Dev(#[from] DevError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerFull),

    #[error("'{command}' is not available in {mode} mode")]
    ModeLocked {
        mode: GameMode,
        command: &'static str,
    },

    #[error("nothing to interact with here")]
    NothingToInteract,

    #[error("item '{0}' is not in the inventory")]
    UnknownItem(String),

    #[error("item '{0}' cannot be used")]
    NotConsumable(String),
}

impl EngineError {
    pub(crate) fn mode_locked(mode: GameMode, command: &'static str) -> Self {
        Self::ModeLocked { mode, command }
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Move(inner) => inner.severity(),
            Self::Transition(inner) => inner.severity(),
            Self::Combat(inner) => inner.severity(),
            Self::Dialogue(inner) => inner.severity(),
            Self::Dev(inner) => inner.severity(),
            Self::Scheduler(_) => ErrorSeverity::Internal,
            Self::NothingToInteract => ErrorSeverity::Recoverable,
            Self::ModeLocked { .. } | Self::UnknownItem(_) | Self::NotConsumable(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Move(inner) => inner.error_code(),
            Self::Transition(inner) => inner.error_code(),
            Self::Combat(inner) => inner.error_code(),
            Self::Dialogue(inner) => inner.error_code(),
            Self::Dev(inner) => inner.error_code(),
            Self::Scheduler(_) => "ENGINE_SCHEDULER_FULL",
            Self::ModeLocked { .. } => "ENGINE_MODE_LOCKED",
            Self::NothingToInteract => "ENGINE_NOTHING_TO_INTERACT",
            Self::UnknownItem(_) => "ENGINE_UNKNOWN_ITEM",
            Self::NotConsumable(_) => "ENGINE_NOT_CONSUMABLE",
        }
    }
}
