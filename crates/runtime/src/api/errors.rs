//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, catalog failures, snapshot storage and worker
//! coordination so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::engine::UnboundKey;
use game_core::{CatalogError, EngineError, GameError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine refused the command; the session state is unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    UnboundKey(#[from] UnboundKey),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no snapshot repository configured")]
    NoRepository,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Whether the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(err) => !err.severity().is_internal(),
            Self::UnboundKey(_) => true,
            _ => false,
        }
    }

    /// Stable code for engine rejections.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Engine(err) => Some(err.error_code()),
            _ => None,
        }
    }
}
