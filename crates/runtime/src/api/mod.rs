//! Public runtime API surface.
//!
//! Types exposed to consumers of the runtime crate live here so the rest of
//! the crate can stay focused on orchestration and workers.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
