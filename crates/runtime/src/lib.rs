//! Async shell around the wasteland engine.
//!
//! The engine itself is synchronous; this crate hosts it in a tokio task,
//! paces its frame loop, routes its events to topic channels and stores
//! session snapshots. Consumers embed [`Runtime`] and talk to the session
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`repository`] stores and loads snapshots
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, Topic};
pub use repository::{
    FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
