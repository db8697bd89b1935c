//! Exploration-side components: grid queries, movement, fog of war, camera,
//! the departed-map cache and edge transitions.
//!
//! Each component borrows only the parts of [`crate::state::GameState`] it
//! mutates; the engine does the wiring.
pub mod cache;
pub mod camera;
pub mod grid;
pub mod movement;
pub mod transition;
pub mod visibility;

pub use cache::MapCache;
pub use camera::Camera;
pub use movement::{HeldKeys, MoveError, MoveOutcome};
pub use transition::{
    Arrival, DwellSignal, MapSwitch, SwitchContext, TransitionError, TransitionPhase,
    TransitionState,
};
pub use visibility::{VisibilityReport, VisibilityState};
