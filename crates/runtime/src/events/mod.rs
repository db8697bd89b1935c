//! Topic-based event bus for runtime events.
//!
//! Engine events are routed to topics so consumers subscribe only to what
//! they render: the state feed, world notifications, combat, dialogue or
//! rejected commands.

mod bus;

pub use bus::{Event, EventBus, Topic};
