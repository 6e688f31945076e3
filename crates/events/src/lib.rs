//! Leadflow event bus.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the canonical domain event envelope.
//! - [`task_created`] -- constructor for the notification published after a
//!   task is inserted.

pub mod bus;
pub mod topics;

pub use bus::{EventBus, PlatformEvent};
pub use topics::{task_created, TASK_CREATED};
