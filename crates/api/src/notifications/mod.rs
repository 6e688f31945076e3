//! Event-bus subscribers that push to realtime clients.
//!
//! The [`TaskFeed`] forwards `task.created` events to every realtime
//! connection of the event's tenant.

pub mod task_feed;

pub use task_feed::TaskFeed;
