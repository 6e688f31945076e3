//! Pure domain logic for the leadflow CRM data layer.
//!
//! Nothing in this crate performs I/O. The database and HTTP crates call
//! into these modules to decide who may see or change a row, to validate
//! task-creation input, and to compute dashboard time windows.

pub mod access;
pub mod error;
pub mod roles;
pub mod schedule;
pub mod task;
pub mod types;
pub mod validation;
