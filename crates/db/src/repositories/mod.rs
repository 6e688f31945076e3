//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod application_repo;
pub mod lead_repo;
pub mod task_repo;
pub mod team_repo;

pub use application_repo::ApplicationRepo;
pub use lead_repo::LeadRepo;
pub use task_repo::TaskRepo;
pub use team_repo::TeamRepo;
