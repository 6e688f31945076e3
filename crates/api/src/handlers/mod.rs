pub mod applications;
pub mod create_task;
pub mod dashboard;
pub mod leads;
pub mod tasks;
pub mod teams;
