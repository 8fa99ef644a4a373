//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod plans;
pub mod profile;
pub mod tasks;

pub use plans::{CreatePlan, PlanRecord, PlanRepository};
pub use profile::{ProfileRecord, ProfileRepository, UpdateProfile};
pub use tasks::{CreateTask, TaskRecord, TaskRepository};
