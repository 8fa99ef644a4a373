//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the text generators.

pub mod meals;
pub mod plans;
pub mod profile;
pub mod targets;
pub mod tasks;

pub use meals::MealService;
pub use plans::PlanService;
pub use profile::ProfileService;
pub use targets::TargetService;
pub use tasks::TaskService;
