//! Fitness Planner Shared Library
//!
//! This crate contains the calorie/macro target calculator together with the
//! strict profile types, boundary validation and API types used across the
//! backend and WASM modules. Every caller that needs targets goes through
//! [`compute_macro_targets`]; nothing else in the workspace re-derives BMR or
//! TDEE.

pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod nutrition;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use nutrition::*;
pub use types::*;

pub use models::{PlanType, TaskType};
