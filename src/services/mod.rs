//! Service layer for business logic and orchestration.
//!
//! This module sits between the HTTP handlers and the repository layer.
//! The pure computations (route planning, growth scoring, nutrition
//! aggregation) take plain inputs and never touch the database; the
//! summary services orchestrate repository calls.

pub mod dashboard;

pub mod finance;

pub mod growth;

pub mod nutrition;

pub mod route_planner;

pub use dashboard::compute_dashboard_summary;
pub use finance::compute_finance_summary;
pub use growth::{assess_growth, GrowthInputError};
pub use nutrition::{aggregate_ingredients, compute_recipe_nutrition, NutritionError};
pub use route_planner::plan_route;
