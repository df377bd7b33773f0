//! Public API surface for the backend.
//!
//! This file consolidates the typed identifiers and re-exports the DTO types
//! used by the HTTP API. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::routes::dashboard::DashboardSummary;
pub use crate::routes::finance::CategoryTotal;
pub use crate::routes::finance::FinanceSummary;
pub use crate::routes::logistics::OptimizeRoutesRequest;
pub use crate::routes::logistics::OrderingPolicy;
pub use crate::routes::logistics::RouteDestination;
pub use crate::routes::logistics::RoutePlan;
pub use crate::routes::logistics::RouteStop;
pub use crate::routes::nutrition::IngredientInput;
pub use crate::routes::nutrition::NutritionTotals;
pub use crate::routes::nutrition::RecipeNutrition;
pub use crate::routes::pagination::Page;
pub use crate::routes::pagination::PageQuery;
pub use crate::routes::posyandu::AssessGrowthRequest;
pub use crate::routes::posyandu::GrowthAssessment;

use crate::define_id_type;

define_id_type!(i64, SchoolId);
define_id_type!(i64, VehicleId);
define_id_type!(i64, InventoryItemId);
define_id_type!(i64, RecipeId);
define_id_type!(i64, MenuPlanId);
define_id_type!(i64, ProductionBatchId);
define_id_type!(i64, QualityCheckId);
define_id_type!(i64, DistributionId);
define_id_type!(i64, HealthRecordId);
define_id_type!(i64, FinancialRecordId);
