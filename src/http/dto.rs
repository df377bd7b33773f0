//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies are dedicated types so server-assigned fields (ids, codes,
//! statuses, checksums) never appear in client payloads. Response types are
//! mostly the domain records and the DTOs re-exported from `crate::api`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{RecipeId, SchoolId, VehicleId};
use crate::models::{BatchStatus, DistributionStatus, DistributionStop, RecipeIngredient, Sex};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    AssessGrowthRequest, CategoryTotal, DashboardSummary, FinanceSummary, GrowthAssessment,
    OptimizeRoutesRequest, Page, PageQuery, RecipeNutrition, RoutePlan,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Request body for creating or updating a school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolPayload {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub student_count: i32,
}

/// Query parameters for `GET /v1/schools`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSchoolsQuery {
    /// Include soft-deleted schools (default false).
    #[serde(default)]
    pub include_deleted: Option<bool>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl ListSchoolsQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Request body for registering a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    pub plate_number: String,
    pub kind: String,
    pub capacity_portions: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Request body for creating or updating an inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemPayload {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: f64,
    pub minimum_stock: f64,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Request body for creating a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub portion_yield: i32,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Request body for creating a menu plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuPlanRequest {
    pub menu_date: NaiveDate,
    pub recipe_ids: Vec<RecipeId>,
}

/// Request body for creating a production batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub batch_date: NaiveDate,
    pub recipe_id: RecipeId,
    pub planned_portions: i32,
}

/// Request body for advancing a batch through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBatchStatusRequest {
    pub status: BatchStatus,
    /// Only accepted together with `COMPLETED`.
    #[serde(default)]
    pub produced_portions: Option<i32>,
}

/// Request body for recording a quality check against a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQualityCheckRequest {
    pub check_type: String,
    pub passed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One requested delivery stop. The visiting order is assigned server-side
/// from the submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionStopInput {
    pub school_id: SchoolId,
    pub planned_portions: i32,
}

impl DistributionStopInput {
    pub fn into_stop(self) -> DistributionStop {
        DistributionStop {
            school_id: self.school_id,
            planned_portions: self.planned_portions,
            sequence: 0,
        }
    }
}

/// Request body for scheduling a distribution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDistributionRequest {
    pub distribution_date: NaiveDate,
    #[serde(default)]
    pub vehicle_id: Option<VehicleId>,
    pub driver_name: String,
    pub stops: Vec<DistributionStopInput>,
}

/// Request body for advancing a distribution through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDistributionStatusRequest {
    pub status: DistributionStatus,
}

/// Request body for storing a posyandu measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealthRecordRequest {
    pub posyandu_name: String,
    pub child_name: String,
    pub sex: Sex,
    pub age_months: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub measured_at: NaiveDate,
}

/// Request body for adding a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFinancialRecordRequest {
    pub record_date: NaiveDate,
    pub kind: crate::models::FinanceKind,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}
