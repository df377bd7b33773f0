//! Repository trait definitions.
//!
//! One trait per aggregate, combined into [`FullRepository`] so the
//! application can hold a single `Arc<dyn FullRepository>`. Implementations
//! must be `Send + Sync`; see [`crate::db::repositories`] for the in-memory
//! and Postgres backends.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{
    DistributionId, HealthRecordId, InventoryItemId, ProductionBatchId, RecipeId, SchoolId,
    VehicleId,
};
use crate::models::{
    BatchStatus, Distribution, DistributionStatus, FinancialRecord, HealthRecord, InventoryItem,
    MenuPlan, ProductionBatch, QualityCheck, Recipe, School, Vehicle,
};

/// Repository operations for schools.
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// List schools. Soft-deleted schools are included only when
    /// `include_deleted` is set.
    async fn list_schools(&self, include_deleted: bool) -> RepositoryResult<Vec<School>>;

    async fn get_school(&self, id: SchoolId) -> RepositoryResult<School>;

    /// Insert a school and return it with its assigned id.
    async fn create_school(&self, school: School) -> RepositoryResult<School>;

    /// Replace the mutable fields of a school.
    async fn update_school(&self, id: SchoolId, school: School) -> RepositoryResult<School>;

    /// Soft-delete a school by setting its `deleted_at` marker.
    async fn soft_delete_school(&self, id: SchoolId) -> RepositoryResult<()>;
}

/// Repository operations for delivery vehicles.
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn list_vehicles(&self) -> RepositoryResult<Vec<Vehicle>>;

    async fn get_vehicle(&self, id: VehicleId) -> RepositoryResult<Vehicle>;

    async fn create_vehicle(&self, vehicle: Vehicle) -> RepositoryResult<Vehicle>;
}

/// Repository operations for warehouse inventory.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn list_inventory_items(&self) -> RepositoryResult<Vec<InventoryItem>>;

    async fn get_inventory_item(&self, id: InventoryItemId) -> RepositoryResult<InventoryItem>;

    async fn create_inventory_item(&self, item: InventoryItem) -> RepositoryResult<InventoryItem>;

    async fn update_inventory_item(
        &self,
        id: InventoryItemId,
        item: InventoryItem,
    ) -> RepositoryResult<InventoryItem>;

    async fn delete_inventory_item(&self, id: InventoryItemId) -> RepositoryResult<()>;
}

/// Repository operations for recipes and menu plans.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn list_recipes(&self) -> RepositoryResult<Vec<Recipe>>;

    async fn get_recipe(&self, id: RecipeId) -> RepositoryResult<Recipe>;

    async fn create_recipe(&self, recipe: Recipe) -> RepositoryResult<Recipe>;

    async fn list_menu_plans(&self) -> RepositoryResult<Vec<MenuPlan>>;

    async fn create_menu_plan(&self, plan: MenuPlan) -> RepositoryResult<MenuPlan>;

    /// Look up a menu plan by payload checksum (duplicate detection).
    async fn find_menu_plan_by_checksum(
        &self,
        checksum: &str,
    ) -> RepositoryResult<Option<MenuPlan>>;
}

/// Repository operations for production batches and quality checks.
#[async_trait]
pub trait ProductionRepository: Send + Sync {
    async fn list_batches(&self) -> RepositoryResult<Vec<ProductionBatch>>;

    async fn get_batch(&self, id: ProductionBatchId) -> RepositoryResult<ProductionBatch>;

    async fn create_batch(&self, batch: ProductionBatch) -> RepositoryResult<ProductionBatch>;

    /// Set the batch status, optionally recording the produced portion count.
    async fn update_batch_status(
        &self,
        id: ProductionBatchId,
        status: BatchStatus,
        produced_portions: Option<i32>,
    ) -> RepositoryResult<ProductionBatch>;

    async fn add_quality_check(&self, check: QualityCheck) -> RepositoryResult<QualityCheck>;

    async fn list_quality_checks(
        &self,
        batch_id: ProductionBatchId,
    ) -> RepositoryResult<Vec<QualityCheck>>;
}

/// Repository operations for distribution runs.
#[async_trait]
pub trait DistributionRepository: Send + Sync {
    async fn list_distributions(&self) -> RepositoryResult<Vec<Distribution>>;

    async fn get_distribution(&self, id: DistributionId) -> RepositoryResult<Distribution>;

    async fn create_distribution(
        &self,
        distribution: Distribution,
    ) -> RepositoryResult<Distribution>;

    async fn update_distribution_status(
        &self,
        id: DistributionId,
        status: DistributionStatus,
    ) -> RepositoryResult<Distribution>;
}

/// Repository operations for posyandu health records.
#[async_trait]
pub trait HealthRepository: Send + Sync {
    async fn list_health_records(&self) -> RepositoryResult<Vec<HealthRecord>>;

    async fn get_health_record(&self, id: HealthRecordId) -> RepositoryResult<HealthRecord>;

    async fn create_health_record(&self, record: HealthRecord) -> RepositoryResult<HealthRecord>;
}

/// Repository operations for the financial ledger.
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn list_financial_records(&self) -> RepositoryResult<Vec<FinancialRecord>>;

    async fn create_financial_record(
        &self,
        record: FinancialRecord,
    ) -> RepositoryResult<FinancialRecord>;
}

/// The combined repository interface held by the application.
#[async_trait]
pub trait FullRepository:
    SchoolRepository
    + FleetRepository
    + InventoryRepository
    + MenuRepository
    + ProductionRepository
    + DistributionRepository
    + HealthRepository
    + FinanceRepository
{
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
