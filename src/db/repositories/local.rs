//! In-memory repository implementation.
//!
//! Backs the default `local-repo` feature. All aggregates live in
//! `parking_lot::RwLock`-guarded maps with monotonically assigned ids.
//! Intended for unit tests, integration tests, and local development; data
//! does not survive a restart.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::api::{
    DistributionId, FinancialRecordId, HealthRecordId, InventoryItemId, MenuPlanId,
    ProductionBatchId, QualityCheckId, RecipeId, SchoolId, VehicleId,
};
use crate::db::repository::{
    DistributionRepository, ErrorContext, FinanceRepository, FleetRepository, FullRepository,
    HealthRepository, InventoryRepository, MenuRepository, ProductionRepository, RepositoryError,
    RepositoryResult, SchoolRepository,
};
use crate::models::{
    BatchStatus, Distribution, DistributionStatus, FinancialRecord, HealthRecord, InventoryItem,
    MenuPlan, ProductionBatch, QualityCheck, Recipe, School, Vehicle,
};

/// In-memory repository.
#[derive(Default)]
pub struct LocalRepository {
    next_id: AtomicI64,
    schools: RwLock<BTreeMap<i64, School>>,
    vehicles: RwLock<BTreeMap<i64, Vehicle>>,
    inventory: RwLock<BTreeMap<i64, InventoryItem>>,
    recipes: RwLock<BTreeMap<i64, Recipe>>,
    menu_plans: RwLock<BTreeMap<i64, MenuPlan>>,
    batches: RwLock<BTreeMap<i64, ProductionBatch>>,
    quality_checks: RwLock<BTreeMap<i64, QualityCheck>>,
    distributions: RwLock<BTreeMap<i64, Distribution>>,
    health_records: RwLock<BTreeMap<i64, HealthRecord>>,
    financial_records: RwLock<BTreeMap<i64, FinancialRecord>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn not_found(entity: &str, id: i64, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("{} {} not found", entity, id),
            ErrorContext::new(operation)
                .with_entity(entity)
                .with_entity_id(id),
        )
    }
}

#[async_trait]
impl SchoolRepository for LocalRepository {
    async fn list_schools(&self, include_deleted: bool) -> RepositoryResult<Vec<School>> {
        let schools = self.schools.read();
        Ok(schools
            .values()
            .filter(|s| include_deleted || s.is_active())
            .cloned()
            .collect())
    }

    async fn get_school(&self, id: SchoolId) -> RepositoryResult<School> {
        self.schools
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("school", id.value(), "get_school"))
    }

    async fn create_school(&self, mut school: School) -> RepositoryResult<School> {
        let id = self.allocate_id();
        school.id = Some(SchoolId::new(id));
        self.schools.write().insert(id, school.clone());
        Ok(school)
    }

    async fn update_school(&self, id: SchoolId, mut school: School) -> RepositoryResult<School> {
        let mut schools = self.schools.write();
        if !schools.contains_key(&id.value()) {
            return Err(Self::not_found("school", id.value(), "update_school"));
        }
        school.id = Some(id);
        schools.insert(id.value(), school.clone());
        Ok(school)
    }

    async fn soft_delete_school(&self, id: SchoolId) -> RepositoryResult<()> {
        let mut schools = self.schools.write();
        let school = schools
            .get_mut(&id.value())
            .ok_or_else(|| Self::not_found("school", id.value(), "soft_delete_school"))?;
        school.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl FleetRepository for LocalRepository {
    async fn list_vehicles(&self) -> RepositoryResult<Vec<Vehicle>> {
        Ok(self.vehicles.read().values().cloned().collect())
    }

    async fn get_vehicle(&self, id: VehicleId) -> RepositoryResult<Vehicle> {
        self.vehicles
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("vehicle", id.value(), "get_vehicle"))
    }

    async fn create_vehicle(&self, mut vehicle: Vehicle) -> RepositoryResult<Vehicle> {
        let duplicate = self
            .vehicles
            .read()
            .values()
            .any(|v| v.plate_number == vehicle.plate_number);
        if duplicate {
            return Err(RepositoryError::conflict(format!(
                "vehicle with plate {} already exists",
                vehicle.plate_number
            ))
            .with_operation("create_vehicle"));
        }
        let id = self.allocate_id();
        vehicle.id = Some(VehicleId::new(id));
        self.vehicles.write().insert(id, vehicle.clone());
        Ok(vehicle)
    }
}

#[async_trait]
impl InventoryRepository for LocalRepository {
    async fn list_inventory_items(&self) -> RepositoryResult<Vec<InventoryItem>> {
        Ok(self.inventory.read().values().cloned().collect())
    }

    async fn get_inventory_item(&self, id: InventoryItemId) -> RepositoryResult<InventoryItem> {
        self.inventory
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("inventory_item", id.value(), "get_inventory_item"))
    }

    async fn create_inventory_item(
        &self,
        mut item: InventoryItem,
    ) -> RepositoryResult<InventoryItem> {
        let id = self.allocate_id();
        item.id = Some(InventoryItemId::new(id));
        self.inventory.write().insert(id, item.clone());
        Ok(item)
    }

    async fn update_inventory_item(
        &self,
        id: InventoryItemId,
        mut item: InventoryItem,
    ) -> RepositoryResult<InventoryItem> {
        let mut inventory = self.inventory.write();
        if !inventory.contains_key(&id.value()) {
            return Err(Self::not_found(
                "inventory_item",
                id.value(),
                "update_inventory_item",
            ));
        }
        item.id = Some(id);
        inventory.insert(id.value(), item.clone());
        Ok(item)
    }

    async fn delete_inventory_item(&self, id: InventoryItemId) -> RepositoryResult<()> {
        self.inventory
            .write()
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| Self::not_found("inventory_item", id.value(), "delete_inventory_item"))
    }
}

#[async_trait]
impl MenuRepository for LocalRepository {
    async fn list_recipes(&self) -> RepositoryResult<Vec<Recipe>> {
        Ok(self.recipes.read().values().cloned().collect())
    }

    async fn get_recipe(&self, id: RecipeId) -> RepositoryResult<Recipe> {
        self.recipes
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("recipe", id.value(), "get_recipe"))
    }

    async fn create_recipe(&self, mut recipe: Recipe) -> RepositoryResult<Recipe> {
        let id = self.allocate_id();
        recipe.id = Some(RecipeId::new(id));
        self.recipes.write().insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn list_menu_plans(&self) -> RepositoryResult<Vec<MenuPlan>> {
        Ok(self.menu_plans.read().values().cloned().collect())
    }

    async fn create_menu_plan(&self, mut plan: MenuPlan) -> RepositoryResult<MenuPlan> {
        let id = self.allocate_id();
        plan.id = Some(MenuPlanId::new(id));
        self.menu_plans.write().insert(id, plan.clone());
        Ok(plan)
    }

    async fn find_menu_plan_by_checksum(
        &self,
        checksum: &str,
    ) -> RepositoryResult<Option<MenuPlan>> {
        Ok(self
            .menu_plans
            .read()
            .values()
            .find(|p| p.checksum == checksum)
            .cloned())
    }
}

#[async_trait]
impl ProductionRepository for LocalRepository {
    async fn list_batches(&self) -> RepositoryResult<Vec<ProductionBatch>> {
        Ok(self.batches.read().values().cloned().collect())
    }

    async fn get_batch(&self, id: ProductionBatchId) -> RepositoryResult<ProductionBatch> {
        self.batches
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("production_batch", id.value(), "get_batch"))
    }

    async fn create_batch(&self, mut batch: ProductionBatch) -> RepositoryResult<ProductionBatch> {
        let id = self.allocate_id();
        batch.id = Some(ProductionBatchId::new(id));
        self.batches.write().insert(id, batch.clone());
        Ok(batch)
    }

    async fn update_batch_status(
        &self,
        id: ProductionBatchId,
        status: BatchStatus,
        produced_portions: Option<i32>,
    ) -> RepositoryResult<ProductionBatch> {
        let mut batches = self.batches.write();
        let batch = batches
            .get_mut(&id.value())
            .ok_or_else(|| Self::not_found("production_batch", id.value(), "update_batch_status"))?;
        batch.status = status;
        if produced_portions.is_some() {
            batch.produced_portions = produced_portions;
        }
        Ok(batch.clone())
    }

    async fn add_quality_check(&self, mut check: QualityCheck) -> RepositoryResult<QualityCheck> {
        if !self.batches.read().contains_key(&check.batch_id.value()) {
            return Err(Self::not_found(
                "production_batch",
                check.batch_id.value(),
                "add_quality_check",
            ));
        }
        let id = self.allocate_id();
        check.id = Some(QualityCheckId::new(id));
        self.quality_checks.write().insert(id, check.clone());
        Ok(check)
    }

    async fn list_quality_checks(
        &self,
        batch_id: ProductionBatchId,
    ) -> RepositoryResult<Vec<QualityCheck>> {
        Ok(self
            .quality_checks
            .read()
            .values()
            .filter(|c| c.batch_id == batch_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DistributionRepository for LocalRepository {
    async fn list_distributions(&self) -> RepositoryResult<Vec<Distribution>> {
        Ok(self.distributions.read().values().cloned().collect())
    }

    async fn get_distribution(&self, id: DistributionId) -> RepositoryResult<Distribution> {
        self.distributions
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("distribution", id.value(), "get_distribution"))
    }

    async fn create_distribution(
        &self,
        mut distribution: Distribution,
    ) -> RepositoryResult<Distribution> {
        // Referenced schools must exist and be active.
        {
            let schools = self.schools.read();
            for stop in &distribution.stops {
                match schools.get(&stop.school_id.value()) {
                    Some(school) if school.is_active() => {}
                    _ => {
                        return Err(RepositoryError::validation(format!(
                            "stop references unknown or inactive school {}",
                            stop.school_id
                        ))
                        .with_operation("create_distribution"));
                    }
                }
            }
        }
        let id = self.allocate_id();
        distribution.id = Some(DistributionId::new(id));
        self.distributions.write().insert(id, distribution.clone());
        Ok(distribution)
    }

    async fn update_distribution_status(
        &self,
        id: DistributionId,
        status: DistributionStatus,
    ) -> RepositoryResult<Distribution> {
        let mut distributions = self.distributions.write();
        let distribution = distributions.get_mut(&id.value()).ok_or_else(|| {
            Self::not_found("distribution", id.value(), "update_distribution_status")
        })?;
        distribution.status = status;
        Ok(distribution.clone())
    }
}

#[async_trait]
impl HealthRepository for LocalRepository {
    async fn list_health_records(&self) -> RepositoryResult<Vec<HealthRecord>> {
        Ok(self.health_records.read().values().cloned().collect())
    }

    async fn get_health_record(&self, id: HealthRecordId) -> RepositoryResult<HealthRecord> {
        self.health_records
            .read()
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::not_found("health_record", id.value(), "get_health_record"))
    }

    async fn create_health_record(
        &self,
        mut record: HealthRecord,
    ) -> RepositoryResult<HealthRecord> {
        let id = self.allocate_id();
        record.id = Some(HealthRecordId::new(id));
        self.health_records.write().insert(id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl FinanceRepository for LocalRepository {
    async fn list_financial_records(&self) -> RepositoryResult<Vec<FinancialRecord>> {
        Ok(self.financial_records.read().values().cloned().collect())
    }

    async fn create_financial_record(
        &self,
        mut record: FinancialRecord,
    ) -> RepositoryResult<FinancialRecord> {
        let id = self.allocate_id();
        record.id = Some(FinancialRecordId::new(id));
        self.financial_records.write().insert(id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
