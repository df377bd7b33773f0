//! High-level business logic over the repository traits.
//!
//! These functions are what the HTTP handlers call. They validate input,
//! enforce the status lifecycles, compute derived values (checksums, growth
//! assessments, distribution codes) and delegate storage to the repository.
//! All functions are generic over the repository so they work with any
//! backend, including `&dyn FullRepository`.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::checksum::calculate_checksum;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::api::{
    AssessGrowthRequest, DistributionId, HealthRecordId, InventoryItemId, ProductionBatchId,
    RecipeId, RecipeNutrition, SchoolId, VehicleId,
};
use crate::models::{
    BatchStatus, Distribution, DistributionStatus, DistributionStop, FinancialRecord,
    HealthRecord, InventoryItem, MenuPlan, ProductionBatch, QualityCheck, Recipe, School, Vehicle,
};
use crate::services::{assess_growth, compute_recipe_nutrition};

/// Verify the repository backend is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Schools ====================

fn validate_school(school: &School) -> RepositoryResult<()> {
    if school.name.trim().is_empty() {
        return Err(RepositoryError::validation("school name must not be empty"));
    }
    if !(-90.0..=90.0).contains(&school.latitude) {
        return Err(RepositoryError::validation(format!(
            "latitude {} out of range",
            school.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&school.longitude) {
        return Err(RepositoryError::validation(format!(
            "longitude {} out of range",
            school.longitude
        )));
    }
    if school.student_count < 0 {
        return Err(RepositoryError::validation(
            "student count must not be negative",
        ));
    }
    Ok(())
}

pub async fn list_schools<R: FullRepository + ?Sized>(
    repo: &R,
    include_deleted: bool,
) -> RepositoryResult<Vec<School>> {
    repo.list_schools(include_deleted).await
}

pub async fn get_school<R: FullRepository + ?Sized>(
    repo: &R,
    id: SchoolId,
) -> RepositoryResult<School> {
    repo.get_school(id).await
}

pub async fn create_school<R: FullRepository + ?Sized>(
    repo: &R,
    school: School,
) -> RepositoryResult<School> {
    validate_school(&school)?;
    repo.create_school(School {
        id: None,
        deleted_at: None,
        ..school
    })
    .await
}

pub async fn update_school<R: FullRepository + ?Sized>(
    repo: &R,
    id: SchoolId,
    school: School,
) -> RepositoryResult<School> {
    validate_school(&school)?;
    repo.update_school(id, school).await
}

pub async fn delete_school<R: FullRepository + ?Sized>(
    repo: &R,
    id: SchoolId,
) -> RepositoryResult<()> {
    repo.soft_delete_school(id).await
}

// ==================== Vehicles ====================

pub async fn list_vehicles<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Vehicle>> {
    repo.list_vehicles().await
}

pub async fn create_vehicle<R: FullRepository + ?Sized>(
    repo: &R,
    vehicle: Vehicle,
) -> RepositoryResult<Vehicle> {
    if vehicle.plate_number.trim().is_empty() {
        return Err(RepositoryError::validation("plate number must not be empty"));
    }
    if vehicle.capacity_portions <= 0 {
        return Err(RepositoryError::validation(
            "vehicle capacity must be positive",
        ));
    }
    repo.create_vehicle(Vehicle {
        id: None,
        ..vehicle
    })
    .await
}

pub async fn get_vehicle<R: FullRepository + ?Sized>(
    repo: &R,
    id: VehicleId,
) -> RepositoryResult<Vehicle> {
    repo.get_vehicle(id).await
}

// ==================== Inventory ====================

fn validate_inventory_item(item: &InventoryItem) -> RepositoryResult<()> {
    if item.name.trim().is_empty() {
        return Err(RepositoryError::validation("item name must not be empty"));
    }
    if item.quantity < 0.0 || item.minimum_stock < 0.0 {
        return Err(RepositoryError::validation(
            "stock quantities must not be negative",
        ));
    }
    Ok(())
}

pub async fn list_inventory_items<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<InventoryItem>> {
    repo.list_inventory_items().await
}

pub async fn create_inventory_item<R: FullRepository + ?Sized>(
    repo: &R,
    item: InventoryItem,
) -> RepositoryResult<InventoryItem> {
    validate_inventory_item(&item)?;
    repo.create_inventory_item(InventoryItem { id: None, ..item })
        .await
}

pub async fn get_inventory_item<R: FullRepository + ?Sized>(
    repo: &R,
    id: InventoryItemId,
) -> RepositoryResult<InventoryItem> {
    repo.get_inventory_item(id).await
}

pub async fn update_inventory_item<R: FullRepository + ?Sized>(
    repo: &R,
    id: InventoryItemId,
    item: InventoryItem,
) -> RepositoryResult<InventoryItem> {
    validate_inventory_item(&item)?;
    repo.update_inventory_item(id, item).await
}

pub async fn delete_inventory_item<R: FullRepository + ?Sized>(
    repo: &R,
    id: InventoryItemId,
) -> RepositoryResult<()> {
    repo.delete_inventory_item(id).await
}

/// Items at or below their reorder threshold.
pub async fn list_low_stock_items<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<InventoryItem>> {
    let items = repo.list_inventory_items().await?;
    Ok(items.into_iter().filter(|i| i.is_low_stock()).collect())
}

// ==================== Recipes & menu plans ====================

pub async fn list_recipes<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Recipe>> {
    repo.list_recipes().await
}

pub async fn get_recipe<R: FullRepository + ?Sized>(
    repo: &R,
    id: RecipeId,
) -> RepositoryResult<Recipe> {
    repo.get_recipe(id).await
}

pub async fn create_recipe<R: FullRepository + ?Sized>(
    repo: &R,
    recipe: Recipe,
) -> RepositoryResult<Recipe> {
    if recipe.name.trim().is_empty() {
        return Err(RepositoryError::validation("recipe name must not be empty"));
    }
    if recipe.portion_yield <= 0 {
        return Err(RepositoryError::validation(
            "recipe portion yield must be positive",
        ));
    }
    if recipe.ingredients.iter().any(|i| i.grams < 0.0) {
        return Err(RepositoryError::validation(
            "ingredient quantities must not be negative",
        ));
    }
    repo.create_recipe(Recipe { id: None, ..recipe }).await
}

/// Compute the nutrition summary for a stored recipe.
pub async fn get_recipe_nutrition<R: FullRepository + ?Sized>(
    repo: &R,
    id: RecipeId,
) -> RepositoryResult<RecipeNutrition> {
    let recipe = repo.get_recipe(id).await?;
    compute_recipe_nutrition(&recipe)
        .map_err(|e| RepositoryError::validation(e.to_string()).with_operation("recipe_nutrition"))
}

/// Canonical serialization used for the menu-plan checksum.
#[derive(Serialize)]
struct MenuPlanDigest<'a> {
    menu_date: NaiveDate,
    recipe_ids: &'a [RecipeId],
}

pub async fn list_menu_plans<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<MenuPlan>> {
    repo.list_menu_plans().await
}

/// Create a menu plan. Submitting the same date with the same recipe set is
/// rejected as a duplicate via the payload checksum.
pub async fn create_menu_plan<R: FullRepository + ?Sized>(
    repo: &R,
    menu_date: NaiveDate,
    mut recipe_ids: Vec<RecipeId>,
) -> RepositoryResult<MenuPlan> {
    if recipe_ids.is_empty() {
        return Err(RepositoryError::validation(
            "menu plan must reference at least one recipe",
        ));
    }
    for &recipe_id in &recipe_ids {
        // Surfaces a NotFound for dangling references before storing.
        repo.get_recipe(recipe_id).await?;
    }
    recipe_ids.sort();
    recipe_ids.dedup();

    let digest = MenuPlanDigest {
        menu_date,
        recipe_ids: &recipe_ids,
    };
    let payload = serde_json::to_string(&digest)
        .map_err(|e| RepositoryError::internal(format!("checksum serialization failed: {}", e)))?;
    let checksum = calculate_checksum(&payload);

    if let Some(existing) = repo.find_menu_plan_by_checksum(&checksum).await? {
        return Err(RepositoryError::conflict(format!(
            "menu plan already exists (id {})",
            existing.id.map(|id| id.value()).unwrap_or_default()
        ))
        .with_operation("create_menu_plan"));
    }

    repo.create_menu_plan(MenuPlan {
        id: None,
        menu_date,
        recipe_ids,
        checksum,
    })
    .await
}

// ==================== Production ====================

pub async fn list_batches<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ProductionBatch>> {
    repo.list_batches().await
}

pub async fn get_batch<R: FullRepository + ?Sized>(
    repo: &R,
    id: ProductionBatchId,
) -> RepositoryResult<ProductionBatch> {
    repo.get_batch(id).await
}

pub async fn create_batch<R: FullRepository + ?Sized>(
    repo: &R,
    batch_date: NaiveDate,
    recipe_id: RecipeId,
    planned_portions: i32,
) -> RepositoryResult<ProductionBatch> {
    if planned_portions <= 0 {
        return Err(RepositoryError::validation(
            "planned portions must be positive",
        ));
    }
    repo.get_recipe(recipe_id).await?;

    repo.create_batch(ProductionBatch {
        id: None,
        batch_date,
        recipe_id,
        planned_portions,
        produced_portions: None,
        status: BatchStatus::Planned,
    })
    .await
}

/// Advance a batch through its lifecycle. Illegal transitions are rejected;
/// the produced portion count may only be recorded when completing.
pub async fn update_batch_status<R: FullRepository + ?Sized>(
    repo: &R,
    id: ProductionBatchId,
    status: BatchStatus,
    produced_portions: Option<i32>,
) -> RepositoryResult<ProductionBatch> {
    let batch = repo.get_batch(id).await?;
    if !batch.status.can_transition_to(status) {
        return Err(RepositoryError::conflict(format!(
            "cannot transition batch from {:?} to {:?}",
            batch.status, status
        ))
        .with_operation("update_batch_status"));
    }
    if produced_portions.is_some() && status != BatchStatus::Completed {
        return Err(RepositoryError::validation(
            "produced portions can only be set when completing a batch",
        ));
    }
    if let Some(produced) = produced_portions {
        if produced < 0 {
            return Err(RepositoryError::validation(
                "produced portions must not be negative",
            ));
        }
    }
    repo.update_batch_status(id, status, produced_portions).await
}

pub async fn add_quality_check<R: FullRepository + ?Sized>(
    repo: &R,
    batch_id: ProductionBatchId,
    check_type: String,
    passed: bool,
    notes: Option<String>,
) -> RepositoryResult<QualityCheck> {
    if check_type.trim().is_empty() {
        return Err(RepositoryError::validation("check type must not be empty"));
    }
    repo.add_quality_check(QualityCheck {
        id: None,
        batch_id,
        check_type,
        passed,
        notes,
        checked_at: Utc::now(),
    })
    .await
}

pub async fn list_quality_checks<R: FullRepository + ?Sized>(
    repo: &R,
    batch_id: ProductionBatchId,
) -> RepositoryResult<Vec<QualityCheck>> {
    // Surface a NotFound for unknown batches instead of an empty list.
    repo.get_batch(batch_id).await?;
    repo.list_quality_checks(batch_id).await
}

// ==================== Distributions ====================

/// Generate a short human-facing distribution code.
fn generate_distribution_code() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("DST-{}", &id[..8])
}

pub async fn list_distributions<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Distribution>> {
    repo.list_distributions().await
}

pub async fn get_distribution<R: FullRepository + ?Sized>(
    repo: &R,
    id: DistributionId,
) -> RepositoryResult<Distribution> {
    repo.get_distribution(id).await
}

pub async fn create_distribution<R: FullRepository + ?Sized>(
    repo: &R,
    distribution_date: NaiveDate,
    vehicle_id: Option<VehicleId>,
    driver_name: String,
    stops: Vec<DistributionStop>,
) -> RepositoryResult<Distribution> {
    if stops.is_empty() {
        return Err(RepositoryError::validation(
            "distribution must have at least one stop",
        ));
    }
    if stops.iter().any(|s| s.planned_portions <= 0) {
        return Err(RepositoryError::validation(
            "planned portions per stop must be positive",
        ));
    }
    if let Some(vehicle_id) = vehicle_id {
        repo.get_vehicle(vehicle_id).await?;
    }
    for stop in &stops {
        let school = repo.get_school(stop.school_id).await?;
        if !school.is_active() {
            return Err(RepositoryError::validation(format!(
                "school {} is deactivated and cannot receive deliveries",
                stop.school_id
            ))
            .with_operation("create_distribution"));
        }
    }

    // Normalize sequences to the submitted order.
    let stops = stops
        .into_iter()
        .enumerate()
        .map(|(i, stop)| DistributionStop {
            sequence: (i + 1) as i32,
            ..stop
        })
        .collect();

    repo.create_distribution(Distribution {
        id: None,
        code: generate_distribution_code(),
        distribution_date,
        vehicle_id,
        driver_name,
        status: DistributionStatus::Scheduled,
        stops,
    })
    .await
}

pub async fn update_distribution_status<R: FullRepository + ?Sized>(
    repo: &R,
    id: DistributionId,
    status: DistributionStatus,
) -> RepositoryResult<Distribution> {
    let distribution = repo.get_distribution(id).await?;
    if !distribution.status.can_transition_to(status) {
        return Err(RepositoryError::conflict(format!(
            "cannot transition distribution from {:?} to {:?}",
            distribution.status, status
        ))
        .with_operation("update_distribution_status"));
    }
    repo.update_distribution_status(id, status).await
}

// ==================== Posyandu health records ====================

pub async fn list_health_records<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<HealthRecord>> {
    repo.list_health_records().await
}

pub async fn get_health_record<R: FullRepository + ?Sized>(
    repo: &R,
    id: HealthRecordId,
) -> RepositoryResult<HealthRecord> {
    repo.get_health_record(id).await
}

/// Store a measurement, computing its growth assessment first.
pub async fn create_health_record<R: FullRepository + ?Sized>(
    repo: &R,
    mut record: HealthRecord,
) -> RepositoryResult<HealthRecord> {
    if record.child_name.trim().is_empty() {
        return Err(RepositoryError::validation("child name must not be empty"));
    }
    let assessment = assess_growth(&AssessGrowthRequest {
        sex: record.sex,
        age_months: record.age_months,
        weight_kg: record.weight_kg,
        height_cm: record.height_cm,
    })
    .map_err(|e| RepositoryError::validation(e.to_string()).with_operation("create_health_record"))?;

    record.id = None;
    record.assessment = Some(assessment);
    repo.create_health_record(record).await
}

// ==================== Finance ====================

pub async fn list_financial_records<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<FinancialRecord>> {
    repo.list_financial_records().await
}

pub async fn create_financial_record<R: FullRepository + ?Sized>(
    repo: &R,
    record: FinancialRecord,
) -> RepositoryResult<FinancialRecord> {
    if record.category.trim().is_empty() {
        return Err(RepositoryError::validation("category must not be empty"));
    }
    if record.amount <= 0.0 {
        return Err(RepositoryError::validation("amount must be positive"));
    }
    repo.create_financial_record(FinancialRecord { id: None, ..record })
        .await
}
