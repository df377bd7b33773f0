//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. List endpoints paginate through the shared
//! [`Page`]/[`PageQuery`] envelope.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    CreateBatchRequest, CreateDistributionRequest, CreateFinancialRecordRequest,
    CreateHealthRecordRequest, CreateMenuPlanRequest, CreateQualityCheckRequest,
    CreateRecipeRequest, CreateVehicleRequest, HealthResponse, InventoryItemPayload,
    ListSchoolsQuery, SchoolPayload, UpdateBatchStatusRequest, UpdateDistributionStatusRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    AssessGrowthRequest, DashboardSummary, DistributionId, FinanceSummary, GrowthAssessment,
    HealthRecordId, InventoryItemId, OptimizeRoutesRequest, Page, PageQuery, ProductionBatchId,
    RecipeId, RecipeNutrition, RoutePlan, SchoolId,
};
use crate::db::services as db_services;
use crate::models::{
    Distribution, FinancialRecord, HealthRecord, InventoryItem, MenuPlan, ProductionBatch,
    QualityCheck, Recipe, School, Vehicle,
};
use crate::routes::finance::FinanceSummaryQuery;
use crate::services::{assess_growth, compute_dashboard_summary, compute_finance_summary, plan_route};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for create handlers (201 Created).
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

fn created<T>(value: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(value)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the database
/// is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Schools
// =============================================================================

/// GET /v1/schools
pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<ListSchoolsQuery>,
) -> HandlerResult<Page<School>> {
    let include_deleted = query.include_deleted.unwrap_or(false);
    let schools = db_services::list_schools(state.repository.as_ref(), include_deleted).await?;
    Ok(Json(Page::paginate(schools, &query.page_query())))
}

/// GET /v1/schools/{id}
pub async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<School> {
    let school = db_services::get_school(state.repository.as_ref(), SchoolId::new(id)).await?;
    Ok(Json(school))
}

/// POST /v1/schools
pub async fn create_school(
    State(state): State<AppState>,
    Json(payload): Json<SchoolPayload>,
) -> CreatedResult<School> {
    let school = db_services::create_school(
        state.repository.as_ref(),
        School {
            id: None,
            name: payload.name,
            address: payload.address,
            latitude: payload.latitude,
            longitude: payload.longitude,
            student_count: payload.student_count,
            deleted_at: None,
        },
    )
    .await?;
    created(school)
}

/// PUT /v1/schools/{id}
pub async fn update_school(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SchoolPayload>,
) -> HandlerResult<School> {
    let id = SchoolId::new(id);
    let current = db_services::get_school(state.repository.as_ref(), id).await?;
    let school = db_services::update_school(
        state.repository.as_ref(),
        id,
        School {
            id: Some(id),
            name: payload.name,
            address: payload.address,
            latitude: payload.latitude,
            longitude: payload.longitude,
            student_count: payload.student_count,
            deleted_at: current.deleted_at,
        },
    )
    .await?;
    Ok(Json(school))
}

/// DELETE /v1/schools/{id}
pub async fn delete_school(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_school(state.repository.as_ref(), SchoolId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Vehicles
// =============================================================================

/// GET /v1/vehicles
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<Vehicle>> {
    let vehicles = db_services::list_vehicles(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(vehicles, &query)))
}

/// POST /v1/vehicles
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<CreateVehicleRequest>,
) -> CreatedResult<Vehicle> {
    let vehicle = db_services::create_vehicle(
        state.repository.as_ref(),
        Vehicle {
            id: None,
            plate_number: payload.plate_number,
            kind: payload.kind,
            capacity_portions: payload.capacity_portions,
            is_active: payload.is_active,
        },
    )
    .await?;
    created(vehicle)
}

// =============================================================================
// Inventory
// =============================================================================

/// GET /v1/inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<InventoryItem>> {
    let items = db_services::list_inventory_items(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(items, &query)))
}

/// GET /v1/inventory/low-stock
pub async fn list_low_stock(State(state): State<AppState>) -> HandlerResult<Vec<InventoryItem>> {
    let items = db_services::list_low_stock_items(state.repository.as_ref()).await?;
    Ok(Json(items))
}

/// GET /v1/inventory/{id}
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<InventoryItem> {
    let item =
        db_services::get_inventory_item(state.repository.as_ref(), InventoryItemId::new(id))
            .await?;
    Ok(Json(item))
}

fn inventory_item_from_payload(payload: InventoryItemPayload) -> InventoryItem {
    InventoryItem {
        id: None,
        name: payload.name,
        category: payload.category,
        unit: payload.unit,
        quantity: payload.quantity,
        minimum_stock: payload.minimum_stock,
        expiry_date: payload.expiry_date,
    }
}

/// POST /v1/inventory
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<InventoryItemPayload>,
) -> CreatedResult<InventoryItem> {
    let item = db_services::create_inventory_item(
        state.repository.as_ref(),
        inventory_item_from_payload(payload),
    )
    .await?;
    created(item)
}

/// PUT /v1/inventory/{id}
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryItemPayload>,
) -> HandlerResult<InventoryItem> {
    let id = InventoryItemId::new(id);
    let mut item = inventory_item_from_payload(payload);
    item.id = Some(id);
    let item = db_services::update_inventory_item(state.repository.as_ref(), id, item).await?;
    Ok(Json(item))
}

/// DELETE /v1/inventory/{id}
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_inventory_item(state.repository.as_ref(), InventoryItemId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Recipes & menu plans
// =============================================================================

/// GET /v1/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<Recipe>> {
    let recipes = db_services::list_recipes(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(recipes, &query)))
}

/// GET /v1/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Recipe> {
    let recipe = db_services::get_recipe(state.repository.as_ref(), RecipeId::new(id)).await?;
    Ok(Json(recipe))
}

/// POST /v1/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(payload): Json<CreateRecipeRequest>,
) -> CreatedResult<Recipe> {
    let recipe = db_services::create_recipe(
        state.repository.as_ref(),
        Recipe {
            id: None,
            name: payload.name,
            portion_yield: payload.portion_yield,
            ingredients: payload.ingredients,
        },
    )
    .await?;
    created(recipe)
}

/// GET /v1/recipes/{id}/nutrition
pub async fn get_recipe_nutrition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<RecipeNutrition> {
    let nutrition =
        db_services::get_recipe_nutrition(state.repository.as_ref(), RecipeId::new(id)).await?;
    Ok(Json(nutrition))
}

/// GET /v1/menu-plans
pub async fn list_menu_plans(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<MenuPlan>> {
    let plans = db_services::list_menu_plans(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(plans, &query)))
}

/// POST /v1/menu-plans
pub async fn create_menu_plan(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuPlanRequest>,
) -> CreatedResult<MenuPlan> {
    let plan = db_services::create_menu_plan(
        state.repository.as_ref(),
        payload.menu_date,
        payload.recipe_ids,
    )
    .await?;
    created(plan)
}

// =============================================================================
// Production batches & quality checks
// =============================================================================

/// GET /v1/production-batches
pub async fn list_batches(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<ProductionBatch>> {
    let batches = db_services::list_batches(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(batches, &query)))
}

/// GET /v1/production-batches/{id}
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ProductionBatch> {
    let batch =
        db_services::get_batch(state.repository.as_ref(), ProductionBatchId::new(id)).await?;
    Ok(Json(batch))
}

/// POST /v1/production-batches
pub async fn create_batch(
    State(state): State<AppState>,
    Json(payload): Json<CreateBatchRequest>,
) -> CreatedResult<ProductionBatch> {
    let batch = db_services::create_batch(
        state.repository.as_ref(),
        payload.batch_date,
        payload.recipe_id,
        payload.planned_portions,
    )
    .await?;
    created(batch)
}

/// PUT /v1/production-batches/{id}/status
pub async fn update_batch_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBatchStatusRequest>,
) -> HandlerResult<ProductionBatch> {
    let batch = db_services::update_batch_status(
        state.repository.as_ref(),
        ProductionBatchId::new(id),
        payload.status,
        payload.produced_portions,
    )
    .await?;
    Ok(Json(batch))
}

/// GET /v1/production-batches/{id}/quality-checks
pub async fn list_quality_checks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Vec<QualityCheck>> {
    let checks =
        db_services::list_quality_checks(state.repository.as_ref(), ProductionBatchId::new(id))
            .await?;
    Ok(Json(checks))
}

/// POST /v1/production-batches/{id}/quality-checks
pub async fn create_quality_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateQualityCheckRequest>,
) -> CreatedResult<QualityCheck> {
    let check = db_services::add_quality_check(
        state.repository.as_ref(),
        ProductionBatchId::new(id),
        payload.check_type,
        payload.passed,
        payload.notes,
    )
    .await?;
    created(check)
}

// =============================================================================
// Distributions
// =============================================================================

/// GET /v1/distributions
pub async fn list_distributions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<Distribution>> {
    let distributions = db_services::list_distributions(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(distributions, &query)))
}

/// GET /v1/distributions/{id}
pub async fn get_distribution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Distribution> {
    let distribution =
        db_services::get_distribution(state.repository.as_ref(), DistributionId::new(id)).await?;
    Ok(Json(distribution))
}

/// POST /v1/distributions
pub async fn create_distribution(
    State(state): State<AppState>,
    Json(payload): Json<CreateDistributionRequest>,
) -> CreatedResult<Distribution> {
    let stops = payload.stops.into_iter().map(|s| s.into_stop()).collect();
    let distribution = db_services::create_distribution(
        state.repository.as_ref(),
        payload.distribution_date,
        payload.vehicle_id,
        payload.driver_name,
        stops,
    )
    .await?;
    created(distribution)
}

/// PUT /v1/distributions/{id}/status
pub async fn update_distribution_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDistributionStatusRequest>,
) -> HandlerResult<Distribution> {
    let distribution = db_services::update_distribution_status(
        state.repository.as_ref(),
        DistributionId::new(id),
        payload.status,
    )
    .await?;
    Ok(Json(distribution))
}

/// POST /v1/distributions/optimize-routes
///
/// Pure computation; the request carries the depot and destinations, no
/// database state is read.
pub async fn optimize_routes(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRoutesRequest>,
) -> HandlerResult<RoutePlan> {
    if request.destinations.is_empty() {
        return Err(AppError::BadRequest(
            "at least one destination is required".to_string(),
        ));
    }
    // Resolve the capacity from the fleet when only a vehicle id is given.
    let mut request = request;
    if request.vehicle_capacity_portions.is_none() {
        if let Some(vehicle_id) = request.vehicle_id {
            let vehicle = db_services::get_vehicle(state.repository.as_ref(), vehicle_id).await?;
            request.vehicle_capacity_portions = Some(vehicle.capacity_portions);
        }
    }
    Ok(Json(plan_route(&request)))
}

// =============================================================================
// Posyandu health records
// =============================================================================

/// GET /v1/health-records
pub async fn list_health_records(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<HealthRecord>> {
    let records = db_services::list_health_records(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(records, &query)))
}

/// GET /v1/health-records/{id}
pub async fn get_health_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<HealthRecord> {
    let record =
        db_services::get_health_record(state.repository.as_ref(), HealthRecordId::new(id)).await?;
    Ok(Json(record))
}

/// POST /v1/health-records
pub async fn create_health_record(
    State(state): State<AppState>,
    Json(payload): Json<CreateHealthRecordRequest>,
) -> CreatedResult<HealthRecord> {
    let record = db_services::create_health_record(
        state.repository.as_ref(),
        HealthRecord {
            id: None,
            posyandu_name: payload.posyandu_name,
            child_name: payload.child_name,
            sex: payload.sex,
            age_months: payload.age_months,
            weight_kg: payload.weight_kg,
            height_cm: payload.height_cm,
            measured_at: payload.measured_at,
            assessment: None,
        },
    )
    .await?;
    created(record)
}

/// POST /v1/health-records/assess
///
/// Stateless assessment; nothing is stored.
pub async fn assess_growth_endpoint(
    Json(request): Json<AssessGrowthRequest>,
) -> HandlerResult<GrowthAssessment> {
    let assessment =
        assess_growth(&request).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(assessment))
}

// =============================================================================
// Finance
// =============================================================================

/// GET /v1/finance/records
pub async fn list_financial_records(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Page<FinancialRecord>> {
    let records = db_services::list_financial_records(state.repository.as_ref()).await?;
    Ok(Json(Page::paginate(records, &query)))
}

/// POST /v1/finance/records
pub async fn create_financial_record(
    State(state): State<AppState>,
    Json(payload): Json<CreateFinancialRecordRequest>,
) -> CreatedResult<FinancialRecord> {
    let record = db_services::create_financial_record(
        state.repository.as_ref(),
        FinancialRecord {
            id: None,
            record_date: payload.record_date,
            kind: payload.kind,
            category: payload.category,
            amount: payload.amount,
            description: payload.description,
        },
    )
    .await?;
    created(record)
}

/// GET /v1/finance/summary
pub async fn finance_summary(
    State(state): State<AppState>,
    Query(query): Query<FinanceSummaryQuery>,
) -> HandlerResult<FinanceSummary> {
    let records = db_services::list_financial_records(state.repository.as_ref()).await?;
    Ok(Json(compute_finance_summary(&records, &query)))
}

// =============================================================================
// Dashboard
// =============================================================================

/// GET /v1/dashboard/summary
pub async fn dashboard_summary(State(state): State<AppState>) -> HandlerResult<DashboardSummary> {
    let today = Utc::now().date_naive();
    let summary = compute_dashboard_summary(state.repository.as_ref(), today).await?;
    Ok(Json(summary))
}
