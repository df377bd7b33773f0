//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task;

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

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries the operation up to `max_retries` times if a retryable error
    /// occurs (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

// ==================== JSON helpers ====================

fn enum_to_str<T: Serialize>(value: &T) -> RepositoryResult<String> {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => Ok(s),
        _ => Err(RepositoryError::internal("enum did not serialize to a string")),
    }
}

fn enum_from_str<T: DeserializeOwned>(s: &str) -> RepositoryResult<T> {
    serde_json::from_value(Value::String(s.to_string())).map_err(|e| {
        RepositoryError::internal(format!("Failed to parse stored enum '{}': {}", s, e))
    })
}

fn to_json<T: Serialize>(value: &T) -> RepositoryResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| RepositoryError::internal(format!("JSON serialization failed: {}", e)))
}

fn from_json<T: DeserializeOwned>(value: Value) -> RepositoryResult<T> {
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::internal(format!("Failed to parse stored JSON: {}", e)))
}

// ==================== Row conversions ====================

fn school_from_row(row: SchoolRow) -> School {
    School {
        id: Some(SchoolId::new(row.school_id)),
        name: row.name,
        address: row.address,
        latitude: row.latitude,
        longitude: row.longitude,
        student_count: row.student_count,
        deleted_at: row.deleted_at,
    }
}

fn vehicle_from_row(row: VehicleRow) -> Vehicle {
    Vehicle {
        id: Some(VehicleId::new(row.vehicle_id)),
        plate_number: row.plate_number,
        kind: row.kind,
        capacity_portions: row.capacity_portions,
        is_active: row.is_active,
    }
}

fn inventory_item_from_row(row: InventoryItemRow) -> InventoryItem {
    InventoryItem {
        id: Some(InventoryItemId::new(row.item_id)),
        name: row.name,
        category: row.category,
        unit: row.unit,
        quantity: row.quantity,
        minimum_stock: row.minimum_stock,
        expiry_date: row.expiry_date,
    }
}

fn recipe_from_row(row: RecipeRow) -> RepositoryResult<Recipe> {
    Ok(Recipe {
        id: Some(RecipeId::new(row.recipe_id)),
        name: row.name,
        portion_yield: row.portion_yield,
        ingredients: from_json(row.ingredients_json)?,
    })
}

fn menu_plan_from_row(row: MenuPlanRow) -> RepositoryResult<MenuPlan> {
    Ok(MenuPlan {
        id: Some(MenuPlanId::new(row.menu_plan_id)),
        menu_date: row.menu_date,
        recipe_ids: from_json(row.recipe_ids_json)?,
        checksum: row.checksum,
    })
}

fn batch_from_row(row: ProductionBatchRow) -> RepositoryResult<ProductionBatch> {
    Ok(ProductionBatch {
        id: Some(ProductionBatchId::new(row.batch_id)),
        batch_date: row.batch_date,
        recipe_id: RecipeId::new(row.recipe_id),
        planned_portions: row.planned_portions,
        produced_portions: row.produced_portions,
        status: enum_from_str(&row.status)?,
    })
}

fn quality_check_from_row(row: QualityCheckRow) -> QualityCheck {
    QualityCheck {
        id: Some(QualityCheckId::new(row.check_id)),
        batch_id: ProductionBatchId::new(row.batch_id),
        check_type: row.check_type,
        passed: row.passed,
        notes: row.notes,
        checked_at: row.checked_at,
    }
}

fn distribution_from_row(row: DistributionRow) -> RepositoryResult<Distribution> {
    Ok(Distribution {
        id: Some(DistributionId::new(row.distribution_id)),
        code: row.code,
        distribution_date: row.distribution_date,
        vehicle_id: row.vehicle_id.map(VehicleId::new),
        driver_name: row.driver_name,
        status: enum_from_str(&row.status)?,
        stops: from_json(row.stops_json)?,
    })
}

fn health_record_from_row(row: HealthRecordRow) -> RepositoryResult<HealthRecord> {
    let assessment = row.assessment_json.map(from_json).transpose()?;
    Ok(HealthRecord {
        id: Some(HealthRecordId::new(row.record_id)),
        posyandu_name: row.posyandu_name,
        child_name: row.child_name,
        sex: enum_from_str(&row.sex)?,
        age_months: row.age_months,
        weight_kg: row.weight_kg,
        height_cm: row.height_cm,
        measured_at: row.measured_at,
        assessment,
    })
}

fn financial_record_from_row(row: FinancialRecordRow) -> RepositoryResult<FinancialRecord> {
    Ok(FinancialRecord {
        id: Some(FinancialRecordId::new(row.record_id)),
        record_date: row.record_date,
        kind: enum_from_str(&row.kind)?,
        category: row.category,
        amount: row.amount,
        description: row.description,
    })
}

// ==================== Trait implementations ====================

#[async_trait]
impl SchoolRepository for PostgresRepository {
    async fn list_schools(&self, include_deleted: bool) -> RepositoryResult<Vec<School>> {
        self.with_conn(move |conn| {
            let mut query = schools::table
                .select(SchoolRow::as_select())
                .order(schools::school_id.asc())
                .into_boxed();
            if !include_deleted {
                query = query.filter(schools::deleted_at.is_null());
            }
            let rows: Vec<SchoolRow> = query.load(conn).map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(school_from_row).collect())
        })
        .await
    }

    async fn get_school(&self, id: SchoolId) -> RepositoryResult<School> {
        let school_id = id.value();
        self.with_conn(move |conn| {
            let row: SchoolRow = schools::table
                .find(school_id)
                .select(SchoolRow::as_select())
                .first(conn)
                .map_err(|e| {
                    RepositoryError::from(e).with_operation("get_school")
                })?;
            Ok(school_from_row(row))
        })
        .await
    }

    async fn create_school(&self, school: School) -> RepositoryResult<School> {
        self.with_conn(move |conn| {
            let new_row = NewSchoolRow {
                name: school.name.clone(),
                address: school.address.clone(),
                latitude: school.latitude,
                longitude: school.longitude,
                student_count: school.student_count,
                deleted_at: None,
            };
            let row: SchoolRow = diesel::insert_into(schools::table)
                .values(&new_row)
                .returning(SchoolRow::as_returning())
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            Ok(school_from_row(row))
        })
        .await
    }

    async fn update_school(&self, id: SchoolId, school: School) -> RepositoryResult<School> {
        let school_id = id.value();
        self.with_conn(move |conn| {
            let row: SchoolRow = diesel::update(schools::table.find(school_id))
                .set((
                    schools::name.eq(school.name.clone()),
                    schools::address.eq(school.address.clone()),
                    schools::latitude.eq(school.latitude),
                    schools::longitude.eq(school.longitude),
                    schools::student_count.eq(school.student_count),
                ))
                .returning(SchoolRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("update_school"))?;
            Ok(school_from_row(row))
        })
        .await
    }

    async fn soft_delete_school(&self, id: SchoolId) -> RepositoryResult<()> {
        let school_id = id.value();
        self.with_conn(move |conn| {
            let updated = diesel::update(
                schools::table
                    .find(school_id)
                    .filter(schools::deleted_at.is_null()),
            )
            .set(schools::deleted_at.eq(diesel::dsl::now))
            .execute(conn)
            .map_err(RepositoryError::from)?;
            if updated == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("School {} not found", school_id),
                    ErrorContext::new("soft_delete_school")
                        .with_entity("school")
                        .with_entity_id(school_id),
                ));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl FleetRepository for PostgresRepository {
    async fn list_vehicles(&self) -> RepositoryResult<Vec<Vehicle>> {
        self.with_conn(move |conn| {
            let rows: Vec<VehicleRow> = vehicles::table
                .order(vehicles::vehicle_id.asc())
                .select(VehicleRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(vehicle_from_row).collect())
        })
        .await
    }

    async fn get_vehicle(&self, id: VehicleId) -> RepositoryResult<Vehicle> {
        let vehicle_id = id.value();
        self.with_conn(move |conn| {
            let row: VehicleRow = vehicles::table
                .find(vehicle_id)
                .select(VehicleRow::as_select())
                .first(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_vehicle"))?;
            Ok(vehicle_from_row(row))
        })
        .await
    }

    async fn create_vehicle(&self, vehicle: Vehicle) -> RepositoryResult<Vehicle> {
        self.with_conn(move |conn| {
            let new_row = NewVehicleRow {
                plate_number: vehicle.plate_number.clone(),
                kind: vehicle.kind.clone(),
                capacity_portions: vehicle.capacity_portions,
                is_active: vehicle.is_active,
            };
            // Unique constraint on plate_number maps to Conflict.
            let row: VehicleRow = diesel::insert_into(vehicles::table)
                .values(&new_row)
                .returning(VehicleRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_vehicle"))?;
            Ok(vehicle_from_row(row))
        })
        .await
    }
}

#[async_trait]
impl InventoryRepository for PostgresRepository {
    async fn list_inventory_items(&self) -> RepositoryResult<Vec<InventoryItem>> {
        self.with_conn(move |conn| {
            let rows: Vec<InventoryItemRow> = inventory_items::table
                .order(inventory_items::item_id.asc())
                .select(InventoryItemRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(inventory_item_from_row).collect())
        })
        .await
    }

    async fn get_inventory_item(&self, id: InventoryItemId) -> RepositoryResult<InventoryItem> {
        let item_id = id.value();
        self.with_conn(move |conn| {
            let row: InventoryItemRow = inventory_items::table
                .find(item_id)
                .select(InventoryItemRow::as_select())
                .first(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_inventory_item"))?;
            Ok(inventory_item_from_row(row))
        })
        .await
    }

    async fn create_inventory_item(&self, item: InventoryItem) -> RepositoryResult<InventoryItem> {
        self.with_conn(move |conn| {
            let new_row = NewInventoryItemRow {
                name: item.name.clone(),
                category: item.category.clone(),
                unit: item.unit.clone(),
                quantity: item.quantity,
                minimum_stock: item.minimum_stock,
                expiry_date: item.expiry_date,
            };
            let row: InventoryItemRow = diesel::insert_into(inventory_items::table)
                .values(&new_row)
                .returning(InventoryItemRow::as_returning())
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            Ok(inventory_item_from_row(row))
        })
        .await
    }

    async fn update_inventory_item(
        &self,
        id: InventoryItemId,
        item: InventoryItem,
    ) -> RepositoryResult<InventoryItem> {
        let item_id = id.value();
        self.with_conn(move |conn| {
            let row: InventoryItemRow = diesel::update(inventory_items::table.find(item_id))
                .set((
                    inventory_items::name.eq(item.name.clone()),
                    inventory_items::category.eq(item.category.clone()),
                    inventory_items::unit.eq(item.unit.clone()),
                    inventory_items::quantity.eq(item.quantity),
                    inventory_items::minimum_stock.eq(item.minimum_stock),
                    inventory_items::expiry_date.eq(item.expiry_date),
                ))
                .returning(InventoryItemRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("update_inventory_item"))?;
            Ok(inventory_item_from_row(row))
        })
        .await
    }

    async fn delete_inventory_item(&self, id: InventoryItemId) -> RepositoryResult<()> {
        let item_id = id.value();
        self.with_conn(move |conn| {
            let deleted = diesel::delete(inventory_items::table.find(item_id))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Inventory item {} not found", item_id),
                    ErrorContext::new("delete_inventory_item")
                        .with_entity("inventory_item")
                        .with_entity_id(item_id),
                ));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl MenuRepository for PostgresRepository {
    async fn list_recipes(&self) -> RepositoryResult<Vec<Recipe>> {
        self.with_conn(move |conn| {
            let rows: Vec<RecipeRow> = recipes::table
                .order(recipes::recipe_id.asc())
                .select(RecipeRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(recipe_from_row).collect()
        })
        .await
    }

    async fn get_recipe(&self, id: RecipeId) -> RepositoryResult<Recipe> {
        let recipe_id = id.value();
        self.with_conn(move |conn| {
            let row: RecipeRow = recipes::table
                .find(recipe_id)
                .select(RecipeRow::as_select())
                .first(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_recipe"))?;
            recipe_from_row(row)
        })
        .await
    }

    async fn create_recipe(&self, recipe: Recipe) -> RepositoryResult<Recipe> {
        let ingredients_json = to_json(&recipe.ingredients)?;
        self.with_conn(move |conn| {
            let new_row = NewRecipeRow {
                name: recipe.name.clone(),
                portion_yield: recipe.portion_yield,
                ingredients_json: ingredients_json.clone(),
            };
            let row: RecipeRow = diesel::insert_into(recipes::table)
                .values(&new_row)
                .returning(RecipeRow::as_returning())
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            recipe_from_row(row)
        })
        .await
    }

    async fn list_menu_plans(&self) -> RepositoryResult<Vec<MenuPlan>> {
        self.with_conn(move |conn| {
            let rows: Vec<MenuPlanRow> = menu_plans::table
                .order(menu_plans::menu_date.asc())
                .select(MenuPlanRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(menu_plan_from_row).collect()
        })
        .await
    }

    async fn create_menu_plan(&self, plan: MenuPlan) -> RepositoryResult<MenuPlan> {
        let recipe_ids_json = to_json(&plan.recipe_ids)?;
        self.with_conn(move |conn| {
            let new_row = NewMenuPlanRow {
                menu_date: plan.menu_date,
                recipe_ids_json: recipe_ids_json.clone(),
                checksum: plan.checksum.clone(),
            };
            // Unique constraint on checksum maps to Conflict.
            let row: MenuPlanRow = diesel::insert_into(menu_plans::table)
                .values(&new_row)
                .returning(MenuPlanRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_menu_plan"))?;
            menu_plan_from_row(row)
        })
        .await
    }

    async fn find_menu_plan_by_checksum(
        &self,
        checksum: &str,
    ) -> RepositoryResult<Option<MenuPlan>> {
        let checksum = checksum.to_string();
        self.with_conn(move |conn| {
            let row: Option<MenuPlanRow> = menu_plans::table
                .filter(menu_plans::checksum.eq(checksum.clone()))
                .select(MenuPlanRow::as_select())
                .first(conn)
                .optional()
                .map_err(RepositoryError::from)?;
            row.map(menu_plan_from_row).transpose()
        })
        .await
    }
}

#[async_trait]
impl ProductionRepository for PostgresRepository {
    async fn list_batches(&self) -> RepositoryResult<Vec<ProductionBatch>> {
        self.with_conn(move |conn| {
            let rows: Vec<ProductionBatchRow> = production_batches::table
                .order(production_batches::batch_id.asc())
                .select(ProductionBatchRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(batch_from_row).collect()
        })
        .await
    }

    async fn get_batch(&self, id: ProductionBatchId) -> RepositoryResult<ProductionBatch> {
        let batch_id = id.value();
        self.with_conn(move |conn| {
            let row: ProductionBatchRow = production_batches::table
                .find(batch_id)
                .select(ProductionBatchRow::as_select())
                .first(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_batch"))?;
            batch_from_row(row)
        })
        .await
    }

    async fn create_batch(&self, batch: ProductionBatch) -> RepositoryResult<ProductionBatch> {
        let status = enum_to_str(&batch.status)?;
        self.with_conn(move |conn| {
            let new_row = NewProductionBatchRow {
                batch_date: batch.batch_date,
                recipe_id: batch.recipe_id.value(),
                planned_portions: batch.planned_portions,
                produced_portions: batch.produced_portions,
                status: status.clone(),
            };
            let row: ProductionBatchRow = diesel::insert_into(production_batches::table)
                .values(&new_row)
                .returning(ProductionBatchRow::as_returning())
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            batch_from_row(row)
        })
        .await
    }

    async fn update_batch_status(
        &self,
        id: ProductionBatchId,
        status: BatchStatus,
        produced_portions: Option<i32>,
    ) -> RepositoryResult<ProductionBatch> {
        let batch_id = id.value();
        let status = enum_to_str(&status)?;
        self.with_conn(move |conn| {
            let row: ProductionBatchRow = match produced_portions {
                Some(produced) => diesel::update(production_batches::table.find(batch_id))
                    .set((
                        production_batches::status.eq(status.clone()),
                        production_batches::produced_portions.eq(Some(produced)),
                    ))
                    .returning(ProductionBatchRow::as_returning())
                    .get_result(conn),
                None => diesel::update(production_batches::table.find(batch_id))
                    .set(production_batches::status.eq(status.clone()))
                    .returning(ProductionBatchRow::as_returning())
                    .get_result(conn),
            }
            .map_err(|e| RepositoryError::from(e).with_operation("update_batch_status"))?;
            batch_from_row(row)
        })
        .await
    }

    async fn add_quality_check(&self, check: QualityCheck) -> RepositoryResult<QualityCheck> {
        self.with_conn(move |conn| {
            let new_row = NewQualityCheckRow {
                batch_id: check.batch_id.value(),
                check_type: check.check_type.clone(),
                passed: check.passed,
                notes: check.notes.clone(),
                checked_at: check.checked_at,
            };
            let row: QualityCheckRow = diesel::insert_into(quality_checks::table)
                .values(&new_row)
                .returning(QualityCheckRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("add_quality_check"))?;
            Ok(quality_check_from_row(row))
        })
        .await
    }

    async fn list_quality_checks(
        &self,
        batch_id: ProductionBatchId,
    ) -> RepositoryResult<Vec<QualityCheck>> {
        let batch_id = batch_id.value();
        self.with_conn(move |conn| {
            let rows: Vec<QualityCheckRow> = quality_checks::table
                .filter(quality_checks::batch_id.eq(batch_id))
                .order(quality_checks::check_id.asc())
                .select(QualityCheckRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(quality_check_from_row).collect())
        })
        .await
    }
}

#[async_trait]
impl DistributionRepository for PostgresRepository {
    async fn list_distributions(&self) -> RepositoryResult<Vec<Distribution>> {
        self.with_conn(move |conn| {
            let rows: Vec<DistributionRow> = distributions::table
                .order(distributions::distribution_id.asc())
                .select(DistributionRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(distribution_from_row).collect()
        })
        .await
    }

    async fn get_distribution(&self, id: DistributionId) -> RepositoryResult<Distribution> {
        let distribution_id = id.value();
        self.with_conn(move |conn| {
            let row: DistributionRow = distributions::table
                .find(distribution_id)
                .select(DistributionRow::as_select())
                .first(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_distribution"))?;
            distribution_from_row(row)
        })
        .await
    }

    async fn create_distribution(
        &self,
        distribution: Distribution,
    ) -> RepositoryResult<Distribution> {
        let status = enum_to_str(&distribution.status)?;
        let stops_json = to_json(&distribution.stops)?;
        self.with_conn(move |conn| {
            let new_row = NewDistributionRow {
                code: distribution.code.clone(),
                distribution_date: distribution.distribution_date,
                vehicle_id: distribution.vehicle_id.map(|id| id.value()),
                driver_name: distribution.driver_name.clone(),
                status: status.clone(),
                stops_json: stops_json.clone(),
            };
            let row: DistributionRow = diesel::insert_into(distributions::table)
                .values(&new_row)
                .returning(DistributionRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("create_distribution"))?;
            distribution_from_row(row)
        })
        .await
    }

    async fn update_distribution_status(
        &self,
        id: DistributionId,
        status: DistributionStatus,
    ) -> RepositoryResult<Distribution> {
        let distribution_id = id.value();
        let status = enum_to_str(&status)?;
        self.with_conn(move |conn| {
            let row: DistributionRow = diesel::update(distributions::table.find(distribution_id))
                .set(distributions::status.eq(status.clone()))
                .returning(DistributionRow::as_returning())
                .get_result(conn)
                .map_err(|e| {
                    RepositoryError::from(e).with_operation("update_distribution_status")
                })?;
            distribution_from_row(row)
        })
        .await
    }
}

#[async_trait]
impl HealthRepository for PostgresRepository {
    async fn list_health_records(&self) -> RepositoryResult<Vec<HealthRecord>> {
        self.with_conn(move |conn| {
            let rows: Vec<HealthRecordRow> = health_records::table
                .order(health_records::record_id.asc())
                .select(HealthRecordRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(health_record_from_row).collect()
        })
        .await
    }

    async fn get_health_record(&self, id: HealthRecordId) -> RepositoryResult<HealthRecord> {
        let record_id = id.value();
        self.with_conn(move |conn| {
            let row: HealthRecordRow = health_records::table
                .find(record_id)
                .select(HealthRecordRow::as_select())
                .first(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_health_record"))?;
            health_record_from_row(row)
        })
        .await
    }

    async fn create_health_record(&self, record: HealthRecord) -> RepositoryResult<HealthRecord> {
        let sex = enum_to_str(&record.sex)?;
        let assessment_json = match &record.assessment {
            Some(a) => Some(to_json(a)?),
            None => None,
        };
        self.with_conn(move |conn| {
            let new_row = NewHealthRecordRow {
                posyandu_name: record.posyandu_name.clone(),
                child_name: record.child_name.clone(),
                sex: sex.clone(),
                age_months: record.age_months,
                weight_kg: record.weight_kg,
                height_cm: record.height_cm,
                measured_at: record.measured_at,
                assessment_json: assessment_json.clone(),
            };
            let row: HealthRecordRow = diesel::insert_into(health_records::table)
                .values(&new_row)
                .returning(HealthRecordRow::as_returning())
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            health_record_from_row(row)
        })
        .await
    }
}

#[async_trait]
impl FinanceRepository for PostgresRepository {
    async fn list_financial_records(&self) -> RepositoryResult<Vec<FinancialRecord>> {
        self.with_conn(move |conn| {
            let rows: Vec<FinancialRecordRow> = financial_records::table
                .order(financial_records::record_id.asc())
                .select(FinancialRecordRow::as_select())
                .load(conn)
                .map_err(RepositoryError::from)?;
            rows.into_iter().map(financial_record_from_row).collect()
        })
        .await
    }

    async fn create_financial_record(
        &self,
        record: FinancialRecord,
    ) -> RepositoryResult<FinancialRecord> {
        let kind = enum_to_str(&record.kind)?;
        self.with_conn(move |conn| {
            let new_row = NewFinancialRecordRow {
                record_date: record.record_date,
                kind: kind.clone(),
                category: record.category.clone(),
                amount: record.amount,
                description: record.description.clone(),
            };
            let row: FinancialRecordRow = diesel::insert_into(financial_records::table)
                .values(&new_row)
                .returning(FinancialRecordRow::as_returning())
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            financial_record_from_row(row)
        })
        .await
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map_err(RepositoryError::from)?;
            Ok(true)
        })
        .await
    }
}
