use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{
    distributions, financial_records, health_records, inventory_items, menu_plans,
    production_batches, quality_checks, recipes, schools, vehicles,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schools)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SchoolRow {
    pub school_id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub student_count: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schools)]
pub struct NewSchoolRow {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub student_count: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VehicleRow {
    pub vehicle_id: i64,
    pub plate_number: String,
    pub kind: String,
    pub capacity_portions: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vehicles)]
pub struct NewVehicleRow {
    pub plate_number: String,
    pub kind: String,
    pub capacity_portions: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InventoryItemRow {
    pub item_id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: f64,
    pub minimum_stock: f64,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inventory_items)]
pub struct NewInventoryItemRow {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: f64,
    pub minimum_stock: f64,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub recipe_id: i64,
    pub name: String,
    pub portion_yield: i32,
    pub ingredients_json: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub struct NewRecipeRow {
    pub name: String,
    pub portion_yield: i32,
    pub ingredients_json: Value,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = menu_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuPlanRow {
    pub menu_plan_id: i64,
    pub menu_date: NaiveDate,
    pub recipe_ids_json: Value,
    pub checksum: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_plans)]
pub struct NewMenuPlanRow {
    pub menu_date: NaiveDate,
    pub recipe_ids_json: Value,
    pub checksum: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = production_batches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductionBatchRow {
    pub batch_id: i64,
    pub batch_date: NaiveDate,
    pub recipe_id: i64,
    pub planned_portions: i32,
    pub produced_portions: Option<i32>,
    pub status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = production_batches)]
pub struct NewProductionBatchRow {
    pub batch_date: NaiveDate,
    pub recipe_id: i64,
    pub planned_portions: i32,
    pub produced_portions: Option<i32>,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = quality_checks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QualityCheckRow {
    pub check_id: i64,
    pub batch_id: i64,
    pub check_type: String,
    pub passed: bool,
    pub notes: Option<String>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = quality_checks)]
pub struct NewQualityCheckRow {
    pub batch_id: i64,
    pub check_type: String,
    pub passed: bool,
    pub notes: Option<String>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = distributions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DistributionRow {
    pub distribution_id: i64,
    pub code: String,
    pub distribution_date: NaiveDate,
    pub vehicle_id: Option<i64>,
    pub driver_name: String,
    pub status: String,
    pub stops_json: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = distributions)]
pub struct NewDistributionRow {
    pub code: String,
    pub distribution_date: NaiveDate,
    pub vehicle_id: Option<i64>,
    pub driver_name: String,
    pub status: String,
    pub stops_json: Value,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = health_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HealthRecordRow {
    pub record_id: i64,
    pub posyandu_name: String,
    pub child_name: String,
    pub sex: String,
    pub age_months: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub measured_at: NaiveDate,
    pub assessment_json: Option<Value>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = health_records)]
pub struct NewHealthRecordRow {
    pub posyandu_name: String,
    pub child_name: String,
    pub sex: String,
    pub age_months: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub measured_at: NaiveDate,
    pub assessment_json: Option<Value>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = financial_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FinancialRecordRow {
    pub record_id: i64,
    pub record_date: NaiveDate,
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = financial_records)]
pub struct NewFinancialRecordRow {
    pub record_date: NaiveDate,
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}
