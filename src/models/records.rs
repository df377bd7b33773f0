//! Domain records for the SPPG program.
//!
//! These are plain relational records. Ids are `None` until assigned by the
//! repository backend. Soft-deletable entities carry a `deleted_at` timestamp
//! instead of being removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{
    DistributionId, FinancialRecordId, HealthRecordId, InventoryItemId, MenuPlanId,
    ProductionBatchId, QualityCheckId, RecipeId, SchoolId, VehicleId,
};

/// A school served by the feeding program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: Option<SchoolId>,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub student_count: i32,
    /// Soft-delete marker; `Some` means the school is no longer active.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl School {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A delivery vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Option<VehicleId>,
    pub plate_number: String,
    pub kind: String,
    /// Carrying capacity in meal portions.
    pub capacity_portions: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A raw-material stock item in the kitchen warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Option<InventoryItemId>,
    pub name: String,
    pub category: String,
    /// Stock-keeping unit, e.g. "kg", "liter", "pack".
    pub unit: String,
    pub quantity: f64,
    /// Reorder threshold; at or below this the item is flagged as low stock.
    pub minimum_stock: f64,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock
    }
}

/// One ingredient line of a recipe, with macro-nutrients per 100 g.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    /// Grams of the ingredient used for the whole recipe yield.
    pub grams: f64,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub carbs_per_100g: f64,
}

/// A standardized kitchen recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<RecipeId>,
    pub name: String,
    /// Number of meal portions the ingredient quantities yield.
    pub portion_yield: i32,
    pub ingredients: Vec<RecipeIngredient>,
}

/// A dated menu plan referencing the recipes to cook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPlan {
    pub id: Option<MenuPlanId>,
    pub menu_date: NaiveDate,
    pub recipe_ids: Vec<RecipeId>,
    /// SHA-256 of the submitted payload, used for duplicate detection.
    #[serde(default)]
    pub checksum: String,
}

/// Lifecycle of a production batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Planned,
    Cooking,
    Completed,
    Cancelled,
}

impl BatchStatus {
    /// Whether `next` is a legal successor of the current status.
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        use BatchStatus::*;
        matches!(
            (self, next),
            (Planned, Cooking) | (Planned, Cancelled) | (Cooking, Completed) | (Cooking, Cancelled)
        )
    }
}

/// A cooking run of one recipe on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionBatch {
    pub id: Option<ProductionBatchId>,
    pub batch_date: NaiveDate,
    pub recipe_id: RecipeId,
    pub planned_portions: i32,
    #[serde(default)]
    pub produced_portions: Option<i32>,
    pub status: BatchStatus,
}

/// A quality control observation against a production batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub id: Option<QualityCheckId>,
    pub batch_id: ProductionBatchId,
    /// e.g. "TEMPERATURE", "TASTE", "HYGIENE", "PORTION_WEIGHT".
    pub check_type: String,
    pub passed: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Lifecycle of a distribution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStatus {
    Scheduled,
    Loading,
    InTransit,
    Delivered,
    Cancelled,
}

impl DistributionStatus {
    /// Whether `next` is a legal successor of the current status.
    pub fn can_transition_to(self, next: DistributionStatus) -> bool {
        use DistributionStatus::*;
        matches!(
            (self, next),
            (Scheduled, Loading)
                | (Scheduled, Cancelled)
                | (Loading, InTransit)
                | (Loading, Cancelled)
                | (InTransit, Delivered)
                | (InTransit, Cancelled)
        )
    }
}

/// One delivery stop within a distribution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionStop {
    pub school_id: SchoolId,
    pub planned_portions: i32,
    /// 1-based visiting order within the run.
    pub sequence: i32,
}

/// A delivery run from the kitchen to a set of schools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub id: Option<DistributionId>,
    /// Human-facing code, e.g. "DST-1a2b3c4d".
    #[serde(default)]
    pub code: String,
    pub distribution_date: NaiveDate,
    pub vehicle_id: Option<VehicleId>,
    pub driver_name: String,
    pub status: DistributionStatus,
    pub stops: Vec<DistributionStop>,
}

impl Distribution {
    pub fn total_portions(&self) -> i32 {
        self.stops.iter().map(|s| s.planned_portions).sum()
    }
}

/// Biological sex used by the growth reference formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
}

/// A posyandu anthropometric measurement of one child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: Option<HealthRecordId>,
    pub posyandu_name: String,
    pub child_name: String,
    pub sex: Sex,
    pub age_months: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub measured_at: NaiveDate,
    /// Computed at creation time from the measurement fields.
    #[serde(default)]
    pub assessment: Option<crate::api::GrowthAssessment>,
}

/// Direction of a financial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinanceKind {
    Income,
    Expense,
}

/// A single ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: Option<FinancialRecordId>,
    pub record_date: NaiveDate,
    pub kind: FinanceKind,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_status_transitions() {
        assert!(BatchStatus::Planned.can_transition_to(BatchStatus::Cooking));
        assert!(BatchStatus::Cooking.can_transition_to(BatchStatus::Completed));
        assert!(!BatchStatus::Completed.can_transition_to(BatchStatus::Cooking));
        assert!(!BatchStatus::Cancelled.can_transition_to(BatchStatus::Planned));
    }

    #[test]
    fn test_distribution_status_transitions() {
        assert!(DistributionStatus::Scheduled.can_transition_to(DistributionStatus::Loading));
        assert!(DistributionStatus::InTransit.can_transition_to(DistributionStatus::Delivered));
        assert!(!DistributionStatus::Delivered.can_transition_to(DistributionStatus::Scheduled));
        assert!(!DistributionStatus::Scheduled.can_transition_to(DistributionStatus::Delivered));
    }

    #[test]
    fn test_low_stock_flag() {
        let item = InventoryItem {
            id: None,
            name: "Beras".to_string(),
            category: "Bahan Pokok".to_string(),
            unit: "kg".to_string(),
            quantity: 5.0,
            minimum_stock: 10.0,
            expiry_date: None,
        };
        assert!(item.is_low_stock());
    }

    #[test]
    fn test_status_serde_screaming_snake() {
        let json = serde_json::to_string(&DistributionStatus::InTransit).unwrap();
        assert_eq!(json, "\"IN_TRANSIT\"");
        let back: DistributionStatus = serde_json::from_str("\"DELIVERED\"").unwrap();
        assert_eq!(back, DistributionStatus::Delivered);
    }
}
