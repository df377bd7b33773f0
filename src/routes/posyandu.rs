//! Growth assessment types for the posyandu monitoring endpoints.

use serde::{Deserialize, Serialize};

use crate::models::Sex;

/// Nutrition status bucket derived from the approximate z-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NutritionStatus {
    Normal,
    Underweight,
    Stunted,
    Wasted,
    Overweight,
}

/// Request body for `POST /v1/health-records/assess`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessGrowthRequest {
    pub sex: Sex,
    pub age_months: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
}

/// Approximate z-scores and the derived status for one measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GrowthAssessment {
    pub weight_for_age: f64,
    pub height_for_age: f64,
    pub weight_for_height: f64,
    pub status: NutritionStatus,
}
