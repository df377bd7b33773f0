//! Recipe nutrition aggregation types.

use serde::{Deserialize, Serialize};

use crate::api::RecipeId;

/// Ad-hoc ingredient input for nutrition computation outside a stored recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub grams: f64,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub carbs_per_100g: f64,
}

/// Accumulated macro-nutrients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

/// Nutrition summary of one recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeNutrition {
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub portion_yield: i32,
    pub total: NutritionTotals,
    pub per_portion: NutritionTotals,
}
