//! Recipe nutrition aggregation.
//!
//! Macro-nutrients are stored per 100 g of ingredient; totals are a single
//! accumulation pass over the ingredient list, divided by the portion yield
//! for per-portion values.

use crate::api::{NutritionTotals, RecipeNutrition};
use crate::models::{Recipe, RecipeIngredient};

#[derive(Debug, thiserror::Error)]
pub enum NutritionError {
    #[error("recipe '{0}' has no portion yield")]
    ZeroYield(String),
    #[error("recipe has no id")]
    MissingId,
}

/// Accumulate the macro-nutrients of a list of ingredients.
pub fn aggregate_ingredients(ingredients: &[RecipeIngredient]) -> NutritionTotals {
    let mut totals = NutritionTotals::default();
    for ingredient in ingredients {
        let factor = ingredient.grams / 100.0;
        totals.calories_kcal += factor * ingredient.calories_per_100g;
        totals.protein_g += factor * ingredient.protein_per_100g;
        totals.fat_g += factor * ingredient.fat_per_100g;
        totals.carbs_g += factor * ingredient.carbs_per_100g;
    }
    totals
}

/// Compute the nutrition summary of a stored recipe.
pub fn compute_recipe_nutrition(recipe: &Recipe) -> Result<RecipeNutrition, NutritionError> {
    let recipe_id = recipe.id.ok_or(NutritionError::MissingId)?;
    if recipe.portion_yield <= 0 {
        return Err(NutritionError::ZeroYield(recipe.name.clone()));
    }

    let total = aggregate_ingredients(&recipe.ingredients);
    let yield_f = f64::from(recipe.portion_yield);
    let per_portion = NutritionTotals {
        calories_kcal: total.calories_kcal / yield_f,
        protein_g: total.protein_g / yield_f,
        fat_g: total.fat_g / yield_f,
        carbs_g: total.carbs_g / yield_f,
    };

    Ok(RecipeNutrition {
        recipe_id,
        recipe_name: recipe.name.clone(),
        portion_yield: recipe.portion_yield,
        total,
        per_portion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecipeId;

    fn ingredient(
        name: &str,
        grams: f64,
        calories: f64,
        protein: f64,
        fat: f64,
        carbs: f64,
    ) -> RecipeIngredient {
        RecipeIngredient {
            name: name.to_string(),
            grams,
            calories_per_100g: calories,
            protein_per_100g: protein,
            fat_per_100g: fat,
            carbs_per_100g: carbs,
        }
    }

    fn nasi_ayam() -> Recipe {
        Recipe {
            id: Some(RecipeId::new(1)),
            name: "Nasi Ayam".to_string(),
            portion_yield: 10,
            ingredients: vec![
                // 2 kg cooked rice
                ingredient("Nasi", 2000.0, 130.0, 2.7, 0.3, 28.0),
                // 1 kg chicken
                ingredient("Ayam", 1000.0, 165.0, 31.0, 3.6, 0.0),
            ],
        }
    }

    #[test]
    fn test_aggregate_ingredients() {
        let totals = aggregate_ingredients(&nasi_ayam().ingredients);
        assert!((totals.calories_kcal - (20.0 * 130.0 + 10.0 * 165.0)).abs() < 1e-9);
        assert!((totals.protein_g - (20.0 * 2.7 + 10.0 * 31.0)).abs() < 1e-9);
        assert!((totals.carbs_g - 560.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_ingredients_are_zero() {
        let totals = aggregate_ingredients(&[]);
        assert_eq!(totals, NutritionTotals::default());
    }

    #[test]
    fn test_per_portion_division() {
        let nutrition = compute_recipe_nutrition(&nasi_ayam()).unwrap();
        assert!((nutrition.per_portion.calories_kcal * 10.0 - nutrition.total.calories_kcal).abs() < 1e-9);
        assert!((nutrition.per_portion.calories_kcal - 425.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_yield_is_rejected() {
        let mut recipe = nasi_ayam();
        recipe.portion_yield = 0;
        assert!(matches!(
            compute_recipe_nutrition(&recipe),
            Err(NutritionError::ZeroYield(_))
        ));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut recipe = nasi_ayam();
        recipe.id = None;
        assert!(matches!(
            compute_recipe_nutrition(&recipe),
            Err(NutritionError::MissingId)
        ));
    }
}
