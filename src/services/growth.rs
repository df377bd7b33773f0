//! Anthropometric growth scoring for posyandu records.
//!
//! Computes approximate weight-for-age, height-for-age and weight-for-height
//! z-scores from linear expected-value formulas with linearly growing
//! standard deviations. This is an explicit simplification of the WHO child
//! growth standards, not the LMS lookup tables, and must not be used for
//! clinical nutrition status determination.
//!
//! All reference constants live in [`GrowthReference`]; swapping the linear
//! model for real WHO tables would be confined to this module.

use crate::api::{AssessGrowthRequest, GrowthAssessment};
use crate::models::Sex;
use crate::routes::posyandu::NutritionStatus;

/// Oldest age, in months, the reference formulas cover.
pub const MAX_AGE_MONTHS: i32 = 60;

/// Z-score below which a measurement is flagged as deficient.
const DEFICIT_THRESHOLD: f64 = -2.0;

/// Weight-for-height z-score above which a child is flagged as overweight.
const EXCESS_THRESHOLD: f64 = 2.0;

/// Invalid measurement input.
#[derive(Debug, thiserror::Error)]
pub enum GrowthInputError {
    #[error("age must be between 0 and {MAX_AGE_MONTHS} months, got {0}")]
    AgeOutOfRange(i32),
    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(f64),
    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

/// Sex-specific linear growth reference.
///
/// Medians are piecewise linear in age with a faster infant slope up to 12
/// months; standard deviations grow linearly with age (or height for the
/// weight-for-height reference).
struct GrowthReference {
    birth_weight_kg: f64,
    infant_weight_slope: f64,
    toddler_weight_slope: f64,
    birth_height_cm: f64,
    infant_height_slope: f64,
    toddler_height_slope: f64,
    weight_for_height_slope: f64,
}

const MALE_REFERENCE: GrowthReference = GrowthReference {
    birth_weight_kg: 3.3,
    infant_weight_slope: 0.5,
    toddler_weight_slope: 0.25,
    birth_height_cm: 50.0,
    infant_height_slope: 2.0,
    toddler_height_slope: 0.8,
    weight_for_height_slope: 0.25,
};

const FEMALE_REFERENCE: GrowthReference = GrowthReference {
    birth_weight_kg: 3.2,
    infant_weight_slope: 0.47,
    toddler_weight_slope: 0.22,
    birth_height_cm: 49.2,
    infant_height_slope: 1.9,
    toddler_height_slope: 0.75,
    weight_for_height_slope: 0.24,
};

impl GrowthReference {
    fn for_sex(sex: Sex) -> &'static GrowthReference {
        match sex {
            Sex::Male => &MALE_REFERENCE,
            Sex::Female => &FEMALE_REFERENCE,
        }
    }

    fn median_weight_kg(&self, age_months: f64) -> f64 {
        if age_months <= 12.0 {
            self.birth_weight_kg + self.infant_weight_slope * age_months
        } else {
            self.birth_weight_kg
                + self.infant_weight_slope * 12.0
                + self.toddler_weight_slope * (age_months - 12.0)
        }
    }

    fn median_height_cm(&self, age_months: f64) -> f64 {
        if age_months <= 12.0 {
            self.birth_height_cm + self.infant_height_slope * age_months
        } else {
            self.birth_height_cm
                + self.infant_height_slope * 12.0
                + self.toddler_height_slope * (age_months - 12.0)
        }
    }

    fn expected_weight_for_height_kg(&self, height_cm: f64) -> f64 {
        self.birth_weight_kg + self.weight_for_height_slope * (height_cm - self.birth_height_cm)
    }
}

fn weight_sd_kg(age_months: f64) -> f64 {
    0.9 + 0.03 * age_months
}

fn height_sd_cm(age_months: f64) -> f64 {
    2.0 + 0.06 * age_months
}

fn weight_for_height_sd_kg(height_above_birth_cm: f64) -> f64 {
    0.8 + 0.02 * height_above_birth_cm.max(0.0)
}

/// Bucket the three z-scores into a nutrition status.
///
/// First matching branch wins: wasting dominates stunting, which dominates
/// underweight; overweight is only reported for otherwise unremarkable
/// measurements.
pub fn classify(weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> NutritionStatus {
    if weight_for_height < DEFICIT_THRESHOLD {
        NutritionStatus::Wasted
    } else if height_for_age < DEFICIT_THRESHOLD {
        NutritionStatus::Stunted
    } else if weight_for_age < DEFICIT_THRESHOLD {
        NutritionStatus::Underweight
    } else if weight_for_height > EXCESS_THRESHOLD {
        NutritionStatus::Overweight
    } else {
        NutritionStatus::Normal
    }
}

/// Compute the approximate z-scores and status for one measurement.
pub fn assess_growth(request: &AssessGrowthRequest) -> Result<GrowthAssessment, GrowthInputError> {
    if request.age_months < 0 || request.age_months > MAX_AGE_MONTHS {
        return Err(GrowthInputError::AgeOutOfRange(request.age_months));
    }
    if request.weight_kg <= 0.0 {
        return Err(GrowthInputError::NonPositiveWeight(request.weight_kg));
    }
    if request.height_cm <= 0.0 {
        return Err(GrowthInputError::NonPositiveHeight(request.height_cm));
    }

    let reference = GrowthReference::for_sex(request.sex);
    let age = f64::from(request.age_months);

    let weight_for_age =
        (request.weight_kg - reference.median_weight_kg(age)) / weight_sd_kg(age);
    let height_for_age =
        (request.height_cm - reference.median_height_cm(age)) / height_sd_cm(age);
    let weight_for_height = (request.weight_kg
        - reference.expected_weight_for_height_kg(request.height_cm))
        / weight_for_height_sd_kg(request.height_cm - reference.birth_height_cm);

    Ok(GrowthAssessment {
        weight_for_age,
        height_for_age,
        weight_for_height,
        status: classify(weight_for_age, height_for_age, weight_for_height),
    })
}

#[cfg(test)]
#[path = "growth_tests.rs"]
mod growth_tests;
