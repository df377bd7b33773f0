use crate::api::AssessGrowthRequest;
use crate::models::Sex;
use crate::routes::posyandu::NutritionStatus;
use crate::services::growth::{assess_growth, classify, GrowthInputError, MAX_AGE_MONTHS};

fn request(sex: Sex, age_months: i32, weight_kg: f64, height_cm: f64) -> AssessGrowthRequest {
    AssessGrowthRequest {
        sex,
        age_months,
        weight_kg,
        height_cm,
    }
}

// Male reference at 24 months: median weight 12.3 kg, median height 83.6 cm.

#[test]
fn test_median_measurement_scores_zero() {
    let assessment = assess_growth(&request(Sex::Male, 24, 12.3, 83.6)).unwrap();
    assert!(assessment.weight_for_age.abs() < 1e-9);
    assert!(assessment.height_for_age.abs() < 1e-9);
    assert_eq!(assessment.status, NutritionStatus::Normal);
}

#[test]
fn test_wasted_takes_precedence_over_underweight() {
    // Weight 8.0 at median height: both weight-for-height and weight-for-age
    // fall below -2, but the first matching branch is WASTED.
    let assessment = assess_growth(&request(Sex::Male, 24, 8.0, 83.6)).unwrap();
    assert!(assessment.weight_for_height < -2.0);
    assert!(assessment.weight_for_age < -2.0);
    assert_eq!(assessment.status, NutritionStatus::Wasted);
}

#[test]
fn test_stunted() {
    // Height 75 cm at 24 months is > 2 SD below the median; weight is
    // proportionate for that height.
    let assessment = assess_growth(&request(Sex::Male, 24, 9.5, 75.0)).unwrap();
    assert!(assessment.height_for_age < -2.0);
    assert!(assessment.weight_for_height >= -2.0);
    assert_eq!(assessment.status, NutritionStatus::Stunted);
}

#[test]
fn test_underweight() {
    // Low weight-for-age while height and proportionality stay above -2.
    let assessment = assess_growth(&request(Sex::Male, 24, 8.9, 80.0)).unwrap();
    assert!(assessment.weight_for_age < -2.0);
    assert!(assessment.height_for_age >= -2.0);
    assert!(assessment.weight_for_height >= -2.0);
    assert_eq!(assessment.status, NutritionStatus::Underweight);
}

#[test]
fn test_overweight() {
    let assessment = assess_growth(&request(Sex::Male, 24, 15.0, 83.6)).unwrap();
    assert!(assessment.weight_for_height > 2.0);
    assert_eq!(assessment.status, NutritionStatus::Overweight);
}

#[test]
fn test_female_reference_differs_from_male() {
    let male = assess_growth(&request(Sex::Male, 6, 6.3, 62.0)).unwrap();
    let female = assess_growth(&request(Sex::Female, 6, 6.3, 62.0)).unwrap();
    // Same measurement scores higher against the lighter female reference.
    assert!(female.weight_for_age > male.weight_for_age);
}

#[test]
fn test_infant_and_toddler_slopes_join_at_twelve_months() {
    // Either branch of the piecewise median must agree at the breakpoint.
    let at_twelve = assess_growth(&request(Sex::Male, 12, 9.3, 74.0)).unwrap();
    assert!(at_twelve.weight_for_age.abs() < 1e-9);
    assert!(at_twelve.height_for_age.abs() < 1e-9);
}

#[test]
fn test_classify_precedence_order() {
    assert_eq!(classify(-3.0, -3.0, -3.0), NutritionStatus::Wasted);
    assert_eq!(classify(-3.0, -3.0, 0.0), NutritionStatus::Stunted);
    assert_eq!(classify(-3.0, 0.0, 0.0), NutritionStatus::Underweight);
    assert_eq!(classify(0.0, 0.0, 3.0), NutritionStatus::Overweight);
    assert_eq!(classify(0.0, 0.0, 0.0), NutritionStatus::Normal);
    // Exactly -2 is not a deficit; the comparison is strict.
    assert_eq!(classify(-2.0, -2.0, -2.0), NutritionStatus::Normal);
}

#[test]
fn test_age_out_of_range_is_rejected() {
    let err = assess_growth(&request(Sex::Male, MAX_AGE_MONTHS + 1, 15.0, 100.0)).unwrap_err();
    assert!(matches!(err, GrowthInputError::AgeOutOfRange(_)));

    let err = assess_growth(&request(Sex::Male, -1, 5.0, 60.0)).unwrap_err();
    assert!(matches!(err, GrowthInputError::AgeOutOfRange(_)));
}

#[test]
fn test_non_positive_measurements_are_rejected() {
    let err = assess_growth(&request(Sex::Female, 12, 0.0, 70.0)).unwrap_err();
    assert!(matches!(err, GrowthInputError::NonPositiveWeight(_)));

    let err = assess_growth(&request(Sex::Female, 12, 9.0, -1.0)).unwrap_err();
    assert!(matches!(err, GrowthInputError::NonPositiveHeight(_)));
}
