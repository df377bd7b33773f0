use chrono::NaiveDate;

use crate::api::RecipeId;
use crate::db::repositories::LocalRepository;
use crate::db::repository::RepositoryError;
use crate::db::services;
use crate::models::{
    BatchStatus, DistributionStatus, DistributionStop, FinanceKind, FinancialRecord, HealthRecord,
    Recipe, RecipeIngredient, School, Sex, Vehicle,
};
use crate::routes::posyandu::NutritionStatus;

fn school(name: &str, lat: f64, lon: f64) -> School {
    School {
        id: None,
        name: name.to_string(),
        address: "Jl. Sekolah 1".to_string(),
        latitude: lat,
        longitude: lon,
        student_count: 120,
        deleted_at: None,
    }
}

fn recipe(name: &str) -> Recipe {
    Recipe {
        id: None,
        name: name.to_string(),
        portion_yield: 100,
        ingredients: vec![RecipeIngredient {
            name: "Beras".to_string(),
            grams: 10000.0,
            calories_per_100g: 360.0,
            protein_per_100g: 6.6,
            fat_per_100g: 0.6,
            carbs_per_100g: 79.0,
        }],
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_create_school_rejects_bad_coordinates() {
    let repo = LocalRepository::new();
    let err = services::create_school(&repo, school("SDN 01", -100.0, 106.8))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_create_school_rejects_empty_name() {
    let repo = LocalRepository::new();
    let err = services::create_school(&repo, school("   ", -6.2, 106.8))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_school_crud_roundtrip() {
    let repo = LocalRepository::new();
    let created = services::create_school(&repo, school("SDN Menteng 01", -6.19, 106.83))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let mut updated = created.clone();
    updated.student_count = 150;
    let updated = services::update_school(&repo, id, updated).await.unwrap();
    assert_eq!(updated.student_count, 150);

    services::delete_school(&repo, id).await.unwrap();
    assert!(services::list_schools(&repo, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_menu_plan_duplicate_is_rejected() {
    let repo = LocalRepository::new();
    let r = services::create_recipe(&repo, recipe("Nasi Ayam")).await.unwrap();
    let recipe_id = r.id.unwrap();

    let plan = services::create_menu_plan(&repo, date(2025, 3, 10), vec![recipe_id])
        .await
        .unwrap();
    assert!(!plan.checksum.is_empty());

    let err = services::create_menu_plan(&repo, date(2025, 3, 10), vec![recipe_id])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));

    // A different date is a different plan.
    services::create_menu_plan(&repo, date(2025, 3, 11), vec![recipe_id])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_menu_plan_checksum_ignores_recipe_order() {
    let repo = LocalRepository::new();
    let a = services::create_recipe(&repo, recipe("A")).await.unwrap().id.unwrap();
    let b = services::create_recipe(&repo, recipe("B")).await.unwrap().id.unwrap();

    services::create_menu_plan(&repo, date(2025, 3, 10), vec![a, b])
        .await
        .unwrap();
    let err = services::create_menu_plan(&repo, date(2025, 3, 10), vec![b, a])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[tokio::test]
async fn test_menu_plan_rejects_unknown_recipe() {
    let repo = LocalRepository::new();
    let err = services::create_menu_plan(&repo, date(2025, 3, 10), vec![RecipeId::new(404)])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_batch_lifecycle() {
    let repo = LocalRepository::new();
    let r = services::create_recipe(&repo, recipe("Soto")).await.unwrap();
    let batch = services::create_batch(&repo, date(2025, 3, 10), r.id.unwrap(), 500)
        .await
        .unwrap();
    let id = batch.id.unwrap();
    assert_eq!(batch.status, BatchStatus::Planned);

    services::update_batch_status(&repo, id, BatchStatus::Cooking, None)
        .await
        .unwrap();
    let completed =
        services::update_batch_status(&repo, id, BatchStatus::Completed, Some(480))
            .await
            .unwrap();
    assert_eq!(completed.produced_portions, Some(480));
}

#[tokio::test]
async fn test_batch_illegal_transition_conflicts() {
    let repo = LocalRepository::new();
    let r = services::create_recipe(&repo, recipe("Soto")).await.unwrap();
    let batch = services::create_batch(&repo, date(2025, 3, 10), r.id.unwrap(), 500)
        .await
        .unwrap();

    // Planned -> Completed skips Cooking.
    let err = services::update_batch_status(
        &repo,
        batch.id.unwrap(),
        BatchStatus::Completed,
        Some(500),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[tokio::test]
async fn test_produced_portions_only_on_completion() {
    let repo = LocalRepository::new();
    let r = services::create_recipe(&repo, recipe("Soto")).await.unwrap();
    let batch = services::create_batch(&repo, date(2025, 3, 10), r.id.unwrap(), 500)
        .await
        .unwrap();

    let err =
        services::update_batch_status(&repo, batch.id.unwrap(), BatchStatus::Cooking, Some(100))
            .await
            .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_quality_checks_attach_to_batch() {
    let repo = LocalRepository::new();
    let r = services::create_recipe(&repo, recipe("Soto")).await.unwrap();
    let batch = services::create_batch(&repo, date(2025, 3, 10), r.id.unwrap(), 500)
        .await
        .unwrap();
    let batch_id = batch.id.unwrap();

    services::add_quality_check(&repo, batch_id, "TEMPERATURE".to_string(), true, None)
        .await
        .unwrap();
    services::add_quality_check(
        &repo,
        batch_id,
        "TASTE".to_string(),
        false,
        Some("too salty".to_string()),
    )
    .await
    .unwrap();

    let checks = services::list_quality_checks(&repo, batch_id).await.unwrap();
    assert_eq!(checks.len(), 2);
}

#[tokio::test]
async fn test_distribution_lifecycle_and_code() {
    let repo = LocalRepository::new();
    let s = services::create_school(&repo, school("SDN 01", -6.2, 106.8))
        .await
        .unwrap();
    let vehicle = services::create_vehicle(
        &repo,
        Vehicle {
            id: None,
            plate_number: "B 1 SPPG".to_string(),
            kind: "box-truck".to_string(),
            capacity_portions: 600,
            is_active: true,
        },
    )
    .await
    .unwrap();

    let distribution = services::create_distribution(
        &repo,
        date(2025, 3, 10),
        vehicle.id,
        "Budi".to_string(),
        vec![DistributionStop {
            school_id: s.id.unwrap(),
            planned_portions: 120,
            sequence: 0,
        }],
    )
    .await
    .unwrap();

    assert!(distribution.code.starts_with("DST-"));
    assert_eq!(distribution.stops[0].sequence, 1);
    assert_eq!(distribution.status, DistributionStatus::Scheduled);

    let id = distribution.id.unwrap();
    services::update_distribution_status(&repo, id, DistributionStatus::Loading)
        .await
        .unwrap();
    services::update_distribution_status(&repo, id, DistributionStatus::InTransit)
        .await
        .unwrap();
    let delivered =
        services::update_distribution_status(&repo, id, DistributionStatus::Delivered)
            .await
            .unwrap();
    assert_eq!(delivered.status, DistributionStatus::Delivered);

    // Delivered is terminal.
    let err = services::update_distribution_status(&repo, id, DistributionStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[tokio::test]
async fn test_distribution_requires_known_vehicle() {
    let repo = LocalRepository::new();
    let s = services::create_school(&repo, school("SDN 01", -6.2, 106.8))
        .await
        .unwrap();
    let err = services::create_distribution(
        &repo,
        date(2025, 3, 10),
        Some(crate::api::VehicleId::new(404)),
        "Budi".to_string(),
        vec![DistributionStop {
            school_id: s.id.unwrap(),
            planned_portions: 120,
            sequence: 1,
        }],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_health_record_gets_assessment() {
    let repo = LocalRepository::new();
    let record = services::create_health_record(
        &repo,
        HealthRecord {
            id: None,
            posyandu_name: "Posyandu Melati".to_string(),
            child_name: "Siti".to_string(),
            sex: Sex::Female,
            age_months: 24,
            weight_kg: 11.5,
            height_cm: 81.0,
            measured_at: date(2025, 3, 10),
            assessment: None,
        },
    )
    .await
    .unwrap();

    let assessment = record.assessment.unwrap();
    assert_eq!(assessment.status, NutritionStatus::Normal);
}

#[tokio::test]
async fn test_health_record_invalid_age_is_rejected() {
    let repo = LocalRepository::new();
    let err = services::create_health_record(
        &repo,
        HealthRecord {
            id: None,
            posyandu_name: "Posyandu Melati".to_string(),
            child_name: "Siti".to_string(),
            sex: Sex::Female,
            age_months: 120,
            weight_kg: 20.0,
            height_cm: 110.0,
            measured_at: date(2025, 3, 10),
            assessment: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_financial_record_validation() {
    let repo = LocalRepository::new();
    let err = services::create_financial_record(
        &repo,
        FinancialRecord {
            id: None,
            record_date: date(2025, 3, 1),
            kind: FinanceKind::Expense,
            category: "Bahan Baku".to_string(),
            amount: -5.0,
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_recipe_nutrition_via_repository() {
    let repo = LocalRepository::new();
    let r = services::create_recipe(&repo, recipe("Nasi")).await.unwrap();
    let nutrition = services::get_recipe_nutrition(&repo, r.id.unwrap())
        .await
        .unwrap();
    // 10 kg of rice at 360 kcal/100g over 100 portions.
    assert!((nutrition.total.calories_kcal - 36000.0).abs() < 1e-9);
    assert!((nutrition.per_portion.calories_kcal - 360.0).abs() < 1e-9);
}
