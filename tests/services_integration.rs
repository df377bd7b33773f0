//! End-to-end tests of the service layer against the in-memory repository.
//!
//! These walk a full operational day: register schools and a vehicle, stock
//! the warehouse, plan a menu, cook a batch with quality checks, run a
//! distribution, record posyandu measurements and ledger entries, and read
//! the dashboard.

use chrono::NaiveDate;

use sppg_backend::db::repositories::LocalRepository;
use sppg_backend::db::repository::RepositoryError;
use sppg_backend::db::services;
use sppg_backend::models::{
    BatchStatus, DistributionStatus, DistributionStop, FinanceKind, FinancialRecord, HealthRecord,
    InventoryItem, Recipe, RecipeIngredient, School, Sex, Vehicle,
};
use sppg_backend::routes::finance::FinanceSummaryQuery;
use sppg_backend::services::{compute_dashboard_summary, compute_finance_summary};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn school(name: &str, students: i32) -> School {
    School {
        id: None,
        name: name.to_string(),
        address: "Jl. Pendidikan 1".to_string(),
        latitude: -6.2,
        longitude: 106.8,
        student_count: students,
        deleted_at: None,
    }
}

fn rice_recipe() -> Recipe {
    Recipe {
        id: None,
        name: "Nasi Ayam Sayur".to_string(),
        portion_yield: 500,
        ingredients: vec![
            RecipeIngredient {
                name: "Beras".to_string(),
                grams: 50_000.0,
                calories_per_100g: 360.0,
                protein_per_100g: 6.6,
                fat_per_100g: 0.6,
                carbs_per_100g: 79.0,
            },
            RecipeIngredient {
                name: "Ayam".to_string(),
                grams: 25_000.0,
                calories_per_100g: 239.0,
                protein_per_100g: 27.0,
                fat_per_100g: 14.0,
                carbs_per_100g: 0.0,
            },
        ],
    }
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
}

#[tokio::test]
async fn test_full_operational_day() {
    let repo = LocalRepository::new();
    let day = date(2025, 3, 10);

    // Register schools and a vehicle.
    let sdn1 = services::create_school(&repo, school("SDN Menteng 01", 220))
        .await
        .unwrap();
    let sdn2 = services::create_school(&repo, school("SDN Cikini 02", 180))
        .await
        .unwrap();
    let vehicle = services::create_vehicle(
        &repo,
        Vehicle {
            id: None,
            plate_number: "B 4021 SPG".to_string(),
            kind: "box-truck".to_string(),
            capacity_portions: 600,
            is_active: true,
        },
    )
    .await
    .unwrap();

    // Stock the warehouse; rice is below its reorder threshold.
    services::create_inventory_item(
        &repo,
        InventoryItem {
            id: None,
            name: "Beras".to_string(),
            category: "Bahan Pokok".to_string(),
            unit: "kg".to_string(),
            quantity: 40.0,
            minimum_stock: 100.0,
            expiry_date: None,
        },
    )
    .await
    .unwrap();
    let low = services::list_low_stock_items(&repo).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Beras");

    // Plan the menu and cook.
    let recipe = services::create_recipe(&repo, rice_recipe()).await.unwrap();
    let recipe_id = recipe.id.unwrap();
    let plan = services::create_menu_plan(&repo, day, vec![recipe_id])
        .await
        .unwrap();
    assert_eq!(plan.checksum.len(), 64);

    let batch = services::create_batch(&repo, day, recipe_id, 400).await.unwrap();
    let batch_id = batch.id.unwrap();
    services::update_batch_status(&repo, batch_id, BatchStatus::Cooking, None)
        .await
        .unwrap();
    services::add_quality_check(&repo, batch_id, "TEMPERATURE".to_string(), true, None)
        .await
        .unwrap();
    let batch = services::update_batch_status(&repo, batch_id, BatchStatus::Completed, Some(395))
        .await
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(batch.produced_portions, Some(395));

    // Distribute to both schools.
    let distribution = services::create_distribution(
        &repo,
        day,
        vehicle.id,
        "Budi Santoso".to_string(),
        vec![
            DistributionStop {
                school_id: sdn1.id.unwrap(),
                planned_portions: 220,
                sequence: 0,
            },
            DistributionStop {
                school_id: sdn2.id.unwrap(),
                planned_portions: 175,
                sequence: 0,
            },
        ],
    )
    .await
    .unwrap();
    assert_eq!(distribution.total_portions(), 395);
    assert_eq!(
        distribution.stops.iter().map(|s| s.sequence).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let dist_id = distribution.id.unwrap();
    for status in [
        DistributionStatus::Loading,
        DistributionStatus::InTransit,
        DistributionStatus::Delivered,
    ] {
        services::update_distribution_status(&repo, dist_id, status)
            .await
            .unwrap();
    }

    // Record a posyandu measurement and the day's ledger.
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
            measured_at: day,
            assessment: None,
        },
    )
    .await
    .unwrap();
    assert!(record.assessment.is_some());

    services::create_financial_record(
        &repo,
        FinancialRecord {
            id: None,
            record_date: day,
            kind: FinanceKind::Expense,
            category: "Bahan Baku".to_string(),
            amount: 4_500_000.0,
            description: Some("belanja pasar".to_string()),
        },
    )
    .await
    .unwrap();

    // The dashboard reflects all of it.
    let summary = compute_dashboard_summary(&repo, day).await.unwrap();
    assert_eq!(summary.active_schools, 2);
    assert_eq!(summary.total_students, 400);
    assert_eq!(summary.low_stock_items, 1);
    assert_eq!(summary.batches_in_progress, 0);
    assert_eq!(summary.distributions_today, 1);
    assert_eq!(summary.portions_scheduled_today, 395);
    assert!((summary.finance_balance + 4_500_000.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_soft_deleted_school_rejected_as_stop() {
    let repo = LocalRepository::new();
    let s = services::create_school(&repo, school("SDN Tutup 99", 50))
        .await
        .unwrap();
    let school_id = s.id.unwrap();
    services::delete_school(&repo, school_id).await.unwrap();

    let err = services::create_distribution(
        &repo,
        date(2025, 3, 10),
        None,
        "Budi".to_string(),
        vec![DistributionStop {
            school_id,
            planned_portions: 50,
            sequence: 1,
        }],
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ValidationError { .. } | RepositoryError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_finance_summary_matches_ledger() {
    let repo = LocalRepository::new();
    let entries = [
        (FinanceKind::Income, "APBN", 10_000_000.0),
        (FinanceKind::Expense, "Bahan Baku", 3_000_000.0),
        (FinanceKind::Expense, "Gaji", 2_000_000.0),
    ];
    for (kind, category, amount) in entries {
        services::create_financial_record(
            &repo,
            FinancialRecord {
                id: None,
                record_date: date(2025, 3, 1),
                kind,
                category: category.to_string(),
                amount,
                description: None,
            },
        )
        .await
        .unwrap();
    }

    let records = services::list_financial_records(&repo).await.unwrap();
    let summary = compute_finance_summary(&records, &FinanceSummaryQuery::default());
    assert!((summary.balance - 5_000_000.0).abs() < 1e-9);
    assert_eq!(summary.by_category.len(), 3);
}

#[tokio::test]
async fn test_recipe_nutrition_per_portion() {
    let repo = LocalRepository::new();
    let recipe = services::create_recipe(&repo, rice_recipe()).await.unwrap();
    let nutrition = services::get_recipe_nutrition(&repo, recipe.id.unwrap())
        .await
        .unwrap();

    // 50 kg rice at 360 kcal/100g plus 25 kg chicken at 239 kcal/100g,
    // split over 500 portions.
    let expected_total = 500.0 * 360.0 + 250.0 * 239.0;
    assert!((nutrition.total.calories_kcal - expected_total).abs() < 1e-6);
    assert!((nutrition.per_portion.calories_kcal - expected_total / 500.0).abs() < 1e-6);
}
