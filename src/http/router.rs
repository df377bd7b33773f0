//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Schools
        .route("/schools", get(handlers::list_schools).post(handlers::create_school))
        .route(
            "/schools/{id}",
            get(handlers::get_school)
                .put(handlers::update_school)
                .delete(handlers::delete_school),
        )
        // Fleet
        .route("/vehicles", get(handlers::list_vehicles).post(handlers::create_vehicle))
        // Inventory
        .route("/inventory", get(handlers::list_inventory).post(handlers::create_inventory_item))
        .route("/inventory/low-stock", get(handlers::list_low_stock))
        .route(
            "/inventory/{id}",
            get(handlers::get_inventory_item)
                .put(handlers::update_inventory_item)
                .delete(handlers::delete_inventory_item),
        )
        // Recipes and menu plans
        .route("/recipes", get(handlers::list_recipes).post(handlers::create_recipe))
        .route("/recipes/{id}", get(handlers::get_recipe))
        .route("/recipes/{id}/nutrition", get(handlers::get_recipe_nutrition))
        .route("/menu-plans", get(handlers::list_menu_plans).post(handlers::create_menu_plan))
        // Production
        .route(
            "/production-batches",
            get(handlers::list_batches).post(handlers::create_batch),
        )
        .route("/production-batches/{id}", get(handlers::get_batch))
        .route("/production-batches/{id}/status", put(handlers::update_batch_status))
        .route(
            "/production-batches/{id}/quality-checks",
            get(handlers::list_quality_checks).post(handlers::create_quality_check),
        )
        // Distributions
        .route(
            "/distributions",
            get(handlers::list_distributions).post(handlers::create_distribution),
        )
        .route("/distributions/optimize-routes", post(handlers::optimize_routes))
        .route("/distributions/{id}", get(handlers::get_distribution))
        .route("/distributions/{id}/status", put(handlers::update_distribution_status))
        // Posyandu
        .route(
            "/health-records",
            get(handlers::list_health_records).post(handlers::create_health_record),
        )
        .route("/health-records/assess", post(handlers::assess_growth_endpoint))
        .route("/health-records/{id}", get(handlers::get_health_record))
        // Finance
        .route(
            "/finance/records",
            get(handlers::list_financial_records).post(handlers::create_financial_record),
        )
        .route("/finance/summary", get(handlers::finance_summary))
        // Dashboard
        .route("/dashboard/summary", get(handlers::dashboard_summary));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
