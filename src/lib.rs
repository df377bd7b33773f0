//! # SPPG Backend
//!
//! Backend service for the SPPG school nutrition program management system
//! (Sistem Pengelolaan Program Gizi).
//!
//! The crate covers the operational domains of a school feeding program:
//! schools, inventory, recipes and menu planning, production batches with
//! quality checks, distribution logistics, posyandu growth monitoring, and
//! financials. The REST API is exposed via Axum for the dashboard frontend.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Typed identifiers and the consolidated DTO surface
//! - [`models`]: Domain records and geographic primitives
//! - [`routes`]: Request/response types for the individual endpoints
//! - [`services`]: Business logic — route planning, growth scoring,
//!   nutrition aggregation, summaries
//! - [`db`]: Repository pattern and persistence backends
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Core computations
//!
//! Two pieces of real computation live in the service layer: the distribution
//! route planner ([`services::route_planner`]) and the anthropometric growth
//! scorer ([`services::growth`]). Both are synchronous, side-effect-free
//! transforms over small in-memory inputs.

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
