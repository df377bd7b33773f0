//! Data storage for the SPPG program via the Repository pattern.
//!
//! The module follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, CLI, etc.)           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Validation and status transitions                     │
//! │  - Menu-plan checksum deduplication                      │
//! │  - Growth assessment on record creation                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │ Local (in-memory) │ Postgres  │
//!     └───────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! **For new code, use the service layer:**
//! ```ignore
//! use sppg_backend::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let schools = services::list_schools(repo.as_ref(), false).await?;
//!     Ok(())
//! }
//! ```

// Feature flag priority: postgres > local
// When multiple features are enabled (e.g., --all-features), postgres takes precedence.
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PostgresConfig {
    _private: (),
}
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    _private: (),
}

pub use checksum::calculate_checksum;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    DistributionRepository, ErrorContext, FinanceRepository, FleetRepository, FullRepository,
    HealthRepository, InventoryRepository, MenuRepository, ProductionRepository, RepositoryError,
    RepositoryResult, SchoolRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

// Priority: postgres > local (when --all-features is used)
#[cfg(feature = "postgres-repo")]
async fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    let config = PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
    let repo = RepositoryFactory::create_postgres(&config).await?;
    Ok(repo as Arc<dyn FullRepository>)
}

#[cfg(all(feature = "local-repo", not(feature = "postgres-repo")))]
fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    Ok(RepositoryFactory::create_local())
}

/// Initialize the global repository singleton for the selected backend.
#[cfg(feature = "postgres-repo")]
pub async fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository()
        .await
        .map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Initialize the global repository singleton for the selected backend.
#[cfg(all(feature = "local-repo", not(feature = "postgres-repo")))]
pub async fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    REPOSITORY
        .get()
        .context("Database not initialized. Call init_repository() first.")
}
