//! Application state shared across request handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{ProfileRepository, RateRepository};
use crate::engine::ShippingCalculator;

/// Shared application state.
///
/// Cheap to clone (everything is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    profiles: Arc<ProfileRepository>,
    calculator: ShippingCalculator,
}

impl AppState {
    /// Build application state from configuration and a database pool.
    ///
    /// Wires the repositories into the quote engine; the same repository
    /// instances back both the engine's store seams and the profile routes.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let profiles = Arc::new(ProfileRepository::new(pool.clone()));
        let rates = Arc::new(RateRepository::new(pool.clone()));
        let calculator =
            ShippingCalculator::new(profiles.clone(), rates, config.store_timeout());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                profiles,
                calculator,
            }),
        }
    }

    /// Get the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the profile repository.
    #[must_use]
    pub fn profiles(&self) -> &ProfileRepository {
        &self.inner.profiles
    }

    /// Get the quote engine.
    #[must_use]
    pub fn calculator(&self) -> &ShippingCalculator {
        &self.inner.calculator
    }
}
