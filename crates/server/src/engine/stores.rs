//! Store seams the engine reads profiles and rates through.
//!
//! The engine never talks to `PostgreSQL` directly; it goes through these
//! traits so the database repositories, in-memory fixtures, and anything
//! else (a cached layer, a remote rate feed) plug in the same way. Store
//! failures are contained here: the engine degrades to fallbacks and a quote
//! is still produced.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use hikyaku_core::{CountryCode, ProfileId};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::{CorrectionProfile, RateTableRow};

/// Read access to correction profiles.
///
/// Both lookups see only active profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch an active profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the underlying store fails.
    async fn get_profile(&self, id: ProfileId) -> Result<Option<CorrectionProfile>, RepositoryError>;

    /// Fetch the active default profile, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the underlying store fails.
    async fn get_default_profile(&self) -> Result<Option<CorrectionProfile>, RepositoryError>;
}

/// Read access to the carrier rate table.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Rows whose destination matches and whose weight band contains
    /// `weight_grams`, sorted by price ascending, at most
    /// [`super::rates::MAX_RATE_RESULTS`] of them.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the underlying store fails.
    async fn query_rates(
        &self,
        destination: &CountryCode,
        weight_grams: i32,
    ) -> Result<Vec<RateTableRow>, RepositoryError>;
}

/// A store call that did not produce a value: the store failed or the call
/// exceeded the configured timeout.
///
/// Never surfaced to clients; the engine logs it and degrades.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Run a store call with a timeout, folding the elapsed case into
/// [`StoreError`].
pub(crate) async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StoreError::Repository(e)),
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}

/// In-memory profile store, used in tests and for running the engine without
/// a database.
#[derive(Debug, Default, Clone)]
pub struct StaticProfileStore {
    profiles: Vec<CorrectionProfile>,
}

impl StaticProfileStore {
    #[must_use]
    pub const fn new(profiles: Vec<CorrectionProfile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileStore for StaticProfileStore {
    async fn get_profile(
        &self,
        id: ProfileId,
    ) -> Result<Option<CorrectionProfile>, RepositoryError> {
        Ok(self
            .profiles
            .iter()
            .find(|p| p.id == Some(id) && p.is_active)
            .cloned())
    }

    async fn get_default_profile(&self) -> Result<Option<CorrectionProfile>, RepositoryError> {
        Ok(self
            .profiles
            .iter()
            .find(|p| p.is_default && p.is_active)
            .cloned())
    }
}

/// In-memory rate store mirroring the database lookup contract.
#[derive(Debug, Default, Clone)]
pub struct StaticRateStore {
    rows: Vec<RateTableRow>,
}

impl StaticRateStore {
    #[must_use]
    pub const fn new(rows: Vec<RateTableRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl RateStore for StaticRateStore {
    async fn query_rates(
        &self,
        destination: &CountryCode,
        weight_grams: i32,
    ) -> Result<Vec<RateTableRow>, RepositoryError> {
        let mut rows: Vec<RateTableRow> = self
            .rows
            .iter()
            .filter(|r| r.country_code == *destination && r.matches(weight_grams))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.price_jpy);
        rows.truncate(super::rates::MAX_RATE_RESULTS);
        Ok(rows)
    }
}
