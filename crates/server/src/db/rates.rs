//! Carrier rate table repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use hikyaku_core::{CountryCode, DataSource, RateId, Yen};

use super::RepositoryError;
use crate::engine::rates::MAX_RATE_RESULTS;
use crate::engine::stores::RateStore;
use crate::models::RateTableRow;

/// Repository for rate table database operations.
///
/// Owns a pool handle so it can be shared with the engine as a
/// [`RateStore`] trait object.
pub struct RateRepository {
    pool: PgPool,
}

/// Parameters for inserting a rate table row.
///
/// Inserted rows are always `data_source = 'database'`; the mock source only
/// exists for the built-in estimate the engine constructs itself.
#[derive(Debug)]
pub struct CreateRate {
    pub company_code: String,
    pub service_code: String,
    pub carrier_code: String,
    pub country_code: CountryCode,
    pub weight_from_g: i32,
    pub weight_to_g: i32,
    pub price_jpy: Yen,
    pub zone_code: Option<String>,
}

/// Internal row type for rate queries.
#[derive(sqlx::FromRow)]
struct RateRow {
    id: RateId,
    company_code: String,
    service_code: String,
    carrier_code: String,
    country_code: CountryCode,
    weight_from_g: i32,
    weight_to_g: i32,
    price_jpy: Yen,
    zone_code: Option<String>,
    data_source: String,
}

impl RateRow {
    fn into_rate(self) -> Result<RateTableRow, RepositoryError> {
        let data_source: DataSource = self
            .data_source
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(RateTableRow {
            id: self.id,
            company_code: self.company_code,
            service_code: self.service_code,
            carrier_code: self.carrier_code,
            country_code: self.country_code,
            weight_from_g: self.weight_from_g,
            weight_to_g: self.weight_to_g,
            price_jpy: self.price_jpy,
            zone_code: self.zone_code,
            data_source,
        })
    }
}

/// Per-country row count for seed statistics.
#[derive(Debug)]
pub struct CountryRateCount {
    pub country_code: String,
    pub count: i64,
}

/// Internal row type for the country count query.
#[derive(sqlx::FromRow)]
struct CountryRateCountRow {
    country_code: String,
    count: Option<i64>,
}

impl RateRepository {
    /// Create a new rate repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rows matching a destination and chargeable weight, cheapest first.
    ///
    /// Band matching is exclusive at the lower bound and inclusive at the
    /// upper bound. At most [`MAX_RATE_RESULTS`] rows are returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a row has an unknown data source.
    #[instrument(skip(self), fields(destination = %destination, weight_grams))]
    pub async fn query_for_weight(
        &self,
        destination: &CountryCode,
        weight_grams: i32,
    ) -> Result<Vec<RateTableRow>, RepositoryError> {
        let limit = i64::try_from(MAX_RATE_RESULTS).unwrap_or(i64::MAX);

        // Using runtime query to avoid SQLx offline mode cache requirements
        let rows = sqlx::query_as::<_, RateRow>(
            r"
            SELECT id, company_code, service_code, carrier_code, country_code,
                   weight_from_g, weight_to_g, price_jpy, zone_code, data_source
            FROM shipping.shipping_rates
            WHERE country_code = $1
              AND weight_from_g < $2
              AND weight_to_g >= $2
            ORDER BY price_jpy ASC, id ASC
            LIMIT $3
            ",
        )
        .bind(destination.as_str())
        .bind(weight_grams)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Queried rate table");
        rows.into_iter().map(RateRow::into_rate).collect()
    }

    /// Insert a rate table row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(
        skip(self, params),
        fields(service = %params.service_code, country = %params.country_code)
    )]
    pub async fn insert(&self, params: CreateRate) -> Result<RateId, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let result: (RateId,) = sqlx::query_as(
            r"
            INSERT INTO shipping.shipping_rates
                (company_code, service_code, carrier_code, country_code,
                 weight_from_g, weight_to_g, price_jpy, zone_code, data_source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'database')
            RETURNING id
            ",
        )
        .bind(&params.company_code)
        .bind(&params.service_code)
        .bind(&params.carrier_code)
        .bind(&params.country_code)
        .bind(params.weight_from_g)
        .bind(params.weight_to_g)
        .bind(params.price_jpy)
        .bind(&params.zone_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Total number of rate rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shipping.shipping_rates")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Row counts per destination country.
    ///
    /// Useful for verifying seeding worked correctly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn country_counts(&self) -> Result<Vec<CountryRateCount>, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let rows: Vec<CountryRateCountRow> = sqlx::query_as(
            r"
            SELECT country_code, COUNT(*) as count
            FROM shipping.shipping_rates
            GROUP BY country_code
            ORDER BY country_code
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CountryRateCount {
                country_code: r.country_code,
                count: r.count.unwrap_or(0),
            })
            .collect())
    }

    /// Delete all rate rows (for re-seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let result = sqlx::query::<sqlx::Postgres>("DELETE FROM shipping.shipping_rates")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RateStore for RateRepository {
    async fn query_rates(
        &self,
        destination: &CountryCode,
        weight_grams: i32,
    ) -> Result<Vec<RateTableRow>, RepositoryError> {
        self.query_for_weight(destination, weight_grams).await
    }
}
