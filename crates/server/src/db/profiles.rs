//! Correction profile repository.
//!
//! Profiles are soft-scoped by `is_active`; quote resolution and the listing
//! endpoint only see active rows. The partial unique index
//! `correction_profiles_single_default` backs up the invariant that at most
//! one active profile is the default; [`ProfileRepository::set_default`] and
//! [`ProfileRepository::create`] maintain it transactionally so the index
//! never actually trips.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use hikyaku_core::ProfileId;

use super::RepositoryError;
use crate::engine::stores::ProfileStore;
use crate::models::{Correction, CorrectionProfile};

/// Repository for correction profile database operations.
///
/// Owns a pool handle so it can be shared with the engine as a
/// [`ProfileStore`] trait object.
pub struct ProfileRepository {
    pool: PgPool,
}

/// Parameters for creating a new correction profile.
#[derive(Debug)]
pub struct CreateProfile {
    pub name: String,
    pub description: String,
    pub is_default: bool,
    pub priority: i32,
    pub category_scope: Option<String>,
    pub weight_min_kg: Option<f64>,
    pub weight_max_kg: Option<f64>,
    pub weight_rule: Correction,
    pub length_rule: Correction,
    pub width_rule: Correction,
    pub height_rule: Correction,
    pub uniform_rule: Option<Correction>,
}

/// Internal row type for profile queries.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i32,
    name: String,
    description: String,
    is_default: bool,
    is_active: bool,
    priority: i32,
    category_scope: Option<String>,
    weight_min_kg: Option<f64>,
    weight_max_kg: Option<f64>,
    weight_mode: String,
    weight_amount: f64,
    length_mode: String,
    length_amount: f64,
    width_mode: String,
    width_amount: f64,
    height_mode: String,
    height_amount: f64,
    uniform_enabled: bool,
    uniform_mode: String,
    uniform_amount: f64,
}

impl ProfileRow {
    fn into_profile(self) -> CorrectionProfile {
        CorrectionProfile {
            id: Some(ProfileId::new(self.id)),
            name: self.name,
            description: self.description,
            is_default: self.is_default,
            is_active: self.is_active,
            priority: self.priority,
            category_scope: self.category_scope,
            weight_min_kg: self.weight_min_kg,
            weight_max_kg: self.weight_max_kg,
            weight_rule: Correction::parse(&self.weight_mode, self.weight_amount),
            length_rule: Correction::parse(&self.length_mode, self.length_amount),
            width_rule: Correction::parse(&self.width_mode, self.width_amount),
            height_rule: Correction::parse(&self.height_mode, self.height_amount),
            uniform_rule: self
                .uniform_enabled
                .then(|| Correction::parse(&self.uniform_mode, self.uniform_amount)),
        }
    }
}

const PROFILE_COLUMNS: &str = r"
    id, name, description, is_default, is_active, priority,
    category_scope, weight_min_kg, weight_max_kg,
    weight_mode, weight_amount, length_mode, length_amount,
    width_mode, width_amount, height_mode, height_amount,
    uniform_enabled, uniform_mode, uniform_amount
";

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get an active profile by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProfileId) -> Result<Option<CorrectionProfile>, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            SELECT {PROFILE_COLUMNS}
            FROM shipping.correction_profiles
            WHERE id = $1 AND is_active
            "
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    /// Get the active default profile, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_default(&self) -> Result<Option<CorrectionProfile>, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            SELECT {PROFILE_COLUMNS}
            FROM shipping.correction_profiles
            WHERE is_default AND is_active
            LIMIT 1
            "
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    /// List all active profiles ordered by priority, then id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<CorrectionProfile>, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            SELECT {PROFILE_COLUMNS}
            FROM shipping.correction_profiles
            WHERE is_active
            ORDER BY priority ASC, id ASC
            "
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed active profiles");
        Ok(rows.into_iter().map(ProfileRow::into_profile).collect())
    }

    /// Create a new profile.
    ///
    /// When `is_default` is set, any existing default is unset in the same
    /// transaction so the one-default invariant holds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, params), fields(name = %params.name, is_default = params.is_default))]
    pub async fn create(&self, params: CreateProfile) -> Result<CorrectionProfile, RepositoryError> {
        let (weight_mode, weight_amount) = params.weight_rule.parts();
        let (length_mode, length_amount) = params.length_rule.parts();
        let (width_mode, width_amount) = params.width_rule.parts();
        let (height_mode, height_amount) = params.height_rule.parts();
        let (uniform_mode, uniform_amount) = params
            .uniform_rule
            .map_or(("none", 0.0), |rule| rule.parts());

        let mut tx = self.pool.begin().await?;

        if params.is_default {
            sqlx::query::<sqlx::Postgres>(
                r"
                UPDATE shipping.correction_profiles
                SET is_default = FALSE, updated_at = now()
                WHERE is_default AND is_active
                ",
            )
            .execute(&mut *tx)
            .await?;
        }

        // Using runtime query to avoid SQLx offline mode cache requirements
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            INSERT INTO shipping.correction_profiles
                (name, description, is_default, priority, category_scope,
                 weight_min_kg, weight_max_kg,
                 weight_mode, weight_amount, length_mode, length_amount,
                 width_mode, width_amount, height_mode, height_amount,
                 uniform_enabled, uniform_mode, uniform_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18)
            RETURNING {PROFILE_COLUMNS}
            "
        ))
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.is_default)
        .bind(params.priority)
        .bind(&params.category_scope)
        .bind(params.weight_min_kg)
        .bind(params.weight_max_kg)
        .bind(weight_mode)
        .bind(weight_amount)
        .bind(length_mode)
        .bind(length_amount)
        .bind(width_mode)
        .bind(width_amount)
        .bind(height_mode)
        .bind(height_amount)
        .bind(params.uniform_rule.is_some())
        .bind(uniform_mode)
        .bind(uniform_amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let profile = row.into_profile();
        debug!(id = ?profile.id, "Created correction profile");
        Ok(profile)
    }

    /// Make the given profile the default, unsetting any previous default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no active profile has the id.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query::<sqlx::Postgres>(
            r"
            UPDATE shipping.correction_profiles
            SET is_default = FALSE, updated_at = now()
            WHERE is_default AND is_active AND id <> $1
            ",
        )
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query::<sqlx::Postgres>(
            r"
            UPDATE shipping.correction_profiles
            SET is_default = TRUE, updated_at = now()
            WHERE id = $1 AND is_active
            ",
        )
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        debug!(profile_id = %id, "Set default profile");
        Ok(())
    }

    /// Delete a profile.
    ///
    /// The active default cannot be deleted; promote another profile first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for the active default,
    /// `RepositoryError::NotFound` if the id does not exist, and
    /// `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProfileId) -> Result<(), RepositoryError> {
        let result = sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM shipping.correction_profiles
            WHERE id = $1 AND NOT (is_default AND is_active)
            ",
        )
        .bind(id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "missing" from "refused": the default profile row
            // survives the guarded delete.
            let exists: (bool,) = sqlx::query_as(
                r"
                SELECT EXISTS(
                    SELECT 1 FROM shipping.correction_profiles WHERE id = $1
                )
                ",
            )
            .bind(id.as_i32())
            .fetch_one(&self.pool)
            .await?;

            return Err(if exists.0 {
                RepositoryError::Conflict("cannot delete the default profile".to_owned())
            } else {
                RepositoryError::NotFound
            });
        }

        debug!(profile_id = %id, "Deleted correction profile");
        Ok(())
    }

    /// Total number of profiles, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shipping.correction_profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Delete all profiles (for re-seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        // Using runtime query to avoid SQLx offline mode cache requirements
        let result = sqlx::query::<sqlx::Postgres>("DELETE FROM shipping.correction_profiles")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn get_profile(
        &self,
        id: ProfileId,
    ) -> Result<Option<CorrectionProfile>, RepositoryError> {
        self.get(id).await
    }

    async fn get_default_profile(&self) -> Result<Option<CorrectionProfile>, RepositoryError> {
        self.get_default().await
    }
}
