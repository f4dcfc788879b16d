//! Correction profile resolution.

use std::time::Duration;

use hikyaku_core::ProfileId;
use tracing::{debug, warn};

use super::stores::{ProfileStore, StoreError, with_timeout};
use crate::models::CorrectionProfile;

/// Resolve the profile to correct a quote with.
///
/// Resolution order:
/// 1. the active profile with the requested id, when one was requested;
/// 2. the active default profile (also the fallthrough for an unknown id);
/// 3. the built-in fallback profile.
///
/// Store failures and timeouts are logged and degrade to the fallback; this
/// function always yields a usable profile.
pub async fn resolve_profile(
    store: &dyn ProfileStore,
    profile_id: Option<ProfileId>,
    timeout: Duration,
) -> CorrectionProfile {
    match lookup(store, profile_id, timeout).await {
        Ok(Some(profile)) => {
            debug!(profile_id = ?profile.id, profile_name = %profile.name, "Resolved correction profile");
            profile
        }
        Ok(None) => {
            debug!("No correction profile configured, using built-in fallback");
            CorrectionProfile::fallback()
        }
        Err(e) => {
            warn!(error = %e, "Profile store unavailable, using built-in fallback");
            CorrectionProfile::fallback()
        }
    }
}

async fn lookup(
    store: &dyn ProfileStore,
    profile_id: Option<ProfileId>,
    timeout: Duration,
) -> Result<Option<CorrectionProfile>, StoreError> {
    if let Some(id) = profile_id {
        if let Some(profile) = with_timeout(timeout, store.get_profile(id)).await? {
            return Ok(Some(profile));
        }
        // Unknown or inactive id falls through to the default profile.
        debug!(profile_id = %id, "Requested profile not found, trying default");
    }
    with_timeout(timeout, store.get_default_profile()).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::RepositoryError;
    use crate::engine::stores::StaticProfileStore;
    use async_trait::async_trait;

    const TIMEOUT: Duration = Duration::from_millis(200);

    struct FailingProfileStore;

    #[async_trait]
    impl ProfileStore for FailingProfileStore {
        async fn get_profile(
            &self,
            _id: ProfileId,
        ) -> Result<Option<CorrectionProfile>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }

        async fn get_default_profile(&self) -> Result<Option<CorrectionProfile>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }

    struct HangingProfileStore;

    #[async_trait]
    impl ProfileStore for HangingProfileStore {
        async fn get_profile(
            &self,
            _id: ProfileId,
        ) -> Result<Option<CorrectionProfile>, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(None)
        }

        async fn get_default_profile(&self) -> Result<Option<CorrectionProfile>, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(None)
        }
    }

    fn named_profile(id: i32, name: &str, is_default: bool) -> CorrectionProfile {
        CorrectionProfile {
            id: Some(ProfileId::new(id)),
            name: name.to_string(),
            is_default,
            ..CorrectionProfile::fallback()
        }
    }

    #[tokio::test]
    async fn test_resolves_requested_profile() {
        let store = StaticProfileStore::new(vec![
            named_profile(1, "Default", true),
            named_profile(2, "Heavy items", false),
        ]);

        let profile = resolve_profile(&store, Some(ProfileId::new(2)), TIMEOUT).await;
        assert_eq!(profile.name, "Heavy items");
    }

    #[tokio::test]
    async fn test_unknown_id_falls_through_to_default() {
        let store = StaticProfileStore::new(vec![named_profile(1, "Default", true)]);

        let profile = resolve_profile(&store, Some(ProfileId::new(99)), TIMEOUT).await;
        assert_eq!(profile.name, "Default");
    }

    #[tokio::test]
    async fn test_no_id_uses_default() {
        let store = StaticProfileStore::new(vec![
            named_profile(1, "Default", true),
            named_profile(2, "Heavy items", false),
        ]);

        let profile = resolve_profile(&store, None, TIMEOUT).await;
        assert_eq!(profile.name, "Default");
    }

    #[tokio::test]
    async fn test_empty_store_uses_fallback() {
        let store = StaticProfileStore::default();

        let profile = resolve_profile(&store, None, TIMEOUT).await;
        assert_eq!(profile, CorrectionProfile::fallback());
    }

    #[tokio::test]
    async fn test_store_error_uses_fallback() {
        let profile = resolve_profile(&FailingProfileStore, Some(ProfileId::new(1)), TIMEOUT).await;
        assert_eq!(profile, CorrectionProfile::fallback());
    }

    #[tokio::test]
    async fn test_store_timeout_uses_fallback() {
        let profile = resolve_profile(&HangingProfileStore, None, Duration::from_millis(10)).await;
        assert_eq!(profile, CorrectionProfile::fallback());
    }
}
