//! Correction profile read endpoints.
//!
//! Profiles are managed through the CLI and the back-office seeder; the
//! HTTP surface only reads them.

use axum::{
    Json,
    extract::{Path, State},
};

use hikyaku_core::ProfileId;

use crate::error::{AppError, Result};
use crate::models::CorrectionProfile;
use crate::state::AppState;

/// List active correction profiles, ordered by priority then id.
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<CorrectionProfile>>> {
    let profiles = state.profiles().list_active().await?;
    Ok(Json(profiles))
}

/// Fetch a single active profile.
///
/// Responds 404 when the id is unknown or the profile is inactive.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CorrectionProfile>> {
    let profile = state
        .profiles()
        .get(ProfileId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {id}")))?;

    Ok(Json(profile))
}
