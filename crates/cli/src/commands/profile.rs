//! Correction profile management commands.
//!
//! # Usage
//!
//! ```bash
//! # List active profiles with their rules
//! hikyaku-cli profile list
//!
//! # Make profile 2 the default used for quotes
//! hikyaku-cli profile set-default --id 2
//!
//! # Delete profile 3 (the active default is refused)
//! hikyaku-cli profile delete --id 3
//! ```
//!
//! # Environment Variables
//!
//! - `HIKYAKU_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use tracing::info;

use hikyaku_core::ProfileId;
use hikyaku_server::db::{self, ProfileRepository};
use hikyaku_server::models::{Correction, CorrectionProfile};

/// Render a correction rule for terminal output, e.g. `+5%` or `+3 fixed`.
fn describe(rule: &Correction) -> String {
    match rule {
        Correction::Percentage(pct) => format!("{pct:+}%"),
        Correction::Fixed(amount) => format!("{amount:+} fixed"),
        Correction::Unchanged => "unchanged".to_owned(),
    }
}

/// One-line summary of a profile's dimension rules.
fn dimension_summary(profile: &CorrectionProfile) -> String {
    if let Some(uniform) = &profile.uniform_rule {
        return format!("uniform {}", describe(uniform));
    }
    if profile.length_rule == profile.width_rule && profile.width_rule == profile.height_rule {
        return describe(&profile.length_rule);
    }
    format!(
        "L {} / W {} / H {}",
        describe(&profile.length_rule),
        describe(&profile.width_rule),
        describe(&profile.height_rule)
    )
}

/// List all active correction profiles.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the query fails.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let repo = ProfileRepository::new(pool);

    let profiles = repo.list_active().await?;

    if profiles.is_empty() {
        info!("No active profiles; run 'hikyaku-cli seed' first");
        return Ok(());
    }

    info!("Correction Profiles");
    info!("===================");
    for profile in &profiles {
        let id = profile
            .id
            .map_or_else(|| "-".to_owned(), |id| id.to_string());
        let marker = if profile.is_default { " [default]" } else { "" };
        info!("  #{id} {}{marker}", profile.name);
        info!(
            "     priority: {}, weight: {}, dimensions: {}",
            profile.priority,
            describe(&profile.weight_rule),
            dimension_summary(profile)
        );
    }

    Ok(())
}

/// Make the given profile the default used for quotes.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the update fails, or no
/// active profile has the id.
pub async fn set_default(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let repo = ProfileRepository::new(pool);

    repo.set_default(ProfileId::new(id)).await?;

    info!("Profile #{id} is now the default");
    Ok(())
}

/// Delete a profile. The active default is refused; promote another profile
/// first.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the profile does not
/// exist, or it is the active default.
pub async fn delete(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let repo = ProfileRepository::new(pool);

    repo.delete(ProfileId::new(id)).await?;

    info!("Profile #{id} deleted");
    Ok(())
}
