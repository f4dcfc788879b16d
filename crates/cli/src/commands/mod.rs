//! CLI command implementations.
//!
//! Each command loads its own environment and opens its own connection so
//! commands stay independently scriptable.

pub mod migrate;
pub mod profile;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL from `HIKYAKU_DATABASE_URL`, falling back to the
/// generic `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, &'static str> {
    std::env::var("HIKYAKU_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "HIKYAKU_DATABASE_URL not set")
}
