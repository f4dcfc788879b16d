//! Classification enums shared across the quote pipeline.

use serde::{Deserialize, Serialize};

/// Speed class of a shipping service.
///
/// Derived from the carrier's service code, not stored: express services
/// get surfaced differently in the back-office listing UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Express,
    #[default]
    Standard,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Express => write!(f, "express"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Where a shipping option's price came from.
///
/// `Mock` marks the built-in fallback courier used when the rate tables
/// have no coverage (or the database is unreachable), so callers can tell
/// an estimate from a real rate-card price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Database,
    Mock,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "database" => Ok(Self::Database),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown data source: {other}")),
        }
    }
}
