//! Core types for Hikyaku.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod id;
pub mod money;
pub mod service;

pub use country::{CountryCode, CountryCodeError};
pub use id::*;
pub use money::Yen;
pub use service::{DataSource, ServiceType};
