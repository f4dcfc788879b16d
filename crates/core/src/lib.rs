//! Hikyaku Core - Shared types library.
//!
//! This crate provides common types used across all Hikyaku components:
//! - `server` - Shipping quote HTTP service
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, country codes, and
//!   service classifications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
