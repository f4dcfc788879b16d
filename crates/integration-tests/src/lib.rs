//! Integration tests for Hikyaku.
//!
//! # Running Tests
//!
//! ```bash
//! # Engine tests run standalone
//! cargo test -p hikyaku-integration-tests
//!
//! # API and repository tests need a running stack
//! cargo run -p hikyaku-cli -- migrate
//! cargo run -p hikyaku-cli -- seed
//! cargo run -p hikyaku-server &
//! cargo test -p hikyaku-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `quote_engine` - Quote pipeline tests against in-memory stores
//! - `quote_api` - HTTP API tests (require a running server)
//! - `profile_store` - Repository lifecycle tests (require a database)
