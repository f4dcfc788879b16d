//! Hikyaku shipping quote server library.
//!
//! This crate provides the quote service functionality as a library,
//! allowing it to be tested and reused (the CLI uses the repository and
//! engine modules directly).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
