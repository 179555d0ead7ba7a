/// Field survey records kept in a local SQLite database
///
/// - Persisted entries and the record store (state/)
/// - Entry form and listing controllers (controller/)
/// - Best-effort device location (location/)
/// - Listing output (display.rs)
/// - Environment configuration (config.rs)
///
/// The `site-survey` binary drives these through its command line.

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod location;
pub mod state;
