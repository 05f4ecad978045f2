//! Shared test fixtures for the catalog workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`collection`]: [`TestCollection`], a temporary collection directory
//! - [`fixtures`]: in-memory assets and histories

pub mod collection;
pub mod fixtures;

pub use collection::TestCollection;
