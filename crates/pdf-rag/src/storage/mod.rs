//! Storage module for persistent index data
//!
//! Provides SQLite-based persistence for index entries and manifests.

mod database;

pub use database::IndexDb;
