//! IP agency store - SQLite persistence and the configuration import engine
//!
//! Provides:
//! - Connection handling and embedded, checksummed migrations
//! - The destination table registry
//! - Spreadsheet and in-memory row sources
//! - The generic truncate-then-load import engine
//! - Workflow seed data and import provenance events

pub mod db;
pub mod errors;
pub mod import;
pub mod migrations;
pub mod provenance;
pub mod schema;
pub mod seed;
pub mod source;
pub mod tables;

// Re-export key types
pub use errors::Result;
pub use import::{run_import, ImportJob};
pub use source::{FileSource, RowSource, SourceRow, StaticSource};
pub use tables::{ImportSettings, TableDescriptor};
