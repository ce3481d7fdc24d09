//! Migration framework
//!
//! Provides:
//! - Migration runner with checksums
//! - Idempotent application
//! - Embedded SQL migrations for the destination tables

mod checksums;
mod embedded;
mod runner;

pub use checksums::migration_checksum;
pub use embedded::{get_migrations, Migration};
pub use runner::{apply_migrations, applied_migrations};
