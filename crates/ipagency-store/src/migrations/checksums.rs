//! Migration checksums
//!
//! A migration's SQL is hashed when applied; re-running compares the stored
//! hash so an edited migration is caught instead of silently skipped.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the migration SQL
pub fn migration_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}
