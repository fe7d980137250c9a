//! UUID utilities
//!
//! Identifiers are stored as hyphenated TEXT in SQLite; these helpers keep
//! the conversion in one place.

use uuid::Uuid;

use crate::{Error, Result};

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse a UUID read back from a database column
///
/// A malformed value means the row was written by something other than this
/// code, so it is reported as an internal error rather than bad input.
pub fn parse_column(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::Internal(format!("Malformed UUID in column '{}': {} ({})", column, value, e)))
}
