use crate::errors::TransformError;
use chrono::NaiveDateTime;

/// Storage format of every timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a transform fills `created_at`/`updated_at` when the source row has none
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Wall-clock time of the import
    Now,
    /// A fixed literal, identical for every row of every run
    Fixed(String),
}

impl TimestampPolicy {
    /// Build a fixed policy, rejecting literals not in `YYYY-MM-DD HH:MM:SS` form
    pub fn fixed(literal: &str) -> Result<Self, TransformError> {
        let literal = literal.trim();
        NaiveDateTime::parse_from_str(literal, TIMESTAMP_FORMAT).map_err(|_| {
            TransformError::InvalidTimestamp {
                column: "fixed_timestamp".to_string(),
                value: literal.to_string(),
            }
        })?;
        Ok(TimestampPolicy::Fixed(literal.to_string()))
    }

    /// The value to stamp for the current row
    pub fn resolve(&self) -> String {
        match self {
            TimestampPolicy::Now => now_stamp(),
            TimestampPolicy::Fixed(literal) => literal.clone(),
        }
    }
}

/// Current local time in storage format
pub fn now_stamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
