//! IP agency core - import domain kernel
//!
//! This crate provides the building blocks every configuration import shares:
//! - Structured error facility with stable codes
//! - Logging facility (profiles, operation macros, test capture)
//! - Row/cell model and the per-run `ImportOutcome`
//! - Row transforms: timestamps, list decoding, secret hashing
//! - Workflow configuration records (fixed 8-node approval sequences)

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod transform;
pub mod workflow;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, TransformError};
pub use model::{CellValue, ImportOutcome, Row, RowFailure};
pub use transform::{RowTransform, StandardTransform, TimestampPolicy};
pub use workflow::{NodeType, Workflow, WorkflowNode};

// Used by the logging macros so callers need no direct dependency.
#[doc(hidden)]
pub use ipagency_core_types as __core_types;
#[doc(hidden)]
pub use tracing as __tracing;
