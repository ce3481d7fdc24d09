//! Seed data loaded through the import engine

pub mod workflows;

pub use workflows::{seed_workflows, workflow_source, workflows};
