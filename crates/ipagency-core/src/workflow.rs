//! Workflow configuration records
//!
//! A workflow is a fixed sequence of exactly eight approval nodes attached
//! to a case type. This module only models the configuration; nothing
//! here moves a case between nodes.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{CellValue, Row};
use serde::{Deserialize, Serialize};

/// Number of nodes in every workflow
pub const WORKFLOW_NODE_COUNT: usize = 8;

/// Whether a node needs a human decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Auto,
    Manual,
}

/// One step of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Position in the sequence, 1 to 8
    pub index: u8,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Passes without human action
    pub auto_pass: bool,
    /// Candidate assignee user ids
    pub assignees: Vec<i64>,
}

impl WorkflowNode {
    /// Build a node at `index` (1-based).
    ///
    /// The first and last nodes and any unnamed node pass automatically and
    /// carry no assignees.
    pub fn new(index: u8, name: impl Into<String>, assignees: Vec<i64>) -> Self {
        let name = name.into();
        let auto_pass = index == 1
            || usize::from(index) == WORKFLOW_NODE_COUNT
            || name.trim().is_empty();
        Self {
            index,
            name,
            node_type: if auto_pass {
                NodeType::Auto
            } else {
                NodeType::Manual
            },
            auto_pass,
            assignees: if auto_pass { Vec::new() } else { assignees },
        }
    }
}

/// A workflow configuration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    /// Unique code
    pub code: String,
    pub description: String,
    /// Case type tag the workflow applies to (patent, trademark, ...)
    pub case_type: String,
    pub is_active: bool,
    pub nodes: Vec<WorkflowNode>,
}

impl Workflow {
    /// Build a workflow from eight node names, choosing assignees per node name
    pub fn from_node_names<F>(
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        case_type: impl Into<String>,
        node_names: [&str; WORKFLOW_NODE_COUNT],
        assignees_for: F,
    ) -> Self
    where
        F: Fn(&str) -> Vec<i64>,
    {
        let nodes = node_names
            .iter()
            .zip(1u8..)
            .map(|(node_name, index)| WorkflowNode::new(index, *node_name, assignees_for(node_name)))
            .collect();

        Self {
            name: name.into(),
            code: code.into(),
            description: description.into(),
            case_type: case_type.into(),
            is_active: true,
            nodes,
        }
    }

    /// Check the fixed shape: eight nodes indexed 1 to 8, in order
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_workflow")
                .with_message(format!("Workflow '{}' has an empty code", self.name)));
        }
        if self.nodes.len() != WORKFLOW_NODE_COUNT {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_workflow")
                .with_message(format!(
                    "Workflow {} has {} nodes, expected {}",
                    self.code,
                    self.nodes.len(),
                    WORKFLOW_NODE_COUNT
                )));
        }
        for (position, node) in self.nodes.iter().enumerate() {
            if usize::from(node.index) != position + 1 {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("validate_workflow")
                    .with_message(format!(
                        "Workflow {} node at position {} has index {}",
                        self.code,
                        position + 1,
                        node.index
                    )));
            }
        }
        Ok(())
    }

    /// Destination row for the `workflows` table; nodes are stored as JSON
    pub fn to_row(&self) -> Result<Row> {
        let nodes = serde_json::to_value(&self.nodes)?;
        let mut row = Row::new();
        row.insert("name", self.name.as_str());
        row.insert("code", self.code.as_str());
        row.insert("description", self.description.as_str());
        row.insert("case_type", self.case_type.as_str());
        row.insert("is_active", self.is_active);
        row.insert("nodes", CellValue::Json(nodes));
        Ok(row)
    }
}
