//! Workflow seed data
//!
//! A fixed list of 8-node approval workflows, one per common case flow.
//! Assignees are picked by matching keywords in the node name against
//! sample user ids; this is fixture data, not an assignment rule.

use crate::errors::Result;
use crate::import::{run_import, ImportJob};
use crate::source::StaticSource;
use crate::tables::{self, ImportSettings};
use ipagency_core::workflow::WORKFLOW_NODE_COUNT;
use ipagency_core::{ImportOutcome, Workflow};
use rusqlite::Connection;
use std::path::Path;

/// Keyword → candidate user ids. First match wins.
const ASSIGNEE_KEYWORDS: &[(&str, &[i64])] = &[
    ("review", &[2, 3]),
    ("search", &[3]),
    ("drafting", &[4, 5]),
    ("translation", &[5]),
    ("client", &[6]),
    ("filing", &[7]),
    ("fee", &[8]),
    ("response", &[4]),
];

/// Used when no keyword matches
const DEFAULT_ASSIGNEES: &[i64] = &[1];

/// Candidate assignees for a node name
pub fn keyword_assignees(node_name: &str) -> Vec<i64> {
    let name = node_name.to_lowercase();
    ASSIGNEE_KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, ids)| ids.to_vec())
        .unwrap_or_else(|| DEFAULT_ASSIGNEES.to_vec())
}

struct WorkflowSeed {
    name: &'static str,
    code: &'static str,
    description: &'static str,
    case_type: &'static str,
    nodes: [&'static str; WORKFLOW_NODE_COUNT],
}

const SEEDS: &[WorkflowSeed] = &[
    WorkflowSeed {
        name: "Invention patent filing",
        code: "WF_PATENT_INVENTION",
        description: "From technical disclosure to filing receipt",
        case_type: "patent",
        nodes: [
            "Case intake",
            "Disclosure review",
            "Specification drafting",
            "Client confirmation",
            "Filing submission",
            "Official fee payment",
            "",
            "Case archived",
        ],
    },
    WorkflowSeed {
        name: "Utility model filing",
        code: "WF_PATENT_UTILITY",
        description: "Utility model application",
        case_type: "patent",
        nodes: [
            "Case intake",
            "Disclosure review",
            "Specification drafting",
            "Client confirmation",
            "Filing submission",
            "Official fee payment",
            "",
            "Case archived",
        ],
    },
    WorkflowSeed {
        name: "Design patent filing",
        code: "WF_PATENT_DESIGN",
        description: "Design application with drawings",
        case_type: "patent",
        nodes: [
            "Case intake",
            "Drawing review",
            "",
            "Client confirmation",
            "Filing submission",
            "Official fee payment",
            "",
            "Case archived",
        ],
    },
    WorkflowSeed {
        name: "Office action response",
        code: "WF_PATENT_OA",
        description: "Responding to an examination opinion",
        case_type: "patent",
        nodes: [
            "Office action received",
            "Opinion review",
            "Response drafting",
            "Client confirmation",
            "Response filing",
            "",
            "",
            "Case archived",
        ],
    },
    WorkflowSeed {
        name: "Trademark registration",
        code: "WF_TRADEMARK_REGISTRATION",
        description: "New trademark application",
        case_type: "trademark",
        nodes: [
            "Case intake",
            "Trademark search",
            "Client confirmation",
            "Application drafting",
            "Filing submission",
            "Official fee payment",
            "",
            "Case archived",
        ],
    },
    WorkflowSeed {
        name: "Trademark renewal",
        code: "WF_TRADEMARK_RENEWAL",
        description: "Renewal before expiry",
        case_type: "trademark",
        nodes: [
            "Renewal reminder",
            "Client confirmation",
            "",
            "Renewal filing",
            "Official fee payment",
            "",
            "",
            "Case archived",
        ],
    },
    WorkflowSeed {
        name: "Copyright registration",
        code: "WF_COPYRIGHT_REGISTRATION",
        description: "Software and works copyright registration",
        case_type: "copyright",
        nodes: [
            "Case intake",
            "Material review",
            "Application drafting",
            "Client confirmation",
            "Filing submission",
            "Official fee payment",
            "",
            "Case archived",
        ],
    },
];

/// The seeded workflows
pub fn workflows() -> Vec<Workflow> {
    SEEDS
        .iter()
        .map(|seed| {
            Workflow::from_node_names(
                seed.name,
                seed.code,
                seed.description,
                seed.case_type,
                seed.nodes,
                keyword_assignees,
            )
        })
        .collect()
}

/// Seed workflows as destination rows, validated
pub fn workflow_source() -> Result<StaticSource> {
    let rows = workflows()
        .iter()
        .map(|wf| {
            wf.validate()?;
            wf.to_row()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(StaticSource::new("workflows", rows))
}

/// Replace the `workflows` table with the seed list
pub fn seed_workflows(conn: &Connection, settings: &ImportSettings) -> Result<ImportOutcome> {
    let descriptor = tables::find("workflows")?;
    let job = ImportJob::for_descriptor(descriptor, Path::new("."), None, settings)?;
    run_import(conn, &job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RowSource;
    use ipagency_core::CellValue;
    use std::collections::HashSet;

    #[test]
    fn test_keyword_assignees() {
        assert_eq!(keyword_assignees("Disclosure review"), vec![2, 3]);
        assert_eq!(keyword_assignees("Official FEE payment"), vec![8]);
        assert_eq!(keyword_assignees("Case intake"), vec![1]);
    }

    #[test]
    fn test_every_workflow_is_well_formed() {
        let all = workflows();
        assert!(!all.is_empty());
        for wf in &all {
            wf.validate().unwrap();
            assert!(wf.nodes[0].auto_pass);
            assert!(wf.nodes[WORKFLOW_NODE_COUNT - 1].auto_pass);
            for node in &wf.nodes {
                if node.name.is_empty() {
                    assert!(node.auto_pass);
                }
            }
        }
    }

    #[test]
    fn test_codes_unique() {
        let codes: HashSet<String> = workflows().into_iter().map(|w| w.code).collect();
        assert_eq!(codes.len(), SEEDS.len());
    }

    #[test]
    fn test_source_rows_carry_json_nodes() {
        let rows = workflow_source().unwrap().read_rows().unwrap();
        assert_eq!(rows.len(), SEEDS.len());
        assert!(matches!(rows[0].row.get("nodes"), Some(CellValue::Json(_))));
    }
}
