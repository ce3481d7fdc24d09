//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_config_tables",
            sql: include_str!("../../migrations/001_config_tables.sql"),
        },
        Migration {
            id: "002_workflows_provenance",
            sql: include_str!("../../migrations/002_workflows_provenance.sql"),
        },
    ]
}
