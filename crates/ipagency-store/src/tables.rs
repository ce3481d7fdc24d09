//! Destination table registry
//!
//! Every importable table is one [`TableDescriptor`] row in [`TABLES`].
//! The engine is generic; a descriptor only says where the rows come from
//! and which table-specific transforms apply.

use crate::errors::{unknown_table, Result};
use ipagency_config::{Settings, TimestampMode};
use ipagency_core::errors::{ExError, ExErrorKind};
use ipagency_core::transform::ListEncoding;
use ipagency_core::{StandardTransform, TimestampPolicy};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix of the legacy `config:<table>` command spelling
pub const COMMAND_PREFIX: &str = "config:";

/// Where a table's rows come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A spreadsheet in the source directory
    File(&'static str),
    /// Rows built in code
    Static,
}

/// Declarative import description of one destination table
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    pub table: &'static str,
    pub source: SourceKind,
    /// Used when neither configuration nor the command line picks a mode
    pub timestamps: TimestampMode,
    pub list_columns: &'static [(&'static str, ListEncoding)],
    pub secret_columns: &'static [&'static str],
}

const fn file_table(table: &'static str, file: &'static str) -> TableDescriptor {
    TableDescriptor {
        table,
        source: SourceKind::File(file),
        timestamps: TimestampMode::Now,
        list_columns: &[],
        secret_columns: &[],
    }
}

const COMMA: ListEncoding = ListEncoding::Delimited(',');

pub static TABLES: &[TableDescriptor] = &[
    file_table("business_types", "business_types.xlsx"),
    file_table("case_types", "case_types.xlsx"),
    TableDescriptor {
        timestamps: TimestampMode::Fixed,
        ..file_table("case_statuses", "case_statuses.xlsx")
    },
    TableDescriptor {
        list_columns: &[("country_codes", COMMA)],
        ..file_table("apply_types", "apply_types.xlsx")
    },
    TableDescriptor {
        timestamps: TimestampMode::Fixed,
        list_columns: &[("apply_type_ids", ListEncoding::Json)],
        ..file_table("process_items", "process_items.xlsx")
    },
    TableDescriptor {
        list_columns: &[("case_type_ids", ListEncoding::Json)],
        ..file_table("fee_types", "fee_types.xlsx")
    },
    TableDescriptor {
        list_columns: &[("role_codes", COMMA)],
        ..file_table("commission_rules", "commission_rules.xlsx")
    },
    TableDescriptor {
        timestamps: TimestampMode::Fixed,
        ..file_table("contract_types", "contract_types.xlsx")
    },
    file_table("customer_levels", "customer_levels.xlsx"),
    file_table("customer_sources", "customer_sources.xlsx"),
    TableDescriptor {
        list_columns: &[("allowed_extensions", COMMA)],
        ..file_table("file_categories", "file_categories.xlsx")
    },
    file_table("departments", "departments.xlsx"),
    TableDescriptor {
        list_columns: &[("permissions", ListEncoding::Json)],
        ..file_table("roles", "roles.xlsx")
    },
    TableDescriptor {
        list_columns: &[("role_ids", ListEncoding::Json)],
        secret_columns: &["password"],
        ..file_table("users", "users.xlsx")
    },
    TableDescriptor {
        timestamps: TimestampMode::Fixed,
        ..file_table("countries", "countries.xlsx")
    },
    TableDescriptor {
        table: "workflows",
        source: SourceKind::Static,
        timestamps: TimestampMode::Now,
        list_columns: &[],
        secret_columns: &[],
    },
];

/// Find a descriptor by table name or command name.
///
/// Accepts `case_types`, `case-types` and `config:case-types`.
pub fn find(name: &str) -> Result<&'static TableDescriptor> {
    let trimmed = name.trim();
    let bare = trimmed.strip_prefix(COMMAND_PREFIX).unwrap_or(trimmed);
    let table = bare.replace('-', "_");
    TABLES
        .iter()
        .find(|d| d.table == table)
        .ok_or_else(|| unknown_table(trimmed).with_op("find_table"))
}

impl TableDescriptor {
    /// Kebab-case command name (`case-types`)
    pub fn command_name(&self) -> String {
        self.table.replace('_', "-")
    }

    /// Spreadsheet path under `source_dir`, `None` for static tables
    pub fn source_path(&self, source_dir: &Path) -> Option<PathBuf> {
        match self.source {
            SourceKind::File(file) => Some(source_dir.join(file)),
            SourceKind::Static => None,
        }
    }

    /// Build the row transform for this table under `settings`
    pub fn transform(&self, settings: &ImportSettings) -> Result<StandardTransform> {
        let policy = match settings.mode_for(self) {
            TimestampMode::Now => TimestampPolicy::Now,
            TimestampMode::Fixed => TimestampPolicy::fixed(&settings.fixed_timestamp)
                .map_err(|e| {
                    ExError::new(ExErrorKind::Config)
                        .with_op("build_transform")
                        .with_table(self.table)
                        .with_message(e.to_string())
                })?,
        };

        let mut transform = StandardTransform::new(policy);
        for (column, encoding) in self.list_columns {
            transform = transform.with_list_column(*column, *encoding);
        }
        for column in self.secret_columns {
            transform = transform.with_secret_column(*column);
        }
        Ok(transform)
    }
}

/// Explicit parameters of one import invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub default_actor_id: i64,
    pub fixed_timestamp: String,
    /// Forces one timestamp mode for every table
    pub timestamps: Option<TimestampMode>,
    /// Per-table modes from configuration
    pub table_timestamps: BTreeMap<String, TimestampMode>,
}

impl ImportSettings {
    /// Mode for `descriptor`: forced mode, then per-table override, then the
    /// descriptor default
    pub fn mode_for(&self, descriptor: &TableDescriptor) -> TimestampMode {
        self.timestamps
            .or_else(|| self.table_timestamps.get(descriptor.table).copied())
            .unwrap_or(descriptor.timestamps)
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ImportSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            default_actor_id: settings.default_actor_id,
            fixed_timestamp: settings.fixed_timestamp.clone(),
            timestamps: None,
            table_timestamps: settings
                .tables
                .keys()
                .filter_map(|table| {
                    settings
                        .table_timestamps(table)
                        .map(|mode| (table.clone(), mode))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipagency_core::transform::{CREATED_AT, UPDATED_AT};
    use ipagency_core::{CellValue, Row, RowTransform};

    #[test]
    fn test_find_accepts_all_spellings() {
        for name in ["case_types", "case-types", "config:case-types", " config:case-types "] {
            assert_eq!(find(name).unwrap().table, "case_types");
        }
    }

    #[test]
    fn test_find_unknown() {
        let err = find("config:patents").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnknownTable);
    }

    #[test]
    fn test_table_names_unique() {
        let mut names: Vec<&str> = TABLES.iter().map(|d| d.table).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TABLES.len());
    }

    #[test]
    fn test_command_name_and_path() {
        let users = find("users").unwrap();
        assert_eq!(users.command_name(), "users");
        assert_eq!(
            find("fee-types").unwrap().source_path(Path::new("database/config")),
            Some(PathBuf::from("database/config/fee_types.xlsx"))
        );
        assert_eq!(find("workflows").unwrap().source_path(Path::new("x")), None);
    }

    #[test]
    fn test_mode_precedence() {
        let countries = find("countries").unwrap();
        let roles = find("roles").unwrap();
        let mut settings = ImportSettings::default();
        assert_eq!(settings.mode_for(countries), TimestampMode::Fixed);
        assert_eq!(settings.mode_for(roles), TimestampMode::Now);

        settings
            .table_timestamps
            .insert("roles".to_string(), TimestampMode::Fixed);
        assert_eq!(settings.mode_for(roles), TimestampMode::Fixed);

        settings.timestamps = Some(TimestampMode::Now);
        assert_eq!(settings.mode_for(roles), TimestampMode::Now);
        assert_eq!(settings.mode_for(countries), TimestampMode::Now);
    }

    #[test]
    fn test_countries_transform_uses_fixed_stamp() {
        let transform = find("countries")
            .unwrap()
            .transform(&ImportSettings::default())
            .unwrap();
        let row: Row = vec![("name", "China"), ("code", "CN")].into_iter().collect();
        let out = transform.transform(row).unwrap();
        assert_eq!(out.get(CREATED_AT), Some(&CellValue::from("2020-01-01 00:00:00")));
        assert_eq!(out.get(UPDATED_AT), Some(&CellValue::from("2020-01-01 00:00:00")));
    }

    #[test]
    fn test_invalid_fixed_literal_is_config_error() {
        let settings = ImportSettings {
            fixed_timestamp: "yesterday".to_string(),
            ..ImportSettings::default()
        };
        let err = find("countries").unwrap().transform(&settings).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }
}
