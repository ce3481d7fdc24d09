//! Destination table schema introspection

use crate::errors::{from_rusqlite, unknown_table, Result};
use rusqlite::Connection;

/// One column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Column list of a destination table
#[derive(Debug, Clone)]
pub struct TableSchema {
    table: String,
    columns: Vec<ColumnInfo>,
}

impl TableSchema {
    /// Read the schema of `table`; a table with no columns does not exist
    pub fn load(conn: &Connection, table: &str) -> Result<Self> {
        let mut stmt = conn
            .prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)")
            .map_err(from_rusqlite)?;
        let columns = stmt
            .query_map([table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    decl_type: row.get(1)?,
                    not_null: row.get::<_, i64>(2)? != 0,
                    primary_key: row.get::<_, i64>(3)? != 0,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        if columns.is_empty() {
            return Err(unknown_table(table).with_op("load_schema"));
        }

        Ok(Self {
            table: table.to_string(),
            columns,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Whether the table has an INTEGER PRIMARY KEY backed by sqlite_sequence
    pub fn has_rowid_key(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.primary_key && c.decl_type.eq_ignore_ascii_case("INTEGER"))
    }
}
