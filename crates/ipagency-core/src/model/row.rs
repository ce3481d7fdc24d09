use crate::model::CellValue;
use ipagency_core_types::sensitive::REDACTED;
use serde::Serialize;
use std::collections::BTreeMap;

/// One record: column name to cell value
///
/// Columns are kept sorted so that generated INSERT statements and
/// failure reports are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell by column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Set a cell, returning the previous value
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        value: impl Into<CellValue>,
    ) -> Option<CellValue> {
        self.cells.insert(column.into(), value.into())
    }

    /// Set a cell only when the column is absent
    pub fn insert_if_absent(&mut self, column: &str, value: impl Into<CellValue>) {
        if !self.cells.contains_key(column) {
            self.cells.insert(column.to_string(), value.into());
        }
    }

    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.cells.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop null and empty-string cells (sparse row filtering)
    pub fn without_blanks(&self) -> Row {
        self.cells
            .iter()
            .filter(|(_, v)| !v.is_blank())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Copy of the row with the given columns masked
    pub fn redacted(&self, secret_columns: &[&str]) -> Row {
        self.cells
            .iter()
            .map(|(k, v)| {
                if secret_columns.contains(&k.as_str()) && !v.is_blank() {
                    (k.clone(), CellValue::Text(REDACTED.to_string()))
                } else {
                    (k.clone(), v.clone())
                }
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, CellValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_blanks_drops_null_and_empty() {
        let row: Row = vec![
            ("name", CellValue::from("Invention patent")),
            ("code", CellValue::from("")),
            ("remark", CellValue::Null),
            ("sort", CellValue::Integer(0)),
        ]
        .into_iter()
        .collect();

        let filtered = row.without_blanks();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains("name"));
        assert!(filtered.contains("sort"));
        assert!(!filtered.contains("code"));
    }

    #[test]
    fn test_all_blank_row_filters_to_empty() {
        let row: Row = vec![("a", CellValue::Null), ("b", CellValue::from(" "))]
            .into_iter()
            .collect();
        assert!(row.without_blanks().is_empty());
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut row = Row::new();
        row.insert("created_at", "2020-01-01 00:00:00");
        row.insert_if_absent("created_at", "2024-05-05 10:00:00");
        row.insert_if_absent("updated_at", "2024-05-05 10:00:00");

        assert_eq!(row.get("created_at"), Some(&CellValue::from("2020-01-01 00:00:00")));
        assert_eq!(row.get("updated_at"), Some(&CellValue::from("2024-05-05 10:00:00")));
    }

    #[test]
    fn test_redacted_masks_secret_columns() {
        let row: Row = vec![("account", "li.na"), ("password", "hunter2")]
            .into_iter()
            .collect();
        let masked = row.redacted(&["password"]);

        assert_eq!(masked.get("account"), Some(&CellValue::from("li.na")));
        assert_eq!(masked.get("password"), Some(&CellValue::from(REDACTED)));
    }

    #[test]
    fn test_serializes_as_object() {
        let row: Row = vec![("id", CellValue::Integer(1)), ("name", CellValue::from("PCT"))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "PCT"}));
    }
}
