use serde::Serialize;

/// A single cell value, either raw from the spreadsheet or persistence-ready
///
/// Spreadsheets only produce the scalar variants. `Json` appears after a
/// transform decodes a structured column; it is stored as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Json(serde_json::Value),
}

impl CellValue {
    /// Null or empty text. Whitespace-only text counts as empty.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual form of a scalar cell, `None` for null and JSON values
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null | CellValue::Json(_) => None,
            CellValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            CellValue::Integer(n) => Some(n.to_string()),
            CellValue::Real(f) => Some(f.to_string()),
            CellValue::Text(s) => Some(s.clone()),
        }
    }

    /// Convert into a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Integer(n) => serde_json::Value::from(*n),
            CellValue::Real(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Json(v) => v.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Real(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        CellValue::Json(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::from("").is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("0").is_blank());
        assert!(!CellValue::Integer(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Integer(123456).as_text().as_deref(), Some("123456"));
        assert_eq!(CellValue::Bool(true).as_text().as_deref(), Some("1"));
        assert_eq!(CellValue::Null.as_text(), None);
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&CellValue::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
        let json = serde_json::to_string(&CellValue::Null).unwrap();
        assert_eq!(json, "null");
    }
}
