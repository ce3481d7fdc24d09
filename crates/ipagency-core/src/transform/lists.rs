use crate::model::CellValue;
use serde_json::Value;

/// Textual encoding of a structured list column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEncoding {
    /// A JSON array literal such as `[1, 2, 3]`
    Json,
    /// A JSON array literal, or items separated by the given character
    Delimited(char),
}

/// Decode a cell into a JSON list.
///
/// Never fails: a value that is not valid list syntax becomes `[value]`.
pub fn decode_list(value: &CellValue, encoding: ListEncoding) -> CellValue {
    let items = match value {
        CellValue::Json(Value::Array(items)) => items.clone(),
        CellValue::Text(text) => decode_text(text, encoding).unwrap_or_else(|| vec![value.to_json()]),
        other => vec![other.to_json()],
    };
    CellValue::Json(Value::Array(items))
}

fn decode_text(text: &str, encoding: ListEncoding) -> Option<Vec<Value>> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text.trim()) {
        return Some(items);
    }

    match encoding {
        ListEncoding::Json => None,
        ListEncoding::Delimited(separator) => {
            let items: Vec<Value> = text
                .split(separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(split_item)
                .collect();
            (!items.is_empty()).then_some(items)
        }
    }
}

// "12" in an id list should land as a number, "Beijing" as a string
fn split_item(item: &str) -> Value {
    item.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(item.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_json_array_decodes() {
        let decoded = decode_list(&CellValue::from("[1, 2, 3]"), ListEncoding::Json);
        assert_eq!(decoded, CellValue::Json(json!([1, 2, 3])));
    }

    #[test]
    fn test_scalar_text_wraps() {
        let decoded = decode_list(&CellValue::from("invention"), ListEncoding::Json);
        assert_eq!(decoded, CellValue::Json(json!(["invention"])));
    }

    #[test]
    fn test_json_object_wraps_raw_text() {
        let decoded = decode_list(&CellValue::from("{\"a\":1}"), ListEncoding::Json);
        assert_eq!(decoded, CellValue::Json(json!(["{\"a\":1}"])));
    }

    #[test]
    fn test_numeric_cell_wraps() {
        let decoded = decode_list(&CellValue::Integer(7), ListEncoding::Json);
        assert_eq!(decoded, CellValue::Json(json!([7])));
    }

    #[test]
    fn test_delimited_splits() {
        let decoded = decode_list(&CellValue::from("1, 2,3"), ListEncoding::Delimited(','));
        assert_eq!(decoded, CellValue::Json(json!([1, 2, 3])));

        let decoded = decode_list(&CellValue::from("CN|US"), ListEncoding::Delimited('|'));
        assert_eq!(decoded, CellValue::Json(json!(["CN", "US"])));
    }

    #[test]
    fn test_delimited_accepts_json_too() {
        let decoded = decode_list(&CellValue::from("[\"a,b\"]"), ListEncoding::Delimited(','));
        assert_eq!(decoded, CellValue::Json(json!(["a,b"])));
    }

    #[test]
    fn test_delimited_only_separators_wraps() {
        let decoded = decode_list(&CellValue::from(",,"), ListEncoding::Delimited(','));
        assert_eq!(decoded, CellValue::Json(json!([",,"])));
    }

    proptest! {
        #[test]
        fn prop_non_list_text_becomes_single_element(s in "[a-zA-Z][a-zA-Z0-9 ]{0,20}") {
            let decoded = decode_list(&CellValue::from(s.as_str()), ListEncoding::Json);
            prop_assert_eq!(decoded, CellValue::Json(json!([s])));
        }
    }
}
