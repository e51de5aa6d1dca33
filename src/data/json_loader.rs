use crate::data::datatable::DataRow;
use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Convert already-parsed JSON into rows. The document must be an array of objects.
pub fn rows_from_json(data: &JsonValue) -> Result<Vec<DataRow>> {
    let items = data
        .as_array()
        .ok_or_else(|| anyhow!("JSON data must be an array of objects"))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            DataRow::from_json(item)
                .ok_or_else(|| anyhow!("Element {} is not a JSON object", idx))
        })
        .collect()
}

/// Parse a JSON document held in memory
pub fn parse_rows(text: &str) -> Result<Vec<DataRow>> {
    let json: JsonValue = serde_json::from_str(text).context("Failed to parse JSON data")?;
    rows_from_json(&json)
}

/// Parse a JSON document from any reader
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<DataRow>> {
    let json: JsonValue =
        serde_json::from_reader(BufReader::new(reader)).context("Failed to parse JSON data")?;
    rows_from_json(&json)
}

/// Load a local JSON file holding an array of objects
pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<Vec<DataRow>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    read_rows(file).with_context(|| format!("Invalid dataset in {:?}", path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::DataValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_heterogeneous_rows() {
        let rows = parse_rows(r#"[{"state":"Ohio","pop":11800000},{"capital":"Austin"}]"#)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("pop"), Some(&DataValue::Integer(11800000)));
        assert_eq!(rows[1].get("capital"), Some(&DataValue::from("Austin")));
        assert!(rows[1].get("state").is_none());
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_rows("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse_rows(r#"{"state":"Ohio"}"#).unwrap_err();
        assert!(err.to_string().contains("array of objects"));
    }

    #[test]
    fn test_rejects_scalar_elements() {
        assert!(parse_rows(r#"[{"a":1}, 2]"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(parse_rows("[{").is_err());
    }

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"state":"Texas","flag":"tx.png"}}]"#).unwrap();
        let rows = load_json_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("flag"), Some(&DataValue::from("tx.png")));
    }

    #[test]
    fn test_missing_file() {
        let err = load_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to open JSON file"));
    }
}
