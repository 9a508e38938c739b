// src/sheet/types.rs

use serde::{Deserialize, Deserializer, Serialize};

/// Range label the snapshot file uses when it does not carry its own.
pub const DEFAULT_SNAPSHOT_RANGE: &str = "JobBoard!A:I";

/// Whether the sheet export is organised by rows or by columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MajorDimension {
    #[default]
    Rows,
    Columns,
}

impl MajorDimension {
    pub fn as_str(&self) -> &str {
        match self {
            MajorDimension::Rows => "ROWS",
            MajorDimension::Columns => "COLUMNS",
        }
    }

    /// Anything that is not `COLUMNS` (in any case) reads as row-major.
    pub fn from_str(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("COLUMNS") {
            MajorDimension::Columns
        } else {
            MajorDimension::Rows
        }
    }
}

/// The sheet export exactly as the data source hands it over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayload {
    #[serde(default)]
    pub range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cells")]
    pub values: Vec<Vec<String>>,
}

impl RawPayload {
    pub fn dimension(&self) -> MajorDimension {
        self.major_dimension
            .as_deref()
            .map(MajorDimension::from_str)
            .unwrap_or_default()
    }
}

/// Local snapshot shape: `values[i]` is the data column for `headers[i]`.
/// Files without `headers` are plain payloads and pass through as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSnapshot {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_cells")]
    pub values: Vec<Vec<String>>,
}

impl FallbackSnapshot {
    /// Convert into the column-major payload shape by putting each header
    /// on top of its column.
    pub fn into_payload(self) -> RawPayload {
        match self.headers {
            Some(headers) => {
                let values = self
                    .values
                    .into_iter()
                    .enumerate()
                    .map(|(i, col)| {
                        let mut column = Vec::with_capacity(col.len() + 1);
                        column.push(headers.get(i).cloned().unwrap_or_default());
                        column.extend(col);
                        column
                    })
                    .collect();
                RawPayload {
                    range: self
                        .range
                        .unwrap_or_else(|| DEFAULT_SNAPSHOT_RANGE.to_string()),
                    major_dimension: Some(
                        self.major_dimension
                            .unwrap_or_else(|| MajorDimension::Columns.as_str().to_string()),
                    ),
                    values,
                }
            }
            None => RawPayload {
                range: self.range.unwrap_or_default(),
                major_dimension: self.major_dimension,
                values: self.values,
            },
        }
    }
}

/// Sheet exports are mostly strings, but hand-edited snapshots carry
/// numbers, booleans and nulls too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Null(()),
}

impl RawCell {
    fn into_string(self) -> String {
        match self {
            RawCell::Text(s) => s,
            RawCell::Bool(b) => b.to_string(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => f.to_string(),
            RawCell::Null(()) => String::new(),
        }
    }
}

fn deserialize_cells<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Vec<RawCell>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|line| line.into_iter().map(RawCell::into_string).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(MajorDimension::from_str("columns"), MajorDimension::Columns);
        assert_eq!(MajorDimension::from_str("COLUMNS"), MajorDimension::Columns);
        assert_eq!(MajorDimension::from_str("ROWS"), MajorDimension::Rows);
        assert_eq!(MajorDimension::from_str("diagonal"), MajorDimension::Rows);

        let payload = RawPayload::default();
        assert_eq!(payload.dimension(), MajorDimension::Rows);
    }

    #[test]
    fn test_lenient_cells() -> Result<()> {
        let json = r#"{
            "range": "JobBoard!A:C",
            "majorDimension": "ROWS",
            "values": [["Job Title", "Deactivate?", "Openings"], ["Dev", true, 3], ["QA", null, 1.5]]
        }"#;
        let payload: RawPayload = serde_json::from_str(json)?;
        assert_eq!(payload.values[1], vec!["Dev", "true", "3"]);
        assert_eq!(payload.values[2], vec!["QA", "", "1.5"]);
        Ok(())
    }

    #[test]
    fn test_missing_fields_default() -> Result<()> {
        let payload: RawPayload = serde_json::from_str("{}")?;
        assert!(payload.values.is_empty());
        assert!(payload.range.is_empty());
        assert_eq!(payload.dimension(), MajorDimension::Rows);
        Ok(())
    }

    #[test]
    fn test_snapshot_prepends_headers() -> Result<()> {
        let json = r#"{
            "headers": ["Job Title", "Location"],
            "values": [["Dev", "QA"], ["Louisville"]]
        }"#;
        let snapshot: FallbackSnapshot = serde_json::from_str(json)?;
        let payload = snapshot.into_payload();

        assert_eq!(payload.range, DEFAULT_SNAPSHOT_RANGE);
        assert_eq!(payload.dimension(), MajorDimension::Columns);
        assert_eq!(payload.values[0], vec!["Job Title", "Dev", "QA"]);
        assert_eq!(payload.values[1], vec!["Location", "Louisville"]);
        Ok(())
    }

    #[test]
    fn test_snapshot_without_headers_passes_through() -> Result<()> {
        let json = r#"{"range": "A:B", "majorDimension": "ROWS", "values": [["h"], ["v"]]}"#;
        let snapshot: FallbackSnapshot = serde_json::from_str(json)?;
        let payload = snapshot.into_payload();
        assert_eq!(payload.range, "A:B");
        assert_eq!(payload.major_dimension.as_deref(), Some("ROWS"));
        assert_eq!(payload.values, vec![vec!["h"], vec!["v"]]);
        Ok(())
    }
}
