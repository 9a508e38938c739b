// src/sheet/normalize.rs

use super::types::{MajorDimension, RawPayload};

/// One listing, positionally aligned with the table headers.
pub type Row = Vec<String>;

/// Headers plus rows, independent of how the export was oriented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl CanonicalTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        header_index(&self.headers, name)
    }
}

/// Position of the first header equal to `name`.
pub fn header_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Cell at `idx`; rows shorter than the headers read as padded with "".
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Build a [`CanonicalTable`] from a raw sheet export without touching it.
pub fn normalize(payload: &RawPayload) -> CanonicalTable {
    let values = &payload.values;

    match payload.dimension() {
        MajorDimension::Columns => {
            let headers: Vec<String> = values
                .iter()
                .map(|col| col.first().cloned().unwrap_or_default())
                .collect();
            let height = values
                .iter()
                .map(|col| col.len().saturating_sub(1))
                .max()
                .unwrap_or(0);

            let rows = (1..=height)
                .map(|i| {
                    values
                        .iter()
                        .map(|col| col.get(i).cloned().unwrap_or_default())
                        .collect()
                })
                .collect();

            CanonicalTable { headers, rows }
        }
        MajorDimension::Rows => {
            let mut lines = values.iter();
            let headers = lines.next().cloned().unwrap_or_default();
            CanonicalTable {
                headers,
                rows: lines.cloned().collect(),
            }
        }
    }
}
