use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::process::date_parser::parse_posted_date;
use crate::process::utils::is_truthy;
use crate::sheet::{cell, columns, CanonicalTable, Row};

/// Listings this many days old (or older) are hidden automatically.
pub const DEFAULT_DEACTIVATE_AFTER_DAYS: i64 = 30;

const FLAG_SET: &str = "TRUE";
const FLAG_CLEAR: &str = "FALSE";

/// Midnight of `reference` minus `threshold_days`; `None` if that falls
/// outside the representable calendar.
pub fn cutoff_date(reference: NaiveDate, threshold_days: i64) -> Option<NaiveDate> {
    Duration::try_days(threshold_days).and_then(|d| reference.checked_sub_signed(d))
}

/// Mark every listing posted on or before the cutoff as deactivated.
///
/// The date column is `Date`, else `Date Posted`; without either the table
/// comes back unchanged. A missing `Deactivate?` column is appended with
/// every row set to `FALSE` first. Rows whose date does not parse are left
/// alone, so upstream flags survive.
pub fn apply_auto_deactivation(
    mut table: CanonicalTable,
    threshold_days: i64,
    reference: NaiveDate,
) -> CanonicalTable {
    let Some(cutoff) = cutoff_date(reference, threshold_days) else {
        debug!(threshold_days, "cutoff out of range; skipping auto-deactivation");
        return table;
    };

    let date_idx = match table
        .column(columns::DATE)
        .or_else(|| table.column(columns::DATE_POSTED))
    {
        Some(i) => i,
        None => {
            debug!("no date column; skipping auto-deactivation");
            return table;
        }
    };

    let flag_idx = match table.column(columns::DEACTIVATE) {
        Some(i) => i,
        None => {
            table.headers.push(columns::DEACTIVATE.to_string());
            let idx = table.headers.len() - 1;
            for row in &mut table.rows {
                set_cell(row, idx, FLAG_CLEAR);
            }
            idx
        }
    };

    let mut expired = 0usize;
    for row in &mut table.rows {
        let posted = parse_posted_date(cell(row, date_idx));
        if matches!(posted, Some(d) if d <= cutoff) {
            set_cell(row, flag_idx, FLAG_SET);
            expired += 1;
        }
    }

    info!(%cutoff, expired, rows = table.rows.len(), "applied auto-deactivation");
    table
}

/// Whether a row carries a truthy `Deactivate?` flag at `flag_idx`.
pub fn is_deactivated(row: &[String], flag_idx: usize) -> bool {
    is_truthy(cell(row, flag_idx))
}

/// Drop every deactivated row; without a flag column all rows stay.
pub fn retain_active(table: CanonicalTable) -> CanonicalTable {
    let Some(flag_idx) = table.column(columns::DEACTIVATE) else {
        return table;
    };
    let before = table.rows.len();
    let rows: Vec<Row> = table
        .rows
        .into_iter()
        .filter(|row| !is_deactivated(row, flag_idx))
        .collect();
    info!(
        active = rows.len(),
        hidden = before - rows.len(),
        "filtered out deactivated jobs"
    );
    CanonicalTable {
        headers: table.headers,
        rows,
    }
}

fn set_cell(row: &mut Row, idx: usize, value: &str) {
    if row.len() <= idx {
        row.resize(idx + 1, String::new());
    }
    row[idx] = value.to_string();
}
