// src/board/listing.rs

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::process::deactivate::is_deactivated;
use crate::process::{
    aggregate, apply_auto_deactivation, apply_filters, paginate, retain_active, FilterCriteria,
    Page, Summary,
};
use crate::sheet::{cell, columns, normalize, RawPayload, Row};

/// Active listings built from one payload. Never mutated; every refresh
/// builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    headers: Vec<String>,
    rows: Vec<Row>,
}

/// What a presentation layer needs to draw one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    /// Headers without the internal `Deactivate?` flag.
    pub visible_headers: Vec<String>,
    /// Page rows projected onto `visible_headers`, padded with "".
    pub page: Page<Row>,
    /// Statistics over every filtered row, not just this page.
    pub stats: Summary,
}

impl Listing {
    /// normalize → auto-deactivate (relative to `today`) → drop flagged rows.
    pub fn from_payload(payload: &RawPayload, threshold_days: i64, today: NaiveDate) -> Self {
        let table = normalize(payload);
        let table = apply_auto_deactivation(table, threshold_days, today);
        let table = retain_active(table);
        Self {
            headers: table.headers,
            rows: table.rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Row> {
        apply_filters(&self.rows, &self.headers, criteria)
    }

    pub fn view(
        &self,
        criteria: &FilterCriteria,
        requested_page: i64,
        page_size: usize,
    ) -> ListingView {
        let filtered = self.filter(criteria);
        let stats = aggregate(&filtered, &self.headers);
        let page = paginate(&filtered, page_size, requested_page);
        debug!(
            page = page.current_page,
            total_pages = page.total_pages,
            matched = page.total_rows,
            "rendering page"
        );

        let visible: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() != columns::DEACTIVATE)
            .map(|(i, _)| i)
            .collect();

        ListingView {
            visible_headers: visible.iter().map(|&i| self.headers[i].clone()).collect(),
            page: Page {
                rows: page
                    .rows
                    .iter()
                    .map(|row| visible.iter().map(|&i| cell(row, i).to_string()).collect())
                    .collect(),
                current_page: page.current_page,
                total_pages: page.total_pages,
                total_rows: page.total_rows,
            },
            stats,
        }
    }
}

/// Active-job count for the homepage badge: rows whose `Deactivate?`
/// flag is not set. Age is not considered here.
pub fn active_job_count(payload: &RawPayload) -> usize {
    let table = normalize(payload);
    match table.column(columns::DEACTIVATE) {
        Some(idx) => table
            .rows
            .iter()
            .filter(|row| !is_deactivated(row, idx))
            .count(),
        None => table.rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns_payload(values: &[&[&str]]) -> RawPayload {
        RawPayload {
            range: "JobBoard!A:I".to_string(),
            major_dimension: Some("COLUMNS".to_string()),
            values: values
                .iter()
                .map(|c| c.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
    }

    #[test]
    fn test_flagged_row_scenario() {
        let payload = columns_payload(&[
            &["Job Title", "A", "B"],
            &["Salary Range", "$50,000", "$60,000"],
            &["Deactivate?", "FALSE", "TRUE"],
        ]);
        let listing = Listing::from_payload(&payload, 30, today());

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.rows()[0][..2], ["A", "$50,000"]);

        let view = listing.view(&FilterCriteria::default(), 1, 15);
        assert_eq!(view.stats.count, 1);
        assert_eq!(view.stats.salary_range, Some((50000.0, 50000.0)));
        assert_eq!(view.visible_headers, vec!["Job Title", "Salary Range"]);
        assert_eq!(view.page.rows, vec![vec!["A", "$50,000"]]);
    }

    #[test]
    fn test_old_listings_hidden() {
        let payload = columns_payload(&[
            &["Job Title", "fresh", "stale", "undated"],
            &["Date", "09/15/2025", "08/01/2025", ""],
        ]);
        let listing = Listing::from_payload(&payload, 30, today());

        assert_eq!(listing.headers(), &["Job Title", "Date", "Deactivate?"]);
        let titles: Vec<&str> = listing.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(titles, vec!["fresh", "undated"]);
    }

    #[test]
    fn test_view_filters_pages_and_stats_together() {
        let mut titles = vec!["Job Title"];
        let mut langs = vec!["Language"];
        let names: Vec<String> = (0..20).map(|i| format!("Job {}", i)).collect();
        for (i, name) in names.iter().enumerate() {
            titles.push(name);
            langs.push(if i % 2 == 0 { "Rust" } else { "Go" });
        }
        let payload = columns_payload(&[titles.as_slice(), langs.as_slice()]);
        let listing = Listing::from_payload(&payload, 30, today());

        let criteria = FilterCriteria {
            skill: Some("rust".into()),
            ..Default::default()
        };
        let view = listing.view(&criteria, 9, 4);
        assert_eq!(view.page.total_rows, 10);
        assert_eq!(view.page.total_pages, 3);
        assert_eq!(view.page.current_page, 3);
        assert_eq!(view.page.rows.len(), 2);
        assert_eq!(view.stats.count, 10);
        assert_eq!(view.stats.top_skills, "Rust (10)");
    }

    #[test]
    fn test_empty_listing_view() {
        let listing = Listing::default();
        let view = listing.view(&FilterCriteria::default(), 1, 15);
        assert!(listing.is_empty());
        assert_eq!(view.page.total_pages, 1);
        assert!(view.page.rows.is_empty());
        assert_eq!(view.stats.top_skills, "Various");
    }

    #[test]
    fn test_active_job_count() {
        let payload = columns_payload(&[
            &["Job Title", "A", "B", "C"],
            &["Deactivate?", "FALSE", "TRUE", "yes"],
        ]);
        assert_eq!(active_job_count(&payload), 1);

        let payload = columns_payload(&[&["Job Title", "A", "B"]]);
        assert_eq!(active_job_count(&payload), 2);
    }
}
