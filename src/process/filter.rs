use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::process::utils::{extract_salary, parse_leading_int};
use crate::sheet::{cell, columns, header_index, Row};

/// User-supplied filter values, read fresh each time filters are applied.
/// Empty or absent fields switch the matching filter off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: Option<String>,
    pub pathway: Option<String>,
    pub location: Option<String>,
    pub skill: Option<String>,
    pub salary_range: Option<String>,
}

/// `"min-max"` or `"min+"` pay bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBracket {
    pub min: f64,
    pub max: f64,
    pub open_ended: bool,
}

impl SalaryBracket {
    pub fn parse(raw: &str) -> Self {
        let mut bounds = raw.split('-').map(parse_leading_int);
        let min = bounds.next().unwrap_or(0) as f64;
        let max = bounds.next().unwrap_or(0) as f64;
        Self {
            min,
            max,
            open_ended: raw.contains('+'),
        }
    }

    /// A bracket with no upper bound and no `+` lets everything through.
    pub fn admits(&self, salary: f64) -> bool {
        if self.open_ended {
            salary >= self.min
        } else if self.max != 0.0 {
            salary >= self.min && salary <= self.max
        } else {
            true
        }
    }
}

/// One active predicate, bound to a column position where it needs one.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    /// Lowercased term matched against every cell.
    Search(String),
    /// Lowercased needle matched inside one column.
    Contains { column: usize, needle: String },
    Salary { column: usize, bracket: SalaryBracket },
}

impl RowFilter {
    pub fn matches(&self, row: &[String]) -> bool {
        match self {
            RowFilter::Search(term) => row.iter().any(|c| c.to_lowercase().contains(term)),
            RowFilter::Contains { column, needle } => {
                let value = cell(row, *column);
                !value.is_empty() && value.to_lowercase().contains(needle)
            }
            RowFilter::Salary { column, bracket } => {
                bracket.admits(extract_salary(cell(row, *column)))
            }
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.compile_unchecked().next().is_none()
    }

    /// Resolve the active criteria against `headers`. Column filters whose
    /// column is missing are dropped, which makes them pass every row.
    pub fn compile(&self, headers: &[String]) -> Vec<RowFilter> {
        self.compile_unchecked()
            .filter_map(|(column, value)| match column {
                None => Some(RowFilter::Search(value.to_lowercase())),
                Some(name) => {
                    let idx = header_index(headers, name)?;
                    if name == columns::SALARY_RANGE {
                        Some(RowFilter::Salary {
                            column: idx,
                            bracket: SalaryBracket::parse(value),
                        })
                    } else {
                        Some(RowFilter::Contains {
                            column: idx,
                            needle: value.to_lowercase(),
                        })
                    }
                }
            })
            .collect()
    }

    fn compile_unchecked(&self) -> impl Iterator<Item = (Option<&'static str>, &str)> {
        // whitespace-only search boxes count as empty
        let search = self
            .search_term
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| (None, t));
        let by_column = [
            (columns::PATHWAY, &self.pathway),
            (columns::LOCATION, &self.location),
            (columns::LANGUAGE, &self.skill),
            (columns::SALARY_RANGE, &self.salary_range),
        ]
        .into_iter()
        .filter_map(|(name, value)| active(value).map(|v| (Some(name), v)));
        search.into_iter().chain(by_column)
    }
}

/// Rows passing every active filter, original order kept.
pub fn apply_filters(rows: &[Row], headers: &[String], criteria: &FilterCriteria) -> Vec<Row> {
    let filters = criteria.compile(headers);
    let out: Vec<Row> = rows
        .iter()
        .filter(|row| filters.iter().all(|f| f.matches(row)))
        .cloned()
        .collect();
    debug!(
        filters = filters.len(),
        before = rows.len(),
        after = out.len(),
        "filters applied"
    );
    out
}
