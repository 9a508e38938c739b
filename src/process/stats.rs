use serde::Serialize;
use std::collections::HashMap;

use crate::process::utils::{extract_salary, format_thousands};
use crate::sheet::{cell, columns, header_index, Row};

/// Shown when no language column or values exist.
pub const DEFAULT_TOP_SKILLS_LABEL: &str = "Various";
pub const TOP_SKILLS_LIMIT: usize = 5;

/// Headline numbers for a set of listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    /// Lowest and highest positive salary, if any row has one.
    pub salary_range: Option<(f64, f64)>,
    pub top_skills: String,
}

impl Summary {
    /// `"$50,000 - $60,000"`.
    pub fn pay_range_label(&self) -> Option<String> {
        self.salary_range.map(|(min, max)| {
            format!("${} - ${}", format_thousands(min), format_thousands(max))
        })
    }
}

pub fn aggregate(rows: &[Row], headers: &[String]) -> Summary {
    Summary {
        count: rows.len(),
        salary_range: salary_range(rows, headers),
        top_skills: top_skills(rows, headers),
    }
}

fn salary_range(rows: &[Row], headers: &[String]) -> Option<(f64, f64)> {
    let idx = header_index(headers, columns::SALARY_RANGE)?;
    rows.iter()
        .map(|row| extract_salary(cell(row, idx)))
        .filter(|&s| s > 0.0)
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((f64::min(lo, s), f64::max(hi, s))),
        })
}

/// Most common languages as `"Python (3), Go (2)"`. Ties keep the order in
/// which each language first appeared.
fn top_skills(rows: &[Row], headers: &[String]) -> String {
    let Some(idx) = header_index(headers, columns::LANGUAGE) else {
        return DEFAULT_TOP_SKILLS_LABEL.to_string();
    };

    let mut tally: Vec<(&str, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let lang = cell(row, idx);
        if lang.is_empty() {
            continue;
        }
        match slots.get(lang).copied() {
            Some(slot) => tally[slot].1 += 1,
            None => {
                slots.insert(lang, tally.len());
                tally.push((lang, 1));
            }
        }
    }

    if tally.is_empty() {
        return DEFAULT_TOP_SKILLS_LABEL.to_string();
    }

    // stable sort keeps first-seen order among equal counts
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .iter()
        .take(TOP_SKILLS_LIMIT)
        .map(|(lang, count)| format!("{} ({})", lang, count))
        .collect::<Vec<_>>()
        .join(", ")
}
