use serde::Serialize;

/// Listings shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// One page of a row set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Slice `rows` into the requested page, clamped into `1..=total_pages`.
/// An empty set still has one (empty) page. A zero page size is treated as one.
pub fn paginate<T: Clone>(rows: &[T], page_size: usize, requested_page: i64) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = rows.len().div_ceil(page_size).max(1);
    let current_page = requested_page.clamp(1, total_pages as i64) as usize;

    let start = ((current_page - 1) * page_size).min(rows.len());
    let end = (current_page * page_size).min(rows.len());

    Page {
        rows: rows[start..end].to_vec(),
        current_page,
        total_pages,
        total_rows: rows.len(),
    }
}
