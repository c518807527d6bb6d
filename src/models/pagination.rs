use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// A normalized, 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Builds a page request, replacing non-positive values with the defaults
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page > 0 { page as u64 } else { DEFAULT_PAGE },
            limit: if limit > 0 { limit as u64 } else { DEFAULT_PAGE_LIMIT },
        }
    }

    /// Index of the first item on this page
    ///
    /// A hand-built page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Returns the `[start, end)` window of this page over `len` items,
    /// or `None` when the page starts past the end
    pub fn window(&self, len: usize) -> Option<(usize, usize)> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        if start >= len {
            return None;
        }
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        Some((start, start.saturating_add(limit).min(len)))
    }
}

/// Raw `page`/`limit` query parameters
///
/// Values are kept as text so that garbage falls back to the defaults instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

impl PageQuery {
    /// Requested page, 0 when absent or not a number
    pub fn page(&self) -> i64 {
        parse_or_zero(self.page.as_deref())
    }

    /// Requested page size, 0 when absent or not a number
    pub fn limit(&self) -> i64 {
        parse_or_zero(self.limit.as_deref())
    }
}
