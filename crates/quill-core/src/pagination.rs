//! Offset pagination shared by every list endpoint.

use serde::Serialize;

/// A validated page request. Both values are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;

    /// Builds a request from raw values, falling back to the defaults for
    /// missing, zero or negative input.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let positive = |value: Option<i64>, default: u64| {
            value
                .filter(|v| *v > 0)
                .map(|v| v as u64)
                .unwrap_or(default)
        };

        Self {
            page: positive(page, Self::DEFAULT_PAGE),
            limit: positive(limit, Self::DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            meta: PageMeta {
                total,
                page: request.page(),
                total_pages: total.div_ceil(request.limit()),
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_and_non_positive_values() {
        assert_eq!(PageRequest::new(None, None), PageRequest::new(Some(1), Some(10)));
        assert_eq!(PageRequest::new(Some(0), Some(-5)), PageRequest::default());
        assert_eq!(PageRequest::new(Some(-3), Some(25)).page(), 1);
        assert_eq!(PageRequest::new(Some(-3), Some(25)).limit(), 25);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(Some(1), Some(10)).offset(), 0);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(Some(1), Some(10));
        assert_eq!(Page::<()>::new(vec![], 0, request).meta.total_pages, 0);
        assert_eq!(Page::<()>::new(vec![], 10, request).meta.total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], 11, request).meta.total_pages, 2);
    }
}
