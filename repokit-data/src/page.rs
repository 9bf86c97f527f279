use serde::{Deserialize, Serialize};

/// Pagination parameters. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_page_size(),
        }
    }
}

impl Pageable {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// `(page - 1) * size`. Page 0 or below yields a non-positive offset,
    /// which renders as no OFFSET at all.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination<T> {
    pub page: i64,
    pub page_size: i64,
    /// `total_count / page_size`, rounded down. A trailing partial page is
    /// not counted.
    pub total_page: i64,
    pub total_count: i64,
    pub results: Vec<T>,
}

impl<T> Pagination<T> {
    pub fn new(results: Vec<T>, pageable: Pageable, total_count: i64) -> Self {
        let total_page = if pageable.size <= 0 {
            0
        } else {
            total_count / pageable.size
        };
        Self {
            page: pageable.page,
            page_size: pageable.size,
            total_page,
            total_count,
            results,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_page
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Transform the results, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Pagination<U> {
        Pagination {
            page: self.page,
            page_size: self.page_size,
            total_page: self.total_page,
            total_count: self.total_count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(Pageable::new(1, 10).offset(), 0);
        assert_eq!(Pageable::new(3, 10).offset(), 20);
        assert_eq!(Pageable::new(0, 10).offset(), -10);
    }

    #[test]
    fn test_total_page_rounds_down() {
        let p = Pagination::new(vec![0; 10], Pageable::new(1, 10), 25);
        assert_eq!(p.total_page, 2);
        assert!(p.has_next());

        // 5 rows remain on a page 3 that has_next never reports
        let p = Pagination::new(vec![0; 10], Pageable::new(2, 10), 25);
        assert!(!p.has_next());
    }

    #[test]
    fn test_exact_multiple() {
        let p = Pagination::<i32>::new(vec![], Pageable::new(2, 10), 30);
        assert_eq!(p.total_page, 3);
        assert!(p.has_next());
    }

    #[test]
    fn test_non_positive_size() {
        let p = Pagination::<i32>::new(vec![], Pageable::new(1, 0), 30);
        assert_eq!(p.total_page, 0);
        assert!(!p.has_next());
        let p = Pagination::<i32>::new(vec![], Pageable::new(1, -5), 30);
        assert_eq!(p.total_page, 0);
    }

    #[test]
    fn test_serialize() {
        let p = Pagination::new(vec!["a"], Pageable::new(1, 1), 1);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["total_page"], 1);
        assert_eq!(json["results"][0], "a");
    }

    #[test]
    fn test_pageable_defaults() {
        let p: Pageable = serde_json::from_str("{}").unwrap();
        assert_eq!(p, Pageable::new(1, 20));
    }
}
