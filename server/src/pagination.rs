use serde::Serialize;

/// Items shown per listing page
pub const PER_PAGE: i64 = 5;

/// One page of a newest-first listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub page: i64,
    pub per_page: i64,
    /// Number of items across all pages
    pub total: i64,
}

impl<T> Page<T> {
    pub fn pages(&self) -> i64 {
        if self.total <= 0 {
            0
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }
}

/// Pages below 1 are served as page 1.
pub fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

pub fn offset(page: i64, per_page: i64) -> i64 {
    (clamp_page(page) - 1).saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64, total: i64) -> Page<()> {
        Page {
            items: Vec::new(),
            page,
            per_page: PER_PAGE,
            total,
        }
    }

    #[test]
    fn test_page_counts() {
        assert_eq!(page(1, 0).pages(), 0);
        assert_eq!(page(1, 5).pages(), 1);
        assert_eq!(page(1, 6).pages(), 2);
        assert_eq!(page(1, 11).pages(), 3);
    }

    #[test]
    fn test_navigation() {
        assert!(!page(1, 6).has_prev());
        assert!(page(1, 6).has_next());
        assert!(page(2, 6).has_prev());
        assert!(!page(2, 6).has_next());
        assert!(!page(7, 6).has_next());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(clamp_page(-3), 1);
        assert_eq!(clamp_page(0), 1);
        assert_eq!(offset(0, PER_PAGE), 0);
        assert_eq!(offset(1, PER_PAGE), 0);
        assert_eq!(offset(3, PER_PAGE), 10);
        assert_eq!(offset(i64::MAX, PER_PAGE), i64::MAX);
    }
}
