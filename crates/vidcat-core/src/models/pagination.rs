use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 5;
pub const MAX_PER_PAGE: i64 = 100;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    /// Build from optional query values, applying defaults. `per_page` is capped at
    /// [`MAX_PER_PAGE`]; values below 1 are rejected.
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Result<Self, AppError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page < 1 {
            return Err(AppError::Validation(
                "The page must be at least 1.".to_string(),
            ));
        }
        if per_page < 1 {
            return Err(AppError::Validation(
                "The per page must be at least 1.".to_string(),
            ));
        }

        Ok(PageRequest {
            page,
            per_page: per_page.min(MAX_PER_PAGE),
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Last page number for `total` rows; never below 1.
    pub fn last_page(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the counts needed for pager metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current: i64,
    pub last: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Page {
            items,
            current: request.page(),
            last: request.last_page(total),
            total,
        }
    }

    /// A page is servable when it has rows and does not run past the last page.
    pub fn ensure_servable(&self) -> Result<(), AppError> {
        if self.items.is_empty() || self.current > self.last {
            return Err(AppError::NotFound(format!(
                "page {} of {} has no videos",
                self.current, self.last
            )));
        }
        Ok(())
    }

    pub fn pager(&self) -> Pager {
        Pager {
            current: self.current,
            total: self.last,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current: self.current,
            last: self.last,
            total: self.total,
        }
    }
}

/// Pager metadata: current page and last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pager {
    pub current: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), 5);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        assert!(matches!(
            PageRequest::new(Some(0), None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(None, Some(-3)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_per_page_is_capped() {
        let req = PageRequest::new(Some(2), Some(10_000)).unwrap();
        assert_eq!(req.per_page(), MAX_PER_PAGE);
        assert_eq!(req.offset(), MAX_PER_PAGE);
    }

    #[test]
    fn test_last_page() {
        let req = PageRequest::new(Some(1), Some(5)).unwrap();
        assert_eq!(req.last_page(0), 1);
        assert_eq!(req.last_page(5), 1);
        assert_eq!(req.last_page(6), 2);
        assert_eq!(req.last_page(11), 3);
    }

    #[test]
    fn test_empty_or_out_of_range_page_is_not_servable() {
        let req = PageRequest::new(Some(1), Some(5)).unwrap();
        let empty: Page<i32> = Page::new(vec![], req, 0);
        assert!(matches!(empty.ensure_servable(), Err(AppError::NotFound(_))));

        let beyond = PageRequest::new(Some(4), Some(5)).unwrap();
        let page: Page<i32> = Page::new(vec![], beyond, 12);
        assert_eq!(page.last, 3);
        assert!(page.ensure_servable().is_err());

        let ok: Page<i32> = Page::new(vec![1, 2], req, 2);
        assert!(ok.ensure_servable().is_ok());
        assert_eq!(ok.pager(), Pager { current: 1, total: 1 });
    }
}
