use crate::errors::CrudError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 1-based page request, converted to limit/offset before it reaches a [`Filter`](super::Filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    page_size: u64,
}

impl Pagination {
    /// # Errors
    ///
    /// `InvalidPagination` when `page` is 0 or `page_size` is outside `1..=100`.
    pub fn new(page: u64, page_size: u64) -> Result<Self, CrudError> {
        if page == 0 {
            return Err(CrudError::invalid_pagination("page must be greater than 0"));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(CrudError::invalid_pagination(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}
