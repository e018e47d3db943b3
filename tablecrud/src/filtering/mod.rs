//! # Query Filtering
//!
//! Turns untrusted query parameters into a [`Filter`]: an ordered list of
//! [`Condition`]s plus an optional [`Sort`] and limit/offset. Every field is
//! checked against the table's `filterable_columns()`; the compiler checks
//! again before any SQL is emitted.
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Equality
//! GET /authors?name=Alice
//!
//! // Comparison suffixes (split at the last underscore)
//! GET /books?price_gte=10&price_lt=50
//!
//! // Pattern match, at most two % wildcards
//! GET /authors?name_like=%25ali%25
//!
//! // Sorting and 1-based paging (page_size 1..=100)
//! GET /authors?sort_field=name&sort_order=desc&page=2&page_size=10
//!
//! // Column projection
//! GET /authors?atts_require=id,name
//! GET /authors?atts_omit=bio
//! ```

pub mod conditions;
pub mod pagination;
pub mod params;
pub mod projection;
pub mod sort;

pub use conditions::{Condition, Operator, parse_condition, validate_like_value};
pub use pagination::Pagination;
pub use params::{
    QueryParams, parse_conditions, parse_filter, parse_pagination, parse_projection, parse_sort,
};
pub use projection::FieldProjection;
pub use sort::{Sort, SortOrder};

/// Row selection for one statement.
///
/// Page-based requests are converted with [`Filter::paginate`]; the filter
/// itself only carries raw limit and offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
    pub sort: Option<Sort>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn paginate(self, pagination: Pagination) -> Self {
        self.limit(pagination.limit()).offset(pagination.offset())
    }

    #[must_use]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}
