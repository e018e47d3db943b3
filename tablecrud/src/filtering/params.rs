use std::collections::BTreeMap;

use super::conditions::{Condition, parse_condition};
use super::pagination::{DEFAULT_PAGE_SIZE, Pagination};
use super::projection::{FieldProjection, OMITTED_FIELDS_KEY, REQUIRED_FIELDS_KEY};
use super::sort::{Sort, SortOrder};
use super::Filter;
use crate::core::CRUDTable;
use crate::errors::CrudError;

pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "page_size";
pub const SORT_FIELD_KEY: &str = "sort_field";
pub const SORT_ORDER_KEY: &str = "sort_order";

/// Keys that never become filter conditions.
pub const RESERVED_KEYS: [&str; 6] = [
    PAGE_KEY,
    PAGE_SIZE_KEY,
    SORT_FIELD_KEY,
    SORT_ORDER_KEY,
    REQUIRED_FIELDS_KEY,
    OMITTED_FIELDS_KEY,
];

/// Raw query parameters: every value seen for each key, keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// First value for `key`, if any.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<BTreeMap<String, Vec<String>>> for QueryParams {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

/// Parse every non-reserved parameter into a condition.
///
/// Keys without a value (or with an empty first value) are skipped. The first
/// failure aborts the whole parse, so no partial filter is ever produced.
///
/// # Errors
///
/// Any error from [`parse_condition`].
pub fn parse_conditions<T: CRUDTable>(params: &QueryParams) -> Result<Vec<Condition>, CrudError> {
    let mut conditions = Vec::new();
    for (key, values) in params.iter() {
        if RESERVED_KEYS.contains(&key) {
            continue;
        }
        let Some(value) = values.first().filter(|v| !v.is_empty()) else {
            continue;
        };
        conditions.push(parse_condition::<T>(key, value)?);
    }
    Ok(conditions)
}

fn parse_number(key: &str, raw: &str) -> Result<u64, CrudError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CrudError::invalid_pagination(format!("{key} must be a positive integer")))
}

/// `page` / `page_size`. Either key alone enables paging with the other defaulted
/// (page 1, size 10).
///
/// # Errors
///
/// `InvalidPagination` for non-numeric values or values out of bounds.
pub fn parse_pagination(params: &QueryParams) -> Result<Option<Pagination>, CrudError> {
    let page = params.first(PAGE_KEY).filter(|v| !v.is_empty());
    let page_size = params.first(PAGE_SIZE_KEY).filter(|v| !v.is_empty());
    if page.is_none() && page_size.is_none() {
        return Ok(None);
    }
    let page = page.map_or(Ok(1), |raw| parse_number(PAGE_KEY, raw))?;
    let page_size = page_size.map_or(Ok(DEFAULT_PAGE_SIZE), |raw| {
        parse_number(PAGE_SIZE_KEY, raw)
    })?;
    Pagination::new(page, page_size).map(Some)
}

/// `sort_field` / `sort_order` (defaults to ascending). An order without a field
/// is ignored.
///
/// # Errors
///
/// `InvalidSort` for a non-filterable field or an unknown order.
pub fn parse_sort<T: CRUDTable>(params: &QueryParams) -> Result<Option<Sort>, CrudError> {
    let Some(field) = params.first(SORT_FIELD_KEY).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !T::is_filterable(field) {
        return Err(CrudError::invalid_sort(format!("unknown sort field '{field}'")));
    }
    let order = match params.first(SORT_ORDER_KEY).filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse::<SortOrder>()?,
        None => SortOrder::Asc,
    };
    Ok(Some(Sort::new(field, order)))
}

/// Build the full filter for a request, or `None` when the request asks for no
/// filtering, sorting or paging at all.
///
/// # Errors
///
/// Any condition, pagination or sort error.
pub fn parse_filter<T: CRUDTable>(params: &QueryParams) -> Result<Option<Filter>, CrudError> {
    let conditions = parse_conditions::<T>(params)?;
    let pagination = parse_pagination(params)?;
    let sort = parse_sort::<T>(params)?;

    if conditions.is_empty() && pagination.is_none() && sort.is_none() {
        return Ok(None);
    }

    let mut filter = Filter {
        conditions,
        sort,
        ..Filter::default()
    };
    if let Some(pagination) = pagination {
        filter = filter.paginate(pagination);
    }
    Ok(Some(filter))
}

/// `atts_require` / `atts_omit`, comma separated, all values merged.
#[must_use]
pub fn parse_projection(params: &QueryParams) -> Option<FieldProjection> {
    let split = |key: &str| -> Vec<String> {
        params
            .get_all(key)
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    };
    let required = split(REQUIRED_FIELDS_KEY);
    let omitted = split(OMITTED_FIELDS_KEY);
    let asked = params.first(REQUIRED_FIELDS_KEY).is_some()
        || params.first(OMITTED_FIELDS_KEY).is_some();
    asked.then_some(FieldProjection { required, omitted })
}
