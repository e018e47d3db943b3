use sea_orm::{FromQueryResult, Value};
use std::fmt;

/// Describes one table to the filter compiler and the repository.
///
/// The column list drives `INSERT` order and bounds `UPDATE` assignments; the
/// filterable columns are the whitelist applied to every user-supplied filter
/// and sort field. Keep the second list as narrow as the API allows: a column
/// that is stored is not automatically a column that may be searched.
///
/// ```rust,ignore
/// impl CRUDTable for Author {
///     type Id = i64;
///     type UpdateModel = AuthorUpdate;
///
///     const TABLE_NAME: &'static str = "authors";
///     const RESOURCE_NAME_SINGULAR: &'static str = "author";
///
///     fn columns() -> &'static [&'static str] {
///         &["id", "name", "bio"]
///     }
///
///     fn filterable_columns() -> &'static [&'static str] {
///         &["id", "name"]
///     }
///
///     fn id(&self) -> i64 {
///         self.id
///     }
///
///     fn values(&self) -> Vec<Value> {
///         vec![self.id.into(), self.name.clone().into(), self.bio.clone().into()]
///     }
/// }
/// ```
pub trait CRUDTable: FromQueryResult + Sized + Send + Sync + 'static {
    /// Primary key value type.
    type Id: Into<Value> + Clone + fmt::Display + Send + Sync + 'static;
    /// Partial update payload for this table.
    type UpdateModel: UpdateModel;

    const TABLE_NAME: &'static str;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const ID_COLUMN: &'static str = "id";

    /// Every column, in `INSERT` order.
    fn columns() -> &'static [&'static str];

    /// Columns that may appear in filters and sort specs.
    fn filterable_columns() -> &'static [&'static str];

    fn id(&self) -> Self::Id;

    /// Row values ordered exactly like [`CRUDTable::columns`].
    fn values(&self) -> Vec<Value>;

    #[must_use]
    fn is_filterable(field: &str) -> bool {
        Self::filterable_columns().contains(&field)
    }

    #[must_use]
    fn has_column(column: &str) -> bool {
        Self::columns().contains(&column)
    }
}

/// A payload that knows which of its fields were actually provided.
///
/// Implementations build a [`Changes`] from `Option<T>` fields (absent = not
/// updated) and `Option<Option<T>>` fields for nullable columns (`Some(None)`
/// writes `NULL`). A field set to `0` or `""` is still an assignment.
pub trait UpdateModel: Send + Sync {
    fn changes(&self) -> Changes;
}

/// Ordered column assignments for a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    assignments: Vec<(&'static str, Value)>,
}

impl Changes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `column`, replacing an earlier assignment to the same column.
    #[must_use]
    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(slot) = self.assignments.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value;
        } else {
            self.assignments.push((column, value));
        }
        self
    }

    /// Assign only when the field was provided.
    #[must_use]
    pub fn set_if<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.assignments.iter().map(|(c, v)| (*c, v))
    }
}
