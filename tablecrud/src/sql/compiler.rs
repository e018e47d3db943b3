use sea_orm::{DatabaseBackend, Statement, Value};
use std::fmt::Write;

use crate::core::{CRUDTable, Changes};
use crate::database::{Arg, expand_in};
use crate::errors::CrudError;
use crate::filtering::conditions::{Operator, validate_field, validate_like_value};
use crate::filtering::{FieldProjection, Filter};

/// A finished statement: SQL text with `?` placeholders and its arguments in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Compiled {
    fn new(sql: String) -> Self {
        Self {
            sql,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_statement(self, backend: DatabaseBackend) -> Statement {
        Statement::from_sql_and_values(backend, self.sql, self.values)
    }
}

/// Which kind of statement the row-selection tail is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Read,
    Write,
}

/// Wrap an identifier in backticks, doubling any backtick inside it.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

// Limits and offsets are bound as signed integers; both supported drivers reject u64 above i64::MAX.
fn bound(n: u64) -> Value {
    Value::from(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Append `WHERE ... AND ...`, `ORDER BY`, `LIMIT` and `OFFSET` for `filter`.
///
/// Every field is checked again here, whoever built the filter.
fn push_filter<T: CRUDTable>(
    out: &mut Compiled,
    filter: &Filter,
    target: Target,
) -> Result<(), CrudError> {
    for (i, condition) in filter.conditions.iter().enumerate() {
        validate_field::<T>(&condition.field)?;
        if condition.operator == Operator::Like {
            validate_like_value(&condition.field, &condition.value)?;
        }
        out.sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        let _ = write!(
            out.sql,
            "{} {} ?",
            quote_identifier(&condition.field),
            condition.operator.as_sql()
        );
        out.values.push(condition.value.clone());
    }

    if let Some(sort) = &filter.sort {
        if !T::is_filterable(&sort.field) {
            return Err(CrudError::invalid_sort(format!(
                "unknown sort field '{}'",
                sort.field
            )));
        }
        let _ = write!(
            out.sql,
            " ORDER BY {} {}",
            quote_identifier(&sort.field),
            sort.order.as_sql()
        );
    }

    let offset = match (target, filter.offset) {
        (Target::Read, offset) => offset,
        (Target::Write, Some(0) | None) => None,
        (Target::Write, Some(_)) => {
            return Err(CrudError::invalid_pagination(
                "offset is not supported for UPDATE or DELETE",
            ));
        }
    };
    if let Some(limit) = filter.limit {
        out.sql.push_str(" LIMIT ?");
        out.values.push(bound(limit));
    }
    if let Some(offset) = offset {
        out.sql.push_str(" OFFSET ?");
        out.values.push(bound(offset));
    }
    Ok(())
}

fn id_clause<T: CRUDTable>() -> String {
    format!(" WHERE {} = ?", quote_identifier(T::ID_COLUMN))
}

fn ids_clause<T: CRUDTable>() -> String {
    format!(" WHERE {} IN (?)", quote_identifier(T::ID_COLUMN))
}

fn id_list<T: CRUDTable>(ids: &[T::Id]) -> Arg {
    Arg::List(ids.iter().cloned().map(Into::into).collect())
}

fn select_base<T: CRUDTable>() -> String {
    format!("SELECT * FROM {}", quote_identifier(T::TABLE_NAME))
}

/// `SELECT * FROM `table`` with an optional filter. `None` selects every row.
///
/// # Errors
///
/// Any field, LIKE, sort or pagination error from the filter.
pub fn compile_select<T: CRUDTable>(filter: Option<&Filter>) -> Result<Compiled, CrudError> {
    let mut out = Compiled::new(select_base::<T>());
    if let Some(filter) = filter {
        push_filter::<T>(&mut out, filter, Target::Read)?;
    }
    Ok(out)
}

/// Like [`compile_select`] but only for the columns the projection resolves to.
///
/// # Errors
///
/// `NoSelectableColumns` when the projection leaves nothing, plus any filter error.
pub fn compile_select_fields<T: CRUDTable>(
    projection: &FieldProjection,
    filter: Option<&Filter>,
) -> Result<Compiled, CrudError> {
    let columns = projection
        .resolve::<T>()?
        .into_iter()
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = Compiled::new(format!(
        "SELECT {columns} FROM {}",
        quote_identifier(T::TABLE_NAME)
    ));
    if let Some(filter) = filter {
        push_filter::<T>(&mut out, filter, Target::Read)?;
    }
    Ok(out)
}

#[must_use]
pub fn compile_select_by_id<T: CRUDTable>(id: T::Id) -> Compiled {
    let mut out = Compiled::new(select_base::<T>() + &id_clause::<T>());
    out.values.push(id.into());
    out
}

/// # Errors
///
/// `EmptyIdList` when `ids` is empty.
pub fn compile_select_by_ids<T: CRUDTable>(ids: &[T::Id]) -> Result<Compiled, CrudError> {
    expand_in(&(select_base::<T>() + &ids_clause::<T>()), vec![id_list::<T>(ids)])
}

/// `INSERT` over every column, in [`CRUDTable::columns`] order.
///
/// # Errors
///
/// `InvalidValue` when the row does not produce one value per column.
pub fn compile_insert<T: CRUDTable>(row: &T) -> Result<Compiled, CrudError> {
    let values = row.values();
    if values.len() != T::columns().len() {
        return Err(CrudError::InvalidValue {
            field: T::TABLE_NAME.to_string(),
            reason: "row values do not match the column list",
        });
    }
    let columns = T::columns()
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; values.len()].join(", ");
    Ok(Compiled {
        sql: format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            quote_identifier(T::TABLE_NAME)
        ),
        values,
    })
}

/// `UPDATE `table` SET ...` from a change set. The id column is never assigned.
fn update_base<T: CRUDTable>(changes: &Changes) -> Result<Compiled, CrudError> {
    let mut out = Compiled::new(format!("UPDATE {} SET ", quote_identifier(T::TABLE_NAME)));
    let mut assigned = 0;
    for (column, value) in changes.iter() {
        if column == T::ID_COLUMN {
            continue;
        }
        if !T::has_column(column) {
            return Err(CrudError::invalid_field(column, "column does not exist"));
        }
        if assigned > 0 {
            out.sql.push_str(", ");
        }
        let _ = write!(out.sql, "{} = ?", quote_identifier(column));
        out.values.push(value.clone());
        assigned += 1;
    }
    if assigned == 0 {
        return Err(CrudError::NoUpdatableColumns);
    }
    Ok(out)
}

/// Partial update of every row matching `filter`; `None` updates all rows.
///
/// # Errors
///
/// `NoUpdatableColumns`, `InvalidField` for unknown columns, any filter error, and
/// `InvalidPagination` when the filter carries a non-zero offset.
pub fn compile_update<T: CRUDTable>(
    changes: &Changes,
    filter: Option<&Filter>,
) -> Result<Compiled, CrudError> {
    let mut out = update_base::<T>(changes)?;
    if let Some(filter) = filter {
        push_filter::<T>(&mut out, filter, Target::Write)?;
    }
    Ok(out)
}

/// # Errors
///
/// `NoUpdatableColumns` or `InvalidField` from the change set.
pub fn compile_update_by_id<T: CRUDTable>(
    changes: &Changes,
    id: T::Id,
) -> Result<Compiled, CrudError> {
    let mut out = update_base::<T>(changes)?;
    out.sql.push_str(&id_clause::<T>());
    out.values.push(id.into());
    Ok(out)
}

/// # Errors
///
/// `EmptyIdList`, `NoUpdatableColumns` or `InvalidField`.
pub fn compile_update_by_ids<T: CRUDTable>(
    changes: &Changes,
    ids: &[T::Id],
) -> Result<Compiled, CrudError> {
    if ids.is_empty() {
        return Err(CrudError::EmptyIdList);
    }
    let base = update_base::<T>(changes)?;
    let mut args: Vec<Arg> = base.values.into_iter().map(Arg::Scalar).collect();
    args.push(id_list::<T>(ids));
    expand_in(&(base.sql + &ids_clause::<T>()), args)
}

fn delete_base<T: CRUDTable>() -> String {
    format!("DELETE FROM {}", quote_identifier(T::TABLE_NAME))
}

/// `DELETE` for rows matching `filter`.
///
/// Refuses to delete without at least one condition; use the by-id variants
/// for targeted deletes.
///
/// # Errors
///
/// `MissingFilter` for `None` or a filter without conditions, plus any filter error.
pub fn compile_delete<T: CRUDTable>(filter: Option<&Filter>) -> Result<Compiled, CrudError> {
    let filter = filter
        .filter(|f| f.has_conditions())
        .ok_or(CrudError::MissingFilter)?;
    let mut out = Compiled::new(delete_base::<T>());
    push_filter::<T>(&mut out, filter, Target::Write)?;
    Ok(out)
}

#[must_use]
pub fn compile_delete_by_id<T: CRUDTable>(id: T::Id) -> Compiled {
    let mut out = Compiled::new(delete_base::<T>() + &id_clause::<T>());
    out.values.push(id.into());
    out
}

/// # Errors
///
/// `EmptyIdList` when `ids` is empty.
pub fn compile_delete_by_ids<T: CRUDTable>(ids: &[T::Id]) -> Result<Compiled, CrudError> {
    expand_in(&(delete_base::<T>() + &ids_clause::<T>()), vec![id_list::<T>(ids)])
}
