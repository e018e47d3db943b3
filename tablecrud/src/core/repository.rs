use sea_orm::{DatabaseConnection, DbErr, FromQueryResult, QueryResult};
use serde_json::Value as JsonValue;
use std::{marker::PhantomData, time::Duration};

use super::traits::{CRUDTable, UpdateModel};
use crate::database::Executor;
use crate::errors::CrudError;
use crate::filtering::{FieldProjection, Filter};
use crate::sql::{self, Compiled};

/// Generic CRUD operations for one table over an injected [`Executor`].
///
/// Every method compiles its statement first, so validation errors never reach
/// the store, then runs exactly one statement. Nothing is retried.
///
/// ```rust,ignore
/// let authors = Repository::<Author>::new(db.clone())
///     .with_statement_timeout(Duration::from_secs(5));
/// let alice = authors.find_one_by_filter(&Filter::new().with_condition(Condition::eq("name", "Alice"))).await?;
/// ```
pub struct Repository<T, E = DatabaseConnection> {
    executor: E,
    statement_timeout: Option<Duration>,
    _table: PhantomData<fn() -> T>,
}

impl<T, E: Clone> Clone for Repository<T, E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            statement_timeout: self.statement_timeout,
            _table: PhantomData,
        }
    }
}

impl<T: CRUDTable, E: Executor> Repository<T, E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            statement_timeout: None,
            _table: PhantomData,
        }
    }

    /// Abort any statement still running after `timeout` with [`CrudError::Timeout`].
    #[must_use]
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn statement_timeout(&self) -> Option<Duration> {
        self.statement_timeout
    }

    fn store_error(compiled: Compiled, source: DbErr) -> CrudError {
        tracing::error!(
            table = T::TABLE_NAME,
            sql = %compiled.sql,
            values = ?compiled.values,
            error = %source,
            "Statement failed"
        );
        CrudError::Store {
            sql: compiled.sql,
            values: compiled.values,
            source,
        }
    }

    fn timed_out(compiled: Compiled, after: Duration) -> CrudError {
        tracing::warn!(
            table = T::TABLE_NAME,
            sql = %compiled.sql,
            timeout = ?after,
            "Statement deadline exceeded"
        );
        CrudError::Timeout {
            sql: compiled.sql,
            after,
        }
    }

    async fn fetch(&self, compiled: Compiled) -> Result<Vec<QueryResult>, CrudError> {
        tracing::debug!(
            table = T::TABLE_NAME,
            sql = %compiled.sql,
            args = compiled.values.len(),
            "Running query"
        );
        let stmt = compiled.clone().into_statement(self.executor.backend());
        let outcome = match self.statement_timeout {
            Some(after) => {
                match tokio::time::timeout(after, self.executor.query_all(stmt)).await {
                    Ok(outcome) => outcome,
                    Err(_) => return Err(Self::timed_out(compiled, after)),
                }
            }
            None => self.executor.query_all(stmt).await,
        };
        outcome.map_err(|source| Self::store_error(compiled, source))
    }

    async fn run(&self, compiled: Compiled) -> Result<u64, CrudError> {
        tracing::debug!(
            table = T::TABLE_NAME,
            sql = %compiled.sql,
            args = compiled.values.len(),
            "Running statement"
        );
        let stmt = compiled.clone().into_statement(self.executor.backend());
        let outcome = match self.statement_timeout {
            Some(after) => match tokio::time::timeout(after, self.executor.execute(stmt)).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(Self::timed_out(compiled, after)),
            },
            None => self.executor.execute(stmt).await,
        };
        outcome.map_err(|source| Self::store_error(compiled, source))
    }

    async fn fetch_rows(&self, compiled: Compiled) -> Result<Vec<T>, CrudError> {
        let context = compiled.clone();
        let rows = self.fetch(compiled).await?;
        rows.iter()
            .map(|row| T::from_query_result(row, ""))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| Self::store_error(context, source))
    }

    /// Every row of the table.
    ///
    /// # Errors
    ///
    /// `Store` or `Timeout`.
    pub async fn find_all(&self) -> Result<Vec<T>, CrudError> {
        self.fetch_rows(sql::compile_select::<T>(None)?).await
    }

    /// `Ok(None)` when no row has this id.
    ///
    /// # Errors
    ///
    /// `Store` or `Timeout`.
    pub async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, CrudError> {
        let rows = self.fetch_rows(sql::compile_select_by_id::<T>(id)).await?;
        Ok(rows.into_iter().next())
    }

    /// Like [`Repository::find_by_id`] but a missing row is an error.
    ///
    /// # Errors
    ///
    /// `NotFound` when no row has this id, plus `Store` or `Timeout`.
    pub async fn get_by_id(&self, id: T::Id) -> Result<T, CrudError> {
        let label = id.to_string();
        self.find_by_id(id).await?.ok_or(CrudError::NotFound {
            resource: T::RESOURCE_NAME_SINGULAR,
            id: Some(label),
        })
    }

    /// # Errors
    ///
    /// `EmptyIdList` before any statement runs, plus `Store` or `Timeout`.
    pub async fn find_by_ids(&self, ids: &[T::Id]) -> Result<Vec<T>, CrudError> {
        self.fetch_rows(sql::compile_select_by_ids::<T>(ids)?).await
    }

    /// Rows matching `filter`; `None` is the same as [`Repository::find_all`].
    ///
    /// # Errors
    ///
    /// Any validation error from the filter, plus `Store` or `Timeout`.
    pub async fn find_by_filter(&self, filter: Option<&Filter>) -> Result<Vec<T>, CrudError> {
        match filter {
            Some(filter) => self.fetch_rows(sql::compile_select::<T>(Some(filter))?).await,
            None => self.find_all().await,
        }
    }

    /// First row matching `filter`. The filter's limit is replaced with 1.
    ///
    /// # Errors
    ///
    /// Any validation error from the filter, plus `Store` or `Timeout`.
    pub async fn find_one_by_filter(&self, filter: &Filter) -> Result<Option<T>, CrudError> {
        let single = filter.clone().limit(1);
        let rows = self
            .fetch_rows(sql::compile_select::<T>(Some(&single))?)
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Rows as JSON objects holding only the projected columns.
    ///
    /// # Errors
    ///
    /// `NoSelectableColumns`, any filter error, plus `Store` or `Timeout`.
    pub async fn find_projected(
        &self,
        projection: &FieldProjection,
        filter: Option<&Filter>,
    ) -> Result<Vec<JsonValue>, CrudError> {
        let compiled = sql::compile_select_fields::<T>(projection, filter)?;
        let context = compiled.clone();
        let rows = self.fetch(compiled).await?;
        rows.iter()
            .map(|row| JsonValue::from_query_result(row, ""))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| Self::store_error(context, source))
    }

    /// Insert one row over the full column list.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a malformed row, plus `Store` or `Timeout`.
    pub async fn create_one(&self, row: &T) -> Result<u64, CrudError> {
        let compiled = sql::compile_insert::<T>(row)?;
        tracing::debug!(table = T::TABLE_NAME, id = %row.id(), "Creating row");
        self.run(compiled).await
    }

    /// Apply the provided fields of `update` to the row with this id.
    ///
    /// # Errors
    ///
    /// `NoUpdatableColumns` or `InvalidField` before any statement runs, plus
    /// `Store` or `Timeout`.
    pub async fn update_one(&self, id: T::Id, update: &T::UpdateModel) -> Result<u64, CrudError> {
        self.run(sql::compile_update_by_id::<T>(&update.changes(), id)?)
            .await
    }

    /// One `UPDATE ... WHERE id IN (...)` for every listed id.
    ///
    /// # Errors
    ///
    /// `EmptyIdList`, `NoUpdatableColumns` or `InvalidField` before any statement
    /// runs, plus `Store` or `Timeout`.
    pub async fn update_by_ids(
        &self,
        update: &T::UpdateModel,
        ids: &[T::Id],
    ) -> Result<u64, CrudError> {
        self.run(sql::compile_update_by_ids::<T>(&update.changes(), ids)?)
            .await
    }

    /// Update every row matching `filter`. `None` updates the whole table.
    ///
    /// # Errors
    ///
    /// Any validation error, plus `Store` or `Timeout`.
    pub async fn update_by_filter(
        &self,
        update: &T::UpdateModel,
        filter: Option<&Filter>,
    ) -> Result<u64, CrudError> {
        self.run(sql::compile_update::<T>(&update.changes(), filter)?)
            .await
    }

    /// # Errors
    ///
    /// `Store` or `Timeout`.
    pub async fn delete_by_id(&self, id: T::Id) -> Result<u64, CrudError> {
        self.run(sql::compile_delete_by_id::<T>(id)).await
    }

    /// # Errors
    ///
    /// `EmptyIdList` before any statement runs, plus `Store` or `Timeout`.
    pub async fn delete_by_ids(&self, ids: &[T::Id]) -> Result<u64, CrudError> {
        self.run(sql::compile_delete_by_ids::<T>(ids)?).await
    }

    /// Delete every row matching `filter`. An unconditional delete is refused.
    ///
    /// # Errors
    ///
    /// `MissingFilter` for `None` or a filter without conditions, any other
    /// validation error, plus `Store` or `Timeout`.
    pub async fn delete_by_filter(&self, filter: Option<&Filter>) -> Result<u64, CrudError> {
        self.run(sql::compile_delete::<T>(filter)?).await
    }
}
