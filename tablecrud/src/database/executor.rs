use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr, QueryResult,
    Statement,
};

/// The execution primitive the repository runs compiled statements on.
///
/// Implemented for sea-orm connections and transactions. Anything else that can
/// run a [`Statement`] (a recording double in tests, a pooled wrapper) only has to
/// provide these three methods.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Backend the statements are built for.
    fn backend(&self) -> DatabaseBackend;

    /// Run a statement that returns rows.
    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr>;

    /// Run a statement for effect and report the affected-row count.
    async fn execute(&self, stmt: Statement) -> Result<u64, DbErr>;
}

#[async_trait]
impl Executor for DatabaseConnection {
    fn backend(&self) -> DatabaseBackend {
        self.get_database_backend()
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        ConnectionTrait::query_all(self, stmt).await
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, DbErr> {
        ConnectionTrait::execute(self, stmt)
            .await
            .map(|result| result.rows_affected())
    }
}

#[async_trait]
impl Executor for DatabaseTransaction {
    fn backend(&self) -> DatabaseBackend {
        self.get_database_backend()
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        ConnectionTrait::query_all(self, stmt).await
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, DbErr> {
        ConnectionTrait::execute(self, stmt)
            .await
            .map(|result| result.rows_affected())
    }
}
