use async_trait::async_trait;
use sea_orm::{DatabaseBackend, DbErr, QueryResult, Statement};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tablecrud::Executor;

/// Records every statement it is asked to run and never touches a database.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    statements: Arc<Mutex<Vec<Statement>>>,
    pub rows_affected: u64,
}

impl RecordingExecutor {
    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, stmt: Statement) {
        self.statements.lock().unwrap().push(stmt);
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        self.record(stmt);
        Ok(Vec::new())
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, DbErr> {
        self.record(stmt);
        Ok(self.rows_affected)
    }
}

/// Fails every statement with a driver-style error.
#[derive(Clone, Default)]
pub struct FailingExecutor;

#[async_trait]
impl Executor for FailingExecutor {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
    }

    async fn query_all(&self, _stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        Err(DbErr::Custom("connection refused".to_string()))
    }

    async fn execute(&self, _stmt: Statement) -> Result<u64, DbErr> {
        Err(DbErr::Custom("connection refused".to_string()))
    }
}

/// Answers only after `delay`.
#[derive(Clone)]
pub struct SlowExecutor {
    pub delay: Duration,
}

#[async_trait]
impl Executor for SlowExecutor {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySql
    }

    async fn query_all(&self, _stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn execute(&self, _stmt: Statement) -> Result<u64, DbErr> {
        tokio::time::sleep(self.delay).await;
        Ok(0)
    }
}
