//! # tablecrud
//!
//! Generic CRUD for plain SQL tables with a query-parameter filter compiler
//! that is safe to expose to untrusted clients.
//!
//! A table implements [`CRUDTable`] (name, columns, filterable columns, primary
//! key). From there:
//!
//! - [`filtering`] turns `?name_like=%25ali%25&page=2` into a validated [`Filter`]
//! - [`sql`] compiles filters into backtick-quoted SQL with `?` placeholders
//! - [`Repository`] runs the compiled statements on any [`Executor`]
//! - [`routes::crud_router`] mounts the whole surface on an axum `Router`
//!
//! ```rust,ignore
//! use tablecrud::{DatabaseConfig, Repository, routes::crud_router};
//!
//! let config = DatabaseConfig::load()?;
//! let db = config.connect().await?;
//! let app = axum::Router::new().nest("/authors", crud_router(Repository::<Author>::new(db)));
//! ```

pub mod config;
pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod routes;
pub mod sql;

pub use config::DatabaseConfig;
pub use core::{CRUDTable, Changes, Repository, UpdateModel};
pub use database::Executor;
pub use errors::{ApiError, CrudError, LikeViolation};
pub use filtering::{Condition, FieldProjection, Filter, Operator, Pagination, Sort, SortOrder};

// Re-exported for update models that need `double_option`
pub use serde_with;
