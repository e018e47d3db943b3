//! # Error Handling
//!
//! Two layers of errors live here:
//!
//! - [`CrudError`] is what every filter, compiler and repository function returns.
//!   Validation kinds are raised before any statement reaches the database; store
//!   kinds carry the attempted SQL and arguments so they can be logged.
//! - [`ApiError`] is the HTTP face of a `CrudError`. It picks a status code, logs
//!   internal details with `tracing`, and sends only a sanitized message.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tablecrud::{ApiError, Repository};
//!
//! async fn my_handler(repo: Repository<Author>, id: i64) -> Result<Json<Author>, ApiError> {
//!     // NotFound becomes 404, store failures become a logged 500
//!     Ok(Json(repo.get_by_id(id).await?))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, Value};
use serde::Serialize;
use std::{fmt, time::Duration};

/// Why a `LIKE` value was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeViolation {
    /// The value bound to a `LIKE` condition was not a string
    NotAString,
    /// The value is longer than the allowed number of characters
    TooLong,
    /// The value contains a character that is never allowed in a pattern
    ForbiddenCharacter(char),
    /// The value contains more `%` wildcards than allowed
    TooManyWildcards(usize),
}

impl fmt::Display for LikeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAString => write!(f, "LIKE operator only supports string values"),
            Self::TooLong => write!(f, "LIKE value is too long"),
            Self::ForbiddenCharacter(c) => write!(f, "invalid character {c:?} in LIKE value"),
            Self::TooManyWildcards(n) => write!(f, "too many wildcards in LIKE pattern ({n})"),
        }
    }
}

/// Errors produced by the filter parser, the SQL compiler and the repository.
#[derive(Debug)]
pub enum CrudError {
    /// Field missing from the table's whitelist, empty, or too long
    InvalidField { field: String, reason: &'static str },
    /// A query parameter carried no usable value
    InvalidValue { field: String, reason: &'static str },
    /// Operator suffix or token not in the operator whitelist
    InvalidOperator { operator: String },
    /// Value rejected for a `LIKE` condition
    InvalidLikeValue { field: String, violation: LikeViolation },
    /// Sort field not whitelisted or order not `ASC`/`DESC`
    InvalidSort { message: String },
    /// Page, page size, limit or offset out of bounds
    InvalidPagination { message: String },
    /// An update change set with nothing to assign
    NoUpdatableColumns,
    /// A field projection that leaves no column to select
    NoSelectableColumns,
    /// A batch operation given zero ids
    EmptyIdList,
    /// A bulk delete without any condition
    MissingFilter,
    /// Zero rows for a lookup that requires one
    NotFound {
        resource: &'static str,
        id: Option<String>,
    },
    /// The execution primitive failed
    Store {
        sql: String,
        values: Vec<Value>,
        source: DbErr,
    },
    /// The statement deadline expired before the store answered
    Timeout { sql: String, after: Duration },
}

impl CrudError {
    pub(crate) fn invalid_field(field: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason,
        }
    }

    pub(crate) fn invalid_sort(message: impl Into<String>) -> Self {
        Self::InvalidSort {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_pagination(message: impl Into<String>) -> Self {
        Self::InvalidPagination {
            message: message.into(),
        }
    }

    /// True for every kind that is caused by caller input rather than the store.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::Store { .. } | Self::Timeout { .. }
        )
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField { field, reason } => write!(f, "invalid field '{field}': {reason}"),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{field}': {reason}")
            }
            Self::InvalidOperator { operator } => write!(f, "unsupported operator: '{operator}'"),
            Self::InvalidLikeValue { field, violation } => write!(f, "{field}: {violation}"),
            Self::InvalidSort { message } => write!(f, "invalid sort: {message}"),
            Self::InvalidPagination { message } => write!(f, "invalid pagination: {message}"),
            Self::NoUpdatableColumns => write!(f, "no updatable columns"),
            Self::NoSelectableColumns => write!(f, "no valid fields selected"),
            Self::EmptyIdList => write!(f, "id list is empty"),
            Self::MissingFilter => write!(f, "a filter with at least one condition is required"),
            Self::NotFound { resource, id } => match id {
                Some(id) => write!(f, "{resource} with ID '{id}' not found"),
                None => write!(f, "{resource} not found"),
            },
            Self::Store { sql, source, .. } => write!(f, "statement failed ({sql}): {source}"),
            Self::Timeout { sql, after } => {
                write!(f, "statement timed out after {}ms ({sql})", after.as_millis())
            }
        }
    }
}

impl std::error::Error for CrudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// API error type with automatic logging and sanitized responses
///
/// Internal errors (store failures, timeouts) are logged but never exposed.
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - Resource doesn't exist
    NotFound {
        /// User-facing error message
        message: String,
    },

    /// 400 Bad Request - Invalid input from user
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error - Store error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: CrudError,
    },

    /// 504 Gateway Timeout - Statement deadline expired
    Timeout {
        /// Internal error (logged, not sent to user)
        internal: CrudError,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::BadRequest { message }
            | Self::Database { message, .. } => message.clone(),
            Self::Timeout { .. } => "The request took too long to complete".to_string(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => match internal {
                CrudError::Store {
                    sql,
                    values,
                    source,
                } => {
                    tracing::error!(sql = %sql, values = ?values, error = %source, "Database error occurred");
                }
                other => tracing::error!(error = %other, "Database error occurred"),
            },
            Self::Timeout { internal } => {
                tracing::warn!(error = %internal, "Statement deadline exceeded");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Validation kinds become 400, `NotFound` 404, `Timeout` 504 and store failures 500.
impl From<CrudError> for ApiError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::NotFound { .. } => Self::NotFound {
                message: err.to_string(),
            },
            CrudError::Timeout { .. } => Self::Timeout { internal: err },
            CrudError::Store { .. } => Self::Database {
                message: "A database error occurred".to_string(),
                internal: err,
            },
            other => Self::BadRequest {
                message: other.to_string(),
            },
        }
    }
}
