//! # HTTP Routes
//!
//! A generic axum router over one [`Repository`]. Query strings go through
//! [`parse_filter`] / [`parse_projection`], so every filter a client can send is
//! validated exactly like a filter built in code.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .nest("/authors", crud_router(Repository::<Author>::new(db.clone())))
//!     .nest("/books", crud_router(Repository::<Book>::new(db)));
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::core::{CRUDTable, Repository};
use crate::database::Executor;
use crate::errors::{ApiError, CrudError};
use crate::filtering::{QueryParams, parse_filter, parse_projection};

/// `{"ids": [...]}` body of the batch endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct IdList<Id> {
    pub ids: Vec<Id>,
}

/// `{"ids": [...], "changes": {...}}` body of `PUT /batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchUpdate<Id, U> {
    pub ids: Vec<Id>,
    pub changes: U,
}

/// Answer of every write endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affected {
    pub affected: u64,
}

impl From<u64> for Affected {
    fn from(affected: u64) -> Self {
        Self { affected }
    }
}

/// Mount the full CRUD surface for `T`:
///
/// | method | path     | operation |
/// |--------|----------|-----------|
/// | GET    | `/`      | filtered (or projected) list |
/// | POST   | `/`      | create one row |
/// | PUT    | `/`      | update rows matching the query filter |
/// | DELETE | `/`      | delete rows matching the query filter (at least one condition) |
/// | GET    | `/{id}`  | one row, 404 when absent |
/// | PUT    | `/{id}`  | partial update of one row |
/// | DELETE | `/{id}`  | delete one row |
/// | POST   | `/batch` | rows for a list of ids |
/// | PUT    | `/batch` | partial update of a list of ids |
/// | DELETE | `/batch` | delete a list of ids |
pub fn crud_router<T, E>(repo: Repository<T, E>) -> Router
where
    T: CRUDTable + Serialize + DeserializeOwned,
    T::Id: DeserializeOwned,
    T::UpdateModel: DeserializeOwned,
    E: Executor + Clone + 'static,
{
    Router::new()
        .route(
            "/",
            get(list::<T, E>)
                .post(create::<T, E>)
                .put(update_matching::<T, E>)
                .delete(delete_matching::<T, E>),
        )
        .route(
            "/batch",
            post(find_batch::<T, E>)
                .put(update_batch::<T, E>)
                .delete(delete_batch::<T, E>),
        )
        .route(
            "/{id}",
            get(get_one::<T, E>)
                .put(update_one::<T, E>)
                .delete(delete_one::<T, E>),
        )
        .with_state(repo)
}

async fn list<T, E>(
    State(repo): State<Repository<T, E>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError>
where
    T: CRUDTable + Serialize,
    E: Executor,
{
    let params: QueryParams = pairs.into_iter().collect();
    let filter = parse_filter::<T>(&params)?;
    if let Some(projection) = parse_projection(&params) {
        let rows = repo.find_projected(&projection, filter.as_ref()).await?;
        return Ok(Json(rows).into_response());
    }
    let rows = repo.find_by_filter(filter.as_ref()).await?;
    Ok(Json(rows).into_response())
}

async fn create<T, E>(
    State(repo): State<Repository<T, E>>,
    Json(row): Json<T>,
) -> Result<(StatusCode, Json<Affected>), ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let affected = repo.create_one(&row).await?;
    Ok((StatusCode::CREATED, Json(affected.into())))
}

async fn update_matching<T, E>(
    State(repo): State<Repository<T, E>>,
    Query(pairs): Query<Vec<(String, String)>>,
    Json(changes): Json<T::UpdateModel>,
) -> Result<Json<Affected>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let params: QueryParams = pairs.into_iter().collect();
    let filter = parse_filter::<T>(&params)?;
    let affected = repo.update_by_filter(&changes, filter.as_ref()).await?;
    Ok(Json(affected.into()))
}

async fn delete_matching<T, E>(
    State(repo): State<Repository<T, E>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Affected>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let params: QueryParams = pairs.into_iter().collect();
    let filter = parse_filter::<T>(&params)?;
    let affected = repo.delete_by_filter(filter.as_ref()).await?;
    Ok(Json(affected.into()))
}

async fn get_one<T, E>(
    State(repo): State<Repository<T, E>>,
    Path(id): Path<T::Id>,
) -> Result<Json<T>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    Ok(Json(repo.get_by_id(id).await?))
}

async fn update_one<T, E>(
    State(repo): State<Repository<T, E>>,
    Path(id): Path<T::Id>,
    Json(changes): Json<T::UpdateModel>,
) -> Result<Json<Affected>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let affected = repo.update_one(id, &changes).await?;
    Ok(Json(affected.into()))
}

async fn delete_one<T, E>(
    State(repo): State<Repository<T, E>>,
    Path(id): Path<T::Id>,
) -> Result<Json<Affected>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let affected = repo.delete_by_id(id.clone()).await?;
    if affected == 0 {
        return Err(CrudError::NotFound {
            resource: T::RESOURCE_NAME_SINGULAR,
            id: Some(id.to_string()),
        }
        .into());
    }
    Ok(Json(affected.into()))
}

async fn find_batch<T, E>(
    State(repo): State<Repository<T, E>>,
    Json(body): Json<IdList<T::Id>>,
) -> Result<Json<Vec<T>>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    Ok(Json(repo.find_by_ids(&body.ids).await?))
}

async fn update_batch<T, E>(
    State(repo): State<Repository<T, E>>,
    Json(body): Json<BatchUpdate<T::Id, T::UpdateModel>>,
) -> Result<Json<Affected>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let affected = repo.update_by_ids(&body.changes, &body.ids).await?;
    Ok(Json(affected.into()))
}

async fn delete_batch<T, E>(
    State(repo): State<Repository<T, E>>,
    Json(body): Json<IdList<T::Id>>,
) -> Result<Json<Affected>, ApiError>
where
    T: CRUDTable,
    E: Executor,
{
    let affected = repo.delete_by_ids(&body.ids).await?;
    Ok(Json(affected.into()))
}
