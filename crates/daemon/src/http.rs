//! HTTP API: routes, handlers and error mapping.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tsundoku_core::api::{
    AddFavoriteRequest, AddQueueItemRequest, ErrorResponse, ListQueueQuery, SearchQuery,
    UpdateStatusRequest,
};
use tsundoku_core::books::{page_start, BookService, PAGE_SIZE};
use tsundoku_core::favorites::{FavoritesError, FavoritesService};
use tsundoku_core::model::{AddParams, FavoriteItem, OrderBy, QueueItem, SearchParams, SearchResult};
use tsundoku_core::queue::{QueueError, QueueService};

use crate::googlebooks::GoogleBooksClient;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Reading queue.
    pub queue: Arc<QueueService>,
    /// Favorites list.
    pub favorites: Arc<FavoritesService>,
    /// Catalog search.
    pub books: Arc<BookService<GoogleBooksClient>>,
}

/// Every route, with request tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/technical-books", get(search_books))
        .route("/api/tsundoku", get(list_queue).post(add_queue_item))
        .route("/api/tsundoku/pickup", post(pickup))
        .route("/api/tsundoku/{id}/pickup", post(start_reading))
        .route("/api/tsundoku/{id}/status", post(update_status))
        .route("/api/tsundoku/{id}/restack", post(restack))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route("/api/favorites/{id}", delete(delete_favorite))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn search_books(
    State(st): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResult>, AppError> {
    let Query(q) = query?;
    let query = q.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(AppError::BadRequest("q required".into()));
    }
    let params = SearchParams {
        query,
        start_index: page_start(q.page.as_deref(), q.start_index.as_deref()),
        max_results: PAGE_SIZE,
        order_by: OrderBy::parse_lenient(q.order_by.as_deref()),
        lang: q.lang.unwrap_or_default(),
    };
    let res = st.books.search(params).await.map_err(AppError::Upstream)?;
    Ok(Json(res))
}

async fn list_queue(
    State(st): State<AppState>,
    query: Result<Query<ListQueueQuery>, QueryRejection>,
) -> Result<Json<Vec<QueueItem>>, AppError> {
    let Query(q) = query?;
    let items = blocking(move || st.queue.list(q.status.as_deref())).await?;
    Ok(Json(items))
}

async fn add_queue_item(
    State(st): State<AppState>,
    payload: Result<Json<AddQueueItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QueueItem>), AppError> {
    let Json(req) = payload?;
    let params = AddParams {
        book: req.book,
        note: req.note.trim().to_string(),
        priority: req.priority,
    };
    let item = blocking(move || st.queue.add(params)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn pickup(State(st): State<AppState>) -> Result<Json<QueueItem>, AppError> {
    let item = blocking(move || st.queue.pickup()).await?;
    Ok(Json(item))
}

async fn start_reading(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueueItem>, AppError> {
    let item = blocking(move || st.queue.start_reading(&id)).await?;
    Ok(Json(item))
}

async fn update_status(
    State(st): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<QueueItem>, AppError> {
    let Json(req) = payload?;
    let item = blocking(move || st.queue.update_status(&id, &req.status)).await?;
    Ok(Json(item))
}

async fn restack(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueueItem>, AppError> {
    let item = blocking(move || st.queue.restack(&id)).await?;
    Ok(Json(item))
}

async fn list_favorites(State(st): State<AppState>) -> Result<Json<Vec<FavoriteItem>>, AppError> {
    let items = blocking(move || st.favorites.list()).await?;
    Ok(Json(items))
}

async fn add_favorite(
    State(st): State<AppState>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FavoriteItem>), AppError> {
    let Json(req) = payload?;
    let item = blocking(move || st.favorites.add(req.book)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn delete_favorite(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    blocking(move || st.favorites.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs a service call on the blocking pool; the file repositories do
/// synchronous I/O under their locks.
async fn blocking<T, E, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(Into::into)
}

/// Handler failure, rendered as a status code and `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Queue domain error.
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// Favorites domain error.
    #[error(transparent)]
    Favorites(#[from] FavoritesError),
    /// Malformed request.
    #[error("{0}")]
    BadRequest(String),
    /// Catalog call failed.
    #[error("upstream error")]
    Upstream(#[source] anyhow::Error),
    /// Anything else; details are logged, not returned.
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rej: JsonRejection) -> Self {
        AppError::BadRequest(rej.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rej: QueryRejection) -> Self {
        AppError::BadRequest(rej.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Queue(e) => match e {
                QueueError::NotFound | QueueError::NoStackedItems => StatusCode::NOT_FOUND,
                QueueError::InvalidInput | QueueError::InvalidStatus => StatusCode::BAD_REQUEST,
                QueueError::AlreadyExists | QueueError::ReadingInProgress => StatusCode::CONFLICT,
                QueueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Favorites(e) => match e {
                FavoritesError::NotFound => StatusCode::NOT_FOUND,
                FavoritesError::InvalidInput => StatusCode::BAD_REQUEST,
                FavoritesError::AlreadyExists => StatusCode::CONFLICT,
                FavoritesError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "request failed");
            "internal server error".to_string()
        } else {
            if let AppError::Upstream(e) = &self {
                tracing::warn!(error = %format!("{e:#}"), "books upstream failed");
            }
            self.to_string()
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
