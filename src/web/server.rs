//! Axum server exposing the report-builder API.
//!
//! Every error is recovered at this boundary: execution failures travel in
//! the response body as an inline message, store and export failures map to
//! status codes with a message payload. Nothing here can take the builder
//! session down.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OnceCell};
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::{SessionCatalog, TableSchema};
use crate::config::Settings;
use crate::exec::{DataSource, PreviewSession, QueryExecutor, Row};
use crate::export::{csv_filename, to_csv, ExportError};
use crate::presets::builtin_presets;
use crate::report::QuerySpec;
use crate::store::{QueryRepository, SavedQuery, SqliteQueryStore};

/// Application state shared across handlers.
pub struct AppState {
    pub catalog: SessionCatalog,
    pub source: Arc<dyn DataSource>,
    pub store: Mutex<SqliteQueryStore>,
    pub settings: Settings,
    preview: OnceCell<Arc<PreviewSession>>,
}

impl AppState {
    pub fn new(
        catalog: SessionCatalog,
        source: Arc<dyn DataSource>,
        store: SqliteQueryStore,
        settings: Settings,
    ) -> Self {
        Self {
            catalog,
            source,
            store: Mutex::new(store),
            settings,
            preview: OnceCell::new(),
        }
    }

    /// The session's preview pipeline, built on first use once the catalog
    /// is available.
    async fn preview(&self) -> Result<Arc<PreviewSession>, ApiError> {
        let session = self
            .preview
            .get_or_try_init(|| async {
                let catalog = self.catalog.load().await.map_err(ApiError::unavailable)?;
                let executor = QueryExecutor::new(catalog, Arc::clone(&self.source))
                    .with_row_cap(self.settings.preview.row_cap)
                    .with_timeout(std::time::Duration::from_secs(
                        self.settings.preview.timeout_seconds,
                    ));
                Ok::<_, ApiError>(Arc::new(PreviewSession::new(Arc::new(executor))))
            })
            .await?;
        Ok(Arc::clone(session))
    }
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unavailable(e: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: e.to_string(),
        }
    }

    fn bad_request(e: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }

    fn conflict(e: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: e.to_string(),
        }
    }

    fn internal(e: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Build the axum router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/schema", get(get_schema))
        .route("/api/query", post(run_query))
        .route("/api/queries", get(list_queries))
        .route("/api/queries", post(save_query))
        .route("/api/queries/{id}", get(load_query))
        .route("/api/queries/{id}", delete(delete_query))
        .route("/api/presets", get(list_presets))
        .route("/api/export/csv", post(export_csv))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn serve(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "report builder API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Serialize)]
struct SchemaResponse {
    tables: Vec<TableSchema>,
}

async fn get_schema(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let catalog = state.catalog.load().await.map_err(ApiError::unavailable)?;
    Ok(Json(SchemaResponse {
        tables: catalog.tables().to_vec(),
    }))
}

// ============================================================================
// Preview execution
// ============================================================================

/// Preview response. An execution failure arrives here as `error` with an
/// empty row set, never as a failing HTTP status.
#[derive(Debug, Serialize)]
struct QueryResponse {
    rows: Vec<Row>,
    row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn run_query(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<QuerySpec>,
) -> Result<impl IntoResponse, ApiError> {
    let preview = state.preview().await?;
    let applied = match preview.refresh(&spec).await {
        Some(applied) => applied,
        // A concurrent edit superseded this request; the caller gets what
        // is actually on display.
        None => preview.current().await,
    };
    Ok(Json(QueryResponse {
        row_count: applied.rows.len(),
        rows: applied.rows,
        error: applied.error,
    }))
}

// ============================================================================
// Saved queries
// ============================================================================

#[derive(Debug, Deserialize)]
struct SaveQueryRequest {
    name: String,
    spec: QuerySpec,
}

#[derive(Debug, Serialize)]
struct SavedQueryListResponse {
    queries: Vec<SavedQuery>,
}

async fn list_queries(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.lock().await;
    let queries = store.list().map_err(ApiError::internal)?;
    Ok(Json(SavedQueryListResponse { queries }))
}

async fn save_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveQueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("saved query name must not be empty"));
    }
    let store = state.store.lock().await;
    let saved = store.save(req.name.trim(), &req.spec).map_err(|e| match e {
        crate::store::StoreError::DuplicateName(_) => ApiError::conflict(e),
        other => ApiError::internal(other),
    })?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn load_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.lock().await;
    let saved = store
        .load(&id)
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("saved query not found"))?;
    Ok(Json(saved))
}

async fn delete_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.lock().await;
    let deleted = store.delete(&id).map_err(ApiError::internal)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("saved query not found"))
    }
}

// ============================================================================
// Presets and export
// ============================================================================

async fn list_presets() -> impl IntoResponse {
    Json(builtin_presets())
}

async fn export_csv(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<QuerySpec>,
) -> Result<impl IntoResponse, ApiError> {
    let catalog = state.catalog.load().await.map_err(ApiError::unavailable)?;
    let executor = QueryExecutor::new(catalog, Arc::clone(&state.source))
        .with_row_cap(state.settings.preview.row_cap)
        .with_timeout(std::time::Duration::from_secs(
            state.settings.preview.timeout_seconds,
        ));

    let rows = executor.execute(&spec).await.map_err(ApiError::bad_request)?;
    let body = to_csv(&spec.columns, &rows).map_err(|e| match e {
        ExportError::Empty => ApiError::bad_request(e),
        other => ApiError::internal(other),
    })?;

    let filename = csv_filename(&spec.table, chrono::Local::now().date_naive());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
