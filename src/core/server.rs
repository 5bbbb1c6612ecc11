//! HTTP surface for the Pokédex service.
//!
//! ## Endpoints
//! - `GET /health` - liveness
//! - `GET /pokemon` - all records, ascending by id
//! - `GET /pokemon/:id` - one record or 404
//! - `GET /pokemon/generation/:n` - records in a generation (empty if unknown)
//! - `GET /pokemon/search?name=&type=` - substring search, 400 if both blank
//! - `GET /ability?url=` - English ability description, 400 if blank, 404 if unresolved

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use super::dex::{DexError, DexService};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AbilityParams {
    pub url: Option<String>,
}

/// Build the router over a shared service.
pub fn router(service: Arc<DexService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/pokemon", get(list_all))
        .route("/pokemon/search", get(search))
        .route("/pokemon/generation/:number", get(list_by_generation))
        .route("/pokemon/:id", get(get_by_id))
        .route("/ability", get(describe_ability))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(service)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, service: Arc<DexService>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Pokédex service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

// ============================================================================
// HTTP Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_all(State(service): State<Arc<DexService>>) -> Response {
    match service.list_all().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_by_id(State(service): State<Arc<DexService>>, Path(id): Path<u32>) -> Response {
    match service.get_by_id(id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found(format!("No pokemon with id {id}")),
        Err(e) => error_response(e),
    }
}

async fn list_by_generation(
    State(service): State<Arc<DexService>>,
    Path(number): Path<u32>,
) -> Response {
    // out-of-range numbers are just unknown generations
    let number = u8::try_from(number).unwrap_or(0);
    match service.list_by_generation(number).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

async fn search(
    State(service): State<Arc<DexService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match service
        .search(params.name.as_deref(), params.category.as_deref())
        .await
    {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

async fn describe_ability(
    State(service): State<Arc<DexService>>,
    Query(params): Query<AbilityParams>,
) -> Response {
    let url = params.url.unwrap_or_default();
    match service.describe_ability(&url).await {
        Ok(Some(description)) => Json(description).into_response(),
        Ok(None) => not_found(format!("No English description for ability at {url}")),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Error bodies
// ============================================================================

fn error_body(status: StatusCode, message: String, kind: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": {
                "message": message,
                "type": kind
            }
        })),
    )
        .into_response()
}

fn not_found(message: String) -> Response {
    error_body(StatusCode::NOT_FOUND, message, "not_found")
}

fn error_response(error: DexError) -> Response {
    match error {
        DexError::InvalidInput(message) => {
            error_body(StatusCode::BAD_REQUEST, message, "invalid_request_error")
        }
        DexError::Load(e) => {
            log::error!("Request failed, dataset unavailable: {}", e);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
                "dataset_unavailable",
            )
        }
    }
}
