use std::sync::Arc;
use axum::{routing::post, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::interface::QueryInterface;

#[derive(Deserialize)]
pub struct QueryRequest {
    pub term: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub id: u64,
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human readable rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Rendering that evaluates back to the same value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn router(interface: Arc<QueryInterface>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/query", post(move |Json(req): Json<QueryRequest>| {
        let iface = Arc::clone(&interface);
        async move {
            // the interpreter is synchronous, keep it off the async workers
            let term = req.term;
            let result = tokio::task::spawn_blocking(move || iface.run(&term)).await.map_err(|e| {
                warn!(error=%e, "Join error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
            })?;
            match result {
                Ok(outcome) => {
                    let elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0;
                    info!(id=outcome.id.0, ms=elapsed_ms, kind=%outcome.value.kind(), "query complete");
                    let body = QueryResponse {
                        id: outcome.id.0,
                        status: "ok".into(),
                        elapsed_ms,
                        kind: Some(outcome.value.kind().name().into()),
                        value: Some(outcome.value.to_string()),
                        term: Some(outcome.value.to_term()),
                        error: None,
                    };
                    Ok::<_, (StatusCode, &'static str)>((StatusCode::OK, Json(body)))
                }
                Err(failure) => {
                    let elapsed_ms = failure.elapsed.as_secs_f64() * 1000.0;
                    let status = if failure.error.is_language_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR };
                    let msg = format!("{}", failure.error);
                    warn!(id=failure.id.0, %msg, code=%status.as_u16(), "query error");
                    let body = QueryResponse { id: failure.id.0, status: "error".into(), elapsed_ms, kind: None, value: None, term: None, error: Some(msg) };
                    Ok::<_, (StatusCode, &'static str)>((status, Json(body)))
                }
            }
        }
    }))
    .layer(cors)
}
