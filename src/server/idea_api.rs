//! HTTP API of the idea generator.
//!
//! - GET /api: stream one generated idea as `text/event-stream`
//! - GET /health: liveness and basic service info

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::server::streaming::completion_to_sse_stream;
use crate::upstream::client::CompletionSource;

/// Application state shared across handlers.
pub struct AppState {
    pub source: Arc<dyn CompletionSource>,
    pub config: Arc<Config>,
    pub start_time: Instant,
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", get(idea))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ─── Response Types ────────────────────────────────────────────────────────

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub model: String,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn idea(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let request_id = Uuid::new_v4().to_string();
    let model = &state.config.upstream.model;

    info!(
        request_id = request_id,
        model = model.as_str(),
        style = ?state.config.prompt.style,
        "Idea stream requested"
    );

    let messages = state.config.prompt.messages();
    let chunks = state.source.open(messages, model).await.map_err(|e| {
        error!(
            request_id = request_id,
            error = %e,
            "Failed to open upstream completion"
        );
        StatusCode::BAD_GATEWAY
    })?;

    // The response body terminates if the upstream errors mid-stream, and
    // dropping it (client disconnect) abandons the upstream completion.
    let body = Body::from_stream(completion_to_sse_stream(chunks));
    let mut response = Response::new(body);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model: state.config.upstream.model.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::http::Request;
    use futures::stream::{self, StreamExt};
    use tower::ServiceExt;

    use crate::upstream::chunk::{ChatMessage, CompletionChunk};
    use crate::upstream::client::ChunkStream;
    use crate::upstream::error::UpstreamError;

    /// Source that plays back a scripted chunk sequence once.
    struct ScriptedSource {
        items: Mutex<Option<Vec<Result<CompletionChunk, UpstreamError>>>>,
    }

    impl ScriptedSource {
        fn new(items: Vec<Result<CompletionChunk, UpstreamError>>) -> Self {
            Self {
                items: Mutex::new(Some(items)),
            }
        }
    }

    #[async_trait]
    impl CompletionSource for ScriptedSource {
        async fn open(
            &self,
            _messages: Vec<ChatMessage>,
            _model: &str,
        ) -> Result<ChunkStream, UpstreamError> {
            let items = self.items.lock().unwrap().take().unwrap();
            Ok(Box::pin(stream::iter(items)))
        }
    }

    /// Source whose open always fails.
    struct FailingSource;

    #[async_trait]
    impl CompletionSource for FailingSource {
        async fn open(
            &self,
            _messages: Vec<ChatMessage>,
            _model: &str,
        ) -> Result<ChunkStream, UpstreamError> {
            Err(UpstreamError::Api {
                status: 401,
                message: "invalid key".to_string(),
            })
        }
    }

    fn app_with(source: Arc<dyn CompletionSource>) -> Router {
        let state = Arc::new(AppState {
            source,
            config: Arc::new(Config::default()),
            start_time: Instant::now(),
        });
        build_router(state)
    }

    async fn body_frames(response: Response) -> Vec<Result<bytes::Bytes, axum::Error>> {
        response.into_body().into_data_stream().collect().await
    }

    #[tokio::test]
    async fn test_idea_streams_transcoded_events() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(CompletionChunk::new("Hello")),
            Ok(CompletionChunk::new(" world\n")),
        ]));
        let app = app_with(source);

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

        let mut wire = Vec::new();
        for frame in body_frames(response).await {
            wire.extend_from_slice(&frame.unwrap());
        }
        assert_eq!(
            std::str::from_utf8(&wire).unwrap(),
            "data: Hello\n\ndata:  world\ndata: \n\n"
        );
    }

    #[tokio::test]
    async fn test_idea_upstream_failure_maps_to_bad_gateway() {
        let app = app_with(Arc::new(FailingSource));

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_idea_mid_stream_error_truncates_body() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(CompletionChunk::new("one")),
            Err(UpstreamError::Stream("connection reset".to_string())),
        ]));
        let app = app_with(source);

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Headers already went out as 200; the failure surfaces in the body.
        assert_eq!(response.status(), StatusCode::OK);

        let frames = body_frames(response).await;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].as_ref().unwrap(), "data: one\n");
        assert_eq!(frames[1].as_ref().unwrap(), "\n");
        assert!(frames[2].is_err());
    }

    #[tokio::test]
    async fn test_idea_empty_completion_yields_empty_body() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let app = app_with(source);

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert!(body_frames(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = app_with(Arc::new(FailingSource));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let mut body = Vec::new();
        for frame in body_frames(response).await {
            body.extend_from_slice(&frame.unwrap());
        }
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["model"], "gpt-5-nano");
    }
}
