//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, Request, header::CONTENT_TYPE},
    routing::{delete, get},
};
use envform_config::EnvStore;
use envform_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::env::{get_env, post_env};
use crate::http::fields::{get_field, list_fields};
use crate::http::filesystem::list_directories;
use crate::http::filter::{delete_filter_entry, edit_filter, get_filter};
use crate::http::health::{health, metrics};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the configuration editing API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the API around a configuration store and metrics registry.
    #[must_use]
    pub fn new(store: Arc<dyn EnvStore>, telemetry: Metrics) -> Self {
        let state = Arc::new(ApiState::new(store, telemetry.clone()));
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        // Ids are assigned before propagation so generated ones reach the response.
        let layered = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Self::routes()
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/env", get(get_env).post(post_env))
            .route("/ls", get(list_directories))
            .route("/filter", get(get_filter).post(edit_filter))
            .route("/filter/{index}", delete(delete_filter_entry))
            .route("/fields", get(list_fields))
            .route("/fields/{key}", get(get_field))
    }

    /// Serve the API using the configured router on the supplied address.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        tracing::info!("Starting API on {}", addr);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::MemoryStore;
    use crate::models::ProblemDetails;
    use anyhow::Result;
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use envform_config::EnvFileStore;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn send(server: &ApiServer, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
        let response = server.router().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, bytes.to_vec()))
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?)
    }

    #[tokio::test]
    async fn env_round_trips_through_file_store() -> Result<()> {
        let temp = TempDir::new()?;
        let store = Arc::new(EnvFileStore::new(temp.path().join(".env")));
        let server = ApiServer::new(store, Metrics::new()?);

        let body = r#"{"TARGET_DIR": "/data", "FILTER": "a=b"}"#;
        let (status, bytes) = send(&server, json_request(Method::POST, "/env", body)?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&bytes)?, json!({"success": true}));

        let request = Request::builder().uri("/env").body(Body::empty())?;
        let (status, bytes) = send(&server, request).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&bytes)?,
            serde_json::from_str::<Value>(body)?
        );
        assert_eq!(
            std::fs::read_to_string(temp.path().join(".env"))?,
            "TARGET_DIR=/data\nFILTER=a=b"
        );
        Ok(())
    }

    #[tokio::test]
    async fn env_keys_that_would_not_reparse_are_unprocessable() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join(".env");
        let store = Arc::new(EnvFileStore::new(path.clone()));
        let server = ApiServer::new(store, Metrics::new()?);

        for body in [
            r#"{"A=B": "x"}"#,
            r#"{"LINE\nBREAK": "x"}"#,
            r#"{"": "x"}"#,
            r#"{" PADDED": "x"}"#,
        ] {
            let (status, _) = send(&server, json_request(Method::POST, "/env", body)?).await?;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body}");
        }
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn field_route_looks_up_catalog_entries() -> Result<()> {
        let server = ApiServer::new(Arc::new(MemoryStore::default()), Metrics::new()?);

        let request = Request::builder().uri("/fields/BACKUP_CRON").body(Body::empty())?;
        let (status, bytes) = send(&server, request).await?;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["kind"], json!("cron"));
        assert_eq!(body["valid"], json!(true));

        let request = Request::builder().uri("/fields/UNKNOWN").body(Body::empty())?;
        let (status, bytes) = send(&server, request).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let problem: ProblemDetails = serde_json::from_slice(&bytes)?;
        assert_eq!(problem.status, 404);
        Ok(())
    }

    #[tokio::test]
    async fn filter_routes_edit_and_delete() -> Result<()> {
        let server = ApiServer::new(Arc::new(MemoryStore::default()), Metrics::new()?);

        let edit = r#"{"index": 0, "value": "^tmp/"}"#;
        let (status, bytes) = send(&server, json_request(Method::POST, "/filter", edit)?).await?;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["entries"], json!(["^tmp/"]));
        assert_eq!(body["outcome"], json!({"kind": "separator_kept"}));

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/filter/0")
            .body(Body::empty())?;
        let (status, bytes) = send(&server, request).await?;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["entries"], json!([]));
        assert_eq!(body["display_entries"], json!([""]));
        Ok(())
    }

    #[tokio::test]
    async fn missing_ls_path_is_problem_document() -> Result<()> {
        let server = ApiServer::new(Arc::new(MemoryStore::default()), Metrics::new()?);
        let request = Request::builder().uri("/ls").body(Body::empty())?;
        let (status, bytes) = send(&server, request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let problem: ProblemDetails = serde_json::from_slice(&bytes)?;
        assert_eq!(problem.status, 400);
        assert_eq!(problem.detail.as_deref(), Some("path parameter is required"));
        Ok(())
    }

    #[tokio::test]
    async fn generated_request_id_is_returned() -> Result<()> {
        let server = ApiServer::new(Arc::new(MemoryStore::default()), Metrics::new()?);
        let request = Request::builder().uri("/filter").body(Body::empty())?;
        let response = server.router().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(HEADER_REQUEST_ID));
        Ok(())
    }

    #[tokio::test]
    async fn responses_carry_request_id_and_are_counted() -> Result<()> {
        let telemetry = Metrics::new()?;
        let server = ApiServer::new(Arc::new(MemoryStore::default()), telemetry.clone());
        let request = Request::builder()
            .uri("/health")
            .header(HEADER_REQUEST_ID, "req-42")
            .body(Body::empty())?;
        let response = server.router().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(HEADER_REQUEST_ID)
                .and_then(|value| value.to_str().ok()),
            Some("req-42")
        );
        assert!(telemetry.render()?.contains(r#"route="/health""#));
        Ok(())
    }
}
