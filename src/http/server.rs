//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router and middleware stack (tracing, timeout,
//!   request ID)
//! - Marshal queries and responses as JSON
//! - Map query errors to HTTP statuses
//!
//! # Design Decisions
//! - The transport is a thin marshaling shell; all query semantics live in
//!   the discovery core
//! - NotFound and InvalidFilter are the only error statuses; an empty result
//!   is a 200 (cache-valid signal)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::discovery::types::{ListRequest, ListResponse};
use crate::discovery::{Provider, QueryError};
use crate::lifecycle;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<Provider>,
}

/// UUID v4 request ids for the x-request-id header.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP server for the discovery daemon.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ServerConfig, provider: Arc<Provider>) -> Self {
        let state = AppState { provider };
        let router = Router::new()
            .route("/v1/resources", post(list_resources))
            .route("/healthz", get(healthz))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.request_timeout_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            );
        Self { router }
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(lifecycle::wait_for_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Serve a resource query.
async fn list_resources(
    State(state): State<AppState>,
    Json(request): Json<ListRequest>,
) -> Result<Json<ListResponse>, QueryRejection> {
    let started = Instant::now();
    let kind = if request.resource_path.is_some() {
        "scoped"
    } else {
        "aggregate"
    };

    match state.provider.list_resources(&request) {
        Ok(response) => {
            metrics::record_query(kind, "ok", started);
            Ok(Json(response))
        }
        Err(error) => {
            metrics::record_query(kind, status_label(&error), started);
            tracing::debug!(%error, "Query rejected");
            Err(QueryRejection(error))
        }
    }
}

fn status_label(error: &QueryError) -> &'static str {
    match error {
        QueryError::NotFound { .. } => "not_found",
        QueryError::InvalidFilter { .. } => "invalid_filter",
    }
}

/// Maps query errors onto transport statuses.
struct QueryRejection(QueryError);

impl IntoResponse for QueryRejection {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QueryError::NotFound { .. } => StatusCode::NOT_FOUND,
            QueryError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
        };
        (status, self.0.to_string()).into_response()
    }
}
