//! Greeting HTTP Server - Router and Handlers
//!
//! A catch-all route treats the request path (leading slash stripped)
//! as a language code: known codes get 200 with the greeting text,
//! unknown codes get 400 with an empty body. `/metrics` serves the
//! Prometheus exposition. Only the greeting route passes through the
//! request-counting middleware; `/metrics` scrapes do not count
//! themselves.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::{error, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::GreetingTable;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Immutable language-code lookup table.
    pub greetings: Arc<GreetingTable>,
    /// Counter registry shared with the self-pinger.
    pub metrics: Arc<MetricsRegistry>,
}

/// Build the service router.
///
/// The counting layer is added before the `/metrics` route so scrape
/// traffic bypasses it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(greet)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_requests,
        ))
        .route("/metrics", get(serve_metrics))
        .with_state(state)
}

/// Greeting handler: look up the path remainder as a language code.
async fn greet(State(state): State<AppState>, uri: Uri) -> Response {
    let lang = uri.path().trim_start_matches('/');

    match state.greetings.lookup(lang) {
        Some(greeting) => {
            (StatusCode::OK, greeting.to_owned()).into_response()
        }
        None => {
            warn!(lang, "unknown language");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Middleware counting every completed request by (status, method).
async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    state.metrics.observe_request(response.status(), &method);
    response
}

/// Serve the text-format metrics exposition.
async fn serve_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
