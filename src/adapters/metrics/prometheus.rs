//! Prometheus Metrics Registry - Request/Response Counters
//!
//! Two counter families under the `app` namespace: inbound HTTP
//! requests labeled by status code and method, and self-ping outcomes
//! labeled by outcome kind and HTTP status string. Counter names,
//! label names, and help strings match the original deployment's
//! dashboards, so they are not free to change.

use anyhow::{Context, Result};
use axum::http::{Method, StatusCode};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome classification for a completed self-ping attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    /// The service answered with HTTP 200.
    Success,
    /// Transport error, or any non-200 response.
    Failure,
}

impl PingOutcome {
    /// Label value recorded in the response counter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Owned Prometheus registry holding both counter families.
///
/// Counters are atomic accumulators; concurrent increments from the
/// per-request tasks and the self-pinger never lose updates.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Inbound requests, labeled (code, method).
    http_requests: IntCounterVec,
    /// Self-ping outcomes, labeled (status = outcome kind, code = HTTP status).
    ping_responses: IntCounterVec,
}

impl MetricsRegistry {
    /// Create and register both counter families.
    ///
    /// The common label combinations are pre-declared at zero so both
    /// family names appear in a scrape before any traffic has flowed.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "count http responses")
                .namespace("app"),
            &["code", "method"],
        )?;

        let ping_responses = IntCounterVec::new(
            Opts::new("http_response_total", "count http requests")
                .namespace("app"),
            &["status", "code"],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(ping_responses.clone()))?;

        // Pre-declare the label combinations every run produces.
        http_requests.with_label_values(&["200", "get"]);
        http_requests.with_label_values(&["400", "get"]);
        ping_responses.with_label_values(&["success", "200 OK"]);
        ping_responses.with_label_values(&["failure", ""]);

        Ok(Self {
            registry,
            http_requests,
            ping_responses,
        })
    }

    /// Count one completed inbound request.
    pub fn observe_request(&self, status: StatusCode, method: &Method) {
        self.http_requests
            .with_label_values(&[
                status.as_str(),
                &method.as_str().to_ascii_lowercase(),
            ])
            .inc();
    }

    /// Count one completed self-ping attempt.
    ///
    /// `status_label` is the HTTP status string (`"200 OK"` form), or
    /// empty when no response was received.
    pub fn observe_ping(&self, outcome: PingOutcome, status_label: &str) {
        self.ping_responses
            .with_label_values(&[outcome.as_str(), status_label])
            .inc();
    }

    /// Serialize all counters in the text exposition format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output was not UTF-8")
    }

    /// Current value of a request counter bucket, for tests and probes.
    pub fn request_count(&self, code: &str, method: &str) -> u64 {
        self.http_requests.with_label_values(&[code, method]).get()
    }

    /// Current value of a response counter bucket, for tests and probes.
    pub fn ping_count(&self, outcome: PingOutcome, status_label: &str) -> u64 {
        self.ping_responses
            .with_label_values(&[outcome.as_str(), status_label])
            .get()
    }
}
