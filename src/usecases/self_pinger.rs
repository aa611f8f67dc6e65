//! Self-Pinger - Synthetic Traffic Loop
//!
//! Sleeps a random jittered interval, picks a random language code,
//! issues a GET against the service's own base URL, and records the
//! outcome in the response counter. Runs from startup until shutdown
//! is signalled; individual failures are logged and counted, never
//! fatal.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::adapters::metrics::{MetricsRegistry, PingOutcome};

/// Background task generating load against the service's own endpoint.
///
/// The RNG is injected so tests can seed a [`rand::rngs::StdRng`] and
/// get a reproducible interval/language sequence; production uses an
/// entropy-seeded one. The jitter ceiling is a parameter for the same
/// reason.
pub struct SelfPinger<R: Rng> {
    /// Outbound HTTP client. Default timeout behavior, per reqwest.
    http: Client,
    /// Base URL of the service itself, e.g. `http://0.0.0.0:8080`.
    base_url: String,
    /// Language codes to draw from, uniformly.
    langs: Vec<String>,
    /// Counter registry shared with the HTTP server.
    metrics: Arc<MetricsRegistry>,
    /// Injected random source.
    rng: R,
    /// Upper bound (exclusive) of the pre-ping sleep.
    max_jitter: Duration,
}

impl<R: Rng + Send> SelfPinger<R> {
    /// Create a pinger over the given language set.
    pub fn new(
        base_url: String,
        langs: Vec<String>,
        metrics: Arc<MetricsRegistry>,
        rng: R,
        max_jitter: Duration,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            langs,
            metrics,
            rng,
            max_jitter,
        }
    }

    /// Draw the next sleep interval, uniform in `[0, max_jitter)`.
    pub fn next_delay(&mut self) -> Duration {
        self.max_jitter.mul_f64(self.rng.gen_range(0.0..1.0))
    }

    /// Draw the next language code, uniform over the whole key set.
    pub fn next_language(&mut self) -> String {
        self.langs[self.rng.gen_range(0..self.langs.len())].clone()
    }

    /// Run the ping loop until the shutdown channel fires.
    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        if self.langs.is_empty() {
            warn!("No languages configured — self-pinger idle");
            let _ = shutdown_rx.recv().await;
            return;
        }

        info!(
            base_url = %self.base_url,
            languages = self.langs.len(),
            "Self-pinger started"
        );

        loop {
            let delay = self.next_delay();
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    info!("Self-pinger received shutdown signal");
                    break;
                }
                _ = sleep(delay) => {
                    self.ping_once().await;
                }
            }
        }
    }

    /// Issue one self-ping and record its outcome.
    async fn ping_once(&mut self) {
        let lang = self.next_language();
        let url = format!("{}/{}", self.base_url, lang);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, %url, "Self-ping transport error");
                self.metrics.observe_ping(PingOutcome::Failure, "");
                return;
            }
        };

        let status = response.status();
        let status_label = status_label(status);
        let outcome = if status == reqwest::StatusCode::OK {
            PingOutcome::Success
        } else {
            // Codes are drawn from the known set, so a non-200 here
            // signals an internal inconsistency worth surfacing.
            PingOutcome::Failure
        };

        // A failed body read drops the attempt without counting it.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, %lang, "Failed to read self-ping body");
                return;
            }
        };

        self.metrics.observe_ping(outcome, &status_label);

        match outcome {
            PingOutcome::Success => {
                info!(%lang, body, "Self-ping succeeded");
            }
            PingOutcome::Failure => {
                warn!(%lang, body, status = %status_label, "Self-ping failed");
            }
        }
    }
}

/// Format a status the way the counter's dashboards expect: `"200 OK"`.
fn status_label(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
