//! Metrics Adapters
//!
//! Prometheus counter registry exposed on the service's own `/metrics`
//! route. The registry is an explicitly owned object injected into the
//! HTTP state and the self-pinger, never a process-wide singleton.

pub mod prometheus;

pub use prometheus::{MetricsRegistry, PingOutcome};
