//! Adapters Layer - HTTP and Metrics Plumbing
//!
//! Everything that touches the outside world: the axum server and the
//! Prometheus registry. The domain layer never depends on anything in
//! here.

pub mod http;
pub mod metrics;
