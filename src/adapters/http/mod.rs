//! HTTP Adapters
//!
//! Axum router wiring the greeting handler, the request-counting
//! middleware, and the metrics scrape route into one listener.

pub mod server;

pub use server::{AppState, router};
