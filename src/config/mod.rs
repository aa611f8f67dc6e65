//! Configuration Module - Environment-based Service Configuration
//!
//! The service is configured entirely from environment variables:
//! `PORT` selects the listen port (default 8080), `RUST_LOG` selects
//! the tracing verbosity and is consumed directly by the subscriber
//! in `main`. Parsing is isolated in a pure function so tests never
//! touch the process environment.

use anyhow::{Context, Result};

/// Default listen port when `PORT` is unset or empty.
const DEFAULT_PORT: &str = "8080";

/// Runtime configuration for the greeter service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the HTTP listener binds to and the self-pinger targets.
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_port_value(std::env::var("PORT").ok())
    }

    /// Parse a raw `PORT` value, falling back to the default when the
    /// variable is unset or set to an empty string.
    fn from_port_value(raw: Option<String>) -> Result<Self> {
        let raw = match raw {
            Some(value) if !value.is_empty() => value,
            _ => DEFAULT_PORT.to_string(),
        };

        let port: u16 = raw
            .parse()
            .with_context(|| format!("Invalid PORT value: {raw:?}"))?;

        Ok(Self { port })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Base URL the self-pinger issues requests against.
    pub fn base_url(&self) -> String {
        format!("http://0.0.0.0:{}", self.port)
    }
}
