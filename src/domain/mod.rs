//! Domain layer - Core greeting logic.
//!
//! The greeting table is the only domain object: a fixed language-code
//! to greeting-text mapping, built once at startup and read-only for
//! the lifetime of the process. No external dependencies here.

pub mod greetings;

pub use greetings::GreetingTable;
