//! Use Cases Layer - Background Tasks
//!
//! The self-pinger is the only long-running task beyond the listener
//! itself: it generates synthetic traffic against the service's own
//! endpoint and records the outcomes.

pub mod self_pinger;

pub use self_pinger::SelfPinger;
