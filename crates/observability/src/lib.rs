//! # tresen-observability
//!
//! Structured Logging via tracing-subscriber, als Text oder JSON.

pub mod logging;

pub use logging::{logging_initialisieren, LogAusgabe};
