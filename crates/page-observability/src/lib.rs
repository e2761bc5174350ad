//! Observability for the landing page runtime.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with session context
//! - `LogSink` - Console and in-memory destinations
//! - `EventTracker` - Fire-and-forget analytics events

mod logging;
mod sink;
mod tracker;

pub use logging::*;
pub use sink::*;
pub use tracker::*;
