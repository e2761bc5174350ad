//! Core abstractions for the landing page runtime.
//!
//! This crate provides the fundamental types and traits:
//! - `Dom` - Document interface components are written against
//! - `VirtualDocument` - In-memory document for native runs and tests
//! - `PageEvent` - Input and lifecycle events
//! - `TimerQueue` / `Debouncer` - Timers driven by an external clock
//! - `Observer` - One-shot viewport intersection
//! - `KeyValueStore` - Durable string slots
//! - `HandleTable` - Element handles for host documents

mod document;
mod dom;
mod error;
mod event;
mod handles;
mod observer;
pub mod selector;
mod storage;
mod timer;

pub use document::*;
pub use dom::*;
pub use error::*;
pub use event::*;
pub use handles::*;
pub use observer::*;
pub use storage::*;
pub use timer::*;
