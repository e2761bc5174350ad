//! Log output destinations.

use std::cell::RefCell;
use std::rc::Rc;

use crate::LogEntry;
#[cfg(target_arch = "wasm32")]
use crate::LogLevel;

/// Destination for rendered log entries.
pub trait LogSink {
    fn write(&self, entry: &LogEntry, rendered: &str);
}

/// Browser console on wasm32, stderr elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    #[cfg(target_arch = "wasm32")]
    fn write(&self, entry: &LogEntry, rendered: &str) {
        let line = wasm_bindgen::JsValue::from_str(rendered);
        match entry.level {
            LogLevel::Error => web_sys::console::error_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&line),
            LogLevel::Info => web_sys::console::log_1(&line),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write(&self, _entry: &LogEntry, rendered: &str) {
        eprintln!("{}", rendered);
    }
}

/// Shared in-memory buffer of entries. Clones see the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Entries written by the event tracker for `event`.
    pub fn tracked(&self, event: &str) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.field_str("event") == Some(event))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry, _rendered: &str) {
        self.entries.borrow_mut().push(entry.clone());
    }
}
