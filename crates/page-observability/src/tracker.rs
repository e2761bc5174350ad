//! Analytics event tracking.
//!
//! Events are written to the log as Info entries named `Event: {name}`.
//! There is no batching, retry or delivery guarantee; the console is the
//! integration point for an analytics snippet.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{LogLevel, StructuredLogger};

/// Fire-and-forget event tracker.
#[derive(Debug, Clone)]
pub struct EventTracker {
    logger: StructuredLogger,
}

impl EventTracker {
    pub fn new(logger: StructuredLogger) -> Self {
        Self { logger }
    }

    /// Record a named event with a JSON payload.
    ///
    /// Object payloads are flattened into the entry's fields; any other
    /// payload is stored under `data`. The `event` field always holds `name`;
    /// a payload's own `event` key is kept as `data_event`.
    pub fn track(&self, name: &str, data: Value) {
        let mut fields = BTreeMap::new();
        match data {
            Value::Object(mut map) => {
                if let Some(own) = map.remove("event") {
                    map.insert("data_event".to_string(), own);
                }
                fields.extend(map);
            }
            Value::Null => {}
            other => {
                fields.insert("data".to_string(), other);
            }
        }
        fields.insert("event".to_string(), Value::String(name.to_string()));
        tracing::trace!(event = name, "tracked");
        self.logger
            .log_with_fields(LogLevel::Info, &format!("Event: {}", name), fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemorySink, SessionId};
    use serde_json::json;
    use std::rc::Rc;

    fn tracker() -> (EventTracker, MemorySink) {
        let sink = MemorySink::new();
        let logger = StructuredLogger::new(SessionId::from_string("pv-test"))
            .with_sink(Rc::new(sink.clone()));
        (EventTracker::new(logger), sink)
    }

    #[test]
    fn test_object_payload_is_flattened() {
        let (tracker, sink) = tracker();
        tracker.track("cta_click", json!({"button_text": "주문", "section": "main_cta"}));

        let events = sink.tracked("cta_click");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "Event: cta_click");
        assert_eq!(events[0].field_str("section"), Some("main_cta"));
    }

    #[test]
    fn test_scalar_and_empty_payloads() {
        let (tracker, sink) = tracker();
        tracker.track("ping", json!(3));
        tracker.track("pong", Value::Null);

        assert_eq!(sink.tracked("ping")[0].fields["data"], json!(3));
        assert_eq!(sink.tracked("pong")[0].fields.len(), 1);
    }

    #[test]
    fn test_event_name_wins_over_payload_key() {
        let (tracker, sink) = tracker();
        tracker.track("fab_click", json!({"event": "hover", "section": "fab"}));

        let events = sink.tracked("fab_click");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].field_str("event"), Some("fab_click"));
        assert_eq!(events[0].field_str("data_event"), Some("hover"));
        assert_eq!(events[0].field_str("section"), Some("fab"));
    }
}
