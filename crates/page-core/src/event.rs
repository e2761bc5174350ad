//! Page events delivered to components.

use crate::ElementId;

/// Normalized keyboard key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }

    /// Keys that activate a focused control.
    pub fn is_activation(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// An input or lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The document finished parsing.
    Ready,
    /// All resources finished loading.
    Load { elapsed_ms: u64 },
    Click { target: ElementId },
    KeyDown { target: Option<ElementId>, key: Key },
    Scroll,
    Resize,
    /// Elements were shown or hidden without scrolling.
    LayoutChanged,
    MouseEnter { target: ElementId },
    MouseLeave { target: ElementId },
    TouchStart { target: ElementId },
    TouchEnd { target: ElementId },
    ImageLoaded { target: ElementId },
    ImageFailed { target: ElementId },
}

impl PageEvent {
    /// Element the event was dispatched to, if any.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            PageEvent::Click { target }
            | PageEvent::MouseEnter { target }
            | PageEvent::MouseLeave { target }
            | PageEvent::TouchStart { target }
            | PageEvent::TouchEnd { target }
            | PageEvent::ImageLoaded { target }
            | PageEvent::ImageFailed { target } => Some(*target),
            PageEvent::KeyDown { target, .. } => *target,
            PageEvent::Ready
            | PageEvent::Load { .. }
            | PageEvent::Scroll
            | PageEvent::Resize
            | PageEvent::LayoutChanged => None,
        }
    }
}

/// Result of dispatching an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// A handler asked to suppress the browser's default action.
    pub default_prevented: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Other("a".into()));
        assert!(Key::Enter.is_activation());
        assert!(!Key::Escape.is_activation());
    }

    #[test]
    fn test_event_target() {
        let el = ElementId(3);
        assert_eq!(PageEvent::Click { target: el }.target(), Some(el));
        assert_eq!(PageEvent::Scroll.target(), None);
    }
}
