//! Toast notifications.

use serde::{Deserialize, Serialize};

use page_core::{Dom, ElementId, Millis};

use crate::config::TimingConfig;

/// Toast flavour; selects the class suffix and background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    /// Parse a kind name. Unknown names fall back to `Info`.
    pub fn parse(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Self::Info => "#2196F3",
            Self::Success => "#4CAF50",
            Self::Error => "#F76560",
        }
    }
}

/// Where a toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Attached but still off-screen.
    Entering,
    Shown,
    /// Sliding back out.
    Leaving,
    Removed,
}

impl ToastPhase {
    /// Phase of a toast `elapsed` milliseconds after it was shown.
    pub fn at(elapsed: Millis, timing: &ToastTiming) -> Self {
        if elapsed < timing.enter_delay {
            Self::Entering
        } else if elapsed < timing.hold {
            Self::Shown
        } else if elapsed < timing.hold.saturating_add(timing.exit) {
            Self::Leaving
        } else {
            Self::Removed
        }
    }
}

/// Toast phase boundaries, relative to when the toast is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    pub enter_delay: Millis,
    /// Time at which the toast starts leaving.
    pub hold: Millis,
    pub exit: Millis,
}

impl ToastTiming {
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            enter_delay: timing.toast_enter_delay_ms,
            hold: timing.toast_hold_ms,
            exit: timing.toast_exit_ms,
        }
    }

    /// Offsets at which the phase changes.
    pub fn checkpoints(&self) -> [Millis; 3] {
        [self.enter_delay, self.hold, self.hold.saturating_add(self.exit)]
    }
}

const HIDDEN: &str = "translateX(400px)";

/// Creates toasts and moves them through their phases.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    timing: ToastTiming,
    active: Vec<(ElementId, Millis)>,
}

impl NotificationCenter {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            timing: ToastTiming::from_config(timing),
            active: Vec::new(),
        }
    }

    pub fn timing(&self) -> ToastTiming {
        self.timing
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Attach a toast to the body, off-screen.
    pub fn show(
        &mut self,
        dom: &mut dyn Dom,
        now: Millis,
        message: &str,
        kind: NotificationKind,
    ) -> ElementId {
        let toast = dom.create_element("div");
        dom.add_class(toast, "notification");
        dom.add_class(toast, &format!("notification-{}", kind.as_str()));
        dom.set_text(toast, message);
        for (property, value) in [
            ("position", "fixed"),
            ("top", "20px"),
            ("right", "20px"),
            ("background", kind.background()),
            ("color", "white"),
            ("padding", "16px 24px"),
            ("border-radius", "8px"),
            ("box-shadow", "0 4px 12px rgba(0,0,0,0.3)"),
            ("z-index", "10000"),
            ("transform", HIDDEN),
            ("transition", "transform 0.3s ease"),
            ("font-weight", "700"),
        ] {
            dom.set_style(toast, property, value);
        }
        let body = dom.body();
        dom.append_child(body, toast);
        self.active.push((toast, now));
        toast
    }

    /// Bring `toast` to the phase it should be in at `now`.
    pub fn apply(&mut self, dom: &mut dyn Dom, toast: ElementId, now: Millis) {
        let Some(index) = self.active.iter().position(|(el, _)| *el == toast) else {
            return;
        };
        let shown_at = self.active[index].1;
        match ToastPhase::at(now.saturating_sub(shown_at), &self.timing) {
            ToastPhase::Entering => {}
            ToastPhase::Shown => dom.set_style(toast, "transform", "translateX(0)"),
            ToastPhase::Leaving => dom.set_style(toast, "transform", HIDDEN),
            ToastPhase::Removed => {
                if dom.is_connected(toast) {
                    dom.remove(toast);
                }
                self.active.swap_remove(index);
            }
        }
    }

    /// Detach every toast.
    pub fn clear(&mut self, dom: &mut dyn Dom) {
        for (toast, _) in self.active.drain(..) {
            dom.remove(toast);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_core::VirtualDocument;

    fn timing() -> ToastTiming {
        ToastTiming::from_config(&TimingConfig::default())
    }

    #[test]
    fn test_phase_boundaries() {
        let t = timing();
        assert_eq!(ToastPhase::at(0, &t), ToastPhase::Entering);
        assert_eq!(ToastPhase::at(99, &t), ToastPhase::Entering);
        assert_eq!(ToastPhase::at(100, &t), ToastPhase::Shown);
        assert_eq!(ToastPhase::at(2999, &t), ToastPhase::Shown);
        assert_eq!(ToastPhase::at(3000, &t), ToastPhase::Leaving);
        assert_eq!(ToastPhase::at(3300, &t), ToastPhase::Removed);
        assert_eq!(t.checkpoints(), [100, 3000, 3300]);
    }

    #[test]
    fn test_toast_lifecycle() {
        let mut doc = VirtualDocument::new();
        let mut center = NotificationCenter::new(&TimingConfig::default());
        let toast = center.show(&mut doc, 1000, "hello", NotificationKind::Success);

        assert!(doc.has_class(toast, "notification-success"));
        assert_eq!(doc.style(toast, "background").as_deref(), Some("#4CAF50"));
        assert_eq!(doc.style(toast, "transform").as_deref(), Some(HIDDEN));

        center.apply(&mut doc, toast, 1100);
        assert_eq!(doc.style(toast, "transform").as_deref(), Some("translateX(0)"));
        center.apply(&mut doc, toast, 4000);
        assert_eq!(doc.style(toast, "transform").as_deref(), Some(HIDDEN));
        assert!(doc.is_connected(toast));
        center.apply(&mut doc, toast, 4300);
        assert!(!doc.is_connected(toast));
        assert_eq!(center.active_count(), 0);
    }

    #[test]
    fn test_removal_tolerates_detached_toast() {
        let mut doc = VirtualDocument::new();
        let mut center = NotificationCenter::new(&TimingConfig::default());
        let toast = center.show(&mut doc, 0, "bye", NotificationKind::Info);
        doc.remove(toast);
        center.apply(&mut doc, toast, 5000);
        assert_eq!(center.active_count(), 0);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(NotificationKind::parse("error"), NotificationKind::Error);
        assert_eq!(NotificationKind::parse("warning"), NotificationKind::Info);
    }
}
