//! Hero title sizing on narrow windows.

use page_core::{Debouncer, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

const MOBILE_TITLE_SIZE: &str = "2.2rem";

/// Font size override for the hero title at `width`, if any.
pub fn title_font_size(width: f64, breakpoint: f64) -> Option<&'static str> {
    (width < breakpoint).then_some(MOBILE_TITLE_SIZE)
}

/// Shrinks the hero title once resizing settles below the breakpoint.
pub struct ResponsiveTitle {
    selector: String,
    breakpoint: f64,
    debouncer: Debouncer,
}

impl ResponsiveTitle {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            selector: config.selectors.hero_title.clone(),
            breakpoint: config.timing.mobile_breakpoint_px,
            debouncer: Debouncer::new(config.timing.resize_debounce_ms),
        }
    }
}

impl Component for ResponsiveTitle {
    fn name(&self) -> &'static str {
        "responsive-title"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if *event != PageEvent::Resize {
            return;
        }
        let timer = cx.schedule(self.debouncer.wait(), Task::ApplyResize);
        if let Some(previous) = self.debouncer.rearm(timer) {
            cx.cancel(previous);
        }
    }

    fn handle_task(&mut self, task: Task, timer: TimerId, cx: &mut Cx<'_>) {
        if task != Task::ApplyResize || !self.debouncer.settle(timer) {
            return;
        }
        let Some(title) = cx.select_all(&self.selector).first().copied() else {
            return;
        };
        match title_font_size(cx.dom.viewport().width, self.breakpoint) {
            Some(size) => cx.dom.set_style(title, "font-size", size),
            None => cx.dom.clear_style(title, "font-size"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::mounted;
    use page_core::{Dom, ElementId, VirtualDocument};

    fn hero() -> (VirtualDocument, ElementId) {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let section = doc.element(body, "section", "hero");
        let title = doc.element(section, "h1", "hero-title");
        (doc, title)
    }

    #[test]
    fn test_breakpoint_is_exclusive() {
        assert_eq!(title_font_size(767.0, 768.0), Some("2.2rem"));
        assert_eq!(title_font_size(768.0, 768.0), None);
    }

    #[test]
    fn test_resize_burst_applies_once_settled() {
        let (doc, title) = hero();
        let (mut page, _) = mounted(doc, ResponsiveTitle::new(&PageConfig::default()));

        page.dom_mut().set_window_width(1200.0);
        page.dispatch(PageEvent::Resize);
        page.advance_by(100);
        page.dom_mut().set_window_width(375.0);
        page.dispatch(PageEvent::Resize);
        page.advance_by(200);
        assert_eq!(page.dom().style(title, "font-size"), None);

        page.advance_by(50);
        assert_eq!(page.dom().style(title, "font-size").as_deref(), Some("2.2rem"));
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_widening_clears_override() {
        let (doc, title) = hero();
        let (mut page, _) = mounted(doc, ResponsiveTitle::new(&PageConfig::default()));

        page.dom_mut().set_window_width(375.0);
        page.dispatch(PageEvent::Resize);
        page.advance_by(250);
        page.dom_mut().set_window_width(1024.0);
        page.dispatch(PageEvent::Resize);
        page.advance_by(250);

        assert_eq!(page.dom().style(title, "font-size"), None);
    }
}
