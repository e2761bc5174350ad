//! Interaction analytics: click tracking, scroll depth and load timing.

use serde_json::json;

use page_core::{Debouncer, Dom, PageEvent, TimerId, Viewport};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

/// Tracks clicks on CTAs, size options and community buttons.
pub struct ClickTracking {
    cta: String,
    size_option: String,
    community: String,
}

impl ClickTracking {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            cta: config.selectors.cta_button.clone(),
            size_option: config.selectors.size_option.clone(),
            community: config.selectors.community_button.clone(),
        }
    }
}

impl Component for ClickTracking {
    fn name(&self) -> &'static str {
        "click-tracking"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let PageEvent::Click { target } = event else {
            return;
        };

        if let Some(button) = cx.dom.closest(*target, &self.cta) {
            cx.track(
                "cta_click",
                json!({ "button_text": cx.dom.text(button), "section": "main_cta" }),
            );
        }

        if let Some(option) = cx.dom.closest(*target, &self.size_option) {
            let size = cx
                .dom
                .query_in(option, "strong")
                .map(|el| cx.dom.text(el))
                .unwrap_or_else(|| "unknown".to_string());
            cx.track(
                "size_selection",
                json!({ "size": size, "section": "product_options" }),
            );
        }

        if let Some(button) = cx.dom.closest(*target, &self.community) {
            cx.track(
                "social_click",
                json!({ "button_text": cx.dom.text(button), "section": "community" }),
            );
        }
    }
}

/// Reported scroll-depth milestones, in percent.
pub const MILESTONES: [u32; 4] = [25, 50, 75, 90];

/// Scroll depth in whole percent, clamped to `[0, 100]`.
pub fn scroll_depth_percent(viewport: &Viewport) -> u32 {
    (viewport.scroll_fraction() * 100.0).round() as u32
}

/// Highest milestone at or below `depth`.
pub fn milestone_for(depth: u32) -> Option<u32> {
    MILESTONES.iter().rev().copied().find(|m| depth >= *m)
}

/// Tracks how far down the page the visitor has scrolled.
///
/// Measurements are debounced. When the depth exceeds the previous maximum,
/// the milestone bucket holding the new maximum is reported unless it already
/// was during this page view.
pub struct ScrollDepthTracker {
    debouncer: Debouncer,
    max_depth: u32,
    reported: Vec<u32>,
}

impl ScrollDepthTracker {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.timing.scroll_depth_debounce_ms),
            max_depth: 0,
            reported: Vec::new(),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Record a depth, returning the milestone to report, if any.
    pub fn record(&mut self, depth: u32) -> Option<u32> {
        if depth <= self.max_depth {
            return None;
        }
        self.max_depth = depth;
        let milestone = milestone_for(depth)?;
        if self.reported.contains(&milestone) {
            return None;
        }
        self.reported.push(milestone);
        Some(milestone)
    }
}

impl Component for ScrollDepthTracker {
    fn name(&self) -> &'static str {
        "scroll-depth"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if *event != PageEvent::Scroll {
            return;
        }
        let timer = cx.schedule(self.debouncer.wait(), Task::MeasureScrollDepth);
        if let Some(previous) = self.debouncer.rearm(timer) {
            cx.cancel(previous);
        }
    }

    fn handle_task(&mut self, task: Task, timer: TimerId, cx: &mut Cx<'_>) {
        if task != Task::MeasureScrollDepth || !self.debouncer.settle(timer) {
            return;
        }
        let depth = scroll_depth_percent(&cx.dom.viewport());
        if let Some(milestone) = self.record(depth) {
            cx.track("scroll_depth", json!({ "depth": format!("{}%", milestone) }));
        }
    }
}

/// Logs the time to the window load event.
#[derive(Debug, Default)]
pub struct PerformanceReporter;

impl Component for PerformanceReporter {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if let PageEvent::Load { elapsed_ms } = event {
            cx.logger()
                .info_builder(format!("Page loaded in {}ms", elapsed_ms))
                .field_i64("load_ms", *elapsed_ms as i64)
                .emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::mounted;
    use page_core::{ElementId, VirtualDocument};

    #[test]
    fn test_milestone_buckets() {
        assert_eq!(milestone_for(24), None);
        assert_eq!(milestone_for(25), Some(25));
        assert_eq!(milestone_for(74), Some(50));
        assert_eq!(milestone_for(89), Some(75));
        assert_eq!(milestone_for(100), Some(90));
    }

    #[test]
    fn test_record_reports_each_milestone_once() {
        let mut tracker = ScrollDepthTracker::new(&PageConfig::default());
        assert_eq!(tracker.record(30), Some(25));
        assert_eq!(tracker.record(20), None);
        assert_eq!(tracker.record(40), None);
        assert_eq!(tracker.record(95), Some(90));
        assert_eq!(tracker.record(100), None);
        assert_eq!(tracker.max_depth(), 100);
    }

    #[test]
    fn test_jump_skips_intermediate_milestones() {
        let mut tracker = ScrollDepthTracker::new(&PageConfig::default());
        assert_eq!(tracker.record(80), Some(75));
        assert_eq!(tracker.record(85), None);
    }

    fn tall_document() -> VirtualDocument {
        let mut doc = VirtualDocument::new();
        doc.set_viewport(Viewport {
            scroll_y: 0.0,
            width: 1280.0,
            height: 1000.0,
            document_height: 5000.0,
        });
        doc
    }

    #[test]
    fn test_scroll_burst_measured_once_after_quiet_period() {
        let (mut page, sink) = mounted(tall_document(), ScrollDepthTracker::new(&PageConfig::default()));

        for y in [500.0, 1000.0, 2000.0] {
            page.dom_mut().set_scroll_y(y);
            page.dispatch(PageEvent::Scroll);
            page.advance_by(100);
        }
        assert!(sink.tracked("scroll_depth").is_empty());

        page.advance_by(400);
        let tracked = sink.tracked("scroll_depth");
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].field_str("depth"), Some("50%"));
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_click_tracking_payloads() {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let option = doc.element(body, "div", "size-option");
        let strong = doc.element(option, "strong", "");
        doc.set_text(strong, "L사이즈");
        let community = doc.element(body, "a", "community-button");
        doc.set_text(community, "인스타그램");
        let cta = doc.element(body, "a", "cta-button");
        doc.set_text(cta, "💛 S사이즈 주문하기 (13,900원)");
        let (mut page, sink) = mounted(doc, ClickTracking::new(&PageConfig::default()));

        for target in [strong, community, cta] {
            page.dispatch(PageEvent::Click { target });
        }

        let size = &sink.tracked("size_selection")[0];
        assert_eq!(size.field_str("size"), Some("L사이즈"));
        assert_eq!(size.field_str("section"), Some("product_options"));
        let social = &sink.tracked("social_click")[0];
        assert_eq!(social.field_str("button_text"), Some("인스타그램"));
        let cta_click = &sink.tracked("cta_click")[0];
        assert_eq!(cta_click.field_str("section"), Some("main_cta"));
        assert_eq!(
            cta_click.field_str("button_text"),
            Some("💛 S사이즈 주문하기 (13,900원)")
        );
    }

    #[test]
    fn test_size_option_without_label() {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let option: ElementId = doc.element(body, "div", "size-option");
        let (mut page, sink) = mounted(doc, ClickTracking::new(&PageConfig::default()));
        page.dispatch(PageEvent::Click { target: option });
        assert_eq!(sink.tracked("size_selection")[0].field_str("size"), Some("unknown"));
    }

    #[test]
    fn test_load_time_logged() {
        let (mut page, sink) = mounted(VirtualDocument::new(), PerformanceReporter);
        page.dispatch(PageEvent::Load { elapsed_ms: 412 });
        assert!(sink.messages().contains(&"Page loaded in 412ms".to_string()));
    }
}
