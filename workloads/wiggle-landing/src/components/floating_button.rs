//! Floating "order" button shown between the hero and the order section.

use serde_json::json;

use page_core::{Dom, ElementId, PageEvent, ScrollBehavior, ScrollBlock};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx};

pub const FAB_CLASS: &str = "floating-action-button";
const FAB_SELECTOR: &str = ".floating-action-button";
pub const FAB_LABEL: &str = "🛒 주문하기";

/// Whether the button should show at `scroll_y`: strictly past the hero and
/// strictly before the order section enters the window.
pub fn fab_visible(scroll_y: f64, hero_bottom: f64, cta_top: f64, viewport_height: f64) -> bool {
    scroll_y > hero_bottom && scroll_y < cta_top - viewport_height
}

pub struct FloatingOrderButton {
    hero: String,
    cta_section: String,
    fab: Option<ElementId>,
}

impl FloatingOrderButton {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            hero: config.selectors.hero.clone(),
            cta_section: config.selectors.cta_section.clone(),
            fab: None,
        }
    }

    pub fn button(&self) -> Option<ElementId> {
        self.fab
    }

    fn update(&self, fab: ElementId, cx: &mut Cx<'_>) {
        let (Some(hero), Some(cta)) = (cx.dom.query(&self.hero), cx.dom.query(&self.cta_section))
        else {
            return;
        };
        let viewport = cx.dom.viewport();
        let hero_bottom = cx.dom.offset_top(hero) + cx.dom.offset_height(hero);
        let visible = fab_visible(
            viewport.scroll_y,
            hero_bottom,
            cx.dom.offset_top(cta),
            viewport.height,
        );
        let (transform, opacity) = if visible {
            ("translateY(0)", "1")
        } else {
            ("translateY(100px)", "0")
        };
        cx.dom.set_style(fab, "transform", transform);
        cx.dom.set_style(fab, "opacity", opacity);
    }
}

impl Component for FloatingOrderButton {
    fn name(&self) -> &'static str {
        "floating-order-button"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        let fab = cx.dom.create_element("div");
        cx.dom.add_class(fab, FAB_CLASS);
        cx.dom.set_text(fab, FAB_LABEL);
        for (property, value) in [
            ("position", "fixed"),
            ("bottom", "20px"),
            ("right", "20px"),
            ("background", "linear-gradient(135deg, #FFDD67, #F76560)"),
            ("color", "white"),
            ("padding", "16px 24px"),
            ("border-radius", "50px"),
            ("box-shadow", "0 8px 25px rgba(0,0,0,0.3)"),
            ("cursor", "pointer"),
            ("font-weight", "700"),
            ("font-size", "1rem"),
            ("z-index", "1000"),
            ("transition", "all 0.3s ease"),
            ("transform", "translateY(100px)"),
            ("opacity", "0"),
        ] {
            cx.dom.set_style(fab, property, value);
        }
        let body = cx.dom.body();
        cx.dom.append_child(body, fab);
        self.fab = Some(fab);
    }

    fn unmount(&mut self, cx: &mut Cx<'_>) {
        if let Some(fab) = self.fab.take() {
            cx.dom.remove(fab);
        }
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let Some(fab) = self.fab else {
            return;
        };
        match event {
            PageEvent::Scroll => self.update(fab, cx),
            PageEvent::Click { target } if cx.dom.closest(*target, FAB_SELECTOR) == Some(fab) => {
                if let Some(cta) = cx.dom.query(&self.cta_section) {
                    cx.dom
                        .scroll_into_view(cta, ScrollBehavior::Smooth, ScrollBlock::Start);
                }
                cx.track("fab_click", json!({ "source": "floating_button" }));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::mounted;
    use page_core::{ScrollRequest, VirtualDocument, Viewport};

    fn fixture() -> (VirtualDocument, ElementId) {
        let mut doc = VirtualDocument::new();
        doc.set_viewport(Viewport {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
            document_height: 6000.0,
        });
        let body = doc.body();
        let hero = doc.element(body, "section", "hero");
        doc.set_layout(hero, 0.0, 900.0);
        let cta = doc.element(body, "section", "cta-section");
        doc.set_layout(cta, 5000.0, 800.0);
        (doc, cta)
    }

    #[test]
    fn test_visibility_window() {
        assert!(!fab_visible(900.0, 900.0, 5000.0, 800.0));
        assert!(fab_visible(901.0, 900.0, 5000.0, 800.0));
        assert!(fab_visible(4199.0, 900.0, 5000.0, 800.0));
        assert!(!fab_visible(4200.0, 900.0, 5000.0, 800.0));
    }

    #[test]
    fn test_button_follows_scroll() {
        let (doc, _) = fixture();
        let (mut page, _) = mounted(doc, FloatingOrderButton::new(&PageConfig::default()));
        let fab = page.dom().query(".floating-action-button").unwrap();
        assert_eq!(page.dom().text(fab), FAB_LABEL);
        assert_eq!(page.dom().style(fab, "opacity").as_deref(), Some("0"));

        page.dom_mut().set_scroll_y(2000.0);
        page.dispatch(PageEvent::Scroll);
        assert_eq!(page.dom().style(fab, "opacity").as_deref(), Some("1"));
        assert_eq!(page.dom().style(fab, "transform").as_deref(), Some("translateY(0)"));

        page.dom_mut().set_scroll_y(4500.0);
        page.dispatch(PageEvent::Scroll);
        assert_eq!(page.dom().style(fab, "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn test_click_scrolls_and_tracks() {
        let (doc, cta) = fixture();
        let (mut page, sink) = mounted(doc, FloatingOrderButton::new(&PageConfig::default()));
        let fab = page.dom().query(".floating-action-button").unwrap();

        page.dispatch(PageEvent::Click { target: fab });

        assert_eq!(
            page.dom().scroll_requests().last(),
            Some(&ScrollRequest::IntoView {
                target: cta,
                behavior: ScrollBehavior::Smooth,
                block: ScrollBlock::Start,
            })
        );
        let tracked = sink.tracked("fab_click");
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].field_str("source"), Some("floating_button"));
    }

    #[test]
    fn test_missing_sections_leave_button_hidden() {
        let (mut page, _) = mounted(
            VirtualDocument::new(),
            FloatingOrderButton::new(&PageConfig::default()),
        );
        let fab = page.dom().query(".floating-action-button").unwrap();
        page.dom_mut().set_scroll_y(400.0);
        page.dispatch(PageEvent::Scroll);
        assert_eq!(page.dom().style(fab, "opacity").as_deref(), Some("0"));
    }
}
