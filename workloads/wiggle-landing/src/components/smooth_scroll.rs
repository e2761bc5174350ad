//! Smooth scrolling for in-page anchor links.

use page_core::{Dom, PageEvent, ScrollBehavior};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx};

/// Gap kept between the sticky header and the scrolled-to section.
const HEADER_GAP: f64 = 20.0;

/// Order links are left to the cart buttons.
const ORDER_PREFIX: &str = "#order-";

pub struct SmoothScrolling {
    links: String,
    header: String,
}

impl SmoothScrolling {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            links: config.selectors.in_page_links.clone(),
            header: config.selectors.header.clone(),
        }
    }
}

/// Scroll offset that puts `target_top` just below a header of `header_height`.
pub fn anchor_scroll_top(target_top: f64, header_height: f64) -> f64 {
    target_top - header_height - HEADER_GAP
}

impl Component for SmoothScrolling {
    fn name(&self) -> &'static str {
        "smooth-scrolling"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let PageEvent::Click { target } = event else {
            return;
        };
        let Some(link) = cx.dom.closest(*target, &self.links) else {
            return;
        };
        let Some(href) = cx.dom.attr(link, "href") else {
            return;
        };
        if href.starts_with(ORDER_PREFIX) {
            return;
        }

        cx.prevent_default();

        if let Some(section) = cx.dom.query(&href) {
            let header_height = cx
                .dom
                .query(&self.header)
                .map(|header| cx.dom.offset_height(header))
                .unwrap_or(0.0);
            let top = anchor_scroll_top(cx.dom.offset_top(section), header_height);
            cx.dom.scroll_to(top, ScrollBehavior::Smooth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::mounted;
    use page_core::{ScrollRequest, VirtualDocument};

    #[test]
    fn test_scrolls_below_header() {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let header = doc.element(body, "header", "header");
        doc.set_layout(header, 0.0, 80.0);
        let link = doc.element(body, "a", "");
        doc.set_attr(link, "href", "#faq");
        let section = doc.element(body, "section", "");
        doc.set_attr(section, "id", "faq");
        doc.set_layout(section, 2000.0, 600.0);

        let (mut page, _) = mounted(doc, SmoothScrolling::new(&PageConfig::default()));
        let outcome = page.dispatch(PageEvent::Click { target: link });

        assert!(outcome.default_prevented);
        assert_eq!(
            page.dom().scroll_requests().last(),
            Some(&ScrollRequest::To {
                top: 1900.0,
                behavior: ScrollBehavior::Smooth,
            })
        );
    }

    #[test]
    fn test_order_links_untouched() {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let link = doc.element(body, "a", "cta-button");
        doc.set_attr(link, "href", "#order-s");

        let (mut page, _) = mounted(doc, SmoothScrolling::new(&PageConfig::default()));
        let outcome = page.dispatch(PageEvent::Click { target: link });

        assert!(!outcome.default_prevented);
        assert!(page.dom().scroll_requests().is_empty());
    }

    #[test]
    fn test_missing_target_still_prevents_jump() {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let link = doc.element(body, "a", "");
        doc.set_attr(link, "href", "#");

        let (mut page, _) = mounted(doc, SmoothScrolling::new(&PageConfig::default()));
        let outcome = page.dispatch(PageEvent::Click { target: link });

        assert!(outcome.default_prevented);
        assert!(page.dom().scroll_requests().is_empty());
    }
}
