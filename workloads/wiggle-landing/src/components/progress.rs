//! Reading progress bar along the top edge.

use page_core::{Dom, ElementId, PageEvent, Viewport};

use crate::runtime::{Component, Cx};

/// Scroll progress in percent, clamped to `[0, 100]`.
///
/// A document no taller than the window reports 0.
pub fn progress_percent(viewport: &Viewport) -> f64 {
    viewport.scroll_fraction() * 100.0
}

#[derive(Debug, Default)]
pub struct ScrollProgress {
    bar: Option<ElementId>,
}

impl ScrollProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bar(&self) -> Option<ElementId> {
        self.bar
    }
}

impl Component for ScrollProgress {
    fn name(&self) -> &'static str {
        "scroll-progress"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        let bar = cx.dom.create_element("div");
        cx.dom.add_class(bar, "scroll-progress");
        for (property, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "0%"),
            ("height", "4px"),
            ("background", "linear-gradient(90deg, #FFDD67, #F76560)"),
            ("z-index", "10000"),
            ("transition", "width 0.3s ease"),
        ] {
            cx.dom.set_style(bar, property, value);
        }
        let body = cx.dom.body();
        cx.dom.append_child(body, bar);
        self.bar = Some(bar);
    }

    fn unmount(&mut self, cx: &mut Cx<'_>) {
        if let Some(bar) = self.bar.take() {
            cx.dom.remove(bar);
        }
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let (PageEvent::Scroll, Some(bar)) = (event, self.bar) else {
            return;
        };
        let percent = progress_percent(&cx.dom.viewport());
        cx.dom.set_style(bar, "width", &format!("{}%", percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::mounted;
    use page_core::VirtualDocument;

    fn viewport(scroll_y: f64, document_height: f64) -> Viewport {
        Viewport {
            scroll_y,
            width: 1280.0,
            height: 1000.0,
            document_height,
        }
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(progress_percent(&viewport(0.0, 3000.0)), 0.0);
        assert_eq!(progress_percent(&viewport(1000.0, 3000.0)), 50.0);
        assert_eq!(progress_percent(&viewport(2500.0, 3000.0)), 100.0);
        assert_eq!(progress_percent(&viewport(10.0, 900.0)), 0.0);
        assert_eq!(progress_percent(&viewport(10.0, 1000.0)), 0.0);
    }

    #[test]
    fn test_bar_tracks_scroll() {
        let mut doc = VirtualDocument::new();
        doc.set_viewport(viewport(0.0, 5000.0));
        let (mut page, _) = mounted(doc, ScrollProgress::new());
        let bar = page.dom().query(".scroll-progress").unwrap();
        assert_eq!(page.dom().style(bar, "height").as_deref(), Some("4px"));

        page.dom_mut().set_scroll_y(1000.0);
        page.dispatch(PageEvent::Scroll);
        assert_eq!(page.dom().style(bar, "width").as_deref(), Some("25%"));
    }

    #[test]
    fn test_unmount_removes_bar() {
        let (mut page, _) = mounted(VirtualDocument::new(), ScrollProgress::new());
        let bar = page.dom().query(".scroll-progress").unwrap();
        page.unmount();
        assert!(!page.dom().is_connected(bar));
    }
}
