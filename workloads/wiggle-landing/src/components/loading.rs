//! Loading spinner overlay.

use page_core::{Dom, ElementId};

pub const SPINNER_CLASS: &str = "loading-spinner";

/// Overlay a spinner centred on `element` and return it.
pub fn show_loading_state(dom: &mut dyn Dom, element: ElementId) -> ElementId {
    let loader = dom.create_element("div");
    dom.add_class(loader, SPINNER_CLASS);
    dom.set_text(loader, "⏳");
    for (property, value) in [
        ("position", "absolute"),
        ("top", "50%"),
        ("left", "50%"),
        ("transform", "translate(-50%, -50%)"),
        ("font-size", "2rem"),
        ("z-index", "10"),
    ] {
        dom.set_style(loader, property, value);
    }
    dom.set_style(element, "position", "relative");
    dom.append_child(element, loader);
    loader
}

/// Remove a spinner. Detached spinners are ignored.
pub fn hide_loading_state(dom: &mut dyn Dom, loader: ElementId) {
    if dom.parent(loader).is_some() {
        dom.remove(loader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_core::VirtualDocument;

    #[test]
    fn test_show_and_hide() {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let button = doc.element(body, "a", "cta-button");

        let loader = show_loading_state(&mut doc, button);
        assert_eq!(doc.parent(loader), Some(button));
        assert_eq!(doc.style(button, "position").as_deref(), Some("relative"));
        assert_eq!(doc.text(loader), "⏳");

        hide_loading_state(&mut doc, loader);
        assert!(doc.query_in(button, ".loading-spinner").is_none());
        hide_loading_state(&mut doc, loader);
    }
}
