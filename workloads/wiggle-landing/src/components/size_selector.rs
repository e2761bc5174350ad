//! Size selector (radio-like options) and the CTA labels that follow it.

use page_core::{Dom, ElementId, Key, Millis, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::data::SizeCatalog;
use crate::runtime::{Component, Cx, Task};

pub struct SizeSelector {
    option: String,
    cta: String,
    pulse: Millis,
    catalog: SizeCatalog,
}

impl SizeSelector {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            option: config.selectors.size_option.clone(),
            cta: config.selectors.cta_button.clone(),
            pulse: config.timing.size_pulse_ms,
            catalog: SizeCatalog::default(),
        }
    }

    pub fn catalog(&self) -> &SizeCatalog {
        &self.catalog
    }

    fn select(&mut self, option: ElementId, cx: &mut Cx<'_>) {
        let options = cx.select_all(&self.option);
        let Some(index) = options.iter().position(|o| *o == option) else {
            return;
        };
        for other in &options {
            cx.dom.remove_class(*other, "active");
        }
        cx.dom.add_class(option, "active");

        if let Some(selected) = self.catalog.select(index) {
            let label = selected.cta_label();
            let anchor = selected.size.order_anchor();
            for button in cx.select_all(&self.cta) {
                cx.dom.set_text(button, &label);
                cx.dom.set_attr(button, "href", &anchor);
            }
        }

        cx.dom.set_style(option, "transform", "scale(1.05)");
        cx.schedule(self.pulse, Task::EndPulse(option));
    }

    fn move_focus(&self, forward: bool, cx: &mut Cx<'_>) -> bool {
        let Some(focused) = cx.dom.active_element() else {
            return false;
        };
        let options = cx.select_all(&self.option);
        let Some(current) = options.iter().position(|o| *o == focused) else {
            return false;
        };
        let next = step_index(current, options.len(), forward);
        cx.dom.focus(options[next]);
        true
    }
}

/// Neighbouring index, wrapping at both ends.
pub fn step_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

impl Component for SizeSelector {
    fn name(&self) -> &'static str {
        "size-selector"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        let options = cx.select_all(&self.option);
        for option in &options {
            cx.dom.set_attr(*option, "tabindex", "0");
            cx.dom.set_attr(*option, "role", "radio");
        }
        if let Some(index) = options.iter().position(|o| cx.dom.has_class(*o, "active")) {
            self.catalog.select(index);
        }
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        match event {
            PageEvent::Click { target } => {
                if let Some(option) = cx.dom.closest(*target, &self.option) {
                    self.select(option, cx);
                }
            }
            PageEvent::KeyDown {
                target: Some(target),
                key,
            } if key.is_activation() => {
                if cx.dom.matches(*target, &self.option).unwrap_or(false) {
                    cx.prevent_default();
                    cx.click(*target);
                }
            }
            PageEvent::KeyDown {
                key: key @ (Key::ArrowLeft | Key::ArrowRight),
                ..
            } => {
                if self.move_focus(*key == Key::ArrowRight, cx) {
                    cx.prevent_default();
                }
            }
            _ => {}
        }
    }

    fn handle_task(&mut self, task: Task, _timer: TimerId, cx: &mut Cx<'_>) {
        if let Task::EndPulse(option) = task {
            cx.dom.clear_style(option, "transform");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::mounted;
    use page_core::VirtualDocument;

    struct Fixture {
        doc: VirtualDocument,
        options: Vec<ElementId>,
        ctas: Vec<ElementId>,
    }

    fn fixture() -> Fixture {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let group = doc.element(body, "div", "size-options");
        let options = vec![
            doc.element(group, "div", "size-option active"),
            doc.element(group, "div", "size-option"),
        ];
        let ctas = vec![
            doc.element(body, "a", "cta-button"),
            doc.element(body, "a", "cta-button"),
        ];
        Fixture { doc, options, ctas }
    }

    #[test]
    fn test_selecting_large_updates_every_cta() {
        let Fixture { doc, options, ctas } = fixture();
        let (mut page, _) = mounted(doc, SizeSelector::new(&PageConfig::default()));

        page.dispatch(PageEvent::Click { target: options[1] });

        assert!(page.dom().has_class(options[1], "active"));
        assert!(!page.dom().has_class(options[0], "active"));
        for cta in ctas {
            assert_eq!(page.dom().text(cta), "💛 L사이즈 주문하기 (18,500원)");
            assert_eq!(page.dom().attr(cta, "href").as_deref(), Some("#order-l"));
        }
    }

    #[test]
    fn test_pulse_resets() {
        let Fixture { doc, options, .. } = fixture();
        let (mut page, _) = mounted(doc, SizeSelector::new(&PageConfig::default()));

        page.dispatch(PageEvent::Click { target: options[0] });
        assert_eq!(page.dom().style(options[0], "transform").as_deref(), Some("scale(1.05)"));
        page.advance_by(200);
        assert_eq!(page.dom().style(options[0], "transform"), None);
    }

    #[test]
    fn test_arrow_keys_move_focus_without_selecting() {
        let Fixture { doc, options, .. } = fixture();
        let (mut page, _) = mounted(doc, SizeSelector::new(&PageConfig::default()));
        page.dom_mut().focus(options[0]);

        let outcome = page.dispatch(PageEvent::KeyDown {
            target: Some(options[0]),
            key: Key::ArrowLeft,
        });
        assert!(outcome.default_prevented);
        assert_eq!(page.dom().active_element(), Some(options[1]));
        assert!(page.dom().has_class(options[0], "active"));

        page.dispatch(PageEvent::KeyDown {
            target: Some(options[1]),
            key: Key::ArrowRight,
        });
        assert_eq!(page.dom().active_element(), Some(options[0]));
    }

    #[test]
    fn test_arrow_keys_ignored_elsewhere() {
        let Fixture { doc, .. } = fixture();
        let (mut page, _) = mounted(doc, SizeSelector::new(&PageConfig::default()));
        let outcome = page.dispatch(PageEvent::KeyDown {
            target: None,
            key: Key::ArrowRight,
        });
        assert!(!outcome.default_prevented);
    }

    #[test]
    fn test_enter_selects() {
        let Fixture { doc, options, ctas } = fixture();
        let (mut page, _) = mounted(doc, SizeSelector::new(&PageConfig::default()));
        page.dispatch(PageEvent::KeyDown {
            target: Some(options[1]),
            key: Key::Enter,
        });
        assert_eq!(page.dom().attr(ctas[0], "href").as_deref(), Some("#order-l"));
    }

    #[test]
    fn test_step_index_wraps() {
        assert_eq!(step_index(0, 2, false), 1);
        assert_eq!(step_index(1, 2, true), 0);
        assert_eq!(step_index(0, 3, true), 1);
        assert_eq!(step_index(0, 0, true), 0);
    }
}
