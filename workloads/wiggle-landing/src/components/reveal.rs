//! Fade-in of content cards as they scroll into view.

use page_core::{Dom, ElementId, Millis, Observer, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

/// Reveals each target once, the first time it intersects the viewport.
///
/// Grid members are staggered by their position among their siblings.
pub struct ScrollReveal {
    targets: String,
    grid: String,
    stagger: Millis,
    observer: Observer,
}

impl ScrollReveal {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            targets: config.selectors.reveal_targets.clone(),
            grid: config.selectors.grid_items.clone(),
            stagger: config.timing.reveal_stagger_ms,
            observer: Observer::new(config.observers.reveal()),
        }
    }

    /// Targets not yet revealed.
    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    fn check(&mut self, cx: &mut Cx<'_>) {
        for el in self.observer.take_intersecting(&*cx.dom) {
            cx.dom.add_class(el, "visible");

            let delay = if cx.dom.matches(el, &self.grid).unwrap_or(false) {
                stagger_delay(cx.dom.index_in_parent(el).unwrap_or(0), self.stagger)
            } else {
                0
            };
            if delay == 0 {
                reveal(&mut *cx.dom, el);
            } else {
                cx.schedule(delay, Task::Reveal(el));
            }
        }
    }
}

/// Delay for the grid member at `index`.
pub fn stagger_delay(index: usize, stagger: Millis) -> Millis {
    (index as Millis).saturating_mul(stagger)
}

fn reveal(dom: &mut dyn Dom, el: ElementId) {
    dom.set_style(el, "opacity", "1");
    dom.set_style(el, "transform", "translateY(0)");
}

impl Component for ScrollReveal {
    fn name(&self) -> &'static str {
        "scroll-reveal"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        for el in cx.select_all(&self.targets) {
            cx.dom.add_class(el, "fade-in");
            self.observer.observe(el);
        }
    }

    fn unmount(&mut self, _cx: &mut Cx<'_>) {
        self.observer.disconnect();
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if matches!(
            event,
            PageEvent::Ready | PageEvent::Scroll | PageEvent::Resize | PageEvent::LayoutChanged
        ) {
            self.check(cx);
        }
    }

    fn handle_task(&mut self, task: Task, _timer: TimerId, cx: &mut Cx<'_>) {
        if let Task::Reveal(el) = task {
            reveal(&mut *cx.dom, el);
        }
    }
}
