//! Review card rotation.

use page_core::{Dom, ElementId, Millis, TimerId};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

/// One rotation: the card to hide, the card to show and the new window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationStep {
    pub hide: usize,
    pub show: usize,
    pub next: usize,
}

/// Advance a window of `visible` cards starting at `current` over `len` cards.
pub fn rotation_step(current: usize, visible: usize, len: usize) -> RotationStep {
    let next = (current + 1) % len;
    RotationStep {
        hide: current,
        show: (next + visible.max(1) - 1) % len,
        next,
    }
}

/// Shows a sliding window of review cards when there are more than fit.
pub struct TestimonialRotator {
    selector: String,
    visible: usize,
    interval: Millis,
    cards: Vec<ElementId>,
    current: usize,
}

impl TestimonialRotator {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            selector: config.selectors.review_card.clone(),
            visible: config.timing.visible_testimonials,
            interval: config.timing.testimonial_interval_ms,
            cards: Vec::new(),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }
}

impl Component for TestimonialRotator {
    fn name(&self) -> &'static str {
        "testimonials"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        self.cards = cx.select_all(&self.selector);
        if self.cards.len() <= self.visible {
            return;
        }
        for card in &self.cards[self.visible..] {
            cx.dom.set_style(*card, "display", "none");
        }
        cx.schedule_every(self.interval, Task::RotateTestimonials);
    }

    fn handle_task(&mut self, task: Task, _timer: TimerId, cx: &mut Cx<'_>) {
        if task != Task::RotateTestimonials || self.cards.is_empty() {
            return;
        }
        let step = rotation_step(self.current, self.visible, self.cards.len());
        cx.dom.set_style(self.cards[step.hide], "display", "none");
        cx.dom.set_style(self.cards[step.show], "display", "block");
        self.current = step.next;
        cx.relayout();
    }
}
