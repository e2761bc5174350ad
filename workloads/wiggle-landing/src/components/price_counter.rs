//! Count-up animation for sale prices.

use page_core::{Dom, ElementId, Millis, Observer, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::data::Won;
use crate::runtime::{Component, Cx, Task};

/// Linear count from zero to `target` in `steps` equal increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub target: Won,
    pub steps: u32,
}

impl CountUp {
    pub fn new(target: Won, steps: u32) -> Self {
        Self {
            target,
            steps: steps.max(1),
        }
    }

    /// Value shown at `step` (1-based). Steps past the end show the target.
    pub fn value_at(&self, step: u32) -> Won {
        let step = step.min(self.steps);
        let value = u128::from(self.target.amount()) * u128::from(step) / u128::from(self.steps);
        Won(value as u64)
    }

    pub fn is_done(&self, step: u32) -> bool {
        step >= self.steps
    }
}

#[derive(Debug)]
struct Run {
    el: ElementId,
    count: CountUp,
    step: u32,
}

/// Starts a count-up the first time a price is at least half visible.
pub struct PriceCounter {
    selector: String,
    steps: u32,
    step_ms: Millis,
    observer: Observer,
    runs: Vec<Run>,
}

impl PriceCounter {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            selector: config.selectors.sale_price.clone(),
            steps: config.timing.price_steps,
            step_ms: config.timing.price_step_ms,
            observer: Observer::new(config.observers.price()),
            runs: Vec::new(),
        }
    }

    /// Count-ups still in progress.
    pub fn running(&self) -> usize {
        self.runs.len()
    }

    fn start(&mut self, el: ElementId, cx: &mut Cx<'_>) {
        let Some(target) = Won::parse_digits(&cx.dom.text(el)) else {
            tracing::debug!(%el, "sale price without digits");
            return;
        };
        self.runs.push(Run {
            el,
            count: CountUp::new(target, self.steps),
            step: 0,
        });
        cx.schedule_every(self.step_ms, Task::PriceStep(el));
    }

    fn step(&mut self, el: ElementId, timer: TimerId, cx: &mut Cx<'_>) {
        let Some(index) = self.runs.iter().position(|r| r.el == el) else {
            cx.cancel(timer);
            return;
        };
        let run = &mut self.runs[index];
        run.step += 1;
        cx.dom.set_text(el, &run.count.value_at(run.step).display());
        if run.count.is_done(run.step) {
            cx.cancel(timer);
            self.runs.swap_remove(index);
        }
    }
}

impl Component for PriceCounter {
    fn name(&self) -> &'static str {
        "price-counter"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        for el in cx.select_all(&self.selector) {
            self.observer.observe(el);
        }
    }

    fn unmount(&mut self, _cx: &mut Cx<'_>) {
        self.observer.disconnect();
        self.runs.clear();
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if !matches!(
            event,
            PageEvent::Ready | PageEvent::Scroll | PageEvent::Resize | PageEvent::LayoutChanged
        ) {
            return;
        }
        for el in self.observer.take_intersecting(&*cx.dom) {
            self.start(el, cx);
        }
    }

    fn handle_task(&mut self, task: Task, timer: TimerId, cx: &mut Cx<'_>) {
        if let Task::PriceStep(el) = task {
            self.step(el, timer, cx);
        }
    }
}
