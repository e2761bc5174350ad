//! Page runtime: component mounting, event dispatch and timer routing.
//!
//! A [`Page`] owns the document, every component and a single timer queue.
//! It never reads a clock; the host calls [`Page::advance_to`] with the
//! current page time and [`Page::dispatch`] for each DOM event.

use std::collections::VecDeque;

use serde_json::Value;

use page_core::{
    Dom, ElementId, EventOutcome, KeyValueStore, Millis, PageEvent, TimerId, TimerQueue,
};
use page_observability::{EventTracker, StructuredLogger};

use crate::components::{self, NotificationCenter, NotificationKind};
use crate::config::PageConfig;
use crate::data::CartOrder;

/// Banner logged once the page is initialized.
pub const LOAD_BANNER: &str = "위글위글 스마일 보냉백 페이지가 로드되었습니다! 🌈✨";

/// Deferred work scheduled by components.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Scroll an opened FAQ answer into view.
    ScrollToAnswer(ElementId),
    /// Undo the size option's selection pulse.
    EndPulse(ElementId),
    /// Apply a staggered reveal.
    Reveal(ElementId),
    /// Advance a price count-up.
    PriceStep(ElementId),
    /// Move a toast to its next phase.
    Toast(ElementId),
    /// Finish a simulated add-to-cart request.
    CompleteOrder { loader: ElementId, order: CartOrder },
    RotateTestimonials,
    /// Forget logo clicks after a quiet period.
    ResetClicks,
    RemoveConfetti(ElementId),
    ReleaseTouch(ElementId),
    /// Debounced resize handling.
    ApplyResize,
    /// Debounced scroll-depth measurement.
    MeasureScrollDepth,
}

/// Which part of the page a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    Services,
    Component(usize),
}

/// A page feature attached to the document.
pub trait Component {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Attach to the document: create elements, set attributes, observe targets.
    fn mount(&mut self, cx: &mut Cx<'_>);

    /// Detach from the document. Pending timers are dropped by the page.
    fn unmount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, _event: &PageEvent, _cx: &mut Cx<'_>) {}

    fn handle_task(&mut self, _task: Task, _timer: TimerId, _cx: &mut Cx<'_>) {}
}

/// Shared services available to every component.
pub struct Services {
    pub config: PageConfig,
    pub logger: StructuredLogger,
    pub tracker: EventTracker,
    pub store: Box<dyn KeyValueStore>,
    pub notifications: NotificationCenter,
}

impl Services {
    pub fn new(config: PageConfig, logger: StructuredLogger, store: Box<dyn KeyValueStore>) -> Self {
        let notifications = NotificationCenter::new(&config.timing);
        Self {
            tracker: EventTracker::new(logger.clone()),
            config,
            logger,
            store,
            notifications,
        }
    }
}

/// Handler context: the document, services, and scheduling for one owner.
pub struct Cx<'a> {
    pub dom: &'a mut dyn Dom,
    pub services: &'a mut Services,
    timers: &'a mut TimerQueue<(Owner, Task)>,
    follow_ups: &'a mut Vec<PageEvent>,
    outcome: &'a mut EventOutcome,
    owner: Owner,
    now: Millis,
}

impl<'a> Cx<'a> {
    pub(crate) fn new(
        dom: &'a mut dyn Dom,
        services: &'a mut Services,
        timers: &'a mut TimerQueue<(Owner, Task)>,
        follow_ups: &'a mut Vec<PageEvent>,
        outcome: &'a mut EventOutcome,
        owner: Owner,
        now: Millis,
    ) -> Self {
        Self {
            dom,
            services,
            timers,
            follow_ups,
            outcome,
            owner,
            now,
        }
    }

    /// Current page time.
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn config(&self) -> &PageConfig {
        &self.services.config
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.services.logger
    }

    /// All elements matching `selector`. Unsupported selectors are logged and match nothing.
    pub fn select_all(&self, selector: &str) -> Vec<ElementId> {
        match self.dom.query_all_in(None, selector) {
            Ok(found) => found,
            Err(err) => {
                self.services
                    .logger
                    .warn_builder("Selector ignored")
                    .field("selector", selector)
                    .field("error", err.to_string())
                    .emit();
                Vec::new()
            }
        }
    }

    /// Run `task` once after `delay`.
    pub fn schedule(&mut self, delay: Millis, task: Task) -> TimerId {
        self.timers.set_timeout(self.now, delay, (self.owner, task))
    }

    /// Run `task` every `period` until cancelled.
    pub fn schedule_every(&mut self, period: Millis, task: Task) -> TimerId {
        self.timers.set_interval(self.now, period, (self.owner, task))
    }

    pub fn cancel(&mut self, timer: TimerId) -> bool {
        self.timers.cancel(timer)
    }

    /// Suppress the browser's default action for the current event.
    pub fn prevent_default(&mut self) {
        self.outcome.default_prevented = true;
    }

    /// Queue a synthetic click on `target`, dispatched after the current event.
    pub fn click(&mut self, target: ElementId) {
        self.follow_ups.push(PageEvent::Click { target });
    }

    /// Report that elements were shown or hidden, so observers re-check
    /// their targets after the current handler.
    pub fn relayout(&mut self) {
        if !self.follow_ups.contains(&PageEvent::LayoutChanged) {
            self.follow_ups.push(PageEvent::LayoutChanged);
        }
    }

    /// Show a toast. Its phase changes are scheduled on the page's timer queue.
    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> ElementId {
        let toast = self
            .services
            .notifications
            .show(&mut *self.dom, self.now, message, kind);
        for offset in self.services.notifications.timing().checkpoints() {
            self.timers
                .set_timeout(self.now, offset, (Owner::Services, Task::Toast(toast)));
        }
        toast
    }

    /// Record an analytics event.
    pub fn track(&self, name: &str, data: Value) {
        self.services.tracker.track(name, data);
    }
}

/// The landing page: a document plus its mounted components.
pub struct Page<D: Dom> {
    dom: D,
    services: Services,
    timers: TimerQueue<(Owner, Task)>,
    components: Vec<Box<dyn Component>>,
    now: Millis,
    mounted: bool,
}

impl<D: Dom> Page<D> {
    /// Create a page with the standard component set.
    pub fn new(
        dom: D,
        config: PageConfig,
        store: Box<dyn KeyValueStore>,
        logger: StructuredLogger,
    ) -> Self {
        let components = components::standard_set(&config);
        Self::with_components(dom, config, store, logger, components)
    }

    /// Create a page with an explicit component list.
    pub fn with_components(
        dom: D,
        config: PageConfig,
        store: Box<dyn KeyValueStore>,
        logger: StructuredLogger,
        components: Vec<Box<dyn Component>>,
    ) -> Self {
        Self {
            dom,
            services: Services::new(config, logger, store),
            timers: TimerQueue::new(),
            components,
            now: 0,
            mounted: false,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.services.logger
    }

    pub fn config(&self) -> &PageConfig {
        &self.services.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending timer, for hosts that sleep between ticks.
    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// How long the host may sleep before calling [`Page::advance_to`].
    /// `None` when nothing is scheduled.
    pub fn wake_delay(&self) -> Option<Millis> {
        self.next_due().map(|due| due.saturating_sub(self.now))
    }

    /// Number of toasts still attached to the document.
    pub fn active_notifications(&self) -> usize {
        self.services.notifications.active_count()
    }

    /// Mount every component in order, then deliver [`PageEvent::Ready`].
    pub fn mount(&mut self) -> EventOutcome {
        if self.mounted {
            return EventOutcome::default();
        }
        let mut follow_ups = Vec::new();
        let mut outcome = EventOutcome::default();
        for (index, component) in self.components.iter_mut().enumerate() {
            tracing::debug!(component = component.name(), "mounting");
            let mut cx = Cx::new(
                &mut self.dom,
                &mut self.services,
                &mut self.timers,
                &mut follow_ups,
                &mut outcome,
                Owner::Component(index),
                self.now,
            );
            component.mount(&mut cx);
        }
        self.mounted = true;
        self.services.logger.info(LOAD_BANNER);
        self.dispatch(PageEvent::Ready)
    }

    /// Unmount every component in reverse order and drop pending timers.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let mut follow_ups = Vec::new();
        let mut outcome = EventOutcome::default();
        for (index, component) in self.components.iter_mut().enumerate().rev() {
            let mut cx = Cx::new(
                &mut self.dom,
                &mut self.services,
                &mut self.timers,
                &mut follow_ups,
                &mut outcome,
                Owner::Component(index),
                self.now,
            );
            component.unmount(&mut cx);
        }
        self.services.notifications.clear(&mut self.dom);
        self.timers.clear();
        self.mounted = false;
    }

    /// Deliver an event to every component in mount order.
    ///
    /// Synthetic clicks and layout changes requested by handlers are
    /// delivered afterwards, in request order.
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        if !self.mounted {
            return outcome;
        }
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let mut follow_ups = Vec::new();
            for (index, component) in self.components.iter_mut().enumerate() {
                let mut cx = Cx::new(
                    &mut self.dom,
                    &mut self.services,
                    &mut self.timers,
                    &mut follow_ups,
                    &mut outcome,
                    Owner::Component(index),
                    self.now,
                );
                component.handle_event(&event, &mut cx);
            }
            queue.extend(follow_ups);
        }
        outcome
    }

    /// Run every timer due at or before `now`, in time order.
    pub fn advance_to(&mut self, now: Millis) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.now = self.now.max(fired.at);
            self.services.logger.set_elapsed_ms(self.now);

            let (owner, task) = fired.payload;
            let mut follow_ups = Vec::new();
            let mut outcome = EventOutcome::default();
            match owner {
                Owner::Services => self.run_service_task(task),
                Owner::Component(index) => {
                    let Some(component) = self.components.get_mut(index) else {
                        tracing::debug!(index, "timer for unknown component");
                        continue;
                    };
                    let mut cx = Cx::new(
                        &mut self.dom,
                        &mut self.services,
                        &mut self.timers,
                        &mut follow_ups,
                        &mut outcome,
                        owner,
                        self.now,
                    );
                    component.handle_task(task, fired.id, &mut cx);
                }
            }
            for event in follow_ups {
                self.dispatch(event);
            }
        }
        self.now = self.now.max(now);
        self.services.logger.set_elapsed_ms(self.now);
    }

    /// Advance page time by `delta` milliseconds.
    pub fn advance_by(&mut self, delta: Millis) {
        self.advance_to(self.now.saturating_add(delta));
    }

    fn run_service_task(&mut self, task: Task) {
        match task {
            Task::Toast(toast) => self.services.notifications.apply(&mut self.dom, toast, self.now),
            other => tracing::debug!(?other, "unexpected service task"),
        }
    }

    /// Run `f` with a context owned by the page services, as the exposed API does.
    fn with_service_cx<R>(&mut self, f: impl FnOnce(&mut Cx<'_>) -> R) -> R {
        let mut follow_ups = Vec::new();
        let mut outcome = EventOutcome::default();
        let mut cx = Cx::new(
            &mut self.dom,
            &mut self.services,
            &mut self.timers,
            &mut follow_ups,
            &mut outcome,
            Owner::Services,
            self.now,
        );
        f(&mut cx)
    }

    /// Record an analytics event.
    pub fn track_event(&mut self, name: &str, data: Value) {
        self.services.tracker.track(name, data);
    }

    /// Show a toast notification.
    pub fn show_notification(&mut self, message: &str, kind: NotificationKind) -> ElementId {
        self.with_service_cx(|cx| cx.notify(message, kind))
    }

    /// Add an order to the (stub) cart immediately.
    pub fn add_to_cart(&mut self, order: &CartOrder) {
        self.with_service_cx(|cx| components::add_to_cart(cx, order));
    }

    /// Toggle a product in the persisted wishlist. Returns whether it is now present.
    pub fn toggle_wishlist(&mut self, product_id: &str) -> bool {
        self.with_service_cx(|cx| components::toggle_wishlist(cx, product_id))
    }

    /// Flag empty required fields of `form`. Returns whether all are filled.
    pub fn validate_form(&mut self, form: ElementId) -> bool {
        components::validate_form(&mut self.dom, form)
    }

    /// Overlay a spinner on `element`, returning the spinner.
    pub fn show_loading_state(&mut self, element: ElementId) -> ElementId {
        components::show_loading_state(&mut self.dom, element)
    }

    /// Remove a spinner created by [`Page::show_loading_state`].
    pub fn hide_loading_state(&mut self, loader: ElementId) {
        components::hide_loading_state(&mut self.dom, loader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_core::{MemoryStore, VirtualDocument};
    use page_observability::{MemorySink, SessionId};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records what it sees and echoes a synthetic click once.
    struct Recorder {
        seen: Rc<RefCell<Vec<String>>>,
        echo: Option<ElementId>,
    }

    impl Component for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn mount(&mut self, cx: &mut Cx<'_>) {
            self.seen.borrow_mut().push("mount".into());
            cx.schedule(100, Task::ResetClicks);
            cx.schedule_every(40, Task::RotateTestimonials);
        }

        fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
            self.seen.borrow_mut().push(format!("{:?}", event));
            if let PageEvent::KeyDown { .. } = event {
                if let Some(target) = self.echo.take() {
                    cx.prevent_default();
                    cx.click(target);
                }
            }
        }

        fn handle_task(&mut self, task: Task, timer: TimerId, cx: &mut Cx<'_>) {
            self.seen.borrow_mut().push(format!("{:?}@{}", task, cx.now()));
            if task == Task::RotateTestimonials && cx.now() >= 80 {
                cx.cancel(timer);
            }
        }
    }

    fn page(echo: Option<ElementId>) -> (Page<VirtualDocument>, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let logger = StructuredLogger::new(SessionId::from_string("pv-test"))
            .with_sink(Rc::new(MemorySink::new()));
        let recorder = Recorder {
            seen: seen.clone(),
            echo,
        };
        let page = Page::with_components(
            VirtualDocument::new(),
            PageConfig::default(),
            Box::new(MemoryStore::new()),
            logger,
            vec![Box::new(recorder)],
        );
        (page, seen)
    }

    #[test]
    fn test_events_ignored_before_mount() {
        let (mut page, seen) = page(None);
        page.dispatch(PageEvent::Scroll);
        assert!(seen.borrow().is_empty());
        page.mount();
        assert_eq!(seen.borrow().as_slice(), ["mount", "Ready"]);
    }

    #[test]
    fn test_synthetic_click_follows_event() {
        let target = ElementId(2);
        let (mut page, seen) = page(Some(target));
        page.mount();
        let outcome = page.dispatch(PageEvent::KeyDown {
            target: None,
            key: page_core::Key::Enter,
        });
        assert!(outcome.default_prevented);
        assert_eq!(seen.borrow().last().unwrap(), &format!("{:?}", PageEvent::Click { target }));
    }

    #[test]
    fn test_wake_delay_tracks_next_timer() {
        let (mut page, _) = page(None);
        assert_eq!(page.wake_delay(), None);
        page.mount();
        assert_eq!(page.wake_delay(), Some(40));

        page.advance_to(50);
        assert_eq!(page.wake_delay(), Some(30));
        page.advance_to(200);
        assert_eq!(page.wake_delay(), None);

        page.unmount();
        assert_eq!(page.wake_delay(), None);
    }

    #[test]
    fn test_timers_fire_in_order_with_simulated_time() {
        let (mut page, seen) = page(None);
        page.mount();
        page.advance_to(200);
        let log = seen.borrow();
        assert_eq!(
            &log[2..],
            [
                "RotateTestimonials@40",
                "RotateTestimonials@80",
                "ResetClicks@100",
            ]
        );
        assert_eq!(page.now(), 200);
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_unmount_drops_timers() {
        let (mut page, _) = page(None);
        page.mount();
        assert!(page.pending_timers() > 0);
        page.unmount();
        assert_eq!(page.pending_timers(), 0);
        assert!(!page.is_mounted());
    }
}
