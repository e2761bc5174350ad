//! Browser bridge: [`Dom`] over web-sys, plus event and clock forwarding.
//!
//! Elements are interned into a handle table the first time the page sees
//! them. A handle stays stable until the page removes its element.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Object, WeakMap};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, KeyboardEvent, NodeList, ScrollBehavior as JsScroll,
    ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

use page_core::{
    Dom, ElementId, HandleTable, ImageState, Key, Millis, PageError, PageEvent, PageResult,
    ScrollBehavior, ScrollBlock, Viewport,
};

use crate::runtime::Page;

/// Handle returned when the browser refuses to create an element.
const DETACHED: ElementId = ElementId(usize::MAX);

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn report(result: Result<(), JsValue>, op: &'static str) {
    if let Err(err) = result {
        tracing::debug!(op, error = %describe(&err), "DOM call failed");
    }
}

fn js_scroll(behavior: ScrollBehavior) -> JsScroll {
    match behavior {
        ScrollBehavior::Auto => JsScroll::Auto,
        ScrollBehavior::Smooth => JsScroll::Smooth,
    }
}

/// The live document.
pub struct BrowserDom {
    window: Window,
    document: Document,
    handles: RefCell<HandleTable<Element>>,
    /// Element to handle index, without keeping elements alive.
    ids: WeakMap,
    body: ElementId,
    head: ElementId,
}

impl BrowserDom {
    pub fn new() -> PageResult<Self> {
        let window = web_sys::window().ok_or_else(|| PageError::ElementNotFound("window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| PageError::ElementNotFound("document".into()))?;
        let body: Element = document
            .body()
            .ok_or_else(|| PageError::ElementNotFound("body".into()))?
            .into();
        let head: Element = document
            .head()
            .ok_or_else(|| PageError::ElementNotFound("head".into()))?
            .into();
        let mut dom = Self {
            window,
            document,
            handles: RefCell::new(HandleTable::new()),
            ids: WeakMap::new(),
            body: ElementId(0),
            head: ElementId(0),
        };
        dom.body = dom.intern(body);
        dom.head = dom.intern(head);
        Ok(dom)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Handle for `el`, allocating one on first sight.
    pub fn intern(&self, el: Element) -> ElementId {
        if let Some(id) = self.lookup(&el) {
            return id;
        }
        let key: &Object = el.as_ref();
        let key = key.clone();
        let id = self.handles.borrow_mut().insert(el);
        self.ids.set(&key, &JsValue::from_f64(id.0 as f64));
        id
    }

    fn lookup(&self, el: &Element) -> Option<ElementId> {
        let index = self.ids.get(el.as_ref()).as_f64()? as usize;
        let id = ElementId(index);
        self.handles.borrow().get(id).is_some().then_some(id)
    }

    /// Forget `el`. Later lookups of its old handle resolve to nothing.
    fn release(&self, el: &Element) {
        if let Some(id) = self.lookup(el) {
            self.handles.borrow_mut().release(id);
        }
        self.ids.delete(el.as_ref());
    }

    /// Element behind a handle.
    pub fn resolve(&self, id: ElementId) -> Option<Element> {
        self.handles.borrow().get(id).cloned()
    }

    /// The `Load` event, if the document finished loading before the page attached.
    pub fn missed_load(&self) -> Option<PageEvent> {
        (self.document.ready_state() == "complete").then(|| PageEvent::Load {
            elapsed_ms: performance_now(&self.window).round() as u64,
        })
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.resolve(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn collect(&self, list: NodeList) -> Vec<ElementId> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn window_dimension(value: Result<JsValue, JsValue>) -> f64 {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

impl Dom for BrowserDom {
    fn body(&self) -> ElementId {
        self.body
    }

    fn head(&self) -> ElementId {
        self.head
    }

    fn query_all_in(&self, root: Option<ElementId>, selector: &str) -> PageResult<Vec<ElementId>> {
        let list = match root {
            Some(root) => match self.resolve(root) {
                Some(root) => root.query_selector_all(selector),
                None => return Ok(Vec::new()),
            },
            None => self.document.query_selector_all(selector),
        }
        .map_err(|_| PageError::UnsupportedSelector(selector.to_string()))?;
        Ok(self.collect(list))
    }

    fn matches(&self, el: ElementId, selector: &str) -> PageResult<bool> {
        match self.resolve(el) {
            Some(el) => el
                .matches(selector)
                .map_err(|_| PageError::UnsupportedSelector(selector.to_string())),
            None => Ok(false),
        }
    }

    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId> {
        let found = self.resolve(el)?.closest(selector).ok().flatten()?;
        Some(self.intern(found))
    }

    fn tag_name(&self, el: ElementId) -> String {
        self.resolve(el)
            .map(|el| el.tag_name().to_lowercase())
            .unwrap_or_default()
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.resolve(el)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(el) = self.resolve(el) {
            report(el.class_list().add_1(class), "add_class");
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(el) = self.resolve(el) {
            report(el.class_list().remove_1(class), "remove_class");
        }
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<String> {
        self.resolve(el)?.get_attribute(name)
    }

    fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(el) = self.resolve(el) {
            report(el.set_attribute(name, value), "set_attribute");
        }
    }

    fn remove_attr(&mut self, el: ElementId, name: &str) {
        if let Some(el) = self.resolve(el) {
            report(el.remove_attribute(name), "remove_attribute");
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.resolve(el)
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(el) = self.resolve(el) {
            el.set_text_content(Some(text));
        }
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        let value = self.html(el)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(html) = self.html(el) else {
            return;
        };
        let style = html.style();
        if value.is_empty() {
            report(style.remove_property(property).map(|_| ()), "remove_property");
        } else {
            report(style.set_property(property, value), "set_property");
        }
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.resolve(el)?.parent_element()?;
        Some(self.intern(parent))
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        let Some(el) = self.resolve(el) else {
            return Vec::new();
        };
        let children = el.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|child| self.intern(child))
            .collect()
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        match self.document.create_element(tag) {
            Ok(el) => self.intern(el),
            Err(err) => {
                tracing::warn!(tag, error = %describe(&err), "create_element failed");
                DETACHED
            }
        }
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if let (Some(parent), Some(child)) = (self.resolve(parent), self.resolve(child)) {
            report(parent.append_child(&child).map(|_| ()), "append_child");
        }
    }

    fn remove(&mut self, el: ElementId) {
        let Some(el) = self.resolve(el) else {
            return;
        };
        if let Ok(list) = el.query_selector_all("*") {
            for node in (0..list.length()).filter_map(|i| list.item(i)) {
                if let Ok(child) = node.dyn_into::<Element>() {
                    self.release(&child);
                }
            }
        }
        el.remove();
        self.release(&el);
    }

    fn is_connected(&self, el: ElementId) -> bool {
        self.resolve(el).is_some_and(|el| el.is_connected())
    }

    fn is_rendered(&self, el: ElementId) -> bool {
        self.resolve(el)
            .is_some_and(|el| el.is_connected() && el.get_client_rects().length() > 0)
    }

    fn image_state(&self, el: ElementId) -> ImageState {
        let Some(img) = self
            .resolve(el)
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        else {
            return ImageState::Pending;
        };
        // An img without a source reports complete with no pixels.
        if img.current_src().is_empty() || !img.complete() {
            ImageState::Pending
        } else if img.natural_width() > 0 {
            ImageState::Loaded
        } else {
            ImageState::Failed
        }
    }

    fn focus(&mut self, el: ElementId) {
        if let Some(html) = self.html(el) {
            report(html.focus(), "focus");
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        let el = self.document.active_element()?;
        Some(self.intern(el))
    }

    fn value(&self, el: ElementId) -> String {
        let Some(el) = self.resolve(el) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            return area.value();
        }
        if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            return select.value();
        }
        el.get_attribute("value").unwrap_or_default()
    }

    fn offset_top(&self, el: ElementId) -> f64 {
        self.resolve(el)
            .map(|el| el.get_bounding_client_rect().top() + self.scroll_y())
            .unwrap_or(0.0)
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.resolve(el)
            .map(|el| el.get_bounding_client_rect().height())
            .unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            scroll_y: self.scroll_y(),
            width: Self::window_dimension(self.window.inner_width()),
            height: Self::window_dimension(self.window.inner_height()),
            document_height: self
                .document
                .body()
                .map(|body| f64::from(body.scroll_height()))
                .unwrap_or(0.0),
        }
    }

    fn scroll_into_view(&mut self, el: ElementId, behavior: ScrollBehavior, block: ScrollBlock) {
        let Some(el) = self.resolve(el) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(js_scroll(behavior));
        options.set_block(match block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
        });
        el.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(js_scroll(behavior));
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn supports_touch(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
    }
}

/// Milliseconds since the bridge attached.
#[derive(Clone)]
struct Clock {
    window: Window,
    origin: f64,
}

impl Clock {
    fn start(window: &Window) -> Self {
        Self {
            window: window.clone(),
            origin: performance_now(window),
        }
    }

    fn now(&self) -> Millis {
        (performance_now(&self.window) - self.origin).max(0.0) as Millis
    }
}

fn performance_now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn target_of(dom: &BrowserDom, event: &Event) -> Option<ElementId> {
    let el = event.target()?.dyn_into::<Element>().ok()?;
    Some(dom.intern(el))
}

fn image_target(dom: &BrowserDom, event: &Event) -> Option<ElementId> {
    let img = event.target()?.dyn_into::<HtmlImageElement>().ok()?;
    Some(dom.intern(img.into()))
}

type SharedPage = Rc<RefCell<Page<BrowserDom>>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

/// One-shot `setTimeout` aimed at the page's next due timer.
struct Wakeup {
    window: Window,
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Wakeup {
    fn new(window: &Window, page: &SharedPage, clock: Clock) -> Rc<Self> {
        let wakeup = Rc::new(Self {
            window: window.clone(),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });
        let weak: Weak<Self> = Rc::downgrade(&wakeup);
        let page = Rc::clone(page);
        let callback = Closure::<dyn FnMut()>::new(move || {
            let Some(wakeup) = weak.upgrade() else {
                return;
            };
            wakeup.handle.set(None);
            // A busy page re-arms when its current borrower finishes.
            if let Ok(mut page) = page.try_borrow_mut() {
                page.advance_to(clock.now());
                wakeup.arm(&page);
            }
        });
        *wakeup.callback.borrow_mut() = Some(callback);
        wakeup
    }

    /// Replace any pending wakeup with one for the page's next timer.
    fn arm(&self, page: &Page<BrowserDom>) {
        self.cancel();
        let Some(delay) = page.wake_delay() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        let delay = i32::try_from(delay).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
            Ok(id) => self.handle.set(Some(id)),
            Err(err) => tracing::warn!(error = %describe(&err), "setTimeout failed"),
        }
    }

    fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

/// Forwards DOM events into a [`Page`] and wakes it when timers are due.
///
/// Dropping the bridge removes every listener and cancels the pending wakeup.
pub struct Bridge {
    clock: Clock,
    wakeup: Rc<Wakeup>,
    listeners: Vec<Listener>,
}

impl Bridge {
    pub fn attach(page: &SharedPage) -> Result<Self, JsValue> {
        let window = page.borrow().dom().window().clone();
        let document = window.document().ok_or("no document")?;
        let clock = Clock::start(&window);
        let mut bridge = Self {
            wakeup: Wakeup::new(&window, page, clock.clone()),
            clock,
            listeners: Vec::new(),
        };

        let doc: EventTarget = document.into();
        let win: EventTarget = window.clone().into();

        bridge.listen(&doc, "click", false, page, |dom, event| {
            Some(PageEvent::Click {
                target: target_of(dom, event)?,
            })
        })?;
        bridge.listen(&doc, "keydown", false, page, |dom, event| {
            let key = event.dyn_ref::<KeyboardEvent>()?.key();
            Some(PageEvent::KeyDown {
                target: target_of(dom, event),
                key: Key::from_dom(&key),
            })
        })?;
        bridge.listen(&doc, "touchstart", false, page, |dom, event| {
            Some(PageEvent::TouchStart {
                target: target_of(dom, event)?,
            })
        })?;
        bridge.listen(&doc, "touchend", false, page, |dom, event| {
            Some(PageEvent::TouchEnd {
                target: target_of(dom, event)?,
            })
        })?;

        // These do not bubble; listen in the capture phase.
        bridge.listen(&doc, "mouseenter", true, page, |dom, event| {
            Some(PageEvent::MouseEnter {
                target: target_of(dom, event)?,
            })
        })?;
        bridge.listen(&doc, "mouseleave", true, page, |dom, event| {
            Some(PageEvent::MouseLeave {
                target: target_of(dom, event)?,
            })
        })?;
        bridge.listen(&doc, "load", true, page, |dom, event| {
            Some(PageEvent::ImageLoaded {
                target: image_target(dom, event)?,
            })
        })?;
        bridge.listen(&doc, "error", true, page, |dom, event| {
            Some(PageEvent::ImageFailed {
                target: image_target(dom, event)?,
            })
        })?;

        bridge.listen(&win, "scroll", false, page, |_, _| Some(PageEvent::Scroll))?;
        bridge.listen(&win, "resize", false, page, |_, _| Some(PageEvent::Resize))?;
        let load_window = window.clone();
        bridge.listen(&win, "load", false, page, move |_, _| {
            Some(PageEvent::Load {
                elapsed_ms: performance_now(&load_window).round() as u64,
            })
        })?;

        Ok(bridge)
    }

    /// Bring the page's clock up to date before calling into it.
    pub fn sync(&self, page: &mut Page<BrowserDom>) {
        page.advance_to(self.clock.now());
    }

    /// Schedule the next wakeup after the page's timers changed.
    pub fn rearm(&self, page: &Page<BrowserDom>) {
        self.wakeup.arm(page);
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        capture: bool,
        page: &SharedPage,
        translate: impl Fn(&BrowserDom, &Event) -> Option<PageEvent> + 'static,
    ) -> Result<(), JsValue> {
        let page = Rc::clone(page);
        let clock = self.clock.clone();
        let wakeup = Rc::clone(&self.wakeup);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Ok(mut page) = page.try_borrow_mut() else {
                tracing::debug!(kind, "page busy, event dropped");
                return;
            };
            let Some(page_event) = translate(page.dom(), &event) else {
                return;
            };
            page.advance_to(clock.now());
            if page.dispatch(page_event).default_prevented {
                event.prevent_default();
            }
            wakeup.arm(&page);
        });
        target.add_event_listener_with_callback_and_bool(
            kind,
            callback.as_ref().unchecked_ref(),
            capture,
        )?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            capture,
            callback,
        });
        Ok(())
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.wakeup.cancel();
        for listener in self.listeners.drain(..) {
            report(
                listener.target.remove_event_listener_with_callback_and_bool(
                    listener.kind,
                    listener.callback.as_ref().unchecked_ref(),
                    listener.capture,
                ),
                "remove_event_listener",
            );
        }
    }
}
