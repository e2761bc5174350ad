//! Image fade-in, broken image placeholders and lazy loading.

use page_core::{Dom, ElementId, ImageState, Observer, PageEvent};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx};

pub const PLACEHOLDER_TEXT: &str = "이미지를 여기에 넣어주세요";

/// Fades images in once loaded and swaps failed ones for a placeholder.
#[derive(Debug, Default)]
pub struct ImageHandling;

impl ImageHandling {
    pub fn new() -> Self {
        Self
    }
}

fn is_image(dom: &dyn Dom, el: ElementId) -> bool {
    dom.tag_name(el) == "img"
}

fn placeholder(dom: &mut dyn Dom) -> ElementId {
    let el = dom.create_element("div");
    dom.add_class(el, "image-placeholder");
    for (property, value) in [
        ("width", "100%"),
        ("height", "100%"),
        ("background", "linear-gradient(135deg, #f0f0f0, #e0e0e0)"),
        ("display", "flex"),
        ("align-items", "center"),
        ("justify-content", "center"),
        ("color", "#999"),
        ("font-size", "1rem"),
        ("border-radius", "inherit"),
    ] {
        dom.set_style(el, property, value);
    }
    dom.set_text(el, PLACEHOLDER_TEXT);
    el
}

fn show_loaded(dom: &mut dyn Dom, img: ElementId) {
    dom.set_style(img, "opacity", "1");
    dom.set_style(img, "transform", "scale(1)");
}

fn show_failed(cx: &mut Cx<'_>, img: ElementId) {
    cx.dom.set_style(img, "display", "none");
    let src = cx.dom.attr(img, "src").unwrap_or_default();
    cx.logger()
        .warn_builder(format!("Image not found: {}", src))
        .field("src", src.as_str())
        .emit();
    if let Some(parent) = cx.dom.parent(img) {
        let el = placeholder(&mut *cx.dom);
        cx.dom.append_child(parent, el);
    }
}

impl Component for ImageHandling {
    fn name(&self) -> &'static str {
        "image-handling"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        for img in cx.select_all("img") {
            cx.dom.set_style(img, "opacity", "0");
            cx.dom.set_style(img, "transform", "scale(0.95)");
            cx.dom
                .set_style(img, "transition", "opacity 0.3s ease, transform 0.3s ease");
            // Images that settled before mount will not fire load or error again.
            match cx.dom.image_state(img) {
                ImageState::Loaded => show_loaded(&mut *cx.dom, img),
                ImageState::Failed => show_failed(cx, img),
                ImageState::Pending => {}
            }
        }
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        match event {
            PageEvent::ImageLoaded { target } if is_image(&*cx.dom, *target) => {
                show_loaded(&mut *cx.dom, *target);
            }
            PageEvent::ImageFailed { target } if is_image(&*cx.dom, *target) => {
                show_failed(cx, *target);
            }
            _ => {}
        }
    }
}

/// Moves `data-src` into `src` when an image first nears the viewport.
pub struct LazyImages {
    selector: String,
    observer: Observer,
}

impl LazyImages {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            selector: config.selectors.lazy_images.clone(),
            observer: Observer::new(config.observers.lazy()),
        }
    }
}

impl Component for LazyImages {
    fn name(&self) -> &'static str {
        "lazy-images"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        for img in cx.select_all(&self.selector) {
            self.observer.observe(img);
        }
    }

    fn unmount(&mut self, _cx: &mut Cx<'_>) {
        self.observer.disconnect();
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if !matches!(
            event,
            PageEvent::Ready | PageEvent::Scroll | PageEvent::Resize | PageEvent::LayoutChanged
        ) {
            return;
        }
        for img in self.observer.take_intersecting(&*cx.dom) {
            if let Some(src) = cx.dom.attr(img, "data-src") {
                cx.dom.set_attr(img, "src", &src);
                cx.dom.remove_attr(img, "data-src");
            }
        }
    }
}
