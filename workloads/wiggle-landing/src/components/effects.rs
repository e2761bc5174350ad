//! Hover, zoom and touch feedback.

use page_core::{Dom, Millis, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

const HOVER_TRANSITION: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";
const REST_TRANSITION: &str = "all 0.3s ease";
const CTA_HOVER_SHADOW: &str = "0 20px 50px rgba(247, 101, 96, 0.4)";
const CTA_REST_SHADOW: &str = "0 15px 40px rgba(0,0,0,0.3)";

/// Transition curve and CTA shadow switches on hover.
pub struct HoverEffects {
    targets: String,
    cta: String,
}

impl HoverEffects {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            targets: config.selectors.hover_targets.clone(),
            cta: config.selectors.cta_button.clone(),
        }
    }
}

impl Component for HoverEffects {
    fn name(&self) -> &'static str {
        "hover-effects"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let (target, entering) = match event {
            PageEvent::MouseEnter { target } => (*target, true),
            PageEvent::MouseLeave { target } => (*target, false),
            _ => return,
        };
        if cx.dom.matches(target, &self.targets).unwrap_or(false) {
            let transition = if entering { HOVER_TRANSITION } else { REST_TRANSITION };
            cx.dom.set_style(target, "transition", transition);
        }
        if cx.dom.matches(target, &self.cta).unwrap_or(false) {
            let shadow = if entering { CTA_HOVER_SHADOW } else { CTA_REST_SHADOW };
            cx.dom.set_style(target, "box-shadow", shadow);
        }
    }
}

/// Slight zoom on section images under the pointer.
pub struct ImageZoom {
    images: String,
}

impl ImageZoom {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            images: config.selectors.zoom_images.clone(),
        }
    }
}

impl Component for ImageZoom {
    fn name(&self) -> &'static str {
        "image-zoom"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        match event {
            PageEvent::MouseEnter { target } => {
                if cx.dom.matches(*target, &self.images).unwrap_or(false) {
                    cx.dom.set_style(*target, "transform", "scale(1.05)");
                    cx.dom.set_style(*target, "transition", "transform 0.3s ease");
                }
            }
            PageEvent::MouseLeave { target } => {
                if cx.dom.matches(*target, &self.images).unwrap_or(false) {
                    cx.dom.set_style(*target, "transform", "scale(1)");
                }
            }
            _ => {}
        }
    }
}

/// Press feedback on touch devices.
pub struct TouchFeedback {
    targets: String,
    release: Millis,
    enabled: bool,
}

impl TouchFeedback {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            targets: config.selectors.touch_targets.clone(),
            release: config.timing.touch_release_ms,
            enabled: false,
        }
    }
}

impl Component for TouchFeedback {
    fn name(&self) -> &'static str {
        "touch-feedback"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        self.enabled = cx.dom.supports_touch();
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        if !self.enabled {
            return;
        }
        match event {
            PageEvent::TouchStart { target } => {
                if let Some(el) = cx.dom.closest(*target, &self.targets) {
                    cx.dom.set_style(el, "transform", "scale(0.98)");
                }
            }
            PageEvent::TouchEnd { target } => {
                if let Some(el) = cx.dom.closest(*target, &self.targets) {
                    cx.schedule(self.release, Task::ReleaseTouch(el));
                }
            }
            _ => {}
        }
    }

    fn handle_task(&mut self, task: Task, _timer: TimerId, cx: &mut Cx<'_>) {
        if let Task::ReleaseTouch(el) = task {
            cx.dom.clear_style(el, "transform");
        }
    }
}
