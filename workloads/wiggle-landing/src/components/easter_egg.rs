//! Hidden confetti burst after rapid clicks on the brand logo.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use page_core::{Dom, ElementId, Millis, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

use super::NotificationKind;

pub const EASTER_EGG_MESSAGE: &str = "위글위글 숨겨진 기능 발견! 🎉";

const CONFETTI_KEYFRAMES: &str = "@keyframes confettiFall {
    to {
        transform: translateY(100vh) rotate(360deg);
        opacity: 0;
    }
}";

const CONFETTI_COLORS: [&str; 2] = ["#FFDD67", "#F76560"];

/// Look of one confetti piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiPiece {
    pub color: &'static str,
    /// Horizontal start position, percent of the window width.
    pub left_percent: f64,
    /// Fall animation length in seconds.
    pub fall_secs: f64,
}

impl ConfettiPiece {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let color = if rng.gen_bool(0.5) {
            CONFETTI_COLORS[0]
        } else {
            CONFETTI_COLORS[1]
        };
        Self {
            color,
            left_percent: rng.gen_range(0.0..100.0),
            fall_secs: rng.gen_range(2.0..5.0),
        }
    }

    fn spawn(&self, dom: &mut dyn Dom) -> ElementId {
        let el = dom.create_element("div");
        dom.add_class(el, "confetti");
        let left = format!("{}%", self.left_percent);
        let animation = format!("confettiFall {}s linear forwards", self.fall_secs);
        for (property, value) in [
            ("position", "fixed"),
            ("width", "10px"),
            ("height", "10px"),
            ("background", self.color),
            ("top", "-10px"),
            ("left", left.as_str()),
            ("z-index", "10000"),
            ("pointer-events", "none"),
            ("animation", animation.as_str()),
        ] {
            dom.set_style(el, property, value);
        }
        let body = dom.body();
        dom.append_child(body, el);
        el
    }
}

pub struct EasterEgg {
    logo: String,
    needed: u32,
    window: Millis,
    pieces: usize,
    lifetime: Millis,
    clicks: u32,
    reset: Option<TimerId>,
    rng: SmallRng,
    style: Option<ElementId>,
}

impl EasterEgg {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            logo: config.selectors.brand_logo.clone(),
            needed: config.timing.easter_egg_clicks,
            window: config.timing.easter_egg_window_ms,
            pieces: config.timing.confetti_count,
            lifetime: config.timing.confetti_lifetime_ms,
            clicks: 0,
            reset: None,
            rng: SmallRng::seed_from_u64(config.confetti_seed),
            style: None,
        }
    }

    /// Logo clicks counted so far.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    fn celebrate(&mut self, cx: &mut Cx<'_>) {
        cx.notify(EASTER_EGG_MESSAGE, NotificationKind::Success);
        for _ in 0..self.pieces {
            let piece = ConfettiPiece::random(&mut self.rng);
            let el = piece.spawn(&mut *cx.dom);
            cx.schedule(self.lifetime, Task::RemoveConfetti(el));
        }
    }
}

impl Component for EasterEgg {
    fn name(&self) -> &'static str {
        "easter-egg"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        let style = cx.dom.create_element("style");
        cx.dom.set_text(style, CONFETTI_KEYFRAMES);
        let head = cx.dom.head();
        cx.dom.append_child(head, style);
        self.style = Some(style);
    }

    fn unmount(&mut self, cx: &mut Cx<'_>) {
        if let Some(style) = self.style.take() {
            cx.dom.remove(style);
        }
        for confetti in cx.select_all(".confetti") {
            cx.dom.remove(confetti);
        }
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let PageEvent::Click { target } = event else {
            return;
        };
        if cx.dom.closest(*target, &self.logo).is_none() {
            return;
        }

        self.clicks += 1;
        if let Some(previous) = self.reset.take() {
            cx.cancel(previous);
        }
        self.reset = Some(cx.schedule(self.window, Task::ResetClicks));

        if self.clicks >= self.needed {
            self.celebrate(cx);
            self.clicks = 0;
        }
    }

    fn handle_task(&mut self, task: Task, timer: TimerId, cx: &mut Cx<'_>) {
        match task {
            Task::ResetClicks if self.reset == Some(timer) => {
                self.reset = None;
                self.clicks = 0;
            }
            Task::RemoveConfetti(el) => {
                if cx.dom.is_connected(el) {
                    cx.dom.remove(el);
                }
            }
            _ => {}
        }
    }
}
