//! FAQ accordion.
//!
//! Each question's next sibling is its answer. Opening one answer closes every
//! other, so at most one answer is open at a time.

use page_core::{Dom, ElementId, Key, Millis, PageEvent, ScrollBehavior, ScrollBlock, TimerId};

use crate::config::PageConfig;
use crate::runtime::{Component, Cx, Task};

pub struct Accordion {
    question: String,
    answer: String,
    scroll_delay: Millis,
}

impl Accordion {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            question: config.selectors.faq_question.clone(),
            answer: config.selectors.faq_answer.clone(),
            scroll_delay: config.timing.accordion_scroll_delay_ms,
        }
    }

    fn close_all(&self, cx: &mut Cx<'_>) {
        for answer in cx.select_all(&self.answer) {
            cx.dom.set_style(answer, "display", "none");
            if let Some(question) = cx.dom.previous_element_sibling(answer) {
                cx.dom.remove_class(question, "active");
            }
        }
    }

    fn toggle(&self, question: ElementId, cx: &mut Cx<'_>) {
        let Some(answer) = cx.dom.next_element_sibling(question) else {
            return;
        };
        let was_open = is_open(&*cx.dom, answer);

        self.close_all(cx);

        if !was_open {
            cx.dom.set_style(answer, "display", "block");
            cx.dom.add_class(question, "active");
            cx.schedule(self.scroll_delay, Task::ScrollToAnswer(answer));
        }
    }
}

fn is_open(dom: &dyn Dom, answer: ElementId) -> bool {
    dom.style(answer, "display").as_deref() == Some("block")
}

impl Component for Accordion {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn mount(&mut self, cx: &mut Cx<'_>) {
        for question in cx.select_all(&self.question) {
            cx.dom.set_attr(question, "tabindex", "0");
            cx.dom.set_attr(question, "role", "button");
        }
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        match event {
            PageEvent::Click { target } => {
                if let Some(question) = cx.dom.closest(*target, &self.question) {
                    self.toggle(question, cx);
                }
            }
            PageEvent::KeyDown { key: Key::Escape, .. } => self.close_all(cx),
            PageEvent::KeyDown {
                target: Some(target),
                key,
            } if key.is_activation() => {
                if cx.dom.matches(*target, &self.question).unwrap_or(false) {
                    cx.prevent_default();
                    cx.click(*target);
                }
            }
            _ => {}
        }
    }

    fn handle_task(&mut self, task: Task, _timer: TimerId, cx: &mut Cx<'_>) {
        if let Task::ScrollToAnswer(answer) = task {
            cx.dom
                .scroll_into_view(answer, ScrollBehavior::Smooth, ScrollBlock::Nearest);
        }
    }
}
