//! In-memory document used to run the page without a browser.
//!
//! Elements live in a `Vec` and are addressed by index. Removed elements keep
//! their slot so handles held by components stay valid.

use crate::selector::{ElementView, SelectorList};
use crate::{Dom, ElementId, ImageState, PageResult, ScrollBehavior, ScrollBlock, Viewport};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    text: String,
    value: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    top: f64,
    height: f64,
    image: ImageState,
}

/// A scroll request recorded by [`VirtualDocument`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    IntoView {
        target: ElementId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    },
    To {
        top: f64,
        behavior: ScrollBehavior,
    },
}

/// Arena-backed [`Dom`] with explicit layout and viewport.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    nodes: Vec<Node>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    focused: Option<ElementId>,
    viewport: Viewport,
    touch: bool,
    scrolls: Vec<ScrollRequest>,
}

impl Default for VirtualDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDocument {
    /// Create a document containing `<html>`, `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
            focused: None,
            viewport: Viewport {
                scroll_y: 0.0,
                width: 1280.0,
                height: 800.0,
                document_height: 800.0,
            },
            touch: false,
            scrolls: Vec::new(),
        };
        doc.root = doc.alloc("html");
        doc.head = doc.alloc("head");
        doc.body = doc.alloc("body");
        doc.link(doc.root, doc.head);
        doc.link(doc.root, doc.body);
        doc
    }

    fn alloc(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        id
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.0)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.0)
    }

    fn link(&mut self, parent: ElementId, child: ElementId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, el: ElementId) {
        let Some(parent) = self.node(el).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != el);
        }
        if let Some(node) = self.node_mut(el) {
            node.parent = None;
        }
    }

    fn descendants(&self, root: ElementId, out: &mut Vec<ElementId>) {
        if let Some(node) = self.node(root) {
            for child in &node.children {
                out.push(*child);
                self.descendants(*child, out);
            }
        }
    }

    /// Create an element with whitespace-separated `classes` and append it to `parent`.
    pub fn element(&mut self, parent: ElementId, tag: &str, classes: &str) -> ElementId {
        let el = self.alloc(tag);
        if let Some(node) = self.node_mut(el) {
            node.classes = classes.split_whitespace().map(String::from).collect();
        }
        self.link(parent, el);
        el
    }

    /// Position an element in document coordinates.
    pub fn set_layout(&mut self, el: ElementId, top: f64, height: f64) {
        if let Some(node) = self.node_mut(el) {
            node.top = top;
            node.height = height;
        }
    }

    /// Mark an image as loaded or failed.
    pub fn set_image_state(&mut self, el: ElementId, state: ImageState) {
        if let Some(node) = self.node_mut(el) {
            node.image = state;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    pub fn set_window_width(&mut self, width: f64) {
        self.viewport.width = width;
    }

    pub fn set_value(&mut self, el: ElementId, value: &str) {
        if let Some(node) = self.node_mut(el) {
            node.value = value.to_string();
        }
    }

    pub fn set_touch_support(&mut self, touch: bool) {
        self.touch = touch;
    }

    /// Scroll requests issued so far, oldest first.
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    /// Number of elements ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ElementView for VirtualDocument {
    fn view_tag(&self, el: ElementId) -> String {
        self.tag_name(el)
    }

    fn view_has_class(&self, el: ElementId, class: &str) -> bool {
        self.has_class(el, class)
    }

    fn view_attr(&self, el: ElementId, name: &str) -> Option<String> {
        self.attr(el, name)
    }

    fn view_parent(&self, el: ElementId) -> Option<ElementId> {
        self.parent(el)
    }
}

impl Dom for VirtualDocument {
    fn body(&self) -> ElementId {
        self.body
    }

    fn head(&self) -> ElementId {
        self.head
    }

    fn query_all_in(&self, root: Option<ElementId>, selector: &str) -> PageResult<Vec<ElementId>> {
        let selectors = SelectorList::parse(selector)?;
        let mut candidates = Vec::new();
        self.descendants(root.unwrap_or(self.root), &mut candidates);
        Ok(candidates
            .into_iter()
            .filter(|el| selectors.matches(self, *el))
            .collect())
    }

    fn matches(&self, el: ElementId, selector: &str) -> PageResult<bool> {
        Ok(SelectorList::parse(selector)?.matches(self, el))
    }

    fn tag_name(&self, el: ElementId) -> String {
        self.node(el).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            node.classes.retain(|c| c != class);
        }
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<String> {
        let node = self.node(el)?;
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(String::from).collect();
            return;
        }
        match node.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attr(&mut self, el: ElementId, name: &str) {
        if let Some(node) = self.node_mut(el) {
            node.attrs.retain(|(k, _)| k != name);
        }
    }

    fn text(&self, el: ElementId) -> String {
        let Some(node) = self.node(el) else {
            return String::new();
        };
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&self.text(*child));
        }
        text
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        let children = self.node(el).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.detach(child);
        }
        if let Some(node) = self.node_mut(el) {
            node.text = text.to_string();
        }
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.node(el)?
            .styles
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        if value.is_empty() {
            node.styles.retain(|(k, _)| k != property);
            return;
        }
        match node.styles.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => node.styles.push((property.to_string(), value.to_string())),
        }
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el)?.parent
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.node(el).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.alloc(tag)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        self.link(parent, child);
    }

    fn remove(&mut self, el: ElementId) {
        if self.focused == Some(el) {
            self.focused = None;
        }
        self.detach(el);
    }

    fn is_connected(&self, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(candidate) = current {
            if candidate == self.root {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    fn is_rendered(&self, el: ElementId) -> bool {
        if !self.is_connected(el) {
            return false;
        }
        let mut current = Some(el);
        while let Some(candidate) = current {
            if self.style(candidate, "display").as_deref() == Some("none") {
                return false;
            }
            current = self.parent(candidate);
        }
        true
    }

    fn image_state(&self, el: ElementId) -> ImageState {
        self.node(el).map(|n| n.image).unwrap_or_default()
    }

    fn focus(&mut self, el: ElementId) {
        if self.node(el).is_some() {
            self.focused = Some(el);
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        self.focused
    }

    fn value(&self, el: ElementId) -> String {
        self.node(el).map(|n| n.value.clone()).unwrap_or_default()
    }

    fn offset_top(&self, el: ElementId) -> f64 {
        self.node(el).map(|n| n.top).unwrap_or(0.0)
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.node(el).map(|n| n.height).unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_into_view(&mut self, el: ElementId, behavior: ScrollBehavior, block: ScrollBlock) {
        self.scrolls.push(ScrollRequest::IntoView {
            target: el,
            behavior,
            block,
        });
        let top = self.offset_top(el);
        self.viewport.scroll_y = top.min(self.viewport.scrollable_height()).max(0.0);
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push(ScrollRequest::To { top, behavior });
        self.viewport.scroll_y = top.min(self.viewport.scrollable_height()).max(0.0);
    }

    fn supports_touch(&self) -> bool {
        self.touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq_fixture() -> (VirtualDocument, ElementId, ElementId) {
        let mut doc = VirtualDocument::new();
        let body = doc.body();
        let item = doc.element(body, "div", "faq-item");
        let question = doc.element(item, "div", "faq-question");
        let answer = doc.element(item, "div", "faq-answer");
        (doc, question, answer)
    }

    #[test]
    fn test_query_in_document_order() {
        let (doc, question, answer) = faq_fixture();
        assert_eq!(doc.query_all(".faq-question, .faq-answer"), vec![question, answer]);
        assert_eq!(doc.query(".faq-item .faq-answer"), Some(answer));
    }

    #[test]
    fn test_siblings_and_closest() {
        let (mut doc, question, answer) = faq_fixture();
        assert_eq!(doc.next_element_sibling(question), Some(answer));
        assert_eq!(doc.previous_element_sibling(answer), Some(question));
        assert_eq!(doc.previous_element_sibling(question), None);

        let span = doc.element(question, "span", "");
        assert_eq!(doc.closest(span, ".faq-question"), Some(question));
        assert_eq!(doc.index_in_parent(answer), Some(1));
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let (mut doc, question, _) = faq_fixture();
        let item = doc.parent(question).unwrap();
        doc.remove(item);
        assert!(!doc.is_connected(question));
        assert!(doc.query_all(".faq-question").is_empty());
    }

    #[test]
    fn test_set_text_replaces_children() {
        let (mut doc, question, _) = faq_fixture();
        let strong = doc.element(question, "strong", "");
        doc.set_text(strong, "S사이즈");
        assert_eq!(doc.text(question), "S사이즈");
        doc.set_text(question, "plain");
        assert_eq!(doc.text(question), "plain");
        assert!(doc.children(question).is_empty());
    }

    #[test]
    fn test_styles_and_attributes() {
        let (mut doc, question, _) = faq_fixture();
        doc.set_style(question, "transform", "scale(1.05)");
        assert_eq!(doc.style(question, "transform").as_deref(), Some("scale(1.05)"));
        doc.set_style(question, "transform", "");
        assert_eq!(doc.style(question, "transform"), None);

        doc.set_attr(question, "tabindex", "0");
        assert_eq!(doc.attr(question, "tabindex").as_deref(), Some("0"));
        doc.set_attr(question, "class", "faq-question active");
        assert!(doc.has_class(question, "active"));
    }

    #[test]
    fn test_scroll_to_clamps_to_document() {
        let mut doc = VirtualDocument::new();
        doc.set_viewport(Viewport {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
            document_height: 2000.0,
        });
        doc.scroll_to(5000.0, ScrollBehavior::Smooth);
        assert_eq!(doc.viewport().scroll_y, 1200.0);
        assert_eq!(doc.scroll_requests().len(), 1);
    }

    #[test]
    fn test_display_none_ancestor_hides_element() {
        let (mut doc, question, answer) = faq_fixture();
        let item = doc.parent(question).unwrap();
        assert!(doc.is_rendered(answer));

        doc.set_style(item, "display", "none");
        assert!(!doc.is_rendered(answer));
        doc.set_style(item, "display", "");
        assert!(doc.is_rendered(answer));

        doc.remove(answer);
        assert!(!doc.is_rendered(answer));
    }
}
