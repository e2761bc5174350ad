//! Document abstraction shared by the in-memory document and the browser.

use std::fmt;

use crate::PageResult;

/// Handle to an element owned by a [`Dom`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of the window's scroll state and dimensions, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Current vertical scroll offset.
    pub scroll_y: f64,
    /// Inner width of the window.
    pub width: f64,
    /// Inner height of the window.
    pub height: f64,
    /// Full height of the document body.
    pub document_height: f64,
}

impl Viewport {
    /// Scrollable distance, never negative.
    pub fn scrollable_height(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }

    /// Scroll position as a fraction of the scrollable distance, in `[0, 1]`.
    ///
    /// Returns 0 when the document is not taller than the window.
    pub fn scroll_fraction(&self) -> f64 {
        let scrollable = self.scrollable_height();
        if scrollable <= 0.0 {
            return 0.0;
        }
        (self.scroll_y / scrollable).clamp(0.0, 1.0)
    }
}

/// How a scroll request should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Vertical alignment for [`Dom::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    #[default]
    Start,
    Nearest,
}

/// Load state of an `<img>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageState {
    /// Still loading, or not an image.
    #[default]
    Pending,
    Loaded,
    /// Finished without decodable data.
    Failed,
}

/// Minimal document interface the page components are written against.
///
/// Implemented by [`crate::VirtualDocument`] for tests and by the browser
/// bridge on wasm32. All element handles come from the same implementation.
pub trait Dom {
    /// The `<body>` element.
    fn body(&self) -> ElementId;

    /// The `<head>` element.
    fn head(&self) -> ElementId;

    /// All elements matching `selector`, in document order, optionally
    /// restricted to descendants of `root`.
    fn query_all_in(&self, root: Option<ElementId>, selector: &str) -> PageResult<Vec<ElementId>>;

    /// Whether `el` matches `selector`.
    fn matches(&self, el: ElementId, selector: &str) -> PageResult<bool>;

    /// Lowercase tag name.
    fn tag_name(&self, el: ElementId) -> String;

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);

    fn attr(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attr(&mut self, el: ElementId, name: &str, value: &str);
    fn remove_attr(&mut self, el: ElementId, name: &str);

    /// Text content of the element and its descendants.
    fn text(&self, el: ElementId) -> String;

    /// Replace the element's content with plain text.
    fn set_text(&mut self, el: ElementId, text: &str);

    /// Inline style property, `None` when unset.
    fn style(&self, el: ElementId, property: &str) -> Option<String>;

    /// Set an inline style property. An empty value clears it.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Element children in document order.
    fn children(&self, el: ElementId) -> Vec<ElementId>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> ElementId;

    /// Append `child` to `parent`, moving it if already attached.
    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Detach `el` from its parent. No-op for detached elements.
    ///
    /// Hosts may release the handles of `el` and its descendants, so callers
    /// must not reattach a removed element.
    fn remove(&mut self, el: ElementId);

    /// Whether `el` is attached to the document.
    fn is_connected(&self, el: ElementId) -> bool;

    /// Whether `el` generates a box. False for detached elements and for
    /// elements under `display: none`.
    fn is_rendered(&self, el: ElementId) -> bool;

    /// Load state of an image element.
    fn image_state(&self, el: ElementId) -> ImageState;

    fn focus(&mut self, el: ElementId);
    fn active_element(&self) -> Option<ElementId>;

    /// Current value of a form control, empty for other elements.
    fn value(&self, el: ElementId) -> String;

    /// Distance from the top of the document.
    fn offset_top(&self, el: ElementId) -> f64;
    fn offset_height(&self, el: ElementId) -> f64;

    fn viewport(&self) -> Viewport;

    fn scroll_into_view(&mut self, el: ElementId, behavior: ScrollBehavior, block: ScrollBlock);
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Whether the environment delivers touch events.
    fn supports_touch(&self) -> bool;

    fn clear_style(&mut self, el: ElementId, property: &str) {
        self.set_style(el, property, "");
    }

    /// All matching elements in the document. Unsupported selectors match nothing.
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.query_all_in(None, selector).unwrap_or_default()
    }

    /// First matching element in the document.
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// First matching descendant of `root`.
    fn query_in(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        self.query_all_in(Some(root), selector)
            .unwrap_or_default()
            .into_iter()
            .next()
    }

    /// Nearest inclusive ancestor of `el` matching `selector`.
    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(candidate) = current {
            if self.matches(candidate, selector).unwrap_or(false) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Position of `el` among its parent's element children.
    fn index_in_parent(&self, el: ElementId) -> Option<usize> {
        let parent = self.parent(el)?;
        self.children(parent).iter().position(|c| *c == el)
    }

    fn next_element_sibling(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.parent(el)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| *c == el)?;
        siblings.get(index + 1).copied()
    }

    fn previous_element_sibling(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.parent(el)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| *c == el)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_fraction() {
        let vp = Viewport {
            scroll_y: 500.0,
            width: 1280.0,
            height: 1000.0,
            document_height: 3000.0,
        };
        assert!((vp.scroll_fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_fraction_short_document() {
        let vp = Viewport {
            scroll_y: 0.0,
            width: 1280.0,
            height: 1000.0,
            document_height: 800.0,
        };
        assert_eq!(vp.scrollable_height(), 0.0);
        assert_eq!(vp.scroll_fraction(), 0.0);
    }
}
