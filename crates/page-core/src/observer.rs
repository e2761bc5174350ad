//! Viewport intersection, emulating one-shot intersection observers.

use crate::{Dom, ElementId, Viewport};

/// Trigger options for an [`Observer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the element that must be visible, in `[0, 1]`.
    /// Zero means any overlap.
    pub threshold: f64,
    /// Pixels trimmed from the bottom of the viewport (a negative root margin).
    pub bottom_margin: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            bottom_margin: 0.0,
        }
    }
}

/// Visible fraction of an element spanning `[top, top + height)` in
/// document coordinates.
///
/// A zero-height element counts as fully visible when its top edge lies
/// inside the trimmed viewport, as an empty `<img>` does. Elements that
/// generate no box at all are filtered by [`Observer::take_intersecting`].
pub fn intersection_ratio(top: f64, height: f64, viewport: &Viewport, bottom_margin: f64) -> f64 {
    let root_top = viewport.scroll_y;
    let root_bottom = viewport.scroll_y + (viewport.height - bottom_margin).max(0.0);

    if height <= 0.0 {
        return if top >= root_top && top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }

    let overlap = (top + height).min(root_bottom) - top.max(root_top);
    (overlap.max(0.0) / height).min(1.0)
}

/// Whether `ratio` crosses `threshold`.
pub fn crosses_threshold(ratio: f64, threshold: f64) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

/// Set of observed elements that are dropped once they intersect.
#[derive(Debug, Clone, Default)]
pub struct Observer {
    options: ObserverOptions,
    targets: Vec<ElementId>,
}

impl Observer {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn observe(&mut self, el: ElementId) {
        if !self.targets.contains(&el) {
            self.targets.push(el);
        }
    }

    pub fn unobserve(&mut self, el: ElementId) {
        self.targets.retain(|t| *t != el);
    }

    pub fn is_observing(&self, el: ElementId) -> bool {
        self.targets.contains(&el)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    /// Remove and return every observed element currently intersecting,
    /// in observation order. Unrendered targets never intersect.
    pub fn take_intersecting(&mut self, dom: &dyn Dom) -> Vec<ElementId> {
        let viewport = dom.viewport();
        let options = self.options;
        let targets = std::mem::take(&mut self.targets);
        let (hits, rest): (Vec<ElementId>, Vec<ElementId>) = targets.into_iter().partition(|el| {
            if !dom.is_rendered(*el) {
                return false;
            }
            let ratio = intersection_ratio(
                dom.offset_top(*el),
                dom.offset_height(*el),
                &viewport,
                options.bottom_margin,
            );
            crosses_threshold(ratio, options.threshold)
        });
        self.targets = rest;
        hits
    }
}
