//! Page components.
//!
//! Each component attaches to part of the document and reacts to events and
//! timers through a [`Cx`](crate::runtime::Cx). The order of
//! [`standard_set`] is the order handlers run for every event.

mod accordion;
mod analytics;
mod cart;
mod easter_egg;
mod effects;
mod floating_button;
mod forms;
mod images;
mod loading;
mod notifications;
mod price_counter;
mod progress;
mod responsive;
mod reveal;
mod size_selector;
mod smooth_scroll;
mod testimonials;

pub use accordion::*;
pub use analytics::*;
pub use cart::*;
pub use easter_egg::*;
pub use effects::*;
pub use floating_button::*;
pub use forms::*;
pub use images::*;
pub use loading::*;
pub use notifications::*;
pub use price_counter::*;
pub use progress::*;
pub use responsive::*;
pub use reveal::*;
pub use size_selector::*;
pub use smooth_scroll::*;
pub use testimonials::*;

use crate::config::PageConfig;
use crate::runtime::Component;

/// Every component of the landing page, in handler order.
///
/// Click tracking runs before the cart buttons so tracked button text never
/// includes the loading spinner.
pub fn standard_set(config: &PageConfig) -> Vec<Box<dyn Component>> {
    vec![
        Box::new(Accordion::new(config)),
        Box::new(SizeSelector::new(config)),
        Box::new(SmoothScrolling::new(config)),
        Box::new(HoverEffects::new(config)),
        Box::new(ImageHandling::new()),
        Box::new(LazyImages::new(config)),
        Box::new(ScrollReveal::new(config)),
        Box::new(PriceCounter::new(config)),
        Box::new(ScrollProgress::new()),
        Box::new(FloatingOrderButton::new(config)),
        Box::new(ClickTracking::new(config)),
        Box::new(CartButtons::new(config)),
        Box::new(TestimonialRotator::new(config)),
        Box::new(EasterEgg::new(config)),
        Box::new(ImageZoom::new(config)),
        Box::new(TouchFeedback::new(config)),
        Box::new(ResponsiveTitle::new(config)),
        Box::new(ScrollDepthTracker::new(config)),
        Box::new(PerformanceReporter),
    ]
}
