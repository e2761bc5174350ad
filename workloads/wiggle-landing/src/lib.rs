//! Wiggle Wiggle smile cooler bag landing page.
//!
//! This workload provides the page's interactive behavior:
//! - FAQ accordion, size selector and smooth in-page scrolling
//! - Scroll reveals, price count-up, progress bar and floating order button
//! - Simulated cart and a persisted wishlist
//! - Toast notifications and analytics tracking
//!
//! Everything runs against the [`page_core::Dom`] trait, so the same
//! components drive the browser on wasm32 and a `VirtualDocument` in tests.

pub mod components;
pub mod config;
pub mod data;
pub mod runtime;

#[cfg(target_arch = "wasm32")]
mod api;
#[cfg(target_arch = "wasm32")]
mod browser;

pub use components::NotificationKind;
pub use config::PageConfig;
pub use data::{CartOrder, Size, SizeCatalog, Won};
pub use runtime::{Component, Cx, Page, Task, LOAD_BANNER};

#[cfg(target_arch = "wasm32")]
pub use api::WiggleWiggle;

/// Page name attached to every log entry.
pub const PAGE_NAME: &str = "wiggle-landing";
