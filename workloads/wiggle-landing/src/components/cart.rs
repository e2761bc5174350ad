//! Cart buttons and wishlist.
//!
//! There is no commerce backend: "adding to cart" waits out a fixed latency
//! behind a spinner, then confirms with a toast and an analytics event.

use serde_json::json;

use page_core::{load_json, store_json, Dom, ElementId, Millis, PageEvent, TimerId};

use crate::config::PageConfig;
use crate::data::{CartOrder, Size, SizeCatalog, Won, Wishlist};
use crate::runtime::{Component, Cx, Task};

use super::{hide_loading_state, show_loading_state, NotificationKind};

pub const ADDED_TO_CART: &str = "장바구니에 추가되었습니다! 🛒";
pub const WISHLIST_ADDED: &str = "위시리스트에 추가되었습니다! 💝";
pub const WISHLIST_REMOVED: &str = "위시리스트에서 제거되었습니다";

/// Confirm an order: log it, show a toast and track `add_to_cart`.
pub fn add_to_cart(cx: &mut Cx<'_>, order: &CartOrder) {
    cx.logger()
        .info_builder("Adding to cart")
        .field("product_id", order.product_id.as_str())
        .field("size", order.size.as_str())
        .field_i64("price", order.price.amount() as i64)
        .emit();

    cx.notify(ADDED_TO_CART, NotificationKind::Success);

    cx.track(
        "add_to_cart",
        json!({
            "product_id": order.product_id,
            "product_name": order.name,
            "size": order.size,
            "price": order.price.amount(),
        }),
    );
}

/// Toggle `product_id` in the stored wishlist. Returns whether it is present afterwards.
///
/// The stored list is read, changed and written back whole. An unreadable
/// slot is logged and treated as an empty list.
pub fn toggle_wishlist(cx: &mut Cx<'_>, product_id: &str) -> bool {
    let key = cx.config().product.wishlist_key.clone();

    let mut wishlist = match load_json::<Wishlist>(&*cx.services.store, &key) {
        Ok(stored) => stored.unwrap_or_default(),
        Err(err) => {
            cx.logger()
                .warn_builder("Wishlist unreadable, starting empty")
                .field("error", err.to_string())
                .emit();
            Wishlist::new()
        }
    };

    let added = wishlist.toggle(product_id);

    if let Err(err) = store_json(&*cx.services.store, &key, &wishlist) {
        cx.logger()
            .warn_builder("Wishlist not saved")
            .field("error", err.to_string())
            .emit();
    }

    if added {
        cx.notify(WISHLIST_ADDED, NotificationKind::Success);
    } else {
        cx.notify(WISHLIST_REMOVED, NotificationKind::Info);
    }

    cx.track(
        "wishlist_toggle",
        json!({
            "product_id": product_id,
            "action": if added { "add" } else { "remove" },
        }),
    );

    added
}

/// Turns CTA clicks into simulated add-to-cart requests.
pub struct CartButtons {
    cta: String,
    size_option: String,
    latency: Millis,
    id_prefix: String,
    product_name: String,
}

impl CartButtons {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            cta: config.selectors.cta_button.clone(),
            size_option: config.selectors.size_option.clone(),
            latency: config.timing.cart_latency_ms,
            id_prefix: config.product.product_id_prefix.clone(),
            product_name: config.product.product_name.clone(),
        }
    }

    /// Order for the active size option.
    ///
    /// The option's `strong` and `.size-price` text win; missing pieces come
    /// from the catalog entry at the option's position, then from the default size.
    pub fn current_order(&self, cx: &Cx<'_>) -> CartOrder {
        let catalog = SizeCatalog::default();
        let options = cx.select_all(&self.size_option);
        let active = options
            .iter()
            .position(|o| cx.dom.has_class(*o, "active"));

        let fallback = active
            .and_then(|index| catalog.get(index))
            .unwrap_or_else(|| catalog.active());
        let option = active.map(|index| options[index]);

        let size = option
            .and_then(|el| cx.dom.query_in(el, "strong"))
            .and_then(|el| Size::parse_label(&cx.dom.text(el)))
            .unwrap_or(fallback.size);
        let price = option
            .and_then(|el| cx.dom.query_in(el, ".size-price"))
            .and_then(|el| Won::parse_digits(&cx.dom.text(el)))
            .unwrap_or(fallback.price);

        CartOrder::new(&self.id_prefix, &self.product_name, size, price)
    }
}

impl Component for CartButtons {
    fn name(&self) -> &'static str {
        "cart-buttons"
    }

    fn mount(&mut self, _cx: &mut Cx<'_>) {}

    fn handle_event(&mut self, event: &PageEvent, cx: &mut Cx<'_>) {
        let PageEvent::Click { target } = event else {
            return;
        };
        let Some(button) = cx.dom.closest(*target, &self.cta) else {
            return;
        };
        cx.prevent_default();

        let order = self.current_order(cx);
        let loader = show_loading_state(&mut *cx.dom, button);
        cx.schedule(self.latency, Task::CompleteOrder { loader, order });
    }

    fn handle_task(&mut self, task: Task, _timer: TimerId, cx: &mut Cx<'_>) {
        if let Task::CompleteOrder { loader, order } = task {
            hide_loading_state(&mut *cx.dom, loader);
            add_to_cart(cx, &order);
        }
    }
}

/// Spinner currently shown on `button`, if any.
pub fn pending_spinner(dom: &dyn Dom, button: ElementId) -> Option<ElementId> {
    dom.query_in(button, &format!(".{}", super::SPINNER_CLASS))
}
