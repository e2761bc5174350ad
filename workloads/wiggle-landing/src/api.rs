//! JavaScript surface, published as `window.WiggleWiggle`.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use page_core::{KeyValueStore, LocalStorage, UnavailableStore};
use page_observability::SessionId;

use crate::browser::{Bridge, BrowserDom};
use crate::components::NotificationKind;
use crate::config::PageConfig;
use crate::data::ProductData;
use crate::runtime::Page;
use crate::PAGE_NAME;

/// Optional `<script type="application/json">` holding a page configuration.
const CONFIG_ELEMENT_ID: &str = "wiggle-config";

/// Boot the page once the document is parsed.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    if document.ready_state() != "loading" {
        return publish();
    }
    let boot = Closure::once_into_js(|| {
        if let Err(err) = publish() {
            web_sys::console::error_1(&err);
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", boot.unchecked_ref())
}

fn publish() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let config = window
        .document()
        .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    let page = WiggleWiggle::new(config)?;
    js_sys::Reflect::set(&window, &JsValue::from_str("WiggleWiggle"), &JsValue::from(page))?;
    Ok(())
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Convert a JS value through JSON. `undefined` and `null` become `T::default()`.
fn from_js<T: DeserializeOwned + Default>(value: &JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    let json: String = js_sys::JSON::stringify(value)?.into();
    serde_json::from_str(&json).map_err(js_error)
}

/// A mounted landing page with its browser bridge.
#[wasm_bindgen]
pub struct WiggleWiggle {
    page: Rc<RefCell<Page<BrowserDom>>>,
    bridge: Bridge,
}

#[wasm_bindgen]
impl WiggleWiggle {
    /// Mount the page over the current document. `config` is optional JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WiggleWiggle, JsValue> {
        let config = match config {
            Some(json) => PageConfig::from_json_str(&json).map_err(|e| js_error(format!("{:#}", e)))?,
            None => PageConfig::default(),
        };
        let session = SessionId::from_epoch_millis(js_sys::Date::now() as u64);
        let logger = config.logging.logger(session, PAGE_NAME);

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(store) => Box::new(store),
            Err(err) => {
                logger
                    .warn_builder("Storage unavailable, wishlist will not persist")
                    .field("error", err.to_string())
                    .emit();
                Box::new(UnavailableStore)
            }
        };

        let dom = BrowserDom::new().map_err(js_error)?;
        let page = Rc::new(RefCell::new(Page::new(dom, config, store, logger)));
        let bridge = Bridge::attach(&page)?;
        let wiggle = Self { page, bridge };
        wiggle.with_page(|page| {
            page.mount();
            // window.load has already fired when the module boots late.
            if let Some(load) = page.dom().missed_load() {
                page.dispatch(load);
            }
        })?;
        Ok(wiggle)
    }

    #[wasm_bindgen(js_name = trackEvent)]
    pub fn track_event(&self, name: &str, data: JsValue) -> Result<(), JsValue> {
        let data: Value = match from_js::<Option<Value>>(&data)? {
            Some(value) => value,
            None => Value::Object(Default::default()),
        };
        self.with_page(|page| page.track_event(name, data))
    }

    #[wasm_bindgen(js_name = showNotification)]
    pub fn show_notification(&self, message: &str, kind: Option<String>) -> Result<(), JsValue> {
        let kind = kind.as_deref().map(NotificationKind::parse).unwrap_or_default();
        self.with_page(|page| {
            page.show_notification(message, kind);
        })
    }

    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(&self, product: JsValue) -> Result<(), JsValue> {
        let data: ProductData = from_js(&product)?;
        self.with_page(|page| {
            let product = &page.config().product;
            let order = data.into_order(&product.default_product_id, &product.product_name);
            page.add_to_cart(&order);
        })
    }

    #[wasm_bindgen(js_name = toggleWishlist)]
    pub fn toggle_wishlist(&self, product_id: &str) -> Result<bool, JsValue> {
        self.with_page(|page| page.toggle_wishlist(product_id))
    }

    #[wasm_bindgen(js_name = validateForm)]
    pub fn validate_form(&self, form: Element) -> Result<bool, JsValue> {
        self.with_page(|page| {
            let form = page.dom().intern(form);
            page.validate_form(form)
        })
    }

    /// Overlay a spinner on `element` and return it.
    #[wasm_bindgen(js_name = showLoadingState)]
    pub fn show_loading_state(&self, element: Element) -> Result<Option<Element>, JsValue> {
        self.with_page(|page| {
            let element = page.dom().intern(element);
            let loader = page.show_loading_state(element);
            page.dom().resolve(loader)
        })
    }

    #[wasm_bindgen(js_name = hideLoadingState)]
    pub fn hide_loading_state(&self, loader: Element) -> Result<(), JsValue> {
        self.with_page(|page| {
            let loader = page.dom().intern(loader);
            page.hide_loading_state(loader);
        })
    }
}

impl WiggleWiggle {
    /// Run `f` on the page with its clock current, then re-arm the wakeup.
    fn with_page<R>(&self, f: impl FnOnce(&mut Page<BrowserDom>) -> R) -> Result<R, JsValue> {
        let mut page = self
            .page
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("page is busy"))?;
        self.bridge.sync(&mut page);
        let result = f(&mut page);
        self.bridge.rearm(&page);
        Ok(result)
    }
}
