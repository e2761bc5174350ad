//! Cart orders and the persisted wishlist.

use serde::{Deserialize, Serialize};

use super::{Size, SizeCatalog, Won};

/// An add-to-cart request built per click and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartOrder {
    pub product_id: String,
    pub name: String,
    /// Size as displayed ("L사이즈").
    pub size: String,
    pub price: Won,
}

impl CartOrder {
    /// Order for `size` at `price` with ids derived from `id_prefix`.
    pub fn new(id_prefix: &str, name: &str, size: Size, price: Won) -> Self {
        Self {
            product_id: format!("{}-{}", id_prefix, size.label().to_lowercase()),
            name: name.to_string(),
            size: size.display_name(),
            price,
        }
    }
}

/// Loosely typed product payload accepted by the exposed `addToCart`.
///
/// Fields are passed through as given. Missing or empty ones fall back to
/// the small bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub size: Option<String>,
    pub price: Option<u64>,
}

/// Size recorded when the payload names none.
pub const DEFAULT_SIZE_LABEL: &str = "S";

fn given(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ProductData {
    /// Build an order, filling only the fields the caller left out.
    pub fn into_order(self, default_id: &str, default_name: &str) -> CartOrder {
        CartOrder {
            product_id: given(self.id).unwrap_or_else(|| default_id.to_string()),
            name: given(self.name).unwrap_or_else(|| default_name.to_string()),
            size: given(self.size).unwrap_or_else(|| DEFAULT_SIZE_LABEL.to_string()),
            price: self
                .price
                .filter(|p| *p > 0)
                .map(Won)
                .unwrap_or_else(|| SizeCatalog::default().price_of(Size::S)),
        }
    }
}

/// Wishlisted product ids, in insertion order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist(Vec<String>);

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.0.iter().any(|id| id == product_id)
    }

    /// Add or remove `product_id`. Returns whether it is present afterwards.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        match self.0.iter().position(|id| id == product_id) {
            Some(index) => {
                self.0.remove(index);
                false
            }
            None => {
                self.0.push(product_id.to_string());
                true
            }
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
