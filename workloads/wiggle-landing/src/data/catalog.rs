//! The cooler bag's size options.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Won;

/// Bag size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Size {
    #[default]
    S,
    L,
}

impl Size {
    pub fn label(&self) -> &'static str {
        match self {
            Size::S => "S",
            Size::L => "L",
        }
    }

    /// Size name as printed on the page ("S사이즈").
    pub fn display_name(&self) -> String {
        format!("{}사이즈", self.label())
    }

    /// In-page order anchor (`#order-s`).
    pub fn order_anchor(&self) -> String {
        format!("#order-{}", self.label().to_lowercase())
    }

    /// Read a size from option text such as `"L사이즈"`.
    pub fn parse_label(text: &str) -> Option<Self> {
        let mut chars = text.trim().chars();
        let size = match chars.next()?.to_ascii_uppercase() {
            'S' => Size::S,
            'L' => Size::L,
            _ => return None,
        };
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => None,
            _ => Some(size),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One selectable size with its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub size: Size,
    pub price: Won,
    pub is_active: bool,
}

impl SizeOption {
    /// Call-to-action label for this option.
    pub fn cta_label(&self) -> String {
        format!(
            "💛 {}사이즈 주문하기 ({})",
            self.size.label(),
            self.price.display()
        )
    }
}

/// The fixed two-option size set. Exactly one option is active.
///
/// Option order matches the size buttons on the page: index 0 is S, index 1 is L.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCatalog {
    options: [SizeOption; 2],
}

impl Default for SizeCatalog {
    fn default() -> Self {
        Self {
            options: [
                SizeOption {
                    size: Size::S,
                    price: Won(13_900),
                    is_active: true,
                },
                SizeOption {
                    size: Size::L,
                    price: Won(18_500),
                    is_active: false,
                },
            ],
        }
    }
}

impl SizeCatalog {
    pub fn options(&self) -> &[SizeOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&SizeOption> {
        self.options.get(index)
    }

    /// List price of `size`.
    pub fn price_of(&self, size: Size) -> Won {
        self.options
            .iter()
            .find(|o| o.size == size)
            .map(|o| o.price)
            .unwrap_or(self.options[0].price)
    }

    /// The active option (index 0 if none is marked, which `select` prevents).
    pub fn active(&self) -> &SizeOption {
        self.options
            .iter()
            .find(|o| o.is_active)
            .unwrap_or(&self.options[0])
    }

    pub fn active_index(&self) -> usize {
        self.options.iter().position(|o| o.is_active).unwrap_or(0)
    }

    /// Make `index` the only active option. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<&SizeOption> {
        if index >= self.options.len() {
            return None;
        }
        for (i, option) in self.options.iter_mut().enumerate() {
            option.is_active = i == index;
        }
        self.options.get(index)
    }
}
