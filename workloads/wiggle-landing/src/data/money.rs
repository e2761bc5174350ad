//! Korean won amounts.
//!
//! Won has no minor unit, so amounts are whole integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in KRW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Won(pub u64);

impl Won {
    /// Currency suffix used on the page.
    pub const SUFFIX: &'static str = "원";

    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> u64 {
        self.0
    }

    /// Read an amount from display text by keeping only its ASCII digits.
    ///
    /// ```
    /// use wiggle_landing::data::Won;
    /// assert_eq!(Won::parse_digits("18,500원"), Some(Won(18500)));
    /// assert_eq!(Won::parse_digits("가격 미정"), None);
    /// ```
    pub fn parse_digits(text: &str) -> Option<Self> {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().ok().map(Self)
    }

    /// Amount with ko-KR digit grouping and no suffix (e.g., "13,900").
    pub fn display_amount(&self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

    /// Format as shown on the page (e.g., "13,900원").
    pub fn display(&self) -> String {
        format!("{}{}", self.display_amount(), Self::SUFFIX)
    }
}

impl fmt::Display for Won {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
