//! Page configuration.
//!
//! Every field has a default matching the production page, so an empty
//! document (`{}` or an empty TOML file) is a valid configuration.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use page_core::selector::SelectorList;
use page_core::ObserverOptions;
use page_observability::{LogFormat, LogLevel, SessionId, StructuredLogger};

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// CSS selectors the components attach to.
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Delays, durations and debounce windows.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Visibility triggers.
    #[serde(default)]
    pub observers: ObserverConfig,

    /// Product and storage settings.
    #[serde(default)]
    pub product: ProductConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seed for cosmetic randomness (confetti).
    #[serde(default = "default_seed")]
    pub confetti_seed: u64,
}

fn default_seed() -> u64 {
    0x5EED
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: SelectorConfig::default(),
            timing: TimingConfig::default(),
            observers: ObserverConfig::default(),
            product: ProductConfig::default(),
            logging: LoggingConfig::default(),
            confetti_seed: default_seed(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).context("Failed to parse JSON page config")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML page config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check ratios, counts and selector syntax.
    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [
            ("observers.reveal_threshold", self.observers.reveal_threshold),
            ("observers.price_threshold", self.observers.price_threshold),
            ("observers.lazy_threshold", self.observers.lazy_threshold),
        ] {
            ensure!((0.0..=1.0).contains(&ratio), "{} must be within [0, 1], got {}", name, ratio);
        }
        ensure!(self.timing.price_steps > 0, "timing.price_steps must be positive");
        ensure!(self.timing.price_step_ms > 0, "timing.price_step_ms must be positive");
        ensure!(
            self.timing.testimonial_interval_ms > 0,
            "timing.testimonial_interval_ms must be positive"
        );
        ensure!(self.timing.visible_testimonials > 0, "timing.visible_testimonials must be positive");
        ensure!(self.timing.easter_egg_clicks > 0, "timing.easter_egg_clicks must be positive");

        for (name, selector) in self.selectors.named() {
            SelectorList::parse(selector)
                .with_context(|| format!("selectors.{} is not a supported selector", name))?;
        }
        Ok(())
    }
}

/// CSS selectors used by the components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub faq_question: String,
    pub faq_answer: String,
    pub size_option: String,
    pub cta_button: String,
    pub community_button: String,
    pub reveal_targets: String,
    /// Reveal targets whose reveal is staggered by sibling index.
    pub grid_items: String,
    pub sale_price: String,
    pub hero: String,
    pub hero_title: String,
    pub cta_section: String,
    pub header: String,
    pub brand_logo: String,
    pub review_card: String,
    pub in_page_links: String,
    pub hover_targets: String,
    pub zoom_images: String,
    pub touch_targets: String,
    pub lazy_images: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            faq_question: ".faq-question".into(),
            faq_answer: ".faq-answer".into(),
            size_option: ".size-option".into(),
            cta_button: ".cta-button".into(),
            community_button: ".community-button".into(),
            reveal_targets:
                ".problem-card, .usp-card, .feature-item, .review-card, .community-item, .faq-item"
                    .into(),
            grid_items: ".problem-card, .usp-card, .review-card, .community-item".into(),
            sale_price: ".sale-price".into(),
            hero: ".hero".into(),
            hero_title: ".hero-title".into(),
            cta_section: ".cta-section".into(),
            header: ".header".into(),
            brand_logo: ".brand-logo".into(),
            review_card: ".review-card".into(),
            in_page_links: "a[href^=\"#\"]".into(),
            hover_targets: ".problem-card, .usp-card, .review-card, .community-item, .cta-button, .community-button, .size-option".into(),
            zoom_images: ".hero-image img, .problem-image img, .solution-image img, .review-image img, .event-image img, .cta-image img, .faq-image img, .community-image img".into(),
            touch_targets: ".cta-button, .community-button, .size-option, .problem-card, .usp-card".into(),
            lazy_images: "img[data-src]".into(),
        }
    }
}

impl SelectorConfig {
    fn named(&self) -> [(&'static str, &str); 19] {
        [
            ("faq_question", self.faq_question.as_str()),
            ("faq_answer", self.faq_answer.as_str()),
            ("size_option", self.size_option.as_str()),
            ("cta_button", self.cta_button.as_str()),
            ("community_button", self.community_button.as_str()),
            ("reveal_targets", self.reveal_targets.as_str()),
            ("grid_items", self.grid_items.as_str()),
            ("sale_price", self.sale_price.as_str()),
            ("hero", self.hero.as_str()),
            ("hero_title", self.hero_title.as_str()),
            ("cta_section", self.cta_section.as_str()),
            ("header", self.header.as_str()),
            ("brand_logo", self.brand_logo.as_str()),
            ("review_card", self.review_card.as_str()),
            ("in_page_links", self.in_page_links.as_str()),
            ("hover_targets", self.hover_targets.as_str()),
            ("zoom_images", self.zoom_images.as_str()),
            ("touch_targets", self.touch_targets.as_str()),
            ("lazy_images", self.lazy_images.as_str()),
        ]
    }
}

/// Timing constants, all in milliseconds unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub accordion_scroll_delay_ms: u64,
    pub size_pulse_ms: u64,
    pub reveal_stagger_ms: u64,
    /// Number of count-up steps.
    pub price_steps: u32,
    pub price_step_ms: u64,
    pub toast_enter_delay_ms: u64,
    pub toast_hold_ms: u64,
    pub toast_exit_ms: u64,
    pub cart_latency_ms: u64,
    pub resize_debounce_ms: u64,
    pub scroll_depth_debounce_ms: u64,
    pub testimonial_interval_ms: u64,
    /// Number of review cards shown at once.
    pub visible_testimonials: usize,
    /// Logo clicks needed to trigger the easter egg.
    pub easter_egg_clicks: u32,
    pub easter_egg_window_ms: u64,
    /// Number of confetti pieces per burst.
    pub confetti_count: usize,
    pub confetti_lifetime_ms: u64,
    pub touch_release_ms: u64,
    /// Window width (px) below which the hero title shrinks.
    pub mobile_breakpoint_px: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            accordion_scroll_delay_ms: 100,
            size_pulse_ms: 200,
            reveal_stagger_ms: 100,
            price_steps: 50,
            price_step_ms: 30,
            toast_enter_delay_ms: 100,
            toast_hold_ms: 3000,
            toast_exit_ms: 300,
            cart_latency_ms: 1000,
            resize_debounce_ms: 250,
            scroll_depth_debounce_ms: 500,
            testimonial_interval_ms: 5000,
            visible_testimonials: 3,
            easter_egg_clicks: 5,
            easter_egg_window_ms: 2000,
            confetti_count: 50,
            confetti_lifetime_ms: 5000,
            touch_release_ms: 150,
            mobile_breakpoint_px: 768.0,
        }
    }
}

/// Visibility thresholds for the emulated intersection observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub reveal_threshold: f64,
    /// Pixels trimmed from the bottom of the viewport for reveals.
    pub reveal_bottom_margin: f64,
    pub price_threshold: f64,
    pub lazy_threshold: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            reveal_bottom_margin: 50.0,
            price_threshold: 0.5,
            lazy_threshold: 0.0,
        }
    }
}

impl ObserverConfig {
    pub fn reveal(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.reveal_threshold,
            bottom_margin: self.reveal_bottom_margin,
        }
    }

    pub fn price(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.price_threshold,
            bottom_margin: 0.0,
        }
    }

    pub fn lazy(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.lazy_threshold,
            bottom_margin: 0.0,
        }
    }
}

/// Product identity and the wishlist slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Prefix of cart product ids, completed with the size (`smile-cooler-l`).
    pub product_id_prefix: String,
    /// Product id for `addToCart` payloads that carry none.
    pub default_product_id: String,
    pub product_name: String,
    /// Storage key of the wishlist array.
    pub wishlist_key: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            product_id_prefix: "smile-cooler".into(),
            default_product_id: "smile-cooler-bag".into(),
            product_name: "Smile We Love 보냉백".into(),
            wishlist_key: "wishlist".into(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Console logger for one page view.
    pub fn logger(&self, session_id: SessionId, page: &str) -> StructuredLogger {
        StructuredLogger::new(session_id)
            .with_page(page)
            .with_min_level(self.level)
            .with_format(self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_documents_yield_defaults() {
        assert_eq!(PageConfig::from_json_str("{}").unwrap(), PageConfig::default());
        assert_eq!(PageConfig::from_toml_str("").unwrap(), PageConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = PageConfig::from_toml_str(
            r#"
            [timing]
            cart_latency_ms = 10

            [logging]
            level = "warn"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.cart_latency_ms, 10);
        assert_eq!(config.timing.toast_hold_ms, 3000);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = PageConfig::from_json_str(r#"{"observers": {"price_threshold": 1.5}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("price_threshold"));
    }

    #[test]
    fn test_rejects_unsupported_selector() {
        let err = PageConfig::from_json_str(r#"{"selectors": {"hero": "main > .hero"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("selectors.hero"));
    }

    #[test]
    fn test_logger_follows_settings() {
        let logging = LoggingConfig {
            level: LogLevel::Warn,
            format: LogFormat::Json,
        };
        let logger = logging.logger(SessionId::from_string("pv-1"), "wiggle-landing");
        assert_eq!(logger.session_id().0, "pv-1");
    }

    #[test]
    fn test_rejects_zero_steps() {
        assert!(PageConfig::from_json_str(r#"{"timing": {"price_steps": 0}}"#).is_err());
    }
}
