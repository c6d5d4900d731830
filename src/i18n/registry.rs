//! Locale registry: Single source of truth for all supported locales.
//!
//! This module provides a centralized registry of all locales the site can
//! be served in, together with the formatting rules used for dates, numbers
//! and prices. It uses a singleton pattern with `OnceLock` to ensure
//! thread-safe initialization and access.

use std::sync::OnceLock;

/// Where a currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    /// `$1,234.50`
    Before,
    /// `1.234,50 €` (separated by a no-break space)
    After,
}

/// Locale-specific formatting rules not covered by ICU number data.
///
/// Digit grouping and decimal separators come from CLDR through ICU4X;
/// the registry only decides which currency a locale prices in and how
/// short dates are laid out.
#[derive(Debug, Clone)]
pub struct FormatRules {
    /// ISO 4217 code of the locale's default currency
    pub currency_code: &'static str,

    /// Display symbol of the default currency
    pub currency_symbol: &'static str,

    pub currency_position: CurrencyPosition,

    /// Number of fraction digits shown for prices (0 for JPY)
    pub currency_digits: usize,

    /// `chrono` strftime pattern for short dates
    pub date_pattern: &'static str,
}

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en", "es")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Spanish")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Español")
    pub native_name: &'static str,

    /// Flag glyph shown in locale switchers
    pub flag: &'static str,

    /// Whether text in this locale is written right-to-left
    pub rtl: bool,

    /// Whether this is the canonical/source locale (only one should be true)
    pub is_canonical: bool,

    /// Whether this locale is enabled for use
    pub enabled: bool,

    pub format: FormatRules,
}

/// Global locale registry singleton.
///
/// Initialized once on first access and immutable thereafter. Registry order
/// is significant: it is the order locales are offered in switchers and the
/// order used when picking "the first available" locale.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 code (e.g., "en", "es"), matched exactly
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists (enabled or not)
    /// * `None` if the locale is not registered
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all enabled locales, in registry order.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// Get all locales (including disabled ones).
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the canonical locale configuration.
    ///
    /// # Panics
    /// Panics if no canonical locale is found or if multiple canonical
    /// locales are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LocaleConfig {
        let canonical: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_canonical)
            .collect();

        match canonical.len() {
            0 => panic!("No canonical locale found in registry"),
            1 => canonical[0],
            _ => panic!("Multiple canonical locales found in registry"),
        }
    }

    /// Check if a locale code is registered and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }

    /// Position of a locale in registry order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.locales.iter().position(|locale| locale.code == code)
    }
}

/// Default locale configurations.
///
/// Arabic is registered (so right-to-left layout metadata exists) but stays
/// disabled until its translation bundle ships.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            flag: "🇺🇸",
            rtl: false,
            is_canonical: true,
            enabled: true,
            format: FormatRules {
                currency_code: "USD",
                currency_symbol: "$",
                currency_position: CurrencyPosition::Before,
                currency_digits: 2,
                date_pattern: "%m/%d/%Y",
            },
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            flag: "🇪🇸",
            rtl: false,
            is_canonical: false,
            enabled: true,
            format: FormatRules {
                currency_code: "EUR",
                currency_symbol: "€",
                currency_position: CurrencyPosition::After,
                currency_digits: 2,
                date_pattern: "%d/%m/%Y",
            },
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            flag: "🇫🇷",
            rtl: false,
            is_canonical: false,
            enabled: true,
            format: FormatRules {
                currency_code: "EUR",
                currency_symbol: "€",
                currency_position: CurrencyPosition::After,
                currency_digits: 2,
                date_pattern: "%d/%m/%Y",
            },
        },
        LocaleConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            flag: "🇩🇪",
            rtl: false,
            is_canonical: false,
            enabled: true,
            format: FormatRules {
                currency_code: "EUR",
                currency_symbol: "€",
                currency_position: CurrencyPosition::After,
                currency_digits: 2,
                date_pattern: "%d.%m.%Y",
            },
        },
        LocaleConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
            flag: "🇨🇳",
            rtl: false,
            is_canonical: false,
            enabled: true,
            format: FormatRules {
                currency_code: "CNY",
                currency_symbol: "¥",
                currency_position: CurrencyPosition::Before,
                currency_digits: 2,
                date_pattern: "%Y/%m/%d",
            },
        },
        LocaleConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            flag: "🇯🇵",
            rtl: false,
            is_canonical: false,
            enabled: true,
            format: FormatRules {
                currency_code: "JPY",
                currency_symbol: "￥",
                currency_position: CurrencyPosition::Before,
                currency_digits: 0,
                date_pattern: "%Y/%m/%d",
            },
        },
        LocaleConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            flag: "🇸🇦",
            rtl: true,
            is_canonical: false,
            enabled: false,
            format: FormatRules {
                currency_code: "SAR",
                currency_symbol: "ر.س",
                currency_position: CurrencyPosition::After,
                currency_digits: 2,
                date_pattern: "%d/%m/%Y",
            },
        },
    ]
}
