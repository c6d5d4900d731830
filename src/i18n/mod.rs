//! Internationalization (i18n) module for multi-locale support.
//!
//! This module provides a centralized architecture for everything
//! locale-related: which locales exist, how a request picks one, how
//! translation bundles are loaded and resolved, and how values are
//! formatted for display.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `locale`: Type-safe `Locale` type and request locale detection
//! - `format`: Locale-aware date, number and currency formatting
//! - `translations`: Bundle flattening, key resolution, interpolation, plurals
//! - `loader`: Cached loading of bundles with a fallback locale
//! - `cookie`: Persisting the locale choice and document attributes
//! - `provider`: Current locale state machine and the `I18nContext` snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use site_content::i18n::{detect_locale, Locale};
//!
//! let locale = detect_locale(None, Some("fr-CH, fr;q=0.9"), None, Locale::canonical());
//! assert_eq!(locale, Locale::FRENCH);
//! ```

mod cookie;
mod format;
mod loader;
mod locale;
mod provider;
mod registry;
mod translations;

pub use self::cookie::{
    parse_cookie_locale, DocumentLanguage, LocaleCookie, TextDirection, LOCALE_COOKIE_MAX_AGE,
    LOCALE_COOKIE_NAME,
};
pub use format::{format_currency, format_date, format_number};
pub use loader::{translation_path, TranslationLoader, TRANSLATIONS_PREFIX};
pub use locale::{detect_locale, Locale};
pub use provider::{I18nContext, I18nProvider, ProviderEvent, ProviderStatus};
pub use registry::{CurrencyPosition, FormatRules, LocaleConfig, LocaleRegistry};
pub use translations::{
    flatten_translations, interpolate, translate_key, translate_plural, BundleMetadata, Params,
    PluralCategory, TranslationBundle, METADATA_KEY,
};
