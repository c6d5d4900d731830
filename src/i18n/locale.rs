//! Locale type: validated locale representation and detection.

use crate::error::LocaleError;
use crate::i18n::{LocaleConfig, LocaleRegistry};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// A validated locale.
///
/// Only registered, enabled locales can be constructed. Locales order by
/// their position in the registry, not alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO 639-1 language code (e.g., "en", "es")
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const SPANISH: Locale = Locale { code: "es" };
    pub const FRENCH: Locale = Locale { code: "fr" };
    pub const GERMAN: Locale = Locale { code: "de" };
    pub const CHINESE: Locale = Locale { code: "zh" };
    pub const JAPANESE: Locale = Locale { code: "ja" };

    /// Create a Locale from a code string.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered and enabled
    /// * `Err` if the code is not found or the locale is disabled
    pub fn from_code(code: &str) -> Result<Locale, LocaleError> {
        let normalized = code.trim().to_ascii_lowercase();
        let registry = LocaleRegistry::get();

        match registry.get_by_code(&normalized) {
            Some(config) if config.enabled => Ok(Locale { code: config.code }),
            Some(_) => Err(LocaleError::Disabled(normalized)),
            None => Err(LocaleError::Unknown(code.to_string())),
        }
    }

    /// Get the canonical (source) locale.
    pub fn canonical() -> Locale {
        let config = LocaleRegistry::get().canonical();
        Locale { code: config.code }
    }

    /// All enabled locales in registry order (for switcher UIs).
    pub fn available() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not in the registry. This cannot happen for a
    /// Locale built through `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be registered")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn flag(&self) -> &'static str {
        self.config().flag
    }

    /// Whether this locale is written right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.config().rtl
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }

    fn position(&self) -> usize {
        LocaleRegistry::get()
            .position(self.code)
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl PartialOrd for Locale {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Locale {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position()
            .cmp(&other.position())
            .then_with(|| self.code.cmp(other.code))
    }
}

/// Reduce a browser locale string to its primary language subtag.
///
/// Accepts plain tags (`fr-CH`, `pt_BR`) as well as `Accept-Language`
/// lists, in which case only the first entry is considered.
fn primary_subtag(browser_locale: &str) -> &str {
    let first = browser_locale.split(',').next().unwrap_or("");
    let tag = first.split(';').next().unwrap_or("");
    tag.split(['-', '_']).next().unwrap_or("").trim()
}

/// Resolve the locale for a request.
///
/// Priority: URL locale > cookie locale > browser primary subtag > default.
/// Unsupported or disabled candidates are skipped silently, so the result
/// is always an enabled locale.
///
/// # Arguments
/// * `url_locale` - Locale segment from the request path, if any
/// * `browser_locale` - Browser language (`navigator.language` or an
///   `Accept-Language` header)
/// * `cookie_locale` - Value of the `locale` cookie, if any
/// * `default` - Locale used when nothing else matches
pub fn detect_locale(
    url_locale: Option<&str>,
    browser_locale: Option<&str>,
    cookie_locale: Option<&str>,
    default: Locale,
) -> Locale {
    let candidates = [
        ("url", url_locale),
        ("cookie", cookie_locale),
        ("browser", browser_locale.map(primary_subtag)),
    ];

    for (origin, candidate) in candidates {
        if let Some(code) = candidate {
            match Locale::from_code(code) {
                Ok(locale) => {
                    debug!("Locale '{}' resolved from {}", locale, origin);
                    return locale;
                }
                Err(e) => debug!("Skipping {} locale: {}", origin, e),
            }
        }
    }

    default
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_english() {
        let locale = Locale::from_code("en").expect("Should succeed");
        assert_eq!(locale, Locale::ENGLISH);
        assert_eq!(locale.name(), "English");
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(Locale::from_code("DE").unwrap(), Locale::GERMAN);
        assert_eq!(Locale::from_code(" ja ").unwrap(), Locale::JAPANESE);
    }

    #[test]
    fn test_from_code_unknown() {
        let result = Locale::from_code("pt");
        assert_eq!(result, Err(LocaleError::Unknown("pt".to_string())));
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_disabled() {
        assert_eq!(
            Locale::from_code("ar"),
            Err(LocaleError::Disabled("ar".to_string()))
        );
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Locale::from_code("").is_err());
    }

    // ==================== Metadata Tests ====================

    #[test]
    fn test_canonical_is_english() {
        assert_eq!(Locale::canonical(), Locale::ENGLISH);
        assert!(Locale::ENGLISH.is_canonical());
        assert!(!Locale::FRENCH.is_canonical());
    }

    #[test]
    fn test_native_names_and_flags() {
        assert_eq!(Locale::SPANISH.native_name(), "Español");
        assert_eq!(Locale::JAPANESE.native_name(), "日本語");
        assert_eq!(Locale::GERMAN.flag(), "🇩🇪");
        assert!(!Locale::CHINESE.is_rtl());
    }

    #[test]
    fn test_available_in_registry_order() {
        assert_eq!(
            Locale::available(),
            vec![
                Locale::ENGLISH,
                Locale::SPANISH,
                Locale::FRENCH,
                Locale::GERMAN,
                Locale::CHINESE,
                Locale::JAPANESE
            ]
        );
    }

    #[test]
    fn test_ordering_follows_registry() {
        assert!(Locale::ENGLISH < Locale::SPANISH);
        assert!(Locale::GERMAN < Locale::CHINESE);
        let mut locales = vec![Locale::JAPANESE, Locale::ENGLISH, Locale::FRENCH];
        locales.sort();
        assert_eq!(locales, vec![Locale::ENGLISH, Locale::FRENCH, Locale::JAPANESE]);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Locale::FRENCH.to_string(), "fr");
    }

    // ==================== Detection Tests ====================

    #[test]
    fn test_detect_prefers_url() {
        let locale = detect_locale(Some("fr"), Some("de-DE"), Some("es"), Locale::ENGLISH);
        assert_eq!(locale, Locale::FRENCH);
    }

    #[test]
    fn test_detect_cookie_beats_browser() {
        let locale = detect_locale(None, Some("de-DE"), Some("es"), Locale::ENGLISH);
        assert_eq!(locale, Locale::SPANISH);
    }

    #[test]
    fn test_detect_reduces_browser_region() {
        let locale = detect_locale(None, Some("ja-JP"), None, Locale::ENGLISH);
        assert_eq!(locale, Locale::JAPANESE);
    }

    #[test]
    fn test_detect_accept_language_list() {
        let locale = detect_locale(None, Some("zh-CN,zh;q=0.9,en;q=0.8"), None, Locale::ENGLISH);
        assert_eq!(locale, Locale::CHINESE);
    }

    #[test]
    fn test_detect_skips_unsupported_in_priority_order() {
        let locale = detect_locale(Some("pt"), Some("de-AT"), Some("xx"), Locale::ENGLISH);
        assert_eq!(locale, Locale::GERMAN);
    }

    #[test]
    fn test_detect_skips_disabled_locale() {
        let locale = detect_locale(Some("ar"), None, None, Locale::SPANISH);
        assert_eq!(locale, Locale::SPANISH);
    }

    #[test]
    fn test_detect_falls_back_to_default() {
        assert_eq!(detect_locale(None, None, None, Locale::GERMAN), Locale::GERMAN);
    }

    proptest! {
        #[test]
        fn prop_detect_always_returns_enabled_locale(
            url in proptest::option::of("[a-zA-Z_-]{0,8}"),
            browser in proptest::option::of("[a-zA-Z,;=.0-9_-]{0,16}"),
            cookie in proptest::option::of("[a-zA-Z]{0,4}"),
        ) {
            let locale = detect_locale(
                url.as_deref(),
                browser.as_deref(),
                cookie.as_deref(),
                Locale::canonical(),
            );
            prop_assert!(LocaleRegistry::get().is_enabled(locale.code()));
        }
    }
}
