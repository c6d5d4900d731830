//! Locale persistence: the `locale` cookie and document language attributes.

use crate::i18n::Locale;
use cookie::time::Duration;
use cookie::Cookie;

pub const LOCALE_COOKIE_NAME: &str = "locale";

/// One year, in seconds.
pub const LOCALE_COOKIE_MAX_AGE: i64 = 31_536_000;

/// The persisted locale choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleCookie {
    pub locale: Locale,
}

impl LocaleCookie {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        Cookie::build((LOCALE_COOKIE_NAME, self.locale.code()))
            .path("/")
            .max_age(Duration::seconds(LOCALE_COOKIE_MAX_AGE))
            .build()
    }

    /// Value for a `Set-Cookie` header or `document.cookie`.
    pub fn header_value(&self) -> String {
        self.to_cookie().to_string()
    }
}

/// Extract the raw `locale` value from a `Cookie` header.
///
/// Malformed pairs are skipped. The value is not validated; pass it to
/// `detect_locale`.
pub fn parse_cookie_locale(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == LOCALE_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// The `lang` and `dir` attributes of the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLanguage {
    pub lang: &'static str,
    pub dir: TextDirection,
}

impl DocumentLanguage {
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            lang: locale.code(),
            dir: if locale.is_rtl() {
                TextDirection::Rtl
            } else {
                TextDirection::Ltr
            },
        }
    }

    /// Attributes for the root element, e.g. `lang="fr" dir="ltr"`.
    pub fn attributes(&self) -> String {
        format!("lang=\"{}\" dir=\"{}\"", self.lang, self.dir.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_value() {
        let cookie = LocaleCookie::new(Locale::FRENCH);
        assert_eq!(cookie.header_value(), "locale=fr; Path=/; Max-Age=31536000");
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = LocaleCookie::new(Locale::GERMAN).to_cookie();
        assert_eq!(cookie.name(), "locale");
        assert_eq!(cookie.value(), "de");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(365)));
    }

    #[test]
    fn test_parse_cookie_locale() {
        assert_eq!(parse_cookie_locale("theme=dark; locale=de; x=1").as_deref(), Some("de"));
        assert_eq!(parse_cookie_locale("locale=es").as_deref(), Some("es"));
        assert_eq!(parse_cookie_locale("theme=dark"), None);
        assert_eq!(parse_cookie_locale("locale="), None);
        assert_eq!(parse_cookie_locale("mylocale=fr"), None);
    }

    #[test]
    fn test_parse_cookie_locale_skips_malformed_pairs() {
        assert_eq!(parse_cookie_locale("garbage; locale=ja").as_deref(), Some("ja"));
        assert_eq!(parse_cookie_locale("").as_deref(), None);
    }

    #[test]
    fn test_header_value_parses_back() {
        let header = LocaleCookie::new(Locale::SPANISH).header_value();
        assert_eq!(parse_cookie_locale(&header).as_deref(), Some("es"));
    }

    #[test]
    fn test_document_language() {
        let doc = DocumentLanguage::for_locale(Locale::JAPANESE);
        assert_eq!(doc.lang, "ja");
        assert_eq!(doc.dir, TextDirection::Ltr);
        assert_eq!(doc.attributes(), "lang=\"ja\" dir=\"ltr\"");
    }
}
