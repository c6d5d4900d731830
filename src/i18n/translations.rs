//! Translation bundles: flattening, key resolution, interpolation and
//! pluralization.

use crate::i18n::Locale;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::OnceLock;
use tracing::warn;

/// Reserved subtree name holding bundle bookkeeping, never translations.
pub const METADATA_KEY: &str = "metadata";

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Bookkeeping carried in a bundle's top-level `metadata` subtree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleMetadata {
    pub version: Option<String>,

    /// Share of canonical keys translated, 0-100
    pub completeness: Option<f64>,

    pub last_updated: Option<String>,
}

/// Flattened translations for exactly one locale.
#[derive(Debug, Clone)]
pub struct TranslationBundle {
    locale: Locale,
    entries: HashMap<String, String>,
    metadata: Option<BundleMetadata>,
}

impl TranslationBundle {
    pub fn new(locale: Locale, entries: HashMap<String, String>) -> Self {
        Self {
            locale,
            entries,
            metadata: None,
        }
    }

    /// A bundle with no translations; every lookup resolves to its key.
    pub fn empty(locale: Locale) -> Self {
        Self::new(locale, HashMap::new())
    }

    /// Build a bundle from a nested translation document.
    pub fn from_json(locale: Locale, document: &Value) -> Self {
        let metadata = document
            .get(METADATA_KEY)
            .and_then(|raw| BundleMetadata::deserialize(raw).ok());

        Self {
            locale,
            entries: flatten_translations(document),
            metadata,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metadata(&self) -> Option<&BundleMetadata> {
        self.metadata.as_ref()
    }

    /// Resolve `key` against this bundle, interpolating `params`.
    pub fn translate(&self, key: &str, params: &Params) -> String {
        translate_key(key, self, Some(params), None)
    }
}

/// Named values substituted into `{{name}}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, stringified with its `Display` impl.
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Flatten a nested translation document into dot-notation keys.
///
/// Any key named `metadata`, at any depth, is skipped with its whole
/// subtree. String leaves are kept verbatim, `null` leaves are dropped and
/// other scalars (and arrays) keep their JSON text.
pub fn flatten_translations(document: &Value) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    flatten_into(document, "", &mut entries);
    entries
}

fn flatten_into(value: &Value, prefix: &str, entries: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == METADATA_KEY {
                    continue;
                }
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(child, &path, entries);
            }
        }
        // A bare scalar document has no key to live under
        _ if prefix.is_empty() => {}
        Value::Null => {}
        Value::String(text) => {
            entries.insert(prefix.to_string(), text.clone());
        }
        other => {
            entries.insert(prefix.to_string(), other.to_string());
        }
    }
}

/// Resolve a translation key.
///
/// # Arguments
/// * `key` - Dot-notation key (e.g., "nav.home")
/// * `bundle` - Bundle to look the key up in
/// * `params` - Values for `{{name}}` placeholders
/// * `fallback_locale` - When supplied and the key is absent, the key
///   itself is used as the translated text; no second bundle is consulted
///
/// # Returns
/// The interpolated translation, or the raw key (with a warning logged)
/// when the key is missing and no fallback locale was given.
pub fn translate_key(
    key: &str,
    bundle: &TranslationBundle,
    params: Option<&Params>,
    fallback_locale: Option<Locale>,
) -> String {
    let template = match (bundle.get(key), fallback_locale) {
        (Some(found), _) => found,
        // TODO: look the key up in the fallback locale's bundle once product
        // confirms that is the intended behavior; until then the key stands in.
        (None, Some(_)) => key,
        (None, None) => {
            warn!(
                "Missing translation for key '{}' in locale '{}'",
                key,
                bundle.locale()
            );
            return key.to_string();
        }
    };

    match params {
        Some(params) if !params.is_empty() => interpolate(template, params),
        _ => template.to_string(),
    }
}

/// Replace `{{name}}` placeholders; unknown names are left intact.
///
/// Names are any run of characters other than braces and whitespace, so
/// `{{first-name}}` and `{{user.name}}` work; padding such as `{{ name }}`
/// is ignored.
pub fn interpolate(template: &str, params: &Params) -> String {
    let regex = PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").unwrap());

    regex
        .replace_all(template, |caps: &regex::Captures<'_>| {
            params
                .get(&caps[1])
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// CLDR-style plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// Pick the category for a count. Only 0, 1 and 2 have explicit rules.
    pub fn for_count(count: i64) -> Self {
        match count {
            0 => PluralCategory::Zero,
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            _ => PluralCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

/// Resolve a plural form of `key` for `count`.
///
/// Looks up `key.<category>`, then `key.other`, then the bare `key`. The
/// count is available to the template as `{{count}}` unless `params`
/// already defines it.
pub fn translate_plural(
    key: &str,
    count: i64,
    bundle: &TranslationBundle,
    params: Option<&Params>,
) -> String {
    let category = PluralCategory::for_count(count);
    let categorized = format!("{}.{}", key, category.as_str());
    let other = format!("{}.other", key);

    let resolved_key = if bundle.contains_key(&categorized) {
        categorized.as_str()
    } else if bundle.contains_key(&other) {
        other.as_str()
    } else {
        key
    };

    let mut params = params.cloned().unwrap_or_default();
    if !params.contains("count") {
        params.insert("count", count);
    }

    translate_key(resolved_key, bundle, Some(&params), None)
}
