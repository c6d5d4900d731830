//! Loading translation bundles per locale.

use crate::content::ContentCache;
use crate::i18n::translations::TranslationBundle;
use crate::i18n::Locale;
use crate::sync::lock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Logical path prefix of translation documents.
pub const TRANSLATIONS_PREFIX: &str = "translations/";

/// Logical path of a locale's translation document.
pub fn translation_path(locale: Locale) -> String {
    format!("{}{}", TRANSLATIONS_PREFIX, locale.code())
}

/// Loads and caches flattened translation bundles.
///
/// Documents are fetched through the shared [`ContentCache`], so concurrent
/// loads of the same locale share one fetch.
pub struct TranslationLoader {
    content: Arc<ContentCache>,
    bundles: Mutex<HashMap<Locale, Arc<TranslationBundle>>>,
    fallback: Locale,
}

impl TranslationLoader {
    /// # Arguments
    /// * `content` - Document cache translations are fetched through
    /// * `fallback` - Locale tried once when a requested bundle fails to load
    pub fn new(content: Arc<ContentCache>, fallback: Locale) -> Self {
        Self {
            content,
            bundles: Mutex::new(HashMap::new()),
            fallback,
        }
    }

    pub fn fallback_locale(&self) -> Locale {
        self.fallback
    }

    /// Return a bundle already loaded for `locale`.
    pub fn cached(&self, locale: Locale) -> Option<Arc<TranslationBundle>> {
        lock(&self.bundles).get(&locale).cloned()
    }

    /// Load the bundle for `locale`.
    ///
    /// On failure the fallback locale is tried exactly once; if that fails
    /// too an empty bundle is returned, so every key resolves to itself.
    /// This never fails.
    ///
    /// # Returns
    /// A bundle tagged with the locale whose translations it actually holds.
    pub async fn load_translations(&self, locale: Locale) -> Arc<TranslationBundle> {
        if let Some(bundle) = self.load_exact(locale).await {
            return bundle;
        }

        if locale != self.fallback {
            warn!(
                "Translations for '{}' unavailable, falling back to '{}'",
                locale, self.fallback
            );
            if let Some(bundle) = self.load_exact(self.fallback).await {
                return bundle;
            }
        }

        warn!(
            "No translations available for '{}'; keys will render as-is",
            locale
        );
        Arc::new(TranslationBundle::empty(locale))
    }

    async fn load_exact(&self, locale: Locale) -> Option<Arc<TranslationBundle>> {
        if let Some(bundle) = self.cached(locale) {
            return Some(bundle);
        }

        let document = self.content.load_content_file(&translation_path(locale)).await?;
        let bundle = Arc::new(TranslationBundle::from_json(locale, &document));
        debug!(
            "Loaded {} translations for '{}'",
            bundle.len(),
            locale
        );

        lock(&self.bundles).insert(locale, Arc::clone(&bundle));
        Some(bundle)
    }

    /// Drop cached bundles and their underlying documents.
    pub fn clear_cache(&self) {
        lock(&self.bundles).clear();
        self.content.evict_prefix(TRANSLATIONS_PREFIX);
        info!("Cleared translation cache");
    }
}
