//! Read-only view of resolved content for the rendering layer.

use crate::content::types::{AssetTable, ContentSection, GlobalContent, LocalizedSiteContent, PageContent};
use crate::i18n::Locale;
use std::sync::Arc;

/// Content lookups through the locale fallback chain.
///
/// A locale without its own tree resolves to the canonical locale's tree,
/// then to the first available tree. Absence is `None`, never an error.
#[derive(Debug, Clone)]
pub struct ContentContext {
    content: Arc<LocalizedSiteContent>,
}

impl ContentContext {
    pub fn new(content: Arc<LocalizedSiteContent>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &LocalizedSiteContent {
        &self.content
    }

    /// The locale whose tree serves requests for `locale`.
    pub fn resolved_locale(&self, locale: Locale) -> Option<Locale> {
        self.content.resolve(locale).map(|(resolved, _)| resolved)
    }

    pub fn page(&self, slug: &str, locale: Locale) -> Option<&PageContent> {
        let (_, tree) = self.content.resolve(locale)?;
        tree.pages.get(slug)
    }

    pub fn section(&self, slug: &str, section_id: &str, locale: Locale) -> Option<&ContentSection> {
        self.page(slug, locale)?.section(section_id)
    }

    pub fn global(&self, locale: Locale) -> Option<&GlobalContent> {
        self.content.resolve(locale).map(|(_, tree)| &tree.global)
    }

    pub fn assets(&self, locale: Locale) -> Option<&AssetTable> {
        self.content.resolve(locale).map(|(_, tree)| &tree.assets)
    }
}
