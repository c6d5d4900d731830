//! Typed content loading on top of [`ContentCache`].

use crate::content::cache::ContentCache;
use crate::content::types::{AssetTable, GlobalContent, LocalizedSiteContent, PageContent, SiteContent};
use crate::i18n::Locale;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const GLOBAL_PATH: &str = "global";
pub const ASSETS_PATH: &str = "assets";

/// Pages that make up the site when none are configured.
pub const DEFAULT_PAGES: [&str; 6] = ["home", "about", "services", "contact", "privacy", "terms"];

/// Logical path of a page document.
pub fn page_path(page_id: &str) -> String {
    format!("pages/{}", page_id)
}

/// Loads pages, global content and assets for a site.
#[derive(Clone)]
pub struct ContentLoader {
    cache: Arc<ContentCache>,
    pages: Vec<String>,
}

impl ContentLoader {
    /// # Arguments
    /// * `cache` - Shared document cache
    /// * `pages` - Slugs loaded by `load_site_content`
    pub fn new(cache: Arc<ContentCache>, pages: Vec<String>) -> Self {
        Self { cache, pages }
    }

    /// Loader for the default brochure pages.
    pub fn with_default_pages(cache: Arc<ContentCache>) -> Self {
        Self::new(cache, DEFAULT_PAGES.iter().map(|p| p.to_string()).collect())
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    async fn load_typed<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let document = self.cache.load_content_file(path).await?;
        match T::deserialize(document.as_ref()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Content '{}' does not match its schema: {}", path, e);
                None
            }
        }
    }

    /// Load `pages/<page_id>`.
    ///
    /// # Returns
    /// `None` if the page is missing, malformed, or fails to deserialize.
    pub async fn load_page_content(&self, page_id: &str) -> Option<PageContent> {
        self.load_page_under("", page_id).await
    }

    pub async fn load_global_content(&self) -> Option<GlobalContent> {
        self.load_typed(GLOBAL_PATH).await
    }

    pub async fn load_assets(&self) -> Option<AssetTable> {
        self.load_typed(ASSETS_PATH).await
    }

    async fn load_page_under(&self, prefix: &str, page_id: &str) -> Option<PageContent> {
        self.load_typed(&format!("{}{}", prefix, page_path(page_id)))
            .await
    }

    /// Load every configured page, global content and assets concurrently.
    ///
    /// Individual failures are logged and leave a gap (a missing page, or
    /// empty global content/assets) for `validate_content` to report.
    pub async fn load_site_content(&self) -> SiteContent {
        self.load_tree("").await
    }

    async fn load_tree(&self, prefix: &str) -> SiteContent {
        let page_loads = join_all(self.pages.iter().map(|slug| async move {
            (slug.clone(), self.load_page_under(prefix, slug).await)
        }));
        let global_path = format!("{}{}", prefix, GLOBAL_PATH);
        let assets_path = format!("{}{}", prefix, ASSETS_PATH);

        let (pages, global, assets) = tokio::join!(
            page_loads,
            self.load_typed::<GlobalContent>(&global_path),
            self.load_typed::<AssetTable>(&assets_path),
        );

        let pages: BTreeMap<String, PageContent> = pages
            .into_iter()
            .filter_map(|(slug, page)| page.map(|page| (slug, page)))
            .collect();

        debug!(
            "Loaded content tree '{}': {}/{} pages",
            prefix,
            pages.len(),
            self.pages.len()
        );

        SiteContent {
            pages,
            global: global.unwrap_or_default(),
            assets: assets.unwrap_or_default(),
        }
    }

    /// Load one content tree per locale from `<code>/...` paths.
    ///
    /// Locales with neither pages nor global content are left out, so
    /// resolution falls back for them.
    pub async fn load_localized_site_content(&self, locales: &[Locale]) -> LocalizedSiteContent {
        let trees = join_all(locales.iter().map(|locale| async move {
            let prefix = format!("{}/", locale.code());
            (*locale, self.load_tree(&prefix).await)
        }))
        .await;

        let mut localized = LocalizedSiteContent::new();
        for (locale, tree) in trees {
            if tree.pages.is_empty() && tree.global == GlobalContent::default() {
                debug!("No content found for locale '{}'", locale);
                continue;
            }
            localized.insert(locale, tree);
        }

        info!("Loaded content for locales {:?}", localized.locales());
        localized
    }

    /// Warm the cache for `paths` in the background.
    ///
    /// Failures are logged by the cache, never surfaced. The handle may be
    /// awaited or dropped.
    pub fn preload_content(&self, paths: Vec<String>) -> JoinHandle<()> {
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            let total = paths.len();
            let loaded = join_all(paths.iter().map(|path| cache.load_content_file(path)))
                .await
                .into_iter()
                .filter(Option::is_some)
                .count();
            debug!("Preloaded {}/{} content files", loaded, total);
        })
    }

    /// Empty the cache and in-flight tiers (content hot reload).
    pub fn clear_content_cache(&self) {
        self.cache.clear();
    }
}
