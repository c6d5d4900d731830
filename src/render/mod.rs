//! Generic section renderer.
//!
//! Walks a page's sections in order and dispatches on each section's kind.
//! Custom sections are looked up by component name in a registry; unknown
//! kinds and unregistered components render a visible diagnostic block.

mod escape;
pub mod sections;

pub use escape::{escape_html, safe_href};
pub use sections::SectionProps;

use crate::content::types::{AssetTable, ContentSection, CustomContent, PageContent, SectionBody};
use crate::i18n::DocumentLanguage;
use crate::scope::RenderScope;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Renders a custom section for a registered component name.
pub type CustomRenderer = Arc<dyn Fn(&CustomContent, &SectionProps<'_>) -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct PageRenderer {
    custom: HashMap<String, CustomRenderer>,
}

impl PageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the renderer for `custom` sections naming `component`.
    pub fn register<F>(&mut self, component: impl Into<String>, render: F)
    where
        F: Fn(&CustomContent, &SectionProps<'_>) -> String + Send + Sync + 'static,
    {
        self.custom.insert(component.into(), Arc::new(render));
    }

    pub fn has_component(&self, component: &str) -> bool {
        self.custom.contains_key(component)
    }

    pub fn render_section(&self, section: &ContentSection, assets: &AssetTable) -> String {
        let props = SectionProps {
            id: &section.id,
            background: section.background.as_deref(),
            spacing: section.spacing.as_deref(),
            assets,
        };

        match &section.body {
            SectionBody::Hero(content) => sections::hero(content, &props),
            SectionBody::Features(content) => sections::features(content, &props),
            SectionBody::Services(content) => sections::services(content, &props),
            SectionBody::Team(content) => sections::team(content, &props),
            SectionBody::Testimonials(content) => sections::testimonials(content, &props),
            SectionBody::Faq(content) => sections::faq(content, &props),
            SectionBody::Cta(content) => sections::cta(content, &props),
            SectionBody::Text(content) => sections::text(content, &props),
            SectionBody::Custom(content) => match self.custom.get(&content.component) {
                Some(render) => render(content, &props),
                None => {
                    warn!(
                        "No renderer registered for component '{}' (section '{}')",
                        content.component, section.id
                    );
                    sections::diagnostic(
                        "custom",
                        &format!("No renderer registered for component '{}'", content.component),
                        None,
                        &props,
                    )
                }
            },
            SectionBody::Unrecognized { tag, content } => {
                warn!("Unrecognized section type '{}' (section '{}')", tag, section.id);
                sections::diagnostic(
                    tag,
                    &format!("Unrecognized section type '{}'", tag),
                    Some(content),
                    &props,
                )
            }
            SectionBody::Invalid {
                tag,
                content,
                reason,
            } => {
                warn!("Invalid '{}' payload in section '{}': {}", tag, section.id, reason);
                sections::diagnostic(
                    tag,
                    &format!("Invalid '{}' section: {}", tag, reason),
                    Some(content),
                    &props,
                )
            }
        }
    }

    /// Render every section of `page` in order.
    pub fn render_page(&self, page: &PageContent, assets: &AssetTable) -> String {
        debug!("Rendering page '{}' ({} sections)", page.slug, page.sections.len());
        page.sections
            .iter()
            .map(|section| self.render_section(section, assets))
            .collect()
    }

    /// Render the page `slug` for the scope's locale.
    ///
    /// The page comes from the locale's content tree (with fallback) and is
    /// wrapped in a `<main>` carrying the document `lang`/`dir` attributes.
    ///
    /// # Returns
    /// `None` if no tree has a page with that slug.
    ///
    /// # Panics
    /// If the scope lacks an i18n or content context.
    pub fn render_localized(&self, scope: &RenderScope, slug: &str) -> Option<String> {
        let i18n = scope.i18n();
        let content = scope.content();
        let locale = i18n.locale();

        let page = content.page(slug, locale)?;
        let assets = content.assets(locale)?;
        let document = DocumentLanguage::for_locale(locale);

        Some(format!(
            "<main {}>{}</main>",
            document.attributes(),
            self.render_page(page, assets)
        ))
    }
}
