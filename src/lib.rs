//! Content and i18n resolution for a brochure website.
//!
//! Pages, global content and assets are JSON documents loaded through a
//! cached, coalescing [`content::ContentCache`]. Translation bundles are
//! loaded per locale by [`i18n::TranslationLoader`] and exposed through an
//! [`i18n::I18nProvider`]. [`render::PageRenderer`] walks a page's sections
//! and renders each one by its type tag.

pub mod config;
pub mod content;
pub mod error;
pub mod forms;
pub mod i18n;
pub mod render;
pub mod scope;
pub mod security;
mod sync;

#[cfg(test)]
mod test_support;
