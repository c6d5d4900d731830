//! Page, global and asset content.
//!
//! - `source`: where raw JSON documents come from (filesystem, HTTP, memory)
//! - `cache`: cached, coalesced document loads
//! - `loader`: typed loading of pages, global content and assets
//! - `validate`: soft auditing and strict structure checks
//! - `context`: locale-aware lookups for rendering

mod cache;
mod context;
mod loader;
mod metrics;
mod source;
pub mod types;
mod validate;

pub use cache::ContentCache;
pub use context::ContentContext;
pub use loader::{page_path, ContentLoader, ASSETS_PATH, DEFAULT_PAGES, GLOBAL_PATH};
pub use metrics::{LoadMetrics, MetricsReport};
pub use source::{ContentSource, FsSource, HttpSource, StaticSource};
pub use types::{
    Asset, AssetTable, ContentSection, GlobalContent, LocalizedSiteContent, PageContent,
    SectionBody, SectionKind, SiteContent,
};
pub use validate::{validate_content, validate_content_structure, ValidationReport};
