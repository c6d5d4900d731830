//! Content data model: pages, sections, global content and assets.
//!
//! JSON documents use camelCase keys. Section payloads are strongly typed
//! per section kind; unknown kinds are kept as [`SectionBody::Unrecognized`]
//! so newer content never breaks older renderers, and known kinds with a
//! payload that does not fit are kept as [`SectionBody::Invalid`].

use crate::error::SectionError;
use crate::i18n::Locale;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

// ==================== Pages ====================

/// SEO block of a page (`metadata` in the JSON document).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// A page and its ordered sections.
///
/// Fields are lenient on purpose so that incomplete pages still load and
/// can be reported by `validate_content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub slug: String,

    /// SEO metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SeoMetadata>,

    /// Rendering order is array order
    #[serde(default)]
    pub sections: Vec<ContentSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl PageContent {
    pub fn section(&self, id: &str) -> Option<&ContentSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .map(|seo| seo.title.as_str())
            .filter(|title| !title.is_empty())
    }
}

// ==================== Sections ====================

/// The fixed set of section type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Features,
    Services,
    Team,
    Testimonials,
    Faq,
    Cta,
    Text,
    Custom,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Hero,
        SectionKind::Features,
        SectionKind::Services,
        SectionKind::Team,
        SectionKind::Testimonials,
        SectionKind::Faq,
        SectionKind::Cta,
        SectionKind::Text,
        SectionKind::Custom,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Features => "features",
            SectionKind::Services => "services",
            SectionKind::Team => "team",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Faq => "faq",
            SectionKind::Cta => "cta",
            SectionKind::Text => "text",
            SectionKind::Custom => "custom",
        }
    }
}

/// A link rendered as a button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallToAction {
    pub label: String,
    pub href: String,
    pub external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    /// Asset id or URL
    pub image: Option<String>,
    pub primary_cta: Option<CallToAction>,
    pub secondary_cta: Option<CallToAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureItem {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    pub title: String,
    pub description: String,
    pub href: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamContent {
    pub title: Option<String>,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialsContent {
    pub title: Option<String>,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqContent {
    pub title: Option<String>,
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaContent {
    pub title: String,
    pub description: Option<String>,
    pub primary: Option<CallToAction>,
    pub secondary: Option<CallToAction>,
}

/// Free text; paragraphs are separated by blank lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub title: Option<String>,
    pub body: String,
}

/// A section rendered by a component registered under `component`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomContent {
    #[serde(default)]
    pub component: String,

    #[serde(flatten)]
    pub props: Map<String, Value>,
}

/// Typed payload of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Hero(HeroContent),
    Features(FeaturesContent),
    Services(ServicesContent),
    Team(TeamContent),
    Testimonials(TestimonialsContent),
    Faq(FaqContent),
    Cta(CtaContent),
    Text(TextContent),
    Custom(CustomContent),
    /// A type tag this version does not know, kept verbatim
    Unrecognized { tag: String, content: Value },
    /// A known type tag whose payload does not fit its schema, kept
    /// verbatim with the reason it was rejected
    Invalid {
        tag: String,
        content: Value,
        reason: String,
    },
}

impl SectionBody {
    pub fn kind(&self) -> Option<SectionKind> {
        match self {
            SectionBody::Hero(_) => Some(SectionKind::Hero),
            SectionBody::Features(_) => Some(SectionKind::Features),
            SectionBody::Services(_) => Some(SectionKind::Services),
            SectionBody::Team(_) => Some(SectionKind::Team),
            SectionBody::Testimonials(_) => Some(SectionKind::Testimonials),
            SectionBody::Faq(_) => Some(SectionKind::Faq),
            SectionBody::Cta(_) => Some(SectionKind::Cta),
            SectionBody::Text(_) => Some(SectionKind::Text),
            SectionBody::Custom(_) => Some(SectionKind::Custom),
            SectionBody::Unrecognized { .. } | SectionBody::Invalid { .. } => None,
        }
    }

    /// The type tag as written in content.
    pub fn tag(&self) -> &str {
        match self {
            SectionBody::Unrecognized { tag, .. } | SectionBody::Invalid { tag, .. } => tag,
            known => known.kind().map(|kind| kind.as_str()).unwrap_or_default(),
        }
    }

    /// Build the typed body for `tag`.
    ///
    /// A payload that does not match its kind's schema only costs that
    /// section: it is logged and kept as [`SectionBody::Invalid`] so the
    /// rest of the page still loads.
    fn from_tagged(id: &str, tag: &str, content: Value) -> Self {
        let Some(kind) = SectionKind::from_tag(tag) else {
            return SectionBody::Unrecognized {
                tag: tag.to_string(),
                content,
            };
        };

        let parsed = match kind {
            SectionKind::Hero => payload(&content).map(SectionBody::Hero),
            SectionKind::Features => payload(&content).map(SectionBody::Features),
            SectionKind::Services => payload(&content).map(SectionBody::Services),
            SectionKind::Team => payload(&content).map(SectionBody::Team),
            SectionKind::Testimonials => payload(&content).map(SectionBody::Testimonials),
            SectionKind::Faq => payload(&content).map(SectionBody::Faq),
            SectionKind::Cta => payload(&content).map(SectionBody::Cta),
            SectionKind::Text => payload(&content).map(SectionBody::Text),
            SectionKind::Custom => payload(&content).map(SectionBody::Custom),
        };

        parsed.unwrap_or_else(|source| {
            let reason = source.to_string();
            let error = SectionError::Payload {
                id: id.to_string(),
                tag: tag.to_string(),
                source,
            };
            warn!("{}", error);
            SectionBody::Invalid {
                tag: tag.to_string(),
                content,
                reason,
            }
        })
    }

    fn to_content(&self) -> Value {
        let serialized = match self {
            SectionBody::Hero(c) => serde_json::to_value(c),
            SectionBody::Features(c) => serde_json::to_value(c),
            SectionBody::Services(c) => serde_json::to_value(c),
            SectionBody::Team(c) => serde_json::to_value(c),
            SectionBody::Testimonials(c) => serde_json::to_value(c),
            SectionBody::Faq(c) => serde_json::to_value(c),
            SectionBody::Cta(c) => serde_json::to_value(c),
            SectionBody::Text(c) => serde_json::to_value(c),
            SectionBody::Custom(c) => serde_json::to_value(c),
            SectionBody::Unrecognized { content, .. } | SectionBody::Invalid { content, .. } => {
                return content.clone()
            }
        };
        // Plain derived structs always serialize
        serialized.unwrap_or(Value::Null)
    }
}

/// A missing payload is treated as an empty object so all-default
/// payloads need no `content` key.
fn payload<T: DeserializeOwned>(content: &Value) -> Result<T, serde_json::Error> {
    match content {
        Value::Null => serde_json::from_value(Value::Object(Map::new())),
        other => T::deserialize(other),
    }
}

/// One independently renderable unit of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection", into = "RawSection")]
pub struct ContentSection {
    pub id: String,
    pub body: SectionBody,
    pub background: Option<String>,
    pub spacing: Option<String>,
}

impl ContentSection {
    pub fn new(id: impl Into<String>, body: SectionBody) -> Self {
        Self {
            id: id.into(),
            body,
            background: None,
            spacing: None,
        }
    }

    pub fn tag(&self) -> &str {
        self.body.tag()
    }
}

/// Wire shape of a section: `{id, type, content, background, spacing}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSection {
    #[serde(default)]
    id: Option<String>,

    #[serde(rename = "type", default)]
    kind: Option<String>,

    #[serde(default)]
    content: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    spacing: Option<String>,
}

impl TryFrom<RawSection> for ContentSection {
    type Error = SectionError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(SectionError::MissingId)?;
        let tag = raw
            .kind
            .filter(|tag| !tag.trim().is_empty())
            .ok_or_else(|| SectionError::MissingType { id: id.clone() })?;

        let body = SectionBody::from_tagged(&id, &tag, raw.content);
        Ok(Self {
            id,
            body,
            background: raw.background,
            spacing: raw.spacing,
        })
    }
}

impl From<ContentSection> for RawSection {
    fn from(section: ContentSection) -> Self {
        RawSection {
            kind: Some(section.body.tag().to_string()),
            content: section.body.to_content(),
            id: Some(section.id),
            background: section.background,
            spacing: section.spacing,
        }
    }
}

// ==================== Global Content ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub external: bool,
}

/// Ordered navigation link lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub main: Vec<NavLink>,
    pub footer: Vec<NavLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub href: String,
}

/// Site-wide content (one per locale).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalContent {
    pub site: Option<SiteInfo>,
    pub navigation: Option<Navigation>,
    pub contact: Option<ContactInfo>,
    pub social: Vec<SocialLink>,
}

// ==================== Assets ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    /// Low-quality placeholder (data URI or URL)
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAsset {
    #[serde(flatten)]
    pub media: MediaAsset,
    #[serde(default)]
    pub poster: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Asset {
    Image(MediaAsset),
    Video(VideoAsset),
}

impl Asset {
    pub fn media(&self) -> &MediaAsset {
        match self {
            Asset::Image(media) => media,
            Asset::Video(video) => &video.media,
        }
    }
}

/// Assets keyed by id, shared by reference between sections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, Asset>")]
pub struct AssetTable {
    assets: HashMap<String, Arc<Asset>>,
}

impl AssetTable {
    pub fn get(&self, id: &str) -> Option<&Arc<Asset>> {
        self.assets.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, asset: Asset) {
        self.assets.insert(id.into(), Arc::new(asset));
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }
}

impl From<HashMap<String, Asset>> for AssetTable {
    fn from(assets: HashMap<String, Asset>) -> Self {
        Self {
            assets: assets
                .into_iter()
                .map(|(id, asset)| (id, Arc::new(asset)))
                .collect(),
        }
    }
}

// ==================== Site Aggregates ====================

/// Every page plus global content and assets for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteContent {
    pub pages: BTreeMap<String, PageContent>,
    pub global: GlobalContent,
    pub assets: AssetTable,
}

/// Independent content trees per locale.
///
/// Content is not inherited across locales: a locale either has its own
/// tree or resolution falls back to another locale's tree as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalizedSiteContent {
    trees: BTreeMap<Locale, SiteContent>,
}

impl LocalizedSiteContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: Locale, content: SiteContent) {
        self.trees.insert(locale, content);
    }

    pub fn with(mut self, locale: Locale, content: SiteContent) -> Self {
        self.insert(locale, content);
        self
    }

    /// Locales with a tree, in registry order.
    pub fn locales(&self) -> Vec<Locale> {
        self.trees.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Trees in registry order of their locale.
    pub fn iter(&self) -> impl Iterator<Item = (Locale, &SiteContent)> {
        self.trees.iter().map(|(locale, tree)| (*locale, tree))
    }

    /// Resolve the tree for `locale`: exact match, then the canonical
    /// locale, then the first available locale in registry order.
    pub fn resolve(&self, locale: Locale) -> Option<(Locale, &SiteContent)> {
        self.trees
            .get_key_value(&locale)
            .or_else(|| self.trees.get_key_value(&Locale::canonical()))
            .or_else(|| self.trees.iter().next())
            .map(|(locale, content)| (*locale, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_warnings;
    use serde_json::json;

    // ==================== Section Deserialization Tests ====================

    #[test]
    fn test_section_typed_payload() {
        let section: ContentSection = serde_json::from_value(json!({
            "id": "intro",
            "type": "hero",
            "content": {
                "title": "Welcome",
                "primaryCta": {"label": "Start", "href": "/contact"}
            },
            "background": "dark"
        }))
        .expect("should deserialize");

        assert_eq!(section.id, "intro");
        assert_eq!(section.tag(), "hero");
        assert_eq!(section.background.as_deref(), Some("dark"));
        match section.body {
            SectionBody::Hero(hero) => {
                assert_eq!(hero.title, "Welcome");
                assert_eq!(hero.primary_cta.unwrap().href, "/contact");
            }
            other => panic!("expected hero, got {:?}", other),
        }
    }

    #[test]
    fn test_section_without_content_uses_defaults() {
        let section: ContentSection =
            serde_json::from_value(json!({"id": "s", "type": "faq"})).expect("deserialize");
        assert_eq!(section.body, SectionBody::Faq(FaqContent::default()));
    }

    #[test]
    fn test_section_unknown_tag_is_kept() {
        let section: ContentSection = serde_json::from_value(json!({
            "id": "b",
            "type": "pricing-table",
            "content": {"tiers": 3}
        }))
        .expect("deserialize");

        assert_eq!(section.body.kind(), None);
        assert_eq!(section.tag(), "pricing-table");
        assert_eq!(
            section.body,
            SectionBody::Unrecognized {
                tag: "pricing-table".to_string(),
                content: json!({"tiers": 3})
            }
        );
    }

    #[test]
    fn test_section_missing_id_is_rejected() {
        let result = serde_json::from_value::<ContentSection>(json!({"type": "hero"}));
        assert!(result.unwrap_err().to_string().contains("missing an id"));
    }

    #[test]
    fn test_section_missing_type_is_rejected() {
        let result = serde_json::from_value::<ContentSection>(json!({"id": "x"}));
        assert!(result.unwrap_err().to_string().contains("missing a type"));
    }

    #[test]
    fn test_section_invalid_payload_is_kept_as_invalid() {
        let (section, logs) = capture_warnings(|| {
            serde_json::from_value::<ContentSection>(json!({
                "id": "x",
                "type": "faq",
                "content": {"items": "not a list"}
            }))
        });

        let section = section.expect("a bad payload does not reject the section");
        assert_eq!(section.id, "x");
        assert_eq!(section.tag(), "faq");
        assert_eq!(section.body.kind(), None);
        match &section.body {
            SectionBody::Invalid { content, reason, .. } => {
                assert_eq!(content, &json!({"items": "not a list"}));
                assert!(!reason.is_empty());
            }
            other => panic!("expected invalid body, got {:?}", other),
        }
        assert!(logs.contains("section 'x' has an invalid 'faq' payload"), "logs: {}", logs);
    }

    #[test]
    fn test_invalid_section_serializes_verbatim() {
        let raw = json!({"id": "x", "type": "team", "content": {"members": 7}});
        let section: ContentSection = serde_json::from_value(raw.clone()).expect("deserialize");

        assert_eq!(serde_json::to_value(&section).expect("serialize"), raw);
    }

    #[test]
    fn test_custom_section_keeps_props() {
        let section: ContentSection = serde_json::from_value(json!({
            "id": "map",
            "type": "custom",
            "content": {"component": "office-map", "lat": 40.4, "zoom": 12}
        }))
        .expect("deserialize");

        let SectionBody::Custom(custom) = section.body else {
            panic!("expected custom section");
        };
        assert_eq!(custom.component, "office-map");
        assert_eq!(custom.props["zoom"], 12);
    }

    #[test]
    fn test_section_serializes_to_wire_shape() {
        let section = ContentSection::new(
            "t",
            SectionBody::Text(TextContent {
                title: None,
                body: "Hello".to_string(),
            }),
        );

        let json = serde_json::to_value(&section).expect("serialize");
        assert_eq!(json["id"], "t");
        assert_eq!(json["type"], "text");
        assert_eq!(json["content"]["body"], "Hello");
        assert!(json.get("background").is_none());
    }

    // ==================== Page Tests ====================

    #[test]
    fn test_page_preserves_section_order() {
        let page: PageContent = serde_json::from_value(json!({
            "id": "page-home",
            "slug": "home",
            "metadata": {"title": "Home", "description": "Welcome"},
            "sections": [
                {"id": "c", "type": "cta"},
                {"id": "a", "type": "hero"},
                {"id": "b", "type": "text"}
            ],
            "lastModified": "2024-05-01T12:00:00Z"
        }))
        .expect("deserialize");

        let ids: Vec<_> = page.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(page.title(), Some("Home"));
        assert!(page.last_modified.is_some());
        assert_eq!(page.section("a").map(|s| s.tag()), Some("hero"));
    }

    #[test]
    fn test_page_lenient_fields() {
        let page: PageContent = serde_json::from_value(json!({})).expect("deserialize");
        assert!(page.slug.is_empty());
        assert!(page.metadata.is_none());
        assert!(page.sections.is_empty());
        assert_eq!(page.title(), None);
    }

    // ==================== Asset Tests ====================

    #[test]
    fn test_asset_table_deserializes_kinds() {
        let table: AssetTable = serde_json::from_value(json!({
            "team-photo": {"kind": "image", "src": "/img/team.jpg", "alt": "Team", "width": 800, "height": 600},
            "intro-video": {"kind": "video", "src": "/v/intro.mp4", "poster": "/v/poster.jpg", "duration": 42.5, "aspectRatio": "16:9"}
        }))
        .expect("deserialize");

        assert_eq!(table.len(), 2);
        let photo = table.get("team-photo").unwrap();
        assert_eq!(photo.media().width, Some(800));

        match table.get("intro-video").unwrap().as_ref() {
            Asset::Video(video) => {
                assert_eq!(video.media.src, "/v/intro.mp4");
                assert_eq!(video.aspect_ratio.as_deref(), Some("16:9"));
            }
            other => panic!("expected video, got {:?}", other),
        }
    }

    #[test]
    fn test_asset_table_shares_by_reference() {
        let mut table = AssetTable::default();
        table.insert("logo", Asset::Image(MediaAsset {
            src: "/logo.svg".to_string(),
            ..MediaAsset::default()
        }));

        let a = Arc::clone(table.get("logo").unwrap());
        let b = Arc::clone(table.get("logo").unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }

    // ==================== Localized Content Tests ====================

    fn tree(name: &str) -> SiteContent {
        SiteContent {
            global: GlobalContent {
                site: Some(SiteInfo {
                    name: name.to_string(),
                    ..SiteInfo::default()
                }),
                ..GlobalContent::default()
            },
            ..SiteContent::default()
        }
    }

    fn site_name(content: &SiteContent) -> &str {
        content.global.site.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }

    #[test]
    fn test_resolve_exact_locale() {
        let localized = LocalizedSiteContent::new()
            .with(Locale::ENGLISH, tree("en"))
            .with(Locale::FRENCH, tree("fr"));

        let (locale, content) = localized.resolve(Locale::FRENCH).unwrap();
        assert_eq!(locale, Locale::FRENCH);
        assert_eq!(site_name(content), "fr");
    }

    #[test]
    fn test_resolve_falls_back_to_english() {
        let localized = LocalizedSiteContent::new()
            .with(Locale::GERMAN, tree("de"))
            .with(Locale::ENGLISH, tree("en"));

        let (locale, _) = localized.resolve(Locale::JAPANESE).unwrap();
        assert_eq!(locale, Locale::ENGLISH);
    }

    #[test]
    fn test_resolve_falls_back_to_first_available() {
        let localized = LocalizedSiteContent::new()
            .with(Locale::JAPANESE, tree("ja"))
            .with(Locale::FRENCH, tree("fr"));

        let (locale, _) = localized.resolve(Locale::SPANISH).unwrap();
        assert_eq!(locale, Locale::FRENCH);
    }

    #[test]
    fn test_resolve_empty() {
        assert!(LocalizedSiteContent::new().resolve(Locale::ENGLISH).is_none());
    }
}
