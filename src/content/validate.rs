//! Content validation.
//!
//! Two disciplines are offered:
//! - `validate_content` audits a loaded [`SiteContent`] and collects every
//!   problem into a [`ValidationReport`] without failing.
//! - `validate_content_structure` checks a raw page document and fails on
//!   the first structural violation.

use crate::content::types::{SectionBody, SiteContent};
use crate::error::StructureError;
use serde_json::Value;
use std::collections::HashSet;

/// Validation report containing errors and warnings about site content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Structural problems that make content unusable
    pub errors: Vec<String>,

    /// Non-critical issues worth a content author's attention
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Content is valid when there are no errors (warnings are allowed)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Audit a fully loaded site.
///
/// Checks every page for an id, SEO metadata with a title, and at least one
/// section; checks that global content has site information and
/// navigation; checks that the asset table is not empty.
pub fn validate_content(content: &SiteContent) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (key, page) in &content.pages {
        let label = if page.slug.is_empty() { key } else { &page.slug };

        if page.id.trim().is_empty() {
            report.errors.push(format!("Page '{}': missing id", label));
        }
        if page.slug.is_empty() {
            report.errors.push(format!("Page '{}': missing slug", key));
        } else if page.slug != *key {
            report.warnings.push(format!(
                "Page '{}': slug does not match its path '{}'",
                page.slug, key
            ));
        }

        match &page.metadata {
            None => report
                .errors
                .push(format!("Page '{}': missing SEO metadata", label)),
            Some(seo) => {
                if seo.title.trim().is_empty() {
                    report.errors.push(format!("Page '{}': missing title", label));
                }
                if seo.description.trim().is_empty() {
                    report
                        .warnings
                        .push(format!("Page '{}': missing SEO description", label));
                }
            }
        }

        if page.sections.is_empty() {
            report
                .errors
                .push(format!("Page '{}': has no sections", label));
        }

        let mut seen = HashSet::new();
        for section in &page.sections {
            if !seen.insert(section.id.as_str()) {
                report.errors.push(format!(
                    "Page '{}': duplicate section id '{}'",
                    label, section.id
                ));
            }
            match &section.body {
                SectionBody::Invalid { tag, reason, .. } => report.warnings.push(format!(
                    "Page '{}': section '{}' has an invalid '{}' payload: {}",
                    label, section.id, tag, reason
                )),
                SectionBody::Unrecognized { tag, .. } => report.warnings.push(format!(
                    "Page '{}': section '{}' has unrecognized type '{}'",
                    label, section.id, tag
                )),
                _ => {}
            }
        }
    }

    if content.global.site.is_none() {
        report
            .errors
            .push("Global content: missing site information".to_string());
    }
    if content.global.navigation.is_none() {
        report
            .errors
            .push("Global content: missing navigation".to_string());
    }

    if content.assets.is_empty() {
        report.errors.push("Assets: no assets defined".to_string());
    }

    report
}

fn non_empty_str<'a>(value: Option<&'a Value>) -> Option<&'a str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Fail fast on a structurally invalid page document.
///
/// # Errors
/// Returns the first violation found, checked in this order: slug,
/// sections (present and non-empty), `metadata.title`,
/// `metadata.description`, then each section's `id` and `type`.
pub fn validate_content_structure(content: &Value) -> Result<(), StructureError> {
    let object = content.as_object().ok_or(StructureError::NotAnObject)?;

    non_empty_str(object.get("slug")).ok_or(StructureError::MissingSlug)?;

    let sections = object
        .get("sections")
        .and_then(Value::as_array)
        .ok_or(StructureError::MissingSections)?;
    if sections.is_empty() {
        return Err(StructureError::EmptySections);
    }

    let metadata = object.get("metadata");
    non_empty_str(metadata.and_then(|m| m.get("title"))).ok_or(StructureError::MissingTitle)?;
    non_empty_str(metadata.and_then(|m| m.get("description")))
        .ok_or(StructureError::MissingDescription)?;

    for (index, section) in sections.iter().enumerate() {
        non_empty_str(section.get("id")).ok_or(StructureError::MissingSectionId { index })?;
        non_empty_str(section.get("type")).ok_or(StructureError::MissingSectionType { index })?;
    }

    Ok(())
}
