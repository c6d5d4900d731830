use crate::content::{ContentSource, FsSource, HttpSource, DEFAULT_PAGES};
use crate::forms::{FormSettings, FormSubmitter};
use crate::i18n::Locale;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where content documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    Dir(PathBuf),
    Url(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    // Content
    pub content: ContentLocation,
    pub pages: Vec<String>,

    // Locales
    pub default_locale: Locale,
    pub fallback_locale: Locale,

    // Contact form (disabled when FORM_ENDPOINT is unset)
    pub form: Option<FormSettings>,
}

fn parse_locale(var: &str) -> Result<Option<Locale>> {
    match std::env::var(var) {
        Ok(code) => Ok(Some(
            Locale::from_code(&code).with_context(|| format!("{} is not a usable locale", var))?,
        )),
        Err(_) => Ok(None),
    }
}

fn parse_number<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Content - a base URL takes precedence over a local directory
        let content = match std::env::var("CONTENT_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => ContentLocation::Url(url),
            _ => ContentLocation::Dir(
                std::env::var("CONTENT_DIR")
                    .unwrap_or_else(|_| "content".to_string())
                    .into(),
            ),
        };

        let pages = std::env::var("SITE_PAGES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|page| !page.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .ok()
            .filter(|pages| !pages.is_empty())
            .unwrap_or_else(|| DEFAULT_PAGES.iter().map(|p| p.to_string()).collect());

        // Locales
        let default_locale = parse_locale("DEFAULT_LOCALE")?.unwrap_or_else(Locale::canonical);
        let fallback_locale = parse_locale("FALLBACK_LOCALE")?.unwrap_or_else(Locale::canonical);

        // Contact form
        let form = std::env::var("FORM_ENDPOINT").ok().map(|endpoint| FormSettings {
            endpoint,
            max_attempts: parse_number("FORM_RATE_LIMIT", 5),
            window: Duration::from_secs(parse_number("FORM_RATE_WINDOW_SECS", 3600)),
            max_field_length: parse_number("FORM_MAX_FIELD_LENGTH", 5000),
        });

        Ok(Self {
            content,
            pages,
            default_locale,
            fallback_locale,
            form,
        })
    }

    /// Build the content source for the configured location.
    pub fn content_source(&self) -> Result<Arc<dyn ContentSource>> {
        Ok(match &self.content {
            ContentLocation::Dir(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!("CONTENT_DIR '{}' is not a directory", dir.display());
                }
                Arc::new(FsSource::new(dir.clone()))
            }
            ContentLocation::Url(url) => {
                let client = reqwest::Client::builder()
                    .build()
                    .context("Failed to build HTTP client")?;
                Arc::new(HttpSource::new(client, url.clone()))
            }
        })
    }

    /// Build the contact form submitter from the `FORM_*` settings.
    ///
    /// Fails when `FORM_ENDPOINT` is unset.
    pub fn form_submitter(&self) -> Result<FormSubmitter> {
        let settings = self
            .form
            .clone()
            .context("FORM_ENDPOINT must be set to submit forms")?;
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(FormSubmitter::new(client, settings))
    }
}
