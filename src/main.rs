//! Content driver.
//!
//! Usage:
//!   site-content                       # Load and audit every locale's content
//!   site-content render <slug> [code]  # Render a page to stdout
//!   site-content submit name=Ana email=ana@example.com message=Hi
//!                                      # Send a contact form submission
//!
//! Environment variables:
//! - CONTENT_DIR (defaults to `content`) or CONTENT_BASE_URL
//! - SITE_PAGES, DEFAULT_LOCALE, FALLBACK_LOCALE (optional)
//! - FORM_ENDPOINT, FORM_RATE_LIMIT, FORM_RATE_WINDOW_SECS,
//!   FORM_MAX_FIELD_LENGTH (for `submit`)

use anyhow::{Context, Result};
use site_content::config::Config;
use site_content::content::{validate_content, ContentCache, ContentContext, ContentLoader};
use site_content::forms::FormSubmission;
use site_content::i18n::{detect_locale, I18nProvider, Locale, TranslationLoader};
use site_content::render::PageRenderer;
use site_content::scope::RenderScope;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("site_content=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let cache = Arc::new(ContentCache::new(config.content_source()?));
    let loader = ContentLoader::new(Arc::clone(&cache), config.pages.clone());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("validate") => validate(&loader).await,
        Some("render") => {
            let slug = args.get(1).context("Usage: site-content render <slug> [locale]")?;
            render(&config, cache, &loader, slug, args.get(2).map(String::as_str)).await
        }
        Some("submit") => submit(&config, &args[1..]).await,
        Some(other) => anyhow::bail!(
            "Unknown command '{}'. Expected 'validate', 'render' or 'submit'",
            other
        ),
    }
}

async fn validate(loader: &ContentLoader) -> Result<()> {
    let localized = loader.load_localized_site_content(&Locale::available()).await;
    let unprefixed;
    let trees: Vec<_> = if localized.is_empty() {
        info!("No per-locale content found, auditing unprefixed content");
        unprefixed = loader.load_site_content().await;
        vec![("default", &unprefixed)]
    } else {
        localized
            .iter()
            .map(|(locale, tree)| (locale.code(), tree))
            .collect()
    };

    let mut failed = false;
    for (label, tree) in trees {
        let report = validate_content(tree);
        for warning in &report.warnings {
            warn!("[{}] {}", label, warning);
        }
        for problem in &report.errors {
            error!("[{}] {}", label, problem);
        }
        info!(
            "[{}] {} pages, {} errors, {} warnings",
            label,
            tree.pages.len(),
            report.errors.len(),
            report.warnings.len()
        );
        failed |= !report.is_valid();
    }

    info!("Cache metrics: {:?}", loader.cache().metrics().report());

    if failed {
        anyhow::bail!("Content validation failed");
    }
    Ok(())
}

async fn render(
    config: &Config,
    cache: Arc<ContentCache>,
    loader: &ContentLoader,
    slug: &str,
    requested: Option<&str>,
) -> Result<()> {
    let locale = detect_locale(requested, None, None, config.default_locale);

    let mut localized = loader.load_localized_site_content(&Locale::available()).await;
    if localized.is_empty() {
        localized.insert(Locale::canonical(), loader.load_site_content().await);
    }

    let translations = Arc::new(TranslationLoader::new(cache, config.fallback_locale));
    let provider = I18nProvider::new(translations, locale);
    provider.mount().await;

    let scope = RenderScope::new()
        .with_i18n(provider.context())
        .with_content(ContentContext::new(Arc::new(localized)));

    let html = PageRenderer::new()
        .render_localized(&scope, slug)
        .with_context(|| format!("Page '{}' not found", slug))?;

    println!("{}", html);
    Ok(())
}

/// Client key and session token used for submissions from this binary.
const CLI_CLIENT: &str = "cli";

async fn submit(config: &Config, args: &[String]) -> Result<()> {
    let submitter = config.form_submitter()?;
    let fields = parse_fields(args)?;
    info!("Submitting {} form fields", fields.len());

    // The binary issues its own session token and echoes it back
    let submission = FormSubmission {
        client_key: CLI_CLIENT.to_string(),
        csrf_token: CLI_CLIENT.to_string(),
        session_token: CLI_CLIENT.to_string(),
        fields,
    };
    let delivered = submitter.submit(&submission).await?;

    info!("Form delivered: {:?}", delivered.keys().collect::<Vec<_>>());
    Ok(())
}

/// Parse `name=value` arguments into form fields.
fn parse_fields(args: &[String]) -> Result<BTreeMap<String, String>> {
    args.iter()
        .map(|arg| {
            let (name, value) = arg
                .split_once('=')
                .with_context(|| format!("Expected a name=value field, got '{}'", arg))?;
            anyhow::ensure!(!name.trim().is_empty(), "Field name missing in '{}'", arg);
            Ok((name.trim().to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields(&args(&["name=Ana", "message=a=b", "email="])).unwrap();

        assert_eq!(fields.get("name").map(String::as_str), Some("Ana"));
        assert_eq!(fields.get("message").map(String::as_str), Some("a=b"));
        assert_eq!(fields.get("email").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_fields_rejects_bare_words() {
        let err = parse_fields(&args(&["name"])).unwrap_err();
        assert!(err.to_string().contains("Expected a name=value field"));

        assert!(parse_fields(&args(&["=value"])).is_err());
    }
}
