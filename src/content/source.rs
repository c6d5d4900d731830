//! Content sources: where raw JSON documents come from.
//!
//! A source maps a logical path (`global`, `assets`, `pages/home`,
//! `translations/fr`, optionally under a `<locale>/` prefix) to a parsed
//! JSON document. Sources do no caching; that is the job of
//! [`ContentCache`](crate::content::ContentCache).

use crate::error::LoadError;
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can fetch a JSON document by logical path.
pub trait ContentSource: Send + Sync {
    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Value, LoadError>>;
}

/// Reject logical paths that could escape the content root.
fn validate_logical_path(path: &str) -> Result<(), LoadError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if invalid {
        return Err(LoadError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

fn parse_document(path: &str, raw: &str) -> Result<Value, LoadError> {
    serde_json::from_str(raw).map_err(|source| LoadError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Reads `<root>/<path>.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, path: &str) -> PathBuf {
        self.root.join(format!("{}.json", path))
    }
}

impl ContentSource for FsSource {
    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Value, LoadError>> {
        let logical = path.to_string();
        async move {
            validate_logical_path(&logical)?;
            let file = self.file_for(&logical);
            debug!("Reading content file {}", file.display());

            let raw = tokio::fs::read_to_string(&file).await.map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    LoadError::NotFound {
                        path: logical.clone(),
                    }
                } else {
                    LoadError::Io {
                        path: logical.clone(),
                        source,
                    }
                }
            })?;

            parse_document(&logical, &raw)
        }
        .boxed()
    }
}

/// Fetches `GET <base_url>/<path>.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }
}

impl ContentSource for HttpSource {
    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Value, LoadError>> {
        let logical = path.to_string();
        async move {
            validate_logical_path(&logical)?;
            let url = self.url_for(&logical);
            debug!("Fetching content from {}", url);

            let http_error = |source| LoadError::Http {
                path: logical.clone(),
                source,
            };

            let response = self.client.get(&url).send().await.map_err(http_error)?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(LoadError::NotFound {
                    path: logical.clone(),
                });
            }
            if !status.is_success() {
                return Err(LoadError::Status {
                    path: logical.clone(),
                    status: status.as_u16(),
                });
            }

            let raw = response.text().await.map_err(http_error)?;
            parse_document(&logical, &raw)
        }
        .boxed()
    }
}

/// In-memory documents, e.g. content embedded at build time.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, Value>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, document: Value) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, document: Value) {
        self.documents.insert(path.into(), document);
    }
}

impl ContentSource for StaticSource {
    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Value, LoadError>> {
        let result = validate_logical_path(path).and_then(|()| {
            self.documents
                .get(path)
                .cloned()
                .ok_or_else(|| LoadError::NotFound {
                    path: path.to_string(),
                })
        });
        future::ready(result).boxed()
    }
}
