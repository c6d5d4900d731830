//! Error types shared across the crate.
//!
//! Domain-data failures (`LoadError`) are absorbed by the loaders and only
//! surface in logs. Structural and integration errors are returned to the
//! caller so they fail loudly.

use thiserror::Error;

/// Failure to fetch or decode a content/translation document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("content '{path}' not found")]
    NotFound { path: String },

    #[error("invalid content path '{path}'")]
    InvalidPath { path: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request for '{path}' failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for '{path}' returned HTTP {status}")]
    Status { path: String, status: u16 },
}

/// Strict structural violation reported by `validate_content_structure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("content must be a JSON object")]
    NotAnObject,

    #[error("content is missing a slug")]
    MissingSlug,

    #[error("content is missing its sections list")]
    MissingSections,

    #[error("content must contain at least one section")]
    EmptySections,

    #[error("content is missing metadata.title")]
    MissingTitle,

    #[error("content is missing metadata.description")]
    MissingDescription,

    #[error("section at index {index} is missing an id")]
    MissingSectionId { index: usize },

    #[error("section at index {index} is missing a type")]
    MissingSectionType { index: usize },
}

/// A section document that cannot be turned into a typed section.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("section is missing an id")]
    MissingId,

    #[error("section '{id}' is missing a type")]
    MissingType { id: String },

    #[error("section '{id}' has an invalid '{tag}' payload: {source}")]
    Payload {
        id: String,
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A locale code that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("Unknown locale code: '{0}'")]
    Unknown(String),

    #[error("Locale '{0}' is not enabled")]
    Disabled(String),
}

/// Integration misuse: a context was requested that was never provided.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("{0} context accessed outside of its provider")]
    MissingProvider(&'static str),
}

/// A contact form submission that was rejected or could not be delivered.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("CSRF token mismatch")]
    InvalidCsrfToken,

    #[error("too many submissions from '{client_key}'")]
    RateLimited { client_key: String },

    #[error("required field '{0}' is empty")]
    MissingField(String),

    #[error("form endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("form endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
