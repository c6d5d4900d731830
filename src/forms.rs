//! Contact form submission with CSRF, rate limit and sanitization checks.

use crate::error::FormError;
use crate::security::{constant_time_compare, sanitize_input, RateLimiter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Fields that must be non-empty after sanitization.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

/// One submission as received from the client.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    /// Identifies the client for rate limiting (typically its IP address)
    pub client_key: String,

    /// Token echoed in the form body
    pub csrf_token: String,

    /// Token issued with the session (double-submit cookie)
    pub session_token: String,

    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    fields: &'a BTreeMap<String, String>,
}

/// Settings for [`FormSubmitter`].
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub endpoint: String,
    pub max_attempts: usize,
    pub window: Duration,
    pub max_field_length: usize,
}

/// Posts sanitized form fields to an external endpoint as JSON.
pub struct FormSubmitter {
    client: reqwest::Client,
    endpoint: String,
    limiter: RateLimiter,
    max_field_length: usize,
}

impl FormSubmitter {
    pub fn new(client: reqwest::Client, settings: FormSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint,
            limiter: RateLimiter::new(settings.max_attempts, settings.window),
            max_field_length: settings.max_field_length,
        }
    }

    /// Validate, sanitize and deliver a submission. No retries.
    ///
    /// Checks run in order: CSRF token, rate limit, required fields.
    ///
    /// # Returns
    /// The sanitized fields that were delivered.
    pub async fn submit(
        &self,
        submission: &FormSubmission,
    ) -> Result<BTreeMap<String, String>, FormError> {
        if submission.session_token.is_empty()
            || !constant_time_compare(&submission.csrf_token, &submission.session_token)
        {
            return Err(FormError::InvalidCsrfToken);
        }

        if !self.limiter.check(&submission.client_key) {
            return Err(FormError::RateLimited {
                client_key: submission.client_key.clone(),
            });
        }

        let fields: BTreeMap<String, String> = submission
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), sanitize_input(value, self.max_field_length)))
            .collect();

        for required in REQUIRED_FIELDS {
            if fields.get(required).map_or(true, |value| value.is_empty()) {
                return Err(FormError::MissingField(required.to_string()));
            }
        }

        debug!("Posting {} form fields to {}", fields.len(), self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SubmitRequest { fields: &fields })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FormError::Status { status, body });
        }

        info!("Form submission delivered for client '{}'", submission.client_key);
        Ok(fields)
    }
}
