//! Explicit context injection for rendering.
//!
//! A [`RenderScope`] carries the contexts a renderer may read. Reading a
//! context that was never provided is an integration bug: the plain
//! accessors panic at the access site, the `try_*` accessors return
//! [`ContextError::MissingProvider`].

use crate::content::ContentContext;
use crate::error::ContextError;
use crate::i18n::I18nContext;

#[derive(Debug, Clone, Default)]
pub struct RenderScope {
    i18n: Option<I18nContext>,
    content: Option<ContentContext>,
}

impl RenderScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_i18n(mut self, i18n: I18nContext) -> Self {
        self.i18n = Some(i18n);
        self
    }

    pub fn with_content(mut self, content: ContentContext) -> Self {
        self.content = Some(content);
        self
    }

    pub fn try_i18n(&self) -> Result<&I18nContext, ContextError> {
        self.i18n.as_ref().ok_or(ContextError::MissingProvider("I18n"))
    }

    pub fn try_content(&self) -> Result<&ContentContext, ContextError> {
        self.content
            .as_ref()
            .ok_or(ContextError::MissingProvider("Content"))
    }

    /// # Panics
    /// If no i18n context was provided.
    pub fn i18n(&self) -> &I18nContext {
        self.try_i18n().unwrap_or_else(|e| panic!("{}", e))
    }

    /// # Panics
    /// If no content context was provided.
    pub fn content(&self) -> &ContentContext {
        self.try_content().unwrap_or_else(|e| panic!("{}", e))
    }
}
