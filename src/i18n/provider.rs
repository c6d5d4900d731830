//! I18n provider: the current locale, its translations, and the loading
//! state machine around locale changes.
//!
//! ```text
//! Uninitialized --mount--> Loading --bundle--> Ready
//!                             ^                  |
//!                             +---set_locale-----+
//! ```
//!
//! Each locale request bumps a generation counter. A load only applies its
//! bundle if its generation is still the latest, so when locale changes
//! overlap the most recent request wins regardless of completion order.

use crate::i18n::cookie::{DocumentLanguage, LocaleCookie};
use crate::i18n::format::{format_currency, format_date, format_number};
use crate::i18n::loader::TranslationLoader;
use crate::i18n::translations::{translate_key, translate_plural, Params, TranslationBundle};
use crate::i18n::Locale;
use crate::sync::lock;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Uninitialized,
    Loading,
    Ready,
}

/// Status changes published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
    Loading { locale: Locale },
    Ready { locale: Locale },
}

struct ProviderState {
    status: ProviderStatus,
    locale: Locale,
    bundle: Option<Arc<TranslationBundle>>,
    generation: u64,
    cookie: Option<LocaleCookie>,
    document: DocumentLanguage,
}

pub struct I18nProvider {
    loader: Arc<TranslationLoader>,
    state: Mutex<ProviderState>,
    events: broadcast::Sender<ProviderEvent>,
}

impl I18nProvider {
    /// # Arguments
    /// * `loader` - Shared translation loader
    /// * `initial` - Locale to load on `mount`, usually from `detect_locale`
    pub fn new(loader: Arc<TranslationLoader>, initial: Locale) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            loader,
            state: Mutex::new(ProviderState {
                status: ProviderStatus::Uninitialized,
                locale: initial,
                bundle: None,
                generation: 0,
                cookie: None,
                document: DocumentLanguage::for_locale(initial),
            }),
            events,
        }
    }

    /// Load translations for the initial locale.
    pub async fn mount(&self) -> bool {
        let locale = self.locale();
        self.activate(locale).await
    }

    /// Switch to `locale`: persist the choice, update the document
    /// attributes, then load its translations.
    ///
    /// # Returns
    /// `true` if this request's bundle was applied, `false` if a later
    /// request superseded it while loading.
    pub async fn set_locale(&self, locale: Locale) -> bool {
        {
            let mut state = lock(&self.state);
            state.cookie = Some(LocaleCookie::new(locale));
            state.document = DocumentLanguage::for_locale(locale);
        }
        info!("Switching locale to '{}'", locale);
        self.activate(locale).await
    }

    async fn activate(&self, locale: Locale) -> bool {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.status = ProviderStatus::Loading;
            state.locale = locale;
            state.generation
        };
        let _ = self.events.send(ProviderEvent::Loading { locale });

        let bundle = self.loader.load_translations(locale).await;

        {
            let mut state = lock(&self.state);
            if state.generation != generation {
                debug!(
                    "Discarding translations for '{}': superseded by '{}'",
                    locale, state.locale
                );
                return false;
            }
            state.bundle = Some(bundle);
            state.status = ProviderStatus::Ready;
        }
        let _ = self.events.send(ProviderEvent::Ready { locale });
        true
    }

    pub fn status(&self) -> ProviderStatus {
        lock(&self.state).status
    }

    /// The most recently requested locale.
    pub fn locale(&self) -> Locale {
        lock(&self.state).locale
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }

    /// Cookie written by the last `set_locale`, if any.
    pub fn cookie(&self) -> Option<LocaleCookie> {
        lock(&self.state).cookie
    }

    pub fn document(&self) -> DocumentLanguage {
        lock(&self.state).document
    }

    /// Snapshot of the current locale and translations.
    ///
    /// While the first load is pending the snapshot carries an empty
    /// bundle, so every key renders as itself.
    pub fn context(&self) -> I18nContext {
        let state = lock(&self.state);
        let bundle = state
            .bundle
            .clone()
            .unwrap_or_else(|| Arc::new(TranslationBundle::empty(state.locale)));
        I18nContext {
            locale: state.locale,
            status: state.status,
            bundle,
        }
    }
}

/// Immutable view handed to rendering code.
#[derive(Debug, Clone)]
pub struct I18nContext {
    locale: Locale,
    status: ProviderStatus,
    bundle: Arc<TranslationBundle>,
}

impl I18nContext {
    /// A ready context over an already loaded bundle.
    pub fn new(locale: Locale, bundle: Arc<TranslationBundle>) -> Self {
        Self {
            locale,
            status: ProviderStatus::Ready,
            bundle,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn status(&self) -> ProviderStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status != ProviderStatus::Ready
    }

    pub fn bundle(&self) -> &TranslationBundle {
        &self.bundle
    }

    pub fn t(&self, key: &str, params: Option<&Params>) -> String {
        translate_key(key, &self.bundle, params, None)
    }

    pub fn t_plural(&self, key: &str, count: i64, params: Option<&Params>) -> String {
        translate_plural(key, count, &self.bundle, params)
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        format_date(self.locale, date)
    }

    pub fn format_number(&self, value: f64) -> String {
        format_number(self.locale, value)
    }

    pub fn format_currency(&self, amount: f64) -> String {
        format_currency(self.locale, amount)
    }

    pub fn is_rtl(&self) -> bool {
        self.locale.is_rtl()
    }

    pub fn available_locales(&self) -> Vec<Locale> {
        Locale::available()
    }

    pub fn document(&self) -> DocumentLanguage {
        DocumentLanguage::for_locale(self.locale)
    }
}
