//! User preferences persisted in `localStorage`.

use shared::config::{UiStyle, API_BASE_STORAGE_KEY, LANGUAGE_STORAGE_KEY, STYLE_STORAGE_KEY};
use shared::i18n::Language;

pub struct Preferences;

impl Preferences {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    pub fn set(key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!(key, "failed to persist preference");
                }
            }
            None => tracing::warn!(key, "local storage unavailable"),
        }
    }

    pub fn language() -> Option<Language> {
        Self::get(LANGUAGE_STORAGE_KEY).and_then(|code| Language::from_code(&code))
    }

    pub fn set_language(language: Language) {
        Self::set(LANGUAGE_STORAGE_KEY, language.code());
    }

    pub fn style() -> Option<UiStyle> {
        Self::get(STYLE_STORAGE_KEY).and_then(|value| UiStyle::parse(&value))
    }

    pub fn set_style(style: UiStyle) {
        Self::set(STYLE_STORAGE_KEY, style.as_str());
    }

    pub fn api_base() -> Option<String> {
        Self::get(API_BASE_STORAGE_KEY)
    }
}

/// Language tag the browser reports, e.g. `de-AT`
pub fn browser_language() -> Option<String> {
    web_sys::window()?.navigator().language()
}

/// Stored preference, then the browser's language, then `default`
pub fn initial_language(default: Language) -> Language {
    let stored = Preferences::get(LANGUAGE_STORAGE_KEY);
    let browser = browser_language();
    Language::negotiate([stored.as_deref(), browser.as_deref()], default)
}
