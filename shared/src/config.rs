//! Client configuration and UI preferences.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::i18n::Language;

/// Local storage key of the preferred language
pub const LANGUAGE_STORAGE_KEY: &str = "preferredLanguage";
/// Local storage key of the preferred style
pub const STYLE_STORAGE_KEY: &str = "preferredStyle";
/// Local storage key overriding [`ClientConfig::api_base_url`]
pub const API_BASE_STORAGE_KEY: &str = "incomeTrackerApiBase";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix of every API path; empty means same origin
    pub api_base_url: String,
    /// Used when neither storage nor the browser name a supported language
    pub default_language: Language,
    pub toast_duration_ms: u32,
    /// Rows in the dashboard's recent transactions list
    pub recent_transactions: u32,
    pub page_size: u32,
    pub monthly_comparison_months: u32,
    /// `tracing` filter directive, e.g. `info` or `income_tracker_frontend=debug`
    pub log_level: String,
    pub locales_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            default_language: Language::En,
            toast_duration_ms: 3000,
            recent_transactions: 5,
            page_size: 20,
            monthly_comparison_months: 6,
            log_level: "info".to_string(),
            locales_path: "locales".to_string(),
        }
    }
}

impl ClientConfig {
    /// Apply a stored API base, ignoring blanks and dropping trailing slashes
    pub fn with_api_base_override(mut self, stored: Option<&str>) -> Self {
        if let Some(base) = stored.map(str::trim).filter(|base| !base.is_empty()) {
            self.api_base_url = base.trim_end_matches('/').to_string();
        }
        self
    }

    /// Absolute or origin-relative URL of an API path such as `/api/auth/me`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    pub fn locale_url(&self, language: Language) -> String {
        format!("{}/{}.json", self.locales_path.trim_end_matches('/'), language.code())
    }
}

/// Visual theme, selected by swapping the page stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UiStyle {
    #[default]
    Classic,
    Modern,
}

impl UiStyle {
    pub const ALL: [UiStyle; 2] = [UiStyle::Classic, UiStyle::Modern];

    pub fn as_str(self) -> &'static str {
        match self {
            UiStyle::Classic => "classic",
            UiStyle::Modern => "modern",
        }
    }

    pub fn stylesheet(self) -> &'static str {
        match self {
            UiStyle::Classic => "styles.css",
            UiStyle::Modern => "modernui.css",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            UiStyle::Classic => "style.classic",
            UiStyle::Modern => "style.modern",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == value.trim())
    }
}

impl fmt::Display for UiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.toast_duration_ms, 3000);
        assert_eq!(config.recent_transactions, 5);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.monthly_comparison_months, 6);
        assert_eq!(config.api_url("/api/auth/me"), "/api/auth/me");
    }

    #[test]
    fn test_api_base_override() {
        let config = ClientConfig::default().with_api_base_override(Some("http://localhost:5000/ "));
        assert_eq!(config.api_url("/api/categories"), "http://localhost:5000/api/categories");

        let config = ClientConfig::default().with_api_base_override(Some("   "));
        assert_eq!(config.api_base_url, "");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"log_level": "debug"}"#).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_locale_url() {
        let config = ClientConfig {
            locales_path: "static/locales/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.locale_url(Language::Ja), "static/locales/ja.json");
    }

    #[test]
    fn test_style_stylesheets() {
        assert_eq!(UiStyle::parse("modern"), Some(UiStyle::Modern));
        assert_eq!(UiStyle::default().stylesheet(), "styles.css");
        assert_eq!(UiStyle::Modern.stylesheet(), "modernui.css");
        assert_eq!(UiStyle::parse("dark"), None);
    }
}
