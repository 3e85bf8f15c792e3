//! Locale store: translation dictionaries keyed by language, with dotted
//! key-path lookup and fallback to English.
//!
//! A lookup never fails loudly. When neither the requested language nor the
//! fallback language holds a string at the key path, the caller receives a
//! visible placeholder such as `[[dashboard.total_income]]`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Language used when nothing else is known and for missing keys
pub const DEFAULT_LANGUAGE: Language = Language::En;

/// The fixed set of UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    #[default]
    En,
    Fr,
    Es,
    De,
    Ja,
    It,
    Pt,
    Ru,
    Ar,
    Ko,
    Hi,
    Id,
    Tr,
    Nl,
    Pl,
    Sv,
    Vi,
    Th,
    Uk,
}

impl Language {
    pub const ALL: [Language; 20] = [
        Language::Zh,
        Language::En,
        Language::Fr,
        Language::Es,
        Language::De,
        Language::Ja,
        Language::It,
        Language::Pt,
        Language::Ru,
        Language::Ar,
        Language::Ko,
        Language::Hi,
        Language::Id,
        Language::Tr,
        Language::Nl,
        Language::Pl,
        Language::Sv,
        Language::Vi,
        Language::Th,
        Language::Uk,
    ];

    /// Two-letter code, also the locale file name and `Accept-Language` value
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::De => "de",
            Language::Ja => "ja",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Ar => "ar",
            Language::Ko => "ko",
            Language::Hi => "hi",
            Language::Id => "id",
            Language::Tr => "tr",
            Language::Nl => "nl",
            Language::Pl => "pl",
            Language::Sv => "sv",
            Language::Vi => "vi",
            Language::Th => "th",
            Language::Uk => "uk",
        }
    }

    /// Name of the language in itself, for the switcher buttons
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Zh => "中文",
            Language::En => "English",
            Language::Fr => "Français",
            Language::Es => "Español",
            Language::De => "Deutsch",
            Language::Ja => "日本語",
            Language::It => "Italiano",
            Language::Pt => "Português",
            Language::Ru => "Русский",
            Language::Ar => "العربية",
            Language::Ko => "한국어",
            Language::Hi => "हिन्दी",
            Language::Id => "Bahasa Indonesia",
            Language::Tr => "Türkçe",
            Language::Nl => "Nederlands",
            Language::Pl => "Polski",
            Language::Sv => "Svenska",
            Language::Vi => "Tiếng Việt",
            Language::Th => "ไทย",
            Language::Uk => "Українська",
        }
    }

    /// Parse a language tag such as `en`, `zh-CN` or `PT_br`.
    ///
    /// Region suffixes are ignored; unsupported languages give `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == primary)
    }

    /// First supported language among the candidates, `default` otherwise
    pub fn negotiate<'a, I>(candidates: I, default: Language) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        candidates
            .into_iter()
            .flatten()
            .find_map(Self::from_code)
            .unwrap_or(default)
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Value for the document's `dir` attribute
    pub fn direction(self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum I18nError {
    #[error("locale file is not valid JSON: {0}")]
    Parse(String),
    #[error("locale root must be an object")]
    NotAnObject,
}

/// Why a key path could not be resolved inside one dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMiss {
    /// A segment was absent at this depth
    MissingSegment(usize),
    /// A string or number was met before the path was exhausted
    NotAMapping(usize),
    /// The path ended on a nested mapping
    NotAString,
}

/// One language's translations, as nested mappings of key segments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    root: Map<String, Value>,
}

impl Dictionary {
    pub fn from_json(text: &str) -> Result<Self, I18nError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| I18nError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, I18nError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(I18nError::NotAnObject),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walk `key_path` segment by segment
    pub fn walk(&self, key_path: &str) -> Result<&str, LookupMiss> {
        let mut segments = key_path.split('.').enumerate();
        let (_, first) = segments.next().ok_or(LookupMiss::MissingSegment(0))?;
        let mut current = self.root.get(first).ok_or(LookupMiss::MissingSegment(0))?;

        for (depth, segment) in segments {
            current = match current {
                Value::Object(map) => map.get(segment).ok_or(LookupMiss::MissingSegment(depth))?,
                _ => return Err(LookupMiss::NotAMapping(depth)),
            };
        }

        match current {
            Value::String(text) => Ok(text.as_str()),
            _ => Err(LookupMiss::NotAString),
        }
    }

    pub fn lookup(&self, key_path: &str) -> Option<&str> {
        self.walk(key_path).ok()
    }

    /// Lay `self` over `base`: top-level sections of `self` replace those of `base`
    pub fn merged_over(self, mut base: Dictionary) -> Dictionary {
        for (key, value) in self.root {
            base.root.insert(key, value);
        }
        base
    }
}

/// Placeholder rendered for a key path nobody could resolve
pub fn placeholder(key_path: &str) -> String {
    format!("[[{key_path}]]")
}

/// Replace `{name}` markers with the given values
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

/// All loaded dictionaries, one per language
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleStore {
    dictionaries: HashMap<Language, Dictionary>,
    fallback: Language,
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::with_baseline()
    }
}

impl LocaleStore {
    /// Store without any dictionary; every lookup yields a placeholder
    pub fn empty(fallback: Language) -> Self {
        Self {
            dictionaries: HashMap::new(),
            fallback,
        }
    }

    /// Store seeded with the built-in English and Chinese strings
    pub fn with_baseline() -> Self {
        let mut store = Self::empty(DEFAULT_LANGUAGE);
        for (language, dictionary) in baseline_dictionaries() {
            store.dictionaries.insert(language, dictionary);
        }
        store
    }

    pub fn fallback(&self) -> Language {
        self.fallback
    }

    /// Add a loaded dictionary, layered over whatever the language already had
    pub fn insert(&mut self, language: Language, dictionary: Dictionary) {
        let merged = match self.dictionaries.remove(&language) {
            Some(existing) => dictionary.merged_over(existing),
            None => dictionary,
        };
        self.dictionaries.insert(language, merged);
    }

    pub fn dictionary(&self, language: Language) -> Option<&Dictionary> {
        self.dictionaries.get(&language)
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.dictionaries.contains_key(&language)
    }

    /// String for `key_path` in `language`, then in the fallback language
    pub fn try_resolve(&self, language: Language, key_path: &str) -> Option<&str> {
        if let Some(text) = self.dictionary(language).and_then(|d| d.lookup(key_path)) {
            return Some(text);
        }
        if language != self.fallback {
            if let Some(text) = self.dictionary(self.fallback).and_then(|d| d.lookup(key_path)) {
                tracing::debug!(key = key_path, language = %language, "using fallback translation");
                return Some(text);
            }
        }
        None
    }

    /// Like [`try_resolve`](Self::try_resolve) but always yields something
    /// printable: the placeholder `[[key_path]]` when nothing matched.
    pub fn resolve(&self, language: Language, key_path: &str) -> String {
        match self.try_resolve(language, key_path) {
            Some(text) => text.to_string(),
            None => {
                tracing::warn!(key = key_path, language = %language, "translation key not found");
                placeholder(key_path)
            }
        }
    }

    pub fn resolve_fmt(&self, language: Language, key_path: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.resolve(language, key_path), args)
    }
}

/// Strings shipped inside the binary so the login screen renders even when
/// no locale file could be fetched.
fn baseline_dictionaries() -> Vec<(Language, Dictionary)> {
    let en = json!({
        "app_title": "Income Tracker",
        "auth": {
            "login": "Login",
            "register": "Register",
            "username": "Username",
            "password": "Password",
            "email": "Email",
            "no_account": "No account?",
            "have_account": "Have account?",
            "logout": "Logout"
        },
        "nav": {
            "dashboard": "Dashboard",
            "transactions": "Transactions",
            "categories": "Categories",
            "analytics": "Analytics"
        },
        "dashboard": {
            "total_income": "Total Income",
            "total_expense": "Total Expense",
            "net_income": "Net Income",
            "quick_add": "Quick Add",
            "recent_transactions": "Recent Transactions",
            "no_transactions": "No transactions"
        },
        "transaction": {
            "income": "Income",
            "expense": "Expense",
            "select_category": "Select Category"
        },
        "common": {
            "add": "Add",
            "loading": "Loading..."
        },
        "messages": {
            "network_error": "Network error, please try again",
            "load_failed": "Failed to load data"
        }
    });
    let zh = json!({
        "app_title": "收入追踪器",
        "auth": {
            "login": "登录",
            "register": "注册",
            "username": "用户名",
            "password": "密码",
            "email": "邮箱",
            "no_account": "没有账户？",
            "have_account": "已有账户？",
            "logout": "登出"
        },
        "nav": {
            "dashboard": "仪表板",
            "transactions": "交易记录",
            "categories": "类别管理",
            "analytics": "数据分析"
        },
        "dashboard": {
            "total_income": "总收入",
            "total_expense": "总支出",
            "net_income": "净收入",
            "quick_add": "快速添加",
            "recent_transactions": "最近交易",
            "no_transactions": "暂无交易记录"
        },
        "transaction": {
            "income": "收入",
            "expense": "支出",
            "select_category": "选择类别"
        },
        "common": {
            "add": "添加",
            "loading": "加载中..."
        },
        "messages": {
            "network_error": "网络错误，请重试",
            "load_failed": "加载数据失败"
        }
    });

    [(Language::En, en), (Language::Zh, zh)]
        .into_iter()
        .filter_map(|(language, value)| Dictionary::from_value(value).ok().map(|d| (language, d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(value: Value) -> Dictionary {
        Dictionary::from_value(value).unwrap()
    }

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code("zh-CN"), Some(Language::Zh));
        assert_eq!(Language::from_code("PT_br"), Some(Language::Pt));
        assert_eq!(Language::from_code(" uk "), Some(Language::Uk));
        assert_eq!(Language::from_code("xx"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn test_every_code_round_trips() {
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
    }

    #[test]
    fn test_negotiate_defaults_to_english() {
        assert_eq!(Language::negotiate([None, Some("xx-YY")], DEFAULT_LANGUAGE), Language::En);
        assert_eq!(Language::negotiate([None, Some("de-AT")], DEFAULT_LANGUAGE), Language::De);
        assert_eq!(Language::negotiate([Some("fr"), Some("de")], DEFAULT_LANGUAGE), Language::Fr);
        assert_eq!(Language::negotiate([Some("klingon"), None], Language::Zh), Language::Zh);
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn test_only_arabic_is_rtl() {
        for language in Language::ALL {
            assert_eq!(language.is_rtl(), language == Language::Ar);
        }
        assert_eq!(Language::Ar.direction(), "rtl");
        assert_eq!(Language::En.direction(), "ltr");
    }

    #[test]
    fn test_walk_present_key_returns_stored_string() {
        let dict = dictionary(json!({"auth": {"login": "Login"}, "app_title": "Tracker"}));
        assert_eq!(dict.lookup("auth.login"), Some("Login"));
        assert_eq!(dict.lookup("app_title"), Some("Tracker"));
    }

    #[test]
    fn test_walk_reports_why_lookup_missed() {
        let dict = dictionary(json!({"auth": {"login": "Login"}, "app_title": "Tracker"}));
        assert_eq!(dict.walk("auth.logout"), Err(LookupMiss::MissingSegment(1)));
        assert_eq!(dict.walk("nav.dashboard"), Err(LookupMiss::MissingSegment(0)));
        assert_eq!(dict.walk("app_title.long"), Err(LookupMiss::NotAMapping(1)));
        assert_eq!(dict.walk("auth"), Err(LookupMiss::NotAString));
        assert_eq!(dict.walk(""), Err(LookupMiss::MissingSegment(0)));
    }

    #[test]
    fn test_number_leaf_is_not_a_string() {
        let dict = dictionary(json!({"limits": {"max": 5}}));
        assert_eq!(dict.walk("limits.max"), Err(LookupMiss::NotAString));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert_eq!(Dictionary::from_json("[1, 2]"), Err(I18nError::NotAnObject));
        assert!(matches!(Dictionary::from_json("{oops"), Err(I18nError::Parse(_))));
        assert!(Dictionary::from_json(r#"{"a": "b"}"#).is_ok());
    }

    #[test]
    fn test_absent_path_resolves_to_placeholder() {
        let store = LocaleStore::with_baseline();
        for path in ["missing.key", "auth", "auth.login.deeper", "dashboard.nope"] {
            let text = store.resolve(Language::En, path);
            assert_eq!(text, format!("[[{path}]]"));
            assert!(text.contains(path));
        }
    }

    #[test]
    fn test_falls_back_to_english_for_missing_key() {
        let mut store = LocaleStore::with_baseline();
        store.insert(Language::Fr, dictionary(json!({"auth": {"login": "Connexion"}})));

        assert_eq!(store.resolve(Language::Fr, "auth.login"), "Connexion");
        assert_eq!(store.resolve(Language::Fr, "auth.password"), "Password");
    }

    #[test]
    fn test_falls_back_when_language_never_loaded() {
        let store = LocaleStore::with_baseline();
        assert!(!store.has_language(Language::Sv));
        assert_eq!(store.resolve(Language::Sv, "nav.analytics"), "Analytics");
    }

    #[test]
    fn test_every_fallback_key_resolves_after_switch() {
        let mut store = LocaleStore::with_baseline();
        store.insert(Language::De, dictionary(json!({"nav": {"dashboard": "Übersicht"}})));
        let keys = ["app_title", "auth.login", "nav.dashboard", "nav.analytics", "common.loading"];

        for language in Language::ALL {
            for key in keys {
                let text = store.resolve(language, key);
                assert!(!text.starts_with("[["), "{language} rendered placeholder for {key}");
                assert_ne!(text, key);
            }
        }
        assert_eq!(store.resolve(Language::De, "nav.dashboard"), "Übersicht");
    }

    #[test]
    fn test_insert_merges_over_baseline() {
        let mut store = LocaleStore::with_baseline();
        store.insert(
            Language::Zh,
            dictionary(json!({"analytics": {"week": "本周"}, "app_title": "增强收入追踪器"})),
        );
        assert_eq!(store.resolve(Language::Zh, "analytics.week"), "本周");
        assert_eq!(store.resolve(Language::Zh, "app_title"), "增强收入追踪器");
        assert_eq!(store.resolve(Language::Zh, "auth.login"), "登录");
    }

    #[test]
    fn test_empty_store_never_panics() {
        let store = LocaleStore::empty(Language::En);
        assert_eq!(store.resolve(Language::Ja, "auth.login"), "[[auth.login]]");
        assert_eq!(store.try_resolve(Language::En, "auth.login"), None);
    }

    #[test]
    fn test_resolve_fmt_interpolates() {
        let mut store = LocaleStore::with_baseline();
        store.insert(
            Language::En,
            dictionary(json!({"insights": {"savings_rate": "Your savings rate is {rate}%"}})),
        );
        assert_eq!(
            store.resolve_fmt(Language::En, "insights.savings_rate", &[("rate", "40.0")]),
            "Your savings rate is 40.0%"
        );
    }

    #[test]
    fn test_interpolate_leaves_unknown_markers() {
        assert_eq!(interpolate("{a} and {b}", &[("a", "1")]), "1 and {b}");
    }
}
