//! Fetching locale files into a [`LocaleStore`].

use anyhow::{bail, Context, Result};
use futures::future::join_all;
use gloo::net::http::Request;
use shared::config::ClientConfig;
use shared::i18n::{Dictionary, Language, LocaleStore};

async fn fetch_dictionary(url: &str) -> Result<Dictionary> {
    let response = Request::get(url)
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?;
    if !response.ok() {
        bail!("{url} answered with status {}", response.status());
    }
    let text = response
        .text()
        .await
        .with_context(|| format!("reading {url}"))?;
    Dictionary::from_json(&text).with_context(|| format!("parsing {url}"))
}

/// Baseline dictionaries plus every locale file that could be fetched.
///
/// All files are requested at once. A language whose file fails keeps only
/// its baseline strings (or none) and resolves through the English fallback.
pub async fn load_locales(config: &ClientConfig) -> LocaleStore {
    let requests = Language::ALL.into_iter().map(|language| async move {
        let url = config.locale_url(language);
        (language, fetch_dictionary(&url).await)
    });

    let mut store = LocaleStore::with_baseline();
    let mut loaded = 0usize;
    for (language, result) in join_all(requests).await {
        match result {
            Ok(dictionary) => {
                store.insert(language, dictionary);
                loaded += 1;
            }
            Err(e) => tracing::warn!(language = %language, error = format!("{e:#}"), "locale not loaded"),
        }
    }
    tracing::info!(loaded, total = Language::ALL.len(), "locales ready");
    store
}
