use std::rc::Rc;

use shared::config::ClientConfig;

mod app;
mod components;
mod context;
mod hooks;
mod pages;
mod services;

use app::{App, AppProps};
use services::logging;
use services::storage::Preferences;

fn main() {
    let config = ClientConfig::default().with_api_base_override(Preferences::api_base().as_deref());
    logging::init(&config.log_level);
    tracing::info!(api_base = %config.api_base_url, "starting income tracker");

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
