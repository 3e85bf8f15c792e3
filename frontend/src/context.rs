use std::cell::RefCell;
use std::rc::Rc;

use shared::config::{ClientConfig, UiStyle};
use shared::i18n::{Language, LocaleStore};
use shared::routing::{Page, RequestTicket, Router, Session};
use shared::{ApiError, Category, User};
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::charts::ChartsManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "message message-success",
            ToastKind::Error => "message message-error",
            ToastKind::Info => "message message-info",
        }
    }
}

/// Callbacks into the [`App`](crate::app::App) controller
#[derive(Clone, PartialEq)]
pub struct AppActions {
    pub navigate: Callback<Page>,
    pub switch_language: Callback<Language>,
    pub switch_style: Callback<UiStyle>,
    pub logged_in: Callback<User>,
    pub logout: Callback<()>,
    /// A request came back 401 while signed in
    pub unauthorized: Callback<()>,
    pub toast: Callback<(ToastKind, String)>,
    pub categories_loaded: Callback<Vec<Category>>,
}

/// Everything a page needs from the controller, provided through context
#[derive(Clone)]
pub struct AppContext {
    pub config: Rc<ClientConfig>,
    pub locales: Rc<LocaleStore>,
    pub language: Language,
    pub style: UiStyle,
    pub session: Session,
    pub categories: Rc<Vec<Category>>,
    pub api: ApiClient,
    pub router: Rc<RefCell<Router>>,
    pub charts: Rc<RefCell<ChartsManager>>,
    pub actions: AppActions,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.locales, &other.locales)
            && Rc::ptr_eq(&self.categories, &other.categories)
            && Rc::ptr_eq(&self.router, &other.router)
            && Rc::ptr_eq(&self.charts, &other.charts)
            && self.language == other.language
            && self.style == other.style
            && self.session == other.session
            && self.api == other.api
            && self.actions == other.actions
    }
}

impl AppContext {
    /// Translated text for `key`
    pub fn t(&self, key: &str) -> String {
        self.locales.resolve(self.language, key)
    }

    pub fn t_fmt(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.locales.resolve_fmt(self.language, key, args)
    }

    pub fn ticket(&self) -> RequestTicket {
        self.router.borrow().ticket()
    }

    /// Whether a response issued under `ticket` may still touch the UI
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let current = self.router.borrow().is_current(ticket);
        if !current {
            tracing::debug!(page = %ticket.page, epoch = ticket.epoch, "dropping stale response");
        }
        current
    }

    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        self.actions.toast.emit((kind, message.into()));
    }

    /// Server text when present, otherwise the translation of `fallback_key`
    pub fn server_message(&self, message: Option<&str>, fallback_key: &str) -> String {
        match message.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => text.to_string(),
            None => self.t(fallback_key),
        }
    }

    /// Surface a failed call: a 401 during a session ends it silently, every
    /// other failure becomes an error toast.
    pub fn report_error(&self, error: &ApiError, action_key: &str) {
        if error.is_unauthorized() && self.session.is_logged_in() {
            tracing::info!("session expired");
            self.actions.unauthorized.emit(());
            return;
        }
        tracing::warn!(%error, action = action_key, "request failed");
        self.toast(
            ToastKind::Error,
            error.user_message(&self.locales, self.language, action_key),
        );
    }
}
