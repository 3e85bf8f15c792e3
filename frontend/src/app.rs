use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use shared::analytics::AnalyticsFilter;
use shared::config::{ClientConfig, UiStyle};
use shared::i18n::{Language, LocaleStore};
use shared::routing::{Page, Router, Session};
use shared::{Category, User};
use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlLinkElement;
use yew::prelude::*;

use crate::components::language_switcher::LanguageSwitcher;
use crate::components::nav::NavBar;
use crate::components::style_switcher::StyleSwitcher;
use crate::components::toast::{Toast, ToastContainer};
use crate::context::{AppActions, AppContext, ToastKind};
use crate::pages::{AnalyticsPage, DashboardPage, LoginPage, RegisterPage, TransactionsPage};
use crate::services::api::ApiClient;
use crate::services::charts::ChartsManager;
use crate::services::locales::load_locales;
use crate::services::storage::{initial_language, Preferences};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<ClientConfig>,
}

pub enum Msg {
    LocalesLoaded(LocaleStore),
    AuthChecked(Option<User>),
    Navigate(Page),
    SwitchLanguage(Language),
    SwitchStyle(UiStyle),
    LoggedIn(User),
    Logout,
    LoggedOut,
    Unauthorized,
    ShowToast(ToastKind, String),
    DismissToast(Uuid),
    CategoriesLoaded(Vec<Category>),
}

/// Root controller: owns the session, the router, the locale store and the
/// chart manager, and renders the current page between the persistent
/// language and style switchers.
pub struct App {
    config: Rc<ClientConfig>,
    ready: bool,
    locales: Rc<LocaleStore>,
    language: Language,
    style: UiStyle,
    session: Session,
    router: Rc<RefCell<Router>>,
    charts: Rc<RefCell<ChartsManager>>,
    categories: Rc<Vec<Category>>,
    /// Created on the first visit to analytics, kept for the whole session
    analytics: Option<Rc<RefCell<AnalyticsFilter>>>,
    api: ApiClient,
    toasts: Vec<Toast>,
    actions: AppActions,
}

fn apply_language(language: Language) {
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element());
    if let Some(root) = root {
        let lang = root.set_attribute("lang", language.code());
        let dir = root.set_attribute("dir", language.direction());
        if lang.is_err() || dir.is_err() {
            tracing::warn!(language = %language, "failed to update document language");
        }
    }
}

fn apply_style(style: UiStyle) {
    let link = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("style-link"))
        .and_then(|element| element.dyn_into::<HtmlLinkElement>().ok());
    match link {
        Some(link) => link.set_href(style.stylesheet()),
        None => tracing::warn!("stylesheet link #style-link not found"),
    }
}

impl App {
    fn context(&self) -> AppContext {
        AppContext {
            config: Rc::clone(&self.config),
            locales: Rc::clone(&self.locales),
            language: self.language,
            style: self.style,
            session: self.session.clone(),
            categories: Rc::clone(&self.categories),
            api: self.api.clone(),
            router: Rc::clone(&self.router),
            charts: Rc::clone(&self.charts),
            actions: self.actions.clone(),
        }
    }

    fn navigate(&mut self, requested: Page) {
        let navigation = self.router.borrow_mut().navigate(requested, &self.session);
        if navigation.release_charts {
            self.charts.borrow_mut().destroy_all();
        }
        if navigation.to == Page::Analytics && self.analytics.is_none() {
            self.analytics = Some(Rc::new(RefCell::new(AnalyticsFilter::default())));
        }
        tracing::info!(
            from = %navigation.from,
            to = %navigation.to,
            redirected = navigation.redirected,
            "navigate"
        );
    }

    fn check_auth(&self, ctx: &Context<Self>) {
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let user = match api.current_user().await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::info!(error = %e, "no active session");
                    None
                }
            };
            link.send_message(Msg::AuthChecked(user));
        });
    }

    fn view_page(&self) -> Html {
        let page = self.router.borrow().current();
        match page {
            Page::Login => html! { <LoginPage /> },
            Page::Register => html! { <RegisterPage /> },
            Page::Dashboard => html! { <DashboardPage /> },
            Page::Transactions => html! { <TransactionsPage /> },
            Page::Analytics => match &self.analytics {
                Some(filter) => html! { <AnalyticsPage filter={Rc::clone(filter)} /> },
                None => html! {},
            },
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = Rc::clone(&ctx.props().config);
        let language = initial_language(config.default_language);
        let style = Preferences::style().unwrap_or_default();
        apply_language(language);
        apply_style(style);

        let link = ctx.link();
        let actions = AppActions {
            navigate: link.callback(Msg::Navigate),
            switch_language: link.callback(Msg::SwitchLanguage),
            switch_style: link.callback(Msg::SwitchStyle),
            logged_in: link.callback(Msg::LoggedIn),
            logout: link.callback(|_: ()| Msg::Logout),
            unauthorized: link.callback(|_: ()| Msg::Unauthorized),
            toast: link.callback(|(kind, message): (ToastKind, String)| Msg::ShowToast(kind, message)),
            categories_loaded: link.callback(Msg::CategoriesLoaded),
        };

        let locales_config = Rc::clone(&config);
        let locales_link = link.clone();
        spawn_local(async move {
            let store = load_locales(&locales_config).await;
            locales_link.send_message(Msg::LocalesLoaded(store));
        });

        Self {
            config: Rc::clone(&config),
            ready: false,
            locales: Rc::new(LocaleStore::with_baseline()),
            language,
            style,
            session: Session::default(),
            router: Rc::new(RefCell::new(Router::new())),
            charts: Rc::new(RefCell::new(ChartsManager::new())),
            categories: Rc::new(Vec::new()),
            analytics: None,
            api: ApiClient::new(Rc::clone(&config), language),
            toasts: Vec::new(),
            actions,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::LocalesLoaded(store) => {
                self.locales = Rc::new(store);
                self.check_auth(ctx);
                true
            }
            Msg::AuthChecked(user) => {
                self.ready = true;
                match user {
                    Some(user) => {
                        tracing::info!(user = %user.username, "session restored");
                        self.session.login(user);
                        self.navigate(Page::Dashboard);
                    }
                    None => self.navigate(Page::Login),
                }
                true
            }
            Msg::Navigate(page) => {
                self.navigate(page);
                true
            }
            Msg::SwitchLanguage(language) => {
                if language == self.language {
                    return false;
                }
                self.language = language;
                self.api = self.api.with_language(language);
                Preferences::set_language(language);
                apply_language(language);
                if self.session.is_logged_in() {
                    // remounts the page, which reloads its data in the new language
                    let navigation = self.router.borrow_mut().refresh();
                    if navigation.release_charts {
                        self.charts.borrow_mut().destroy_all();
                    }
                }
                true
            }
            Msg::SwitchStyle(style) => {
                if style == self.style {
                    return false;
                }
                self.style = style;
                Preferences::set_style(style);
                apply_style(style);
                true
            }
            Msg::LoggedIn(user) => {
                self.session.login(user);
                self.navigate(Page::Dashboard);
                true
            }
            Msg::Logout => {
                let api = self.api.clone();
                let link = ctx.link().clone();
                let failure = self.locales.resolve(self.language, "messages.logout_failed");
                spawn_local(async move {
                    match api.logout().await {
                        Ok(_) => link.send_message(Msg::LoggedOut),
                        Err(e) => {
                            tracing::warn!(error = %e, "logout failed");
                            link.send_message(Msg::ShowToast(ToastKind::Error, failure));
                        }
                    }
                });
                false
            }
            Msg::LoggedOut | Msg::Unauthorized => {
                self.session.logout();
                self.categories = Rc::new(Vec::new());
                self.analytics = None;
                self.navigate(Page::Login);
                true
            }
            Msg::ShowToast(kind, message) => {
                let toast = Toast::new(kind, message);
                let id = toast.id;
                self.toasts.push(toast);

                let link = ctx.link().clone();
                let duration = self.config.toast_duration_ms;
                spawn_local(async move {
                    TimeoutFuture::new(duration).await;
                    link.send_message(Msg::DismissToast(id));
                });
                true
            }
            Msg::DismissToast(id) => {
                let before = self.toasts.len();
                self.toasts.retain(|toast| toast.id != id);
                self.toasts.len() != before
            }
            Msg::CategoriesLoaded(categories) => {
                self.categories = Rc::new(categories);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let app_context = self.context();
        let page = self.router.borrow().current();
        let epoch = self.router.borrow().epoch();
        let on_dismiss = ctx.link().callback(Msg::DismissToast);

        html! {
            <ContextProvider<AppContext> context={app_context}>
                <div class="app-shell">
                    <div class="persistent-controls">
                        <LanguageSwitcher />
                        <StyleSwitcher />
                    </div>
                    {if !self.ready {
                        html! {
                            <div class="loading-screen">
                                <div class="loading-spinner"></div>
                                <p>{self.locales.resolve(self.language, "common.loading")}</p>
                            </div>
                        }
                    } else {
                        html! {
                            <>
                                {if self.session.is_logged_in() && page.requires_auth() {
                                    html! { <NavBar current={page} /> }
                                } else {
                                    html! {}
                                }}
                                <main key={epoch.to_string()} class={classes!("page", format!("page-{page}"))}>
                                    {self.view_page()}
                                </main>
                            </>
                        }
                    }}
                    <ToastContainer toasts={self.toasts.clone()} {on_dismiss} />
                </div>
            </ContextProvider<AppContext>>
        }
    }
}
