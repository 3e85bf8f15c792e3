use shared::routing::Page;
use yew::prelude::*;

use crate::context::AppContext;

#[derive(Properties, PartialEq)]
pub struct NavBarProps {
    pub current: Page,
}

/// Top navigation shown on signed-in pages
#[function_component(NavBar)]
pub fn nav_bar(props: &NavBarProps) -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let username = ctx
        .session
        .user()
        .map(|user| user.username.clone())
        .unwrap_or_default();

    let on_logout = {
        let logout = ctx.actions.logout.clone();
        Callback::from(move |_: MouseEvent| logout.emit(()))
    };

    html! {
        <nav class="navbar">
            <div class="nav-brand">{ctx.t("app_title")}</div>
            <div class="nav-links">
                {for Page::NAVIGATION.iter().map(|page| {
                    let page = *page;
                    let onclick = {
                        let navigate = ctx.actions.navigate.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            navigate.emit(page);
                        })
                    };
                    html! {
                        <a
                            href={format!("#{page}")}
                            class={classes!("nav-link", (page == props.current).then_some("active"))}
                            {onclick}
                        >
                            {ctx.t(page.title_key())}
                        </a>
                    }
                })}
            </div>
            <div class="nav-user">
                <span class="username">{username}</span>
                <button type="button" class="btn btn-secondary" onclick={on_logout}>
                    {ctx.t("auth.logout")}
                </button>
            </div>
        </nav>
    }
}
