use shared::routing::Page;
use shared::LoginRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::context::{AppContext, ToastKind};

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let username = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);

    let on_username_change = {
        let username = username.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let onsubmit = {
        let ctx = ctx.clone();
        let username = username.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let request = LoginRequest {
                username: username.trim().to_string(),
                password: (*password).clone(),
            };
            let ctx = ctx.clone();
            let submitting = submitting.clone();
            let ticket = ctx.ticket();
            submitting.set(true);

            spawn_local(async move {
                let result = ctx.api.login(&request).await;
                if !ctx.is_current(&ticket) {
                    return;
                }
                submitting.set(false);
                match result {
                    Ok(response) => {
                        tracing::info!(user = %response.user.username, "logged in");
                        ctx.toast(
                            ToastKind::Success,
                            ctx.server_message(response.message.as_deref(), "messages.login_success"),
                        );
                        ctx.actions.logged_in.emit(response.user);
                    }
                    Err(e) => ctx.report_error(&e, "messages.login_failed"),
                }
            });
        })
    };

    let to_register = {
        let navigate = ctx.actions.navigate.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            navigate.emit(Page::Register);
        })
    };

    html! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>{ctx.t("app_title")}</h1>
                <h2>{ctx.t("auth.login")}</h2>
                <form class="auth-form" {onsubmit}>
                    <div class="form-group">
                        <label for="login-username">{ctx.t("auth.username")}</label>
                        <input
                            type="text"
                            id="login-username"
                            required=true
                            autocomplete="username"
                            value={(*username).clone()}
                            onchange={on_username_change}
                            disabled={*submitting}
                        />
                    </div>
                    <div class="form-group">
                        <label for="login-password">{ctx.t("auth.password")}</label>
                        <input
                            type="password"
                            id="login-password"
                            required=true
                            autocomplete="current-password"
                            value={(*password).clone()}
                            onchange={on_password_change}
                            disabled={*submitting}
                        />
                    </div>
                    <button type="submit" class="btn btn-primary btn-block" disabled={*submitting}>
                        {ctx.t("auth.login")}
                    </button>
                </form>
                <p class="auth-switch">
                    {ctx.t("auth.no_account")}{" "}
                    <a href="#register" onclick={to_register}>{ctx.t("auth.register")}</a>
                </p>
            </div>
        </div>
    }
}
