use shared::routing::Page;
use shared::RegisterRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::context::{AppContext, ToastKind};

#[derive(Clone, PartialEq, Default)]
struct RegisterForm {
    username: String,
    email: String,
    password: String,
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let form = use_state(RegisterForm::default);
    let submitting = use_state(|| false);

    let on_username_change = use_callback(form.clone(), |e: Event, form| {
        let input: HtmlInputElement = e.target_unchecked_into();
        form.set(RegisterForm {
            username: input.value(),
            ..(**form).clone()
        });
    });

    let on_email_change = use_callback(form.clone(), |e: Event, form| {
        let input: HtmlInputElement = e.target_unchecked_into();
        form.set(RegisterForm {
            email: input.value(),
            ..(**form).clone()
        });
    });

    let on_password_change = use_callback(form.clone(), |e: Event, form| {
        let input: HtmlInputElement = e.target_unchecked_into();
        form.set(RegisterForm {
            password: input.value(),
            ..(**form).clone()
        });
    });

    let onsubmit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let submitting = submitting.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let request = RegisterRequest {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            };
            let ctx = ctx.clone();
            let submitting = submitting.clone();
            let ticket = ctx.ticket();
            submitting.set(true);

            spawn_local(async move {
                let result = ctx.api.register(&request).await;
                if !ctx.is_current(&ticket) {
                    return;
                }
                submitting.set(false);
                match result {
                    Ok(response) => {
                        tracing::info!(user = %response.user.username, "registered");
                        ctx.toast(
                            ToastKind::Success,
                            ctx.server_message(response.message.as_deref(), "messages.register_success"),
                        );
                        ctx.actions.navigate.emit(Page::Login);
                    }
                    Err(e) => ctx.report_error(&e, "messages.register_failed"),
                }
            });
        })
    };

    let to_login = {
        let navigate = ctx.actions.navigate.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            navigate.emit(Page::Login);
        })
    };

    html! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>{ctx.t("app_title")}</h1>
                <h2>{ctx.t("auth.register")}</h2>
                <form class="auth-form" {onsubmit}>
                    <div class="form-group">
                        <label for="register-username">{ctx.t("auth.username")}</label>
                        <input
                            type="text"
                            id="register-username"
                            required=true
                            autocomplete="username"
                            value={form.username.clone()}
                            onchange={on_username_change}
                            disabled={*submitting}
                        />
                    </div>
                    <div class="form-group">
                        <label for="register-email">{ctx.t("auth.email")}</label>
                        <input
                            type="email"
                            id="register-email"
                            required=true
                            autocomplete="email"
                            value={form.email.clone()}
                            onchange={on_email_change}
                            disabled={*submitting}
                        />
                    </div>
                    <div class="form-group">
                        <label for="register-password">{ctx.t("auth.password")}</label>
                        <input
                            type="password"
                            id="register-password"
                            required=true
                            autocomplete="new-password"
                            value={form.password.clone()}
                            onchange={on_password_change}
                            disabled={*submitting}
                        />
                    </div>
                    <button type="submit" class="btn btn-primary btn-block" disabled={*submitting}>
                        {ctx.t("auth.register")}
                    </button>
                </form>
                <p class="auth-switch">
                    {ctx.t("auth.have_account")}{" "}
                    <a href="#login" onclick={to_login}>{ctx.t("auth.login")}</a>
                </p>
            </div>
        </div>
    }
}
