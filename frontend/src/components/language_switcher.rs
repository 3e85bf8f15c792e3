use shared::i18n::Language;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::context::AppContext;

#[function_component(LanguageSwitcher)]
pub fn language_switcher() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");

    let onchange = {
        let switch_language = ctx.actions.switch_language.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(language) = Language::from_code(&select.value()) {
                switch_language.emit(language);
            }
        })
    };

    html! {
        <div class="language-switcher">
            <label for="language-select">{ctx.t("language.label")}</label>
            <select id="language-select" {onchange}>
                {for Language::ALL.iter().map(|language| html! {
                    <option
                        value={language.code()}
                        selected={*language == ctx.language}
                    >
                        {language.native_name()}
                    </option>
                })}
            </select>
        </div>
    }
}
