use shared::config::UiStyle;
use yew::prelude::*;

use crate::context::AppContext;

#[function_component(StyleSwitcher)]
pub fn style_switcher() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");

    html! {
        <div class="style-switcher">
            {for UiStyle::ALL.iter().map(|style| {
                let style = *style;
                let onclick = {
                    let switch_style = ctx.actions.switch_style.clone();
                    Callback::from(move |_: MouseEvent| switch_style.emit(style))
                };
                html! {
                    <button
                        type="button"
                        class={classes!("style-btn", (style == ctx.style).then_some("active"))}
                        {onclick}
                    >
                        {ctx.t(style.label_key())}
                    </button>
                }
            })}
        </div>
    }
}
