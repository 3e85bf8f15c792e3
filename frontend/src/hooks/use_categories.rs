use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::context::AppContext;

/// Fetch the user's categories once per mount and hand them to the app
#[hook]
pub fn use_categories() {
    let ctx = use_context::<AppContext>().expect("AppContext not found");

    use_effect_with((), move |_| {
        let ticket = ctx.ticket();
        spawn_local(async move {
            let result = ctx.api.categories().await;
            if !ctx.is_current(&ticket) {
                return;
            }
            match result {
                Ok(categories) => ctx.actions.categories_loaded.emit(categories),
                Err(e) => ctx.report_error(&e, "messages.load_failed"),
            }
        });
        || ()
    });
}
