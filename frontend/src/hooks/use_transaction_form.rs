use shared::{TransactionForm, TransactionType};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::context::{AppContext, ToastKind};
use crate::services::date_utils;

#[derive(Clone)]
pub struct TransactionFormState {
    pub form: TransactionForm,
    pub submitting: bool,
}

#[derive(Clone)]
pub struct UseTransactionFormActions {
    pub on_type_change: Callback<Event>,
    pub on_amount_change: Callback<Event>,
    pub on_category_change: Callback<Event>,
    pub on_date_change: Callback<Event>,
    pub on_description_change: Callback<Event>,
    pub submit: Callback<()>,
}

pub struct UseTransactionFormResult {
    pub state: TransactionFormState,
    pub actions: UseTransactionFormActions,
}

fn input_value(e: &Event) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

/// Quick-add form state; `on_created` fires after the server accepted a
/// new transaction.
#[hook]
pub fn use_transaction_form(on_created: Callback<()>) -> UseTransactionFormResult {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let form = use_state(|| TransactionForm::new(TransactionType::Income, date_utils::today()));
    let submitting = use_state(|| false);

    let on_type_change = use_callback(form.clone(), |e: Event, form| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        // categories differ per type
        form.set(TransactionForm {
            transaction_type: select.value(),
            category_id: String::new(),
            ..(**form).clone()
        });
    });

    let on_amount_change = use_callback(form.clone(), |e: Event, form| {
        form.set(TransactionForm {
            amount: input_value(&e),
            ..(**form).clone()
        });
    });

    let on_category_change = use_callback(form.clone(), |e: Event, form| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        form.set(TransactionForm {
            category_id: select.value(),
            ..(**form).clone()
        });
    });

    let on_date_change = use_callback(form.clone(), |e: Event, form| {
        form.set(TransactionForm {
            date: input_value(&e),
            ..(**form).clone()
        });
    });

    let on_description_change = use_callback(form.clone(), |e: Event, form| {
        form.set(TransactionForm {
            description: input_value(&e),
            ..(**form).clone()
        });
    });

    let submit = use_callback(
        (form.clone(), submitting.clone(), ctx.clone(), on_created),
        |_: (), (form, submitting, ctx, on_created)| {
            if **submitting {
                return;
            }
            let request = match form.validate() {
                Ok(request) => request,
                Err(e) => {
                    tracing::debug!(error = %e, "transaction form rejected");
                    ctx.toast(ToastKind::Error, ctx.t(e.message_key()));
                    return;
                }
            };

            let ctx = ctx.clone();
            let form = form.clone();
            let submitting = submitting.clone();
            let on_created = on_created.clone();
            let ticket = ctx.ticket();
            submitting.set(true);

            spawn_local(async move {
                let result = ctx.api.create_transaction(&request).await;
                if !ctx.is_current(&ticket) {
                    return;
                }
                match result {
                    Ok(response) => {
                        ctx.toast(
                            ToastKind::Success,
                            ctx.server_message(response.message.as_deref(), "messages.transaction_added"),
                        );
                        form.set(TransactionForm::new(TransactionType::Income, date_utils::today()));
                        on_created.emit(());
                    }
                    Err(e) => ctx.report_error(&e, "messages.add_transaction_failed"),
                }
                submitting.set(false);
            });
        },
    );

    let state = TransactionFormState {
        form: (*form).clone(),
        submitting: *submitting,
    };

    let actions = UseTransactionFormActions {
        on_type_change,
        on_amount_change,
        on_category_change,
        on_date_change,
        on_description_change,
        submit,
    };

    UseTransactionFormResult { state, actions }
}
