use shared::{Category, TransactionForm, TransactionType};
use yew::prelude::*;

use crate::context::AppContext;

#[derive(Properties, PartialEq)]
pub struct TransactionFormProps {
    // Form state
    pub form: TransactionForm,
    pub submitting: bool,

    // Event handlers
    pub on_type_change: Callback<Event>,
    pub on_amount_change: Callback<Event>,
    pub on_category_change: Callback<Event>,
    pub on_date_change: Callback<Event>,
    pub on_description_change: Callback<Event>,
    pub on_submit: Callback<()>,
}

/// Quick-add form for a single transaction
#[function_component(TransactionFormView)]
pub fn transaction_form(props: &TransactionFormProps) -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");

    let selected_type = props
        .form
        .transaction_type
        .parse::<TransactionType>()
        .unwrap_or(TransactionType::Income);
    let categories: Vec<&Category> = Category::of_type(&ctx.categories, selected_type);

    html! {
        <section class="quick-add-section">
            <h2>{ctx.t("dashboard.quick_add")}</h2>

            <form class="transaction-form" onsubmit={
                let on_submit = props.on_submit.clone();
                Callback::from(move |e: SubmitEvent| {
                    e.prevent_default();
                    on_submit.emit(());
                })
            }>
                <div class="form-row">
                    <div class="form-group">
                        <label for="transaction-type">{ctx.t("transaction.type")}</label>
                        <select
                            id="transaction-type"
                            onchange={props.on_type_change.clone()}
                            disabled={props.submitting}
                        >
                            {for TransactionType::ALL.iter().map(|kind| html! {
                                <option
                                    value={kind.as_str()}
                                    selected={*kind == selected_type}
                                >
                                    {ctx.t(kind.label_key())}
                                </option>
                            })}
                        </select>
                    </div>

                    <div class="form-group">
                        <label for="transaction-amount">{ctx.t("transaction.amount")}</label>
                        <input
                            type="number"
                            id="transaction-amount"
                            placeholder="0.00"
                            step="0.01"
                            min="0.01"
                            value={props.form.amount.clone()}
                            onchange={props.on_amount_change.clone()}
                            disabled={props.submitting}
                        />
                    </div>
                </div>

                <div class="form-row">
                    <div class="form-group">
                        <label for="transaction-category">{ctx.t("transaction.category")}</label>
                        <select
                            id="transaction-category"
                            onchange={props.on_category_change.clone()}
                            disabled={props.submitting}
                        >
                            <option value="" selected={props.form.category_id.is_empty()}>
                                {ctx.t("transaction.select_category")}
                            </option>
                            {for categories.iter().map(|category| {
                                let id = category.id.to_string();
                                html! {
                                    <option
                                        value={id.clone()}
                                        selected={props.form.category_id == id}
                                    >
                                        {&category.name}
                                    </option>
                                }
                            })}
                        </select>
                    </div>

                    <div class="form-group">
                        <label for="transaction-date">{ctx.t("transaction.date")}</label>
                        <input
                            type="date"
                            id="transaction-date"
                            value={props.form.date.clone()}
                            onchange={props.on_date_change.clone()}
                            disabled={props.submitting}
                        />
                    </div>
                </div>

                <div class="form-group">
                    <label for="transaction-description">{ctx.t("transaction.description")}</label>
                    <input
                        type="text"
                        id="transaction-description"
                        value={props.form.description.clone()}
                        onchange={props.on_description_change.clone()}
                        disabled={props.submitting}
                    />
                </div>

                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled={props.submitting}
                >
                    {if props.submitting {
                        ctx.t("common.loading")
                    } else {
                        ctx.t("common.add")
                    }}
                </button>
            </form>
        </section>
    }
}
