use shared::{SortField, TransactionQuery, TransactionType};
use yew::prelude::*;

use crate::components::forms::TransactionFormView;
use crate::components::transactions::TransactionTable;
use crate::context::AppContext;
use crate::hooks::{use_categories, use_transaction_form, use_transactions};

#[function_component(TransactionsPage)]
pub fn transactions_page() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    use_categories();

    let list = use_transactions(TransactionQuery {
        per_page: ctx.config.page_size,
        ..TransactionQuery::default()
    });
    let form = use_transaction_form(list.actions.refresh_transactions.clone());

    let query = &list.state.query;
    let pagination = &list.state.pagination;
    let type_filter = query.transaction_type;

    let on_prev = {
        let previous_page = list.actions.previous_page.clone();
        Callback::from(move |_: MouseEvent| previous_page.emit(()))
    };
    let on_next = {
        let next_page = list.actions.next_page.clone();
        Callback::from(move |_: MouseEvent| next_page.emit(()))
    };
    let on_toggle_order = {
        let toggle = list.actions.toggle_sort_order.clone();
        Callback::from(move |_: MouseEvent| toggle.emit(()))
    };

    let page_info = ctx.t_fmt(
        "transactions.page_info",
        &[
            ("page", &pagination.page.to_string()),
            ("pages", &pagination.pages.max(1).to_string()),
            ("total", &pagination.total.to_string()),
        ],
    );

    html! {
        <div class="transactions-page">
            <TransactionFormView
                form={form.state.form.clone()}
                submitting={form.state.submitting}
                on_type_change={form.actions.on_type_change.clone()}
                on_amount_change={form.actions.on_amount_change.clone()}
                on_category_change={form.actions.on_category_change.clone()}
                on_date_change={form.actions.on_date_change.clone()}
                on_description_change={form.actions.on_description_change.clone()}
                on_submit={form.actions.submit.clone()}
            />

            <section class="transactions-section">
                <h2>{ctx.t("transactions.title")}</h2>

                <div class="filters">
                    <select class="type-filter" onchange={list.actions.on_type_filter_change.clone()}>
                        <option value="" selected={type_filter.is_none()}>
                            {ctx.t("transactions.filter_all")}
                        </option>
                        {for TransactionType::ALL.iter().map(|kind| html! {
                            <option value={kind.as_str()} selected={type_filter == Some(*kind)}>
                                {ctx.t(kind.label_key())}
                            </option>
                        })}
                    </select>

                    <select class="sort-field" onchange={list.actions.on_sort_change.clone()}>
                        {for SortField::ALL.iter().map(|field| html! {
                            <option value={field.as_str()} selected={query.sort_by == *field}>
                                {ctx.t(field.label_key())}
                            </option>
                        })}
                    </select>

                    <button type="button" class="btn btn-secondary sort-order" onclick={on_toggle_order}>
                        {ctx.t(&format!("transactions.{}", query.sort_order.as_str()))}
                    </button>
                </div>

                <TransactionTable
                    transactions={list.state.transactions.clone()}
                    loading={list.state.loading}
                />

                <div class="pagination">
                    <button
                        type="button"
                        class="btn btn-secondary"
                        disabled={!pagination.has_prev}
                        onclick={on_prev}
                    >
                        {ctx.t("transactions.prev")}
                    </button>
                    <span class="page-info">{page_info}</span>
                    <button
                        type="button"
                        class="btn btn-secondary"
                        disabled={!pagination.has_next}
                        onclick={on_next}
                    >
                        {ctx.t("transactions.next")}
                    </button>
                </div>
            </section>
        </div>
    }
}
