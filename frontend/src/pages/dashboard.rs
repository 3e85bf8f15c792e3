use shared::analytics::{AnalyticsFilter, OverviewSummary};
use shared::{format, Transaction, TransactionQuery};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::forms::TransactionFormView;
use crate::components::stat_card::StatCard;
use crate::components::transactions::TransactionTable;
use crate::context::AppContext;
use crate::hooks::use_transaction_form;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let summary = use_state(OverviewSummary::default);
    let recent = use_state(Vec::<Transaction>::new);
    let loading = use_state(|| true);
    let reload = use_state(|| 0u32);

    {
        let ctx = ctx.clone();
        let summary = summary.clone();
        let recent = recent.clone();
        let loading = loading.clone();
        use_effect_with(*reload, move |_| {
            let ticket = ctx.ticket();
            // the default filter is the current month
            let overview_query = AnalyticsFilter::default().overview_query();
            let recent_query = TransactionQuery::recent(ctx.config.recent_transactions);
            loading.set(true);

            spawn_local(async move {
                let (categories, overview, transactions) = futures::join!(
                    ctx.api.categories(),
                    ctx.api.analytics_overview(&overview_query),
                    ctx.api.transactions(&recent_query),
                );
                if !ctx.is_current(&ticket) {
                    return;
                }

                let mut failure = None;
                match categories {
                    Ok(categories) => ctx.actions.categories_loaded.emit(categories),
                    Err(e) => failure = failure.or(Some(e)),
                }
                match overview {
                    Ok(overview) => summary.set(overview.summary),
                    Err(e) => failure = failure.or(Some(e)),
                }
                match transactions {
                    Ok(list) => recent.set(list.transactions),
                    Err(e) => failure = failure.or(Some(e)),
                }
                if let Some(e) = failure {
                    ctx.report_error(&e, "messages.load_failed");
                }
                loading.set(false);
            });
            || ()
        });
    }

    let on_created = use_callback(reload.clone(), |_: (), reload| reload.set(**reload + 1));
    let form = use_transaction_form(on_created);

    html! {
        <div class="dashboard">
            <div class="stats-grid">
                <StatCard
                    title={ctx.t("dashboard.total_income")}
                    value={format::currency(summary.total_income)}
                    variant="income"
                />
                <StatCard
                    title={ctx.t("dashboard.total_expense")}
                    value={format::currency(summary.total_expense)}
                    variant="expense"
                />
                <StatCard
                    title={ctx.t("dashboard.net_income")}
                    value={format::currency(summary.net_income)}
                    variant="net"
                />
            </div>

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

            <section class="recent-section">
                <h2>{ctx.t("dashboard.recent_transactions")}</h2>
                <TransactionTable transactions={(*recent).clone()} loading={*loading} />
            </section>
        </div>
    }
}
