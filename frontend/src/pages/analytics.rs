use std::cell::RefCell;
use std::rc::Rc;

use shared::analytics::{AnalyticsFilter, ExportFormat, Period};
use shared::charts::{
    category_color, BALANCE_CANVAS, CATEGORY_CANVAS, MONTHLY_CANVAS, TRENDS_CANVAS,
};
use shared::{format, TransactionType};
use yew::prelude::*;

use crate::components::stat_card::StatCard;
use crate::context::AppContext;
use crate::hooks::use_analytics;
use crate::services::date_utils;

#[derive(Properties, PartialEq)]
pub struct AnalyticsPageProps {
    /// Session-wide filter, kept across visits
    pub filter: Rc<RefCell<AnalyticsFilter>>,
}

#[derive(Properties, PartialEq)]
struct ChartBoxProps {
    title: AttrValue,
    canvas_id: &'static str,
    loading: bool,
    #[prop_or_default]
    children: Html,
}

#[function_component(ChartBox)]
fn chart_box(props: &ChartBoxProps) -> Html {
    html! {
        <div class="chart-container">
            <h3>{&props.title}</h3>
            {props.children.clone()}
            <div class="chart-wrapper">
                <canvas id={props.canvas_id} width="600" height="320"></canvas>
                {if props.loading {
                    html! { <div class="chart-loading"><div class="loading-spinner"></div></div> }
                } else {
                    html! {}
                }}
            </div>
        </div>
    }
}

#[function_component(AnalyticsPage)]
pub fn analytics_page(props: &AnalyticsPageProps) -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let analytics = use_analytics(Rc::clone(&props.filter));
    let filter = &analytics.state.filter;
    let data = &analytics.state.data;
    let loading = analytics.state.loading;

    let on_apply = {
        let apply = analytics.actions.apply_custom_range.clone();
        Callback::from(move |_: MouseEvent| apply.emit(()))
    };
    let export_button = |format: ExportFormat, label_key: &str| {
        let export = analytics.actions.export.clone();
        let onclick = Callback::from(move |_: MouseEvent| export.emit(format));
        html! {
            <button type="button" class="btn btn-secondary" {onclick}>{ctx.t(label_key)}</button>
        }
    };
    let on_export_charts = {
        let export_charts = analytics.actions.export_charts.clone();
        Callback::from(move |_: MouseEvent| export_charts.emit(()))
    };

    let overview = data.overview.clone().unwrap_or_default();
    let summary = &overview.summary;
    let changes = &overview.changes;
    let insights = data.insights();

    html! {
        <div class="analytics-page">
            <section class="analytics-controls">
                <div class="form-group">
                    <select class="period-select" onchange={analytics.actions.on_period_change.clone()}>
                        {for Period::ALL.iter().map(|period| html! {
                            <option value={period.as_str()} selected={filter.period() == *period}>
                                {ctx.t(period.label_key())}
                            </option>
                        })}
                    </select>
                </div>

                {if filter.shows_custom_range() {
                    html! {
                        <div class="custom-range">
                            <label>
                                {ctx.t("analytics.start_date")}
                                <input
                                    type="date"
                                    value={filter.custom_start().map(date_utils::to_input_value).unwrap_or_default()}
                                    onchange={analytics.actions.on_start_change.clone()}
                                />
                            </label>
                            <label>
                                {ctx.t("analytics.end_date")}
                                <input
                                    type="date"
                                    value={filter.custom_end().map(date_utils::to_input_value).unwrap_or_default()}
                                    onchange={analytics.actions.on_end_change.clone()}
                                />
                            </label>
                            <button type="button" class="btn btn-primary" onclick={on_apply}>
                                {ctx.t("common.apply")}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }}

                <div class="export-buttons">
                    <span>{ctx.t("analytics.export")}</span>
                    {export_button(ExportFormat::Csv, "analytics.export_csv")}
                    {export_button(ExportFormat::Json, "analytics.export_json")}
                    <button type="button" class="btn btn-secondary" onclick={on_export_charts}>
                        {ctx.t("analytics.export_charts")}
                    </button>
                </div>
            </section>

            <section class="overview-cards">
                <h2>{ctx.t("analytics.overview")}</h2>
                <div class="stats-grid">
                    <StatCard
                        title={ctx.t("dashboard.total_income")}
                        value={format::currency(summary.total_income)}
                        variant="income"
                        change={changes.income_change}
                    />
                    <StatCard
                        title={ctx.t("dashboard.total_expense")}
                        value={format::currency(summary.total_expense)}
                        variant="expense"
                        change={changes.expense_change}
                    />
                    <StatCard
                        title={ctx.t("dashboard.net_income")}
                        value={format::currency(summary.net_income)}
                        variant="net"
                        change={changes.net_change()}
                    />
                    <StatCard
                        title={ctx.t("analytics.transaction_count")}
                        value={format!("{}{}", summary.total_transactions, ctx.t("analytics.count_suffix"))}
                        variant="count"
                    />
                </div>
            </section>

            <section class="charts-grid">
                <ChartBox title={ctx.t("analytics.trends")} canvas_id={TRENDS_CANVAS} {loading} />

                <ChartBox title={ctx.t("analytics.category_analysis")} canvas_id={CATEGORY_CANVAS} {loading}>
                    <select class="category-type-select" onchange={analytics.actions.on_category_type_change.clone()}>
                        {for TransactionType::ALL.iter().map(|kind| html! {
                            <option value={kind.as_str()} selected={filter.category_type() == *kind}>
                                {ctx.t(kind.label_key())}
                            </option>
                        })}
                    </select>
                </ChartBox>

                <ChartBox title={ctx.t("analytics.monthly_comparison")} canvas_id={MONTHLY_CANVAS} {loading} />

                <ChartBox title={ctx.t("analytics.balance")} canvas_id={BALANCE_CANVAS} {loading} />
            </section>

            <section class="category-details">
                <h2>{ctx.t("analytics.category_details")}</h2>
                <ul class="category-list">
                    {for data.categories.iter().flat_map(|c| c.categories.iter()).enumerate().map(|(index, category)| html! {
                        <li key={category.id.to_string()} class="category-item">
                            <span
                                class="category-color"
                                style={format!("background-color: {}", category_color(category.color.as_deref(), index))}
                            ></span>
                            <span class="category-name">{&category.name}</span>
                            <span class="category-amount">{format::currency(category.amount)}</span>
                            <span class="category-percentage">{format::percent(category.percentage)}</span>
                            <span class="category-count">
                                {format!("{}{}", category.transaction_count, ctx.t("analytics.count_suffix"))}
                            </span>
                        </li>
                    })}
                </ul>
            </section>

            <section class="insights">
                <h2>{ctx.t("analytics.insights")}</h2>
                <ul class="insight-list">
                    {for insights.iter().map(|insight| {
                        let args = insight.args();
                        let args: Vec<(&str, &str)> =
                            args.iter().map(|(name, value)| (*name, value.as_str())).collect();
                        html! {
                            <li class={classes!("insight-item", insight.is_warning().then_some("warning"))}>
                                {ctx.t_fmt(insight.message_key(), &args)}
                            </li>
                        }
                    })}
                </ul>
            </section>
        </div>
    }
}
