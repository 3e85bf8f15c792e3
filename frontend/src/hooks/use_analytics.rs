use std::cell::RefCell;
use std::rc::Rc;

use shared::analytics::{
    export_file, generate_insights, monthly_comparison_query, AnalyticsFilter, AnalyticsLoads,
    CategoryAnalysisResponse, ExportFormat, GroupBy, Insight, MonthlyComparisonResponse,
    OverviewResponse, Period, TrendsResponse,
};
use shared::charts::{
    self as chart_data, MonthlySeries, TrendSeries, ANALYTICS_CANVASES, BALANCE_CANVAS,
    CATEGORY_CANVAS, MONTHLY_CANVAS, TRENDS_CANVAS,
};
use shared::{ApiError, TransactionType};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::context::{AppContext, ToastKind};
use crate::services::charts::ChartLabels;
use crate::services::{date_utils, download};

#[derive(Clone, PartialEq, Default)]
pub struct AnalyticsData {
    pub overview: Option<OverviewResponse>,
    pub trends: Option<TrendsResponse>,
    pub categories: Option<CategoryAnalysisResponse>,
    pub monthly: Option<MonthlyComparisonResponse>,
}

impl AnalyticsData {
    pub fn insights(&self) -> Vec<Insight> {
        self.overview
            .as_ref()
            .map(|overview| generate_insights(&overview.summary))
            .unwrap_or_default()
    }
}

/// Partial update of the loaded analytics; panels left `None` keep their data
pub enum AnalyticsUpdate {
    Panels {
        overview: Option<OverviewResponse>,
        trends: Option<TrendsResponse>,
        categories: Option<CategoryAnalysisResponse>,
        monthly: Option<MonthlyComparisonResponse>,
    },
    Categories(CategoryAnalysisResponse),
}

impl Reducible for AnalyticsData {
    type Action = AnalyticsUpdate;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            AnalyticsUpdate::Panels {
                overview,
                trends,
                categories,
                monthly,
            } => {
                next.overview = overview.or(next.overview);
                next.trends = trends.or(next.trends);
                next.categories = categories.or(next.categories);
                next.monthly = monthly.or(next.monthly);
            }
            AnalyticsUpdate::Categories(categories) => next.categories = Some(categories),
        }
        Rc::new(next)
    }
}

#[derive(Clone)]
pub struct AnalyticsState {
    /// Snapshot of the session-wide filter
    pub filter: AnalyticsFilter,
    pub data: AnalyticsData,
    pub loading: bool,
}

#[derive(Clone)]
pub struct UseAnalyticsActions {
    pub on_period_change: Callback<Event>,
    pub on_start_change: Callback<Event>,
    pub on_end_change: Callback<Event>,
    pub apply_custom_range: Callback<()>,
    pub on_category_type_change: Callback<Event>,
    pub export: Callback<ExportFormat>,
    pub export_charts: Callback<()>,
}

pub struct UseAnalyticsResult {
    pub state: AnalyticsState,
    pub actions: UseAnalyticsActions,
}

fn chart_labels(ctx: &AppContext) -> ChartLabels {
    ChartLabels {
        income: ctx.t("transaction.income"),
        expense: ctx.t("transaction.expense"),
        net: ctx.t("charts.net"),
        no_data: ctx.t("charts.no_data"),
    }
}

fn keep_first_error<T>(result: Result<T, ApiError>, failure: &mut Option<ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            failure.get_or_insert(e);
            None
        }
    }
}

/// Redraw every analytics chart from `data`; each canvas keeps one chart
fn draw_charts(ctx: &AppContext, data: &AnalyticsData) {
    let labels = chart_labels(ctx);
    let mut charts = ctx.charts.borrow_mut();
    let mut results = Vec::with_capacity(ANALYTICS_CANVASES.len());

    if let Some(trends) = &data.trends {
        let series = TrendSeries::align(&trends.income_trends, &trends.expense_trends);
        results.push((TRENDS_CANVAS, charts.create_trend_chart(TRENDS_CANVAS, &series, &labels)));
    }
    if let Some(categories) = &data.categories {
        let slices = chart_data::category_slices(&categories.categories);
        results.push((
            CATEGORY_CANVAS,
            charts.create_category_chart(CATEGORY_CANVAS, &slices, &labels),
        ));
    }
    if let Some(monthly) = &data.monthly {
        let series = MonthlySeries::from_entries(&monthly.monthly_comparison);
        results.push((
            MONTHLY_CANVAS,
            charts.create_monthly_comparison_chart(MONTHLY_CANVAS, &series, &labels),
        ));
    }
    if let Some(overview) = &data.overview {
        let slices = chart_data::balance_slices(&overview.summary, &labels.income, &labels.expense);
        results.push((
            BALANCE_CANVAS,
            charts.create_balance_chart(BALANCE_CANVAS, &slices, &labels),
        ));
    }

    for (canvas_id, result) in results {
        if let Err(e) = result {
            tracing::warn!(canvas_id, error = %e, "failed to draw chart");
        }
    }
}

/// Analytics page state on top of the session-wide filter.
///
/// Loads overview, trends, category breakdown and the monthly comparison in
/// parallel and redraws the charts whenever any of them changes.
#[hook]
pub fn use_analytics(filter: Rc<RefCell<AnalyticsFilter>>) -> UseAnalyticsResult {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let data = use_reducer(AnalyticsData::default);
    let loading = use_state(|| false);
    let loads = use_mut_ref(AnalyticsLoads::default);
    // re-render after the shared filter was mutated
    let revision = use_state(|| 0u32);

    let bump = {
        let revision = revision.clone();
        move || revision.set(*revision + 1)
    };

    let load_all = use_callback(
        (ctx.clone(), data.dispatcher(), loading.clone()),
        {
            let filter = Rc::clone(&filter);
            let loads = Rc::clone(&loads);
            move |_: (), (ctx, data, loading)| {
                let snapshot = filter.borrow().clone();
                if let Err(e) = snapshot.ready_to_load() {
                    ctx.toast(ToastKind::Error, ctx.t(e.message_key()));
                    return;
                }

                let ctx = ctx.clone();
                let data = data.clone();
                let loading = loading.clone();
                let loads = Rc::clone(&loads);
                let months = ctx.config.monthly_comparison_months;
                let ticket = ctx.ticket();
                let token = loads.borrow_mut().issue_all();
                loading.set(true);
                tracing::debug!(period = %snapshot.period(), "loading analytics");

                spawn_local(async move {
                    let overview_query = snapshot.overview_query();
                    let trends_query = snapshot.trends_query(GroupBy::Day);
                    let categories_query = snapshot.categories_query();
                    let monthly_query = monthly_comparison_query(months);
                    let (overview, trends, categories, monthly) = futures::join!(
                        ctx.api.analytics_overview(&overview_query),
                        ctx.api.analytics_trends(&trends_query),
                        ctx.api.analytics_categories(&categories_query),
                        ctx.api.monthly_comparison(&monthly_query),
                    );
                    if !ctx.is_current(&ticket) || !loads.borrow().accepts_panels(&token) {
                        tracing::debug!(period = %snapshot.period(), "dropping superseded analytics");
                        return;
                    }
                    let categories_current = loads.borrow().accepts_categories(&token);

                    let mut failure = None;
                    let overview = keep_first_error(overview, &mut failure);
                    let trends = keep_first_error(trends, &mut failure);
                    let categories = if categories_current {
                        keep_first_error(categories, &mut failure)
                    } else {
                        None
                    };
                    let monthly = keep_first_error(monthly, &mut failure);
                    if let Some(e) = failure {
                        ctx.report_error(&e, "messages.load_failed");
                    }
                    data.dispatch(AnalyticsUpdate::Panels {
                        overview,
                        trends,
                        categories,
                        monthly,
                    });
                    loading.set(false);
                });
            }
        },
    );

    let load_categories = use_callback((ctx.clone(), data.dispatcher()), {
        let filter = Rc::clone(&filter);
        let loads = Rc::clone(&loads);
        move |_: (), (ctx, data)| {
            let snapshot = filter.borrow().clone();
            if snapshot.ready_to_load().is_err() {
                return;
            }
            let ctx = ctx.clone();
            let data = data.clone();
            let loads = Rc::clone(&loads);
            let ticket = ctx.ticket();
            let token = loads.borrow_mut().issue_categories();
            spawn_local(async move {
                let result = ctx.api.analytics_categories(&snapshot.categories_query()).await;
                if !ctx.is_current(&ticket) || !loads.borrow().accepts_categories(&token) {
                    return;
                }
                match result {
                    Ok(response) => data.dispatch(AnalyticsUpdate::Categories(response)),
                    Err(e) => ctx.report_error(&e, "messages.load_failed"),
                }
            });
        }
    });

    {
        let load_all = load_all.clone();
        use_effect_with((), move |_| {
            load_all.emit(());
            || ()
        });
    }

    {
        let ctx = ctx.clone();
        use_effect_with(((*data).clone(), ctx.language), move |(data, _)| {
            draw_charts(&ctx, data);
            || ()
        });
    }

    let on_period_change = {
        let filter = Rc::clone(&filter);
        let load_all = load_all.clone();
        let bump = bump.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let Some(period) = Period::parse(&select.value()) else {
                return;
            };
            let load_now = filter.borrow_mut().select_period(period);
            bump();
            if load_now {
                load_all.emit(());
            }
        })
    };

    let on_start_change = {
        let filter = Rc::clone(&filter);
        let bump = bump.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter
                .borrow_mut()
                .set_custom_start(date_utils::from_input_value(&input.value()));
            bump();
        })
    };

    let on_end_change = {
        let filter = Rc::clone(&filter);
        let bump = bump.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter
                .borrow_mut()
                .set_custom_end(date_utils::from_input_value(&input.value()));
            bump();
        })
    };

    let apply_custom_range = {
        let load_all = load_all.clone();
        Callback::from(move |_| load_all.emit(()))
    };

    let on_category_type_change = {
        let filter = Rc::clone(&filter);
        let bump = bump.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let Ok(category_type) = select.value().parse::<TransactionType>() else {
                return;
            };
            let changed = filter.borrow_mut().select_category_type(category_type);
            bump();
            if changed {
                load_categories.emit(());
            }
        })
    };

    let export = use_callback(ctx.clone(), {
        let filter = Rc::clone(&filter);
        move |format: ExportFormat, ctx| {
            let snapshot = filter.borrow().clone();
            if let Err(e) = snapshot.ready_to_load() {
                ctx.toast(ToastKind::Error, ctx.t(e.message_key()));
                return;
            }
            let ctx = ctx.clone();
            spawn_local(async move {
                let body = match ctx.api.export(&snapshot.export_query(format)).await {
                    Ok(body) => body,
                    Err(e) => {
                        ctx.report_error(&e, "messages.export_failed");
                        return;
                    }
                };
                let saved = export_file(format, body)
                    .map_err(|e| e.to_string())
                    .and_then(|file| {
                        download::download_text(&file.content, &file.filename, file.mime_type)
                    });
                match saved {
                    Ok(()) => ctx.toast(ToastKind::Success, ctx.t("messages.export_success")),
                    Err(e) => {
                        tracing::warn!(format = format.as_str(), error = %e, "export failed");
                        ctx.toast(ToastKind::Error, ctx.t("messages.export_failed"));
                    }
                }
            });
        }
    });

    let export_charts = use_callback(ctx.clone(), |_: (), ctx| {
        let timestamp = date_utils::timestamp_millis();
        let charts = ctx.charts.borrow();
        let mut exported = 0;
        for canvas_id in ANALYTICS_CANVASES {
            if !charts.contains(canvas_id) {
                continue;
            }
            match charts.export_chart(canvas_id, &format!("{canvas_id}_{timestamp}.png")) {
                Ok(()) => exported += 1,
                Err(e) => tracing::warn!(canvas_id, error = %e, "chart export failed"),
            }
        }
        if exported > 0 {
            ctx.toast(ToastKind::Success, ctx.t("messages.charts_exported"));
        } else {
            ctx.toast(ToastKind::Error, ctx.t("messages.export_failed"));
        }
    });

    let state = AnalyticsState {
        filter: filter.borrow().clone(),
        data: (*data).clone(),
        loading: *loading,
    };

    let actions = UseAnalyticsActions {
        on_period_change,
        on_start_change,
        on_end_change,
        apply_custom_range,
        on_category_type_change,
        export,
        export_charts,
    };

    UseAnalyticsResult { state, actions }
}

#[cfg(test)]
mod tests {
    use shared::analytics::{CategoryBreakdown, OverviewChanges, OverviewSummary, PeriodInfo};

    use super::*;

    #[test]
    fn insights_follow_the_overview() {
        let mut data = AnalyticsData::default();
        assert!(data.insights().is_empty());

        data.overview = Some(OverviewResponse {
            period: PeriodInfo::default(),
            summary: OverviewSummary {
                total_income: 1000.0,
                total_expense: 900.0,
                net_income: 100.0,
                income_count: 2,
                expense_count: 10,
                total_transactions: 12,
            },
            changes: OverviewChanges::default(),
        });
        let insights = data.insights();
        assert_eq!(insights[0], Insight::SavingsRate(10.0));
        assert!(insights.contains(&Insight::HighExpenseRatio));
    }

    fn breakdown(name: &str, amount: f64) -> CategoryAnalysisResponse {
        CategoryAnalysisResponse {
            period: PeriodInfo::default(),
            total_amount: amount,
            categories: vec![CategoryBreakdown {
                id: 1,
                name: name.to_string(),
                color: None,
                amount,
                percentage: 100.0,
                transaction_count: 1,
            }],
        }
    }

    #[test]
    fn panel_update_keeps_a_newer_breakdown() {
        let data = Rc::new(AnalyticsData::default())
            .reduce(AnalyticsUpdate::Categories(breakdown("Salary", 3000.0)));
        let data = data.reduce(AnalyticsUpdate::Panels {
            overview: Some(OverviewResponse::default()),
            trends: None,
            categories: None,
            monthly: None,
        });

        assert!(data.overview.is_some());
        assert_eq!(data.categories, Some(breakdown("Salary", 3000.0)));
    }

    #[test]
    fn failed_panels_keep_their_previous_data() {
        let data = Rc::new(AnalyticsData::default()).reduce(AnalyticsUpdate::Panels {
            overview: Some(OverviewResponse::default()),
            trends: None,
            categories: Some(breakdown("Food", 120.0)),
            monthly: None,
        });
        let data = data.reduce(AnalyticsUpdate::Panels {
            overview: None,
            trends: None,
            categories: None,
            monthly: None,
        });
        assert_eq!(data.overview, Some(OverviewResponse::default()));
        assert_eq!(data.categories, Some(breakdown("Food", 120.0)));
    }
}
