//! Analytics page model: response shapes of `/api/analytics/*`, the period
//! and category-type filter, query construction and derived insights.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::routing::LoadSequence;
use crate::TransactionType;

/// Expense above this share of income raises the "high expense ratio" insight
pub const HIGH_EXPENSE_RATIO: f64 = 0.8;
/// More transactions than this in one period suggests reviewing habits
pub const FREQUENT_TRANSACTIONS: u64 = 50;
/// Months requested for the monthly comparison chart
pub const DEFAULT_COMPARISON_MONTHS: u32 = 6;

/// Time window the analytics endpoints aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    Custom,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Week,
        Period::Month,
        Period::Quarter,
        Period::Year,
        Period::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
            Period::Custom => "custom",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Period::Week => "analytics.week",
            Period::Month => "analytics.month",
            Period::Quarter => "analytics.quarter",
            Period::Year => "analytics.year",
            Period::Custom => "analytics.custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|period| period.as_str() == value)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Day,
    Week,
    Month,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Day => "day",
            GroupBy::Week => "week",
            GroupBy::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Why the filter is not ready to trigger a data load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// `custom` period without both date bounds
    MissingBounds,
    /// Start date after end date
    InvertedRange,
}

impl FilterError {
    pub fn message_key(self) -> &'static str {
        match self {
            FilterError::MissingBounds => "messages.custom_range_required",
            FilterError::InvertedRange => "messages.custom_range_inverted",
        }
    }
}

/// Period and category-type selection of the analytics page.
///
/// Lives for the whole session once the analytics page was first entered,
/// so the selection survives navigating away and back.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsFilter {
    period: Period,
    category_type: TransactionType,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
}

impl Default for AnalyticsFilter {
    fn default() -> Self {
        Self {
            period: Period::Month,
            category_type: TransactionType::Expense,
            custom_start: None,
            custom_end: None,
        }
    }
}

impl AnalyticsFilter {
    pub fn period(&self) -> Period {
        self.period
    }

    pub fn category_type(&self) -> TransactionType {
        self.category_type
    }

    pub fn custom_start(&self) -> Option<NaiveDate> {
        self.custom_start
    }

    pub fn custom_end(&self) -> Option<NaiveDate> {
        self.custom_end
    }

    /// The date inputs are only visible for the custom period
    pub fn shows_custom_range(&self) -> bool {
        self.period == Period::Custom
    }

    /// Switch period; returns whether the data should be reloaded right away.
    ///
    /// Fixed periods load immediately. `custom` waits for the user to apply
    /// a complete range.
    pub fn select_period(&mut self, period: Period) -> bool {
        self.period = period;
        period != Period::Custom
    }

    pub fn set_custom_start(&mut self, start: Option<NaiveDate>) {
        self.custom_start = start;
    }

    pub fn set_custom_end(&mut self, end: Option<NaiveDate>) {
        self.custom_end = end;
    }

    /// Switch the category breakdown type; returns whether it changed
    pub fn select_category_type(&mut self, category_type: TransactionType) -> bool {
        let changed = self.category_type != category_type;
        self.category_type = category_type;
        changed
    }

    pub fn ready_to_load(&self) -> Result<(), FilterError> {
        if self.period != Period::Custom {
            return Ok(());
        }
        match (self.custom_start, self.custom_end) {
            (Some(start), Some(end)) if start <= end => Ok(()),
            (Some(_), Some(_)) => Err(FilterError::InvertedRange),
            _ => Err(FilterError::MissingBounds),
        }
    }

    /// `period` plus, for the custom period only, the date bounds
    pub fn date_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("period", self.period.as_str().to_string())];
        if self.period == Period::Custom {
            if let Some(start) = self.custom_start {
                params.push(("start_date", start.format("%Y-%m-%d").to_string()));
            }
            if let Some(end) = self.custom_end {
                params.push(("end_date", end.format("%Y-%m-%d").to_string()));
            }
        }
        params
    }

    pub fn overview_query(&self) -> Vec<(&'static str, String)> {
        self.date_params()
    }

    pub fn trends_query(&self, group_by: GroupBy) -> Vec<(&'static str, String)> {
        let mut params = self.date_params();
        params.push(("group_by", group_by.as_str().to_string()));
        params
    }

    pub fn categories_query(&self) -> Vec<(&'static str, String)> {
        let mut params = self.date_params();
        params.push(("type", self.category_type.as_str().to_string()));
        params
    }

    pub fn export_query(&self, format: ExportFormat) -> Vec<(&'static str, String)> {
        let mut params = self.date_params();
        params.push(("format", format.as_str().to_string()));
        params
    }
}

/// Query for the monthly comparison endpoint, which ignores the period
pub fn monthly_comparison_query(months: u32) -> Vec<(&'static str, String)> {
    vec![("months", months.to_string())]
}

/// Generation of an analytics load; see [`AnalyticsLoads`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    panels: Option<u64>,
    categories: u64,
}

/// Outstanding analytics loads of one page render.
///
/// A full reload covers every panel including the category breakdown; a
/// category type change reloads the breakdown only. Each part of a response
/// is applied only if no later load for that part has been issued.
#[derive(Debug, Default)]
pub struct AnalyticsLoads {
    panels: LoadSequence,
    categories: LoadSequence,
}

impl AnalyticsLoads {
    pub fn issue_all(&mut self) -> LoadToken {
        LoadToken {
            panels: Some(self.panels.issue()),
            categories: self.categories.issue(),
        }
    }

    pub fn issue_categories(&mut self) -> LoadToken {
        LoadToken {
            panels: None,
            categories: self.categories.issue(),
        }
    }

    /// Overview, trends and monthly comparison of `token` may be applied
    pub fn accepts_panels(&self, token: &LoadToken) -> bool {
        token
            .panels
            .is_some_and(|generation| self.panels.is_latest(generation))
    }

    pub fn accepts_categories(&self, token: &LoadToken) -> bool {
        self.categories.is_latest(token.categories)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PeriodInfo {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub period_type: Option<String>,
    #[serde(default)]
    pub group_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OverviewSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_income: f64,
    #[serde(default)]
    pub income_count: u64,
    #[serde(default)]
    pub expense_count: u64,
    #[serde(default)]
    pub total_transactions: u64,
}

/// Percent change against the previous period of the same length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OverviewChanges {
    #[serde(default)]
    pub income_change: f64,
    #[serde(default)]
    pub expense_change: f64,
}

impl OverviewChanges {
    pub fn net_change(&self) -> f64 {
        self.income_change - self.expense_change
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OverviewResponse {
    #[serde(default)]
    pub period: PeriodInfo,
    pub summary: OverviewSummary,
    #[serde(default)]
    pub changes: OverviewChanges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsResponse {
    #[serde(default)]
    pub period: PeriodInfo,
    pub income_trends: Vec<TrendPoint>,
    pub expense_trends: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub amount: f64,
    /// Server-computed share, two decimals
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysisResponse {
    #[serde(default)]
    pub period: PeriodInfo,
    #[serde(default)]
    pub total_amount: f64,
    pub categories: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparisonEntry {
    /// `YYYY-MM`
    pub month: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month_num: u32,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparisonResponse {
    pub monthly_comparison: Vec<MonthlyComparisonEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvExport {
    pub csv_data: String,
    pub filename: String,
}

/// File the browser should download for an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// JSON export is saved as-is (pretty printed); CSV export carries its own
/// file name and content.
pub fn export_file(format: ExportFormat, body: Value) -> Result<ExportFile, serde_json::Error> {
    match format {
        ExportFormat::Csv => {
            let csv: CsvExport = serde_json::from_value(body)?;
            Ok(ExportFile {
                filename: csv.filename,
                mime_type: format.mime_type(),
                content: csv.csv_data,
            })
        }
        ExportFormat::Json => Ok(ExportFile {
            filename: "analytics_data.json".to_string(),
            mime_type: format.mime_type(),
            content: serde_json::to_string_pretty(&body)?,
        }),
    }
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Trend::Up
        } else if change < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↗",
            Trend::Down => "↘",
            Trend::Flat => "→",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Trend::Up => "positive",
            Trend::Down => "negative",
            Trend::Flat => "neutral",
        }
    }
}

/// Text of a change indicator, e.g. `↘ 12.5%`
pub fn change_indicator(change: f64) -> String {
    format!("{} {:.1}%", Trend::from_change(change).arrow(), change.abs())
}

/// A human-readable observation about the period's figures
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// Net income is positive; carries the savings rate in percent
    SavingsRate(f64),
    /// Spending reached or exceeded income
    Overspending,
    HighExpenseRatio,
    ReviewHabits,
}

impl Insight {
    pub fn message_key(&self) -> &'static str {
        match self {
            Insight::SavingsRate(_) => "insights.savings_rate",
            Insight::Overspending => "insights.overspending",
            Insight::HighExpenseRatio => "insights.high_expense_ratio",
            Insight::ReviewHabits => "insights.review_habits",
        }
    }

    /// Interpolation arguments for the message
    pub fn args(&self) -> Vec<(&'static str, String)> {
        match self {
            Insight::SavingsRate(rate) => vec![("rate", format!("{rate:.1}"))],
            _ => Vec::new(),
        }
    }

    pub fn is_warning(&self) -> bool {
        !matches!(self, Insight::SavingsRate(_))
    }
}

/// `net / income * 100`; zero when there was no income
pub fn savings_rate(summary: &OverviewSummary) -> f64 {
    if summary.total_income > 0.0 {
        summary.net_income / summary.total_income * 100.0
    } else {
        0.0
    }
}

/// Insights for a summary, in fixed order: savings or warning first, expense
/// ratio second, transaction frequency third.
pub fn generate_insights(summary: &OverviewSummary) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    if summary.net_income > 0.0 {
        insights.push(Insight::SavingsRate(savings_rate(summary)));
    } else {
        insights.push(Insight::Overspending);
    }

    if summary.total_expense > summary.total_income * HIGH_EXPENSE_RATIO {
        insights.push(Insight::HighExpenseRatio);
    }

    if summary.total_transactions > FREQUENT_TRANSACTIONS {
        insights.push(Insight::ReviewHabits);
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(income: f64, expense: f64, count: u64) -> OverviewSummary {
        OverviewSummary {
            total_income: income,
            total_expense: expense,
            net_income: income - expense,
            income_count: 0,
            expense_count: 0,
            total_transactions: count,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_savings_rate_insight() {
        let insights = generate_insights(&summary(1000.0, 600.0, 10));
        assert_eq!(insights, vec![Insight::SavingsRate(40.0)]);
        assert_eq!(insights[0].args(), vec![("rate", "40.0".to_string())]);
        assert!(!insights[0].is_warning());
    }

    #[test]
    fn test_high_expense_ratio_insight() {
        let insights = generate_insights(&summary(1000.0, 900.0, 10));
        assert_eq!(insights.len(), 2);
        assert!(matches!(insights[0], Insight::SavingsRate(rate) if (rate - 10.0).abs() < 1e-9));
        assert_eq!(insights[1], Insight::HighExpenseRatio);
    }

    #[test]
    fn test_exactly_eighty_percent_is_not_high() {
        let insights = generate_insights(&summary(1000.0, 800.0, 10));
        assert!(!insights.contains(&Insight::HighExpenseRatio));
    }

    #[test]
    fn test_non_positive_net_warns() {
        assert_eq!(
            generate_insights(&summary(500.0, 500.0, 3)),
            vec![Insight::Overspending, Insight::HighExpenseRatio]
        );
        assert_eq!(
            generate_insights(&summary(0.0, 0.0, 0)),
            vec![Insight::Overspending]
        );
    }

    #[test]
    fn test_all_insights_in_fixed_order() {
        let insights = generate_insights(&summary(100.0, 300.0, 51));
        assert_eq!(
            insights,
            vec![Insight::Overspending, Insight::HighExpenseRatio, Insight::ReviewHabits]
        );
    }

    #[test]
    fn test_fifty_transactions_is_not_frequent() {
        let insights = generate_insights(&summary(1000.0, 100.0, 50));
        assert!(!insights.contains(&Insight::ReviewHabits));
    }

    #[test]
    fn test_savings_rate_without_income() {
        let mut s = summary(0.0, 0.0, 0);
        s.net_income = 10.0;
        assert_eq!(savings_rate(&s), 0.0);
    }

    #[test]
    fn test_fixed_period_loads_immediately() {
        let mut filter = AnalyticsFilter::default();
        assert_eq!(filter.period(), Period::Month);
        assert_eq!(filter.category_type(), TransactionType::Expense);
        assert!(filter.select_period(Period::Quarter));
        assert_eq!(filter.ready_to_load(), Ok(()));
        assert_eq!(filter.date_params(), vec![("period", "quarter".to_string())]);
    }

    #[test]
    fn test_custom_period_waits_for_both_bounds() {
        let mut filter = AnalyticsFilter::default();
        assert!(!filter.select_period(Period::Custom));
        assert!(filter.shows_custom_range());
        assert_eq!(filter.ready_to_load(), Err(FilterError::MissingBounds));

        filter.set_custom_start(Some(date(2025, 1, 1)));
        assert_eq!(filter.ready_to_load(), Err(FilterError::MissingBounds));

        filter.set_custom_end(Some(date(2025, 1, 31)));
        assert_eq!(filter.ready_to_load(), Ok(()));
        assert_eq!(
            filter.date_params(),
            vec![
                ("period", "custom".to_string()),
                ("start_date", "2025-01-01".to_string()),
                ("end_date", "2025-01-31".to_string()),
            ]
        );
    }

    #[test]
    fn test_inverted_custom_range_is_rejected() {
        let mut filter = AnalyticsFilter::default();
        filter.select_period(Period::Custom);
        filter.set_custom_start(Some(date(2025, 2, 1)));
        filter.set_custom_end(Some(date(2025, 1, 1)));
        assert_eq!(filter.ready_to_load(), Err(FilterError::InvertedRange));
    }

    #[test]
    fn test_bounds_are_only_sent_for_custom_period() {
        let mut filter = AnalyticsFilter::default();
        filter.set_custom_start(Some(date(2025, 1, 1)));
        filter.set_custom_end(Some(date(2025, 1, 31)));
        filter.select_period(Period::Year);
        assert_eq!(filter.date_params(), vec![("period", "year".to_string())]);
    }

    #[test]
    fn test_endpoint_queries() {
        let mut filter = AnalyticsFilter::default();
        assert!(!filter.select_category_type(TransactionType::Expense));
        assert!(filter.select_category_type(TransactionType::Income));

        assert_eq!(
            filter.categories_query(),
            vec![("period", "month".to_string()), ("type", "income".to_string())]
        );
        assert_eq!(
            filter.trends_query(GroupBy::Day),
            vec![("period", "month".to_string()), ("group_by", "day".to_string())]
        );
        assert_eq!(
            filter.export_query(ExportFormat::Csv),
            vec![("period", "month".to_string()), ("format", "csv".to_string())]
        );
        assert_eq!(monthly_comparison_query(6), vec![("months", "6".to_string())]);
    }

    #[test]
    fn test_change_indicator() {
        assert_eq!(change_indicator(12.345), "↗ 12.3%");
        assert_eq!(change_indicator(-5.0), "↘ 5.0%");
        assert_eq!(change_indicator(0.0), "→ 0.0%");
        assert_eq!(Trend::from_change(-0.1).css_class(), "negative");

        let changes = OverviewChanges { income_change: 10.0, expense_change: 25.0 };
        assert_eq!(changes.net_change(), -15.0);
    }

    #[test]
    fn test_overview_deserializes() {
        let body = json!({
            "period": {"start_date": "2025-06-01", "end_date": "2025-06-30", "period_type": "month"},
            "summary": {
                "total_income": 1000.0, "total_expense": 600.0, "net_income": 400.0,
                "income_count": 2, "expense_count": 8, "total_transactions": 10
            },
            "changes": {"income_change": 5.5, "expense_change": -2.0}
        });
        let overview: OverviewResponse = serde_json::from_value(body).unwrap();
        assert_eq!(overview.summary.total_transactions, 10);
        assert_eq!(overview.period.period_type.as_deref(), Some("month"));
        assert_eq!(overview.changes.net_change(), 7.5);
    }

    #[test]
    fn test_csv_export_file() {
        let body = json!({"csv_data": "ID,Date\n1,2025-06-01\n", "filename": "transactions_2025-06-01_2025-06-30.csv"});
        let file = export_file(ExportFormat::Csv, body).unwrap();
        assert_eq!(file.filename, "transactions_2025-06-01_2025-06-30.csv");
        assert_eq!(file.mime_type, "text/csv");
        assert!(file.content.starts_with("ID,Date"));
    }

    #[test]
    fn test_json_export_file_is_pretty_printed() {
        let body = json!({"export_info": {"username": "alice"}, "transactions": []});
        let file = export_file(ExportFormat::Json, body).unwrap();
        assert_eq!(file.filename, "analytics_data.json");
        assert_eq!(file.mime_type, "application/json");
        assert!(file.content.contains("\n  \"export_info\""));
    }

    #[test]
    fn test_csv_export_with_wrong_shape_fails() {
        assert!(export_file(ExportFormat::Csv, json!({"transactions": []})).is_err());
    }

    #[test]
    fn test_response_for_previous_period_is_dropped() {
        let mut filter = AnalyticsFilter::default();
        let mut loads = AnalyticsLoads::default();
        let month = loads.issue_all();

        assert!(filter.select_period(Period::Year));
        let year = loads.issue_all();

        assert!(!loads.accepts_panels(&month));
        assert!(!loads.accepts_categories(&month));
        assert!(loads.accepts_panels(&year));
        assert!(loads.accepts_categories(&year));
    }

    #[test]
    fn test_category_type_change_supersedes_breakdown_only() {
        let mut filter = AnalyticsFilter::default();
        let mut loads = AnalyticsLoads::default();
        let full = loads.issue_all();

        assert!(filter.select_category_type(TransactionType::Income));
        let income = loads.issue_categories();

        // the full load still owns the other panels
        assert!(loads.accepts_panels(&full));
        assert!(!loads.accepts_categories(&full));
        assert!(loads.accepts_categories(&income));
        assert!(!loads.accepts_panels(&income));
    }

    #[test]
    fn test_full_reload_supersedes_pending_breakdown() {
        let mut loads = AnalyticsLoads::default();
        let breakdown = loads.issue_categories();
        let full = loads.issue_all();
        assert!(!loads.accepts_categories(&breakdown));
        assert!(loads.accepts_categories(&full));
    }
}
