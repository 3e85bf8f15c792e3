//! Chart data preparation and the per-canvas chart registry.
//!
//! Drawing itself happens in the browser crate; everything here is plain data
//! so the encodings (colours, percentages, labels, series alignment) can be
//! tested natively.

use std::collections::{BTreeSet, HashMap};

use crate::analytics::{CategoryBreakdown, MonthlyComparisonEntry, OverviewSummary, TrendPoint};
use crate::format;

pub const INCOME_COLOR: &str = "#28a745";
pub const EXPENSE_COLOR: &str = "#dc3545";
pub const NET_COLOR: &str = "#17a2b8";

/// Colours for categories that carry none of their own
pub const CATEGORY_PALETTE: [&str; 12] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
    "#4BC0C0", "#FF6384", "#36A2EB", "#FFCE56",
];

/// Canvas ids of the analytics page, in display order
pub const TRENDS_CANVAS: &str = "trends-chart";
pub const CATEGORY_CANVAS: &str = "category-chart";
pub const MONTHLY_CANVAS: &str = "monthly-chart";
pub const BALANCE_CANVAS: &str = "balance-chart";
pub const ANALYTICS_CANVASES: [&str; 4] =
    [TRENDS_CANVAS, CATEGORY_CANVAS, MONTHLY_CANVAS, BALANCE_CANVAS];

/// Parse `#rrggbb` (or `rrggbb`) into its channels
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Colour of the `index`-th category: its own when valid, else the palette
pub fn category_color(own: Option<&str>, index: usize) -> &str {
    match own {
        Some(color) if parse_hex_color(color).is_some() => color,
        _ => CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()],
    }
}

/// Each value's share of the total in percent; all zeros for a zero total
pub fn percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|value| value / total * 100.0).collect()
}

/// One-decimal rendering of a percentage, without the sign
pub fn percentage_label(percentage: f64) -> String {
    format!("{percentage:.1}")
}

/// Category label for a numeric x position; blank between categories
pub fn axis_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Something drawn on a canvas that must be released before another chart
/// may take the same canvas.
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// At most one live chart per canvas id.
#[derive(Debug)]
pub struct ChartRegistry<H: ChartHandle> {
    charts: HashMap<String, H>,
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }
}

impl<H: ChartHandle> ChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle` under `canvas_id`, destroying whatever was there first
    pub fn register(&mut self, canvas_id: &str, handle: H) {
        if let Some(mut previous) = self.charts.insert(canvas_id.to_string(), handle) {
            tracing::debug!(canvas_id, "replacing existing chart");
            previous.destroy();
        }
    }

    /// Destroy one chart; returns whether there was one
    pub fn destroy(&mut self, canvas_id: &str) -> bool {
        match self.charts.remove(canvas_id) {
            Some(mut handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    pub fn destroy_all(&mut self) {
        if !self.charts.is_empty() {
            tracing::debug!(count = self.charts.len(), "destroying all charts");
        }
        for (_, mut handle) in self.charts.drain() {
            handle.destroy();
        }
    }

    pub fn contains(&self, canvas_id: &str) -> bool {
        self.charts.contains_key(canvas_id)
    }

    pub fn get(&self, canvas_id: &str) -> Option<&H> {
        self.charts.get(canvas_id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.charts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl<H: ChartHandle> Drop for ChartRegistry<H> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

/// Income and expense trend lines sharing one x axis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl TrendSeries {
    /// Align both series on the sorted union of their dates; a date missing
    /// from one side counts as zero there.
    pub fn align(income: &[TrendPoint], expense: &[TrendPoint]) -> Self {
        let labels: BTreeSet<&str> = income
            .iter()
            .chain(expense)
            .map(|point| point.date.as_str())
            .collect();

        fn amounts(points: &[TrendPoint]) -> HashMap<&str, f64> {
            let mut by_date = HashMap::new();
            for point in points {
                *by_date.entry(point.date.as_str()).or_insert(0.0) += point.amount;
            }
            by_date
        }
        let income_by_date = amounts(income);
        let expense_by_date = amounts(expense);

        Self {
            labels: labels.iter().map(|label| label.to_string()).collect(),
            income: labels
                .iter()
                .map(|label| income_by_date.get(label).copied().unwrap_or(0.0))
                .collect(),
            expense: labels
                .iter()
                .map(|label| expense_by_date.get(label).copied().unwrap_or(0.0))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.income
            .iter()
            .chain(&self.expense)
            .copied()
            .fold(0.0, f64::max)
    }
}

/// One slice of a pie or donut chart
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub percentage: f64,
}

impl PieSlice {
    /// Donut legend entry: `Food (42.0%)`
    pub fn legend_label(&self) -> String {
        format!("{} ({}%)", self.label, percentage_label(self.percentage))
    }

    /// Balance pie label: `Income: ¥1000.00 (62.5%)`
    pub fn tooltip_label(&self) -> String {
        format!(
            "{}: {} ({}%)",
            self.label,
            format::currency(self.value),
            percentage_label(self.percentage)
        )
    }
}

fn slices(entries: Vec<(String, f64, String)>) -> Vec<PieSlice> {
    let values: Vec<f64> = entries.iter().map(|(_, value, _)| *value).collect();
    entries
        .into_iter()
        .zip(percentages(&values))
        .map(|((label, value, color), percentage)| PieSlice {
            label,
            value,
            color,
            percentage,
        })
        .collect()
}

/// Donut slices for a category breakdown
pub fn category_slices(categories: &[CategoryBreakdown]) -> Vec<PieSlice> {
    slices(
        categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                (
                    category.name.clone(),
                    category.amount,
                    category_color(category.color.as_deref(), index).to_string(),
                )
            })
            .collect(),
    )
}

/// Income against expense, labelled with the translated names
pub fn balance_slices(summary: &OverviewSummary, income_label: &str, expense_label: &str) -> Vec<PieSlice> {
    slices(vec![
        (income_label.to_string(), summary.total_income, INCOME_COLOR.to_string()),
        (expense_label.to_string(), summary.total_expense, EXPENSE_COLOR.to_string()),
    ])
}

/// Bars for income and expense plus a net line, per month
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    pub net: Vec<f64>,
}

impl MonthlySeries {
    pub fn from_entries(entries: &[MonthlyComparisonEntry]) -> Self {
        Self {
            labels: entries.iter().map(|e| e.month.clone()).collect(),
            income: entries.iter().map(|e| e.income).collect(),
            expense: entries.iter().map(|e| e.expense).collect(),
            net: entries.iter().map(|e| e.net).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Lower and upper y bound covering bars and the (possibly negative) net line
    pub fn value_range(&self) -> (f64, f64) {
        let all = self.income.iter().chain(&self.expense).chain(&self.net).copied();
        all.fold((0.0, 0.0), |(low, high), v| (f64::min(low, v), f64::max(high, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct MockChart {
        destroyed: Rc<Cell<u32>>,
    }

    impl ChartHandle for MockChart {
        fn destroy(&mut self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    fn mock(counter: &Rc<Cell<u32>>) -> MockChart {
        MockChart {
            destroyed: Rc::clone(counter),
        }
    }

    fn point(date: &str, amount: f64) -> TrendPoint {
        TrendPoint {
            date: date.to_string(),
            amount,
        }
    }

    #[test]
    fn test_register_twice_destroys_previous() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();

        registry.register(TRENDS_CANVAS, mock(&first));
        registry.register(TRENDS_CANVAS, mock(&second));

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_destroy_all_empties_registry() {
        let counter = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();
        for id in ANALYTICS_CANVASES {
            registry.register(id, mock(&counter));
        }
        assert_eq!(registry.ids(), vec![BALANCE_CANVAS, CATEGORY_CANVAS, MONTHLY_CANVAS, TRENDS_CANVAS]);

        registry.destroy_all();
        assert!(registry.is_empty());
        assert_eq!(counter.get(), 4);

        registry.destroy_all();
        assert_eq!(counter.get(), 4);
    }

    #[test]
    fn test_destroy_single_chart() {
        let counter = Rc::new(Cell::new(0));
        let mut registry = ChartRegistry::new();
        registry.register(CATEGORY_CANVAS, mock(&counter));
        assert!(registry.contains(CATEGORY_CANVAS));
        assert!(registry.destroy(CATEGORY_CANVAS));
        assert!(!registry.destroy(CATEGORY_CANVAS));
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_dropping_registry_releases_charts() {
        let counter = Rc::new(Cell::new(0));
        {
            let mut registry = ChartRegistry::new();
            registry.register(MONTHLY_CANVAS, mock(&counter));
        }
        assert_eq!(counter.get(), 1);
    }

    fn percentage_labels(values: &[f64]) -> Vec<String> {
        percentages(values).into_iter().map(percentage_label).collect()
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let values = [1.0, 1.0, 1.0];
        let labels = percentage_labels(&values);
        assert_eq!(labels, vec!["33.3", "33.3", "33.3"]);
        let total: f64 = labels.iter().map(|l| l.parse::<f64>().unwrap()).sum();
        assert!((total - 100.0).abs() <= 0.05 * values.len() as f64);

        let sum: f64 = percentages(&[12.5, 300.0, 7.25, 80.0]).iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_series_yields_zero_percentages() {
        assert_eq!(percentage_labels(&[0.0, 0.0]), vec!["0.0", "0.0"]);
        assert!(percentages(&[]).is_empty());
    }

    #[test]
    fn test_axis_label_only_on_whole_positions() {
        let labels = vec!["2025-05".to_string(), "2025-06".to_string()];
        assert_eq!(axis_label(&labels, 1.0), "2025-06");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, -1.0), "");
        assert_eq!(axis_label(&labels, 7.0), "");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#28a745"), Some((0x28, 0xa7, 0x45)));
        assert_eq!(parse_hex_color("FF6384"), Some((0xff, 0x63, 0x84)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_category_color_falls_back_to_palette() {
        assert_eq!(category_color(Some("#123456"), 0), "#123456");
        assert_eq!(category_color(None, 1), "#36A2EB");
        assert_eq!(category_color(Some("blue"), 13), "#36A2EB");
    }

    #[test]
    fn test_trend_series_aligns_on_date_union() {
        let income = [point("2025-06-01", 100.0), point("2025-06-03", 50.0)];
        let expense = [point("2025-06-02", 20.0), point("2025-06-03", 30.0)];
        let series = TrendSeries::align(&income, &expense);

        assert_eq!(series.labels, vec!["2025-06-01", "2025-06-02", "2025-06-03"]);
        assert_eq!(series.income, vec![100.0, 0.0, 50.0]);
        assert_eq!(series.expense, vec![0.0, 20.0, 30.0]);
        assert_eq!(series.max_value(), 100.0);
    }

    #[test]
    fn test_category_slices_and_legend() {
        let categories = vec![
            CategoryBreakdown {
                id: 1,
                name: "Food".to_string(),
                color: Some("#FF6384".to_string()),
                amount: 75.0,
                percentage: 75.0,
                transaction_count: 3,
            },
            CategoryBreakdown {
                id: 2,
                name: "Rent".to_string(),
                color: None,
                amount: 25.0,
                percentage: 25.0,
                transaction_count: 1,
            },
        ];
        let slices = category_slices(&categories);
        assert_eq!(slices[0].legend_label(), "Food (75.0%)");
        assert_eq!(slices[1].color, "#36A2EB");
    }

    #[test]
    fn test_balance_slice_tooltip() {
        let summary = OverviewSummary {
            total_income: 1000.0,
            total_expense: 600.0,
            net_income: 400.0,
            ..OverviewSummary::default()
        };
        let slices = balance_slices(&summary, "Income", "Expense");
        assert_eq!(slices[0].tooltip_label(), "Income: ¥1000.00 (62.5%)");
        assert_eq!(slices[1].color, EXPENSE_COLOR);
    }

    #[test]
    fn test_slice_labels_share_percentage_text() {
        let summary = OverviewSummary {
            total_income: 200.0,
            total_expense: 100.0,
            ..OverviewSummary::default()
        };
        let slices = balance_slices(&summary, "Income", "Expense");
        let labels = percentage_labels(&[200.0, 100.0]);
        assert_eq!(labels, vec!["66.7", "33.3"]);
        for (slice, label) in slices.iter().zip(&labels) {
            assert!(slice.legend_label().ends_with(&format!("({label}%)")));
            assert!(slice.tooltip_label().ends_with(&format!("({label}%)")));
        }
    }

    #[test]
    fn test_monthly_value_range_includes_negative_net() {
        let entries = vec![MonthlyComparisonEntry {
            month: "2025-05".to_string(),
            year: 2025,
            month_num: 5,
            income: 100.0,
            expense: 250.0,
            net: -150.0,
        }];
        let series = MonthlySeries::from_entries(&entries);
        assert_eq!(series.value_range(), (-150.0, 250.0));
    }
}
