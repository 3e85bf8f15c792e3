//! Canvas charts drawn with plotters, tracked per canvas id.

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_canvas::CanvasBackend;
use shared::charts::{
    axis_label, parse_hex_color, ChartHandle, ChartRegistry, MonthlySeries, PieSlice, TrendSeries,
    EXPENSE_COLOR, INCOME_COLOR, NET_COLOR,
};
use shared::format;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::download;

type Area = DrawingArea<CanvasBackend, Shift>;

const FONT: &str = "sans-serif";
const MUTED: RGBColor = RGBColor(108, 117, 125);
const GRID: RGBColor = RGBColor(240, 240, 240);

fn draw_err<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}

fn color(hex: &str) -> RGBColor {
    parse_hex_color(hex)
        .map(|(r, g, b)| RGBColor(r, g, b))
        .unwrap_or(MUTED)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Trend,
    CategoryDonut,
    MonthlyComparison,
    Balance,
}

/// Translated texts drawn inside charts
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabels {
    pub income: String,
    pub expense: String,
    pub net: String,
    pub no_data: String,
}

/// A chart currently drawn on a canvas
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
    kind: ChartKind,
}

impl CanvasChart {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }
}

impl ChartHandle for CanvasChart {
    fn destroy(&mut self) {
        let context = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if let Some(context) = context {
            context.clear_rect(
                0.0,
                0.0,
                f64::from(self.canvas.width()),
                f64::from(self.canvas.height()),
            );
        }
    }
}

/// Owns every chart on the page; at most one per canvas id
#[derive(Default)]
pub struct ChartsManager {
    registry: ChartRegistry<CanvasChart>,
}

impl ChartsManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn canvas(canvas_id: &str) -> Option<HtmlCanvasElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }

    /// Destroy whatever `canvas_id` shows, draw anew and register the result
    fn render<F>(&mut self, canvas_id: &str, kind: ChartKind, draw: F) -> Result<(), String>
    where
        F: FnOnce(&Area) -> Result<(), String>,
    {
        self.registry.destroy(canvas_id);

        let canvas =
            Self::canvas(canvas_id).ok_or_else(|| format!("canvas #{canvas_id} not found"))?;
        let backend = CanvasBackend::with_canvas_object(canvas.clone())
            .ok_or_else(|| format!("canvas #{canvas_id} has no 2d context"))?;
        let root = backend.into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        draw(&root)?;
        root.present().map_err(draw_err)?;

        self.registry.register(canvas_id, CanvasChart { canvas, kind });
        tracing::debug!(canvas_id, ?kind, "chart drawn");
        Ok(())
    }

    /// Income and expense lines over time
    pub fn create_trend_chart(
        &mut self,
        canvas_id: &str,
        series: &TrendSeries,
        labels: &ChartLabels,
    ) -> Result<(), String> {
        self.render(canvas_id, ChartKind::Trend, |root| draw_trend(root, series, labels))
    }

    /// Donut of the category breakdown
    pub fn create_category_chart(
        &mut self,
        canvas_id: &str,
        slices: &[PieSlice],
        labels: &ChartLabels,
    ) -> Result<(), String> {
        self.render(canvas_id, ChartKind::CategoryDonut, |root| {
            let texts: Vec<String> = slices.iter().map(PieSlice::legend_label).collect();
            draw_pie(root, slices, &texts, true, &labels.no_data)
        })
    }

    /// Income and expense bars per month with the net as a line
    pub fn create_monthly_comparison_chart(
        &mut self,
        canvas_id: &str,
        series: &MonthlySeries,
        labels: &ChartLabels,
    ) -> Result<(), String> {
        self.render(canvas_id, ChartKind::MonthlyComparison, |root| {
            draw_monthly(root, series, labels)
        })
    }

    /// Income against expense
    pub fn create_balance_chart(
        &mut self,
        canvas_id: &str,
        slices: &[PieSlice],
        labels: &ChartLabels,
    ) -> Result<(), String> {
        self.render(canvas_id, ChartKind::Balance, |root| {
            let texts: Vec<String> = slices.iter().map(PieSlice::tooltip_label).collect();
            draw_pie(root, slices, &texts, false, &labels.no_data)
        })
    }

    pub fn destroy(&mut self, canvas_id: &str) -> bool {
        self.registry.destroy(canvas_id)
    }

    pub fn destroy_all(&mut self) {
        self.registry.destroy_all();
    }

    pub fn contains(&self, canvas_id: &str) -> bool {
        self.registry.contains(canvas_id)
    }

    pub fn kind_of(&self, canvas_id: &str) -> Option<ChartKind> {
        self.registry.get(canvas_id).map(CanvasChart::kind)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Download the canvas as a PNG image
    pub fn export_chart(&self, canvas_id: &str, filename: &str) -> Result<(), String> {
        let canvas = self
            .registry
            .get(canvas_id)
            .map(|chart| chart.canvas.clone())
            .ok_or_else(|| format!("no chart on #{canvas_id}"))?;
        let data_url = canvas
            .to_data_url_with_type("image/png")
            .map_err(|_| format!("canvas #{canvas_id} could not be encoded"))?;
        download::download_data_url(&data_url, filename)
    }
}

fn draw_no_data(root: &Area, text: &str) -> Result<(), String> {
    let (width, height) = root.dim_in_pixel();
    let style = TextStyle::from((FONT, 16).into_font())
        .color(&MUTED)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        text.to_string(),
        ((width / 2) as i32, (height / 2) as i32),
        style,
    ))
    .map_err(draw_err)
}

fn draw_trend(root: &Area, series: &TrendSeries, labels: &ChartLabels) -> Result<(), String> {
    if series.is_empty() {
        return draw_no_data(root, &labels.no_data);
    }

    let x_max = series.labels.len().saturating_sub(1).max(1) as f64;
    let y_max = (series.max_value() * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_labels(series.labels.len().min(8))
        .y_labels(6)
        .x_label_formatter(&|x| axis_label(&series.labels, *x))
        .y_label_formatter(&|y| format::currency(*y))
        .label_style((FONT, 12, &MUTED))
        .bold_line_style(&GRID)
        .light_line_style(&WHITE)
        .draw()
        .map_err(draw_err)?;

    let lines = [
        (&series.income, color(INCOME_COLOR), &labels.income),
        (&series.expense, color(EXPENSE_COLOR), &labels.expense),
    ];
    for (values, line_color, name) in lines {
        chart
            .draw_series(
                AreaSeries::new(
                    values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                    0.0,
                    &line_color.mix(0.12),
                )
                .border_style(line_color.stroke_width(2)),
            )
            .map_err(draw_err)?
            .label(name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.2))
        .label_font((FONT, 12))
        .draw()
        .map_err(draw_err)
}

fn draw_monthly(root: &Area, series: &MonthlySeries, labels: &ChartLabels) -> Result<(), String> {
    if series.is_empty() {
        return draw_no_data(root, &labels.no_data);
    }

    let count = series.labels.len();
    let (low, high) = series.value_range();
    let padding = ((high - low) * 0.1).max(1.0);
    let y_low = if low < 0.0 { low - padding } else { 0.0 };

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(count as f64 - 0.5), y_low..(high + padding))
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_labels(count)
        .y_labels(6)
        .x_label_formatter(&|x| axis_label(&series.labels, *x))
        .y_label_formatter(&|y| format::currency(*y))
        .label_style((FONT, 12, &MUTED))
        .bold_line_style(&GRID)
        .light_line_style(&WHITE)
        .draw()
        .map_err(draw_err)?;

    let income_color = color(INCOME_COLOR);
    let expense_color = color(EXPENSE_COLOR);
    let net_color = color(NET_COLOR);

    chart
        .draw_series(series.income.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x, *v)], income_color.mix(0.8).filled())
        }))
        .map_err(draw_err)?
        .label(labels.income.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], income_color.filled()));

    chart
        .draw_series(series.expense.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + 0.4, *v)], expense_color.mix(0.8).filled())
        }))
        .map_err(draw_err)?
        .label(labels.expense.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], expense_color.filled()));

    chart
        .draw_series(LineSeries::new(
            series.net.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            net_color.stroke_width(3),
        ))
        .map_err(draw_err)?
        .label(labels.net.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], net_color.stroke_width(3)));

    chart
        .draw_series(
            series
                .net
                .iter()
                .enumerate()
                .map(|(i, v)| Circle::new((i as f64, *v), 4, net_color.filled())),
        )
        .map_err(draw_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.2))
        .label_font((FONT, 12))
        .draw()
        .map_err(draw_err)
}

fn draw_pie(
    root: &Area,
    slices: &[PieSlice],
    texts: &[String],
    donut: bool,
    no_data: &str,
) -> Result<(), String> {
    let sizes: Vec<f64> = slices.iter().map(|slice| slice.value).collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return draw_no_data(root, no_data);
    }
    let colors: Vec<RGBColor> = slices.iter().map(|slice| color(&slice.color)).collect();

    let (width, height) = root.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.32;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, texts);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 13).into_font().color(&BLACK));
    pie.label_offset(22.0);
    if donut {
        pie.donut_hole(radius * 0.55);
    }
    root.draw(&pie).map_err(draw_err)
}

#[cfg(test)]
mod wasm_tests {
    use super::*;
    use shared::analytics::TrendPoint;
    use shared::charts::TRENDS_CANVAS;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn labels() -> ChartLabels {
        ChartLabels {
            income: "Income".to_string(),
            expense: "Expense".to_string(),
            net: "Net".to_string(),
            no_data: "No data".to_string(),
        }
    }

    fn mount_canvas(id: &str) {
        let document = web_sys::window().unwrap().document().unwrap();
        if document.get_element_by_id(id).is_some() {
            return;
        }
        let canvas = document.create_element("canvas").unwrap();
        canvas.set_id(id);
        canvas.set_attribute("width", "400").unwrap();
        canvas.set_attribute("height", "300").unwrap();
        document.body().unwrap().append_child(&canvas).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_redrawing_keeps_one_chart_per_canvas() {
        mount_canvas(TRENDS_CANVAS);
        let series = TrendSeries::align(
            &[TrendPoint { date: "2025-06-01".into(), amount: 10.0 }],
            &[TrendPoint { date: "2025-06-02".into(), amount: 4.0 }],
        );
        let mut manager = ChartsManager::new();
        manager.create_trend_chart(TRENDS_CANVAS, &series, &labels()).unwrap();
        manager.create_trend_chart(TRENDS_CANVAS, &series, &labels()).unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.kind_of(TRENDS_CANVAS), Some(ChartKind::Trend));

        manager.destroy_all();
        assert!(manager.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_missing_canvas_is_an_error() {
        let mut manager = ChartsManager::new();
        let result = manager.create_balance_chart("no-such-canvas", &[], &labels());
        assert!(result.is_err());
        assert!(!manager.contains("no-such-canvas"));
    }

    #[wasm_bindgen_test]
    fn test_all_zero_pie_draws_placeholder() {
        mount_canvas("zero-pie");
        let slices = vec![PieSlice {
            label: "Income".into(),
            value: 0.0,
            color: INCOME_COLOR.into(),
            percentage: 0.0,
        }];
        let mut manager = ChartsManager::new();
        manager.create_balance_chart("zero-pie", &slices, &labels()).unwrap();
        assert!(manager.contains("zero-pie"));
    }
}
