//! Chart descriptions and the renderers that draw them
//!
//! The estimation pipeline never depends on a renderer. Reports build a
//! [`Chart`] from computed series and hand it to any [`ChartRenderer`].

use crate::data::SalesData;
use crate::error::{BassError, Result};
use crate::forecast::ForecastSeries;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart as TuiChart, Dataset, GraphType, Widget};
use std::fmt::Write;

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Individual observations
    Markers,
    /// Connected curve
    Line,
}

/// One named series of `(x, y)` points
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

impl ChartSeries {
    /// Pair `ys` with the time index `1..=n`
    pub fn over_time(label: &str, ys: &[f64], style: SeriesStyle) -> Self {
        Self {
            label: label.to_string(),
            points: ys
                .iter()
                .enumerate()
                .map(|(i, &y)| ((i + 1) as f64, y))
                .collect(),
            style,
        }
    }
}

/// Renderer-independent chart description
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Category labels for the x positions `1..=n`
    pub x_ticks: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    /// Observed sales as markers overlaid with the forecast curve
    pub fn forecast_vs_actual(data: &SalesData, forecast: &ForecastSeries) -> Self {
        Self {
            title: "Actual Sales vs Sales Forecast over Periods".to_string(),
            x_label: "Periods".to_string(),
            y_label: "Sales".to_string(),
            x_ticks: data.periods().to_vec(),
            series: vec![
                ChartSeries::over_time("Actual Sales", data.sales(), SeriesStyle::Markers),
                ChartSeries::over_time("Sales Forecast", forecast.sales(), SeriesStyle::Line),
            ],
        }
    }

    /// Cumulative forecast curve
    pub fn cumulative_forecast(data: &SalesData, forecast: &ForecastSeries) -> Self {
        Self {
            title: "Cumulative Sales Over Periods".to_string(),
            x_label: "Periods".to_string(),
            y_label: "Cumulative Sales".to_string(),
            x_ticks: data.periods().to_vec(),
            series: vec![ChartSeries::over_time(
                "Cumulative Sales Forecast",
                forecast.cumulative(),
                SeriesStyle::Line,
            )],
        }
    }

    fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Anything that can turn a [`Chart`] into output
pub trait ChartRenderer {
    /// Render the chart
    fn render(&self, chart: &Chart) -> Result<String>;
}

/// Line markers handed out in order to successive line series
const LINE_MARKERS: [Marker; 3] = [Marker::Braille, Marker::Block, Marker::Bar];

/// Graph type and marker for each series; marker series do not use up line markers
fn dataset_styles(series: &[ChartSeries]) -> Vec<(GraphType, Marker)> {
    let mut line_ordinal = 0;
    series
        .iter()
        .map(|s| match s.style {
            SeriesStyle::Markers => (GraphType::Scatter, Marker::Dot),
            SeriesStyle::Line => {
                let marker = LINE_MARKERS[line_ordinal % LINE_MARKERS.len()];
                line_ordinal += 1;
                (GraphType::Line, marker)
            }
        })
        .collect()
}

/// Widen a degenerate `[lo, hi]` range so the axis has extent
fn padded_bounds(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        [lo - 1.0, hi + 1.0]
    }
}

/// Terminal chart drawn with ratatui into an off-screen buffer
#[derive(Debug, Clone)]
pub struct TextChartRenderer {
    width: u16,
    height: u16,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self {
            width: 72,
            height: 20,
        }
    }
}

impl TextChartRenderer {
    /// Create a renderer drawing into `width × height` terminal cells
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width < 20 || height < 10 {
            return Err(BassError::InvalidParameter(
                "Text chart must be at least 20×10 cells".to_string(),
            ));
        }
        Ok(Self { width, height })
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, chart: &Chart) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "{}", chart.title)?;

        let (x_min, x_max, y_min, y_max) = chart.finite_points().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), (x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        );
        if !x_min.is_finite() {
            writeln!(out, "(no data)")?;
            return Ok(out);
        }

        let datasets: Vec<Dataset> = chart
            .series
            .iter()
            .zip(dataset_styles(&chart.series))
            .map(|(series, (graph_type, marker))| {
                Dataset::default()
                    .name(series.label.clone())
                    .graph_type(graph_type)
                    .marker(marker)
                    .data(&series.points)
            })
            .collect();

        let first = chart.x_ticks.first().cloned().unwrap_or_else(|| x_min.to_string());
        let last = chart.x_ticks.last().cloned().unwrap_or_else(|| x_max.to_string());

        let widget = TuiChart::new(datasets)
            .block(Block::default().borders(Borders::ALL))
            .hidden_legend_constraints((Constraint::Percentage(100), Constraint::Percentage(100)))
            .x_axis(
                Axis::default()
                    .title(chart.x_label.clone())
                    .bounds(padded_bounds(x_min, x_max))
                    .labels(vec![Span::raw(first), Span::raw(last)]),
            )
            .y_axis(
                Axis::default()
                    .title(chart.y_label.clone())
                    .bounds(padded_bounds(y_min, y_max))
                    .labels(vec![
                        Span::raw(format!("{:.2}", y_min)),
                        Span::raw(format!("{:.2}", y_max)),
                    ]),
            );

        let area = Rect::new(0, 0, self.width, self.height);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);

        for y in area.top()..area.bottom() {
            let line: String = (area.left()..area.right())
                .map(|x| buffer.get(x, y).symbol())
                .collect();
            writeln!(out, "{}", line.trim_end())?;
        }

        Ok(out)
    }
}

/// Tab-separated table of every series, one row per x position
#[derive(Debug, Clone, Default)]
pub struct TableRenderer;

impl ChartRenderer for TableRenderer {
    fn render(&self, chart: &Chart) -> Result<String> {
        let mut out = String::new();

        let header: Vec<&str> = std::iter::once(chart.x_label.as_str())
            .chain(chart.series.iter().map(|s| s.label.as_str()))
            .collect();
        writeln!(out, "{}", header.join("\t"))?;

        let rows = chart.series.iter().map(|s| s.points.len()).max().unwrap_or(0);
        for i in 0..rows {
            let x = match chart.x_ticks.get(i) {
                Some(tick) => tick.clone(),
                None => chart
                    .series
                    .iter()
                    .find_map(|s| s.points.get(i))
                    .map(|(x, _)| x.to_string())
                    .unwrap_or_default(),
            };
            let cells: Vec<String> = std::iter::once(x)
                .chain(chart.series.iter().map(|s| {
                    s.points
                        .get(i)
                        .map(|(_, y)| y.to_string())
                        .unwrap_or_default()
                }))
                .collect();
            writeln!(out, "{}", cells.join("\t"))?;
        }

        Ok(out)
    }
}
