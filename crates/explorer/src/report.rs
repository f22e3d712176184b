//! Report rendering
//!
//! Produces the display artifact for a settled session: a scatter chart
//! with the fitted line (rendered to an in-memory SVG string) and a live
//! text summary. Pure: inputs are not mutated and identical inputs yield
//! identical reports.

use plotters::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::dataset::Dataset;
use crate::stats::FitResult;

/// Samples along the fitted line
const LINE_SAMPLES: usize = 200;

/// Chart canvas size in pixels
const CHART_SIZE: (u32, u32) = (640, 480);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("dataset is empty; nothing to plot")]
    EmptyDataset,

    #[error("chart backend: {0}")]
    Chart(String),
}

/// Fully materialized display artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Live text summary
    pub summary: String,
    /// Scatter + fitted line as SVG markup
    pub chart_svg: String,
}

/// Structured summary of a settled session, for text and JSON output
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub n: i64,
    pub sigma: f64,
    pub correlation: f64,
    pub slope: f64,
    pub intercept: f64,
    pub interpretation: String,
}

impl Summary {
    pub fn new(n: i64, sigma: f64, fit: &FitResult) -> Self {
        Self {
            n,
            sigma,
            correlation: fit.correlation,
            slope: fit.slope,
            intercept: fit.intercept,
            interpretation: interpret(fit.correlation),
        }
    }

    /// Fixed-precision text block: correlation to 3 decimals, slope and
    /// intercept to 2.
    pub fn to_text(&self) -> String {
        format!(
            "Live summary\n\
             - n = {}\n\
             - sigma = {}\n\
             - corr(x, y) = {:.3}\n\
             - fit: y = {:.2}x + {:.2}\n\
             Interpretation: {}.",
            self.n, self.sigma, self.correlation, self.slope, self.intercept, self.interpretation
        )
    }
}

/// One-line qualitative reading of a correlation coefficient
pub fn interpret(correlation: f64) -> String {
    let magnitude = correlation.abs();
    if magnitude < 0.2 {
        return "negligible linear relationship".to_string();
    }
    let strength = if magnitude >= 0.8 {
        "strong"
    } else if magnitude >= 0.5 {
        "moderate"
    } else {
        "weak"
    };
    let direction = if correlation > 0.0 { "positive" } else { "negative" };
    format!("{strength} {direction} linear relationship")
}

/// Render the report for a dataset and its fit at the given control values
pub fn render(
    dataset: &Dataset,
    fit: &FitResult,
    n: i64,
    sigma: f64,
) -> Result<Report, RenderError> {
    let chart_svg = draw_chart(dataset, fit)?;
    let summary = Summary::new(n, sigma, fit).to_text();
    Ok(Report { summary, chart_svg })
}

fn chart_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Chart(err.to_string())
}

/// Half a unit of padding when an axis has no span at all
fn span_pad(lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span > 0.0 { span * 0.05 } else { 0.5 }
}

fn draw_chart(dataset: &Dataset, fit: &FitResult) -> Result<String, RenderError> {
    let (x_min, x_max) = dataset.x_range().ok_or(RenderError::EmptyDataset)?;

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for y in dataset.ys() {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    for x in [x_min, x_max] {
        let y = fit.slope * x + fit.intercept;
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let x_pad = span_pad(x_min, x_max);
    let y_pad = span_pad(y_min, y_max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Scatter of y vs. x with fitted line", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(32)
            .y_label_area_size(48)
            .build_cartesian_2d(
                (x_min - x_pad)..(x_max + x_pad),
                (y_min - y_pad)..(y_max + y_pad),
            )
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("x")
            .y_desc("y")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(
                dataset
                    .points()
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, BLUE.mix(0.3).filled())),
            )
            .map_err(chart_err)?;

        let step = (x_max - x_min) / (LINE_SAMPLES - 1) as f64;
        chart
            .draw_series(LineSeries::new(
                (0..LINE_SAMPLES).map(|i| {
                    let x = x_min + step * i as f64;
                    (x, fit.slope * x + fit.intercept)
                }),
                &RED,
            ))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(svg)
}
