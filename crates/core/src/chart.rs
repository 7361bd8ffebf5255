//! Chart-ready shaping of a [`PredictionResult`].
//!
//! The output is plain data: a label axis, two line datasets and a declarative options
//! block. Any renderer (a browser chart, the terminal plot in the CLI) interprets it.

use crate::domain::prediction::PredictionResult;
use serde::Serialize;

pub const HISTORICAL_LABEL: &str = "Historical Prices";
pub const PREDICTED_LABEL: &str = "Predicted Prices";
pub const BOUNDARY_LABEL: &str = "Prediction Starts";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// `None` points are gaps; they serialize as `null`.
    pub data: Vec<Option<f64>>,
    #[serde(flatten)]
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u32; 2]>,
    pub fill: bool,
    pub tension: f64,
    pub border_width: u32,
    pub point_radius: u32,
}

impl LineStyle {
    pub fn historical() -> Self {
        Self {
            border_color: "rgba(75, 192, 192, 1)",
            background_color: "rgba(75, 192, 192, 0.5)",
            border_dash: None,
            fill: false,
            tension: 0.3,
            border_width: 2,
            point_radius: 4,
        }
    }

    pub fn predicted() -> Self {
        Self {
            border_color: "rgba(255, 99, 132, 1)",
            background_color: "rgba(255, 99, 132, 0.5)",
            border_dash: Some([5, 5]),
            fill: false,
            tension: 0.3,
            border_width: 2,
            point_radius: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub tension_animation: TensionAnimation,
    pub legend_display: bool,
    pub tooltip: TooltipFormat,
    pub boundary: BoundaryMarker,
    pub y_begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionAnimation {
    pub duration_ms: u32,
    pub easing: &'static str,
    pub from: f64,
    pub to: f64,
}

/// Tooltip values render as currency: `prefix` followed by the value to `decimals` places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipFormat {
    pub prefix: &'static str,
    pub decimals: u8,
}

impl TooltipFormat {
    pub fn format(&self, value: f64) -> String {
        format!("{}{:.*}", self.prefix, self.decimals as usize, value)
    }
}

/// Vertical line at the first predicted index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryMarker {
    pub x: usize,
    pub label: &'static str,
    pub color: &'static str,
    pub border_width: u32,
    pub border_dash: [u32; 2],
    pub label_position: &'static str,
}

impl ChartOptions {
    pub fn for_boundary(x: usize) -> Self {
        Self {
            responsive: true,
            tension_animation: TensionAnimation {
                duration_ms: 1000,
                easing: "easeInOutQuad",
                from: 0.3,
                to: 0.5,
            },
            legend_display: true,
            tooltip: TooltipFormat {
                prefix: "$",
                decimals: 2,
            },
            boundary: BoundaryMarker {
                x,
                label: BOUNDARY_LABEL,
                color: "red",
                border_width: 2,
                border_dash: [6, 6],
                label_position: "start",
            },
            y_begin_at_zero: false,
        }
    }
}

pub fn shape(result: &PredictionResult) -> ChartSpec {
    ChartSpec {
        data: chart_data(result.historical_prices(), result.predicted_prices()),
        options: ChartOptions::for_boundary(result.historical_prices().len()),
    }
}

/// `Day N` labels for the history followed by `Future N` labels for the forecast. The
/// predicted line is padded with gaps over the history so both lines share one x axis.
pub fn chart_data(historical: &[f64], predicted: &[f64]) -> ChartData {
    let labels = (1..=historical.len())
        .map(|n| format!("Day {n}"))
        .chain((1..=predicted.len()).map(|n| format!("Future {n}")))
        .collect();

    let predicted_data = std::iter::repeat(None)
        .take(historical.len())
        .chain(predicted.iter().copied().map(Some))
        .collect();

    ChartData {
        labels,
        datasets: vec![
            Dataset {
                label: HISTORICAL_LABEL.to_string(),
                data: historical.iter().copied().map(Some).collect(),
                style: LineStyle::historical(),
            },
            Dataset {
                label: PREDICTED_LABEL.to_string(),
                data: predicted_data,
                style: LineStyle::predicted(),
            },
        ],
    }
}

/// Plots a [`ChartSpec`] as rows of text, one per label, with the boundary marker drawn before
/// the first predicted row.
pub fn render_text(spec: &ChartSpec, width: usize) -> Vec<String> {
    let values: Vec<f64> = spec
        .data
        .datasets
        .iter()
        .flat_map(|d| d.data.iter().flatten().copied())
        .collect();
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    let width = width.max(1);
    let span = (max - min).max(f64::EPSILON);
    let label_width = spec.data.labels.iter().map(String::len).max().unwrap_or(0);
    let boundary = spec.options.boundary.x;

    let mut out = Vec::with_capacity(spec.data.labels.len() + 1);
    for (idx, label) in spec.data.labels.iter().enumerate() {
        if idx == boundary {
            out.push(format!(
                "{:label_width$} {}",
                "",
                format!("-- {} --", spec.options.boundary.label)
            ));
        }

        let point = spec
            .data
            .datasets
            .iter()
            .enumerate()
            .find_map(|(series, d)| d.data.get(idx).copied().flatten().map(|v| (series, v)));
        let Some((series, value)) = point else {
            continue;
        };

        let filled = (((value - min) / span) * (width - 1) as f64).round() as usize;
        let glyph = if series == 0 { '#' } else { '*' };
        let bar: String = std::iter::repeat(glyph).take(filled + 1).collect();
        out.push(format!(
            "{label:label_width$} {bar:width$} {}",
            spec.options.tooltip.format(value)
        ));
    }
    out
}
