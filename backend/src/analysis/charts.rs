//! Declarative chart specifications.
//!
//! Nothing is rendered here. A [`ChartSpec`] carries the series data, its
//! style and the layout constants; [`ChartSpec::to_plotly`] lowers it to a
//! Plotly figure (`{"data": [...], "layout": {...}}`) that a web page can
//! hand straight to `Plotly.newPlot`.
//!
//! # Charts
//!
//! | Chart               | Kind        | x                      | y                    |
//! |---------------------|-------------|------------------------|----------------------|
//! | temperature trend   | line        | dates, input order     | temperature          |
//! | monthly average     | bar         | months present, asc    | mean temperature     |
//! | rainfall trend      | filled line | dates, input order     | rainfall             |

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::grouping::{monthly_means, MonthlyGroups};
use crate::models::{Charts, WeatherDataset};

/// Visual theme shared by every chart.
pub const THEME: &str = "plotly_white";
/// Hover behaviour of the two daily trend charts.
pub const HOVER_MODE_X_UNIFIED: &str = "x unified";

pub const TEMPERATURE_TREND_TITLE: &str = "Daily Temperature Trend";
pub const MONTHLY_AVERAGE_TITLE: &str = "Average Temperature by Month";
pub const RAINFALL_TREND_TITLE: &str = "Daily Rainfall Trend";

pub const DATE_AXIS_TITLE: &str = "Date";
pub const MONTH_AXIS_TITLE: &str = "Month";
pub const TEMPERATURE_AXIS_TITLE: &str = "Temperature (°C)";
pub const RAINFALL_AXIS_TITLE: &str = "Rainfall (mm)";

pub const TEMPERATURE_COLOR: &str = "teal";
pub const MONTHLY_BAR_COLOR: &str = "orange";
pub const RAINFALL_COLOR: &str = "blue";
pub const RAINFALL_FILL_COLOR: &str = "rgba(0, 0, 255, 0.1)";
pub const LINE_WIDTH: u32 = 2;

/// An x-axis value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Date(NaiveDate),
    Month(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Bar,
}

/// Area fill under a line series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fill {
    /// Fill down to y = 0.
    #[serde(rename = "tozeroy")]
    ToZeroY,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

impl SeriesStyle {
    fn line(color: &str) -> Self {
        Self {
            color: color.to_string(),
            width: Some(LINE_WIDTH),
            fill: None,
            fill_color: None,
        }
    }

    fn bar(color: &str) -> Self {
        Self {
            color: color.to_string(),
            width: None,
            fill: None,
            fill_color: None,
        }
    }

    fn filled_to_zero(mut self, fill_color: &str) -> Self {
        self.fill = Some(Fill::ToZeroY);
        self.fill_color = Some(fill_color.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
    pub style: SeriesStyle,
}

/// A single-series chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_mode: Option<String>,
    pub series: Series,
}

impl ChartSpec {
    /// Lower to a Plotly figure.
    pub fn to_plotly(&self) -> Value {
        let series = &self.series;
        let mut trace = Map::new();

        match series.kind {
            SeriesKind::Line => {
                trace.insert("type".into(), json!("scatter"));
                trace.insert("mode".into(), json!("lines"));
                let mut line = Map::new();
                line.insert("color".into(), json!(series.style.color));
                if let Some(width) = series.style.width {
                    line.insert("width".into(), json!(width));
                }
                trace.insert("line".into(), Value::Object(line));
            }
            SeriesKind::Bar => {
                trace.insert("type".into(), json!("bar"));
                trace.insert("marker".into(), json!({ "color": series.style.color }));
            }
        }

        trace.insert("name".into(), json!(series.name));
        trace.insert("x".into(), json!(series.x));
        trace.insert("y".into(), json!(series.y));
        if let Some(fill) = series.style.fill {
            trace.insert("fill".into(), json!(fill));
        }
        if let Some(ref fill_color) = series.style.fill_color {
            trace.insert("fillcolor".into(), json!(fill_color));
        }

        let mut layout = Map::new();
        layout.insert("title".into(), json!({ "text": self.title }));
        layout.insert("xaxis".into(), json!({ "title": { "text": self.x_axis_title } }));
        layout.insert("yaxis".into(), json!({ "title": { "text": self.y_axis_title } }));
        layout.insert("template".into(), json!(self.theme));
        if let Some(ref hover_mode) = self.hover_mode {
            layout.insert("hovermode".into(), json!(hover_mode));
        }

        json!({
            "data": [Value::Object(trace)],
            "layout": Value::Object(layout),
        })
    }
}

fn date_axis(dataset: &WeatherDataset) -> Vec<AxisValue> {
    dataset
        .records()
        .iter()
        .map(|r| AxisValue::Date(r.date()))
        .collect()
}

/// Daily temperature as a teal line, dates in input order.
pub fn temperature_trend(dataset: &WeatherDataset) -> ChartSpec {
    ChartSpec {
        title: TEMPERATURE_TREND_TITLE.into(),
        x_axis_title: DATE_AXIS_TITLE.into(),
        y_axis_title: TEMPERATURE_AXIS_TITLE.into(),
        theme: THEME.into(),
        hover_mode: Some(HOVER_MODE_X_UNIFIED.into()),
        series: Series {
            name: "Temperature".into(),
            kind: SeriesKind::Line,
            x: date_axis(dataset),
            y: dataset.records().iter().map(|r| r.temperature()).collect(),
            style: SeriesStyle::line(TEMPERATURE_COLOR),
        },
    }
}

/// Mean temperature per month as orange bars.
pub fn monthly_average(groups: &MonthlyGroups) -> ChartSpec {
    let (months, means): (Vec<AxisValue>, Vec<f64>) = monthly_means(groups)
        .into_iter()
        .map(|(month, mean)| (AxisValue::Month(month), mean))
        .unzip();

    ChartSpec {
        title: MONTHLY_AVERAGE_TITLE.into(),
        x_axis_title: MONTH_AXIS_TITLE.into(),
        y_axis_title: TEMPERATURE_AXIS_TITLE.into(),
        theme: THEME.into(),
        hover_mode: None,
        series: Series {
            name: "Avg Temperature".into(),
            kind: SeriesKind::Bar,
            x: months,
            y: means,
            style: SeriesStyle::bar(MONTHLY_BAR_COLOR),
        },
    }
}

/// Daily rainfall as a blue line filled down to zero.
pub fn rainfall_trend(dataset: &WeatherDataset) -> ChartSpec {
    ChartSpec {
        title: RAINFALL_TREND_TITLE.into(),
        x_axis_title: DATE_AXIS_TITLE.into(),
        y_axis_title: RAINFALL_AXIS_TITLE.into(),
        theme: THEME.into(),
        hover_mode: Some(HOVER_MODE_X_UNIFIED.into()),
        series: Series {
            name: "Rainfall".into(),
            kind: SeriesKind::Line,
            x: date_axis(dataset),
            y: dataset.records().iter().map(|r| r.rainfall()).collect(),
            style: SeriesStyle::line(RAINFALL_COLOR).filled_to_zero(RAINFALL_FILL_COLOR),
        },
    }
}

pub fn build_charts(dataset: &WeatherDataset, groups: &MonthlyGroups) -> Charts {
    Charts {
        temperature_trend: temperature_trend(dataset),
        monthly_average: monthly_average(groups),
        rainfall_trend: rainfall_trend(dataset),
    }
}
