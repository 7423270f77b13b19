//! Chart figures for the price-trend view
//!
//! A [`Figure`] serializes to the Plotly `{data, layout}` shape, so it can be
//! handed to any front end that renders Plotly JSON.

use crate::error::StockError;
use crate::forecast::ForecastSeries;
use crate::series::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const HISTORICAL_TRACE: &str = "Historical Prices";
pub const FORECAST_TRACE: &str = "Forecasted Prices";

/// A figure: traces plus layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// One scatter trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub mode: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub orientation: String,
    pub yanchor: String,
    pub y: f64,
    pub xanchor: String,
    pub x: f64,
}

impl Legend {
    /// Horizontal legend just above the plot, right-aligned
    fn above_plot() -> Self {
        Self {
            orientation: "h".to_string(),
            yanchor: "bottom".to_string(),
            y: 1.02,
            xanchor: "right".to_string(),
            x: 1.0,
        }
    }
}

impl Figure {
    /// A figure with no traces and no title
    pub fn empty() -> Self {
        Self::default()
    }

    /// A figure with no traces whose title carries `text`
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: Some(Title::new(text)),
                ..Layout::default()
            },
        }
    }

    /// The figure shown in place of a chart when `err` occurs
    ///
    /// Data errors are shown by their message; anything else is prefixed.
    pub fn from_error(err: &StockError) -> Self {
        if err.is_data_error() {
            Self::titled(err.to_string())
        } else {
            Self::titled(format!("Unexpected error occurred: {err}"))
        }
    }

    /// History as markers on a solid blue line, forecast as a dashed orange line
    pub fn price_trend(series: &PriceSeries, forecast: &ForecastSeries) -> Self {
        let historical = Trace {
            kind: "scatter".to_string(),
            name: HISTORICAL_TRACE.to_string(),
            mode: "lines+markers".to_string(),
            x: series.dates().collect(),
            y: series.closes().collect(),
            line: LineStyle {
                color: "blue".to_string(),
                dash: None,
            },
        };

        let forecasted = Trace {
            kind: "scatter".to_string(),
            name: FORECAST_TRACE.to_string(),
            mode: "lines".to_string(),
            x: forecast.dates().collect(),
            y: forecast.prices().collect(),
            line: LineStyle {
                color: "orange".to_string(),
                dash: Some("dash".to_string()),
            },
        };

        Self {
            data: vec![historical, forecasted],
            layout: Layout {
                title: Some(Title::new(format!(
                    "{} Price Trends with Forecast",
                    series.symbol().to_uppercase()
                ))),
                xaxis: Some(Axis {
                    title: Title::new("Date"),
                }),
                yaxis: Some(Axis {
                    title: Title::new("Price"),
                }),
                legend: Some(Legend::above_plot()),
            },
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.layout.title.as_ref().map(|t| t.text.as_str())
    }

    /// Trace by name
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|t| t.name == name)
    }
}
