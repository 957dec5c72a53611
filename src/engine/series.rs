use serde::Serialize;

use crate::engine::display::{classify, Direction};
use crate::errors::AppError;
use crate::models::series::{Series, Timeframe};
use crate::models::stock::Stock;

/// Pure lookup of the pre-materialized series for `timeframe`.
pub fn select_series(stock: &Stock, timeframe: Timeframe) -> &Series {
    stock.historical.get(timeframe)
}

/// Line colors for the price chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
}

/// Chart colors follow the quote's direction, not the series shape.
pub fn chart_style(percent_change: f64) -> ChartStyle {
    match classify(percent_change) {
        Direction::Positive => ChartStyle {
            border_color: "rgb(34, 197, 94)",
            background_color: "rgba(34, 197, 94, 0.1)",
        },
        Direction::Negative => ChartStyle {
            border_color: "rgb(239, 68, 68)",
            background_color: "rgba(239, 68, 68, 0.1)",
        },
    }
}

/// One timeframe button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeframeOption {
    pub value: Timeframe,
    pub label: &'static str,
    pub selected: bool,
}

/// Chart-ready payload for the selected timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub direction: Direction,
    pub style: ChartStyle,
    pub options: Vec<TimeframeOption>,
}

/// Holds the selected timeframe key. Switching never touches the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeframeSelector {
    selected: Timeframe,
}

impl TimeframeSelector {
    pub fn new(selected: Timeframe) -> Self {
        TimeframeSelector { selected }
    }

    pub fn selected(&self) -> Timeframe {
        self.selected
    }

    pub fn set(&mut self, timeframe: Timeframe) {
        self.selected = timeframe;
    }

    /// Set from a raw key, failing fast on anything outside the six known keys.
    pub fn set_key(&mut self, key: &str) -> Result<Timeframe, AppError> {
        let timeframe: Timeframe = key.parse()?;
        self.selected = timeframe;
        Ok(timeframe)
    }

    pub fn options(&self) -> Vec<TimeframeOption> {
        Timeframe::ALL
            .into_iter()
            .map(|tf| TimeframeOption {
                value: tf,
                label: tf.label(),
                selected: tf == self.selected,
            })
            .collect()
    }

    pub fn chart(&self, stock: &Stock) -> ChartView {
        let series = select_series(stock, self.selected);
        let pct = stock.quote.percent_change;
        ChartView {
            symbol: stock.quote.symbol.clone(),
            timeframe: self.selected,
            labels: series.labels().to_vec(),
            values: series.values().to_vec(),
            direction: classify(pct),
            style: chart_style(pct),
            options: self.options(),
        }
    }
}
