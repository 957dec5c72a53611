use serde::{Deserialize, Serialize};

use super::news::NewsItem;
use super::prediction::{AnalystRatings, Prediction};
use super::quote::Quote;
use super::series::HistoricalSeries;

/// Everything the stock detail page shows for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    #[serde(flatten)]
    pub quote: Quote,
    /// In trillions.
    pub market_cap: f64,
    /// In millions.
    pub volume: f64,
    /// In millions.
    pub avg_volume: f64,
    pub pe: f64,
    pub eps: f64,
    /// Dividend yield, percent.
    pub dividend: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub open: f64,
    pub previous_close: f64,
    pub analyst: AnalystRatings,
    pub prediction: Prediction,
    #[serde(rename = "historicalData")]
    pub historical: HistoricalSeries,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}
