use serde::{Deserialize, Serialize};

use super::news::NewsItem;
use super::prediction::{PredictionHighlight, PriceTarget};
use super::quote::Quote;

/// A market index row (S&P 500, Dow Jones, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub name: String,
    pub value: f64,
    pub change: f64,
    pub percent_change: f64,
}

/// Best performer card: a quote plus an optional price target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPerformer {
    #[serde(flatten)]
    pub quote: Quote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PriceTarget>,
}

/// Full dashboard payload, swapped in as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub indices: Vec<MarketIndex>,
    pub timestamp: String,
    pub top_gainers: Vec<Quote>,
    pub top_losers: Vec<Quote>,
    pub most_watched: Vec<Quote>,
    pub best_performing: BestPerformer,
    pub top_predictions: Vec<PredictionHighlight>,
    pub recent_news: Vec<NewsItem>,
}
