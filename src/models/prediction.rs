use serde::{Deserialize, Serialize};

/// Direction a factor pushes the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

/// Trading suggestion supplied by the prediction provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

/// One input the model reports for a prediction.
///
/// `weight` is a display percentage; weights of one prediction are not
/// required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactor {
    pub name: String,
    pub impact: Impact,
    pub weight: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub current_price: f64,
    pub predicted_price: f64,
    pub percent_change: f64,
    /// Provider's self-reported certainty, expected in 0..=100.
    pub confidence: i32,
    /// Human-readable horizon, e.g. "3 months".
    pub timeframe: String,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub factors: Vec<PredictionFactor>,
}

/// Analyst rating counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalystRatings {
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
}

impl AnalystRatings {
    /// Widened so that three `u32` counts can never overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.buy) + u64::from(self.hold) + u64::from(self.sell)
    }
}

/// Short price target attached to a dashboard card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTarget {
    pub target: f64,
    pub confidence: i32,
    pub timeframe: String,
}

/// Row of the "Top AI Predictions" table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionHighlight {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub confidence: i32,
    pub recommendation: Recommendation,
}
