//! Derived display values. Every function here is pure and total.
//!
//! Deltas are classified in one place (`classify`) so every component picks the
//! same icon and color for the same sign.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::market::MarketIndex;
use crate::models::news::{NewsItem, Sentiment};
use crate::models::prediction::{
    AnalystRatings, Impact, Prediction, PredictionFactor, PredictionHighlight, Recommendation,
};
use crate::models::quote::Quote;
use crate::models::series::Series;
use crate::utils::format::{
    format_delta, format_percent, format_price, format_price_range, format_time_ago,
    format_timestamp,
};

/// Sign of a delta. Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn icon(&self) -> &'static str {
        match self {
            Direction::Positive => "arrow-up",
            Direction::Negative => "arrow-down",
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Direction::Positive => "text-green-600",
            Direction::Negative => "text-red-600",
        }
    }
}

/// `Positive` iff `value >= 0`. NaN is negative.
pub fn classify(value: f64) -> Direction {
    if value >= 0.0 {
        Direction::Positive
    } else {
        Direction::Negative
    }
}

/// Everything needed to render a `+3.21 (+1.34%)` delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaView {
    pub direction: Direction,
    pub icon: &'static str,
    pub color_class: &'static str,
    pub text: String,
}

pub fn delta_view(change: f64, percent_change: f64) -> DeltaView {
    let direction = classify(percent_change);
    DeltaView {
        direction,
        icon: direction.icon(),
        color_class: direction.color_class(),
        text: format_delta(change, percent_change),
    }
}

/// A quote row (movers, most watched, page header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRow {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub delta: DeltaView,
}

pub fn quote_row(quote: &Quote) -> QuoteRow {
    QuoteRow {
        symbol: quote.symbol.clone(),
        name: quote.name.clone(),
        price: format_price(quote.price),
        delta: delta_view(quote.change, quote.percent_change),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRow {
    pub name: String,
    pub value: String,
    pub delta: DeltaView,
}

pub fn index_row(index: &MarketIndex) -> IndexRow {
    IndexRow {
        name: index.name.clone(),
        value: format!("{:.2}", index.value),
        delta: delta_view(index.change, index.percent_change),
    }
}

// ── Confidence ──

/// Width of the confidence bar, in percent.
pub fn confidence_width(confidence: i32) -> u8 {
    confidence.clamp(0, 100) as u8
}

/// Confidence / uncertainty slices of the confidence doughnut. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceSplit {
    pub confidence: u8,
    pub uncertainty: u8,
}

pub fn confidence_split(confidence: i32) -> ConfidenceSplit {
    let confidence = confidence_width(confidence);
    ConfidenceSplit {
        confidence,
        uncertainty: 100 - confidence,
    }
}

// ── Color bands ──

pub fn recommendation_band(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Buy => "bg-green-100 text-green-800",
        Recommendation::Hold => "bg-yellow-100 text-yellow-800",
        Recommendation::Sell => "bg-red-100 text-red-800",
    }
}

pub fn impact_band(impact: Impact) -> &'static str {
    match impact {
        Impact::Positive => "bg-green-100 text-green-800",
        Impact::Negative => "bg-red-100 text-red-800",
        Impact::Neutral => "bg-gray-100 text-gray-800",
    }
}

pub fn sentiment_dot(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "bg-green-500",
        Sentiment::Negative => "bg-red-500",
        Sentiment::Neutral => "bg-gray-500",
    }
}

pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Positive",
        Sentiment::Negative => "Negative",
        Sentiment::Neutral => "Neutral",
    }
}

// ── Analyst distribution ──

/// Buy/hold/sell bar segments in percent. All zero when there are no ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystDistribution {
    pub buy_pct: f64,
    pub hold_pct: f64,
    pub sell_pct: f64,
    pub total: u64,
}

pub fn analyst_distribution(ratings: &AnalystRatings) -> AnalystDistribution {
    let total = ratings.total();
    let pct = |n: u32| {
        if total == 0 {
            0.0
        } else {
            f64::from(n) / total as f64 * 100.0
        }
    };
    AnalystDistribution {
        buy_pct: pct(ratings.buy),
        hold_pct: pct(ratings.hold),
        sell_pct: pct(ratings.sell),
        total,
    }
}

// ── Prediction ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorView {
    pub name: String,
    pub impact: Impact,
    pub impact_band: &'static str,
    pub weight: i32,
    pub width_pct: u8,
    pub description: String,
}

pub fn factor_view(factor: &PredictionFactor) -> FactorView {
    FactorView {
        name: factor.name.clone(),
        impact: factor.impact,
        impact_band: impact_band(factor.impact),
        weight: factor.weight,
        width_pct: factor.weight.clamp(0, 100) as u8,
        description: factor.description.clone(),
    }
}

/// Sum of the factor weights as reported. Not normalized.
pub fn factor_weight_total(factors: &[PredictionFactor]) -> i32 {
    factors.iter().map(|f| f.weight).sum()
}

/// "Our AI model predicts a 12.91% increase with 85% confidence over the next 3 months."
pub fn prediction_summary(prediction: &Prediction) -> String {
    let movement = match classify(prediction.percent_change) {
        Direction::Positive => "increase",
        Direction::Negative => "decrease",
    };
    format!(
        "Our AI model predicts a {:.2}% {} with {}% confidence over the next {}.",
        prediction.percent_change.abs(),
        movement,
        confidence_width(prediction.confidence),
        prediction.timeframe
    )
}

/// "The model has a bullish outlook for AAPL over the next 3 months with 85% confidence."
pub fn prediction_outlook(symbol: &str, prediction: &Prediction) -> String {
    let outlook = match classify(prediction.percent_change) {
        Direction::Positive => "bullish",
        Direction::Negative => "bearish",
    };
    format!(
        "The model has a {} outlook for {} over the next {} with {}% confidence.",
        outlook,
        symbol,
        prediction.timeframe,
        confidence_width(prediction.confidence)
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    pub current_price: String,
    pub predicted_price: String,
    pub delta: DeltaView,
    pub confidence: u8,
    pub confidence_split: ConfidenceSplit,
    pub timeframe: String,
    pub recommendation: Recommendation,
    pub recommendation_band: &'static str,
    pub summary: String,
    pub outlook: String,
    pub factors: Vec<FactorView>,
    pub weight_total: i32,
}

pub fn prediction_view(symbol: &str, prediction: &Prediction) -> PredictionView {
    let change = prediction.predicted_price - prediction.current_price;
    PredictionView {
        current_price: format_price(prediction.current_price),
        predicted_price: format_price(prediction.predicted_price),
        delta: delta_view(change, prediction.percent_change),
        confidence: confidence_width(prediction.confidence),
        confidence_split: confidence_split(prediction.confidence),
        timeframe: prediction.timeframe.clone(),
        recommendation: prediction.recommendation,
        recommendation_band: recommendation_band(prediction.recommendation),
        summary: prediction_summary(prediction),
        outlook: prediction_outlook(symbol, prediction),
        factors: prediction.factors.iter().map(factor_view).collect(),
        weight_total: factor_weight_total(&prediction.factors),
    }
}

/// Row of the "Top AI Predictions" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRow {
    pub symbol: String,
    pub name: String,
    pub current_price: String,
    pub predicted_price: String,
    pub delta: DeltaView,
    pub confidence: u8,
    pub recommendation: Recommendation,
    pub recommendation_band: &'static str,
    pub tooltip_open: bool,
}

pub fn highlight_row(item: &PredictionHighlight, tooltip_open: bool) -> HighlightRow {
    HighlightRow {
        symbol: item.symbol.clone(),
        name: item.name.clone(),
        current_price: format_price(item.current_price),
        predicted_price: format_price(item.predicted_price),
        delta: delta_view(item.change, item.percent_change),
        confidence: confidence_width(item.confidence),
        recommendation: item.recommendation,
        recommendation_band: recommendation_band(item.recommendation),
        tooltip_open,
    }
}

// ── News ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRow {
    pub id: u64,
    pub title: String,
    pub source: String,
    pub url: String,
    pub time_ago: String,
    pub published: String,
    pub sentiment: Sentiment,
    pub sentiment_label: &'static str,
    pub sentiment_class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

pub fn news_row(item: &NewsItem, now: NaiveDateTime) -> NewsRow {
    NewsRow {
        id: item.id,
        title: item.title.clone(),
        source: item.source.clone(),
        url: item.url.clone(),
        time_ago: format_time_ago(&item.timestamp, now),
        published: format_timestamp(&item.timestamp),
        sentiment: item.sentiment,
        sentiment_label: sentiment_label(item.sentiment),
        sentiment_class: sentiment_dot(item.sentiment),
        summary: item.summary.clone(),
    }
}

/// Dividend yield for the financials table.
pub fn dividend_text(dividend: f64) -> String {
    format_percent(dividend)
}

/// Low to high of a series, e.g. the day's range from the `1d` series.
pub fn series_range_text(series: &Series) -> String {
    match series.range() {
        Some((low, high)) => format_price_range(low, high),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::format::parse_timestamp;

    fn prediction(percent_change: f64, confidence: i32) -> Prediction {
        Prediction {
            current_price: 243.56,
            predicted_price: 243.56 * (1.0 + percent_change / 100.0),
            percent_change,
            confidence,
            timeframe: "3 months".to_string(),
            recommendation: Recommendation::Buy,
            factors: vec![
                PredictionFactor {
                    name: "Technical Analysis".into(),
                    impact: Impact::Positive,
                    weight: 35,
                    description: "Bullish patterns on multiple timeframes".into(),
                },
                PredictionFactor {
                    name: "Sector Performance".into(),
                    impact: Impact::Neutral,
                    weight: 140,
                    description: "Technology sector showing mixed signals".into(),
                },
            ],
        }
    }

    #[test]
    fn test_classify_boundary() {
        assert_eq!(classify(0.0), Direction::Positive);
        assert_eq!(classify(-0.0), Direction::Positive);
        assert_eq!(classify(0.0001), Direction::Positive);
        assert_eq!(classify(-0.0001), Direction::Negative);
        assert_eq!(classify(f64::NAN), Direction::Negative);
    }

    #[test]
    fn test_classify_sweep() {
        for i in -100..=100 {
            let d = i as f64 * 0.37;
            assert_eq!(classify(d) == Direction::Positive, d >= 0.0);
        }
    }

    #[test]
    fn test_delta_icon_and_color_agree() {
        let up = delta_view(3.21, 1.34);
        assert_eq!((up.icon, up.color_class), ("arrow-up", "text-green-600"));
        assert_eq!(up.text, "+3.21 (+1.34%)");

        let flat = delta_view(0.0, 0.0);
        assert_eq!(flat.direction, Direction::Positive);
        assert_eq!(flat.text, "+0.00 (+0.00%)");

        let down = delta_view(-8.21, -16.15);
        assert_eq!((down.icon, down.color_class), ("arrow-down", "text-red-600"));
    }

    #[test]
    fn test_confidence_width_clamps() {
        assert_eq!(confidence_width(85), 85);
        assert_eq!(confidence_width(-5), 0);
        assert_eq!(confidence_width(140), 100);
        assert_eq!(confidence_split(85), ConfidenceSplit { confidence: 85, uncertainty: 15 });
        assert_eq!(confidence_split(300).uncertainty, 0);
    }

    #[test]
    fn test_analyst_distribution() {
        let d = analyst_distribution(&AnalystRatings { buy: 24, hold: 8, sell: 2 });
        assert_eq!(d.total, 34);
        assert!((d.buy_pct - 70.588).abs() < 0.01);
        assert!((d.buy_pct + d.hold_pct + d.sell_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyst_distribution_saturated_counts() {
        let d = analyst_distribution(&AnalystRatings {
            buy: u32::MAX,
            hold: 1,
            sell: 0,
        });
        assert_eq!(d.total, u64::from(u32::MAX) + 1);
        assert!(d.buy_pct > 99.99 && d.buy_pct <= 100.0);
        assert!(d.hold_pct > 0.0);
        assert_eq!(d.sell_pct, 0.0);

        let all = AnalystRatings {
            buy: u32::MAX,
            hold: u32::MAX,
            sell: u32::MAX,
        };
        let d = analyst_distribution(&all);
        assert!((d.buy_pct - 100.0 / 3.0).abs() < 1e-9);
        assert!((d.buy_pct + d.hold_pct + d.sell_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_range_text() {
        let day = Series::new(
            vec!["9:30".into(), "12:00".into(), "16:00".into()],
            vec![240.35, 243.95, 243.56],
        )
        .unwrap();
        assert_eq!(series_range_text(&day), "$240.35 - $243.95");

        let empty = Series::new(vec![], vec![]).unwrap();
        assert_eq!(series_range_text(&empty), "N/A");
    }

    #[test]
    fn test_analyst_distribution_zero_total() {
        let d = analyst_distribution(&AnalystRatings::default());
        assert_eq!(d.total, 0);
        for pct in [d.buy_pct, d.hold_pct, d.sell_pct] {
            assert!(!pct.is_nan());
            assert_eq!(pct, 0.0);
        }
    }

    #[test]
    fn test_recommendation_band_is_not_derived_from_confidence() {
        let mut p = prediction(12.91, 10);
        p.recommendation = Recommendation::Sell;
        let view = prediction_view("AAPL", &p);
        assert_eq!(view.recommendation, Recommendation::Sell);
        assert_eq!(view.recommendation_band, "bg-red-100 text-red-800");
    }

    #[test]
    fn test_prediction_summary_text() {
        let p = prediction(12.91, 85);
        assert_eq!(
            prediction_summary(&p),
            "Our AI model predicts a 12.91% increase with 85% confidence over the next 3 months."
        );
        let p = prediction(-4.5, 60);
        assert!(prediction_summary(&p).contains("4.50% decrease"));
        assert!(prediction_outlook("TSLA", &p).starts_with("The model has a bearish outlook for TSLA"));
    }

    #[test]
    fn test_factor_weights_are_display_only() {
        let view = prediction_view("AAPL", &prediction(12.91, 85));
        assert_eq!(view.weight_total, 175);
        assert_eq!(view.factors[0].width_pct, 35);
        assert_eq!(view.factors[1].width_pct, 100);
        assert_eq!(view.factors[1].impact_band, "bg-gray-100 text-gray-800");
    }

    #[test]
    fn test_news_row() {
        let item = NewsItem {
            id: 4,
            title: "Energy Stocks Under Pressure as Oil Prices Fall".into(),
            source: "CNBC".into(),
            timestamp: "2025-03-12 01:15:33".into(),
            url: "#".into(),
            sentiment: Sentiment::Negative,
            summary: None,
        };
        let now = parse_timestamp("2025-03-12 05:45:36").unwrap();
        let row = news_row(&item, now);
        assert_eq!(row.time_ago, "4 hr ago");
        assert_eq!(row.sentiment_label, "Negative");
        assert_eq!(row.sentiment_class, "bg-red-500");
        assert_eq!(row.published, "3/12/2025, 1:15:33 AM");
    }

    #[test]
    fn test_quote_and_index_rows() {
        let q = Quote {
            symbol: "GOOGL".into(),
            name: "Alphabet Inc.".into(),
            price: 187.32,
            change: -1.23,
            percent_change: -0.65,
        };
        let row = quote_row(&q);
        assert_eq!(row.price, "$187.32");
        assert_eq!(row.delta.text, "-1.23 (-0.65%)");

        let idx = index_row(&MarketIndex {
            name: "Nasdaq".into(),
            value: 18732.91,
            change: -24.53,
            percent_change: -0.13,
        });
        assert_eq!(idx.value, "18732.91");
        assert_eq!(idx.delta.direction, Direction::Negative);
    }
}
