//! Deterministic stand-in for a market data backend.
//!
//! Known symbols use fixed reference prices. Anything else gets a price
//! seeded from the symbol, so the same symbol always renders the same page.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::provider::MarketDataProvider;
use crate::engine::catalog::{filter_entries, SymbolCatalog};
use crate::errors::AppError;
use crate::models::market::{BestPerformer, MarketIndex, MarketSnapshot};
use crate::models::news::{NewsItem, Sentiment};
use crate::models::prediction::{
    AnalystRatings, Impact, Prediction, PredictionFactor, PredictionHighlight, PriceTarget,
    Recommendation,
};
use crate::models::quote::{Quote, SymbolEntry};
use crate::models::series::{HistoricalSeries, Timeframe};
use crate::models::stock::Stock;

/// Reference price the series templates were recorded at.
const TEMPLATE_PRICE: f64 = 243.56;

const BASE_PRICES: [(&str, f64); 7] = [
    ("AAPL", 243.56),
    ("MSFT", 415.67),
    ("GOOGL", 187.32),
    ("AMZN", 192.45),
    ("META", 532.78),
    ("TSLA", 267.89),
    ("NVDA", 1245.67),
];

const PREDICTION_HORIZON: &str = "3 months";

/// In-memory provider with simulated latency.
#[derive(Debug, Clone)]
pub struct MockProvider {
    catalog: SymbolCatalog,
    latency: Duration,
    latency_overrides: HashMap<String, Duration>,
    unavailable: HashSet<String>,
}

impl MockProvider {
    pub fn new(latency: Duration) -> Self {
        MockProvider {
            catalog: SymbolCatalog::default(),
            latency,
            latency_overrides: HashMap::new(),
            unavailable: HashSet::new(),
        }
    }

    /// Answer requests for `symbol` after `latency` instead of the default.
    pub fn with_symbol_latency(mut self, symbol: &str, latency: Duration) -> Self {
        self.latency_overrides.insert(symbol.to_string(), latency);
        self
    }

    /// Make every request for `symbol` fail with `DataUnavailable`.
    pub fn with_unavailable(mut self, symbol: &str) -> Self {
        self.unavailable.insert(symbol.to_string());
        self
    }

    fn latency_for(&self, symbol: &str) -> Duration {
        self.latency_overrides
            .get(symbol)
            .copied()
            .unwrap_or(self.latency)
    }
}

impl MarketDataProvider for MockProvider {
    async fn fetch_market_summary(&self) -> Result<MarketSnapshot, AppError> {
        tokio::time::sleep(self.latency).await;
        Ok(sample_market_snapshot())
    }

    async fn fetch_stock(&self, symbol: &str) -> Result<Stock, AppError> {
        tokio::time::sleep(self.latency_for(symbol)).await;

        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::DataUnavailable("empty symbol".to_string()));
        }
        if self.unavailable.contains(symbol) {
            warn!("Mock provider refusing {}", symbol);
            return Err(AppError::DataUnavailable(format!(
                "no data for {}",
                symbol
            )));
        }

        let name = self
            .catalog
            .lookup(symbol)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("{} Corp", symbol));
        debug!("Mock provider serving {} ({})", symbol, name);
        build_stock(symbol, &name)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolEntry>, AppError> {
        tokio::time::sleep(self.latency).await;
        Ok(filter_entries(self.catalog.entries(), query))
    }
}

/// Stock page for `symbol` with the catalog name, or `"{symbol} Corp"`.
pub fn sample_stock(symbol: &str) -> Result<Stock, AppError> {
    let name = SymbolCatalog::default()
        .lookup(symbol)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| format!("{} Corp", symbol));
    build_stock(symbol, &name)
}

fn symbol_seed(symbol: &str) -> u64 {
    symbol.bytes().map(u64::from).sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn build_stock(symbol: &str, name: &str) -> Result<Stock, AppError> {
    if symbol == "AAPL" {
        return reference_stock(name);
    }

    let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
    let price = BASE_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, p)| *p)
        .unwrap_or_else(|| round2(rng.gen_range(50..500) as f64 + rng.gen::<f64>()));

    let day_pct: f64 = rng.gen_range(-3.0..3.0);
    let previous_close = round2(price / (1.0 + day_pct / 100.0));
    let quote = Quote::from_previous_close(symbol, name, price, previous_close);

    let pe = round2(rng.gen_range(10..40) as f64 + rng.gen::<f64>());
    let scale = price / TEMPLATE_PRICE;

    Ok(Stock {
        market_cap: round2(2.78 * scale),
        volume: round2(rng.gen_range(1.0..100.0)),
        avg_volume: round2(rng.gen_range(1.0..100.0)),
        pe,
        eps: round2(price / pe),
        dividend: round2(rng.gen_range(0.0..3.0)),
        high_52w: round2(price * (1.0 + rng.gen_range(0.0..0.3))),
        low_52w: round2(price * (1.0 - rng.gen_range(0.0..0.3))),
        open: previous_close,
        previous_close,
        analyst: AnalystRatings {
            buy: rng.gen_range(5..30),
            hold: rng.gen_range(1..15),
            sell: rng.gen_range(0..5),
        },
        prediction: seeded_prediction(&mut rng, price),
        historical: scaled_history(scale)?,
        news: stock_news(symbol),
        quote,
    })
}

/// Badge for a predicted move: above +5% is BUY, down 5% or more is SELL.
fn recommendation_for(percent_change: f64) -> Recommendation {
    if percent_change > 5.0 {
        Recommendation::Buy
    } else if percent_change > -5.0 {
        Recommendation::Hold
    } else {
        Recommendation::Sell
    }
}

fn seeded_prediction(rng: &mut StdRng, price: f64) -> Prediction {
    let percent_change = round2(rng.gen_range(-12.0..16.0));
    let recommendation = recommendation_for(percent_change);
    let upside = percent_change >= 0.0;

    let technical = rng.gen_range(25..40);
    let fundamental = rng.gen_range(20..35);
    let sentiment = rng.gen_range(15..25);
    let sector = 100 - technical - fundamental - sentiment;

    let lean = if upside { Impact::Positive } else { Impact::Negative };
    let factors = vec![
        PredictionFactor {
            name: "Technical Analysis".to_string(),
            impact: lean,
            weight: technical,
            description: if upside {
                "Bullish patterns on multiple timeframes"
            } else {
                "Bearish patterns indicating downward momentum"
            }
            .to_string(),
        },
        PredictionFactor {
            name: "Fundamental Analysis".to_string(),
            impact: lean,
            weight: fundamental,
            description: if upside {
                "Strong earnings growth and healthy balance sheet"
            } else {
                "Declining revenue growth and margin pressure"
            }
            .to_string(),
        },
        PredictionFactor {
            name: "Market Sentiment".to_string(),
            impact: lean,
            weight: sentiment,
            description: if upside {
                "Positive news and social media sentiment"
            } else {
                "Negative news cycle and bearish social indicators"
            }
            .to_string(),
        },
        PredictionFactor {
            name: "Sector Performance".to_string(),
            impact: Impact::Neutral,
            weight: sector,
            description: "Sector showing mixed signals".to_string(),
        },
    ];

    Prediction {
        current_price: price,
        predicted_price: round2(price * (1.0 + percent_change / 100.0)),
        percent_change,
        confidence: rng.gen_range(60..95),
        timeframe: PREDICTION_HORIZON.to_string(),
        recommendation,
        factors,
    }
}

fn reference_stock(name: &str) -> Result<Stock, AppError> {
    Ok(Stock {
        quote: Quote {
            symbol: "AAPL".to_string(),
            name: name.to_string(),
            price: 243.56,
            change: 3.21,
            percent_change: 1.34,
        },
        market_cap: 2.78,
        volume: 45.3,
        avg_volume: 42.1,
        pe: 28.5,
        eps: 8.54,
        dividend: 0.92,
        high_52w: 256.78,
        low_52w: 179.45,
        open: 240.35,
        previous_close: 240.35,
        analyst: AnalystRatings {
            buy: 24,
            hold: 8,
            sell: 2,
        },
        prediction: Prediction {
            current_price: 243.56,
            predicted_price: 275.00,
            percent_change: 12.91,
            confidence: 85,
            timeframe: PREDICTION_HORIZON.to_string(),
            recommendation: Recommendation::Buy,
            factors: vec![
                factor("Technical Analysis", Impact::Positive, 35, "Bullish patterns on multiple timeframes"),
                factor("Fundamental Analysis", Impact::Positive, 30, "Strong earnings growth and healthy balance sheet"),
                factor("Market Sentiment", Impact::Positive, 20, "Positive news and social media sentiment"),
                factor("Sector Performance", Impact::Neutral, 15, "Technology sector showing mixed signals"),
            ],
        },
        historical: scaled_history(1.0)?,
        news: stock_news("AAPL"),
    })
}

fn factor(name: &str, impact: Impact, weight: i32, description: &str) -> PredictionFactor {
    PredictionFactor {
        name: name.to_string(),
        impact,
        weight,
        description: description.to_string(),
    }
}

fn series_template(timeframe: Timeframe) -> (&'static [&'static str], &'static [f64]) {
    match timeframe {
        Timeframe::OneDay => (
            &[
                "9:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30",
                "14:00", "14:30", "15:00", "15:30", "16:00",
            ],
            &[
                240.35, 241.20, 241.75, 242.10, 241.85, 242.30, 242.65, 243.10, 243.25, 243.70,
                243.35, 243.80, 243.95, 243.56,
            ],
        ),
        Timeframe::OneWeek => (
            &["Wed", "Thu", "Fri", "Mon", "Tue", "Wed"],
            &[238.45, 239.78, 241.22, 240.56, 242.33, 243.56],
        ),
        Timeframe::OneMonth => (
            &["Week 1", "Week 2", "Week 3", "Week 4"],
            &[230.45, 235.67, 238.92, 243.56],
        ),
        Timeframe::ThreeMonths => (&["Jan", "Feb", "Mar"], &[220.34, 234.56, 243.56]),
        Timeframe::OneYear => (
            &[
                "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar",
            ],
            &[
                205.67, 215.43, 208.95, 210.33, 220.56, 225.78, 219.43, 228.95, 235.67, 225.43,
                234.78, 243.56,
            ],
        ),
        Timeframe::All => (
            &["2020", "2021", "2022", "2023", "2024", "2025"],
            &[140.56, 175.23, 162.45, 190.78, 215.34, 243.56],
        ),
    }
}

/// Reference series scaled so the last point sits at `TEMPLATE_PRICE * scale`.
fn scaled_history(scale: f64) -> Result<HistoricalSeries, AppError> {
    let parts = Timeframe::ALL.into_iter().map(|tf| {
        let (labels, values) = series_template(tf);
        (
            tf,
            labels.iter().map(|l| l.to_string()).collect(),
            values.iter().map(|v| round2(v * scale)).collect(),
        )
    });
    HistoricalSeries::from_parts(parts)
}

fn stock_news(symbol: &str) -> Vec<NewsItem> {
    vec![
        NewsItem {
            id: 1,
            title: format!("{} Announces New Product Line at Annual Conference", symbol),
            source: "TechCrunch".to_string(),
            timestamp: "2025-03-12 03:15:22".to_string(),
            url: "#".to_string(),
            sentiment: Sentiment::Positive,
            summary: Some("The company revealed its latest innovations to industry analysts and customers at its flagship event.".to_string()),
        },
        NewsItem {
            id: 2,
            title: format!("{} Reports Better Than Expected Quarterly Earnings", symbol),
            source: "Bloomberg".to_string(),
            timestamp: "2025-03-11 14:45:11".to_string(),
            url: "#".to_string(),
            sentiment: Sentiment::Positive,
            summary: Some("Revenue and profit exceeded analyst expectations, driven by strong growth in services and international markets.".to_string()),
        },
        NewsItem {
            id: 3,
            title: format!("{} Faces Regulatory Scrutiny in European Markets", symbol),
            source: "Reuters".to_string(),
            timestamp: "2025-03-10 09:30:45".to_string(),
            url: "#".to_string(),
            sentiment: Sentiment::Negative,
            summary: Some("EU regulators announce investigation into potential antitrust practices, but impact remains uncertain.".to_string()),
        },
    ]
}

fn quote(symbol: &str, name: &str, price: f64, change: f64, percent_change: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price,
        change,
        percent_change,
    }
}

fn index(name: &str, value: f64, change: f64, percent_change: f64) -> MarketIndex {
    MarketIndex {
        name: name.to_string(),
        value,
        change,
        percent_change,
    }
}

#[allow(clippy::too_many_arguments)]
fn highlight(
    symbol: &str,
    name: &str,
    current_price: f64,
    predicted_price: f64,
    change: f64,
    percent_change: f64,
    confidence: i32,
    recommendation: Recommendation,
) -> PredictionHighlight {
    PredictionHighlight {
        symbol: symbol.to_string(),
        name: name.to_string(),
        current_price,
        predicted_price,
        change,
        percent_change,
        confidence,
        recommendation,
    }
}

fn headline(id: u64, title: &str, source: &str, timestamp: &str, sentiment: Sentiment) -> NewsItem {
    NewsItem {
        id,
        title: title.to_string(),
        source: source.to_string(),
        timestamp: timestamp.to_string(),
        url: "#".to_string(),
        sentiment,
        summary: None,
    }
}

/// The dashboard payload.
pub fn sample_market_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        indices: vec![
            index("S&P 500", 5923.47, 47.88, 0.81),
            index("Dow Jones", 40654.32, 315.56, 0.78),
            index("Nasdaq", 18732.91, -24.53, -0.13),
            index("Russell 2000", 2354.76, 12.34, 0.53),
        ],
        timestamp: "2025-03-12 05:45:36".to_string(),
        top_gainers: vec![
            quote("XYZ", "XYZ Corp", 134.21, 12.45, 10.23),
            quote("ABC", "ABC Inc", 56.78, 4.32, 8.24),
            quote("DEF", "DEF Holdings", 89.45, 5.67, 6.77),
        ],
        top_losers: vec![
            quote("MNO", "MNO Industries", 42.63, -8.21, -16.15),
            quote("PQR", "PQR Tech", 105.32, -12.45, -10.57),
            quote("STU", "STU Systems", 27.89, -2.34, -7.74),
        ],
        most_watched: vec![
            quote("AAPL", "Apple Inc.", 243.56, 3.21, 1.34),
            quote("MSFT", "Microsoft Corp.", 415.67, 5.67, 1.38),
            quote("GOOGL", "Alphabet Inc.", 187.32, -1.23, -0.65),
            quote("AMZN", "Amazon.com Inc.", 192.45, 2.34, 1.23),
            quote("TSLA", "Tesla Inc.", 267.89, -3.45, -1.27),
        ],
        best_performing: BestPerformer {
            quote: quote("NVDA", "NVIDIA Corporation", 1245.67, 75.34, 6.43),
            prediction: Some(PriceTarget {
                target: 1350.0,
                confidence: 87,
                timeframe: PREDICTION_HORIZON.to_string(),
            }),
        },
        top_predictions: vec![
            highlight("AAPL", "Apple Inc.", 243.56, 275.00, 31.44, 12.91, 85, Recommendation::Buy),
            highlight("META", "Meta Platforms Inc.", 532.78, 595.50, 62.72, 11.77, 79, Recommendation::Buy),
            highlight("AMD", "Advanced Micro Devices, Inc.", 187.34, 208.10, 20.76, 11.08, 76, Recommendation::Buy),
        ],
        recent_news: vec![
            headline(1, "Federal Reserve Signals Potential Rate Cuts in Coming Months", "Financial Times", "2025-03-12 04:15:22", Sentiment::Positive),
            headline(2, "Tech Sector Surges as AI Advancements Continue to Drive Growth", "Bloomberg", "2025-03-12 03:45:11", Sentiment::Positive),
            headline(3, "Global Supply Chain Issues Easing According to New Report", "Reuters", "2025-03-12 02:30:45", Sentiment::Positive),
            headline(4, "Energy Stocks Under Pressure as Oil Prices Fall", "CNBC", "2025-03-12 01:15:33", Sentiment::Negative),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stock_is_deterministic() {
        assert_eq!(sample_stock("ZZZ").unwrap(), sample_stock("ZZZ").unwrap());
        assert_eq!(sample_stock("ZZZ").unwrap().quote.name, "ZZZ Corp");
    }

    #[test]
    fn test_known_symbol_keeps_base_price() {
        let stock = sample_stock("MSFT").unwrap();
        assert_eq!(stock.quote.price, 415.67);
        assert_eq!(stock.quote.name, "Microsoft Corporation");
        let last = stock.historical.get(Timeframe::OneDay).last().unwrap();
        assert!((last - 415.67).abs() < 0.01);
    }

    #[test]
    fn test_seeded_weights_sum_to_100() {
        for symbol in ["MSFT", "ZZZ", "IBM"] {
            let stock = sample_stock(symbol).unwrap();
            let total: i32 = stock.prediction.factors.iter().map(|f| f.weight).sum();
            assert_eq!(total, 100, "{}", symbol);
        }
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(recommendation_for(5.01), Recommendation::Buy);
        assert_eq!(recommendation_for(5.0), Recommendation::Hold);
        assert_eq!(recommendation_for(-4.99), Recommendation::Hold);
        assert_eq!(recommendation_for(-5.0), Recommendation::Sell);
        assert_eq!(recommendation_for(-11.5), Recommendation::Sell);
    }

    #[test]
    fn test_seeded_symbols_cover_every_recommendation() {
        let mut seen = HashSet::new();
        for first in b'A'..=b'Z' {
            for rest in ["AA", "MM", "ZZ"] {
                let symbol = format!("{}{}", first as char, rest);
                let stock = sample_stock(&symbol).unwrap();
                let p = &stock.prediction;
                assert_eq!(p.recommendation, recommendation_for(p.percent_change));
                seen.insert(p.recommendation);
            }
        }
        assert!(seen.contains(&Recommendation::Buy));
        assert!(seen.contains(&Recommendation::Hold));
        assert!(seen.contains(&Recommendation::Sell));
    }

    #[test]
    fn test_quote_consistent_with_previous_close() {
        let stock = sample_stock("IBM").unwrap();
        let expected = stock.quote.price - stock.previous_close;
        assert!((stock.quote.change - expected).abs() < 1e-9);
        assert!(stock.quote.price >= 50.0 && stock.quote.price < 501.0);
    }

    #[test]
    fn test_stock_json_roundtrip_shape() {
        let json = serde_json::to_value(sample_stock("AAPL").unwrap()).unwrap();
        assert_eq!(json["percentChange"], 1.34);
        assert_eq!(json["historicalData"]["1y"]["labels"].as_array().unwrap().len(), 12);
        let back: Stock = serde_json::from_value(json).unwrap();
        assert_eq!(back.prediction.recommendation, Recommendation::Buy);
    }

    #[tokio::test]
    async fn test_unavailable_symbol() {
        let provider = MockProvider::new(Duration::ZERO).with_unavailable("FAIL");
        let err = provider.fetch_stock("FAIL").await.unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
        assert!(provider.fetch_stock("AAPL").await.is_ok());
    }

    #[tokio::test]
    async fn test_remote_search_filters_catalog() {
        let provider = MockProvider::new(Duration::ZERO);
        let hits = provider.search_symbols("nv").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "NVDA");
        assert!(provider.search_symbols(" ").await.unwrap().is_empty());
    }
}
