//! Page state: what each page owns between renders, and the view models it renders to.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::display::{
    analyst_distribution, confidence_width, dividend_text, highlight_row, index_row, news_row,
    prediction_view, quote_row, series_range_text, AnalystDistribution, HighlightRow, IndexRow,
    NewsRow, PredictionView, QuoteRow,
};
use crate::engine::loader::{LoadOutcome, LoadState, Loader, Ticket};
use crate::engine::series::{ChartView, TimeframeSelector};
use crate::engine::tabs::{Disclosure, StockTab, TabOption, TabState};
use crate::errors::AppError;
use crate::models::market::MarketSnapshot;
use crate::models::prediction::PriceTarget;
use crate::models::series::Timeframe;
use crate::models::stock::Stock;
use crate::utils::format::{
    format_market_cap, format_price, format_price_range, format_timestamp, format_volume,
};

// ── Stock page ──

/// One labelled cell of the overview or financials grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCell {
    pub label: &'static str,
    pub value: String,
}

fn cell(label: &'static str, value: String) -> StatCell {
    StatCell { label, value }
}

/// Everything the stock page renders once its data is ready.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub header: QuoteRow,
    pub chart: ChartView,
    pub stats: Vec<StatCell>,
    pub financials: Vec<StatCell>,
    pub analyst: AnalystDistribution,
    pub prediction: PredictionView,
    pub news: Vec<NewsRow>,
}

impl StockDetail {
    pub fn build(stock: &Stock, timeframe: &TimeframeSelector, now: NaiveDateTime) -> Self {
        let stats = vec![
            cell("Market Cap", format_market_cap(stock.market_cap)),
            cell("Volume", format_volume(stock.volume)),
            cell("Avg Volume", format_volume(stock.avg_volume)),
            cell("P/E Ratio", format!("{:.2}", stock.pe)),
            cell("EPS", format_price(stock.eps)),
            cell("Dividend Yield", dividend_text(stock.dividend)),
            cell("52W High", format_price(stock.high_52w)),
            cell("52W Low", format_price(stock.low_52w)),
        ];
        let financials = vec![
            cell("Open", format_price(stock.open)),
            cell("Previous Close", format_price(stock.previous_close)),
            cell("Day's Range", series_range_text(stock.historical.get(Timeframe::OneDay))),
            cell("52 Week Range", format_price_range(stock.low_52w, stock.high_52w)),
            cell("Market Cap", format_market_cap(stock.market_cap)),
            cell("P/E Ratio", format!("{:.2}", stock.pe)),
            cell("EPS", format_price(stock.eps)),
            cell("Dividend Yield", dividend_text(stock.dividend)),
        ];

        StockDetail {
            header: quote_row(&stock.quote),
            chart: timeframe.chart(stock),
            stats,
            financials,
            analyst: analyst_distribution(&stock.analyst),
            prediction: prediction_view(&stock.quote.symbol, &stock.prediction),
            news: stock.news.iter().map(|n| news_row(n, now)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPageView {
    pub symbol: Option<String>,
    pub active_tab: StockTab,
    pub tabs: Vec<TabOption>,
    pub timeframe: Timeframe,
    pub content: LoadState<StockDetail>,
}

/// Stock detail page. A navigation remounts the page: tab and timeframe start
/// over, while the request tracker survives so an older load can't land.
#[derive(Debug)]
pub struct StockPage {
    loader: Loader<String, Stock>,
    timeframe: TimeframeSelector,
    tabs: TabState<StockTab>,
    default_timeframe: Timeframe,
}

impl StockPage {
    pub fn new(default_timeframe: Timeframe) -> Self {
        StockPage {
            loader: Loader::new(),
            timeframe: TimeframeSelector::new(default_timeframe),
            tabs: TabState::new(),
            default_timeframe,
        }
    }

    pub fn navigate(&mut self, symbol: &str) -> Ticket<String> {
        self.tabs = TabState::new();
        self.timeframe.set(self.default_timeframe);
        let ticket = self.loader.begin(symbol.to_string());
        debug!("Stock page loading {} (ticket {})", symbol, ticket.id());
        ticket
    }

    pub fn finish(
        &mut self,
        ticket: &Ticket<String>,
        result: Result<Stock, AppError>,
    ) -> LoadOutcome {
        let outcome = self.loader.finish(ticket, result);
        if outcome == LoadOutcome::Applied {
            info!("Stock page for {} is {}", ticket.key(), status_name(self.loader.state()));
        }
        outcome
    }

    pub fn set_tab(&mut self, tab: StockTab) {
        self.tabs.set_active(tab);
    }

    pub fn set_timeframe(&mut self, key: &str) -> Result<Timeframe, AppError> {
        self.timeframe.set_key(key)
    }

    pub fn symbol(&self) -> Option<&str> {
        self.loader.key().map(String::as_str)
    }

    pub fn state(&self) -> &LoadState<Stock> {
        self.loader.state()
    }

    pub fn active_tab(&self) -> StockTab {
        self.tabs.active()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe.selected()
    }

    pub fn view(&self, now: NaiveDateTime) -> StockPageView {
        StockPageView {
            symbol: self.symbol().map(str::to_string),
            active_tab: self.tabs.active(),
            tabs: self.tabs.options(),
            timeframe: self.timeframe.selected(),
            content: self
                .loader
                .state()
                .map_ready(|stock| StockDetail::build(stock, &self.timeframe, now)),
        }
    }
}

// ── Dashboard ──

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPerformerCard {
    pub quote: QuoteRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_timeframe: Option<String>,
}

fn best_performer_card(quote: QuoteRow, target: Option<&PriceTarget>) -> BestPerformerCard {
    BestPerformerCard {
        quote,
        target: target.map(|t| format_price(t.target)),
        target_confidence: target.map(|t| confidence_width(t.confidence)),
        target_timeframe: target.map(|t| t.timeframe.clone()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDetail {
    pub updated: String,
    pub indices: Vec<IndexRow>,
    pub top_gainers: Vec<QuoteRow>,
    pub top_losers: Vec<QuoteRow>,
    pub most_watched: Vec<QuoteRow>,
    pub best_performing: BestPerformerCard,
    pub top_predictions: Vec<HighlightRow>,
    pub recent_news: Vec<NewsRow>,
}

impl DashboardDetail {
    pub fn build(snapshot: &MarketSnapshot, tooltip: &Disclosure, now: NaiveDateTime) -> Self {
        DashboardDetail {
            updated: format_timestamp(&snapshot.timestamp),
            indices: snapshot.indices.iter().map(index_row).collect(),
            top_gainers: snapshot.top_gainers.iter().map(quote_row).collect(),
            top_losers: snapshot.top_losers.iter().map(quote_row).collect(),
            most_watched: snapshot.most_watched.iter().map(quote_row).collect(),
            best_performing: best_performer_card(
                quote_row(&snapshot.best_performing.quote),
                snapshot.best_performing.prediction.as_ref(),
            ),
            top_predictions: snapshot
                .top_predictions
                .iter()
                .enumerate()
                .map(|(i, item)| highlight_row(item, tooltip.is_open(i)))
                .collect(),
            recent_news: snapshot.recent_news.iter().map(|n| news_row(n, now)).collect(),
        }
    }
}

/// Dashboard page: one snapshot load and the confidence tooltip.
#[derive(Debug, Default)]
pub struct DashboardPage {
    loader: Loader<(), MarketSnapshot>,
    tooltip: Disclosure,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket<()> {
        self.tooltip.close();
        self.loader.begin(())
    }

    pub fn finish(
        &mut self,
        ticket: &Ticket<()>,
        result: Result<MarketSnapshot, AppError>,
    ) -> LoadOutcome {
        let outcome = self.loader.finish(ticket, result);
        if outcome == LoadOutcome::Applied {
            info!("Dashboard is {}", status_name(self.loader.state()));
        }
        outcome
    }

    pub fn toggle_tooltip(&mut self, index: usize) {
        self.tooltip.toggle(index);
    }

    pub fn state(&self) -> &LoadState<MarketSnapshot> {
        self.loader.state()
    }

    pub fn view(&self, now: NaiveDateTime) -> LoadState<DashboardDetail> {
        self.loader
            .state()
            .map_ready(|snapshot| DashboardDetail::build(snapshot, &self.tooltip, now))
    }
}

fn status_name<T>(state: &LoadState<T>) -> &'static str {
    match state {
        LoadState::Idle => "idle",
        LoadState::Loading => "loading",
        LoadState::Ready(_) => "ready",
        LoadState::Unavailable(_) => "unavailable",
    }
}
