use std::future::Future;
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::data::provider::MarketDataProvider;
use crate::engine::catalog::{NavigationTarget, PointerDown, SearchAction, SearchEffect, SearchView};
use crate::engine::loader::{LoadOutcome, LoadState};
use crate::engine::pages::{DashboardDetail, StockPageView};
use crate::engine::tabs::StockTab;
use crate::errors::AppError;
use crate::models::series::Timeframe;
use crate::AppState;

/// Run a provider call under the configured load timeout.
async fn with_timeout<T, F>(timeout_ms: u64, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(Duration::from_millis(timeout_ms), call).await?
}

// ── Page loads ──

/// Load the market snapshot into the dashboard.
pub async fn load_dashboard<P: MarketDataProvider>(state: &AppState<P>) -> LoadOutcome {
    let ticket = state.dashboard.lock().await.begin();
    info!("Loading dashboard (ticket {})", ticket.id());

    // The page lock is not held across the provider call.
    let result = with_timeout(
        state.config.load_timeout_ms,
        state.provider.fetch_market_summary(),
    )
    .await;
    if let Err(e) = &result {
        warn!("Dashboard load failed: {}", e);
    }

    state.dashboard.lock().await.finish(&ticket, result)
}

/// Mount the stock page for `symbol` and load it. A later call wins over an
/// earlier one still in flight.
pub async fn open_stock<P: MarketDataProvider>(state: &AppState<P>, symbol: &str) -> LoadOutcome {
    let ticket = state.stock.lock().await.navigate(symbol);
    info!("Opening stock {} (ticket {})", symbol, ticket.id());

    let result = with_timeout(state.config.load_timeout_ms, state.provider.fetch_stock(symbol)).await;
    if let Err(e) = &result {
        warn!("Stock load failed for {}: {}", symbol, e);
    }

    let outcome = state.stock.lock().await.finish(&ticket, result);
    if outcome == LoadOutcome::Superseded {
        debug!("Load for {} superseded by a later navigation", symbol);
    }
    outcome
}

// ── Search ──

/// Apply a keystroke. In remote mode this waits for the provider, and only the
/// latest keystroke's results are kept.
pub async fn search_input<P: MarketDataProvider>(state: &AppState<P>, query: &str) -> SearchView {
    let effect = state
        .search
        .lock()
        .await
        .apply(SearchAction::Input(query.to_string()));

    if let SearchEffect::Fetch(ticket) = effect {
        debug!("Remote search for '{}' (ticket {})", ticket.key(), ticket.id());
        let result = with_timeout(
            state.config.load_timeout_ms,
            state.provider.search_symbols(ticket.key()),
        )
        .await;
        state.search.lock().await.finish_remote(&ticket, result);
    }

    state.search.lock().await.view()
}

/// Pick a result. Clears the box and returns where to go.
pub async fn select_symbol<P: MarketDataProvider>(
    state: &AppState<P>,
    symbol: &str,
) -> Option<NavigationTarget> {
    let effect = state
        .search
        .lock()
        .await
        .apply(SearchAction::Select(symbol.to_string()));
    navigation(effect)
}

/// Enter in the search box. `None` when the query is blank.
pub async fn submit_search<P: MarketDataProvider>(state: &AppState<P>) -> Option<NavigationTarget> {
    let effect = state.search.lock().await.apply(SearchAction::Submit);
    navigation(effect)
}

fn navigation(effect: SearchEffect) -> Option<NavigationTarget> {
    match effect {
        SearchEffect::Navigate(target) => {
            info!("Navigating to {}", target.route());
            Some(target)
        }
        _ => None,
    }
}

/// Follow a navigation target. Stock targets mount and load the stock page.
pub async fn navigate<P: MarketDataProvider>(
    state: &AppState<P>,
    target: &NavigationTarget,
) -> Option<LoadOutcome> {
    match target {
        NavigationTarget::Stock { symbol } => Some(open_stock(state, symbol).await),
        NavigationTarget::SearchResults { query } => {
            debug!("No results page for '{}'", query);
            None
        }
    }
}

/// A pointer press anywhere in the window.
pub async fn pointer_down<P: MarketDataProvider>(state: &AppState<P>, inside_search: bool) {
    state.pointer.emit(&PointerDown { inside_search });
    if !inside_search {
        // Release the outside-press subscription now that the list is hidden.
        state.search.lock().await.apply(SearchAction::Dismiss);
    }
}

// ── Page controls ──

pub async fn set_tab<P: MarketDataProvider>(state: &AppState<P>, tab: StockTab) {
    state.stock.lock().await.set_tab(tab);
}

/// Switch the chart window by key (`1d`, `1w`, `1m`, `3m`, `1y`, `all`).
pub async fn set_timeframe<P: MarketDataProvider>(
    state: &AppState<P>,
    key: &str,
) -> Result<Timeframe, AppError> {
    let timeframe = state.stock.lock().await.set_timeframe(key)?;
    debug!("Timeframe set to {}", timeframe);
    Ok(timeframe)
}

pub async fn toggle_tooltip<P: MarketDataProvider>(state: &AppState<P>, index: usize) {
    state.dashboard.lock().await.toggle_tooltip(index);
}

// ── Views ──

pub async fn stock_view<P: MarketDataProvider>(
    state: &AppState<P>,
    now: NaiveDateTime,
) -> StockPageView {
    state.stock.lock().await.view(now)
}

pub async fn dashboard_view<P: MarketDataProvider>(
    state: &AppState<P>,
    now: NaiveDateTime,
) -> LoadState<DashboardDetail> {
    state.dashboard.lock().await.view(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mock::MockProvider;
    use crate::models::config::{DashboardConfig, SearchMode};
    use crate::utils::format::parse_timestamp;

    fn now() -> NaiveDateTime {
        parse_timestamp("2025-03-12 06:00:00").unwrap()
    }

    fn app(provider: MockProvider, config: DashboardConfig) -> AppState<MockProvider> {
        AppState::new(provider, config)
    }

    fn instant() -> MockProvider {
        MockProvider::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_load_dashboard() {
        let state = app(instant(), DashboardConfig::default());
        assert_eq!(load_dashboard(&state).await, LoadOutcome::Applied);

        let LoadState::Ready(detail) = dashboard_view(&state, now()).await else {
            panic!("dashboard not ready");
        };
        assert_eq!(detail.indices.len(), 4);
        assert_eq!(detail.top_gainers[0].symbol, "XYZ");
        assert_eq!(detail.top_losers[0].delta.color_class, "text-red-600");
    }

    #[tokio::test]
    async fn test_slow_earlier_load_never_overwrites_later() {
        let provider = MockProvider::new(Duration::from_millis(5))
            .with_symbol_latency("AAPL", Duration::from_millis(200));
        let state = app(provider, DashboardConfig::default());

        let (slow, fast) = tokio::join!(open_stock(&state, "AAPL"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            open_stock(&state, "MSFT").await
        });

        assert_eq!(fast, LoadOutcome::Applied);
        assert_eq!(slow, LoadOutcome::Superseded);
        let view = stock_view(&state, now()).await;
        assert_eq!(view.symbol.as_deref(), Some("MSFT"));
        let LoadState::Ready(detail) = view.content else {
            panic!("stock not ready");
        };
        assert_eq!(detail.header.symbol, "MSFT");
    }

    #[tokio::test]
    async fn test_timeout_becomes_unavailable() {
        let provider = instant().with_symbol_latency("SLOW", Duration::from_millis(500));
        let config = DashboardConfig {
            load_timeout_ms: 20,
            ..DashboardConfig::default()
        };
        let state = app(provider, config);

        assert_eq!(open_stock(&state, "SLOW").await, LoadOutcome::Applied);
        let view = stock_view(&state, now()).await;
        assert!(matches!(
            view.content,
            LoadState::Unavailable(AppError::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_provider_is_not_empty_data() {
        let state = app(instant().with_unavailable("DOWN"), DashboardConfig::default());
        open_stock(&state, "DOWN").await;
        let json = serde_json::to_value(stock_view(&state, now()).await).unwrap();
        assert_eq!(json["content"]["status"], "unavailable");
        assert_eq!(json["content"]["data"]["code"], "DATA_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_search_select_opens_stock() {
        let state = app(instant(), DashboardConfig::default());
        let view = search_input(&state, "ap").await;
        assert_eq!(view.results.len(), 1);
        assert!(view.show_results);

        let target = select_symbol(&state, &view.results[0].symbol).await.unwrap();
        assert_eq!(target.route(), "/stock/AAPL");
        assert_eq!(navigate(&state, &target).await, Some(LoadOutcome::Applied));

        let search = state.search.lock().await.view();
        assert!(search.query.is_empty());
        assert!(search.results.is_empty());
    }

    #[tokio::test]
    async fn test_submit_unknown_query_goes_to_search_results() {
        let state = app(instant(), DashboardConfig::default());
        search_input(&state, "zzzz").await;
        let target = submit_search(&state).await.unwrap();
        assert_eq!(target, NavigationTarget::SearchResults { query: "zzzz".into() });
        assert_eq!(navigate(&state, &target).await, None);
        assert!(submit_search(&state).await.is_none());
    }

    #[tokio::test]
    async fn test_remote_search_mode() {
        let config = DashboardConfig {
            search_mode: SearchMode::Remote,
            search_limit: 2,
            ..DashboardConfig::default()
        };
        let state = app(instant(), config);
        let view = search_input(&state, "inc").await;
        assert!(!view.loading);
        assert_eq!(view.results.len(), 2);
        assert_eq!(view.results[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_outside_press_dismisses_results() {
        let state = app(instant(), DashboardConfig::default());
        search_input(&state, "a").await;
        assert_eq!(state.pointer.listener_count(), 1);

        pointer_down(&state, true).await;
        assert!(state.search.lock().await.view().show_results);

        pointer_down(&state, false).await;
        assert!(!state.search.lock().await.view().show_results);
        assert_eq!(state.pointer.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_tab_and_timeframe_controls() {
        let state = app(instant(), DashboardConfig::default());
        open_stock(&state, "AAPL").await;
        set_tab(&state, StockTab::News).await;
        set_tab(&state, StockTab::Prediction).await;
        assert_eq!(set_timeframe(&state, "1y").await.unwrap(), Timeframe::OneYear);
        assert!(matches!(
            set_timeframe(&state, "10y").await,
            Err(AppError::InvalidTimeframe(_))
        ));

        let view = stock_view(&state, now()).await;
        assert_eq!(view.active_tab, StockTab::Prediction);
        let LoadState::Ready(detail) = view.content else {
            panic!("stock not ready");
        };
        assert_eq!(detail.chart.values.len(), 12);
    }

    #[tokio::test]
    async fn test_toggle_tooltip() {
        let state = app(instant(), DashboardConfig::default());
        load_dashboard(&state).await;
        toggle_tooltip(&state, 0).await;
        toggle_tooltip(&state, 0).await;
        let LoadState::Ready(detail) = dashboard_view(&state, now()).await else {
            panic!("dashboard not ready");
        };
        assert!(detail.top_predictions.iter().all(|r| !r.tooltip_open));
    }
}
