pub mod commands;
pub mod data;
pub mod engine;
pub mod errors;
pub mod models;
pub mod utils;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::data::mock::MockProvider;
use crate::data::provider::MarketDataProvider;
use crate::engine::catalog::{PointerDown, SearchBox, SymbolCatalog};
use crate::engine::pages::{DashboardPage, StockPage};
use crate::engine::tabs::StockTab;
use crate::models::config::DashboardConfig;
use crate::utils::events::EventBus;

/// Environment variable naming a JSON config file.
const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

/// Shared application state, accessible from all commands.
pub struct AppState<P> {
    pub provider: P,
    pub config: DashboardConfig,
    pub dashboard: Mutex<DashboardPage>,
    pub stock: Mutex<StockPage>,
    pub search: Mutex<SearchBox>,
    /// Window-level pointer presses. The search box listens while its results are open.
    pub pointer: EventBus<PointerDown>,
}

impl<P: MarketDataProvider> AppState<P> {
    pub fn new(provider: P, config: DashboardConfig) -> Self {
        let pointer = EventBus::new();
        let search = SearchBox::new(
            SymbolCatalog::default(),
            config.search_mode,
            config.search_limit,
            pointer.clone(),
        );
        AppState {
            provider,
            dashboard: Mutex::new(DashboardPage::new()),
            stock: Mutex::new(StockPage::new(config.default_timeframe)),
            search: Mutex::new(search),
            pointer,
            config,
        }
    }
}

fn load_config() -> anyhow::Result<DashboardConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = Path::new(&path);
            DashboardConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        None => Ok(DashboardConfig::default()),
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = load_config()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("Starting stock dashboard ({:?} search)", config.search_mode);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;

    let provider = MockProvider::new(Duration::from_millis(config.simulated_latency_ms));
    let state = AppState::new(provider, config);
    runtime.block_on(walkthrough(&state))
}

/// Dashboard, then a search for "ap", then the AI prediction tab of the pick.
async fn walkthrough(state: &AppState<MockProvider>) -> anyhow::Result<()> {
    let now = chrono::Local::now().naive_local();

    commands::load_dashboard(state).await;
    let dashboard = commands::dashboard_view(state, now).await;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    let search = commands::search_input(state, "ap").await;
    println!("{}", serde_json::to_string_pretty(&search)?);

    let Some(first) = search.results.first() else {
        info!("No search results, nothing to open");
        return Ok(());
    };
    if let Some(target) = commands::select_symbol(state, &first.symbol).await {
        commands::navigate(state, &target).await;
    }
    commands::set_tab(state, StockTab::Prediction).await;

    let stock = commands::stock_view(state, now).await;
    println!("{}", serde_json::to_string_pretty(&stock)?);

    info!("Walkthrough finished");
    Ok(())
}
