use std::future::Future;

use crate::errors::AppError;
use crate::models::market::MarketSnapshot;
use crate::models::quote::SymbolEntry;
use crate::models::stock::Stock;

/// Source of dashboard data. Every call is single-shot and returns a fully
/// populated structure or `AppError::DataUnavailable`. Retries, if any, are
/// the provider's business.
pub trait MarketDataProvider: Send + Sync {
    fn fetch_market_summary(
        &self,
    ) -> impl Future<Output = Result<MarketSnapshot, AppError>> + Send;

    fn fetch_stock(&self, symbol: &str) -> impl Future<Output = Result<Stock, AppError>> + Send;

    /// Remote catalog lookup, used when search runs in remote mode.
    fn search_symbols(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SymbolEntry>, AppError>> + Send;
}
