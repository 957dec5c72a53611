use std::path::Path;

use serde::{Deserialize, Serialize};

use super::series::Timeframe;
use crate::errors::AppError;

/// Where symbol search results come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Filter the built-in catalog synchronously.
    #[default]
    Local,
    /// Ask the data provider; results arrive asynchronously.
    Remote,
}

/// Dashboard configuration. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Delay the mock provider waits before answering a page load.
    pub simulated_latency_ms: u64,
    /// A page load that takes longer than this becomes `DataUnavailable`.
    pub load_timeout_ms: u64,
    /// Maximum number of results shown under the search box.
    pub search_limit: usize,
    pub search_mode: SearchMode,
    /// Timeframe selected when a stock page is (re)mounted.
    pub default_timeframe: Timeframe,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            simulated_latency_ms: 800,
            load_timeout_ms: 10_000,
            search_limit: 10,
            search_mode: SearchMode::Local,
            default_timeframe: Timeframe::OneMonth,
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.search_limit == 0 {
            return Err(AppError::InvalidConfig(
                "searchLimit must be at least 1".to_string(),
            ));
        }
        if self.load_timeout_ms == 0 {
            return Err(AppError::InvalidConfig(
                "loadTimeoutMs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let cfg = DashboardConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.default_timeframe, Timeframe::OneMonth);
    }

    #[test]
    fn test_partial_override() {
        let cfg =
            DashboardConfig::from_json_str(r#"{"searchMode":"remote","defaultTimeframe":"1y"}"#)
                .unwrap();
        assert_eq!(cfg.search_mode, SearchMode::Remote);
        assert_eq!(cfg.default_timeframe, Timeframe::OneYear);
        assert_eq!(cfg.search_limit, 10);
    }

    #[test]
    fn test_rejects_zero_search_limit() {
        let err = DashboardConfig::from_json_str(r#"{"searchLimit":0}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_timeframe_is_serialization_error() {
        let err = DashboardConfig::from_json_str(r#"{"defaultTimeframe":"2w"}"#).unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"simulatedLatencyMs":0,"logFilter":"debug"}"#).unwrap();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.simulated_latency_ms, 0);
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.load_timeout_ms, 10_000);
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::load(Path::new("/nonexistent/dashboard.json")).unwrap_err();
        assert!(matches!(err, AppError::FileRead(_)));
    }
}
