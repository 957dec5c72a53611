use serde::Serialize;

/// All application errors, categorized by domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    // ── Data provider ──
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    // ── Series ──
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Series length mismatch for {timeframe}: {labels} labels, {values} values")]
    SeriesLengthMismatch {
        timeframe: String,
        labels: usize,
        values: usize,
    },

    // ── Configuration ──
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    // ── Serialization ──
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            AppError::InvalidTimeframe(_) => "INVALID_TIMEFRAME",
            AppError::SeriesLengthMismatch { .. } => "SERIES_LENGTH_MISMATCH",
            AppError::InvalidConfig(_) => "INVALID_CONFIG",
            AppError::FileRead(_) => "FILE_READ",
            AppError::Serialization(_) => "SERIALIZATION",
        }
    }
}

/// Serializable error response for the view layer.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

// Allow AppError to be handed to the view layer as-is.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let response = ErrorResponse::from(self);
        response.serialize(serializer)
    }
}

// ── Conversions from external errors ──

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileRead(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::DataUnavailable("provider timed out".to_string())
    }
}
