use thiserror::Error;

/// Engine error types.
///
/// None of these are fatal to the process. `InsufficientData`, `Retrieval`
/// and `Timeout` turn into a skipped symbol at the batch level; only
/// `InvalidConfig` should stop a binary at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Insufficient data: need {required} candles, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid candle series: {0}")]
    InvalidSeries(String),

    #[error("Retrieval failure: {0}")]
    Retrieval(String),

    #[error("Timed out after {after_ms}ms fetching {symbol}")]
    Timeout { symbol: String, after_ms: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Whether this error came from the data source rather than the engine.
    pub fn is_retrieval(&self) -> bool {
        matches!(self, EngineError::Retrieval(_) | EngineError::Timeout { .. })
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Retrieval(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Retrieval(format!("malformed response: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = EngineError::InsufficientData {
            required: 14,
            available: 3,
        };
        assert_eq!(err.to_string(), "Insufficient data: need 14 candles, have 3");
        assert!(!err.is_retrieval());
    }

    #[test]
    fn test_retrieval_classification() {
        assert!(EngineError::Retrieval("connection reset".to_string()).is_retrieval());
        assert!(EngineError::Timeout {
            symbol: "BTC/USDT".to_string(),
            after_ms: 500,
        }
        .is_retrieval());
        assert!(!EngineError::InvalidConfig("bad".to_string()).is_retrieval());
    }

    #[test]
    fn test_serde_error_becomes_retrieval() {
        let parse_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: EngineError = parse_err.into();
        assert!(err.is_retrieval());
    }
}
