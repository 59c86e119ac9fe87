//! Augur - Deterministic technical-indicator trading signal engine

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use config::{BatchConfig, Config, SignalConfig};
pub use error::{EngineError, Result};
pub use services::signals::{rank_by_probability, IndicatorCalculator, SignalGenerator};
pub use sources::{BinanceClient, InMemorySource, MarketDataSource};
pub use types::*;
