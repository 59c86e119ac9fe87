//! Market data retrieval.
//!
//! The engine only sees [`MarketDataSource`]; every failure behind it is
//! opaque and reported as `EngineError::Retrieval`.

pub mod binance;
pub mod memory;

pub use binance::BinanceClient;
pub use memory::InMemorySource;

use crate::error::Result;
use crate::types::{CandleSeries, Timeframe};
use async_trait::async_trait;

/// Contract with the exchange-data collaborator.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &str;

    /// Most recent `count` candles, oldest first.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<CandleSeries>;

    /// Last traded price.
    async fn fetch_current_price(&self, symbol: &str) -> Result<f64>;
}
