use crate::error::{EngineError, Result};
use crate::sources::MarketDataSource;
use crate::types::{Candle, CandleSeries, Timeframe};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Canned market data for one symbol.
#[derive(Debug, Clone, Default)]
struct Entry {
    candles: Vec<Candle>,
    price: Option<f64>,
    failure: Option<String>,
    delay: Option<Duration>,
}

/// In-memory data source.
///
/// Serves the same candles regardless of timeframe. Symbols can be set
/// up to fail or to respond slowly.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    entries: HashMap<String, Entry>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register candles for a symbol.
    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.entry(symbol).candles = candles;
        self
    }

    /// Override the live price (defaults to the last close).
    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.entry(symbol).price = Some(price);
        self
    }

    /// Make every call for `symbol` fail with `message`.
    pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.entry(symbol).failure = Some(message.to_string());
        self
    }

    /// Delay every call for `symbol`.
    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.entry(symbol).delay = Some(delay);
        self
    }

    fn entry(&mut self, symbol: &str) -> &mut Entry {
        self.entries.entry(symbol.to_uppercase()).or_default()
    }

    async fn lookup(&self, symbol: &str) -> Result<&Entry> {
        let entry = self
            .entries
            .get(&symbol.to_uppercase())
            .ok_or_else(|| EngineError::Retrieval(format!("unknown symbol {}", symbol)))?;

        if let Some(delay) = entry.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref message) = entry.failure {
            return Err(EngineError::Retrieval(message.clone()));
        }
        Ok(entry)
    }
}

#[async_trait]
impl MarketDataSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        count: usize,
    ) -> Result<CandleSeries> {
        let entry = self.lookup(symbol).await?;
        let start = entry.candles.len().saturating_sub(count);
        CandleSeries::new(entry.candles[start..].to_vec())
    }

    async fn fetch_current_price(&self, symbol: &str) -> Result<f64> {
        let entry = self.lookup(symbol).await?;
        entry
            .price
            .or_else(|| entry.candles.last().map(|c| c.close))
            .ok_or_else(|| EngineError::Retrieval(format!("no price for {}", symbol)))
    }
}
