//! Signal assembly for one symbol and ordered batch orchestration.

use crate::config::{BatchConfig, SignalConfig};
use crate::error::{EngineError, Result};
use crate::services::signals::calculator::IndicatorCalculator;
use crate::services::signals::classifiers::classify;
use crate::services::signals::indicators::{BollingerBands, BollingerOutput};
use crate::services::signals::scorer::{probability_score, Tally};
use crate::services::signals::Indicator;
use crate::sources::MarketDataSource;
use crate::types::{
    CandleSeries, IndicatorSet, NoSignalReason, Outcome, PriceTargets, Signal, SignalStatus,
    SkipReason, SymbolResult, Timeframe,
};
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Turns market data into signals.
///
/// Holds no mutable state; one generator can serve any number of
/// concurrent calls.
pub struct SignalGenerator<S: ?Sized> {
    source: Arc<S>,
    calculator: IndicatorCalculator,
    signal_config: SignalConfig,
    batch_config: BatchConfig,
}

impl<S: MarketDataSource + ?Sized> SignalGenerator<S> {
    /// Create a new signal generator.
    pub fn new(source: Arc<S>, signal_config: SignalConfig, batch_config: BatchConfig) -> Self {
        Self {
            source,
            calculator: IndicatorCalculator::new(),
            signal_config,
            batch_config,
        }
    }

    pub fn with_defaults(source: Arc<S>) -> Self {
        Self::new(source, SignalConfig::default(), BatchConfig::default())
    }

    /// Fetch data for `symbol` and evaluate it.
    pub async fn generate_signal(&self, symbol: &str, timeframe: Timeframe) -> Result<Outcome> {
        let series = self
            .source
            .fetch_candles(symbol, timeframe, self.batch_config.candle_count)
            .await?;

        let price = if self.signal_config.use_live_price {
            Some(self.source.fetch_current_price(symbol).await?)
        } else {
            None
        };

        self.evaluate(symbol, timeframe, &series, price, Utc::now())
    }

    /// Evaluate an already fetched series. `price` defaults to the last close.
    pub fn evaluate(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        series: &CandleSeries,
        price: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        let indicators = self.calculator.calculate(series)?;
        self.assemble(symbol, timeframe, indicators, price, now)
    }

    /// Classify, score and price one indicator set.
    pub fn assemble(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        indicators: IndicatorSet,
        price: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        let price = price.unwrap_or(indicators.close);
        let classification = classify(&indicators);

        let tally = Tally::count(&classification);
        let Some(direction) = tally.direction() else {
            return Ok(Outcome::NoSignal(NoSignalReason::NoDirection {
                bullish: tally.bullish,
                bearish: tally.bearish,
            }));
        };

        let bands = bollinger_bands(&indicators);
        let probability = probability_score(&classification, price, bands);
        let minimum = self.signal_config.min_probability;
        if probability < minimum {
            return Ok(Outcome::NoSignal(NoSignalReason::BelowThreshold {
                probability,
                minimum,
            }));
        }

        let Some(bands) = bands else {
            return Err(EngineError::InsufficientData {
                required: BollingerBands::default().min_periods(),
                available: indicators.candles,
            });
        };
        let targets = PriceTargets::calculate(price, direction, &bands);

        Ok(Outcome::Emitted(Signal {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            direction,
            timeframe,
            entry: targets.entry,
            stop_loss: targets.stop_loss,
            take_profit_1: targets.take_profit_1,
            take_profit_2: targets.take_profit_2,
            take_profit_3: targets.take_profit_3,
            leverage: self.signal_config.leverage,
            probability,
            status: SignalStatus::Active,
            indicators,
            classification,
            created_at: now,
            expires_at: now + self.signal_config.expiry(),
        }))
    }

    /// Evaluate every symbol, returning one entry per symbol in input order.
    ///
    /// Up to `max_concurrency` symbols are in flight at once. A failure or
    /// timeout only affects its own entry.
    pub async fn run_batch<T: AsRef<str>>(
        &self,
        symbols: &[T],
        timeframe: Timeframe,
    ) -> Vec<SymbolResult> {
        let timeout_ms = self.batch_config.symbol_timeout_ms;
        let limit = self.batch_config.max_concurrency.max(1);

        debug!(
            "Evaluating {} symbols on {} via {} (concurrency {})",
            symbols.len(),
            timeframe,
            self.source.name(),
            limit
        );

        stream::iter(symbols.iter().map(|s| s.as_ref()))
            .map(|symbol| async move {
                let generated = tokio::time::timeout(
                    Duration::from_millis(timeout_ms),
                    self.generate_signal(symbol, timeframe),
                )
                .await;

                let result = match generated {
                    Ok(Ok(Outcome::Emitted(signal))) => {
                        info!(
                            "{} {} signal for {} at {:.1}%",
                            signal.direction.label(),
                            timeframe,
                            symbol,
                            signal.probability
                        );
                        Ok(signal)
                    }
                    Ok(Ok(Outcome::NoSignal(reason))) => {
                        debug!("No signal for {}: {:?}", symbol, reason);
                        Err(SkipReason::NoSignal(reason))
                    }
                    Ok(Err(e)) => {
                        warn!("Skipping {}: {}", symbol, e);
                        Err(SkipReason::Failed(e))
                    }
                    Err(_) => {
                        warn!("Skipping {}: timed out after {}ms", symbol, timeout_ms);
                        Err(SkipReason::Failed(EngineError::Timeout {
                            symbol: symbol.to_string(),
                            after_ms: timeout_ms,
                        }))
                    }
                };

                SymbolResult {
                    symbol: symbol.to_string(),
                    result,
                }
            })
            .buffered(limit)
            .collect()
            .await
    }

    /// Signals for every symbol that produced one, in input order.
    pub async fn generate_signals_batch<T: AsRef<str>>(
        &self,
        symbols: &[T],
        timeframe: Timeframe,
    ) -> Vec<Signal> {
        self.run_batch(symbols, timeframe)
            .await
            .into_iter()
            .filter_map(|entry| entry.result.ok())
            .collect()
    }
}

/// Bollinger bands of the set, if all three lines are defined.
fn bollinger_bands(indicators: &IndicatorSet) -> Option<BollingerOutput> {
    Some(BollingerOutput {
        upper: indicators.bb_upper?,
        middle: indicators.bb_mid?,
        lower: indicators.bb_lower?,
    })
}

/// Sort signals by probability, highest first. Ties keep their order.
pub fn rank_by_probability(signals: &mut [Signal]) {
    signals.sort_by(|a, b| b.probability.total_cmp(&a.probability));
}
