//! Computes the full indicator set for one candle series.

use crate::error::{EngineError, Result};
use crate::services::signals::indicators::{BollingerBands, Ema, Macd, Rsi, Sma};
use crate::services::signals::Indicator;
use crate::types::{CandleSeries, IndicatorSet};

/// Fewest candles the calculator accepts (the RSI window).
pub const MIN_CANDLES: usize = 14;

/// Candles needed for every indicator to be defined.
pub const FULL_WARMUP: usize = 200;

/// Stateless calculator for RSI(14), MACD(12,26,9), EMA(20/50/200),
/// Bollinger(20, 2) and volume SMA(20).
pub struct IndicatorCalculator {
    rsi: Rsi,
    macd: Macd,
    ema20: Ema,
    ema50: Ema,
    ema200: Ema,
    bollinger: BollingerBands,
    volume_sma: Sma,
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self {
            rsi: Rsi::default(),
            macd: Macd::default(),
            ema20: Ema::new(20),
            ema50: Ema::new(50),
            ema200: Ema::new(FULL_WARMUP),
            bollinger: BollingerBands::default(),
            volume_sma: Sma::volume(20),
        }
    }
}

impl IndicatorCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate every indicator on the same series snapshot.
    ///
    /// Fails with `InsufficientData` below [`MIN_CANDLES`]; above that,
    /// indicators whose window is not yet filled are left `None`.
    pub fn calculate(&self, series: &CandleSeries) -> Result<IndicatorSet> {
        let last = match series.last() {
            Some(last) if series.len() >= MIN_CANDLES => last,
            _ => {
                return Err(EngineError::InsufficientData {
                    required: MIN_CANDLES,
                    available: series.len(),
                })
            }
        };
        let candles = series.candles();

        let macd = self.macd.calculate(candles);
        let bands = self.bollinger.calculate(candles);

        Ok(IndicatorSet {
            candles: candles.len(),
            close: last.close,
            volume: last.volume,
            rsi14: self.rsi.calculate(candles),
            macd: macd.map(|m| m.macd),
            macd_signal: macd.map(|m| m.signal),
            macd_histogram: macd.map(|m| m.histogram),
            macd_prev: macd.and_then(|m| m.prev_macd),
            macd_signal_prev: macd.and_then(|m| m.prev_signal),
            ema20: self.ema20.calculate(candles),
            ema50: self.ema50.calculate(candles),
            ema200: self.ema200.calculate(candles),
            bb_upper: bands.map(|b| b.upper),
            bb_mid: bands.map(|b| b.middle),
            bb_lower: bands.map(|b| b.lower),
            volume_sma20: self.volume_sma.calculate(candles),
        })
    }
}
