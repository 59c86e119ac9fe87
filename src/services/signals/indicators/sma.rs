//! Simple Moving Average (SMA) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// Candle column an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Close,
    Volume,
}

impl Source {
    pub fn value(&self, candle: &Candle) -> f64 {
        match self {
            Source::Close => candle.close,
            Source::Volume => candle.volume,
        }
    }
}

/// SMA (Simple Moving Average) indicator.
///
/// Mean of the trailing `period` values, last bar included.
pub struct Sma {
    period: usize,
    source: Source,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            source: Source::Close,
        }
    }

    /// SMA over the volume column.
    pub fn volume(period: usize) -> Self {
        Self {
            period,
            source: Source::Volume,
        }
    }
}

/// Mean of the last `period` values.
pub fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[values.len() - period..].iter().sum::<f64>() / period as f64)
}

impl Indicator for Sma {
    type Output = f64;

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        if candles.len() < self.period {
            return None;
        }

        let values: Vec<f64> = candles
            .iter()
            .rev()
            .take(self.period)
            .map(|c| self.source.value(c))
            .collect();

        trailing_mean(&values, self.period)
    }
}
