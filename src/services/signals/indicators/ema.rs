//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// EMA (Exponential Moving Average) indicator.
///
/// Seeded with the SMA of the first `period` closes, then smoothed with
/// `2 / (period + 1)`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// Full EMA series for `values`.
///
/// Element `i` of the result belongs to input index `i + period - 1`.
/// Empty when there are fewer than `period` values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let sma: f64 = values.iter().take(period).sum::<f64>() / period as f64;
    ema.push(sma);

    let mut last = sma;
    for value in &values[period..] {
        last = (value - last) * multiplier + last;
        ema.push(last);
    }

    ema
}

impl Indicator for Ema {
    type Output = f64;

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        ema_series(&closes, self.period).last().copied()
    }
}
