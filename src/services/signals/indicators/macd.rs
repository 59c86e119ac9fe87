//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use crate::services::signals::Indicator;
use crate::types::Candle;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

/// Last-bar MACD values plus the previous bar's line and signal,
/// when the series is long enough to have one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_macd: Option<f64>,
    pub prev_signal: Option<f64>,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn calculate(&self, candles: &[Candle]) -> Option<MacdOutput> {
        if self.fast_period > self.slow_period || candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let fast_ema = ema_series(&closes, self.fast_period);
        let slow_ema = ema_series(&closes, self.slow_period);

        if fast_ema.is_empty() || slow_ema.is_empty() {
            return None;
        }

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal_period);
        let signal = *signal_line.last()?;
        let macd = *macd_line.last()?;

        let (prev_macd, prev_signal) = if signal_line.len() >= 2 {
            (
                Some(macd_line[macd_line.len() - 2]),
                Some(signal_line[signal_line.len() - 2]),
            )
        } else {
            (None, None)
        };

        Some(MacdOutput {
            macd,
            signal,
            histogram: macd - signal,
            prev_macd,
            prev_signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from(closes: impl IntoIterator<Item = f64>) -> Vec<Candle> {
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| Candle {
                timestamp: 1_000_000 + i as i64 * 60_000,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_macd_min_periods() {
        let macd = Macd::default();
        assert_eq!(macd.min_periods(), 34);
        assert!(macd.calculate(&candles_from((0..33).map(|i| i as f64))).is_none());
    }

    #[test]
    fn test_macd_previous_bar_needs_one_more_candle() {
        let macd = Macd::default();
        let first = macd.calculate(&candles_from((0..34).map(|i| 100.0 + i as f64))).unwrap();
        assert!(first.prev_macd.is_none());
        let second = macd.calculate(&candles_from((0..35).map(|i| 100.0 + i as f64))).unwrap();
        assert!(second.prev_macd.is_some());
        assert!(second.prev_signal.is_some());
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let output = Macd::default().calculate(&candles_from(vec![50.0; 60])).unwrap();
        assert!(output.macd.abs() < 1e-9);
        assert!(output.signal.abs() < 1e-9);
        assert!(output.histogram.abs() < 1e-9);
    }

    #[test]
    fn test_macd_uptrend_positive_line() {
        let output = Macd::default()
            .calculate(&candles_from((0..80).map(|i| 100.0 + i as f64 * 2.0)))
            .unwrap();
        assert!(output.macd > 0.0, "got {}", output.macd);
        assert!((output.histogram - (output.macd - output.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_downtrend_negative_line() {
        let output = Macd::default()
            .calculate(&candles_from((0..80).map(|i| 300.0 - i as f64 * 2.0)))
            .unwrap();
        assert!(output.macd < 0.0, "got {}", output.macd);
    }

    #[test]
    fn test_macd_reversal_crosses_up() {
        // Long decline then a sharp rally puts the line back over its signal
        let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        closes.extend((1..=15).map(|i| 141.0 + i as f64 * 4.0));
        let output = Macd::default().calculate(&candles_from(closes)).unwrap();
        assert!(output.macd > output.signal);
    }

    #[test]
    fn test_macd_single_bar_crossover() {
        // Accelerating decline keeps the line under its signal
        let mut closes: Vec<f64> = (0..80).map(|i| 300.0 - 100.0 * 1.01f64.powi(i)).collect();
        let before = Macd::default().calculate(&candles_from(closes.clone())).unwrap();
        assert!(before.macd < before.signal);

        // One +10 bar lifts it back over
        let last = *closes.last().unwrap();
        closes.push(last + 10.0);
        let after = Macd::default().calculate(&candles_from(closes)).unwrap();
        assert!(after.macd > after.signal);
        assert!(after.prev_macd.unwrap() < after.prev_signal.unwrap());
        assert_eq!(after.prev_macd, Some(before.macd));
        assert_eq!(after.prev_signal, Some(before.signal));
    }
}
