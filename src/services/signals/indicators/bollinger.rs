//! Bollinger Bands indicator.

use crate::services::signals::Indicator;
use crate::types::Candle;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// StdDev is the population standard deviation of the same window.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerOutput {
    /// Half the band width.
    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }

    /// Whether `price` sits on or outside either band.
    pub fn touches(&self, price: f64) -> bool {
        price <= self.lower || price >= self.upper
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Calculate standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerOutput;

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Option<BollingerOutput> {
        if self.period == 0 || candles.len() < self.period {
            return None;
        }

        let closes: Vec<f64> = candles
            .iter()
            .rev()
            .take(self.period)
            .map(|c| c.close)
            .collect();

        let middle = closes.iter().sum::<f64>() / self.period as f64;
        let std_dev = Self::std_dev(&closes, middle);

        Some(BollingerOutput {
            upper: middle + self.std_dev_multiplier * std_dev,
            middle,
            lower: middle - self.std_dev_multiplier * std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
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
    fn test_bollinger_flat_series_has_zero_width() {
        let bands = BollingerBands::default().calculate(&candles_from(&[10.0; 25])).unwrap();
        assert_eq!(bands.upper, 10.0);
        assert_eq!(bands.middle, 10.0);
        assert_eq!(bands.lower, 10.0);
        assert_eq!(bands.half_width(), 0.0);
    }

    #[test]
    fn test_bollinger_population_std_dev() {
        // values 2,4,4,4,5,5,7,9: mean 5, population sd 2
        let bands = BollingerBands::new(8, 2.0)
            .calculate(&candles_from(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]))
            .unwrap();
        assert_eq!(bands.middle, 5.0);
        assert_eq!(bands.upper, 9.0);
        assert_eq!(bands.lower, 1.0);
    }

    #[test]
    fn test_bollinger_only_uses_trailing_window() {
        let mut closes = vec![1000.0; 5];
        closes.extend([10.0; 20]);
        let bands = BollingerBands::default().calculate(&candles_from(&closes)).unwrap();
        assert_eq!(bands.middle, 10.0);
    }

    #[test]
    fn test_bollinger_touches() {
        let bands = BollingerOutput {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
        };
        assert!(bands.touches(90.0));
        assert!(bands.touches(111.0));
        assert!(!bands.touches(106.0));
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        assert!(BollingerBands::default().calculate(&candles_from(&[1.0; 19])).is_none());
    }
}
