use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// OHLCV candle. `timestamp` is the open time in unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Time-ordered candles for one symbol and timeframe.
///
/// Timestamps are strictly increasing; construction rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series, validating timestamp order.
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        for pair in candles.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(EngineError::InvalidSeries(format!(
                    "timestamp {} does not follow {}",
                    pair[1].timestamp, pair[0].timestamp
                )));
            }
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(timestamp: i64, close: f64) -> Candle {
        Candle {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let series = CandleSeries::new(vec![candle(1, 10.0), candle(2, 11.0), candle(5, 12.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last().unwrap().close, 12.0);
        let closes: Vec<f64> = series.candles().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = CandleSeries::new(vec![candle(1, 10.0), candle(1, 11.0)]);
        assert!(matches!(result, Err(EngineError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_rejects_out_of_order() {
        let result = CandleSeries::new(vec![candle(3, 10.0), candle(2, 11.0)]);
        assert!(matches!(result, Err(EngineError::InvalidSeries(_))));
    }

    #[test]
    fn test_empty_series_is_allowed() {
        let series = CandleSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }
}
