//! Maps indicator values to discrete states.
//!
//! Each classifier is a pure function. An undefined input classifies to
//! the neutral state of that classifier.

use crate::types::{ClassificationSet, IndicatorSet, MacdState, RsiState, Trend, VolumeState};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const VOLUME_HIGH_RATIO: f64 = 1.5;
pub const VOLUME_LOW_RATIO: f64 = 0.5;

/// Classify the EMA(20/50/200) stack. Branches are tried in order.
pub fn classify_trend(ema20: Option<f64>, ema50: Option<f64>, ema200: Option<f64>) -> Trend {
    let (Some(fast), Some(mid)) = (ema20, ema50) else {
        return Trend::Neutral;
    };

    let above_slow = ema200.is_some_and(|slow| mid > slow);
    let below_slow = ema200.is_some_and(|slow| mid < slow);

    if fast > mid && above_slow {
        Trend::StrongUp
    } else if fast > mid {
        Trend::Up
    } else if fast < mid && below_slow {
        Trend::StrongDown
    } else if fast < mid {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

pub fn classify_rsi(rsi: Option<f64>) -> RsiState {
    match rsi {
        Some(v) if v < RSI_OVERSOLD => RsiState::Oversold,
        Some(v) if v > RSI_OVERBOUGHT => RsiState::Overbought,
        _ => RsiState::Neutral,
    }
}

/// Classify MACD against its signal line, detecting a crossover on the
/// last bar when the previous bar's values are known.
pub fn classify_macd(
    macd: Option<f64>,
    signal: Option<f64>,
    prev_macd: Option<f64>,
    prev_signal: Option<f64>,
) -> MacdState {
    let (Some(macd), Some(signal)) = (macd, signal) else {
        return MacdState::Neutral;
    };
    let previous = prev_macd.zip(prev_signal);

    if macd > signal && previous.is_some_and(|(m, s)| m <= s) {
        MacdState::Buy
    } else if macd < signal && previous.is_some_and(|(m, s)| m >= s) {
        MacdState::Sell
    } else if macd > signal {
        MacdState::Rising
    } else if macd < signal {
        MacdState::Falling
    } else {
        MacdState::Neutral
    }
}

pub fn classify_volume(current: f64, average: Option<f64>) -> VolumeState {
    match average {
        Some(avg) if current > avg * VOLUME_HIGH_RATIO => VolumeState::High,
        Some(avg) if current < avg * VOLUME_LOW_RATIO => VolumeState::Low,
        _ => VolumeState::Normal,
    }
}

/// Run all four classifiers over one indicator set.
pub fn classify(indicators: &IndicatorSet) -> ClassificationSet {
    ClassificationSet {
        trend: classify_trend(indicators.ema20, indicators.ema50, indicators.ema200),
        rsi: classify_rsi(indicators.rsi14),
        macd: classify_macd(
            indicators.macd,
            indicators.macd_signal,
            indicators.macd_prev,
            indicators.macd_signal_prev,
        ),
        volume: classify_volume(indicators.volume, indicators.volume_sma20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_branches() {
        assert_eq!(classify_trend(Some(105.0), Some(100.0), Some(95.0)), Trend::StrongUp);
        assert_eq!(classify_trend(Some(105.0), Some(100.0), Some(101.0)), Trend::Up);
        assert_eq!(classify_trend(Some(95.0), Some(100.0), Some(105.0)), Trend::StrongDown);
        assert_eq!(classify_trend(Some(95.0), Some(100.0), Some(99.0)), Trend::Down);
        assert_eq!(classify_trend(Some(100.0), Some(100.0), Some(90.0)), Trend::Neutral);
    }

    #[test]
    fn test_trend_with_partial_warmup() {
        assert_eq!(classify_trend(Some(105.0), Some(100.0), None), Trend::Up);
        assert_eq!(classify_trend(Some(95.0), Some(100.0), None), Trend::Down);
        assert_eq!(classify_trend(Some(105.0), None, None), Trend::Neutral);
    }

    #[test]
    fn test_trend_equal_slow_is_not_strong() {
        assert_eq!(classify_trend(Some(105.0), Some(100.0), Some(100.0)), Trend::Up);
    }

    #[test]
    fn test_rsi_thresholds_are_exclusive() {
        assert_eq!(classify_rsi(Some(29.9)), RsiState::Oversold);
        assert_eq!(classify_rsi(Some(30.0)), RsiState::Neutral);
        assert_eq!(classify_rsi(Some(70.0)), RsiState::Neutral);
        assert_eq!(classify_rsi(Some(70.1)), RsiState::Overbought);
        assert_eq!(classify_rsi(None), RsiState::Neutral);
    }

    #[test]
    fn test_macd_crossovers() {
        assert_eq!(classify_macd(Some(1.0), Some(0.5), Some(0.4), Some(0.5)), MacdState::Buy);
        assert_eq!(classify_macd(Some(1.0), Some(0.5), Some(0.5), Some(0.5)), MacdState::Buy);
        assert_eq!(classify_macd(Some(0.4), Some(0.5), Some(0.6), Some(0.5)), MacdState::Sell);
        assert_eq!(classify_macd(Some(0.4), Some(0.5), Some(0.5), Some(0.5)), MacdState::Sell);
    }

    #[test]
    fn test_macd_standing_relationships() {
        assert_eq!(classify_macd(Some(1.0), Some(0.5), Some(0.9), Some(0.5)), MacdState::Rising);
        assert_eq!(classify_macd(Some(0.1), Some(0.5), Some(0.2), Some(0.5)), MacdState::Falling);
        assert_eq!(classify_macd(Some(0.5), Some(0.5), Some(0.2), Some(0.5)), MacdState::Neutral);
    }

    #[test]
    fn test_macd_without_previous_bar_has_no_crossover() {
        assert_eq!(classify_macd(Some(1.0), Some(0.5), None, None), MacdState::Rising);
        assert_eq!(classify_macd(Some(0.1), Some(0.5), None, None), MacdState::Falling);
        assert_eq!(classify_macd(None, Some(0.5), None, None), MacdState::Neutral);
    }

    #[test]
    fn test_volume_states() {
        assert_eq!(classify_volume(200.0, Some(100.0)), VolumeState::High);
        assert_eq!(classify_volume(150.0, Some(100.0)), VolumeState::Normal);
        assert_eq!(classify_volume(49.0, Some(100.0)), VolumeState::Low);
        assert_eq!(classify_volume(50.0, Some(100.0)), VolumeState::Normal);
        assert_eq!(classify_volume(1.0, None), VolumeState::Normal);
    }
}
