//! Trading signals service module.
//!
//! Indicator calculation, state classification, scoring, price targets
//! and signal assembly, leaves first.

pub mod calculator;
pub mod classifiers;
pub mod generator;
pub mod indicators;
pub mod scorer;
pub mod targets;

pub use calculator::IndicatorCalculator;
pub use classifiers::classify;
pub use generator::{rank_by_probability, SignalGenerator};
pub use scorer::{decide_direction, probability_score, Tally};

use crate::types::Candle;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Last-bar value(s) produced by the indicator.
    type Output;

    /// Minimum number of candle periods required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator from candle data.
    /// Returns None if there are fewer than `min_periods` candles.
    fn calculate(&self, candles: &[Candle]) -> Option<Self::Output>;
}
