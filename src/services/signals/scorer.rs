//! Probability score and direction decision.

use super::indicators::BollingerOutput;
use crate::types::{ClassificationSet, Direction, MacdState, RsiState, Trend, VolumeState};

pub const BASE_SCORE: f64 = 50.0;
pub const BAND_TOUCH_BONUS: f64 = 5.0;

/// Least number of points a side needs before it can win.
pub const MIN_CONVICTION: u32 = 4;

/// Additive 0-100 score, clamped once at the end and rounded to one decimal.
///
/// `bands` is `None` while Bollinger is still warming up; no band bonus
/// applies then.
pub fn probability_score(
    classes: &ClassificationSet,
    price: f64,
    bands: Option<BollingerOutput>,
) -> f64 {
    let mut score = BASE_SCORE;

    score += match classes.rsi {
        RsiState::Oversold | RsiState::Overbought => 15.0,
        RsiState::Neutral => 7.0,
    };

    score += match classes.macd {
        MacdState::Buy | MacdState::Sell => 20.0,
        MacdState::Rising | MacdState::Falling => 10.0,
        MacdState::Neutral => 0.0,
    };

    score += match classes.trend {
        Trend::StrongUp | Trend::StrongDown => 20.0,
        Trend::Up | Trend::Down => 15.0,
        Trend::Neutral => 5.0,
    };

    score += match classes.volume {
        VolumeState::High => 10.0,
        VolumeState::Normal => 5.0,
        VolumeState::Low => 0.0,
    };

    if bands.is_some_and(|b| b.touches(price)) {
        score += BAND_TOUCH_BONUS;
    }

    round_to(score.clamp(0.0, 100.0), 1)
}

/// Bullish and bearish vote totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub bullish: u32,
    pub bearish: u32,
}

impl Tally {
    pub fn count(classes: &ClassificationSet) -> Self {
        let mut tally = Tally::default();

        match classes.rsi {
            RsiState::Oversold => tally.bullish += 2,
            RsiState::Overbought => tally.bearish += 2,
            RsiState::Neutral => {}
        }

        match classes.macd {
            MacdState::Buy | MacdState::Rising => tally.bullish += 2,
            MacdState::Sell | MacdState::Falling => tally.bearish += 2,
            MacdState::Neutral => {}
        }

        if classes.trend.is_bullish() {
            tally.bullish += 3;
        } else if classes.trend.is_bearish() {
            tally.bearish += 3;
        }

        tally
    }

    /// The winning side, if it both leads and has enough conviction.
    pub fn direction(&self) -> Option<Direction> {
        if self.bullish > self.bearish && self.bullish >= MIN_CONVICTION {
            Some(Direction::Long)
        } else if self.bearish > self.bullish && self.bearish >= MIN_CONVICTION {
            Some(Direction::Short)
        } else {
            None
        }
    }
}

/// Direction decision; `None` means no actionable call.
pub fn decide_direction(classes: &ClassificationSet) -> Option<Direction> {
    Tally::count(classes).direction()
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
