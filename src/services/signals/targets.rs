//! Entry, stop-loss and take-profit levels.

use super::indicators::BollingerOutput;
use super::scorer::round_to;
use crate::types::{Direction, PriceTargets};

/// Stop distance in volatility units.
pub const STOP_MULTIPLIER: f64 = 1.5;

/// Take-profit distances in volatility units.
pub const TAKE_PROFIT_MULTIPLIERS: [f64; 3] = [1.0, 2.0, 3.0];

impl PriceTargets {
    /// Derive levels from price, direction and the Bollinger bands.
    ///
    /// Volatility is half the band width. A zero-width band collapses all
    /// levels onto the entry price.
    pub fn calculate(price: f64, direction: Direction, bands: &BollingerOutput) -> Self {
        let volatility = bands.half_width();
        let sign = match direction {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        };
        let level = |units: f64| round_to(price + sign * units * volatility, 2);

        Self {
            entry: round_to(price, 2),
            stop_loss: level(-STOP_MULTIPLIER),
            take_profit_1: level(TAKE_PROFIT_MULTIPLIERS[0]),
            take_profit_2: level(TAKE_PROFIT_MULTIPLIERS[1]),
            take_profit_3: level(TAKE_PROFIT_MULTIPLIERS[2]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands(upper: f64, lower: f64) -> BollingerOutput {
        BollingerOutput {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
        }
    }

    #[test]
    fn test_long_targets() {
        let t = PriceTargets::calculate(106.0, Direction::Long, &bands(110.0, 90.0));
        assert_eq!(t.entry, 106.0);
        assert_eq!(t.stop_loss, 91.0);
        assert_eq!(t.take_profit_1, 116.0);
        assert_eq!(t.take_profit_2, 126.0);
        assert_eq!(t.take_profit_3, 136.0);
    }

    #[test]
    fn test_short_targets_are_mirrored() {
        let t = PriceTargets::calculate(106.0, Direction::Short, &bands(110.0, 90.0));
        assert_eq!(t.stop_loss, 121.0);
        assert_eq!(t.take_profit_1, 96.0);
        assert_eq!(t.take_profit_2, 86.0);
        assert_eq!(t.take_profit_3, 76.0);
    }

    #[test]
    fn test_strict_ordering_when_volatile() {
        let prices = [0.5, 3.21, 27_345.67, 1.0e6];
        let widths = [0.04, 1.3, 250.0];
        for &price in &prices {
            for &width in &widths {
                let l = PriceTargets::calculate(price, Direction::Long, &bands(price + width, price - width));
                assert!(l.stop_loss < l.entry);
                assert!(l.entry < l.take_profit_1);
                assert!(l.take_profit_1 < l.take_profit_2);
                assert!(l.take_profit_2 < l.take_profit_3);

                let s = PriceTargets::calculate(price, Direction::Short, &bands(price + width, price - width));
                assert!(s.take_profit_3 < s.take_profit_2);
                assert!(s.take_profit_2 < s.take_profit_1);
                assert!(s.take_profit_1 < s.entry);
                assert!(s.entry < s.stop_loss);
            }
        }
    }

    #[test]
    fn test_zero_width_band_collapses_levels() {
        let t = PriceTargets::calculate(50.0, Direction::Long, &bands(50.0, 50.0));
        assert_eq!(t.stop_loss, 50.0);
        assert_eq!(t.take_profit_3, 50.0);
    }

    #[test]
    fn test_rounding_to_cents() {
        let t = PriceTargets::calculate(1.23456, Direction::Long, &bands(1.3, 1.2));
        assert_eq!(t.entry, 1.23);
        assert_eq!(t.take_profit_1, 1.28);
    }
}
