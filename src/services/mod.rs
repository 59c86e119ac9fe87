pub mod signals;

pub use signals::{IndicatorCalculator, SignalGenerator};
