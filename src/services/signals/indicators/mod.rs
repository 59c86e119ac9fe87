//! Technical indicator implementations.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{BollingerBands, BollingerOutput};
pub use ema::{ema_series, Ema};
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use sma::{Sma, Source};
