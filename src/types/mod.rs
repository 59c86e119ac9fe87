mod candle;
mod signals;
mod timeframe;

pub use candle::*;
pub use signals::*;
pub use timeframe::*;
