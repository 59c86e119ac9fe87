use crate::error::EngineError;
use crate::types::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Last-bar indicator values derived from one candle series.
///
/// A field is `None` while the series is shorter than that indicator's
/// warm-up window. `close` and `volume` are the last bar itself; the
/// `*_prev` MACD fields belong to the bar before it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    /// Length of the series these values came from.
    pub candles: usize,
    pub close: f64,
    pub volume: f64,
    pub rsi14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub macd_prev: Option<f64>,
    pub macd_signal_prev: Option<f64>,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_lower: Option<f64>,
    pub volume_sma20: Option<f64>,
}

/// EMA stack alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    StrongUp,
    Up,
    Neutral,
    Down,
    StrongDown,
}

impl Trend {
    pub const ALL: [Trend; 5] = [
        Trend::StrongUp,
        Trend::Up,
        Trend::Neutral,
        Trend::Down,
        Trend::StrongDown,
    ];

    pub fn is_bullish(&self) -> bool {
        matches!(self, Trend::StrongUp | Trend::Up)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, Trend::StrongDown | Trend::Down)
    }

    /// Bearish counterpart of a bullish state and vice versa.
    pub fn mirror(&self) -> Self {
        match self {
            Trend::StrongUp => Trend::StrongDown,
            Trend::Up => Trend::Down,
            Trend::Neutral => Trend::Neutral,
            Trend::Down => Trend::Up,
            Trend::StrongDown => Trend::StrongUp,
        }
    }
}

/// RSI zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiState {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiState {
    pub const ALL: [RsiState; 3] = [RsiState::Oversold, RsiState::Neutral, RsiState::Overbought];

    pub fn mirror(&self) -> Self {
        match self {
            RsiState::Oversold => RsiState::Overbought,
            RsiState::Neutral => RsiState::Neutral,
            RsiState::Overbought => RsiState::Oversold,
        }
    }
}

/// MACD line relative to its signal line.
///
/// `Buy`/`Sell` are crossovers on the last bar, `Rising`/`Falling`
/// a standing relationship without a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacdState {
    Buy,
    Rising,
    Neutral,
    Falling,
    Sell,
}

impl MacdState {
    pub const ALL: [MacdState; 5] = [
        MacdState::Buy,
        MacdState::Rising,
        MacdState::Neutral,
        MacdState::Falling,
        MacdState::Sell,
    ];

    pub fn mirror(&self) -> Self {
        match self {
            MacdState::Buy => MacdState::Sell,
            MacdState::Rising => MacdState::Falling,
            MacdState::Neutral => MacdState::Neutral,
            MacdState::Falling => MacdState::Rising,
            MacdState::Sell => MacdState::Buy,
        }
    }
}

/// Last-bar volume against its 20-bar average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeState {
    High,
    Normal,
    Low,
}

impl VolumeState {
    pub const ALL: [VolumeState; 3] = [VolumeState::High, VolumeState::Normal, VolumeState::Low];
}

/// Output of the four classifiers for one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSet {
    pub trend: Trend,
    pub rsi: RsiState,
    pub macd: MacdState,
    pub volume: VolumeState,
}

impl ClassificationSet {
    /// Swap every bullish state for its bearish mirror. Volume has no side.
    pub fn mirrored(&self) -> Self {
        Self {
            trend: self.trend.mirror(),
            rsi: self.rsi.mirror(),
            macd: self.macd.mirror(),
            volume: self.volume,
        }
    }
}

/// Trade direction of an emitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

/// Lifecycle status of a signal. Only `Active` is produced here; the
/// others are set by whatever tracks the signal afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    #[default]
    Active,
    Tp1,
    Tp2,
    Tp3,
    StopLoss,
    Expired,
}

/// Entry and exit levels, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTargets {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
}

/// A trading recommendation for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: Uuid,
    pub symbol: String,
    pub direction: Direction,
    pub timeframe: Timeframe,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
    pub leverage: u32,
    /// 0-100, one decimal.
    pub probability: f64,
    pub status: SignalStatus,
    pub indicators: IndicatorSet,
    pub classification: ClassificationSet,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Signal {
    /// Stable lookup key, e.g. `BTC-USDT-1h`.
    pub fn key(&self) -> String {
        signal_key(&self.symbol, self.timeframe)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn targets(&self) -> PriceTargets {
        PriceTargets {
            entry: self.entry,
            stop_loss: self.stop_loss,
            take_profit_1: self.take_profit_1,
            take_profit_2: self.take_profit_2,
            take_profit_3: self.take_profit_3,
        }
    }
}

/// Build the lookup key for a symbol/timeframe pair.
pub fn signal_key(symbol: &str, timeframe: Timeframe) -> String {
    format!("{}-{}", symbol.replace('/', "-"), timeframe.as_str())
}

/// Parse `BTC-USDT-1h` back into `("BTC/USDT", 1h)`.
pub fn parse_signal_key(key: &str) -> Option<(String, Timeframe)> {
    let (symbol, timeframe) = key.rsplit_once('-')?;
    let timeframe = Timeframe::from_str(timeframe)?;
    if symbol.is_empty() {
        return None;
    }
    Some((symbol.replace('-', "/"), timeframe))
}

/// Why a successfully evaluated series produced no signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum NoSignalReason {
    /// Neither side reached the conviction threshold, or they tied.
    NoDirection { bullish: u32, bearish: u32 },
    /// A direction was found but the probability gate rejected it.
    BelowThreshold { probability: f64, minimum: f64 },
}

/// Result of evaluating one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Emitted(Signal),
    NoSignal(NoSignalReason),
}

impl Outcome {
    pub fn signal(self) -> Option<Signal> {
        match self {
            Outcome::Emitted(signal) => Some(signal),
            Outcome::NoSignal(_) => None,
        }
    }
}

/// Why a symbol is absent from a batch result.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Failed(EngineError),
    NoSignal(NoSignalReason),
}

/// Per-symbol batch entry, kept in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolResult {
    pub symbol: String,
    pub result: Result<Signal, SkipReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_key_roundtrip() {
        let key = signal_key("BTC/USDT", Timeframe::OneHour);
        assert_eq!(key, "BTC-USDT-1h");
        assert_eq!(
            parse_signal_key(&key),
            Some(("BTC/USDT".to_string(), Timeframe::OneHour))
        );
    }

    #[test]
    fn test_parse_signal_key_rejects_garbage() {
        assert_eq!(parse_signal_key("BTCUSDT"), None);
        assert_eq!(parse_signal_key("BTC-USDT-7h"), None);
        assert_eq!(parse_signal_key("-1h"), None);
    }

    #[test]
    fn test_mirror_is_involution() {
        for trend in Trend::ALL {
            assert_eq!(trend.mirror().mirror(), trend);
            assert_eq!(trend.is_bullish(), trend.mirror().is_bearish());
        }
        for rsi in RsiState::ALL {
            assert_eq!(rsi.mirror().mirror(), rsi);
        }
        for macd in MacdState::ALL {
            assert_eq!(macd.mirror().mirror(), macd);
        }
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Trend::StrongUp).unwrap(), "\"STRONG_UP\"");
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"SHORT\"");
        assert_eq!(serde_json::to_string(&SignalStatus::StopLoss).unwrap(), "\"STOP_LOSS\"");
        assert_eq!(serde_json::to_string(&MacdState::Buy).unwrap(), "\"BUY\"");
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Long.opposite(), Direction::Short);
        assert_eq!(Direction::Short.label(), "SHORT");
    }
}
