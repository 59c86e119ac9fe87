use crate::error::{EngineError, Result};
use crate::services::signals::calculator::{FULL_WARMUP, MIN_CANDLES};
use crate::sources::binance::BINANCE_API_URL;
use crate::types::Timeframe;
use chrono::Duration;
use std::env;
use std::str::FromStr;

/// Parameters of signal assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Signals scoring below this probability are dropped (0-100).
    pub min_probability: f64,
    /// Leverage stamped on every signal.
    pub leverage: u32,
    /// Time from creation to expiry.
    pub expiry_hours: i64,
    /// Ask the source for a live price instead of using the last close.
    pub use_live_price: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_probability: 60.0,
            leverage: 5,
            expiry_hours: 24,
            use_live_price: false,
        }
    }
}

impl SignalConfig {
    pub fn expiry(&self) -> Duration {
        Duration::hours(self.expiry_hours)
    }
}

/// Parameters of the batch orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Symbols evaluated at the same time.
    pub max_concurrency: usize,
    /// Per-symbol deadline covering retrieval and evaluation.
    pub symbol_timeout_ms: u64,
    /// Candles requested per symbol.
    pub candle_count: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            symbol_timeout_ms: 15_000,
            candle_count: FULL_WARMUP,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbols to evaluate; empty means the top-volume pairs.
    pub symbols: Vec<String>,
    /// How many top-volume pairs to use when `symbols` is empty.
    pub top_pairs_limit: usize,
    /// Candle timeframe.
    pub timeframe: Timeframe,
    /// Binance futures REST base URL.
    pub binance_api_url: String,
    /// Binance API key (optional, public endpoints work without).
    pub binance_api_key: Option<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    pub signals: SignalConfig,
    pub batch: BatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            top_pairs_limit: 15,
            timeframe: Timeframe::OneHour,
            binance_api_url: BINANCE_API_URL.to_string(),
            binance_api_key: None,
            request_timeout_secs: 10,
            signals: SignalConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// Unset variables take their default; set but malformed ones are
    /// rejected with `InvalidConfig`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Format: "BTC/USDT,ETH/USDT"
        let symbols = lookup("SYMBOLS")
            .map(|s| {
                s.split(',')
                    .map(|sym| sym.trim().to_uppercase())
                    .filter(|sym| !sym.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let timeframe = match lookup("TIMEFRAME") {
            Some(tf) => Timeframe::from_str(&tf)
                .ok_or_else(|| EngineError::InvalidConfig(format!("unknown timeframe {:?}", tf)))?,
            None => defaults.timeframe,
        };

        let use_live_price = match lookup("SIGNAL_USE_LIVE_PRICE") {
            Some(v) => parse_flag("SIGNAL_USE_LIVE_PRICE", &v)?,
            None => defaults.signals.use_live_price,
        };

        let config = Self {
            symbols,
            top_pairs_limit: parse_var(&lookup, "TOP_PAIRS_LIMIT", defaults.top_pairs_limit)?,
            timeframe,
            binance_api_url: lookup("BINANCE_API_URL").unwrap_or(defaults.binance_api_url),
            binance_api_key: lookup("BINANCE_API_KEY"),
            request_timeout_secs: parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            signals: SignalConfig {
                min_probability: parse_var(
                    &lookup,
                    "SIGNAL_MIN_PROBABILITY",
                    defaults.signals.min_probability,
                )?,
                leverage: parse_var(&lookup, "SIGNAL_LEVERAGE", defaults.signals.leverage)?,
                expiry_hours: parse_var(
                    &lookup,
                    "SIGNAL_EXPIRY_HOURS",
                    defaults.signals.expiry_hours,
                )?,
                use_live_price,
            },
            batch: BatchConfig {
                max_concurrency: parse_var(
                    &lookup,
                    "BATCH_MAX_CONCURRENCY",
                    defaults.batch.max_concurrency,
                )?,
                symbol_timeout_ms: parse_var(
                    &lookup,
                    "BATCH_SYMBOL_TIMEOUT_MS",
                    defaults.batch.symbol_timeout_ms,
                )?,
                candle_count: parse_var(&lookup, "CANDLE_COUNT", defaults.batch.candle_count)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let p = self.signals.min_probability;
        if !(0.0..=100.0).contains(&p) {
            return Err(EngineError::InvalidConfig(format!(
                "min probability must be within 0-100, got {}",
                p
            )));
        }
        if self.signals.leverage == 0 {
            return Err(EngineError::InvalidConfig("leverage must be at least 1".to_string()));
        }
        if self.signals.expiry_hours <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "expiry must be positive, got {}h",
                self.signals.expiry_hours
            )));
        }
        if self.batch.max_concurrency == 0 {
            return Err(EngineError::InvalidConfig("concurrency must be at least 1".to_string()));
        }
        if self.batch.symbol_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig("symbol timeout must be positive".to_string()));
        }
        if self.batch.candle_count < MIN_CANDLES {
            return Err(EngineError::InvalidConfig(format!(
                "candle count must be at least {}, got {}",
                MIN_CANDLES, self.batch.candle_count
            )));
        }
        if self.symbols.is_empty() && self.top_pairs_limit == 0 {
            return Err(EngineError::InvalidConfig(
                "no symbols configured and top pairs limit is 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a numeric variable, falling back to `default` only when unset.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            EngineError::InvalidConfig(format!("{} has malformed value {:?}", name, raw))
        }),
        None => Ok(default),
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(EngineError::InvalidConfig(format!(
            "{} has malformed value {:?}",
            name, raw
        ))),
    }
}
