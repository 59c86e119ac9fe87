use crate::error::{EngineError, Result};
use crate::sources::MarketDataSource;
use crate::types::{Candle, CandleSeries, Timeframe};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// USDT-margined futures REST API.
pub const BINANCE_API_URL: &str = "https://fapi.binance.com/fapi/v1";

/// Largest `limit` the klines endpoint accepts.
const MAX_KLINES: usize = 1000;

const QUOTE_ASSET: &str = "USDT";

/// Pairs used when the ticker listing cannot be fetched.
pub const FALLBACK_PAIRS: &[&str] = &["BTC/USDT", "ETH/USDT", "BNB/USDT", "SOL/USDT", "ADA/USDT"];

/// Binance last price response.
#[derive(Debug, Deserialize)]
struct BinancePrice {
    price: String,
}

/// Binance 24hr ticker response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker {
    symbol: String,
    quote_volume: String,
}

/// Binance futures REST client for candles and prices.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(api_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Augur/1.0")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);

        let mut request = self.client.get(&url).query(query);
        if let Some(ref key) = self.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("Binance API returned {}: {}", status, snippet);
            return Err(EngineError::Retrieval(format!("Binance API error: {}", status)));
        }

        Ok(response)
    }

    /// Top `limit` USDT pairs by 24h quote volume, as `BASE/USDT`.
    ///
    /// Falls back to [`FALLBACK_PAIRS`] when the listing fails.
    pub async fn top_volume_pairs(&self, limit: usize) -> Vec<String> {
        match self.fetch_tickers().await {
            Ok(tickers) => rank_pairs_by_volume(tickers, limit),
            Err(e) => {
                warn!("Falling back to default pairs: {}", e);
                FALLBACK_PAIRS.iter().take(limit).map(|s| s.to_string()).collect()
            }
        }
    }

    async fn fetch_tickers(&self) -> Result<Vec<BinanceTicker>> {
        let response = self.get("/ticker/24hr", &[]).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    fn name(&self) -> &str {
        "binance"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<CandleSeries> {
        let pair = exchange_pair(symbol);
        let limit = count.clamp(1, MAX_KLINES);
        debug!("Fetching {} {} klines for {}", limit, timeframe, pair);

        let response = self
            .get(
                "/klines",
                &[
                    ("symbol", pair),
                    ("interval", timeframe.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let rows: Vec<Vec<Value>> = response.json().await?;
        let candles = rows
            .iter()
            .map(|row| parse_kline_row(row))
            .collect::<Result<Vec<_>>>()?;

        CandleSeries::new(candles)
    }

    async fn fetch_current_price(&self, symbol: &str) -> Result<f64> {
        let response = self
            .get("/ticker/price", &[("symbol", exchange_pair(symbol))])
            .await?;
        let ticker: BinancePrice = response.json().await?;
        ticker
            .price
            .parse()
            .map_err(|_| EngineError::Retrieval(format!("unparseable price {:?}", ticker.price)))
    }
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn exchange_pair(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

/// Parse one kline row: `[openTime, open, high, low, close, volume, ...]`.
///
/// Prices arrive as strings.
pub fn parse_kline_row(row: &[Value]) -> Result<Candle> {
    let number = |idx: usize| -> Result<f64> {
        let value = match row.get(idx) {
            Some(Value::String(s)) => s.parse().ok(),
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        };
        value.ok_or_else(|| EngineError::Retrieval(format!("malformed kline field {}", idx)))
    };

    let timestamp = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| EngineError::Retrieval("malformed kline open time".to_string()))?;

    Ok(Candle {
        timestamp,
        open: number(1)?,
        high: number(2)?,
        low: number(3)?,
        close: number(4)?,
        volume: number(5)?,
    })
}

fn rank_pairs_by_volume(tickers: Vec<BinanceTicker>, limit: usize) -> Vec<String> {
    let mut pairs: Vec<(String, f64)> = tickers
        .into_iter()
        .filter_map(|t| {
            let base = t.symbol.strip_suffix(QUOTE_ASSET)?;
            let volume: f64 = t.quote_volume.parse().ok()?;
            if base.is_empty() || volume <= 0.0 {
                return None;
            }
            Some((format!("{}/{}", base, QUOTE_ASSET), volume))
        })
        .collect();

    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.into_iter().take(limit).map(|(pair, _)| pair).collect()
}
