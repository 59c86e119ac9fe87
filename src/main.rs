use augur::{rank_by_probability, BinanceClient, Config, SignalGenerator};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let client = Arc::new(BinanceClient::new(
        config.binance_api_url.clone(),
        config.binance_api_key.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));

    let symbols = if config.symbols.is_empty() {
        client.top_volume_pairs(config.top_pairs_limit).await
    } else {
        config.symbols.clone()
    };

    info!(
        "Generating {} signals for {} symbols",
        config.timeframe,
        symbols.len()
    );

    let generator = SignalGenerator::new(client, config.signals.clone(), config.batch.clone());
    let mut signals = generator
        .generate_signals_batch(&symbols, config.timeframe)
        .await;
    rank_by_probability(&mut signals);

    info!("{} of {} symbols produced a signal", signals.len(), symbols.len());

    let body = json!({
        "total": signals.len(),
        "signals": signals,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
