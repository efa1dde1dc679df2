use theta_data::{
    catalog::{DateRange, OptionChain},
    client::{ClientConfig, ThetaClient},
    query::QueryOptions,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Initialise INFO Tracing log subscriber
    init_logging();

    // Terminal must be running locally on the default port
    let client = match ThetaClient::with_config(ClientConfig::default().with_output_dir("./data")) {
        Ok(client) => client,
        Err(error) => {
            warn!(%error, "failed to construct client");
            return;
        }
    };

    let range = DateRange::new("20240102", "20240131");

    for symbol in ["AAPL", "MSFT", "NVDA"] {
        match client.stock_historical().write_csv(true).eod_report(symbol, &range).await {
            Ok(Some(table)) => info!(symbol, rows = table.len(), "fetched end-of-day report"),
            Ok(None) => warn!(symbol, "no end-of-day report"),
            Err(error) => warn!(symbol, %error, "invalid request"),
        }
    }

    // Chain wide end-of-day Greeks, using a fixed risk-free rate instead of SOFR
    let greeks = client
        .option_bulk()
        .options(QueryOptions::new().with_rate_value(0.0525))
        .eod_greeks(&OptionChain::new("SPY", "20240119"), &range)
        .await;

    match greeks {
        Ok(Some(table)) => println!("{table}"),
        Ok(None) => warn!("no end-of-day Greeks"),
        Err(error) => warn!(%error, "invalid request"),
    }
}

// Initialise an INFO `Subscriber` for `Tracing` logs and install it as the global default.
fn init_logging() {
    tracing_subscriber::fmt()
        // Filter messages based on the INFO level
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions))
        // Install this Tracing subscriber as global default
        .init()
}
