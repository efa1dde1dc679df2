use std::time::Duration;
use theta_data::stream::{
    BulkStreamer, StreamConfig,
    subscription::{ReqType, SecType, Subscription},
};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Initialise INFO Tracing log subscriber
    init_logging();

    let config = StreamConfig::default()
        .with_output_dir("./stream")
        .with_report_interval(Duration::from_secs(30));

    // Every option trade, appended to ./stream/trades/options/{root}.csv
    let streamer =
        BulkStreamer::with_config(config, Subscription::new(SecType::Option, ReqType::Trade, 0));

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for ctrl-c");
        }
    };

    match streamer.run(shutdown).await {
        Ok(stats) => {
            for (root, count) in stats.counts() {
                info!(root, count, "trades downloaded");
            }
            println!("Total trades downloaded: {}", stats.total());
        }
        Err(error) => warn!(%error, "event stream ended"),
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
