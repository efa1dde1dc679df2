use crate::error::DataError;
use chrono::Local;
use futures::{SinkExt, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    future::Future,
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info};

use self::{
    event::{StreamEvent, decode},
    stats::{DownloadStats, ReportTimer},
    subscription::Subscription,
    writer::StreamWriter,
};

/// Inbound frame decoding and CSV headers.
pub mod event;

/// Per-root event counters and the periodic report timer.
pub mod stats;

/// `STREAM_BULK` subscription model.
pub mod subscription;

/// Per-root CSV appender.
pub mod writer;

/// Default event-stream url of the local terminal.
pub const DEFAULT_STREAM_URL: &str = "ws://127.0.0.1:25520/v1/events";

/// Default interval between progress reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(60);

/// Bulk stream configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Event-stream WebSocket url
    pub url: String,
    /// Root of the `{trades|quotes}/{stocks|options}` output tree
    pub output_dir: PathBuf,
    /// Interval between progress reports
    pub report_interval: Duration,
    /// Show a progress spinner on stderr
    pub progress: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            output_dir: PathBuf::from("./"),
            report_interval: DEFAULT_REPORT_INTERVAL,
            progress: true,
        }
    }
}

impl StreamConfig {
    /// Create a new configuration with custom URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the progress report interval
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// Synchronous per-frame logic of a bulk stream: decode, append, count.
#[derive(Debug)]
pub struct StreamHandler {
    subscription: Subscription,
    writer: StreamWriter,
    stats: DownloadStats,
    timer: ReportTimer,
}

impl StreamHandler {
    pub fn new(
        subscription: Subscription,
        output_dir: impl Into<PathBuf>,
        report_interval: Duration,
    ) -> Self {
        Self {
            subscription,
            writer: StreamWriter::new(output_dir, subscription.req_type),
            stats: DownloadStats::new(subscription.req_type),
            timer: ReportTimer::new(report_interval),
        }
    }

    /// Handle one text frame, returning the file appended to or `None` if it was discarded.
    pub fn handle(&mut self, text: &str) -> Result<Option<PathBuf>, DataError> {
        let record = match decode(text, self.subscription.req_type)? {
            StreamEvent::Record(record) => record,
            StreamEvent::Ignore => return Ok(None),
        };

        let path = self.writer.append(&record)?;
        self.stats.record(&record.root);

        Ok(Some(path))
    }

    /// Progress report, if one is due.
    pub fn report_if_due(&mut self) -> Option<String> {
        self.timer
            .due(Instant::now())
            .then(|| self.stats.report(Local::now()))
    }

    pub fn stats(&self) -> &DownloadStats {
        &self.stats
    }

    pub fn into_stats(self) -> DownloadStats {
        self.stats
    }
}

/// Long-lived consumer of a terminal bulk event stream.
///
/// Connects once, sends the subscribe frame and appends every matching event to its per-root
/// CSV file until `shutdown` resolves. There is no reconnection: a dropped connection ends the
/// stream with an error.
#[derive(Debug, Clone)]
pub struct BulkStreamer {
    config: StreamConfig,
    subscription: Subscription,
}

impl BulkStreamer {
    /// Create a new streamer with default configuration
    pub fn new(subscription: Subscription) -> Self {
        Self::with_config(StreamConfig::default(), subscription)
    }

    /// Create a new streamer with custom configuration
    pub fn with_config(config: StreamConfig, subscription: Subscription) -> Self {
        Self {
            config,
            subscription,
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Run until `shutdown` resolves, returning the final [`DownloadStats`].
    pub async fn run<F>(self, shutdown: F) -> Result<DownloadStats, DataError>
    where
        F: Future<Output = ()>,
    {
        let (ws_stream, _) = connect_async(self.config.url.as_str())
            .await
            .map_err(|error| {
                DataError::Socket(format!("failed to connect to {}: {error}", self.config.url))
            })?;
        info!(url = %self.config.url, subscription = %self.subscription, "connected to event stream");

        let (mut write, mut read) = ws_stream.split();

        write
            .send(Message::text(self.subscription.to_message()?))
            .await
            .map_err(|error| DataError::Socket(format!("failed to send subscription: {error}")))?;

        let progress = self.progress_bar();
        let mut handler = StreamHandler::new(
            self.subscription,
            self.config.output_dir.clone(),
            self.config.report_interval,
        );

        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(subscription = %self.subscription, "shutting down event stream");
                    if let Err(error) = write.send(Message::Close(None)).await {
                        debug!(%error, "failed to send close frame");
                    }
                    break Ok(());
                }
                message = read.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        match handler.handle(text.as_str()) {
                            Ok(Some(_)) => {
                                progress.inc(1);
                                if let Some(report) = handler.report_if_due() {
                                    progress.suspend(|| println!("\n{report}"));
                                }
                            }
                            Ok(None) => {}
                            Err(error) => break Err(error),
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if let Err(error) = write.send(Message::Pong(payload)).await {
                            break Err(DataError::Socket(format!("failed to send pong: {error}")));
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        break Err(DataError::Socket(format!("event stream closed by terminal: {frame:?}")));
                    }
                    Some(Ok(other)) => {
                        debug!(?other, "ignoring non-text event stream message");
                    }
                    Some(Err(error)) => {
                        break Err(DataError::Socket(format!("event stream error: {error}")));
                    }
                    None => {
                        break Err(DataError::Socket("event stream terminated".to_string()));
                    }
                }
            }
        };

        progress.finish_and_clear();

        if let Err(error) = &outcome {
            error!(%error, subscription = %self.subscription, "event stream failed");
        }

        outcome.map(|()| handler.into_stats())
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} Downloading {msg} [{elapsed_precise}] {pos} ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message(self.subscription.req_type.mode());
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::subscription::{ReqType, SecType};
    use serde_json::json;

    fn trade_frame(root: &str, security_type: &str) -> String {
        json!({
            "header": {"type": "TRADE"},
            "contract": {
                "security_type": security_type, "root": root,
                "expiration": 20240119, "strike": 250000, "right": "C"
            },
            "trade": {
                "ms_of_day": 34200000, "sequence": 1, "size": 3, "condition": 0,
                "price": 4.2, "exchange": 4, "date": 20240102
            }
        })
        .to_string()
    }

    #[test]
    fn test_stream_config_default() {
        let config = StreamConfig::default();
        assert_eq!(config.url, "ws://127.0.0.1:25520/v1/events");
        assert_eq!(config.output_dir, PathBuf::from("./"));
        assert_eq!(config.report_interval, Duration::from_secs(60));
        assert!(config.progress);
    }

    #[test]
    fn test_stream_config_builder() {
        let config = StreamConfig::new("ws://localhost:1/v1/events")
            .with_output_dir("/tmp/stream")
            .with_report_interval(Duration::from_secs(5))
            .with_progress(false);

        assert_eq!(config.url, "ws://localhost:1/v1/events");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/stream"));
        assert_eq!(config.report_interval, Duration::from_secs(5));
        assert!(!config.progress);
    }

    #[test]
    fn test_stream_handler_appends_matching_events_only() {
        let dir = tempfile::tempdir().unwrap();
        let subscription = Subscription::new(SecType::Stock, ReqType::Trade, 1);
        let mut handler = StreamHandler::new(subscription, dir.path(), DEFAULT_REPORT_INTERVAL);

        let path = handler.handle(&trade_frame("TSLA", "STOCK")).unwrap();
        assert_eq!(
            path,
            Some(dir.path().join("trades").join("stocks").join("TSLA.csv"))
        );

        let quote = json!({"header": {"type": "QUOTE"}, "contract": {"security_type": "STOCK", "root": "TSLA"}});
        assert_eq!(handler.handle(&quote.to_string()).unwrap(), None);

        let content = std::fs::read_to_string(dir.path().join("trades/stocks/TSLA.csv")).unwrap();
        assert_eq!(
            content,
            "date,ms_of_day,sequence,size,condition,price,exchange\n20240102,34200000,1,3,0,4.2,4\n"
        );
        assert_eq!(handler.stats().count("TSLA"), 1);
    }

    #[test]
    fn test_stream_handler_writes_option_contract_columns() {
        let dir = tempfile::tempdir().unwrap();
        let subscription = Subscription::new(SecType::Option, ReqType::Trade, 1);
        let mut handler = StreamHandler::new(subscription, dir.path(), DEFAULT_REPORT_INTERVAL);

        handler.handle(&trade_frame("AAPL", "OPTION")).unwrap();
        handler.handle(&trade_frame("AAPL", "OPTION")).unwrap();

        let content = std::fs::read_to_string(dir.path().join("trades/options/AAPL.csv")).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "20240102,34200000,1,3,0,4.2,4,20240119,250000,C");
        assert_eq!(handler.into_stats().total(), 2);
    }

    #[test]
    fn test_stream_handler_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let subscription = Subscription::new(SecType::Stock, ReqType::Quote, 1);
        let mut handler = StreamHandler::new(subscription, dir.path(), DEFAULT_REPORT_INTERVAL);

        assert!(matches!(handler.handle("not json"), Err(DataError::Decode(_))));
    }

    #[test]
    fn test_stream_handler_report_respects_interval() {
        let dir = tempfile::tempdir().unwrap();
        let subscription = Subscription::new(SecType::Stock, ReqType::Trade, 1);

        let mut immediate = StreamHandler::new(subscription, dir.path(), Duration::ZERO);
        assert!(immediate.report_if_due().is_some());

        let mut hourly = StreamHandler::new(subscription, dir.path(), Duration::from_secs(3600));
        assert!(hourly.report_if_due().is_none());
    }
}
