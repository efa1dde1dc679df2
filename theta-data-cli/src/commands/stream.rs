use anyhow::Result;
use chrono::Local;
use clap::{Args, ValueEnum};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use theta_data::stream::{
    BulkStreamer, StreamConfig,
    subscription::{ReqType, SecType, Subscription},
};
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Event kind to download
    #[arg(value_enum)]
    pub kind: Kind,

    /// Security class to subscribe to
    #[arg(long, value_enum)]
    pub sec_type: Security,

    /// Subscription id echoed back by the terminal
    #[arg(long, default_value_t = 0)]
    pub id: u64,

    /// Seconds between progress reports
    #[arg(long, default_value_t = 60)]
    pub report_interval: u64,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum Kind {
    Trades,
    Quotes,
}

impl From<Kind> for ReqType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Trades => ReqType::Trade,
            Kind::Quotes => ReqType::Quote,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum Security {
    Stock,
    Option,
}

impl From<Security> for SecType {
    fn from(security: Security) -> Self {
        match security {
            Security::Stock => SecType::Stock,
            Security::Option => SecType::Option,
        }
    }
}

pub async fn run(args: StreamArgs, url: String, output_dir: PathBuf) -> Result<ExitCode> {
    let config = StreamConfig::new(url)
        .with_output_dir(output_dir)
        .with_report_interval(Duration::from_secs(args.report_interval))
        .with_progress(!args.no_progress);

    let subscription = Subscription::new(args.sec_type.into(), args.kind.into(), args.id);

    let stats = BulkStreamer::with_config(config, subscription)
        .run(ctrl_c())
        .await?;

    println!("{}", stats.report(Local::now()));
    Ok(ExitCode::SUCCESS)
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C"),
        Err(error) => {
            // Without a signal handler the stream only ends when the terminal disconnects
            error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await
        }
    }
}
