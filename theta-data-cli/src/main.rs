use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use theta_data::{
    client::{ClientConfig, ThetaClient},
    stream::DEFAULT_STREAM_URL,
    transport::DEFAULT_BASE_URL,
};
use tracing_subscriber::EnvFilter;

use crate::commands::{
    OutputArgs,
    options::{OptionsCmd, ParamArgs},
    stocks::StocksCmd,
    stream::StreamArgs,
};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "theta-data")]
#[command(about = "Query and stream market data from a local ThetaData terminal", long_about = None)]
struct Cli {
    /// Directory CSV exports and stream files are written to
    #[arg(long, global = true, default_value = "./")]
    output_dir: PathBuf,

    /// Log filter directive, eg/ `info` or `theta_data=debug`
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Terminal REST base url
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Terminal event-stream url
    #[arg(long, global = true, default_value = DEFAULT_STREAM_URL)]
    ws_url: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stock history and snapshots
    Stocks {
        #[command(flatten)]
        output: OutputArgs,

        #[command(subcommand)]
        cmd: StocksCmd,
    },

    /// Option history, bulk history and snapshots
    Options {
        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        params: ParamArgs,

        #[command(subcommand)]
        cmd: OptionsCmd,
    },

    /// Append every trade or quote of a security class to per-root CSV files until Ctrl-C
    Stream(StreamArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    match cli.cmd {
        Commands::Stocks { output, cmd } => {
            let client = client(&cli.base_url, &cli.output_dir)?;
            let table =
                output::with_spinner(commands::stocks::run(cmd, &client, output.write_csv)).await?;
            output::emit(table, output.output_file.as_deref())
        }

        Commands::Options {
            output,
            params,
            cmd,
        } => {
            let client = client(&cli.base_url, &cli.output_dir)?;
            let table = output::with_spinner(commands::options::run(
                cmd,
                &client,
                output.write_csv,
                &params,
            ))
            .await?;
            output::emit(table, output.output_file.as_deref())
        }

        Commands::Stream(args) => commands::stream::run(args, cli.ws_url, cli.output_dir).await,
    }
}

fn client(base_url: &str, output_dir: &Path) -> Result<ThetaClient> {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_output_dir(output_dir);

    Ok(ThetaClient::with_config(config)?)
}

// Initialise a `Subscriber` for `Tracing` logs on stderr, leaving stdout for tables.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        // Filter messages based on the --log-level directive
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions))
        // Install this Tracing subscriber as global default
        .init()
}
