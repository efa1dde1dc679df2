use clap::Subcommand;
use theta_data::{
    client::ThetaClient, error::DataError, query::QueryOptions, table::Table,
};

use super::RangeArgs;

#[derive(Subcommand, Debug)]
pub enum StocksCmd {
    /// Stock history for a symbol and date range
    Historical {
        #[command(subcommand)]
        cmd: HistoricalCmd,
    },

    /// Real-time stock snapshots
    Snapshot {
        #[command(subcommand)]
        cmd: SnapshotCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoricalCmd {
    /// End-of-day report
    EodReport {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// NBBO quotes aggregated by interval
    Quotes {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
        /// Aggregation interval in milliseconds, 0 for every quote
        #[arg(long, default_value_t = 900_000)]
        interval: u32,
    },

    /// OHLC bars aggregated by interval
    Ohlc {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
        /// Bar size in milliseconds
        #[arg(long, default_value_t = 900_000)]
        interval: u32,
    },

    /// Every trade
    Trades {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Every trade paired with the quote in effect at the time
    TradeQuote {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Stock splits
    Splits {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Dividends
    Dividends {
        symbol: String,
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCmd {
    /// Latest quote
    Quotes {
        symbol: String,
        /// nqb or utp_cta
        #[arg(long)]
        venue: Option<String>,
    },

    /// Latest quote for several symbols
    BulkQuotes {
        #[arg(required = true)]
        symbols: Vec<String>,
        /// nqb or utp_cta
        #[arg(long)]
        venue: Option<String>,
    },

    /// Current day OHLC
    Ohlc { symbol: String },

    /// Current day OHLC for several symbols
    BulkOhlc {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Last trade
    Trades { symbol: String },
}

pub async fn run(
    cmd: StocksCmd,
    client: &ThetaClient,
    write_csv: bool,
) -> Result<Option<Table>, DataError> {
    match cmd {
        StocksCmd::Historical { cmd } => historical(cmd, client, write_csv).await,
        StocksCmd::Snapshot { cmd } => snapshot(cmd, client, write_csv).await,
    }
}

async fn historical(
    cmd: HistoricalCmd,
    client: &ThetaClient,
    write_csv: bool,
) -> Result<Option<Table>, DataError> {
    let catalog = client.stock_historical().write_csv(write_csv);

    match cmd {
        HistoricalCmd::EodReport { symbol, range } => {
            catalog.eod_report(&symbol, &range.range()).await
        }
        HistoricalCmd::Quotes {
            symbol,
            range,
            interval,
        } => {
            catalog
                .options(QueryOptions::new().with_ivl(interval))
                .quotes(&symbol, &range.range())
                .await
        }
        HistoricalCmd::Ohlc {
            symbol,
            range,
            interval,
        } => {
            catalog
                .options(QueryOptions::new().with_ivl(interval))
                .ohlc(&symbol, &range.range())
                .await
        }
        HistoricalCmd::Trades { symbol, range } => catalog.trades(&symbol, &range.range()).await,
        HistoricalCmd::TradeQuote { symbol, range } => {
            catalog.trade_quote(&symbol, &range.range()).await
        }
        HistoricalCmd::Splits { symbol, range } => catalog.splits(&symbol, &range.range()).await,
        HistoricalCmd::Dividends { symbol, range } => {
            catalog.dividends(&symbol, &range.range()).await
        }
    }
}

async fn snapshot(
    cmd: SnapshotCmd,
    client: &ThetaClient,
    write_csv: bool,
) -> Result<Option<Table>, DataError> {
    let catalog = client.stock_snapshot().write_csv(write_csv);

    match cmd {
        SnapshotCmd::Quotes { symbol, venue } => {
            catalog
                .options(venue_options(venue))
                .quotes(&symbol)
                .await
        }
        SnapshotCmd::BulkQuotes { symbols, venue } => {
            catalog
                .options(venue_options(venue))
                .bulk_quotes(&symbols)
                .await
        }
        SnapshotCmd::Ohlc { symbol } => catalog.ohlc(&symbol).await,
        SnapshotCmd::BulkOhlc { symbols } => catalog.bulk_ohlc(&symbols).await,
        SnapshotCmd::Trades { symbol } => catalog.trades(&symbol).await,
    }
}

fn venue_options(venue: Option<String>) -> QueryOptions {
    match venue {
        Some(venue) => QueryOptions::new().with_venue(venue),
        None => QueryOptions::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_options() {
        assert!(venue_options(None).as_query().is_empty());
        assert_eq!(
            venue_options(Some("nqb".to_string()))
                .as_query()
                .get("venue")
                .map(ToString::to_string),
            Some("nqb".to_string())
        );
    }
}
