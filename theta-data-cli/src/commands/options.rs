use clap::{Args, Subcommand};
use theta_data::{
    client::ThetaClient, error::DataError, query::QueryOptions, table::Table,
};

use super::{ChainArgs, ContractArgs, RangeArgs};

/// Optional server-side parameters. Endpoints that do not accept a parameter ignore it.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Regular trading hours only, true unless set to false
    #[arg(long, global = true)]
    pub rth: Option<bool>,

    /// Session start, milliseconds after midnight ET
    #[arg(long, global = true)]
    pub start_time: Option<String>,

    /// Session end, milliseconds after midnight ET
    #[arg(long, global = true)]
    pub end_time: Option<String>,

    /// Ask the terminal to build the response as CSV server-side
    #[arg(long, global = true)]
    pub use_csv: bool,

    /// Exclude the quote at the exact time of the trade
    #[arg(long, global = true)]
    pub exclusive: bool,

    /// Trade Greeks performance mode
    #[arg(long, global = true)]
    pub perf_boost: bool,

    /// Annualised dividend for Greeks
    #[arg(long, global = true)]
    pub annual_div: Option<f64>,

    /// Interest rate series for Greeks, eg/ SOFR
    #[arg(long, global = true)]
    pub rate: Option<String>,

    /// Explicit interest rate for Greeks, overrides --rate
    #[arg(long, global = true)]
    pub rate_value: Option<f64>,

    /// Underlying price for Greeks
    #[arg(long, global = true)]
    pub under_price: Option<f64>,
}

impl ParamArgs {
    /// [`QueryOptions`] holding every parameter set on the command line, plus `ivl` if given.
    pub fn options(&self, ivl: Option<u32>) -> QueryOptions {
        let mut options = QueryOptions::new();

        if let Some(ivl) = ivl {
            options = options.with_ivl(ivl);
        }
        if let Some(rth) = self.rth {
            options = options.with_rth(rth);
        }
        if let Some(start_time) = &self.start_time {
            options = options.with_start_time(start_time.as_str());
        }
        if let Some(end_time) = &self.end_time {
            options = options.with_end_time(end_time.as_str());
        }
        if self.use_csv {
            options = options.with_use_csv(true);
        }
        if self.exclusive {
            options = options.with_exclusive(true);
        }
        if self.perf_boost {
            options = options.with_perf_boost(true);
        }
        if let Some(annual_div) = self.annual_div {
            options = options.with_annual_div(annual_div);
        }
        if let Some(rate) = &self.rate {
            options = options.with_rate(rate.as_str());
        }
        if let Some(rate_value) = self.rate_value {
            options = options.with_rate_value(rate_value);
        }
        if let Some(under_price) = self.under_price {
            options = options.with_under_price(under_price);
        }

        options
    }
}

#[derive(Subcommand, Debug)]
pub enum OptionsCmd {
    /// Single contract history
    Historical {
        #[command(subcommand)]
        cmd: HistoricalCmd,
    },

    /// History for every contract of a root and expiration
    Bulk {
        #[command(subcommand)]
        cmd: BulkCmd,
    },

    /// Real-time snapshots
    Snapshot {
        #[command(subcommand)]
        cmd: SnapshotCmd,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ContractRange {
    #[command(flatten)]
    pub contract: ContractArgs,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ChainRange {
    #[command(flatten)]
    pub chain: ChainArgs,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Subcommand, Debug)]
pub enum HistoricalCmd {
    /// Quote in effect at a time of day on each date
    QuoteAtTime {
        #[command(flatten)]
        key: ContractRange,
        /// Milliseconds after midnight ET
        ms_of_day: u32,
    },

    /// Last trade at a time of day on each date
    TradeAtTime {
        #[command(flatten)]
        key: ContractRange,
        /// Milliseconds after midnight ET
        ms_of_day: u32,
    },

    /// End-of-day report
    EodReport {
        #[command(flatten)]
        key: ContractRange,
    },

    /// NBBO quotes
    Quotes {
        #[command(flatten)]
        key: ContractRange,
        /// Aggregation interval in milliseconds, every quote if omitted
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// OHLC bars
    Ohlc {
        #[command(flatten)]
        key: ContractRange,
        /// Bar size in milliseconds
        interval: u32,
    },

    /// Open interest
    OpenInterest {
        #[command(flatten)]
        key: ContractRange,
    },

    /// Every trade
    Trades {
        #[command(flatten)]
        key: ContractRange,
    },

    /// Every trade paired with the quote in effect at the time
    TradeQuote {
        #[command(flatten)]
        key: ContractRange,
    },

    /// Implied volatility of the bid, mid and ask
    ImpliedVolatility {
        #[command(flatten)]
        key: ContractRange,
        /// Sampling interval in milliseconds
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// First order Greeks
    Greeks {
        #[command(flatten)]
        key: ContractRange,
        /// Sampling interval in milliseconds
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// Second order Greeks
    GreeksSecondOrder {
        #[command(flatten)]
        key: ContractRange,
        /// Sampling interval in milliseconds
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// Third order Greeks
    GreeksThirdOrder {
        #[command(flatten)]
        key: ContractRange,
        /// Sampling interval in milliseconds
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// First, second and third order Greeks
    AllGreeks {
        #[command(flatten)]
        key: ContractRange,
        /// Sampling interval in milliseconds
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// First order Greeks at every trade
    TradeGreeks {
        #[command(flatten)]
        key: ContractRange,
    },

    /// Second order Greeks at every trade
    TradeGreeksSecondOrder {
        #[command(flatten)]
        key: ContractRange,
    },

    /// Third order Greeks at every trade
    TradeGreeksThirdOrder {
        #[command(flatten)]
        key: ContractRange,
    },
}

#[derive(Subcommand, Debug)]
pub enum BulkCmd {
    /// Quote in effect at a time of day, for every contract
    QuoteAtTime {
        #[command(flatten)]
        key: ChainRange,
        /// Milliseconds after midnight ET
        ms_of_day: u32,
    },

    /// Last trade at a time of day, for every contract
    TradeAtTime {
        #[command(flatten)]
        key: ChainRange,
        /// Milliseconds after midnight ET
        ms_of_day: u32,
    },

    /// End-of-day reports with Greeks
    Eod {
        #[command(flatten)]
        key: ChainRange,
    },

    /// NBBO quotes
    Quotes {
        #[command(flatten)]
        key: ChainRange,
        /// Aggregation interval in milliseconds
        interval: u32,
    },

    /// OHLC bars
    Ohlc {
        #[command(flatten)]
        key: ChainRange,
        /// Bar size in milliseconds
        interval: u32,
    },

    /// Open interest
    OpenInterest {
        #[command(flatten)]
        key: ChainRange,
    },

    /// Every trade, or trades aggregated by --ivl
    Trades {
        #[command(flatten)]
        key: ChainRange,
        /// Aggregation interval in milliseconds
        #[arg(long)]
        ivl: Option<u32>,
    },

    /// Every trade paired with the quote in effect at the time
    TradeQuote {
        #[command(flatten)]
        key: ChainRange,
    },

    /// End-of-day Greeks
    EodGreeks {
        #[command(flatten)]
        key: ChainRange,
    },

    /// Greeks at every trade
    TradeGreeks {
        #[command(flatten)]
        key: ChainRange,
    },
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCmd {
    /// Latest quote
    Quotes {
        #[command(flatten)]
        contract: ContractArgs,
    },

    /// Current day OHLC
    Ohlc {
        #[command(flatten)]
        contract: ContractArgs,
    },

    /// Last trade
    Trades {
        #[command(flatten)]
        contract: ContractArgs,
    },

    /// Open interest
    OpenInterest {
        #[command(flatten)]
        contract: ContractArgs,
    },

    /// Latest quote for every contract
    BulkQuotes {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// Open interest for every contract
    BulkOpenInterest {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// Current day OHLC for every contract
    BulkOhlc {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// First order Greeks for every contract
    BulkGreeks {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// Second order Greeks for every contract
    BulkGreeksSecondOrder {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// Third order Greeks for every contract
    BulkGreeksThirdOrder {
        #[command(flatten)]
        chain: ChainArgs,
    },
}

pub async fn run(
    cmd: OptionsCmd,
    client: &ThetaClient,
    write_csv: bool,
    params: &ParamArgs,
) -> Result<Option<Table>, DataError> {
    match cmd {
        OptionsCmd::Historical { cmd } => historical(cmd, client, write_csv, params).await,
        OptionsCmd::Bulk { cmd } => bulk(cmd, client, write_csv, params).await,
        OptionsCmd::Snapshot { cmd } => snapshot(cmd, client, write_csv, params).await,
    }
}

async fn historical(
    cmd: HistoricalCmd,
    client: &ThetaClient,
    write_csv: bool,
    params: &ParamArgs,
) -> Result<Option<Table>, DataError> {
    let ivl = match &cmd {
        HistoricalCmd::Quotes { ivl, .. }
        | HistoricalCmd::ImpliedVolatility { ivl, .. }
        | HistoricalCmd::Greeks { ivl, .. }
        | HistoricalCmd::GreeksSecondOrder { ivl, .. }
        | HistoricalCmd::GreeksThirdOrder { ivl, .. }
        | HistoricalCmd::AllGreeks { ivl, .. } => *ivl,
        _ => None,
    };

    let catalog = client
        .option_historical()
        .write_csv(write_csv)
        .options(params.options(ivl));

    match cmd {
        HistoricalCmd::QuoteAtTime { key, ms_of_day } => {
            catalog
                .quote_at_time(&key.contract.contract(), &key.range.range(), ms_of_day)
                .await
        }
        HistoricalCmd::TradeAtTime { key, ms_of_day } => {
            catalog
                .trade_at_time(&key.contract.contract(), &key.range.range(), ms_of_day)
                .await
        }
        HistoricalCmd::EodReport { key } => {
            catalog
                .eod_report(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::Quotes { key, .. } => {
            catalog
                .quotes(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::Ohlc { key, interval } => {
            catalog
                .ohlc(&key.contract.contract(), &key.range.range(), interval)
                .await
        }
        HistoricalCmd::OpenInterest { key } => {
            catalog
                .open_interest(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::Trades { key } => {
            catalog
                .trades(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::TradeQuote { key } => {
            catalog
                .trade_quote(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::ImpliedVolatility { key, .. } => {
            catalog
                .implied_volatility(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::Greeks { key, .. } => {
            catalog
                .greeks(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::GreeksSecondOrder { key, .. } => {
            catalog
                .greeks_second_order(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::GreeksThirdOrder { key, .. } => {
            catalog
                .greeks_third_order(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::AllGreeks { key, .. } => {
            catalog
                .all_greeks(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::TradeGreeks { key } => {
            catalog
                .trade_greeks(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::TradeGreeksSecondOrder { key } => {
            catalog
                .trade_greeks_second_order(&key.contract.contract(), &key.range.range())
                .await
        }
        HistoricalCmd::TradeGreeksThirdOrder { key } => {
            catalog
                .trade_greeks_third_order(&key.contract.contract(), &key.range.range())
                .await
        }
    }
}

async fn bulk(
    cmd: BulkCmd,
    client: &ThetaClient,
    write_csv: bool,
    params: &ParamArgs,
) -> Result<Option<Table>, DataError> {
    let ivl = match &cmd {
        BulkCmd::Trades { ivl, .. } => *ivl,
        _ => None,
    };

    let catalog = client
        .option_bulk()
        .write_csv(write_csv)
        .options(params.options(ivl));

    match cmd {
        BulkCmd::QuoteAtTime { key, ms_of_day } => {
            catalog
                .quote_at_time(&key.chain.chain(), &key.range.range(), ms_of_day)
                .await
        }
        BulkCmd::TradeAtTime { key, ms_of_day } => {
            catalog
                .trade_at_time(&key.chain.chain(), &key.range.range(), ms_of_day)
                .await
        }
        BulkCmd::Eod { key } => catalog.eod(&key.chain.chain(), &key.range.range()).await,
        BulkCmd::Quotes { key, interval } => {
            catalog
                .quotes(&key.chain.chain(), &key.range.range(), interval)
                .await
        }
        BulkCmd::Ohlc { key, interval } => {
            catalog
                .ohlc(&key.chain.chain(), &key.range.range(), interval)
                .await
        }
        BulkCmd::OpenInterest { key } => {
            catalog
                .open_interest(&key.chain.chain(), &key.range.range())
                .await
        }
        BulkCmd::Trades { key, .. } => {
            catalog
                .trades(&key.chain.chain(), &key.range.range())
                .await
        }
        BulkCmd::TradeQuote { key } => {
            catalog
                .trade_quote(&key.chain.chain(), &key.range.range())
                .await
        }
        BulkCmd::EodGreeks { key } => {
            catalog
                .eod_greeks(&key.chain.chain(), &key.range.range())
                .await
        }
        BulkCmd::TradeGreeks { key } => {
            catalog
                .trade_greeks(&key.chain.chain(), &key.range.range())
                .await
        }
    }
}

async fn snapshot(
    cmd: SnapshotCmd,
    client: &ThetaClient,
    write_csv: bool,
    params: &ParamArgs,
) -> Result<Option<Table>, DataError> {
    let catalog = client
        .option_snapshot()
        .write_csv(write_csv)
        .options(params.options(None));

    match cmd {
        SnapshotCmd::Quotes { contract } => catalog.quotes(&contract.contract()).await,
        SnapshotCmd::Ohlc { contract } => catalog.ohlc(&contract.contract()).await,
        SnapshotCmd::Trades { contract } => catalog.trades(&contract.contract()).await,
        SnapshotCmd::OpenInterest { contract } => {
            catalog.open_interest(&contract.contract()).await
        }
        SnapshotCmd::BulkQuotes { chain } => catalog.bulk_quotes(&chain.chain()).await,
        SnapshotCmd::BulkOpenInterest { chain } => {
            catalog.bulk_open_interest(&chain.chain()).await
        }
        SnapshotCmd::BulkOhlc { chain } => catalog.bulk_ohlc(&chain.chain()).await,
        SnapshotCmd::BulkGreeks { chain } => catalog.bulk_greeks(&chain.chain()).await,
        SnapshotCmd::BulkGreeksSecondOrder { chain } => {
            catalog.bulk_greeks_second_order(&chain.chain()).await
        }
        SnapshotCmd::BulkGreeksThirdOrder { chain } => {
            catalog.bulk_greeks_third_order(&chain.chain()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_args_only_forward_supplied_values() {
        struct TestCase {
            input: (ParamArgs, Option<u32>),
            expected: Vec<(&'static str, String)>,
        }

        let tests = vec![
            TestCase {
                // TC0: nothing supplied
                input: (ParamArgs::default(), None),
                expected: vec![],
            },
            TestCase {
                // TC1: interval and session bounds
                input: (
                    ParamArgs {
                        rth: Some(false),
                        start_time: Some("34200000".to_string()),
                        ..Default::default()
                    },
                    Some(60_000),
                ),
                expected: vec![
                    ("ivl", "60000".to_string()),
                    ("rth", "false".to_string()),
                    ("start_time", "34200000".to_string()),
                ],
            },
            TestCase {
                // TC2: Greeks inputs and flags
                input: (
                    ParamArgs {
                        exclusive: true,
                        rate: Some("TREASURY_M1".to_string()),
                        under_price: Some(185.5),
                        ..Default::default()
                    },
                    None,
                ),
                expected: vec![
                    ("exclusive", "true".to_string()),
                    ("rate", "TREASURY_M1".to_string()),
                    ("under_price", "185.5".to_string()),
                ],
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let (params, ivl) = test.input;
            let actual = params.options(ivl).as_query().pairs();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
