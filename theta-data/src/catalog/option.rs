use super::{
    Catalog, DateRange, OptionBulk, OptionChain, OptionContract, OptionHistorical, OptionSnapshot,
};
use crate::{
    endpoint::{Endpoint, OptionalParam, Rule},
    error::DataError,
    query::ParamValue,
    table::Table,
    transport::Transport,
};

const CONTRACT_KEY: &[&str] = &["root", "exp", "strike", "right"];
const CONTRACT_RANGE_KEY: &[&str] = &["root", "exp", "strike", "right", "start_date", "end_date"];
const CONTRACT_RANGE_IVL_KEY: &[&str] = &[
    "root",
    "exp",
    "strike",
    "right",
    "start_date",
    "end_date",
    "ivl",
];
const CHAIN_KEY: &[&str] = &["root", "exp"];
const CHAIN_RANGE_KEY: &[&str] = &["root", "exp", "start_date", "end_date"];
const CHAIN_RANGE_IVL_KEY: &[&str] = &["root", "exp", "start_date", "end_date", "ivl"];

const RTH: OptionalParam = OptionalParam::with_default("rth", ParamValue::Bool(true));
const USE_CSV: OptionalParam = OptionalParam::with_default("use_csv", ParamValue::Bool(false));
const EXCLUSIVE: OptionalParam = OptionalParam::with_default("exclusive", ParamValue::Bool(false));
const PERF_BOOST: OptionalParam =
    OptionalParam::with_default("perf_boost", ParamValue::Bool(false));
const START_TIME: OptionalParam = OptionalParam::new("start_time");
const END_TIME: OptionalParam = OptionalParam::new("end_time");
const ANNUAL_DIV: OptionalParam = OptionalParam::new("annual_div");
const RATE: OptionalParam = OptionalParam::new("rate");
const RATE_VALUE: OptionalParam = OptionalParam::new("rate_value");
const UNDER_PRICE: OptionalParam = OptionalParam::new("under_price");

// At-time

pub static AT_TIME_QUOTE: Endpoint = Endpoint {
    path: "/v2/at_time/option/quote",
    category: "option_quote_at_time",
    required: CONTRACT_RANGE_IVL_KEY,
    optional: &[RTH],
    rules: &[Rule::Right, Rule::Interval, Rule::DateRange],
};

pub static AT_TIME_TRADE: Endpoint = Endpoint {
    path: "/v2/at_time/option/trade",
    category: "option_trade_at_time",
    required: CONTRACT_RANGE_IVL_KEY,
    optional: &[RTH],
    rules: &[Rule::Right, Rule::Interval, Rule::DateRange],
};

pub static BULK_AT_TIME_QUOTE: Endpoint = Endpoint {
    path: "/v2/bulk_at_time/option/quote",
    category: "bulk_option_quote_at_time",
    required: CHAIN_RANGE_IVL_KEY,
    optional: &[RTH],
    rules: &[Rule::Interval, Rule::DateRange],
};

pub static BULK_AT_TIME_TRADE: Endpoint = Endpoint {
    path: "/v2/bulk_at_time/option/trade",
    category: "bulk_option_trade_at_time",
    required: CHAIN_RANGE_IVL_KEY,
    optional: &[RTH],
    rules: &[Rule::Interval, Rule::DateRange],
};

// Historical, single contract

pub static HIST_EOD: Endpoint = Endpoint {
    path: "/v2/hist/option/eod",
    category: "historical_eod",
    required: CONTRACT_RANGE_KEY,
    optional: &[],
    rules: &[Rule::Right, Rule::DateRange],
};

pub static HIST_QUOTES: Endpoint = Endpoint {
    path: "/v2/hist/option/quote",
    category: "historical_quotes",
    required: CONTRACT_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("ivl", ParamValue::Int(0)),
        RTH,
        START_TIME,
        END_TIME,
    ],
    rules: &[Rule::Right, Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_OHLC: Endpoint = Endpoint {
    path: "/v2/hist/option/ohlc",
    category: "historical_ohlc",
    required: CONTRACT_RANGE_IVL_KEY,
    optional: &[RTH, START_TIME, END_TIME],
    rules: &[Rule::Right, Rule::Interval, Rule::DateRange],
};

pub static HIST_OPEN_INTEREST: Endpoint = Endpoint {
    path: "/v2/hist/option/open_interest",
    category: "historical_open_interest",
    required: CONTRACT_RANGE_KEY,
    optional: &[],
    rules: &[Rule::Right, Rule::DateRange],
};

pub static HIST_TRADES: Endpoint = Endpoint {
    path: "/v2/hist/option/trade",
    category: "historical_trades",
    required: CONTRACT_RANGE_KEY,
    optional: &[USE_CSV, START_TIME, END_TIME],
    rules: &[Rule::Right, Rule::DateRange],
};

pub static HIST_TRADE_QUOTE: Endpoint = Endpoint {
    path: "/v2/hist/option/trade_quote",
    category: "historical_trade_quote",
    required: CONTRACT_RANGE_KEY,
    optional: &[EXCLUSIVE, RTH, USE_CSV],
    rules: &[Rule::Right, Rule::DateRange],
};

pub static HIST_IMPLIED_VOLATILITY: Endpoint = Endpoint {
    path: "/v2/hist/option/implied_volatility",
    category: "historical_implied_volatility",
    required: CONTRACT_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("ivl", ParamValue::Int(900_000)),
        RTH,
        USE_CSV,
    ],
    rules: &[Rule::Right, Rule::Interval, Rule::DateRange],
};

pub static HIST_GREEKS: Endpoint = Endpoint {
    path: "/v2/hist/option/greeks",
    category: "historical_greeks",
    required: CONTRACT_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("ivl", ParamValue::Int(0)),
        RTH,
        USE_CSV,
    ],
    rules: &[Rule::Right, Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_GREEKS_SECOND_ORDER: Endpoint = Endpoint {
    path: "/v2/hist/option/greeks_second_order",
    category: "historical_greeks_second_order",
    required: CONTRACT_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("ivl", ParamValue::Int(0)),
        RTH,
        USE_CSV,
    ],
    rules: &[Rule::Right, Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_GREEKS_THIRD_ORDER: Endpoint = Endpoint {
    path: "/v2/hist/option/greeks_third_order",
    category: "historical_greeks_third_order",
    required: CONTRACT_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("ivl", ParamValue::Int(0)),
        RTH,
        USE_CSV,
    ],
    rules: &[Rule::Right, Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_ALL_GREEKS: Endpoint = Endpoint {
    path: "/v2/hist/option/all_greeks",
    category: "historical_all_greeks",
    required: CONTRACT_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("ivl", ParamValue::Int(900_000)),
        RTH,
        USE_CSV,
    ],
    rules: &[Rule::Right, Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_TRADE_GREEKS: Endpoint = Endpoint {
    path: "/v2/hist/option/trade_greeks",
    category: "historical_trade_greeks",
    required: CONTRACT_RANGE_KEY,
    optional: &[PERF_BOOST, USE_CSV],
    rules: &[Rule::Right, Rule::DateRange],
};

pub static HIST_TRADE_GREEKS_SECOND_ORDER: Endpoint = Endpoint {
    path: "/v2/hist/option/trade_greeks_second_order",
    category: "historical_trade_greeks_second_order",
    required: CONTRACT_RANGE_KEY,
    optional: &[PERF_BOOST, USE_CSV],
    rules: &[Rule::Right, Rule::DateRange],
};

pub static HIST_TRADE_GREEKS_THIRD_ORDER: Endpoint = Endpoint {
    path: "/v2/hist/option/trade_greeks_third_order",
    category: "historical_trade_greeks_third_order",
    required: CONTRACT_RANGE_KEY,
    optional: &[PERF_BOOST, USE_CSV],
    rules: &[Rule::Right, Rule::DateRange],
};

// Historical, whole chain

pub static BULK_HIST_EOD: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/eod",
    category: "bulk_option_eod",
    required: CHAIN_RANGE_KEY,
    optional: &[
        OptionalParam::with_default("annual_div", ParamValue::Int(0)),
        OptionalParam::with_default("rate", ParamValue::text("SOFR")),
        RATE_VALUE,
        UNDER_PRICE,
        USE_CSV,
    ],
    rules: &[Rule::DateRange],
};

pub static BULK_HIST_QUOTES: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/quote",
    category: "bulk_option_quote",
    required: CHAIN_RANGE_IVL_KEY,
    optional: &[START_TIME, END_TIME, USE_CSV],
    rules: &[Rule::Interval, Rule::DateRange],
};

pub static BULK_HIST_OHLC: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/ohlc",
    category: "bulk_option_ohlc",
    required: CHAIN_RANGE_IVL_KEY,
    optional: &[START_TIME, END_TIME, USE_CSV],
    rules: &[Rule::Interval, Rule::DateRange],
};

pub static BULK_HIST_OPEN_INTEREST: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/open_interest",
    category: "bulk_option_open_interest",
    required: CHAIN_RANGE_KEY,
    optional: &[USE_CSV],
    rules: &[Rule::DateRange],
};

pub static BULK_HIST_TRADES: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/trade",
    category: "bulk_option_trade",
    required: CHAIN_RANGE_KEY,
    optional: &[OptionalParam::new("ivl"), START_TIME, END_TIME, USE_CSV],
    rules: &[Rule::Interval, Rule::DateRange],
};

pub static BULK_HIST_TRADE_QUOTE: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/trade_quote",
    category: "bulk_option_trade_quote",
    required: CHAIN_RANGE_KEY,
    optional: &[EXCLUSIVE, USE_CSV],
    rules: &[Rule::DateRange],
};

pub static BULK_HIST_EOD_GREEKS: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/eod_greeks",
    category: "bulk_option_eod_greeks",
    required: CHAIN_RANGE_KEY,
    optional: &[ANNUAL_DIV, RATE, RATE_VALUE, UNDER_PRICE, USE_CSV],
    rules: &[Rule::DateRange],
};

pub static BULK_HIST_TRADE_GREEKS: Endpoint = Endpoint {
    path: "/v2/bulk_hist/option/trade_greeks",
    category: "bulk_option_trade_greeks",
    required: CHAIN_RANGE_KEY,
    optional: &[
        ANNUAL_DIV,
        RATE,
        RATE_VALUE,
        UNDER_PRICE,
        PERF_BOOST,
        USE_CSV,
    ],
    rules: &[Rule::DateRange],
};

// Snapshot

pub static SNAPSHOT_QUOTES: Endpoint = Endpoint {
    path: "/v2/snapshot/option/quote",
    category: "option_quote_snapshot",
    required: CONTRACT_KEY,
    optional: &[USE_CSV],
    rules: &[Rule::Right],
};

pub static SNAPSHOT_OHLC: Endpoint = Endpoint {
    path: "/v2/snapshot/option/ohlc",
    category: "option_ohlc_snapshot",
    required: CONTRACT_KEY,
    optional: &[USE_CSV],
    rules: &[Rule::Right],
};

pub static SNAPSHOT_TRADES: Endpoint = Endpoint {
    path: "/v2/snapshot/option/trade",
    category: "option_trade_snapshot",
    required: CONTRACT_KEY,
    optional: &[USE_CSV],
    rules: &[Rule::Right],
};

pub static SNAPSHOT_OPEN_INTEREST: Endpoint = Endpoint {
    path: "/v2/snapshot/option/open_interest",
    category: "option_open_interest_snapshot",
    required: CONTRACT_KEY,
    optional: &[USE_CSV],
    rules: &[Rule::Right],
};

pub static BULK_SNAPSHOT_QUOTES: Endpoint = Endpoint {
    path: "/v2/bulk_snapshot/option/quote",
    category: "bulk_option_quotes_snapshot",
    required: CHAIN_KEY,
    optional: &[USE_CSV],
    rules: &[],
};

pub static BULK_SNAPSHOT_OPEN_INTEREST: Endpoint = Endpoint {
    path: "/v2/bulk_snapshot/option/open_interest",
    category: "bulk_option_open_interest_snapshot",
    required: CHAIN_KEY,
    optional: &[USE_CSV],
    rules: &[],
};

pub static BULK_SNAPSHOT_OHLC: Endpoint = Endpoint {
    path: "/v2/bulk_snapshot/option/ohlc",
    category: "bulk_option_ohlc_snapshot",
    required: CHAIN_KEY,
    optional: &[USE_CSV],
    rules: &[],
};

pub static BULK_SNAPSHOT_GREEKS: Endpoint = Endpoint {
    path: "/v2/bulk_snapshot/option/greeks",
    category: "bulk_option_greeks_snapshot",
    required: CHAIN_KEY,
    optional: &[ANNUAL_DIV, RATE, RATE_VALUE, UNDER_PRICE, USE_CSV],
    rules: &[],
};

pub static BULK_SNAPSHOT_GREEKS_SECOND_ORDER: Endpoint = Endpoint {
    path: "/v2/bulk_snapshot/option/greeks_second_order",
    category: "bulk_option_greeks_second_order_snapshot",
    required: CHAIN_KEY,
    optional: &[ANNUAL_DIV, RATE, RATE_VALUE, UNDER_PRICE, USE_CSV],
    rules: &[],
};

pub static BULK_SNAPSHOT_GREEKS_THIRD_ORDER: Endpoint = Endpoint {
    path: "/v2/bulk_snapshot/option/greeks_third_order",
    category: "bulk_option_greeks_third_order_snapshot",
    required: CHAIN_KEY,
    optional: &[ANNUAL_DIV, RATE, RATE_VALUE, UNDER_PRICE, USE_CSV],
    rules: &[],
};

type TableResult = Result<Option<Table>, DataError>;

impl<T> Catalog<'_, OptionHistorical, T>
where
    T: Transport,
{
    /// Quote in effect at `ivl` milliseconds after midnight ET on each day of `range`.
    pub async fn quote_at_time(
        &self,
        contract: &OptionContract,
        range: &DateRange,
        ivl: u32,
    ) -> TableResult {
        self.contract(&AT_TIME_QUOTE, contract, range, Some(ivl)).await
    }

    /// Last trade at `ivl` milliseconds after midnight ET on each day of `range`.
    pub async fn trade_at_time(
        &self,
        contract: &OptionContract,
        range: &DateRange,
        ivl: u32,
    ) -> TableResult {
        self.contract(&AT_TIME_TRADE, contract, range, Some(ivl)).await
    }

    pub async fn eod_report(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_EOD, contract, range, None).await
    }

    /// NBBO quotes, every quote unless an `ivl` option is supplied.
    pub async fn quotes(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_QUOTES, contract, range, None).await
    }

    pub async fn ohlc(
        &self,
        contract: &OptionContract,
        range: &DateRange,
        ivl: u32,
    ) -> TableResult {
        self.contract(&HIST_OHLC, contract, range, Some(ivl)).await
    }

    pub async fn open_interest(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_OPEN_INTEREST, contract, range, None).await
    }

    pub async fn trades(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_TRADES, contract, range, None).await
    }

    /// Every trade paired with the quote in effect at the time of the trade.
    pub async fn trade_quote(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_TRADE_QUOTE, contract, range, None).await
    }

    /// Implied volatility of the bid, mid and ask, sampled every 15 minutes unless overridden.
    pub async fn implied_volatility(
        &self,
        contract: &OptionContract,
        range: &DateRange,
    ) -> TableResult {
        self.contract(&HIST_IMPLIED_VOLATILITY, contract, range, None)
            .await
    }

    /// First order Greeks.
    pub async fn greeks(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_GREEKS, contract, range, None).await
    }

    pub async fn greeks_second_order(
        &self,
        contract: &OptionContract,
        range: &DateRange,
    ) -> TableResult {
        self.contract(&HIST_GREEKS_SECOND_ORDER, contract, range, None)
            .await
    }

    pub async fn greeks_third_order(
        &self,
        contract: &OptionContract,
        range: &DateRange,
    ) -> TableResult {
        self.contract(&HIST_GREEKS_THIRD_ORDER, contract, range, None)
            .await
    }

    /// First, second and third order Greeks in a single table.
    pub async fn all_greeks(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_ALL_GREEKS, contract, range, None).await
    }

    /// First order Greeks computed at the time of every trade.
    pub async fn trade_greeks(&self, contract: &OptionContract, range: &DateRange) -> TableResult {
        self.contract(&HIST_TRADE_GREEKS, contract, range, None).await
    }

    pub async fn trade_greeks_second_order(
        &self,
        contract: &OptionContract,
        range: &DateRange,
    ) -> TableResult {
        self.contract(&HIST_TRADE_GREEKS_SECOND_ORDER, contract, range, None)
            .await
    }

    pub async fn trade_greeks_third_order(
        &self,
        contract: &OptionContract,
        range: &DateRange,
    ) -> TableResult {
        self.contract(&HIST_TRADE_GREEKS_THIRD_ORDER, contract, range, None)
            .await
    }

    async fn contract(
        &self,
        endpoint: &Endpoint,
        contract: &OptionContract,
        range: &DateRange,
        ivl: Option<u32>,
    ) -> TableResult {
        let mut key = range.apply(contract.to_query());
        key.insert_opt("ivl", ivl);
        self.fetch(endpoint, key, &contract.to_string()).await
    }
}

impl<T> Catalog<'_, OptionBulk, T>
where
    T: Transport,
{
    /// Quote in effect at `ivl` milliseconds after midnight ET, for every contract of `chain`.
    pub async fn quote_at_time(
        &self,
        chain: &OptionChain,
        range: &DateRange,
        ivl: u32,
    ) -> TableResult {
        self.chain(&BULK_AT_TIME_QUOTE, chain, range, Some(ivl)).await
    }

    pub async fn trade_at_time(
        &self,
        chain: &OptionChain,
        range: &DateRange,
        ivl: u32,
    ) -> TableResult {
        self.chain(&BULK_AT_TIME_TRADE, chain, range, Some(ivl)).await
    }

    /// End-of-day reports, with Greeks computed from the `annual_div` & `rate` options.
    pub async fn eod(&self, chain: &OptionChain, range: &DateRange) -> TableResult {
        self.chain(&BULK_HIST_EOD, chain, range, None).await
    }

    pub async fn quotes(&self, chain: &OptionChain, range: &DateRange, ivl: u32) -> TableResult {
        self.chain(&BULK_HIST_QUOTES, chain, range, Some(ivl)).await
    }

    pub async fn ohlc(&self, chain: &OptionChain, range: &DateRange, ivl: u32) -> TableResult {
        self.chain(&BULK_HIST_OHLC, chain, range, Some(ivl)).await
    }

    pub async fn open_interest(&self, chain: &OptionChain, range: &DateRange) -> TableResult {
        self.chain(&BULK_HIST_OPEN_INTEREST, chain, range, None).await
    }

    /// Every trade, or trades aggregated by an `ivl` option if one is supplied.
    pub async fn trades(&self, chain: &OptionChain, range: &DateRange) -> TableResult {
        self.chain(&BULK_HIST_TRADES, chain, range, None).await
    }

    pub async fn trade_quote(&self, chain: &OptionChain, range: &DateRange) -> TableResult {
        self.chain(&BULK_HIST_TRADE_QUOTE, chain, range, None).await
    }

    pub async fn eod_greeks(&self, chain: &OptionChain, range: &DateRange) -> TableResult {
        self.chain(&BULK_HIST_EOD_GREEKS, chain, range, None).await
    }

    pub async fn trade_greeks(&self, chain: &OptionChain, range: &DateRange) -> TableResult {
        self.chain(&BULK_HIST_TRADE_GREEKS, chain, range, None).await
    }

    async fn chain(
        &self,
        endpoint: &Endpoint,
        chain: &OptionChain,
        range: &DateRange,
        ivl: Option<u32>,
    ) -> TableResult {
        let mut key = range.apply(chain.to_query());
        key.insert_opt("ivl", ivl);
        self.fetch(endpoint, key, &chain.to_string()).await
    }
}

impl<T> Catalog<'_, OptionSnapshot, T>
where
    T: Transport,
{
    /// Latest quote. Returns no rows if the market was closed for the day.
    pub async fn quotes(&self, contract: &OptionContract) -> TableResult {
        self.fetch(&SNAPSHOT_QUOTES, contract.to_query(), &contract.to_string())
            .await
    }

    pub async fn ohlc(&self, contract: &OptionContract) -> TableResult {
        self.fetch(&SNAPSHOT_OHLC, contract.to_query(), &contract.to_string())
            .await
    }

    pub async fn trades(&self, contract: &OptionContract) -> TableResult {
        self.fetch(&SNAPSHOT_TRADES, contract.to_query(), &contract.to_string())
            .await
    }

    pub async fn open_interest(&self, contract: &OptionContract) -> TableResult {
        self.fetch(
            &SNAPSHOT_OPEN_INTEREST,
            contract.to_query(),
            &contract.to_string(),
        )
        .await
    }

    pub async fn bulk_quotes(&self, chain: &OptionChain) -> TableResult {
        self.fetch(&BULK_SNAPSHOT_QUOTES, chain.to_query(), &chain.to_string())
            .await
    }

    pub async fn bulk_open_interest(&self, chain: &OptionChain) -> TableResult {
        self.fetch(
            &BULK_SNAPSHOT_OPEN_INTEREST,
            chain.to_query(),
            &chain.to_string(),
        )
        .await
    }

    pub async fn bulk_ohlc(&self, chain: &OptionChain) -> TableResult {
        self.fetch(&BULK_SNAPSHOT_OHLC, chain.to_query(), &chain.to_string())
            .await
    }

    /// First order Greeks for every contract of `chain`.
    pub async fn bulk_greeks(&self, chain: &OptionChain) -> TableResult {
        self.fetch(&BULK_SNAPSHOT_GREEKS, chain.to_query(), &chain.to_string())
            .await
    }

    pub async fn bulk_greeks_second_order(&self, chain: &OptionChain) -> TableResult {
        self.fetch(
            &BULK_SNAPSHOT_GREEKS_SECOND_ORDER,
            chain.to_query(),
            &chain.to_string(),
        )
        .await
    }

    pub async fn bulk_greeks_third_order(&self, chain: &OptionChain) -> TableResult {
        self.fetch(
            &BULK_SNAPSHOT_GREEKS_THIRD_ORDER,
            chain.to_query(),
            &chain.to_string(),
        )
        .await
    }
}
