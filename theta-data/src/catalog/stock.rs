use super::{Catalog, DateRange, StockHistorical, StockSnapshot};
use crate::{
    endpoint::{Endpoint, OptionalParam, Rule},
    error::DataError,
    query::{ParamValue, Query},
    table::Table,
    transport::Transport,
};
use itertools::Itertools;

const RANGE_KEY: &[&str] = &["root", "start_date", "end_date"];
const ROOT_KEY: &[&str] = &["root"];

pub static HIST_EOD: Endpoint = Endpoint {
    path: "/v2/hist/stock/eod",
    category: "eod",
    required: RANGE_KEY,
    optional: &[],
    rules: &[Rule::DateRange],
};

pub static HIST_QUOTES: Endpoint = Endpoint {
    path: "/v2/hist/stock/quote",
    category: "quotes",
    required: RANGE_KEY,
    optional: &[OptionalParam::with_default("ivl", ParamValue::Int(900_000))],
    rules: &[Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_OHLC: Endpoint = Endpoint {
    path: "/v2/hist/stock/ohlc",
    category: "ohlc",
    required: RANGE_KEY,
    optional: &[OptionalParam::with_default("ivl", ParamValue::Int(900_000))],
    rules: &[Rule::IntervalOrZero, Rule::DateRange],
};

pub static HIST_TRADES: Endpoint = Endpoint {
    path: "/v2/hist/stock/trade",
    category: "trades",
    required: RANGE_KEY,
    optional: &[],
    rules: &[Rule::DateRange],
};

pub static HIST_TRADE_QUOTE: Endpoint = Endpoint {
    path: "/v2/hist/stock/trade_quote",
    category: "trade_quote",
    required: RANGE_KEY,
    optional: &[],
    rules: &[Rule::DateRange],
};

pub static HIST_SPLITS: Endpoint = Endpoint {
    path: "/v2/hist/stock/split",
    category: "splits",
    required: RANGE_KEY,
    optional: &[],
    rules: &[Rule::DateRange],
};

pub static HIST_DIVIDENDS: Endpoint = Endpoint {
    path: "/v2/hist/stock/dividend",
    category: "dividends",
    required: RANGE_KEY,
    optional: &[],
    rules: &[Rule::DateRange],
};

pub static SNAPSHOT_QUOTES: Endpoint = Endpoint {
    path: "/v2/snapshot/stock/quote",
    category: "snapshot_quotes",
    required: ROOT_KEY,
    optional: &[OptionalParam::new("venue")],
    rules: &[Rule::Venue],
};

pub static SNAPSHOT_BULK_QUOTES: Endpoint = Endpoint {
    path: "/v2/snapshot/stock/quote",
    category: "snapshot_bulk_quotes",
    required: ROOT_KEY,
    optional: &[OptionalParam::new("venue")],
    rules: &[Rule::Venue],
};

pub static SNAPSHOT_OHLC: Endpoint = Endpoint {
    path: "/v2/snapshot/stock/ohlc",
    category: "snapshot_ohlc",
    required: ROOT_KEY,
    optional: &[],
    rules: &[],
};

pub static SNAPSHOT_BULK_OHLC: Endpoint = Endpoint {
    path: "/v2/snapshot/stock/ohlc",
    category: "snapshot_bulk_ohlc",
    required: ROOT_KEY,
    optional: &[],
    rules: &[],
};

pub static SNAPSHOT_TRADES: Endpoint = Endpoint {
    path: "/v2/snapshot/stock/trade",
    category: "snapshot_trades",
    required: ROOT_KEY,
    optional: &[],
    rules: &[],
};

impl<T> Catalog<'_, StockHistorical, T>
where
    T: Transport,
{
    /// End-of-day report generated by the terminal at 17:15 ET.
    pub async fn eod_report(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_EOD, symbol, range).await
    }

    /// NBBO quotes aggregated by `ivl`, 15 minutes unless overridden. An `ivl` of 0 returns
    /// every quote.
    pub async fn quotes(&self, symbol: &str, range: &DateRange) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_QUOTES, symbol, range).await
    }

    /// OHLC bars aggregated by `ivl`, 15 minutes unless overridden.
    pub async fn ohlc(&self, symbol: &str, range: &DateRange) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_OHLC, symbol, range).await
    }

    pub async fn trades(&self, symbol: &str, range: &DateRange) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_TRADES, symbol, range).await
    }

    /// Every trade paired with the NBBO quote in effect at the time of the trade.
    pub async fn trade_quote(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_TRADE_QUOTE, symbol, range).await
    }

    pub async fn splits(&self, symbol: &str, range: &DateRange) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_SPLITS, symbol, range).await
    }

    pub async fn dividends(
        &self,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Option<Table>, DataError> {
        self.ranged(&HIST_DIVIDENDS, symbol, range).await
    }

    async fn ranged(
        &self,
        endpoint: &Endpoint,
        symbol: &str,
        range: &DateRange,
    ) -> Result<Option<Table>, DataError> {
        let key = range.apply(Query::new().with("root", symbol.to_string()));
        self.fetch(endpoint, key, &format!("{symbol}_{range}")).await
    }
}

impl<T> Catalog<'_, StockSnapshot, T>
where
    T: Transport,
{
    /// Latest NBBO quote. Accepts the `venue` option.
    pub async fn quotes(&self, symbol: &str) -> Result<Option<Table>, DataError> {
        self.single(&SNAPSHOT_QUOTES, symbol).await
    }

    /// Latest NBBO quote for every symbol in one request. Accepts the `venue` option.
    pub async fn bulk_quotes<S>(&self, symbols: &[S]) -> Result<Option<Table>, DataError>
    where
        S: AsRef<str>,
    {
        self.bulk(&SNAPSHOT_BULK_QUOTES, symbols).await
    }

    /// Session OHLC so far.
    pub async fn ohlc(&self, symbol: &str) -> Result<Option<Table>, DataError> {
        self.single(&SNAPSHOT_OHLC, symbol).await
    }

    pub async fn bulk_ohlc<S>(&self, symbols: &[S]) -> Result<Option<Table>, DataError>
    where
        S: AsRef<str>,
    {
        self.bulk(&SNAPSHOT_BULK_OHLC, symbols).await
    }

    /// Last trade.
    pub async fn trades(&self, symbol: &str) -> Result<Option<Table>, DataError> {
        self.single(&SNAPSHOT_TRADES, symbol).await
    }

    async fn single(&self, endpoint: &Endpoint, symbol: &str) -> Result<Option<Table>, DataError> {
        let key = Query::new().with("root", symbol.to_string());
        self.fetch(endpoint, key, symbol).await
    }

    async fn bulk<S>(&self, endpoint: &Endpoint, symbols: &[S]) -> Result<Option<Table>, DataError>
    where
        S: AsRef<str>,
    {
        let key = Query::new().with("root", symbols.iter().map(AsRef::<str>::as_ref).join(","));
        let identifier = symbols.iter().map(AsRef::<str>::as_ref).join("_");
        self.fetch(endpoint, key, &identifier).await
    }
}
