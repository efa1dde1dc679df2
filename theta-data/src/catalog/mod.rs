use crate::{
    client::ThetaClient,
    endpoint::Endpoint,
    error::DataError,
    query::{Query, QueryOptions},
    table::Table,
    transport::Transport,
};
use derive_more::Display;
use std::marker::PhantomData;

/// Stock endpoint descriptors and [`Catalog`] methods.
pub mod stock;

/// Option endpoint descriptors and [`Catalog`] methods.
pub mod option;

/// [`Catalog`] kind for stock history.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct StockHistorical;

/// [`Catalog`] kind for stock snapshots.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct StockSnapshot;

/// [`Catalog`] kind for single contract option history.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct OptionHistorical;

/// [`Catalog`] kind for whole-chain option history.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct OptionBulk;

/// [`Catalog`] kind for option snapshots.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct OptionSnapshot;

/// Group of typed endpoint methods sharing a [`ThetaClient`], a CSV export toggle and a set of
/// [`QueryOptions`].
///
/// The `Kind` parameter selects which endpoint methods are available, eg/ [`StockHistorical`].
#[derive(Debug)]
pub struct Catalog<'a, Kind, T> {
    client: &'a ThetaClient<T>,
    write_csv: bool,
    options: QueryOptions,
    kind: PhantomData<Kind>,
}

impl<'a, Kind, T> Catalog<'a, Kind, T> {
    pub(crate) fn new(client: &'a ThetaClient<T>) -> Self {
        Self {
            client,
            write_csv: false,
            options: QueryOptions::default(),
            kind: PhantomData,
        }
    }

    /// Export every returned table to `{output_dir}/{category}_{identifier}.csv`.
    pub fn write_csv(mut self, enabled: bool) -> Self {
        self.write_csv = enabled;
        self
    }

    /// Optional server-side parameters forwarded to endpoints that accept them.
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

impl<Kind, T> Catalog<'_, Kind, T>
where
    T: Transport,
{
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        key: Query,
        identifier: &str,
    ) -> Result<Option<Table>, DataError> {
        self.client
            .request(endpoint, key, identifier, &self.options, self.write_csv)
            .await
    }
}

/// Inclusive `YYYYMMDD` date range.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display("{start}_{end}")]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn apply(&self, query: Query) -> Query {
        query
            .with("start_date", self.start.clone())
            .with("end_date", self.end.clone())
    }
}

/// Single option contract.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display("{root}_{exp}_{strike}_{right}")]
pub struct OptionContract {
    pub root: String,
    /// Expiration as `YYYYMMDD`.
    pub exp: String,
    /// Strike price in 1/10ths of a cent, eg/ `$170.00` is `170000`.
    pub strike: u32,
    /// `C` or `P`.
    pub right: String,
}

impl OptionContract {
    pub fn new(
        root: impl Into<String>,
        exp: impl Into<String>,
        strike: u32,
        right: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            exp: exp.into(),
            strike,
            right: right.into(),
        }
    }

    fn to_query(&self) -> Query {
        Query::new()
            .with("root", self.root.clone())
            .with("exp", self.exp.clone())
            .with("strike", self.strike)
            .with("right", self.right.clone())
    }
}

/// Every contract sharing a root & expiration.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display("{root}_{exp}")]
pub struct OptionChain {
    pub root: String,
    /// Expiration as `YYYYMMDD`.
    pub exp: String,
}

impl OptionChain {
    pub fn new(root: impl Into<String>, exp: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            exp: exp.into(),
        }
    }

    fn to_query(&self) -> Query {
        Query::new()
            .with("root", self.root.clone())
            .with("exp", self.exp.clone())
    }
}

/// Every endpoint in the catalog.
pub static ENDPOINTS: &[&Endpoint] = &[
    &stock::HIST_EOD,
    &stock::HIST_QUOTES,
    &stock::HIST_OHLC,
    &stock::HIST_TRADES,
    &stock::HIST_TRADE_QUOTE,
    &stock::HIST_SPLITS,
    &stock::HIST_DIVIDENDS,
    &stock::SNAPSHOT_QUOTES,
    &stock::SNAPSHOT_BULK_QUOTES,
    &stock::SNAPSHOT_OHLC,
    &stock::SNAPSHOT_BULK_OHLC,
    &stock::SNAPSHOT_TRADES,
    &option::AT_TIME_QUOTE,
    &option::AT_TIME_TRADE,
    &option::BULK_AT_TIME_QUOTE,
    &option::BULK_AT_TIME_TRADE,
    &option::HIST_EOD,
    &option::HIST_QUOTES,
    &option::HIST_OHLC,
    &option::HIST_OPEN_INTEREST,
    &option::HIST_TRADES,
    &option::HIST_TRADE_QUOTE,
    &option::HIST_IMPLIED_VOLATILITY,
    &option::HIST_GREEKS,
    &option::HIST_GREEKS_SECOND_ORDER,
    &option::HIST_GREEKS_THIRD_ORDER,
    &option::HIST_ALL_GREEKS,
    &option::HIST_TRADE_GREEKS,
    &option::HIST_TRADE_GREEKS_SECOND_ORDER,
    &option::HIST_TRADE_GREEKS_THIRD_ORDER,
    &option::BULK_HIST_EOD,
    &option::BULK_HIST_QUOTES,
    &option::BULK_HIST_OHLC,
    &option::BULK_HIST_OPEN_INTEREST,
    &option::BULK_HIST_TRADES,
    &option::BULK_HIST_TRADE_QUOTE,
    &option::BULK_HIST_EOD_GREEKS,
    &option::BULK_HIST_TRADE_GREEKS,
    &option::SNAPSHOT_QUOTES,
    &option::SNAPSHOT_OHLC,
    &option::SNAPSHOT_TRADES,
    &option::SNAPSHOT_OPEN_INTEREST,
    &option::BULK_SNAPSHOT_QUOTES,
    &option::BULK_SNAPSHOT_OPEN_INTEREST,
    &option::BULK_SNAPSHOT_OHLC,
    &option::BULK_SNAPSHOT_GREEKS,
    &option::BULK_SNAPSHOT_GREEKS_SECOND_ORDER,
    &option::BULK_SNAPSHOT_GREEKS_THIRD_ORDER,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Rule;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_every_endpoint_once() {
        assert_eq!(ENDPOINTS.len(), 48);

        let categories = ENDPOINTS
            .iter()
            .map(|endpoint| endpoint.category)
            .collect::<HashSet<_>>();
        assert_eq!(categories.len(), ENDPOINTS.len(), "categories must be unique");
    }

    #[test]
    fn test_catalog_paths_are_versioned() {
        for endpoint in ENDPOINTS {
            assert!(endpoint.path.starts_with("/v2/"), "{}", endpoint.path);
        }
    }

    #[test]
    fn test_catalog_rules_reference_declared_params() {
        for endpoint in ENDPOINTS {
            for rule in endpoint.rules {
                let param = match rule {
                    Rule::Right => "right",
                    Rule::Interval | Rule::IntervalOrZero => "ivl",
                    Rule::DateRange => "start_date",
                    Rule::Venue => "venue",
                };
                assert!(
                    endpoint.accepts(param),
                    "{} has {rule:?} but does not accept {param}",
                    endpoint.category
                );
            }
        }
    }

    #[test]
    fn test_catalog_validates_every_right_and_date_range() {
        for endpoint in ENDPOINTS {
            if endpoint.accepts("right") {
                assert!(endpoint.rules.contains(&Rule::Right), "{}", endpoint.category);
            }
            if endpoint.accepts("start_date") {
                assert!(endpoint.rules.contains(&Rule::DateRange), "{}", endpoint.category);
            }
            if endpoint.accepts("ivl") {
                assert!(
                    endpoint.rules.contains(&Rule::Interval)
                        || endpoint.rules.contains(&Rule::IntervalOrZero),
                    "{}",
                    endpoint.category
                );
            }
        }
    }

    #[test]
    fn test_key_identifiers() {
        assert_eq!(
            DateRange::new("20240101", "20240131").to_string(),
            "20240101_20240131"
        );
        assert_eq!(
            OptionContract::new("AAPL", "20240119", 170_000, "C").to_string(),
            "AAPL_20240119_170000_C"
        );
        assert_eq!(OptionChain::new("SPY", "20240119").to_string(), "SPY_20240119");
    }
}
