use derive_more::{Display, From};
use indexmap::IndexMap;
use std::borrow::Cow;

/// Single query parameter value.
///
/// Rendered into the request URL with [`Display`]: booleans as lowercase `true` / `false`,
/// numbers in their natural form.
#[derive(Clone, PartialEq, Debug, Display, From)]
pub enum ParamValue {
    #[display("{_0}")]
    Text(Cow<'static, str>),
    #[display("{_0}")]
    Int(i64),
    #[display("{_0}")]
    Float(f64),
    #[display("{_0}")]
    Bool(bool),
}

impl ParamValue {
    pub const fn text(value: &'static str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(&**text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(int) => Some(*int),
            _ => None,
        }
    }
}

impl From<&'static str> for ParamValue {
    fn from(value: &'static str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Ordered query parameter map built for a single request.
///
/// Inserting an existing name replaces its value but keeps its original position.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Query(IndexMap<&'static str, ParamValue>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style [`Query::insert`].
    pub fn with(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &'static str, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(name, value.into())
    }

    /// Insert `value` only if it is `Some`.
    pub fn insert_opt<V>(&mut self, name: &'static str, value: Option<V>)
    where
        V: Into<ParamValue>,
    {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (*name, value))
    }

    /// Rendered `(name, value)` pairs, ready for [`reqwest::RequestBuilder::query`].
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect()
    }
}

/// Optional server-side parameters supplied by the caller.
///
/// Each endpoint only forwards the options it declares, see
/// [`Endpoint::assemble`](crate::endpoint::Endpoint::assemble). `use_csv` selects the
/// terminal's own wire format and is unrelated to local CSV export.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct QueryOptions {
    query: Query,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the aggregation interval in milliseconds.
    pub fn with_ivl(mut self, ivl: u32) -> Self {
        self.query.insert("ivl", ivl);
        self
    }

    /// Restrict results to regular trading hours.
    pub fn with_rth(mut self, rth: bool) -> Self {
        self.query.insert("rth", rth);
        self
    }

    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.query.insert("start_time", start_time.into());
        self
    }

    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.query.insert("end_time", end_time.into());
        self
    }

    /// Ask the terminal to encode its response body as CSV on the wire.
    pub fn with_use_csv(mut self, use_csv: bool) -> Self {
        self.query.insert("use_csv", use_csv);
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.query.insert("exclusive", exclusive);
        self
    }

    pub fn with_perf_boost(mut self, perf_boost: bool) -> Self {
        self.query.insert("perf_boost", perf_boost);
        self
    }

    /// Annualised dividend amount used in Greeks calculations.
    pub fn with_annual_div(mut self, annual_div: f64) -> Self {
        self.query.insert("annual_div", annual_div);
        self
    }

    /// Interest rate type used in Greeks calculations, eg/ `SOFR`.
    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.query.insert("rate", rate.into());
        self
    }

    /// Annualised interest rate value. Overrides [`Self::with_rate`] on the terminal.
    pub fn with_rate_value(mut self, rate_value: f64) -> Self {
        self.query.insert("rate_value", rate_value);
        self
    }

    pub fn with_under_price(mut self, under_price: f64) -> Self {
        self.query.insert("under_price", under_price);
        self
    }

    /// Quote venue for stock snapshots: `nqb` or `utp_cta`.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.query.insert("venue", venue.into());
        self
    }

    pub fn as_query(&self) -> &Query {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_value_display() {
        struct TestCase {
            input: ParamValue,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: booleans render lowercase
                input: ParamValue::from(true),
                expected: "true",
            },
            TestCase {
                // TC1: false renders lowercase
                input: ParamValue::from(false),
                expected: "false",
            },
            TestCase {
                // TC2: integers
                input: ParamValue::from(900_000_u32),
                expected: "900000",
            },
            TestCase {
                // TC3: fractional floats
                input: ParamValue::from(0.0342),
                expected: "0.0342",
            },
            TestCase {
                // TC4: text is passed through
                input: ParamValue::from("SOFR"),
                expected: "SOFR",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.input.to_string(), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_query_insert_replaces_in_place() {
        let mut query = Query::new().with("root", "AAPL").with("ivl", 0_u32);
        query.insert("ivl", 60_000_u32);

        assert_eq!(
            query.pairs(),
            vec![("root", "AAPL".to_string()), ("ivl", "60000".to_string())]
        );
    }

    #[test]
    fn test_query_insert_opt_skips_none() {
        let mut query = Query::new();
        query.insert_opt::<String>("start_time", None);
        query.insert_opt("end_time", Some("57600000".to_string()));

        assert!(!query.contains("start_time"));
        assert_eq!(
            query.get("end_time").and_then(ParamValue::as_str),
            Some("57600000")
        );
    }

    #[test]
    fn test_query_options_collects_only_supplied_values() {
        let options = QueryOptions::new().with_rth(false).with_use_csv(true);

        assert_eq!(
            options.as_query().pairs(),
            vec![
                ("rth", "false".to_string()),
                ("use_csv", "true".to_string())
            ]
        );
    }
}
