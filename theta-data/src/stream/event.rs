use super::subscription::{ReqType, SecType};
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::{debug, warn};

pub const STOCK_TRADE_HEADER: &[&str] = &[
    "date",
    "ms_of_day",
    "sequence",
    "size",
    "condition",
    "price",
    "exchange",
];

pub const STOCK_QUOTE_HEADER: &[&str] = &[
    "date",
    "ms_of_day",
    "bid_size",
    "bid_exchange",
    "bid",
    "bid_condition",
    "ask_size",
    "ask_exchange",
    "ask",
    "ask_condition",
];

pub const OPTION_TRADE_HEADER: &[&str] = &[
    "date",
    "ms_of_day",
    "sequence",
    "size",
    "condition",
    "price",
    "exchange",
    "expiration",
    "strike",
    "right",
];

pub const OPTION_QUOTE_HEADER: &[&str] = &[
    "date",
    "ms_of_day",
    "bid_size",
    "bid_exchange",
    "bid",
    "bid_condition",
    "ask_size",
    "ask_exchange",
    "ask",
    "ask_condition",
    "expiration",
    "strike",
    "right",
];

/// CSV header for a (security class, event class) pair.
pub fn header(sec_type: SecType, req_type: ReqType) -> &'static [&'static str] {
    match (sec_type, req_type) {
        (SecType::Stock, ReqType::Trade) => STOCK_TRADE_HEADER,
        (SecType::Stock, ReqType::Quote) => STOCK_QUOTE_HEADER,
        (SecType::Option, ReqType::Trade) => OPTION_TRADE_HEADER,
        (SecType::Option, ReqType::Quote) => OPTION_QUOTE_HEADER,
    }
}

/// Outcome of decoding one inbound event-stream frame.
#[derive(Clone, PartialEq, Debug)]
pub enum StreamEvent {
    /// Frame of another type, an unknown security class, or missing fields.
    Ignore,
    Record(StreamRecord),
}

/// Event formatted for its per-root CSV file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StreamRecord {
    pub sec_type: SecType,
    pub root: String,
    /// Values in [`header`] order.
    pub fields: Vec<String>,
}

/// ### Raw Payload Examples
/// ```json
/// {
///     "header": {"type": "TRADE", "status": "CONNECTED"},
///     "contract": {"security_type": "OPTION", "root": "SPY", "expiration": 20240119, "strike": 470000, "right": "C"},
///     "trade": {"ms_of_day": 34200123, "sequence": 8812, "size": 2, "condition": 18, "price": 3.45, "exchange": 5, "date": 20240102}
/// }
/// ```
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
struct Frame {
    contract: Contract,
    #[serde(default)]
    trade: Option<Trade>,
    #[serde(default)]
    quote: Option<Quote>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
struct Contract {
    security_type: String,
    root: String,
    #[serde(default)]
    expiration: Option<Number>,
    #[serde(default)]
    strike: Option<Number>,
    #[serde(default)]
    right: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
struct Trade {
    date: Number,
    ms_of_day: Number,
    sequence: Number,
    size: Number,
    condition: Number,
    price: Number,
    exchange: Number,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
struct Quote {
    date: Number,
    ms_of_day: Number,
    bid_size: Number,
    bid_exchange: Number,
    bid: Number,
    bid_condition: Number,
    ask_size: Number,
    ask_exchange: Number,
    ask: Number,
    ask_condition: Number,
}

impl Trade {
    fn fields(&self) -> Vec<String> {
        [
            &self.date,
            &self.ms_of_day,
            &self.sequence,
            &self.size,
            &self.condition,
            &self.price,
            &self.exchange,
        ]
        .map(ToString::to_string)
        .to_vec()
    }
}

impl Quote {
    fn fields(&self) -> Vec<String> {
        [
            &self.date,
            &self.ms_of_day,
            &self.bid_size,
            &self.bid_exchange,
            &self.bid,
            &self.bid_condition,
            &self.ask_size,
            &self.ask_exchange,
            &self.ask,
            &self.ask_condition,
        ]
        .map(ToString::to_string)
        .to_vec()
    }
}

/// Decode one text frame received while subscribed to `req_type` events.
///
/// Only a frame that is not JSON at all is an error.
pub fn decode(text: &str, req_type: ReqType) -> Result<StreamEvent, DataError> {
    let value = serde_json::from_str::<Value>(text)
        .map_err(|error| DataError::Decode(error.to_string()))?;

    let kind = value.pointer("/header/type").and_then(Value::as_str);
    if kind != Some(req_type.as_str()) {
        debug!(?kind, expected = req_type.as_str(), "ignoring event stream frame");
        return Ok(StreamEvent::Ignore);
    }

    let frame = match serde_json::from_value::<Frame>(value) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(%error, "discarding event stream frame with missing fields");
            return Ok(StreamEvent::Ignore);
        }
    };

    let sec_type = match frame.contract.security_type.as_str() {
        "STOCK" => SecType::Stock,
        "OPTION" => SecType::Option,
        other => {
            debug!(security_type = other, "ignoring unsupported security type");
            return Ok(StreamEvent::Ignore);
        }
    };

    let fields = match (req_type, &frame.trade, &frame.quote) {
        (ReqType::Trade, Some(trade), _) => trade.fields(),
        (ReqType::Quote, _, Some(quote)) => quote.fields(),
        _ => {
            warn!(req_type = req_type.as_str(), "discarding event stream frame without payload");
            return Ok(StreamEvent::Ignore);
        }
    };

    let Contract {
        root,
        expiration,
        strike,
        right,
        ..
    } = frame.contract;

    let fields = match sec_type {
        SecType::Stock => fields,
        SecType::Option => match (expiration, strike, right) {
            (Some(expiration), Some(strike), Some(right)) => {
                let mut fields = fields;
                fields.extend([expiration.to_string(), strike.to_string(), right]);
                fields
            }
            _ => {
                warn!(%root, "discarding option event without expiration, strike & right");
                return Ok(StreamEvent::Ignore);
            }
        },
    };

    Ok(StreamEvent::Record(StreamRecord {
        sec_type,
        root,
        fields,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stock_trade(root: &str) -> String {
        json!({
            "header": {"type": "TRADE", "status": "CONNECTED"},
            "contract": {"security_type": "STOCK", "root": root},
            "trade": {
                "ms_of_day": 34200000, "sequence": 101, "size": 100, "condition": 0,
                "price": 248.5, "exchange": 57, "date": 20240102
            }
        })
        .to_string()
    }

    #[test]
    fn test_decode() {
        struct TestCase {
            input: String,
            req_type: ReqType,
            expected: Result<StreamEvent, DataError>,
        }

        let tests = vec![
            TestCase {
                // TC0: stock trade while subscribed to trades
                input: stock_trade("TSLA"),
                req_type: ReqType::Trade,
                expected: Ok(StreamEvent::Record(StreamRecord {
                    sec_type: SecType::Stock,
                    root: "TSLA".to_string(),
                    fields: ["20240102", "34200000", "101", "100", "0", "248.5", "57"]
                        .map(String::from)
                        .to_vec(),
                })),
            },
            TestCase {
                // TC1: trade while subscribed to quotes is ignored
                input: stock_trade("TSLA"),
                req_type: ReqType::Quote,
                expected: Ok(StreamEvent::Ignore),
            },
            TestCase {
                // TC2: option quote appends contract fields
                input: json!({
                    "header": {"type": "QUOTE"},
                    "contract": {
                        "security_type": "OPTION", "root": "SPY",
                        "expiration": 20240119, "strike": 470000, "right": "P"
                    },
                    "quote": {
                        "ms_of_day": 34200500, "bid_size": 10, "bid_exchange": 1, "bid": 1.05,
                        "bid_condition": 50, "ask_size": 12, "ask_exchange": 1, "ask": 1.1,
                        "ask_condition": 50, "date": 20240102
                    }
                })
                .to_string(),
                req_type: ReqType::Quote,
                expected: Ok(StreamEvent::Record(StreamRecord {
                    sec_type: SecType::Option,
                    root: "SPY".to_string(),
                    fields: [
                        "20240102", "34200500", "10", "1", "1.05", "50", "12", "1", "1.1", "50",
                        "20240119", "470000", "P",
                    ]
                    .map(String::from)
                    .to_vec(),
                })),
            },
            TestCase {
                // TC3: unsupported security type is ignored
                input: json!({
                    "header": {"type": "TRADE"},
                    "contract": {"security_type": "INDEX", "root": "SPX"},
                    "trade": {
                        "ms_of_day": 1, "sequence": 1, "size": 1, "condition": 0,
                        "price": 1.0, "exchange": 1, "date": 20240102
                    }
                })
                .to_string(),
                req_type: ReqType::Trade,
                expected: Ok(StreamEvent::Ignore),
            },
            TestCase {
                // TC4: status frames are ignored
                input: json!({"header": {"type": "STATUS", "status": "CONNECTED"}}).to_string(),
                req_type: ReqType::Trade,
                expected: Ok(StreamEvent::Ignore),
            },
            TestCase {
                // TC5: matching type without a payload is ignored
                input: json!({
                    "header": {"type": "TRADE"},
                    "contract": {"security_type": "STOCK", "root": "TSLA"}
                })
                .to_string(),
                req_type: ReqType::Trade,
                expected: Ok(StreamEvent::Ignore),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = decode(&test.input, test.req_type);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_decode_invalid_json_is_an_error() {
        let actual = decode("{not json", ReqType::Trade);
        assert!(matches!(actual, Err(DataError::Decode(_))));
    }

    #[test]
    fn test_header_widths_match_record_widths() {
        assert_eq!(header(SecType::Stock, ReqType::Trade).len(), 7);
        assert_eq!(header(SecType::Stock, ReqType::Quote).len(), 10);
        assert_eq!(header(SecType::Option, ReqType::Trade).len(), 10);
        assert_eq!(header(SecType::Option, ReqType::Quote).len(), 13);
    }
}
