use crate::error::DataError;
use serde::{Deserialize, Serialize};

/// Security class of a bulk stream.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SecType {
    Stock,
    Option,
}

impl SecType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecType::Stock => "STOCK",
            SecType::Option => "OPTION",
        }
    }

    /// Output sub-folder name, eg/ `stocks`.
    pub fn folder(&self) -> &'static str {
        match self {
            SecType::Stock => "stocks",
            SecType::Option => "options",
        }
    }
}

impl std::fmt::Display for SecType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event class of a bulk stream.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReqType {
    Trade,
    Quote,
}

impl ReqType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReqType::Trade => "TRADE",
            ReqType::Quote => "QUOTE",
        }
    }

    /// Plural name used for output folders and progress reports, eg/ `trades`.
    pub fn mode(&self) -> &'static str {
        match self {
            ReqType::Trade => "trades",
            ReqType::Quote => "quotes",
        }
    }
}

impl std::fmt::Display for ReqType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bulk stream subscription: every trade or quote for one security class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
pub struct Subscription {
    pub sec_type: SecType,
    pub req_type: ReqType,
    /// Client chosen subscription id, echoed back by the terminal.
    pub id: u64,
}

impl Subscription {
    pub fn new(sec_type: SecType, req_type: ReqType, id: u64) -> Self {
        Self {
            sec_type,
            req_type,
            id,
        }
    }

    /// `STREAM_BULK` request frame that opens this subscription.
    pub fn request(&self) -> StreamBulkRequest {
        StreamBulkRequest {
            msg_type: "STREAM_BULK",
            sec_type: self.sec_type,
            req_type: self.req_type,
            add: true,
            id: self.id,
        }
    }

    pub fn to_message(&self) -> Result<String, DataError> {
        serde_json::to_string(&self.request()).map_err(|error| DataError::Decode(error.to_string()))
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} #{}", self.sec_type, self.req_type, self.id)
    }
}

/// ### Raw Payload Examples
/// ```json
/// {"msg_type": "STREAM_BULK", "sec_type": "OPTION", "req_type": "TRADE", "add": true, "id": 0}
/// ```
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct StreamBulkRequest {
    pub msg_type: &'static str,
    pub sec_type: SecType,
    pub req_type: ReqType,
    pub add: bool,
    pub id: u64,
}
