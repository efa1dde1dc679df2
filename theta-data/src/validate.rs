//! Domain parameter validators.
//!
//! Each validator is a pure predicate. Call sites decide whether a failed check is fatal, see
//! [`DataError::is_recoverable`](crate::error::DataError::is_recoverable).

/// Smallest accepted aggregation interval in milliseconds.
pub const MIN_INTERVAL_MS: i64 = 100;

/// Largest accepted aggregation interval in milliseconds (one hour).
pub const MAX_INTERVAL_MS: i64 = 3_600_000;

/// Venues accepted by the stock quote snapshot endpoints.
pub const VENUES: [&str; 2] = ["nqb", "utp_cta"];

/// True if `date` is exactly eight ASCII digits (`YYYYMMDD`).
///
/// Calendar validity is not checked, so `"20241301"` passes.
pub fn valid_date(date: &str) -> bool {
    date.len() == 8 && date.bytes().all(|byte| byte.is_ascii_digit())
}

/// True if `right` is exactly `"C"` or `"P"`.
pub fn valid_right(right: &str) -> bool {
    matches!(right, "C" | "P")
}

/// True if `ivl` is within `100..=3_600_000` milliseconds.
pub fn valid_interval(ivl: i64) -> bool {
    (MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&ivl)
}

/// True if `venue` is one of [`VENUES`].
pub fn valid_venue(venue: &str) -> bool {
    VENUES.contains(&venue)
}
