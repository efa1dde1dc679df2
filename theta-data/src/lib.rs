#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! # Theta-Data
//! Typed client for a locally running ThetaData terminal.
//!
//! * **Catalog**: one typed method per REST endpoint (stock history & snapshots, option
//!   at-time, history, bulk history, snapshots and Greeks), each a single validated round trip.
//! * **Tables**: every `{header.format, response}` envelope is shaped into an ordered
//!   [`Table`](table::Table) of raw values, optionally exported to CSV.
//! * **Streaming**: a [`BulkStreamer`](stream::BulkStreamer) subscribes to every trade or
//!   quote for stocks or options and appends each event to a per-root CSV file.
//!
//! ## Absent vs Empty
//! Catalog methods return `Result<Option<Table>, DataError>`:
//! * `Err(_)`: invalid right, interval or venue, a ragged response, or a CSV write failure.
//! * `Ok(None)`: the request could not be made or answered (malformed dates, transport failure,
//!   malformed envelope). Details are logged via `tracing`.
//! * `Ok(Some(table))`: the terminal answered, possibly with zero rows.
//!
//! ## Example
//! ```no_run
//! use theta_data::{
//!     catalog::{DateRange, OptionContract},
//!     client::{ClientConfig, ThetaClient},
//!     query::QueryOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), theta_data::error::DataError> {
//!     let client = ThetaClient::with_config(ClientConfig::default().with_output_dir("./data"))?;
//!
//!     let contract = OptionContract::new("AAPL", "20240119", 190_000, "C");
//!     let range = DateRange::new("20240102", "20240105");
//!
//!     let greeks = client
//!         .option_historical()
//!         .options(QueryOptions::new().with_ivl(60_000))
//!         .write_csv(true)
//!         .greeks(&contract, &range)
//!         .await?;
//!
//!     match greeks {
//!         Some(table) => println!("{table}"),
//!         None => eprintln!("Failed to retrieve data"),
//!     }
//!
//!     Ok(())
//! }
//! ```

/// All [`Error`](std::error::Error)s generated in theta-data.
pub mod error;

/// Pure validators for dates, option rights, intervals and venues.
pub mod validate;

/// Query parameter map and caller-supplied [`QueryOptions`](query::QueryOptions).
pub mod query;

/// Static [`Endpoint`](endpoint::Endpoint) descriptors and their validation
/// [`Rule`](endpoint::Rule)s.
pub mod endpoint;

/// [`Transport`](transport::Transport) abstraction and its `reqwest` implementation.
pub mod transport;

/// Response envelope and the shaped [`Table`](table::Table).
pub mod table;

/// Converts transport results into tables, exporting to CSV on request.
pub mod shaper;

/// CSV export of shaped tables.
pub mod sink;

/// [`ThetaClient`](client::ThetaClient) and its configuration.
pub mod client;

/// Typed methods for every terminal endpoint.
pub mod catalog;

/// Bulk trade & quote event streaming to per-root CSV files.
pub mod stream;
