use crate::{
    catalog::{Catalog, OptionBulk, OptionHistorical, OptionSnapshot, StockHistorical, StockSnapshot},
    endpoint::Endpoint,
    error::DataError,
    query::{Query, QueryOptions},
    shaper::ResponseShaper,
    sink::CsvSink,
    table::Table,
    transport::{DEFAULT_BASE_URL, HttpTransport, Transport},
};
use std::path::PathBuf;
use tracing::error;

/// [`ThetaClient`] configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Terminal REST base url
    pub base_url: String,
    /// Directory CSV exports are written to
    pub output_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("./"),
        }
    }
}

impl ClientConfig {
    /// Set the terminal base url
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the CSV export directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Client for the terminal REST endpoints.
///
/// Every request is a single round trip: assemble the query, validate it, send it through the
/// [`Transport`] and shape the response into a [`Table`].
///
/// ```no_run
/// use theta_data::{client::ThetaClient, catalog::DateRange};
///
/// # async fn run() -> Result<(), theta_data::error::DataError> {
/// let client = ThetaClient::new()?;
/// let eod = client
///     .stock_historical()
///     .write_csv(true)
///     .eod_report("AAPL", &DateRange::new("20240101", "20240131"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ThetaClient<T = HttpTransport> {
    transport: T,
    shaper: ResponseShaper,
}

impl ThetaClient {
    /// Construct a [`ThetaClient`] for the default local terminal, exporting to `./`.
    pub fn new() -> Result<Self, DataError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, DataError> {
        let transport = HttpTransport::new(&config.base_url)?;
        Ok(Self::with_transport(transport, config.output_dir))
    }
}

impl<T> ThetaClient<T> {
    /// Construct a [`ThetaClient`] over any [`Transport`].
    pub fn with_transport(transport: T, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            shaper: ResponseShaper::new(CsvSink::new(output_dir)),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &CsvSink {
        self.shaper.sink()
    }

    /// Stock end-of-day, quote, OHLC, trade, split and dividend history.
    pub fn stock_historical(&self) -> Catalog<'_, StockHistorical, T> {
        Catalog::new(self)
    }

    /// Real-time stock quotes, OHLC and trades.
    pub fn stock_snapshot(&self) -> Catalog<'_, StockSnapshot, T> {
        Catalog::new(self)
    }

    /// Single contract option history, including at-time and Greeks.
    pub fn option_historical(&self) -> Catalog<'_, OptionHistorical, T> {
        Catalog::new(self)
    }

    /// Option history for every contract of a root & expiration.
    pub fn option_bulk(&self) -> Catalog<'_, OptionBulk, T> {
        Catalog::new(self)
    }

    /// Real-time option snapshots, for one contract or a whole chain.
    pub fn option_snapshot(&self) -> Catalog<'_, OptionSnapshot, T> {
        Catalog::new(self)
    }
}

impl<T> ThetaClient<T>
where
    T: Transport,
{
    /// Execute one request against `endpoint`.
    ///
    /// Returns `Ok(None)` if the dates are malformed (without calling the transport), if the
    /// transport fails, or if the response is not an envelope. Any other validation failure is
    /// returned as an error.
    pub async fn request(
        &self,
        endpoint: &Endpoint,
        key: Query,
        identifier: &str,
        options: &QueryOptions,
        write_csv: bool,
    ) -> Result<Option<Table>, DataError> {
        let query = endpoint.assemble(key, options)?;

        if let Err(error) = endpoint.validate(&query) {
            if error.is_recoverable() {
                error!(path = endpoint.path, %error, "invalid request parameters, skipping request");
                return Ok(None);
            }
            return Err(error);
        }

        let response = self.transport.get(endpoint.path, &query).await;

        self.shaper
            .shape(response, write_csv, endpoint.category, identifier)
    }
}
