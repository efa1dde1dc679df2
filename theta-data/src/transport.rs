use crate::{error::DataError, query::Query};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

/// Default REST base url of the local terminal.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:25510";

/// Single best-effort `GET` against the terminal.
///
/// Implementations never fail loudly: any transport level problem is logged and reported as
/// `None`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &Query) -> Option<Value>;
}

/// [`Transport`] backed by a [`reqwest::Client`]. No retries, no backoff.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, DataError> {
        let base_url = Url::parse(base_url).map_err(|error| DataError::InvalidUrl {
            url: base_url.to_string(),
            reason: error.to_string(),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &Query) -> Option<Value> {
        let url = match self.base_url.join(path) {
            Ok(url) => url,
            Err(error) => {
                error!(%path, %error, "failed to build request url");
                return None;
            }
        };

        debug!(%url, ?query, "sending terminal request");

        let response = match self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .query(&query.pairs())
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                error!(%url, %error, "terminal request failed");
                error!("Response content: No response");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "No response".to_string());
            error!(%url, %status, "terminal request failed");
            error!("Response content: {body}");
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => {
                info!(%url, "terminal request succeeded");
                Some(body)
            }
            Err(error) => {
                error!(%url, %error, "failed to decode terminal response as JSON");
                None
            }
        }
    }
}
