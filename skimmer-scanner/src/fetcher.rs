use crate::error::{Result, ScanError};
use reqwest::Client;
use url::Url;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Shortest request timeout a client is built with; zero would fail every request.
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Raw markup returned by a [`Fetcher`].
///
/// A page that could not be retrieved has `exists = false` and an empty
/// body; fetching never fails outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub uri: String,
    pub body: String,
    pub exists: bool,
}

impl FetchedPage {
    pub fn found(uri: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            body: body.into(),
            exists: true,
        }
    }

    pub fn missing(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            body: String::new(),
            exists: false,
        }
    }
}

pub trait Fetcher {
    fn fetch(&self, uri: &str) -> impl Future<Output = FetchedPage> + Send;
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("Skimmer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches pages over HTTP with a single pooled client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(&FetchOptions::default())
    }

    pub fn with_options(options: &FetchOptions) -> Result<Self> {
        let timeout_secs = options.timeout_secs.max(MIN_TIMEOUT_SECS);
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Fetches `uri`, failing on transport errors and non-success statuses.
    pub async fn try_fetch(&self, uri: &str) -> Result<String> {
        let url =
            Url::parse(uri).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", uri, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ScanError::InvalidUrl(format!("unsupported scheme in {}", uri)));
        }
        debug!("Fetching {}", uri);

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes) in {:?}",
            uri,
            body.len(),
            start.elapsed()
        );
        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> FetchedPage {
        match self.try_fetch(uri).await {
            Ok(body) => FetchedPage::found(uri, body),
            Err(e) => {
                warn!("Fetch failed for {}: {}", uri, e);
                FetchedPage::missing(uri)
            }
        }
    }
}
