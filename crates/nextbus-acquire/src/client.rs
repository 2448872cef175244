//! HTTP client for the EMT Madrid PMV visor.
//!
//! One GET per stop, bounded by a client-wide timeout. No retries.

use std::time::Duration;

use nextbus_model::{ArrivalEstimate, StopId};

use crate::board::{self, ParsedBoard};
use crate::error::AcquireError;

/// Stop board endpoint. The stop number and page size go in the query.
pub const DEFAULT_BASE_URL: &str = "https://www.emtmadrid.es/PMVVisor/pmv.aspx";

/// Number of estimates requested per stop.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!(
    "nextbus/",
    env!("CARGO_PKG_VERSION"),
    " (bus estimate tool)"
);

/// Configuration for the stop board client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Visor endpoint (defaults to the production EMT page)
    pub base_url: String,
    /// Value of the `size` query parameter
    pub page_size: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect directly, ignoring any proxy set in the environment.
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

/// Fetches and parses stop boards.
///
/// Holds one `reqwest::Client` so consecutive stops share a connection pool.
#[derive(Debug, Clone)]
pub struct StopBoardClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl StopBoardClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            page_size: config.page_size,
        })
    }

    /// The underlying HTTP client, shared with the connectivity probe.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn board_url(&self, stop: StopId) -> String {
        format!(
            "{}?stopnum={stop}&size={}",
            self.base_url, self.page_size
        )
    }

    async fn fetch_page(&self, stop: StopId) -> Result<String, AcquireError> {
        let url = self.board_url(stop);
        tracing::debug!(url = %url, "Fetching stop board");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| AcquireError::Transport { stop, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Status { stop, status });
        }

        response
            .text()
            .await
            .map_err(|source| AcquireError::Transport { stop, source })
    }

    /// Fetch one stop board and parse it, surfacing every failure.
    pub async fn try_fetch_estimates(&self, stop: StopId) -> Result<ParsedBoard, AcquireError> {
        let html = self.fetch_page(stop).await?;
        tracing::debug!(stop = %stop, bytes = html.len(), "Received HTML");

        board::parse_board(&html, stop)
    }

    /// Fetch the next arrivals for a stop.
    ///
    /// Never fails: transport errors, bad statuses and pages without a
    /// table are logged against the stop and yield an empty list.
    pub async fn fetch_estimates(&self, stop: StopId) -> Vec<ArrivalEstimate> {
        match self.try_fetch_estimates(stop).await {
            Ok(board) => board.estimates,
            Err(err @ AcquireError::MissingTable { .. }) => {
                tracing::warn!(stop = %err.stop(), "{err}");
                Vec::new()
            }
            Err(err) => {
                tracing::error!(stop = %err.stop(), "{err}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{refused_addr, serve};

    const BOARD_1490: &str = r#"<html><body>
        <table>
          <tr><th>Línea</th><th>Destino</th><th>Tiempo</th></tr>
          <tr><td>27</td><td>Sol</td><td>3 min</td></tr>
          <tr><td>N1</td><td>Atocha</td><td>12 min</td></tr>
        </table>
        </body></html>"#;

    fn stop(n: u32) -> StopId {
        StopId::new(n).unwrap()
    }

    fn client_for(base_url: String) -> StopBoardClient {
        StopBoardClient::new(
            ClientConfig::new()
                .with_base_url(base_url)
                .with_timeout(Duration::from_millis(500))
                .without_proxy(),
        )
        .unwrap()
    }

    #[test]
    fn test_board_url() {
        let client = StopBoardClient::new(ClientConfig::new()).unwrap();
        assert_eq!(
            client.board_url(stop(1490)),
            "https://www.emtmadrid.es/PMVVisor/pmv.aspx?stopnum=1490&size=3"
        );

        let client = StopBoardClient::new(
            ClientConfig::new()
                .with_base_url("http://localhost:8080/pmv.aspx")
                .with_page_size(5),
        )
        .unwrap();
        assert_eq!(
            client.board_url(stop(1778)),
            "http://localhost:8080/pmv.aspx?stopnum=1778&size=5"
        );
    }

    #[tokio::test]
    async fn test_fetch_estimates() {
        let addr = serve("200 OK", BOARD_1490).await;
        let client = client_for(format!("http://{addr}/PMVVisor/pmv.aspx"));

        let estimates = client.fetch_estimates(stop(1490)).await;

        assert_eq!(
            estimates,
            vec![
                ArrivalEstimate::new("27", "Sol", "3 min"),
                ArrivalEstimate::new("N1", "Atocha", "12 min"),
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_fetch_is_identical() {
        let addr = serve("200 OK", BOARD_1490).await;
        let client = client_for(format!("http://{addr}/PMVVisor/pmv.aspx"));

        let first = client.fetch_estimates(stop(1490)).await;
        let second = client.fetch_estimates(stop(1490)).await;

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_error_status() {
        let addr = serve("503 Service Unavailable", "<html>down</html>").await;
        let client = client_for(format!("http://{addr}/pmv.aspx"));

        let err = client.try_fetch_estimates(stop(1490)).await.unwrap_err();
        assert!(matches!(
            err,
            AcquireError::Status { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));

        assert!(client.fetch_estimates(stop(1490)).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_table() {
        let addr = serve("200 OK", "<html><body>Parada no encontrada</body></html>").await;
        let client = client_for(format!("http://{addr}/pmv.aspx"));

        let err = client.try_fetch_estimates(stop(1778)).await.unwrap_err();
        assert!(matches!(err, AcquireError::MissingTable { .. }));
        assert_eq!(err.to_string(), "No table found for stop 1778.");

        assert!(client.fetch_estimates(stop(1778)).await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let addr = refused_addr();
        let client = client_for(format!("http://{addr}/pmv.aspx"));

        let err = client.try_fetch_estimates(stop(1778)).await.unwrap_err();
        assert!(matches!(err, AcquireError::Transport { .. }));
        assert_eq!(err.stop(), stop(1778));

        assert!(client.fetch_estimates(stop(1778)).await.is_empty());
    }

    #[tokio::test]
    async fn test_timeout() {
        // Accepts connections at the socket level but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = StopBoardClient::new(
            ClientConfig::new()
                .with_base_url(format!("http://{addr}/pmv.aspx"))
                .with_timeout(Duration::from_millis(200))
                .without_proxy(),
        )
        .unwrap();

        let err = client.try_fetch_estimates(stop(1778)).await.unwrap_err();
        match &err {
            AcquireError::Transport { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected transport error, got {other:?}"),
        }
        assert!(err.to_string().contains("1778"));

        assert!(client.fetch_estimates(stop(1778)).await.is_empty());
        drop(listener);
    }
}
