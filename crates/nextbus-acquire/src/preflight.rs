/// Well-known endpoint used to confirm outbound HTTP works.
pub const DEFAULT_PREFLIGHT_URL: &str = "https://www.google.com";

/// Issue one GET to `url` and log whether a response came back.
///
/// Any HTTP response counts as success, whatever its status. The result
/// is informational only and never stops the run.
pub async fn probe(http: &reqwest::Client, url: &str) -> bool {
    match http.get(url).send().await {
        Ok(response) => {
            tracing::info!(url, status = %response.status(), "HTTP connectivity check passed");
            true
        }
        Err(err) => {
            tracing::error!(url, "HTTP connectivity check failed: {err}");
            false
        }
    }
}
