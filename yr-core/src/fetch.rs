use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use url::Url;

use crate::error::YrError;

/// GET a URL and hand back the response body.
///
/// [`WeatherClient`](crate::WeatherClient) issues every request through this
/// trait, so tests and embedders can swap the transport.
#[async_trait]
pub trait Fetch: Send + Sync + Debug {
    async fn get_text(&self, url: Url) -> Result<String, YrError>;
}

#[async_trait]
impl Fetch for Client {
    async fn get_text(&self, url: Url) -> Result<String, YrError> {
        let res = self
            .get(url.clone())
            .send()
            .await
            .map_err(|e| YrError::Network(format!("Failed to send request to {url}: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            YrError::Network(format!("Failed to read response body from {url}: {e}"))
        })?;

        if !status.is_success() {
            return Err(YrError::Network(format!(
                "Request to {url} failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_kept() {
        assert_eq!(truncate_body("Not Found"), "Not Found");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "ø".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
