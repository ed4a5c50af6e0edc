use thiserror::Error;

/// Errors produced by [`WeatherClient`](crate::WeatherClient).
#[derive(Debug, Error)]
pub enum YrError {
    /// Request arguments were rejected before any network activity.
    #[error("{0}")]
    Validation(String),

    /// The operation name does not exist in the endpoint map.
    #[error("Unknown operation '{0}'. Supported operations: location_forecast, text_forecast.")]
    InvalidOperation(String),

    /// The HTTP client failed, or the server answered with a non-success status.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse forecast XML: {0}")]
    Parse(#[from] roxmltree::Error),

    /// The response root element had no child element to hand back.
    #[error("Forecast XML has no content below its root element")]
    EmptyDocument,

    /// The runtime dropped the request task before it produced a result.
    #[error("Request was cancelled before it completed")]
    Cancelled,

    #[error("No tokio runtime available; pass one with `WeatherClientBuilder::runtime`")]
    NoRuntime,

    /// A blocking call would wait on a current-thread runtime that nothing drives.
    #[error(
        "Blocking calls need a multi-thread runtime; use the async or callback API on a \
         current-thread runtime"
    )]
    BlockingOnCurrentThread,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl YrError {
    pub(crate) fn missing_coordinates() -> Self {
        YrError::Validation("latitude and/or longitude is missing".to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, YrError::Validation(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, YrError::Network(_))
    }
}

pub type Result<T, E = YrError> = std::result::Result<T, E>;
