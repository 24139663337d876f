//! Recognition provider abstraction.

use async_trait::async_trait;
use meterflow_core::measure::MeasureType;

/// Errors from the recognition provider boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Recognition provider error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },

    /// The provider answered 2xx but the response carried no usable text.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// An image-understanding service that reads a photographed utility meter.
///
/// Implementations answer in free text; parsing a numeric value out of the
/// answer is the extractor's job, not the provider's.
#[async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Ask the provider what consumption the meter in `image` shows.
    async fn describe_meter(
        &self,
        image: &[u8],
        mime_type: &str,
        meter: MeasureType,
    ) -> Result<String, ProviderError>;
}
