//! Value extraction adapter: meter photo in, numeric consumption out.

use std::sync::Arc;

use meterflow_core::extraction::parse_consumption;
use meterflow_core::measure::MeasureType;

use crate::provider::{ProviderError, RecognitionProvider};

/// Errors from the value extraction adapter.
///
/// Carried as a value so the lifecycle engine can branch on it without
/// unwinding; the HTTP layer maps both variants to an invalid-data reply.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The underlying recognition call failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The provider answered, but the text carried no numeric token.
    #[error("No numeric value found in the recognition response")]
    NoNumericValue,
}

/// Turns a meter photo into a numeric consumption value by delegating to a
/// [`RecognitionProvider`] and parsing its free-text answer.
pub struct ValueExtractor {
    provider: Arc<dyn RecognitionProvider>,
}

impl ValueExtractor {
    pub fn new(provider: Arc<dyn RecognitionProvider>) -> Self {
        Self { provider }
    }

    /// Run recognition and parse the first numeric token out of the answer.
    pub async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
        meter: MeasureType,
    ) -> Result<f64, ExtractionError> {
        let text = self.provider.describe_meter(image, mime_type, meter).await?;
        tracing::debug!(answer = %text, kind = %meter, "Recognition provider answered");
        parse_consumption(&text).ok_or(ExtractionError::NoNumericValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    /// Provider that always answers with the same text.
    struct CannedProvider(&'static str);

    #[async_trait]
    impl RecognitionProvider for CannedProvider {
        async fn describe_meter(
            &self,
            _image: &[u8],
            _mime_type: &str,
            _meter: MeasureType,
        ) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    /// Provider that always fails with a server-side error.
    struct FailingProvider;

    #[async_trait]
    impl RecognitionProvider for FailingProvider {
        async fn describe_meter(
            &self,
            _image: &[u8],
            _mime_type: &str,
            _meter: MeasureType,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::Api {
                status: 500,
                body: "model overloaded".into(),
            })
        }
    }

    #[tokio::test]
    async fn extracts_decimal_reading_from_prose() {
        let extractor = ValueExtractor::new(Arc::new(CannedProvider(
            "O consumo de água na imagem é de 00002.21 m³.",
        )));
        let value = extractor
            .extract(b"img", "image/png", MeasureType::Water)
            .await
            .unwrap();
        assert_eq!(value, 2.21);
    }

    #[tokio::test]
    async fn extracts_integer_reading() {
        let extractor = ValueExtractor::new(Arc::new(CannedProvider("The meter shows 1523 m3")));
        let value = extractor
            .extract(b"img", "image/jpeg", MeasureType::Gas)
            .await
            .unwrap();
        assert_eq!(value, 1523.0);
    }

    #[tokio::test]
    async fn provider_failure_stays_typed() {
        let extractor = ValueExtractor::new(Arc::new(FailingProvider));
        let err = extractor
            .extract(b"img", "image/png", MeasureType::Water)
            .await
            .unwrap_err();
        assert_matches!(err, ExtractionError::Provider(ProviderError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn text_without_digits_is_no_numeric_value() {
        let extractor =
            ValueExtractor::new(Arc::new(CannedProvider("the dial is covered in mud")));
        let err = extractor
            .extract(b"img", "image/png", MeasureType::Gas)
            .await
            .unwrap_err();
        assert_matches!(err, ExtractionError::NoNumericValue);
    }
}
