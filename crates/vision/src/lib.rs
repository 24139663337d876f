//! Image-understanding integration: the recognition provider abstraction,
//! the Gemini HTTP client, and the adapter that turns a meter photo into a
//! numeric consumption value.

pub mod extractor;
pub mod gemini;
pub mod provider;

pub use extractor::{ExtractionError, ValueExtractor};
pub use gemini::GeminiClient;
pub use provider::{ProviderError, RecognitionProvider};
