#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or out-of-domain input, caught before any side effect.
    #[error("Invalid data: {0}")]
    Validation(String),

    /// A meter kind outside WATER/GAS.
    #[error("Invalid measure type: {0}")]
    InvalidType(String),

    /// A reading for the same customer, meter kind, and calendar month
    /// already exists.
    #[error("Reading for this month already exists")]
    DoubleReport,

    /// No measure matched the given id and value pair.
    #[error("Measure not found")]
    MeasureNotFound,

    /// The customer has no stored readings matching the query.
    #[error("No readings found")]
    MeasuresNotFound,

    /// The measure has already been confirmed.
    #[error("Reading already confirmed")]
    ConfirmationDuplicate,

    /// Unexpected fault; message is logged, never exposed to callers.
    #[error("Internal error: {0}")]
    Internal(String),
}
