//! Measure entity model and DTOs.

use meterflow_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `measures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measure {
    pub id: Uuid,
    pub customer_code: String,
    pub image_url: String,
    pub measure_value: f64,
    pub measure_type: String,
    pub measure_datetime: Timestamp,
    pub has_confirmed: bool,
}

/// DTO for inserting a new measure. `has_confirmed` always starts false and
/// is not part of the input.
#[derive(Debug, Clone)]
pub struct CreateMeasure {
    pub id: Uuid,
    pub customer_code: String,
    pub image_url: String,
    pub measure_value: f64,
    pub measure_type: String,
    pub measure_datetime: Timestamp,
}

/// Listing projection. `measure_value` is intentionally absent: listings do
/// not reveal the stored value, the confirmation flow does.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeasureSummary {
    #[serde(rename = "measure_uuid")]
    pub id: Uuid,
    pub measure_datetime: Timestamp,
    pub measure_type: String,
    pub has_confirmed: bool,
    pub image_url: String,
}
