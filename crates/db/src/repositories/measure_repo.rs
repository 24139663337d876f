//! Repository for the `measures` table.

use meterflow_core::types::Timestamp;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::measure::{CreateMeasure, Measure, MeasureSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, customer_code, image_url, measure_value, measure_type, measure_datetime, has_confirmed";

/// Columns of the listing projection (no `measure_value`).
const SUMMARY_COLUMNS: &str =
    "id, measure_datetime, measure_type, has_confirmed, image_url";

/// Provides persistence operations for meter readings.
pub struct MeasureRepo;

impl MeasureRepo {
    /// Insert a new reading, returning the created row.
    ///
    /// `has_confirmed` always starts false. A unique-index violation here
    /// means a concurrent submission won the month; the caller maps it to
    /// the duplicate-report conflict.
    pub async fn create(pool: &PgPool, input: &CreateMeasure) -> Result<Measure, sqlx::Error> {
        let query = format!(
            "INSERT INTO measures \
                 (id, customer_code, image_url, measure_value, measure_type, measure_datetime, has_confirmed)
             VALUES ($1, $2, $3, $4, $5, $6, FALSE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measure>(&query)
            .bind(input.id)
            .bind(&input.customer_code)
            .bind(&input.image_url)
            .bind(input.measure_value)
            .bind(&input.measure_type)
            .bind(input.measure_datetime)
            .fetch_one(pool)
            .await
    }

    /// True if any reading exists for the customer and meter kind with
    /// `measure_datetime` in `[from, to)`.
    pub async fn exists_in_month(
        pool: &PgPool,
        customer_code: &str,
        measure_type: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM measures
                 WHERE customer_code = $1
                   AND measure_type = $2
                   AND measure_datetime >= $3
                   AND measure_datetime < $4
             )",
        )
        .bind(customer_code)
        .bind(measure_type)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Find a reading whose id AND stored value both match.
    ///
    /// Confirmation looks up by the pair on purpose: supplying the wrong
    /// value behaves exactly like a missing measure.
    pub async fn find_by_id_and_value(
        pool: &PgPool,
        id: Uuid,
        measure_value: f64,
    ) -> Result<Option<Measure>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM measures WHERE id = $1 AND measure_value = $2");
        sqlx::query_as::<_, Measure>(&query)
            .bind(id)
            .bind(measure_value)
            .fetch_optional(pool)
            .await
    }

    /// Flip `has_confirmed` to true. Returns `true` if a row transitioned;
    /// `false` means the reading was already confirmed (or does not exist).
    ///
    /// The guard in the WHERE clause keeps the flag monotonic under
    /// concurrent confirmations: exactly one caller observes `true`.
    pub async fn confirm(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE measures SET has_confirmed = TRUE WHERE id = $1 AND has_confirmed = FALSE")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a customer's readings, oldest first, optionally filtered by
    /// meter kind.
    pub async fn list_by_customer(
        pool: &PgPool,
        customer_code: &str,
        measure_type: Option<&str>,
    ) -> Result<Vec<MeasureSummary>, sqlx::Error> {
        match measure_type {
            Some(kind) => {
                let query = format!(
                    "SELECT {SUMMARY_COLUMNS} FROM measures
                     WHERE customer_code = $1 AND measure_type = $2
                     ORDER BY measure_datetime"
                );
                sqlx::query_as::<_, MeasureSummary>(&query)
                    .bind(customer_code)
                    .bind(kind)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {SUMMARY_COLUMNS} FROM measures
                     WHERE customer_code = $1
                     ORDER BY measure_datetime"
                );
                sqlx::query_as::<_, MeasureSummary>(&query)
                    .bind(customer_code)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
