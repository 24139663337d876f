//! Handlers for the `/measures` resource: submission, confirmation, listing.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meterflow_core::error::CoreError;
use meterflow_core::extraction::round_to_hundredths;
use meterflow_core::measure::{self, MeasureType};
use meterflow_core::naming;
use meterflow_db::models::measure::{CreateMeasure, MeasureSummary};
use meterflow_db::repositories::MeasureRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// Response payload for a successful submission.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image_url: String,
    pub measure_value: f64,
    pub measure_id: Uuid,
}

/// Collected multipart fields for the upload endpoint.
#[derive(Debug, Default)]
struct UploadForm {
    customer_code: Option<String>,
    measure_type: Option<String>,
    measure_datetime: Option<String>,
    /// Declared content type and raw bytes of the `image` part.
    image: Option<(String, Vec<u8>)>,
}

/// Drain the multipart stream into an [`UploadForm`]. Unknown fields are
/// ignored; presence checks happen in the handler.
async fn read_upload_form(multipart: &mut Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "customer_code" => {
                form.customer_code =
                    Some(field.text().await.map_err(|e| AppError::BadRequest(e.to_string()))?);
            }
            "measure_type" => {
                form.measure_type =
                    Some(field.text().await.map_err(|e| AppError::BadRequest(e.to_string()))?);
            }
            "measure_datetime" => {
                form.measure_datetime =
                    Some(field.text().await.map_err(|e| AppError::BadRequest(e.to_string()))?);
            }
            "image" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.image = Some((content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /measures/upload
///
/// Multipart form: `customer_code`, `measure_type` (WATER|GAS, any case),
/// `measure_datetime` (RFC 3339), `image` (jpeg/png/webp, at most 10 MiB).
///
/// Order matters: the duplicate guard runs before the recognition call and
/// before any write, so a rejected month costs neither an external call nor
/// a stored file.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let form = read_upload_form(&mut multipart).await?;

    // -- Request shape --
    let customer_code = form
        .customer_code
        .ok_or_else(|| CoreError::Validation("customer_code is required".into()))?;
    measure::validate_customer_code(&customer_code)?;

    let raw_type = form
        .measure_type
        .ok_or_else(|| CoreError::InvalidType("measure_type is required".into()))?;
    let measure_type = MeasureType::parse(&raw_type)?;

    let raw_datetime = form
        .measure_datetime
        .ok_or_else(|| CoreError::Validation("measure_datetime is required".into()))?;
    let measure_datetime = measure::parse_measure_datetime(&raw_datetime)?;

    let (image_type, image_bytes) = form
        .image
        .ok_or_else(|| CoreError::Validation("image file is required".into()))?;
    measure::validate_image(&image_type, &image_bytes)?;

    // -- Duplicate guard --
    let (month_start, month_end) = measure::month_window(measure_datetime);
    let duplicate = MeasureRepo::exists_in_month(
        &state.pool,
        &customer_code,
        measure_type.as_str(),
        month_start,
        month_end,
    )
    .await?;
    if duplicate {
        return Err(CoreError::DoubleReport.into());
    }

    // -- Extraction --
    let measure_value = state
        .extractor
        .extract(&image_bytes, &image_type, measure_type)
        .await?;

    // -- Store the image, then the row --
    let filename = naming::stored_image_filename(
        chrono::Utc::now().timestamp_millis(),
        rand::rng().random(),
        &image_type,
    );
    let image_url = state
        .files
        .save(&filename, &image_bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;

    let input = CreateMeasure {
        id: Uuid::new_v4(),
        customer_code,
        image_url,
        measure_value,
        measure_type: measure_type.as_str().to_string(),
        measure_datetime,
    };
    let measure = match MeasureRepo::create(&state.pool, &input).await {
        Ok(row) => row,
        Err(e) => {
            // The row did not land; do not leave the image behind.
            state.files.remove(&filename).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        measure_id = %measure.id,
        customer = %measure.customer_code,
        kind = %measure.measure_type,
        value = measure.measure_value,
        "Reading accepted"
    );

    Ok(Json(UploadResponse {
        image_url: measure.image_url,
        measure_value: measure.measure_value,
        measure_id: measure.id,
    }))
}

// ---------------------------------------------------------------------------
// Confirm
// ---------------------------------------------------------------------------

/// Request body for the confirmation endpoint.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub measure_uuid: Uuid,
    pub confirmed_value: f64,
}

/// Response payload for a successful confirmation.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub success: bool,
}

/// PATCH /measures/confirm
///
/// Confirmation attests the customer saw the value the system computed: the
/// lookup requires id AND value to match, and the flag flips at most once.
/// The stored value is never overwritten.
pub async fn confirm(
    State(state): State<AppState>,
    Json(input): Json<ConfirmRequest>,
) -> AppResult<Json<ConfirmResponse>> {
    if !input.confirmed_value.is_finite() {
        return Err(CoreError::Validation("confirmed_value must be a finite number".into()).into());
    }
    let confirmed_value = round_to_hundredths(input.confirmed_value);

    let measure =
        MeasureRepo::find_by_id_and_value(&state.pool, input.measure_uuid, confirmed_value)
            .await?
            .ok_or(CoreError::MeasureNotFound)?;

    if measure.has_confirmed {
        return Err(CoreError::ConfirmationDuplicate.into());
    }

    // Guarded update: a concurrent confirmation between the read above and
    // this write still results in exactly one flip.
    let flipped = MeasureRepo::confirm(&state.pool, measure.id).await?;
    if !flipped {
        return Err(CoreError::ConfirmationDuplicate.into());
    }

    tracing::info!(measure_id = %measure.id, "Reading confirmed");

    Ok(Json(ConfirmResponse { success: true }))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub measure_type: Option<String>,
}

/// Response payload for the listing endpoint.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub customer_code: String,
    pub measures: Vec<MeasureSummary>,
}

/// GET /measures/{customer_code}/list?measure_type=
///
/// An empty result is a domain-level miss, not an empty success list.
pub async fn list(
    State(state): State<AppState>,
    Path(customer_code): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListResponse>> {
    let kind = params
        .measure_type
        .as_deref()
        .map(MeasureType::parse)
        .transpose()?;

    let measures = MeasureRepo::list_by_customer(
        &state.pool,
        &customer_code,
        kind.map(MeasureType::as_str),
    )
    .await?;

    if measures.is_empty() {
        return Err(CoreError::MeasuresNotFound.into());
    }

    Ok(Json(ListResponse {
        customer_code,
        measures,
    }))
}
