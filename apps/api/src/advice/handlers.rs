//! Axum route handlers for the Advice API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::advice::pipeline::analyze_and_advise;
use crate::advice::prompts::{IncomeRange, UserContext};
use crate::advisor_client::AdviceResult;
use crate::errors::AppError;
use crate::state::AppState;
use crate::statement::upload::read_upload;
use crate::statement::MediaType;

pub const CAREER_FIELD: &str = "career";
pub const INCOME_RANGE_FIELD: &str = "income_range";

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub request_id: Uuid,
    pub kind: MediaType,
    pub advice: AdviceResult,
}

/// POST /api/v1/advice
///
/// Multipart form: `file` (PDF or CSV statement), `career` (free text, optional),
/// `income_range` (one of the labels from `GET /api/v1/income-ranges`).
pub async fn handle_advice(
    State(state): State<AppState>,
    multipart: axum::extract::Multipart,
) -> Result<Json<AdviceResponse>, AppError> {
    let mut form = read_upload(multipart).await?;

    let income_range = form
        .field(INCOME_RANGE_FIELD)
        .ok_or_else(|| AppError::Validation(format!("'{INCOME_RANGE_FIELD}' is required")))?
        .parse::<IncomeRange>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let ctx = UserContext {
        career: form.field(CAREER_FIELD).unwrap_or_default().to_string(),
        income_range,
    };
    let document = form.require_document()?;

    let request_id = Uuid::new_v4();
    let outcome = analyze_and_advise(document, &ctx, state.advisor.as_ref())
        .instrument(tracing::info_span!("advice", %request_id))
        .await?;

    Ok(Json(AdviceResponse {
        request_id,
        kind: outcome.media_type,
        advice: outcome.advice,
    }))
}

/// GET /api/v1/income-ranges
pub async fn handle_income_ranges() -> Json<Vec<&'static str>> {
    Json(IncomeRange::ALL.iter().map(|r| r.label()).collect())
}
