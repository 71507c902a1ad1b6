use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use sonora_core::models::speech::{SpeechAudiometry, SpeechInput};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_speech_tests(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<SpeechAudiometry>>, ApiError> {
    Ok(Json(state.records.list_records(patient_id).await?))
}

pub async fn create_speech_test(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    payload: Result<Json<SpeechInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SpeechAudiometry>), ApiError> {
    let Json(input) = payload?;
    let speech = input.into_speech(patient_id, state.today());
    state.records.add_record(&speech).await?;
    Ok((StatusCode::CREATED, Json(speech)))
}
