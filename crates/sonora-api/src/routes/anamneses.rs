use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use sonora_core::models::anamnesis::{Anamnesis, AnamnesisInput};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_anamneses(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<Anamnesis>>, ApiError> {
    Ok(Json(state.records.list_records(patient_id).await?))
}

pub async fn create_anamnesis(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    payload: Result<Json<AnamnesisInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Anamnesis>), ApiError> {
    let Json(input) = payload?;
    let anamnesis = input.into_anamnesis(patient_id, state.today());
    state.records.add_record(&anamnesis).await?;
    Ok((StatusCode::CREATED, Json(anamnesis)))
}
