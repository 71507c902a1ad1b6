use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use sonora_core::models::ldl::{Ldl, LdlInput};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_ldl_tests(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<Ldl>>, ApiError> {
    Ok(Json(state.records.list_records(patient_id).await?))
}

pub async fn create_ldl_test(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    payload: Result<Json<LdlInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Ldl>), ApiError> {
    let Json(input) = payload?;
    let ldl = input.into_ldl(patient_id, state.today());
    state.records.add_record(&ldl).await?;
    Ok((StatusCode::CREATED, Json(ldl)))
}
