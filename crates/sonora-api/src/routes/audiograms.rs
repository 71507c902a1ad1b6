use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use sonora_core::models::audiogram::{Audiogram, AudiogramInput};
use sonora_core::models::patient::Patient;
use sonora_core::models::threshold::Threshold;
use sonora_core::pta::PtaSummary;

use crate::error::ApiError;
use crate::state::AppState;

/// An audiogram with the values derived from its owning patient.
#[derive(Serialize)]
pub struct AudiogramResponse {
    #[serde(flatten)]
    audiogram: Audiogram,
    age_at_exam: Option<i32>,
    pta: PtaSummary,
}

impl AudiogramResponse {
    pub fn new(audiogram: &Audiogram, patient: &Patient) -> Self {
        let view = audiogram.view(patient);
        Self {
            age_at_exam: view.age(),
            pta: view.summary(),
            audiogram: audiogram.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct PtaResponse {
    ear: String,
    pta: Option<f64>,
}

pub async fn list_audiograms(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<AudiogramResponse>>, ApiError> {
    let patient = state.records.get_patient(patient_id).await?;
    let audiograms: Vec<Audiogram> = state.records.list_records(patient_id).await?;
    Ok(Json(
        audiograms
            .iter()
            .map(|a| AudiogramResponse::new(a, &patient))
            .collect(),
    ))
}

pub async fn create_audiogram(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    payload: Result<Json<AudiogramInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AudiogramResponse>), ApiError> {
    let Json(input) = payload?;
    let patient = state.records.get_patient(patient_id).await?;
    let audiogram = input.into_audiogram(patient_id, state.today())?;
    state.records.add_record(&audiogram).await?;
    Ok((
        StatusCode::CREATED,
        Json(AudiogramResponse::new(&audiogram, &patient)),
    ))
}

pub async fn get_audiogram(
    State(state): State<AppState>,
    Path((patient_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AudiogramResponse>, ApiError> {
    let patient = state.records.get_patient(patient_id).await?;
    let audiogram: Audiogram = state.records.get_record(patient_id, id).await?;
    Ok(Json(AudiogramResponse::new(&audiogram, &patient)))
}

/// PTA for a single ear code. Unknown codes answer `null`, not an error.
pub async fn get_pta(
    State(state): State<AppState>,
    Path((patient_id, id, ear)): Path<(Uuid, Uuid, String)>,
) -> Result<Json<PtaResponse>, ApiError> {
    let patient = state.records.get_patient(patient_id).await?;
    let audiogram: Audiogram = state.records.get_record(patient_id, id).await?;
    let pta = audiogram.view(&patient).pta_for_code(&ear);
    Ok(Json(PtaResponse { ear, pta }))
}

pub async fn threshold_layout() -> Json<Vec<Threshold>> {
    Json(Threshold::default_layout())
}
