use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sonora_core::models::anamnesis::Anamnesis;
use sonora_core::models::ldl::Ldl;
use sonora_core::models::patient::{Patient, PatientInput};
use sonora_core::models::speech::SpeechAudiometry;

use crate::error::ApiError;
use crate::routes::audiograms::AudiogramResponse;
use crate::state::AppState;

/// Patients shown on the dashboard.
const RECENT_PATIENTS: usize = 8;

/// Records of each kind shown on the patient chart.
const CHART_RECORDS: usize = 5;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
pub struct PatientChartResponse {
    patient: Patient,
    /// Age today, if the birth date is known.
    age: Option<i32>,
    anamneses: Vec<Anamnesis>,
    audiograms: Vec<AudiogramResponse>,
    speech: Vec<SpeechAudiometry>,
    ldl: Vec<Ldl>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    removed: usize,
}

pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.records.list_patients(&params.q).await?))
}

pub async fn recent_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.records.recent_patients(RECENT_PATIENTS).await?))
}

pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let Json(input) = payload?;
    let patient = input.into_patient();
    state.records.create_patient(&patient).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn get_patient_chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientChartResponse>, ApiError> {
    let chart = state.records.chart(id, CHART_RECORDS).await?;
    let audiograms = chart
        .audiograms
        .iter()
        .map(|a| AudiogramResponse::new(a, &chart.patient))
        .collect();

    Ok(Json(PatientChartResponse {
        age: chart.patient.age_on(state.today()),
        audiograms,
        patient: chart.patient,
        anamneses: chart.anamneses,
        speech: chart.speech,
        ldl: chart.ldl,
    }))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let Json(input) = payload?;
    let mut patient = state.records.get_patient(id).await?;
    input.apply_to(&mut patient);
    state.records.update_patient(&patient).await?;
    Ok(Json(patient))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = state.records.delete_patient(id).await?;
    Ok(Json(DeleteResponse { removed }))
}
