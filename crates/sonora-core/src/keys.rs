//! Object key conventions.
//!
//! Pure string functions, no storage dependency. Everything a patient owns
//! lives under `patients/{id}/`, so removing that prefix removes the chart.

use uuid::Uuid;

use crate::models::RecordKind;
use crate::models::patient::normalize_rut;

pub const PATIENTS_PREFIX: &str = "patients/";

pub const PATIENT_DOCUMENT: &str = "patient.json";

pub const RUTS_PREFIX: &str = "ruts/";

pub fn patient_prefix(id: Uuid) -> String {
    format!("{PATIENTS_PREFIX}{id}/")
}

pub fn patient(id: Uuid) -> String {
    format!("{PATIENTS_PREFIX}{id}/{PATIENT_DOCUMENT}")
}

/// True for `patients/{id}/patient.json`, not for the records beneath it.
pub fn is_patient_document(key: &str) -> bool {
    key.strip_prefix(PATIENTS_PREFIX)
        .and_then(|rest| rest.split_once('/'))
        .is_some_and(|(_, tail)| tail == PATIENT_DOCUMENT)
}

pub fn records_prefix(patient_id: Uuid, kind: RecordKind) -> String {
    format!("{PATIENTS_PREFIX}{patient_id}/{}/", kind.segment())
}

pub fn record(patient_id: Uuid, kind: RecordKind, id: Uuid) -> String {
    format!("{PATIENTS_PREFIX}{patient_id}/{}/{id}.json", kind.segment())
}

/// Uniqueness marker for a RUT; its body is the owning patient's id.
pub fn rut_marker(rut: &str) -> String {
    format!("{RUTS_PREFIX}{}", normalize_rut(rut))
}
