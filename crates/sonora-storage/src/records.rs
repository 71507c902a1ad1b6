//! Typed access to patient charts.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use sonora_core::keys;
use sonora_core::models::anamnesis::Anamnesis;
use sonora_core::models::audiogram::Audiogram;
use sonora_core::models::ldl::Ldl;
use sonora_core::models::patient::{self, normalize_rut, Patient};
use sonora_core::models::speech::SpeechAudiometry;
use sonora_core::models::{sort_newest_first, ClinicalRecord};
use sonora_core::validation::FieldError;

use crate::documents;
use crate::error::StorageError;
use crate::objects::ObjectStore;

/// A patient with the most recent records of each kind.
#[derive(Debug, Clone)]
pub struct PatientChart {
    pub patient: Patient,
    pub anamneses: Vec<Anamnesis>,
    pub audiograms: Vec<Audiogram>,
    pub speech: Vec<SpeechAudiometry>,
    pub ldl: Vec<Ldl>,
}

/// Repository over an [`ObjectStore`].
#[derive(Clone)]
pub struct Records {
    store: ObjectStore,
}

impl Records {
    pub fn new(store: ObjectStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Store a new patient. Fails on validation errors or a RUT already in use.
    pub async fn create_patient(&self, patient: &Patient) -> Result<(), StorageError> {
        check(patient.validate())?;
        self.claim_rut(&patient.rut, patient.id).await?;
        documents::save(&self.store, &keys::patient(patient.id), patient).await?;
        tracing::info!(patient_id = %patient.id, "patient created");
        Ok(())
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<Patient, StorageError> {
        documents::load(&self.store, &keys::patient(id)).await
    }

    /// Replace a patient's demographics. A changed RUT is re-checked for
    /// uniqueness and the old one released.
    pub async fn update_patient(&self, patient: &Patient) -> Result<(), StorageError> {
        check(patient.validate())?;
        let previous = self.get_patient(patient.id).await?;

        let rut_changed = normalize_rut(&previous.rut) != normalize_rut(&patient.rut);
        if rut_changed {
            self.claim_rut(&patient.rut, patient.id).await?;
        }
        documents::save(&self.store, &keys::patient(patient.id), patient).await?;
        if rut_changed {
            self.store.delete(&keys::rut_marker(&previous.rut)).await?;
        }

        tracing::info!(patient_id = %patient.id, rut_changed, "patient updated");
        Ok(())
    }

    /// Delete a patient and everything stored under it.
    /// Returns the number of documents removed.
    pub async fn delete_patient(&self, id: Uuid) -> Result<usize, StorageError> {
        let patient = self.get_patient(id).await?;
        let removed = self.store.delete_prefix(&keys::patient_prefix(id)).await?;
        self.store.delete(&keys::rut_marker(&patient.rut)).await?;
        tracing::info!(patient_id = %id, removed, "patient deleted");
        Ok(removed)
    }

    /// Patients matching `query` (see [`Patient::matches`]), ordered by name.
    pub async fn list_patients(&self, query: &str) -> Result<Vec<Patient>, StorageError> {
        let mut patients: Vec<Patient> = self.all_patients().await?;
        patients.retain(|p| p.matches(query));
        patient::sort_by_name(&mut patients);
        Ok(patients)
    }

    /// The `limit` most recently created patients, newest first.
    pub async fn recent_patients(&self, limit: usize) -> Result<Vec<Patient>, StorageError> {
        let mut patients = self.all_patients().await?;
        patients.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        patients.truncate(limit);
        Ok(patients)
    }

    /// Store a clinical record under its patient. The patient must exist.
    pub async fn add_record<T>(&self, record: &T) -> Result<(), StorageError>
    where
        T: ClinicalRecord + Serialize,
    {
        check(record.validate())?;
        self.get_patient(record.patient_id()).await?;
        let key = keys::record(record.patient_id(), T::KIND, record.id());
        documents::save(&self.store, &key, record).await?;
        tracing::info!(
            patient_id = %record.patient_id(),
            record_id = %record.id(),
            kind = T::KIND.segment(),
            "record added"
        );
        Ok(())
    }

    pub async fn get_record<T>(&self, patient_id: Uuid, id: Uuid) -> Result<T, StorageError>
    where
        T: ClinicalRecord + DeserializeOwned,
    {
        documents::load(&self.store, &keys::record(patient_id, T::KIND, id)).await
    }

    /// All records of one kind for a patient, newest first.
    /// An unknown patient is `NotFound`, not an empty list.
    pub async fn list_records<T>(&self, patient_id: Uuid) -> Result<Vec<T>, StorageError>
    where
        T: ClinicalRecord + DeserializeOwned,
    {
        self.get_patient(patient_id).await?;
        self.records_of(patient_id).await
    }

    /// The patient and up to `recent` records of each kind.
    pub async fn chart(&self, patient_id: Uuid, recent: usize) -> Result<PatientChart, StorageError> {
        let patient = self.get_patient(patient_id).await?;

        let mut anamneses: Vec<Anamnesis> = self.records_of(patient_id).await?;
        let mut audiograms: Vec<Audiogram> = self.records_of(patient_id).await?;
        let mut speech: Vec<SpeechAudiometry> = self.records_of(patient_id).await?;
        let mut ldl: Vec<Ldl> = self.records_of(patient_id).await?;
        anamneses.truncate(recent);
        audiograms.truncate(recent);
        speech.truncate(recent);
        ldl.truncate(recent);

        Ok(PatientChart {
            patient,
            anamneses,
            audiograms,
            speech,
            ldl,
        })
    }

    async fn records_of<T>(&self, patient_id: Uuid) -> Result<Vec<T>, StorageError>
    where
        T: ClinicalRecord + DeserializeOwned,
    {
        let prefix = keys::records_prefix(patient_id, T::KIND);
        let mut records: Vec<T> = documents::load_all(&self.store, &prefix, |_| true).await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn all_patients(&self) -> Result<Vec<Patient>, StorageError> {
        documents::load_all(&self.store, keys::PATIENTS_PREFIX, keys::is_patient_document).await
    }

    /// Point the RUT marker at `owner`, unless another patient holds it.
    async fn claim_rut(&self, rut: &str, owner: Uuid) -> Result<(), StorageError> {
        let key = keys::rut_marker(rut);
        if let Some(body) = self.store.get_optional(&key).await? {
            let holder = std::str::from_utf8(&body)
                .ok()
                .and_then(|s| Uuid::parse_str(s.trim()).ok())
                .ok_or_else(|| StorageError::CorruptMarker { key: key.clone() })?;

            // A marker whose patient is gone is stale and may be reclaimed.
            let holder_exists = self.store.get_optional(&keys::patient(holder)).await?.is_some();
            if holder != owner && holder_exists {
                tracing::warn!(rut = %normalize_rut(rut), "duplicate RUT rejected");
                return Err(StorageError::DuplicateRut {
                    rut: normalize_rut(rut),
                });
            }
        }
        self.store
            .put(&key, owner.to_string().into_bytes(), Some("text/plain"))
            .await
    }
}

fn check(errors: Vec<FieldError>) -> Result<(), StorageError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StorageError::Invalid(errors))
    }
}
