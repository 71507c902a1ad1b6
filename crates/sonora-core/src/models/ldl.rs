use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::codes::Ear;
use crate::models::{ClinicalRecord, RecordKind};
use crate::validation::{self, FieldError};

/// Loudness discomfort levels, dB HL.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ldl {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: Date,
    #[serde(default)]
    pub ear: Ear,
    #[serde(default)]
    pub ldl_500: Option<i32>,
    #[serde(default)]
    pub ldl_1k: Option<i32>,
    #[serde(default)]
    pub ldl_2k: Option<i32>,
    #[serde(default)]
    pub ldl_4k: Option<i32>,
    #[serde(default)]
    pub notes: String,
    pub created_at: jiff::Timestamp,
}

impl ClinicalRecord for Ldl {
    const KIND: RecordKind = RecordKind::Ldl;

    fn id(&self) -> Uuid {
        self.id
    }

    fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    fn date(&self) -> Date {
        self.date
    }

    fn created_at(&self) -> jiff::Timestamp {
        self.created_at
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validation::max_chars(&mut errors, "notes", &self.notes, 200);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LdlInput {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub ear: Ear,
    #[serde(default)]
    pub ldl_500: Option<i32>,
    #[serde(default)]
    pub ldl_1k: Option<i32>,
    #[serde(default)]
    pub ldl_2k: Option<i32>,
    #[serde(default)]
    pub ldl_4k: Option<i32>,
    #[serde(default)]
    pub notes: String,
}

impl LdlInput {
    pub fn into_ldl(self, patient_id: Uuid, today: Date) -> Ldl {
        Ldl {
            id: Uuid::new_v4(),
            patient_id,
            date: self.date.unwrap_or(today),
            ear: self.ear,
            ldl_500: self.ldl_500,
            ldl_1k: self.ldl_1k,
            ldl_2k: self.ldl_2k,
            ldl_4k: self.ldl_4k,
            notes: self.notes,
            created_at: jiff::Timestamp::now(),
        }
    }
}
