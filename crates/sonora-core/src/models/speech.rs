use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::codes::Ear;
use crate::models::{ClinicalRecord, RecordKind};
use crate::validation::{self, FieldError};

/// Speech audiometry: reception/detection threshold and word recognition.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpeechAudiometry {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: Date,
    #[serde(default)]
    pub ear: Ear,
    /// SRT or SDT, dB HL.
    #[serde(default)]
    pub srt: Option<i32>,
    /// Word recognition score, percent correct.
    #[serde(default)]
    pub wrs_percent: Option<i32>,
    /// Presentation level of the word list, dB HL.
    #[serde(default)]
    pub wrs_level_db: Option<i32>,
    #[serde(default)]
    pub notes: String,
    pub created_at: jiff::Timestamp,
}

impl ClinicalRecord for SpeechAudiometry {
    const KIND: RecordKind = RecordKind::Speech;

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
        validation::in_range(&mut errors, "wrs_percent", self.wrs_percent, 0, 100);
        validation::max_chars(&mut errors, "notes", &self.notes, 200);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpeechInput {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub ear: Ear,
    #[serde(default)]
    pub srt: Option<i32>,
    #[serde(default)]
    pub wrs_percent: Option<i32>,
    #[serde(default)]
    pub wrs_level_db: Option<i32>,
    #[serde(default)]
    pub notes: String,
}

impl SpeechInput {
    pub fn into_speech(self, patient_id: Uuid, today: Date) -> SpeechAudiometry {
        SpeechAudiometry {
            id: Uuid::new_v4(),
            patient_id,
            date: self.date.unwrap_or(today),
            ear: self.ear,
            srt: self.srt,
            wrs_percent: self.wrs_percent,
            wrs_level_db: self.wrs_level_db,
            notes: self.notes,
            created_at: jiff::Timestamp::now(),
        }
    }
}
