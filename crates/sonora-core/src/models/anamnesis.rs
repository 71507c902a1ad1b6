use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::{ClinicalRecord, RecordKind};
use crate::validation::{self, FieldError};

/// Intake history taken at a visit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Anamnesis {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: Date,
    #[serde(flatten)]
    pub history: IntakeHistory,
    pub created_at: jiff::Timestamp,
}

/// The questionnaire part of an anamnesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct IntakeHistory {
    pub main_complaint: String,
    pub hearing_loss: bool,
    pub tinnitus: bool,
    pub otalgia: bool,
    pub otorrhea: bool,
    pub vertigo: bool,
    pub noise_exposure: bool,
    pub hearing_aids: bool,
    /// Current medication, ototoxic drugs in particular.
    pub medication: String,
    pub vertigo_type: String,
    pub vertigo_duration: String,
    pub vertigo_triggers: String,
    pub notes: String,
}

impl Anamnesis {
    pub fn new(patient_id: Uuid, date: Date, history: IntakeHistory) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            date,
            history,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl ClinicalRecord for Anamnesis {
    const KIND: RecordKind = RecordKind::Anamnesis;

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
        let h = &self.history;
        let mut errors = Vec::new();
        validation::max_chars(&mut errors, "vertigo_type", &h.vertigo_type, 120);
        validation::max_chars(&mut errors, "vertigo_duration", &h.vertigo_duration, 120);
        validation::max_chars(&mut errors, "vertigo_triggers", &h.vertigo_triggers, 200);
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnamnesisInput {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(flatten)]
    pub history: IntakeHistory,
}

impl AnamnesisInput {
    pub fn into_anamnesis(self, patient_id: Uuid, today: Date) -> Anamnesis {
        Anamnesis::new(patient_id, self.date.unwrap_or(today), self.history)
    }
}
