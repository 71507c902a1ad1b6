use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::codes::{Ear, ExamType, Pathway, Transducer};
use crate::models::patient::Patient;
use crate::models::threshold::Threshold;
use crate::models::{ClinicalRecord, RecordKind};
use crate::pta::{self, AudiogramView};
use crate::validation::FieldError;

/// Pure-tone exam header plus its threshold rows. PTA is derived from the
/// rows on demand and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Audiogram {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: Date,
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default)]
    pub transducer: Transducer,
    #[serde(default)]
    pub masking_used: bool,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
    pub created_at: jiff::Timestamp,
}

impl Audiogram {
    pub fn new(patient_id: Uuid, date: Date) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            date,
            exam_type: ExamType::default(),
            transducer: Transducer::default(),
            masking_used: false,
            comments: String::new(),
            thresholds: Vec::new(),
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Attach a threshold row, rejecting a second row for the same ear and pathway.
    pub fn add_threshold(&mut self, threshold: Threshold) -> Result<(), CoreError> {
        if self.threshold(threshold.ear, threshold.pathway).is_some() {
            return Err(CoreError::DuplicateThreshold {
                ear: threshold.ear,
                pathway: threshold.pathway,
            });
        }
        self.thresholds.push(threshold);
        Ok(())
    }

    /// First row for the given ear and pathway.
    pub fn threshold(&self, ear: Ear, pathway: Pathway) -> Option<&Threshold> {
        self.thresholds
            .iter()
            .find(|t| t.ear == ear && t.pathway == pathway)
    }

    /// Pure-tone average for `ear`, given the owning patient's birth date.
    pub fn pta(&self, birth_date: Option<Date>, ear: Ear) -> Option<f64> {
        pta::pure_tone_average(self, birth_date, ear)
    }

    /// Bind the owning patient so the PTA accessors can resolve age.
    pub fn view<'a>(&'a self, patient: &'a Patient) -> AudiogramView<'a> {
        AudiogramView::new(self, patient)
    }
}

impl ClinicalRecord for Audiogram {
    const KIND: RecordKind = RecordKind::Audiogram;

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
        for (index, row) in self.thresholds.iter().enumerate() {
            let first = self
                .thresholds
                .iter()
                .position(|t| t.ear == row.ear && t.pathway == row.pathway);
            if first != Some(index) {
                errors.push(FieldError::new(
                    &format!("thresholds[{index}]"),
                    format!(
                        "duplicate row for ear {} via {}",
                        row.ear, row.pathway
                    ),
                ));
            }
        }
        errors
    }
}

/// Exam header and threshold rows as submitted from the data-entry screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AudiogramInput {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default)]
    pub transducer: Transducer,
    #[serde(default)]
    pub masking_used: bool,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
}

impl AudiogramInput {
    pub fn into_audiogram(self, patient_id: Uuid, today: Date) -> Result<Audiogram, CoreError> {
        let mut audiogram = Audiogram::new(patient_id, self.date.unwrap_or(today));
        audiogram.exam_type = self.exam_type;
        audiogram.transducer = self.transducer;
        audiogram.masking_used = self.masking_used;
        audiogram.comments = self.comments;
        for threshold in self.thresholds {
            audiogram.add_threshold(threshold)?;
        }
        Ok(audiogram)
    }
}
