pub mod anamnesis;
pub mod audiogram;
pub mod codes;
pub mod ldl;
pub mod patient;
pub mod speech;
pub mod threshold;

use std::cmp::Reverse;

use jiff::civil::Date;
use uuid::Uuid;

use crate::validation::FieldError;

/// The kinds of dated clinical record a patient owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Anamnesis,
    Audiogram,
    Speech,
    Ldl,
}

impl RecordKind {
    /// Path segment under the owning patient's prefix.
    pub fn segment(self) -> &'static str {
        match self {
            RecordKind::Anamnesis => "anamneses",
            RecordKind::Audiogram => "audiograms",
            RecordKind::Speech => "speech",
            RecordKind::Ldl => "ldl",
        }
    }
}

/// A dated observation owned by exactly one patient.
pub trait ClinicalRecord {
    const KIND: RecordKind;

    fn id(&self) -> Uuid;

    fn patient_id(&self) -> Uuid;

    /// Examination or intake date.
    fn date(&self) -> Date;

    fn created_at(&self) -> jiff::Timestamp;

    /// Field-level checks. Empty when the record may be stored.
    fn validate(&self) -> Vec<FieldError>;
}

/// Newest first: by date, then by creation time for records sharing a date.
pub fn sort_newest_first<T: ClinicalRecord>(records: &mut [T]) {
    records.sort_by_key(|r| Reverse((r.date(), r.created_at())));
}
