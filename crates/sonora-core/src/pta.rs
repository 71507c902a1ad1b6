//! Pure-tone average.
//!
//! The PTA is the mean air-conduction threshold over three frequencies. Which
//! three depends on the patient's age on the exam date: children under 15 are
//! averaged over 1, 2 and 4 kHz, everyone else over 500 Hz, 1 and 2 kHz.
//! An unknown birth date selects the adult triple.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::age;
use crate::models::audiogram::Audiogram;
use crate::models::codes::{Ear, Pathway};
use crate::models::patient::Patient;
use crate::models::threshold::Frequency;

/// Patients younger than this on the exam date use [`PEDIATRIC_TRIPLE`].
pub const PEDIATRIC_AGE_LIMIT: i32 = 15;

pub const ADULT_TRIPLE: [Frequency; 3] = [Frequency::Hz500, Frequency::Hz1000, Frequency::Hz2000];

pub const PEDIATRIC_TRIPLE: [Frequency; 3] =
    [Frequency::Hz1000, Frequency::Hz2000, Frequency::Hz4000];

/// Frequencies averaged for a patient of the given age.
pub fn frequency_triple(age: Option<i32>) -> [Frequency; 3] {
    match age {
        Some(years) if years < PEDIATRIC_AGE_LIMIT => PEDIATRIC_TRIPLE,
        _ => ADULT_TRIPLE,
    }
}

/// PTA for one ear of an audiogram, rounded to one decimal.
///
/// `None` when the audiogram has no air-conduction row for `ear` or when any
/// of the three frequencies was not measured. There is no partial average.
pub fn pure_tone_average(audiogram: &Audiogram, birth_date: Option<Date>, ear: Ear) -> Option<f64> {
    let triple = frequency_triple(age::age_on(birth_date, audiogram.date));
    let row = audiogram.threshold(ear, Pathway::Air)?;

    let mut sum = 0_i64;
    for frequency in triple {
        sum += i64::from(row.levels.level(frequency)?);
    }
    Some(round_to_tenth(sum as f64 / 3.0))
}

/// Half away from zero. A third of an integer never sits on a .x5 boundary,
/// so ties do not arise from stored thresholds.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// An audiogram read together with its owning patient.
#[derive(Debug, Clone, Copy)]
pub struct AudiogramView<'a> {
    audiogram: &'a Audiogram,
    birth_date: Option<Date>,
}

impl<'a> AudiogramView<'a> {
    pub fn new(audiogram: &'a Audiogram, patient: &'a Patient) -> Self {
        Self {
            audiogram,
            birth_date: patient.birth_date,
        }
    }

    pub fn audiogram(&self) -> &'a Audiogram {
        self.audiogram
    }

    /// Patient age on the exam date.
    pub fn age(&self) -> Option<i32> {
        age::age_on(self.birth_date, self.audiogram.date)
    }

    pub fn pta(&self, ear: Ear) -> Option<f64> {
        pure_tone_average(self.audiogram, self.birth_date, ear)
    }

    /// PTA for a raw ear code. Anything other than `R`, `L` or `B` yields `None`.
    pub fn pta_for_code(&self, code: &str) -> Option<f64> {
        let ear = code.parse::<Ear>().ok()?;
        self.pta(ear)
    }

    pub fn pta_right(&self) -> Option<f64> {
        self.pta(Ear::Right)
    }

    pub fn pta_left(&self) -> Option<f64> {
        self.pta(Ear::Left)
    }

    pub fn pta_binaural(&self) -> Option<f64> {
        self.pta(Ear::Binaural)
    }

    pub fn summary(&self) -> PtaSummary {
        PtaSummary {
            right: self.pta_right(),
            left: self.pta_left(),
            binaural: self.pta_binaural(),
        }
    }
}

/// PTA for each ear. `None` renders as a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PtaSummary {
    pub right: Option<f64>,
    pub left: Option<f64>,
    pub binaural: Option<f64>,
}
