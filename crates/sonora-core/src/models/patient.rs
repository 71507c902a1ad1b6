use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::age;
use crate::models::codes::Sex;
use crate::validation::{self, FieldError};

pub const RUT_MAX_CHARS: usize = 20;
pub const NAME_MAX_CHARS: usize = 80;
pub const PHONE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    /// National / medical identifier. Unique across patients.
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<Date>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub created_at: jiff::Timestamp,
}

impl Patient {
    pub fn new(rut: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            rut: rut.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            birth_date: None,
            sex: None,
            phone: String::new(),
            email: String::new(),
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Age in whole years on `date`, if the birth date is known.
    pub fn age_on(&self, date: Date) -> Option<i32> {
        age::age_on(self.birth_date, date)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match on last name, first name or RUT.
    /// A blank query matches everyone.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.last_name, &self.first_name, &self.rut]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        validation::required(&mut errors, "rut", &self.rut);
        validation::max_chars(&mut errors, "rut", &self.rut, RUT_MAX_CHARS);
        if !self
            .rut
            .trim()
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
        {
            errors.push(FieldError::new(
                "rut",
                "only letters, digits, dots and hyphens are allowed",
            ));
        }

        validation::required(&mut errors, "first_name", &self.first_name);
        validation::max_chars(&mut errors, "first_name", &self.first_name, NAME_MAX_CHARS);
        validation::required(&mut errors, "last_name", &self.last_name);
        validation::max_chars(&mut errors, "last_name", &self.last_name, NAME_MAX_CHARS);
        validation::max_chars(&mut errors, "phone", &self.phone, PHONE_MAX_CHARS);
        validation::email(&mut errors, "email", &self.email);

        errors
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} — {}", self.last_name, self.first_name, self.rut)
    }
}

/// Canonical form used for the uniqueness check.
pub fn normalize_rut(rut: &str) -> String {
    rut.trim().to_uppercase()
}

/// Demographics as submitted from the intake screen, for create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientInput {
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<Date>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl PatientInput {
    pub fn into_patient(self) -> Patient {
        let mut patient = Patient::new(&self.rut, &self.first_name, &self.last_name);
        patient.birth_date = self.birth_date;
        patient.sex = self.sex;
        patient.phone = self.phone.trim().to_string();
        patient.email = self.email.trim().to_string();
        patient
    }

    /// Overwrite the demographics of an existing patient, keeping its identity.
    pub fn apply_to(self, patient: &mut Patient) {
        patient.rut = self.rut.trim().to_string();
        patient.first_name = self.first_name.trim().to_string();
        patient.last_name = self.last_name.trim().to_string();
        patient.birth_date = self.birth_date;
        patient.sex = self.sex;
        patient.phone = self.phone.trim().to_string();
        patient.email = self.email.trim().to_string();
    }
}

/// Alphabetical listing order: last name, then first name.
pub fn sort_by_name(patients: &mut [Patient]) {
    patients.sort_by_cached_key(|p| (p.last_name.to_lowercase(), p.first_name.to_lowercase()));
}
