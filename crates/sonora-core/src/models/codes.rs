//! Coded values shared by the clinical records.
//!
//! Each enum serializes to the short code stored in documents and sent over
//! the API (`"R"`, `"AC"`, `"INSERT"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Ear under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Ear {
    #[default]
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "L")]
    Left,
    /// Binaural presentation, also used for free-field testing.
    #[serde(rename = "B")]
    Binaural,
}

impl Ear {
    pub const ALL: [Ear; 3] = [Ear::Right, Ear::Left, Ear::Binaural];

    pub fn code(self) -> &'static str {
        match self {
            Ear::Right => "R",
            Ear::Left => "L",
            Ear::Binaural => "B",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Ear::Right => "Right ear",
            Ear::Left => "Left ear",
            Ear::Binaural => "Binaural / free field",
        }
    }
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Ear {
    type Err = CoreError;

    /// Codes are exact: `"r"` or `" R"` are not ears.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Ear::ALL
            .into_iter()
            .find(|ear| ear.code() == code)
            .ok_or_else(|| CoreError::InvalidCode {
                kind: "ear",
                code: code.to_string(),
            })
    }
}

/// Conduction pathway of a threshold measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Pathway {
    #[default]
    #[serde(rename = "AC")]
    Air,
    #[serde(rename = "BC")]
    Bone,
}

impl Pathway {
    pub fn code(self) -> &'static str {
        match self {
            Pathway::Air => "AC",
            Pathway::Bone => "BC",
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    /// Other, or prefers not to say.
    #[serde(rename = "O")]
    Other,
}

/// Kind of pure-tone examination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum ExamType {
    /// Air and bone conduction under earphones.
    #[default]
    Tonal,
    /// Free field, loudspeaker presentation.
    Field,
    /// Paediatric play audiometry.
    Play,
    /// Extended high-frequency audiometry.
    #[serde(rename = "HF")]
    HighFrequency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Transducer {
    #[serde(rename = "SUPRA")]
    SupraAural,
    #[serde(rename = "CIRCUM")]
    Circumaural,
    #[default]
    Insert,
    Speaker,
}

/// Symbol used when plotting a threshold row on the audiogram chart.
/// Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PlotSymbol {
    /// Right air conduction, unmasked.
    #[serde(rename = "O")]
    RightAir,
    /// Left air conduction, unmasked.
    #[serde(rename = "X")]
    LeftAir,
    /// Right bone conduction, masked.
    #[serde(rename = "[")]
    RightBoneMasked,
    /// Left bone conduction, masked.
    #[serde(rename = "]")]
    LeftBoneMasked,
    /// Right bone conduction, unmasked.
    #[serde(rename = "<")]
    RightBone,
    /// Left bone conduction, unmasked.
    #[serde(rename = ">")]
    LeftBone,
    /// Right air conduction, masked.
    #[serde(rename = "Δ")]
    RightAirMasked,
    /// Left air conduction, masked.
    #[serde(rename = "□")]
    LeftAirMasked,
    /// Sound field.
    #[serde(rename = "◇")]
    FreeField,
}
