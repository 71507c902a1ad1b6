use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::models::codes::{Ear, Pathway, PlotSymbol};

/// Audiometric test frequencies recorded on a threshold row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Frequency {
    Hz250,
    Hz500,
    Hz1000,
    Hz2000,
    Hz3000,
    Hz4000,
    Hz6000,
    Hz8000,
}

impl Frequency {
    pub const ALL: [Frequency; 8] = [
        Frequency::Hz250,
        Frequency::Hz500,
        Frequency::Hz1000,
        Frequency::Hz2000,
        Frequency::Hz3000,
        Frequency::Hz4000,
        Frequency::Hz6000,
        Frequency::Hz8000,
    ];

    pub fn hz(self) -> u32 {
        match self {
            Frequency::Hz250 => 250,
            Frequency::Hz500 => 500,
            Frequency::Hz1000 => 1000,
            Frequency::Hz2000 => 2000,
            Frequency::Hz3000 => 3000,
            Frequency::Hz4000 => 4000,
            Frequency::Hz6000 => 6000,
            Frequency::Hz8000 => 8000,
        }
    }

    pub fn from_hz(hz: u32) -> Option<Frequency> {
        Frequency::ALL.into_iter().find(|f| f.hz() == hz)
    }
}

/// Hearing levels in dB HL, one slot per test frequency. `None` = not measured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ThresholdLevels {
    pub f_250: Option<i32>,
    pub f_500: Option<i32>,
    pub f_1000: Option<i32>,
    pub f_2000: Option<i32>,
    pub f_3000: Option<i32>,
    pub f_4000: Option<i32>,
    pub f_6000: Option<i32>,
    pub f_8000: Option<i32>,
}

impl ThresholdLevels {
    pub fn level(&self, frequency: Frequency) -> Option<i32> {
        *self.slot(frequency)
    }

    pub fn set_level(&mut self, frequency: Frequency, db_hl: Option<i32>) {
        *self.slot_mut(frequency) = db_hl;
    }

    /// Measured levels in ascending frequency order.
    pub fn measured(&self) -> impl Iterator<Item = (Frequency, i32)> + '_ {
        Frequency::ALL
            .into_iter()
            .filter_map(|f| self.level(f).map(|db| (f, db)))
    }

    fn slot(&self, frequency: Frequency) -> &Option<i32> {
        match frequency {
            Frequency::Hz250 => &self.f_250,
            Frequency::Hz500 => &self.f_500,
            Frequency::Hz1000 => &self.f_1000,
            Frequency::Hz2000 => &self.f_2000,
            Frequency::Hz3000 => &self.f_3000,
            Frequency::Hz4000 => &self.f_4000,
            Frequency::Hz6000 => &self.f_6000,
            Frequency::Hz8000 => &self.f_8000,
        }
    }

    fn slot_mut(&mut self, frequency: Frequency) -> &mut Option<i32> {
        match frequency {
            Frequency::Hz250 => &mut self.f_250,
            Frequency::Hz500 => &mut self.f_500,
            Frequency::Hz1000 => &mut self.f_1000,
            Frequency::Hz2000 => &mut self.f_2000,
            Frequency::Hz3000 => &mut self.f_3000,
            Frequency::Hz4000 => &mut self.f_4000,
            Frequency::Hz6000 => &mut self.f_6000,
            Frequency::Hz8000 => &mut self.f_8000,
        }
    }
}

/// One ear-and-pathway row of an audiogram.
///
/// At most one row per (ear, pathway) exists in an audiogram; see
/// [`Audiogram::add_threshold`](crate::models::audiogram::Audiogram::add_threshold).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Threshold {
    pub ear: Ear,
    #[serde(default)]
    pub pathway: Pathway,
    #[serde(default, deserialize_with = "symbol_or_blank")]
    pub symbol: Option<PlotSymbol>,
    #[serde(default)]
    pub levels: ThresholdLevels,
}

impl Threshold {
    pub fn new(ear: Ear, pathway: Pathway) -> Self {
        Self {
            ear,
            pathway,
            symbol: None,
            levels: ThresholdLevels::default(),
        }
    }

    pub fn with_symbol(mut self, symbol: PlotSymbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn with_level(mut self, frequency: Frequency, db_hl: i32) -> Self {
        self.levels.set_level(frequency, Some(db_hl));
        self
    }

    /// Rows proposed on the data-entry screen for a new audiogram.
    pub fn default_layout() -> Vec<Threshold> {
        vec![
            Threshold::new(Ear::Right, Pathway::Air).with_symbol(PlotSymbol::RightAir),
            Threshold::new(Ear::Left, Pathway::Air).with_symbol(PlotSymbol::LeftAir),
            Threshold::new(Ear::Right, Pathway::Bone).with_symbol(PlotSymbol::RightBone),
            Threshold::new(Ear::Left, Pathway::Bone).with_symbol(PlotSymbol::LeftBone),
            Threshold::new(Ear::Binaural, Pathway::Air).with_symbol(PlotSymbol::FreeField),
        ]
    }
}

/// The entry screen submits `""` for a row without a symbol.
fn symbol_or_blank<'de, D>(deserializer: D) -> Result<Option<PlotSymbol>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SymbolField {
        Symbol(PlotSymbol),
        Text(String),
    }

    match Option::<SymbolField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(SymbolField::Symbol(symbol)) => Ok(Some(symbol)),
        Some(SymbolField::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(SymbolField::Text(text)) => Err(serde::de::Error::custom(format!(
            "unknown plot symbol {text:?}"
        ))),
    }
}
