use thiserror::Error;

use crate::models::codes::{Ear, Pathway};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {kind} code: {code:?}")]
    InvalidCode { kind: &'static str, code: String },

    #[error("audiogram already has a threshold row for ear {ear} via {pathway}")]
    DuplicateThreshold { ear: Ear, pathway: Pathway },
}
