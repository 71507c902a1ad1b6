use sonora_core::validation::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("a patient with RUT {rut} already exists")]
    DuplicateRut { rut: String },

    #[error("record failed validation ({} field errors)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt RUT marker at {key}")]
    CorruptMarker { key: String },

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),
}
