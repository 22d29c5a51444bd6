#![forbid(unsafe_code)]

use survey_core::SurveyError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value out of range for sqlite: {0}")]
    Overflow(u64),
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("schema version mismatch (expected={expected}, found={found})")]
    SchemaMismatch { expected: String, found: String },
}

impl From<StoreError> for SurveyError {
    fn from(value: StoreError) -> Self {
        SurveyError::internal(value)
    }
}
