use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarnetError {
    #[error("invalid {field}: {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    #[error("Record not found: {0}")]
    RecordNotFound(u64),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Phone number not found: {0}")]
    PhoneNotFound(String),

    #[error("Email address not found: {0}")]
    EmailNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

impl CarnetError {
    pub(crate) fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CarnetError>;
