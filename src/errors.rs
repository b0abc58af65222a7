use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Validation error: {field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("E-mail already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("No user with id {id}")]
    NotFound { id: u64 },
}

impl StoreError {
    pub fn validation(field: &'static str, reason: &'static str) -> Self {
        Self::Validation { field, reason }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
