//! Error types for odds-lab.
//!
//! Every public operation validates its inputs at the call boundary and
//! either returns a complete result or fails with [`LabError::InvalidInput`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl LabError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the input that failed validation.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, LabError>;
