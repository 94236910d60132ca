use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid policy parameter {parameter}: {reason}")]
    InvalidPolicy { parameter: String, reason: String },

    #[error("Unclassified sector code {code}: expected 1 (Agriculture) to 5 (Insurance)")]
    UnclassifiedSector { code: u8 },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CitError {
    pub(crate) fn policy(parameter: &str, reason: impl Into<String>) -> Self {
        CitError::InvalidPolicy {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn input(field: &str, reason: impl Into<String>) -> Self {
        CitError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        CitError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for CitError {
    fn from(e: serde_json::Error) -> Self {
        CitError::SerializationError(e.to_string())
    }
}
