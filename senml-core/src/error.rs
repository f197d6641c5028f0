//! Error types for SenML operations

use thiserror::Error;

use crate::format::Format;
use crate::validation::ValidationError;

/// Result type alias for SenML operations
pub type Result<T> = std::result::Result<T, SenMLError>;

/// Errors that can occur during SenML operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SenMLError {
    /// Input bytes are not a valid pack in the declared format
    #[error("Decode of {format} failed: {message}")]
    Decode { format: Format, message: String },

    /// Pack could not be serialized in the requested format
    #[error("Encode of {format} failed: {message}")]
    Encode { format: Format, message: String },

    /// Pack failed structural validation
    #[error("Invalid SenML pack: {}", join_errors(.errors))]
    InvalidInput { errors: Vec<ValidationError> },

    /// Pack violates an invariant the resolver relies on
    #[error("Malformed SenML pack: {message}")]
    Malformed { message: String },

    /// Format is not compiled in, or cannot be decoded
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SenMLError {
    /// Create a decode error
    pub fn decode<S: Into<String>>(format: Format, message: S) -> Self {
        Self::Decode {
            format,
            message: message.into(),
        }
    }

    /// Create an encode error
    pub fn encode<S: Into<String>>(format: Format, message: S) -> Self {
        Self::Encode {
            format,
            message: message.into(),
        }
    }

    /// Create a malformed pack error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SenMLError::decode(Format::Json, "unexpected end of input");
        assert!(matches!(err, SenMLError::Decode { .. }));
        assert_eq!(
            err.to_string(),
            "Decode of json failed: unexpected end of input"
        );
    }

    #[test]
    fn test_invalid_input_lists_every_error() {
        let err = SenMLError::InvalidInput {
            errors: vec![
                ValidationError::BaseFieldMisplaced { index: 1 },
                ValidationError::MissingName { index: 2 },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("index 1"));
        assert!(text.contains("index 2"));
    }
}
