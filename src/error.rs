//! Structured error types for the template builder.
//!
//! Every failure in the core is recoverable in place: a rejected command
//! leaves the template and its history exactly as they were.

use thiserror::Error;

use crate::model::{FieldId, SectionKind};

/// The unified error type returned by all public folio API functions.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A command referenced a field or slot that does not exist. Rejected
    /// before any mutation.
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    /// A command asked for a width outside `(0, 1]`.
    #[error("invalid width {0}: expected a fraction in (0, 1]")]
    InvalidWidth(f64),

    /// JSON input failed to parse as a template, operation or configuration.
    #[error("failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The external store refused or failed to save. The template and its
    /// history are unaffected.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),

    /// A local file (configuration, script) could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What exactly was wrong with a command's target.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TargetError {
    #[error("field {0} does not exist")]
    MissingField(FieldId),

    #[error("field {field} is already placed in {section}")]
    DuplicateField { field: FieldId, section: SectionKind },

    #[error("position {index} is out of bounds for {section} (length {len})")]
    PositionOutOfBounds {
        section: SectionKind,
        index: usize,
        len: usize,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the template schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        BuilderError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_hint() {
        let err: BuilderError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let message = err.to_string();
        assert!(message.starts_with("failed to parse document"));
        assert!(message.contains("trailing commas"));
    }

    #[test]
    fn test_truncated_input_hint() {
        let err: BuilderError = serde_json::from_str::<serde_json::Value>("{\"a\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_target_error_display() {
        let err = BuilderError::from(TargetError::PositionOutOfBounds {
            section: SectionKind::Footer,
            index: 4,
            len: 2,
        });
        assert_eq!(
            err.to_string(),
            "invalid target: position 4 is out of bounds for footer (length 2)"
        );
    }
}
