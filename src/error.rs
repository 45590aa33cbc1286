//! Error types for the advisory pipeline.
//!
//! Every failure the tool can report maps to one variant here so `main` can
//! pick a stable exit code regardless of how much context was layered on top.
use std::path::PathBuf;
use thiserror::Error;

/// Domain error raised by input validation, rule lookup, and persistence.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// A command-line value is missing, unparseable, or out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No rule exists for the requested crop.
    #[error("unknown crop '{crop}'. Try one of: {}", known.join(", "))]
    UnknownCrop {
        /// Crop name as supplied by the user
        crop: String,
        /// Sorted crop keys present in the rules table
        known: Vec<String>,
    },

    /// The rules resource parsed but violates the rules schema.
    #[error("invalid rules {origin}: {reason}")]
    InvalidRules {
        /// File path or `<built-in>`
        origin: String,
        /// What was wrong with it
        reason: String,
    },

    /// The history log exists but is not a JSON array of records.
    #[error("corrupt history log {}", path.display())]
    CorruptHistory {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A file could not be read, created, or replaced.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl AdvisorError {
    /// Wrap an I/O failure with a short description of the operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AdvisorError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AdvisorError::InvalidInput(_) => 2,
            AdvisorError::UnknownCrop { .. } => 3,
            AdvisorError::InvalidRules { .. }
            | AdvisorError::CorruptHistory { .. }
            | AdvisorError::Io { .. } => 4,
        }
    }
}

impl From<clap::Error> for AdvisorError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.render().to_string();
        let message = rendered
            .trim()
            .strip_prefix("error: ")
            .unwrap_or(rendered.trim())
            .to_string();
        AdvisorError::InvalidInput(message)
    }
}

/// Result type alias for advisory operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_crop_lists_known_crops() {
        let err = AdvisorError::UnknownCrop {
            crop: "Rice".to_string(),
            known: vec!["coffee".to_string(), "maize".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown crop 'Rice'. Try one of: coffee, maize"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_codes_are_non_zero() {
        let errors = [
            AdvisorError::InvalidInput("ph must be a number".to_string()),
            AdvisorError::InvalidRules {
                origin: "<built-in>".to_string(),
                reason: "no crops".to_string(),
            },
            AdvisorError::io(
                "write outputs/history.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ),
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
        assert_eq!(errors[0].exit_code(), 2);
    }
}
