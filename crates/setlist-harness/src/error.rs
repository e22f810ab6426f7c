use std::path::PathBuf;

use setlist_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("file not found: {path}")]
    MissingPath { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario {path}: {source}")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid scenario: {message}")]
    InvalidScenario { message: String },

    #[error("invalid policy: {0}")]
    Policy(#[from] ConfigError),

    #[error("failed to render report: {0}")]
    Report(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingPath { .. } | Self::Io { .. } => 2,
            Self::ScenarioParse { .. } | Self::InvalidScenario { .. } => 3,
            Self::Policy(_) => 4,
            Self::Report(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_class() {
        let missing = HarnessError::MissingPath {
            path: PathBuf::from("nope.json"),
        };
        let invalid = HarnessError::invalid("no items");
        let policy = HarnessError::from(ConfigError::Validation(vec!["bad".into()]));
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(invalid.exit_code(), 3);
        assert_eq!(policy.exit_code(), 4);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = HarnessError::invalid("heights has 3 entries for 2 items");
        assert_eq!(
            err.to_string(),
            "invalid scenario: heights has 3 entries for 2 items"
        );
        let err = HarnessError::from(ConfigError::Validation(vec![
            "gesture.drag_threshold must be >= 0, got -1".into(),
        ]));
        assert!(err.to_string().starts_with("invalid policy: validation errors:"));
    }
}
