//! Error types for the Java source model.
//!
//! Only genuinely exceptional conditions are errors. Lookups that may simply
//! miss (a type that is not on the classpath, an element that was deleted by a
//! reload) are represented as `Option` by the model API and never reach this
//! type.

use thiserror::Error;

/// Errors raised while reading sources or maintaining an environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A compilation unit could not be read.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// The unit declares a construct the declaration reader does not model.
    #[error("{path}: unsupported declaration: {what}")]
    UnsupportedDeclaration { path: String, what: String },

    /// The environment owning an element has been dropped.
    #[error("environment has been closed")]
    EnvironmentClosed,

    /// The compiler collaborator failed to provide a unit.
    #[error("source error for {path}: {message}")]
    Source { path: String, message: String },
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    /// Create a parse error at a 1-indexed line and column.
    pub fn parse(
        path: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        ModelError::Parse {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a source error.
    pub fn source(path: impl Into<String>, message: impl Into<String>) -> Self {
        ModelError::Source {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The unit path this error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ModelError::Parse { path, .. }
            | ModelError::UnsupportedDeclaration { path, .. }
            | ModelError::Source { path, .. } => Some(path),
            ModelError::EnvironmentClosed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ModelError::parse("a/Foo.java", 3, 14, "expected ';'");
        assert_eq!(err.to_string(), "a/Foo.java:3:14: expected ';'");
        assert_eq!(err.path(), Some("a/Foo.java"));
    }

    #[test]
    fn test_environment_closed_has_no_path() {
        assert_eq!(ModelError::EnvironmentClosed.path(), None);
        assert_eq!(
            ModelError::EnvironmentClosed.to_string(),
            "environment has been closed"
        );
    }

    #[test]
    fn test_unsupported_display() {
        let err = ModelError::UnsupportedDeclaration {
            path: "R.java".to_string(),
            what: "record".to_string(),
        };
        assert_eq!(err.to_string(), "R.java: unsupported declaration: record");
    }
}
