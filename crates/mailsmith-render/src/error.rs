//! Error types for email rendering.
//!
//! Only [`ValidationError`] is expected to reach callers in normal operation:
//! it is raised before any markup is produced and names the offending field.
//! Stylesheet and markup problems never become errors; they degrade the
//! affected stage (see [`Degraded`]) and rendering carries on.

use std::fmt;

use thiserror::Error;

/// Why a required input field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field is absent or `null`.
    Missing,
    /// The field is present but has the wrong JSON type.
    WrongType { expected: &'static str },
    /// The field is a string or list that must not be empty.
    Empty,
    /// A numeric field is negative or not finite.
    OutOfRange,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "is required"),
            FieldProblem::WrongType { expected } => write!(f, "must be {}", expected),
            FieldProblem::Empty => write!(f, "must not be empty"),
            FieldProblem::OutOfRange => write!(f, "is out of range"),
        }
    }
}

/// A required input field was missing or malformed.
///
/// `field` is a dotted path into the input record, for example
/// `financial_data.production.goal` or `providers[2].name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: field '{field}' {problem}")]
pub struct ValidationError {
    pub field: String,
    pub problem: FieldProblem,
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: FieldProblem::Missing,
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field: field.into(),
            problem: FieldProblem::WrongType { expected },
        }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: FieldProblem::Empty,
        }
    }

    pub fn out_of_range(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: FieldProblem::OutOfRange,
        }
    }
}

/// Error loading or validating a theme palette.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to parse theme '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("failed to read theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Error loading a [`RenderConfig`](crate::RenderConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Error type for render operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Input data failed the document type's field contract.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document type tag is not one of the known variants.
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    /// A built-in template failed to compile or render.
    #[error("template error: {0}")]
    Template(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RenderError {
    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            RenderError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::Template(err.to_string())
    }
}

/// The pipeline stage that fell back to a pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stylesheet,
    Markup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Stylesheet => write!(f, "stylesheet"),
            Stage::Markup => write!(f, "markup"),
        }
    }
}

/// A non-fatal parse failure.
///
/// Returned by [`MarkupParser::parse`](crate::markup::MarkupParser::parse) when
/// a fragment cannot be read as well-formed markup. The inliner absorbs it and
/// returns the original fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degraded {
    pub stage: Stage,
    pub reason: String,
}

impl Degraded {
    pub fn markup(reason: impl Into<String>) -> Self {
        Self {
            stage: Stage::Markup,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Degraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} degraded: {}", self.stage, self.reason)
    }
}

impl std::error::Error for Degraded {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ValidationError::missing("financial_data.production");
        let msg = err.to_string();
        assert!(msg.contains("financial_data.production"));
        assert!(msg.contains("required"));
    }

    #[test]
    fn test_wrong_type_message() {
        let err = ValidationError::wrong_type("providers", "a list");
        assert_eq!(
            err.to_string(),
            "invalid input: field 'providers' must be a list"
        );
    }

    #[test]
    fn test_render_error_from_validation() {
        let err: RenderError = ValidationError::empty("title").into();
        assert_eq!(err.as_validation().map(|v| v.field.as_str()), Some("title"));
    }

    #[test]
    fn test_from_minijinja_error() {
        let mj = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "bad tag");
        let err: RenderError = mj.into();
        assert!(matches!(err, RenderError::Template(_)));
    }
}
