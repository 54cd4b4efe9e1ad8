//! Error types for graph operations.

use thiserror::Error;

use crate::label::{BuildLabel, LabelError};

/// Errors raised by [`crate::BuildGraph`] and its entities.
///
/// Duplicate identities and failed `*_or_die` lookups mean the build definitions
/// are inconsistent; [`GraphError::is_fatal`] reports them so the invocation
/// driver can abort instead of continuing with a partial graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two definitions claimed the same label.
    #[error("attempted to re-add existing target to build graph: {label}")]
    DuplicateTarget { label: BuildLabel },

    /// Two definitions claimed the same package name.
    #[error("attempted to re-add existing package to build graph: {name}")]
    DuplicatePackage { name: String },

    /// A target that had to exist is missing.
    #[error("target {label} not found in build graph")]
    TargetNotFound { label: BuildLabel },

    /// A package that had to exist is missing.
    #[error("package {name} doesn't exist in build graph")]
    PackageNotFound { name: String },

    /// Label text could not be parsed.
    #[error(transparent)]
    InvalidLabel(#[from] LabelError),
}

impl GraphError {
    /// Whether this error must terminate the build invocation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GraphError::InvalidLabel(_))
    }

    /// The label this error is about, if any.
    pub fn label(&self) -> Option<&BuildLabel> {
        match self {
            GraphError::DuplicateTarget { label } | GraphError::TargetNotFound { label } => {
                Some(label)
            }
            _ => None,
        }
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_errors_are_fatal() {
        let label = BuildLabel::parse("//src:lib").unwrap();
        assert!(GraphError::DuplicateTarget { label: label.clone() }.is_fatal());
        assert!(GraphError::TargetNotFound { label }.is_fatal());
        assert!(GraphError::PackageNotFound { name: "src".into() }.is_fatal());

        let invalid: GraphError = BuildLabel::parse("src").unwrap_err().into();
        assert!(!invalid.is_fatal());
    }

    #[test]
    fn message_names_the_label() {
        let label = BuildLabel::parse("//src:lib").unwrap();
        let err = GraphError::TargetNotFound { label };
        assert_eq!(err.to_string(), "target //src:lib not found in build graph");
        assert_eq!(err.label().map(ToString::to_string).as_deref(), Some("//src:lib"));
    }
}
