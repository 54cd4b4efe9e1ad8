use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const LABEL_PREFIX: &str = "//";

/// Canonical identifier for a build target.
///
/// A label is a `(package, name)` pair rendered as `//package/path:name`. Labels are
/// immutable once built and compare by their canonical text, so sorting a set of
/// labels always yields the same sequence regardless of how they were discovered.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BuildLabel {
    package: String,
    name: String,
}

impl BuildLabel {
    /// Create a label from an already split package path and target name.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Result<Self, LabelError> {
        let package = package.into();
        let name = name.into();
        validate_package(&package)?;
        validate_name(&name)?;
        Ok(Self { package, name })
    }

    /// Parse an absolute label.
    ///
    /// Accepts `//pkg/path:name`, `//pkg/path` (the name defaults to the last path
    /// component) and `//:name` for targets in the root package.
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let rest = text
            .strip_prefix(LABEL_PREFIX)
            .ok_or_else(|| LabelError::NotAbsolute(text.to_string()))?;

        match rest.split_once(':') {
            Some((package, name)) => Self::new(package, name).map_err(|e| e.with_text(text)),
            None => {
                let name = rest.rsplit('/').next().unwrap_or_default();
                if name.is_empty() {
                    return Err(LabelError::MissingName(text.to_string()));
                }
                Self::new(rest, name).map_err(|e| e.with_text(text))
            }
        }
    }

    /// Parse a label that may be relative to `current_package` (`:name`).
    pub fn parse_relative(text: &str, current_package: &str) -> Result<Self, LabelError> {
        match text.strip_prefix(':') {
            Some(name) => Self::new(current_package, name).map_err(|e| e.with_text(text)),
            None => Self::parse(text),
        }
    }

    /// Package path, without the leading `//`.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Target name within the package.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this label lives in the given package.
    pub fn in_package(&self, package: &str) -> bool {
        self.package == package
    }

    fn rendered_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.package
            .bytes()
            .chain(std::iter::once(b':'))
            .chain(self.name.bytes())
    }
}

impl fmt::Display for BuildLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LABEL_PREFIX}{}:{}", self.package, self.name)
    }
}

impl fmt::Debug for BuildLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuildLabel({self})")
    }
}

impl Ord for BuildLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        // Same order as comparing the rendered `//package:name` strings.
        self.rendered_bytes().cmp(other.rendered_bytes())
    }
}

impl PartialOrd for BuildLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for BuildLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BuildLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BuildLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        BuildLabel::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Error type for `BuildLabel` construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Label text did not start with `//`.
    #[error("label '{0}' must start with '//'")]
    NotAbsolute(String),

    /// The target name was empty or could not be inferred.
    #[error("label '{0}' has no target name")]
    MissingName(String),

    /// The target name contained a reserved character.
    #[error("label '{label}' has an invalid target name: '{name}'")]
    InvalidName { label: String, name: String },

    /// The package path was malformed.
    #[error("label '{label}' has an invalid package path: '{package}'")]
    InvalidPackage { label: String, package: String },
}

impl LabelError {
    fn with_text(self, text: &str) -> Self {
        match self {
            Self::NotAbsolute(_) => Self::NotAbsolute(text.to_string()),
            Self::MissingName(_) => Self::MissingName(text.to_string()),
            Self::InvalidName { name, .. } => Self::InvalidName {
                label: text.to_string(),
                name,
            },
            Self::InvalidPackage { package, .. } => Self::InvalidPackage {
                label: text.to_string(),
                package,
            },
        }
    }
}

fn validate_name(name: &str) -> Result<(), LabelError> {
    if name.is_empty() {
        return Err(LabelError::MissingName(String::new()));
    }
    if name.contains([':', '/']) || name.chars().any(char::is_whitespace) {
        return Err(LabelError::InvalidName {
            label: String::new(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn validate_package(package: &str) -> Result<(), LabelError> {
    if package.is_empty() {
        return Ok(());
    }
    let malformed = package.starts_with('/')
        || package.ends_with('/')
        || package.contains(':')
        || package.chars().any(char::is_whitespace)
        || package.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if malformed {
        return Err(LabelError::InvalidPackage {
            label: String::new(),
            package: package.to_string(),
        });
    }
    Ok(())
}
