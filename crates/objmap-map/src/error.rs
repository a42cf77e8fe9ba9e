//! Error taxonomy for configuration loading and object conversion.

use std::path::PathBuf;

use objmap_model::ValueError;
use thiserror::Error;

/// A named field does not exist on a type or any of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Field '{field}' not found in type hierarchy for {type_name}")]
pub struct FieldNotFound {
    pub field: String,
    pub type_name: String,
}

/// Reading or writing a resolved field failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("field '{field}' belongs to {owner}, which {found} does not extend")]
    IncompatibleOwner {
        field: String,
        owner: String,
        found: String,
    },

    #[error("cannot assign field '{field}' of {owner}: {source}")]
    Assign {
        field: String,
        owner: String,
        #[source]
        source: ValueError,
    },
}

/// The configuration cannot be used. Always raised at load time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Resource not found on file system or embedded resources: {source_name}")]
    ResourceNotFound { source_name: String },

    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration {source_name}: {source}")]
    Malformed {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("mapping #{index}: type '{name}' is not registered")]
    UnknownType { name: String, index: usize },

    #[error("invalid mapping {source_type} -> {target_type}: {source}")]
    InvalidField {
        source_type: String,
        target_type: String,
        #[source]
        source: FieldNotFound,
    },

    #[error("duplicate mapping for {source_type} -> {target_type}")]
    DuplicateMapping {
        source_type: String,
        target_type: String,
    },
}

/// A single `map` call failed. Partial results are never returned.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("no mapping registered for {source_type} -> {target_type}")]
    NoConverter {
        source_type: String,
        target_type: String,
    },

    #[error("failed to map {source_type} to {target_type}: {source}")]
    Conversion {
        source_type: String,
        target_type: String,
        #[source]
        source: ConversionFailure,
    },
}

impl MappingError {
    /// Source and target type labels of the failing conversion.
    pub fn type_pair(&self) -> (&str, &str) {
        match self {
            Self::NoConverter {
                source_type,
                target_type,
            }
            | Self::Conversion {
                source_type,
                target_type,
                ..
            } => (source_type, target_type),
        }
    }
}

/// Cause of a failed conversion between a registered type pair.
#[derive(Debug, Error)]
pub enum ConversionFailure {
    #[error("{type_name} has no default constructor")]
    NoConstructor { type_name: String },

    #[error("constructor of {type_name} failed: {reason}")]
    Constructor { type_name: String, reason: String },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("field '{field}' is declared as {declared} and cannot hold a converted object")]
    NotAnObjectField { field: String, declared: String },

    #[error("nested field '{field}': {source}")]
    Nested {
        field: String,
        #[source]
        source: Box<MappingError>,
    },

    #[error("converter produced {found} instead of {expected}")]
    UnexpectedTarget {
        expected: &'static str,
        found: String,
    },
}
