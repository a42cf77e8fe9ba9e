use thiserror::Error;

/// Errors raised while converting a [`crate::Value`] into a typed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("value {value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("expected {expected}, found null")]
    UnexpectedNull { expected: String },
}

/// Errors raised while building a [`crate::TypeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type name '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("rust type {rust_name} is already registered as '{existing}'")]
    DuplicateType {
        rust_name: &'static str,
        existing: String,
    },

    #[error("field '{field}' is declared twice on '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("type '{name}' cannot extend itself")]
    SelfParent { name: String },

    #[error("type name must not be empty")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, RegistryError>;
