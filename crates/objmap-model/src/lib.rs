#![deny(unsafe_code)]

//! Shared model for the object mapper: dynamic field values, the explicit
//! type registry that replaces runtime reflection, and the configuration
//! document types.

pub mod document;
pub mod error;
pub mod registry;
pub mod value;

pub use document::{ConfigDocument, FieldMap, MappingEntry};
pub use error::{RegistryError, Result, ValueError};
pub use registry::{
    Constructor, FieldAccess, FieldDef, ParentLink, Projection, TypeDef, TypeDescriptor,
    TypeRegistry, WriteFailure, namespace_of,
};
pub use value::{DeclaredType, FieldValue, Instance, Value};
