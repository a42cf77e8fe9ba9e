#![deny(unsafe_code)]

//! Configuration-driven object mapping.
//!
//! A JSON configuration declares, per (source, target) type pair, which
//! source field is copied into which target field, plus the namespace
//! prefixes whose values are converted recursively instead of copied.
//! Types take part through an explicit [`objmap_model::TypeRegistry`].
//!
//! The configuration is validated completely when it is loaded; after that
//! a [`Mapper`] only fails for problems with the values being mapped.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod resolver;

pub use config::{ClassMapping, ConfigLoader, FieldPair, MappingConfig, RESOURCE_DIR_ENV};
pub use engine::{ConversionEngine, Converter};
pub use error::{AccessError, ConfigurationError, ConversionFailure, FieldNotFound, MappingError};
pub use mapper::Mapper;
pub use resolver::{FieldDescriptor, FieldResolver};
