//! Loading and eager validation of mapping configurations.
//!
//! A configuration source name is resolved in this order:
//!
//! 1. a path on the file system;
//! 2. an embedded resource registered with [`ConfigLoader::with_embedded`],
//!    looked up with one leading `/` stripped;
//! 3. each resource directory, in registration order.
//!
//! Every type name and field name is checked while loading, so a
//! [`MappingConfig`] that exists is always usable by the engine.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

use objmap_model::{ConfigDocument, FieldMap, TypeDescriptor};
use tracing::{debug, warn};

use crate::error::ConfigurationError;
use crate::resolver::{FieldDescriptor, FieldResolver};

/// Environment variable naming an extra resource directory.
pub const RESOURCE_DIR_ENV: &str = "OBJMAP_RESOURCE_DIR";

/// Locates configuration sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    embedded: BTreeMap<String, Cow<'static, str>>,
    resource_dirs: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    /// A loader that also searches `$OBJMAP_RESOURCE_DIR` when it is set.
    fn default() -> Self {
        let loader = Self::new();
        match env::var_os(RESOURCE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => loader.with_resource_dir(dir),
            _ => loader,
        }
    }
}

impl ConfigLoader {
    /// A loader that only reads the file system.
    pub fn new() -> Self {
        Self {
            embedded: BTreeMap::new(),
            resource_dirs: Vec::new(),
        }
    }

    /// Registers an in-binary resource, typically from `include_str!`.
    pub fn with_embedded(
        mut self,
        name: impl Into<String>,
        contents: impl Into<Cow<'static, str>>,
    ) -> Self {
        let name = name.into();
        let name = name.strip_prefix('/').map(str::to_string).unwrap_or(name);
        self.embedded.insert(name, contents.into());
        self
    }

    /// Adds a directory searched after the embedded resources.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dirs.push(dir.into());
        self
    }

    pub fn resource_dirs(&self) -> &[PathBuf] {
        &self.resource_dirs
    }

    /// Reads the raw contents of a configuration source.
    pub fn read(&self, source: &str) -> Result<Cow<'_, str>, ConfigurationError> {
        let path = Path::new(source);
        if path.is_file() {
            debug!(source = %source, origin = "file", "configuration source located");
            return read_file(path).map(Cow::Owned);
        }

        let resource = source.strip_prefix('/').unwrap_or(source);
        if let Some(contents) = self.embedded.get(resource) {
            debug!(source = %source, origin = "embedded", "configuration source located");
            return Ok(Cow::Borrowed(contents.as_ref()));
        }

        for dir in &self.resource_dirs {
            let candidate = dir.join(resource);
            if candidate.is_file() {
                debug!(
                    source = %source,
                    origin = %candidate.display(),
                    "configuration source located"
                );
                return read_file(&candidate).map(Cow::Owned);
            }
        }

        Err(ConfigurationError::ResourceNotFound {
            source_name: source.to_string(),
        })
    }

    /// Reads, parses and validates a configuration source.
    pub fn load(
        &self,
        source: &str,
        resolver: &FieldResolver,
    ) -> Result<MappingConfig, ConfigurationError> {
        let contents = self.read(source)?;
        parse_and_validate(source, &contents, resolver)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigurationError> {
    fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_and_validate(
    source_name: &str,
    contents: &str,
    resolver: &FieldResolver,
) -> Result<MappingConfig, ConfigurationError> {
    let document: ConfigDocument =
        serde_json::from_str(contents).map_err(|source| ConfigurationError::Malformed {
            source_name: source_name.to_string(),
            source,
        })?;
    MappingConfig::from_document(document, resolver)
}

/// A source field paired with the target field it is copied into.
#[derive(Debug, Clone)]
pub struct FieldPair {
    pub source: FieldDescriptor,
    pub target: FieldDescriptor,
}

/// Validated field correspondences for one type pair.
#[derive(Debug, Clone)]
pub struct ClassMapping {
    source: Arc<TypeDescriptor>,
    target: Arc<TypeDescriptor>,
    fields: Vec<FieldPair>,
}

impl ClassMapping {
    pub fn source(&self) -> &Arc<TypeDescriptor> {
        &self.source
    }

    pub fn target(&self) -> &Arc<TypeDescriptor> {
        &self.target
    }

    /// Resolved field pairs in declaration order.
    pub fn fields(&self) -> &[FieldPair] {
        &self.fields
    }

    /// The field correspondences by name.
    pub fn field_map(&self) -> FieldMap {
        self.fields
            .iter()
            .map(|pair| (pair.source.name(), pair.target.name()))
            .collect()
    }
}

/// A parsed and fully validated mapping configuration.
#[derive(Debug, Clone, Default)]
pub struct MappingConfig {
    mappable_namespaces: Vec<String>,
    class_mappings: Vec<ClassMapping>,
}

impl MappingConfig {
    /// Validates an in-memory JSON configuration.
    pub fn from_json_str(json: &str, resolver: &FieldResolver) -> Result<Self, ConfigurationError> {
        parse_and_validate("<inline>", json, resolver)
    }

    /// Validates a parsed document against the resolver's registry.
    ///
    /// # Errors
    ///
    /// Fails on the first unregistered type name, repeated type pair, or
    /// field name that does not resolve on its type.
    pub fn from_document(
        document: ConfigDocument,
        resolver: &FieldResolver,
    ) -> Result<Self, ConfigurationError> {
        let registry = resolver.registry();
        let mut seen = HashSet::new();
        let mut class_mappings = Vec::with_capacity(document.mappings.len());

        for (index, entry) in document.mappings.iter().enumerate() {
            let lookup = |name: &str| {
                registry
                    .by_name(name)
                    .cloned()
                    .ok_or_else(|| ConfigurationError::UnknownType {
                        name: name.to_string(),
                        index,
                    })
            };
            let source = lookup(entry.source_class.as_str())?;
            let target = lookup(entry.target_class.as_str())?;

            if !seen.insert((source.id(), target.id())) {
                return Err(ConfigurationError::DuplicateMapping {
                    source_type: source.name().to_string(),
                    target_type: target.name().to_string(),
                });
            }
            if !target.has_constructor() {
                warn!(
                    source_type = %source.name(),
                    target_type = %target.name(),
                    "target type has no default constructor; mapping into it will fail"
                );
            }

            let invalid = |source_err| ConfigurationError::InvalidField {
                source_type: source.name().to_string(),
                target_type: target.name().to_string(),
                source: source_err,
            };
            let mut fields = Vec::with_capacity(entry.fields.len());
            for (source_field, target_field) in entry.fields.iter() {
                fields.push(FieldPair {
                    source: resolver.resolve(&source, source_field).map_err(invalid)?,
                    target: resolver.resolve(&target, target_field).map_err(invalid)?,
                });
            }

            debug!(
                source_type = %source.name(),
                target_type = %target.name(),
                fields = fields.len(),
                "class mapping validated"
            );
            class_mappings.push(ClassMapping {
                source,
                target,
                fields,
            });
        }

        Ok(Self {
            mappable_namespaces: document.mappable_packages,
            class_mappings,
        })
    }

    pub fn mappable_namespaces(&self) -> &[String] {
        &self.mappable_namespaces
    }

    pub fn class_mappings(&self) -> &[ClassMapping] {
        &self.class_mappings
    }

    /// Whether values of a type in `namespace` are converted recursively.
    pub fn is_mappable_namespace(&self, namespace: &str) -> bool {
        self.mappable_namespaces
            .iter()
            .any(|prefix| namespace.starts_with(prefix.as_str()))
    }
}
