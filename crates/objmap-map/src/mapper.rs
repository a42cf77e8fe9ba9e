//! Public mapping entry points.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use objmap_model::TypeRegistry;
use tracing::{debug, error, info};

use crate::config::{ConfigLoader, MappingConfig};
use crate::engine::ConversionEngine;
use crate::error::{ConfigurationError, ConversionFailure, MappingError};
use crate::resolver::FieldResolver;

/// Config-driven object mapper.
///
/// Built once at startup and shared freely afterwards: mapping only reads
/// immutable state and the concurrent field cache.
///
/// ```ignore
/// let mapper = Mapper::load("mapping-config.json", Arc::new(registry))?;
/// let persoon: Persoon = mapper.map(&person)?;
/// ```
#[derive(Debug)]
pub struct Mapper {
    engine: ConversionEngine,
}

impl Mapper {
    /// Loads `source` with [`ConfigLoader::default`].
    pub fn load(source: &str, registry: Arc<TypeRegistry>) -> Result<Self, ConfigurationError> {
        Self::load_with(&ConfigLoader::default(), source, registry)
    }

    pub fn load_with(
        loader: &ConfigLoader,
        source: &str,
        registry: Arc<TypeRegistry>,
    ) -> Result<Self, ConfigurationError> {
        let resolver = Arc::new(FieldResolver::new(registry));
        let config = loader
            .load(source, &resolver)
            .inspect_err(|err| error!(source = %source, error = %err, "configuration rejected"))?;
        info!(
            source = %source,
            mappings = config.class_mappings().len(),
            "mapping configuration loaded"
        );
        Ok(Self::from_config(config, resolver))
    }

    /// Builds a mapper from an in-memory JSON configuration.
    pub fn from_json_str(json: &str, registry: Arc<TypeRegistry>) -> Result<Self, ConfigurationError> {
        let resolver = Arc::new(FieldResolver::new(registry));
        let config = MappingConfig::from_json_str(json, &resolver)
            .inspect_err(|err| {
                error!(source = "<inline>", error = %err, "configuration rejected");
            })?;
        Ok(Self::from_config(config, resolver))
    }

    /// Builds the converters for an already validated configuration.
    ///
    /// `config` must have been validated against `resolver`'s registry.
    pub fn from_config(config: MappingConfig, resolver: Arc<FieldResolver>) -> Self {
        let engine = ConversionEngine::new(config, resolver);
        debug!(converters = engine.len(), "conversion engine ready");
        Self { engine }
    }

    pub fn config(&self) -> &MappingConfig {
        self.engine.config()
    }

    pub fn resolver(&self) -> &Arc<FieldResolver> {
        self.engine.resolver()
    }

    /// Whether a converter exists for exactly `S -> T`.
    pub fn has_mapping<S: Any, T: Any>(&self) -> bool {
        self.engine
            .converter(TypeId::of::<S>(), TypeId::of::<T>())
            .is_some()
    }

    /// Maps one source instance into a new `T`.
    pub fn map<S: Any, T: Any>(&self, source: &S) -> Result<T, MappingError> {
        self.map_one::<S, T>(source).inspect_err(log_failure)
    }

    /// Maps every element in order. An empty input yields an empty vector;
    /// the first failing element aborts the whole call.
    pub fn map_all<'a, S, T, I>(&self, sources: I) -> Result<Vec<T>, MappingError>
    where
        S: Any,
        T: Any,
        I: IntoIterator<Item = &'a S>,
    {
        sources
            .into_iter()
            .map(|source| self.map_one::<S, T>(source))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(log_failure)
    }

    /// Maps an instance whose types are only known at runtime.
    pub fn map_dyn(&self, source: &dyn Any, target: TypeId) -> Result<Box<dyn Any>, MappingError> {
        self.engine
            .convert(source, target)
            .inspect_err(log_failure)
    }

    fn map_one<S: Any, T: Any>(&self, source: &S) -> Result<T, MappingError> {
        let (source_id, target_id) = (TypeId::of::<S>(), TypeId::of::<T>());
        if self.engine.converter(source_id, target_id).is_none() {
            let registry = self.engine.resolver().registry();
            return Err(MappingError::NoConverter {
                source_type: registry.label(source_id, type_name::<S>()),
                target_type: registry.label(target_id, type_name::<T>()),
            });
        }
        let converted = self.engine.convert(source, target_id)?;
        converted.downcast::<T>().map(|target| *target).map_err(|other| {
            let registry = self.engine.resolver().registry();
            MappingError::Conversion {
                source_type: registry.label(source_id, type_name::<S>()),
                target_type: registry.label(target_id, type_name::<T>()),
                source: ConversionFailure::UnexpectedTarget {
                    expected: type_name::<T>(),
                    found: registry.label(Any::type_id(&*other), "an unregistered type"),
                },
            }
        })
    }
}

fn log_failure(err: &MappingError) {
    let (source_type, target_type) = err.type_pair();
    error!(
        source_type = %source_type,
        target_type = %target_type,
        error = %err,
        "mapping failed"
    );
}
