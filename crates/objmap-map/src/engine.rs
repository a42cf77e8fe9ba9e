//! Conversion engine.
//!
//! One [`Converter`] is built per configured type pair when the engine is
//! created. Converting instantiates the target through its registered
//! constructor and copies every configured field in declaration order.
//! Values whose runtime type lives in a mappable namespace are converted
//! recursively into the declared type of the target field.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use objmap_model::{DeclaredType, Instance, TypeDescriptor, Value};
use tracing::trace;

use crate::config::{ClassMapping, FieldPair, MappingConfig};
use crate::error::{ConversionFailure, MappingError};
use crate::resolver::FieldResolver;

/// Immutable conversion for one (source, target) type pair.
#[derive(Debug, Clone)]
pub struct Converter {
    source: Arc<TypeDescriptor>,
    target: Arc<TypeDescriptor>,
    fields: Arc<[FieldPair]>,
}

impl Converter {
    pub fn build(mapping: &ClassMapping) -> Self {
        Self {
            source: Arc::clone(mapping.source()),
            target: Arc::clone(mapping.target()),
            fields: mapping.fields().into(),
        }
    }

    pub fn source(&self) -> &TypeDescriptor {
        &self.source
    }

    pub fn target(&self) -> &TypeDescriptor {
        &self.target
    }

    fn key(&self) -> (TypeId, TypeId) {
        (self.source.id(), self.target.id())
    }

    fn apply(
        &self,
        engine: &ConversionEngine,
        source: &dyn Any,
    ) -> Result<Box<dyn Any>, ConversionFailure> {
        let constructor =
            self.target
                .constructor()
                .ok_or_else(|| ConversionFailure::NoConstructor {
                    type_name: self.target.name().to_string(),
                })?;
        let mut target = (**constructor)().map_err(|reason| ConversionFailure::Constructor {
            type_name: self.target.name().to_string(),
            reason,
        })?;

        for pair in self.fields.iter() {
            let value = engine.resolver.get(source, &pair.source)?;
            let value = engine.transfer(value, pair.target.declared_type(), pair.target.name())?;
            engine.resolver.set(&mut *target, &pair.target, value)?;
        }
        Ok(target)
    }
}

/// Registry of converters keyed by (source, target) type.
pub struct ConversionEngine {
    config: MappingConfig,
    resolver: Arc<FieldResolver>,
    converters: HashMap<(TypeId, TypeId), Converter>,
}

impl ConversionEngine {
    /// Builds one converter per class mapping.
    ///
    /// `config` must have been validated against `resolver`'s registry.
    pub fn new(config: MappingConfig, resolver: Arc<FieldResolver>) -> Self {
        let converters = config
            .class_mappings()
            .iter()
            .map(|mapping| {
                let converter = Converter::build(mapping);
                (converter.key(), converter)
            })
            .collect();
        Self {
            config,
            resolver,
            converters,
        }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<FieldResolver> {
        &self.resolver
    }

    pub fn converter(&self, source: TypeId, target: TypeId) -> Option<&Converter> {
        self.converters.get(&(source, target))
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Converts `source` into a new instance of `target`.
    ///
    /// # Errors
    ///
    /// [`MappingError::NoConverter`] if the exact pair is not configured,
    /// otherwise [`MappingError::Conversion`] for the first failing step.
    pub fn convert(&self, source: &dyn Any, target: TypeId) -> Result<Box<dyn Any>, MappingError> {
        let source_id = Any::type_id(source);
        let Some(converter) = self.converter(source_id, target) else {
            return Err(MappingError::NoConverter {
                source_type: self.label(source_id),
                target_type: self.label(target),
            });
        };
        trace!(
            source_type = %converter.source.name(),
            target_type = %converter.target.name(),
            "converting"
        );
        converter
            .apply(self, source)
            .map_err(|failure| MappingError::Conversion {
                source_type: converter.source.name().to_string(),
                target_type: converter.target.name().to_string(),
                source: failure,
            })
    }

    /// Whether a runtime type is registered in a mappable namespace.
    pub fn is_mappable(&self, type_id: TypeId) -> bool {
        self.resolver
            .registry()
            .by_id(type_id)
            .is_some_and(|ty| self.config.is_mappable_namespace(ty.namespace()))
    }

    fn transfer(
        &self,
        value: Value,
        declared: &DeclaredType,
        field: &str,
    ) -> Result<Value, ConversionFailure> {
        match value {
            Value::Object(instance) if self.is_mappable(instance.runtime_id()) => {
                let Some(target) = declared.object_type() else {
                    return Err(ConversionFailure::NotAnObjectField {
                        field: field.to_string(),
                        declared: declared.to_string(),
                    });
                };
                let converted = self.convert(instance.as_any(), target).map_err(|err| {
                    ConversionFailure::Nested {
                        field: field.to_string(),
                        source: Box::new(err),
                    }
                })?;
                let rust_name = self
                    .resolver
                    .registry()
                    .by_id(target)
                    .map_or("unregistered", |ty| ty.rust_name());
                Ok(Value::Object(Instance::from_boxed(converted, rust_name)))
            }
            Value::List(items) => match declared.element_type() {
                Some(element) => items
                    .into_iter()
                    .map(|item| self.transfer(item, element, field))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                None => Ok(Value::List(items)),
            },
            other => Ok(other),
        }
    }

    fn label(&self, type_id: TypeId) -> String {
        self.resolver
            .registry()
            .label(type_id, "an unregistered type")
    }
}

impl fmt::Debug for ConversionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self
            .converters
            .values()
            .map(|c| format!("{} -> {}", c.source.name(), c.target.name()))
            .collect();
        pairs.sort_unstable();
        f.debug_struct("ConversionEngine")
            .field("mappable_namespaces", &self.config.mappable_namespaces())
            .field("converters", &pairs)
            .finish()
    }
}
