//! Field resolution with a per-type descriptor cache.
//!
//! A field name is resolved by walking a type and its registered ancestors
//! until a type declaring the name is found. Successful lookups are cached
//! per type; the cache only grows and is safe to populate concurrently.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use objmap_model::{DeclaredType, FieldAccess, TypeDescriptor, TypeRegistry, Value, WriteFailure};
use tracing::trace;

use crate::error::{AccessError, FieldNotFound};

/// Resolved identity of a named field, including the type that declares it.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    declared_type: DeclaredType,
    owner: TypeId,
    owner_name: String,
    access: Arc<dyn FieldAccess>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// The type in the ancestry chain that declares this field.
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("owner", &self.owner_name)
            .finish_non_exhaustive()
    }
}

/// Resolves field names against a [`TypeRegistry`] and moves values in and
/// out of instances.
pub struct FieldResolver {
    registry: Arc<TypeRegistry>,
    cache: DashMap<TypeId, HashMap<String, FieldDescriptor>>,
}

impl FieldResolver {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            cache: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Finds `field` on `ty` or the nearest ancestor declaring it.
    ///
    /// # Errors
    ///
    /// [`FieldNotFound`] if no type in the ancestry declares the name.
    pub fn resolve(
        &self,
        ty: &TypeDescriptor,
        field: &str,
    ) -> Result<FieldDescriptor, FieldNotFound> {
        if let Some(fields) = self.cache.get(&ty.id())
            && let Some(descriptor) = fields.get(field)
        {
            return Ok(descriptor.clone());
        }

        let descriptor = self.lookup(ty, field)?;
        trace!(
            type_name = %ty.name(),
            field = %field,
            owner = %descriptor.owner_name,
            "field resolved"
        );
        // A concurrent writer computes the same descriptor, so overwriting is harmless.
        self.cache
            .entry(ty.id())
            .or_default()
            .insert(field.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    fn lookup(&self, ty: &TypeDescriptor, field: &str) -> Result<FieldDescriptor, FieldNotFound> {
        self.registry
            .ancestry(ty.id())
            .into_iter()
            .find_map(|owner| {
                owner.own_field(field).map(|def| FieldDescriptor {
                    name: def.name().to_string(),
                    declared_type: def.declared_type().clone(),
                    owner: owner.id(),
                    owner_name: owner.name().to_string(),
                    access: Arc::clone(def.access()),
                })
            })
            .ok_or_else(|| FieldNotFound {
                field: field.to_string(),
                type_name: ty.name().to_string(),
            })
    }

    /// Reads a resolved field from `instance`.
    pub fn get(&self, instance: &dyn Any, field: &FieldDescriptor) -> Result<Value, AccessError> {
        let owner = self.project(instance, field)?;
        field
            .access
            .read(owner)
            .ok_or_else(|| self.incompatible(Any::type_id(instance), field))
    }

    /// Writes a resolved field on `instance`.
    pub fn set(
        &self,
        instance: &mut dyn Any,
        field: &FieldDescriptor,
        value: Value,
    ) -> Result<(), AccessError> {
        let found = Any::type_id(&*instance);
        let owner = self.project_mut(instance, field)?;
        field.access.write(owner, value).map_err(|failure| match failure {
            WriteFailure::WrongOwner => self.incompatible(found, field),
            WriteFailure::Value(source) => AccessError::Assign {
                field: field.name.clone(),
                owner: field.owner_name.clone(),
                source,
            },
        })
    }

    /// Number of types with at least one cached field.
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    /// Total number of cached field descriptors.
    pub fn cached_fields(&self) -> usize {
        self.cache.iter().map(|entry| entry.value().len()).sum()
    }

    fn project<'a>(
        &self,
        instance: &'a dyn Any,
        field: &FieldDescriptor,
    ) -> Result<&'a dyn Any, AccessError> {
        let found = Any::type_id(instance);
        let mut current = instance;
        for _ in 0..=self.registry.len() {
            let type_id = Any::type_id(current);
            if type_id == field.owner {
                return Ok(current);
            }
            let Some(link) = self.registry.by_id(type_id).and_then(|ty| ty.parent()) else {
                break;
            };
            match link.projection().project(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Err(self.incompatible(found, field))
    }

    fn project_mut<'a>(
        &self,
        instance: &'a mut dyn Any,
        field: &FieldDescriptor,
    ) -> Result<&'a mut dyn Any, AccessError> {
        let found = Any::type_id(&*instance);
        let mut current = instance;
        for _ in 0..=self.registry.len() {
            let type_id = Any::type_id(&*current);
            if type_id == field.owner {
                return Ok(current);
            }
            let Some(link) = self.registry.by_id(type_id).and_then(|ty| ty.parent()) else {
                break;
            };
            match link.projection().project_mut(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Err(self.incompatible(found, field))
    }

    fn incompatible(&self, found: TypeId, field: &FieldDescriptor) -> AccessError {
        AccessError::IncompatibleOwner {
            field: field.name.clone(),
            owner: field.owner_name.clone(),
            found: self.registry.label(found, "an unregistered type"),
        }
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldResolver")
            .field("registry", &self.registry)
            .field("cached_types", &self.cached_types())
            .finish()
    }
}
