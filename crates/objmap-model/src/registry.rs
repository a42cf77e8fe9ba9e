//! Explicit type registry.
//!
//! Every type taking part in a mapping is registered once at startup with a
//! fully-qualified name, an optional default constructor, a table of named
//! field accessors, and an optional ancestor embedded by composition. The
//! mapping engine resolves configuration type names and field names against
//! this registry instead of inspecting types at runtime.
//!
//! # Example
//!
//! ```ignore
//! use objmap_model::{TypeDef, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeDef::<Person>::new("com.example.models.Person")
//!         .field("firstName", |p| &p.first_name, |p| &mut p.first_name)
//!         .field("address", |p| &p.address, |p| &mut p.address),
//! )?;
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{RegistryError, Result, ValueError};
use crate::value::{DeclaredType, FieldValue, Value};

/// Creates a fresh boxed instance of a registered type.
pub type Constructor = Arc<dyn Fn() -> std::result::Result<Box<dyn Any>, String> + Send + Sync>;

/// Reason a field write was refused.
#[derive(Debug)]
pub enum WriteFailure {
    /// The object handed to the accessor is not of the field's owner type.
    WrongOwner,
    /// The value could not be converted into the field's type.
    Value(ValueError),
}

/// Typed read/write access to one field of one owner type.
pub trait FieldAccess: Send + Sync {
    /// Reads the field, or `None` if `owner` is not of the owner type.
    fn read(&self, owner: &dyn Any) -> Option<Value>;

    fn write(&self, owner: &mut dyn Any, value: Value) -> std::result::Result<(), WriteFailure>;
}

struct TypedField<T, F, G, M> {
    get: G,
    get_mut: M,
    _marker: PhantomData<fn(T) -> F>,
}

impl<T, F, G, M> FieldAccess for TypedField<T, F, G, M>
where
    T: Any,
    F: FieldValue,
    G: Fn(&T) -> &F + Send + Sync,
    M: Fn(&mut T) -> &mut F + Send + Sync,
{
    fn read(&self, owner: &dyn Any) -> Option<Value> {
        let owner = owner.downcast_ref::<T>()?;
        Some((self.get)(owner).to_value())
    }

    fn write(&self, owner: &mut dyn Any, value: Value) -> std::result::Result<(), WriteFailure> {
        let owner = owner
            .downcast_mut::<T>()
            .ok_or(WriteFailure::WrongOwner)?;
        let value = F::from_value(value).map_err(WriteFailure::Value)?;
        *(self.get_mut)(owner) = value;
        Ok(())
    }
}

/// Projection from a type onto the ancestor it embeds.
pub trait Projection: Send + Sync {
    fn project<'a>(&self, child: &'a dyn Any) -> Option<&'a dyn Any>;

    fn project_mut<'a>(&self, child: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct TypedProjection<C, P, G, M> {
    get: G,
    get_mut: M,
    _marker: PhantomData<fn(C) -> P>,
}

impl<C, P, G, M> Projection for TypedProjection<C, P, G, M>
where
    C: Any,
    P: Any,
    G: Fn(&C) -> &P + Send + Sync,
    M: Fn(&mut C) -> &mut P + Send + Sync,
{
    fn project<'a>(&self, child: &'a dyn Any) -> Option<&'a dyn Any> {
        let child = child.downcast_ref::<C>()?;
        Some((self.get)(child) as &dyn Any)
    }

    fn project_mut<'a>(&self, child: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let child = child.downcast_mut::<C>()?;
        Some((self.get_mut)(child) as &mut dyn Any)
    }
}

/// A named field in a type's own descriptor table.
#[derive(Clone)]
pub struct FieldDef {
    name: String,
    declared_type: DeclaredType,
    access: Arc<dyn FieldAccess>,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    pub fn access(&self) -> &Arc<dyn FieldAccess> {
        &self.access
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .finish_non_exhaustive()
    }
}

/// Link from a type to the ancestor it embeds.
#[derive(Clone)]
pub struct ParentLink {
    type_id: TypeId,
    rust_name: &'static str,
    projection: Arc<dyn Projection>,
}

impl ParentLink {
    /// Type id of the embedded ancestor.
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentLink")
            .field("rust_name", &self.rust_name)
            .finish_non_exhaustive()
    }
}

/// Registered metadata for one type.
pub struct TypeDescriptor {
    name: String,
    namespace: String,
    type_id: TypeId,
    rust_name: &'static str,
    parent: Option<ParentLink>,
    constructor: Option<Constructor>,
    fields: Vec<FieldDef>,
}

impl TypeDescriptor {
    /// Fully-qualified name used in configuration files.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace matched against the configured mappable prefixes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Type id of the registered Rust type.
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Fields declared directly on this type, in registration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field declared directly on this type (ancestors excluded).
    pub fn own_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("rust_name", &self.rust_name)
            .field("parent", &self.parent)
            .field("has_constructor", &self.constructor.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder describing a type before registration.
pub struct TypeDef<T> {
    name: String,
    namespace: Option<String>,
    parent: Option<ParentLink>,
    constructor: Option<Constructor>,
    fields: Vec<FieldDef>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Default> TypeDef<T> {
    /// Describes a type constructed through `Default`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::without_constructor(name).constructor(|| Ok(T::default()))
    }
}

impl<T: Any> TypeDef<T> {
    /// Describes a type that cannot be created by the mapping engine.
    pub fn without_constructor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            parent: None,
            constructor: None,
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Installs a fallible constructor, replacing any previous one.
    pub fn constructor<C>(mut self, constructor: C) -> Self
    where
        C: Fn() -> std::result::Result<T, String> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || {
            constructor().map(|value| Box::new(value) as Box<dyn Any>)
        }));
        self
    }

    /// Overrides the namespace derived from the type name.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds a named field backed by an accessor/mutator pair.
    pub fn field<F, G, M>(mut self, name: impl Into<String>, get: G, get_mut: M) -> Self
    where
        F: FieldValue,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.fields.push(FieldDef {
            name: name.into(),
            declared_type: F::declared_type(),
            access: Arc::new(TypedField {
                get,
                get_mut,
                _marker: PhantomData,
            }),
        });
        self
    }

    /// Declares the ancestor `P` embedded in `T`. Fields of `P` resolve on `T`.
    pub fn extends<P, G, M>(mut self, get: G, get_mut: M) -> Self
    where
        P: Any,
        G: Fn(&T) -> &P + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut P + Send + Sync + 'static,
    {
        self.parent = Some(ParentLink {
            type_id: TypeId::of::<P>(),
            rust_name: type_name::<P>(),
            projection: Arc::new(TypedProjection {
                get,
                get_mut,
                _marker: PhantomData,
            }),
        });
        self
    }

    fn build(self) -> Result<TypeDescriptor> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let type_id = TypeId::of::<T>();
        if self
            .parent
            .as_ref()
            .is_some_and(|parent| parent.type_id == type_id)
        {
            return Err(RegistryError::SelfParent { name });
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RegistryError::DuplicateField {
                    type_name: name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        let namespace = self
            .namespace
            .unwrap_or_else(|| namespace_of(&name).to_string());
        Ok(TypeDescriptor {
            name,
            namespace,
            type_id,
            rust_name: type_name::<T>(),
            parent: self.parent,
            constructor: self.constructor,
            fields: self.fields,
        })
    }
}

/// Namespace part of a qualified type name: everything before the last
/// `::` or `.` separator, or the empty string for unqualified names.
pub fn namespace_of(name: &str) -> &str {
    if let Some((namespace, _)) = name.rsplit_once("::") {
        return namespace;
    }
    name.rsplit_once('.')
        .map(|(namespace, _)| namespace)
        .unwrap_or("")
}

/// Registry of all types known to the mapping engine.
#[derive(Default)]
pub struct TypeRegistry {
    by_id: HashMap<TypeId, Arc<TypeDescriptor>>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type description.
    ///
    /// # Errors
    ///
    /// Fails if the name or the Rust type is already registered, if a field
    /// name is declared twice, or if the type extends itself.
    pub fn register<T: Any>(&mut self, def: TypeDef<T>) -> Result<()> {
        let descriptor = def.build()?;
        if self.by_name.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName {
                name: descriptor.name,
            });
        }
        if let Some(existing) = self.by_id.get(&descriptor.type_id) {
            return Err(RegistryError::DuplicateType {
                rust_name: descriptor.rust_name,
                existing: existing.name.clone(),
            });
        }
        self.by_name
            .insert(descriptor.name.clone(), descriptor.type_id);
        self.by_id
            .insert(descriptor.type_id, Arc::new(descriptor));
        Ok(())
    }

    /// Builder-style variant of [`Self::register`].
    pub fn with<T: Any>(mut self, def: TypeDef<T>) -> Result<Self> {
        self.register(def)?;
        Ok(self)
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        let type_id = self.by_name.get(name.trim())?;
        self.by_id.get(type_id)
    }

    pub fn by_id(&self, type_id: TypeId) -> Option<&Arc<TypeDescriptor>> {
        self.by_id.get(&type_id)
    }

    pub fn of<T: Any>(&self) -> Option<&Arc<TypeDescriptor>> {
        self.by_id(TypeId::of::<T>())
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.by_id.contains_key(&type_id)
    }

    /// The type itself followed by its registered ancestors, nearest first.
    ///
    /// The walk stops at the first ancestor that is not registered.
    pub fn ancestry(&self, type_id: TypeId) -> Vec<&Arc<TypeDescriptor>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.by_id.get(&type_id);
        while let Some(descriptor) = current {
            if !visited.insert(descriptor.type_id) {
                break;
            }
            chain.push(descriptor);
            current = descriptor
                .parent
                .as_ref()
                .and_then(|parent| self.by_id.get(&parent.type_id));
        }
        chain
    }

    /// Display label for a type id: the registered name, or `fallback`.
    pub fn label(&self, type_id: TypeId, fallback: &str) -> String {
        self.by_id(type_id)
            .map(|descriptor| descriptor.name.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}
