//! Dynamic values moved between source and target fields.
//!
//! Field accessors registered in a [`crate::TypeRegistry`] read a typed
//! field into a [`Value`] and write a [`Value`] back into a typed field.
//! The conversion in both directions is described by [`FieldValue`], which
//! is implemented for the common scalar types, `Option<T>`, `Vec<T>`, and
//! for any `Clone` object type through [`crate::impl_field_value_object`].

use std::any::{Any, TypeId, type_name};
use std::fmt;

use crate::error::ValueError;

/// A field value in transit between two objects.
#[derive(Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    /// A nested object, carried by ownership together with its runtime type.
    Object(Instance),
}

impl Value {
    /// Short label of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Object(instance) => instance.rust_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }
}

/// An owned object of some registered (or unregistered) Rust type.
pub struct Instance {
    data: Box<dyn Any>,
    rust_name: &'static str,
}

impl Instance {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            data: Box::new(value),
            rust_name: type_name::<T>(),
        }
    }

    /// Wraps an already boxed object. `rust_name` is only used for display.
    pub fn from_boxed(data: Box<dyn Any>, rust_name: &'static str) -> Self {
        Self { data, rust_name }
    }

    /// Runtime type of the wrapped object.
    pub fn runtime_id(&self) -> TypeId {
        Any::type_id(&*self.data)
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn as_any(&self) -> &dyn Any {
        &*self.data
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut *self.data
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Unwraps the object as `T`, handing the instance back on mismatch.
    pub fn into_inner<T: Any>(self) -> Result<T, Self> {
        let Self { data, rust_name } = self;
        match data.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(data) => Err(Self { data, rust_name }),
        }
    }

    pub fn into_boxed(self) -> Box<dyn Any> {
        self.data
    }

    /// Extracts a `T` from an object value. Used by
    /// [`crate::impl_field_value_object`].
    pub fn take_value<T: Any>(value: Value) -> Result<T, ValueError> {
        match value {
            Value::Object(instance) => {
                instance
                    .into_inner::<T>()
                    .map_err(|instance| ValueError::TypeMismatch {
                        expected: type_name::<T>().to_string(),
                        found: instance.rust_name(),
                    })
            }
            Value::Null => Err(ValueError::UnexpectedNull {
                expected: type_name::<T>().to_string(),
            }),
            other => Err(ValueError::TypeMismatch {
                expected: type_name::<T>().to_string(),
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.rust_name)
    }
}

/// Static type of a field as declared on its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Bool,
    Int(&'static str),
    Float(&'static str),
    Text,
    Char,
    List(Box<DeclaredType>),
    Optional(Box<DeclaredType>),
    Object {
        type_id: TypeId,
        rust_name: &'static str,
    },
}

impl DeclaredType {
    pub fn object<T: Any>() -> Self {
        Self::Object {
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
        }
    }

    /// The object type a nested value converts into, looking through `Option`.
    pub fn object_type(&self) -> Option<TypeId> {
        match self {
            Self::Object { type_id, .. } => Some(*type_id),
            Self::Optional(inner) => inner.object_type(),
            _ => None,
        }
    }

    /// Element type of a list field, looking through `Option`.
    pub fn element_type(&self) -> Option<&DeclaredType> {
        match self {
            Self::List(inner) => Some(inner.as_ref()),
            Self::Optional(inner) => inner.element_type(),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(name) | Self::Float(name) => f.write_str(name),
            Self::Text => f.write_str("String"),
            Self::Char => f.write_str("char"),
            Self::List(inner) => write!(f, "Vec<{inner}>"),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Object { rust_name, .. } => f.write_str(rust_name),
        }
    }
}

/// Conversion between a typed field and a [`Value`].
pub trait FieldValue: Sized + 'static {
    fn declared_type() -> DeclaredType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

fn mismatch(expected: &DeclaredType, found: &Value) -> ValueError {
    match found {
        Value::Null => ValueError::UnexpectedNull {
            expected: expected.to_string(),
        },
        other => ValueError::TypeMismatch {
            expected: expected.to_string(),
            found: other.kind(),
        },
    }
}

impl FieldValue for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => Err(mismatch(&Self::declared_type(), &other)),
        }
    }
}

macro_rules! int_field_value {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::Int(stringify!($ty))
            }

            fn to_value(&self) -> Value {
                Value::Int(*self as i128)
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Int(raw) => <$ty>::try_from(raw).map_err(|_| ValueError::OutOfRange {
                        value: raw.to_string(),
                        target: stringify!($ty),
                    }),
                    other => Err(mismatch(&Self::declared_type(), &other)),
                }
            }
        }
    )*};
}

int_field_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_field_value {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::Float(stringify!($ty))
            }

            fn to_value(&self) -> Value {
                Value::Float(f64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Float(raw) => Ok(raw as $ty),
                    // Integers widen into floating point fields.
                    Value::Int(raw) => Ok(raw as $ty),
                    other => Err(mismatch(&Self::declared_type(), &other)),
                }
            }
        }
    )*};
}

float_field_value!(f32, f64);

impl FieldValue for String {
    fn declared_type() -> DeclaredType {
        DeclaredType::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) => Ok(text),
            other => Err(mismatch(&Self::declared_type(), &other)),
        }
    }
}

impl FieldValue for char {
    fn declared_type() -> DeclaredType {
        DeclaredType::Char
    }

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(ch),
                    _ => Err(ValueError::OutOfRange {
                        value: text,
                        target: "char",
                    }),
                }
            }
            other => Err(mismatch(&Self::declared_type(), &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::Optional(Box::new(T::declared_type()))
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::List(Box::new(T::declared_type()))
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch(&Self::declared_type(), &other)),
        }
    }
}

/// Implements [`FieldValue`] for object types so they can be used as
/// nested fields. The types must implement `Clone`.
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// struct Address { street: String }
///
/// objmap_model::impl_field_value_object!(Address);
/// ```
#[macro_export]
macro_rules! impl_field_value_object {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::FieldValue for $ty {
            fn declared_type() -> $crate::DeclaredType {
                $crate::DeclaredType::object::<$ty>()
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Object($crate::Instance::new(::std::clone::Clone::clone(self)))
            }

            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::ValueError> {
                $crate::Instance::take_value::<$ty>(value)
            }
        }
    )+};
}
