use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Utc};
use num_bigint::{BigInt, Sign};

use crate::class::{BIG_INT, BOOLEAN, Class, DATE, NUMBER, STRING};
use crate::node::{ListRef, NodeId, ObjectRef};

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value.
///
/// `Undefined` stands for a missing value and is distinct from `Null`.
/// Lists and objects are shared handles, so cloning a `Value` never
/// deep-copies a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    List(ListRef),
    Object(ObjectRef),
}

impl Value {
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `Null` or `Undefined`.
    #[inline]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Booleans, numbers, strings, dates and big integers.
    #[inline]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Number(_) | Self::String(_) | Self::Date(_) | Self::BigInt(_)
        )
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Reference identity of lists and objects.
    #[inline]
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::List(l) => Some(l.id()),
            Self::Object(o) => Some(o.id()),
            _ => None,
        }
    }

    /// Runtime class of the value.
    ///
    /// Scalars report their built-in class, objects their own class.
    /// Plain objects, lists and nullish values have none.
    pub fn class(&self) -> Option<&'static Class> {
        match self {
            Self::Bool(_) => Some(&BOOLEAN),
            Self::Number(_) => Some(&NUMBER),
            Self::String(_) => Some(&STRING),
            Self::Date(_) => Some(&DATE),
            Self::BigInt(_) => Some(&BIG_INT),
            Self::Object(o) => o.class(),
            Self::Undefined | Self::Null | Self::List(_) => None,
        }
    }

    /// Loose truthiness: empty strings, zero, `NaN` and nullish values are
    /// false, every node is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::BigInt(b) => b.sign() != Sign::NoSign,
            Self::Date(_) | Self::List(_) | Self::Object(_) => true,
        }
    }

    /// Reads a property of an object value, `Undefined` otherwise.
    #[inline]
    pub fn get(&self, key: &str) -> Value {
        match self {
            Self::Object(o) => o.get(key),
            _ => Self::Undefined,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::Number(value as f64)
            }
        }
    )*};
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    #[inline]
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<BigInt> for Value {
    #[inline]
    fn from(value: BigInt) -> Self {
        Self::BigInt(value)
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl From<ListRef> for Value {
    #[inline]
    fn from(value: ListRef) -> Self {
        Self::List(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::List(ListRef::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

// -----------------------------------------------------------------------------
// Tests
