//! Return-shape classification and cache encoding.
//!
//! Producer results come in three shapes, each encoded differently:
//!
//! | Shape              | Example                     | Stored as                      |
//! |--------------------|-----------------------------|--------------------------------|
//! | [`Shape::Record`]  | `PlayerSummary`             | the record's field map         |
//! | [`Shape::Records`] | `Vec<PlayerSummary>`        | a JSON array of field maps     |
//! | [`Shape::Plain`]   | `serde_json::Value`, `bool` | the value's direct JSON form   |
//!
//! The shape is only known at write time. Stored text carries no type tag, so a
//! cache hit always yields an untyped [`Value`].

use serde::Serialize;
use serde_json::{Map, Value};

/// Runtime shape of a producer result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A JSON-compatible scalar, mapping or sequence.
    Plain,
    /// A single structured record.
    Record,
    /// A sequence in which every element is a structured record.
    Records,
}

/// A structured record with a canonical field-to-value encoding.
///
/// The default encoding is the type's `Serialize` output, which must be a
/// JSON object. Records with derived fields override
/// [`canonical_fields`](Self::canonical_fields) to add them.
pub trait Record: Serialize {
    /// Returns the record's fields as a JSON map.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails or does not produce an object.
    fn canonical_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "record encoded as {other} instead of a field map"
            ))),
        }
    }
}

/// A producer result the memoizing layer knows how to store.
pub trait Cacheable {
    /// Classifies the value.
    fn shape(&self) -> Shape;

    /// Encodes the value as the JSON that a cache hit would return.
    fn to_json(&self) -> Result<Value, serde_json::Error>;

    /// Encodes the value as stored text.
    fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_json()?)
    }
}

impl<R: Record> Cacheable for Vec<R> {
    fn shape(&self) -> Shape {
        Shape::Records
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        self.iter()
            .map(|record| record.canonical_fields().map(Value::Object))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

/// Implements [`Cacheable`] as [`Shape::Record`] for types implementing [`Record`].
#[macro_export]
macro_rules! cacheable_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::cache::Cacheable for $ty {
                fn shape(&self) -> $crate::cache::Shape {
                    $crate::cache::Shape::Record
                }

                fn to_json(&self) -> ::std::result::Result<::serde_json::Value, ::serde_json::Error> {
                    $crate::cache::Record::canonical_fields(self).map(::serde_json::Value::Object)
                }
            }
        )+
    };
}

macro_rules! cacheable_plain {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn shape(&self) -> Shape {
                    Shape::Plain
                }

                fn to_json(&self) -> Result<Value, serde_json::Error> {
                    serde_json::to_value(self)
                }
            }
        )+
    };
}

cacheable_plain!(Value, String, bool, i64, u64, f64, Map<String, Value>);
