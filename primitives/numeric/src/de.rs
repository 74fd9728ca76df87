//! Narrowing a decoded [`Value`] into a typed shape.
//!
//! [`Value`] implements [`serde::Deserializer`], so any `DeserializeOwned`
//! type can be read out of it with [`from_value`]. Integers are offered to
//! the visitor in the narrowest primitive that holds them exactly.

use num_traits::ToPrimitive;
use serde::de::value::{MapAccessDeserializer, MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::{Int, Value};

/// A decoded value did not have the shape the caller asked for.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ShapeError(pub String);

/// Reads a `T` out of a decoded [`Value`].
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ShapeError> {
    T::deserialize(value).map_err(|e| ShapeError(e.to_string()))
}

fn visit_int<'de, V: Visitor<'de>>(int: Int, visitor: V) -> Result<V::Value, de::value::Error> {
    match int {
        Int::Safe(v) => visitor.visit_i64(v),
        Int::Big(b) => {
            if let Some(v) = b.to_u64() {
                visitor.visit_u64(v)
            } else if let Some(v) = b.to_i64() {
                visitor.visit_i64(v)
            } else if let Some(v) = b.to_u128() {
                visitor.visit_u128(v)
            } else if let Some(v) = b.to_i128() {
                visitor.visit_i128(v)
            } else {
                Err(de::Error::custom(format!("integer {} exceeds the 128-bit range", b)))
            }
        }
    }
}

impl<'de> IntoDeserializer<'de, de::value::Error> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer { self }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visit_int(i, visitor),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => {
                let mut seq: SeqDeserializer<_, de::value::Error> =
                    SeqDeserializer::new(items.into_iter());
                let out = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(out)
            }
            Value::Object(map) => {
                let mut access: MapDeserializer<'de, _, de::value::Error> =
                    MapDeserializer::new(map.into_iter());
                let out = visitor.visit_map(&mut access)?;
                access.end()?;
                Ok(out)
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self {
            Value::String(s) => {
                let variant: StringDeserializer<de::value::Error> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Object(map) => {
                let access: MapDeserializer<'de, _, de::value::Error> =
                    MapDeserializer::new(map.into_iter());
                visitor.visit_enum(MapAccessDeserializer::new(access))
            }
            other => Err(de::Error::invalid_type(other.unexpected(), &"a string or a map")),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}
