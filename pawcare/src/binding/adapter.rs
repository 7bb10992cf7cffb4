//! Query-string deserialization with explicit coercion rules.
//!
//! Integers: optional sign then ASCII digits. Decimals: optional sign, digits,
//! and an optional `.` followed by digits. Booleans: `true`, `false`, `1`, `0`.
//! Anything else aimed at a typed field is a coercion failure.

use std::collections::btree_map;
use std::fmt::Display;
use std::str::FromStr;

use serde::de::value::{Error as ValueError, SeqDeserializer};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, Visitor,
};
use serde::forward_to_deserialize_any;

use super::{DeserializationError, QueryValue, RawQuery};

/// Deserializes a flat query map into `T`. Absent keys are left to `T`'s defaults.
pub fn from_query<T: DeserializeOwned>(query: &RawQuery) -> Result<T, DeserializationError> {
    T::deserialize(QueryDeserializer {
        entries: query.iter(),
        pending: None,
    })
    .map_err(|e| DeserializationError::Query(e.to_string()))
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() {
                return false;
            }
            (whole, fraction)
        }
        None => (unsigned, ""),
    };
    !(whole.is_empty() && fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn coerce<T>(raw: &str, expected: &str, accepts: fn(&str) -> bool) -> Result<T, ValueError>
where
    T: FromStr,
    T::Err: Display,
{
    if !accepts(raw) {
        return Err(de::Error::custom(format_args!(
            "'{raw}' is not a valid {expected}"
        )));
    }
    raw.parse::<T>()
        .map_err(|e| de::Error::custom(format_args!("'{raw}' is not a valid {expected}: {e}")))
}

/// Digit strings too long for the target float parse to infinity.
fn finite(raw: &str, is_finite: bool) -> Result<(), ValueError> {
    if is_finite {
        Ok(())
    } else {
        Err(de::Error::custom(format_args!(
            "'{raw}' is out of range for a decimal number"
        )))
    }
}

struct QueryDeserializer<'a> {
    entries: btree_map::Iter<'a, String, QueryValue>,
    pending: Option<(&'a str, &'a QueryValue)>,
}

impl<'de> Deserializer<'de> for QueryDeserializer<'_> {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_map(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de> MapAccess<'de> for QueryDeserializer<'_> {
    type Error = ValueError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some((key.as_str(), value));
        seed.deserialize(<&str as IntoDeserializer<'de, ValueError>>::into_deserializer(
            key.as_str(),
        ))
        .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let (key, value) = self
            .pending
            .take()
            .ok_or_else(|| de::Error::custom("query value requested before its key"))?;
        seed.deserialize(ValueDeserializer(value))
            .map_err(|e| de::Error::custom(format_args!("field `{key}`: {e}")))
    }
}

struct ValueDeserializer<'a>(&'a QueryValue);

impl<'a> ValueDeserializer<'a> {
    fn scalar(&self) -> Result<&'a str, ValueError> {
        match self.0 {
            QueryValue::Single(value) => Ok(value.as_str()),
            QueryValue::Many(_) => Err(de::Error::custom("expected a single value, found a list")),
        }
    }

    fn items(&self) -> std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str> {
        let as_str: fn(&'a String) -> &'a str = String::as_str;
        match self.0 {
            QueryValue::Single(value) => std::slice::from_ref(value).iter().map(as_str),
            QueryValue::Many(values) => values.iter().map(as_str),
        }
    }
}

macro_rules! coerce_number {
    ($($method:ident => $ty:ty, $visit:ident, $expected:literal, $accepts:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                let value = coerce::<$ty>(self.scalar()?, $expected, $accepts)?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'_> {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            QueryValue::Single(value) => visitor.visit_str(value),
            QueryValue::Many(_) => {
                visitor.visit_seq(SeqDeserializer::<_, ValueError>::new(self.items()))
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.scalar()? {
            "true" | "1" => visitor.visit_bool(true),
            "false" | "0" => visitor.visit_bool(false),
            other => Err(de::Error::custom(format_args!(
                "'{other}' is not a valid boolean (expected true, false, 1 or 0)"
            ))),
        }
    }

    coerce_number! {
        deserialize_i8 => i8, visit_i8, "integer", is_integer;
        deserialize_i16 => i16, visit_i16, "integer", is_integer;
        deserialize_i32 => i32, visit_i32, "integer", is_integer;
        deserialize_i64 => i64, visit_i64, "integer", is_integer;
        deserialize_u8 => u8, visit_u8, "integer", is_integer;
        deserialize_u16 => u16, visit_u16, "integer", is_integer;
        deserialize_u32 => u32, visit_u32, "integer", is_integer;
        deserialize_u64 => u64, visit_u64, "integer", is_integer;
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let raw = self.scalar()?;
        let value = coerce::<f32>(raw, "decimal number", is_decimal)?;
        finite(raw, value.is_finite())?;
        visitor.visit_f32(value)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let raw = self.scalar()?;
        let value = coerce::<f64>(raw, "decimal number", is_decimal)?;
        finite(raw, value.is_finite())?;
        visitor.visit_f64(value)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.scalar()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_seq(SeqDeserializer::<_, ValueError>::new(self.items()))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let raw = self.scalar()?;
        visitor.visit_enum(<&str as IntoDeserializer<'de, ValueError>>::into_deserializer(raw))
    }

    forward_to_deserialize_any! {
        i128 u128 char bytes byte_buf unit unit_struct tuple tuple_struct map struct
        identifier ignored_any
    }
}
