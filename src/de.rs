//! Serde deserializer over decoded arguments.
//!
//! The top level is a map from key to values. Each key's values then deserialize as:
//! - a sequence (`Vec<T>`, tuples), taking every value in order of appearance;
//! - a scalar, requiring exactly one value;
//! - `Option<T>`, always `Some` when the key is present (absent keys are handled by Serde's
//!   missing-field logic, so `Option` fields default to `None`).
//!
//! Scalars are parsed from text: `bool` accepts `true`/`false` (any ASCII case) and `1`/`0`,
//! numbers use Rust's `FromStr`, unit enum variants match by name.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer as _, MapAccess, SeqAccess, Unexpected,
    Visitor, value::BorrowedStrDeserializer,
};
use serde::forward_to_deserialize_any;

use crate::args::Args;
use crate::error::Error;
use crate::options::Options;
use crate::parse::{parse_with_options, to_str};

/// Decode an argument string and deserialize it into `T`, using default [`Options`].
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Obfs4 {
///     cert: String,
///     #[serde(rename = "iat-mode")]
///     iat_mode: u8,
///     #[serde(default)]
///     bridges: Vec<String>,
/// }
///
/// let args: Obfs4 = serde_ptargs::from_str(r"cert=a\;b;iat-mode=2").unwrap();
/// assert_eq!(args.cert, "a;b");
/// assert_eq!(args.iat_mode, 2);
/// assert!(args.bridges.is_empty());
/// ```
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, Error> {
    from_str_with_options(input, Options::default())
}

/// Decode with the given [`Options`] and deserialize into `T`.
pub fn from_str_with_options<T: DeserializeOwned>(input: &str, options: Options) -> Result<T, Error> {
    let args = parse_with_options(input, &options)?;
    from_args(&args)
}

/// Decode UTF-8 bytes and deserialize into `T`.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    from_slice_with_options(bytes, Options::default())
}

/// Decode UTF-8 bytes with the given [`Options`] and deserialize into `T`.
pub fn from_slice_with_options<T: DeserializeOwned>(
    bytes: &[u8],
    options: Options,
) -> Result<T, Error> {
    from_str_with_options(to_str(bytes)?, options)
}

/// Deserialize an already decoded [`Args`]. String fields may borrow from `args`.
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// let args = serde_ptargs::parse("b=2;a=1").unwrap();
/// let map: BTreeMap<&str, &str> = serde_ptargs::from_args(&args).unwrap();
/// assert_eq!(map.into_iter().collect::<Vec<_>>(), [("a", "1"), ("b", "2")]);
/// ```
pub fn from_args<'de, T: de::Deserialize<'de>>(args: &'de Args) -> Result<T, Error> {
    T::deserialize(ArgsDeserializer { args })
}

/// Deserializer for the whole bag; presents it as a map.
struct ArgsDeserializer<'de> {
    args: &'de Args,
}

impl<'de> de::Deserializer<'de> for ArgsDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_map(ArgsMapAccess::new(self.args))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        if self.args.is_empty() {
            visitor.visit_unit()
        } else {
            Err(de::Error::invalid_type(Unexpected::Map, &visitor))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_unit(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf seq tuple tuple_struct map struct enum identifier ignored_any
    }
}

/// Walks the bag in key order, so the first reported error does not depend on hashing.
struct ArgsMapAccess<'de> {
    entries: std::vec::IntoIter<(&'de str, &'de [String])>,
    current: Option<(&'de str, &'de [String])>,
}

impl<'de> ArgsMapAccess<'de> {
    fn new(args: &'de Args) -> Self {
        Self {
            entries: args.sorted().into_iter(),
            current: None,
        }
    }
}

impl<'de> MapAccess<'de> for ArgsMapAccess<'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, Error> {
        match self.entries.next() {
            Some((key, values)) => {
                self.current = Some((key, values));
                seed.deserialize(BorrowedStrDeserializer::<Error>::new(key))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let (key, values) = self
            .current
            .take()
            .ok_or_else(|| Error::msg("value requested before key"))?;
        seed.deserialize(ValuesDeserializer { values })
            .map_err(|err| err.for_key(key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializer for all values of one key.
struct ValuesDeserializer<'de> {
    values: &'de [String],
}

impl<'de> ValuesDeserializer<'de> {
    fn single(&self) -> Result<ValueDeserializer<'de>, Error> {
        match self.values {
            [value] => Ok(ValueDeserializer {
                value: value.as_str(),
            }),
            values => Err(Error::msg(format!(
                "expected a single value, found {}",
                values.len()
            ))),
        }
    }

    fn seq(&self) -> ValuesSeqAccess<'de> {
        ValuesSeqAccess {
            values: self.values.iter(),
        }
    }
}

macro_rules! forward_to_single {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                self.single()?.$method(visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValuesDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        if self.values.len() == 1 {
            self.single()?.deserialize_any(visitor)
        } else {
            visitor.visit_seq(self.seq())
        }
    }

    forward_to_single! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_i128 deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_u128 deserialize_f32 deserialize_f64 deserialize_char deserialize_str
        deserialize_string deserialize_bytes deserialize_byte_buf deserialize_unit
        deserialize_map deserialize_identifier
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.single()?.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let mut seq = self.seq();
        let value = visitor.visit_seq(&mut seq)?;
        seq.end()?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.single()?.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.single()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }
}

struct ValuesSeqAccess<'de> {
    values: std::slice::Iter<'de, String>,
}

impl ValuesSeqAccess<'_> {
    fn end(&self) -> Result<(), Error> {
        match self.values.len() {
            0 => Ok(()),
            extra => Err(Error::msg(format!("{extra} unexpected trailing values"))),
        }
    }
}

impl<'de> SeqAccess<'de> for ValuesSeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, Error> {
        match self.values.next() {
            Some(value) => seed
                .deserialize(ValueDeserializer {
                    value: value.as_str(),
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len())
    }
}

/// Deserializer for one decoded value.
struct ValueDeserializer<'de> {
    value: &'de str,
}

/// Parse a textual boolean: `true`/`false` in any ASCII case, or `1`/`0`.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                match self.value.parse() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => Err(de::Error::invalid_value(Unexpected::Str(self.value), &visitor)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match parse_bool(self.value) {
            Some(b) => visitor.visit_bool(b),
            None => Err(de::Error::invalid_value(Unexpected::Str(self.value), &visitor)),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(de::Error::invalid_value(Unexpected::Str(self.value), &visitor)),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_bytes(self.value.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_bytes(self.value.as_bytes())
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(de::Error::invalid_type(Unexpected::Str(self.value), &visitor))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        Err(de::Error::invalid_type(Unexpected::Str(self.value), &visitor))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        Err(de::Error::invalid_type(Unexpected::Str(self.value), &visitor))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.value))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }
}
