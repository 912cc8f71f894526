//! Binding field paths to serialized records with serde.
//!
//! In serialized form a path is its canonical text. A `null`, missing or
//! empty string value means "no path" rather than an error, while any other
//! text that fails to decode fails the whole deserialization.
//!
//! Use [`PathSeed`] to decode with a specific [`PathCodec`], or the
//! [`optional`] module to decode with the standard one:
//!
//! ```
//! use field_path::FieldPath;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Column {
//!     #[serde(default, with = "field_path::binding::optional")]
//!     source: Option<FieldPath>,
//! }
//!
//! let column: Column = serde_json::from_str(r#"{"source": "a.b[1]"}"#).unwrap();
//! let source = column.source.unwrap();
//! assert_eq!(source.as_unescaped_dotted_string().unwrap(), "a.b[1]");
//! ```
use std::fmt;

use serde::{
    de::{self, DeserializeSeed, Deserializer, Visitor},
    Serialize, Serializer,
};

use crate::{codec::PathCodec, errors::PathError, path::FieldPath};

/// Decode one raw text token. An absent or empty token is `Ok(None)`.
pub fn decode_token(codec: &PathCodec, token: Option<&str>) -> Result<Option<FieldPath>, PathError> {
    match token {
        None | Some("") => Ok(None),
        Some(text) => codec.decode(text).map(Some),
    }
}

/// A [`DeserializeSeed`] producing an `Option<FieldPath>` with the codec
/// it was created with.
#[derive(Clone, Copy)]
pub struct PathSeed<'c> {
    codec: &'c PathCodec,
}

impl<'c> PathSeed<'c> {
    pub fn new(codec: &'c PathCodec) -> Self {
        PathSeed { codec }
    }
}

impl<'de> DeserializeSeed<'de> for PathSeed<'_> {
    type Value = Option<FieldPath>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(PathVisitor { codec: self.codec })
    }
}

struct PathVisitor<'c> {
    codec: &'c PathCodec,
}

impl<'de> Visitor<'de> for PathVisitor<'_> {
    type Value = Option<FieldPath>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a field path string or null")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        decode_token(self.codec, Some(v)).map_err(E::custom)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, d: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_str(self)
    }
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_canonical_text())
    }
}

/// `#[serde(with = "field_path::binding::optional")]` support for
/// `Option<FieldPath>` fields, decoding with the standard codec.
pub mod optional {
    use lazy_static::lazy_static;
    use serde::{de::DeserializeSeed, Deserializer, Serializer};

    use super::PathSeed;
    use crate::{codec::PathCodec, path::FieldPath};

    lazy_static! {
        static ref CODEC: PathCodec = PathCodec::default();
    }

    pub fn serialize<S>(path: &Option<FieldPath>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match path {
            Some(path) => serializer.serialize_str(&path.to_canonical_text()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<FieldPath>, D::Error>
    where
        D: Deserializer<'de>,
    {
        PathSeed::new(&CODEC).deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_tokens() {
        let codec = PathCodec::default();
        assert_eq!(decode_token(&codec, None), Ok(None));
        assert_eq!(decode_token(&codec, Some("")), Ok(None));
    }

    #[test]
    fn token_is_decoded() {
        let codec = PathCodec::default();
        let expected = FieldPath::from_segments(["a", "b"])
            .and_then(|p| p.with_child_index(1))
            .unwrap();
        assert_eq!(decode_token(&codec, Some("a.b[1]")), Ok(Some(expected)));
    }

    #[test]
    fn seed_with_json() {
        let codec = PathCodec::default();
        let mut de = serde_json::Deserializer::from_str(r#""`x`[0]""#);
        let path = PathSeed::new(&codec).deserialize(&mut de).unwrap();
        assert_eq!(
            path,
            FieldPath::simple("x").and_then(|p| p.with_child_index(0)).ok()
        );

        let mut de = serde_json::Deserializer::from_str("null");
        assert_eq!(PathSeed::new(&codec).deserialize(&mut de).unwrap(), None);
    }

    #[test]
    fn seed_failure_is_fatal() {
        let codec = PathCodec::default();
        let mut de = serde_json::Deserializer::from_str(r#""1+1""#);
        let err = PathSeed::new(&codec).deserialize(&mut de).unwrap_err();
        assert!(err.to_string().contains("malformed field path"));
    }

    #[test]
    fn serialize_canonical_text() {
        let path = FieldPath::compound(["a", "b c"]).unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""`a`.`b c`""#);
    }
}
