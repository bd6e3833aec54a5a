//! # zon
//!
//! Codec for **ZON (Zero Overhead Notation)**: a line-oriented, UTF-8 text
//! serialization of the JSON data model with a reduced token footprint.
//!
//! ## What is ZON?
//!
//! ZON keeps JSON's values (null, booleans, numbers, strings, arrays,
//! objects) but spends far fewer tokens on structure. Top-level fields are
//! `key:value` lines, uniform object arrays collapse into CSV-style tables
//! with one shared header, and everything else nests as a compact quoted
//! payload. The output is canonical: equal values always produce
//! byte-identical text.
//!
//! ## Key Features
//!
//! - **Tabular arrays**: arrays of objects with one key set serialize as
//!   `key:@(N):cols` plus one row per element
//! - **Canonical output**: sorted keys, shortest round-trip numbers, no
//!   scientific notation, minimal quoting
//! - **Strict decoding**: declared row counts, field counts, escape
//!   discipline, and resource limits are enforced with stable error codes
//! - **Serde compatible**: any `Serialize` type encodes, any `Deserialize`
//!   type decodes
//! - **No unsafe code**
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use zon::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Hike {
//!     id: u32,
//!     name: String,
//!     sunny: bool,
//! }
//!
//! let hikes = vec![
//!     Hike { id: 1, name: "Blue Lake Trail".to_string(), sunny: true },
//!     Hike { id: 2, name: "Ridge Overlook".to_string(), sunny: false },
//! ];
//!
//! let text = to_string(&hikes).unwrap();
//! assert_eq!(text, "@(2):id,name,sunny\n1,Blue Lake Trail,T\n2,Ridge Overlook,F");
//!
//! let back: Vec<Hike> = from_str(&text).unwrap();
//! assert_eq!(hikes, back);
//! ```
//!
//! ### Working with dynamic values
//!
//! ```rust
//! use zon::{decode, encode, zon};
//!
//! let value = zon!({
//!     "big": 1000000,
//!     "x": 3.14,
//!     "zip": "00501"
//! });
//!
//! let text = encode(&value).unwrap();
//! assert_eq!(text, "big:1000000\nx:3.14\nzip:\"00501\"");
//! assert_eq!(decode(&text).unwrap(), value);
//! ```
//!
//! ## Guarantees
//!
//! For canonical values `v` and default options:
//!
//! - `decode(&encode(&v)?)? == v` (round trip)
//! - `encode(&decode(&encode(&v)?)?)? == encode(&v)?` byte-for-byte
//! - encoding is a pure function: equal values, identical text
//!
//! Decode errors carry a stable code ([`Error::code`]), the 1-based line,
//! and a best-effort column.
//!
//! ## Format
//!
//! The text format is documented in the [`spec`] module. Files use the
//! `.zonf` extension and the `text/zon; charset=utf-8` media type.

pub mod canon;
pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod spec;
pub mod value;

mod encode;
mod lex;
mod quote;
mod scalar;

pub use canon::ValueSerializer;
pub use de::ValueDeserializer;
pub use error::{Error, Result};
pub use map::ZonMap;
pub use options::{DecodeOptions, EncodeOptions};
pub use value::{Number, Value};

use serde::{de::DeserializeOwned, Serialize};
use std::io;

/// Encodes a [`Value`] to canonical ZON text with default options.
///
/// # Examples
///
/// ```rust
/// use zon::{encode, zon};
///
/// let text = encode(&zon!({ "flag": "T", "kind": "null" })).unwrap();
/// assert_eq!(text, "flag:\"T\"\nkind:\"null\"");
/// ```
///
/// # Errors
///
/// Returns an error for forbidden object keys; see [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<String> {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encodes a [`Value`] to ZON text with explicit options.
///
/// # Errors
///
/// Returns an error for forbidden object keys; see [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> Result<String> {
    encode::encode_value(value, options)
}

/// Decodes ZON text into a [`Value`] with default (strict) options.
///
/// # Examples
///
/// ```rust
/// use zon::{decode, zon};
///
/// let value = decode("a:null\nb:T").unwrap();
/// assert_eq!(value, zon!({ "a": null, "b": true }));
/// ```
///
/// # Errors
///
/// Returns an error with a stable code for syntax violations, strict-mode
/// count mismatches, and exceeded limits; see [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str) -> Result<Value> {
    decode_with_options(text, &DecodeOptions::default())
}

/// Decodes ZON text into a [`Value`] with explicit options.
///
/// # Errors
///
/// Returns an error with a stable code; see [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_options(text: &str, options: &DecodeOptions) -> Result<Value> {
    de::decode_str(text, options)
}

/// Decodes ZON bytes, checking UTF-8 validity first.
///
/// # Errors
///
/// Returns `DecodeBadUTF8` for invalid byte sequences, otherwise as
/// [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_slice(bytes: &[u8]) -> Result<Value> {
    decode_slice_with_options(bytes, &DecodeOptions::default())
}

/// Decodes ZON bytes with explicit options.
///
/// # Errors
///
/// Returns `DecodeBadUTF8` for invalid byte sequences, otherwise as
/// [`decode_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_slice_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::BadUtf8 {
        line: 1 + bytes[..e.valid_up_to()]
            .iter()
            .filter(|&&b| b == b'\n')
            .count(),
        msg: e.to_string(),
    })?;
    decode_with_options(text, options)
}

/// Serializes any `T: Serialize` to canonical ZON text.
///
/// The value is first canonicalized through [`to_value`] (NaN and the
/// infinities become null, integral floats become integers, bytes become
/// base64), then encoded.
///
/// # Errors
///
/// Returns an error for host values outside the data model (oversized
/// integers, non-string map keys) and for forbidden object keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncodeOptions::default())
}

/// Serializes any `T: Serialize` to ZON text with explicit options.
///
/// # Errors
///
/// As [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    encode_with_options(&value, options)
}

/// Serializes any `T: Serialize` to a writer in ZON format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &EncodeOptions::default())
}

/// Serializes any `T: Serialize` to a writer with explicit options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &EncodeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Canonicalizes any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use zon::{to_value, zon};
///
/// assert_eq!(to_value(&vec![1, 2]).unwrap(), zon!([1, 2]));
/// assert_eq!(to_value(&f64::NAN).unwrap(), zon!(null));
/// ```
///
/// # Errors
///
/// Returns an error for host values outside the data model.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    canon::to_value(value)
}

/// Deserializes a `T` from ZON text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use zon::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x:1\ny:2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid ZON or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = decode(s)?;
    T::deserialize(ValueDeserializer::new(value))
}

/// Deserializes a `T` from ZON bytes.
///
/// # Errors
///
/// Returns `DecodeBadUTF8` for invalid byte sequences, otherwise as
/// [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = decode_slice(bytes)?;
    T::deserialize(ValueDeserializer::new(value))
}

/// Deserializes a `T` from an I/O stream of ZON text.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid ZON, or the
/// data does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        assert_eq!(text, "x:1\ny:2");
        let back: Point = from_str(&text).unwrap();
        assert_eq!(point, back);
    }

    #[test]
    fn serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let text = to_string(&user).unwrap();
        let back: User = from_str(&text).unwrap();
        assert_eq!(user, back);
    }

    #[test]
    fn to_value_builds_objects() {
        let point = Point { x: 1, y: 2 };
        let value = to_value(&point).unwrap();

        match value {
            Value::Object(obj) => {
                assert_eq!(obj.get("x"), Some(&Value::from(1)));
                assert_eq!(obj.get("y"), Some(&Value::from(2)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn empty_document_is_null() {
        assert_eq!(decode("").unwrap(), Value::Null);
        assert_eq!(decode("\n\n").unwrap(), Value::Null);
    }

    #[test]
    fn writer_roundtrip() {
        let point = Point { x: 3, y: 4 };
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &point).unwrap();
        let back: Point = from_slice(&buffer).unwrap();
        assert_eq!(point, back);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = decode_slice(&[b'a', b':', 0xFF]).unwrap_err();
        assert_eq!(err.code(), "DecodeBadUTF8");
    }

    #[test]
    fn reader_surface() {
        let cursor = std::io::Cursor::new(b"x:1\ny:2".to_vec());
        let point: Point = from_reader(cursor).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }
}
