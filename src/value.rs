//! Dynamic value representation for ZON data.
//!
//! This module provides the [`Value`] enum, the in-memory tree the codec
//! encodes from and decodes into. It mirrors the JSON data model: null,
//! booleans, numbers, strings, arrays, and insertion-ordered objects.
//!
//! ## Core Types
//!
//! - [`Value`]: any ZON value
//! - [`Number`]: an `i64` integer or a finite `f64`
//!
//! Host types outside the model canonicalize into it rather than extending
//! it: dates become ISO-8601 strings, byte strings become base64 strings,
//! big integers either fit `i64` or fail with an overflow error.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use zon::{Value, Number};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! assert!(null.is_null());
//! assert_eq!(number.as_i64(), Some(42));
//! assert_eq!(text.as_str(), Some("hello"));
//! ```
//!
//! Building values with the [`zon!`](crate::zon) macro:
//!
//! ```rust
//! use zon::zon;
//!
//! let obj = zon!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//! ```

use crate::ZonMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed representation of any ZON value.
///
/// # Examples
///
/// ```rust
/// use zon::{Value, Number};
///
/// let num = Value::Number(Number::Int(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(ZonMap),
}

/// A numeric value: a signed 64-bit integer or a finite `f64`.
///
/// Construct floats through [`Number::from_f64`]: it rejects NaN and the
/// infinities (callers map those to `Value::Null`) and folds mathematically
/// integral values into `Int`, which is what makes integral floats and
/// integers indistinguishable in canonical text.
///
/// # Examples
///
/// ```rust
/// use zon::Number;
///
/// assert_eq!(Number::from_f64(5.0), Some(Number::Int(5)));
/// assert_eq!(Number::from_f64(3.14), Some(Number::Float(3.14)));
/// assert_eq!(Number::from_f64(f64::NAN), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Canonical float constructor. Returns `None` for NaN and infinities;
    /// folds integral values that fit `i64` into `Int`.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Number> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Number::Int(0));
        }
        // i64::MAX as f64 rounds up to 2^63, which is out of range, so the
        // comparison must be strict on that side.
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            return Some(Number::Int(value as i64));
        }
        Some(Number::Float(value))
    }

    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it is one.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    /// Converts this number to an `f64`. Always succeeds.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

/// Canonical text form: integers in plain decimal, floats as the shortest
/// decimal that round-trips, never in scientific notation, `-0` as `0`.
///
/// `f64`'s `Display` already produces shortest-round-trip decimal without an
/// exponent, so only the negative-zero case needs handling here.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => {
                if *x == 0.0 {
                    write!(f, "0")
                } else {
                    write!(f, "{}", x)
                }
            }
        }
    }
}

impl From<i8> for Number {
    fn from(value: i8) -> Self {
        Number::Int(value as i64)
    }
}

impl From<i16> for Number {
    fn from(value: i16) -> Self {
        Number::Int(value as i64)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<u8> for Number {
    fn from(value: u8) -> Self {
        Number::Int(value as i64)
    }
}

impl From<u16> for Number {
    fn from(value: u16) -> Self {
        Number::Int(value as i64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Int(value as i64)
    }
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is a scalar (not an array or object).
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as `f64`. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ZonMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Canonicalizes a byte string into a base64 `String` value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zon::Value;
    ///
    /// assert_eq!(Value::from_bytes(b"hi"), Value::from("aGk="));
    /// ```
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Value {
        Value::String(BASE64.encode(bytes))
    }

    /// Canonicalizes an arbitrary-precision decimal spelling.
    ///
    /// Produces a number when the spelling survives a round trip through
    /// binary64 without loss, otherwise keeps the spelling as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zon::{Number, Value};
    ///
    /// assert_eq!(Value::from_decimal_str("3.14"), Value::Number(Number::Float(3.14)));
    /// assert_eq!(
    ///     Value::from_decimal_str("0.1000000000000000000000000001"),
    ///     Value::from("0.1000000000000000000000000001")
    /// );
    /// ```
    #[must_use]
    pub fn from_decimal_str(spelling: &str) -> Value {
        let as_string = || Value::String(spelling.to_string());
        let Ok(parsed) = spelling.parse::<f64>() else {
            return as_string();
        };
        let Some(number) = Number::from_f64(parsed) else {
            return as_string();
        };
        match normalize_decimal(spelling) {
            Some(normalized) if normalized == number.to_string() => Value::Number(number),
            _ => as_string(),
        }
    }
}

/// Reduces a plain decimal spelling to canonical form: sign only when
/// negative, no leading zeros, no trailing fraction zeros, no dangling dot.
/// Returns `None` for spellings outside the plain-decimal shape (exponents,
/// hex, leading `+`).
fn normalize_decimal(spelling: &str) -> Option<String> {
    let (negative, digits) = match spelling.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, spelling),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let int_trimmed = int_part.trim_start_matches('0');
    let int_canonical = if int_trimmed.is_empty() { "0" } else { int_trimmed };
    let frac_trimmed = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative && (int_canonical != "0" || !frac_trimmed.is_empty()) {
        out.push('-');
    }
    out.push_str(int_canonical);
    if !frac_trimmed.is_empty() {
        out.push('.');
        out.push_str(frac_trimmed);
    }
    Some(out)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid ZON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Int(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(|i| Value::Number(Number::Int(i)))
                    .map_err(|_| E::custom(format!("integer {} exceeds i64", value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                // Non-finite input canonicalizes to null.
                Ok(Number::from_f64(value).map_or(Value::Null, Value::Number))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ZonMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(Number::Int(i)) => Ok(i),
            _ => Err(crate::Error::Message(format!(
                "expected integer, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::Message(format!(
                "expected number, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::Message(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::Message(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

/// Big integers fit the model only when they fit `i64`.
impl TryFrom<&BigInt> for Value {
    type Error = crate::Error;

    fn try_from(value: &BigInt) -> crate::Result<Self> {
        i64::try_from(value)
            .map(|i| Value::Number(Number::Int(i)))
            .map_err(|_| crate::Error::Overflow(value.to_string()))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Int(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

/// Non-finite input canonicalizes to `Null`, integral input to `Int`.
impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::from(value as f64)
    }
}

/// Non-finite input canonicalizes to `Null`, integral input to `Int`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ZonMap> for Value {
    fn from(value: ZonMap) -> Self {
        Value::Object(value)
    }
}

/// Date/time host values canonicalize to ISO-8601 strings.
impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::String(value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::String(value.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::String(value.format("%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_f64_canonicalizes() {
        assert_eq!(Number::from_f64(0.0), Some(Number::Int(0)));
        assert_eq!(Number::from_f64(-0.0), Some(Number::Int(0)));
        assert_eq!(Number::from_f64(5.0), Some(Number::Int(5)));
        assert_eq!(Number::from_f64(-7.0), Some(Number::Int(-7)));
        assert_eq!(Number::from_f64(3.14), Some(Number::Float(3.14)));
        assert_eq!(Number::from_f64(f64::NAN), None);
        assert_eq!(Number::from_f64(f64::INFINITY), None);
        assert_eq!(Number::from_f64(f64::NEG_INFINITY), None);
        // Too large for i64 stays a float.
        assert_eq!(Number::from_f64(1e300), Some(Number::Float(1e300)));
    }

    #[test]
    fn number_display_is_canonical() {
        assert_eq!(Number::Int(1000000).to_string(), "1000000");
        assert_eq!(Number::Int(-42).to_string(), "-42");
        assert_eq!(Number::Float(3.14).to_string(), "3.14");
        assert_eq!(Number::Float(-0.0).to_string(), "0");
        // Display of f64 never emits an exponent.
        assert_eq!(Number::Float(1e21).to_string(), "1000000000000000000000");
        assert_eq!(Number::Float(1e-7).to_string(), "0.0000001");
    }

    #[test]
    fn nonfinite_floats_become_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(f64::INFINITY), Value::Null);
        assert_eq!(Value::from(f64::NEG_INFINITY), Value::Null);
        assert_eq!(Value::from(0.0_f64), Value::Number(Number::Int(0)));
    }

    #[test]
    fn bytes_become_base64() {
        assert_eq!(Value::from_bytes(b""), Value::from(""));
        assert_eq!(Value::from_bytes(b"hello"), Value::from("aGVsbG8="));
    }

    #[test]
    fn bigint_conversion_checks_range() {
        let small = BigInt::from(123456789_i64);
        assert_eq!(
            Value::try_from(&small).unwrap(),
            Value::Number(Number::Int(123456789))
        );

        let huge: BigInt = BigInt::from(i64::MAX) * 2;
        let err = Value::try_from(&huge).unwrap_err();
        assert_eq!(err.code(), "EncodeOverflow");
    }

    #[test]
    fn datetimes_become_iso_strings() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(Value::from(dt), Value::from("2024-01-15T10:30:00Z"));

        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(Value::from(date), Value::from("2024-01-15"));
    }

    #[test]
    fn decimal_spellings() {
        assert_eq!(
            Value::from_decimal_str("3.140"),
            Value::Number(Number::Float(3.14))
        );
        assert_eq!(Value::from_decimal_str("5.0"), Value::Number(Number::Int(5)));
        assert_eq!(Value::from_decimal_str("-0.5"), Value::Number(Number::Float(-0.5)));
        // More precision than binary64 can hold: keep the spelling.
        assert_eq!(
            Value::from_decimal_str("1.00000000000000000001"),
            Value::from("1.00000000000000000001")
        );
        assert_eq!(Value::from_decimal_str("not a number"), Value::from("not a number"));
    }

    #[test]
    fn normalize_decimal_strips_redundant_zeros() {
        assert_eq!(normalize_decimal("007"), Some("7".to_string()));
        assert_eq!(normalize_decimal("3.1400"), Some("3.14".to_string()));
        assert_eq!(normalize_decimal("-0.0"), Some("0".to_string()));
        assert_eq!(normalize_decimal("1e5"), None);
    }
}
