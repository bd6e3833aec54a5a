//! ZON decoding.
//!
//! The decoder consumes logical lines and rebuilds the value tree:
//!
//! - `key:value` lines populate the root object (dotted keys build nested
//!   objects)
//! - `key:@(N):cols` / root `@(N):cols` headers open tables whose rows
//!   follow as CSV lines
//! - quoted values whose content is a complete `{…}` / `[…]` payload decode
//!   through the single-line inline grammar
//!
//! Validation runs during the walk. Strict mode (the default) enforces the
//! declared row count (`E001`) and the per-row positional field count
//! (`E002`); non-strict mode repairs both (null padding, truncation,
//! `key:value`-shaped extras attach as sparse fields). Escape discipline,
//! forbidden keys, and the resource limits are enforced in both modes.
//!
//! The tail of this module is the serde bridge that lets a decoded
//! [`Value`] deserialize into any `T: Deserialize`.

use crate::error::{Error, Result};
use crate::lex::{self, Line, RawKey, RowField, TableHeader};
use crate::options::DecodeOptions;
use crate::quote::is_poison_key;
use crate::scalar::classify_bare;
use crate::value::{Number, Value};
use crate::ZonMap;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

pub(crate) fn decode_str(input: &str, options: &DecodeOptions) -> Result<Value> {
    lex::check_document(input, options)?;
    let normalized = lex::normalize_newlines(input);
    let lines = lex::split_lines(&normalized, options)?;
    Parser {
        options,
        lines,
        pos: 0,
    }
    .parse_document()
}

struct Parser<'a, 'o> {
    options: &'o DecodeOptions,
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn current(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn skip_blank(&mut self) {
        while matches!(self.current(), Some(line) if line.text.is_empty()) {
            self.pos += 1;
        }
    }

    fn parse_document(mut self) -> Result<Value> {
        self.skip_blank();
        let Some(first) = self.current() else {
            return Ok(Value::Null);
        };

        // A leading anonymous header makes the whole document a table array.
        if let Some(header) = lex::parse_header(first.text, first.number)? {
            if header.key.is_none() {
                let header_line = first.number;
                self.pos += 1;
                let rows = self.read_table(&header, header_line)?;
                self.skip_blank();
                if let Some(extra) = self.current() {
                    return Err(Error::bad_header(
                        extra.number,
                        "unexpected content after root table",
                    ));
                }
                return Ok(Value::Array(rows));
            }
        }

        // A single line with no top-level colon is a root scalar (or a
        // quoted inline payload).
        let shape = lex::scan_shape(first.text);
        if shape.first_colon.is_none() {
            let value = self.parse_value_text(first.text, first.number, 1, 1)?;
            self.pos += 1;
            self.skip_blank();
            if let Some(extra) = self.current() {
                return Err(Error::bad_header(
                    extra.number,
                    "unexpected content after root scalar",
                ));
            }
            return Ok(value);
        }

        self.parse_root_object()
    }

    fn parse_root_object(&mut self) -> Result<Value> {
        let mut root = ZonMap::new();
        while let Some(line) = self.current() {
            if line.text.is_empty() {
                self.pos += 1;
                continue;
            }
            if let Some(header) = lex::parse_header(line.text, line.number)? {
                let Some(key) = header.key.clone() else {
                    return Err(Error::bad_header(
                        line.number,
                        "anonymous table between object fields",
                    ));
                };
                let header_line = line.number;
                self.pos += 1;
                let rows = self.read_table(&header, header_line)?;
                self.insert_key(&mut root, &key, Value::Array(rows), header_line)?;
                continue;
            }
            let (key, value_text) = lex::split_key_value(line.text, line.number)?;
            let value_col = line.text.len() - value_text.len() + 1;
            let value = self.parse_value_text(value_text, line.number, value_col, 2)?;
            self.insert_key(&mut root, &key, value, line.number)?;
            self.pos += 1;
        }
        Ok(Value::Object(root))
    }

    /// Inserts a decoded value under a raw key, expanding unquoted dotted
    /// keys into nested objects.
    fn insert_key(
        &self,
        root: &mut ZonMap,
        key: &RawKey,
        value: Value,
        lineno: usize,
    ) -> Result<()> {
        if key.quoted || !key.text.contains('.') {
            self.check_key(&key.text, lineno)?;
            return self.insert_checked(root, key.text.clone(), value, lineno);
        }

        let components: Vec<&str> = key.text.split('.').collect();
        if components.iter().any(|c| c.is_empty()) {
            return Err(Error::bad_header(lineno, "empty dotted key segment"));
        }
        if components.len() + 1 > self.options.max_depth {
            return Err(Error::DepthExceeded {
                line: lineno,
                limit: self.options.max_depth,
            });
        }
        for component in &components {
            self.check_key(component, lineno)?;
        }

        let mut current = root;
        for component in &components[..components.len() - 1] {
            if !current.contains_key(component) {
                self.insert_checked(
                    current,
                    component.to_string(),
                    Value::Object(ZonMap::new()),
                    lineno,
                )?;
            }
            current = match current.get_mut(component) {
                Some(Value::Object(map)) => map,
                _ => {
                    return Err(Error::KeyCollision {
                        line: lineno,
                        key: component.to_string(),
                    })
                }
            };
        }
        let last = components[components.len() - 1];
        self.insert_checked(current, last.to_string(), value, lineno)
    }

    fn check_key(&self, key: &str, lineno: usize) -> Result<()> {
        if is_poison_key(key) {
            return Err(Error::PoisonKey {
                line: lineno,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Map insert with the duplicate-key and key-count rules applied.
    fn insert_checked(
        &self,
        map: &mut ZonMap,
        key: String,
        value: Value,
        lineno: usize,
    ) -> Result<()> {
        if map.contains_key(&key) {
            return Err(Error::KeyCollision { line: lineno, key });
        }
        if map.len() >= self.options.max_object_keys {
            return Err(Error::TooManyKeys {
                line: lineno,
                limit: self.options.max_object_keys,
            });
        }
        map.insert(key, value);
        Ok(())
    }

    /// Reads the data rows following a table header: the next `declared`
    /// lines belong to the table (cells may contain bare `:` and brackets,
    /// so rows are counted, not classified), stopping early at a blank
    /// line or end of input. Lines past the declared count that still read
    /// as rows are surplus rather than the next structure.
    fn read_table(&mut self, header: &TableHeader, header_line: usize) -> Result<Vec<Value>> {
        for (i, column) in header.columns.iter().enumerate() {
            self.check_key(column, header_line)?;
            if header.columns[..i].contains(column) {
                return Err(Error::bad_header(
                    header_line,
                    format!("duplicate column {:?}", column),
                ));
            }
        }
        if header.columns.len() > self.options.max_object_keys {
            return Err(Error::TooManyKeys {
                line: header_line,
                limit: self.options.max_object_keys,
            });
        }

        let mut row_lines = Vec::new();
        while row_lines.len() < header.declared {
            let Some(line) = self.current() else {
                break;
            };
            if line.text.is_empty() {
                break;
            }
            row_lines.push(line);
            self.pos += 1;
        }
        let mut surplus = Vec::new();
        while let Some(line) = self.current() {
            if line.text.is_empty() || !lex::is_row_like(line.text) {
                break;
            }
            surplus.push(line);
            self.pos += 1;
        }

        if self.options.strict && (row_lines.len() != header.declared || !surplus.is_empty()) {
            return Err(Error::RowCount {
                line: header_line,
                expected: header.declared,
                found: row_lines.len() + surplus.len(),
            });
        }
        row_lines.extend(surplus);
        if row_lines.len() > self.options.max_array_len {
            return Err(Error::ArrayTooLong {
                line: header_line,
                limit: self.options.max_array_len,
            });
        }

        let mut rows = Vec::with_capacity(row_lines.len());
        for line in row_lines {
            rows.push(self.parse_row(line, &header.columns)?);
        }
        Ok(rows)
    }

    fn parse_row(&self, line: Line<'a>, columns: &[String]) -> Result<Value> {
        let fields = lex::split_row(line.text, line.number)?;
        let positional = columns.len();

        if self.options.strict && fields.len() < positional {
            return Err(Error::FieldCount {
                line: line.number,
                expected: positional,
                found: fields.len(),
            });
        }

        let mut row = ZonMap::new();
        for (i, column) in columns.iter().enumerate() {
            let value = match fields.get(i) {
                Some(field) => self.cell_value(field, line.number)?,
                // Non-strict short rows pad with null.
                None => Value::Null,
            };
            row.insert(column.clone(), value);
        }

        // Extras past the positional cells: sparse fields when they carry
        // key:value shape, otherwise a strict error / non-strict drop.
        for field in &fields[positional.min(fields.len())..] {
            match self.sparse_field(field, line.number)? {
                Some((key, value)) => {
                    self.check_key(&key, line.number)?;
                    self.insert_checked(&mut row, key, value, line.number)?;
                }
                None if self.options.strict => {
                    return Err(Error::FieldCount {
                        line: line.number,
                        expected: positional,
                        found: fields.len(),
                    });
                }
                None => {}
            }
        }
        Ok(Value::Object(row))
    }

    /// Splits a sparse extra of the form `key:value`. Quoted fields and
    /// fields without a colon do not qualify.
    fn sparse_field(&self, field: &RowField, lineno: usize) -> Result<Option<(String, Value)>> {
        if field.quoted {
            return Ok(None);
        }
        let Some((key, value_text)) = field.text.split_once(':') else {
            return Ok(None);
        };
        if key.is_empty() {
            return Ok(None);
        }
        let value = self.parse_value_text(value_text, lineno, field.column, 4)?;
        Ok(Some((key.to_string(), value)))
    }

    /// Decodes one table cell: quoted cells are strings (or inline payloads
    /// when their content is a complete compound), bare cells classify
    /// through the scalar rules.
    fn cell_value(&self, field: &RowField, lineno: usize) -> Result<Value> {
        if !field.quoted {
            return classify_bare(&field.text, lineno);
        }
        if field.text.starts_with(['{', '[']) {
            match self.parse_inline_payload(&field.text, lineno, field.column, 4) {
                Ok(value) => return Ok(value),
                Err(err) if fatal_in_payload(&err) => return Err(err),
                // Not a well-formed payload after all: it's a string.
                Err(_) => {}
            }
        }
        lex::unescape_cell(&field.text, lineno, field.column).map(Value::String)
    }

    /// Decodes the value half of a `key:value` line (verbatim text after
    /// the colon). `col` is the value's 1-based column, `depth` the nesting
    /// already above this site.
    fn parse_value_text(
        &self,
        text: &str,
        lineno: usize,
        col: usize,
        depth: usize,
    ) -> Result<Value> {
        if text.is_empty() {
            return Ok(Value::String(String::new()));
        }
        if text.starts_with('"') {
            let (content, end) = lex::scan_quoted(text, lineno, col)?;
            if end != text.len() {
                return Err(Error::bad_cell(
                    lineno,
                    col + end,
                    "unexpected characters after closing quote",
                ));
            }
            if content.starts_with(['{', '[']) {
                match self.parse_inline_payload(&content, lineno, col, depth) {
                    Ok(value) => return Ok(value),
                    Err(err) if fatal_in_payload(&err) => return Err(err),
                    Err(_) => {}
                }
            }
            return Ok(Value::String(content));
        }
        classify_bare(text, lineno)
    }

    /// Parses a complete inline compound payload (`{…}` / `[…]`). Errors
    /// when anything trails the closing bracket.
    fn parse_inline_payload(
        &self,
        payload: &str,
        lineno: usize,
        col: usize,
        depth: usize,
    ) -> Result<Value> {
        let mut parser = InlineParser {
            options: self.options,
            payload,
            i: 0,
            lineno,
            col,
        };
        let value = parser.parse_value(depth)?;
        if parser.i != payload.len() {
            return Err(Error::bad_cell(
                lineno,
                col + parser.i,
                "trailing characters in inline payload",
            ));
        }
        Ok(value)
    }
}

/// Errors that must not be swallowed by the payload-or-string fallback.
fn fatal_in_payload(err: &Error) -> bool {
    matches!(
        err,
        Error::DepthExceeded { .. }
            | Error::ArrayTooLong { .. }
            | Error::TooManyKeys { .. }
            | Error::PoisonKey { .. }
    )
}

/// Recursive-descent parser for the single-line inline grammar.
struct InlineParser<'a, 'o> {
    options: &'o DecodeOptions,
    payload: &'a str,
    i: usize,
    lineno: usize,
    col: usize,
}

impl<'a, 'o> InlineParser<'a, 'o> {
    fn peek(&self) -> Option<char> {
        self.payload[self.i..].chars().next()
    }

    fn err(&self, msg: &str) -> Error {
        Error::bad_cell(self.lineno, self.col + self.i, msg)
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > self.options.max_depth {
            return Err(Error::DepthExceeded {
                line: self.lineno,
                limit: self.options.max_depth,
            });
        }
        match self.peek() {
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some('"') => {
                let (content, end) = lex::scan_quoted(
                    &self.payload[self.i..],
                    self.lineno,
                    self.col + self.i,
                )?;
                self.i += end;
                // Quoted scalars inside a payload are always strings.
                Ok(Value::String(content))
            }
            _ => {
                let token = self.take_bare();
                classify_bare(token, self.lineno)
            }
        }
    }

    /// A bare scalar runs to the next `,`, `}`, or `]` at this level.
    fn take_bare(&mut self) -> &'a str {
        let start = self.i;
        while let Some(ch) = self.peek() {
            if matches!(ch, ',' | '}' | ']') {
                break;
            }
            self.i += ch.len_utf8();
        }
        &self.payload[start..self.i]
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value> {
        self.i += 1; // '{'
        let mut map = ZonMap::new();
        if self.peek() == Some('}') {
            self.i += 1;
            return Ok(Value::Object(map));
        }
        loop {
            let key = self.parse_key()?;
            if is_poison_key(&key) {
                return Err(Error::PoisonKey {
                    line: self.lineno,
                    key,
                });
            }
            if self.peek() != Some(':') {
                return Err(self.err("expected ':' after inline key"));
            }
            self.i += 1;
            let value = self.parse_value(depth + 1)?;
            if map.contains_key(&key) {
                return Err(Error::KeyCollision {
                    line: self.lineno,
                    key,
                });
            }
            if map.len() >= self.options.max_object_keys {
                return Err(Error::TooManyKeys {
                    line: self.lineno,
                    limit: self.options.max_object_keys,
                });
            }
            map.insert(key, value);
            match self.peek() {
                Some(',') => self.i += 1,
                Some('}') => {
                    self.i += 1;
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.err("expected ',' or '}' in inline object")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        if self.peek() == Some('"') {
            let (key, end) =
                lex::scan_quoted(&self.payload[self.i..], self.lineno, self.col + self.i)?;
            self.i += end;
            return Ok(key);
        }
        let start = self.i;
        while let Some(ch) = self.peek() {
            if matches!(ch, ':' | ',' | '}' | ']') {
                break;
            }
            self.i += ch.len_utf8();
        }
        if self.peek() != Some(':') {
            return Err(self.err("expected ':' after inline key"));
        }
        Ok(self.payload[start..self.i].to_string())
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        self.i += 1; // '['
        let mut items = Vec::new();
        if self.peek() == Some(']') {
            self.i += 1;
            return Ok(Value::Array(items));
        }
        loop {
            let value = self.parse_value(depth + 1)?;
            if items.len() >= self.options.max_array_len {
                return Err(Error::ArrayTooLong {
                    line: self.lineno,
                    limit: self.options.max_array_len,
                });
            }
            items.push(value);
            match self.peek() {
                Some(',') => self.i += 1,
                Some(']') => {
                    self.i += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(self.err("expected ',' or ']' in inline array")),
            }
        }
    }
}

// --- serde bridge -----------------------------------------------------------

/// Deserializer over a decoded [`Value`], used by [`from_str`](crate::from_str)
/// and friends.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ZonMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::Message(
                "next_value_seed called before next_key_seed".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::Message("expected unit variant".to_string())),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::Message("expected newtype variant".to_string())),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer {
                iter: arr.into_iter(),
            }),
            _ => Err(Error::Message("expected tuple variant".to_string())),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::Message("expected struct variant".to_string())),
        }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Int(i)) => visitor.visit_i64(i),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer {
                iter: arr.into_iter(),
            }),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) => {
                if obj.len() == 1 {
                    let (variant, value) = obj.into_iter().next().expect("len checked");
                    visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    })
                } else {
                    Err(Error::Message("expected single-key enum object".to_string()))
                }
            }
            _ => Err(Error::Message("expected enum".to_string())),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
