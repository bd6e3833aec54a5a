//! ZON encoding: layout planning and text emission.
//!
//! The encoder is a pure function of the canonical value tree. For each node
//! it picks one of four layouts:
//!
//! - **Block scalar**: `key:value`
//! - **Block table**: `key:@(N):col1,col2` followed by N CSV rows, chosen
//!   for arrays of objects sharing one key set
//! - **Inline compound**: `key:"{…}"` / `key:"[…]"` for everything else
//!   that nests
//! - **Dot-flattened keys**: `parent.child:value` lines for shallow
//!   scalar-leaved objects, taken only when the flat rendering is shorter
//!   than the inline one
//!
//! Output is LF-separated UTF-8 with no trailing whitespace. Keys emit in
//! ascending code-point order; at the root, block tables emit after all
//! other fields so tabular data stays visually grouped.

use crate::error::{Error, Result};
use crate::options::EncodeOptions;
use crate::quote::{
    is_poison_key, needs_quoting, push_csv_cell, push_csv_payload, push_quoted,
    push_string_scalar,
};
use crate::value::Value;
use crate::ZonMap;

pub(crate) fn encode_value(value: &Value, options: &EncodeOptions) -> Result<String> {
    check_poison_tree(value)?;
    let mut out = String::with_capacity(256);
    match value {
        // An empty root object still needs a line of text, or the document
        // would decode as null.
        Value::Object(map) if map.is_empty() => push_quoted(&mut out, "{}"),
        Value::Object(map) => encode_root_object(map, options, &mut out)?,
        Value::Array(arr) => match table_columns(arr) {
            Some(columns) => encode_table(None, arr, &columns, options, &mut out)?,
            None => {
                let payload = inline_value(value, options)?;
                push_quoted(&mut out, &payload);
            }
        },
        // At the root a bare colon would read as a key separator, so the
        // ISO exemption does not apply here.
        Value::String(s) if s.contains(':') => push_quoted(&mut out, s),
        scalar => push_scalar(scalar, &mut out),
    }
    if options.ensure_trailing_newline && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Forbidden keys are rejected before any text is produced.
fn check_poison_tree(value: &Value) -> Result<()> {
    match value {
        Value::Array(arr) => arr.iter().try_for_each(check_poison_tree),
        Value::Object(map) => {
            for (key, child) in map.iter() {
                if is_poison_key(key) {
                    return Err(Error::PoisonKey {
                        line: 0,
                        key: key.to_string(),
                    });
                }
                check_poison_tree(child)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Emission order for an object's keys under the active options.
fn ordered_keys<'m>(map: &'m ZonMap, options: &EncodeOptions) -> Vec<&'m str> {
    if options.sort_keys {
        map.sorted_keys()
    } else {
        map.keys().collect()
    }
}

fn encode_root_object(map: &ZonMap, options: &EncodeOptions, out: &mut String) -> Result<()> {
    // Tables emit last; everything else keeps the sorted order.
    let mut tables = Vec::new();
    let mut first = true;
    for key in ordered_keys(map, options) {
        let value = map.get(key).expect("key taken from this map");
        if let Value::Array(arr) = value {
            if let Some(columns) = table_columns(arr) {
                tables.push((key, arr, columns));
                continue;
            }
        }
        let rendered = render_field(key, value, options)?;
        push_block(out, &mut first, &rendered);
    }
    for (key, arr, columns) in tables {
        let mut block = String::new();
        encode_table(Some(key), arr, &columns, options, &mut block)?;
        push_block(out, &mut first, &block);
    }
    Ok(())
}

fn push_block(out: &mut String, first: &mut bool, text: &str) {
    if !*first {
        out.push('\n');
    }
    *first = false;
    out.push_str(text);
}

/// Renders one non-table field, choosing between scalar, inline compound,
/// and dot-flattened layouts.
fn render_field(key: &str, value: &Value, options: &EncodeOptions) -> Result<String> {
    match value {
        Value::Array(_) | Value::Object(_) => {
            let mut inline = String::new();
            push_block_key(&mut inline, key);
            inline.push(':');
            let payload = inline_value(value, options)?;
            push_quoted(&mut inline, &payload);

            if let Value::Object(obj) = value {
                if options.dot_flatten && flatten_eligible(key, obj) {
                    let dotted = render_dotted(key, obj, options);
                    if dotted.len() < inline.len() {
                        return Ok(dotted);
                    }
                }
            }
            Ok(inline)
        }
        scalar => {
            let mut line = String::new();
            push_block_key(&mut line, key);
            line.push(':');
            push_scalar(scalar, &mut line);
            Ok(line)
        }
    }
}

/// Scalar rendition at a `key:value` site.
fn push_scalar(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push('T'),
        Value::Bool(false) => out.push('F'),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => push_string_scalar(out, s),
        Value::Array(_) | Value::Object(_) => unreachable!("compounds render inline"),
    }
}

/// Block-level keys additionally quote on `.` (the decoder path-splits
/// dotted bare keys), on a leading `@` (header lookalike), and on `:`
/// (which the ISO exemption would otherwise leave bare).
fn push_block_key(out: &mut String, key: &str) {
    if needs_quoting(key) || key.contains([':', '.']) || key.starts_with('@') {
        push_quoted(out, key);
    } else {
        out.push_str(key);
    }
}

fn inline_key_needs_quoting(key: &str) -> bool {
    needs_quoting(key) || key.contains(':')
}

/// A bare dotted-path component: anything that would need quotes, or carry
/// a dot of its own, cannot appear in a flattened key.
fn valid_path_component(key: &str) -> bool {
    !(needs_quoting(key) || key.contains([':', '.']) || key.starts_with('@'))
}

/// Dot-flattening applies to objects whose leaves are all scalars, at most
/// two levels down, with every key a valid bare path component.
fn flatten_eligible(key: &str, obj: &ZonMap) -> bool {
    valid_path_component(key) && !obj.is_empty() && flatten_depth(obj, 1)
}

fn flatten_depth(obj: &ZonMap, level: usize) -> bool {
    for (key, value) in obj.iter() {
        if !valid_path_component(key) {
            return false;
        }
        match value {
            Value::Object(child) => {
                if level >= 2 || child.is_empty() || !flatten_depth(child, level + 1) {
                    return false;
                }
            }
            Value::Array(_) => return false,
            _ => {}
        }
    }
    true
}

fn render_dotted(key: &str, obj: &ZonMap, options: &EncodeOptions) -> String {
    let mut lines = Vec::new();
    collect_dotted(key, obj, options, &mut lines);
    lines.join("\n")
}

fn collect_dotted(prefix: &str, obj: &ZonMap, options: &EncodeOptions, lines: &mut Vec<String>) {
    for key in ordered_keys(obj, options) {
        let path = format!("{}.{}", prefix, key);
        match obj.get(key).expect("key taken from this map") {
            Value::Object(child) => collect_dotted(&path, child, options, lines),
            scalar => {
                let mut line = path;
                line.push(':');
                push_scalar(scalar, &mut line);
                lines.push(line);
            }
        }
    }
}

/// The table predicate: non-empty array, every element an object, all
/// sharing one non-empty key set. Returns the sorted column list.
pub(crate) fn table_columns(arr: &[Value]) -> Option<Vec<String>> {
    let first = match arr.first() {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => return None,
    };
    let columns = first.sorted_keys();
    for element in &arr[1..] {
        let Value::Object(map) = element else {
            return None;
        };
        if map.len() != columns.len() || !columns.iter().all(|c| map.contains_key(c)) {
            return None;
        }
    }
    Some(columns.into_iter().map(str::to_string).collect())
}

fn encode_table(
    key: Option<&str>,
    arr: &[Value],
    columns: &[String],
    options: &EncodeOptions,
    out: &mut String,
) -> Result<()> {
    if let Some(key) = key {
        push_block_key(out, key);
        out.push(':');
    }
    out.push_str("@(");
    out.push_str(&arr.len().to_string());
    out.push_str("):");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_csv_cell(out, column);
    }
    for element in arr {
        out.push('\n');
        let Value::Object(map) = element else {
            unreachable!("table predicate checked all elements");
        };
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let cell = map.get(column).expect("uniform key set");
            push_cell(cell, options, out)?;
        }
    }
    Ok(())
}

/// Cell rendition inside a table row: CSV quoting for strings, inline
/// payloads for nested compounds.
fn push_cell(value: &Value, options: &EncodeOptions, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push('T'),
        Value::Bool(false) => out.push('F'),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => push_csv_cell(out, s),
        Value::Array(_) | Value::Object(_) => {
            let payload = inline_value(value, options)?;
            push_csv_payload(out, &payload);
        }
    }
    Ok(())
}

/// Builds the single-line payload of an inline compound, without the outer
/// quote envelope. The caller wraps it with [`push_quoted`] (block sites)
/// or [`push_csv_payload`] (cells).
pub(crate) fn inline_value(value: &Value, options: &EncodeOptions) -> Result<String> {
    let mut out = String::new();
    push_inline(value, options, &mut out)?;
    Ok(out)
}

fn push_inline(value: &Value, options: &EncodeOptions, out: &mut String) -> Result<()> {
    match value {
        Value::Array(arr) => {
            out.push('[');
            for (i, element) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_inline(element, options, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, key) in ordered_keys(map, options).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if inline_key_needs_quoting(key) {
                    push_quoted(out, key);
                } else {
                    out.push_str(key);
                }
                out.push(':');
                push_inline(map.get(key).expect("key taken from this map"), options, out)?;
            }
            out.push('}');
        }
        scalar => push_scalar(scalar, out),
    }
    Ok(())
}
