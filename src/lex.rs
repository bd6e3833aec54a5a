//! Line and field tokenization for the decoder.
//!
//! The decoder consumes a document as a sequence of physical lines; quoted
//! scalars never contain literal newlines (the `\n` escape is the only way
//! to carry one), so physical lines are the logical lines. This module owns
//! the lexical plumbing below the grammar:
//!
//! - document checks (size limit, BOM), CRLF normalization, line splitting
//! - quoted-scalar scanning with the backslash escape set
//! - table-row splitting with RFC-4180 quote doubling
//! - `key:value` splitting and table-header recognition
//!
//! Everything here is position-aware: errors carry the 1-based line and a
//! best-effort byte column.

use crate::error::{Error, Result};
use crate::options::DecodeOptions;
use std::borrow::Cow;

/// A physical (= logical) line with its 1-based number.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Document-level checks that run before any parsing: byte limit, BOM.
pub(crate) fn check_document(input: &str, options: &DecodeOptions) -> Result<()> {
    if input.len() > options.max_document_bytes {
        return Err(Error::DocumentTooLarge {
            limit: options.max_document_bytes,
            found: input.len(),
        });
    }
    if input.starts_with('\u{FEFF}') {
        return Err(Error::BadUtf8 {
            line: 1,
            msg: "byte order mark is not permitted".to_string(),
        });
    }
    Ok(())
}

/// CRLF → LF. Borrows when the input has no carriage returns.
pub(crate) fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Splits into numbered lines, enforcing the per-line byte limit.
pub(crate) fn split_lines<'a>(input: &'a str, options: &DecodeOptions) -> Result<Vec<Line<'a>>> {
    let mut lines = Vec::new();
    for (index, text) in input.split('\n').enumerate() {
        let number = index + 1;
        if text.len() > options.max_line_bytes {
            return Err(Error::LineTooLong {
                line: number,
                limit: options.max_line_bytes,
            });
        }
        lines.push(Line { number, text });
    }
    Ok(lines)
}

/// Scans a quoted scalar starting at `text[0] == '"'`, applying the
/// backslash escape set. Returns the unescaped content and the byte offset
/// just past the closing quote. `col` is the 1-based column of the opening
/// quote within the line, used for error positions.
pub(crate) fn scan_quoted(text: &str, line: usize, col: usize) -> Result<(String, usize)> {
    debug_assert!(text.starts_with('"'));
    let mut out = String::new();
    let mut chars = text.char_indices();
    chars.next();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, i + 1)),
            '\\' => match chars.next() {
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((j, other)) => {
                    return Err(Error::BadEscape {
                        line,
                        column: col + j,
                        escape: other,
                    })
                }
                None => {
                    return Err(Error::UnterminatedString {
                        line,
                        column: col + i,
                    })
                }
            },
            other => out.push(other),
        }
    }
    Err(Error::UnterminatedString { line, column: col })
}

/// One field of a table row: raw text with CSV quote-doubling already
/// resolved but backslash escapes still intact.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowField {
    pub text: String,
    pub quoted: bool,
    pub column: usize,
}

/// Splits a data row into fields. Quoted fields follow RFC 4180: the field
/// runs to the matching quote, `""` stands for one `"`, and the closing
/// quote must be followed by `,` or end of line.
pub(crate) fn split_row(line: &str, lineno: usize) -> Result<Vec<RowField>> {
    let mut fields = Vec::new();
    let mut i = 0;
    loop {
        let field_col = i + 1;
        let rest = &line[i..];
        if rest.starts_with('"') {
            let mut out = String::new();
            let mut j = i + 1;
            loop {
                let Some(c) = line[j..].chars().next() else {
                    return Err(Error::UnterminatedString {
                        line: lineno,
                        column: field_col,
                    });
                };
                if c == '"' {
                    if line[j + 1..].starts_with('"') {
                        out.push('"');
                        j += 2;
                    } else {
                        j += 1;
                        break;
                    }
                } else {
                    out.push(c);
                    j += c.len_utf8();
                }
            }
            fields.push(RowField {
                text: out,
                quoted: true,
                column: field_col,
            });
            match line[j..].chars().next() {
                None => break,
                Some(',') => i = j + 1,
                Some(_) => {
                    return Err(Error::bad_cell(
                        lineno,
                        j + 1,
                        "expected ',' or end of line after closing quote",
                    ))
                }
            }
        } else {
            match rest.find(',') {
                Some(offset) => {
                    fields.push(RowField {
                        text: rest[..offset].to_string(),
                        quoted: false,
                        column: field_col,
                    });
                    i += offset + 1;
                }
                None => {
                    fields.push(RowField {
                        text: rest.to_string(),
                        quoted: false,
                        column: field_col,
                    });
                    break;
                }
            }
        }
    }
    Ok(fields)
}

/// Applies the backslash escape set to a quoted cell's raw text (after CSV
/// quote-doubling was resolved by [`split_row`]).
pub(crate) fn unescape_cell(raw: &str, lineno: usize, col: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                return Err(Error::BadEscape {
                    line: lineno,
                    column: col,
                    escape: other,
                })
            }
            None => return Err(Error::bad_cell(lineno, col, "dangling backslash")),
        }
    }
    Ok(out)
}

/// Positions of the first top-level `:` and `,`, ignoring quoted spans.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LineShape {
    pub first_colon: Option<usize>,
    pub first_comma: Option<usize>,
}

pub(crate) fn scan_shape(line: &str) -> LineShape {
    let mut shape = LineShape::default();
    let mut in_quotes = false;
    let mut iter = line.char_indices().peekable();
    while let Some((i, ch)) = iter.next() {
        if in_quotes {
            match ch {
                '\\' => {
                    iter.next();
                }
                '"' => {
                    // CSV doubling keeps the span open.
                    if matches!(iter.peek(), Some((_, '"'))) {
                        iter.next();
                    } else {
                        in_quotes = false;
                    }
                }
                _ => {}
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ':' if shape.first_colon.is_none() => shape.first_colon = Some(i),
                ',' if shape.first_comma.is_none() => shape.first_comma = Some(i),
                _ => {}
            }
            if shape.first_colon.is_some() && shape.first_comma.is_some() {
                break;
            }
        }
    }
    shape
}

/// Heuristic for lines past a table's declared row count: a line still
/// reads as a row when its first top-level comma precedes any top-level
/// colon, or it has no top-level colon at all. Sparse rows put their
/// `key:value` extras after the positional cells, so they classify as
/// rows too. Rows within the declared count are never classified, only
/// counted, so a bare colon in a leading cell is fine there.
pub(crate) fn is_row_like(line: &str) -> bool {
    let shape = scan_shape(line);
    match (shape.first_colon, shape.first_comma) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(colon), Some(comma)) => comma < colon,
    }
}

/// The key half of a `key:value` line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawKey {
    pub text: String,
    pub quoted: bool,
}

/// Splits a `key:value` line at the first unescaped `:` outside quotes.
/// The value is returned verbatim (possibly empty).
pub(crate) fn split_key_value<'a>(line: &'a str, lineno: usize) -> Result<(RawKey, &'a str)> {
    if line.starts_with('"') {
        let (key, end) = scan_quoted(line, lineno, 1)?;
        let rest = &line[end..];
        let Some(value) = rest.strip_prefix(':') else {
            return Err(Error::bad_header(lineno, "expected ':' after quoted key"));
        };
        return Ok((
            RawKey {
                text: key,
                quoted: true,
            },
            value,
        ));
    }
    match line.find(':') {
        Some(i) => Ok((
            RawKey {
                text: line[..i].to_string(),
                quoted: false,
            },
            &line[i + 1..],
        )),
        None => Err(Error::bad_header(lineno, "expected ':' in key-value line")),
    }
}

/// A recognized table header.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableHeader {
    /// `None` for a root (anonymous) table.
    pub key: Option<RawKey>,
    pub declared: usize,
    pub columns: Vec<String>,
}

/// Recognizes the header forms. Canonical: `key:@(N):cols` and root
/// `@(N):cols`. The legacy `@key(N):cols` spelling is accepted on decode
/// only. Returns `Ok(None)` when the line is not a header at all.
pub(crate) fn parse_header(line: &str, lineno: usize) -> Result<Option<TableHeader>> {
    if let Some(rest) = line.strip_prefix("@(") {
        let header = parse_header_tail(rest, None, lineno)?;
        return Ok(Some(header));
    }
    if let Some(rest) = line.strip_prefix('@') {
        // Legacy keyed form: bare key between '@' and '('. Commits only on
        // the complete `@key(N):` shape so strings that merely start with
        // '@' stay scalars.
        if let Some(paren) = rest.find('(') {
            let key = &rest[..paren];
            let tail = &rest[paren + 1..];
            if !key.is_empty()
                && !key.contains([':', ',', '"'])
                && tail
                    .find(')')
                    .is_some_and(|close| {
                        close > 0
                            && tail[..close].bytes().all(|b| b.is_ascii_digit())
                            && tail[close + 1..].starts_with(':')
                    })
            {
                let header = parse_header_tail(
                    tail,
                    Some(RawKey {
                        text: key.to_string(),
                        quoted: false,
                    }),
                    lineno,
                )?;
                return Ok(Some(header));
            }
        }
        return Ok(None);
    }
    // Keyed form: the value half starts with "@(".
    let shape = scan_shape(line);
    let Some(colon) = shape.first_colon else {
        return Ok(None);
    };
    if shape.first_comma.is_some_and(|comma| comma < colon) {
        return Ok(None);
    }
    let (key, value) = split_key_value(line, lineno)?;
    let Some(rest) = value.strip_prefix("@(") else {
        return Ok(None);
    };
    let header = parse_header_tail(rest, Some(key), lineno)?;
    Ok(Some(header))
}

/// Parses `N):cols`, everything after the opening `@(` (or legacy `(`).
fn parse_header_tail(rest: &str, key: Option<RawKey>, lineno: usize) -> Result<TableHeader> {
    let Some(close) = rest.find(')') else {
        return Err(Error::bad_header(lineno, "expected ')' after row count"));
    };
    let count_text = &rest[..close];
    if count_text.is_empty() || !count_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::bad_header(lineno, "row count must be decimal digits"));
    }
    let declared: usize = count_text
        .parse()
        .map_err(|_| Error::bad_header(lineno, "row count out of range"))?;
    let Some(cols_text) = rest[close + 1..].strip_prefix(':') else {
        return Err(Error::bad_header(lineno, "expected ':' after row count"));
    };
    if cols_text.is_empty() {
        return Err(Error::bad_header(lineno, "empty column list"));
    }
    let mut columns = Vec::new();
    for field in split_row(cols_text, lineno)? {
        let name = if field.quoted {
            unescape_cell(&field.text, lineno, field.column)?
        } else {
            field.text
        };
        if name.is_empty() {
            return Err(Error::bad_header(lineno, "empty column name"));
        }
        columns.push(name);
    }
    Ok(TableHeader {
        key,
        declared,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_checks() {
        let options = DecodeOptions::new().with_max_document_bytes(4);
        assert_eq!(
            check_document("abcde", &options).unwrap_err().code(),
            "E301"
        );
        assert_eq!(
            check_document("\u{FEFF}a:1", &DecodeOptions::new())
                .unwrap_err()
                .code(),
            "DecodeBadUTF8"
        );
    }

    #[test]
    fn crlf_normalizes() {
        assert_eq!(normalize_newlines("a:1\r\nb:2"), "a:1\nb:2");
        assert!(matches!(normalize_newlines("a:1\nb:2"), Cow::Borrowed(_)));
    }

    #[test]
    fn line_limit() {
        let options = DecodeOptions::new().with_max_line_bytes(3);
        let err = split_lines("ab\nabcd", &options).unwrap_err();
        assert_eq!(err.code(), "E302");
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn quoted_scan() {
        let (s, end) = scan_quoted(r#""a\"b":rest"#, 1, 1).unwrap();
        assert_eq!(s, "a\"b");
        assert_eq!(&r#""a\"b":rest"#[end..], ":rest");

        assert_eq!(
            scan_quoted(r#""oops"#, 1, 1).unwrap_err().code(),
            "DecodeUnterminatedString"
        );
        assert_eq!(
            scan_quoted(r#""a\qb""#, 1, 1).unwrap_err().code(),
            "DecodeBadEscape"
        );
    }

    #[test]
    fn row_split_handles_doubled_quotes() {
        let fields = split_row(r#"1,"He said ""hi"", loudly""#, 1).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].text, "1");
        assert!(!fields[0].quoted);
        assert_eq!(fields[1].text, "He said \"hi\", loudly");
        assert!(fields[1].quoted);
    }

    #[test]
    fn row_split_rejects_junk_after_quote() {
        let err = split_row(r#""a"b,c"#, 3).unwrap_err();
        assert_eq!(err.code(), "DecodeBadCell");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn row_split_keeps_empty_fields() {
        let fields = split_row("a,,b", 1).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1].text, "");
    }

    #[test]
    fn row_like_classification() {
        assert!(is_row_like("ana,7.5,320"));
        assert!(is_row_like("single"));
        assert!(is_row_like("ana,nickname:Al"));
        assert!(!is_row_like("friends:\"[ana,luis]\""));
        assert!(!is_row_like("hikes:@(3):a,b"));
        assert!(!is_row_like("key:value"));
    }

    #[test]
    fn key_value_split() {
        let (key, value) = split_key_value("zip:\"00501\"", 1).unwrap();
        assert_eq!(key.text, "zip");
        assert!(!key.quoted);
        assert_eq!(value, "\"00501\"");

        let (key, value) = split_key_value(r#""odd:key":v"#, 1).unwrap();
        assert_eq!(key.text, "odd:key");
        assert!(key.quoted);
        assert_eq!(value, "v");

        assert_eq!(
            split_key_value("no colon here", 1).unwrap_err().code(),
            "DecodeBadHeader"
        );
    }

    #[test]
    fn header_forms() {
        let header = parse_header("@(3):a,b", 1).unwrap().unwrap();
        assert_eq!(header.key, None);
        assert_eq!(header.declared, 3);
        assert_eq!(header.columns, vec!["a", "b"]);

        let header = parse_header("hikes:@(2):id,name", 1).unwrap().unwrap();
        assert_eq!(header.key.unwrap().text, "hikes");
        assert_eq!(header.declared, 2);

        // Legacy spelling accepted on decode.
        let header = parse_header("@users(2):id,name", 1).unwrap().unwrap();
        assert_eq!(header.key.unwrap().text, "users");

        assert!(parse_header("plain:value", 1).unwrap().is_none());
        assert!(parse_header("@not a header", 1).unwrap().is_none());
    }

    #[test]
    fn header_errors() {
        assert_eq!(
            parse_header("@(x):a", 1).unwrap_err().code(),
            "DecodeBadHeader"
        );
        assert_eq!(
            parse_header("@(2):", 1).unwrap_err().code(),
            "DecodeBadHeader"
        );
    }
}
