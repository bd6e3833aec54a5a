//! Quoting policy for ZON scalars.
//!
//! Decides whether a string emits bare or double-quoted, and applies the
//! two escape disciplines the format uses:
//!
//! - **Block scalars and inline payloads**: backslash escapes from the
//!   permitted set `\\ \" \n \r \t`.
//! - **Table cells**: RFC-4180 quoting, where internal quotes double
//!   (`"` becomes `""`) while control characters and backslashes still use
//!   the backslash set.
//!
//! Escapes exist only inside quotes. A bare string is emitted and decoded
//! raw, so a backslash in a bare string is a literal backslash.

/// Characters that force quoting when they appear anywhere in a bare string.
pub(crate) const STRUCTURAL: [char; 7] = [',', ':', '[', ']', '{', '}', '"'];

/// Object keys that would enable prototype pollution; rejected on both
/// encode and decode.
pub(crate) fn is_poison_key(key: &str) -> bool {
    matches!(key, "__proto__" | "constructor" | "prototype")
}

/// Case-sensitive `T`/`F` plus the case-insensitive null/bool spellings.
pub(crate) fn is_reserved_literal(s: &str) -> bool {
    s == "T"
        || s == "F"
        || s.eq_ignore_ascii_case("true")
        || s.eq_ignore_ascii_case("false")
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("none")
        || s.eq_ignore_ascii_case("nil")
}

/// Anything shaped like a number literal, leading zeros included. Broader
/// than the decode-side number rule: a string spelled `007` quotes even
/// though the bare token would decode as a string anyway.
pub(crate) fn is_numeric_shaped(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// The decode-side number rule: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
pub(crate) fn is_number_token(s: &str) -> bool {
    if !is_numeric_shaped(s) {
        return false;
    }
    !has_leading_zero(s)
}

/// A leading zero followed by another digit in the integer part (`007`,
/// `-012.5`). Such tokens decode as strings with their lexeme kept.
pub(crate) fn has_leading_zero(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    let bytes = rest.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'0' && bytes[1].is_ascii_digit()
}

fn all_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

fn is_iso_date(bytes: &[u8]) -> bool {
    bytes.len() == 10
        && all_digits(&bytes[0..4])
        && bytes[4] == b'-'
        && all_digits(&bytes[5..7])
        && bytes[7] == b'-'
        && all_digits(&bytes[8..10])
}

fn is_iso_time(bytes: &[u8]) -> bool {
    if bytes.len() < 8
        || !all_digits(&bytes[0..2])
        || bytes[2] != b':'
        || !all_digits(&bytes[3..5])
        || bytes[5] != b':'
        || !all_digits(&bytes[6..8])
    {
        return false;
    }
    match bytes.get(8) {
        None => true,
        Some(&b'.') => all_digits(&bytes[9..]),
        Some(_) => false,
    }
}

/// Syntactic ISO-8601 shape check: date, time, or the two joined by `T`
/// with an optional `Z` or `±HH:MM` offset. Not validated as a calendar
/// date. Matching strings stay bare even though they contain `:` or `-`.
pub(crate) fn is_iso_like(s: &str) -> bool {
    let bytes = s.as_bytes();
    if is_iso_date(bytes) || is_iso_time(bytes) {
        return true;
    }
    if bytes.len() < 11 || !is_iso_date(&bytes[0..10]) || bytes[10] != b'T' {
        return false;
    }
    let time = &bytes[11..];
    if is_iso_time(time) {
        return true;
    }
    // Trailing Z or ±HH:MM offset.
    if let Some(rest) = time.strip_suffix(b"Z") {
        return is_iso_time(rest);
    }
    if time.len() > 6 {
        let (clock, offset) = time.split_at(time.len() - 6);
        return is_iso_time(clock)
            && (offset[0] == b'+' || offset[0] == b'-')
            && all_digits(&offset[1..3])
            && offset[3] == b':'
            && all_digits(&offset[4..6]);
    }
    false
}

/// Whether a string scalar must emit quoted.
///
/// Quoting is mandatory for: the empty string, leading/trailing whitespace,
/// C0 controls and line terminators, reserved literals, number-shaped
/// strings, and strings containing structural characters. ISO-8601-looking
/// strings are exempt from the structural rule.
pub(crate) fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    let first = s.chars().next().unwrap();
    let last = s.chars().next_back().unwrap();
    if first.is_whitespace() || last.is_whitespace() {
        return true;
    }
    if s.chars()
        .any(|c| c.is_control() || c == '\u{2028}' || c == '\u{2029}')
    {
        return true;
    }
    if is_reserved_literal(s) || is_numeric_shaped(s) {
        return true;
    }
    // A bare `@(` opener would read as a table header.
    if s.starts_with("@(") {
        return true;
    }
    if is_iso_like(s) {
        return false;
    }
    s.contains(&STRUCTURAL[..])
}

/// Appends `s` as a quoted block scalar: `"` + backslash escapes + `"`.
pub(crate) fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

/// Appends a string scalar for a `key:value` site, quoting only if required.
pub(crate) fn push_string_scalar(out: &mut String, s: &str) {
    if needs_quoting(s) {
        push_quoted(out, s);
    } else {
        out.push_str(s);
    }
}

/// Whether a string must quote as a table cell.
///
/// Cells are CSV fields, not block scalars, so the structural set narrows
/// to the row separators: only a comma, a quote, or a line terminator
/// forces quoting. `:` `{` `}` `[` `]` are plain text inside a cell. The
/// shape rules (empty, outer whitespace, controls, reserved literals,
/// number spellings) still apply because the cell's content goes through
/// the same scalar classification on decode.
pub(crate) fn cell_needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    let first = s.chars().next().unwrap();
    let last = s.chars().next_back().unwrap();
    if first.is_whitespace() || last.is_whitespace() {
        return true;
    }
    if s.chars()
        .any(|c| c.is_control() || c == '\u{2028}' || c == '\u{2029}')
    {
        return true;
    }
    if is_reserved_literal(s) || is_numeric_shaped(s) {
        return true;
    }
    s.contains([',', '"'])
}

/// Appends a string scalar as a table cell with RFC-4180 quoting: quotes
/// double, control characters and backslashes take backslash escapes.
pub(crate) fn push_csv_cell(out: &mut String, s: &str) {
    if !cell_needs_quoting(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\"\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

/// Appends an already-built inline payload (`{…}` / `[…]`) as a table cell.
/// The payload carries its own backslash escapes, so CSV wrapping only
/// doubles quotes.
pub(crate) fn push_csv_payload(out: &mut String, payload: &str) {
    out.push('"');
    for ch in payload.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_strings() {
        assert!(!needs_quoting("hello"));
        assert!(!needs_quoting("hello world"));
        assert!(!needs_quoting("spring_2025"));
        assert!(!needs_quoting("Blue Lake Trail"));
        assert!(!needs_quoting("a-b.c_d"));
        assert!(!needs_quoting("emoji 👋 ok"));
    }

    #[test]
    fn structural_characters_force_quotes() {
        for s in ["a,b", "a:b", "a[b", "a]b", "a{b", "a}b", "a\"b"] {
            assert!(needs_quoting(s), "{s:?} should quote");
        }
        // A header lookalike must not appear bare.
        assert!(needs_quoting("@(2"));
        assert!(!needs_quoting("@mention"));
    }

    #[test]
    fn whitespace_and_controls_force_quotes() {
        assert!(needs_quoting(""));
        assert!(needs_quoting(" leading"));
        assert!(needs_quoting("trailing "));
        assert!(needs_quoting("a\nb"));
        assert!(needs_quoting("a\tb"));
        assert!(needs_quoting("a\u{1}b"));
    }

    #[test]
    fn reserved_literals_force_quotes() {
        for s in ["T", "F", "true", "False", "NULL", "none", "Nil"] {
            assert!(needs_quoting(s), "{s:?} should quote");
        }
        // Case-sensitive single letters: only T and F are reserved.
        assert!(!needs_quoting("t"));
        assert!(!needs_quoting("f"));
        assert!(!needs_quoting("X"));
    }

    #[test]
    fn number_shapes_force_quotes() {
        for s in ["0", "42", "-3.14", "1e6", "1E-6", "007", "00501", "-012.5"] {
            assert!(needs_quoting(s), "{s:?} should quote");
        }
        for s in ["1.2.3", "v1", "1e", "1.", "-", "4-2"] {
            assert!(!needs_quoting(s), "{s:?} should stay bare");
        }
    }

    #[test]
    fn iso_shapes_stay_bare() {
        for s in [
            "2025-06-01",
            "10:30:00",
            "10:30:00.125",
            "2025-06-01T10:30:00",
            "2025-06-01T10:30:00Z",
            "2025-06-01T10:30:00+02:00",
            "2025-06-01T10:30:00.5-07:00",
        ] {
            assert!(is_iso_like(s), "{s:?} should look ISO");
            assert!(!needs_quoting(s), "{s:?} should stay bare");
        }
        for s in ["2025-6-01", "10:30", "2025-06-01T", "2025-06-01x10:30:00"] {
            assert!(!is_iso_like(s), "{s:?} should not look ISO");
        }
    }

    #[test]
    fn number_token_rule() {
        assert!(is_number_token("0"));
        assert!(is_number_token("-17"));
        assert!(is_number_token("3.14"));
        assert!(is_number_token("1e6"));
        assert!(!is_number_token("007"));
        assert!(!is_number_token("0x10"));
        assert!(!is_number_token(""));
        assert!(has_leading_zero("00501"));
        assert!(!has_leading_zero("0"));
        assert!(!has_leading_zero("0.5"));
    }

    #[test]
    fn quoted_escapes() {
        let mut out = String::new();
        push_quoted(&mut out, "a\"b\\c\nd");
        assert_eq!(out, r#""a\"b\\c\nd""#);
    }

    #[test]
    fn csv_cells_double_quotes() {
        let mut out = String::new();
        push_csv_cell(&mut out, "He said \"hi\", loudly");
        assert_eq!(out, r#""He said ""hi"", loudly""#);

        let mut bare = String::new();
        push_csv_cell(&mut bare, "plain");
        assert_eq!(bare, "plain");
    }

    #[test]
    fn cell_quoting_is_narrower_than_block_quoting() {
        // Block-structural characters are plain text inside a cell.
        for s in ["a:b", "x[y]z", "a{b}c", "@(2", "k:v:w"] {
            assert!(needs_quoting(s), "{s:?} quotes as a block scalar");
            assert!(!cell_needs_quoting(s), "{s:?} stays bare as a cell");
        }
        // The CSV separators and the shape rules still bind.
        for s in ["a,b", "a\"b", "", " pad", "T", "null", "42", "007"] {
            assert!(cell_needs_quoting(s), "{s:?} quotes as a cell");
        }

        let mut out = String::new();
        push_csv_cell(&mut out, "a:b");
        assert_eq!(out, "a:b");
    }
}
