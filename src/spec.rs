//! ZON Format Reference
//!
//! This module documents the ZON (Zero Overhead Notation) text format as
//! implemented by this library.
//!
//! # Overview
//!
//! ZON is a line-oriented, UTF-8 serialization of the JSON data model that
//! minimizes token usage in Large Language Model contexts. It removes the
//! braces, brackets, and redundant quotes of JSON at the top level and
//! collapses uniform object arrays into CSV-style tables.
//!
//! # Documents
//!
//! A document is a sequence of LF-separated lines (CRLF is normalized on
//! read; a byte order mark is rejected). The first non-empty line decides
//! the root:
//!
//! - `key:value`: the root is an object
//! - `@(N):col1,col2`: the root is a table array
//! - a single line with no top-level `:`: the root is a scalar
//! - an empty document: the root is null
//!
//! Empty lines are separators and carry no meaning, except that a blank
//! line ends a table's row run.
//!
//! # Objects
//!
//! One field per line, `key:value`, no space after the colon:
//!
//! ```text
//! name:Alice
//! age:30
//! active:T
//! ```
//!
//! Keys emit in ascending code-point order, and all non-table fields emit
//! before the block tables so tabular data stays grouped. Keys containing
//! `.` are quoted when meant literally, because a bare dotted key is a
//! path:
//!
//! ```text
//! server.host:localhost
//! server.port:8080
//! ```
//!
//! decodes to `{"server":{"host":"localhost","port":8080}}`. Assigning
//! through a path that conflicts with an existing value is a key collision.
//!
//! # Scalars
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `null` (decode also accepts `none`, `nil`, any case) | `value:null` |
//! | Boolean | `T` / `F` (case-sensitive) | `active:T` |
//! | Integer | decimal digits, optional `-`, no leading zeros | `count:42` |
//! | Float | shortest round-trip decimal, never scientific | `price:19.99` |
//! | String | bare when safe, otherwise `"quoted"` | `name:Alice` |
//!
//! Numbers re-encode canonically: `1e6` in equals `1000000` out, `-0`
//! equals `0`, and a float that is mathematically an integer prints
//! without a decimal point. A bare token with a leading zero (`00501`)
//! is a string and keeps its lexeme.
//!
//! ## Quoting
//!
//! A string must be quoted when it:
//!
//! - is empty, or starts/ends with whitespace
//! - contains a C0 control character or a line terminator
//! - matches a reserved literal: `T`, `F` exactly, or `true`, `false`,
//!   `null`, `none`, `nil` in any case
//! - looks like a number (leading-zero forms included)
//! - contains a structural character: `,` `:` `[` `]` `{` `}` `"`
//!
//! ISO-8601-looking strings (`2025-06-01`, `10:30:00`,
//! `2025-06-01T10:30:00Z`) stay bare despite their colons; the check is
//! syntactic only.
//!
//! Inside quotes the escapes are exactly `\\ \" \n \r \t`; anything else
//! is an error. Unicode is literal UTF-8, never `\uXXXX`. A quoted scalar
//! always decodes as a string, even when its content spells `T` or `123`.
//!
//! # Tables
//!
//! An array whose elements are all objects with one shared key set emits
//! as a table: a header declaring the row count and the sorted column
//! list, then one CSV row per element.
//!
//! ```text
//! hikes:@(3):companion,distanceKm,elevationGain,id,name,wasSunny
//! ana,7.5,320,1,Blue Lake Trail,T
//! luis,9.2,540,2,Ridge Overlook,F
//! sam,5.1,180,3,Wildflower Loop,T
//! ```
//!
//! A root-level uniform array uses the anonymous header `@(N):cols`. The
//! legacy header spelling `@key(N):cols` is accepted on decode only.
//!
//! Cells follow RFC 4180: a cell containing `,`, `"`, or a newline is
//! wrapped in quotes and internal quotes double (`"` → `""`); control
//! characters and backslashes inside a quoted cell still use the backslash
//! escapes. A row may append `key:value` extras after its positional
//! cells; they attach to that row's object by name (decode only).
//!
//! In strict mode the row count must match the header (`E001`) and every
//! row must carry exactly one cell per column (`E002`). Non-strict mode
//! pads short rows with null and truncates long ones.
//!
//! # Inline compounds
//!
//! Anything nested that is not a table emits as a quoted single-line
//! payload in a recursively ZON-like grammar:
//!
//! ```text
//! context:"{location:Boulder,season:spring_2025,task:Our favorite hikes together}"
//! friends:"[ana,luis,sam]"
//! empty:"[]"
//! ```
//!
//! Inside a payload, objects are `{key:value,…}` with sorted keys, arrays
//! are `[v1,v2,…]`, and scalars follow the quoting rules above. The
//! payload is built first, then wrapped in the outer quotes with escapes
//! applied, so nested strings double-escape through the envelope.
//!
//! # Security
//!
//! The decoder enforces limits with stable error codes: document bytes
//! (`E301`, 100 MiB), line bytes (`E302`, 1 MiB), array length (`E303`,
//! 1,000,000), object keys (`E304`, 100,000), and nesting depth
//! (`DecodeDepth`, 100). The keys `__proto__`, `constructor`, and
//! `prototype` are rejected on both encode and decode.
//!
//! # File conventions
//!
//! - Extension: `.zonf`
//! - Media type: `text/zon; charset=utf-8`
//! - No BOM, LF line endings, no trailing whitespace per line

// This module contains only documentation; no implementation code
