//! Configuration options for ZON encoding and decoding.
//!
//! This module provides two option structs, passed explicitly per call:
//!
//! - [`EncodeOptions`]: layout knobs for the encoder
//! - [`DecodeOptions`]: strictness and resource limits for the decoder
//!
//! ## Examples
//!
//! ```rust
//! use zon::{decode_with_options, encode_with_options, DecodeOptions, EncodeOptions, Value};
//!
//! let options = EncodeOptions::new().with_trailing_newline(true);
//! let text = encode_with_options(&Value::from(42), &options).unwrap();
//! assert_eq!(text, "42\n");
//!
//! let options = DecodeOptions::new().with_strict(false);
//! let value = decode_with_options("a:1", &options).unwrap();
//! assert!(value.is_object());
//! ```

/// Configuration options for the encoder.
///
/// # Examples
///
/// ```rust
/// use zon::EncodeOptions;
///
/// let options = EncodeOptions::new()
///     .with_dot_flatten(false)
///     .with_trailing_newline(true);
/// assert!(!options.dot_flatten);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Emit object keys in ascending code-point order. Disabling keeps the
    /// tree's insertion order; table columns stay sorted either way.
    pub sort_keys: bool,
    /// Allow shallow scalar-leaved objects to expand into `parent.child:value`
    /// lines when that rendering is shorter than the inline form.
    pub dot_flatten: bool,
    /// Append a final `\n` to the output.
    pub ensure_trailing_newline: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            sort_keys: true,
            dot_flatten: true,
            ensure_trailing_newline: false,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (sorted keys, dot-flattening on, no trailing newline).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    #[must_use]
    pub fn with_dot_flatten(mut self, dot_flatten: bool) -> Self {
        self.dot_flatten = dot_flatten;
        self
    }

    #[must_use]
    pub fn with_trailing_newline(mut self, ensure: bool) -> Self {
        self.ensure_trailing_newline = ensure;
        self
    }
}

/// Configuration options for the decoder: strict mode and security limits.
///
/// Limits are counted as they are encountered; the decoder aborts on the
/// first violation.
///
/// # Examples
///
/// ```rust
/// use zon::DecodeOptions;
///
/// let options = DecodeOptions::new()
///     .with_strict(false)
///     .with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Enforce declared row counts (`E001`) and per-row field counts (`E002`).
    /// When disabled, short rows pad with null, long rows truncate, and
    /// `key:value`-shaped extras attach as sparse fields. Escape, UTF-8, and
    /// limit checks stay on regardless.
    pub strict: bool,
    /// Maximum document size in bytes (`E301`).
    pub max_document_bytes: usize,
    /// Maximum logical line size in bytes (`E302`).
    pub max_line_bytes: usize,
    /// Maximum number of elements in any single array (`E303`).
    pub max_array_len: usize,
    /// Maximum number of keys in any single object (`E304`).
    pub max_object_keys: usize,
    /// Maximum nesting depth (`DecodeDepth`).
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            strict: true,
            max_document_bytes: 100 * 1024 * 1024,
            max_line_bytes: 1024 * 1024,
            max_array_len: 1_000_000,
            max_object_keys: 100_000,
            max_depth: 100,
        }
    }
}

impl DecodeOptions {
    /// Creates default options (strict mode, documented limit defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = limit;
        self
    }

    #[must_use]
    pub fn with_max_line_bytes(mut self, limit: usize) -> Self {
        self.max_line_bytes = limit;
        self
    }

    #[must_use]
    pub fn with_max_array_len(mut self, limit: usize) -> Self {
        self.max_array_len = limit;
        self
    }

    #[must_use]
    pub fn with_max_object_keys(mut self, limit: usize) -> Self {
        self.max_object_keys = limit;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }
}
