//! Encoder: [`Value`] tree → Wexpr text.
//!
//! The encoder walks the tree carrying a dotted path (`-` at the root,
//! `-.key` / `-.index` below) so individual string values can be forced into
//! `<base64>` form by path. Maps whose keys are exactly the integers 1..n in
//! iteration order are written back with array syntax.

use std::collections::HashSet;

use crate::base64;
use crate::error::{Result, WexprError};
use crate::escape;
use crate::tokenizer;
use crate::types::{Key, Value};

/// Options for one encode call.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// One item per line, tab-indented; otherwise single spaces.
    pub pretty: bool,
    /// Paths whose string values are written as `<base64>` blobs.
    pub binary_paths: HashSet<String>,
}

impl EncodeOptions {
    pub fn pretty() -> Self {
        EncodeOptions {
            pretty: true,
            ..EncodeOptions::default()
        }
    }

    /// Force the string at `path` (e.g. `-.key` or `-.1`) into binary form.
    pub fn force_binary(mut self, path: impl Into<String>) -> Self {
        self.binary_paths.insert(path.into());
        self
    }
}

/// Encode with default options (compact, no forced binary paths).
pub fn encode(value: &Value) -> Result<String> {
    encode_with(value, &EncodeOptions::default())
}

pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<String> {
    let mut out = String::new();
    encode_value(value, "-", 0, options, &mut out)?;
    Ok(out)
}

fn encode_value(
    value: &Value,
    path: &str,
    depth: usize,
    options: &EncodeOptions,
    out: &mut String,
) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n, path)?),
        Value::String(s) => encode_string(s, path, options, out),
        Value::Binary(bytes) => push_base64(bytes, out),
        Value::Array(items) => {
            let items: Vec<&Value> = items.iter().collect();
            encode_sequence(&items, path, depth, options, out)?;
        }
        Value::Map(entries) => {
            if is_sequential(entries) {
                let items: Vec<&Value> = entries.iter().map(|(_, v)| v).collect();
                encode_sequence(&items, path, depth, options, out)?;
            } else {
                encode_map(entries, path, depth, options, out)?;
            }
        }
    }
    Ok(())
}

fn encode_sequence(
    items: &[&Value],
    path: &str,
    depth: usize,
    options: &EncodeOptions,
    out: &mut String,
) -> Result<()> {
    out.push_str("#(");
    for (i, item) in items.iter().copied().enumerate() {
        open_item(options.pretty, depth + 1, i == 0, out);
        let item_path = format!("{path}.{}", i + 1);
        encode_value(item, &item_path, depth + 1, options, out)?;
    }
    close_scope(options.pretty, depth, items.is_empty(), out);
    Ok(())
}

fn encode_map(
    entries: &[(Key, Value)],
    path: &str,
    depth: usize,
    options: &EncodeOptions,
    out: &mut String,
) -> Result<()> {
    out.push_str("@(");
    for (i, (key, value)) in entries.iter().enumerate() {
        open_item(options.pretty, depth + 1, i == 0, out);
        let entry_path = format!("{path}.{key}");
        encode_key(key, &entry_path, out)?;
        out.push(' ');
        encode_value(value, &entry_path, depth + 1, options, out)?;
    }
    close_scope(options.pretty, depth, entries.is_empty(), out);
    Ok(())
}

fn open_item(pretty: bool, depth: usize, first: bool, out: &mut String) {
    if pretty {
        out.push('\n');
        push_indent(depth, out);
    } else if !first {
        out.push(' ');
    }
}

fn close_scope(pretty: bool, depth: usize, empty: bool, out: &mut String) {
    if pretty && !empty {
        out.push('\n');
        push_indent(depth, out);
    }
    out.push(')');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Keys are numeric (written bare) or strings under the same bareword rule as
/// string values; binary forcing never applies to keys.
fn encode_key(key: &Key, path: &str, out: &mut String) -> Result<()> {
    match key {
        Key::Number(n) => out.push_str(&format_number(*n, path)?),
        Key::String(s) => {
            if is_bareword(s) {
                out.push_str(s);
            } else {
                push_quoted(s, out);
            }
        }
    }
    Ok(())
}

fn encode_string(s: &str, path: &str, options: &EncodeOptions, out: &mut String) {
    if options.binary_paths.contains(path) {
        push_base64(s.as_bytes(), out);
    } else if is_bareword(s) {
        out.push_str(s);
    } else {
        push_quoted(s, out);
    }
}

fn push_quoted(s: &str, out: &mut String) {
    out.push('"');
    escape::escape_into(s, out);
    out.push('"');
}

fn push_base64(bytes: &[u8], out: &mut String) {
    out.push('<');
    out.push_str(&base64::to_base64(bytes));
    out.push('>');
}

/// A string can be written unquoted when every byte is a word byte and the
/// text is not one of the keyword barewords.
fn is_bareword(s: &str) -> bool {
    !s.is_empty()
        && !matches!(s, "true" | "false" | "nil" | "null")
        && s.bytes().all(tokenizer::is_word_byte)
}

/// Decimal text for a number. Rust's float display never uses an exponent, so
/// the output always re-lexes as a single number token; `-0` normalizes to
/// `0`. Non-finite numbers have no token form and fail the encode.
fn format_number(n: f64, path: &str) -> Result<String> {
    if !n.is_finite() {
        return Err(WexprError::Encode(format!(
            "cannot encode non-finite number at {path}"
        )));
    }
    if n == 0.0 {
        return Ok("0".to_string());
    }
    Ok(n.to_string())
}

/// The arrayness test: a non-empty map whose keys, in iteration order, are
/// exactly the integers 1..n.
fn is_sequential(entries: &[(Key, Value)]) -> bool {
    !entries.is_empty()
        && entries.iter().enumerate().all(|(i, (key, _))| {
            matches!(key, Key::Number(n) if *n == (i + 1) as f64)
        })
}
