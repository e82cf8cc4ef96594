//! Decode/encode entry points.
//!
//! [`Codec`] bundles the per-call state: warnings accumulated during a decode
//! and the terminal error of the last call. State is fully reset at the start
//! of every call, so nothing crosses invocations. One instance must not be
//! shared between concurrent callers; distinct instances are independent.

use crate::encoder::{self, EncodeOptions};
use crate::error::{Result, WexprError};
use crate::parser::Parser;
use crate::types::Value;

#[derive(Default)]
pub struct Codec {
    warnings: Vec<String>,
    last_error: Option<WexprError>,
}

impl Codec {
    pub fn new() -> Self {
        Codec::default()
    }

    /// Decode a Wexpr document into a value tree. A `Null` result is a
    /// legitimate success (the document `null`).
    pub fn decode(&mut self, source: impl AsRef<[u8]>) -> Result<Value> {
        self.run_decode(source.as_ref(), None)
    }

    /// Decode, merging a top-level map or array into `root` when the shapes
    /// match: existing nested containers are filled in place, scalar slots
    /// are overwritten, and extra prepopulated slots survive.
    pub fn decode_into(&mut self, source: impl AsRef<[u8]>, root: Value) -> Result<Value> {
        self.run_decode(source.as_ref(), Some(root))
    }

    pub fn encode(&mut self, value: &Value) -> Result<String> {
        self.encode_with(value, &EncodeOptions::default())
    }

    pub fn encode_with(&mut self, value: &Value, options: &EncodeOptions) -> Result<String> {
        self.reset();
        self.record(encoder::encode_with(value, options))
    }

    /// Warnings from the last call, rendered as diagnostics.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The terminal error of the last call, if it failed.
    pub fn last_error(&self) -> Option<&WexprError> {
        self.last_error.as_ref()
    }

    fn run_decode(&mut self, source: &[u8], root: Option<Value>) -> Result<Value> {
        self.reset();
        let mut parser = match Parser::new(source) {
            Ok(parser) => parser,
            Err(error) => return self.record(Err(error)),
        };
        let result = parser.parse_document(root);
        self.warnings = parser.take_warnings();
        self.record(result)
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.last_error = Some(error.clone());
        }
        result
    }

    fn reset(&mut self) {
        self.warnings.clear();
        self.last_error = None;
    }
}

/// Decode with a fresh [`Codec`]; warnings are discarded.
pub fn decode(source: impl AsRef<[u8]>) -> Result<Value> {
    Codec::new().decode(source)
}

/// Decode into a prepopulated root with a fresh [`Codec`].
pub fn decode_into(source: impl AsRef<[u8]>, root: Value) -> Result<Value> {
    Codec::new().decode_into(source, root)
}

/// Encode with default options.
pub fn encode(value: &Value) -> Result<String> {
    encoder::encode(value)
}

/// Encode with explicit options.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<String> {
    encoder::encode_with(value, options)
}
