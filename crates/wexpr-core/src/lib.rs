//! # wexpr-core
//!
//! Pure-Rust encoder and decoder for **Wexpr**, a small human-readable
//! hierarchical data interchange format with maps, arrays, strings, numbers,
//! booleans, a null sentinel, base64-wrapped binary blobs, bareword
//! identifiers, comments, and intra-document references.
//!
//! ## Quick start
//!
//! ```rust
//! use wexpr_core::{decode, encode, Value};
//!
//! let value = decode("@(name \"Alice\" scores #(95 87 92))").unwrap();
//! assert_eq!(value.map_get_str("name"), Some(&Value::String("Alice".into())));
//!
//! let text = encode(&value).unwrap();
//! assert_eq!(decode(&text).unwrap(), value);
//! ```
//!
//! ## Modules
//!
//! - [`tokenizer`] — source text → token stream
//! - [`parser`] — token stream → [`Value`] tree, with reference handling
//! - [`encoder`] — [`Value`] tree → Wexpr text
//! - [`codec`] — the [`Codec`] facade and the free `decode`/`encode` entry points
//! - [`diagnostics`] — line/column reporting with caret indicators
//! - [`json`] — conversions to and from `serde_json::Value`
//! - [`base64`], [`utf8`], [`escape`] — the codec's lexical primitives
//! - [`error`], [`types`] — error and value types

pub mod base64;
pub mod codec;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod json;
pub mod parser;
pub mod tokenizer;
pub mod types;
pub mod utf8;

pub use codec::{decode, decode_into, encode, encode_with, Codec};
pub use diagnostics::Diagnostic;
pub use encoder::EncodeOptions;
pub use error::{Result, WexprError};
pub use types::{Key, Value};
