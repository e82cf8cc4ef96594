//! Recursive-descent parser: token stream → [`Value`] tree.
//!
//! The parser owns the reference table for one decode. A `[name]` definition
//! registers the value that follows it and is otherwise transparent; `*[name]`
//! yields a copy of the registered value. Decoding can merge into a
//! prepopulated root container, reusing existing nested containers of the
//! same shape instead of replacing them.

use std::collections::HashMap;

use crate::base64;
use crate::diagnostics::Diagnostic;
use crate::error::{Result, WexprError};
use crate::escape;
use crate::tokenizer::{self, Token, TokenKind};
use crate::types::{Key, Value};
use crate::utf8;

/// A registered reference: the value a `*[name]` token resolves to, plus the
/// defining token for redefinition warnings.
struct ReferenceEntry {
    defining: Token,
    value: Value,
}

pub struct Parser<'src> {
    source: &'src [u8],
    tokens: Vec<Token>,
    pos: usize,
    references: HashMap<String, ReferenceEntry>,
    warnings: Vec<String>,
}

impl<'src> Parser<'src> {
    /// Tokenize `source`; fails on lexical errors.
    pub fn new(source: &'src [u8]) -> Result<Self> {
        Ok(Parser {
            source,
            tokens: tokenizer::tokenize(source)?,
            pos: 0,
            references: HashMap::new(),
            warnings: Vec::new(),
        })
    }

    /// Parse exactly one top-level value. When `root` holds a container and
    /// the document's top-level token opens the same shape, the document is
    /// merged into it; otherwise `root` is discarded.
    pub fn parse_document(&mut self, root: Option<Value>) -> Result<Value> {
        let token = self.next().ok_or_else(|| self.eof_error())?;
        let value = match (token.kind, root) {
            (TokenKind::MapOpen, Some(Value::Map(mut entries))) => {
                self.parse_map_into(&mut entries)?;
                Value::Map(entries)
            }
            (TokenKind::ArrayOpen, Some(Value::Array(mut items))) => {
                self.parse_array_into(&mut items)?;
                Value::Array(items)
            }
            (_, _) => self.parse_value_from(token)?,
        };
        if let Some(extra) = self.next() {
            return Err(self.error_at(&extra, "Syntax Error: Garbage at end of file"));
        }
        Ok(value)
    }

    /// Warnings accumulated so far (reference redefinitions).
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_value_from(&mut self, token: Token) -> Result<Value> {
        match token.kind {
            TokenKind::String => Ok(self.string_value(&token)),
            TokenKind::Number => Ok(Value::Number(number_value(token.lexeme(self.source)))),
            TokenKind::Word => Ok(self.word_value(&token)),
            TokenKind::Binary => {
                let lexeme = token.lexeme(self.source);
                Ok(Value::Binary(base64::from_base64(
                    &lexeme[1..lexeme.len() - 1],
                )))
            }
            TokenKind::Reference => self.reference_value(&token),
            TokenKind::MapOpen => {
                let mut entries = Vec::new();
                self.parse_map_into(&mut entries)?;
                Ok(Value::Map(entries))
            }
            TokenKind::ArrayOpen => {
                let mut items = Vec::new();
                self.parse_array_into(&mut items)?;
                Ok(Value::Array(items))
            }
            TokenKind::ReferenceDef => {
                let name = tokenizer::reference_ident(self.source, &token).to_string();
                let inner = self.next().ok_or_else(|| self.eof_error())?;
                let value = self.parse_value_from(inner)?;
                self.define_reference(name, token, value.clone());
                Ok(value)
            }
            _ => Err(self.error_at(
                &token,
                format!(
                    "Syntax Error: Expected value but instead found {}.",
                    token.kind.describe()
                ),
            )),
        }
    }

    /// Consume map entries up to and including the closing `)`.
    fn parse_map_into(&mut self, entries: &mut Vec<(Key, Value)>) -> Result<()> {
        loop {
            let key_token = self.next().ok_or_else(|| self.eof_error())?;
            if key_token.kind == TokenKind::CloseScope {
                return Ok(());
            }

            // A reference definition in key position both names the entry and
            // registers the entry's value under that name.
            let mut pending_ref = None;
            let key = match key_token.kind {
                TokenKind::Word => Key::String(self.utf8_key(&key_token, None)?),
                TokenKind::Number => Key::Number(number_value(key_token.lexeme(self.source))),
                TokenKind::String => {
                    let unescaped = self.string_bytes(&key_token);
                    Key::String(self.utf8_key(&key_token, Some(unescaped))?)
                }
                TokenKind::ReferenceDef => {
                    let name = tokenizer::reference_ident(self.source, &key_token).to_string();
                    pending_ref = Some((name.clone(), key_token.clone()));
                    Key::String(name)
                }
                other => {
                    return Err(self.error_at(
                        &key_token,
                        format!(
                            "Syntax Error: Expected map key as word, number, or string \
                             but instead found {}.",
                            other.describe()
                        ),
                    ))
                }
            };

            let value_token = self.next().ok_or_else(|| self.eof_error())?;
            if value_token.kind == TokenKind::CloseScope {
                return Err(self.error_at(
                    &value_token,
                    "Syntax Error: Expected value for map key but instead found close scope.",
                ));
            }

            let existing = entries.iter().position(|(k, _)| *k == key);
            let value = match value_token.kind {
                TokenKind::MapOpen => {
                    let mut child = Vec::new();
                    if let Some(i) = existing {
                        if let Value::Map(m) = &mut entries[i].1 {
                            child = std::mem::take(m);
                        }
                    }
                    self.parse_map_into(&mut child)?;
                    Value::Map(child)
                }
                TokenKind::ArrayOpen => {
                    let mut child = Vec::new();
                    if let Some(i) = existing {
                        if let Value::Array(a) = &mut entries[i].1 {
                            child = std::mem::take(a);
                        }
                    }
                    self.parse_array_into(&mut child)?;
                    Value::Array(child)
                }
                _ => self.parse_value_from(value_token)?,
            };

            if let Some((name, def_token)) = pending_ref {
                self.define_reference(name, def_token, value.clone());
            }
            match existing {
                Some(i) => entries[i].1 = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Consume array items up to and including the closing `)`. Items overwrite
    /// prepopulated slots in order; container slots of the matching shape are
    /// merged into rather than replaced, and slots past the document's length
    /// are left alone.
    fn parse_array_into(&mut self, items: &mut Vec<Value>) -> Result<()> {
        let mut index = 0;
        loop {
            let token = self.next().ok_or_else(|| self.eof_error())?;
            if token.kind == TokenKind::CloseScope {
                return Ok(());
            }
            let value = match token.kind {
                TokenKind::MapOpen => {
                    let mut child = Vec::new();
                    if let Some(Value::Map(m)) = items.get_mut(index) {
                        child = std::mem::take(m);
                    }
                    self.parse_map_into(&mut child)?;
                    Value::Map(child)
                }
                TokenKind::ArrayOpen => {
                    let mut child = Vec::new();
                    if let Some(Value::Array(a)) = items.get_mut(index) {
                        child = std::mem::take(a);
                    }
                    self.parse_array_into(&mut child)?;
                    Value::Array(child)
                }
                _ => self.parse_value_from(token)?,
            };
            if index < items.len() {
                items[index] = value;
            } else {
                items.push(value);
            }
            index += 1;
        }
    }

    fn string_bytes(&self, token: &Token) -> Vec<u8> {
        let lexeme = token.lexeme(self.source);
        escape::unescape(&lexeme[1..lexeme.len() - 1])
    }

    fn string_value(&self, token: &Token) -> Value {
        bytes_to_value(self.string_bytes(token))
    }

    fn word_value(&self, token: &Token) -> Value {
        match token.lexeme(self.source) {
            b"true" => Value::Bool(true),
            b"false" => Value::Bool(false),
            b"nil" | b"null" => Value::Null,
            other => bytes_to_value(other.to_vec()),
        }
    }

    fn reference_value(&mut self, token: &Token) -> Result<Value> {
        let name = tokenizer::reference_ident(self.source, token);
        match self.references.get(name) {
            Some(entry) => Ok(entry.value.clone()),
            None => Err(self.error_at(
                token,
                format!("Syntax Error: Reference [{name}] is undefined."),
            )),
        }
    }

    fn define_reference(&mut self, name: String, defining: Token, value: Value) {
        if let Some(previous) = self.references.get(&name) {
            let prior = previous.defining.clone();
            self.warn(&defining, format!("Warning: Redefining reference [{name}]"));
            self.warn(
                &prior,
                format!("Warning: Reference [{name}] was previously defined here"),
            );
        }
        self.references
            .insert(name, ReferenceEntry { defining, value });
    }

    /// Decode a word or unescaped string key, which must be valid UTF-8.
    fn utf8_key(&self, token: &Token, unescaped: Option<Vec<u8>>) -> Result<String> {
        let bytes = unescaped.unwrap_or_else(|| token.lexeme(self.source).to_vec());
        if !utf8::is_well_formed(&bytes) {
            return Err(self.error_at(token, "Syntax Error: Map key is not valid UTF-8."));
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn warn(&mut self, token: &Token, message: String) {
        self.warnings
            .push(Diagnostic::new(self.source, token.start, token.len(), message).to_string());
    }

    fn error_at(&self, token: &Token, message: impl Into<String>) -> WexprError {
        WexprError::syntax(self.source, token.start, token.len(), message)
    }

    fn eof_error(&self) -> WexprError {
        WexprError::syntax(
            self.source,
            self.source.len(),
            1,
            "Syntax Error: File ended unexpectedly",
        )
    }
}

/// Well-formed UTF-8 becomes a string value; anything else is carried as
/// binary, which re-encodes as a base64 blob.
fn bytes_to_value(bytes: Vec<u8>) -> Value {
    if utf8::is_well_formed(&bytes) {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Value::Binary(bytes)
    }
}

/// The token grammar guarantees a parseable `-?digits(.digits)?` lexeme.
fn number_value(lexeme: &[u8]) -> f64 {
    String::from_utf8_lossy(lexeme).parse().unwrap_or_default()
}
