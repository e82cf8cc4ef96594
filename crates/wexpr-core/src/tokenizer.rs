//! Single-pass tokenizer for Wexpr source text.
//!
//! At each byte offset the token kinds are tried in a fixed priority order and
//! the first match wins. The order is load-bearing: several prefixes overlap
//! (`;` starts both comment forms, `#` starts `#(` but is not a word byte,
//! `*[` must be claimed before a bare `[` could be). A prefix that fails to
//! complete its compound token falls through the rest of the list and, when
//! nothing else claims it, is reported as an unknown token.

use crate::error::{Result, WexprError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Newline,
    BlockComment,
    LineComment,
    String,
    Number,
    Word,
    Binary,
    MapOpen,
    ArrayOpen,
    Reference,
    ReferenceDef,
    CloseScope,
}

impl TokenKind {
    /// Tokens with no syntactic meaning; dropped before parsing.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::BlockComment
                | TokenKind::LineComment
        )
    }

    /// Human-readable kind name used in parser error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::BlockComment | TokenKind::LineComment => "comment",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Word => "word",
            TokenKind::Binary => "binary data",
            TokenKind::MapOpen => "map",
            TokenKind::ArrayOpen => "array",
            TokenKind::Reference => "reference",
            TokenKind::ReferenceDef => "reference definition",
            TokenKind::CloseScope => "close scope",
        }
    }
}

/// A token as a byte range into the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn lexeme<'src>(&self, source: &'src [u8]) -> &'src [u8] {
        &source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Scan the entire source, keeping whitespace, newlines, and comments.
/// Concatenating every lexeme of the result reconstructs the input.
pub fn scan(source: &[u8]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < source.len() {
        let token = next_token(source, pos)?;
        pos = token.end;
        tokens.push(token);
    }
    Ok(tokens)
}

/// Scan and drop trivia, leaving only the parser-visible stream.
pub fn tokenize(source: &[u8]) -> Result<Vec<Token>> {
    Ok(scan(source)?
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect())
}

/// Bytes a `word` token may contain: anything except the structural
/// characters and whitespace.
pub(crate) fn is_word_byte(b: u8) -> bool {
    !matches!(
        b,
        b'<' | b'>'
            | b'*'
            | b'#'
            | b'@'
            | b'('
            | b')'
            | b';'
            | b'['
            | b']'
            | b' '
            | b'\t'
            | b'\r'
            | b'\n'
    )
}

fn next_token(source: &[u8], pos: usize) -> Result<Token> {
    let token = |kind, end| Token {
        kind,
        start: pos,
        end,
    };
    let b = source[pos];

    if b == b' ' || b == b'\t' {
        let end = scan_while(source, pos, |b| b == b' ' || b == b'\t');
        return Ok(token(TokenKind::Whitespace, end));
    }
    if b == b'\r' || b == b'\n' {
        let end = scan_while(source, pos, |b| b == b'\r' || b == b'\n');
        return Ok(token(TokenKind::Newline, end));
    }
    if source[pos..].starts_with(b";(--") {
        // Non-greedy: the comment runs to the first terminator. Without one,
        // the line-comment rule below claims the `;` instead.
        if let Some(rel) = find(&source[pos + 4..], b"--)") {
            return Ok(token(TokenKind::BlockComment, pos + 4 + rel + 3));
        }
    }
    if b == b';' {
        let end = scan_while(source, pos, |b| b != b'\n');
        return Ok(token(TokenKind::LineComment, end));
    }
    if b == b'"' {
        return scan_string(source, pos);
    }
    if let Some(end) = match_number(source, pos) {
        return Ok(token(TokenKind::Number, end));
    }
    if is_word_byte(b) {
        let end = scan_while(source, pos, is_word_byte);
        return Ok(token(TokenKind::Word, end));
    }
    if b == b'<' {
        if let Some(end) = match_binary(source, pos) {
            return Ok(token(TokenKind::Binary, end));
        }
    }
    if source[pos..].starts_with(b"@(") {
        return Ok(token(TokenKind::MapOpen, pos + 2));
    }
    if source[pos..].starts_with(b"#(") {
        return Ok(token(TokenKind::ArrayOpen, pos + 2));
    }
    if source[pos..].starts_with(b"*[") {
        if let Some(end) = match_reference(source, pos) {
            return Ok(token(TokenKind::Reference, end));
        }
    }
    if b == b'[' {
        if let Some(end) = match_reference_def(source, pos) {
            return Ok(token(TokenKind::ReferenceDef, end));
        }
    }
    if b == b')' {
        return Ok(token(TokenKind::CloseScope, pos + 1));
    }

    Err(WexprError::syntax(
        source,
        pos,
        1,
        "Syntax error: Unknown token",
    ))
}

fn scan_while(source: &[u8], pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut i = pos;
    while i < source.len() && pred(source[i]) {
        i += 1;
    }
    i
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn scan_string(source: &[u8], pos: usize) -> Result<Token> {
    let mut i = pos + 1;
    while i < source.len() {
        match source[i] {
            b'"' => {
                return Ok(Token {
                    kind: TokenKind::String,
                    start: pos,
                    end: i + 1,
                })
            }
            b'\\' => match source.get(i + 1).copied() {
                Some(b'r' | b'n' | b't' | b'"' | b'\\') => i += 2,
                _ => {
                    return Err(WexprError::syntax(
                        source,
                        i,
                        2,
                        "Syntax Error: Invalid escape sequence in string.",
                    ))
                }
            },
            _ => i += 1,
        }
    }
    Err(WexprError::syntax(
        source,
        source.len(),
        1,
        "Syntax Error: String not closed before end of file",
    ))
}

/// `-? ( digits "." digits | digits )`; the fractional form needs digits on
/// both sides of the dot, otherwise only the integer part is claimed.
fn match_number(source: &[u8], pos: usize) -> Option<usize> {
    let mut i = pos;
    if source.get(i) == Some(&b'-') {
        i += 1;
    }
    let digits_start = i;
    i = scan_while(source, i, |b| b.is_ascii_digit());
    if i == digits_start {
        return None;
    }
    if source.get(i) == Some(&b'.') && source.get(i + 1).is_some_and(|b| b.is_ascii_digit()) {
        i = scan_while(source, i + 1, |b| b.is_ascii_digit());
    }
    Some(i)
}

fn match_binary(source: &[u8], pos: usize) -> Option<usize> {
    let payload_start = pos + 1;
    let payload_end = scan_while(source, payload_start, |b| {
        b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
    });
    if payload_end == payload_start || source.get(payload_end) != Some(&b'>') {
        return None;
    }
    Some(payload_end + 1)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn match_ident(source: &[u8], pos: usize) -> Option<usize> {
    let first = *source.get(pos)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    Some(scan_while(source, pos + 1, |b| {
        b.is_ascii_alphanumeric() || b == b'_'
    }))
}

fn match_reference(source: &[u8], pos: usize) -> Option<usize> {
    let ident_end = match_ident(source, pos + 2)?;
    if source.get(ident_end) != Some(&b']') {
        return None;
    }
    Some(ident_end + 1)
}

fn match_reference_def(source: &[u8], pos: usize) -> Option<usize> {
    let ident_start = scan_while(source, pos + 1, |b| b == b' ' || b == b'\t');
    let ident_end = match_ident(source, ident_start)?;
    let close = scan_while(source, ident_end, |b| b == b' ' || b == b'\t');
    if source.get(close) != Some(&b']') {
        return None;
    }
    Some(close + 1)
}

/// The identifier inside a `*[name]` or `[ name ]` token.
pub(crate) fn reference_ident<'src>(source: &'src [u8], token: &Token) -> &'src str {
    let lexeme = token.lexeme(source);
    let inner = match token.kind {
        TokenKind::Reference => &lexeme[2..lexeme.len() - 1],
        _ => &lexeme[1..lexeme.len() - 1],
    };
    // Idents are ASCII by construction, so this cannot fail for tokens the
    // scanner produced.
    std::str::from_utf8(inner).unwrap_or("").trim()
}
