//! Source position reporting.
//!
//! Errors and warnings point at a byte offset in the source buffer and render
//! as three lines: `LINE:COL:MESSAGE`, the source line itself (tabs shown as
//! single spaces), and a caret indicator underneath.

use std::fmt;

/// A positioned message rendered against its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    /// Distance from the last newline; the first column of a line is 1.
    pub column: usize,
    pub message: String,
    /// The offending line with tabs replaced by single spaces.
    pub source_line: String,
    /// `column` spaces, a caret, then a tilde per remaining byte.
    pub indicator: String,
}

impl Diagnostic {
    /// Point at `length` bytes starting at byte `offset` of `source`.
    /// `offset` may be one past the end of the buffer for end-of-input errors.
    pub fn new(source: &[u8], offset: usize, length: usize, message: impl Into<String>) -> Self {
        let (line, column) = index_to_line_position(source, offset);
        Diagnostic {
            line,
            column,
            message: message.into(),
            source_line: line_text(source, line),
            indicator: caret_indicator(column, length),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}\n{}\n{}",
            self.line, self.column, self.message, self.source_line, self.indicator
        )
    }
}

/// Convert a byte offset to a (line, column) pair. Lines are 1-based; the
/// column is the offset's distance from the most recent newline, so the first
/// character of a line is column 1 and a newline byte itself is column 0 of
/// the line it starts.
pub fn index_to_line_position(source: &[u8], offset: usize) -> (usize, usize) {
    let upto = &source[..source.len().min(offset + 1)];
    let line = 1 + upto.iter().filter(|&&b| b == b'\n').count();
    let column = match upto.iter().rposition(|&b| b == b'\n') {
        Some(newline) => offset - newline,
        None => offset + 1,
    };
    (line, column)
}

/// The caret indicator: `column` spaces, `^`, and a tilde per extra byte.
pub fn caret_indicator(column: usize, length: usize) -> String {
    let mut out = " ".repeat(column);
    out.push('^');
    out.push_str(&"~".repeat(length.saturating_sub(1)));
    out
}

/// The text of the 1-based `line`, tabs replaced by single spaces. Out-of-range
/// lines (end-of-input diagnostics on a trailing newline) render empty.
fn line_text(source: &[u8], line: usize) -> String {
    String::from_utf8_lossy(source)
        .split('\n')
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .trim_end_matches('\r')
        .replace('\t', " ")
}
