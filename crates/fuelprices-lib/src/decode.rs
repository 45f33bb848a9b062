//! Lenient JSON reader for upstream provider bodies.
//!
//! Accepts RFC 8259 JSON plus the bare tokens `NaN`, `Infinity` and
//! `-Infinity`, which permissive encoders emit for non-finite floats.
//! `serde_json` refuses those tokens, so a pre-pass rewrites each one into a
//! string tagged with a leading U+FDD0 and the [`Value`] visitor turns it
//! back into a float. A genuine string that already starts with U+FDD0 gets
//! a second one, which the visitor strips again.
//!
//! Nesting is bounded by the `serde_json` recursion limit of 128 levels.

use std::borrow::Cow;

use serde::de::DeserializeSeed;

use crate::error::{Error, Result};
use crate::value::{Value, ValueSeed};

const MARKER: char = '\u{FDD0}';
const MARKER_ESCAPE: &str = "\\uFDD0";

/// Non-finite tokens, longest first so `-Infinity` wins over `Infinity`.
const NON_FINITE: [(&str, f64); 3] = [
    ("-Infinity", f64::NEG_INFINITY),
    ("Infinity", f64::INFINITY),
    ("NaN", f64::NAN),
];

/// Decode a complete document from `input`.
pub fn from_str(input: &str) -> Result<Value> {
    let tagged = Tagged::new(input);
    let mut de = serde_json::Deserializer::from_str(&tagged.text);
    let value = ValueSeed { lenient: true }
        .deserialize(&mut de)
        .map_err(|e| tagged.error(&e))?;
    de.end().map_err(|e| tagged.error(&e))?;
    Ok(value)
}

/// Decode a document from raw bytes, which must be UTF-8.
pub fn from_slice(input: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(input).map_err(|e| {
        let (line, column) = position(&input[..e.valid_up_to()]);
        Error::Decode {
            line,
            column,
            message: "body is not valid UTF-8".to_string(),
        }
    })?;
    from_str(text)
}

/// A string read back from the tagged document.
pub(crate) enum Unmarked<'a> {
    Text(&'a str),
    NonFinite(f64),
}

/// Undo the tagging applied by the pre-pass.
pub(crate) fn unmark(text: &str) -> Unmarked<'_> {
    let Some(rest) = text.strip_prefix(MARKER) else {
        return Unmarked::Text(text);
    };
    if rest.starts_with(MARKER) {
        return Unmarked::Text(rest);
    }
    NON_FINITE
        .iter()
        .find(|(token, _)| *token == rest)
        .map_or(Unmarked::Text(text), |&(_, f)| Unmarked::NonFinite(f))
}

/// 1-based line and column of the byte that follows `prefix`.
fn position(prefix: &[u8]) -> (usize, usize) {
    let line = 1 + prefix.iter().filter(|&&b| b == b'\n').count();
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);
    (line, prefix.len() - line_start + 1)
}

/// The input with non-finite tokens rewritten as tagged strings.
struct Tagged<'a> {
    text: Cow<'a, str>,
    /// `(end, inserted)`: after byte `end` of `text`, `inserted` bytes have
    /// been added in total. Sorted by `end`.
    shifts: Vec<(usize, usize)>,
}

impl<'a> Tagged<'a> {
    fn new(input: &'a str) -> Self {
        let bytes = input.as_bytes();
        let mut out = String::new();
        let mut shifts = Vec::new();
        let mut copied = 0;
        let mut idx = 0;

        while idx < bytes.len() {
            if bytes[idx] == b'"' {
                let end = string_end(bytes, idx + 1);
                if starts_with_marker(&bytes[idx + 1..end]) {
                    out.push_str(&input[copied..=idx]);
                    out.push_str(MARKER_ESCAPE);
                    copied = idx + 1;
                    shifts.push((out.len(), out.len() - copied));
                }
                idx = end;
                continue;
            }
            match non_finite_at(bytes, idx) {
                Some(token) => {
                    out.push_str(&input[copied..idx]);
                    out.push('"');
                    out.push_str(MARKER_ESCAPE);
                    out.push_str(token);
                    out.push('"');
                    idx += token.len();
                    copied = idx;
                    shifts.push((out.len(), out.len() - copied));
                }
                None => idx += 1,
            }
        }

        if shifts.is_empty() {
            return Self {
                text: Cow::Borrowed(input),
                shifts,
            };
        }
        out.push_str(&input[copied..]);
        Self {
            text: Cow::Owned(out),
            shifts,
        }
    }

    fn error(&self, err: &serde_json::Error) -> Error {
        let (line, column) = (err.line(), err.column());
        let message = err.to_string();
        let message = message
            .strip_suffix(&format!(" at line {line} column {column}"))
            .unwrap_or(&message)
            .to_string();
        Error::Decode {
            line,
            column: self.original_column(line, column),
            message,
        }
    }

    /// Map a column in the rewritten text back to the input. Lines are
    /// unchanged since the pre-pass never inserts a newline.
    fn original_column(&self, line: usize, column: usize) -> usize {
        if self.shifts.is_empty() || line == 0 || column == 0 {
            return column;
        }
        let line_start = match line {
            1 => 0,
            n => self
                .text
                .match_indices('\n')
                .nth(n - 2)
                .map_or(self.text.len(), |(idx, _)| idx + 1),
        };
        let at = line_start + column - 1;
        let start = line_start - self.inserted_before(line_start);
        let at = at - self.inserted_before(at);
        at.saturating_sub(start) + 1
    }

    fn inserted_before(&self, pos: usize) -> usize {
        let count = self.shifts.partition_point(|&(end, _)| end <= pos);
        count
            .checked_sub(1)
            .map_or(0, |last| self.shifts[last].1)
    }
}

/// Index just past the closing quote of a string whose body starts at `idx`.
fn string_end(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'"' => return idx + 1,
            _ => idx += 1,
        }
    }
    bytes.len()
}

fn starts_with_marker(body: &[u8]) -> bool {
    let mut raw = [0; 4];
    body.starts_with(MARKER.encode_utf8(&mut raw).as_bytes())
        || body
            .get(..MARKER_ESCAPE.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(MARKER_ESCAPE.as_bytes()))
}

fn non_finite_at(bytes: &[u8], idx: usize) -> Option<&'static str> {
    if !matches!(bytes[idx], b'N' | b'I' | b'-') {
        return None;
    }
    if idx > 0 && is_word_byte(bytes[idx - 1]) {
        return None;
    }
    NON_FINITE.iter().map(|&(token, _)| token).find(|token| {
        bytes[idx..].starts_with(token.as_bytes())
            && bytes
                .get(idx + token.len())
                .is_none_or(|&next| !is_word_byte(next))
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'+' | b'-')
}
