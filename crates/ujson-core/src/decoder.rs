//! JSON decoder — turns JSON text into a [`Node`] tree.
//!
//! A single-pass recursive-descent scanner: there is no separate tokenizer,
//! lexing and tree construction are interleaved over one byte cursor. Every
//! node built by a parse carries the access policy requested by the caller.
//!
//! # Key design decisions
//!
//! - **Byte cursor over UTF-8**: every structural character is ASCII, so the
//!   cursor only ever stops on character boundaries when slicing keys, string
//!   bodies and number literals out of the input.
//! - **Escapes**: `\uXXXX` is decoded (surrogate pairs are combined), `\/`
//!   becomes `/`, and every other escape sequence is kept verbatim in the
//!   decoded string. The encoder writes strings back without re-escaping, so
//!   those sequences survive a parse/render round trip unchanged.
//! - **Strict framing**: members and elements must be separated by exactly one
//!   comma, trailing commas are rejected, and nothing but whitespace may follow
//!   the top-level value.
//! - **No recovery**: the first malformed token aborts the whole parse.

use crate::error::{JsonError, Result};
use crate::node::{upsert, Node};
use crate::types::{Access, Value};

/// Nesting deeper than this is rejected instead of risking the stack.
pub const MAX_DEPTH: usize = 256;

/// Parse `text` as exactly one JSON value, tagging every node with `access`.
///
/// # Example
/// ```
/// use ujson_core::{parse, Access};
///
/// let doc = parse(r#"{"a": 1, "b": [true, null, "x"]}"#, Access::All).unwrap();
/// assert_eq!(doc.get("a").unwrap().as_f64().unwrap(), 1.0);
/// assert_eq!(doc.get("b").unwrap().len(), 3);
/// ```
pub fn parse(text: &str, access: Access) -> Result<Node> {
    tracing::debug!(bytes = text.len(), %access, "parsing JSON text");
    let mut decoder = Decoder::new(text, access);
    let root = decoder.parse_value("")?;
    decoder.skip_whitespace();
    if decoder.pos < decoder.bytes.len() {
        return Err(decoder.error("unexpected content after the top-level value"));
    }
    tracing::trace!(kind = %root.kind(), "parse finished");
    Ok(root)
}

/// Like [`parse`], for callers whose input may be missing altogether.
/// `None` fails with [`JsonError::NullInput`] before any parsing happens.
pub fn parse_optional(text: Option<&str>, access: Access) -> Result<Node> {
    match text {
        Some(text) => parse(text, access),
        None => Err(JsonError::NullInput),
    }
}

struct Decoder<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    access: Access,
}

impl<'a> Decoder<'a> {
    fn new(text: &'a str, access: Access) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
            access,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consume `byte` if it is next.
    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> JsonError {
        JsonError::parse_at(self.text, self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> JsonError {
        JsonError::parse_at(self.text, offset, message)
    }

    fn unexpected(&self, expected: &str) -> JsonError {
        match self.text[self.pos..].chars().next() {
            Some(ch) => self.error(format!("unexpected character '{ch}', expected {expected}")),
            None => self.error(format!("unexpected end of input, expected {expected}")),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {MAX_DEPTH} levels")));
        }
        Ok(())
    }

    /// Dispatch on the lookahead character.
    fn parse_value(&mut self, key: &str) -> Result<Node> {
        self.skip_whitespace();
        let value = match self.peek() {
            Some(b'{') => return self.parse_object(key),
            Some(b'[') => return self.parse_array(key),
            Some(b'"') => Value::String(self.parse_string()?),
            Some(b'0'..=b'9' | b'-') => Value::Number(self.parse_number()?),
            Some(b't' | b'f') => Value::Boolean(self.parse_boolean()?),
            Some(b'n') => self.parse_null()?,
            _ => return Err(self.unexpected("a value")),
        };
        Ok(Node::new(key, self.access, value))
    }

    fn parse_object(&mut self, key: &str) -> Result<Node> {
        self.enter()?;
        self.pos += 1; // '{'
        let mut members = Vec::new();

        self.skip_whitespace();
        if !self.eat(b'}') {
            loop {
                self.skip_whitespace();
                if self.peek() != Some(b'"') {
                    return Err(self.unexpected("a quoted member name"));
                }
                let name = self.parse_string()?;
                self.skip_whitespace();
                if !self.eat(b':') {
                    return Err(self.unexpected("':' after a member name"));
                }
                // Duplicate names update the earlier member in place.
                upsert(&mut members, self.parse_value(&name)?);

                self.skip_whitespace();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b'}') => {
                        self.pos += 1;
                        break;
                    }
                    None => return Err(self.error("unterminated object")),
                    Some(_) => return Err(self.unexpected("',' or '}'")),
                }
            }
        }

        self.depth -= 1;
        Ok(Node::new(key, self.access, Value::Object(members)))
    }

    fn parse_array(&mut self, key: &str) -> Result<Node> {
        self.enter()?;
        self.pos += 1; // '['
        let mut items = Vec::new();

        self.skip_whitespace();
        if !self.eat(b']') {
            loop {
                items.push(self.parse_value("")?);
                self.skip_whitespace();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b']') => {
                        self.pos += 1;
                        break;
                    }
                    None => return Err(self.error("unterminated array")),
                    Some(_) => return Err(self.unexpected("',' or ']'")),
                }
            }
        }

        self.depth -= 1;
        Ok(Node::new(key, self.access, Value::Array(items)))
    }

    /// Scan to the closing quote and decode the body.
    fn parse_string(&mut self) -> Result<String> {
        let open = self.pos;
        self.pos += 1; // '"'
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => break,
                // The escaped character never closes the string.
                Some(b'\\') => self.pos += 2,
                Some(_) => self.pos += 1,
                None => return Err(self.error_at(open, "unterminated string")),
            }
        }
        let decoded = self.decode_escapes(start, self.pos)?;
        self.pos += 1; // '"'
        Ok(decoded)
    }

    /// Decode the raw string body `text[start..end]`.
    fn decode_escapes(&self, start: usize, end: usize) -> Result<String> {
        let raw = &self.text[start..end];
        let bytes = raw.as_bytes();
        let mut out = String::with_capacity(raw.len());
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'\\' {
                i += 1;
                continue;
            }
            match bytes.get(i + 1) {
                Some(b'u') => match hex4(raw, i + 2) {
                    Some(unit) => {
                        out.push_str(&raw[copied..i]);
                        let (ch, consumed) = self.decode_unicode(raw, i, unit, start)?;
                        out.push(ch);
                        i += consumed;
                        copied = i;
                    }
                    None => i += 2,
                },
                Some(b'/') => {
                    out.push_str(&raw[copied..i]);
                    out.push('/');
                    i += 2;
                    copied = i;
                }
                Some(_) => i += 2,
                None => i += 1,
            }
        }
        out.push_str(&raw[copied..]);
        Ok(out)
    }

    /// Decode the `\uXXXX` escape at `raw[at..]` whose code unit is `unit`,
    /// pulling in a following low surrogate when `unit` is a high one.
    /// Returns the character and the number of bytes consumed.
    fn decode_unicode(&self, raw: &str, at: usize, unit: u16, base: usize) -> Result<(char, usize)> {
        let unpaired = || self.error_at(base + at, format!("unpaired surrogate \\u{unit:04X}"));
        match unit {
            0xD800..=0xDBFF => {
                let low = raw
                    .get(at + 6..at + 8)
                    .filter(|marker| *marker == "\\u")
                    .and_then(|_| hex4(raw, at + 8));
                match low {
                    Some(low @ 0xDC00..=0xDFFF) => {
                        let code = 0x10000
                            + ((u32::from(unit) - 0xD800) << 10)
                            + (u32::from(low) - 0xDC00);
                        char::from_u32(code).map(|ch| (ch, 12)).ok_or_else(unpaired)
                    }
                    _ => Err(unpaired()),
                }
            }
            0xDC00..=0xDFFF => Err(unpaired()),
            _ => char::from_u32(u32::from(unit))
                .map(|ch| (ch, 6))
                .ok_or_else(unpaired),
        }
    }

    /// Optional `-`, digits and decimal points, then an optional exponent.
    fn parse_number(&mut self) -> Result<f64> {
        let start = self.pos;
        self.eat(b'-');
        while let Some(b'0'..=b'9' | b'.') = self.peek() {
            self.pos += 1;
        }
        if let Some(b'e' | b'E') = self.peek() {
            let mark = self.pos;
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            let digits = self.pos;
            while let Some(b'0'..=b'9') = self.peek() {
                self.pos += 1;
            }
            if self.pos == digits {
                self.pos = mark;
            }
        }

        let literal = &self.text[start..self.pos];
        match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            Ok(_) => Err(self.error_at(start, format!("number '{literal}' is out of range"))),
            Err(_) => Err(self.error_at(start, format!("invalid number '{literal}'"))),
        }
    }

    fn parse_boolean(&mut self) -> Result<bool> {
        let rest = &self.text[self.pos..];
        if rest.starts_with("true") {
            self.pos += 4;
            Ok(true)
        } else if rest.starts_with("false") {
            self.pos += 5;
            Ok(false)
        } else {
            Err(self.error("invalid literal, expected 'true' or 'false'"))
        }
    }

    fn parse_null(&mut self) -> Result<Value> {
        if self.text[self.pos..].starts_with("null") {
            self.pos += 4;
            Ok(Value::Null)
        } else {
            Err(self.error("invalid literal, expected 'null'"))
        }
    }
}

/// Four hex digits at `raw[at..at + 4]` as a UTF-16 code unit.
pub(crate) fn hex4(raw: &str, at: usize) -> Option<u16> {
    let digits = raw.get(at..at + 4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}
