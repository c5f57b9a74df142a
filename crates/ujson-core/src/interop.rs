//! Bridges to the serde ecosystem.
//!
//! `Node` implements [`serde::Serialize`], so any serde format can write a
//! tree (`serde_json::to_string(&node)` gives compact JSON). Going the other
//! way, [`Node::from_value`] builds a tree from a `serde_json::Value`; member
//! order survives because the workspace enables serde_json's `preserve_order`.
//!
//! Strings and keys inside a tree are held in the decoder's form: JSON escape
//! sequences other than `\uXXXX` and `\/` are kept as written. Serde works on
//! plain text, so escapes are resolved on the way out and re-applied on the
//! way in.

use crate::decoder::hex4;
use crate::node::Node;
use crate::types::{Access, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// Integral numbers below this magnitude serialize as integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value() {
            Value::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for member in members {
                    map.serialize_entry(&*unescape(member.key()), member)?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::String(s) => serializer.serialize_str(&unescape(s)),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

impl Node {
    /// Build a tree from a `serde_json::Value`, tagging every node with `access`.
    pub fn from_value(value: serde_json::Value, access: Access) -> Node {
        from_json_value("", value, access)
    }
}

fn from_json_value(key: &str, value: serde_json::Value, access: Access) -> Node {
    use serde_json::Value as Json;

    let payload = match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Boolean(b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
        Json::String(s) => Value::String(escape(s)),
        Json::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| from_json_value("", item, access))
                .collect(),
        ),
        Json::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| from_json_value(&escape(k), v, access))
                .collect(),
        ),
    };
    Node::new(key, access, payload)
}

/// Resolve the escape sequences the decoder leaves in place.
/// Unrecognized or incomplete sequences are kept as written.
fn unescape(stored: &str) -> Cow<'_, str> {
    if !stored.contains('\\') {
        return Cow::Borrowed(stored);
    }
    let mut out = String::with_capacity(stored.len());
    let mut rest = stored;
    while let Some(at) = rest.find('\\') {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];
        let (decoded, consumed) = match tail.as_bytes().get(1) {
            Some(b'n') => (Some('\n'), 2),
            Some(b't') => (Some('\t'), 2),
            Some(b'r') => (Some('\r'), 2),
            Some(b'b') => (Some('\u{8}'), 2),
            Some(b'f') => (Some('\u{c}'), 2),
            Some(b'"') => (Some('"'), 2),
            Some(b'\\') => (Some('\\'), 2),
            Some(b'/') => (Some('/'), 2),
            Some(b'u') => match hex4(tail, 2).and_then(|unit| char::from_u32(u32::from(unit))) {
                Some(ch) => (Some(ch), 6),
                None => (None, 1),
            },
            _ => (None, 1),
        };
        match decoded {
            Some(ch) => out.push(ch),
            None => out.push_str(&tail[..consumed]),
        }
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Put plain text into the stored form: quotes, backslashes and control
/// characters become escape sequences.
fn escape(text: String) -> String {
    if !text.chars().any(|ch| ch == '"' || ch == '\\' || ch < ' ') {
        return text;
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ch if ch < ' ' => out.push_str(&format!("\\u{:04x}", u32::from(ch))),
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_integral_numbers_as_integers() {
        assert_eq!(serde_json::to_string(&Node::number(3.0)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Node::number(2.5)).unwrap(), "2.5");
    }

    #[test]
    fn from_value_keeps_member_order() {
        let node = Node::from_value(json!({"z": 1, "a": [true, null]}), Access::ValueOnly);
        let keys: Vec<&str> = node.keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(node.path("a.0").unwrap().access(), Access::ValueOnly);
    }

    #[test]
    fn serialize_back_to_value() {
        let original = json!({"name": "x", "tags": ["a", "b"], "n": null, "ok": false});
        let node = Node::from_value(original.clone(), Access::All);
        assert_eq!(serde_json::to_value(&node).unwrap(), original);
    }

    #[test]
    fn unescape_standard_sequences() {
        assert_eq!(unescape(r#"a\nb\t\"q\"\\\/"#), "a\nb\t\"q\"\\/");
        assert_eq!(unescape(r"\b\f\r"), "\u{8}\u{c}\r");
    }

    #[test]
    fn unescape_unicode_and_incomplete_sequences() {
        assert_eq!(unescape(r"\u0001x"), "\u{1}x");
        assert_eq!(unescape(r"\u12"), r"\u12");
        assert_eq!(unescape(r"\q"), r"\q");
        assert_eq!(unescape("end\\"), "end\\");
    }

    #[test]
    fn unescape_borrows_plain_text() {
        assert!(matches!(unescape("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape("say \"hi\"".to_string()), r#"say \"hi\""#);
        assert_eq!(escape("a\\b\nc\td".to_string()), r"a\\b\nc\td");
        assert_eq!(escape("\u{1}".to_string()), r"\u0001");
        assert_eq!(escape("plain".to_string()), "plain");
    }

    #[test]
    fn escape_then_unescape_restores_text() {
        let text = "q\"\\\n\r\t\u{8}\u{c}\u{1f} caf\u{e9}";
        assert_eq!(unescape(&escape(text.to_string())), text);
    }
}
