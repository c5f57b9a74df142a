//! JSON encoder — renders a [`Node`] tree as indented JSON text.
//!
//! Output is pretty-printed with a fixed 2-space indent per level:
//!
//! - **Objects**: one `"key": value` member per line, `,` after every member
//!   except the last, closing brace one level shallower than the members
//! - **Arrays**: one element per line; nested containers are indented one
//!   level deeper
//! - **Empty containers**: `{}` and `[]` with no inner newline
//! - **Scalars**: `"key": value` when the node is an object member, a bare
//!   value otherwise (array elements and parse roots)
//!
//! No trailing newline is emitted. String contents are written between quotes
//! exactly as stored; escape sequences kept by the decoder therefore come back
//! out verbatim, while characters that were decoded from `\u` escapes are not
//! re-escaped.
//!
//! # Example
//! ```
//! use ujson_core::{parse, Access};
//! let doc = parse(r#"{"a":1,"b":[true,null]}"#, Access::All).unwrap();
//! assert_eq!(doc.render(), "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    null\n  ]\n}");
//! ```

use crate::node::Node;
use crate::types::Value;
use std::fmt;

/// Render `node` at depth 0. Same as [`Node::render`].
pub fn render(node: &Node) -> String {
    node.render()
}

impl Node {
    /// Render this node as pretty-printed JSON.
    pub fn render(&self) -> String {
        self.render_at(0)
    }

    /// Render as if nested `depth` levels deep: inner lines and the closing
    /// delimiter are indented accordingly, the first line is not.
    pub fn render_at(&self, depth: usize) -> String {
        let mut out = String::new();
        match self.value() {
            Value::Object(_) | Value::Array(_) => encode_value(self.value(), depth, &mut out),
            _ if !self.key().is_empty() => encode_member(self, depth, &mut out),
            scalar => encode_value(scalar, depth, &mut out),
        }
        out
    }

    /// Render only the value, dropping the member key of a keyed scalar.
    pub fn render_value(&self) -> String {
        let mut out = String::new();
        encode_value(self.value(), 0, &mut out);
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Emit `"key": value` for an object member sitting at `depth`.
fn encode_member(member: &Node, depth: usize, out: &mut String) {
    out.push('"');
    out.push_str(member.key());
    out.push_str("\": ");
    encode_value(member.value(), depth, out);
}

fn encode_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Object(members) => encode_object(members, depth, out),
        Value::Array(items) => encode_array(items, depth, out),
        Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
    }
}

fn encode_object(members: &[Node], depth: usize, out: &mut String) {
    if members.is_empty() {
        out.push_str("{}");
        return;
    }
    let indent = make_indent(depth + 1);
    out.push_str("{\n");
    for (i, member) in members.iter().enumerate() {
        out.push_str(&indent);
        encode_member(member, depth + 1, out);
        if i + 1 < members.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&make_indent(depth));
    out.push('}');
}

fn encode_array(items: &[Node], depth: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    let indent = make_indent(depth + 1);
    out.push_str("[\n");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&indent);
        encode_value(item.value(), depth + 1, out);
        if i + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&make_indent(depth));
    out.push(']');
}

/// Shortest decimal form, never an exponent. `-0` prints as `0`; NaN and
/// infinities (only reachable by building a tree by hand) print as `null`.
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".to_string();
    }
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{n}")
}

/// Generate a 2-space-per-level indentation string.
fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
