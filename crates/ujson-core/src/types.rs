//! Value-level types shared by the parser, the tree, and the serializer.
//!
//! - [`Access`]: mutation permission carried by every node
//! - [`Kind`]: the closed set of JSON value kinds
//! - [`Value`]: a node's kind-specific payload
//! - [`Input`]: anything that can be coerced into a node on insert/update
//! - [`Selector`]: an object key or an array position

use crate::node::Node;
use std::fmt;

/// Mutation permission of a node.
///
/// Assigned once when a tree is parsed or constructed and copied to every
/// child created afterwards.
///
/// | level | scalar update | structural add/remove |
/// |---|---|---|
/// | `Immutable` | rejected | rejected |
/// | `ValueOnly` | permitted | rejected |
/// | `All` | permitted | permitted |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    Immutable,
    ValueOnly,
    #[default]
    All,
}

impl Access {
    /// True unless the policy is `Immutable`.
    pub fn allows_value_update(self) -> bool {
        !matches!(self, Access::Immutable)
    }

    /// True only for `All`.
    pub fn allows_structural_change(self) -> bool {
        matches!(self, Access::All)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Immutable => "immutable",
            Access::ValueOnly => "value-only",
            Access::All => "all",
        })
    }
}

/// The kind of a JSON node. Never changes after the node is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl Kind {
    /// Scalar kinds are the ones `update` can change in place.
    pub fn is_scalar(self) -> bool {
        matches!(self, Kind::String | Kind::Number | Kind::Boolean)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a [`Node`].
///
/// Object children carry their own key; array elements carry an empty one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Keyed children in insertion order. Keys are unique.
    Object(Vec<Node>),
    /// Unkeyed elements in insertion order.
    Array(Vec<Node>),
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::String(_) => Kind::String,
            Value::Number(_) => Kind::Number,
            Value::Boolean(_) => Kind::Boolean,
            Value::Null => Kind::Null,
        }
    }
}

/// A value handed to an insert or update operation, before it becomes a node.
///
/// Numbers of every primitive width become `Number`, text becomes `String`,
/// `()` and `None` become `Null`, an existing [`Node`] is adopted as is, and a
/// `Vec<Node>` becomes an `Array`.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Node(Node),
    Array(Vec<Node>),
}

impl Input {
    /// The kind of node this input turns into.
    pub fn kind(&self) -> Kind {
        match self {
            Input::Number(_) => Kind::Number,
            Input::String(_) => Kind::String,
            Input::Boolean(_) => Kind::Boolean,
            Input::Null => Kind::Null,
            Input::Node(node) => node.kind(),
            Input::Array(_) => Kind::Array,
        }
    }
}

macro_rules! input_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Input {
                fn from(n: $t) -> Self {
                    Input::Number(n as f64)
                }
            }
        )*
    };
}

input_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::String(s.to_string())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::String(s)
    }
}

impl From<&String> for Input {
    fn from(s: &String) -> Self {
        Input::String(s.clone())
    }
}

impl From<bool> for Input {
    fn from(b: bool) -> Self {
        Input::Boolean(b)
    }
}

impl From<()> for Input {
    fn from(_: ()) -> Self {
        Input::Null
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(value: Option<T>) -> Self {
        value.map_or(Input::Null, Into::into)
    }
}

impl From<Node> for Input {
    fn from(node: Node) -> Self {
        Input::Node(node)
    }
}

impl From<Vec<Node>> for Input {
    fn from(nodes: Vec<Node>) -> Self {
        Input::Array(nodes)
    }
}

/// Addresses a child: a key on objects, a position on arrays.
///
/// Positions are signed so that a negative index reaches the bounds check and
/// fails with an indexing error instead of being unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Key(&'a str),
    Position(i64),
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Key(key) => write!(f, "key \"{key}\""),
            Selector::Position(pos) => write!(f, "position {pos}"),
        }
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(key: &'a str) -> Self {
        Selector::Key(key)
    }
}

impl<'a> From<&'a String> for Selector<'a> {
    fn from(key: &'a String) -> Self {
        Selector::Key(key.as_str())
    }
}

macro_rules! selector_from_position {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Selector<'_> {
                fn from(pos: $t) -> Self {
                    Selector::Position(i64::try_from(pos).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

selector_from_position!(i32, i64, isize, u32, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_table() {
        assert!(!Access::Immutable.allows_value_update());
        assert!(!Access::Immutable.allows_structural_change());
        assert!(Access::ValueOnly.allows_value_update());
        assert!(!Access::ValueOnly.allows_structural_change());
        assert!(Access::All.allows_value_update());
        assert!(Access::All.allows_structural_change());
    }

    #[test]
    fn default_access_is_all() {
        assert_eq!(Access::default(), Access::All);
    }

    #[test]
    fn numeric_inputs_become_numbers() {
        assert_eq!(Input::from(3i32), Input::Number(3.0));
        assert_eq!(Input::from(3u64), Input::Number(3.0));
        assert_eq!(Input::from(1.5f32), Input::Number(1.5));
        assert_eq!(Input::from(-2.25f64), Input::Number(-2.25));
    }

    #[test]
    fn absent_inputs_become_null() {
        assert_eq!(Input::from(()), Input::Null);
        assert_eq!(Input::from(None::<i32>), Input::Null);
        assert_eq!(Input::from(Some("x")), Input::String("x".to_string()));
    }

    #[test]
    fn selector_conversions() {
        assert_eq!(Selector::from("a"), Selector::Key("a"));
        assert_eq!(Selector::from(-1i32), Selector::Position(-1));
        assert_eq!(Selector::from(7usize), Selector::Position(7));
    }

    #[test]
    fn kind_scalar_classification() {
        assert!(Kind::Number.is_scalar());
        assert!(Kind::String.is_scalar());
        assert!(Kind::Boolean.is_scalar());
        assert!(!Kind::Null.is_scalar());
        assert!(!Kind::Array.is_scalar());
        assert!(!Kind::Object.is_scalar());
    }
}
