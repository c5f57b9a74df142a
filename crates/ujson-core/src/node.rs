//! The document tree: lookup, access-checked mutation, and typed accessors.
//!
//! A [`Node`] owns its children outright. Replacing a child with a value of a
//! different kind is done by the parent overwriting the slot, so a node's kind
//! never changes in place.
//!
//! Every mutating method checks the access policy of the node it is called on
//! and either completes fully or returns an error with the tree untouched.
//! Children are handed out for editing only as [`NodeMut`] handles, which
//! expose the same checked methods and never a `&mut Node`.

use crate::error::{JsonError, Result};
use crate::types::{Access, Input, Kind, Selector, Value};
use std::ops::Deref;

/// A single value in a JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: String,
    access: Access,
    value: Value,
}

impl Node {
    pub(crate) fn new(key: impl Into<String>, access: Access, value: Value) -> Self {
        Self {
            key: key.into(),
            access,
            value,
        }
    }

    /// An empty object, the usual root for a programmatically built tree.
    pub fn object(access: Access) -> Self {
        Self::new("", access, Value::Object(Vec::new()))
    }

    /// An empty array.
    pub fn array(access: Access) -> Self {
        Self::new("", access, Value::Array(Vec::new()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new("", Access::All, Value::String(value.into()))
    }

    pub fn number(value: f64) -> Self {
        Self::new("", Access::All, Value::Number(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new("", Access::All, Value::Boolean(value))
    }

    pub fn null() -> Self {
        Self::new("", Access::All, Value::Null)
    }

    /// Re-tag this node and all of its descendants with `access`.
    ///
    /// Consumes the node: policy is fixed once a node is part of a tree.
    pub fn with_access(mut self, access: Access) -> Self {
        self.stamp(access);
        self
    }

    /// Build a node from an insert/update value. Adopted nodes take the slot's
    /// key and the parent's policy.
    pub(crate) fn from_input(key: &str, input: Input, access: Access) -> Self {
        let value = match input {
            Input::Number(n) => Value::Number(n),
            Input::String(s) => Value::String(s),
            Input::Boolean(b) => Value::Boolean(b),
            Input::Null => Value::Null,
            Input::Node(mut node) => {
                node.key = key.to_string();
                node.stamp(access);
                return node;
            }
            Input::Array(nodes) => Value::Array(
                nodes
                    .into_iter()
                    .map(|node| Node::from_input("", Input::Node(node), access))
                    .collect(),
            ),
        };
        Self::new(key, access, value)
    }

    fn stamp(&mut self, access: Access) {
        self.access = access;
        if let Value::Object(children) | Value::Array(children) = &mut self.value {
            for child in children {
                child.stamp(access);
            }
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// The member name inside the parent object; empty for array elements and roots.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Object members or array elements; empty for scalars.
    pub fn children(&self) -> &[Node] {
        match &self.value {
            Value::Object(children) | Value::Array(children) => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> &mut [Node] {
        match &mut self.value {
            Value::Object(children) | Value::Array(children) => children,
            _ => &mut [],
        }
    }

    /// Number of members or elements; zero for scalars.
    pub fn len(&self) -> usize {
        self.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Member names of an object in order; empty for any other kind.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let members: &[Node] = match &self.value {
            Value::Object(children) => children,
            _ => &[],
        };
        members.iter().map(|child| child.key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    pub fn is_number(&self) -> bool {
        self.kind() == Kind::Number
    }

    pub fn is_boolean(&self) -> bool {
        self.kind() == Kind::Boolean
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    fn convert_error(&self, expected: Kind) -> JsonError {
        JsonError::Convert(format!("expected {expected}, found {}", self.kind()))
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self.value {
            Value::Number(n) => Ok(n),
            _ => Err(self.convert_error(Kind::Number)),
        }
    }

    pub fn as_f32(&self) -> Result<f32> {
        self.as_f64().map(|n| n as f32)
    }

    /// The number truncated toward zero (saturating at the `i64` range).
    pub fn as_i64(&self) -> Result<i64> {
        self.as_f64().map(|n| n as i64)
    }

    /// The number truncated toward zero (saturating at the `i32` range).
    pub fn as_i32(&self) -> Result<i32> {
        self.as_f64().map(|n| n as i32)
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            Value::String(s) => Ok(s.as_str()),
            _ => Err(self.convert_error(Kind::String)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.value {
            Value::Boolean(b) => Ok(b),
            _ => Err(self.convert_error(Kind::Boolean)),
        }
    }

    pub fn as_array(&self) -> Result<&[Node]> {
        match &self.value {
            Value::Array(items) => Ok(items.as_slice()),
            _ => Err(self.convert_error(Kind::Array)),
        }
    }

    pub fn as_object(&self) -> Result<&[Node]> {
        match &self.value {
            Value::Object(members) => Ok(members.as_slice()),
            _ => Err(self.convert_error(Kind::Object)),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Slot index of the child addressed by `selector`.
    fn locate(&self, selector: Selector<'_>) -> Result<usize> {
        match (&self.value, selector) {
            (Value::Object(children), Selector::Key(key)) => children
                .iter()
                .position(|child| child.key == key)
                .ok_or_else(|| JsonError::Indexing(format!("key \"{key}\" not found"))),
            (Value::Array(items), Selector::Position(pos)) => checked_position(pos, items.len()),
            (_, selector) => Err(JsonError::Indexing(format!(
                "a {} node cannot be indexed by {selector}",
                self.kind()
            ))),
        }
    }

    /// The child at `selector`: a key on objects, a position on arrays.
    pub fn get<'s>(&self, selector: impl Into<Selector<'s>>) -> Result<&Node> {
        let slot = self.locate(selector.into())?;
        Ok(&self.children()[slot])
    }

    /// An editing handle on the child at `selector`.
    pub fn get_mut<'s>(&mut self, selector: impl Into<Selector<'s>>) -> Result<NodeMut<'_>> {
        self.child_mut(selector.into()).map(NodeMut::new)
    }

    pub(crate) fn child_mut(&mut self, selector: Selector<'_>) -> Result<&mut Node> {
        let slot = self.locate(selector)?;
        Ok(&mut self.children_mut()[slot])
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    fn require_value_update(&self, op: &str) -> Result<()> {
        if self.access.allows_value_update() {
            return Ok(());
        }
        tracing::debug!(op, key = %self.key, "mutation rejected: node is immutable");
        Err(JsonError::Access(format!("cannot {op}: node is immutable")))
    }

    /// Check that a structural change is allowed and hand out the child vector.
    fn structural_children(&mut self, op: &str, expected: Kind) -> Result<&mut Vec<Node>> {
        if !self.access.allows_structural_change() {
            tracing::debug!(op, key = %self.key, access = %self.access, "structural change rejected");
            return Err(JsonError::Access(format!(
                "cannot {op}: node access is {}, structural changes need all",
                self.access
            )));
        }
        let kind = self.kind();
        match (&mut self.value, expected) {
            (Value::Object(children), Kind::Object) | (Value::Array(children), Kind::Array) => {
                Ok(children)
            }
            _ => Err(JsonError::Type(format!(
                "cannot {op} a {kind} node, expected {expected}"
            ))),
        }
    }

    /// Indexed assignment.
    ///
    /// On an object, an existing key has its value replaced (the kind may
    /// change); a missing key is appended under `All` and refused with an
    /// indexing error under `ValueOnly`. On an array, the element at the
    /// position is overwritten.
    pub fn set<'s>(
        &mut self,
        selector: impl Into<Selector<'s>>,
        value: impl Into<Input>,
    ) -> Result<&mut Self> {
        let selector = selector.into();
        self.require_value_update("set")?;
        let access = self.access;
        let kind = self.kind();
        match (&mut self.value, selector) {
            (Value::Object(children), Selector::Key(key)) => {
                let existing = children.iter().position(|child| child.key == key);
                match existing {
                    Some(slot) => children[slot] = Node::from_input(key, value.into(), access),
                    None if access.allows_structural_change() => {
                        children.push(Node::from_input(key, value.into(), access));
                    }
                    None => {
                        return Err(JsonError::Indexing(format!(
                            "key \"{key}\" not found and access {access} does not allow adding it"
                        )))
                    }
                }
            }
            (Value::Array(items), Selector::Position(pos)) => {
                let slot = checked_position(pos, items.len())?;
                items[slot] = Node::from_input("", value.into(), access);
            }
            (_, selector) => {
                return Err(JsonError::Indexing(format!(
                    "a {kind} node cannot be indexed by {selector}"
                )))
            }
        }
        Ok(self)
    }

    /// Add a member to an object, or update it if the key already exists.
    pub fn add(&mut self, key: &str, value: impl Into<Input>) -> Result<&mut Self> {
        let access = self.access;
        let children = self.structural_children("add a member to", Kind::Object)?;
        upsert(children, Node::from_input(key, value.into(), access));
        Ok(self)
    }

    /// Add an empty object member and return it for further building.
    pub fn add_object(&mut self, key: &str) -> Result<NodeMut<'_>> {
        let access = self.access;
        let children = self.structural_children("add an object to", Kind::Object)?;
        Ok(NodeMut::new(upsert(
            children,
            Node::new(key, access, Value::Object(Vec::new())),
        )))
    }

    /// Add an object member populated from `(key, value)` pairs.
    pub fn add_object_with<I, K, V>(&mut self, key: &str, members: I) -> Result<NodeMut<'_>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Input>,
    {
        let access = self.access;
        let children = self.structural_children("add an object to", Kind::Object)?;
        let mut built = Vec::new();
        for (member_key, value) in members {
            upsert(
                &mut built,
                Node::from_input(member_key.as_ref(), value.into(), access),
            );
        }
        Ok(NodeMut::new(upsert(
            children,
            Node::new(key, access, Value::Object(built)),
        )))
    }

    /// Add an empty array member and return it for further building.
    pub fn add_array(&mut self, key: &str) -> Result<NodeMut<'_>> {
        let access = self.access;
        let children = self.structural_children("add an array to", Kind::Object)?;
        Ok(NodeMut::new(upsert(
            children,
            Node::new(key, access, Value::Array(Vec::new())),
        )))
    }

    /// Add an array member populated from `items`.
    pub fn add_array_with<I, V>(&mut self, key: &str, items: I) -> Result<NodeMut<'_>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Input>,
    {
        let access = self.access;
        let children = self.structural_children("add an array to", Kind::Object)?;
        let built = items
            .into_iter()
            .map(|item| Node::from_input("", item.into(), access))
            .collect();
        Ok(NodeMut::new(upsert(
            children,
            Node::new(key, access, Value::Array(built)),
        )))
    }

    /// Append an element to an array.
    pub fn push(&mut self, value: impl Into<Input>) -> Result<&mut Self> {
        let access = self.access;
        let items = self.structural_children("push onto", Kind::Array)?;
        items.push(Node::from_input("", value.into(), access));
        Ok(self)
    }

    /// Remove the member named `key`, returning it. A missing key is not an error.
    pub fn remove(&mut self, key: &str) -> Result<Option<Node>> {
        let children = self.structural_children("remove a member from", Kind::Object)?;
        Ok(children
            .iter()
            .position(|child| child.key == key)
            .map(|slot| children.remove(slot)))
    }

    /// Update a scalar in place.
    ///
    /// Only number, string and boolean nodes can be updated, and only with a
    /// value of the same kind; numbers accept any numeric source.
    pub fn update(&mut self, value: impl Into<Input>) -> Result<&mut Self> {
        self.require_value_update("update")?;
        let kind = self.kind();
        let input: Input = value.into();
        match (&mut self.value, input) {
            (Value::Number(n), Input::Number(v))
            | (
                Value::Number(n),
                Input::Node(Node {
                    value: Value::Number(v),
                    ..
                }),
            ) => *n = v,
            (Value::String(s), Input::String(v))
            | (
                Value::String(s),
                Input::Node(Node {
                    value: Value::String(v),
                    ..
                }),
            ) => *s = v,
            (Value::Boolean(b), Input::Boolean(v))
            | (
                Value::Boolean(b),
                Input::Node(Node {
                    value: Value::Boolean(v),
                    ..
                }),
            ) => *b = v,
            _ if !kind.is_scalar() => {
                return Err(JsonError::Type(format!(
                    "a {kind} node cannot be updated in place"
                )))
            }
            (_, input) => {
                return Err(JsonError::Convert(format!(
                    "cannot update a {kind} node with a {} value",
                    input.kind()
                )))
            }
        }
        Ok(self)
    }

    /// Keyed update.
    ///
    /// On an object, the existing member is replaced by a node built from
    /// `value`, which may be of a different kind; a missing key is an
    /// indexing error. Anywhere else this is [`Node::update`] on the child at
    /// `selector`.
    pub fn update_child<'s>(
        &mut self,
        selector: impl Into<Selector<'s>>,
        value: impl Into<Input>,
    ) -> Result<&mut Self> {
        let selector = selector.into();
        self.require_value_update("update")?;
        if let (Kind::Object, Selector::Key(key)) = (self.kind(), selector) {
            let slot = self.locate(selector)?;
            let replacement = Node::from_input(key, value.into(), self.access);
            self.children_mut()[slot] = replacement;
        } else {
            self.child_mut(selector)?.update(value)?;
        }
        Ok(self)
    }
}

/// An editing handle on a node inside a tree.
///
/// Reads go through `Deref<Target = Node>`. Edits are limited to the
/// access-checked methods below, so a child can never be overwritten
/// wholesale or re-tagged with a different policy:
///
/// ```compile_fail
/// use ujson_core::{parse, Access, Node};
/// let mut doc = parse(r#"{"a": 1}"#, Access::Immutable).unwrap();
/// *doc.get_mut("a").unwrap() = Node::object(Access::All);
/// ```
#[derive(Debug)]
pub struct NodeMut<'a> {
    node: &'a mut Node,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(node: &'a mut Node) -> Self {
        Self { node }
    }

    pub fn get_mut<'s>(&mut self, selector: impl Into<Selector<'s>>) -> Result<NodeMut<'_>> {
        self.node.get_mut(selector)
    }

    pub fn path_mut(&mut self, path: &str) -> Result<NodeMut<'_>> {
        self.node.path_mut(path)
    }

    /// See [`Node::set`].
    pub fn set<'s>(
        &mut self,
        selector: impl Into<Selector<'s>>,
        value: impl Into<Input>,
    ) -> Result<&mut Self> {
        self.node.set(selector, value)?;
        Ok(self)
    }

    pub fn set_path(&mut self, path: &str, value: impl Into<Input>) -> Result<&mut Self> {
        self.node.set_path(path, value)?;
        Ok(self)
    }

    pub fn add(&mut self, key: &str, value: impl Into<Input>) -> Result<&mut Self> {
        self.node.add(key, value)?;
        Ok(self)
    }

    pub fn add_object(&mut self, key: &str) -> Result<NodeMut<'_>> {
        self.node.add_object(key)
    }

    pub fn add_object_with<I, K, V>(&mut self, key: &str, members: I) -> Result<NodeMut<'_>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Input>,
    {
        self.node.add_object_with(key, members)
    }

    pub fn add_array(&mut self, key: &str) -> Result<NodeMut<'_>> {
        self.node.add_array(key)
    }

    pub fn add_array_with<I, V>(&mut self, key: &str, items: I) -> Result<NodeMut<'_>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Input>,
    {
        self.node.add_array_with(key, items)
    }

    pub fn push(&mut self, value: impl Into<Input>) -> Result<&mut Self> {
        self.node.push(value)?;
        Ok(self)
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Node>> {
        self.node.remove(key)
    }

    pub fn remove_path(&mut self, path: &str) -> Result<Option<Node>> {
        self.node.remove_path(path)
    }

    /// See [`Node::update`].
    pub fn update(&mut self, value: impl Into<Input>) -> Result<&mut Self> {
        self.node.update(value)?;
        Ok(self)
    }

    pub fn update_child<'s>(
        &mut self,
        selector: impl Into<Selector<'s>>,
        value: impl Into<Input>,
    ) -> Result<&mut Self> {
        self.node.update_child(selector, value)?;
        Ok(self)
    }
}

impl Deref for NodeMut<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

/// Insert `node` into an object's members, replacing any member with the same key.
pub(crate) fn upsert(children: &mut Vec<Node>, node: Node) -> &mut Node {
    let slot = match children.iter().position(|child| child.key == node.key) {
        Some(slot) => {
            children[slot] = node;
            slot
        }
        None => {
            children.push(node);
            children.len() - 1
        }
    };
    &mut children[slot]
}

fn checked_position(pos: i64, len: usize) -> Result<usize> {
    usize::try_from(pos)
        .ok()
        .filter(|&slot| slot < len)
        .ok_or_else(|| {
            JsonError::Indexing(format!("position {pos} out of range for length {len}"))
        })
}
