//! Dotted paths: address a descendant by a chain of keys and positions.
//!
//! # Path syntax
//!
//! - `""` -- the node itself
//! - `"name"` -- member `name` of an object
//! - `"items.0"` -- first element of the array under `items`
//! - `"items.0.id"` -- member `id` inside that element
//!
//! A segment is read as a key when the node it applies to is an object and as
//! a base-10 position when it is an array. Keys containing `.` cannot be
//! addressed.
//!
//! Mutation through a path is parent-mediated: the prefix is resolved first
//! and the final segment is handed to the parent's own `set` or `remove`, so
//! the parent's access policy decides.

use crate::error::{JsonError, Result};
use crate::node::{Node, NodeMut};
use crate::types::{Input, Kind, Selector};

/// A parsed path, split on dots.
#[derive(Debug, Clone)]
struct Path<'a> {
    source: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> Path<'a> {
    fn parse(source: &'a str) -> Self {
        let segments = if source.is_empty() {
            Vec::new()
        } else {
            source.split('.').collect()
        };
        Self { source, segments }
    }

    /// Split off the final segment. `None` for the empty path.
    fn split_last(&self) -> Option<(Path<'a>, &'a str)> {
        let (last, init) = self.segments.split_last()?;
        // Drop the last segment and the dot before it.
        let prefix_end = self.source.len().saturating_sub(last.len() + 1);
        Some((
            Path {
                source: &self.source[..prefix_end],
                segments: init.to_vec(),
            },
            *last,
        ))
    }

    fn error(&self, err: JsonError) -> JsonError {
        match err {
            JsonError::Indexing(message) => {
                JsonError::Indexing(format!("{message} (path \"{}\")", self.source))
            }
            other => other,
        }
    }
}

/// Interpret `segment` against `node`'s kind.
fn selector_for<'s>(node: &Node, segment: &'s str) -> Result<Selector<'s>> {
    match node.kind() {
        Kind::Object => Ok(Selector::Key(segment)),
        Kind::Array => segment
            .parse::<i64>()
            .map(Selector::Position)
            .map_err(|_| JsonError::Indexing(format!("segment \"{segment}\" is not an array position"))),
        kind => Err(JsonError::Indexing(format!(
            "cannot descend into a {kind} node at segment \"{segment}\""
        ))),
    }
}

impl Node {
    /// Resolve a dotted path below this node.
    ///
    /// ```
    /// use ujson_core::{parse, Access};
    /// let doc = parse(r#"{"items": [{"id": 7}]}"#, Access::All).unwrap();
    /// assert_eq!(doc.path("items.0.id").unwrap().as_i64().unwrap(), 7);
    /// ```
    pub fn path(&self, path: &str) -> Result<&Node> {
        let parsed = Path::parse(path);
        let mut current = self;
        for segment in &parsed.segments {
            let selector = selector_for(current, segment).map_err(|e| parsed.error(e))?;
            current = current.get(selector).map_err(|e| parsed.error(e))?;
        }
        Ok(current)
    }

    /// An editing handle on the node at a dotted path.
    pub fn path_mut(&mut self, path: &str) -> Result<NodeMut<'_>> {
        self.resolve_mut(path).map(NodeMut::new)
    }

    fn resolve_mut(&mut self, path: &str) -> Result<&mut Node> {
        let parsed = Path::parse(path);
        let mut current = self;
        for segment in &parsed.segments {
            let selector = selector_for(current, segment).map_err(|e| parsed.error(e))?;
            current = current.child_mut(selector).map_err(|e| parsed.error(e))?;
        }
        Ok(current)
    }

    /// Indexed assignment at a path: the parent of the last segment performs a
    /// [`Node::set`] with it.
    pub fn set_path(&mut self, path: &str, value: impl Into<Input>) -> Result<&mut Self> {
        let parsed = Path::parse(path);
        let (prefix, last) = parsed
            .split_last()
            .ok_or_else(|| JsonError::Indexing("cannot set the empty path".to_string()))?;
        let parent = self.resolve_mut(prefix.source)?;
        let selector = selector_for(parent, last).map_err(|e| parsed.error(e))?;
        parent.set(selector, value).map_err(|e| parsed.error(e))?;
        Ok(self)
    }

    /// Remove the object member at a path, returning it.
    pub fn remove_path(&mut self, path: &str) -> Result<Option<Node>> {
        let parsed = Path::parse(path);
        let (prefix, last) = parsed
            .split_last()
            .ok_or_else(|| JsonError::Indexing("cannot remove the empty path".to_string()))?;
        self.resolve_mut(prefix.source)?.remove(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_path() {
        assert!(Path::parse("").segments.is_empty());
    }

    #[test]
    fn parse_segments() {
        assert_eq!(Path::parse("a.0.b").segments, vec!["a", "0", "b"]);
    }

    #[test]
    fn split_last_prefix() {
        let path = Path::parse("a.b.c");
        let (prefix, last) = path.split_last().unwrap();
        assert_eq!(prefix.source, "a.b");
        assert_eq!(prefix.segments, vec!["a", "b"]);
        assert_eq!(last, "c");

        let single = Path::parse("a");
        let (prefix, last) = single.split_last().unwrap();
        assert_eq!(prefix.source, "");
        assert!(prefix.segments.is_empty());
        assert_eq!(last, "a");
    }

    #[test]
    fn selector_on_scalar_fails() {
        let node = Node::number(1.0);
        assert!(matches!(
            selector_for(&node, "x"),
            Err(JsonError::Indexing(_))
        ));
    }
}
