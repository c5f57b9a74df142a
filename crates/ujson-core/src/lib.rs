//! # ujson-core
//!
//! A small JSON document model: parse text into an owned tree, navigate and
//! edit it under an access policy, and render it back as indented JSON.
//!
//! Every node carries an [`Access`] level fixed when the tree is built:
//!
//! | level | scalar update | structural add/remove |
//! |---|---|---|
//! | `Immutable` | rejected | rejected |
//! | `ValueOnly` | permitted | rejected |
//! | `All` | permitted | permitted |
//!
//! ## Quick start
//!
//! ```rust
//! use ujson_core::{parse, Access, JsonError, Node};
//!
//! // Text → tree → text
//! let mut doc = parse(r#"{"name": "Alice", "scores": [95, 87]}"#, Access::All).unwrap();
//! doc.update_child("name", "Bob").unwrap();
//! doc.get_mut("scores").unwrap().push(92).unwrap();
//! assert_eq!(doc.path("scores.2").unwrap().as_i64().unwrap(), 92);
//!
//! // A read-only tree refuses every edit
//! let mut frozen = parse(r#"{"a": 1}"#, Access::Immutable).unwrap();
//! assert!(matches!(frozen.update_child("a", 2), Err(JsonError::Access(_))));
//!
//! // Trees can also be built by hand
//! let mut built = Node::object(Access::All);
//! built.add("id", 7).unwrap().add("tags", vec![Node::string("x")]).unwrap();
//! assert_eq!(built.render(), "{\n  \"id\": 7,\n  \"tags\": [\n    \"x\"\n  ]\n}");
//! ```
//!
//! ## Modules
//!
//! - [`decoder`] — JSON text → [`Node`] tree
//! - [`encoder`] — [`Node`] tree → indented JSON text
//! - [`node`] — lookup, access-checked mutation, `NodeMut` editing handles, typed accessors
//! - [`path`] — dotted-path navigation and parent-mediated edits
//! - [`types`] — [`Access`], [`Kind`], [`Value`], [`Input`], [`Selector`]
//! - [`interop`] — serde `Serialize` and construction from `serde_json::Value`
//! - [`error`] — error taxonomy

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod interop;
pub mod node;
pub mod path;
pub mod types;

pub use decoder::{parse, parse_optional, MAX_DEPTH};
pub use encoder::render;
pub use error::{JsonError, Result};
pub use node::{Node, NodeMut};
pub use types::{Access, Input, Kind, Selector, Value};
