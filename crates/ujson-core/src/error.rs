//! Error types for parsing, lookup, and mutation of JSON trees.

use thiserror::Error;

/// Errors that can occur while parsing, navigating, or mutating a tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    /// The input text was not valid JSON.
    /// Line and column are 1-based and point at the offending character.
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The parser was handed no input text at all.
    #[error("no input text given to the parser")]
    NullInput,

    /// Missing key, position out of bounds, or growth refused by a `set`.
    #[error("Indexing error: {0}")]
    Indexing(String),

    /// The node's access policy forbids the attempted mutation.
    #[error("Access error: {0}")]
    Access(String),

    /// The operation is not supported by the node's kind.
    #[error("Type error: {0}")]
    Type(String),

    /// A value of one kind was used where another kind was required.
    #[error("Convert error: {0}")]
    Convert(String),
}

impl JsonError {
    /// Build a parse error, locating `offset` (a byte offset into `text`)
    /// as a 1-based line and column.
    pub(crate) fn parse_at(text: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |p| p + 1);
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
        JsonError::Parse {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout ujson-core.
pub type Result<T> = std::result::Result<T, JsonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_at_first_line() {
        let err = JsonError::parse_at("{\"a\": }", 6, "unexpected '}'");
        assert_eq!(
            err,
            JsonError::Parse {
                line: 1,
                column: 7,
                message: "unexpected '}'".to_string()
            }
        );
    }

    #[test]
    fn parse_at_counts_lines_and_columns() {
        let text = "{\n  \"a\": x\n}";
        let offset = text.find('x').unwrap();
        match JsonError::parse_at(text, offset, "bad") {
            JsonError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 8);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_at_clamps_offset_past_end() {
        match JsonError::parse_at("[1", 10, "unexpected end of input") {
            JsonError::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
