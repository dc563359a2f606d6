//! Failure taxonomy of the script reader.
//!
//! Every variant is fatal for the current read: the caller gets the error
//! and no partial `ScriptFile`.

use crate::parser::value::NodeKind;
use crate::syntax::GameVersion;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("bad attribute on <{tag}>: {message}")]
    Attribute { tag: String, message: String },

    #[error("expected <{expected}> node, found <{found}> while reading {context}")]
    UnexpectedTag {
        expected: &'static str,
        found: String,
        context: String,
    },

    #[error("expected {expected} node, found {found} while reading {context}")]
    UnexpectedKind {
        expected: NodeKind,
        found: NodeKind,
        context: String,
    },

    #[error("expected int or string node, found {found} while reading {context}")]
    NotScalar { found: NodeKind, context: String },

    #[error("array declares {declared} elements but has {actual} while reading {context}")]
    SizeMismatch {
        declared: i64,
        actual: usize,
        context: String,
    },

    #[error("expected {expected} elements, found {actual} while reading {context}")]
    CountMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    #[error("missing node while reading {context}")]
    MissingNode { context: String },

    #[error("{count} unread node(s) left after reading {context}")]
    TrailingNodes { count: usize, context: String },

    #[error("command {id} not found for engine version {version}")]
    UnknownCommand { id: i64, version: GameVersion },

    #[error("command {id} ({name}) cannot appear in the {stream} stream")]
    WrongStream {
        id: i64,
        name: String,
        stream: &'static str,
    },

    #[error("{what} index {index} out of range (have {len})")]
    OutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },

    #[error("goto target {line}: {reason}")]
    BadGoto { line: i64, reason: String },

    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;
