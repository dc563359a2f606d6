//! Value-tree reader.
//!
//! Every field of a compiled script is a `sval` node holding an int, a
//! string or an array of further nodes. The functions here are the only
//! place that inspects node tags and kinds; everything above works in
//! terms of "give me the int / string / array at this position".

use std::fmt;

use serde::Serialize;

use crate::error::{FormatError, Result};

/// Element name shared by every node in the format.
pub const NODE_TAG: &str = "sval";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Int,
    String,
    Array,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Int => "int",
            NodeKind::String => "string",
            NodeKind::Array => "array",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Int(i64),
    String(String),
    /// `size` is the declared element count; it is only trusted after
    /// `read_array_size` has compared it against `items`.
    Array { size: i64, items: Vec<ValueNode> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub tag: String,
    pub value: NodeValue,
}

impl ValueNode {
    pub fn int(v: i64) -> Self {
        Self::tagged(NodeValue::Int(v))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::tagged(NodeValue::String(s.into()))
    }

    /// Well-formed array whose declared size matches its children.
    pub fn array(items: Vec<ValueNode>) -> Self {
        let size = items.len() as i64;
        Self::tagged(NodeValue::Array { size, items })
    }

    fn tagged(value: NodeValue) -> Self {
        ValueNode {
            tag: NODE_TAG.to_string(),
            value,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.value {
            NodeValue::Int(_) => NodeKind::Int,
            NodeValue::String(_) => NodeKind::String,
            NodeValue::Array { .. } => NodeKind::Array,
        }
    }
}

/// Primitive payload of an int or string node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::String(s) => write!(f, "{s:?}"),
        }
    }
}

fn check_tag(node: &ValueNode, context: &str) -> Result<()> {
    if node.tag != NODE_TAG {
        return Err(FormatError::UnexpectedTag {
            expected: NODE_TAG,
            found: node.tag.clone(),
            context: context.to_string(),
        });
    }
    Ok(())
}

fn wrong_kind(expected: NodeKind, node: &ValueNode, context: &str) -> FormatError {
    FormatError::UnexpectedKind {
        expected,
        found: node.kind(),
        context: context.to_string(),
    }
}

pub fn read_int(node: &ValueNode, context: &str) -> Result<i64> {
    check_tag(node, context)?;
    match node.value {
        NodeValue::Int(v) => Ok(v),
        _ => Err(wrong_kind(NodeKind::Int, node, context)),
    }
}

pub fn read_string(node: &ValueNode, context: &str) -> Result<String> {
    check_tag(node, context)?;
    match &node.value {
        NodeValue::String(s) => Ok(s.clone()),
        _ => Err(wrong_kind(NodeKind::String, node, context)),
    }
}

pub fn read_value(node: &ValueNode, context: &str) -> Result<Scalar> {
    check_tag(node, context)?;
    match &node.value {
        NodeValue::Int(v) => Ok(Scalar::Int(*v)),
        NodeValue::String(s) => Ok(Scalar::String(s.clone())),
        NodeValue::Array { .. } => Err(FormatError::NotScalar {
            found: NodeKind::Array,
            context: context.to_string(),
        }),
    }
}

/// Declared element count of an array node.
///
/// Empty arrays are written either as `array(size=0)` or as a bare
/// `int(0)`; both read as zero.
pub fn read_array_size(node: &ValueNode, context: &str) -> Result<usize> {
    read_array(node, context).map(<[ValueNode]>::len)
}

/// Children of an array node, after the same checks as `read_array_size`.
pub fn read_array<'a>(node: &'a ValueNode, context: &str) -> Result<&'a [ValueNode]> {
    check_tag(node, context)?;
    match &node.value {
        NodeValue::Int(0) => Ok(&[]),
        NodeValue::Array { size, items } => {
            if *size < 0 || *size as usize != items.len() {
                return Err(FormatError::SizeMismatch {
                    declared: *size,
                    actual: items.len(),
                    context: context.to_string(),
                });
            }
            Ok(items)
        }
        _ => Err(wrong_kind(NodeKind::Array, node, context)),
    }
}

/// Positional reader over the children of one array node.
///
/// Each `take_*` call consumes one child; on failure the cursor still
/// reports the position it stopped at.
#[derive(Debug, Clone)]
pub struct NodeCursor<'a> {
    children: &'a [ValueNode],
    pos: usize,
    context: String,
}

impl<'a> NodeCursor<'a> {
    pub fn over(node: &'a ValueNode, context: impl Into<String>) -> Result<Self> {
        let context = context.into();
        let children = read_array(node, &context)?;
        Ok(NodeCursor {
            children,
            pos: 0,
            context,
        })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.children.len() - self.pos
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    fn describe(&self, what: &str) -> String {
        format!("{what} ({} #{})", self.context, self.pos)
    }

    pub fn take(&mut self, what: &str) -> Result<&'a ValueNode> {
        match self.children.get(self.pos) {
            Some(node) => {
                self.pos += 1;
                Ok(node)
            }
            None => Err(FormatError::MissingNode {
                context: self.describe(what),
            }),
        }
    }

    pub fn take_int(&mut self, what: &str) -> Result<i64> {
        let context = self.describe(what);
        read_int(self.take(what)?, &context)
    }

    pub fn take_string(&mut self, what: &str) -> Result<String> {
        let context = self.describe(what);
        read_string(self.take(what)?, &context)
    }

    pub fn take_value(&mut self, what: &str) -> Result<Scalar> {
        let context = self.describe(what);
        read_value(self.take(what)?, &context)
    }

    /// Non-negative element count stored as an int node. Every counted
    /// element takes at least one node, so the count can never exceed the
    /// children still unread.
    pub fn take_count(&mut self, what: &str) -> Result<usize> {
        let context = self.describe(what);
        let n = read_int(self.take(what)?, &context)?;
        match usize::try_from(n) {
            Ok(count) if count <= self.remaining() => Ok(count),
            _ => Err(FormatError::SizeMismatch {
                declared: n,
                actual: self.remaining(),
                context,
            }),
        }
    }

    /// Fails if any child was left unread.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(FormatError::TrailingNodes {
                count,
                context: self.context,
            }),
        }
    }
}
