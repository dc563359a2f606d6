//! Wire loader: turns the decoded XML byte stream into a `ValueNode` tree.
//!
//! Only the shape of the document is checked here (attributes present and
//! well-typed, elements balanced). Tag names and array sizes are left for
//! the reader functions in `value` so that errors name the field being read.

pub mod value;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{FormatError, Result};
use value::{NodeValue, ValueNode};

pub use value::{NodeCursor, NodeKind, Scalar};

/// Parse a whole script document. The first element is the root node.
pub fn load_from_xml(bytes: &[u8]) -> Result<ValueNode> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut open: Vec<ValueNode> = Vec::new();
    let mut root: Option<ValueNode> = None;
    let mut count = 0usize;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| FormatError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(e) => {
                open.push(node_from_element(&e)?);
            }
            Event::Empty(e) => {
                let node = node_from_element(&e)?;
                count += 1;
                attach(node, &mut open, &mut root)?;
            }
            Event::End(_) => {
                let node = open
                    .pop()
                    .ok_or_else(|| FormatError::Xml("closing tag without opening tag".into()))?;
                count += 1;
                attach(node, &mut open, &mut root)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(node) = open.last() {
        return Err(FormatError::Xml(format!("unterminated <{}> element", node.tag)));
    }
    let root = root.ok_or_else(|| FormatError::Xml("document has no root node".into()))?;
    debug!("loaded value tree with {count} nodes");
    Ok(root)
}

fn attach(node: ValueNode, open: &mut [ValueNode], root: &mut Option<ValueNode>) -> Result<()> {
    match open.last_mut() {
        Some(parent) => match &mut parent.value {
            NodeValue::Array { items, .. } => {
                items.push(node);
                Ok(())
            }
            _ => Err(FormatError::Xml(format!(
                "<{}> of type {} cannot have children",
                parent.tag,
                parent.kind()
            ))),
        },
        None if root.is_some() => Err(FormatError::Xml("more than one root node".into())),
        None => {
            *root = Some(node);
            Ok(())
        }
    }
}

fn node_from_element(e: &BytesStart) -> Result<ValueNode> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let bad = |message: String| FormatError::Attribute {
        tag: tag.clone(),
        message,
    };

    let mut kind = None;
    let mut val = None;
    let mut size = None;
    for attr in e.attributes() {
        let attr = attr.map_err(|err| bad(err.to_string()))?;
        let text = attr
            .unescape_value()
            .map_err(|err| bad(err.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"type" => kind = Some(text),
            b"val" => val = Some(text),
            b"size" => size = Some(text),
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| bad("missing `type`".into()))?;
    let value = match kind.as_str() {
        "int" => {
            let raw = val.ok_or_else(|| bad("int node without `val`".into()))?;
            let v = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| bad(format!("`{raw}` is not an integer")))?;
            NodeValue::Int(v)
        }
        "string" => NodeValue::String(val.ok_or_else(|| bad("string node without `val`".into()))?),
        "array" => {
            let raw = size.ok_or_else(|| bad("array node without `size`".into()))?;
            let size = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| bad(format!("`{raw}` is not an array size")))?;
            NodeValue::Array {
                size,
                items: Vec::new(),
            }
        }
        other => return Err(bad(format!("unknown node type `{other}`"))),
    };

    Ok(ValueNode { tag, value })
}
