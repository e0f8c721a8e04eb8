//! Response document decoding into a [`Node`] tree.
//!
//! The document root becomes a single-entry object `{root_name: root}`.
//! Inside an element, every child name maps to a [`Node::List`] of its
//! occurrences. Attributes go under `"$"` and text beside child elements
//! under `"_"`. A leaf element without attributes is a [`Node::Scalar`];
//! whitespace-only text counts as empty.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::xml::node::{ATTRIBUTES_KEY, TEXT_KEY};
use crate::xml::{Node, XmlError};

/// An element whose end tag has not been read yet.
#[derive(Debug, Default)]
struct OpenElement {
    name: String,
    attributes: BTreeMap<String, Node>,
    children: BTreeMap<String, Vec<Node>>,
    text: String,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut attributes = BTreeMap::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
            let value = attribute.unescape_value()?.into_owned();
            attributes.insert(key, Node::Scalar(value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn into_node(self) -> Node {
        if self.children.is_empty() && self.attributes.is_empty() {
            return Node::Scalar(self.text);
        }

        // Whitespace between child elements is layout, not content.
        let has_text = !self.text.trim().is_empty();

        let mut map: BTreeMap<String, Node> = self
            .children
            .into_iter()
            .map(|(name, items)| (name, Node::List(items)))
            .collect();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_string(), Node::Object(self.attributes));
        }
        if has_text {
            map.insert(TEXT_KEY.to_string(), Node::Scalar(self.text));
        }
        Node::Object(map)
    }
}

/// Decodes an XML document.
///
/// # Errors
///
/// Returns an [`XmlError`] for syntax errors, mismatched or unclosed tags, a
/// missing root element, or content after the root element. Nothing is
/// returned on failure.
///
/// # Example
///
/// ```rust
/// use mns::xml::{decode, Node};
///
/// let document = decode(b"<Queue><QueueName>Q1</QueueName></Queue>").unwrap();
/// let name = document.get("Queue").and_then(|q| q.get("QueueName")).unwrap();
/// assert_eq!(name, &Node::List(vec![Node::scalar("Q1")]));
/// ```
pub fn decode(xml: &[u8]) -> Result<Node, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().check_end_names = true;

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                ensure_single_root(root.as_ref())?;
                stack.push(OpenElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(root.as_ref())?;
                let element = OpenElement::from_start(&start)?;
                close(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected end tag".to_string()))?;
                close(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(XmlError::Malformed(
                            "text outside of the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(data) => {
                let open = stack.last_mut().ok_or_else(|| {
                    XmlError::Malformed("CDATA outside of the root element".to_string())
                })?;
                open.text.push_str(std::str::from_utf8(&data)?);
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions and doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    let (name, node) =
        root.ok_or_else(|| XmlError::Malformed("no root element".to_string()))?;
    Ok(Node::Object(BTreeMap::from([(name, node)])))
}

fn ensure_single_root(root: Option<&(String, Node)>) -> Result<(), XmlError> {
    match root {
        Some((name, _)) => Err(XmlError::Malformed(format!(
            "content after root element <{name}>"
        ))),
        None => Ok(()),
    }
}

fn close(stack: &mut [OpenElement], root: &mut Option<(String, Node)>, element: OpenElement) {
    let name = element.name.clone();
    let node = element.into_node();
    match stack.last_mut() {
        Some(parent) => parent.children.entry(name).or_default().push(node),
        None => *root = Some((name, node)),
    }
}
