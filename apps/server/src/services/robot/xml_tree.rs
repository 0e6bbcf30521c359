//! Generic attributed XML tree used as the output.xml loading boundary.
//!
//! Children are addressed by tag name. Tags listed in the loader's array set
//! are always stored as a sequence, even with a single occurrence, so callers
//! iterate them unconditionally. Other tags keep their natural shape: one
//! node when they appear once, a sequence when they repeat.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Name given to the synthetic node that holds the top-level elements.
pub const DOCUMENT_NODE: &str = "#document";

/// Tags that are always materialized as sequences in Robot Framework output.
pub const ROBOT_ARRAY_TAGS: &[&str] = &["suite", "test", "tag", "meta"];

/// XML loading errors.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("Unclosed element <{0}> at end of document")]
    Unclosed(String),

    #[error("Document has no root element")]
    Empty,
}

/// All children of one node sharing a tag name.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildGroup {
    One(XmlNode),
    Many(Vec<XmlNode>),
}

impl ChildGroup {
    /// View the group as a slice regardless of shape.
    pub fn as_slice(&self) -> &[XmlNode] {
        match self {
            Self::One(node) => std::slice::from_ref(node),
            Self::Many(nodes) => nodes,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    fn push(&mut self, node: XmlNode) {
        match self {
            Self::Many(nodes) => nodes.push(node),
            Self::One(_) => {
                if let Self::One(first) = std::mem::replace(self, Self::Many(Vec::new())) {
                    *self = Self::Many(vec![first, node]);
                }
            }
        }
    }
}

/// An element with its attributes, grouped children and text content.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<(String, ChildGroup)>,
    text: Option<String>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child using its natural shape.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.append_child(child, false);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content, `None` when the element has no non-whitespace text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The child group for `tag`, if any child carries that tag.
    pub fn group(&self, tag: &str) -> Option<&ChildGroup> {
        self.children
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, group)| group)
    }

    /// All children named `tag`, in document order.
    pub fn children(&self, tag: &str) -> &[XmlNode] {
        self.group(tag).map(ChildGroup::as_slice).unwrap_or(&[])
    }

    /// First child named `tag`.
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children(tag).first()
    }

    /// Append a child, forcing a sequence shape when `force_array` is set.
    pub fn append_child(&mut self, child: XmlNode, force_array: bool) {
        if let Some((_, group)) = self.children.iter_mut().find(|(tag, _)| *tag == child.name) {
            group.push(child);
            return;
        }

        let tag = child.name.clone();
        let group = if force_array {
            ChildGroup::Many(vec![child])
        } else {
            ChildGroup::One(child)
        };
        self.children.push((tag, group));
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }
}

/// Parse XML text into a tree rooted at a synthetic [`DOCUMENT_NODE`].
///
/// Tags in `array_tags` are always stored as sequences. Fails when the text
/// is not well-formed or contains no element at all.
pub fn load(xml: &str, array_tags: &[&str]) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = vec![XmlNode::new(DOCUMENT_NODE)];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(element_from_start(&e, &reader)?),
            Ok(Event::Empty(e)) => {
                let node = element_from_start(&e, &reader)?;
                attach(&mut stack, node, array_tags)?;
            }
            Ok(Event::End(_)) => {
                if stack.len() < 2 {
                    let name = stack.last().map(|n| n.name.clone()).unwrap_or_default();
                    return Err(XmlError::UnexpectedClose(name));
                }
                if let Some(node) = stack.pop() {
                    attach(&mut stack, node, array_tags)?;
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| syntax_error(&reader, e))?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                }
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctype
            Ok(_) => {}
            Err(e) => return Err(syntax_error(&reader, e)),
        }
    }

    if stack.len() > 1 {
        let open = stack.last().map(|n| n.name.clone()).unwrap_or_default();
        return Err(XmlError::Unclosed(open));
    }

    let document = stack.pop().ok_or(XmlError::Empty)?;
    if document.children.is_empty() {
        return Err(XmlError::Empty);
    }

    Ok(document)
}

fn element_from_start(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlNode, XmlError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());

    for attr in e.attributes() {
        let attr = attr.map_err(|err| syntax_error(reader, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| syntax_error(reader, err))?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn attach(stack: &mut [XmlNode], node: XmlNode, array_tags: &[&str]) -> Result<(), XmlError> {
    let force_array = array_tags.contains(&node.name.as_str());
    let parent = stack
        .last_mut()
        .ok_or_else(|| XmlError::UnexpectedClose(node.name.clone()))?;
    parent.append_child(node, force_array);
    Ok(())
}

fn syntax_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> XmlError {
    XmlError::Syntax {
        position: reader.error_position(),
        message: err.to_string(),
    }
}
