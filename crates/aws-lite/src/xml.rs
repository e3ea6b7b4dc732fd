//! Minimal XML document model.
//!
//! Responses from both services are parsed into an [`XmlElement`] tree;
//! Route 53 request bodies are written from one. The tree keeps element
//! order and raw (unprefixed-as-written) names, which is all the callers
//! need: EC2 error extraction walks `Errors/Error/Message`, and Route 53
//! failures are reported through the JSON projection in [`XmlElement::to_json`].

use crate::params::Params;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Cursor;

/// Errors produced while reading or writing XML.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlError {
    /// The input is not well-formed.
    Malformed(String),
    /// The input contains no root element.
    Empty,
    /// Serialisation failed.
    Write(String),
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed XML: {}", msg),
            Self::Empty => f.write_str("XML document has no root element"),
            Self::Write(msg) => write!(f, "XML write error: {}", msg),
        }
    }
}

impl std::error::Error for XmlError {}

/// One XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element, trimmed.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Shorthand for a `<name>text</name>` child.
    pub fn with_leaf(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(XmlElement::new(name).with_text(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// All direct children called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Every descendant (and self) called `name`, depth-first.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.collect_named(name, out);
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    if root.is_some() {
                        return Err(XmlError::Malformed("content after root element".into()));
                    }
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None if root.is_none() => root = Some(element),
                        None => {
                            return Err(XmlError::Malformed("content after root element".into()))
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unbalanced closing tag".into()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| XmlError::Malformed(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XmlError::Malformed(format!(
                        "at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Malformed("unexpected end of document".into()));
        }
        root.ok_or(XmlError::Empty)
    }

    /// Serialise as a standalone document with an XML declaration.
    pub fn to_document(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_declaration(&mut writer)?;
        write_element(&mut writer, self)?;
        into_string(writer)
    }

    /// Project the element into JSON: the element's own name is dropped,
    /// attributes go under `"@"`, text under `"#"` when the element also has
    /// attributes or children, repeated child names become arrays and plain
    /// leaf elements become strings.
    pub fn to_json(&self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(self.text.clone());
        }

        let mut obj = Map::new();
        if !self.attributes.is_empty() {
            let attrs = self
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<_, _>>();
            obj.insert("@".to_string(), Value::Object(attrs));
        }
        if !self.text.is_empty() {
            obj.insert("#".to_string(), Value::String(self.text.clone()));
        }
        for child in &self.children {
            let value = child.to_json();
            match obj.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    obj.insert(child.name.clone(), value);
                }
            }
        }
        Value::Object(obj)
    }
}

/// Dump a flat key/value list as a declaration followed by one
/// `<key>value</key>` element per entry, in list order.
pub fn dump_params(params: &Params) -> Result<String, XmlError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_declaration(&mut writer)?;
    for (key, value) in params.iter() {
        write_element(&mut writer, &XmlElement::new(key).with_text(value))?;
    }
    into_string(writer)
}

fn element_from_start(e: &BytesStart) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn write_declaration<W: std::io::Write>(writer: &mut Writer<W>) -> Result<(), XmlError> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| XmlError::Write(e.to_string()))
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> Result<(), XmlError> {
    if !is_xml_name(&element.name) {
        return Err(XmlError::Write(format!("invalid element name {:?}", element.name)));
    }
    let mut start = BytesStart::new(element.name.as_str());
    for (k, v) in &element.attributes {
        if !is_xml_name(k) {
            return Err(XmlError::Write(format!("invalid attribute name {:?}", k)));
        }
        start.push_attribute((k.as_str(), v.as_str()));
    }

    if element.text.is_empty() && element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlError::Write(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlError::Write(e.to_string()))?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| XmlError::Write(e.to_string()))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| XmlError::Write(e.to_string()))
}

/// Letter, `_` or `:` first; letters, digits, `-`, `.`, `_` or `:` after.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'))
}

fn into_string(writer: Writer<Cursor<Vec<u8>>>) -> Result<String, XmlError> {
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}
