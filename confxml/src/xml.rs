//! Render documents as XML.
//!
//! Dictionary keys become element names and scalars become text content.
//! Array items are written as `item` elements; the items of a top-level array
//! are wrapped in an `items` element and numbered with an `index` attribute.
use std::io;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::value::{is_identifier, Document, Value};

/// Output settings for [`to_string`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Name of the root element.
    pub root: String,
    /// Spaces per nesting level, or `None` to write everything on one line.
    pub indent: Option<usize>,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            root: "config".to_string(),
            indent: Some(2),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid root element name: {0:?}")]
    InvalidRoot(String),
    #[error("failed to write XML: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("rendered XML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render a document as an XML string.
pub fn to_string(document: &Document, options: &XmlOptions) -> Result<String, RenderError> {
    if !is_identifier(&options.root) {
        return Err(RenderError::InvalidRoot(options.root.clone()));
    }

    let mut writer = match options.indent {
        Some(indent) => Writer::new_with_indent(Vec::new(), b' ', indent),
        None => Writer::new(Vec::new()),
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = BytesStart::new(options.root.as_str());
    match document {
        Document::Map(map) if map.is_empty() => writer.write_event(Event::Empty(root))?,
        Document::Map(map) => {
            writer.write_event(Event::Start(root.borrow()))?;
            for (key, value) in map.iter() {
                write_element(&mut writer, BytesStart::new(key.as_str()), value)?;
            }
            writer.write_event(Event::End(root.to_end()))?;
        }
        Document::Seq(items) => {
            writer.write_event(Event::Start(root.borrow()))?;
            let container = BytesStart::new("items");
            if items.is_empty() {
                writer.write_event(Event::Empty(container))?;
            } else {
                writer.write_event(Event::Start(container.borrow()))?;
                for (index, item) in items.iter().enumerate() {
                    let index = index.to_string();
                    let element =
                        BytesStart::new("item").with_attributes([("index", index.as_str())]);
                    write_element(&mut writer, element, item)?;
                }
                writer.write_event(Event::End(container.to_end()))?;
            }
            writer.write_event(Event::End(root.to_end()))?;
        }
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element<W: io::Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    value: &Value,
) -> Result<(), RenderError> {
    match value {
        Value::Int(int) => return write_text(writer, start, &int.to_string()),
        Value::Text(text) => return write_text(writer, start, text),
        Value::Seq(items) if items.is_empty() => writer.write_event(Event::Empty(start))?,
        Value::Seq(items) => {
            writer.write_event(Event::Start(start.borrow()))?;
            for item in items {
                write_element(writer, BytesStart::new("item"), item)?;
            }
            writer.write_event(Event::End(start.to_end()))?;
        }
        Value::Map(map) if map.is_empty() => writer.write_event(Event::Empty(start))?,
        Value::Map(map) => {
            writer.write_event(Event::Start(start.borrow()))?;
            for (key, value) in map.iter() {
                write_element(writer, BytesStart::new(key.as_str()), value)?;
            }
            writer.write_event(Event::End(start.to_end()))?;
        }
    }
    Ok(())
}

fn write_text<W: io::Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), RenderError> {
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start.borrow()))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(start.to_end()))?;
    Ok(())
}
