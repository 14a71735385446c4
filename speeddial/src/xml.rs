//! Streaming XML reading and writing.
//!
//! Presets live as small elements inside larger project documents, so they are read and written
//! element by element rather than as whole documents. [XmlReader] walks a document one child
//! element at a time: the caller asks for the next start element at the current level, and then
//! either reads its text, descends into its children, or skips it entirely. [XmlWriter] is the
//! mirror image and keeps track of open elements so they can be closed without repeating names.
//!
//! ```
//! use speeddial::xml::{XmlReader, XmlWriter};
//!
//! let mut writer = XmlWriter::new(Vec::new());
//! writer.write_start_element("Dial", [("Mode", "tap")])?;
//! writer.write_text_element("Name", "Main")?;
//! writer.write_end_element()?;
//! let xml = String::from_utf8(writer.into_inner())?;
//! assert_eq!(xml, r#"<Dial Mode="tap"><Name>Main</Name></Dial>"#);
//!
//! let mut reader = XmlReader::new(&xml);
//! let dial = reader.read_next_start_element()?.unwrap();
//! assert_eq!(dial.attribute("Mode"), Some("tap"));
//! let name = reader.read_next_start_element()?.unwrap();
//! assert_eq!(reader.read_element_text(&name)?, "Main");
//! assert!(reader.read_next_start_element()?.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::io::Write;
use std::string::FromUtf8Error;

/// Errors that can occur while reading or writing XML.
#[derive(thiserror::Error, Debug)]
pub enum XmlError {
    /// The document is not well-formed.
    #[error("Malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),
    /// An attribute could not be parsed.
    #[error("Malformed attribute: {0}")]
    MalformedAttribute(#[from] AttrError),
    /// The underlying sink failed.
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// Written output was not valid UTF-8.
    #[error("Output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    /// The document contains no elements at all.
    #[error("Document has no root element")]
    EmptyDocument,
    /// The document ended while an element was still open.
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
    /// A child element was found where only text was expected.
    #[error("Unexpected element <{child}> inside text element <{parent}>")]
    UnexpectedElement {
        parent: String,
        child: String,
    },
    /// [XmlWriter::write_end_element] was called with no element open.
    #[error("No open element to close")]
    NoOpenElement,
}

/// A start element as seen by [XmlReader], with its attributes already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    empty: bool,
}

impl XmlElement {
    fn from_event(start: &BytesStart<'_>, empty: bool) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            empty,
        })
    }

    /// Tag name of this element.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item=(&str, &str)> {
        self.attributes.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Whether this element was written self-closing (`<Tag/>`), and so has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// Pull reader over an in-memory XML document.
///
/// Every non-empty element returned by [read_next_start_element](Self::read_next_start_element)
/// must be consumed before moving on to its siblings, either by
/// [reading its text](Self::read_element_text), by
/// [skipping it](Self::skip_current_element), or by reading its children until
/// `read_next_start_element` returns `None`.
pub struct XmlReader<'a> {
    inner: Reader<&'a [u8]>,
    open: Vec<String>,
}

impl<'a> XmlReader<'a> {
    pub fn new(xml: &'a str) -> Self {
        Self {
            inner: Reader::from_str(xml),
            open: Vec::new(),
        }
    }

    /// Read up to the next start element at the current level.
    ///
    /// Returns `None` once the enclosing element ends, or at the end of the document when no
    /// element is open. Text, comments and processing instructions in between are ignored.
    pub fn read_next_start_element(&mut self) -> Result<Option<XmlElement>, XmlError> {
        loop {
            match self.inner.read_event()? {
                Event::Start(start) => {
                    let element = XmlElement::from_event(&start, false)?;
                    self.open.push(element.name.clone());
                    return Ok(Some(element));
                },
                Event::Empty(start) => return Ok(Some(XmlElement::from_event(&start, true)?)),
                Event::End(_) => {
                    self.open.pop();
                    return Ok(None);
                },
                Event::Eof => return match self.open.last() {
                    Some(name) => Err(XmlError::UnexpectedEof(name.clone())),
                    None => Ok(None),
                },
                _ => {},
            }
        }
    }

    /// Read the text content of `element` verbatim, consuming it up to and including its end tag.
    ///
    /// # Errors
    ///
    /// Errors with [XmlError::UnexpectedElement] if the element contains child elements.
    pub fn read_element_text(&mut self, element: &XmlElement) -> Result<String, XmlError> {
        if element.empty {
            return Ok(String::new());
        }

        let mut text = String::new();
        loop {
            match self.inner.read_event()? {
                Event::Text(content) => text.push_str(&content.unescape()?),
                Event::CData(content) => text.push_str(&String::from_utf8_lossy(&content)),
                Event::Start(start) | Event::Empty(start) => {
                    return Err(XmlError::UnexpectedElement {
                        parent: element.name.clone(),
                        child: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    });
                },
                Event::End(_) => {
                    self.open.pop();
                    return Ok(text);
                },
                Event::Eof => return Err(XmlError::UnexpectedEof(element.name.clone())),
                _ => {},
            }
        }
    }

    /// Consume `element` and its entire subtree without looking at it.
    pub fn skip_current_element(&mut self, element: &XmlElement) -> Result<(), XmlError> {
        if element.empty {
            return Ok(());
        }

        self.inner.read_to_end(QName(element.name.as_bytes()))?;
        self.open.pop();
        Ok(())
    }
}

/// Push writer producing XML into any [Write] sink.
pub struct XmlWriter<W: Write> {
    inner: Writer<W>,
    open: Vec<String>,
}

impl<W: Write> XmlWriter<W> {
    /// Writer with no formatting; elements follow each other directly.
    pub fn new(sink: W) -> Self {
        Self {
            inner: Writer::new(sink),
            open: Vec::new(),
        }
    }

    /// Writer that puts each element on its own line, indented by one space per level.
    pub fn indented(sink: W) -> Self {
        Self {
            inner: Writer::new_with_indent(sink, b' ', 1),
            open: Vec::new(),
        }
    }

    /// Write an `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub fn write_declaration(&mut self) -> Result<(), XmlError> {
        self.inner.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn write_start_element<K, V>(
        &mut self,
        name: &str,
        attributes: impl IntoIterator<Item=(K, V)>,
    ) -> Result<(), XmlError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.inner.write_event(Event::Start(start_element(name, attributes)))?;
        self.open.push(name.to_owned());
        Ok(())
    }

    /// Write a self-closing element carrying only attributes.
    pub fn write_empty_element<K, V>(
        &mut self,
        name: &str,
        attributes: impl IntoIterator<Item=(K, V)>,
    ) -> Result<(), XmlError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.inner.write_event(Event::Empty(start_element(name, attributes)))?;
        Ok(())
    }

    /// Write `<name>text</name>`, escaping `text` as needed. Empty text still produces both tags.
    pub fn write_text_element(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        self.inner.write_event(Event::Start(BytesStart::new(name)))?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Close the most recently started element.
    pub fn write_end_element(&mut self) -> Result<(), XmlError> {
        let name = self.open.pop().ok_or(XmlError::NoOpenElement)?;
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

fn start_element<'a, K, V>(
    name: &'a str,
    attributes: impl IntoIterator<Item=(K, V)>,
) -> BytesStart<'a>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut start = BytesStart::new(name);
    for (key, value) in attributes {
        start.push_attribute((key.as_ref(), value.as_ref()));
    }
    start
}
