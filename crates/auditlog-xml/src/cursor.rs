//! Element cursor over quick-xml with namespace resolution and source
//! locations.

use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use tracing::trace;

use crate::error::{Location, XmlError};

/// An attribute as written, with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// `None` for unprefixed attributes.
    pub namespace: Option<String>,
    pub local_name: String,
    pub value: String,
}

/// An opening tag reported by [`XmlCursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub namespace: Option<String>,
    pub local_name: String,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<RawAttribute>,
    pub location: Location,
}

/// Result of [`XmlCursor::next_tag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Start(StartTag),
    /// The element opened most recently has closed.
    End,
}

enum Step {
    Start(StartTag),
    End,
    Eof,
}

/// Walks elements in document order. Whitespace, comments, processing
/// instructions and declarations are skipped; empty elements are reported as
/// a start followed by an end.
pub struct XmlCursor<'a> {
    source: &'a str,
    reader: NsReader<&'a [u8]>,
    open: Vec<String>,
    pending_end: bool,
}

impl<'a> XmlCursor<'a> {
    pub fn from_str(source: &'a str) -> Self {
        XmlCursor {
            source,
            reader: NsReader::from_str(source),
            open: Vec::new(),
            pending_end: false,
        }
    }

    fn location(&self) -> Location {
        Location::at_offset(self.source, self.reader.buffer_position())
    }

    /// Advance to the document's root element.
    pub fn root(&mut self) -> Result<StartTag, XmlError> {
        if !self.open.is_empty() {
            return Err(XmlError::Xml {
                message: "cursor is already inside the document".into(),
                location: self.location(),
            });
        }
        match self.step()? {
            Step::Start(tag) => Ok(tag),
            Step::End | Step::Eof => Err(XmlError::Xml {
                message: "document has no root element".into(),
                location: self.location(),
            }),
        }
    }

    /// Next start tag or the end of the currently open element, like a StAX
    /// `nextTag`. Non-whitespace text is an error.
    pub fn next_tag(&mut self) -> Result<Tag, XmlError> {
        match self.step()? {
            Step::Start(tag) => Ok(Tag::Start(tag)),
            Step::End => Ok(Tag::End),
            Step::Eof => Err(XmlError::Xml {
                message: match self.open.last() {
                    Some(name) => format!("unexpected end of document inside '{name}'"),
                    None => "unexpected end of document".into(),
                },
                location: self.location(),
            }),
        }
    }

    /// Consume the element just opened, failing if it has any content.
    pub fn require_no_content(&mut self) -> Result<(), XmlError> {
        let element = self.open.last().cloned().unwrap_or_default();
        match self.next_tag()? {
            Tag::End => Ok(()),
            Tag::Start(child) => Err(XmlError::ContentNotAllowed {
                element,
                location: child.location,
            }),
        }
    }

    /// Require that nothing but whitespace and comments follow the root.
    pub fn finish(&mut self) -> Result<(), XmlError> {
        match self.step()? {
            Step::Eof => Ok(()),
            Step::Start(tag) => Err(XmlError::UnexpectedElement {
                element: tag.local_name,
                location: tag.location,
            }),
            Step::End => Err(XmlError::Xml {
                message: "unbalanced end tag".into(),
                location: self.location(),
            }),
        }
    }

    fn step(&mut self) -> Result<Step, XmlError> {
        if self.pending_end {
            self.pending_end = false;
            self.open.pop();
            return Ok(Step::End);
        }
        let source = self.source;
        loop {
            let offset = self.reader.buffer_position();
            let (resolved, event) = self
                .reader
                .read_resolved_event()
                .map_err(|err| xml_error(source, offset, err))?;
            let namespace = owned_namespace(resolved, source, offset)?;
            match event {
                Event::Start(start) => {
                    let tag = self.start_tag(&start, namespace, offset)?;
                    self.open.push(tag.local_name.clone());
                    trace!(element = %tag.local_name, depth = self.open.len(), "start tag");
                    return Ok(Step::Start(tag));
                }
                Event::Empty(start) => {
                    let tag = self.start_tag(&start, namespace, offset)?;
                    self.open.push(tag.local_name.clone());
                    self.pending_end = true;
                    trace!(element = %tag.local_name, depth = self.open.len(), "empty tag");
                    return Ok(Step::Start(tag));
                }
                Event::End(_) => {
                    if self.open.pop().is_none() {
                        return Err(xml_error(source, offset, "unbalanced end tag"));
                    }
                    return Ok(Step::End);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|err| xml_error(source, offset, err))?;
                    if !text.trim().is_empty() {
                        return Err(self.content_error(offset));
                    }
                }
                Event::CData(data) => {
                    if data.iter().any(|b| !b.is_ascii_whitespace()) {
                        return Err(self.content_error(offset));
                    }
                }
                Event::Eof => return Ok(Step::Eof),
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }
    }

    fn start_tag(
        &self,
        start: &BytesStart<'_>,
        namespace: Option<String>,
        offset: usize,
    ) -> Result<StartTag, XmlError> {
        let location = Location::at_offset(self.source, tag_offset(self.source, offset));
        let local_name = utf8(start.local_name().as_ref(), location)?;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| XmlError::Xml {
                message: err.to_string(),
                location,
            })?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let (resolved, local) = self.reader.resolve_attribute(attr.key);
            let attr_namespace = owned_namespace(resolved, self.source, offset)?;
            let value = attr.unescape_value().map_err(|err| XmlError::Xml {
                message: err.to_string(),
                location,
            })?;
            attributes.push(RawAttribute {
                namespace: attr_namespace,
                local_name: utf8(local.as_ref(), location)?,
                value: value.into_owned(),
            });
        }
        Ok(StartTag {
            namespace,
            local_name,
            attributes,
            location,
        })
    }

    fn content_error(&self, offset: usize) -> XmlError {
        let location = Location::at_offset(self.source, offset);
        match self.open.last() {
            Some(element) => XmlError::ContentNotAllowed {
                element: element.clone(),
                location,
            },
            None => XmlError::Xml {
                message: "text outside the root element".into(),
                location,
            },
        }
    }
}

fn owned_namespace(
    resolved: ResolveResult<'_>,
    source: &str,
    offset: usize,
) -> Result<Option<String>, XmlError> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Ok(Some(String::from_utf8_lossy(namespace.as_ref()).into_owned()))
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(xml_error(
            source,
            offset,
            format!(
                "unknown namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ),
        )),
    }
}

/// Offset of the `<` opening the tag read from `offset`. The reader may or
/// may not have consumed the `<` already, depending on the preceding event.
fn tag_offset(source: &str, offset: usize) -> usize {
    let end = (offset + 1).min(source.len());
    source.as_bytes()[..end]
        .iter()
        .rposition(|&b| b == b'<')
        .unwrap_or(offset)
}

fn utf8(bytes: &[u8], location: Location) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| XmlError::Xml {
            message: format!("invalid UTF-8: {err}"),
            location,
        })
}

fn xml_error(source: &str, offset: usize, err: impl Display) -> XmlError {
    XmlError::Xml {
        message: err.to_string(),
        location: Location::at_offset(source, offset),
    }
}
