use std::fmt;

use thiserror::Error;

/// 1-based position of a construct in the source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Compute the line/column of byte `offset` within `source`.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let prefix = &source.as_bytes()[..offset];
        let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = prefix
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        let column = String::from_utf8_lossy(&prefix[line_start..]).chars().count() + 1;
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.line, self.column)
    }
}

/// Decode failure. Every variant aborts the whole decode call and names the
/// first violation found in document order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("xml {location}: {message}")]
    Xml { message: String, location: Location },
    /// An element belongs to a namespace other than the active dialect's.
    #[error("{location}: element '{element}' in namespace '{found}', expected '{expected}'")]
    NamespaceMismatch {
        element: String,
        expected: String,
        found: String,
        location: Location,
    },
    /// An element is not a legal child at this point for the active dialect.
    #[error("{location}: unexpected element '{element}'")]
    UnexpectedElement { element: String, location: Location },
    /// An attribute is not legal on this element for the active dialect.
    #[error("{location}: unexpected attribute '{attribute}' on '{element}'")]
    UnexpectedAttribute {
        element: String,
        attribute: String,
        location: Location,
    },
    /// A known attribute carries text that does not convert to its type.
    #[error("{location}: invalid value '{value}' for attribute '{attribute}' on '{element}': {reason}")]
    InvalidAttributeValue {
        element: String,
        attribute: String,
        value: String,
        reason: String,
        location: Location,
    },
    /// Required attributes were absent once all attributes had been read.
    #[error("{location}: missing required attribute(s) {} on '{element}'", .attributes.join(", "))]
    MissingRequiredAttribute {
        element: String,
        attributes: Vec<String>,
        location: Location,
    },
    /// A child permitted at most once appeared again.
    #[error("{location}: duplicate '{element}' element")]
    DuplicateChild { element: String, location: Location },
    /// A second variant was supplied for an exclusive slot.
    #[error("{location}: '{element}' conflicts with an earlier {slot}; only one is allowed")]
    ConflictingVariant {
        slot: String,
        element: String,
        location: Location,
    },
    /// Two sibling resources of the same kind share a name.
    #[error("{location}: duplicate {element} named '{name}'")]
    DuplicateName {
        element: String,
        name: String,
        location: Location,
    },
    /// Text or child elements inside an element that must be empty.
    #[error("{location}: content is not allowed inside '{element}'")]
    ContentNotAllowed { element: String, location: Location },
}

impl XmlError {
    pub fn location(&self) -> Location {
        match self {
            XmlError::Xml { location, .. }
            | XmlError::NamespaceMismatch { location, .. }
            | XmlError::UnexpectedElement { location, .. }
            | XmlError::UnexpectedAttribute { location, .. }
            | XmlError::InvalidAttributeValue { location, .. }
            | XmlError::MissingRequiredAttribute { location, .. }
            | XmlError::DuplicateChild { location, .. }
            | XmlError::ConflictingVariant { location, .. }
            | XmlError::DuplicateName { location, .. }
            | XmlError::ContentNotAllowed { location, .. } => *location,
        }
    }
}

/// Encode failure. Only the sink can fail; its error is passed through.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Sink(#[from] quick_xml::Error),
    #[error("encoded document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_counts_lines_and_columns() {
        let source = "<a>\n  <b/>\n</a>";
        assert_eq!(Location::at_offset(source, 0), Location { line: 1, column: 1 });
        assert_eq!(Location::at_offset(source, 6), Location { line: 2, column: 3 });
        assert_eq!(Location::at_offset(source, 999), Location { line: 3, column: 5 });
    }

    #[test]
    fn missing_required_lists_every_attribute() {
        let err = XmlError::MissingRequiredAttribute {
            element: "file-handler".into(),
            attributes: vec!["name".into(), "path".into()],
            location: Location { line: 4, column: 9 },
        };
        assert_eq!(
            err.to_string(),
            "[4,9]: missing required attribute(s) name, path on 'file-handler'"
        );
    }
}
