//! Schema-versioned decoder and encoder for the `audit-log` subsystem
//! element.
//!
//! Decoding turns an `audit-log` element into an ordered list of create
//! [`Operation`]s addressed below a caller supplied base. Encoding writes a
//! [`Resource`] tree back out in canonical form. Both directions share the
//! [`AttributeDefinition`] tables and the per-version [`CapabilityMap`].
//!
//! ```no_run
//! use auditlog_xml::{decode_str, DecodeContext, SchemaVersion};
//! use mgmt_model::Address;
//!
//! let xml = r#"<audit-log xmlns="urn:jboss:domain:1.5"><logger/></audit-log>"#;
//! let context = DecodeContext::new(SchemaVersion::V1_5, Address::root());
//! let operations = decode_str(xml, &context)?;
//! assert_eq!(operations.len(), 2);
//! # Ok::<(), auditlog_xml::XmlError>(())
//! ```

mod attribute;
mod capability;
mod cursor;
mod decode;
mod encode;
mod error;
mod version;
mod vocab;

use mgmt_model::Resource;
use quick_xml::Writer;

pub use attribute::{
    AttributeDefinition, AttributeKind, MESSAGE_TRANSFERS, SYSLOG_FACILITIES, SYSLOG_FORMATS,
};
pub use capability::{Capabilities, CapabilityMap, Node, ResourceShape};
pub use cursor::{RawAttribute, StartTag, Tag, XmlCursor};
pub use decode::{decode_audit_log, DecodeContext};
pub use encode::AuditLogWriter;
pub use error::{EncodeError, Location, XmlError};
pub use version::{Family, SchemaVersion, UnknownVersion};
pub use vocab::{Attribute, Element};

pub use mgmt_model::{Address, Operation};

/// Decode a complete document whose root element is `audit-log`.
///
/// Anything but whitespace or comments after the root is rejected.
pub fn decode_str(xml: &str, context: &DecodeContext) -> Result<Vec<Operation>, XmlError> {
    let mut cursor = XmlCursor::from_str(xml);
    let root = cursor.root()?;
    let operations = decode_audit_log(&mut cursor, &root, context)?;
    cursor.finish()?;
    Ok(operations)
}

/// Schema version named by the namespace of the document's root element.
pub fn detect_version(xml: &str) -> Result<SchemaVersion, XmlError> {
    let mut cursor = XmlCursor::from_str(xml);
    let root = cursor.root()?;
    let namespace = root.namespace.clone().unwrap_or_default();
    SchemaVersion::from_namespace(&namespace).ok_or(XmlError::NamespaceMismatch {
        element: root.local_name,
        expected: "urn:jboss:domain:<major>.<minor>".into(),
        found: namespace,
        location: root.location,
    })
}

/// Render `audit` (the `access=audit` resource) as an indented document.
///
/// With `version` set, the root element declares that version's namespace.
pub fn encode_to_string(
    audit: &Resource,
    version: Option<SchemaVersion>,
) -> Result<String, EncodeError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    let mut audit_writer = AuditLogWriter::new(&mut writer);
    if let Some(version) = version {
        audit_writer = audit_writer.declare_namespace(version);
    }
    audit_writer.write(audit)?;
    Ok(String::from_utf8(writer.into_inner())?)
}
