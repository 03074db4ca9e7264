//! Writer for the canonical `audit-log` element.

use std::io::Write;

use mgmt_model::Resource;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::capability::{CapabilityMap, Node, ResourceShape};
use crate::error::EncodeError;
use crate::version::SchemaVersion;
use crate::vocab::Attribute;

/// Writes an audit subsystem resource as nested elements.
///
/// Output is canonical: attributes in table order, handler kinds in the fixed
/// file, periodic, size, syslog order, and empty grouping blocks omitted.
/// Without a declared version every element and attribute the vocabulary
/// knows is written; with one, whatever that version does not grant is
/// left out.
pub struct AuditLogWriter<'w, W: Write> {
    writer: &'w mut Writer<W>,
    capabilities: CapabilityMap,
    namespace: Option<String>,
}

enum Entry<'r> {
    Resource {
        node: Node,
        name: &'r str,
        resource: &'r Resource,
    },
    Group {
        node: Node,
        members: Vec<Entry<'r>>,
    },
}

impl<'w, W: Write> AuditLogWriter<'w, W> {
    pub fn new(writer: &'w mut Writer<W>) -> Self {
        AuditLogWriter {
            writer,
            capabilities: CapabilityMap::full(),
            namespace: None,
        }
    }

    /// Write in `version`'s dialect: declare its namespace on the root element
    /// and skip nodes and attributes it does not grant, so the output decodes
    /// under that version.
    pub fn declare_namespace(mut self, version: SchemaVersion) -> Self {
        self.namespace = Some(version.namespace_uri());
        self.capabilities = CapabilityMap::new(version, true);
        self
    }

    /// Write `audit` (the resource at `access=audit`) and everything below it.
    pub fn write(&mut self, audit: &Resource) -> Result<(), EncodeError> {
        let root = Entry::Resource {
            node: Node::AuditLog,
            name: "audit",
            resource: audit,
        };
        self.write_entry(&root)
    }

    fn write_entry(&mut self, entry: &Entry<'_>) -> Result<(), EncodeError> {
        match entry {
            Entry::Group { node, members } => {
                let local = node.element().local_name();
                self.writer
                    .write_event(Event::Start(BytesStart::new(local)))?;
                for member in members {
                    self.write_entry(member)?;
                }
                self.writer.write_event(Event::End(BytesEnd::new(local)))?;
            }
            Entry::Resource {
                node,
                name,
                resource,
            } => {
                let Some(shape) = self.capabilities.shape(*node) else {
                    return Ok(());
                };
                let local = node.element().local_name();
                let mut start = BytesStart::new(local);
                if *node == Node::AuditLog {
                    if let Some(namespace) = &self.namespace {
                        start.push_attribute(("xmlns", namespace.as_str()));
                    }
                }
                for definition in shape.attributes {
                    if definition.attribute == Attribute::Name {
                        start.push_attribute((definition.name(), *name));
                    } else if let Some(text) = definition.marshal_from(resource) {
                        start.push_attribute((definition.name(), text.as_str()));
                    }
                }
                debug!(element = local, name = *name, "writing element");

                let members = self.entries(&shape, resource);
                if members.is_empty() {
                    self.writer.write_event(Event::Empty(start))?;
                } else {
                    self.writer.write_event(Event::Start(start))?;
                    for member in &members {
                        self.write_entry(member)?;
                    }
                    self.writer.write_event(Event::End(BytesEnd::new(local)))?;
                }
            }
        }
        Ok(())
    }

    /// Child entries of `resource` in canonical order. Grouping nodes read
    /// their members from the same resource and vanish when they have none.
    fn entries<'r>(&self, shape: &ResourceShape, resource: &'r Resource) -> Vec<Entry<'r>> {
        let mut entries = Vec::new();
        for &node in shape.children {
            if !self.capabilities.supports(node) {
                continue;
            }
            let Some(key) = node.path_key() else {
                let Some(group) = self.capabilities.shape(node) else {
                    continue;
                };
                let members = self.entries(&group, resource);
                if !members.is_empty() {
                    entries.push(Entry::Group { node, members });
                }
                continue;
            };
            if is_protocol(node) && entries.iter().any(|entry| entry.is_protocol()) {
                continue;
            }
            for (name, child) in resource.children(key) {
                if node.fixed_name().is_some_and(|fixed| fixed != name) {
                    continue;
                }
                entries.push(Entry::Resource {
                    node,
                    name,
                    resource: child,
                });
            }
        }
        entries
    }
}

impl Entry<'_> {
    fn is_protocol(&self) -> bool {
        matches!(self, Entry::Resource { node, .. } if is_protocol(*node))
    }
}

/// Syslog transports share one exclusive slot; only the first present one is
/// written.
fn is_protocol(node: Node) -> bool {
    matches!(node, Node::Udp | Node::Tcp | Node::Tls)
}
