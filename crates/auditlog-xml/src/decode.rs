//! Recursive-descent decoder from an `audit-log` element to create operations.

use std::collections::HashSet;

use mgmt_model::{Address, Operation};
use tracing::debug;

use crate::capability::{CapabilityMap, Node, ResourceShape};
use crate::cursor::{StartTag, Tag, XmlCursor};
use crate::error::XmlError;
use crate::version::SchemaVersion;
use crate::vocab::{Attribute, Element};

/// Caller-supplied context for one decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    /// Dialect in effect for the whole document.
    pub version: SchemaVersion,
    /// True for domain-host documents, which may carry `server-logger`.
    pub host: bool,
    /// Address under which the `access=audit` resource is created.
    pub base: Address,
}

impl DecodeContext {
    /// Standalone-server context.
    pub fn new(version: SchemaVersion, base: Address) -> Self {
        DecodeContext {
            version,
            host: false,
            base,
        }
    }

    pub fn with_host(mut self, host: bool) -> Self {
        self.host = host;
        self
    }
}

/// Decode the `audit-log` element at `root` (already read from `cursor`) and
/// return the operations that recreate it, subsystem root first.
///
/// On return the cursor sits just after the closing `audit-log` tag. Any
/// violation aborts the whole call; no partial list is returned.
pub fn decode_audit_log(
    cursor: &mut XmlCursor<'_>,
    root: &StartTag,
    context: &DecodeContext,
) -> Result<Vec<Operation>, XmlError> {
    let decoder = AuditLogDecoder {
        cursor,
        capabilities: CapabilityMap::new(context.version, context.host),
        namespace: context.version.namespace_uri(),
        base: context.base.clone(),
        operations: Vec::new(),
        addresses: HashSet::new(),
    };
    decoder.decode(root)
}

struct AuditLogDecoder<'c, 'a> {
    cursor: &'c mut XmlCursor<'a>,
    capabilities: CapabilityMap,
    namespace: String,
    base: Address,
    operations: Vec<Operation>,
    addresses: HashSet<Address>,
}

impl AuditLogDecoder<'_, '_> {
    fn decode(mut self, root: &StartTag) -> Result<Vec<Operation>, XmlError> {
        self.require_namespace(root)?;
        if Element::for_name(&root.local_name) != Some(Element::AuditLog) {
            return Err(unexpected_element(root));
        }
        let base = self.base.clone();
        let (shape, audit) = self.create(Node::AuditLog, root, &base)?;

        let mut seen_logger = false;
        let mut seen_server_logger = false;
        while let Some((node, tag)) = self.next_child(&shape)? {
            match node {
                Node::Formatters => self.decode_formatters(&tag, &audit)?,
                Node::Handlers => self.decode_handlers(&tag, &audit)?,
                Node::Logger => {
                    require_single(&mut seen_logger, &tag)?;
                    self.decode_logger(Node::Logger, &tag, &audit)?;
                }
                Node::ServerLogger => {
                    require_single(&mut seen_server_logger, &tag)?;
                    self.decode_logger(Node::ServerLogger, &tag, &audit)?;
                }
                _ => return Err(unexpected_element(&tag)),
            }
        }
        debug!(
            version = %self.capabilities.version(),
            operations = self.operations.len(),
            "decoded audit-log"
        );
        Ok(self.operations)
    }

    fn decode_formatters(&mut self, tag: &StartTag, audit: &Address) -> Result<(), XmlError> {
        let shape = self.open_group(Node::Formatters, tag)?;
        while let Some((node, child)) = self.next_child(&shape)? {
            match node {
                Node::JsonFormatter => self.decode_leaf(node, &child, audit)?,
                _ => return Err(unexpected_element(&child)),
            }
        }
        Ok(())
    }

    fn decode_handlers(&mut self, tag: &StartTag, audit: &Address) -> Result<(), XmlError> {
        let shape = self.open_group(Node::Handlers, tag)?;
        while let Some((node, child)) = self.next_child(&shape)? {
            match node {
                Node::FileHandler
                | Node::PeriodicRotatingFileHandler
                | Node::SizeRotatingFileHandler => self.decode_leaf(node, &child, audit)?,
                Node::SyslogHandler => self.decode_syslog_handler(&child, audit)?,
                _ => return Err(unexpected_element(&child)),
            }
        }
        Ok(())
    }

    fn decode_syslog_handler(&mut self, tag: &StartTag, audit: &Address) -> Result<(), XmlError> {
        let (shape, handler) = self.create(Node::SyslogHandler, tag, audit)?;
        let mut protocol_set = false;
        while let Some((node, child)) = self.next_child(&shape)? {
            match node {
                Node::Udp | Node::Tcp | Node::Tls => {
                    if protocol_set {
                        return Err(XmlError::ConflictingVariant {
                            slot: "protocol".into(),
                            element: child.local_name,
                            location: child.location,
                        });
                    }
                    protocol_set = true;
                    self.decode_protocol(node, &child, &handler)?;
                }
                _ => return Err(unexpected_element(&child)),
            }
        }
        Ok(())
    }

    fn decode_protocol(
        &mut self,
        node: Node,
        tag: &StartTag,
        handler: &Address,
    ) -> Result<(), XmlError> {
        let (shape, protocol) = self.create(node, tag, handler)?;
        if shape.is_leaf() {
            return self.cursor.require_no_content();
        }
        let mut seen_truststore = false;
        let mut seen_client_cert_store = false;
        while let Some((store, child)) = self.next_child(&shape)? {
            match store {
                Node::Truststore => require_single(&mut seen_truststore, &child)?,
                Node::ClientCertStore => require_single(&mut seen_client_cert_store, &child)?,
                _ => return Err(unexpected_element(&child)),
            }
            self.decode_leaf(store, &child, &protocol)?;
        }
        Ok(())
    }

    fn decode_logger(
        &mut self,
        node: Node,
        tag: &StartTag,
        audit: &Address,
    ) -> Result<(), XmlError> {
        let (shape, logger) = self.create(node, tag, audit)?;
        while let Some((child_node, child)) = self.next_child(&shape)? {
            match child_node {
                Node::HandlerReferences => self.decode_handler_references(&child, &logger)?,
                _ => return Err(unexpected_element(&child)),
            }
        }
        Ok(())
    }

    fn decode_handler_references(
        &mut self,
        tag: &StartTag,
        logger: &Address,
    ) -> Result<(), XmlError> {
        let shape = self.open_group(Node::HandlerReferences, tag)?;
        while let Some((node, child)) = self.next_child(&shape)? {
            match node {
                Node::HandlerReference => self.decode_leaf(node, &child, logger)?,
                _ => return Err(unexpected_element(&child)),
            }
        }
        Ok(())
    }

    /// Create a resource for an element that must be empty.
    fn decode_leaf(
        &mut self,
        node: Node,
        tag: &StartTag,
        parent: &Address,
    ) -> Result<(), XmlError> {
        self.create(node, tag, parent)?;
        self.cursor.require_no_content()
    }

    /// Validate a grouping element, which creates no resource and takes no
    /// attributes.
    fn open_group(&self, node: Node, tag: &StartTag) -> Result<ResourceShape, XmlError> {
        let shape = self.shape(node, tag)?;
        if let Some(raw) = tag.attributes.first() {
            return Err(unexpected_attribute(tag, &raw.local_name));
        }
        Ok(shape)
    }

    /// Read the attributes of `tag`, build its create operation and append it
    /// to the output.
    fn create(
        &mut self,
        node: Node,
        tag: &StartTag,
        parent: &Address,
    ) -> Result<(ResourceShape, Address), XmlError> {
        let shape = self.shape(node, tag)?;
        let mut operation = Operation::create(parent.clone());
        let mut name = None;
        let mut seen = Vec::with_capacity(tag.attributes.len());

        for raw in &tag.attributes {
            if raw.namespace.is_some() {
                return Err(unexpected_attribute(tag, &raw.local_name));
            }
            let definition = Attribute::for_name(&raw.local_name)
                .and_then(|attribute| shape.attribute(attribute))
                .ok_or_else(|| unexpected_attribute(tag, &raw.local_name))?;
            let invalid = |reason: String| XmlError::InvalidAttributeValue {
                element: tag.local_name.clone(),
                attribute: raw.local_name.clone(),
                value: raw.value.clone(),
                reason,
                location: tag.location,
            };
            if definition.attribute == Attribute::Name {
                definition.parse(&raw.value).map_err(invalid)?;
                name = Some(raw.value.clone());
            } else {
                definition
                    .parse_and_set(&raw.value, &mut operation)
                    .map_err(invalid)?;
            }
            seen.push(definition.attribute);
        }

        let missing: Vec<String> = shape
            .attributes
            .iter()
            .filter(|definition| definition.required && !seen.contains(&definition.attribute))
            .map(|definition| definition.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(XmlError::MissingRequiredAttribute {
                element: tag.local_name.clone(),
                attributes: missing,
                location: tag.location,
            });
        }

        let (key, value) = match (node.path_key(), node.fixed_name(), name) {
            (Some(key), Some(fixed), _) => (key, fixed.to_string()),
            (Some(key), None, Some(name)) => (key, name),
            _ => {
                return Err(XmlError::MissingRequiredAttribute {
                    element: tag.local_name.clone(),
                    attributes: vec![Attribute::Name.local_name().to_string()],
                    location: tag.location,
                })
            }
        };
        let address = parent.append(key, value.clone());
        if !self.addresses.insert(address.clone()) {
            return Err(XmlError::DuplicateName {
                element: tag.local_name.clone(),
                name: value,
                location: tag.location,
            });
        }
        debug!(address = %address, parameters = operation.parameters.len(), "decoded resource");
        operation.address = address.clone();
        self.operations.push(operation);
        Ok((shape, address))
    }

    /// Next child of the element described by `shape`, or `None` at its end
    /// tag. Children outside the shape are unexpected elements.
    fn next_child(&mut self, shape: &ResourceShape) -> Result<Option<(Node, StartTag)>, XmlError> {
        match self.cursor.next_tag()? {
            Tag::End => Ok(None),
            Tag::Start(tag) => {
                self.require_namespace(&tag)?;
                let node = Element::for_name(&tag.local_name)
                    .and_then(|element| shape.child(element))
                    .filter(|node| self.capabilities.supports(*node))
                    .ok_or_else(|| unexpected_element(&tag))?;
                Ok(Some((node, tag)))
            }
        }
    }

    fn shape(&self, node: Node, tag: &StartTag) -> Result<ResourceShape, XmlError> {
        self.capabilities
            .shape(node)
            .ok_or_else(|| unexpected_element(tag))
    }

    fn require_namespace(&self, tag: &StartTag) -> Result<(), XmlError> {
        if tag.namespace.as_deref() == Some(self.namespace.as_str()) {
            return Ok(());
        }
        Err(XmlError::NamespaceMismatch {
            element: tag.local_name.clone(),
            expected: self.namespace.clone(),
            found: tag.namespace.clone().unwrap_or_default(),
            location: tag.location,
        })
    }
}

fn require_single(seen: &mut bool, tag: &StartTag) -> Result<(), XmlError> {
    if *seen {
        return Err(XmlError::DuplicateChild {
            element: tag.local_name.clone(),
            location: tag.location,
        });
    }
    *seen = true;
    Ok(())
}

fn unexpected_element(tag: &StartTag) -> XmlError {
    XmlError::UnexpectedElement {
        element: tag.local_name.clone(),
        location: tag.location,
    }
}

fn unexpected_attribute(tag: &StartTag, attribute: &str) -> XmlError {
    XmlError::UnexpectedAttribute {
        element: tag.local_name.clone(),
        attribute: attribute.to_string(),
        location: tag.location,
    }
}
