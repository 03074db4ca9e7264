//! Capability map: which elements, attributes and child variants each dialect
//! family allows, expressed as one shape table.

use bitflags::bitflags;

use crate::attribute::{self as attr, AttributeDefinition};
use crate::version::{Family, SchemaVersion};
use crate::vocab::{Attribute, Element};

bitflags! {
    /// Features granted by a dialect family.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The `audit-log` subsystem element exists.
        const AUDIT_LOG = 0x01;
        /// `server-logger` may appear (host documents only).
        const SERVER_LOGGER = 0x02;
        /// Syslog handlers accept `facility` and `app-name`.
        const SYSLOG_IDENTITY = 0x04;
        /// Periodic and size rotating file handlers exist.
        const ROTATING_HANDLERS = 0x08;
        /// TCP and TLS transports accept `reconnect-timeout`.
        const RECONNECT_TIMEOUT = 0x10;
    }
}

impl Family {
    /// Capabilities shared by every version of this family.
    pub fn capabilities(self) -> Capabilities {
        match self {
            Family::PreAudit => Capabilities::empty(),
            Family::Initial => Capabilities::AUDIT_LOG | Capabilities::SERVER_LOGGER,
            Family::SyslogIdentity => {
                Capabilities::AUDIT_LOG
                    | Capabilities::SERVER_LOGGER
                    | Capabilities::SYSLOG_IDENTITY
            }
            Family::Rotating => Capabilities::all(),
        }
    }
}

/// Position in the document tree. Several nodes share one element name
/// (`handlers` is both the handler block and a logger's reference block), so
/// shapes are keyed by node rather than by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    AuditLog,
    Formatters,
    JsonFormatter,
    Handlers,
    FileHandler,
    PeriodicRotatingFileHandler,
    SizeRotatingFileHandler,
    SyslogHandler,
    Udp,
    Tcp,
    Tls,
    Truststore,
    ClientCertStore,
    Logger,
    ServerLogger,
    HandlerReferences,
    HandlerReference,
}

impl Node {
    pub const fn element(self) -> Element {
        match self {
            Node::AuditLog => Element::AuditLog,
            Node::Formatters => Element::Formatters,
            Node::JsonFormatter => Element::JsonFormatter,
            Node::Handlers | Node::HandlerReferences => Element::Handlers,
            Node::FileHandler => Element::FileHandler,
            Node::PeriodicRotatingFileHandler => Element::PeriodicRotatingFileHandler,
            Node::SizeRotatingFileHandler => Element::SizeRotatingFileHandler,
            Node::SyslogHandler => Element::SyslogHandler,
            Node::Udp => Element::Udp,
            Node::Tcp => Element::Tcp,
            Node::Tls => Element::Tls,
            Node::Truststore => Element::Truststore,
            Node::ClientCertStore => Element::ClientCertStore,
            Node::Logger => Element::Logger,
            Node::ServerLogger => Element::ServerLogger,
            Node::HandlerReference => Element::Handler,
        }
    }

    /// Address segment type of the resource this node creates. Grouping
    /// blocks create no resource and return `None`.
    pub const fn path_key(self) -> Option<&'static str> {
        match self {
            Node::AuditLog => Some("access"),
            Node::JsonFormatter => Some("json-formatter"),
            Node::FileHandler => Some("file-handler"),
            Node::PeriodicRotatingFileHandler => Some("periodic-rotating-file-handler"),
            Node::SizeRotatingFileHandler => Some("size-rotating-file-handler"),
            Node::SyslogHandler => Some("syslog-handler"),
            Node::Udp | Node::Tcp | Node::Tls => Some("protocol"),
            Node::Truststore | Node::ClientCertStore => Some("authentication"),
            Node::Logger => Some("logger"),
            Node::ServerLogger => Some("server-logger"),
            Node::HandlerReference => Some("handler"),
            Node::Formatters | Node::Handlers | Node::HandlerReferences => None,
        }
    }

    /// Address segment name for resources that are not named by a `name`
    /// attribute.
    pub const fn fixed_name(self) -> Option<&'static str> {
        match self {
            Node::AuditLog => Some("audit"),
            Node::Udp => Some("udp"),
            Node::Tcp => Some("tcp"),
            Node::Tls => Some("tls"),
            Node::Truststore => Some("truststore"),
            Node::ClientCertStore => Some("client-cert-store"),
            Node::Logger | Node::ServerLogger => Some("audit-log"),
            _ => None,
        }
    }
}

/// Legal attributes and children of one node under one capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceShape {
    pub node: Node,
    /// Attribute definitions in canonical output order.
    pub attributes: &'static [AttributeDefinition],
    /// Legal child nodes in canonical output order.
    pub children: &'static [Node],
}

impl ResourceShape {
    pub fn attribute(&self, attribute: Attribute) -> Option<&'static AttributeDefinition> {
        self.attributes
            .iter()
            .find(|definition| definition.attribute == attribute)
    }

    /// Child node reached through `element`, if it is legal here.
    pub fn child(&self, element: Element) -> Option<Node> {
        self.children
            .iter()
            .copied()
            .find(|node| node.element() == element)
    }

    /// True when the element must have no content.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

const NO_ATTRIBUTES: &[AttributeDefinition] = &[];
const NO_CHILDREN: &[Node] = &[];

const JSON_FORMATTER: &[AttributeDefinition] = &[
    attr::NAME,
    attr::COMPACT,
    attr::DATE_FORMAT,
    attr::DATE_SEPARATOR,
    attr::ESCAPE_CONTROL_CHARACTERS,
    attr::ESCAPE_NEW_LINE,
    attr::INCLUDE_DATE,
];
const FILE_HANDLER: &[AttributeDefinition] = &[
    attr::NAME,
    attr::FORMATTER,
    attr::MAX_FAILURE_COUNT,
    attr::PATH,
    attr::RELATIVE_TO,
];
const PERIODIC_ROTATING_FILE_HANDLER: &[AttributeDefinition] = &[
    attr::NAME,
    attr::FORMATTER,
    attr::MAX_FAILURE_COUNT,
    attr::PATH,
    attr::RELATIVE_TO,
    attr::SUFFIX,
];
const SIZE_ROTATING_FILE_HANDLER: &[AttributeDefinition] = &[
    attr::NAME,
    attr::FORMATTER,
    attr::MAX_FAILURE_COUNT,
    attr::PATH,
    attr::RELATIVE_TO,
    attr::ROTATE_SIZE,
    attr::MAX_BACKUP_INDEX,
];
const SYSLOG_HANDLER: &[AttributeDefinition] = &[
    attr::NAME,
    attr::FORMATTER,
    attr::MAX_FAILURE_COUNT,
    attr::SYSLOG_FORMAT,
    attr::MAX_LENGTH,
    attr::TRUNCATE,
];
const SYSLOG_HANDLER_WITH_IDENTITY: &[AttributeDefinition] = &[
    attr::NAME,
    attr::FORMATTER,
    attr::MAX_FAILURE_COUNT,
    attr::SYSLOG_FORMAT,
    attr::MAX_LENGTH,
    attr::TRUNCATE,
    attr::FACILITY,
    attr::APP_NAME,
];
const UDP: &[AttributeDefinition] = &[attr::HOST, attr::PORT];
const STREAM: &[AttributeDefinition] = &[attr::HOST, attr::PORT, attr::MESSAGE_TRANSFER];
const STREAM_WITH_RECONNECT: &[AttributeDefinition] = &[
    attr::HOST,
    attr::PORT,
    attr::MESSAGE_TRANSFER,
    attr::RECONNECT_TIMEOUT,
];
const TRUSTSTORE: &[AttributeDefinition] =
    &[attr::PATH, attr::RELATIVE_TO, attr::KEYSTORE_PASSWORD];
const CLIENT_CERT_STORE: &[AttributeDefinition] = &[
    attr::PATH,
    attr::RELATIVE_TO,
    attr::KEYSTORE_PASSWORD,
    attr::KEY_PASSWORD,
];
const LOGGER: &[AttributeDefinition] = &[attr::LOG_BOOT, attr::LOG_READ_ONLY, attr::ENABLED];
const HANDLER_REFERENCE: &[AttributeDefinition] = &[attr::NAME];

const ROOT_CHILDREN: &[Node] = &[Node::Formatters, Node::Handlers, Node::Logger];
const ROOT_CHILDREN_WITH_SERVER_LOGGER: &[Node] = &[
    Node::Formatters,
    Node::Handlers,
    Node::Logger,
    Node::ServerLogger,
];
const FORMATTER_KINDS: &[Node] = &[Node::JsonFormatter];
const HANDLER_KINDS: &[Node] = &[Node::FileHandler, Node::SyslogHandler];
const HANDLER_KINDS_WITH_ROTATING: &[Node] = &[
    Node::FileHandler,
    Node::PeriodicRotatingFileHandler,
    Node::SizeRotatingFileHandler,
    Node::SyslogHandler,
];
const PROTOCOLS: &[Node] = &[Node::Udp, Node::Tcp, Node::Tls];
const KEY_STORES: &[Node] = &[Node::Truststore, Node::ClientCertStore];
const LOGGER_CHILDREN: &[Node] = &[Node::HandlerReferences];
const HANDLER_REFERENCES: &[Node] = &[Node::HandlerReference];

/// Answers legality questions for one dialect version and document context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityMap {
    version: SchemaVersion,
    capabilities: Capabilities,
}

impl CapabilityMap {
    /// Map for `version`; `host` marks a domain-host document, the only
    /// context in which `server-logger` is legal.
    pub fn new(version: SchemaVersion, host: bool) -> Self {
        let mut capabilities = version.family().capabilities();
        if !host {
            capabilities.remove(Capabilities::SERVER_LOGGER);
        }
        CapabilityMap {
            version,
            capabilities,
        }
    }

    /// Map granting everything the vocabulary knows, used when writing.
    pub fn full() -> Self {
        CapabilityMap::new(SchemaVersion::LATEST, true)
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether `node` exists at all under this map.
    pub fn supports(&self, node: Node) -> bool {
        let caps = self.capabilities;
        if !caps.contains(Capabilities::AUDIT_LOG) {
            return false;
        }
        match node {
            Node::PeriodicRotatingFileHandler | Node::SizeRotatingFileHandler => {
                caps.contains(Capabilities::ROTATING_HANDLERS)
            }
            Node::ServerLogger => caps.contains(Capabilities::SERVER_LOGGER),
            _ => true,
        }
    }

    /// Shape of `node`, or `None` when the node is not legal.
    pub fn shape(&self, node: Node) -> Option<ResourceShape> {
        if !self.supports(node) {
            return None;
        }
        let caps = self.capabilities;
        let (attributes, children) = match node {
            Node::AuditLog => {
                if caps.contains(Capabilities::SERVER_LOGGER) {
                    (NO_ATTRIBUTES, ROOT_CHILDREN_WITH_SERVER_LOGGER)
                } else {
                    (NO_ATTRIBUTES, ROOT_CHILDREN)
                }
            }
            Node::Formatters => (NO_ATTRIBUTES, FORMATTER_KINDS),
            Node::JsonFormatter => (JSON_FORMATTER, NO_CHILDREN),
            Node::Handlers => {
                if caps.contains(Capabilities::ROTATING_HANDLERS) {
                    (NO_ATTRIBUTES, HANDLER_KINDS_WITH_ROTATING)
                } else {
                    (NO_ATTRIBUTES, HANDLER_KINDS)
                }
            }
            Node::FileHandler => (FILE_HANDLER, NO_CHILDREN),
            Node::PeriodicRotatingFileHandler => (PERIODIC_ROTATING_FILE_HANDLER, NO_CHILDREN),
            Node::SizeRotatingFileHandler => (SIZE_ROTATING_FILE_HANDLER, NO_CHILDREN),
            Node::SyslogHandler => {
                if caps.contains(Capabilities::SYSLOG_IDENTITY) {
                    (SYSLOG_HANDLER_WITH_IDENTITY, PROTOCOLS)
                } else {
                    (SYSLOG_HANDLER, PROTOCOLS)
                }
            }
            Node::Udp => (UDP, NO_CHILDREN),
            Node::Tcp | Node::Tls => {
                let attributes = if caps.contains(Capabilities::RECONNECT_TIMEOUT) {
                    STREAM_WITH_RECONNECT
                } else {
                    STREAM
                };
                let children = if node == Node::Tls {
                    KEY_STORES
                } else {
                    NO_CHILDREN
                };
                (attributes, children)
            }
            Node::Truststore => (TRUSTSTORE, NO_CHILDREN),
            Node::ClientCertStore => (CLIENT_CERT_STORE, NO_CHILDREN),
            Node::Logger | Node::ServerLogger => (LOGGER, LOGGER_CHILDREN),
            Node::HandlerReferences => (NO_ATTRIBUTES, HANDLER_REFERENCES),
            Node::HandlerReference => (HANDLER_REFERENCE, NO_CHILDREN),
        };
        Some(ResourceShape {
            node,
            attributes,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute_names(map: &CapabilityMap, node: Node) -> Vec<&'static str> {
        map.shape(node)
            .map(|shape| shape.attributes.iter().map(|d| d.name()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn pre_audit_versions_have_no_shapes() {
        let map = CapabilityMap::new(SchemaVersion::V1_4, true);
        assert!(map.capabilities().is_empty());
        assert!(map.shape(Node::AuditLog).is_none());
        assert!(map.shape(Node::Logger).is_none());
    }

    #[test]
    fn server_logger_needs_host_context() {
        let standalone = CapabilityMap::new(SchemaVersion::V3_0, false);
        let host = CapabilityMap::new(SchemaVersion::V3_0, true);
        assert!(!standalone.supports(Node::ServerLogger));
        assert!(host.supports(Node::ServerLogger));
        let root = standalone.shape(Node::AuditLog).unwrap();
        assert_eq!(root.child(Element::ServerLogger), None);
        let root = host.shape(Node::AuditLog).unwrap();
        assert_eq!(root.child(Element::ServerLogger), Some(Node::ServerLogger));
    }

    #[test]
    fn rotating_handlers_arrive_with_their_family() {
        for (version, expected) in [
            (SchemaVersion::V1_5, false),
            (SchemaVersion::V1_6, false),
            (SchemaVersion::V1_7, true),
            (SchemaVersion::V2_2, false),
            (SchemaVersion::V3_0, true),
        ] {
            let map = CapabilityMap::new(version, false);
            let handlers = map.shape(Node::Handlers).unwrap();
            assert_eq!(
                handlers.child(Element::SizeRotatingFileHandler).is_some(),
                expected,
                "{version}"
            );
            assert_eq!(map.supports(Node::PeriodicRotatingFileHandler), expected);
        }
    }

    #[test]
    fn syslog_identity_and_reconnect_are_gated() {
        let initial = CapabilityMap::new(SchemaVersion::V1_5, false);
        let identity = CapabilityMap::new(SchemaVersion::V2_0, false);
        let rotating = CapabilityMap::new(SchemaVersion::V1_7, false);
        assert!(!attribute_names(&initial, Node::SyslogHandler).contains(&"facility"));
        assert!(attribute_names(&identity, Node::SyslogHandler).contains(&"app-name"));
        assert!(!attribute_names(&identity, Node::Tcp).contains(&"reconnect-timeout"));
        assert!(attribute_names(&rotating, Node::Tls).contains(&"reconnect-timeout"));
    }

    #[test]
    fn message_transfer_is_stream_only() {
        let map = CapabilityMap::full();
        let udp = map.shape(Node::Udp).unwrap();
        let tcp = map.shape(Node::Tcp).unwrap();
        assert!(udp.attribute(Attribute::MessageTransfer).is_none());
        assert!(tcp.attribute(Attribute::MessageTransfer).is_some());
        assert!(udp.attribute(Attribute::Host).is_some());
    }

    #[test]
    fn key_password_is_client_cert_only() {
        let map = CapabilityMap::full();
        assert!(map
            .shape(Node::Truststore)
            .unwrap()
            .attribute(Attribute::KeyPassword)
            .is_none());
        assert!(map
            .shape(Node::ClientCertStore)
            .unwrap()
            .attribute(Attribute::KeyPassword)
            .is_some());
    }

    #[test]
    fn handler_block_and_reference_block_share_an_element() {
        let map = CapabilityMap::full();
        assert_eq!(Node::Handlers.element(), Node::HandlerReferences.element());
        let logger = map.shape(Node::Logger).unwrap();
        assert_eq!(logger.child(Element::Handlers), Some(Node::HandlerReferences));
        let root = map.shape(Node::AuditLog).unwrap();
        assert_eq!(root.child(Element::Handlers), Some(Node::Handlers));
    }
}
