//! Closed vocabularies of element and attribute names.

use core::fmt;

/// Element names of the audit-log dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
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
    Handler,
}

impl Element {
    /// Every element, in declaration order.
    pub const ALL: &'static [Element] = &[
        Element::AuditLog,
        Element::Formatters,
        Element::JsonFormatter,
        Element::Handlers,
        Element::FileHandler,
        Element::PeriodicRotatingFileHandler,
        Element::SizeRotatingFileHandler,
        Element::SyslogHandler,
        Element::Udp,
        Element::Tcp,
        Element::Tls,
        Element::Truststore,
        Element::ClientCertStore,
        Element::Logger,
        Element::ServerLogger,
        Element::Handler,
    ];

    /// Name as written in documents.
    pub const fn local_name(self) -> &'static str {
        match self {
            Element::AuditLog => "audit-log",
            Element::Formatters => "formatters",
            Element::JsonFormatter => "json-formatter",
            Element::Handlers => "handlers",
            Element::FileHandler => "file-handler",
            Element::PeriodicRotatingFileHandler => "periodic-rotating-file-handler",
            Element::SizeRotatingFileHandler => "size-rotating-file-handler",
            Element::SyslogHandler => "syslog-handler",
            Element::Udp => "udp",
            Element::Tcp => "tcp",
            Element::Tls => "tls",
            Element::Truststore => "truststore",
            Element::ClientCertStore => "client-cert-store",
            Element::Logger => "logger",
            Element::ServerLogger => "server-logger",
            Element::Handler => "handler",
        }
    }

    /// Look up a document name. Unknown names are `None`, never a fallback.
    pub fn for_name(local: &str) -> Option<Self> {
        match local {
            "audit-log" => Some(Element::AuditLog),
            "formatters" => Some(Element::Formatters),
            "json-formatter" => Some(Element::JsonFormatter),
            "handlers" => Some(Element::Handlers),
            "file-handler" => Some(Element::FileHandler),
            "periodic-rotating-file-handler" => Some(Element::PeriodicRotatingFileHandler),
            "size-rotating-file-handler" => Some(Element::SizeRotatingFileHandler),
            "syslog-handler" => Some(Element::SyslogHandler),
            "udp" => Some(Element::Udp),
            "tcp" => Some(Element::Tcp),
            "tls" => Some(Element::Tls),
            "truststore" => Some(Element::Truststore),
            "client-cert-store" => Some(Element::ClientCertStore),
            "logger" => Some(Element::Logger),
            "server-logger" => Some(Element::ServerLogger),
            "handler" => Some(Element::Handler),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// Attribute names of the audit-log dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Name,
    Compact,
    DateFormat,
    DateSeparator,
    EscapeControlCharacters,
    EscapeNewLine,
    IncludeDate,
    MaxFailureCount,
    Formatter,
    Path,
    RelativeTo,
    Suffix,
    RotateSize,
    MaxBackupIndex,
    MaxLength,
    Truncate,
    SyslogFormat,
    Facility,
    AppName,
    Host,
    Port,
    MessageTransfer,
    ReconnectTimeout,
    KeystorePassword,
    KeyPassword,
    LogReadOnly,
    LogBoot,
    Enabled,
}

impl Attribute {
    /// Every attribute, in declaration order.
    pub const ALL: &'static [Attribute] = &[
        Attribute::Name,
        Attribute::Compact,
        Attribute::DateFormat,
        Attribute::DateSeparator,
        Attribute::EscapeControlCharacters,
        Attribute::EscapeNewLine,
        Attribute::IncludeDate,
        Attribute::MaxFailureCount,
        Attribute::Formatter,
        Attribute::Path,
        Attribute::RelativeTo,
        Attribute::Suffix,
        Attribute::RotateSize,
        Attribute::MaxBackupIndex,
        Attribute::MaxLength,
        Attribute::Truncate,
        Attribute::SyslogFormat,
        Attribute::Facility,
        Attribute::AppName,
        Attribute::Host,
        Attribute::Port,
        Attribute::MessageTransfer,
        Attribute::ReconnectTimeout,
        Attribute::KeystorePassword,
        Attribute::KeyPassword,
        Attribute::LogReadOnly,
        Attribute::LogBoot,
        Attribute::Enabled,
    ];

    /// Name as written in documents.
    pub const fn local_name(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Compact => "compact",
            Attribute::DateFormat => "date-format",
            Attribute::DateSeparator => "date-separator",
            Attribute::EscapeControlCharacters => "escape-control-characters",
            Attribute::EscapeNewLine => "escape-new-line",
            Attribute::IncludeDate => "include-date",
            Attribute::MaxFailureCount => "max-failure-count",
            Attribute::Formatter => "formatter",
            Attribute::Path => "path",
            Attribute::RelativeTo => "relative-to",
            Attribute::Suffix => "suffix",
            Attribute::RotateSize => "rotate-size",
            Attribute::MaxBackupIndex => "max-backup-index",
            Attribute::MaxLength => "max-length",
            Attribute::Truncate => "truncate",
            Attribute::SyslogFormat => "syslog-format",
            Attribute::Facility => "facility",
            Attribute::AppName => "app-name",
            Attribute::Host => "host",
            Attribute::Port => "port",
            Attribute::MessageTransfer => "message-transfer",
            Attribute::ReconnectTimeout => "reconnect-timeout",
            Attribute::KeystorePassword => "keystore-password",
            Attribute::KeyPassword => "key-password",
            Attribute::LogReadOnly => "log-read-only",
            Attribute::LogBoot => "log-boot",
            Attribute::Enabled => "enabled",
        }
    }

    /// Look up a document name. Unknown names are `None`, never a fallback.
    pub fn for_name(local: &str) -> Option<Self> {
        match local {
            "name" => Some(Attribute::Name),
            "compact" => Some(Attribute::Compact),
            "date-format" => Some(Attribute::DateFormat),
            "date-separator" => Some(Attribute::DateSeparator),
            "escape-control-characters" => Some(Attribute::EscapeControlCharacters),
            "escape-new-line" => Some(Attribute::EscapeNewLine),
            "include-date" => Some(Attribute::IncludeDate),
            "max-failure-count" => Some(Attribute::MaxFailureCount),
            "formatter" => Some(Attribute::Formatter),
            "path" => Some(Attribute::Path),
            "relative-to" => Some(Attribute::RelativeTo),
            "suffix" => Some(Attribute::Suffix),
            "rotate-size" => Some(Attribute::RotateSize),
            "max-backup-index" => Some(Attribute::MaxBackupIndex),
            "max-length" => Some(Attribute::MaxLength),
            "truncate" => Some(Attribute::Truncate),
            "syslog-format" => Some(Attribute::SyslogFormat),
            "facility" => Some(Attribute::Facility),
            "app-name" => Some(Attribute::AppName),
            "host" => Some(Attribute::Host),
            "port" => Some(Attribute::Port),
            "message-transfer" => Some(Attribute::MessageTransfer),
            "reconnect-timeout" => Some(Attribute::ReconnectTimeout),
            "keystore-password" => Some(Attribute::KeystorePassword),
            "key-password" => Some(Attribute::KeyPassword),
            "log-read-only" => Some(Attribute::LogReadOnly),
            "log-boot" => Some(Attribute::LogBoot),
            "enabled" => Some(Attribute::Enabled),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}
