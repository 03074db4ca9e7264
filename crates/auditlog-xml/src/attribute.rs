//! Attribute definitions shared by the decoder and the encoder.
//!
//! Each definition converts document text into a typed [`Value`] and back, so
//! both directions go through the same rules.

use mgmt_model::{Operation, Resource, Value};

use crate::vocab::Attribute;

/// Syslog facilities accepted by `facility`.
pub const SYSLOG_FACILITIES: &[&str] = &[
    "KERNEL",
    "USER_LEVEL",
    "MAIL_SYSTEM",
    "SYSTEM_DAEMONS",
    "SECURITY",
    "SYSLOGD",
    "LINE_PRINTER",
    "NETWORK_NEWS",
    "UUCP",
    "CLOCK_DAEMON",
    "SECURITY2",
    "FTP_DAEMON",
    "NTP",
    "LOG_AUDIT",
    "LOG_ALERT",
    "CLOCK_DAEMON2",
    "LOCAL_USE_0",
    "LOCAL_USE_1",
    "LOCAL_USE_2",
    "LOCAL_USE_3",
    "LOCAL_USE_4",
    "LOCAL_USE_5",
    "LOCAL_USE_6",
    "LOCAL_USE_7",
];

/// Message formats accepted by `syslog-format`.
pub const SYSLOG_FORMATS: &[&str] = &["RFC5424", "RFC3164"];

/// Framing modes accepted by `message-transfer`.
pub const MESSAGE_TRANSFERS: &[&str] = &["NON_TRANSPARENT_FRAMING", "OCTET_COUNTING"];

/// Conversion rule between attribute text and a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Any text, blank included.
    Text,
    /// Text that is not blank.
    NonEmptyText,
    /// `true` or `false`, any case.
    Boolean,
    /// Decimal integer within an inclusive range.
    Integer { min: i64, max: i64 },
    /// One of a fixed set of case-sensitive names.
    Enumerated(&'static [&'static str]),
    /// Byte size: digits with an optional `b`, `k`, `m`, `g` or `t` unit.
    Size,
}

/// Name, type, requiredness and default of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub attribute: Attribute,
    pub kind: AttributeKind,
    pub required: bool,
    /// Default applied by the runtime when the attribute is absent. Never
    /// written into operations or documents by this crate.
    pub default: Option<&'static str>,
}

impl AttributeDefinition {
    pub const fn name(&self) -> &'static str {
        self.attribute.local_name()
    }

    /// Decode document text into a typed value.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        match self.kind {
            AttributeKind::Text => Ok(Value::String(raw.to_string())),
            AttributeKind::NonEmptyText => {
                if raw.trim().is_empty() {
                    Err("value must not be empty".into())
                } else {
                    Ok(Value::String(raw.to_string()))
                }
            }
            AttributeKind::Boolean => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err("expected true or false".into())
                }
            }
            AttributeKind::Integer { min, max } => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|err| format!("invalid integer: {err}"))?;
                if value < min || value > max {
                    return Err(format!("{value} is outside {min}..={max}"));
                }
                Ok(Value::Integer(value))
            }
            AttributeKind::Enumerated(allowed) => {
                if allowed.contains(&raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(format!("expected one of {}", allowed.join(", ")))
                }
            }
            AttributeKind::Size => {
                if is_size(raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err("expected a size such as 10m".into())
                }
            }
        }
    }

    /// Encode a typed value as document text.
    pub fn marshal(&self, value: &Value) -> String {
        value.to_string()
    }

    /// The runtime default as a typed value.
    pub fn default_value(&self) -> Option<Value> {
        self.default.and_then(|raw| self.parse(raw).ok())
    }

    /// Decode `raw` and store it in the operation's parameter set.
    pub fn parse_and_set(&self, raw: &str, operation: &mut Operation) -> Result<(), String> {
        let value = self.parse(raw)?;
        operation.set_parameter(self.name(), value);
        Ok(())
    }

    /// Text to write for this attribute, or `None` if the resource does not
    /// define it.
    pub fn marshal_from(&self, resource: &Resource) -> Option<String> {
        resource.attribute(self.name()).map(|value| self.marshal(value))
    }
}

fn is_size(raw: &str) -> bool {
    let digits = raw.trim_end_matches(|c: char| "bBkKmMgGtT".contains(c));
    let unit_len = raw.len() - digits.len();
    unit_len <= 1 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

const fn required(attribute: Attribute, kind: AttributeKind) -> AttributeDefinition {
    AttributeDefinition {
        attribute,
        kind,
        required: true,
        default: None,
    }
}

const fn optional(
    attribute: Attribute,
    kind: AttributeKind,
    default: Option<&'static str>,
) -> AttributeDefinition {
    AttributeDefinition {
        attribute,
        kind,
        required: false,
        default,
    }
}

const NON_NEGATIVE: AttributeKind = AttributeKind::Integer {
    min: 0,
    max: i64::MAX,
};

pub const NAME: AttributeDefinition = required(Attribute::Name, AttributeKind::NonEmptyText);

pub const COMPACT: AttributeDefinition =
    optional(Attribute::Compact, AttributeKind::Boolean, Some("false"));
pub const DATE_FORMAT: AttributeDefinition = optional(
    Attribute::DateFormat,
    AttributeKind::NonEmptyText,
    Some("yyyy-MM-dd HH:mm:ss"),
);
pub const DATE_SEPARATOR: AttributeDefinition =
    optional(Attribute::DateSeparator, AttributeKind::Text, Some(" - "));
pub const ESCAPE_CONTROL_CHARACTERS: AttributeDefinition = optional(
    Attribute::EscapeControlCharacters,
    AttributeKind::Boolean,
    Some("false"),
);
pub const ESCAPE_NEW_LINE: AttributeDefinition =
    optional(Attribute::EscapeNewLine, AttributeKind::Boolean, Some("false"));
pub const INCLUDE_DATE: AttributeDefinition =
    optional(Attribute::IncludeDate, AttributeKind::Boolean, Some("true"));

pub const FORMATTER: AttributeDefinition =
    required(Attribute::Formatter, AttributeKind::NonEmptyText);
pub const MAX_FAILURE_COUNT: AttributeDefinition =
    optional(Attribute::MaxFailureCount, NON_NEGATIVE, Some("10"));
pub const PATH: AttributeDefinition = required(Attribute::Path, AttributeKind::NonEmptyText);
pub const RELATIVE_TO: AttributeDefinition =
    optional(Attribute::RelativeTo, AttributeKind::NonEmptyText, None);
pub const SUFFIX: AttributeDefinition = required(Attribute::Suffix, AttributeKind::NonEmptyText);
pub const ROTATE_SIZE: AttributeDefinition =
    optional(Attribute::RotateSize, AttributeKind::Size, Some("10m"));
pub const MAX_BACKUP_INDEX: AttributeDefinition = optional(
    Attribute::MaxBackupIndex,
    AttributeKind::Integer {
        min: 1,
        max: i64::MAX,
    },
    Some("1"),
);

pub const MAX_LENGTH: AttributeDefinition = optional(Attribute::MaxLength, NON_NEGATIVE, None);
pub const TRUNCATE: AttributeDefinition =
    optional(Attribute::Truncate, AttributeKind::Boolean, Some("false"));
pub const SYSLOG_FORMAT: AttributeDefinition = optional(
    Attribute::SyslogFormat,
    AttributeKind::Enumerated(SYSLOG_FORMATS),
    Some("RFC5424"),
);
pub const FACILITY: AttributeDefinition = optional(
    Attribute::Facility,
    AttributeKind::Enumerated(SYSLOG_FACILITIES),
    Some("USER_LEVEL"),
);
pub const APP_NAME: AttributeDefinition =
    optional(Attribute::AppName, AttributeKind::NonEmptyText, None);

pub const HOST: AttributeDefinition =
    optional(Attribute::Host, AttributeKind::NonEmptyText, Some("localhost"));
pub const PORT: AttributeDefinition = optional(
    Attribute::Port,
    AttributeKind::Integer { min: 0, max: 65535 },
    Some("514"),
);
pub const MESSAGE_TRANSFER: AttributeDefinition = optional(
    Attribute::MessageTransfer,
    AttributeKind::Enumerated(MESSAGE_TRANSFERS),
    Some("NON_TRANSPARENT_FRAMING"),
);
pub const RECONNECT_TIMEOUT: AttributeDefinition = optional(
    Attribute::ReconnectTimeout,
    AttributeKind::Integer {
        min: -1,
        max: i64::MAX,
    },
    Some("-1"),
);

pub const KEYSTORE_PASSWORD: AttributeDefinition =
    required(Attribute::KeystorePassword, AttributeKind::NonEmptyText);
pub const KEY_PASSWORD: AttributeDefinition =
    optional(Attribute::KeyPassword, AttributeKind::NonEmptyText, None);

pub const LOG_BOOT: AttributeDefinition =
    optional(Attribute::LogBoot, AttributeKind::Boolean, Some("true"));
pub const LOG_READ_ONLY: AttributeDefinition =
    optional(Attribute::LogReadOnly, AttributeKind::Boolean, Some("false"));
pub const ENABLED: AttributeDefinition =
    optional(Attribute::Enabled, AttributeKind::Boolean, Some("true"));
