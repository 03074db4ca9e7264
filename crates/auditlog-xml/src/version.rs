//! Dialect generations and their classification into behaviour families.

use core::fmt;
use std::str::FromStr;

const NAMESPACE_PREFIX: &str = "urn:jboss:domain:";

/// One generation of the management document dialect, totally ordered by
/// release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V2_0,
    V2_1,
    V2_2,
    V3_0,
}

impl SchemaVersion {
    /// Every known version, oldest first.
    pub const ALL: &'static [SchemaVersion] = &[
        SchemaVersion::V1_0,
        SchemaVersion::V1_1,
        SchemaVersion::V1_2,
        SchemaVersion::V1_3,
        SchemaVersion::V1_4,
        SchemaVersion::V1_5,
        SchemaVersion::V1_6,
        SchemaVersion::V1_7,
        SchemaVersion::V2_0,
        SchemaVersion::V2_1,
        SchemaVersion::V2_2,
        SchemaVersion::V3_0,
    ];

    /// Newest dialect known to this crate.
    pub const LATEST: SchemaVersion = SchemaVersion::V3_0;

    pub const fn major(self) -> u32 {
        match self {
            SchemaVersion::V1_0
            | SchemaVersion::V1_1
            | SchemaVersion::V1_2
            | SchemaVersion::V1_3
            | SchemaVersion::V1_4
            | SchemaVersion::V1_5
            | SchemaVersion::V1_6
            | SchemaVersion::V1_7 => 1,
            SchemaVersion::V2_0 | SchemaVersion::V2_1 | SchemaVersion::V2_2 => 2,
            SchemaVersion::V3_0 => 3,
        }
    }

    pub const fn minor(self) -> u32 {
        match self {
            SchemaVersion::V1_0 | SchemaVersion::V2_0 | SchemaVersion::V3_0 => 0,
            SchemaVersion::V1_1 | SchemaVersion::V2_1 => 1,
            SchemaVersion::V1_2 | SchemaVersion::V2_2 => 2,
            SchemaVersion::V1_3 => 3,
            SchemaVersion::V1_4 => 4,
            SchemaVersion::V1_5 => 5,
            SchemaVersion::V1_6 => 6,
            SchemaVersion::V1_7 => 7,
        }
    }

    /// Behaviour family this version belongs to.
    pub const fn family(self) -> Family {
        match self {
            SchemaVersion::V1_0
            | SchemaVersion::V1_1
            | SchemaVersion::V1_2
            | SchemaVersion::V1_3
            | SchemaVersion::V1_4 => Family::PreAudit,
            SchemaVersion::V1_5 => Family::Initial,
            SchemaVersion::V1_6
            | SchemaVersion::V2_0
            | SchemaVersion::V2_1
            | SchemaVersion::V2_2 => Family::SyslogIdentity,
            SchemaVersion::V1_7 | SchemaVersion::V3_0 => Family::Rotating,
        }
    }

    /// Namespace URI identifying this dialect in documents.
    pub fn namespace_uri(self) -> String {
        format!("{NAMESPACE_PREFIX}{self}")
    }

    /// Resolve a namespace URI such as `urn:jboss:domain:1.5`.
    pub fn from_namespace(uri: &str) -> Option<Self> {
        uri.strip_prefix(NAMESPACE_PREFIX)
            .and_then(|rest| rest.parse().ok())
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

/// Error returned when text names no known schema version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schema version: {0}")]
pub struct UnknownVersion(pub String);

impl FromStr for SchemaVersion {
    type Err = UnknownVersion;

    /// Accepts `major.minor` or a full namespace URI.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let numeric = trimmed.strip_prefix(NAMESPACE_PREFIX).unwrap_or(trimmed);
        SchemaVersion::ALL
            .iter()
            .copied()
            .find(|version| version.to_string() == numeric)
            .ok_or_else(|| UnknownVersion(text.to_string()))
    }
}

/// Group of consecutive dialect generations that share one set of audit-log
/// rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    /// 1.0 through 1.4: no audit-log subsystem at all.
    PreAudit,
    /// 1.5: file and syslog handlers.
    Initial,
    /// 1.6 and 2.x: syslog handlers gain `facility` and `app-name`.
    SyslogIdentity,
    /// 1.7 and 3.x: rotating file handlers and `reconnect-timeout`.
    Rotating,
}

impl Family {
    pub const fn label(self) -> &'static str {
        match self {
            Family::PreAudit => "pre-audit",
            Family::Initial => "initial",
            Family::SyslogIdentity => "syslog-identity",
            Family::Rotating => "rotating",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
