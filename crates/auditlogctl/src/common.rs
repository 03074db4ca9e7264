use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use auditlog_xml::{detect_version, DecodeContext, SchemaVersion};
use mgmt_model::Address;
use serde::Serialize;
use tracing::debug;

/// Value of `--schema` that selects the version from the root namespace.
pub const AUTO_SCHEMA: &str = "auto";

/// Where a document comes from and how to decode it.
#[derive(Debug, Clone)]
pub struct DocumentArgs {
    /// Path to the document, `-` for stdin.
    pub input: PathBuf,
    /// `auto`, a version number such as `1.7`, or a namespace URI.
    pub schema: String,
    pub host: bool,
    /// Base address such as `/host=primary/core-service=management`.
    pub base: Option<String>,
}

/// A loaded document together with its decode context.
#[derive(Debug, Clone)]
pub struct Document {
    pub xml: String,
    pub context: DecodeContext,
}

impl Document {
    pub fn load(args: &DocumentArgs) -> Result<Self> {
        let xml = read_input(&args.input)?;
        Document::from_text(xml, args)
    }

    pub fn from_text(xml: String, args: &DocumentArgs) -> Result<Self> {
        let version = resolve_version(&args.schema, &xml)?;
        let base = parse_base(args.base.as_deref())?;
        debug!(version = %version, base = %base, host = args.host, "decode context");
        let context = DecodeContext::new(version, base).with_host(args.host);
        Ok(Document { xml, context })
    }

    /// Address of the audit subsystem resource.
    pub fn audit_address(&self) -> Address {
        self.context.base.append("access", "audit")
    }
}

pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read document from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

pub fn resolve_version(schema: &str, xml: &str) -> Result<SchemaVersion> {
    if schema.eq_ignore_ascii_case(AUTO_SCHEMA) {
        return detect_version(xml).context("detect schema version from root namespace");
    }
    schema
        .parse()
        .with_context(|| format!("parse --schema {schema}"))
}

pub fn parse_base(base: Option<&str>) -> Result<Address> {
    match base {
        Some(text) => text
            .parse()
            .with_context(|| format!("parse --base {text}")),
        None => Ok(Address::root()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}
