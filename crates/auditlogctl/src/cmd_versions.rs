use anyhow::Result;
use auditlog_xml::{Capabilities, CapabilityMap, SchemaVersion};
use serde::Serialize;

use crate::common;

#[derive(Debug, Serialize)]
struct VersionEntry {
    version: String,
    namespace: String,
    family: &'static str,
    audit_log: bool,
    features: Vec<String>,
}

/// Host-context capabilities of `version` as kebab-case names.
fn features(version: SchemaVersion) -> (bool, Vec<String>) {
    let capabilities = CapabilityMap::new(version, true).capabilities();
    let names = capabilities
        .iter_names()
        .map(|(name, _)| name.to_ascii_lowercase().replace('_', "-"))
        .collect();
    (capabilities.contains(Capabilities::AUDIT_LOG), names)
}

fn entries() -> Vec<VersionEntry> {
    SchemaVersion::ALL
        .iter()
        .map(|&version| {
            let (audit_log, features) = features(version);
            VersionEntry {
                version: version.to_string(),
                namespace: version.namespace_uri(),
                family: version.family().label(),
                audit_log,
                features,
            }
        })
        .collect()
}

pub fn run(json: bool) -> Result<()> {
    let entries = entries();
    if json {
        return common::print_json(&entries);
    }
    println!(
        "{:<8} {:<24} {:<16} {:<9} {}",
        "VERSION", "NAMESPACE", "FAMILY", "AUDIT-LOG", "FEATURES"
    );
    for entry in &entries {
        println!(
            "{:<8} {:<24} {:<16} {:<9} {}",
            entry.version,
            entry.namespace,
            entry.family,
            if entry.audit_log { "yes" } else { "no" },
            entry.features.join(",")
        );
    }
    Ok(())
}
