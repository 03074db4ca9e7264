use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use auditlog_xml::{decode_str, encode_to_string, Operation};
use mgmt_model::{Address, ManagementModel};
use tracing::{info, warn};

use crate::cmd_decode;
use crate::common::{Document, DocumentArgs};

pub fn run(args: DocumentArgs, check: bool) -> Result<()> {
    let document = Document::load(&args)?;
    let rendered = render(&document)?;
    if check {
        verify(&document, &rendered)?;
        info!("re-decoded output matches the input");
    }
    println!("{rendered}");
    Ok(())
}

/// Decode `document`, apply it to a fresh model and write the subsystem back
/// out in canonical form.
pub fn render(document: &Document) -> Result<String> {
    let operations = cmd_decode::decode(document)?;
    let mut model = ManagementModel::with_path(&document.context.base);
    model
        .apply(&operations)
        .context("apply operations to the model")?;
    let address = document.audit_address();
    let audit = model
        .resource(&address)
        .ok_or_else(|| anyhow!("no resource at {address}"))?;
    encode_to_string(audit, Some(document.context.version)).context("encode audit-log")
}

/// How one address differs between two operation lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Created by the first list only.
    Missing(Address),
    /// Created by the second list only.
    Added(Address),
    /// Created by both with different parameters.
    Changed(Address),
}

/// Fail unless `rendered` decodes to the same operations as `document`,
/// ignoring the order in which handler kinds appear.
pub fn verify(document: &Document, rendered: &str) -> Result<()> {
    let before = cmd_decode::decode(document)?;
    let after = decode_str(rendered, &document.context).context("decode rendered document")?;
    let differences = differences(&before, &after);
    if differences.is_empty() {
        return Ok(());
    }
    for difference in &differences {
        match difference {
            Difference::Missing(address) => warn!(address = %address, "operation lost"),
            Difference::Added(address) => warn!(address = %address, "operation added"),
            Difference::Changed(address) => warn!(address = %address, "parameters changed"),
        }
    }
    bail!(
        "round trip changed {} operation(s) ({} before, {} after)",
        differences.len(),
        before.len(),
        after.len()
    );
}

/// Differences between two operation lists, matched by address and reported
/// in address order.
pub fn differences(before: &[Operation], after: &[Operation]) -> Vec<Difference> {
    let before = by_address(before);
    let after = by_address(after);
    let mut differences = Vec::new();
    for (address, operation) in &before {
        match after.get(address) {
            None => differences.push(Difference::Missing((*address).clone())),
            Some(other) if other.parameters != operation.parameters => {
                differences.push(Difference::Changed((*address).clone()))
            }
            Some(_) => {}
        }
    }
    for address in after.keys().filter(|address| !before.contains_key(*address)) {
        differences.push(Difference::Added((*address).clone()));
    }
    differences.sort_by(|a, b| a.address().cmp(b.address()));
    differences
}

impl Difference {
    pub fn address(&self) -> &Address {
        match self {
            Difference::Missing(address)
            | Difference::Added(address)
            | Difference::Changed(address) => address,
        }
    }
}

fn by_address(operations: &[Operation]) -> BTreeMap<&Address, &Operation> {
    operations.iter().map(|op| (&op.address, op)).collect()
}
