use anyhow::{Context, Result};
use auditlog_xml::{decode_str, Operation};
use mgmt_model::Value;
use tracing::info;

use crate::common::{self, Document, DocumentArgs};

pub fn run(args: DocumentArgs, json: bool) -> Result<()> {
    let document = Document::load(&args)?;
    let operations = decode(&document)?;
    info!(
        count = operations.len(),
        version = %document.context.version,
        "decoded operations"
    );

    if json {
        return common::print_json(&operations);
    }
    for operation in &operations {
        println!("{}", format_operation(operation));
    }
    Ok(())
}

pub fn decode(document: &Document) -> Result<Vec<Operation>> {
    decode_str(&document.xml, &document.context).context("decode audit-log document")
}

/// One line per operation: the address followed by `name=value` pairs.
pub fn format_operation(operation: &Operation) -> String {
    let mut line = format!("add {}", operation.address);
    for (name, value) in &operation.parameters {
        match value {
            Value::String(text) => line.push_str(&format!(" {name}={text:?}")),
            other => line.push_str(&format!(" {name}={other}")),
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgmt_model::Address;

    #[test]
    fn operation_line_quotes_strings() {
        let address = Address::root()
            .append("access", "audit")
            .append("file-handler", "f");
        let operation = Operation::create(address)
            .with_parameter("path", "audit log.json")
            .with_parameter("max-failure-count", 3i64)
            .with_parameter("formatter", "json");
        assert_eq!(
            format_operation(&operation),
            r#"add /access=audit/file-handler=f formatter="json" max-failure-count=3 path="audit log.json""#
        );
    }

    #[test]
    fn operation_without_parameters() {
        let operation = Operation::create(Address::root().append("access", "audit"));
        assert_eq!(format_operation(&operation), "add /access=audit");
    }
}
