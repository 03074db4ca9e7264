use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Address, Value};

/// A "create the resource at `address` with these parameters" instruction.
///
/// Operations are applied in list order; later operations may target
/// addresses below ones created earlier in the same list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub address: Address,
    pub parameters: BTreeMap<String, Value>,
}

impl Operation {
    /// Create operation with an empty parameter set.
    pub fn create(address: Address) -> Self {
        Operation {
            address,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_parameter(name, value);
        self
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_address_and_parameters() {
        let address = Address::root()
            .append("access", "audit")
            .append("logger", "audit-log");
        let op = Operation::create(address)
            .with_parameter("enabled", true)
            .with_parameter("log-boot", false);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "address": [
                    {"key": "access", "value": "audit"},
                    {"key": "logger", "value": "audit-log"}
                ],
                "parameters": {"enabled": true, "log-boot": false}
            })
        );
    }
}
