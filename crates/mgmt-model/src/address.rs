use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ModelError;

/// One `(type, name)` segment of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PathElement {
    pub key: String,
    pub value: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        PathElement {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Location of a resource in the management tree.
///
/// Addresses are values: [`Address::append`] returns a new address and
/// leaves the receiver untouched, so an address captured by an operation
/// never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Address(Vec<PathElement>);

impl Address {
    /// The empty address naming the model root.
    pub fn root() -> Self {
        Address(Vec::new())
    }

    /// Return a new address with `key=value` appended.
    pub fn append(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut elements = self.0.clone();
        elements.push(PathElement::new(key, value));
        Address(elements)
    }

    /// Address of the parent resource, `None` for the root.
    pub fn parent(&self) -> Option<Address> {
        self.0
            .split_last()
            .map(|(_, rest)| Address(rest.to_vec()))
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.0.iter()
    }

    /// True when `self` lies at or below `prefix`.
    pub fn starts_with(&self, prefix: &Address) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for element in &self.0 {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = ModelError;

    /// Parse `key=value` segments separated by `/` or `,`, for example
    /// `/host=primary/core-service=management`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut elements = Vec::new();
        for segment in text.split(|c| c == '/' || c == ',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ModelError::InvalidAddress(format!("missing '=' in '{segment}'")))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(ModelError::InvalidAddress(format!(
                    "empty key or value in '{segment}'"
                )));
            }
            elements.push(PathElement::new(key, value));
        }
        Ok(Address(elements))
    }
}

impl FromIterator<PathElement> for Address {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Address(iter.into_iter().collect())
    }
}
