//! Management tree primitives: addresses, typed values, create operations and
//! an in-memory resource model that applies operation lists in order.

mod address;
mod model;
mod operation;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use address::{Address, PathElement};
pub use model::{ManagementModel, Resource};
pub use operation::Operation;

/// Error type produced by address parsing and model updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A textual address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// The operation targets a resource whose parent has not been created.
    #[error("parent of {0} does not exist")]
    MissingParent(Address),
    /// A resource already exists at the target address.
    #[error("resource already exists: {0}")]
    Duplicate(Address),
    /// The empty address denotes the model root, which cannot be created.
    #[error("cannot create the model root")]
    RootAddress,
}

/// Typed attribute value carried by an [`Operation`] parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(value) => f.write_str(value),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}
