use std::collections::BTreeMap;

use tracing::debug;

use crate::{Address, ModelError, Operation, PathElement, Value};

/// One node of the management tree: its attributes plus child resources keyed
/// by kind and then by name. Names keep creation order within a kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    attributes: BTreeMap<String, Value>,
    children: BTreeMap<String, Vec<(String, Resource)>>,
}

impl Resource {
    pub fn new() -> Self {
        Resource::default()
    }

    /// Resource whose attributes are the parameters of `operation`.
    pub fn from_operation(operation: &Operation) -> Self {
        Resource {
            attributes: operation.parameters.clone(),
            children: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder form of [`Resource::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn child(&self, kind: &str, name: &str) -> Option<&Resource> {
        self.children
            .get(kind)?
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, resource)| resource)
    }

    pub fn child_mut(&mut self, kind: &str, name: &str) -> Option<&mut Resource> {
        self.children
            .get_mut(kind)?
            .iter_mut()
            .find(|(child, _)| child == name)
            .map(|(_, resource)| resource)
    }

    /// Children of one kind in creation order.
    pub fn children<'a>(&'a self, kind: &str) -> impl Iterator<Item = (&'a str, &'a Resource)> {
        self.children
            .get(kind)
            .into_iter()
            .flatten()
            .map(|(name, resource)| (name.as_str(), resource))
    }

    /// Insert a child, returning `false` if one already exists under that name.
    pub fn add_child(
        &mut self,
        kind: impl Into<String>,
        name: impl Into<String>,
        child: Resource,
    ) -> bool {
        let name = name.into();
        let entries = self.children.entry(kind.into()).or_default();
        if entries.iter().any(|(existing, _)| *existing == name) {
            return false;
        }
        entries.push((name, child));
        true
    }

    /// Builder form of [`Resource::add_child`]; a duplicate name replaces nothing.
    pub fn with_child(
        mut self,
        kind: impl Into<String>,
        name: impl Into<String>,
        child: Resource,
    ) -> Self {
        self.add_child(kind, name, child);
        self
    }

    fn descend(&self, address: &Address) -> Option<&Resource> {
        let mut current = self;
        for PathElement { key, value } in address.iter() {
            current = current.child(key, value)?;
        }
        Some(current)
    }

    fn descend_mut(&mut self, address: &Address) -> Option<&mut Resource> {
        let mut current = self;
        for PathElement { key, value } in address.iter() {
            current = current.child_mut(key, value)?;
        }
        Some(current)
    }
}

/// In-memory management tree that executes create operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementModel {
    root: Resource,
}

impl ManagementModel {
    pub fn new() -> Self {
        ManagementModel::default()
    }

    /// Model with empty resources already present along `path`, so operations
    /// targeting addresses below it can be applied.
    pub fn with_path(path: &Address) -> Self {
        let mut root = Resource::new();
        for PathElement { key, value } in path.iter().rev() {
            root = Resource::new().with_child(key.clone(), value.clone(), root);
        }
        ManagementModel { root }
    }

    pub fn root(&self) -> &Resource {
        &self.root
    }

    /// Resource at `address`, or `None` if nothing was created there.
    pub fn resource(&self, address: &Address) -> Option<&Resource> {
        self.root.descend(address)
    }

    /// Apply one create operation.
    pub fn create(&mut self, operation: &Operation) -> Result<(), ModelError> {
        let address = &operation.address;
        let (parent, last) = match (address.parent(), address.last()) {
            (Some(parent), Some(last)) => (parent, last),
            _ => return Err(ModelError::RootAddress),
        };
        let parent_resource = self
            .root
            .descend_mut(&parent)
            .ok_or_else(|| ModelError::MissingParent(address.clone()))?;
        if !parent_resource.add_child(
            last.key.clone(),
            last.value.clone(),
            Resource::from_operation(operation),
        ) {
            return Err(ModelError::Duplicate(address.clone()));
        }
        debug!(address = %address, parameters = operation.parameters.len(), "created resource");
        Ok(())
    }

    /// Apply operations in list order, stopping at the first failure.
    pub fn apply(&mut self, operations: &[Operation]) -> Result<(), ModelError> {
        for operation in operations {
            self.create(operation)?;
        }
        Ok(())
    }
}
