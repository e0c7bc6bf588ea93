//! Descriptive resource model consumed by the visibility filter.
//!
//! The metadata provider describes its surface as an explicit graph:
//! containers hold entities of a named type, operations may return a named
//! type, and types carry primitive, complex, and navigation properties.
//! No reflection, no behavior beyond lookups. The visibility filter walks
//! this description to compute which types survive into discovery.

use crate::request::Cardinality;
use serde::{Deserialize, Serialize};

/// What kind of value a property holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// A primitive or stream value.
    Primitive,
    /// A complex (structured, non-entity) value of the named type.
    Complex {
        /// The complex type's name.
        type_name: String,
    },
    /// A navigation to entities held in another container.
    Navigation {
        /// The container the navigation targets.
        target_container: String,
        /// Reference navigation or collection navigation.
        cardinality: Cardinality,
    },
}

/// One property of a resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// The property name.
    pub name: String,
    /// What the property holds.
    pub kind: PropertyKind,
}

impl Property {
    /// A primitive property.
    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Primitive,
        }
    }

    /// A complex property of the named type.
    pub fn complex(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Complex {
                type_name: type_name.into(),
            },
        }
    }

    /// A navigation property targeting the named container.
    pub fn navigation(
        name: impl Into<String>,
        target_container: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Navigation {
                target_container: target_container.into(),
                cardinality,
            },
        }
    }
}

/// A named entity or complex type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    /// The type name.
    pub name: String,
    /// The base type this type derives from, if any.
    pub base_type: Option<String>,
    /// The type's properties.
    pub properties: Vec<Property>,
}

impl ResourceType {
    /// A type with no base.
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            base_type: None,
            properties,
        }
    }

    /// A type deriving from `base_type`.
    pub fn derived(
        name: impl Into<String>,
        base_type: impl Into<String>,
        properties: Vec<Property>,
    ) -> Self {
        Self {
            name: name.into(),
            base_type: Some(base_type.into()),
            properties,
        }
    }

    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// An entity-set-like container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// The container name rights attach to.
    pub name: String,
    /// The name of the entity type the container holds.
    pub element_type: String,
}

/// A service-operation-like container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The operation name rights attach to.
    pub name: String,
    /// The name of the type the operation returns, if any.
    pub return_type: Option<String>,
}

/// The full descriptive surface of a service's resource space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceModel {
    containers: Vec<Container>,
    operations: Vec<Operation>,
    types: Vec<ResourceType>,
}

impl ResourceModel {
    /// An empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container holding entities of `element_type`.
    #[must_use]
    pub fn with_container(
        mut self,
        name: impl Into<String>,
        element_type: impl Into<String>,
    ) -> Self {
        self.containers.push(Container {
            name: name.into(),
            element_type: element_type.into(),
        });
        self
    }

    /// Add a service operation.
    #[must_use]
    pub fn with_operation(
        mut self,
        name: impl Into<String>,
        return_type: Option<String>,
    ) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            return_type,
        });
        self
    }

    /// Add a resource type.
    #[must_use]
    pub fn with_type(mut self, ty: ResourceType) -> Self {
        self.types.push(ty);
        self
    }

    /// All containers.
    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// All operations.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// All types.
    #[must_use]
    pub fn types(&self) -> &[ResourceType] {
        &self.types
    }

    /// Look up a container by name.
    #[must_use]
    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.name == name)
    }

    /// Look up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|o| o.name == name)
    }

    /// Look up a type by name.
    #[must_use]
    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.types.iter().find(|t| t.name == name)
    }
}
