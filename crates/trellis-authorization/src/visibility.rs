//! Visibility filter: what the discovery surface may expose.
//!
//! Containers and operations with no rights are hidden entirely, and
//! everything reachable only through them disappears with them. The
//! closure is an explicit reachability computation over the descriptive
//! resource model: visible containers and operations seed a directed
//! graph over type names, and a traversal from the seeds yields the
//! visible type set. Because the rule table is sealed, the closure is
//! computed once and cached for the lifetime of the configuration.
//!
//! Navigation properties whose target container is hidden are removed
//! from the exposed type, and addressing one fails with exactly the
//! error a nonexistent property produces. Callers must not be able to
//! tell the two apart.

use crate::config::AccessConfiguration;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use trellis_core::{Error, Property, PropertyKind, ResourceModel, ResourceType, Result};

/// Whether a container is exposed at all under a rule table.
#[must_use]
pub fn is_container_visible(container: &str, config: &AccessConfiguration) -> bool {
    !config.resolve(container).is_empty()
}

/// Whether a service operation is exposed at all under a rule table.
#[must_use]
pub fn is_operation_visible(operation: &str, config: &AccessConfiguration) -> bool {
    !config.resolve_operation(operation).is_empty()
}

/// The cached visibility closure of a resource model under a sealed
/// configuration.
#[derive(Debug, Clone)]
pub struct VisibilityMap {
    visible_containers: BTreeSet<String>,
    visible_operations: BTreeSet<String>,
    visible_types: BTreeSet<String>,
    types: HashMap<String, ResourceType>,
}

impl VisibilityMap {
    /// Compute the closure once for a sealed configuration.
    ///
    /// Reachability edges: container to its element type, operation to its
    /// return type, derived type to its base and back (instances of a
    /// derived type flow through any container of the base), type to the
    /// types of its complex properties, and type to the element type of a
    /// navigation target, but only when the target container is itself
    /// visible. A type reachable from any visible seed stays visible even
    /// if it is also reachable from hidden ones.
    #[must_use]
    pub fn compute(model: &ResourceModel, config: &AccessConfiguration) -> Self {
        let visible_containers: BTreeSet<String> = model
            .containers()
            .iter()
            .filter(|c| is_container_visible(&c.name, config))
            .map(|c| c.name.clone())
            .collect();
        let visible_operations: BTreeSet<String> = model
            .operations()
            .iter()
            .filter(|o| is_operation_visible(&o.name, config))
            .map(|o| o.name.clone())
            .collect();

        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for ty in model.types() {
            index.insert(ty.name.as_str(), graph.add_node(()));
        }

        for ty in model.types() {
            let from = index[ty.name.as_str()];
            if let Some(base) = &ty.base_type {
                if let Some(&base_node) = index.get(base.as_str()) {
                    graph.add_edge(from, base_node, ());
                    graph.add_edge(base_node, from, ());
                }
            }
            for property in &ty.properties {
                match &property.kind {
                    PropertyKind::Primitive => {}
                    PropertyKind::Complex { type_name } => {
                        if let Some(&to) = index.get(type_name.as_str()) {
                            graph.add_edge(from, to, ());
                        }
                    }
                    PropertyKind::Navigation {
                        target_container, ..
                    } => {
                        // A hidden navigation target contributes nothing
                        // to reachability.
                        if !visible_containers.contains(target_container) {
                            continue;
                        }
                        let element = model
                            .container(target_container)
                            .map(|c| c.element_type.as_str());
                        if let Some(&to) = element.and_then(|e| index.get(e)) {
                            graph.add_edge(from, to, ());
                        }
                    }
                }
            }
        }

        let mut seeds: Vec<NodeIndex> = Vec::new();
        for container in &visible_containers {
            if let Some(c) = model.container(container) {
                if let Some(&node) = index.get(c.element_type.as_str()) {
                    seeds.push(node);
                }
            }
        }
        for operation in &visible_operations {
            if let Some(op) = model.operation(operation) {
                if let Some(&node) = op
                    .return_type
                    .as_deref()
                    .and_then(|name| index.get(name))
                {
                    seeds.push(node);
                }
            }
        }

        let mut reachable: BTreeSet<NodeIndex> = BTreeSet::new();
        for seed in seeds {
            let mut dfs = Dfs::new(&graph, seed);
            while let Some(node) = dfs.next(&graph) {
                reachable.insert(node);
            }
        }

        let visible_types: BTreeSet<String> = index
            .iter()
            .filter(|(_, node)| reachable.contains(*node))
            .map(|(name, _)| (*name).to_string())
            .collect();

        debug!(
            containers = visible_containers.len(),
            operations = visible_operations.len(),
            types = visible_types.len(),
            "visibility closure computed"
        );

        let types = model
            .types()
            .iter()
            .map(|ty| (ty.name.clone(), ty.clone()))
            .collect();

        Self {
            visible_containers,
            visible_operations,
            visible_types,
            types,
        }
    }

    /// Whether a container survives into discovery.
    #[must_use]
    pub fn is_container_visible(&self, container: &str) -> bool {
        self.visible_containers.contains(container)
    }

    /// Whether a service operation survives into discovery.
    #[must_use]
    pub fn is_operation_visible(&self, operation: &str) -> bool {
        self.visible_operations.contains(operation)
    }

    /// Whether a type survives into discovery.
    #[must_use]
    pub fn is_type_visible(&self, type_name: &str) -> bool {
        self.visible_types.contains(type_name)
    }

    /// The containers that survive into discovery, in name order.
    pub fn visible_containers(&self) -> impl Iterator<Item = &str> {
        self.visible_containers.iter().map(String::as_str)
    }

    /// The types that survive into discovery, in name order.
    pub fn visible_types(&self) -> impl Iterator<Item = &str> {
        self.visible_types.iter().map(String::as_str)
    }

    /// The properties of a type as discovery exposes them: navigation
    /// properties with hidden targets are removed entirely. Unknown or
    /// hidden types expose nothing.
    pub fn visible_properties(&self, type_name: &str) -> impl Iterator<Item = &Property> {
        let properties: &[Property] = if self.visible_types.contains(type_name) {
            self.types
                .get(type_name)
                .map_or(&[], |ty| ty.properties.as_slice())
        } else {
            &[]
        };
        properties.iter().filter(move |property| {
            match &property.kind {
                PropertyKind::Navigation {
                    target_container, ..
                } => self.visible_containers.contains(target_container),
                _ => true,
            }
        })
    }

    /// Resolve the target container of a navigation property.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProperty` when the property does not exist,
    /// is not a navigation, or targets a hidden container. All three cases
    /// share one message template; a caller probing for hidden containers
    /// learns nothing.
    pub fn navigation_target(&self, type_name: &str, property: &str) -> Result<&str> {
        let hidden = || Error::unknown_property(type_name, property);
        let ty = self.types.get(type_name).ok_or_else(hidden)?;
        match ty.property(property).map(|p| &p.kind) {
            Some(PropertyKind::Navigation {
                target_container, ..
            }) if self.visible_containers.contains(target_container) => {
                Ok(target_container.as_str())
            }
            _ => Err(hidden()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use trellis_core::{Cardinality, OperationRights, Rights};

    fn model() -> ResourceModel {
        ResourceModel::new()
            .with_container("Customers", "Customer")
            .with_container("Orders", "Order")
            .with_container("Suppliers", "Supplier")
            .with_operation("TopSupplier", Some("Supplier".to_string()))
            .with_type(ResourceType::new(
                "Customer",
                vec![
                    Property::primitive("Name"),
                    Property::complex("HomeAddress", "Address"),
                    Property::navigation("Orders", "Orders", Cardinality::Collection),
                ],
            ))
            .with_type(ResourceType::new(
                "Order",
                vec![
                    Property::primitive("Total"),
                    Property::navigation("Customer", "Customers", Cardinality::Single),
                ],
            ))
            .with_type(ResourceType::new(
                "Supplier",
                vec![Property::complex("Depot", "Address")],
            ))
            .with_type(ResourceType::new(
                "Address",
                vec![Property::primitive("City")],
            ))
            .with_type(ResourceType::derived(
                "VipCustomer",
                "Customer",
                vec![Property::primitive("Tier")],
            ))
    }

    fn config(entries: &[(&str, Rights)], operations: &[(&str, OperationRights)]) -> AccessConfiguration {
        AccessConfiguration::build(|cfg| {
            for (name, rights) in entries {
                cfg.set_container_rights(*name, *rights)?;
            }
            for (name, rights) in operations {
                cfg.set_operation_rights(*name, *rights)?;
            }
            Ok(())
        })
        .expect("test configuration")
    }

    #[test]
    fn zero_rights_hides_the_container_and_its_exclusive_types() {
        let config = config(&[("Customers", Rights::ALL_READ)], &[]);
        let map = VisibilityMap::compute(&model(), &config);

        assert!(map.is_container_visible("Customers"));
        assert!(!map.is_container_visible("Orders"));
        assert!(map.is_type_visible("Customer"));
        // Order is reachable only through the hidden Orders container.
        assert!(!map.is_type_visible("Order"));
        // Supplier is reachable only through hidden container and operation.
        assert!(!map.is_type_visible("Supplier"));
    }

    #[test]
    fn complex_type_shared_with_a_visible_owner_stays_visible() {
        // Address is used by hidden Supplier and by visible Customer.
        let config = config(&[("Customers", Rights::READ_SINGLE)], &[]);
        let map = VisibilityMap::compute(&model(), &config);
        assert!(map.is_type_visible("Address"));
    }

    #[test]
    fn operations_seed_reachability_through_their_return_type() {
        let config = config(&[], &[("TopSupplier", OperationRights::ALL_READ)]);
        let map = VisibilityMap::compute(&model(), &config);
        assert!(map.is_operation_visible("TopSupplier"));
        assert!(map.is_type_visible("Supplier"));
        assert!(map.is_type_visible("Address"));
        assert!(!map.is_type_visible("Customer"));
    }

    #[test]
    fn derived_types_follow_their_base_into_visibility() {
        let config = config(&[("Customers", Rights::ALL_READ)], &[]);
        let map = VisibilityMap::compute(&model(), &config);
        assert!(map.is_type_visible("VipCustomer"));
    }

    #[test]
    fn hidden_navigation_targets_are_removed_from_the_exposed_type() {
        let config = config(&[("Customers", Rights::ALL_READ)], &[]);
        let map = VisibilityMap::compute(&model(), &config);

        let names: Vec<_> = map
            .visible_properties("Customer")
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Name", "HomeAddress"]);
    }

    #[test]
    fn wildcard_rights_expose_everything() {
        let config = config(&[("*", Rights::ALL)], &[("*", OperationRights::ALL)]);
        let map = VisibilityMap::compute(&model(), &config);
        assert!(map.is_type_visible("Customer"));
        assert!(map.is_type_visible("Order"));
        assert!(map.is_type_visible("Supplier"));
        assert!(map.is_type_visible("Address"));
        let names: Vec<_> = map
            .visible_properties("Customer")
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Name", "HomeAddress", "Orders"]);
    }

    #[test]
    fn hidden_navigation_fails_exactly_like_a_missing_property() {
        let config = config(&[("Customers", Rights::ALL_READ)], &[]);
        let map = VisibilityMap::compute(&model(), &config);

        let hidden = map.navigation_target("Customer", "Orders").unwrap_err();
        let missing = map.navigation_target("Customer", "NoSuchProperty").unwrap_err();

        assert_matches!(hidden, Error::UnknownProperty { .. });
        assert_eq!(hidden.status_code(), missing.status_code());
        assert_eq!(
            hidden.to_string().replace("Orders", "{p}"),
            missing.to_string().replace("NoSuchProperty", "{p}"),
        );
    }

    #[test]
    fn visible_navigation_resolves_to_its_target() {
        let config = config(
            &[("Customers", Rights::ALL_READ), ("Orders", Rights::READ_MULTIPLE)],
            &[],
        );
        let map = VisibilityMap::compute(&model(), &config);
        assert_eq!(map.navigation_target("Customer", "Orders").unwrap(), "Orders");
    }
}
