//! Request shapes consumed by the authorization engine.
//!
//! The external path resolver parses a request URI into an ordered
//! [`ResourcePath`] of [`RequestStep`]s, each tagged with its container, its
//! cardinality, and its segment kind. Projection trees ([`ExpandNode`]) and
//! an optional bind target complete the [`Request`]. These shapes are built
//! fresh per request and consumed once; the engine never mutates them.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The HTTP methods the engine classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// Read a resource.
    Get,
    /// Append to a collection or bind a reference.
    Post,
    /// Replace a resource or rebind a reference.
    Put,
    /// Merge changes into a resource or rebind a reference.
    Patch,
    /// Delete a resource or unbind a reference.
    Delete,
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::invalid_request(format!(
                "unsupported HTTP method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        write!(f, "{name}")
    }
}

/// Whether a step addresses one resource or a collection of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// A single entity, keyed or reached through a reference navigation.
    Single,
    /// An entity set or collection navigation.
    Collection,
}

/// What kind of resource a step addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// An entity or entity collection.
    Entity,
    /// A `$ref` segment addressing the link rather than the entity.
    Reference,
    /// A `$value` segment addressing a raw property or stream value.
    RawValue,
    /// A `$count` segment over a collection.
    Count,
}

/// One hop in a resolved request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStep {
    /// The resource container this step resolves against.
    pub container: String,
    /// Single resource or collection.
    pub cardinality: Cardinality,
    /// The segment kind.
    pub kind: SegmentKind,
    /// Whether this is the final step of the path.
    pub is_leaf: bool,
}

impl RequestStep {
    /// An entity step.
    pub fn entity(container: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            container: container.into(),
            cardinality,
            kind: SegmentKind::Entity,
            is_leaf: false,
        }
    }

    /// A `$ref` step.
    pub fn reference(container: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            container: container.into(),
            cardinality,
            kind: SegmentKind::Reference,
            is_leaf: false,
        }
    }

    /// A `$value` step. Raw values are reached through a single-cardinality path.
    pub fn raw_value(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            cardinality: Cardinality::Single,
            kind: SegmentKind::RawValue,
            is_leaf: false,
        }
    }

    /// A `$count` step over a collection.
    pub fn count(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            cardinality: Cardinality::Collection,
            kind: SegmentKind::Count,
            is_leaf: false,
        }
    }
}

/// An ordered, non-empty sequence of request steps.
///
/// Invariant: exactly the last step is the leaf. The constructor enforces
/// this regardless of the `is_leaf` values handed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePath {
    steps: Vec<RequestStep>,
}

impl ResourcePath {
    /// Build a path from ordered steps.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` if `steps` is empty.
    pub fn new(steps: Vec<RequestStep>) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::invalid_request(
                "a resource path must contain at least one step",
            ));
        }
        let mut steps = steps;
        let last = steps.len() - 1;
        for (i, step) in steps.iter_mut().enumerate() {
            step.is_leaf = i == last;
        }
        Ok(Self { steps })
    }

    /// The steps in traversal order.
    #[must_use]
    pub fn steps(&self) -> &[RequestStep] {
        &self.steps
    }

    /// The final step of the path.
    #[must_use]
    pub fn leaf(&self) -> &RequestStep {
        // Non-emptiness is a constructor invariant.
        &self.steps[self.steps.len() - 1]
    }
}

/// One node of a `$expand`/nested `$select` projection tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandNode {
    /// The container the projected navigation targets.
    pub container: String,
    /// Collection navigation or reference navigation.
    pub cardinality: Cardinality,
    /// Nested projections under this navigation.
    pub children: Vec<ExpandNode>,
}

impl ExpandNode {
    /// A projection into a reference navigation.
    pub fn single(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            cardinality: Cardinality::Single,
            children: Vec::new(),
        }
    }

    /// A projection into a collection navigation.
    pub fn collection(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            cardinality: Cardinality::Collection,
            children: Vec::new(),
        }
    }

    /// Attach nested projections.
    #[must_use]
    pub fn with_children(mut self, children: Vec<ExpandNode>) -> Self {
        self.children = children;
        self
    }
}

/// A fully resolved request, ready for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The resolved resource path.
    pub path: ResourcePath,
    /// Projection trees attached to the leaf.
    pub expansions: Vec<ExpandNode>,
    /// Whether the request carries a `$select=*` projection on the root.
    pub select_all: bool,
    /// The resolved path of the resource a `$ref` mutation binds, if any.
    pub bind_target: Option<ResourcePath>,
}

impl Request {
    /// A plain request with no projections or bind target.
    #[must_use]
    pub fn new(method: HttpMethod, path: ResourcePath) -> Self {
        Self {
            method,
            path,
            expansions: Vec::new(),
            select_all: false,
            bind_target: None,
        }
    }

    /// Attach projection trees.
    #[must_use]
    pub fn with_expansions(mut self, expansions: Vec<ExpandNode>) -> Self {
        self.expansions = expansions;
        self
    }

    /// Mark the request as carrying a wildcard projection on the root.
    #[must_use]
    pub fn with_select_all(mut self) -> Self {
        self.select_all = true;
        self
    }

    /// Attach the resolved path of a bind target.
    #[must_use]
    pub fn with_bind_target(mut self, target: ResourcePath) -> Self {
        self.bind_target = Some(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = ResourcePath::new(vec![]).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn constructor_marks_exactly_the_last_step_as_leaf() {
        let path = ResourcePath::new(vec![
            RequestStep::entity("Customers", Cardinality::Single),
            RequestStep::entity("Orders", Cardinality::Single),
        ])
        .unwrap();
        assert!(!path.steps()[0].is_leaf);
        assert!(path.steps()[1].is_leaf);
        assert_eq!(path.leaf().container, "Orders");
    }

    #[test]
    fn leaf_marks_survive_even_if_caller_preset_them_wrong() {
        let mut first = RequestStep::entity("Customers", Cardinality::Single);
        first.is_leaf = true;
        let path = ResourcePath::new(vec![
            first,
            RequestStep::count("Orders"),
        ])
        .unwrap();
        assert!(!path.steps()[0].is_leaf);
        assert!(path.steps()[1].is_leaf);
    }
}
