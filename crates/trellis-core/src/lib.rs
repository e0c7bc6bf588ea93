//! Trellis Core - Shared Authorization Vocabulary
//!
//! Pure value types shared between the Trellis decision engine and its
//! collaborators: the rights bitmasks containers are configured with, the
//! request shapes the path resolver produces, the descriptive resource
//! model the metadata provider supplies, and the unified error type.
//!
//! This crate carries no decision logic. The rule table, the classifier,
//! the evaluator, and the visibility filter live in `trellis-authorization`.

#![forbid(unsafe_code)]

/// Unified error handling
pub mod errors;

/// Descriptive resource model for visibility computation
pub mod model;

/// Request shapes produced by the path resolver
pub mod request;

/// Rights bitmasks for containers and operations
pub mod rights;

pub use errors::{Error, Result};
pub use model::{Container, Operation, Property, PropertyKind, ResourceModel, ResourceType};
pub use request::{
    Cardinality, ExpandNode, HttpMethod, Request, RequestStep, ResourcePath, SegmentKind,
};
pub use rights::{OperationRights, Rights};
