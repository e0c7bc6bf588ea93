//! Trellis authorization prelude.
//!
//! Curated re-exports for request-handling and metadata-generation
//! collaborators without pulling in extra modules.

pub use crate::classifier::{classify, RightsRequirement};
pub use crate::config::{AccessConfiguration, WILDCARD};
pub use crate::evaluator::{authorize, evaluate, Engine, Verdict};
pub use crate::visibility::{is_container_visible, is_operation_visible, VisibilityMap};
pub use trellis_core::{
    Cardinality, Error, ExpandNode, HttpMethod, OperationRights, Request, RequestStep,
    ResourceModel, ResourcePath, ResourceType, Result, Rights, SegmentKind,
};
