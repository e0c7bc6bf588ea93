//! # Trellis Authorization - Rights-Based Decision Engine
//!
//! Decides whether a requested operation against a hierarchical,
//! entity-graph-shaped resource space may proceed. The engine consumes a
//! resolved request path from an external path resolver, turns every hop,
//! projection, and bind target into required-rights facts, and reduces
//! them against a sealed rule table into a single verdict: allow, access
//! denied, or not found for containers hidden by zero rights.
//!
//! The same rule table drives the visibility filter, which decides what
//! the metadata and navigation surfaces may expose at all.
//!
//! # Example
//!
//! ```
//! use trellis_authorization::prelude::*;
//!
//! let config = AccessConfiguration::build(|cfg| {
//!     cfg.set_container_rights_named("Customers", "RS")?;
//!     cfg.set_container_rights_named("Orders", "RS,WD")
//! })
//! .expect("configuration");
//!
//! // DELETE /Customers(1)/Orders(1)
//! let request = Request::new(
//!     HttpMethod::Delete,
//!     ResourcePath::new(vec![
//!         RequestStep::entity("Customers", Cardinality::Single),
//!         RequestStep::entity("Orders", Cardinality::Single),
//!     ])
//!     .expect("path"),
//! );
//!
//! assert!(authorize(&request, &config).is_allow());
//! ```

#![forbid(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod evaluator;
pub mod prelude;
pub mod visibility;

pub use classifier::{classify, RightsRequirement};
pub use config::{AccessConfiguration, WILDCARD};
pub use evaluator::{authorize, evaluate, Engine, Verdict};
pub use visibility::{is_container_visible, is_operation_visible, VisibilityMap};
