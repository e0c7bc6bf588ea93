//! Authorization evaluator: facts to a single verdict.
//!
//! Facts compose with AND semantics across the request (a deep path needs
//! rights on every traversed container) while each fact carries OR
//! semantics within itself (any acceptable right suffices). Evaluation
//! short-circuits on the first unsatisfied fact; which failing fact gets
//! reported is not part of the contract, only that failure is.
//!
//! A container resolving to no rights at all is reported as not-found,
//! never as access-denied: hidden containers must be indistinguishable
//! from containers that do not exist.

use crate::classifier::{classify, RightsRequirement};
use crate::config::AccessConfiguration;
use crate::visibility::VisibilityMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use trellis_core::{Error, Request, ResourceModel, Result};

/// The tri-state outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every requirement was satisfied.
    Allow,
    /// A visible container was addressed with insufficient rights.
    AccessDenied {
        /// The under-permissioned container.
        container: String,
    },
    /// A container with no rights was addressed; indistinguishable from a
    /// nonexistent resource.
    NotFound {
        /// The hidden container.
        container: String,
    },
}

impl Verdict {
    /// Whether the request may proceed.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// HTTP status the boundary layer maps this verdict to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Allow => 200,
            Self::AccessDenied { .. } => 403,
            Self::NotFound { .. } => 404,
        }
    }

    /// Convert into the unified error taxonomy, `Ok(())` on allow.
    ///
    /// # Errors
    ///
    /// `Error::AccessDenied` or `Error::NotFound` for the failing verdicts.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::AccessDenied { container } => Err(Error::access_denied(container)),
            Self::NotFound { container } => Err(Error::not_found(format!(
                "resource container '{container}' does not exist"
            ))),
        }
    }
}

/// Reduce a fact list to a single verdict against a rule table.
#[must_use]
pub fn evaluate(requirements: &[RightsRequirement], config: &AccessConfiguration) -> Verdict {
    for requirement in requirements {
        let granted = config.resolve(&requirement.container);
        if granted.is_empty() {
            debug!(
                container = %requirement.container,
                "container has no rights; reporting not found"
            );
            return Verdict::NotFound {
                container: requirement.container.clone(),
            };
        }
        if !granted.intersects(requirement.any_of) {
            debug!(
                container = %requirement.container,
                granted = %granted,
                required_any_of = %requirement.any_of,
                "requirement unsatisfied; denying access"
            );
            return Verdict::AccessDenied {
                container: requirement.container.clone(),
            };
        }
        trace!(
            container = %requirement.container,
            granted = %granted,
            required_any_of = %requirement.any_of,
            "requirement satisfied"
        );
    }
    Verdict::Allow
}

/// Classify and evaluate a request in one call.
#[must_use]
pub fn authorize(request: &Request, config: &AccessConfiguration) -> Verdict {
    let requirements = classify(request);
    let verdict = evaluate(&requirements, config);
    debug!(method = %request.method, facts = requirements.len(), allow = verdict.is_allow(), "authorization decided");
    verdict
}

/// A sealed configuration paired with its cached visibility closure.
///
/// Construction seals the configuration, so the engine can be shared by
/// concurrently-executing requests as a read-only value for the lifetime
/// of the service configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    config: AccessConfiguration,
    visibility: Option<VisibilityMap>,
}

impl Engine {
    /// An engine over a rule table alone, without a resource model.
    #[must_use]
    pub fn new(mut config: AccessConfiguration) -> Self {
        config.seal();
        Self {
            config,
            visibility: None,
        }
    }

    /// An engine that also precomputes the visibility closure of a model.
    #[must_use]
    pub fn with_model(mut config: AccessConfiguration, model: &ResourceModel) -> Self {
        config.seal();
        let visibility = VisibilityMap::compute(model, &config);
        Self {
            config,
            visibility: Some(visibility),
        }
    }

    /// The sealed rule table.
    #[must_use]
    pub fn config(&self) -> &AccessConfiguration {
        &self.config
    }

    /// Authorize one request.
    #[must_use]
    pub fn authorize(&self, request: &Request) -> Verdict {
        authorize(request, &self.config)
    }

    /// Whether a container is exposed at all.
    #[must_use]
    pub fn is_container_visible(&self, container: &str) -> bool {
        !self.config.resolve(container).is_empty()
    }

    /// Whether a service operation is exposed at all.
    #[must_use]
    pub fn is_operation_visible(&self, operation: &str) -> bool {
        !self.config.resolve_operation(operation).is_empty()
    }

    /// The cached visibility closure, if the engine was built with a model.
    #[must_use]
    pub fn visibility(&self) -> Option<&VisibilityMap> {
        self.visibility.as_ref()
    }
}
