//! Unified error type for Trellis.
//!
//! One enum covers configuration-time failures and the client-facing
//! authorization outcomes, with an explicit HTTP status mapping so the
//! boundary layer never interprets variants ad hoc.
//!
//! Hidden navigation targets and genuinely missing properties share the
//! [`Error::UnknownProperty`] template. A caller probing for hidden
//! containers must see exactly the error a nonexistent property produces.

use serde::{Deserialize, Serialize};

/// Unified error type for all Trellis operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// Configuration mutation attempted after the rule table was sealed.
    #[error("configuration is sealed and can no longer be modified")]
    ConfigurationSealed,

    /// A raw rights value with bits outside the valid range.
    #[error("invalid rights value: {value:#x}")]
    InvalidRights {
        /// The rejected raw bitmask.
        value: u32,
    },

    /// A rights name string that does not parse.
    #[error("unknown rights name: '{name}'")]
    UnknownRightsName {
        /// The unrecognized name.
        name: String,
    },

    /// A visible container was addressed with insufficient rights.
    #[error("forbidden: access to the resource container '{container}' is denied")]
    AccessDenied {
        /// The under-permissioned container.
        container: String,
    },

    /// The addressed resource does not exist, or has no rights and is
    /// therefore indistinguishable from one that does not exist.
    #[error("resource not found: {message}")]
    NotFound {
        /// Description of what was not found.
        message: String,
    },

    /// The named property does not exist on the type. Produced identically
    /// for properties hidden by the visibility filter.
    #[error("type '{type_name}' does not have a property named '{property}'")]
    UnknownProperty {
        /// The type that was probed.
        type_name: String,
        /// The missing or hidden property name.
        property: String,
    },

    /// A malformed request shape rejected at the boundary.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of the malformation.
        message: String,
    },
}

impl Error {
    /// Create an access denied error for a container.
    pub fn access_denied(container: impl Into<String>) -> Self {
        Self::AccessDenied {
            container: container.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unknown property error.
    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// HTTP status the boundary layer maps this error to.
    ///
    /// Configuration-time failures are server errors, never client-facing
    /// authorization outcomes.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ConfigurationSealed | Self::InvalidRights { .. } | Self::UnknownRightsName { .. } => 500,
            Self::AccessDenied { .. } => 403,
            Self::NotFound { .. } | Self::UnknownProperty { .. } => 404,
            Self::InvalidRequest { .. } => 400,
        }
    }
}

/// Result alias using the unified error type.
pub type Result<T> = std::result::Result<T, Error>;
