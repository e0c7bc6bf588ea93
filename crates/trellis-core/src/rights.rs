//! Rights vocabulary for containers and service operations.
//!
//! A [`Rights`] mask attaches to an entity-set-like container and controls
//! every way that container can be addressed: enumerated, fetched by key,
//! appended to, replaced, merged, or deleted. An empty mask hides the
//! container entirely from discovery and addressing.
//!
//! [`OperationRights`] is the parallel, smaller mask for service-operation
//! containers, which can only be read or invoked.
//!
//! # Example
//!
//! ```
//! use trellis_core::Rights;
//!
//! let read_only = Rights::ALL_READ;
//! assert!(read_only.contains(Rights::READ_SINGLE));
//! assert!(!read_only.contains(Rights::WRITE_DELETE));
//!
//! // Either bit of a disjunction satisfies a requirement.
//! let required = Rights::WRITE_REPLACE | Rights::WRITE_MERGE;
//! let granted = Rights::READ_SINGLE | Rights::WRITE_MERGE;
//! assert!(!(granted & required).is_empty());
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Access rights for an entity-set-like container.
    ///
    /// Rights combine as a bitmask. The empty mask means the container does
    /// not exist as far as callers can tell: it is absent from discovery and
    /// addressing it yields not-found rather than access-denied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Rights: u32 {
        /// Fetch a single entity by key or through a reference navigation.
        const READ_SINGLE   = 0b00_0001;
        /// Enumerate a collection, including `$count` and `$ref` lists.
        const READ_MULTIPLE = 0b00_0010;
        /// Append a new entity to a collection.
        const WRITE_APPEND  = 0b00_0100;
        /// Replace an entity wholesale.
        const WRITE_REPLACE = 0b00_1000;
        /// Merge changes into an entity.
        const WRITE_MERGE   = 0b01_0000;
        /// Delete an entity.
        const WRITE_DELETE  = 0b10_0000;
    }
}

impl Rights {
    /// Both read rights.
    pub const ALL_READ: Self = Self::READ_SINGLE.union(Self::READ_MULTIPLE);

    /// All four write rights.
    pub const ALL_WRITE: Self = Self::WRITE_APPEND
        .union(Self::WRITE_REPLACE)
        .union(Self::WRITE_MERGE)
        .union(Self::WRITE_DELETE);

    /// Full access.
    pub const ALL: Self = Self::ALL_READ.union(Self::ALL_WRITE);

    /// Returns a human-readable list of right names.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::READ_SINGLE) {
            names.push("READ_SINGLE");
        }
        if self.contains(Self::READ_MULTIPLE) {
            names.push("READ_MULTIPLE");
        }
        if self.contains(Self::WRITE_APPEND) {
            names.push("WRITE_APPEND");
        }
        if self.contains(Self::WRITE_REPLACE) {
            names.push("WRITE_REPLACE");
        }
        if self.contains(Self::WRITE_MERGE) {
            names.push("WRITE_MERGE");
        }
        if self.contains(Self::WRITE_DELETE) {
            names.push("WRITE_DELETE");
        }
        names
    }

    /// Parses a right name (case-insensitive), accepting the two-letter
    /// aliases used in rule configuration strings.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_core::Rights;
    ///
    /// assert_eq!(Rights::parse("RS"), Some(Rights::READ_SINGLE));
    /// assert_eq!(Rights::parse("write_merge"), Some(Rights::WRITE_MERGE));
    /// assert_eq!(Rights::parse("none"), Some(Rights::empty()));
    /// assert_eq!(Rights::parse("bogus"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "READ_SINGLE" | "RS" => Some(Self::READ_SINGLE),
            "READ_MULTIPLE" | "RM" => Some(Self::READ_MULTIPLE),
            "WRITE_APPEND" | "WA" => Some(Self::WRITE_APPEND),
            "WRITE_REPLACE" | "WR" => Some(Self::WRITE_REPLACE),
            "WRITE_MERGE" | "WM" => Some(Self::WRITE_MERGE),
            "WRITE_DELETE" | "WD" => Some(Self::WRITE_DELETE),
            "ALL_READ" => Some(Self::ALL_READ),
            "ALL_WRITE" => Some(Self::ALL_WRITE),
            "ALL" => Some(Self::ALL),
            "NONE" => Some(Self::empty()),
            _ => None,
        }
    }

    /// Parses a list of right names into a combined mask.
    ///
    /// Returns the combined mask and any names that did not parse. Callers
    /// decide how to handle unknown names.
    #[must_use]
    pub fn parse_list<'a>(names: &[&'a str]) -> (Self, Vec<&'a str>) {
        let mut rights = Self::empty();
        let mut unknown = Vec::new();
        for name in names {
            match Self::parse(name) {
                Some(r) => rights |= r,
                None => unknown.push(*name),
            }
        }
        (rights, unknown)
    }
}

impl std::fmt::Display for Rights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

bitflags! {
    /// Access rights for a service-operation-like container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OperationRights: u32 {
        /// Invoke the operation in a single-result context.
        const READ_SINGLE   = 0b001;
        /// Invoke the operation in a collection-result context.
        const READ_MULTIPLE = 0b010;
        /// Invoke the operation for its side effects.
        const INVOKE        = 0b100;
    }
}

impl OperationRights {
    /// Both read rights.
    pub const ALL_READ: Self = Self::READ_SINGLE.union(Self::READ_MULTIPLE);

    /// Full access.
    pub const ALL: Self = Self::ALL_READ.union(Self::INVOKE);

    /// Parses an operation-right name (case-insensitive).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "READ_SINGLE" | "RS" => Some(Self::READ_SINGLE),
            "READ_MULTIPLE" | "RM" => Some(Self::READ_MULTIPLE),
            "INVOKE" => Some(Self::INVOKE),
            "ALL_READ" => Some(Self::ALL_READ),
            "ALL" => Some(Self::ALL),
            "NONE" => Some(Self::empty()),
            _ => None,
        }
    }

    /// Parses a list of operation-right names into a combined mask.
    #[must_use]
    pub fn parse_list<'a>(names: &[&'a str]) -> (Self, Vec<&'a str>) {
        let mut rights = Self::empty();
        let mut unknown = Vec::new();
        for name in names {
            match Self::parse(name) {
                Some(r) => rights |= r,
                None => unknown.push(*name),
            }
        }
        (rights, unknown)
    }

    /// Returns a human-readable list of right names.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::READ_SINGLE) {
            names.push("READ_SINGLE");
        }
        if self.contains(Self::READ_MULTIPLE) {
            names.push("READ_MULTIPLE");
        }
        if self.contains(Self::INVOKE) {
            names.push("INVOKE");
        }
        names
    }
}

impl std::fmt::Display for OperationRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}
