//! Path classifier: request shapes to required-rights facts.
//!
//! Each hop of a resolved path, each projection node, and the bind target
//! of a `$ref` mutation contributes [`RightsRequirement`] facts. A fact is
//! a container name plus a disjunction of rights; any present bit
//! satisfies it. The disjunction makes "either replace or merge suffices"
//! explicit and data-driven instead of scattering it through per-verb
//! conditionals.
//!
//! The method-by-segment policy, in brief:
//!
//! | method | segment | required |
//! |---|---|---|
//! | GET | single / reference | `READ_SINGLE` |
//! | GET | collection / `$count` | `READ_MULTIPLE` |
//! | GET | `$value` | `READ_SINGLE` |
//! | POST | collection | `WRITE_APPEND` |
//! | POST | `$ref` | `WRITE_REPLACE\|WRITE_MERGE` on the owner |
//! | PUT | entity | `READ_SINGLE` and `WRITE_REPLACE` |
//! | PATCH | entity | `READ_SINGLE` and `WRITE_MERGE` |
//! | PUT/PATCH | `$ref` | `READ_SINGLE` and `WRITE_REPLACE\|WRITE_MERGE` on the owner |
//! | DELETE | entity | `READ_SINGLE` and `WRITE_DELETE` |
//! | DELETE | `$ref` | `READ_SINGLE` and `WRITE_REPLACE\|WRITE_MERGE` on the owner |
//! | DELETE | `$value` | `READ_SINGLE` and `WRITE_REPLACE\|WRITE_MERGE` |
//!
//! Unbinding a reference is a change to the owner, not a delete of
//! anything, so `$ref` mutations never require `WRITE_DELETE`. Every
//! non-leaf hop additionally requires the read right matching its
//! cardinality, and a bind target is classified as the reads needed to
//! dereference it, its member resolution always `READ_SINGLE`.
//!
//! The classifier is pure and infallible; malformed requests are rejected
//! upstream by the path resolver.

use serde::{Deserialize, Serialize};
use trellis_core::{Cardinality, ExpandNode, HttpMethod, Request, RequestStep, Rights, SegmentKind};

/// A single container plus a disjunction of rights, any one of which
/// satisfies the requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsRequirement {
    /// The container whose rule-table entry is consulted.
    pub container: String,
    /// Mask of acceptable rights; one present bit suffices.
    pub any_of: Rights,
}

impl RightsRequirement {
    /// A requirement on `container` satisfied by any bit of `any_of`.
    pub fn new(container: impl Into<String>, any_of: Rights) -> Self {
        Self {
            container: container.into(),
            any_of,
        }
    }
}

const REPLACE_OR_MERGE: Rights = Rights::WRITE_REPLACE.union(Rights::WRITE_MERGE);

/// Derive the full fact list for a request: path steps in traversal order,
/// then the bind target, then projections, then the wildcard selection.
#[must_use]
pub fn classify(request: &Request) -> Vec<RightsRequirement> {
    let mut facts = Vec::new();

    let steps = request.path.steps();
    for (index, step) in steps.iter().enumerate() {
        if step.is_leaf {
            let owner = index.checked_sub(1).map(|i| &steps[i]);
            classify_leaf(request.method, step, owner, &mut facts);
        } else {
            facts.push(traversal_requirement(step));
        }
    }

    if let Some(target) = &request.bind_target {
        // Binding an existing resource by URI requires read access
        // sufficient to resolve that URI; the member itself resolves as a
        // single resource.
        for step in target.steps() {
            if step.is_leaf {
                facts.push(RightsRequirement::new(&step.container, Rights::READ_SINGLE));
            } else {
                facts.push(traversal_requirement(step));
            }
        }
    }

    for node in &request.expansions {
        classify_expansion(node, &mut facts);
    }

    if request.select_all {
        let leaf = request.path.leaf();
        facts.push(RightsRequirement::new(
            &leaf.container,
            read_right(leaf.cardinality),
        ));
    }

    facts
}

fn read_right(cardinality: Cardinality) -> Rights {
    match cardinality {
        Cardinality::Single => Rights::READ_SINGLE,
        Cardinality::Collection => Rights::READ_MULTIPLE,
    }
}

/// Every intermediate hop must be readable at its own cardinality,
/// regardless of the final verb.
fn traversal_requirement(step: &RequestStep) -> RightsRequirement {
    RightsRequirement::new(&step.container, read_right(step.cardinality))
}

fn classify_leaf(
    method: HttpMethod,
    step: &RequestStep,
    owner: Option<&RequestStep>,
    facts: &mut Vec<RightsRequirement>,
) {
    // Reference mutations operate on the relationship held by the owning
    // container, which is the step before the `$ref` segment.
    let owner_container = owner.map_or(step.container.as_str(), |o| o.container.as_str());

    match (method, step.kind) {
        (HttpMethod::Get, SegmentKind::Count) => {
            facts.push(RightsRequirement::new(&step.container, Rights::READ_MULTIPLE));
        }
        (HttpMethod::Get, SegmentKind::RawValue) => {
            facts.push(RightsRequirement::new(&step.container, Rights::READ_SINGLE));
        }
        (HttpMethod::Get, SegmentKind::Entity | SegmentKind::Reference) => {
            facts.push(RightsRequirement::new(
                &step.container,
                read_right(step.cardinality),
            ));
        }

        (HttpMethod::Post, SegmentKind::Reference) => {
            facts.push(RightsRequirement::new(owner_container, REPLACE_OR_MERGE));
        }
        (HttpMethod::Post, _) => {
            facts.push(RightsRequirement::new(&step.container, Rights::WRITE_APPEND));
        }

        (HttpMethod::Put | HttpMethod::Patch, SegmentKind::Reference) => {
            facts.push(RightsRequirement::new(owner_container, Rights::READ_SINGLE));
            facts.push(RightsRequirement::new(owner_container, REPLACE_OR_MERGE));
        }
        (HttpMethod::Put, SegmentKind::Entity | SegmentKind::RawValue | SegmentKind::Count) => {
            facts.push(RightsRequirement::new(&step.container, Rights::READ_SINGLE));
            facts.push(RightsRequirement::new(&step.container, Rights::WRITE_REPLACE));
        }
        (HttpMethod::Patch, SegmentKind::Entity | SegmentKind::RawValue | SegmentKind::Count) => {
            facts.push(RightsRequirement::new(&step.container, Rights::READ_SINGLE));
            facts.push(RightsRequirement::new(&step.container, Rights::WRITE_MERGE));
        }

        (HttpMethod::Delete, SegmentKind::Reference) => {
            // Unbinding changes the owner; it deletes nothing.
            facts.push(RightsRequirement::new(owner_container, Rights::READ_SINGLE));
            facts.push(RightsRequirement::new(owner_container, REPLACE_OR_MERGE));
        }
        (HttpMethod::Delete, SegmentKind::RawValue) => {
            // Nulling out a value is likewise a change, not a delete.
            facts.push(RightsRequirement::new(&step.container, Rights::READ_SINGLE));
            facts.push(RightsRequirement::new(&step.container, REPLACE_OR_MERGE));
        }
        (HttpMethod::Delete, SegmentKind::Entity | SegmentKind::Count) => {
            facts.push(RightsRequirement::new(&step.container, Rights::READ_SINGLE));
            facts.push(RightsRequirement::new(&step.container, Rights::WRITE_DELETE));
        }
    }
}

/// Projected navigations are reads of the expanded container, recursively.
fn classify_expansion(node: &ExpandNode, facts: &mut Vec<RightsRequirement>) {
    facts.push(RightsRequirement::new(
        &node.container,
        read_right(node.cardinality),
    ));
    for child in &node.children {
        classify_expansion(child, facts);
    }
}
