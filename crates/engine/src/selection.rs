//! Selection of remote resources across pages and search terms.
//!
//! Responsibilities:
//! - Track selected ids in selection order, independent of the page or term
//!   currently displayed.
//! - Reject resources that are ineligible for the intended action at the
//!   toggle boundary.
//! - Provide the snapshot copied into a `BatchJob` at submit time.
//!
//! Does NOT handle:
//! - Fetching resources or re-checking eligibility later (the provider does
//!   that again when the batch runs).
//!
//! Invariants:
//! - Never contains an id whose resource was ineligible when it was selected.
//! - `snapshot()` returns an owned copy; mutating the set afterwards does not
//!   affect any job built from it.

use std::collections::HashSet;

use crate::action::ActionKind;
use crate::resource::{RemoteResource, ResourceId};

/// Result of `SelectionSet::toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    RejectedIneligible,
}

/// Ids selected for one action.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    action: ActionKind,
    order: Vec<ResourceId>,
    members: HashSet<ResourceId>,
}

impl SelectionSet {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            order: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    /// Add or remove one resource.
    ///
    /// An ineligible resource that is not selected is left out. Removing a
    /// selected resource is always allowed, even if it became ineligible.
    pub fn toggle(&mut self, resource: &RemoteResource) -> ToggleOutcome {
        if self.members.contains(&resource.id) {
            self.remove(resource.id);
            return ToggleOutcome::Removed;
        }
        if !resource.eligible_for(self.action) {
            tracing::debug!(id = %resource.id, action = %self.action, "Ignoring ineligible resource");
            return ToggleOutcome::RejectedIneligible;
        }
        self.insert(resource.id);
        ToggleOutcome::Added
    }

    /// Toggle-all over the visible slice.
    ///
    /// Ineligible resources are never added. When no eligible visible
    /// resource is missing, every visible id already selected is removed,
    /// including ones that have become ineligible since; otherwise the
    /// missing eligible ones are added. Selections outside `visible` are never
    /// touched. Returns the number of ids added (positive) or removed
    /// (negative).
    pub fn select_visible(&mut self, visible: &[RemoteResource]) -> isize {
        let missing: Vec<ResourceId> = visible
            .iter()
            .filter(|r| !self.members.contains(&r.id) && r.eligible_for(self.action))
            .map(|r| r.id)
            .collect();

        if missing.is_empty() {
            let mut removed = 0;
            for resource in visible {
                if self.remove(resource.id) {
                    removed += 1;
                }
            }
            -removed
        } else {
            let mut added = 0;
            for id in missing {
                if self.insert(id) {
                    added += 1;
                }
            }
            added
        }
    }

    /// Select an id the provider did not list; its eligibility is unknown, so
    /// the provider decides when the batch runs. Returns false if already
    /// selected.
    pub fn add_unlisted(&mut self, id: ResourceId) -> bool {
        self.insert(id)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Owned copy of the selected ids, in selection order.
    pub fn snapshot(&self) -> Vec<ResourceId> {
        self.order.clone()
    }

    fn insert(&mut self, id: ResourceId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, id: ResourceId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|selected| *selected != id);
            true
        } else {
            false
        }
    }
}
