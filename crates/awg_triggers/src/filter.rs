//! Trigger filtering

use crate::events::Actor;
use awg_core::{EntityKind, ObjectId};
use std::collections::HashSet;

/// Filter for what entities can activate a trigger
#[derive(Debug, Clone)]
pub struct TriggerFilter {
    /// Collision categories that may activate the trigger (actor needs at least one)
    pub categories: u32,
    /// Kinds that may activate the trigger (empty = any)
    pub allowed_kinds: Vec<EntityKind>,
    /// Entities that never activate the trigger
    pub ignored: HashSet<ObjectId>,
}

impl TriggerFilter {
    /// Create a new filter that accepts everything
    pub fn new() -> Self {
        Self {
            categories: u32::MAX,
            allowed_kinds: Vec::new(),
            ignored: HashSet::new(),
        }
    }

    /// Set the category mask
    pub fn with_categories(mut self, categories: u32) -> Self {
        self.categories = categories;
        self
    }

    /// Allow a kind. The first call turns the allow-list on.
    pub fn allow_kind(mut self, kind: EntityKind) -> Self {
        if !self.allowed_kinds.contains(&kind) {
            self.allowed_kinds.push(kind);
        }
        self
    }

    /// Allow several kinds
    pub fn allow_kinds<I: IntoIterator<Item = EntityKind>>(mut self, kinds: I) -> Self {
        for kind in kinds {
            self = self.allow_kind(kind);
        }
        self
    }

    /// Ignore specific entities
    pub fn ignore<I: IntoIterator<Item = ObjectId>>(mut self, entities: I) -> Self {
        self.ignored.extend(entities);
        self
    }

    /// Check if an actor may enter.
    ///
    /// `anchor` is the object the trigger follows; it never triggers its own
    /// trigger.
    pub fn passes(&self, actor: &Actor, anchor: Option<ObjectId>) -> bool {
        if anchor == Some(actor.id) {
            return false;
        }

        if self.ignored.contains(&actor.id) {
            return false;
        }

        if actor.categories & self.categories == 0 {
            return false;
        }

        self.allowed_kinds.is_empty() || self.allowed_kinds.contains(&actor.kind)
    }
}

impl Default for TriggerFilter {
    fn default() -> Self {
        Self::new()
    }
}
