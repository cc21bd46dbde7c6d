//! Normalized in-memory cache for the todo list.
//!
//! Items are stored once, keyed by id; the list query result is stored as
//! the ordered ids the server returned. Mutation payloads merge into (or are
//! evicted from) the entity map so the list reads consistently between a
//! mutation and the re-fetch that follows it.

use std::collections::HashMap;

use crate::types::{TodoId, TodoItem};

#[derive(Debug, Default, Clone)]
pub struct NormalizedCache {
    entities: HashMap<TodoId, TodoItem>,
    list: Option<Vec<TodoId>>,
    stale: bool,
}

impl NormalizedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list with a fresh query result. Entities not in
    /// the result are dropped.
    pub fn write_list(&mut self, items: Vec<TodoItem>) {
        let mut ids = Vec::with_capacity(items.len());
        self.entities.clear();
        for item in items {
            if !self.entities.contains_key(&item.id) {
                ids.push(item.id.clone());
            }
            self.entities.insert(item.id.clone(), item);
        }
        self.list = Some(ids);
        self.stale = false;
    }

    /// Upsert mutation results. Items not yet in the list are appended.
    pub fn merge(&mut self, items: &[TodoItem]) {
        for item in items {
            if self.entities.insert(item.id.clone(), item.clone()).is_none() {
                if let Some(ids) = self.list.as_mut() {
                    ids.push(item.id.clone());
                }
            }
        }
    }

    pub fn evict(&mut self, id: &TodoId) {
        self.entities.remove(id);
        if let Some(ids) = self.list.as_mut() {
            ids.retain(|cached| cached != id);
        }
    }

    /// Mark the list query stale. The previous list stays readable until a
    /// fresh result replaces it.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// True once a list result has been written.
    pub fn has_list(&self) -> bool {
        self.list.is_some()
    }

    /// The list in server order, or `None` before the first fetch.
    pub fn read_list(&self) -> Option<Vec<TodoItem>> {
        let ids = self.list.as_ref()?;
        Some(ids.iter().filter_map(|id| self.entities.get(id).cloned()).collect())
    }

    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.entities.get(id)
    }
}
