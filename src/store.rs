//! In-memory directory of user records.
//!
//! The store keeps the full set in display order plus the active search
//! query; the visible set is derived from both and recomputed after every
//! change, so searching never loses records.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::model::{User, UserId, UserPatch};
use crate::search::name_matches;

#[derive(Clone, Debug, Default)]
pub struct DirectoryStore {
    all: Vec<User>,
    visible: Vec<User>,
    query: String,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire set. A batch containing the same id twice is
    /// rejected and the store is left untouched.
    pub fn load(&mut self, records: Vec<User>) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(r.id) {
                return Err(StoreError::DuplicateId(r.id));
            }
        }
        self.all = records;
        self.refilter();
        Ok(())
    }

    /// Show only records whose name contains `query`, ignoring case.
    /// An empty query shows the full set.
    pub fn filter(&mut self, query: &str) {
        self.query = query.to_lowercase();
        self.refilter();
    }

    pub fn append(&mut self, record: User) -> Result<(), StoreError> {
        if self.contains(record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.all.push(record);
        self.refilter();
        Ok(())
    }

    pub fn replace(&mut self, id: UserId, patch: &UserPatch) -> Result<(), StoreError> {
        let user = self
            .all
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::UnknownId(id))?;
        patch.apply(user);
        self.refilter();
        Ok(())
    }

    pub fn remove(&mut self, id: UserId) -> Result<User, StoreError> {
        let pos = self
            .all
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::UnknownId(id))?;
        let removed = self.all.remove(pos);
        self.refilter();
        Ok(removed)
    }

    /// Records currently shown, in display order.
    pub fn visible(&self) -> &[User] {
        &self.visible
    }

    /// Every loaded record regardless of the active query.
    pub fn all(&self) -> &[User] {
        &self.all
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.all.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.all.iter().any(|u| u.id == id)
    }

    /// Number of visible records.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Active query, lowercased.
    pub fn query(&self) -> &str {
        &self.query
    }

    fn refilter(&mut self) {
        self.visible = self
            .all
            .iter()
            .filter(|u| name_matches(u, &self.query))
            .cloned()
            .collect();
    }
}
