//! Persistent declaration identities.
//!
//! A [`DeclarationTable`] hands out [`UniqId`]s in registration order and
//! memoizes them, so registering a declaration twice yields the same id.
//! The table outlives a single compilation: [`snapshot`] it after a build
//! and [`from_snapshot`] it against the next build's tree. Stored ids are
//! re-bound by [`DeclKey`], not by arena position, so declarations that
//! survive an edit keep their ids wherever they moved. Ids of declarations
//! that disappeared are retired and never handed out again.
//!
//! [`snapshot`]: DeclarationTable::snapshot
//! [`from_snapshot`]: DeclarationTable::from_snapshot

use std::fmt;

use ori_decl::{DeclId, DeclTree};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::LinkResult;

mod key;

pub use key::DeclKey;

/// Persistent identity of an exportable declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct UniqId(u64);

impl UniqId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for UniqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Memoized declaration → [`UniqId`] assignment.
#[derive(Debug, Default, Clone)]
pub struct DeclarationTable {
    ids: FxHashMap<DeclId, UniqId>,
    /// Reverse map for every declaration that received an id.
    decls: FxHashMap<UniqId, DeclId>,
    /// Declarations in registration order.
    order: Vec<DeclId>,
    /// Stored assignments with no counterpart in the current tree, carried
    /// into the next snapshot.
    retired: Vec<(DeclKey, UniqId)>,
    next: u64,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from a previous build's [`snapshot`](Self::snapshot),
    /// binding stored ids to the declarations of `tree` with the same key.
    ///
    /// New registrations continue after the highest id ever handed out.
    /// When several declarations share a key, the first in tree order
    /// keeps the id.
    pub fn from_snapshot(tree: &DeclTree, snapshot: TableSnapshot) -> Self {
        let mut table = Self {
            next: snapshot.next,
            ..Self::default()
        };
        let mut stored: FxHashMap<DeclKey, UniqId> = FxHashMap::default();
        for (key, id) in &snapshot.entries {
            table.next = table.next.max(id.raw() + 1);
            stored.insert(key.clone(), *id);
        }
        for decl in tree.decl_ids() {
            if stored.is_empty() {
                break;
            }
            if let Some(id) = stored.remove(&DeclKey::of(tree, decl)) {
                table.insert(decl, id);
            }
        }
        table.retired = snapshot
            .entries
            .into_iter()
            .filter(|(key, _)| stored.contains_key(key))
            .collect();
        debug!(
            restored = table.len(),
            retired = table.retired.len(),
            "restored declaration table"
        );
        table
    }

    /// Id of `decl`, assigning the next one on first registration.
    pub fn register(&mut self, decl: DeclId) -> UniqId {
        if let Some(&id) = self.ids.get(&decl) {
            return id;
        }
        let id = UniqId(self.next);
        self.next += 1;
        self.insert(decl, id);
        trace!(?decl, ?id, "registered declaration");
        id
    }

    pub fn get(&self, decl: DeclId) -> Option<UniqId> {
        self.ids.get(&decl).copied()
    }

    /// Declaration an id was handed out to.
    pub fn decl_of(&self, id: UniqId) -> Option<DeclId> {
        self.decls.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered declarations with their ids, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, UniqId)> + '_ {
        self.order
            .iter()
            .filter_map(|decl| self.ids.get(decl).map(|&id| (*decl, id)))
    }

    /// Export every assignment, retired ones included, for persistence
    /// across builds. `tree` must be the tree ids were registered against.
    pub fn snapshot(&self, tree: &DeclTree) -> TableSnapshot {
        let entries = self
            .iter()
            .map(|(decl, id)| (DeclKey::of(tree, decl), id))
            .chain(self.retired.iter().cloned())
            .collect();
        TableSnapshot {
            next: self.next,
            entries,
        }
    }

    fn insert(&mut self, decl: DeclId, id: UniqId) {
        self.ids.insert(decl, id);
        self.decls.insert(id, decl);
        self.order.push(decl);
    }
}

/// Serializable form of a [`DeclarationTable`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Next id to hand out.
    pub next: u64,
    /// Live assignments in registration order, then retired ones.
    pub entries: Vec<(DeclKey, UniqId)>,
}

impl TableSnapshot {
    pub fn to_bytes(&self) -> LinkResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> LinkResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests;
