//! Scoped name allocation.
//!
//! A [`ScopeArena`] owns a tree of name scopes. Each scope maps keys
//! (declarations, signatures, loops) to assigned names and keeps a set of
//! reserved names; a name is taken in a scope if it is reserved there or in
//! any ancestor. Scopes reference their parent by [`ScopeId`], so
//! declarations never point at scopes and scopes never own each other.
//!
//! # Protocol
//!
//! - A scope accepts declarations only while unsealed, and only once its
//!   parent is sealed. Names visible from a child are therefore final
//!   before the child picks any of its own.
//! - Reservations are append-only. A sealed scope is read-only.
//! - Allocation order decides which declaration keeps the bare name, so
//!   callers must declare in a reproducible order.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::grammar::{IdentifierGrammar, FALLBACK};

/// Index of a scope within its [`ScopeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Why a scope rejected a declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("the scope is sealed")]
    Sealed,
    #[error("the parent scope is not sealed yet")]
    ParentNotSealed,
    #[error("name `{name}` is already reserved")]
    AlreadyReserved { name: String },
    #[error("already named `{existing}`, cannot rename to `{requested}`")]
    Reassigned { existing: String, requested: String },
    #[error("`{name}` is not a reserved token")]
    NotReserved { name: String },
}

struct NameScope<K> {
    parent: Option<ScopeId>,
    names: FxHashMap<K, String>,
    /// Keys in assignment order, for deterministic dumps.
    order: Vec<K>,
    reserved: FxHashSet<String>,
    /// Next suffix worth probing per sanitized base name. Everything below
    /// it was already taken when last checked, and reservations only grow.
    next_suffix: FxHashMap<String, u32>,
    sealed: bool,
}

impl<K> NameScope<K> {
    fn new(parent: Option<ScopeId>, reserved: FxHashSet<String>) -> Self {
        Self {
            parent,
            names: FxHashMap::default(),
            order: Vec::new(),
            reserved,
            next_suffix: FxHashMap::default(),
            sealed: false,
        }
    }
}

/// Arena of parent-chained name scopes sharing one identifier grammar.
pub struct ScopeArena<K> {
    grammar: IdentifierGrammar,
    scopes: Vec<NameScope<K>>,
}

impl<K: Clone + Eq + Hash> ScopeArena<K> {
    pub fn new(grammar: IdentifierGrammar) -> Self {
        Self {
            grammar,
            scopes: Vec::new(),
        }
    }

    pub fn grammar(&self) -> IdentifierGrammar {
        self.grammar
    }

    /// Number of scopes allocated so far.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    // Scope creation

    /// Create a parentless scope with an initial reserved set.
    pub fn root<I, S>(&mut self, reserved: I) -> ScopeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reserved = reserved.into_iter().map(Into::into).collect();
        self.push(NameScope::new(None, reserved))
    }

    /// Create a scope nested in `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.push(NameScope::new(Some(parent), FxHashSet::default()))
    }

    fn push(&mut self, scope: NameScope<K>) -> ScopeId {
        let raw = u32::try_from(self.scopes.len())
            .unwrap_or_else(|_| panic!("scope count exceeds u32::MAX"));
        self.scopes.push(scope);
        ScopeId(raw)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    // Declaration

    /// Reserve exactly `name` for `key`.
    ///
    /// Fails if `name` is taken anywhere in the scope chain. Re-declaring
    /// a key with the name it already has is a no-op.
    pub fn declare_stable(&mut self, scope: ScopeId, key: K, name: &str) -> Result<(), ScopeError> {
        self.check_writable(scope)?;
        if let Some(result) = self.redeclaration(scope, &key, name) {
            return result;
        }
        if self.is_reserved(scope, name) {
            return Err(ScopeError::AlreadyReserved {
                name: name.to_owned(),
            });
        }
        self.record(scope, key, name.to_owned());
        Ok(())
    }

    /// Reserve `name` for `key`, allowing other keys to share it.
    ///
    /// For namespaces where several declarations are mandated to carry
    /// the same external name (member names on different aggregates).
    pub fn declare_shared(&mut self, scope: ScopeId, key: K, name: &str) -> Result<(), ScopeError> {
        self.check_writable(scope)?;
        if let Some(result) = self.redeclaration(scope, &key, name) {
            return result;
        }
        self.record(scope, key, name.to_owned());
        Ok(())
    }

    /// Bind `key` to an already-reserved token without reserving anything.
    ///
    /// Used for tokens every scope may bind, such as the implicit receiver.
    pub fn declare_fixed(&mut self, scope: ScopeId, key: K, name: &str) -> Result<(), ScopeError> {
        self.check_writable(scope)?;
        if let Some(result) = self.redeclaration(scope, &key, name) {
            return result;
        }
        if !self.is_reserved(scope, name) {
            return Err(ScopeError::NotReserved {
                name: name.to_owned(),
            });
        }
        let entry = &mut self.scopes[scope.index()];
        entry.order.push(key.clone());
        entry.names.insert(key, name.to_owned());
        Ok(())
    }

    /// Sanitize `suggested` and reserve the first free candidate among
    /// `name`, `name_0`, `name_1`, ...
    ///
    /// A key that already has a name in this scope keeps it.
    pub fn declare_fresh(
        &mut self,
        scope: ScopeId,
        key: K,
        suggested: &str,
    ) -> Result<String, ScopeError> {
        self.check_writable(scope)?;
        if let Some(existing) = self.scopes[scope.index()].names.get(&key) {
            return Ok(existing.clone());
        }

        let base = self.grammar.sanitize(suggested);
        let fresh = if self.is_reserved(scope, &base) {
            let mut suffix = self.scopes[scope.index()]
                .next_suffix
                .get(&base)
                .copied()
                .unwrap_or(0);
            let mut candidate = format!("{base}{FALLBACK}{suffix}");
            while self.is_reserved(scope, &candidate) {
                suffix += 1;
                candidate = format!("{base}{FALLBACK}{suffix}");
            }
            self.scopes[scope.index()]
                .next_suffix
                .insert(base, suffix + 1);
            candidate
        } else {
            base
        };

        self.record(scope, key, fresh.clone());
        Ok(fresh)
    }

    // Queries

    /// Name assigned to `key` in exactly this scope.
    pub fn lookup(&self, scope: ScopeId, key: &K) -> Option<&str> {
        self.scopes[scope.index()].names.get(key).map(String::as_str)
    }

    /// Whether `name` is reserved in `scope` or any ancestor.
    pub fn is_reserved(&self, scope: ScopeId, name: &str) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = &self.scopes[id.index()];
            if entry.reserved.contains(name) {
                return true;
            }
            current = entry.parent;
        }
        false
    }

    /// Make the scope read-only. Sealing twice is harmless.
    pub fn seal(&mut self, scope: ScopeId) {
        self.scopes[scope.index()].sealed = true;
    }

    pub fn is_sealed(&self, scope: ScopeId) -> bool {
        self.scopes[scope.index()].sealed
    }

    /// Assignments of this scope in declaration order.
    pub fn entries(&self, scope: ScopeId) -> impl Iterator<Item = (&K, &str)> {
        let entry = &self.scopes[scope.index()];
        entry
            .order
            .iter()
            .filter_map(|key| entry.names.get(key).map(|name| (key, name.as_str())))
    }

    // Internals

    fn check_writable(&self, scope: ScopeId) -> Result<(), ScopeError> {
        let entry = &self.scopes[scope.index()];
        if entry.sealed {
            return Err(ScopeError::Sealed);
        }
        match entry.parent {
            Some(parent) if !self.is_sealed(parent) => Err(ScopeError::ParentNotSealed),
            _ => Ok(()),
        }
    }

    /// Outcome of declaring a key that already has a name, if it has one.
    fn redeclaration(&self, scope: ScopeId, key: &K, name: &str) -> Option<Result<(), ScopeError>> {
        let existing = self.scopes[scope.index()].names.get(key)?;
        if existing == name {
            Some(Ok(()))
        } else {
            Some(Err(ScopeError::Reassigned {
                existing: existing.clone(),
                requested: name.to_owned(),
            }))
        }
    }

    fn record(&mut self, scope: ScopeId, key: K, name: String) {
        let entry = &mut self.scopes[scope.index()];
        entry.reserved.insert(name.clone());
        entry.order.push(key.clone());
        entry.names.insert(key, name);
    }
}

#[cfg(test)]
mod tests;
