//! The naming oracle.
//!
//! [`NameTables`] runs both naming phases when built and then answers the
//! three lookups code emission needs: [`name_of`](NameTables::name_of),
//! [`member_name_of`](NameTables::member_name_of) and
//! [`loop_label_of`](NameTables::loop_label_of).
//!
//! All tables live in one [`ScopeArena`], keyed by [`NameKey`]:
//!
//! - the global scope (top-level declarations), sealed after phase 1
//! - one member-function table keyed by [`Signature`], shared by every
//!   aggregate of the unit
//! - one member-field table
//! - a local scope per walked declaration, parented on the global scope
//!   or on the enclosing local scope
//! - loop-label scopes, kept apart from ordinary names

mod dump;
mod global;
mod local;

use std::borrow::Cow;
use std::iter;

use ori_decl::{DeclId, DeclKind, DeclTree, LoopId, Property};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::NamingConfig;
use crate::error::{NamingError, NamingResult};
use crate::scope::{ScopeArena, ScopeId};
use crate::signature::{Signature, SignatureComputer};

pub use dump::NameDump;
use global::GlobalNamingPass;
use local::LocalScopeWalker;

/// Allocation key of any naming table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameKey {
    Decl(DeclId),
    Signature(Signature),
    Loop(LoopId),
}

/// Scopes opened for one walked declaration.
#[derive(Clone, Copy, Debug)]
struct WalkedScope {
    owner: DeclId,
    names: ScopeId,
    labels: ScopeId,
}

/// Output names for one compilation unit.
pub struct NameTables<'tree> {
    tree: &'tree DeclTree,
    config: NamingConfig,
    scopes: ScopeArena<NameKey>,
    global: ScopeId,
    member_functions: ScopeId,
    member_fields: ScopeId,
    /// Scope rooted by each walked declaration.
    local_scopes: FxHashMap<DeclId, ScopeId>,
    /// Walked declarations in scope-creation order.
    walked: Vec<WalkedScope>,
    /// Label scope of each labeled loop.
    loop_scopes: FxHashMap<LoopId, ScopeId>,
}

impl<'tree> NameTables<'tree> {
    /// Name every declaration of `tree`.
    pub fn new(tree: &'tree DeclTree, config: NamingConfig) -> NamingResult<Self> {
        let mut tables = Self::unnamed(tree, config);
        GlobalNamingPass::new(&mut tables).run()?;
        tables.scopes.seal(tables.member_functions);
        tables.scopes.seal(tables.member_fields);
        Ok(tables)
    }

    /// Tables with the root scopes reserved but nothing named yet.
    fn unnamed(tree: &'tree DeclTree, config: NamingConfig) -> Self {
        let grammar = config.grammar;
        let mut scopes = ScopeArena::new(grammar);

        let global_reserved = grammar
            .keywords()
            .iter()
            .map(|&kw| kw.to_owned())
            .chain(iter::once(config.implicit_receiver.clone()));
        let global = scopes.root(global_reserved);

        let member_reserved: &[&str] = if grammar.reserves_member_keywords() {
            grammar.keywords()
        } else {
            &[]
        };
        let member_functions = scopes.root(member_reserved.iter().copied());
        let member_fields = scopes.root(member_reserved.iter().copied());

        Self {
            tree,
            config,
            scopes,
            global,
            member_functions,
            member_fields,
            local_scopes: FxHashMap::default(),
            walked: Vec::new(),
            loop_scopes: FxHashMap::default(),
        }
    }

    pub fn tree(&self) -> &'tree DeclTree {
        self.tree
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    // Queries

    /// Output name of a top-level or local declaration.
    ///
    /// Global names win; otherwise the enclosing declarations are searched
    /// innermost first. A declaration no walker visited is an error.
    pub fn name_of(&self, id: DeclId) -> NamingResult<&str> {
        let key = NameKey::Decl(id);
        if let Some(name) = self.scopes.lookup(self.global, &key) {
            return Ok(name);
        }
        for owner in self.tree.ancestors(id) {
            let Some(&scope) = self.local_scopes.get(&owner) else {
                continue;
            };
            if let Some(name) = self.scopes.lookup(scope, &key) {
                return Ok(name);
            }
        }
        Err(NamingError::MissingName {
            decl: self.tree.qualified_name(id),
        })
    }

    /// Output name of a member field or member function.
    ///
    /// Functions are looked up by signature. Synthetic call operators are
    /// the one exception to the table: an unregistered signature starting
    /// with the configured call-operator marker is its own name.
    pub fn member_name_of(&self, id: DeclId) -> NamingResult<Cow<'_, str>> {
        match &self.tree.decl(id).kind {
            DeclKind::Field(_) => self
                .scopes
                .lookup(self.member_fields, &NameKey::Decl(id))
                .map(Cow::Borrowed)
                .ok_or_else(|| self.missing_member(id)),
            DeclKind::Function(_) => {
                let key = NameKey::Signature(self.signatures().function_signature(id)?);
                if let Some(name) = self.scopes.lookup(self.member_functions, &key) {
                    return Ok(Cow::Borrowed(name));
                }
                match key {
                    NameKey::Signature(signature) if self.is_call_operator(&signature) => {
                        Ok(Cow::Owned(signature.into_string()))
                    }
                    _ => Err(self.missing_member(id)),
                }
            }
            other => Err(NamingError::UnexpectedKind {
                decl: self.tree.qualified_name(id),
                found: other.describe(),
                expected: "field or function",
            }),
        }
    }

    /// Label of a loop: `None` for unlabeled loops.
    ///
    /// A labeled loop no walker visited is an error.
    pub fn loop_label_of(&self, id: LoopId) -> NamingResult<Option<&str>> {
        if self.tree.get_loop(id).label.is_none() {
            return Ok(None);
        }
        self.loop_scopes
            .get(&id)
            .and_then(|&scope| self.scopes.lookup(scope, &NameKey::Loop(id)))
            .map(Some)
            .ok_or_else(|| NamingError::MissingLoopLabel {
                loop_id: format!("{id:?}"),
            })
    }

    /// Deterministic listing of every table, for debugging.
    pub fn dump(&self) -> String {
        NameDump::new(self).to_string()
    }

    // Shared helpers for the passes

    fn signatures(&self) -> SignatureComputer<'_> {
        SignatureComputer::new(self.tree, &self.config)
    }

    fn declare_fresh(&mut self, scope: ScopeId, id: DeclId, suggested: &str) -> NamingResult<()> {
        let tree = self.tree;
        let name = self
            .scopes
            .declare_fresh(scope, NameKey::Decl(id), suggested)
            .map_err(|err| NamingError::from_scope(err, tree.qualified_name(id)))?;
        trace!(decl = %tree.qualified_name(id), %name, "fresh name");
        Ok(())
    }

    fn declare_stable(&mut self, scope: ScopeId, id: DeclId, name: &str) -> NamingResult<()> {
        let tree = self.tree;
        self.scopes
            .declare_stable(scope, NameKey::Decl(id), name)
            .map_err(|err| NamingError::from_scope(err, tree.qualified_name(id)))?;
        trace!(decl = %tree.qualified_name(id), name, "stable name");
        Ok(())
    }

    /// Bind an implicit receiver to the reserved receiver token.
    fn declare_receiver(&mut self, scope: ScopeId, id: DeclId) -> NamingResult<()> {
        let tree = self.tree;
        self.scopes
            .declare_fixed(scope, NameKey::Decl(id), &self.config.implicit_receiver)
            .map_err(|err| NamingError::from_scope(err, tree.qualified_name(id)))
    }

    fn declare_loop_label(&mut self, scope: ScopeId, id: LoopId, label: &str) -> NamingResult<()> {
        let name = self
            .scopes
            .declare_fresh(scope, NameKey::Loop(id), label)
            .map_err(|err| NamingError::from_scope(err, format!("{id:?}")))?;
        trace!(loop_id = ?id, %name, "loop label");
        self.loop_scopes.insert(id, scope);
        Ok(())
    }

    /// Enter a member into the member tables.
    ///
    /// Functions are keyed by signature and share the name with every
    /// function of the same shape. External fields keep their declared
    /// name; other fields get a fresh `field_Owner` name. Properties enter
    /// their accessors and backing field. Static functions of external
    /// aggregates are skipped; anywhere else they are a routing error.
    fn register_member(&mut self, id: DeclId) -> NamingResult<()> {
        let tree = self.tree;
        let decl = tree.decl(id);
        match &decl.kind {
            // Reached through the owner's runtime name, never by signature.
            DeclKind::Function(_)
                if decl.is_static()
                    && tree.is_effectively_external(id)
                    && !tree.is_closed_variant_member(id) => {}
            DeclKind::Function(_) => {
                let signature = self.signatures().function_signature(id)?;
                let name = signature.as_str().to_owned();
                self.scopes
                    .declare_shared(self.member_functions, NameKey::Signature(signature), &name)
                    .map_err(|err| NamingError::from_scope(err, tree.qualified_name(id)))?;
                trace!(decl = %tree.qualified_name(id), %name, "member function");
            }
            DeclKind::Field(_) => {
                let suggested = self.signatures().field_signature(id)?;
                let key = NameKey::Decl(id);
                let result = if tree.is_effectively_external(id) {
                    self.scopes
                        .declare_shared(self.member_fields, key, &suggested)
                        .map(|()| suggested)
                } else {
                    self.scopes.declare_fresh(self.member_fields, key, &suggested)
                };
                let name =
                    result.map_err(|err| NamingError::from_scope(err, tree.qualified_name(id)))?;
                trace!(decl = %tree.qualified_name(id), %name, "member field");
            }
            DeclKind::Property(property) => {
                for part in property_parts(property) {
                    self.register_member(part)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Keywords of the grammar, reserved at the root of every label tree.
    fn label_root(&mut self) -> ScopeId {
        let keywords = self.config.grammar.keywords();
        self.scopes.root(keywords.iter().copied())
    }

    fn is_call_operator(&self, signature: &Signature) -> bool {
        signature
            .as_str()
            .starts_with(self.config.call_operator_marker.as_str())
    }

    fn missing_member(&self, id: DeclId) -> NamingError {
        NamingError::MissingMemberName {
            decl: self.tree.qualified_name(id),
        }
    }
}

/// Backing field, getter and setter of a property, in that order.
fn property_parts(property: &Property) -> impl Iterator<Item = DeclId> {
    [property.backing_field, property.getter, property.setter]
        .into_iter()
        .flatten()
}
