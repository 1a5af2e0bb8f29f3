//! Two-phase naming of the whole tree.
//!
//! Phase 1 names every top-level declaration in the global scope and seals
//! it. Phase 2 fills the member tables and walks every body, so local
//! names are chosen against a global scope that can no longer change.

use ori_decl::{DeclId, DeclKind};
use tracing::debug;

use super::{property_parts, LocalScopeWalker, NameTables};
use crate::error::NamingResult;
use crate::stack::ensure_sufficient_stack;

/// Drives both naming phases over a [`NameTables`].
pub(crate) struct GlobalNamingPass<'a, 'tree> {
    tables: &'a mut NameTables<'tree>,
}

impl<'a, 'tree> GlobalNamingPass<'a, 'tree> {
    pub fn new(tables: &'a mut NameTables<'tree>) -> Self {
        Self { tables }
    }

    pub fn run(mut self) -> NamingResult<()> {
        self.name_globals()?;
        self.bind_external_members()?;
        self.name_members_and_bodies()
    }

    /// Phase 1: stable names for external declarations, then fresh names
    /// seeded from the declared name for the rest, all in declaration
    /// order. Output-name annotations only bind external declarations.
    /// Top-level property parts are global too.
    fn name_globals(&mut self) -> NamingResult<()> {
        let tree = self.tables.tree;
        let global = self.tables.global;
        let top_level: Vec<DeclId> = tree.top_level().collect();
        debug!(declarations = top_level.len(), "naming top-level declarations");

        for &id in &top_level {
            let decl = tree.decl(id);
            if decl.is_external() {
                self.tables.declare_stable(global, id, decl.output_name())?;
            }
        }
        for &id in &top_level {
            let decl = tree.decl(id);
            if !decl.is_external() {
                self.tables.declare_fresh(global, id, &decl.name)?;
            }
            if let Some(property) = decl.as_property() {
                for part in property_parts(property) {
                    self.tables.declare_fresh(global, part, &tree.decl(part).name)?;
                }
            }
        }

        self.tables.scopes.seal(global);
        debug!("global scope sealed");
        Ok(())
    }

    /// Phase 2a: members of external aggregates keep their runtime names.
    ///
    /// Runs before any other member is named so that fresh member names
    /// steer clear of external ones.
    fn bind_external_members(&mut self) -> NamingResult<()> {
        let tree = self.tables.tree;
        for id in tree.top_level() {
            let decl = tree.decl(id);
            if decl.is_external() && decl.as_aggregate().is_some() {
                self.bind_members(id)?;
            }
        }
        Ok(())
    }

    fn bind_members(&mut self, aggregate: DeclId) -> NamingResult<()> {
        let tree = self.tables.tree;
        let Some(agg) = tree.decl(aggregate).as_aggregate() else {
            return Ok(());
        };
        for &member in &agg.members {
            match tree.decl(member).kind {
                DeclKind::Aggregate(_) => ensure_sufficient_stack(|| self.bind_members(member))?,
                DeclKind::Function(_) if tree.is_closed_variant_member(member) => {}
                _ => self.tables.register_member(member)?,
            }
        }
        Ok(())
    }

    /// Phase 2b: member names and local scopes for everything.
    fn name_members_and_bodies(&mut self) -> NamingResult<()> {
        let tree = self.tables.tree;
        let global = self.tables.global;
        debug!("naming members and local scopes");
        for id in tree.top_level() {
            if tree.decl(id).as_aggregate().is_some() {
                self.name_aggregate(id)?;
            } else {
                LocalScopeWalker::new(self.tables).walk(id, global)?;
            }
        }
        debug!(scopes = self.tables.scopes.len(), "naming finished");
        Ok(())
    }

    /// Name the members of a non-local aggregate and walk their bodies.
    ///
    /// Every member walker hangs off the global scope; the aggregate's own
    /// scope holds its receiver, type parameters and nested aggregates.
    fn name_aggregate(&mut self, aggregate: DeclId) -> NamingResult<()> {
        let tree = self.tables.tree;
        let global = self.tables.global;
        let Some(agg) = tree.decl(aggregate).as_aggregate() else {
            return Ok(());
        };
        LocalScopeWalker::new(self.tables).walk(aggregate, global)?;

        for &member in &agg.members {
            match &tree.decl(member).kind {
                DeclKind::Aggregate(_) => {
                    ensure_sufficient_stack(|| self.name_aggregate(member))?;
                }
                DeclKind::Function(_) | DeclKind::Property(_) => {
                    self.tables.register_member(member)?;
                    LocalScopeWalker::new(self.tables).walk(member, global)?;
                }
                DeclKind::Field(field) => {
                    self.tables.register_member(member)?;
                    if field.initializer.is_some() {
                        LocalScopeWalker::new(self.tables).walk(member, global)?;
                    }
                }
                DeclKind::Constructor(_) | DeclKind::AnonymousInitializer(_) => {
                    LocalScopeWalker::new(self.tables).walk(member, global)?;
                }
                DeclKind::TypeParameter
                | DeclKind::ValueParameter(_)
                | DeclKind::LocalVariable(_) => {}
            }
        }
        Ok(())
    }
}
