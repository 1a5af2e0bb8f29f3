//! Arena-backed declaration tree.
//!
//! [`DeclTree`] owns every [`Declaration`], [`Loop`] and [`Package`] of one
//! compilation unit. Iteration helpers always yield in allocation order so
//! that passes over the tree are reproducible run to run.

use crate::decl::{Aggregate, AggregateKind, DeclKind, Declaration, Loop, Parent};
use crate::ids::{DeclId, LoopId, PackageId};

/// Name of the synthesized closed-variant member listing all cases.
pub const VALUES_NAME: &str = "values";

/// Name of the synthesized closed-variant member looking a case up by name.
pub const VALUE_OF_NAME: &str = "valueOf";

/// One package fragment: a qualified package name and its top-level
/// declarations in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    /// Dotted package path; empty for the root package.
    pub fq_name: String,
    pub declarations: Vec<DeclId>,
}

/// The declaration hierarchy of a compilation unit.
#[derive(Clone, Debug, Default)]
pub struct DeclTree {
    packages: Vec<Package>,
    decls: Vec<Declaration>,
    loops: Vec<Loop>,
}

impl DeclTree {
    pub fn new() -> Self {
        Self::default()
    }

    // Allocation

    pub fn alloc_package(&mut self, fq_name: impl Into<String>) -> PackageId {
        let id = PackageId::from_len(self.packages.len());
        self.packages.push(Package {
            fq_name: fq_name.into(),
            declarations: Vec::new(),
        });
        id
    }

    /// Allocate a declaration. Does not link it into its parent; see
    /// [`TreeBuilder`](crate::TreeBuilder) for that.
    pub fn alloc_decl(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId::from_len(self.decls.len());
        self.decls.push(decl);
        id
    }

    pub fn alloc_loop(&mut self, lp: Loop) -> LoopId {
        let id = LoopId::from_len(self.loops.len());
        self.loops.push(lp);
        id
    }

    // Access

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    #[inline]
    pub(crate) fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }

    #[inline]
    pub fn get_loop(&self, id: LoopId) -> &Loop {
        &self.loops[id.index()]
    }

    #[inline]
    pub(crate) fn loop_mut(&mut self, id: LoopId) -> &mut Loop {
        &mut self.loops[id.index()]
    }

    #[inline]
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    #[inline]
    pub(crate) fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.index()]
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, pkg)| (PackageId::from_len(i), pkg))
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Every declaration ID in allocation order.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len()).map(DeclId::from_len)
    }

    /// Top-level declarations: packages in order, each package's
    /// declarations in source order.
    pub fn top_level(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.packages
            .iter()
            .flat_map(|pkg| pkg.declarations.iter().copied())
    }

    // Structure queries

    pub fn parent_decl(&self, id: DeclId) -> Option<DeclId> {
        match self.decl(id).parent {
            Parent::Decl(parent) => Some(parent),
            Parent::Package(_) => None,
        }
    }

    /// Enclosing declarations, innermost first.
    pub fn ancestors(&self, id: DeclId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent_decl(id),
        }
    }

    /// Package fragment the declaration ultimately belongs to.
    pub fn package_of(&self, id: DeclId) -> PackageId {
        let mut current = id;
        loop {
            match self.decl(current).parent {
                Parent::Package(pkg) => return pkg,
                Parent::Decl(parent) => current = parent,
            }
        }
    }

    /// Whether the declaration sits inside something other than aggregates
    /// (a function body, an initializer, a property).
    pub fn is_local(&self, id: DeclId) -> bool {
        self.ancestors(id)
            .any(|ancestor| !matches!(self.decl(ancestor).kind, DeclKind::Aggregate(_)))
    }

    /// Whether the declaration or anything enclosing it is external.
    pub fn is_effectively_external(&self, id: DeclId) -> bool {
        self.decl(id).is_external()
            || self
                .ancestors(id)
                .any(|ancestor| self.decl(ancestor).is_external())
    }

    /// Nearest enclosing aggregate, skipping properties and other
    /// non-aggregate parents.
    pub fn enclosing_aggregate(&self, id: DeclId) -> Option<DeclId> {
        self.ancestors(id)
            .find(|&ancestor| self.decl(ancestor).as_aggregate().is_some())
    }

    /// The aggregate directly containing this declaration, if any.
    pub fn owning_aggregate(&self, id: DeclId) -> Option<(DeclId, &Aggregate)> {
        let parent = self.parent_decl(id)?;
        self.decl(parent).as_aggregate().map(|agg| (parent, agg))
    }

    /// Dotted path for diagnostics: package, enclosing declarations, name.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut segments: Vec<&str> = self
            .ancestors(id)
            .map(|ancestor| self.decl(ancestor).name.as_str())
            .collect();
        segments.reverse();
        segments.push(&self.decl(id).name);

        let package = &self.package(self.package_of(id)).fq_name;
        if package.is_empty() {
            segments.join(".")
        } else {
            format!("{package}.{}", segments.join("."))
        }
    }

    /// Follow fake-override links to the real declaration being shadowed.
    ///
    /// Non-fake declarations resolve to themselves. Links are searched
    /// depth-first in declaration order; `None` means every path ends in
    /// another placeholder (malformed input).
    pub fn resolve_fake_override(&self, id: DeclId) -> Option<DeclId> {
        if !self.decl(id).is_fake_override() {
            return Some(id);
        }
        let mut visited = vec![id];
        let mut stack: Vec<DeclId> = self.decl(id).overridden().iter().rev().copied().collect();
        while let Some(candidate) = stack.pop() {
            if visited.contains(&candidate) {
                continue;
            }
            visited.push(candidate);
            let decl = self.decl(candidate);
            if !decl.is_fake_override() {
                return Some(candidate);
            }
            stack.extend(decl.overridden().iter().rev().copied());
        }
        None
    }

    /// Closed-variant synthesized static member: `values()` or
    /// `valueOf(name)` of an enum-like container.
    ///
    /// Matched structurally (no receivers, no type parameters, expected
    /// arity), not by origin.
    pub fn is_closed_variant_member(&self, id: DeclId) -> bool {
        let Some(function) = self.decl(id).as_function() else {
            return false;
        };
        if function.dispatch_receiver.is_some()
            || function.extension_receiver.is_some()
            || !function.type_params.is_empty()
        {
            return false;
        }
        match self.owning_aggregate(id) {
            Some((_, agg)) if agg.kind == AggregateKind::EnumClass => {}
            _ => return false,
        }
        match self.decl(id).name.as_str() {
            VALUES_NAME => function.params.is_empty(),
            VALUE_OF_NAME => function.params.len() == 1,
            _ => false,
        }
    }
}

/// Iterator over enclosing declarations, innermost first.
pub struct Ancestors<'tree> {
    tree: &'tree DeclTree,
    next: Option<DeclId>,
}

impl Iterator for Ancestors<'_> {
    type Item = DeclId;

    fn next(&mut self) -> Option<DeclId> {
        let current = self.next?;
        self.next = self.tree.parent_decl(current);
        Some(current)
    }
}
