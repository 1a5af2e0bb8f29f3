//! Local scopes.
//!
//! A walker opens one scope per declaration that owns names (functions,
//! constructors, initializers, local aggregates), declares everything the
//! declaration directly owns, seals the scope and only then descends into
//! nested declarations. A child scope therefore never allocates until
//! every name it can see is final.

use ori_decl::{Body, BodyItem, DeclId, DeclKind};
use tracing::trace;

use super::{property_parts, NameTables, WalkedScope};
use crate::error::NamingResult;
use crate::scope::ScopeId;
use crate::stack::ensure_sufficient_stack;

/// Assigns local names below one declaration.
pub(crate) struct LocalScopeWalker<'a, 'tree> {
    tables: &'a mut NameTables<'tree>,
}

/// Open scopes of the declaration being walked.
struct Frame {
    names: ScopeId,
    labels: ScopeId,
    /// Declarations that get their own walker once this frame is sealed.
    nested: Vec<DeclId>,
}

impl<'a, 'tree> LocalScopeWalker<'a, 'tree> {
    pub fn new(tables: &'a mut NameTables<'tree>) -> Self {
        Self { tables }
    }

    /// Walk `id` in a new scope under the sealed scope `parent`.
    ///
    /// Loop labels start a fresh label tree: labels never cross the
    /// outermost walked declaration.
    pub fn walk(&mut self, id: DeclId, parent: ScopeId) -> NamingResult<()> {
        self.walk_in(id, parent, None)
    }

    fn walk_in(&mut self, id: DeclId, parent: ScopeId, labels: Option<ScopeId>) -> NamingResult<()> {
        let tree = self.tables.tree;
        let decl = tree.decl(id);

        // Properties own nothing themselves; their accessors and an
        // initialized backing field are walked as siblings.
        if let Some(property) = decl.as_property() {
            for part in property_parts(property) {
                let part_decl = tree.decl(part);
                if part_decl.as_function().is_some() || part_decl.body().is_some() {
                    self.walk_in(part, parent, labels)?;
                }
            }
            return Ok(());
        }

        let names = self.tables.scopes.child(parent);
        let labels = match labels {
            Some(enclosing) => self.tables.scopes.child(enclosing),
            None => self.tables.label_root(),
        };
        self.tables.local_scopes.insert(id, names);
        self.tables.walked.push(WalkedScope {
            owner: id,
            names,
            labels,
        });

        let mut frame = Frame {
            names,
            labels,
            nested: Vec::new(),
        };
        self.declare_owned(id, &mut frame)?;
        self.tables.scopes.seal(names);
        self.tables.scopes.seal(labels);
        trace!(decl = %tree.qualified_name(id), nested = frame.nested.len(), "local scope sealed");

        for child in frame.nested {
            ensure_sufficient_stack(|| self.walk_in(child, names, Some(labels)))?;
        }
        Ok(())
    }

    /// Declare what `id` directly owns: receivers, type parameters,
    /// parameters and body contents.
    fn declare_owned(&mut self, id: DeclId, frame: &mut Frame) -> NamingResult<()> {
        let tree = self.tables.tree;
        match &tree.decl(id).kind {
            DeclKind::Function(function) => {
                for &tp in &function.type_params {
                    self.declare_simple(tp, frame)?;
                }
                let receivers = function.dispatch_receiver.into_iter().chain(function.extension_receiver);
                for param in receivers.chain(function.params.iter().copied()) {
                    self.declare_param(param, frame)?;
                }
                if let Some(body) = &function.body {
                    self.declare_body(body, frame)?;
                }
            }
            DeclKind::Constructor(constructor) => {
                for &param in &constructor.params {
                    self.declare_param(param, frame)?;
                }
                if let Some(body) = &constructor.body {
                    self.declare_body(body, frame)?;
                }
            }
            DeclKind::AnonymousInitializer(body) => self.declare_body(body, frame)?,
            DeclKind::Field(field) => {
                if let Some(body) = &field.initializer {
                    self.declare_body(body, frame)?;
                }
            }
            DeclKind::LocalVariable(local) => {
                if let Some(body) = &local.initializer {
                    self.declare_body(body, frame)?;
                }
            }
            DeclKind::Aggregate(aggregate) => {
                if let Some(receiver) = aggregate.this_receiver {
                    self.declare_param(receiver, frame)?;
                }
                for &tp in &aggregate.type_params {
                    self.declare_simple(tp, frame)?;
                }
                let local = tree.is_local(id);
                for &member in &aggregate.members {
                    if local {
                        self.declare_local_member(member, frame)?;
                    } else if tree.decl(member).as_aggregate().is_some() {
                        self.declare_simple(member, frame)?;
                    }
                }
            }
            DeclKind::Property(_) | DeclKind::TypeParameter | DeclKind::ValueParameter(_) => {}
        }
        Ok(())
    }

    /// Members of a local aggregate live in the aggregate's scope, and are
    /// entered into the member tables like any other member.
    fn declare_local_member(&mut self, member: DeclId, frame: &mut Frame) -> NamingResult<()> {
        let tree = self.tables.tree;
        let decl = tree.decl(member);
        match &decl.kind {
            DeclKind::Function(_) => {
                self.declare_simple(member, frame)?;
                self.tables.register_member(member)?;
                frame.nested.push(member);
            }
            DeclKind::Field(field) => {
                self.declare_simple(member, frame)?;
                self.tables.register_member(member)?;
                if field.initializer.is_some() {
                    frame.nested.push(member);
                }
            }
            DeclKind::Property(property) => {
                self.declare_simple(member, frame)?;
                for part in property_parts(property) {
                    self.declare_simple(part, frame)?;
                }
                self.tables.register_member(member)?;
                frame.nested.push(member);
            }
            DeclKind::Aggregate(_) => {
                self.declare_simple(member, frame)?;
                frame.nested.push(member);
            }
            DeclKind::Constructor(_) | DeclKind::AnonymousInitializer(_) => {
                frame.nested.push(member);
            }
            DeclKind::TypeParameter | DeclKind::ValueParameter(_) | DeclKind::LocalVariable(_) => {}
        }
        Ok(())
    }

    fn declare_body(&mut self, body: &'tree Body, frame: &mut Frame) -> NamingResult<()> {
        let tree = self.tables.tree;
        for item in &body.items {
            match *item {
                BodyItem::Decl(local) => self.declare_local(local, frame)?,
                BodyItem::Loop(id) => {
                    let lp = tree.get_loop(id);
                    if let Some(label) = &lp.label {
                        self.tables.declare_loop_label(frame.labels, id, label)?;
                    }
                    ensure_sufficient_stack(|| self.declare_body(&lp.body, frame))?;
                }
            }
        }
        Ok(())
    }

    /// A declaration appearing in a body.
    fn declare_local(&mut self, id: DeclId, frame: &mut Frame) -> NamingResult<()> {
        let tree = self.tables.tree;
        self.declare_simple(id, frame)?;
        match &tree.decl(id).kind {
            // Initializer contents share the enclosing scope.
            DeclKind::LocalVariable(local) => {
                if let Some(body) = &local.initializer {
                    ensure_sufficient_stack(|| self.declare_body(body, frame))?;
                }
            }
            DeclKind::Property(property) => {
                for part in property_parts(property) {
                    self.declare_simple(part, frame)?;
                }
                frame.nested.push(id);
            }
            DeclKind::Field(field) => {
                if field.initializer.is_some() {
                    frame.nested.push(id);
                }
            }
            DeclKind::Function(_)
            | DeclKind::Aggregate(_)
            | DeclKind::Constructor(_)
            | DeclKind::AnonymousInitializer(_) => frame.nested.push(id),
            DeclKind::TypeParameter | DeclKind::ValueParameter(_) => {}
        }
        Ok(())
    }

    /// Implicit receivers share the reserved receiver token; every other
    /// parameter gets a fresh name.
    fn declare_param(&mut self, id: DeclId, frame: &Frame) -> NamingResult<()> {
        let implicit = matches!(
            &self.tables.tree.decl(id).kind,
            DeclKind::ValueParameter(param) if param.role.is_implicit_receiver()
        );
        if implicit {
            self.tables.declare_receiver(frame.names, id)
        } else {
            self.declare_simple(id, frame)
        }
    }

    fn declare_simple(&mut self, id: DeclId, frame: &Frame) -> NamingResult<()> {
        let tree = self.tables.tree;
        self.tables.declare_fresh(frame.names, id, &tree.decl(id).name)
    }
}
