//! Reference encoding.
//!
//! [`ReferenceEncoder`] turns a declaration that another module may use
//! into a [`ReferenceRecord`]: owner path, simple name, role, and the
//! [`UniqId`] of whatever the consumer can look up independently.
//!
//! Accessors and backing fields are not independently discoverable, so
//! their records carry the owning property's id. Fake overrides carry the
//! id of the real declaration they shadow, and every record of a
//! placeholder is flagged as such whichever role it has. Synthesized closed-variant
//! members and implicit constructors carry no id at all; the consumer
//! re-synthesizes them from owner and name.

use ori_decl::{DeclId, DeclKind, DeclTree};
use tracing::debug;

use crate::error::{LinkError, LinkResult};
use crate::owner::{classify, owner_path};
use crate::record::{ReferenceRecord, ReferenceRole, ReferenceSection};
use crate::table::{DeclarationTable, UniqId};

/// Encodes reference records, registering ids as it goes.
pub struct ReferenceEncoder<'a> {
    tree: &'a DeclTree,
    table: &'a mut DeclarationTable,
}

impl<'a> ReferenceEncoder<'a> {
    pub fn new(tree: &'a DeclTree, table: &'a mut DeclarationTable) -> Self {
        Self { tree, table }
    }

    /// Record for `id`, or `None` when the declaration needs none.
    ///
    /// Declarations that are neither exported nor marked for
    /// materialization, parameters, locals, anonymous initializers,
    /// function type parameters and anything nested in a body produce
    /// `None`.
    ///
    /// # Errors
    ///
    /// Fails on malformed fake overrides and on accessors that lost their
    /// property.
    pub fn encode(&mut self, id: DeclId) -> LinkResult<Option<ReferenceRecord>> {
        let tree = self.tree;
        let decl = tree.decl(id);
        if !decl.is_exported() && !decl.always_materialize() {
            return Ok(None);
        }
        match decl.kind {
            DeclKind::AnonymousInitializer(_)
            | DeclKind::ValueParameter(_)
            | DeclKind::LocalVariable(_) => return Ok(None),
            DeclKind::TypeParameter if tree.owning_aggregate(id).is_none() => {
                return Ok(None);
            }
            _ => {}
        }
        let Some(owner) = owner_path(tree, id) else {
            return Ok(None);
        };

        let real = if decl.is_fake_override() {
            self.real_declaration(id)?
        } else {
            id
        };
        let role = classify(tree, id);
        let discoverable = match role {
            ReferenceRole::Getter | ReferenceRole::Setter | ReferenceRole::BackingField => {
                Some(self.owning_property(real)?)
            }
            role if role.omits_id() => None,
            _ => Some(real),
        };
        let uniq_id: Option<UniqId> = discoverable.map(|target| self.table.register(target));

        Ok(Some(ReferenceRecord {
            package_fq_name: owner.package_fq_name,
            class_fq_name: owner.class_fq_name,
            name: decl.name.clone(),
            uniq_id,
            role,
            fake_override: decl.is_fake_override(),
        }))
    }

    /// Like [`encode`](Self::encode), for declarations the caller knows
    /// are referenced from another module.
    ///
    /// # Errors
    ///
    /// [`LinkError::Unreferenceable`] when no record can be produced.
    pub fn encode_required(&mut self, id: DeclId) -> LinkResult<ReferenceRecord> {
        self.encode(id)?.ok_or_else(|| LinkError::Unreferenceable {
            decl: self.tree.qualified_name(id),
        })
    }

    /// Records for every declaration in `decls` that needs one, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first declaration [`encode`](Self::encode) rejects.
    pub fn encode_all<I>(&mut self, decls: I) -> LinkResult<ReferenceSection>
    where
        I: IntoIterator<Item = DeclId>,
    {
        let mut records = Vec::new();
        for id in decls {
            if let Some(record) = self.encode(id)? {
                records.push(record);
            }
        }
        debug!(records = records.len(), ids = self.table.len(), "encoded reference section");
        Ok(ReferenceSection { records })
    }

    fn real_declaration(&self, id: DeclId) -> LinkResult<DeclId> {
        let decl = self.tree.decl(id);
        if !matches!(
            decl.kind,
            DeclKind::Function(_) | DeclKind::Field(_) | DeclKind::Property(_)
        ) {
            return Err(LinkError::UnexpectedFakeOverride {
                decl: self.tree.qualified_name(id),
                kind: decl.kind.describe(),
            });
        }
        self.tree
            .resolve_fake_override(id)
            .ok_or_else(|| LinkError::UnresolvedFakeOverride {
                decl: self.tree.qualified_name(id),
            })
    }

    fn owning_property(&self, part: DeclId) -> LinkResult<DeclId> {
        let property = match &self.tree.decl(part).kind {
            DeclKind::Function(f) => f.property,
            DeclKind::Field(f) => f.property,
            _ => None,
        };
        property.ok_or_else(|| LinkError::MissingProperty {
            decl: self.tree.qualified_name(part),
        })
    }
}
