//! Consumer-side resolution of reference records.
//!
//! A record is matched by owner path, simple name and role. The id, when
//! present, is tried first: it points at the declaration itself, or at
//! the property for accessor and backing-field roles. A fast-path hit is
//! only accepted if it agrees with the record's path, name, role and
//! fake-override flag; anything else falls back to the path index.
//!
//! A fake-override record resolves to the local placeholder when the tree
//! has one. Otherwise it resolves to nothing and the consumer
//! re-synthesizes the placeholder from the real declaration, reachable
//! through the table by the record's id.

use ori_decl::{DeclId, DeclKind, DeclTree};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::owner::{classify, owner_path, OwnerPath};
use crate::record::{ReferenceRecord, ReferenceRole};
use crate::table::DeclarationTable;

/// Resolves [`ReferenceRecord`]s against a declaration tree.
pub struct ReferenceResolver<'a> {
    tree: &'a DeclTree,
    table: &'a DeclarationTable,
    by_path: FxHashMap<(OwnerPath, String), Vec<DeclId>>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(tree: &'a DeclTree, table: &'a DeclarationTable) -> Self {
        let mut by_path: FxHashMap<(OwnerPath, String), Vec<DeclId>> = FxHashMap::default();
        for id in tree.decl_ids() {
            if let Some(owner) = owner_path(tree, id) {
                by_path
                    .entry((owner, tree.decl(id).name.clone()))
                    .or_default()
                    .push(id);
            }
        }
        Self {
            tree,
            table,
            by_path,
        }
    }

    /// Declaration a record refers to, if this tree has it.
    pub fn resolve(&self, record: &ReferenceRecord) -> Option<DeclId> {
        if let Some(id) = self.fast_path(record) {
            return Some(id);
        }
        let key = (
            OwnerPath {
                package_fq_name: record.package_fq_name.clone(),
                class_fq_name: record.class_fq_name.clone(),
            },
            record.name.clone(),
        );
        let found = self
            .by_path
            .get(&key)?
            .iter()
            .copied()
            .find(|&id| self.same_shape(record, id));
        trace!(name = %record.name, ?found, "resolved by path");
        found
    }

    fn fast_path(&self, record: &ReferenceRecord) -> Option<DeclId> {
        let target = self.table.decl_of(record.uniq_id?)?;
        let candidate = match record.role {
            ReferenceRole::Getter | ReferenceRole::Setter | ReferenceRole::BackingField => {
                let DeclKind::Property(property) = &self.tree.decl(target).kind else {
                    return None;
                };
                let part = match record.role {
                    ReferenceRole::Getter => property.getter,
                    ReferenceRole::Setter => property.setter,
                    _ => property.backing_field,
                };
                part?
            }
            _ => target,
        };
        self.matches(record, candidate).then_some(candidate)
    }

    fn matches(&self, record: &ReferenceRecord, id: DeclId) -> bool {
        self.tree.decl(id).name == record.name
            && self.same_shape(record, id)
            && owner_path(self.tree, id).is_some_and(|owner| {
                owner.package_fq_name == record.package_fq_name
                    && owner.class_fq_name == record.class_fq_name
            })
    }

    fn same_shape(&self, record: &ReferenceRecord, id: DeclId) -> bool {
        classify(self.tree, id) == record.role
            && self.tree.decl(id).is_fake_override() == record.fake_override
    }
}

#[cfg(test)]
mod tests;
