//! Owner paths and role classification, shared by both ends of a
//! reference.

use ori_decl::{AccessorKind, AggregateKind, DeclId, DeclKind, DeclTree};

use crate::record::ReferenceRole;

/// Package and aggregate path a reference is resolved against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct OwnerPath {
    pub package_fq_name: String,
    pub class_fq_name: String,
}

/// Owner of a declaration: its package plus the chain of enclosing
/// aggregates. Properties are looked through, since accessors and backing
/// fields belong to the property's owner.
///
/// `None` when anything else encloses the declaration (a function body,
/// an initializer): such declarations are not reachable from outside.
pub(crate) fn owner_path(tree: &DeclTree, id: DeclId) -> Option<OwnerPath> {
    let mut classes = Vec::new();
    for ancestor in tree.ancestors(id) {
        let decl = tree.decl(ancestor);
        match decl.kind {
            DeclKind::Property(_) => {}
            DeclKind::Aggregate(_) => classes.push(decl.name.as_str()),
            _ => return None,
        }
    }
    classes.reverse();
    Some(OwnerPath {
        package_fq_name: tree.package(tree.package_of(id)).fq_name.clone(),
        class_fq_name: classes.join("."),
    })
}

/// Role of a declaration; the first matching rule wins.
pub(crate) fn classify(tree: &DeclTree, id: DeclId) -> ReferenceRole {
    let decl = tree.decl(id);
    let owner_kind = tree.owning_aggregate(id).map(|(_, agg)| agg.kind);
    match &decl.kind {
        DeclKind::Function(f) if f.accessor == Some(AccessorKind::Getter) => ReferenceRole::Getter,
        DeclKind::Function(f) if f.accessor == Some(AccessorKind::Setter) => ReferenceRole::Setter,
        DeclKind::Field(f) if f.property.is_some() => ReferenceRole::BackingField,
        DeclKind::Constructor(_)
            if matches!(owner_kind, Some(AggregateKind::Object | AggregateKind::EnumEntry)) =>
        {
            ReferenceRole::DefaultConstructor
        }
        DeclKind::Aggregate(agg) if agg.kind == AggregateKind::EnumEntry => {
            ReferenceRole::ClosedVariantEntry
        }
        DeclKind::Function(_) if tree.is_closed_variant_member(id) => {
            ReferenceRole::ClosedVariantMember
        }
        DeclKind::TypeParameter if owner_kind.is_some() => ReferenceRole::TypeParameter,
        _ if decl.is_fake_override() => ReferenceRole::FakeOverride,
        _ => ReferenceRole::Plain,
    }
}
