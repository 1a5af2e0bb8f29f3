#![allow(clippy::unwrap_used, clippy::expect_used)]

use ori_decl::{AggregateKind, PackageId, Site, TreeBuilder, TypeRef};
use pretty_assertions::assert_eq;

use super::*;

/// `lib` with top-level functions named by `names`, in order.
fn functions(names: &[&str]) -> (DeclTree, Vec<DeclId>) {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let ids = names
        .iter()
        .map(|name| b.function(Site::Package(pkg), name, TypeRef::unit()))
        .collect();
    (b.finish(), ids)
}

fn rebuild(table: &DeclarationTable, old: &DeclTree, new: &DeclTree) -> DeclarationTable {
    let bytes = table.snapshot(old).to_bytes().unwrap();
    DeclarationTable::from_snapshot(new, TableSnapshot::from_bytes(&bytes).unwrap())
}

#[test]
fn registration_is_memoized() {
    let mut table = DeclarationTable::new();
    let a = table.register(DeclId::new(7));
    let b = table.register(DeclId::new(3));
    assert_eq!(table.register(DeclId::new(7)), a);
    assert_eq!(a, UniqId::new(0));
    assert_eq!(b, UniqId::new(1));
    assert_eq!(table.len(), 2);
}

#[test]
fn reverse_lookup_finds_registered_declarations() {
    let mut table = DeclarationTable::new();
    let id = table.register(DeclId::new(5));
    assert_eq!(table.decl_of(id), Some(DeclId::new(5)));
    assert_eq!(table.get(DeclId::new(5)), Some(id));
    assert_eq!(table.get(DeclId::new(6)), None);
    assert_eq!(table.decl_of(UniqId::new(99)), None);
}

#[test]
fn unchanged_tree_keeps_every_id() {
    let (tree, ids) = functions(&["a", "b"]);
    let mut first = DeclarationTable::new();
    first.register(ids[1]);
    first.register(ids[0]);

    let mut second = rebuild(&first, &tree, &tree);
    assert_eq!(second.register(ids[0]), UniqId::new(1));
    assert_eq!(second.register(ids[1]), UniqId::new(0));
    assert_eq!(second.len(), 2);
}

#[test]
fn inserted_declaration_does_not_shift_ids() {
    let (old, old_ids) = functions(&["a", "b"]);
    let mut first = DeclarationTable::new();
    let a = first.register(old_ids[0]);
    let b = first.register(old_ids[1]);

    let (new, new_ids) = functions(&["z", "a", "b"]);
    let mut second = rebuild(&first, &old, &new);
    assert_eq!(second.register(new_ids[1]), a);
    assert_eq!(second.register(new_ids[2]), b);
    assert_eq!(second.register(new_ids[0]), UniqId::new(2));
}

#[test]
fn removed_declaration_retires_its_id() {
    let (old, old_ids) = functions(&["a", "b"]);
    let mut first = DeclarationTable::new();
    first.register(old_ids[0]);
    first.register(old_ids[1]);

    let (mid, mid_ids) = functions(&["b", "c"]);
    let mut second = rebuild(&first, &old, &mid);
    assert_eq!(second.decl_of(UniqId::new(0)), None);
    assert_eq!(second.register(mid_ids[1]), UniqId::new(2));

    // The retired id comes back with its declaration.
    let (last, last_ids) = functions(&["a", "b", "c"]);
    let third = rebuild(&second, &mid, &last);
    assert_eq!(third.get(last_ids[0]), Some(UniqId::new(0)));
    assert_eq!(third.get(last_ids[2]), Some(UniqId::new(2)));
}

#[test]
fn overloads_have_distinct_keys() {
    let mut b = TreeBuilder::new();
    let pkg: PackageId = b.package("lib");
    let class = b.aggregate(Site::Package(pkg), "Box", AggregateKind::Class);
    let by_int = b.function(Site::Member(class), "put", TypeRef::unit());
    b.param(by_int, "x", TypeRef::named("Int"));
    let by_text = b.function(Site::Member(class), "put", TypeRef::unit());
    b.param(by_text, "x", TypeRef::named("String"));
    let tree = b.finish();

    let int_key = DeclKey::of(&tree, by_int);
    assert_eq!(int_key.as_str(), "lib/Box#aggregate/put#function(Int)");
    assert_ne!(int_key, DeclKey::of(&tree, by_text));
}

#[test]
fn restored_table_never_reuses_ids() {
    let (tree, ids) = functions(&["a", "b"]);
    let snapshot = TableSnapshot {
        next: 0,
        entries: vec![(DeclKey::of(&tree, ids[0]), UniqId::new(10))],
    };
    let mut table = DeclarationTable::from_snapshot(&tree, snapshot);
    assert_eq!(table.register(ids[0]), UniqId::new(10));
    assert_eq!(table.register(ids[1]), UniqId::new(11));
}

#[test]
fn truncated_snapshot_is_a_codec_error() {
    let (tree, ids) = functions(&["a"]);
    let mut table = DeclarationTable::new();
    table.register(ids[0]);
    let bytes = table.snapshot(&tree).to_bytes().unwrap();
    let err = TableSnapshot::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, crate::error::LinkError::Codec(_)));
}

#[test]
fn uniq_id_debug_is_compact() {
    assert_eq!(format!("{:?}", UniqId::new(42)), "#42");
}
