//! Producer and consumer sides of a module artifact.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use ori_decl::{AggregateKind, DeclFlags, DeclId, DeclTree, Site, TreeBuilder, TypeRef};
use ori_linkage::{
    DeclarationTable, ReferenceEncoder, ReferenceResolver, ReferenceSection, TableSnapshot,
};
use pretty_assertions::assert_eq;

/// A small library: a generic class with a property and a method, a
/// closed-variant container and a top-level function.
fn library() -> (DeclTree, Vec<DeclId>) {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib.shapes");
    let shape = b.aggregate(Site::Package(pkg), "Shape", AggregateKind::Class);
    let t = b.type_param(shape, "T");
    let area = b.function(Site::Member(shape), "area", TypeRef::named("Double"));
    let sides = b.property(Site::Member(shape), "sides", TypeRef::named("Int"), false);
    let getter = b.tree().decl(sides).as_property().unwrap().getter.unwrap();
    let kind = b.aggregate(Site::Package(pkg), "Kind", AggregateKind::EnumClass);
    let square = b.aggregate(Site::Member(kind), "SQUARE", AggregateKind::EnumEntry);
    let make = b.function(Site::Package(pkg), "make", TypeRef::named("Shape"));
    let helper = b.local(Site::Body(make), "tmp", TypeRef::named("Int"));

    let used = vec![shape, t, area, getter, square, make, helper];
    for &id in &used {
        b.set_flags(id, DeclFlags::EXPORTED);
    }
    (b.finish(), used)
}

#[test]
fn every_record_resolves_to_its_declaration() {
    let (tree, used) = library();
    let mut table = DeclarationTable::new();
    let section = ReferenceEncoder::new(&tree, &mut table)
        .encode_all(used.iter().copied())
        .unwrap();
    // The local has no record.
    assert_eq!(section.len(), used.len() - 1);

    let bytes = section.to_bytes().unwrap();
    let section = ReferenceSection::from_bytes(&bytes).unwrap();
    let resolver = ReferenceResolver::new(&tree, &table);
    let resolved: Vec<_> = section
        .records
        .iter()
        .map(|record| resolver.resolve(record).unwrap())
        .collect();
    assert_eq!(resolved, used[..used.len() - 1].to_vec());
}

#[test]
fn ids_survive_a_rebuild() {
    let (tree, used) = library();
    let mut table = DeclarationTable::new();
    let first = ReferenceEncoder::new(&tree, &mut table)
        .encode_all(used.iter().copied())
        .unwrap();
    let saved = table.snapshot(&tree).to_bytes().unwrap();

    let mut restored =
        DeclarationTable::from_snapshot(&tree, TableSnapshot::from_bytes(&saved).unwrap());
    let second = ReferenceEncoder::new(&tree, &mut restored)
        .encode_all(used.iter().rev().copied())
        .unwrap();
    let mut reversed = second.records;
    reversed.reverse();
    assert_eq!(reversed, first.records);
}

#[test]
fn consumer_without_the_table_resolves_by_path() {
    let (tree, used) = library();
    let mut table = DeclarationTable::new();
    let section = ReferenceEncoder::new(&tree, &mut table)
        .encode_all(used.iter().copied())
        .unwrap();

    let empty = DeclarationTable::new();
    let resolver = ReferenceResolver::new(&tree, &empty);
    for (record, &expected) in section.records.iter().zip(&used) {
        assert_eq!(resolver.resolve(record), Some(expected), "{record:?}");
    }
}
