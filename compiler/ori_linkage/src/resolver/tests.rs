#![allow(clippy::unwrap_used, clippy::expect_used)]

use ori_decl::{AggregateKind, DeclFlags, Site, TreeBuilder, TypeRef};
use pretty_assertions::assert_eq;

use super::*;
use crate::encoder::ReferenceEncoder;
use crate::table::UniqId;

fn record(class: &str, name: &str, uniq_id: Option<UniqId>, role: ReferenceRole) -> ReferenceRecord {
    ReferenceRecord {
        package_fq_name: "lib".to_owned(),
        class_fq_name: class.to_owned(),
        name: name.to_owned(),
        uniq_id,
        role,
        fake_override: false,
    }
}

#[test]
fn id_fast_path_finds_accessors_through_the_property() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let class = b.aggregate(Site::Package(pkg), "Box", AggregateKind::Class);
    let size = b.property(Site::Member(class), "size", TypeRef::named("Int"), true);
    let tree = b.finish();
    let parts = tree.decl(size).as_property().unwrap().clone();
    let mut table = DeclarationTable::new();
    let id = table.register(size);

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(
        resolver.resolve(&record("Box", "<set-size>", Some(id), ReferenceRole::Setter)),
        parts.setter
    );
    assert_eq!(
        resolver.resolve(&record("Box", "size", Some(id), ReferenceRole::BackingField)),
        parts.backing_field
    );
}

#[test]
fn records_without_ids_resolve_by_path() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let color = b.aggregate(Site::Package(pkg), "Color", AggregateKind::EnumClass);
    let red = b.aggregate(Site::Member(color), "RED", AggregateKind::EnumEntry);
    let values = b.static_function(Site::Member(color), "values", TypeRef::any());
    let tree = b.finish();
    let table = DeclarationTable::new();

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(
        resolver.resolve(&record("Color", "RED", None, ReferenceRole::ClosedVariantEntry)),
        Some(red)
    );
    assert_eq!(
        resolver.resolve(&record("Color", "values", None, ReferenceRole::ClosedVariantMember)),
        Some(values)
    );
}

#[test]
fn stale_id_falls_back_to_the_path() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let first = b.function(Site::Package(pkg), "first", TypeRef::unit());
    let second = b.function(Site::Package(pkg), "second", TypeRef::unit());
    let tree = b.finish();
    let mut table = DeclarationTable::new();
    let id = table.register(first);

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(
        resolver.resolve(&record("", "second", Some(id), ReferenceRole::Plain)),
        Some(second)
    );
}

#[test]
fn role_disambiguates_same_named_declarations() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let class = b.aggregate(Site::Package(pkg), "Box", AggregateKind::Class);
    let property = b.property(Site::Member(class), "size", TypeRef::named("Int"), false);
    let tree = b.finish();
    let field = tree.decl(property).as_property().unwrap().backing_field;
    let table = DeclarationTable::new();

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(
        resolver.resolve(&record("Box", "size", None, ReferenceRole::Plain)),
        Some(property)
    );
    assert_eq!(
        resolver.resolve(&record("Box", "size", None, ReferenceRole::BackingField)),
        field
    );
}

#[test]
fn unknown_owner_resolves_to_nothing() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    b.function(Site::Package(pkg), "main", TypeRef::unit());
    let tree = b.finish();
    let table = DeclarationTable::new();

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(
        resolver.resolve(&record("Missing", "main", None, ReferenceRole::Plain)),
        None
    );
}

#[test]
fn fake_override_resolves_to_the_placeholder() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let base = b.aggregate(Site::Package(pkg), "Base", AggregateKind::Class);
    let real = b.function(Site::Member(base), "run", TypeRef::unit());
    let derived = b.aggregate(Site::Package(pkg), "Derived", AggregateKind::Class);
    let fake = b.fake_override(derived, real);
    b.set_flags(fake, DeclFlags::EXPORTED);
    let tree = b.finish();
    let mut table = DeclarationTable::new();
    let encoded = ReferenceEncoder::new(&tree, &mut table)
        .encode_required(fake)
        .unwrap();

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(resolver.resolve(&encoded), Some(fake));
}

#[test]
fn fake_override_accessor_resolves_to_the_placeholder_accessor() {
    let mut b = TreeBuilder::new();
    let pkg = b.package("lib");
    let base = b.aggregate(Site::Package(pkg), "Base", AggregateKind::Class);
    let real = b.property(Site::Member(base), "size", TypeRef::named("Int"), false);
    let derived = b.aggregate(Site::Package(pkg), "Derived", AggregateKind::Class);
    let fake = b.fake_override(derived, real);
    let real_getter = b.tree().decl(real).as_property().unwrap().getter;
    let fake_getter = b.tree().decl(fake).as_property().unwrap().getter.unwrap();
    b.set_flags(fake_getter, DeclFlags::EXPORTED);
    let tree = b.finish();
    let mut table = DeclarationTable::new();
    let encoded = ReferenceEncoder::new(&tree, &mut table)
        .encode_required(fake_getter)
        .unwrap();

    let resolver = ReferenceResolver::new(&tree, &table);
    assert_eq!(resolver.resolve(&encoded), Some(fake_getter));

    // Same path and name, but a literal getter: the placeholder must not
    // answer for it.
    let literal = ReferenceRecord {
        fake_override: false,
        ..encoded
    };
    assert_ne!(resolver.resolve(&literal), real_getter);
    assert_eq!(resolver.resolve(&literal), None);
}
