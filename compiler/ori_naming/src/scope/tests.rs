#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

fn arena() -> ScopeArena<&'static str> {
    ScopeArena::new(IdentifierGrammar::EcmaScript)
}

#[test]
fn fresh_names_try_numbered_suffixes() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    assert_eq!(a.declare_fresh(root, "a", "value").unwrap(), "value");
    assert_eq!(a.declare_fresh(root, "b", "value").unwrap(), "value_0");
    assert_eq!(a.declare_fresh(root, "c", "value").unwrap(), "value_1");
}

#[test]
fn fresh_name_skips_stable_gaps() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    a.declare_stable(root, "x", "value_0").unwrap();
    assert_eq!(a.declare_fresh(root, "a", "value").unwrap(), "value");
    assert_eq!(a.declare_fresh(root, "b", "value").unwrap(), "value_1");
    assert_eq!(a.declare_fresh(root, "c", "value").unwrap(), "value_2");
}

#[test]
fn fresh_name_is_sanitized_before_probing() {
    let mut a = arena();
    let root = a.root(["if"]);
    assert_eq!(a.declare_fresh(root, "a", "<get-x>").unwrap(), "_get_x_");
    assert_eq!(a.declare_fresh(root, "b", "if").unwrap(), "if_0");
    assert_eq!(a.declare_fresh(root, "c", "").unwrap(), "_");
}

#[test]
fn fresh_declaration_is_idempotent_per_key() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    let first = a.declare_fresh(root, "a", "x").unwrap();
    let again = a.declare_fresh(root, "a", "y").unwrap();
    assert_eq!(first, again);
    assert_eq!(a.entries(root).count(), 1);
}

#[test]
fn child_avoids_ancestor_names() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    a.declare_stable(root, "foo", "Foo").unwrap();
    a.seal(root);

    let child = a.child(root);
    assert_eq!(a.declare_fresh(child, "local", "Foo").unwrap(), "Foo_0");
    assert_eq!(a.lookup(child, &"local"), Some("Foo_0"));
    assert_eq!(a.lookup(child, &"foo"), None);
    assert_eq!(a.lookup(root, &"foo"), Some("Foo"));
}

#[test]
fn siblings_may_reuse_names() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    a.seal(root);
    let left = a.child(root);
    let right = a.child(root);
    assert_eq!(a.declare_fresh(left, "l", "tmp").unwrap(), "tmp");
    assert_eq!(a.declare_fresh(right, "r", "tmp").unwrap(), "tmp");
}

#[test]
fn sealed_scope_rejects_declarations() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    a.declare_fresh(root, "a", "x").unwrap();
    a.seal(root);
    a.seal(root);
    assert!(a.is_sealed(root));
    assert_eq!(a.declare_fresh(root, "a", "x"), Err(ScopeError::Sealed));
    assert_eq!(a.declare_stable(root, "b", "y"), Err(ScopeError::Sealed));
}

#[test]
fn child_of_unsealed_parent_rejects_declarations() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    let child = a.child(root);
    assert_eq!(
        a.declare_fresh(child, "a", "x"),
        Err(ScopeError::ParentNotSealed)
    );
    a.seal(root);
    assert_eq!(a.declare_fresh(child, "a", "x").unwrap(), "x");
}

#[test]
fn stable_conflict_is_rejected() {
    let mut a = arena();
    let root = a.root(["this"]);
    a.declare_stable(root, "a", "Foo").unwrap();
    assert_eq!(
        a.declare_stable(root, "b", "Foo"),
        Err(ScopeError::AlreadyReserved {
            name: "Foo".to_owned()
        })
    );
    assert_eq!(
        a.declare_stable(root, "c", "this"),
        Err(ScopeError::AlreadyReserved {
            name: "this".to_owned()
        })
    );
    // Same key, same name is fine; a different name is not.
    a.declare_stable(root, "a", "Foo").unwrap();
    assert_eq!(
        a.declare_stable(root, "a", "Bar"),
        Err(ScopeError::Reassigned {
            existing: "Foo".to_owned(),
            requested: "Bar".to_owned()
        })
    );
}

#[test]
fn shared_names_bind_many_keys() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    a.declare_shared(root, "a", "size").unwrap();
    a.declare_shared(root, "b", "size").unwrap();
    assert_eq!(a.lookup(root, &"a"), Some("size"));
    assert_eq!(a.lookup(root, &"b"), Some("size"));
    assert_eq!(a.declare_fresh(root, "c", "size").unwrap(), "size_0");
}

#[test]
fn fixed_names_need_a_reservation() {
    let mut a = arena();
    let root = a.root(["$this"]);
    a.seal(root);
    let first = a.child(root);
    let second = a.child(root);
    a.declare_fixed(first, "recv", "$this").unwrap();
    a.declare_fixed(second, "recv", "$this").unwrap();
    assert_eq!(a.lookup(second, &"recv"), Some("$this"));
    assert_eq!(
        a.declare_fixed(first, "other", "self"),
        Err(ScopeError::NotReserved {
            name: "self".to_owned()
        })
    );
}

#[test]
fn entries_follow_declaration_order() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    a.declare_fresh(root, "z", "z").unwrap();
    a.declare_fresh(root, "a", "a").unwrap();
    a.declare_stable(root, "m", "m").unwrap();
    let keys: Vec<_> = a.entries(root).map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn parent_links_are_recorded() {
    let mut a = arena();
    let root = a.root(Vec::<String>::new());
    let child = a.child(root);
    assert_eq!(a.parent(root), None);
    assert_eq!(a.parent(child), Some(root));
    assert_eq!(a.len(), 2);
    assert!(!a.is_empty());
}
