//! Property-based tests for identifier sanitizing and fresh-name
//! allocation.
//!
//! Checks that hold for arbitrary input:
//! 1. Totality: sanitize always yields a valid identifier
//! 2. Idempotence: sanitizing twice changes nothing
//! 3. No collision: N declarations sharing a suggestion get `name`,
//!    `name_0`, `name_1`, ... in first-seen order

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use ori_naming::{IdentifierGrammar, ScopeArena};
use proptest::prelude::*;

fn grammar_strategy() -> impl Strategy<Value = IdentifierGrammar> {
    prop_oneof![Just(IdentifierGrammar::EcmaScript), Just(IdentifierGrammar::C)]
}

/// Valid identifiers in both grammars.
fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,12}").expect("valid regex")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_sanitize_is_total(grammar in grammar_strategy(), raw in any::<String>()) {
        let sanitized = grammar.sanitize(&raw);
        prop_assert!(grammar.is_valid(&sanitized), "{:?} -> {:?}", raw, sanitized);
    }

    #[test]
    fn prop_sanitize_is_idempotent(grammar in grammar_strategy(), raw in any::<String>()) {
        let once = grammar.sanitize(&raw);
        prop_assert_eq!(grammar.sanitize(&once), once);
    }

    #[test]
    fn prop_sanitize_keeps_valid_identifiers(grammar in grammar_strategy(), ident in identifier_strategy()) {
        prop_assert_eq!(grammar.sanitize(&ident), ident);
    }

    #[test]
    fn prop_sanitize_preserves_length_in_chars(grammar in grammar_strategy(), raw in ".{1,24}") {
        prop_assert_eq!(grammar.sanitize(&raw).chars().count(), raw.chars().count());
    }

    #[test]
    fn prop_fresh_names_follow_first_seen_order(base in identifier_strategy(), count in 1usize..40) {
        let mut scopes = ScopeArena::new(IdentifierGrammar::C);
        let root = scopes.root(Vec::<String>::new());

        let names: Vec<String> = (0..count)
            .map(|key| scopes.declare_fresh(root, key, &base).unwrap())
            .collect();

        prop_assert_eq!(&names[0], &base);
        for (i, name) in names.iter().enumerate().skip(1) {
            prop_assert_eq!(name, &format!("{}_{}", base, i - 1));
        }
        for (key, name) in names.iter().enumerate() {
            prop_assert_eq!(scopes.lookup(root, &key), Some(name.as_str()));
        }
    }
}
