use pretty_assertions::assert_eq;

use super::*;

#[test]
fn valid_identifier_is_unchanged() {
    for grammar in [IdentifierGrammar::EcmaScript, IdentifierGrammar::C] {
        assert_eq!(grammar.sanitize("value_1"), "value_1");
        assert_eq!(grammar.sanitize("_x"), "_x");
    }
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("$this"), "$this");
}

#[test]
fn empty_name_maps_to_fallback() {
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize(""), "_");
    assert_eq!(IdentifierGrammar::C.sanitize(""), "_");
}

#[test]
fn leading_digit_replaces_only_first_character() {
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("1abc"), "_abc");
    assert_eq!(IdentifierGrammar::C.sanitize("9lives"), "_lives");
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("a1"), "a1");
}

#[test]
fn special_names_are_flattened() {
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("<get-size>"), "_get_size_");
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("ori.Map<K,V>?"), "ori_Map_K_V__");
}

#[test]
fn dollar_is_only_valid_in_ecmascript() {
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("f_$t_T"), "f_$t_T");
    assert_eq!(IdentifierGrammar::C.sanitize("f_$t_T"), "f__t_T");
}

#[test]
fn non_ascii_letters_depend_on_grammar() {
    assert_eq!(IdentifierGrammar::EcmaScript.sanitize("größe"), "größe");
    assert_eq!(IdentifierGrammar::C.sanitize("größe"), "gr__e");
}

#[test]
fn sanitize_is_idempotent_on_samples() {
    for raw in ["", "1", "<init>", "a b", "ok", "$", "Ünïcode", "x-y-z"] {
        for grammar in [IdentifierGrammar::EcmaScript, IdentifierGrammar::C] {
            let once = grammar.sanitize(raw);
            assert!(grammar.is_valid(&once), "{grammar}: {once:?} invalid");
            assert_eq!(grammar.sanitize(&once), once);
        }
    }
}

#[test]
fn keywords_per_grammar() {
    assert!(IdentifierGrammar::EcmaScript.is_keyword("function"));
    assert!(!IdentifierGrammar::C.is_keyword("function"));
    assert!(IdentifierGrammar::C.is_keyword("typedef"));
    assert!(!IdentifierGrammar::EcmaScript.reserves_member_keywords());
    assert!(IdentifierGrammar::C.reserves_member_keywords());
}
