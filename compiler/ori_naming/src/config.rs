//! Naming configuration per text backend.

use ori_decl::{VALUES_NAME, VALUE_OF_NAME};

use crate::grammar::IdentifierGrammar;

/// Backend-specific naming policy.
///
/// The defaults target ECMAScript output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    /// Identifier grammar all generated names must satisfy.
    pub grammar: IdentifierGrammar,
    /// Fixed token every implicit receiver (`this`) is emitted as.
    pub implicit_receiver: String,
    /// Fixed member name for the inherited universal equality override.
    pub equals_name: String,
    /// Fixed member name for the closed-variant "all cases" helper.
    pub values_name: String,
    /// Fixed member name for the closed-variant "case by name" helper.
    pub value_of_name: String,
    /// Signature prefix of synthetic call operators. Member lookups for
    /// these fall back to the computed signature.
    pub call_operator_marker: String,
}

impl NamingConfig {
    /// Policy for ECMAScript output.
    pub fn ecmascript() -> Self {
        Self {
            grammar: IdentifierGrammar::EcmaScript,
            implicit_receiver: "$this".to_owned(),
            equals_name: "equals".to_owned(),
            values_name: VALUES_NAME.to_owned(),
            value_of_name: VALUE_OF_NAME.to_owned(),
            call_operator_marker: "invoke".to_owned(),
        }
    }

    /// Policy for C output.
    pub fn c() -> Self {
        Self {
            grammar: IdentifierGrammar::C,
            implicit_receiver: "self".to_owned(),
            ..Self::ecmascript()
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self::ecmascript()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ecmascript() {
        assert_eq!(NamingConfig::default(), NamingConfig::ecmascript());
    }

    #[test]
    fn fixed_tokens_are_valid_in_their_grammar() {
        for config in [NamingConfig::ecmascript(), NamingConfig::c()] {
            let g = config.grammar;
            assert!(g.is_valid(&config.implicit_receiver));
            assert!(!g.is_keyword(&config.implicit_receiver));
            assert!(g.is_valid(&config.equals_name));
            assert!(g.is_valid(&config.values_name));
            assert!(g.is_valid(&config.value_of_name));
        }
    }
}
