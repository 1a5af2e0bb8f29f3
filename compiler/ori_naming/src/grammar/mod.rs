//! Target identifier grammars.
//!
//! Each text backend restricts identifiers to a "start" character class
//! for the first symbol and a "part" class for the rest, and reserves a
//! set of keywords. [`IdentifierGrammar::sanitize`] maps arbitrary source
//! names (including compiler-special names like `<get-x>`) into the
//! grammar one character at a time, so it is total and idempotent.

use std::fmt;

/// Replacement for characters outside the grammar, and the whole result
/// for an empty name.
pub const FALLBACK: char = '_';

const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';

const ECMASCRIPT_KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "implements", "import", "in", "instanceof", "interface", "let", "new", "null", "package",
    "private", "protected", "public", "return", "static", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool", "_Complex", "_Imaginary",
];

/// Identifier grammar of a text backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdentifierGrammar {
    /// ES5 identifiers: letters, `$` and `_` to start; any alphanumeric,
    /// ZWNJ and ZWJ may follow. Combining marks are replaced, which keeps
    /// the result valid if stricter than necessary.
    #[default]
    EcmaScript,
    /// C identifiers: ASCII letters and `_` to start; ASCII digits may
    /// follow.
    C,
}

impl IdentifierGrammar {
    /// Whether `c` may begin an identifier.
    pub fn is_start(self, c: char) -> bool {
        match self {
            Self::EcmaScript => c == '$' || c == '_' || c.is_alphabetic(),
            Self::C => c == '_' || c.is_ascii_alphabetic(),
        }
    }

    /// Whether `c` may continue an identifier.
    pub fn is_part(self, c: char) -> bool {
        match self {
            Self::EcmaScript => {
                self.is_start(c)
                    || c.is_alphanumeric()
                    || c == ZERO_WIDTH_NON_JOINER
                    || c == ZERO_WIDTH_JOINER
            }
            Self::C => c == '_' || c.is_ascii_alphanumeric(),
        }
    }

    /// Reserved words of the target language.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::EcmaScript => ECMASCRIPT_KEYWORDS,
            Self::C => C_KEYWORDS,
        }
    }

    pub fn is_keyword(self, name: &str) -> bool {
        self.keywords().contains(&name)
    }

    /// Whether member (property/field) names must also avoid keywords.
    ///
    /// ES5 allows keywords as property names; C struct members do not.
    pub fn reserves_member_keywords(self) -> bool {
        matches!(self, Self::C)
    }

    /// Whether `name` already satisfies the grammar's character classes.
    pub fn is_valid(self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => self.is_start(first) && chars.all(|c| self.is_part(c)),
            None => false,
        }
    }

    /// Map `name` into the grammar.
    ///
    /// An invalid first character becomes [`FALLBACK`]; every other
    /// invalid character likewise. The empty name becomes `"_"`. Valid
    /// identifiers come back unchanged.
    pub fn sanitize(self, name: &str) -> String {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return FALLBACK.to_string();
        };

        let mut out = String::with_capacity(name.len());
        out.push(if self.is_start(first) { first } else { FALLBACK });
        out.extend(chars.map(|c| if self.is_part(c) { c } else { FALLBACK }));
        out
    }
}

impl fmt::Display for IdentifierGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EcmaScript => write!(f, "ECMAScript"),
            Self::C => write!(f, "C"),
        }
    }
}

#[cfg(test)]
mod tests;
