//! Structural type references.
//!
//! Type inference has already run; declarations only carry the resolved
//! shape of their types. The naming pass renders these into signature
//! tags, so [`Display`](fmt::Display) output is part of the contract:
//! two types that render the same are the same for overload naming.

use std::fmt;

/// A resolved type as seen by declarations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub repr: TypeRepr,
    pub nullable: bool,
}

/// Shape of a [`TypeRef`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRepr {
    /// The unit type (void-like: no runtime value).
    Unit,
    /// The bottom type.
    Nothing,
    /// The universal supertype.
    Any,
    /// A named aggregate type, possibly generic.
    Named {
        /// Fully qualified name, e.g. `ori.Int`.
        path: String,
        args: Vec<TypeRef>,
        /// Whether values of this type use an unboxed, specially-inlined
        /// representation.
        inline: bool,
    },
    /// Reference to a type parameter in scope.
    Param(String),
}

/// Qualified name of the builtin boolean type.
const BOOLEAN_PATH: &str = "Boolean";

impl TypeRef {
    fn non_null(repr: TypeRepr) -> Self {
        Self {
            repr,
            nullable: false,
        }
    }

    pub fn unit() -> Self {
        Self::non_null(TypeRepr::Unit)
    }

    pub fn nothing() -> Self {
        Self::non_null(TypeRepr::Nothing)
    }

    pub fn any() -> Self {
        Self::non_null(TypeRepr::Any)
    }

    pub fn boolean() -> Self {
        Self::named(BOOLEAN_PATH)
    }

    /// A non-generic named type.
    pub fn named(path: impl Into<String>) -> Self {
        Self::generic(path, Vec::new())
    }

    /// A named type applied to type arguments.
    pub fn generic(path: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::non_null(TypeRepr::Named {
            path: path.into(),
            args,
            inline: false,
        })
    }

    /// A named type with an inlined (unboxed) representation.
    pub fn inline_class(path: impl Into<String>) -> Self {
        Self::non_null(TypeRepr::Named {
            path: path.into(),
            args: Vec::new(),
            inline: true,
        })
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::non_null(TypeRepr::Param(name.into()))
    }

    /// The nullable variant of this type.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Non-null unit.
    pub fn is_unit(&self) -> bool {
        !self.nullable && self.repr == TypeRepr::Unit
    }

    /// Values of this type use the inlined representation.
    ///
    /// A nullable inline type is boxed, so only the non-null form counts.
    pub fn is_inlined(&self) -> bool {
        !self.nullable && matches!(self.repr, TypeRepr::Named { inline: true, .. })
    }

    /// Nullable universal supertype (`Any?`).
    pub fn is_nullable_any(&self) -> bool {
        self.nullable && self.repr == TypeRepr::Any
    }

    pub fn is_boolean(&self) -> bool {
        !self.nullable
            && matches!(&self.repr, TypeRepr::Named { path, args, .. } if path == BOOLEAN_PATH && args.is_empty())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            TypeRepr::Unit => f.write_str("Unit")?,
            TypeRepr::Nothing => f.write_str("Nothing")?,
            TypeRepr::Any => f.write_str("Any")?,
            TypeRepr::Param(name) => f.write_str(name)?,
            TypeRepr::Named { path, args, .. } => {
                f.write_str(path)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
            }
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_renders_arguments_and_nullability() {
        let ty = TypeRef::generic(
            "ori.Map",
            vec![TypeRef::named("ori.String"), TypeRef::param("T").nullable()],
        );
        assert_eq!(ty.to_string(), "ori.Map<ori.String,T?>");
        assert_eq!(TypeRef::any().nullable().to_string(), "Any?");
        assert_eq!(TypeRef::unit().to_string(), "Unit");
    }

    #[test]
    fn inlined_only_when_non_null() {
        let ty = TypeRef::inline_class("ori.UInt");
        assert!(ty.is_inlined());
        assert!(!ty.clone().nullable().is_inlined());
        assert!(!TypeRef::named("ori.UInt").is_inlined());
    }

    #[test]
    fn unit_and_boolean_predicates() {
        assert!(TypeRef::unit().is_unit());
        assert!(!TypeRef::unit().nullable().is_unit());
        assert!(TypeRef::boolean().is_boolean());
        assert!(!TypeRef::boolean().nullable().is_boolean());
        assert!(TypeRef::any().nullable().is_nullable_any());
        assert!(!TypeRef::any().is_nullable_any());
    }
}
