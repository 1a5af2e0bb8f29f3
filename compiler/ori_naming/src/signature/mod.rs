//! Structural signatures of member functions.
//!
//! A [`Signature`] identifies a function by shape (name, type-parameter
//! names, receiver type, parameter types and, where it matters, return
//! type) instead of by identity. Member functions are named by signature,
//! so an override and the function it overrides always share an output
//! name no matter which aggregate declares them.
//!
//! Tag layout, before sanitizing:
//!
//! ```text
//! name [_$t _T1 _T2 ...] [_r$Receiver] [_Param ...] [_ret$Return]
//! ```
//!
//! The return tag only appears for unit returns and inlined value types,
//! whose calling conventions differ from a widened supertype.

use std::fmt::{self, Write as _};

use ori_decl::{DeclId, DeclKind, DeclTree, TypeRef};

use crate::config::NamingConfig;
use crate::error::{NamingError, NamingResult};

/// Structural identity string of a function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes signatures and member-field suggestions over one tree.
#[derive(Clone, Copy)]
pub struct SignatureComputer<'a> {
    tree: &'a DeclTree,
    config: &'a NamingConfig,
}

impl<'a> SignatureComputer<'a> {
    pub fn new(tree: &'a DeclTree, config: &'a NamingConfig) -> Self {
        Self { tree, config }
    }

    /// Signature of a member function.
    ///
    /// Closed-variant helpers, external functions, annotated functions and
    /// the universal equality override map to fixed names. Anything else
    /// must be instance-dispatched; a static function here was routed to
    /// the wrong naming path and is rejected.
    pub fn function_signature(&self, id: DeclId) -> NamingResult<Signature> {
        let decl = self.tree.decl(id);
        let Some(function) = decl.as_function() else {
            return Err(self.unexpected_kind(id, "function"));
        };

        if self.tree.is_closed_variant_member(id) {
            let fixed = if function.params.is_empty() {
                &self.config.values_name
            } else {
                &self.config.value_of_name
            };
            return Ok(Signature::new(fixed.clone()));
        }

        if decl.is_static() {
            return Err(self.misrouted(id, "static functions have no member signature"));
        }
        if function.dispatch_receiver.is_none() {
            return Err(self.misrouted(id, "missing dispatch receiver"));
        }

        if self.tree.is_effectively_external(id) || decl.given_name.is_some() {
            return Ok(Signature::new(decl.output_name()));
        }

        if self.is_universal_equals(id)? {
            return Ok(Signature::new(self.config.equals_name.clone()));
        }

        let mut raw = decl.name.clone();
        if !function.type_params.is_empty() {
            raw.push_str("_$t");
            for &tp in &function.type_params {
                let _ = write!(raw, "_{}", self.tree.decl(tp).name);
            }
        }
        if let Some(receiver) = function.extension_receiver {
            let _ = write!(raw, "_r${}", self.param_type(receiver)?);
        }
        for &param in &function.params {
            let _ = write!(raw, "_{}", self.param_type(param)?);
        }
        if function.return_type.is_inlined() || function.return_type.is_unit() {
            let _ = write!(raw, "_ret${}", function.return_type);
        }

        Ok(Signature::new(self.config.grammar.sanitize(&raw)))
    }

    /// Suggested member-field name: `field_Owner`, or the declared name
    /// for external fields.
    pub fn field_signature(&self, id: DeclId) -> NamingResult<String> {
        let decl = self.tree.decl(id);
        if !matches!(decl.kind, DeclKind::Field(_)) {
            return Err(self.unexpected_kind(id, "field"));
        }
        if self.tree.is_effectively_external(id) {
            return Ok(decl.output_name().to_owned());
        }
        Ok(match self.tree.enclosing_aggregate(id) {
            Some(owner) => format!("{}_{}", decl.name, self.tree.decl(owner).name),
            None => decl.name.clone(),
        })
    }

    /// `equals(other: Any?): Boolean` without receivers or type parameters.
    fn is_universal_equals(&self, id: DeclId) -> NamingResult<bool> {
        let decl = self.tree.decl(id);
        let Some(function) = decl.as_function() else {
            return Ok(false);
        };
        if decl.name != self.config.equals_name
            || !function.type_params.is_empty()
            || function.extension_receiver.is_some()
            || !function.return_type.is_boolean()
        {
            return Ok(false);
        }
        match function.params.as_slice() {
            [only] => Ok(self.param_type(*only)?.is_nullable_any()),
            _ => Ok(false),
        }
    }

    fn param_type(&self, id: DeclId) -> NamingResult<&'a TypeRef> {
        match &self.tree.decl(id).kind {
            DeclKind::ValueParameter(param) => Ok(&param.ty),
            _ => Err(self.unexpected_kind(id, "value parameter")),
        }
    }

    fn misrouted(&self, id: DeclId, reason: &'static str) -> NamingError {
        NamingError::MisroutedSignature {
            decl: self.tree.qualified_name(id),
            reason,
        }
    }

    fn unexpected_kind(&self, id: DeclId, expected: &'static str) -> NamingError {
        NamingError::UnexpectedKind {
            decl: self.tree.qualified_name(id),
            found: self.tree.decl(id).kind.describe(),
            expected,
        }
    }
}
