//! Output identifiers for Ori text backends.
//!
//! Backends that emit source text (ECMAScript, C) need every declaration
//! of a compilation unit to carry a collision-free identifier that obeys
//! the target grammar. [`NameTables::new`] computes all of them in two
//! phases:
//!
//! 1. **Global**: top-level declarations, external ones first with their
//!    runtime names, then everything else with fresh names. The global
//!    scope is sealed.
//! 2. **Members and locals**: member functions are named by structural
//!    [`Signature`] so overrides line up across aggregates; member fields
//!    get `field_Owner` names; every body is walked in a local scope
//!    chained to the sealed global scope.
//!
//! Emission then queries [`NameTables::name_of`],
//! [`NameTables::member_name_of`] and [`NameTables::loop_label_of`].
//!
//! # Determinism
//!
//! Declarations are visited in tree order and scopes record assignments
//! in insertion order, so the same tree always yields the same names.

mod config;
mod error;
mod grammar;
mod scope;
mod signature;
mod stack;
mod tables;

pub use config::NamingConfig;
pub use error::{NamingError, NamingResult};
pub use grammar::{IdentifierGrammar, FALLBACK};
pub use scope::{ScopeArena, ScopeError, ScopeId};
pub use signature::{Signature, SignatureComputer};
pub use tables::{NameDump, NameKey, NameTables};
