//! Ori declaration tree.
//!
//! The finalized, type-checked declaration hierarchy that the naming
//! (`ori_naming`) and linkage (`ori_linkage`) passes consume:
//!
//! - **IDs** ([`DeclId`], [`LoopId`], [`PackageId`]): `u32` indices into
//!   the [`DeclTree`] arenas
//! - **Declarations** ([`Declaration`], [`DeclKind`]): one closed
//!   enumeration of every name-bearing entity, with visibility, origin and
//!   export flags already resolved upstream
//! - **Types** ([`TypeRef`]): just enough structure to render signature tags
//! - **Bodies** ([`Body`], [`BodyItem`], [`Loop`]): the nested local
//!   declarations and loops of a function-like declaration
//!
//! # Design
//!
//! Declarations never own each other. Parents and children refer to one
//! another by ID, so the tree can be walked in either direction without
//! cyclic ownership. Per-pass state (name scopes, identity tables) lives
//! in side tables keyed by these IDs, never on the declarations.

mod builder;
mod decl;
mod ids;
mod tree;
mod types;

pub use builder::{Site, TreeBuilder};
pub use decl::{
    AccessorKind, Aggregate, AggregateKind, Body, BodyItem, Constructor, DeclFlags, DeclKind,
    Declaration, Field, Function, LocalVariable, Loop, Origin, Parent, ParamRole, Property,
    ValueParam,
};
pub use ids::{DeclId, LoopId, PackageId};
pub use tree::{Ancestors, DeclTree, Package, VALUES_NAME, VALUE_OF_NAME};
pub use types::{TypeRef, TypeRepr};
