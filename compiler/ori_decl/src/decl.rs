//! Declaration nodes.
//!
//! [`Declaration`] is the common header (name, parent, flags, origin);
//! [`DeclKind`] carries the kind-specific links. All links are IDs into
//! the owning [`DeclTree`](crate::DeclTree).

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::ids::{DeclId, LoopId, PackageId};
use crate::types::TypeRef;

/// Where a declaration lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Top-level declaration of a package fragment.
    Package(PackageId),
    /// Member, parameter, accessor or local of another declaration.
    Decl(DeclId),
}

bitflags! {
    /// Visibility and dispatch flags, resolved before naming runs.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DeclFlags: u8 {
        /// Defined outside the compiled program; the declared name is the
        /// runtime name and must be reproduced verbatim.
        const EXTERNAL = 1;
        /// Visible to dependent modules.
        const EXPORTED = 1 << 1;
        /// Always gets a cross-module reference record, even when not
        /// exported.
        const ALWAYS_MATERIALIZE = 1 << 2;
        /// Static member: no dispatch receiver.
        const STATIC = 1 << 3;
    }
}

/// How a declaration came to exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Written in source.
    #[default]
    Ordinary,
    /// Placeholder standing in for an inherited member that the aggregate
    /// does not redeclare. Links to what it shadows via `overridden`.
    FakeOverride,
    /// Produced by the compiler (closed-variant helpers, bridges).
    Synthetic,
    /// Produced by default-argument or default-member generation.
    DefaultGenerated,
}

/// Aggregate flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Class,
    Interface,
    /// Singleton object.
    Object,
    /// Closed-variant container (enum-like).
    EnumClass,
    /// One case of a closed-variant container.
    EnumEntry,
    Annotation,
}

/// Role of a value parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamRole {
    Ordinary,
    /// Receiver of a member function.
    DispatchReceiver,
    /// Receiver of an extension function.
    ExtensionReceiver,
    /// An aggregate's own `this`.
    InstanceReceiver,
}

impl ParamRole {
    /// Implicit receivers all map to the same fixed output token.
    pub fn is_implicit_receiver(self) -> bool {
        matches!(self, Self::DispatchReceiver | Self::InstanceReceiver)
    }
}

/// Which half of a property an accessor implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// Ordered contents of a function-like body.
///
/// Only name-bearing constructs are kept: expressions are out of scope
/// for naming.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Body {
    pub items: Vec<BodyItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyItem {
    /// A local variable, local function, local aggregate, ...
    Decl(DeclId),
    Loop(LoopId),
}

/// A loop inside a body, optionally labeled in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loop {
    pub label: Option<String>,
    pub body: Body,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregate {
    pub kind: AggregateKind,
    pub this_receiver: Option<DeclId>,
    pub type_params: Vec<DeclId>,
    pub members: Vec<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub type_params: Vec<DeclId>,
    pub dispatch_receiver: Option<DeclId>,
    pub extension_receiver: Option<DeclId>,
    pub params: Vec<DeclId>,
    pub return_type: TypeRef,
    pub body: Option<Body>,
    /// Set for property accessors: the owning property.
    pub property: Option<DeclId>,
    pub accessor: Option<AccessorKind>,
    pub overridden: SmallVec<[DeclId; 1]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constructor {
    pub params: Vec<DeclId>,
    pub body: Option<Body>,
    pub primary: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub ty: TypeRef,
    /// Set for backing fields: the property they store.
    pub property: Option<DeclId>,
    pub initializer: Option<Body>,
    pub overridden: SmallVec<[DeclId; 1]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    pub backing_field: Option<DeclId>,
    pub overridden: SmallVec<[DeclId; 1]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueParam {
    pub ty: TypeRef,
    pub role: ParamRole,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVariable {
    pub ty: TypeRef,
    pub initializer: Option<Body>,
}

/// Kind-specific payload of a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Aggregate(Aggregate),
    Function(Function),
    Constructor(Constructor),
    Field(Field),
    Property(Property),
    TypeParameter,
    ValueParameter(ValueParam),
    LocalVariable(LocalVariable),
    AnonymousInitializer(Body),
}

impl DeclKind {
    /// Short kind name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Aggregate(_) => "aggregate",
            Self::Function(_) => "function",
            Self::Constructor(_) => "constructor",
            Self::Field(_) => "field",
            Self::Property(_) => "property",
            Self::TypeParameter => "type parameter",
            Self::ValueParameter(_) => "value parameter",
            Self::LocalVariable(_) => "local variable",
            Self::AnonymousInitializer(_) => "anonymous initializer",
        }
    }
}

/// A named entity of the compiled program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Raw declared name. Special names (`<this>`, `<get-x>`) are kept as
    /// written; sanitizing is the backend's business.
    pub name: String,
    /// Explicit output-name annotation.
    pub given_name: Option<String>,
    pub kind: DeclKind,
    pub parent: Parent,
    pub flags: DeclFlags,
    pub origin: Origin,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind, parent: Parent) -> Self {
        Self {
            name: name.into(),
            given_name: None,
            kind,
            parent,
            flags: DeclFlags::empty(),
            origin: Origin::Ordinary,
        }
    }

    pub fn is_external(&self) -> bool {
        self.flags.contains(DeclFlags::EXTERNAL)
    }

    pub fn is_exported(&self) -> bool {
        self.flags.contains(DeclFlags::EXPORTED)
    }

    pub fn always_materialize(&self) -> bool {
        self.flags.contains(DeclFlags::ALWAYS_MATERIALIZE)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(DeclFlags::STATIC)
    }

    pub fn is_fake_override(&self) -> bool {
        self.origin == Origin::FakeOverride
    }

    /// The name the declaration wants in output: the annotation if
    /// present, else the declared name.
    pub fn output_name(&self) -> &str {
        self.given_name.as_deref().unwrap_or(&self.name)
    }

    pub fn as_aggregate(&self) -> Option<&Aggregate> {
        match &self.kind {
            DeclKind::Aggregate(aggregate) => Some(aggregate),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            DeclKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// The body (or initializer) of a body-carrying declaration.
    pub fn body(&self) -> Option<&Body> {
        match &self.kind {
            DeclKind::Function(f) => f.body.as_ref(),
            DeclKind::Constructor(c) => c.body.as_ref(),
            DeclKind::Field(f) => f.initializer.as_ref(),
            DeclKind::LocalVariable(v) => v.initializer.as_ref(),
            DeclKind::AnonymousInitializer(body) => Some(body),
            _ => None,
        }
    }

    /// Mutable body slot, created empty on first use.
    ///
    /// `None` for kinds that cannot carry a body.
    pub(crate) fn body_mut(&mut self) -> Option<&mut Body> {
        let slot = match &mut self.kind {
            DeclKind::Function(f) => &mut f.body,
            DeclKind::Constructor(c) => &mut c.body,
            DeclKind::Field(f) => &mut f.initializer,
            DeclKind::LocalVariable(v) => &mut v.initializer,
            DeclKind::AnonymousInitializer(body) => return Some(body),
            _ => return None,
        };
        Some(slot.get_or_insert_with(Body::default))
    }

    /// Declarations this one overrides (or, for fake overrides, shadows).
    pub fn overridden(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Function(f) => &f.overridden,
            DeclKind::Field(f) => &f.overridden,
            DeclKind::Property(p) => &p.overridden,
            _ => &[],
        }
    }
}
