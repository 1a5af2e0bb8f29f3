//! Incremental construction of a [`DeclTree`].
//!
//! Upstream lowering and tests build trees through [`TreeBuilder`], which
//! allocates declarations and keeps the parent/child links consistent:
//! member lists, parameter lists, bodies and property accessors.
//!
//! Misuse (adding a member to a non-aggregate, a parameter to a field)
//! is a bug in the caller and panics.

use smallvec::smallvec;

use crate::decl::{
    AccessorKind, Aggregate, AggregateKind, Body, BodyItem, Constructor, DeclFlags, DeclKind,
    Declaration, Field, Function, LocalVariable, Loop, Origin, Parent, ParamRole, Property,
    ValueParam,
};
use crate::ids::{DeclId, LoopId, PackageId};
use crate::tree::DeclTree;
use crate::types::TypeRef;

/// Declared name of implicit receivers.
const THIS_NAME: &str = "<this>";

/// Where a new declaration is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Site {
    /// Top level of a package fragment.
    Package(PackageId),
    /// Member of an aggregate.
    Member(DeclId),
    /// Directly in the body of a function-like declaration.
    Body(DeclId),
    /// Inside a loop, itself somewhere in the body of the given owner.
    Loop(DeclId, LoopId),
}

impl Site {
    fn parent(self) -> Parent {
        match self {
            Self::Package(pkg) => Parent::Package(pkg),
            Self::Member(owner) | Self::Body(owner) | Self::Loop(owner, _) => Parent::Decl(owner),
        }
    }
}

/// Builder for [`DeclTree`].
#[derive(Default)]
pub struct TreeBuilder {
    tree: DeclTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree built so far.
    pub fn tree(&self) -> &DeclTree {
        &self.tree
    }

    pub fn finish(self) -> DeclTree {
        self.tree
    }

    pub fn package(&mut self, fq_name: &str) -> PackageId {
        self.tree.alloc_package(fq_name)
    }

    // Aggregates

    /// Add an aggregate together with its instance receiver.
    pub fn aggregate(&mut self, site: Site, name: &str, kind: AggregateKind) -> DeclId {
        let id = self.attach(
            site,
            name,
            DeclKind::Aggregate(Aggregate {
                kind,
                this_receiver: None,
                type_params: Vec::new(),
                members: Vec::new(),
            }),
        );
        let receiver = self.value_param(id, THIS_NAME, TypeRef::named(name), ParamRole::InstanceReceiver);
        if let DeclKind::Aggregate(agg) = &mut self.tree.decl_mut(id).kind {
            agg.this_receiver = Some(receiver);
        }
        id
    }

    pub fn constructor(&mut self, aggregate: DeclId) -> DeclId {
        self.attach(
            Site::Member(aggregate),
            "<init>",
            DeclKind::Constructor(Constructor {
                params: Vec::new(),
                body: None,
                primary: true,
            }),
        )
    }

    pub fn anonymous_initializer(&mut self, aggregate: DeclId) -> DeclId {
        self.attach(
            Site::Member(aggregate),
            "<anonymous-init>",
            DeclKind::AnonymousInitializer(Body::default()),
        )
    }

    // Functions

    /// Add a function. Members of aggregates get a dispatch receiver.
    pub fn function(&mut self, site: Site, name: &str, return_type: TypeRef) -> DeclId {
        let id = self.attach(site, name, DeclKind::Function(empty_function(return_type)));
        if let Site::Member(owner) = site {
            let receiver_ty = TypeRef::named(self.tree.decl(owner).name.clone());
            let receiver = self.value_param(id, THIS_NAME, receiver_ty, ParamRole::DispatchReceiver);
            if let DeclKind::Function(f) = &mut self.tree.decl_mut(id).kind {
                f.dispatch_receiver = Some(receiver);
            }
        }
        id
    }

    /// Add a static function: no dispatch receiver even as a member.
    pub fn static_function(&mut self, site: Site, name: &str, return_type: TypeRef) -> DeclId {
        let id = self.attach(site, name, DeclKind::Function(empty_function(return_type)));
        self.tree.decl_mut(id).flags.insert(DeclFlags::STATIC);
        id
    }

    /// Append an ordinary value parameter to a function or constructor.
    pub fn param(&mut self, owner: DeclId, name: &str, ty: TypeRef) -> DeclId {
        let id = self.value_param(owner, name, ty, ParamRole::Ordinary);
        match &mut self.tree.decl_mut(owner).kind {
            DeclKind::Function(f) => f.params.push(id),
            DeclKind::Constructor(c) => c.params.push(id),
            other => panic!("cannot add a parameter to a {}", other.describe()),
        }
        id
    }

    pub fn extension_receiver(&mut self, function: DeclId, ty: TypeRef) -> DeclId {
        let id = self.value_param(function, THIS_NAME, ty, ParamRole::ExtensionReceiver);
        match &mut self.tree.decl_mut(function).kind {
            DeclKind::Function(f) => f.extension_receiver = Some(id),
            other => panic!("cannot add an extension receiver to a {}", other.describe()),
        }
        id
    }

    /// Append a type parameter to a function or aggregate.
    pub fn type_param(&mut self, owner: DeclId, name: &str) -> DeclId {
        let id = self
            .tree
            .alloc_decl(Declaration::new(name, DeclKind::TypeParameter, Parent::Decl(owner)));
        match &mut self.tree.decl_mut(owner).kind {
            DeclKind::Function(f) => f.type_params.push(id),
            DeclKind::Aggregate(a) => a.type_params.push(id),
            other => panic!("cannot add a type parameter to a {}", other.describe()),
        }
        id
    }

    // Fields and properties

    pub fn field(&mut self, site: Site, name: &str, ty: TypeRef) -> DeclId {
        self.attach(
            site,
            name,
            DeclKind::Field(Field {
                ty,
                property: None,
                initializer: None,
                overridden: smallvec![],
            }),
        )
    }

    /// Add a property with a getter, a backing field and, if `mutable`,
    /// a setter.
    pub fn property(&mut self, site: Site, name: &str, ty: TypeRef, mutable: bool) -> DeclId {
        self.property_with(site, name, ty, mutable, true)
    }

    fn property_with(
        &mut self,
        site: Site,
        name: &str,
        ty: TypeRef,
        mutable: bool,
        backing_field: bool,
    ) -> DeclId {
        let id = self.attach(
            site,
            name,
            DeclKind::Property(Property {
                getter: None,
                setter: None,
                backing_field: None,
                overridden: smallvec![],
            }),
        );
        let member = matches!(site, Site::Member(_));
        let getter = self.accessor(id, name, AccessorKind::Getter, ty.clone(), member);
        let setter =
            mutable.then(|| self.accessor(id, name, AccessorKind::Setter, ty.clone(), member));
        let field = backing_field.then(|| {
            self.tree.alloc_decl(Declaration::new(
                name,
                DeclKind::Field(Field {
                    ty,
                    property: Some(id),
                    initializer: None,
                    overridden: smallvec![],
                }),
                Parent::Decl(id),
            ))
        });
        if let DeclKind::Property(p) = &mut self.tree.decl_mut(id).kind {
            p.getter = Some(getter);
            p.setter = setter;
            p.backing_field = field;
        }
        id
    }

    fn accessor(
        &mut self,
        property: DeclId,
        name: &str,
        kind: AccessorKind,
        ty: TypeRef,
        member: bool,
    ) -> DeclId {
        let (accessor_name, return_type) = match kind {
            AccessorKind::Getter => (format!("<get-{name}>"), ty.clone()),
            AccessorKind::Setter => (format!("<set-{name}>"), TypeRef::unit()),
        };
        let mut function = empty_function(return_type);
        function.property = Some(property);
        function.accessor = Some(kind);
        let id = self.tree.alloc_decl(Declaration::new(
            accessor_name,
            DeclKind::Function(function),
            Parent::Decl(property),
        ));
        if member {
            let owner = self.tree.parent_decl(property);
            let receiver_ty = owner.map_or_else(TypeRef::any, |owner| {
                TypeRef::named(self.tree.decl(owner).name.clone())
            });
            let receiver = self.value_param(id, THIS_NAME, receiver_ty, ParamRole::DispatchReceiver);
            if let DeclKind::Function(f) = &mut self.tree.decl_mut(id).kind {
                f.dispatch_receiver = Some(receiver);
            }
        }
        if kind == AccessorKind::Setter {
            self.param(id, "<set-?>", ty);
        }
        id
    }

    // Locals

    pub fn local(&mut self, site: Site, name: &str, ty: TypeRef) -> DeclId {
        self.attach(
            site,
            name,
            DeclKind::LocalVariable(LocalVariable {
                ty,
                initializer: None,
            }),
        )
    }

    /// Add a loop to a body (or to an enclosing loop).
    pub fn add_loop(&mut self, site: Site, label: Option<&str>) -> LoopId {
        let id = self.tree.alloc_loop(Loop {
            label: label.map(str::to_owned),
            body: Body::default(),
        });
        self.push_body_item(site, BodyItem::Loop(id));
        id
    }

    // Overrides

    /// Add a fake-override placeholder for `of` to `aggregate`.
    ///
    /// Functions keep their parameter types and return type; properties
    /// get placeholder accessors shadowing the original accessors.
    pub fn fake_override(&mut self, aggregate: DeclId, of: DeclId) -> DeclId {
        let original = self.tree.decl(of).clone();
        let id = match &original.kind {
            DeclKind::Function(f) => {
                let id = self.function(Site::Member(aggregate), &original.name, f.return_type.clone());
                for &param in &f.params {
                    let param_decl = self.tree.decl(param).clone();
                    if let DeclKind::ValueParameter(vp) = param_decl.kind {
                        self.param(id, &param_decl.name, vp.ty);
                    }
                }
                id
            }
            DeclKind::Field(f) => self.field(Site::Member(aggregate), &original.name, f.ty.clone()),
            DeclKind::Property(p) => {
                let ty = p
                    .getter
                    .and_then(|getter| self.tree.decl(getter).as_function())
                    .map_or_else(TypeRef::any, |getter| getter.return_type.clone());
                // Fake-override properties have no storage of their own.
                let id = self.property_with(
                    Site::Member(aggregate),
                    &original.name,
                    ty,
                    p.setter.is_some(),
                    false,
                );
                if let Some(placeholder) = self.tree.decl(id).as_property().cloned() {
                    for (mine, theirs) in
                        [(placeholder.getter, p.getter), (placeholder.setter, p.setter)]
                    {
                        if let (Some(mine), Some(theirs)) = (mine, theirs) {
                            self.mark_fake_override(mine, theirs);
                        }
                    }
                }
                id
            }
            other => panic!("a {} cannot be overridden", other.describe()),
        };
        self.mark_fake_override(id, of);
        id
    }

    fn mark_fake_override(&mut self, id: DeclId, of: DeclId) {
        self.add_override(id, of);
        self.tree.decl_mut(id).origin = Origin::FakeOverride;
    }

    /// Record that `id` overrides `overridden`.
    pub fn add_override(&mut self, id: DeclId, overridden: DeclId) {
        match &mut self.tree.decl_mut(id).kind {
            DeclKind::Function(f) => f.overridden.push(overridden),
            DeclKind::Field(f) => f.overridden.push(overridden),
            DeclKind::Property(p) => p.overridden.push(overridden),
            other => panic!("a {} cannot override", other.describe()),
        }
    }

    // Header tweaks

    pub fn set_flags(&mut self, id: DeclId, flags: DeclFlags) {
        self.tree.decl_mut(id).flags.insert(flags);
    }

    pub fn set_given_name(&mut self, id: DeclId, name: &str) {
        self.tree.decl_mut(id).given_name = Some(name.to_owned());
    }

    pub fn set_origin(&mut self, id: DeclId, origin: Origin) {
        self.tree.decl_mut(id).origin = origin;
    }

    // Internals

    fn attach(&mut self, site: Site, name: &str, kind: DeclKind) -> DeclId {
        let id = self.tree.alloc_decl(Declaration::new(name, kind, site.parent()));
        match site {
            Site::Package(pkg) => self.tree.package_mut(pkg).declarations.push(id),
            Site::Member(owner) => match &mut self.tree.decl_mut(owner).kind {
                DeclKind::Aggregate(agg) => agg.members.push(id),
                other => panic!("cannot add a member to a {}", other.describe()),
            },
            Site::Body(_) | Site::Loop(..) => self.push_body_item(site, BodyItem::Decl(id)),
        }
        id
    }

    fn push_body_item(&mut self, site: Site, item: BodyItem) {
        match site {
            Site::Body(owner) => {
                let decl = self.tree.decl_mut(owner);
                let kind = decl.kind.describe();
                match decl.body_mut() {
                    Some(body) => body.items.push(item),
                    None => panic!("a {kind} has no body"),
                }
            }
            Site::Loop(_, lp) => self.tree.loop_mut(lp).body.items.push(item),
            Site::Package(_) | Site::Member(_) => panic!("{site:?} is not a body"),
        }
    }

    fn value_param(&mut self, owner: DeclId, name: &str, ty: TypeRef, role: ParamRole) -> DeclId {
        self.tree.alloc_decl(Declaration::new(
            name,
            DeclKind::ValueParameter(ValueParam { ty, role }),
            Parent::Decl(owner),
        ))
    }
}

fn empty_function(return_type: TypeRef) -> Function {
    Function {
        type_params: Vec::new(),
        dispatch_receiver: None,
        extension_receiver: None,
        params: Vec::new(),
        return_type,
        body: None,
        property: None,
        accessor: None,
        overridden: smallvec![],
    }
}
