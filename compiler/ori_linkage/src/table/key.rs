//! Structural keys that survive edits to the declaration tree.

use std::fmt;

use ori_decl::{DeclId, DeclKind, DeclTree};
use serde::{Deserialize, Serialize};

/// Build-independent identity of a declaration.
///
/// Rendered from the package, then every enclosing declaration down to the
/// declaration itself as `name#kind`. Functions add their receiver and
/// parameter types, so overloads get distinct keys:
///
/// ```text
/// app.core/Box#aggregate/fill#function(Int,String)
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclKey(String);

impl DeclKey {
    pub fn of(tree: &DeclTree, id: DeclId) -> Self {
        let mut segments: Vec<String> = tree
            .ancestors(id)
            .map(|ancestor| segment(tree, ancestor))
            .collect();
        segments.reverse();
        segments.push(segment(tree, id));
        let package = &tree.package(tree.package_of(id)).fq_name;
        Self(format!("{package}/{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeclKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

fn segment(tree: &DeclTree, id: DeclId) -> String {
    let decl = tree.decl(id);
    let mut out = format!("{}#{}", decl.name, decl.kind.describe());
    if let Some(function) = decl.as_function() {
        let types: Vec<String> = function
            .extension_receiver
            .into_iter()
            .chain(function.params.iter().copied())
            .filter_map(|param| match &tree.decl(param).kind {
                DeclKind::ValueParameter(value) => Some(value.ty.to_string()),
                _ => None,
            })
            .collect();
        out.push('(');
        out.push_str(&types.join(","));
        out.push(')');
    }
    out
}
