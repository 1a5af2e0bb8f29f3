//! Linkage failures.

/// A fatal cross-module reference failure.
///
/// Expected absence (a declaration that needs no reference) is `None`,
/// never an error.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("fake override `{decl}` shadows no real declaration")]
    UnresolvedFakeOverride { decl: String },

    #[error("`{decl}` is a fake-override {kind}, which cannot exist")]
    UnexpectedFakeOverride { decl: String, kind: &'static str },

    #[error("property accessor `{decl}` has no owning property")]
    MissingProperty { decl: String },

    #[error("`{decl}` needs a cross-module reference but cannot be referenced")]
    Unreferenceable { decl: String },

    #[error("reference section codec failed: {0}")]
    Codec(#[from] bincode::Error),
}

pub type LinkResult<T> = Result<T, LinkError>;
