//! Naming failures.
//!
//! Every variant is fatal: it means the declaration tree violates an
//! upstream contract or the passes were driven out of order. None is
//! recoverable by retrying.

use crate::scope::ScopeError;

/// A naming-pass failure, carrying the qualified name of the declaration
/// involved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("cannot name `{decl}`: its scope is sealed")]
    SealedScope { decl: String },

    #[error("cannot name `{decl}`: the enclosing scope is still open")]
    ParentNotSealed { decl: String },

    #[error("cannot name `{decl}`: `{name}` is already taken")]
    AlreadyReserved { decl: String, name: String },

    #[error("`{decl}` is already named `{existing}`, cannot rename to `{requested}`")]
    Reassigned {
        decl: String,
        existing: String,
        requested: String,
    },

    #[error("cannot name `{decl}`: `{name}` is not a reserved token")]
    UnreservedFixedName { decl: String, name: String },

    #[error("no name was assigned to `{decl}`")]
    MissingName { decl: String },

    #[error("no member name was assigned to `{decl}`")]
    MissingMemberName { decl: String },

    #[error("no label was assigned to labeled loop {loop_id}")]
    MissingLoopLabel { loop_id: String },

    #[error("cannot compute a signature for `{decl}`: {reason}")]
    MisroutedSignature { decl: String, reason: &'static str },

    #[error("`{decl}` is a {found}, expected a {expected}")]
    UnexpectedKind {
        decl: String,
        found: &'static str,
        expected: &'static str,
    },
}

impl NamingError {
    /// Attach the declaration a low-level scope failure was about.
    pub(crate) fn from_scope(err: ScopeError, decl: String) -> Self {
        match err {
            ScopeError::Sealed => Self::SealedScope { decl },
            ScopeError::ParentNotSealed => Self::ParentNotSealed { decl },
            ScopeError::AlreadyReserved { name } => Self::AlreadyReserved { decl, name },
            ScopeError::Reassigned {
                existing,
                requested,
            } => Self::Reassigned {
                decl,
                existing,
                requested,
            },
            ScopeError::NotReserved { name } => Self::UnreservedFixedName { decl, name },
        }
    }
}

pub type NamingResult<T> = Result<T, NamingError>;
