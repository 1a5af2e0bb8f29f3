//! Cross-module declaration references for Ori module artifacts.
//!
//! When one module uses a declaration of another, the producer writes a
//! [`ReferenceRecord`] into the artifact's [`ReferenceSection`] and the
//! consumer resolves it back to a declaration of its own tree.
//!
//! - [`DeclarationTable`]: persistent, memoized [`UniqId`] per exported
//!   declaration, snapshotted across builds by structural [`DeclKey`]
//! - [`ReferenceEncoder`]: declaration to record, choosing the role and
//!   which declaration the id names
//! - [`ReferenceResolver`]: record back to declaration, id first, owner
//!   path and name otherwise

mod encoder;
mod error;
mod owner;
mod record;
mod resolver;
mod table;

pub use encoder::ReferenceEncoder;
pub use error::{LinkError, LinkResult};
pub use record::{ReferenceRecord, ReferenceRole, ReferenceSection};
pub use resolver::ReferenceResolver;
pub use table::{DeclKey, DeclarationTable, TableSnapshot, UniqId};
