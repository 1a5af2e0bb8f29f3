//! Reference records and the reference section of a module artifact.

use serde::{Deserialize, Serialize};

use crate::error::LinkResult;
use crate::table::UniqId;

/// How a consumer should interpret a [`ReferenceRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceRole {
    /// The declaration itself.
    Plain,
    /// Getter of the property the id points at.
    Getter,
    /// Setter of the property the id points at.
    Setter,
    /// Backing field of the property the id points at.
    BackingField,
    /// Placeholder for an inherited member that matched no earlier role;
    /// the id points at the real declaration.
    FakeOverride,
    /// Implicit constructor of a singleton or closed-variant case.
    DefaultConstructor,
    /// One case of a closed-variant container.
    ClosedVariantEntry,
    /// Synthesized `values`/`valueOf` helper of a closed-variant container.
    ClosedVariantMember,
    /// Type parameter of an aggregate.
    TypeParameter,
}

impl ReferenceRole {
    /// Whether records with this role carry no identity id.
    pub fn omits_id(self) -> bool {
        matches!(
            self,
            Self::DefaultConstructor | Self::ClosedVariantEntry | Self::ClosedVariantMember
        )
    }
}

/// Serialized pointer to a declaration of another module.
///
/// Resolved by owner path, simple name and role; `uniq_id` is a fast-path
/// hint when present.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Dotted package path of the owner.
    pub package_fq_name: String,
    /// Dotted path of the owning aggregate within its package; empty for
    /// package-level declarations.
    pub class_fq_name: String,
    /// Simple name of the referenced declaration.
    pub name: String,
    pub uniq_id: Option<UniqId>,
    pub role: ReferenceRole,
    /// The referenced declaration is a fake-override placeholder, whatever
    /// its role. The consumer re-synthesizes it from the real declaration
    /// instead of expecting a literal match.
    pub fake_override: bool,
}

/// Ordered reference records of one module artifact.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSection {
    pub records: Vec<ReferenceRecord>,
}

impl ReferenceSection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encode for embedding in the module artifact.
    pub fn to_bytes(&self) -> LinkResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> LinkResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn section_survives_the_artifact() {
        let section = ReferenceSection {
            records: vec![
                ReferenceRecord {
                    package_fq_name: "app.core".to_owned(),
                    class_fq_name: "Outer.Inner".to_owned(),
                    name: "size".to_owned(),
                    uniq_id: Some(UniqId::new(3)),
                    role: ReferenceRole::Getter,
                    fake_override: true,
                },
                ReferenceRecord {
                    package_fq_name: "app.core".to_owned(),
                    class_fq_name: "Color".to_owned(),
                    name: "RED".to_owned(),
                    uniq_id: None,
                    role: ReferenceRole::ClosedVariantEntry,
                    fake_override: false,
                },
            ],
        };
        let bytes = section.to_bytes().unwrap();
        assert_eq!(ReferenceSection::from_bytes(&bytes).unwrap(), section);
    }

    #[test]
    fn only_synthesized_roles_omit_ids() {
        assert!(ReferenceRole::DefaultConstructor.omits_id());
        assert!(ReferenceRole::ClosedVariantMember.omits_id());
        assert!(!ReferenceRole::TypeParameter.omits_id());
        assert!(!ReferenceRole::FakeOverride.omits_id());
    }
}
