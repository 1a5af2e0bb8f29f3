use std::fmt;

use super::{NameKey, NameTables};
use crate::scope::ScopeId;

/// Human-readable listing of a [`NameTables`], in declaration order.
pub struct NameDump<'a, 'tree> {
    tables: &'a NameTables<'tree>,
}

impl<'a, 'tree> NameDump<'a, 'tree> {
    pub fn new(tables: &'a NameTables<'tree>) -> Self {
        Self { tables }
    }

    fn key(&self, key: &NameKey) -> String {
        match key {
            NameKey::Decl(id) => self.tables.tree.qualified_name(*id),
            NameKey::Signature(signature) => signature.to_string(),
            NameKey::Loop(id) => format!("{id:?}"),
        }
    }

    fn section(&self, f: &mut fmt::Formatter<'_>, title: &str, scope: ScopeId) -> fmt::Result {
        writeln!(f, "{title}:")?;
        for (key, name) in self.tables.scopes.entries(scope) {
            writeln!(f, "  {} = {name}", self.key(key))?;
        }
        Ok(())
    }
}

impl fmt::Display for NameDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables;
        self.section(f, "Global names", tables.global)?;
        self.section(f, "Member functions", tables.member_functions)?;
        self.section(f, "Member fields", tables.member_fields)?;
        for walked in &tables.walked {
            let owner = tables.tree.qualified_name(walked.owner);
            self.section(f, &format!("Local names for {owner}"), walked.names)?;
            if tables.scopes.entries(walked.labels).next().is_some() {
                self.section(f, &format!("Loop labels for {owner}"), walked.labels)?;
            }
        }
        Ok(())
    }
}
