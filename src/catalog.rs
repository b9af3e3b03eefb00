//! Interface catalog shared by every file of a run.
//!
//! Interfaces and the classes implementing them can live in different files,
//! so the catalog is filled from all units first ([`CatalogBuilder`]) and
//! frozen before any lookup ([`InterfaceCatalog`]).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{DeclaredType, SourceUnit, TypeReference};

#[derive(Debug, Default)]
pub struct CatalogBuilder<'a> {
    entries: HashMap<String, &'a DeclaredType>,
    qualified_by_simple: BTreeMap<String, BTreeSet<String>>,
    registered: usize,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-interfaces are ignored.
    pub fn register(&mut self, decl: &'a DeclaredType, package_prefix: &str) -> bool {
        if !decl.is_interface() {
            return false;
        }

        let qualified = format!("{package_prefix}{}", decl.name);
        self.entries.insert(decl.name.clone(), decl);
        self.entries.insert(qualified.clone(), decl);
        self.qualified_by_simple
            .entry(decl.name.clone())
            .or_default()
            .insert(qualified);
        self.registered += 1;
        true
    }

    pub fn register_unit(&mut self, unit: &'a SourceUnit) -> usize {
        let prefix = unit.package_prefix();
        let mut registered = 0;
        for decl in &unit.types {
            if self.register(decl, &prefix) {
                registered += 1;
            }
        }
        registered
    }

    pub fn build(self) -> InterfaceCatalog<'a> {
        let ambiguous = self
            .qualified_by_simple
            .into_iter()
            .filter(|(_, qualified)| qualified.len() > 1)
            .map(|(simple, qualified)| (simple, qualified.into_iter().collect()))
            .collect();

        InterfaceCatalog {
            entries: self.entries,
            ambiguous,
            registered: self.registered,
        }
    }
}

/// Frozen name index over every interface of the run.
#[derive(Debug, Default)]
pub struct InterfaceCatalog<'a> {
    entries: HashMap<String, &'a DeclaredType>,
    ambiguous: BTreeMap<String, Vec<String>>,
    registered: usize,
}

impl<'a> InterfaceCatalog<'a> {
    /// Looks up the qualified key first (`qualifier.Name`, or `Name` when the
    /// reference is unqualified), then falls back to the bare simple name.
    pub fn resolve(&self, reference: &TypeReference) -> Option<&'a DeclaredType> {
        self.entries
            .get(&reference.qualified_key())
            .or_else(|| self.entries.get(&reference.name))
            .copied()
    }

    pub fn interface_count(&self) -> usize {
        self.registered
    }

    /// Simple names declared by more than one distinct qualified interface.
    /// Unqualified references to these resolve to whichever was registered
    /// last.
    pub fn ambiguous_names(&self) -> &BTreeMap<String, Vec<String>> {
        &self.ambiguous
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
