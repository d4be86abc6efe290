// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Symbol compatibility mapping.
//!
//! Snapshots which symbols of an incoming bundle already live in the
//! registry, and under which canonical path. The snapshot is taken once per
//! top-level load and shared by every nested resolution of that load.

use crate::bundle::DescriptorBundle;
use crate::registry::SchemaStore;
use std::collections::HashMap;

/// Fully-qualified symbol name to canonical path, hits only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex {
    entries: HashMap<String, String>,
}

impl SymbolIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical path of an already-live symbol.
    pub fn get(&self, full_name: &str) -> Option<&str> {
        self.entries.get(full_name).map(String::as_str)
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.entries.contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(symbol, canonical path)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, full_name: String, path: String) {
        self.entries.insert(full_name, path);
    }
}

/// Look up every top-level symbol of `bundle` in `store`.
///
/// Symbols the store does not know are left out; a new symbol is not an
/// error.
pub fn build_symbol_index<S: SchemaStore + ?Sized>(
    bundle: &DescriptorBundle,
    store: &S,
) -> SymbolIndex {
    let mut index = SymbolIndex::new();
    for file in bundle {
        for (full_name, _) in file.qualified_symbols() {
            if index.contains(&full_name) {
                continue;
            }
            if let Some(path) = store.symbol_path(&full_name) {
                index.insert(full_name, path);
            }
        }
    }
    log::debug!(
        "[mapper] {} of the bundle's symbols are already live",
        index.len()
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{SchemaFile, SymbolKind};
    use crate::registry::{FileBinding, MemoryStore};

    #[test]
    fn test_index_contains_hits_only() {
        let mut store = MemoryStore::new();
        let live = SchemaFile::new("p1.schema", "pkg").with_symbol("Msg", SymbolKind::Message);
        store.register(FileBinding::new(&live)).expect("register");

        let bundle = DescriptorBundle::from_files(vec![
            SchemaFile::new("p2.schema", "pkg")
                .with_symbol("Msg", SymbolKind::Message)
                .with_symbol("Fresh", SymbolKind::Enum),
            SchemaFile::new("other.schema", "other").with_symbol("Msg", SymbolKind::Message),
        ]);

        let index = build_symbol_index(&bundle, &store);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("pkg.Msg"), Some("p1.schema"));
        assert!(index.get("pkg.Fresh").is_none());
        assert!(index.get("other.Msg").is_none());
    }

    #[test]
    fn test_empty_store_gives_empty_index() {
        let store = MemoryStore::new();
        let bundle = DescriptorBundle::from_files(vec![
            SchemaFile::new("a.schema", "pkg").with_symbol("A", SymbolKind::Message)
        ]);
        assert!(build_symbol_index(&bundle, &store).is_empty());
    }
}
