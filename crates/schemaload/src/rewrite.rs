// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Path rewriting.
//!
//! Collapses bundle files that duplicate already-live schemas onto the
//! registry's canonical paths, then rewrites every file identity and every
//! dependency reference so the bundle speaks in canonical paths only.

use crate::bundle::DescriptorBundle;
use crate::error::{LoadError, Result};
use crate::mapper::SymbolIndex;
use std::collections::{HashMap, HashSet};

/// Bundle path to canonical path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRewriteMap {
    entries: HashMap<String, String>,
}

impl PathRewriteMap {
    /// Canonical path recorded for a bundle path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Canonical path for `path`, or `path` itself when it is not a bundle
    /// file (a reference straight into the registry).
    pub fn canonical<'a>(&'a self, path: &'a str) -> &'a str {
        self.get(path).unwrap_or(path)
    }

    /// Whether `path` collapses onto a different canonical path.
    pub fn is_alias(&self, path: &str) -> bool {
        self.get(path).map_or(false, |canonical| canonical != path)
    }

    /// Iterate `(bundle path, canonical path)` pairs that are aliases.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(from, to)| from != to)
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the rewrite map for `bundle` and apply it.
///
/// For each file, the first symbol found in `index` binds the file to that
/// symbol's canonical path; a later symbol of the same file mapping to a
/// different path is a [`LoadError::CompatibilityConflict`]. Files without
/// any hit keep their own path. When several files end up on the same
/// canonical path, the first one in bundle order is kept.
pub fn rewrite_bundle(
    bundle: &DescriptorBundle,
    index: &SymbolIndex,
) -> Result<(PathRewriteMap, DescriptorBundle)> {
    let mut map = PathRewriteMap::default();

    for file in bundle {
        let mut bound: Option<&str> = None;
        for (full_name, _) in file.qualified_symbols() {
            let Some(canonical) = index.get(&full_name) else {
                continue;
            };
            match bound {
                None => bound = Some(canonical),
                Some(existing) if existing != canonical => {
                    return Err(LoadError::CompatibilityConflict {
                        file: file.name.clone(),
                        bound: existing.to_string(),
                        conflicting: canonical.to_string(),
                        symbol: full_name,
                    });
                }
                Some(_) => {}
            }
        }

        let canonical = bound.unwrap_or(&file.name).to_string();
        if canonical != file.name {
            log::debug!("[rewrite] {} -> {}", file.name, canonical);
        }
        map.entries.entry(file.name.clone()).or_insert(canonical);
    }

    let mut emitted = HashSet::new();
    let mut files = Vec::with_capacity(bundle.len());
    for file in bundle {
        let canonical = map.canonical(&file.name).to_string();
        if !emitted.insert(canonical.clone()) {
            continue;
        }
        let mut rewritten = file.clone();
        rewritten.name = canonical;
        rewritten.dependencies = file
            .dependencies
            .iter()
            .map(|dep| map.canonical(dep).to_string())
            .collect();
        files.push(rewritten);
    }

    Ok((map, DescriptorBundle::from_files(files)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{SchemaFile, SymbolKind};

    fn index(pairs: &[(&str, &str)]) -> SymbolIndex {
        let mut index = SymbolIndex::new();
        for (symbol, path) in pairs {
            index.insert(symbol.to_string(), path.to_string());
        }
        index
    }

    #[test]
    fn test_new_files_map_to_themselves() {
        let bundle = DescriptorBundle::from_files(vec![
            SchemaFile::new("dep.schema", "pkg").with_symbol("Base", SymbolKind::Message),
            SchemaFile::new("main.schema", "pkg")
                .with_symbol("Main", SymbolKind::Message)
                .with_dependency("dep.schema"),
        ]);
        let (map, rewritten) = rewrite_bundle(&bundle, &SymbolIndex::new()).expect("rewrite");
        assert_eq!(map.get("dep.schema"), Some("dep.schema"));
        assert_eq!(map.aliases().count(), 0);
        assert_eq!(rewritten, bundle);
    }

    #[test]
    fn test_alias_rewrites_identity_and_dependencies() {
        let bundle = DescriptorBundle::from_files(vec![
            SchemaFile::new("p2.schema", "pkg").with_symbol("Msg", SymbolKind::Message),
            SchemaFile::new("user.schema", "pkg")
                .with_symbol("User", SymbolKind::Message)
                .with_dependency("p2.schema")
                .with_dependency("registry_only.schema"),
        ]);
        let (map, rewritten) =
            rewrite_bundle(&bundle, &index(&[("pkg.Msg", "p1.schema")])).expect("rewrite");

        assert!(map.is_alias("p2.schema"));
        assert!(!map.is_alias("user.schema"));
        assert!(rewritten.file("p2.schema").is_none());
        assert!(rewritten.file("p1.schema").is_some());
        let user = rewritten.file("user.schema").expect("user");
        assert_eq!(
            user.dependencies,
            vec!["p1.schema".to_string(), "registry_only.schema".to_string()]
        );
    }

    #[test]
    fn test_conflicting_symbols_fail() {
        let bundle = DescriptorBundle::from_files(vec![SchemaFile::new("x.schema", "pkg")
            .with_symbol("A", SymbolKind::Message)
            .with_symbol("New", SymbolKind::Message)
            .with_symbol("B", SymbolKind::Enum)]);
        let err = rewrite_bundle(
            &bundle,
            &index(&[("pkg.A", "p1.schema"), ("pkg.B", "p2.schema")]),
        )
        .expect_err("conflict");

        match err {
            LoadError::CompatibilityConflict {
                file,
                bound,
                conflicting,
                symbol,
            } => {
                assert_eq!(file, "x.schema");
                assert_eq!(bound, "p1.schema");
                assert_eq!(conflicting, "p2.schema");
                assert_eq!(symbol, "pkg.B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_agreeing_symbols_share_one_path() {
        let bundle = DescriptorBundle::from_files(vec![SchemaFile::new("copy.schema", "pkg")
            .with_symbol("A", SymbolKind::Message)
            .with_symbol("B", SymbolKind::Message)]);
        let (map, _) = rewrite_bundle(
            &bundle,
            &index(&[("pkg.A", "orig.schema"), ("pkg.B", "orig.schema")]),
        )
        .expect("rewrite");
        assert_eq!(map.get("copy.schema"), Some("orig.schema"));
    }

    #[test]
    fn test_collapsed_duplicates_keep_first() {
        let bundle = DescriptorBundle::from_files(vec![
            SchemaFile::new("one.schema", "pkg")
                .with_symbol("Msg", SymbolKind::Message)
                .with_definition(vec![1]),
            SchemaFile::new("two.schema", "pkg")
                .with_symbol("Msg", SymbolKind::Message)
                .with_definition(vec![2]),
        ]);
        let (_, rewritten) =
            rewrite_bundle(&bundle, &index(&[("pkg.Msg", "live.schema")])).expect("rewrite");
        assert_eq!(rewritten.len(), 1);
        assert_eq!(
            rewritten.file("live.schema").map(|f| f.definition_bytes.clone()),
            Some(vec![1])
        );
    }
}
