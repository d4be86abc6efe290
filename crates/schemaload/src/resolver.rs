// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dependency resolution.
//!
//! Depth-first walk over a rewritten bundle: every import is registered
//! before the file that uses it, and the registry doubles as the cache so
//! a file already live is never parsed again.

use crate::bundle::DescriptorBundle;
use crate::definition::SchemaCompiler;
use crate::error::{LoadError, Result};
use crate::registry::{FileBinding, SchemaStore};
use crate::synth::synthesize;
use std::collections::HashSet;
use std::sync::Arc;

/// Resolver for one top-level load request.
///
/// Borrows the store exclusively for its whole lifetime; nested
/// resolutions run as plain recursive calls under that same borrow.
pub struct Resolver<'a, S: SchemaStore + ?Sized> {
    store: &'a mut S,
    bundle: &'a DescriptorBundle,
    compiler: &'a dyn SchemaCompiler,
    strict_symbols: bool,
    in_progress: HashSet<String>,
}

impl<'a, S: SchemaStore + ?Sized> Resolver<'a, S> {
    /// `bundle` must already speak in canonical paths.
    pub fn new(
        store: &'a mut S,
        bundle: &'a DescriptorBundle,
        compiler: &'a dyn SchemaCompiler,
    ) -> Self {
        Self {
            store,
            bundle,
            compiler,
            strict_symbols: true,
            in_progress: HashSet::new(),
        }
    }

    /// Verify declared symbols against each definition.
    pub fn strict_symbols(mut self, strict: bool) -> Self {
        self.strict_symbols = strict;
        self
    }

    /// Make `path` and its transitive imports live, returning its binding.
    pub fn resolve(&mut self, path: &str) -> Result<Arc<FileBinding>> {
        if let Some(binding) = self.store.get(path) {
            log::trace!("[resolver] cache hit {}", path);
            return Ok(binding);
        }
        if self.in_progress.contains(path) {
            return Err(LoadError::DependencyCycle {
                path: path.to_string(),
            });
        }

        let bundle = self.bundle;
        let file = bundle.file(path).ok_or_else(|| LoadError::SchemaNotFound {
            path: path.to_string(),
        })?;

        self.in_progress.insert(path.to_string());
        for dep in &file.dependencies {
            self.resolve(dep)?;
        }
        self.in_progress.remove(path);

        log::debug!("[resolver] synthesizing {}", path);
        synthesize(file, &mut *self.store, self.compiler, self.strict_symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::SchemaFile;
    use crate::definition::{CdrSchemaCompiler, FileBuilder, MessageBuilder, ScalarType};
    use crate::registry::MemoryStore;

    fn chain() -> DescriptorBundle {
        DescriptorBundle::from_files(vec![
            FileBuilder::new("top.schema", "pkg")
                .dependency("mid.schema")
                .message(MessageBuilder::new("Top").message_field("mid", "Mid"))
                .build()
                .expect("top"),
            FileBuilder::new("mid.schema", "pkg")
                .dependency("base.schema")
                .message(MessageBuilder::new("Mid").message_field("base", "Base"))
                .build()
                .expect("mid"),
            FileBuilder::new("base.schema", "pkg")
                .message(MessageBuilder::new("Base").field("v", ScalarType::Uint32))
                .build()
                .expect("base"),
        ])
    }

    #[test]
    fn test_dependencies_registered_first() {
        let bundle = chain();
        let mut store = MemoryStore::new();
        Resolver::new(&mut store, &bundle, &CdrSchemaCompiler)
            .resolve("top.schema")
            .expect("resolve");
        assert_eq!(
            store.paths(),
            vec!["base.schema", "mid.schema", "top.schema"]
        );
    }

    #[test]
    fn test_cache_hit_returns_same_binding() {
        let bundle = chain();
        let mut store = MemoryStore::new();
        let mut resolver = Resolver::new(&mut store, &bundle, &CdrSchemaCompiler);
        let first = resolver.resolve("mid.schema").expect("first");
        let second = resolver.resolve("mid.schema").expect("second");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_dependency() {
        let bundle = DescriptorBundle::from_files(vec![SchemaFile::new("a.schema", "pkg")
            .with_dependency("gone.schema")]);
        let mut store = MemoryStore::new();
        let err = Resolver::new(&mut store, &bundle, &CdrSchemaCompiler)
            .resolve("a.schema")
            .expect_err("missing");
        assert!(matches!(err, LoadError::SchemaNotFound { ref path } if path == "gone.schema"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_import_cycle() {
        let bundle = DescriptorBundle::from_files(vec![
            SchemaFile::new("a.schema", "pkg").with_dependency("b.schema"),
            SchemaFile::new("b.schema", "pkg").with_dependency("a.schema"),
        ]);
        let mut store = MemoryStore::new();
        let err = Resolver::new(&mut store, &bundle, &CdrSchemaCompiler)
            .resolve("a.schema")
            .expect_err("cycle");
        assert!(matches!(err, LoadError::DependencyCycle { ref path } if path == "a.schema"));
        assert!(store.is_empty());
    }
}
