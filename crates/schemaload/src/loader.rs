// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Load entry points.
//!
//! [`SchemaLoader`] ties the pieces together. Each top-level request holds
//! the registry lock from the symbol snapshot until the last file is
//! registered:
//!
//! 1. snapshot already-live symbols ([`build_symbol_index`])
//! 2. rewrite the bundle onto canonical paths ([`rewrite_bundle`])
//! 3. resolve depth-first, synthesizing new files ([`Resolver`])
//!
//! A failure part way keeps whatever was registered before it.

use crate::bundle::{DescriptorBundle, SymbolKind};
use crate::config::{ConfigError, LoaderConfig};
use crate::definition::{CdrSchemaCompiler, SchemaCompiler};
use crate::dynamic::TypeDescriptor;
use crate::error::{LoadError, Result};
use crate::mapper::build_symbol_index;
use crate::registry::{FileBinding, LiveRegistry, MemoryStore, SchemaStore};
use crate::resolver::Resolver;
use crate::rewrite::rewrite_bundle;
use std::sync::Arc;

/// Loads descriptor bundles into a [`LiveRegistry`].
pub struct SchemaLoader<S: SchemaStore = MemoryStore> {
    registry: Arc<LiveRegistry<S>>,
    compiler: Arc<dyn SchemaCompiler>,
    config: LoaderConfig,
}

impl<S: SchemaStore> Clone for SchemaLoader<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            compiler: self.compiler.clone(),
            config: self.config.clone(),
        }
    }
}

impl SchemaLoader<MemoryStore> {
    /// Loader over a fresh in-memory registry with default settings.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(LiveRegistry::new()))
    }
}

impl Default for SchemaLoader<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SchemaStore> SchemaLoader<S> {
    /// Loader sharing an existing registry.
    pub fn with_registry(registry: Arc<LiveRegistry<S>>) -> Self {
        Self {
            registry,
            compiler: Arc::new(CdrSchemaCompiler),
            config: LoaderConfig::default(),
        }
    }

    /// Replace the schema compiler.
    pub fn with_compiler(mut self, compiler: impl SchemaCompiler + 'static) -> Self {
        self.compiler = Arc::new(compiler);
        self
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: LoaderConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn registry(&self) -> &Arc<LiveRegistry<S>> {
        &self.registry
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the file named by a module-style request (`foo.bar_generated`).
    ///
    /// The name is checked against the configured suffix before the bundle
    /// is looked at.
    pub fn load_module(
        &self,
        module_name: &str,
        bundle: &DescriptorBundle,
    ) -> Result<Arc<FileBinding>> {
        let file_name =
            self.config
                .module_to_file_name(module_name)
                .ok_or_else(|| LoadError::NameFormat {
                    name: module_name.to_string(),
                    suffix: self.config.module_suffix.clone(),
                })?;
        self.load_file(&file_name, bundle)
    }

    /// Load one file of `bundle` (by its bundle path) and its imports.
    ///
    /// Returns the binding of the file's canonical path, which differs from
    /// `file_name` when the file duplicates an already-live schema.
    pub fn load_file(&self, file_name: &str, bundle: &DescriptorBundle) -> Result<Arc<FileBinding>> {
        let compiler = self.compiler.as_ref();
        let strict = self.config.strict_symbols;
        self.registry.transaction(|store| {
            let index = build_symbol_index(bundle, &*store);
            let (map, rewritten) = rewrite_bundle(bundle, &index)?;
            let canonical = map.canonical(file_name);
            log::debug!("[loader] loading {} as {}", file_name, canonical);
            Resolver::new(store, &rewritten, compiler)
                .strict_symbols(strict)
                .resolve(canonical)
        })
    }

    /// Load every file of `bundle` in one request.
    ///
    /// Returns one binding per distinct canonical path, in bundle order.
    pub fn load_bundle(&self, bundle: &DescriptorBundle) -> Result<Vec<Arc<FileBinding>>> {
        let compiler = self.compiler.as_ref();
        let strict = self.config.strict_symbols;
        self.registry.transaction(|store| {
            let index = build_symbol_index(bundle, &*store);
            let (_, rewritten) = rewrite_bundle(bundle, &index)?;
            let mut resolver = Resolver::new(store, &rewritten, compiler).strict_symbols(strict);
            let bindings = rewritten
                .iter()
                .map(|file| resolver.resolve(&file.name))
                .collect::<Result<Vec<_>>>()?;
            log::info!("[loader] bundle of {} files loaded", bindings.len());
            Ok(bindings)
        })
    }

    /// Load the bundle file declaring `full_name` as a top-level message and
    /// return the realized type.
    pub fn load_message_type(
        &self,
        full_name: &str,
        bundle: &DescriptorBundle,
    ) -> Result<Arc<TypeDescriptor>> {
        let not_found = || LoadError::SymbolNotFound {
            name: full_name.to_string(),
        };
        let file = bundle
            .file_declaring(full_name, SymbolKind::Message)
            .ok_or_else(not_found)?;
        let binding = self.load_file(&file.name, bundle)?;
        binding
            .message(full_name)
            .cloned()
            .or_else(|| {
                self.registry
                    .find_type(full_name)
                    .filter(|d| d.is_message())
            })
            .ok_or_else(not_found)
    }
}
