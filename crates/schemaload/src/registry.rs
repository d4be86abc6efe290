// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Live registry of realized schema files.
//!
//! The registry is append-only: a canonical path is inserted at most once
//! and never removed or replaced. Storage sits behind [`SchemaStore`] so
//! tests can run several independent registries side by side.

use crate::bundle::{qualify, DescriptorBundle, SchemaFile, SymbolDecl};
use crate::definition::{ExtensionDef, ServiceDef};
use crate::dynamic::TypeDescriptor;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Errors produced by the live registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The canonical path is already registered.
    #[error("canonical path {path:?} is already registered")]
    AlreadyRegistered { path: String },

    /// A top-level symbol is already owned by another canonical path.
    #[error("symbol {symbol:?} is already registered by {path:?}")]
    DuplicateSymbol { symbol: String, path: String },

    /// A realized type (top-level or nested) already exists under that name.
    #[error("type {name:?} is already registered")]
    DuplicateType { name: String },

    /// Nothing registered under that name.
    #[error("not registered: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// FileBinding
// ---------------------------------------------------------------------------

/// Realized types of one canonical schema file.
#[derive(Debug, Clone)]
pub struct FileBinding {
    path: String,
    package: String,
    dependencies: Vec<String>,
    symbols: Vec<SymbolDecl>,
    types: BTreeMap<String, Arc<TypeDescriptor>>,
    services: Vec<ServiceDef>,
    extensions: Vec<ExtensionDef>,
    definition_bytes: Vec<u8>,
}

impl FileBinding {
    /// Start a binding for an already-rewritten bundle file.
    pub fn new(file: &SchemaFile) -> Self {
        Self {
            path: file.name.clone(),
            package: file.package.clone(),
            dependencies: file.dependencies.clone(),
            symbols: file.symbols.clone(),
            types: BTreeMap::new(),
            services: Vec::new(),
            extensions: Vec::new(),
            definition_bytes: file.definition_bytes.clone(),
        }
    }

    /// Add a realized message or enum type, keyed by its full name.
    pub fn with_type(mut self, desc: Arc<TypeDescriptor>) -> Self {
        self.types.insert(desc.name.clone(), desc);
        self
    }

    pub fn with_services(mut self, services: Vec<ServiceDef>) -> Self {
        self.services = services;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<ExtensionDef>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Canonical path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Canonical paths of direct imports.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Declared top-level symbols.
    pub fn symbols(&self) -> &[SymbolDecl] {
        &self.symbols
    }

    /// Fully-qualified names of the top-level symbols.
    pub fn qualified_symbols(&self) -> impl Iterator<Item = String> + '_ {
        self.symbols.iter().map(move |s| qualify(&self.package, &s.name))
    }

    /// Realized type for a message or enum (nested ones included).
    pub fn get_type(&self, full_name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(full_name)
    }

    /// Realized message type.
    pub fn message(&self, full_name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.get_type(full_name).filter(|d| d.is_message())
    }

    /// All realized types, ordered by name.
    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    pub fn services(&self) -> &[ServiceDef] {
        &self.services
    }

    pub fn extensions(&self) -> &[ExtensionDef] {
        &self.extensions
    }

    /// Bundle entry equivalent to this binding.
    pub fn to_schema_file(&self) -> SchemaFile {
        SchemaFile {
            name: self.path.clone(),
            package: self.package.clone(),
            symbols: self.symbols.clone(),
            dependencies: self.dependencies.clone(),
            definition_bytes: self.definition_bytes.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaStore trait + HashMap implementation
// ---------------------------------------------------------------------------

/// Storage behind a [`LiveRegistry`].
///
/// Implementors provide plain storage; [`register`](Self::register) layers
/// the append-only checks on top.
pub trait SchemaStore: Send {
    /// Binding stored at a canonical path.
    fn get(&self, path: &str) -> Option<Arc<FileBinding>>;

    /// Store a binding without any checks.
    fn insert(&mut self, binding: Arc<FileBinding>);

    /// Canonical path owning a top-level symbol.
    fn symbol_path(&self, full_name: &str) -> Option<String>;

    /// Realized type for any registered message or enum.
    fn find_type(&self, full_name: &str) -> Option<Arc<TypeDescriptor>>;

    /// Canonical paths in registration order.
    fn paths(&self) -> Vec<String>;

    /// Number of registered files.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Insert a new canonical file.
    ///
    /// Fails when the path is present, when one of its top-level symbols
    /// is already owned by another path, or when one of its types already
    /// exists under the same full name. Nothing is stored on failure.
    fn register(&mut self, binding: FileBinding) -> Result<Arc<FileBinding>, RegistryError> {
        if self.contains(binding.path()) {
            return Err(RegistryError::AlreadyRegistered {
                path: binding.path().to_string(),
            });
        }
        for symbol in binding.qualified_symbols() {
            if let Some(path) = self.symbol_path(&symbol) {
                return Err(RegistryError::DuplicateSymbol { symbol, path });
            }
        }
        // Nested types never show up as symbols, so check realized names too.
        if let Some(desc) = binding.types().find(|d| self.find_type(&d.name).is_some()) {
            return Err(RegistryError::DuplicateType {
                name: desc.name.clone(),
            });
        }

        let binding = Arc::new(binding);
        self.insert(binding.clone());
        log::debug!(
            "[registry] registered {} ({} symbols, {} types)",
            binding.path(),
            binding.symbols().len(),
            binding.types.len()
        );
        Ok(binding)
    }
}

/// Simple [`HashMap`]-backed [`SchemaStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: HashMap<String, Arc<FileBinding>>,
    order: Vec<String>,
    symbols: HashMap<String, String>,
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaStore for MemoryStore {
    fn get(&self, path: &str) -> Option<Arc<FileBinding>> {
        self.files.get(path).cloned()
    }

    fn insert(&mut self, binding: Arc<FileBinding>) {
        let path = binding.path().to_string();
        for symbol in binding.qualified_symbols() {
            self.symbols.insert(symbol, path.clone());
        }
        for desc in binding.types() {
            self.types.insert(desc.name.clone(), desc.clone());
        }
        if self.files.insert(path.clone(), binding).is_none() {
            self.order.push(path);
        }
    }

    fn symbol_path(&self, full_name: &str) -> Option<String> {
        self.symbols.get(full_name).cloned()
    }

    fn find_type(&self, full_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(full_name).cloned()
    }

    fn paths(&self) -> Vec<String> {
        self.order.clone()
    }

    fn len(&self) -> usize {
        self.files.len()
    }
}

// ---------------------------------------------------------------------------
// LiveRegistry
// ---------------------------------------------------------------------------

/// Process-wide store of realized schema files, guarded by one lock.
///
/// A top-level load holds the lock for its whole duration (see
/// [`transaction`](Self::transaction)), so no other load can observe a
/// dependency registered without its dependent.
pub struct LiveRegistry<S: SchemaStore = MemoryStore> {
    store: Mutex<S>,
}

impl LiveRegistry<MemoryStore> {
    /// Registry backed by a fresh [`MemoryStore`].
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for LiveRegistry<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SchemaStore> LiveRegistry<S> {
    /// Registry backed by a caller-supplied store.
    pub fn with_store(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Binding registered at a canonical path.
    pub fn lookup(&self, path: &str) -> Option<Arc<FileBinding>> {
        self.store.lock().get(path)
    }

    /// Register a binding outside of a load request.
    pub fn register(&self, binding: FileBinding) -> Result<Arc<FileBinding>, RegistryError> {
        self.store.lock().register(binding)
    }

    /// Canonical path owning a top-level symbol.
    pub fn symbol_path(&self, full_name: &str) -> Option<String> {
        self.store.lock().symbol_path(full_name)
    }

    /// Realized type for any registered message or enum.
    pub fn find_type(&self, full_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.store.lock().find_type(full_name)
    }

    /// Canonical paths in registration order.
    pub fn paths(&self) -> Vec<String> {
        self.store.lock().paths()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Rebuild a self-contained bundle for the file declaring `full_name`.
    ///
    /// The bundle lists every transitive import before the files that use
    /// it, ending with the declaring file.
    pub fn export_bundle(&self, full_name: &str) -> Result<DescriptorBundle, RegistryError> {
        let store = self.store.lock();
        let root = store
            .symbol_path(full_name)
            .ok_or_else(|| RegistryError::NotFound(full_name.to_string()))?;

        let mut bundle = DescriptorBundle::new();
        let mut seen = HashSet::new();
        collect_closure(&*store, &root, &mut seen, &mut bundle)?;
        Ok(bundle)
    }

    /// Run `f` with exclusive access to the store.
    pub(crate) fn transaction<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.store.lock();
        f(&mut guard)
    }
}

fn collect_closure<S: SchemaStore + ?Sized>(
    store: &S,
    path: &str,
    seen: &mut HashSet<String>,
    bundle: &mut DescriptorBundle,
) -> Result<(), RegistryError> {
    if !seen.insert(path.to_string()) {
        return Ok(());
    }
    let binding = store
        .get(path)
        .ok_or_else(|| RegistryError::NotFound(path.to_string()))?;
    for dep in binding.dependencies() {
        collect_closure(store, dep, seen, bundle)?;
    }
    bundle.push(binding.to_schema_file());
    Ok(())
}
