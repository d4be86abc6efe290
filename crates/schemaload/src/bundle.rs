// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor bundles: the unit in which schema files arrive at runtime.
//!
//! A [`DescriptorBundle`] is an ordered list of [`SchemaFile`] entries. Each
//! entry names its top-level symbols and its imports up front, so
//! reconciliation against the live registry never has to parse definition
//! bytes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of a top-level symbol declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Message,
    Enum,
    Service,
    Extension,
}

/// One top-level symbol declared by a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDecl {
    /// Simple (unqualified) name.
    pub name: String,
    pub kind: SymbolKind,
}

impl SymbolDecl {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Join a package and a simple name into a fully-qualified name.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// A single schema file entry of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Slash-separated file path; the file identity.
    pub name: String,
    /// Declaring package (dotted, may be empty).
    #[serde(default)]
    pub package: String,
    /// Top-level symbols in declaration order.
    #[serde(default)]
    pub symbols: Vec<SymbolDecl>,
    /// Imported file paths in declaration order.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Opaque compiled definition.
    #[serde(default)]
    pub definition_bytes: Vec<u8>,
}

impl SchemaFile {
    /// Create an empty file entry.
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            symbols: Vec::new(),
            dependencies: Vec::new(),
            definition_bytes: Vec::new(),
        }
    }

    /// Add a top-level symbol declaration.
    pub fn with_symbol(mut self, name: impl Into<String>, kind: SymbolKind) -> Self {
        self.symbols.push(SymbolDecl::new(name, kind));
        self
    }

    /// Add an import.
    pub fn with_dependency(mut self, path: impl Into<String>) -> Self {
        self.dependencies.push(path.into());
        self
    }

    /// Set the definition bytes.
    pub fn with_definition(mut self, bytes: Vec<u8>) -> Self {
        self.definition_bytes = bytes;
        self
    }

    /// Fully-qualified name of a symbol declared in this file's package.
    pub fn qualify(&self, name: &str) -> String {
        qualify(&self.package, name)
    }

    /// Iterate `(fully-qualified name, declaration)` pairs in order.
    pub fn qualified_symbols(&self) -> impl Iterator<Item = (String, &SymbolDecl)> + '_ {
        self.symbols.iter().map(move |s| (self.qualify(&s.name), s))
    }

    /// Whether this file declares `full_name` as a top-level symbol,
    /// optionally restricted to one kind.
    pub fn declares(&self, full_name: &str, kind: Option<SymbolKind>) -> bool {
        self.symbols.iter().any(|s| {
            kind.map_or(true, |k| k == s.kind) && self.qualify(&s.name) == full_name
        })
    }
}

/// An ordered collection of schema files delivered as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorBundle {
    #[serde(default)]
    pub files: Vec<SchemaFile>,
}

impl DescriptorBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle from files in order.
    pub fn from_files(files: Vec<SchemaFile>) -> Self {
        Self { files }
    }

    /// Append a file.
    pub fn push(&mut self, file: SchemaFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaFile> {
        self.files.iter()
    }

    /// First file with the given path.
    pub fn file(&self, name: &str) -> Option<&SchemaFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// First file declaring `full_name` as a top-level symbol of `kind`.
    pub fn file_declaring(&self, full_name: &str, kind: SymbolKind) -> Option<&SchemaFile> {
        self.files.iter().find(|f| f.declares(full_name, Some(kind)))
    }

    /// Append every file of `other` whose path is not present yet.
    ///
    /// Returns the number of files added.
    pub fn merge(&mut self, other: DescriptorBundle) -> usize {
        let mut known: HashSet<String> = self.files.iter().map(|f| f.name.clone()).collect();
        let mut added = 0;
        for file in other.files {
            if known.insert(file.name.clone()) {
                self.files.push(file);
                added += 1;
            }
        }
        added
    }

    /// Parse the JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render the JSON wire shape.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a DescriptorBundle {
    type Item = &'a SchemaFile;
    type IntoIter = std::slice::Iter<'a, SchemaFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
