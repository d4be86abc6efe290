// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type synthesis.
//!
//! Turns one resolved schema file into concrete [`TypeDescriptor`]s and
//! registers them as a single [`FileBinding`]. Every import of the file
//! must already be registered.
//!
//! Type references follow the usual scoping rule: a name with a leading
//! `.` is fully qualified; anything else is looked up from the innermost
//! enclosing scope outwards (`pkg.Outer.Ref`, then `pkg.Ref`, then `Ref`).

use crate::bundle::{qualify, SchemaFile};
use crate::definition::{EnumDef, FieldType, Label, MessageDef, SchemaCompiler};
use crate::dynamic::{EnumDescriptor, EnumVariant, FieldDescriptor, TypeDescriptor};
use crate::error::{LoadError, Result};
use crate::registry::{FileBinding, SchemaStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building types for one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A field references a type that is neither local nor imported.
    #[error("{file}: unresolved type reference {name:?}")]
    UnresolvedType { file: String, name: String },

    /// Messages that contain themselves, directly or through other fields.
    #[error("{file}: recursive message type {name}")]
    RecursiveType { file: String, name: String },

    /// The bundle entry lists a symbol its definition does not contain.
    #[error("{file}: declared symbol {symbol} missing from definition")]
    UndeclaredSymbol { file: String, symbol: String },

    /// The definition contains a top-level symbol the bundle entry omits.
    #[error("{file}: definition symbol {symbol} missing from the bundle entry")]
    UnlistedSymbol { file: String, symbol: String },

    /// Bundle entry and definition disagree on the package.
    #[error("{file}: package {declared:?} does not match definition package {defined:?}")]
    PackageMismatch {
        file: String,
        declared: String,
        defined: String,
    },

    /// Two types of one file share a full name.
    #[error("{file}: type {name} defined twice")]
    DuplicateType { file: String, name: String },
}

/// Build and register the types of `file`.
///
/// Must be called at most once per canonical path, after all of the file's
/// imports are registered in `store`.
pub fn synthesize<S: SchemaStore + ?Sized>(
    file: &SchemaFile,
    store: &mut S,
    compiler: &dyn SchemaCompiler,
    strict_symbols: bool,
) -> Result<Arc<FileBinding>> {
    let definition = compiler
        .compile(file)
        .map_err(|source| LoadError::Definition {
            path: file.name.clone(),
            source,
        })?;

    if strict_symbols {
        if definition.package != file.package {
            return Err(SynthesisError::PackageMismatch {
                file: file.name.clone(),
                declared: file.package.clone(),
                defined: definition.package.clone(),
            }
            .into());
        }
        for decl in &file.symbols {
            if !definition.declares(&decl.name, decl.kind) {
                return Err(SynthesisError::UndeclaredSymbol {
                    file: file.name.clone(),
                    symbol: file.qualify(&decl.name),
                }
                .into());
            }
        }
        // Every top-level definition symbol must be listed by the entry.
        for decl in definition.top_level_symbols() {
            if !file.symbols.contains(&decl) {
                return Err(SynthesisError::UnlistedSymbol {
                    file: file.name.clone(),
                    symbol: file.qualify(&decl.name),
                }
                .into());
            }
        }
    }

    let imported = imported_types(file, &*store)?;

    let mut synth = Synthesizer::new(&file.name, imported);
    for message in &definition.messages {
        synth.collect_message(&file.package, message)?;
    }
    for e in &definition.enums {
        synth.collect_enum(&file.package, e)?;
    }

    let mut binding = FileBinding::new(file);
    for desc in synth.build_all()? {
        binding = binding.with_type(desc);
    }
    let binding = binding
        .with_services(definition.services)
        .with_extensions(definition.extensions);

    log::debug!("[synth] built types for {}", file.name);
    Ok(store.register(binding)?)
}

/// Types visible from `file` through its transitive imports.
fn imported_types<S: SchemaStore + ?Sized>(
    file: &SchemaFile,
    store: &S,
) -> Result<HashMap<String, Arc<TypeDescriptor>>> {
    let mut types = HashMap::new();
    let mut seen = HashSet::new();
    let mut pending: Vec<String> = file.dependencies.clone();

    while let Some(path) = pending.pop() {
        if !seen.insert(path.clone()) {
            continue;
        }
        let binding = store
            .get(&path)
            .ok_or_else(|| LoadError::SchemaNotFound { path: path.clone() })?;
        for desc in binding.types() {
            types.entry(desc.name.clone()).or_insert_with(|| desc.clone());
        }
        pending.extend(binding.dependencies().iter().cloned());
    }
    Ok(types)
}

/// Candidate full names for `reference` seen from `scope`, innermost first.
fn candidates(reference: &str, scope: &str) -> Vec<String> {
    if let Some(absolute) = reference.strip_prefix('.') {
        return vec![absolute.to_string()];
    }
    let mut out = Vec::new();
    let mut scope = scope;
    loop {
        out.push(qualify(scope, reference));
        if scope.is_empty() {
            break;
        }
        scope = match scope.rfind('.') {
            Some(pos) => &scope[..pos],
            None => "",
        };
    }
    out
}

struct Synthesizer<'d> {
    file: &'d str,
    imported: HashMap<String, Arc<TypeDescriptor>>,
    /// Local messages in declaration order (nested after their parent).
    messages: Vec<(String, &'d MessageDef)>,
    message_index: HashMap<String, usize>,
    enums: HashMap<String, Arc<TypeDescriptor>>,
    enum_order: Vec<String>,
    built: HashMap<String, Arc<TypeDescriptor>>,
    visiting: HashSet<String>,
}

impl<'d> Synthesizer<'d> {
    fn new(file: &'d str, imported: HashMap<String, Arc<TypeDescriptor>>) -> Self {
        Self {
            file,
            imported,
            messages: Vec::new(),
            message_index: HashMap::new(),
            enums: HashMap::new(),
            enum_order: Vec::new(),
            built: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    fn duplicate(&self, name: &str) -> bool {
        self.message_index.contains_key(name) || self.enums.contains_key(name)
    }

    fn collect_message(&mut self, scope: &str, message: &'d MessageDef) -> Result<()> {
        let full = qualify(scope, &message.name);
        if self.duplicate(&full) {
            return Err(SynthesisError::DuplicateType {
                file: self.file.to_string(),
                name: full,
            }
            .into());
        }
        self.message_index.insert(full.clone(), self.messages.len());
        self.messages.push((full.clone(), message));

        for nested in &message.nested_messages {
            self.collect_message(&full, nested)?;
        }
        for nested in &message.nested_enums {
            self.collect_enum(&full, nested)?;
        }
        Ok(())
    }

    fn collect_enum(&mut self, scope: &str, e: &EnumDef) -> Result<()> {
        let full = qualify(scope, &e.name);
        if self.duplicate(&full) {
            return Err(SynthesisError::DuplicateType {
                file: self.file.to_string(),
                name: full,
            }
            .into());
        }
        let variants = e
            .values
            .iter()
            .map(|v| EnumVariant::new(v.name.clone(), v.number))
            .collect();
        let desc = TypeDescriptor::enumeration(full.clone(), EnumDescriptor::new(variants));
        self.enums.insert(full.clone(), Arc::new(desc));
        self.enum_order.push(full);
        Ok(())
    }

    fn is_known(&self, full: &str) -> bool {
        self.message_index.contains_key(full)
            || self.enums.contains_key(full)
            || self.imported.contains_key(full)
    }

    fn resolve_reference(&self, reference: &str, scope: &str) -> Result<String> {
        candidates(reference, scope)
            .into_iter()
            .find(|c| self.is_known(c))
            .ok_or_else(|| {
                SynthesisError::UnresolvedType {
                    file: self.file.to_string(),
                    name: reference.to_string(),
                }
                .into()
            })
    }

    fn unresolved(&self, reference: &str) -> LoadError {
        SynthesisError::UnresolvedType {
            file: self.file.to_string(),
            name: reference.to_string(),
        }
        .into()
    }

    /// Build every local type; messages are emitted after the local
    /// messages they contain.
    fn build_all(mut self) -> Result<Vec<Arc<TypeDescriptor>>> {
        let mut out = Vec::with_capacity(self.messages.len() + self.enum_order.len());
        for name in &self.enum_order {
            if let Some(desc) = self.enums.get(name) {
                out.push(desc.clone());
            }
        }
        let names: Vec<String> = self.messages.iter().map(|(n, _)| n.clone()).collect();
        for name in names {
            out.push(self.build_message(&name)?);
        }
        Ok(out)
    }

    fn build_message(&mut self, full: &str) -> Result<Arc<TypeDescriptor>> {
        if let Some(desc) = self.built.get(full) {
            return Ok(desc.clone());
        }
        if !self.visiting.insert(full.to_string()) {
            return Err(SynthesisError::RecursiveType {
                file: self.file.to_string(),
                name: full.to_string(),
            }
            .into());
        }

        let index = self.message_index[full];
        let message: &'d MessageDef = self.messages[index].1;

        let mut fields = Vec::with_capacity(message.fields.len());
        for field in &message.fields {
            let base = self.field_type(&field.field_type, full)?;
            let type_desc = match field.label {
                Label::Repeated => Arc::new(TypeDescriptor::sequence(base)),
                Label::Singular | Label::Optional => base,
            };
            let mut fd = FieldDescriptor::new(field.name.clone(), field.number, type_desc);
            if field.label == Label::Optional {
                fd = fd.optional();
            }
            fields.push(fd);
        }

        self.visiting.remove(full);
        let desc = Arc::new(TypeDescriptor::message(full, fields));
        self.built.insert(full.to_string(), desc.clone());
        Ok(desc)
    }

    fn field_type(&mut self, field_type: &FieldType, scope: &str) -> Result<Arc<TypeDescriptor>> {
        match field_type {
            FieldType::Scalar(scalar) => Ok(Arc::new(TypeDescriptor::primitive((*scalar).into()))),
            FieldType::Message(reference) => {
                let full = self.resolve_reference(reference, scope)?;
                if self.message_index.contains_key(&full) {
                    return self.build_message(&full);
                }
                self.imported
                    .get(&full)
                    .filter(|d| d.is_message())
                    .cloned()
                    .ok_or_else(|| self.unresolved(reference))
            }
            FieldType::Enum(reference) => {
                let full = self.resolve_reference(reference, scope)?;
                self.enums
                    .get(&full)
                    .or_else(|| self.imported.get(&full))
                    .filter(|d| d.is_enum())
                    .cloned()
                    .ok_or_else(|| self.unresolved(reference))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::SymbolKind;
    use crate::definition::{
        CdrSchemaCompiler, EnumBuilder, FileBuilder, MessageBuilder, ScalarType,
    };
    use crate::registry::MemoryStore;

    #[test]
    fn test_candidates_walk_outwards() {
        assert_eq!(
            candidates("Ref", "pkg.Outer"),
            vec!["pkg.Outer.Ref", "pkg.Ref", "Ref"]
        );
        assert_eq!(candidates(".abs.Ref", "pkg.Outer"), vec!["abs.Ref"]);
        assert_eq!(candidates("Ref", ""), vec!["Ref"]);
    }

    #[test]
    fn test_nested_and_out_of_order_messages() {
        let file = FileBuilder::new("a.schema", "pkg")
            .message(
                MessageBuilder::new("Outer")
                    .message_field("later", "Later")
                    .message_field("inner", "Inner")
                    .enum_field("kind", "Kind")
                    .nested_message(MessageBuilder::new("Inner").field("v", ScalarType::Bool))
                    .nested_enum(EnumBuilder::new("Kind").variant("A")),
            )
            .message(MessageBuilder::new("Later").repeated_field("xs", ScalarType::Int64))
            .build()
            .expect("build");

        let mut store = MemoryStore::new();
        let binding = synthesize(&file, &mut store, &CdrSchemaCompiler, true).expect("synth");

        let outer = binding.message("pkg.Outer").expect("outer");
        let later = binding.message("pkg.Later").expect("later");
        let later_field = outer.field("later").expect("field");
        assert!(Arc::ptr_eq(&later_field.type_desc, later));
        assert!(binding.message("pkg.Outer.Inner").is_some());
        assert!(binding.get_type("pkg.Outer.Kind").map_or(false, |d| d.is_enum()));
        assert_eq!(store.symbol_path("pkg.Outer").as_deref(), Some("a.schema"));
        assert!(store.symbol_path("pkg.Outer.Inner").is_none());
        assert!(store.find_type("pkg.Outer.Inner").is_some());
    }

    #[test]
    fn test_recursive_message_is_rejected() {
        let file = FileBuilder::new("r.schema", "pkg")
            .message(MessageBuilder::new("A").message_field("b", "B"))
            .message(MessageBuilder::new("B").message_field("a", "A"))
            .build()
            .expect("build");
        let mut store = MemoryStore::new();
        let err = synthesize(&file, &mut store, &CdrSchemaCompiler, true).expect_err("recursive");
        assert!(matches!(
            err,
            LoadError::Synthesis(SynthesisError::RecursiveType { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unresolved_reference() {
        let file = FileBuilder::new("u.schema", "pkg")
            .message(MessageBuilder::new("A").message_field("x", ".pkg.Nowhere"))
            .build()
            .expect("build");
        let mut store = MemoryStore::new();
        let err = synthesize(&file, &mut store, &CdrSchemaCompiler, true).expect_err("unresolved");
        assert!(matches!(
            err,
            LoadError::Synthesis(SynthesisError::UnresolvedType { .. })
        ));
    }

    #[test]
    fn test_undeclared_symbol_only_when_strict() {
        let file = FileBuilder::new("s.schema", "pkg")
            .message(MessageBuilder::new("A"))
            .build()
            .expect("build")
            .with_symbol("Ghost", SymbolKind::Message);

        let mut store = MemoryStore::new();
        let err = synthesize(&file, &mut store, &CdrSchemaCompiler, true).expect_err("strict");
        assert!(matches!(
            err,
            LoadError::Synthesis(SynthesisError::UndeclaredSymbol { .. })
        ));
        assert!(synthesize(&file, &mut store, &CdrSchemaCompiler, false).is_ok());
    }

    #[test]
    fn test_unlisted_symbol_only_when_strict() {
        let mut file = FileBuilder::new("s.schema", "pkg")
            .message(MessageBuilder::new("A"))
            .enumeration(EnumBuilder::new("Mode").variant("OFF"))
            .build()
            .expect("build");
        file.symbols.retain(|s| s.kind != SymbolKind::Enum);

        let mut store = MemoryStore::new();
        match synthesize(&file, &mut store, &CdrSchemaCompiler, true) {
            Err(LoadError::Synthesis(SynthesisError::UnlistedSymbol { file, symbol })) => {
                assert_eq!(file, "s.schema");
                assert_eq!(symbol, "pkg.Mode");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(store.is_empty());
        assert!(synthesize(&file, &mut store, &CdrSchemaCompiler, false).is_ok());
    }

    #[test]
    fn test_malformed_definition_names_the_file() {
        let file = SchemaFile::new("bad.schema", "pkg").with_definition(vec![1, 2, 3]);
        let mut store = MemoryStore::new();
        match synthesize(&file, &mut store, &CdrSchemaCompiler, true) {
            Err(LoadError::Definition { path, .. }) => assert_eq!(path, "bad.schema"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_message_field_referencing_enum_is_unresolved() {
        let file = FileBuilder::new("k.schema", "pkg")
            .enumeration(EnumBuilder::new("Mode").variant("A"))
            .message(MessageBuilder::new("M").message_field("m", "Mode"))
            .build()
            .expect("build");
        let mut store = MemoryStore::new();
        assert!(synthesize(&file, &mut store, &CdrSchemaCompiler, true).is_err());
    }
}
