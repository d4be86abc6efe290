// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural schema definitions.
//!
//! The definition bytes carried by a [`SchemaFile`](crate::bundle::SchemaFile)
//! are opaque to reconciliation. Only the type synthesizer opens them, through
//! a [`SchemaCompiler`], which turns them into a [`FileDefinition`].
//!
//! # Layout
//!
//! - [`codec`] - compact CDR layout of a `FileDefinition`
//! - [`compiler`] - the `SchemaCompiler` seam and its CDR implementation
//! - [`builder`] - programmatic composition of schema files

pub mod builder;
pub mod codec;
pub mod compiler;

pub use builder::{EnumBuilder, FileBuilder, MessageBuilder, ServiceBuilder};
pub use codec::{decode_definition, encode_definition, DefinitionError};
pub use compiler::{CdrSchemaCompiler, SchemaCompiler};

use crate::bundle::{SymbolDecl, SymbolKind};

/// Scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
    String,
    Bytes,
}

impl ScalarType {
    /// Schema-language spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

/// Type of a field: a scalar or a reference to a named message/enum.
///
/// References hold the name as written in the schema: either
/// fully-qualified with a leading `.` or relative to the enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarType),
    Message(String),
    Enum(String),
}

impl FieldType {
    /// Referenced type name, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::Message(name) | Self::Enum(name) => Some(name),
        }
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Label {
    #[default]
    Singular,
    Optional,
    Repeated,
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub number: u32,
    pub label: Label,
    pub field_type: FieldType,
}

/// A named enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i32,
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumValueDef>,
}

/// A message type with its nested declarations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub nested_messages: Vec<MessageDef>,
    pub nested_enums: Vec<EnumDef>,
}

/// One service method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
}

/// A service declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceDef {
    pub name: String,
    pub methods: Vec<MethodDef>,
}

/// A top-level extension field attached to another message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDef {
    /// Name of the extended message.
    pub extendee: String,
    pub field: FieldDef,
}

/// Parsed structure of one schema file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileDefinition {
    pub package: String,
    pub messages: Vec<MessageDef>,
    pub enums: Vec<EnumDef>,
    pub services: Vec<ServiceDef>,
    pub extensions: Vec<ExtensionDef>,
}

impl FileDefinition {
    /// Create an empty definition for a package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    /// Top-level declarations in the order a bundle lists them:
    /// messages, enums, services, extensions.
    pub fn top_level_symbols(&self) -> Vec<SymbolDecl> {
        let messages = self
            .messages
            .iter()
            .map(|m| SymbolDecl::new(m.name.clone(), SymbolKind::Message));
        let enums = self
            .enums
            .iter()
            .map(|e| SymbolDecl::new(e.name.clone(), SymbolKind::Enum));
        let services = self
            .services
            .iter()
            .map(|s| SymbolDecl::new(s.name.clone(), SymbolKind::Service));
        let extensions = self
            .extensions
            .iter()
            .map(|x| SymbolDecl::new(x.field.name.clone(), SymbolKind::Extension));
        messages.chain(enums).chain(services).chain(extensions).collect()
    }

    /// Whether a top-level symbol with this simple name and kind exists.
    pub fn declares(&self, name: &str, kind: SymbolKind) -> bool {
        match kind {
            SymbolKind::Message => self.messages.iter().any(|m| m.name == name),
            SymbolKind::Enum => self.enums.iter().any(|e| e.name == name),
            SymbolKind::Service => self.services.iter().any(|s| s.name == name),
            SymbolKind::Extension => self.extensions.iter().any(|x| x.field.name == name),
        }
    }
}
