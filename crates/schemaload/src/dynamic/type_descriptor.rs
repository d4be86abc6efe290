// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for synthesized schema types.

use crate::definition::ScalarType;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
}

impl PrimitiveKind {
    /// Get the size in bytes (None for strings and byte blobs).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool => Some(1),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::String | Self::Bytes => None,
        }
    }

    /// Get CDR alignment requirement.
    pub fn alignment(&self) -> usize {
        match self {
            Self::Bool => 1,
            Self::I32 | Self::U32 | Self::F32 | Self::String | Self::Bytes => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }
}

impl From<ScalarType> for PrimitiveKind {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Bool => Self::Bool,
            ScalarType::Int32 => Self::I32,
            ScalarType::Int64 => Self::I64,
            ScalarType::Uint32 => Self::U32,
            ScalarType::Uint64 => Self::U64,
            ScalarType::Float => Self::F32,
            ScalarType::Double => Self::F64,
            ScalarType::String => Self::String,
            ScalarType::Bytes => Self::Bytes,
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Message with numbered fields.
    Message(Vec<FieldDescriptor>),
    /// Repeated element type.
    Sequence(Arc<TypeDescriptor>),
    /// Enumeration.
    Enum(EnumDescriptor),
}

/// A complete type descriptor.
///
/// Message and enum descriptors carry their fully-qualified name; primitive
/// and sequence descriptors carry the schema spelling of their type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        let name = match kind {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I32 => "int32",
            PrimitiveKind::I64 => "int64",
            PrimitiveKind::U32 => "uint32",
            PrimitiveKind::U64 => "uint64",
            PrimitiveKind::F32 => "float",
            PrimitiveKind::F64 => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Bytes => "bytes",
        };
        Self::new(name, TypeKind::Primitive(kind))
    }

    /// Create a message type descriptor.
    pub fn message(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Message(fields))
    }

    /// Create a repeated type descriptor around `element`.
    pub fn sequence(element: Arc<TypeDescriptor>) -> Self {
        Self::new(format!("repeated {}", element.name), TypeKind::Sequence(element))
    }

    /// Create an enum type descriptor.
    pub fn enumeration(name: impl Into<String>, desc: EnumDescriptor) -> Self {
        Self::new(name, TypeKind::Enum(desc))
    }

    /// Check if this is a message type.
    pub fn is_message(&self) -> bool {
        matches!(self.kind, TypeKind::Message(_))
    }

    /// Check if this is an enum type.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    /// Get fields if this is a message.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Message(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field by number.
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.number == number)
    }

    /// Get alignment requirement.
    pub fn alignment(&self) -> usize {
        match &self.kind {
            TypeKind::Primitive(p) => p.alignment(),
            TypeKind::Message(fields) => fields
                .iter()
                .map(|f| f.type_desc.alignment())
                .max()
                .unwrap_or(1),
            TypeKind::Sequence(_) | TypeKind::Enum(_) => 4,
        }
    }
}

/// Field descriptor for message members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field number from the schema.
    pub number: u32,
    /// Field type. Message-typed fields share the registered descriptor.
    pub type_desc: Arc<TypeDescriptor>,
    /// Explicit presence (absent values are `Null`).
    pub optional: bool,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, number: u32, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            number,
            type_desc,
            optional: false,
        }
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i32) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Variant value.
    pub value: i32,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
