// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for composing schema files programmatically.
//!
//! ```rust
//! use schemaload::definition::{FileBuilder, MessageBuilder, ScalarType};
//!
//! let file = FileBuilder::new("a/b.schema", "pkg")
//!     .message(MessageBuilder::new("Foo").field("x", ScalarType::Int32))
//!     .build()
//!     .unwrap();
//! assert_eq!(file.symbols[0].name, "Foo");
//! ```

use super::codec::{encode_definition, DefinitionError};
use super::{
    EnumDef, EnumValueDef, ExtensionDef, FieldDef, FieldType, FileDefinition, Label, MessageDef,
    MethodDef, ScalarType, ServiceDef,
};
use crate::bundle::SchemaFile;

/// Builder for message definitions.
///
/// Field numbers are assigned in insertion order starting at 1 unless set
/// explicitly with [`field_with_number`](Self::field_with_number).
#[derive(Debug)]
pub struct MessageBuilder {
    def: MessageDef,
    next_number: u32,
}

impl MessageBuilder {
    /// Create a new builder for a message type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: MessageDef {
                name: name.into(),
                ..Default::default()
            },
            next_number: 1,
        }
    }

    fn push(mut self, name: impl Into<String>, label: Label, field_type: FieldType) -> Self {
        let number = self.next_number;
        self.next_number += 1;
        self.def.fields.push(FieldDef {
            name: name.into(),
            number,
            label,
            field_type,
        });
        self
    }

    /// Add a scalar field.
    pub fn field(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.push(name, Label::Singular, FieldType::Scalar(scalar))
    }

    /// Add an optional scalar field.
    pub fn optional_field(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.push(name, Label::Optional, FieldType::Scalar(scalar))
    }

    /// Add a repeated scalar field.
    pub fn repeated_field(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.push(name, Label::Repeated, FieldType::Scalar(scalar))
    }

    /// Add a field with an explicit number and type.
    pub fn field_with_number(
        mut self,
        name: impl Into<String>,
        number: u32,
        label: Label,
        field_type: FieldType,
    ) -> Self {
        self.def.fields.push(FieldDef {
            name: name.into(),
            number,
            label,
            field_type,
        });
        self.next_number = self.next_number.max(number + 1);
        self
    }

    /// Add a message-typed field.
    pub fn message_field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.push(name, Label::Singular, FieldType::Message(type_name.into()))
    }

    /// Add a repeated message-typed field.
    pub fn repeated_message_field(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.push(name, Label::Repeated, FieldType::Message(type_name.into()))
    }

    /// Add an enum-typed field.
    pub fn enum_field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.push(name, Label::Singular, FieldType::Enum(type_name.into()))
    }

    /// Declare a nested message.
    pub fn nested_message(mut self, nested: MessageBuilder) -> Self {
        self.def.nested_messages.push(nested.build());
        self
    }

    /// Declare a nested enum.
    pub fn nested_enum(mut self, nested: EnumBuilder) -> Self {
        self.def.nested_enums.push(nested.build());
        self
    }

    /// Build the MessageDef.
    pub fn build(self) -> MessageDef {
        self.def
    }
}

/// Builder for enum types.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    values: Vec<EnumValueDef>,
    next_value: i32,
}

impl EnumBuilder {
    /// Create a new enum builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            next_value: 0,
        }
    }

    /// Add a variant with auto-incrementing value.
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number: self.next_value,
        });
        self.next_value += 1;
        self
    }

    /// Add a variant with explicit value.
    pub fn variant_value(mut self, name: impl Into<String>, value: i32) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number: value,
        });
        self.next_value = value + 1;
        self
    }

    /// Build the EnumDef.
    pub fn build(self) -> EnumDef {
        EnumDef {
            name: self.name,
            values: self.values,
        }
    }
}

/// Builder for service declarations.
#[derive(Debug)]
pub struct ServiceBuilder {
    def: ServiceDef,
}

impl ServiceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: ServiceDef {
                name: name.into(),
                methods: Vec::new(),
            },
        }
    }

    /// Add a unary method.
    pub fn method(
        mut self,
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        self.def.methods.push(MethodDef {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
        });
        self
    }

    pub fn build(self) -> ServiceDef {
        self.def
    }
}

/// Builder for a whole schema file.
///
/// The resulting [`SchemaFile`] lists exactly the top-level symbols of the
/// definition and carries its encoded bytes.
#[derive(Debug)]
pub struct FileBuilder {
    name: String,
    dependencies: Vec<String>,
    def: FileDefinition,
}

impl FileBuilder {
    /// Create a builder for file `name` in `package`.
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            def: FileDefinition::new(package),
        }
    }

    /// Add an import.
    pub fn dependency(mut self, path: impl Into<String>) -> Self {
        self.dependencies.push(path.into());
        self
    }

    /// Add a top-level message.
    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.def.messages.push(message.build());
        self
    }

    /// Add a top-level enum.
    pub fn enumeration(mut self, e: EnumBuilder) -> Self {
        self.def.enums.push(e.build());
        self
    }

    /// Add a service.
    pub fn service(mut self, s: ServiceBuilder) -> Self {
        self.def.services.push(s.build());
        self
    }

    /// Add a top-level extension of `extendee`.
    pub fn extension(
        mut self,
        extendee: impl Into<String>,
        name: impl Into<String>,
        number: u32,
        scalar: ScalarType,
    ) -> Self {
        self.def.extensions.push(ExtensionDef {
            extendee: extendee.into(),
            field: FieldDef {
                name: name.into(),
                number,
                label: Label::Optional,
                field_type: FieldType::Scalar(scalar),
            },
        });
        self
    }

    /// Access the definition built so far.
    pub fn definition(&self) -> &FileDefinition {
        &self.def
    }

    /// Encode and produce the bundle entry.
    pub fn build(self) -> Result<SchemaFile, DefinitionError> {
        let definition_bytes = encode_definition(&self.def)?;
        Ok(SchemaFile {
            name: self.name,
            package: self.def.package.clone(),
            symbols: self.def.top_level_symbols(),
            dependencies: self.dependencies,
            definition_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::SymbolKind;
    use crate::definition::decode_definition;

    #[test]
    fn test_field_numbers_auto_increment() {
        let msg = MessageBuilder::new("M")
            .field("a", ScalarType::Int32)
            .field_with_number("b", 10, Label::Singular, FieldType::Scalar(ScalarType::Bool))
            .field("c", ScalarType::String)
            .build();
        let numbers: Vec<u32> = msg.fields.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 10, 11]);
    }

    #[test]
    fn test_enum_builder_values() {
        let e = EnumBuilder::new("Color")
            .variant("RED")
            .variant_value("GREEN", 5)
            .variant("BLUE")
            .build();
        let values: Vec<i32> = e.values.iter().map(|v| v.number).collect();
        assert_eq!(values, vec![0, 5, 6]);
    }

    #[test]
    fn test_file_builder_derives_symbols_and_bytes() {
        let file = FileBuilder::new("main.schema", "pkg")
            .dependency("dep.schema")
            .message(MessageBuilder::new("Main").message_field("base", ".pkg.Base"))
            .enumeration(EnumBuilder::new("Mode").variant("A"))
            .service(ServiceBuilder::new("Api").method("Get", ".pkg.Main", ".pkg.Main"))
            .build()
            .expect("build");

        assert_eq!(file.dependencies, vec!["dep.schema".to_string()]);
        let kinds: Vec<_> = file.symbols.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SymbolKind::Message, SymbolKind::Enum, SymbolKind::Service]
        );

        let def = decode_definition(&file.definition_bytes).expect("decode");
        assert_eq!(def.package, "pkg");
        assert_eq!(def.messages[0].fields[0].field_type.type_name(), Some(".pkg.Base"));
    }
}
