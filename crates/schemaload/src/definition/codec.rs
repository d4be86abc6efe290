// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR layout of a [`FileDefinition`].
//!
//! Little-endian, CDR-aligned:
//!
//! ```text
//! "SDEF" | version:u16 | pad:u16
//! package:string
//! messages:seq<Message> enums:seq<Enum> services:seq<Service> extensions:seq<Extension>
//!
//! string   = len:u32 (including NUL) | utf8 bytes | NUL
//! seq<T>   = count:u32 | T...
//! Field    = name:string | number:u32 | label:u8 | tag:u8 [| type_name:string]
//! ```

use super::{
    EnumDef, EnumValueDef, ExtensionDef, FieldDef, FieldType, FileDefinition, Label, MessageDef,
    MethodDef, ScalarType, ServiceDef,
};
use thiserror::Error;

const MAGIC: &[u8; 4] = b"SDEF";
const VERSION: u16 = 1;

/// Nested message depth accepted by the decoder.
const MAX_NESTING_DEPTH: usize = 64;

const TAG_MESSAGE: u8 = 10;
const TAG_ENUM: u8 = 11;

/// Errors decoding definition bytes.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("definition is empty")]
    Empty,

    #[error("bad magic: expected SDEF")]
    BadMagic,

    #[error("unsupported definition version {0}")]
    UnsupportedVersion(u16),

    #[error("truncated definition: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("invalid {what} tag {tag}")]
    InvalidTag { what: &'static str, tag: u8 },

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("{0} trailing bytes after definition")]
    TrailingBytes(usize),

    #[error("nested messages deeper than {} levels", MAX_NESTING_DEPTH)]
    NestingTooDeep,

    #[error("length {0} does not fit the CDR u32 length field")]
    LengthOverflow(usize),
}

/// Encode a definition to bytes.
pub fn encode_definition(def: &FileDefinition) -> Result<Vec<u8>, DefinitionError> {
    let mut w = CdrWriter::new();
    w.buffer.extend_from_slice(MAGIC);
    w.write_u16(VERSION);
    w.write_string(&def.package)?;
    w.write_len(def.messages.len())?;
    for m in &def.messages {
        w.write_message(m)?;
    }
    w.write_len(def.enums.len())?;
    for e in &def.enums {
        w.write_enum(e)?;
    }
    w.write_len(def.services.len())?;
    for s in &def.services {
        w.write_service(s)?;
    }
    w.write_len(def.extensions.len())?;
    for x in &def.extensions {
        w.write_string(&x.extendee)?;
        w.write_field(&x.field)?;
    }
    Ok(w.into_bytes())
}

/// Decode bytes produced by [`encode_definition`].
pub fn decode_definition(bytes: &[u8]) -> Result<FileDefinition, DefinitionError> {
    if bytes.is_empty() {
        return Err(DefinitionError::Empty);
    }
    let mut r = CdrReader::new(bytes);
    if r.read_bytes(4)? != MAGIC {
        return Err(DefinitionError::BadMagic);
    }
    let version = r.read_u16()?;
    if version != VERSION {
        return Err(DefinitionError::UnsupportedVersion(version));
    }

    let package = r.read_string()?;
    let count = r.read_len()?;
    let mut messages = Vec::with_capacity(count);
    for _ in 0..count {
        messages.push(r.read_message(0)?);
    }
    let count = r.read_len()?;
    let mut enums = Vec::with_capacity(count);
    for _ in 0..count {
        enums.push(r.read_enum()?);
    }
    let count = r.read_len()?;
    let mut services = Vec::with_capacity(count);
    for _ in 0..count {
        services.push(r.read_service()?);
    }
    let count = r.read_len()?;
    let mut extensions = Vec::with_capacity(count);
    for _ in 0..count {
        let extendee = r.read_string()?;
        let field = r.read_field()?;
        extensions.push(ExtensionDef { extendee, field });
    }

    if r.remaining() > 0 {
        return Err(DefinitionError::TrailingBytes(r.remaining()));
    }

    Ok(FileDefinition {
        package,
        messages,
        enums,
        services,
        extensions,
    })
}

fn scalar_tag(scalar: ScalarType) -> u8 {
    match scalar {
        ScalarType::Bool => 1,
        ScalarType::Int32 => 2,
        ScalarType::Int64 => 3,
        ScalarType::Uint32 => 4,
        ScalarType::Uint64 => 5,
        ScalarType::Float => 6,
        ScalarType::Double => 7,
        ScalarType::String => 8,
        ScalarType::Bytes => 9,
    }
}

fn scalar_from_tag(tag: u8) -> Option<ScalarType> {
    Some(match tag {
        1 => ScalarType::Bool,
        2 => ScalarType::Int32,
        3 => ScalarType::Int64,
        4 => ScalarType::Uint32,
        5 => ScalarType::Uint64,
        6 => ScalarType::Float,
        7 => ScalarType::Double,
        8 => ScalarType::String,
        9 => ScalarType::Bytes,
        _ => return None,
    })
}

fn label_tag(label: Label) -> u8 {
    match label {
        Label::Singular => 0,
        Label::Optional => 1,
        Label::Repeated => 2,
    }
}

/// CDR writer for definitions.
struct CdrWriter {
    buffer: Vec<u8>,
}

impl CdrWriter {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buffer.len() % alignment)) % alignment;
        self.buffer.extend(std::iter::repeat_n(0, padding));
    }

    fn write_u8(&mut self, v: u8) {
        self.buffer.push(v);
    }

    fn write_u16(&mut self, v: u16) {
        self.align(2);
        self.buffer.extend(&v.to_le_bytes());
    }

    fn write_u32(&mut self, v: u32) {
        self.align(4);
        self.buffer.extend(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.align(4);
        self.buffer.extend(&v.to_le_bytes());
    }

    fn write_len(&mut self, len: usize) -> Result<(), DefinitionError> {
        let len32 = u32::try_from(len).map_err(|_| DefinitionError::LengthOverflow(len))?;
        self.write_u32(len32);
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<(), DefinitionError> {
        // Length includes null terminator
        self.write_len(s.len() + 1)?;
        self.buffer.extend(s.as_bytes());
        self.buffer.push(0);
        Ok(())
    }

    fn write_field(&mut self, f: &FieldDef) -> Result<(), DefinitionError> {
        self.write_string(&f.name)?;
        self.write_u32(f.number);
        self.write_u8(label_tag(f.label));
        match &f.field_type {
            FieldType::Scalar(s) => self.write_u8(scalar_tag(*s)),
            FieldType::Message(name) => {
                self.write_u8(TAG_MESSAGE);
                self.write_string(name)?;
            }
            FieldType::Enum(name) => {
                self.write_u8(TAG_ENUM);
                self.write_string(name)?;
            }
        }
        Ok(())
    }

    fn write_enum(&mut self, e: &EnumDef) -> Result<(), DefinitionError> {
        self.write_string(&e.name)?;
        self.write_len(e.values.len())?;
        for v in &e.values {
            self.write_string(&v.name)?;
            self.write_i32(v.number);
        }
        Ok(())
    }

    fn write_message(&mut self, m: &MessageDef) -> Result<(), DefinitionError> {
        self.write_string(&m.name)?;
        self.write_len(m.fields.len())?;
        for f in &m.fields {
            self.write_field(f)?;
        }
        self.write_len(m.nested_messages.len())?;
        for nested in &m.nested_messages {
            self.write_message(nested)?;
        }
        self.write_len(m.nested_enums.len())?;
        for e in &m.nested_enums {
            self.write_enum(e)?;
        }
        Ok(())
    }

    fn write_service(&mut self, s: &ServiceDef) -> Result<(), DefinitionError> {
        self.write_string(&s.name)?;
        self.write_len(s.methods.len())?;
        for m in &s.methods {
            self.write_string(&m.name)?;
            self.write_string(&m.input_type)?;
            self.write_string(&m.output_type)?;
        }
        Ok(())
    }
}

/// CDR reader for definitions.
struct CdrReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> CdrReader<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn align(&mut self, alignment: usize) {
        self.offset = (self.offset + alignment - 1) & !(alignment - 1);
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DefinitionError> {
        if count > self.remaining() {
            return Err(DefinitionError::Truncated {
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, DefinitionError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, DefinitionError> {
        self.align(2);
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, DefinitionError> {
        self.align(4);
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, DefinitionError> {
        self.align(4);
        let b = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Sequence length, capped against the bytes left so a corrupt count
    /// cannot trigger a huge allocation.
    fn read_len(&mut self) -> Result<usize, DefinitionError> {
        let len = self.read_u32()? as usize;
        if len > self.remaining() {
            return Err(DefinitionError::Truncated {
                need: len,
                have: self.remaining(),
            });
        }
        Ok(len)
    }

    fn read_string(&mut self) -> Result<String, DefinitionError> {
        let len = self.read_len()?;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len)?;
        // Remove null terminator
        let actual_len = if bytes[len - 1] == 0 { len - 1 } else { len };
        Ok(String::from_utf8(bytes[..actual_len].to_vec())?)
    }

    fn read_field(&mut self) -> Result<FieldDef, DefinitionError> {
        let name = self.read_string()?;
        let number = self.read_u32()?;
        let label = match self.read_u8()? {
            0 => Label::Singular,
            1 => Label::Optional,
            2 => Label::Repeated,
            tag => return Err(DefinitionError::InvalidTag { what: "label", tag }),
        };
        let field_type = match self.read_u8()? {
            TAG_MESSAGE => FieldType::Message(self.read_string()?),
            TAG_ENUM => FieldType::Enum(self.read_string()?),
            tag => FieldType::Scalar(
                scalar_from_tag(tag).ok_or(DefinitionError::InvalidTag {
                    what: "field type",
                    tag,
                })?,
            ),
        };
        Ok(FieldDef {
            name,
            number,
            label,
            field_type,
        })
    }

    fn read_enum(&mut self) -> Result<EnumDef, DefinitionError> {
        let name = self.read_string()?;
        let count = self.read_len()?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let name = self.read_string()?;
            let number = self.read_i32()?;
            values.push(EnumValueDef { name, number });
        }
        Ok(EnumDef { name, values })
    }

    fn read_message(&mut self, depth: usize) -> Result<MessageDef, DefinitionError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(DefinitionError::NestingTooDeep);
        }
        let name = self.read_string()?;
        let count = self.read_len()?;
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            fields.push(self.read_field()?);
        }
        let count = self.read_len()?;
        let mut nested_messages = Vec::with_capacity(count);
        for _ in 0..count {
            nested_messages.push(self.read_message(depth + 1)?);
        }
        let count = self.read_len()?;
        let mut nested_enums = Vec::with_capacity(count);
        for _ in 0..count {
            nested_enums.push(self.read_enum()?);
        }
        Ok(MessageDef {
            name,
            fields,
            nested_messages,
            nested_enums,
        })
    }

    fn read_service(&mut self) -> Result<ServiceDef, DefinitionError> {
        let name = self.read_string()?;
        let count = self.read_len()?;
        let mut methods = Vec::with_capacity(count);
        for _ in 0..count {
            methods.push(MethodDef {
                name: self.read_string()?,
                input_type: self.read_string()?,
                output_type: self.read_string()?,
            });
        }
        Ok(ServiceDef { name, methods })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileDefinition {
        FileDefinition {
            package: "pkg".into(),
            messages: vec![MessageDef {
                name: "Outer".into(),
                fields: vec![
                    FieldDef {
                        name: "x".into(),
                        number: 1,
                        label: Label::Singular,
                        field_type: FieldType::Scalar(ScalarType::Int32),
                    },
                    FieldDef {
                        name: "inner".into(),
                        number: 2,
                        label: Label::Repeated,
                        field_type: FieldType::Message("Inner".into()),
                    },
                ],
                nested_messages: vec![MessageDef {
                    name: "Inner".into(),
                    ..Default::default()
                }],
                nested_enums: vec![EnumDef {
                    name: "Mode".into(),
                    values: vec![EnumValueDef {
                        name: "OFF".into(),
                        number: -1,
                    }],
                }],
            }],
            enums: Vec::new(),
            services: vec![ServiceDef {
                name: "Svc".into(),
                methods: vec![MethodDef {
                    name: "Call".into(),
                    input_type: ".pkg.Outer".into(),
                    output_type: ".pkg.Outer".into(),
                }],
            }],
            extensions: vec![ExtensionDef {
                extendee: ".pkg.Outer".into(),
                field: FieldDef {
                    name: "tag".into(),
                    number: 100,
                    label: Label::Optional,
                    field_type: FieldType::Scalar(ScalarType::String),
                },
            }],
        }
    }

    #[test]
    fn test_nested_definition_survives_encoding() {
        let def = sample();
        let bytes = encode_definition(&def).expect("encode");
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(decode_definition(&bytes).expect("decode"), def);
    }

    #[test]
    fn test_rejects_empty_and_bad_magic() {
        assert!(matches!(decode_definition(&[]), Err(DefinitionError::Empty)));
        assert!(matches!(
            decode_definition(b"XXXX\x01\x00\x00\x00"),
            Err(DefinitionError::BadMagic)
        ));
    }

    #[test]
    fn test_rejects_truncated_and_trailing() {
        let bytes = encode_definition(&sample()).expect("encode");
        assert!(matches!(
            decode_definition(&bytes[..bytes.len() - 3]),
            Err(DefinitionError::Truncated { .. })
        ));

        let mut padded = bytes.clone();
        padded.extend_from_slice(&[0, 0, 0, 0]);
        assert!(matches!(
            decode_definition(&padded),
            Err(DefinitionError::TrailingBytes(4))
        ));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut bytes = encode_definition(&FileDefinition::new("p")).expect("encode");
        bytes[4] = 9;
        assert!(matches!(
            decode_definition(&bytes),
            Err(DefinitionError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_huge_count_does_not_allocate() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        // empty package string
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        // message count far beyond the input
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode_definition(&bytes),
            Err(DefinitionError::Truncated { .. })
        ));
    }
}
