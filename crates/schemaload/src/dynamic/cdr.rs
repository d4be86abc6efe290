// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR encoding/decoding for message payloads.
//!
//! Little-endian, naturally aligned. Fields follow declaration order.
//! Optional fields carry a one-byte presence flag before the value.

use crate::dynamic::{DynamicMessage, DynamicValue, PrimitiveKind, TypeDescriptor, TypeKind};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors for payload CDR operations.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("buffer too small: need {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

/// Encode a message to CDR bytes.
pub fn encode_payload(message: &DynamicMessage) -> Result<Vec<u8>, PayloadError> {
    let mut encoder = CdrEncoder::new();
    encoder.encode_value(message.value(), message.descriptor())?;
    Ok(encoder.into_bytes())
}

/// Decode CDR bytes into a message of type `descriptor`.
pub fn decode_payload(
    bytes: &[u8],
    descriptor: &Arc<TypeDescriptor>,
) -> Result<DynamicMessage, PayloadError> {
    let mut decoder = CdrDecoder::new(bytes);
    let value = decoder.decode_value(descriptor)?;
    if decoder.remaining() > 0 {
        return Err(PayloadError::TrailingBytes(decoder.remaining()));
    }
    DynamicMessage::from_value(descriptor, value)
        .map_err(|e| PayloadError::InvalidData(e.to_string()))
}

struct CdrEncoder {
    buffer: Vec<u8>,
}

impl CdrEncoder {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buffer.len() % alignment)) % alignment;
        self.buffer.resize(self.buffer.len() + padding, 0);
    }

    fn write_len(&mut self, len: usize) -> Result<(), PayloadError> {
        let len = u32::try_from(len)
            .map_err(|_| PayloadError::InvalidData(format!("length {} exceeds u32", len)))?;
        self.align(4);
        self.buffer.extend_from_slice(&len.to_le_bytes());
        Ok(())
    }

    fn encode_value(
        &mut self,
        value: &DynamicValue,
        desc: &TypeDescriptor,
    ) -> Result<(), PayloadError> {
        let mismatch = || PayloadError::TypeMismatch {
            expected: desc.name.clone(),
            found: value.kind_name().to_string(),
        };

        match &desc.kind {
            TypeKind::Primitive(p) => self.encode_primitive(value, *p).map_err(|_| mismatch()),
            TypeKind::Message(fields) => {
                let DynamicValue::Message(map) = value else {
                    return Err(mismatch());
                };
                for field in fields {
                    let field_value = map.get(&field.name).ok_or_else(|| {
                        PayloadError::InvalidData(format!("missing field: {}", field.name))
                    })?;
                    if field.optional {
                        if field_value.is_null() {
                            self.buffer.push(0);
                            continue;
                        }
                        self.buffer.push(1);
                    }
                    self.encode_value(field_value, &field.type_desc)?;
                }
                Ok(())
            }
            TypeKind::Sequence(elem) => {
                let DynamicValue::Sequence(items) = value else {
                    return Err(mismatch());
                };
                self.write_len(items.len())?;
                for item in items {
                    self.encode_value(item, elem)?;
                }
                Ok(())
            }
            TypeKind::Enum(_) => {
                let DynamicValue::Enum(val, _) = value else {
                    return Err(mismatch());
                };
                self.align(4);
                self.buffer.extend_from_slice(&val.to_le_bytes());
                Ok(())
            }
        }
    }

    fn encode_primitive(&mut self, value: &DynamicValue, kind: PrimitiveKind) -> Result<(), PayloadError> {
        match (value, kind) {
            (DynamicValue::Bool(v), PrimitiveKind::Bool) => {
                self.buffer.push(u8::from(*v));
            }
            (DynamicValue::I32(v), PrimitiveKind::I32) => {
                self.align(4);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            (DynamicValue::I64(v), PrimitiveKind::I64) => {
                self.align(8);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            (DynamicValue::U32(v), PrimitiveKind::U32) => {
                self.align(4);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            (DynamicValue::U64(v), PrimitiveKind::U64) => {
                self.align(8);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            (DynamicValue::F32(v), PrimitiveKind::F32) => {
                self.align(4);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            (DynamicValue::F64(v), PrimitiveKind::F64) => {
                self.align(8);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            (DynamicValue::String(s), PrimitiveKind::String) => {
                // Length includes null terminator
                self.write_len(s.len() + 1)?;
                self.buffer.extend_from_slice(s.as_bytes());
                self.buffer.push(0);
            }
            (DynamicValue::Bytes(b), PrimitiveKind::Bytes) => {
                self.write_len(b.len())?;
                self.buffer.extend_from_slice(b);
            }
            _ => {
                return Err(PayloadError::TypeMismatch {
                    expected: format!("{:?}", kind),
                    found: value.kind_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

struct CdrDecoder<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> CdrDecoder<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn align(&mut self, alignment: usize) {
        self.offset = (self.offset + alignment - 1) & !(alignment - 1);
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], PayloadError> {
        if count > self.remaining() {
            return Err(PayloadError::BufferTooSmall {
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PayloadError> {
        self.align(N.min(8));
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Element count, capped by what the buffer can still hold.
    fn read_len(&mut self) -> Result<usize, PayloadError> {
        let len = u32::from_le_bytes(self.read_array::<4>()?) as usize;
        if len > self.remaining() {
            return Err(PayloadError::BufferTooSmall {
                need: len,
                have: self.remaining(),
            });
        }
        Ok(len)
    }

    fn decode_value(&mut self, desc: &TypeDescriptor) -> Result<DynamicValue, PayloadError> {
        match &desc.kind {
            TypeKind::Primitive(p) => self.decode_primitive(*p),
            TypeKind::Message(fields) => {
                let mut map = HashMap::with_capacity(fields.len());
                for field in fields {
                    if field.optional && self.read_bytes(1)?[0] == 0 {
                        map.insert(field.name.clone(), DynamicValue::Null);
                        continue;
                    }
                    let value = self.decode_value(&field.type_desc)?;
                    map.insert(field.name.clone(), value);
                }
                Ok(DynamicValue::Message(map))
            }
            TypeKind::Sequence(elem) => {
                let len = self.read_len()?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_value(elem)?);
                }
                Ok(DynamicValue::Sequence(items))
            }
            TypeKind::Enum(e) => {
                let val = i32::from_le_bytes(self.read_array::<4>()?);
                let name = e
                    .variant_by_value(val)
                    .map(|v| v.name.clone())
                    .unwrap_or_default();
                Ok(DynamicValue::Enum(val, name))
            }
        }
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<DynamicValue, PayloadError> {
        Ok(match kind {
            PrimitiveKind::Bool => DynamicValue::Bool(self.read_bytes(1)?[0] != 0),
            PrimitiveKind::I32 => DynamicValue::I32(i32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::I64 => DynamicValue::I64(i64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::U32 => DynamicValue::U32(u32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::U64 => DynamicValue::U64(u64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::F32 => DynamicValue::F32(f32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::F64 => DynamicValue::F64(f64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::String => {
                let len = self.read_len()?;
                if len == 0 {
                    return Err(PayloadError::InvalidData(
                        "string length must include terminator".into(),
                    ));
                }
                let bytes = self.read_bytes(len)?;
                DynamicValue::String(String::from_utf8(bytes[..len - 1].to_vec())?)
            }
            PrimitiveKind::Bytes => {
                let len = self.read_len()?;
                DynamicValue::Bytes(self.read_bytes(len)?.to_vec())
            }
        })
    }
}
