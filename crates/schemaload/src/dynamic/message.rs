// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicMessage container for runtime field access.

use crate::dynamic::{DynamicValue, PrimitiveKind, TypeDescriptor, TypeKind};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors for DynamicMessage operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("unknown variant {variant:?} for enum {enum_name}")]
    UnknownVariant { enum_name: String, variant: String },
}

/// A message instance bound to its synthesized type.
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    descriptor: Arc<TypeDescriptor>,
    value: DynamicValue,
}

impl DynamicMessage {
    /// Create a message with default values for every field.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value: default_value(descriptor, false),
        }
    }

    /// Wrap an existing value after checking it against the descriptor.
    pub fn from_value(
        descriptor: &Arc<TypeDescriptor>,
        value: DynamicValue,
    ) -> Result<Self, MessageError> {
        if !descriptor.is_message() {
            return Err(MessageError::InvalidOperation(format!(
                "{} is not a message type",
                descriptor.name
            )));
        }
        check_value(&value, descriptor, false)?;
        Ok(Self {
            descriptor: descriptor.clone(),
            value,
        })
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Fully-qualified type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Get the underlying value.
    pub fn value(&self) -> &DynamicValue {
        &self.value
    }

    /// Into inner value.
    pub fn into_value(self) -> DynamicValue {
        self.value
    }

    /// Get a field value by name.
    pub fn get<T: FromDynamicValue>(&self, name: &str) -> Result<T, MessageError> {
        T::from_dynamic(self.get_field(name)?)
    }

    /// Set a field value by name.
    ///
    /// The value must match the declared field type; optional fields also
    /// accept [`DynamicValue::Null`].
    pub fn set<T: IntoDynamicValue>(&mut self, name: &str, value: T) -> Result<(), MessageError> {
        let field = self
            .descriptor
            .field(name)
            .ok_or_else(|| MessageError::FieldNotFound(name.to_string()))?;
        let dyn_value = value.into_dynamic();
        check_value(&dyn_value, &field.type_desc, field.optional)?;

        match &mut self.value {
            DynamicValue::Message(fields) => {
                fields.insert(name.to_string(), dyn_value);
                Ok(())
            }
            _ => Err(MessageError::InvalidOperation(
                "set requires message type".into(),
            )),
        }
    }

    /// Set an enum field by variant name.
    pub fn set_enum(&mut self, name: &str, variant: &str) -> Result<(), MessageError> {
        let field = self
            .descriptor
            .field(name)
            .ok_or_else(|| MessageError::FieldNotFound(name.to_string()))?;
        let value = match &field.type_desc.kind {
            TypeKind::Enum(e) => e
                .variant(variant)
                .map(|v| DynamicValue::Enum(v.value, v.name.clone()))
                .ok_or_else(|| MessageError::UnknownVariant {
                    enum_name: field.type_desc.name.clone(),
                    variant: variant.to_string(),
                })?,
            _ => {
                return Err(MessageError::TypeMismatch {
                    expected: field.type_desc.name.clone(),
                    got: "enum".into(),
                })
            }
        };
        self.set(name, value)
    }

    /// Get field by name.
    pub fn get_field(&self, name: &str) -> Result<&DynamicValue, MessageError> {
        if self.descriptor.field(name).is_none() {
            return Err(MessageError::FieldNotFound(name.to_string()));
        }

        match &self.value {
            DynamicValue::Message(fields) => fields
                .get(name)
                .ok_or_else(|| MessageError::FieldNotFound(name.to_string())),
            _ => Err(MessageError::InvalidOperation(
                "get_field requires message type".into(),
            )),
        }
    }

    /// View a message-typed field as a message of its own type.
    pub fn message_field(&self, name: &str) -> Result<DynamicMessage, MessageError> {
        let field = self
            .descriptor
            .field(name)
            .ok_or_else(|| MessageError::FieldNotFound(name.to_string()))?;
        if !field.type_desc.is_message() {
            return Err(MessageError::TypeMismatch {
                expected: "message".into(),
                got: field.type_desc.name.clone(),
            });
        }
        match self.get_field(name)? {
            DynamicValue::Null => Err(MessageError::InvalidOperation(format!(
                "optional field {} is unset",
                name
            ))),
            value => Ok(DynamicMessage {
                descriptor: field.type_desc.clone(),
                value: value.clone(),
            }),
        }
    }

    /// Store a nested message into a message-typed field.
    pub fn set_message(&mut self, name: &str, message: DynamicMessage) -> Result<(), MessageError> {
        let field = self
            .descriptor
            .field(name)
            .ok_or_else(|| MessageError::FieldNotFound(name.to_string()))?;
        if field.type_desc.name != message.type_name() {
            return Err(MessageError::TypeMismatch {
                expected: field.type_desc.name.clone(),
                got: message.type_name().to_string(),
            });
        }
        self.set(name, message.value)
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &DynamicValue)> {
        let declared = self.descriptor.fields().unwrap_or(&[]);
        declared.iter().filter_map(move |f| match &self.value {
            DynamicValue::Message(map) => map.get(&f.name).map(|v| (f.name.as_str(), v)),
            _ => None,
        })
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.value == other.value
    }
}

/// Default value for a type.
pub(crate) fn default_value(desc: &TypeDescriptor, optional: bool) -> DynamicValue {
    if optional {
        return DynamicValue::Null;
    }
    match &desc.kind {
        TypeKind::Primitive(p) => default_primitive(*p),
        TypeKind::Message(fields) => {
            let map: HashMap<String, DynamicValue> = fields
                .iter()
                .map(|f| (f.name.clone(), default_value(&f.type_desc, f.optional)))
                .collect();
            DynamicValue::Message(map)
        }
        TypeKind::Sequence(_) => DynamicValue::Sequence(Vec::new()),
        TypeKind::Enum(e) => match e.variants.first() {
            Some(v) => DynamicValue::Enum(v.value, v.name.clone()),
            None => DynamicValue::Enum(0, String::new()),
        },
    }
}

fn default_primitive(kind: PrimitiveKind) -> DynamicValue {
    match kind {
        PrimitiveKind::Bool => DynamicValue::Bool(false),
        PrimitiveKind::I32 => DynamicValue::I32(0),
        PrimitiveKind::I64 => DynamicValue::I64(0),
        PrimitiveKind::U32 => DynamicValue::U32(0),
        PrimitiveKind::U64 => DynamicValue::U64(0),
        PrimitiveKind::F32 => DynamicValue::F32(0.0),
        PrimitiveKind::F64 => DynamicValue::F64(0.0),
        PrimitiveKind::String => DynamicValue::String(String::new()),
        PrimitiveKind::Bytes => DynamicValue::Bytes(Vec::new()),
    }
}

/// Check that `value` fits `desc`.
fn check_value(value: &DynamicValue, desc: &TypeDescriptor, optional: bool) -> Result<(), MessageError> {
    let mismatch = || MessageError::TypeMismatch {
        expected: desc.name.clone(),
        got: value.kind_name().to_string(),
    };

    match (&desc.kind, value) {
        (_, DynamicValue::Null) if optional => Ok(()),
        (TypeKind::Primitive(p), v) => {
            let ok = matches!(
                (p, v),
                (PrimitiveKind::Bool, DynamicValue::Bool(_))
                    | (PrimitiveKind::I32, DynamicValue::I32(_))
                    | (PrimitiveKind::I64, DynamicValue::I64(_))
                    | (PrimitiveKind::U32, DynamicValue::U32(_))
                    | (PrimitiveKind::U64, DynamicValue::U64(_))
                    | (PrimitiveKind::F32, DynamicValue::F32(_))
                    | (PrimitiveKind::F64, DynamicValue::F64(_))
                    | (PrimitiveKind::String, DynamicValue::String(_))
                    | (PrimitiveKind::Bytes, DynamicValue::Bytes(_))
            );
            if ok {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        (TypeKind::Message(fields), DynamicValue::Message(map)) => {
            for field in fields {
                let v = map
                    .get(&field.name)
                    .ok_or_else(|| MessageError::FieldNotFound(field.name.clone()))?;
                check_value(v, &field.type_desc, field.optional)?;
            }
            Ok(())
        }
        (TypeKind::Sequence(elem), DynamicValue::Sequence(items)) => items
            .iter()
            .try_for_each(|item| check_value(item, elem, false)),
        (TypeKind::Enum(_), DynamicValue::Enum(_, _)) => Ok(()),
        _ => Err(mismatch()),
    }
}

/// Trait for converting from DynamicValue.
pub trait FromDynamicValue: Sized {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, MessageError>;
}

/// Trait for converting to DynamicValue.
pub trait IntoDynamicValue {
    fn into_dynamic(self) -> DynamicValue;
}

macro_rules! impl_from_dynamic {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromDynamicValue for $ty {
            fn from_dynamic(value: &DynamicValue) -> Result<Self, MessageError> {
                match value {
                    DynamicValue::$variant(v) => Ok(v.clone()),
                    other => Err(MessageError::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_dynamic!(bool, Bool, "bool");
impl_from_dynamic!(i32, I32, "int32");
impl_from_dynamic!(i64, I64, "int64");
impl_from_dynamic!(u32, U32, "uint32");
impl_from_dynamic!(u64, U64, "uint64");
impl_from_dynamic!(f32, F32, "float");
impl_from_dynamic!(f64, F64, "double");
impl_from_dynamic!(String, String, "string");
impl_from_dynamic!(Vec<u8>, Bytes, "bytes");
impl_from_dynamic!(Vec<DynamicValue>, Sequence, "sequence");

impl FromDynamicValue for DynamicValue {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, MessageError> {
        Ok(value.clone())
    }
}

macro_rules! impl_into_dynamic {
    ($ty:ty, $variant:ident) => {
        impl IntoDynamicValue for $ty {
            fn into_dynamic(self) -> DynamicValue {
                DynamicValue::$variant(self)
            }
        }
    };
}

impl_into_dynamic!(bool, Bool);
impl_into_dynamic!(i32, I32);
impl_into_dynamic!(i64, I64);
impl_into_dynamic!(u32, U32);
impl_into_dynamic!(u64, U64);
impl_into_dynamic!(f32, F32);
impl_into_dynamic!(f64, F64);
impl_into_dynamic!(String, String);
impl_into_dynamic!(Vec<u8>, Bytes);
impl_into_dynamic!(Vec<DynamicValue>, Sequence);

impl IntoDynamicValue for &str {
    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::String(self.to_string())
    }
}

impl IntoDynamicValue for DynamicValue {
    fn into_dynamic(self) -> DynamicValue {
        self
    }
}
