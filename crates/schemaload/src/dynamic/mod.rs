// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic message values
//!
//! Runtime representation of synthesized schema types and their instances.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime type description (primitives, messages, sequences, enums)
//! - **DynamicMessage**: Type-checked message container with field access
//! - **CDR Support**: Encode/decode message payloads to/from CDR
//!
//! # Example
//!
//! ```rust
//! use schemaload::dynamic::{DynamicMessage, FieldDescriptor, PrimitiveKind, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let int32 = Arc::new(TypeDescriptor::primitive(PrimitiveKind::I32));
//! let foo = Arc::new(TypeDescriptor::message(
//!     "pkg.Foo",
//!     vec![FieldDescriptor::new("x", 1, int32)],
//! ));
//!
//! let mut msg = DynamicMessage::new(&foo);
//! msg.set("x", 5i32).unwrap();
//! assert_eq!(msg.get::<i32>("x").unwrap(), 5);
//! ```

mod cdr;
mod message;
mod type_descriptor;
mod value;

pub use cdr::{decode_payload, encode_payload, PayloadError};
pub use message::{DynamicMessage, FromDynamicValue, IntoDynamicValue, MessageError};
pub use type_descriptor::{
    EnumDescriptor, EnumVariant, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind,
};
pub use value::DynamicValue;
