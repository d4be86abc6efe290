// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing envelopes.
//!
//! An [`Envelope`] carries a type URL and an opaque CDR payload. The
//! [`AnyCodec`] resolves the type named by the URL through a bundle and
//! turns the payload into a [`DynamicMessage`], and back.
//!
//! Only top-level messages can be addressed this way; a nested message
//! type is reported as [`LoadError::SymbolNotFound`].

use crate::bundle::DescriptorBundle;
use crate::dynamic::{
    decode_payload, encode_payload, DynamicMessage, FieldDescriptor, MessageError, PayloadError,
    PrimitiveKind, TypeDescriptor,
};
use crate::error::{LoadError, Result};
use crate::registry::{MemoryStore, SchemaStore};
use crate::type_url::strip_type_url_prefix;
use crate::SchemaLoader;
use std::sync::Arc;

const ENVELOPE_TYPE: &str = "schemaload.Envelope";

/// Generic wire wrapper: type URL plus serialized message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub type_url: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(type_url: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            payload,
        }
    }

    /// Wrap `message` under `prefix` + its full type name.
    pub fn pack(message: &DynamicMessage, prefix: &str) -> std::result::Result<Self, PayloadError> {
        Ok(Self {
            type_url: format!("{}{}", prefix, message.type_name()),
            payload: encode_payload(message)?,
        })
    }

    /// Fully-qualified type name carried by the URL.
    pub fn type_name(&self) -> &str {
        strip_type_url_prefix(&self.type_url)
    }

    /// Decode the payload as `descriptor`, which must be the named type.
    pub fn unpack(&self, descriptor: &Arc<TypeDescriptor>) -> Result<DynamicMessage> {
        if self.type_name() != descriptor.name {
            return Err(LoadError::TypeMismatch {
                expected: descriptor.name.clone(),
                actual: self.type_name().to_string(),
            });
        }
        Ok(decode_payload(&self.payload, descriptor)?)
    }

    /// Serialize the envelope itself.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, PayloadError> {
        let desc = envelope_descriptor();
        let invalid = |e: MessageError| PayloadError::InvalidData(e.to_string());
        let mut message = DynamicMessage::new(&desc);
        message
            .set("type_url", self.type_url.as_str())
            .map_err(invalid)?;
        message
            .set("value", self.payload.clone())
            .map_err(invalid)?;
        encode_payload(&message)
    }

    /// Parse bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, PayloadError> {
        let message = decode_payload(bytes, &envelope_descriptor())?;
        let invalid = |e: MessageError| PayloadError::InvalidData(e.to_string());
        Ok(Self {
            type_url: message.get::<String>("type_url").map_err(invalid)?,
            payload: message.get::<Vec<u8>>("value").map_err(invalid)?,
        })
    }
}

fn envelope_descriptor() -> Arc<TypeDescriptor> {
    Arc::new(TypeDescriptor::message(
        ENVELOPE_TYPE,
        vec![
            FieldDescriptor::new(
                "type_url",
                1,
                Arc::new(TypeDescriptor::primitive(PrimitiveKind::String)),
            ),
            FieldDescriptor::new(
                "value",
                2,
                Arc::new(TypeDescriptor::primitive(PrimitiveKind::Bytes)),
            ),
        ],
    ))
}

/// Decode/encode envelopes against bundles loaded on demand.
pub struct AnyCodec<S: SchemaStore = MemoryStore> {
    loader: SchemaLoader<S>,
}

impl<S: SchemaStore> Clone for AnyCodec<S> {
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
        }
    }
}

impl<S: SchemaStore> AnyCodec<S> {
    pub fn new(loader: SchemaLoader<S>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &SchemaLoader<S> {
        &self.loader
    }

    /// Decode `envelope` using the schemas of `bundle`.
    ///
    /// The file declaring the envelope's type is loaded (with its imports)
    /// through its canonical path before the payload is read.
    pub fn decode(&self, envelope: &Envelope, bundle: &DescriptorBundle) -> Result<DynamicMessage> {
        let descriptor = self.loader.load_message_type(envelope.type_name(), bundle)?;
        envelope.unpack(&descriptor)
    }

    /// Decode serialized envelope bytes.
    pub fn decode_bytes(&self, bytes: &[u8], bundle: &DescriptorBundle) -> Result<DynamicMessage> {
        let envelope = Envelope::from_bytes(bytes)?;
        self.decode(&envelope, bundle)
    }

    /// Pack `message` into serialized envelope bytes.
    ///
    /// `None` means there is nothing to encode and yields `Ok(None)`, never
    /// an empty payload. A message whose type is not `expected` fails with
    /// [`LoadError::TypeMismatch`].
    pub fn encode(
        &self,
        message: Option<&DynamicMessage>,
        expected: &str,
    ) -> Result<Option<Vec<u8>>> {
        let Some(message) = message else {
            return Ok(None);
        };
        if message.type_name() != expected {
            return Err(LoadError::TypeMismatch {
                expected: expected.to_string(),
                actual: message.type_name().to_string(),
            });
        }
        let envelope = Envelope::pack(message, &self.loader.config().type_url_prefix)?;
        Ok(Some(envelope.to_bytes()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_bytes_round_trip() {
        let envelope = Envelope::new("type.googleapis.com/pkg.Foo", vec![1, 2, 3]);
        let bytes = envelope.to_bytes().expect("encode");
        assert_eq!(Envelope::from_bytes(&bytes).expect("decode"), envelope);
        assert_eq!(envelope.type_name(), "pkg.Foo");
    }

    #[test]
    fn test_empty_payload_is_still_an_envelope() {
        let envelope = Envelope::new("x/pkg.Empty", Vec::new());
        let bytes = envelope.to_bytes().expect("encode");
        assert!(!bytes.is_empty());
        assert!(Envelope::from_bytes(&bytes)
            .expect("decode")
            .payload
            .is_empty());
    }

    #[test]
    fn test_unpack_checks_type_name() {
        let desc = Arc::new(TypeDescriptor::message("pkg.Foo", Vec::new()));
        let envelope = Envelope::new("t/pkg.Bar", Vec::new());
        assert!(matches!(
            envelope.unpack(&desc),
            Err(LoadError::TypeMismatch { .. })
        ));
        let envelope = Envelope::new("t/pkg.Foo", Vec::new());
        assert!(envelope.unpack(&desc).is_ok());
    }
}
