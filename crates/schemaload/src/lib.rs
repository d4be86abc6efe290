// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime schema bundle loading
//!
//! Makes message types that were unknown at build time usable at runtime.
//! A descriptor bundle of interdependent schema files is reconciled against
//! a live registry: files that duplicate already-live schemas collapse onto
//! their canonical paths, new files are synthesized into concrete types in
//! dependency order, and the result is registered once and for all.
//!
//! # Features
//!
//! - **Live Registry**: append-only store of realized schema files
//! - **Compatibility Mapping**: path-level conflict detection between a bundle and the registry
//! - **Dependency Resolution**: depth-first loading, imports before dependents
//! - **Type Synthesis**: descriptors built through a pluggable schema compiler
//! - **Any Codec**: self-describing type URL + payload envelopes
//!
//! # Quick Start
//!
//! ```rust
//! use schemaload::definition::{FileBuilder, MessageBuilder, ScalarType};
//! use schemaload::{AnyCodec, DescriptorBundle, DynamicMessage, Envelope, SchemaLoader};
//!
//! let file = FileBuilder::new("a/b.schema", "pkg")
//!     .message(MessageBuilder::new("Foo").field("x", ScalarType::Int32))
//!     .build()
//!     .unwrap();
//! let bundle = DescriptorBundle::from_files(vec![file]);
//!
//! let loader = SchemaLoader::new();
//! let binding = loader.load_module("a.b_generated", &bundle).unwrap();
//! let foo = binding.message("pkg.Foo").unwrap();
//!
//! let mut msg = DynamicMessage::new(foo);
//! msg.set("x", 5i32).unwrap();
//!
//! let codec = AnyCodec::new(loader);
//! let bytes = codec.encode(Some(&msg), "pkg.Foo").unwrap().unwrap();
//! let decoded = codec.decode_bytes(&bytes, &bundle).unwrap();
//! assert_eq!(decoded, msg);
//! # let _ = Envelope::from_bytes(&bytes).unwrap();
//! ```

pub mod any;
pub mod bundle;
pub mod config;
pub mod definition;
pub mod dynamic;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod registry;
pub mod resolver;
pub mod rewrite;
pub mod synth;
pub mod type_url;

pub use any::{AnyCodec, Envelope};
pub use bundle::{DescriptorBundle, SchemaFile, SymbolDecl, SymbolKind};
pub use config::{ConfigError, LoaderConfig};
pub use dynamic::{DynamicMessage, DynamicValue, TypeDescriptor};
pub use error::{LoadError, Result};
pub use loader::SchemaLoader;
pub use mapper::{build_symbol_index, SymbolIndex};
pub use registry::{FileBinding, LiveRegistry, MemoryStore, RegistryError, SchemaStore};
pub use resolver::Resolver;
pub use rewrite::{rewrite_bundle, PathRewriteMap};
pub use synth::{synthesize, SynthesisError};
