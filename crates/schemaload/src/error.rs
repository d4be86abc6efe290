// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Load error taxonomy.
//!
//! Every error is returned directly to the caller of the entry point that
//! detected it. Nothing in this crate retries or swallows a failure.

use crate::definition::DefinitionError;
use crate::dynamic::PayloadError;
use crate::registry::RegistryError;
use crate::synth::SynthesisError;
use thiserror::Error;

/// Errors produced while loading bundles or converting envelopes.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Load request name does not follow `<dotted.path><suffix>`.
    #[error("module name {name:?} must end with {suffix:?}")]
    NameFormat { name: String, suffix: String },

    /// Canonical path absent from both the bundle and the live registry.
    #[error("schema file {path:?} not found in bundle or live registry")]
    SchemaNotFound { path: String },

    /// One bundle file maps onto two different live canonical paths.
    #[error(
        "compatibility conflict in {file:?}: already bound to {bound:?}, \
         but symbol {symbol:?} lives in {conflicting:?}"
    )]
    CompatibilityConflict {
        file: String,
        bound: String,
        conflicting: String,
        symbol: String,
    },

    /// Envelope type is not a top-level message of the supplied bundle.
    #[error("top-level message {name:?} is not declared in the bundle")]
    SymbolNotFound { name: String },

    /// Instance type differs from the expected type name.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A file was re-entered while its own imports were being resolved.
    #[error("import cycle detected at {path:?}")]
    DependencyCycle { path: String },

    /// Definition bytes of a file could not be compiled.
    #[error("invalid definition for {path:?}: {source}")]
    Definition {
        path: String,
        #[source]
        source: DefinitionError,
    },

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl LoadError {
    /// True when retrying with a more complete bundle can succeed.
    ///
    /// `SchemaNotFound` means the caller left something out of the bundle.
    /// A `CompatibilityConflict` comes from build skew and will fail again
    /// with the same input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SchemaNotFound { .. })
    }
}

/// Shorthand result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
