// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema compiler seam.
//!
//! The synthesizer never interprets definition bytes itself; it asks a
//! [`SchemaCompiler`] for the structural description. Tests swap in
//! counting or failing compilers here.

use super::codec::{decode_definition, DefinitionError};
use super::FileDefinition;
use crate::bundle::SchemaFile;

/// Turns a schema file's definition bytes into a [`FileDefinition`].
pub trait SchemaCompiler: Send + Sync {
    /// Compile one file.
    fn compile(&self, file: &SchemaFile) -> Result<FileDefinition, DefinitionError>;
}

/// Compiler for the CDR definition layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdrSchemaCompiler;

impl SchemaCompiler for CdrSchemaCompiler {
    fn compile(&self, file: &SchemaFile) -> Result<FileDefinition, DefinitionError> {
        decode_definition(&file.definition_bytes)
    }
}

impl<C: SchemaCompiler + ?Sized> SchemaCompiler for std::sync::Arc<C> {
    fn compile(&self, file: &SchemaFile) -> Result<FileDefinition, DefinitionError> {
        (**self).compile(file)
    }
}
