// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use schemaload::definition::{
    CdrSchemaCompiler, DefinitionError, FileBuilder, FileDefinition, MessageBuilder, ScalarType,
    SchemaCompiler,
};
use schemaload::{DescriptorBundle, SchemaFile};
use std::collections::HashMap;
use std::sync::Arc;

/// Compiler that counts how often each file is parsed.
#[derive(Default)]
pub struct CountingCompiler {
    counts: Mutex<HashMap<String, usize>>,
}

impl CountingCompiler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self, path: &str) -> usize {
        self.counts.lock().get(path).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.lock().values().sum()
    }
}

impl SchemaCompiler for CountingCompiler {
    fn compile(&self, file: &SchemaFile) -> Result<FileDefinition, DefinitionError> {
        *self.counts.lock().entry(file.name.clone()).or_insert(0) += 1;
        CdrSchemaCompiler.compile(file)
    }
}

/// `a/b.schema`: `pkg.Foo { x: int32 }`.
pub fn scenario_a() -> DescriptorBundle {
    DescriptorBundle::from_files(vec![FileBuilder::new("a/b.schema", "pkg")
        .message(MessageBuilder::new("Foo").field("x", ScalarType::Int32))
        .build()
        .expect("a/b.schema")])
}

/// `main.schema` (`pkg.Main { base: pkg.Base }`) importing `dep.schema`.
pub fn scenario_b() -> DescriptorBundle {
    DescriptorBundle::from_files(vec![
        FileBuilder::new("dep.schema", "pkg")
            .message(
                MessageBuilder::new("Base")
                    .field("id", ScalarType::Uint32)
                    .field("label", ScalarType::String),
            )
            .build()
            .expect("dep.schema"),
        FileBuilder::new("main.schema", "pkg")
            .dependency("dep.schema")
            .message(
                MessageBuilder::new("Main")
                    .message_field("base", ".pkg.Base")
                    .repeated_field("weights", ScalarType::Double),
            )
            .build()
            .expect("main.schema"),
    ])
}

/// Single-message file declaring `package.name` with one field.
pub fn single(path: &str, package: &str, name: &str, field: &str) -> SchemaFile {
    FileBuilder::new(path, package)
        .message(MessageBuilder::new(name).field(field, ScalarType::Int64))
        .build()
        .expect("single")
}
