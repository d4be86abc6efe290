// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One CLI invocation: a loader plus the bundle files given to it.

use crate::bundle_io::{read_bundles, BundleIoError};
use crate::config::CliConfig;
use schemaload::{
    AnyCodec, DescriptorBundle, DynamicMessage, FileBinding, LoadError, SchemaLoader,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Bundle(#[from] BundleIoError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid loader configuration: {0}")]
    Config(#[from] schemaload::ConfigError),

    #[error("export failed: {0}")]
    Export(#[from] schemaload::RegistryError),
}

/// What a `load` request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// Module-style name (`foo.bar_generated`).
    Module(String),
    /// Bundle file path (`foo/bar.schema`).
    File(String),
    /// Every file of the bundle.
    All,
}

/// Loader and merged bundle for one invocation.
pub struct Session {
    codec: AnyCodec,
    bundle: DescriptorBundle,
}

impl Session {
    /// Read `bundles` (merged in order), then the configured preload files,
    /// and register the preloaded files.
    pub fn open(config: &CliConfig, bundles: &[PathBuf]) -> Result<Self, SessionError> {
        let loader = SchemaLoader::new().with_config(config.loader.clone())?;
        let mut bundle = read_bundles(bundles)?;

        if !config.preload.is_empty() {
            let preloaded = read_bundles(config.preload.as_slice())?;
            let bindings = loader.load_bundle(&preloaded)?;
            tracing::info!("Preloaded {} schema file(s)", bindings.len());
            bundle.merge(preloaded);
        }

        Ok(Self {
            codec: AnyCodec::new(loader),
            bundle,
        })
    }

    pub fn loader(&self) -> &SchemaLoader {
        self.codec.loader()
    }

    pub fn bundle(&self) -> &DescriptorBundle {
        &self.bundle
    }

    /// Load the requested files into the registry.
    pub fn load(&self, target: &LoadTarget) -> Result<Vec<Arc<FileBinding>>, SessionError> {
        let loader = self.loader();
        let bindings = match target {
            LoadTarget::Module(name) => vec![loader.load_module(name, &self.bundle)?],
            LoadTarget::File(path) => vec![loader.load_file(path, &self.bundle)?],
            LoadTarget::All => loader.load_bundle(&self.bundle)?,
        };
        Ok(bindings)
    }

    /// Decode serialized envelope bytes, loading the declaring file on demand.
    pub fn decode(&self, envelope: &[u8]) -> Result<DynamicMessage, SessionError> {
        Ok(self.codec.decode_bytes(envelope, &self.bundle)?)
    }

    /// Self-contained bundle for the file declaring the message `full_name`.
    pub fn export(&self, full_name: &str) -> Result<DescriptorBundle, SessionError> {
        let registry = self.loader().registry();
        if registry.symbol_path(full_name).is_none() {
            self.loader().load_message_type(full_name, &self.bundle)?;
        }
        Ok(registry.export_bundle(full_name)?)
    }
}
