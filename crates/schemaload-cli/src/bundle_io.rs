// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reading and writing bundle files.

use schemaload::DescriptorBundle;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while moving bundles to and from disk.
#[derive(Debug, Error)]
pub enum BundleIoError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid bundle: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render bundle: {0}")]
    Render(#[from] serde_json::Error),
}

/// Read one JSON bundle file.
pub fn read_bundle(path: &Path) -> Result<DescriptorBundle, BundleIoError> {
    let text = std::fs::read_to_string(path).map_err(|source| BundleIoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let bundle = DescriptorBundle::from_json(&text).map_err(|source| BundleIoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} file(s) from {}", bundle.len(), path.display());
    Ok(bundle)
}

/// Read several bundle files and merge them in order.
///
/// When two bundles carry the same file path, the earlier one wins.
pub fn read_bundles<P: AsRef<Path>>(paths: &[P]) -> Result<DescriptorBundle, BundleIoError> {
    let mut merged = DescriptorBundle::new();
    for path in paths {
        let path = path.as_ref();
        let bundle = read_bundle(path)?;
        let offered = bundle.len();
        let added = merged.merge(bundle);
        if added < offered {
            tracing::warn!(
                "{}: {} file(s) shadowed by earlier bundles",
                path.display(),
                offered - added
            );
        }
    }
    Ok(merged)
}

/// Write a bundle as pretty JSON.
pub fn write_bundle(path: &Path, bundle: &DescriptorBundle) -> Result<(), BundleIoError> {
    let text = bundle.to_json_pretty()?;
    std::fs::write(path, text).map_err(|source| BundleIoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaload::{SchemaFile, SymbolKind};

    #[test]
    fn test_merge_keeps_earlier_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        write_bundle(
            &first,
            &DescriptorBundle::from_files(vec![
                SchemaFile::new("a.schema", "one").with_symbol("A", SymbolKind::Message)
            ]),
        )
        .expect("write first");
        write_bundle(
            &second,
            &DescriptorBundle::from_files(vec![
                SchemaFile::new("a.schema", "two"),
                SchemaFile::new("b.schema", "two"),
            ]),
        )
        .expect("write second");

        let merged = read_bundles(&[&first, &second]).expect("merge");
        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.file("a.schema").map(|f| f.package.as_str()),
            Some("one")
        );
    }

    #[test]
    fn test_errors_name_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.json");
        let err = read_bundle(&missing).expect_err("missing");
        assert!(err.to_string().contains("missing.json"));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{ not json").expect("write");
        assert!(matches!(
            read_bundle(&garbage),
            Err(BundleIoError::Parse { .. })
        ));
    }
}
