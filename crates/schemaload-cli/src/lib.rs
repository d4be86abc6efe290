// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Support code for the `schemaload` command-line tool.
//!
//! The binary reads descriptor bundles from disk (several files are merged,
//! first occurrence wins), loads them into a fresh live registry and prints
//! what it found.

pub mod bundle_io;
pub mod config;
pub mod render;
pub mod session;

pub use bundle_io::{read_bundle, read_bundles, write_bundle, BundleIoError};
pub use config::{CliConfig, ConfigError};
pub use session::{LoadTarget, Session, SessionError};
