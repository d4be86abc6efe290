// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! schemaload CLI
//!
//! # Usage
//!
//! ```bash
//! # List files, symbols and imports of one or more bundles
//! schemaload inspect -b base.json -b app.json
//!
//! # Load a module and print the synthesized types
//! schemaload load -b app.json --module app.user_generated
//!
//! # Decode a serialized envelope
//! schemaload decode -b app.json --input message.bin
//!
//! # Write a self-contained bundle for one message type
//! schemaload export -b app.json --type app.User --output user.json
//!
//! # Configuration file handling
//! schemaload gen-config --output schemaload.toml
//! schemaload validate-config schemaload.toml
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use schemaload_cli::render::{describe_binding, describe_bundle, message_to_json};
use schemaload_cli::{write_bundle, CliConfig, LoadTarget, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime schema bundle tool
#[derive(Parser, Debug)]
#[command(name = "schemaload")]
#[command(about = "Inspect, load and decode descriptor bundles")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the files, symbols and imports of bundles without loading them
    Inspect {
        /// Bundle files (JSON), merged in order
        #[arg(short, long = "bundle", required = true)]
        bundles: Vec<PathBuf>,
    },

    /// Load bundle files into a fresh registry and print the result
    Load {
        /// Bundle files (JSON), merged in order
        #[arg(short, long = "bundle", required = true)]
        bundles: Vec<PathBuf>,

        /// Module-style request name (e.g. foo.bar_generated)
        #[arg(short, long, conflicts_with = "file")]
        module: Option<String>,

        /// Bundle file path (e.g. foo/bar.schema)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Decode a serialized envelope and print it as JSON
    Decode {
        /// Bundle files (JSON), merged in order
        #[arg(short, long = "bundle", required = true)]
        bundles: Vec<PathBuf>,

        /// Envelope bytes
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a self-contained bundle for one message type
    Export {
        /// Bundle files (JSON), merged in order
        #[arg(short, long = "bundle")]
        bundles: Vec<PathBuf>,

        /// Fully-qualified message name
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "schemaload.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    ValidateConfig {
        /// Configuration file path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CliConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => CliConfig::default(),
    };

    // Initialize logging
    let level = args.log_level.as_deref().unwrap_or(config.log_level.as_str());
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Commands::Inspect { bundles } => cmd_inspect(&bundles),
        Commands::Load {
            bundles,
            module,
            file,
        } => {
            let target = match (module, file) {
                (Some(name), _) => LoadTarget::Module(name),
                (None, Some(path)) => LoadTarget::File(path),
                (None, None) => LoadTarget::All,
            };
            cmd_load(&config, &bundles, &target)
        }
        Commands::Decode { bundles, input } => cmd_decode(&config, &bundles, input),
        Commands::Export {
            bundles,
            type_name,
            output,
        } => cmd_export(&config, &bundles, &type_name, output),
        Commands::GenConfig { output } => cmd_gen_config(output),
        Commands::ValidateConfig { path } => cmd_validate_config(path),
    }
}

fn cmd_inspect(bundles: &[PathBuf]) -> Result<()> {
    let bundle = schemaload_cli::read_bundles(bundles).context("Failed to read bundles")?;
    print!("{}", describe_bundle(&bundle));
    println!("{} file(s)", bundle.len());
    Ok(())
}

fn cmd_load(config: &CliConfig, bundles: &[PathBuf], target: &LoadTarget) -> Result<()> {
    let session = Session::open(config, bundles).context("Failed to open session")?;
    let bindings = session.load(target).context("Load failed")?;
    for binding in &bindings {
        print!("{}", describe_binding(binding));
    }
    println!(
        "Registry now holds {} file(s)",
        session.loader().registry().len()
    );
    Ok(())
}

fn cmd_decode(config: &CliConfig, bundles: &[PathBuf], input: PathBuf) -> Result<()> {
    let session = Session::open(config, bundles).context("Failed to open session")?;
    let bytes =
        std::fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let message = session.decode(&bytes).context("Decode failed")?;
    println!("{}", serde_json::to_string_pretty(&message_to_json(&message))?);
    Ok(())
}

fn cmd_export(
    config: &CliConfig,
    bundles: &[PathBuf],
    type_name: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if bundles.is_empty() && config.preload.is_empty() {
        bail!("Nothing to export from: pass --bundle or configure preload");
    }
    let session = Session::open(config, bundles).context("Failed to open session")?;
    let exported = session
        .export(type_name)
        .with_context(|| format!("Failed to export {}", type_name))?;

    match output {
        Some(path) => {
            write_bundle(&path, &exported)?;
            println!(
                "Exported {} file(s) for {} to {}",
                exported.len(),
                type_name,
                path.display()
            );
        }
        None => println!("{}", exported.to_json_pretty()?),
    }
    Ok(())
}

fn cmd_gen_config(output: PathBuf) -> Result<()> {
    let toml_str = CliConfig::example().to_toml()?;

    // Add comments
    let content = format!(
        r#"# schemaload Configuration
# Generated by schemaload gen-config

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate_config(config_path: PathBuf) -> Result<()> {
    match CliConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Log level: {}", config.log_level);
            println!("Module suffix: {}", config.loader.module_suffix);
            println!("File extension: {}", config.loader.file_extension);
            println!("Type URL prefix: {}", config.loader.type_url_prefix);
            println!("Strict symbols: {}", config.loader.strict_symbols);
            println!("Preload: {} bundle(s)", config.preload.len());
            for (i, path) in config.preload.iter().enumerate() {
                println!("  [{}] {}", i, path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}
