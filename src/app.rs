// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod pattern;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;

use self::cli::Cli;
use self::config::resolve_config;
use self::error::DumpError;
use self::formatter::OutputGenerator;
use self::models::DumpConfig;
use self::scanner::Scanner;

/// Collects, formats and writes the dump. Returns the path written.
///
/// Nothing touches the output path until every file has been read, so a
/// failed run leaves any previous dump in place.
pub fn generate_context_dump(config: &DumpConfig) -> error::Result<PathBuf> {
    let config = config.resolved().map_err(|e| DumpError::InvalidRoot {
        path: config.root_dir.clone(),
        reason: e.to_string(),
    })?;

    // 1. Collect
    let scanner = Scanner::new(&config)?;
    let mut files = scanner.scan()?;
    // Plain string order, not component order: `a-b/x` sorts before `a/b`.
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    // 2. Format
    let blocks = files
        .iter()
        .map(|path| OutputGenerator::format_file(path, &config.root_dir, &config.language_map))
        .collect::<error::Result<Vec<_>>>()?;
    let content = OutputGenerator::generate_content(&blocks);

    // 3. Write
    let output_path = config.output_path();
    fs::write(&output_path, content).map_err(|source| DumpError::Write {
        path: output_path.clone(),
        source,
    })?;

    log::info!(
        "Dumped {} files from {} to {}",
        blocks.len(),
        config.root_dir.display(),
        output_path.display()
    );
    Ok(output_path)
}

/// CLI entry: resolves configuration and runs one dump.
pub fn run() -> Result<()> {
    let args = Cli::parse();
    let current_dir = env::current_dir().context("Failed to get current directory")?;

    let config = resolve_config(args, &current_dir)?;
    generate_context_dump(&config)?;

    Ok(())
}
