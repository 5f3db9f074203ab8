//! apidox - Command-line tool for generating API documentation from recorded
//! HTTP test interactions.
//!
//! This binary reads a capture file (a JSON array of request/response
//! interactions recorded during a test-suite run), assembles the API
//! description document, and writes it as JSON or markdown.
//!
//! # Usage
//!
//! ```bash
//! apidox [OPTIONS] <CAPTURE_FILE>
//! ```
//!
//! # Examples
//!
//! Generate the JSON document tree:
//! ```bash
//! apidox captures.json -o apidoc.json
//! ```
//!
//! Generate markdown documentation:
//! ```bash
//! apidox captures.json -f markdown -o apidoc.md
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidox captures.json -v
//! ```

mod attribute;
mod cli;
mod collector;
mod config;
mod document;
mod error;
mod record;
mod registry;
mod renderer;
mod serializer;
mod template;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("apidox starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("API documentation generation completed successfully");

    Ok(())
}
