use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;

/// apidox - Generate API documentation from recorded HTTP test interactions
#[derive(Parser, Debug)]
#[command(name = "apidox")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the capture file (a JSON array of recorded interactions)
    #[arg(value_name = "CAPTURE_FILE")]
    pub capture_path: PathBuf,

    /// Output format (json or markdown)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Path to a JSON configuration file (whitelist, schema/description folders)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Document tree as pretty-printed JSON
    Json,
    /// API Blueprint style markdown
    Markdown,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.capture_path.exists() {
        anyhow::bail!(
            "Capture file does not exist: {}",
            args.capture_path.display()
        );
    }

    if !args.capture_path.is_file() {
        anyhow::bail!(
            "Capture path is not a file: {}",
            args.capture_path.display()
        );
    }

    info!("Capture file: {}", args.capture_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::collector::DocumentCollector;
    use crate::config::DocConfig;
    use crate::record::RecordedInteraction;
    use crate::renderer::render_markdown;
    use crate::serializer::{serialize_json, write_to_file};

    info!("Starting API documentation generation...");

    // Step 1: Load configuration
    let config = if let Some(config_path) = &args.config_path {
        info!("Loading configuration from: {}", config_path.display());
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        serde_json::from_str::<DocConfig>(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?
    } else {
        DocConfig::default()
    };

    // Step 2: Load recorded interactions
    info!("Loading capture file...");
    let content = fs::read_to_string(&args.capture_path).with_context(|| {
        format!("Failed to read capture file: {}", args.capture_path.display())
    })?;
    let interactions: Vec<RecordedInteraction> =
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse capture file: {}", args.capture_path.display())
        })?;

    info!("Loaded {} recorded interactions", interactions.len());

    if interactions.is_empty() {
        warn!("Capture file contains no interactions");
    }

    // Step 3: Fold every interaction into the registry and document tree.
    // An interaction with an unrecognized verb is rejected and logged, but
    // does not abort the run.
    info!("Building document tree...");
    let mut collector = DocumentCollector::new(&config);
    let mut rejected = 0usize;

    for interaction in &interactions {
        if let Err(e) = collector.record(interaction) {
            log::error!(
                "Rejected interaction '{}': {}",
                interaction.metadata.description,
                e
            );
            rejected += 1;
        }
    }

    let (registry, tree) = collector.into_parts();
    info!(
        "Document tree built: {} resources, {} rejected interactions",
        registry.resources().len(),
        rejected
    );

    // Step 4: Render to the requested format
    info!("Rendering to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&tree)?,
        OutputFormat::Markdown => render_markdown(&registry, &config)?,
    };

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote documentation to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 6: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Interactions processed: {}", interactions.len() - rejected);
    info!("  - Interactions rejected: {}", rejected);
    info!("  - Resources documented: {}", registry.resources().len());
    info!("  - Paths documented: {}", tree.len());

    Ok(())
}
