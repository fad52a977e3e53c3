//! hcl-recipe - Main entry point
//!
//! Resolves HCL build variants into CMake definitions from the command line.

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hcl_recipe::cli::{Cli, Commands, OutputFormat};
use hcl_recipe::config_file::{BuildConfig, DEFAULT_PREFIX};
use hcl_recipe::error::RecipeError;
use hcl_recipe::logic::resolver::resolve;
use hcl_recipe::report::{render_resolution, render_schema};
use hcl_recipe::schema::schema;
use hcl_recipe::types::SchemaVersion;
use hcl_recipe::variant_set::{parse_selection, VariantSet};

/// Initialize the logger with appropriate settings
///
/// Logs go to stderr so resolved flags on stdout can be piped straight into
/// a CMake invocation.
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env() // Allows RUST_LOG env var to override
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Resolve {
            schema,
            prefix,
            config,
            format,
            selection,
        } => run_resolve(schema, prefix, config, format, &selection),
        Commands::Info { schema: version } => {
            print!("{}", render_schema(schema(version)));
            Ok(())
        }
        Commands::Validate { config } => {
            info!("Validating build configuration: {:?}", config);
            let loaded = match BuildConfig::load_from_file(&config) {
                Ok(loaded) => loaded,
                Err(e) => {
                    debug!("Failed to load build configuration: {:#}", e);
                    eprintln!("✗ Failed to load build configuration: {:#}", e);
                    std::process::exit(1);
                }
            };
            match loaded.validate() {
                Ok(()) => {
                    println!("✓ Build configuration is valid: {:?}", config);
                    Ok(())
                }
                Err(e) => {
                    debug!("Build configuration validation failed: {:#}", e);
                    eprintln!("✗ Build configuration validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Resolve from an optional config file plus command-line selections.
///
/// Command-line schema and prefix take precedence over the file; command-line
/// selections are applied after the file's.
fn run_resolve(
    schema: Option<SchemaVersion>,
    prefix: Option<String>,
    config: Option<std::path::PathBuf>,
    format: OutputFormat,
    selection: &[String],
) -> Result<()> {
    let base = match config {
        Some(path) => BuildConfig::load_from_file(&path)?,
        None => BuildConfig::new(),
    };
    let version = schema.unwrap_or(base.schema);
    let prefix = prefix.unwrap_or_else(|| {
        if base.prefix.is_empty() {
            DEFAULT_PREFIX.to_string()
        } else {
            base.prefix.clone()
        }
    });

    let cli_selections = parse_selection(&selection.join(" "))?;
    let variants = VariantSet::from_selections(
        version,
        base.variants
            .iter()
            .map(|(name, on)| (name.clone(), *on))
            .chain(cli_selections),
    );
    debug!(schema = %version, variants = %variants, "selection assembled");

    match resolve(&variants, &prefix) {
        Ok(resolution) => {
            print!("{}", render_resolution(&resolution, format)?);
            Ok(())
        }
        Err(RecipeError::ConfigurationConflict(message)) => {
            debug!("Resolution failed: {}", message);
            eprintln!("✗ {}", message);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
