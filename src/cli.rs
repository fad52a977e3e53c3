use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::types::SchemaVersion;

/// hcl-recipe - resolve HCL build variants into CMake definitions
#[derive(Parser)]
#[command(name = "hcl-recipe")]
#[command(about = "Resolve HCL build variants into CMake definitions and package dependencies")]
#[command(version)]
pub struct Cli {
    /// Log resolution steps to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a variant selection into build definitions
    Resolve {
        /// Recipe revision to resolve against
        #[arg(short, long)]
        schema: Option<SchemaVersion>,

        /// Install prefix (CMAKE_INSTALL_PREFIX)
        #[arg(short, long)]
        prefix: Option<String>,

        /// Build configuration file to start from; selections on the command line override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Variant selections, e.g. `+thallium~ofi` or `debug=true`
        #[arg(allow_hyphen_values = true)]
        selection: Vec<String>,
    },
    /// Describe a recipe revision: versions, variants, dependencies, conflicts
    Info {
        /// Recipe revision to describe
        #[arg(short, long, default_value_t = SchemaVersion::default())]
        schema: SchemaVersion,
    },
    /// Validate a build configuration file
    Validate {
        /// Path to build configuration file to validate
        config: PathBuf,
    },
}

/// How `resolve` prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `NAME=VALUE` lines, then dependencies
    Text,
    /// `-DNAME=VALUE` arguments on one line
    Cmake,
    /// The full resolution as JSON
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
