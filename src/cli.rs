use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// CRUD Resolver - Map service endpoints to the tables they touch
#[derive(Parser, Debug)]
#[command(name = "crud-resolver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve endpoints to CRUD links
    Analyze {
        /// Path to facts file (JSON, YAML or TOML; use - for JSON on stdin)
        #[arg(long)]
        facts: PathBuf,

        /// Explicit configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQL dialect for parsing (overrides configuration)
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Resolve endpoints on a single thread
        #[arg(long)]
        sequential: bool,

        /// Enable verbose output with run statistics
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
