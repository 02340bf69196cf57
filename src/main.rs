use std::{io, process};

use clap::Parser;
use crud_resolver::{
    app::{AnalyzeParams, effective_log_level, run_analyze},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            facts,
            config,
            dialect,
            output_format,
            sequential,
            verbose,
            no_color
        } => {
            let config = match config {
                Some(path) => {
                    let mut config = Config::from_file(&path)?;
                    config.apply_env()?;
                    config
                }
                None => Config::load()?
            };
            init_tracing(&effective_log_level(verbose, &config));

            let params = AnalyzeParams {
                facts_path: facts.display().to_string(),
                dialect,
                output_format,
                sequential,
                verbose,
                no_color
            };
            let result = run_analyze(params, config)?;
            println!("{}", result.output);
            Ok(result.exit_code)
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("CRUD_RESOLVER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("crud_resolver={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
