//! Swagger Gen - Command-line tool for generating OpenAPI documentation.
//!
//! Reads a manifest describing a web application's routes, documentation settings and
//! per-view metadata, and writes the OpenAPI 3.0.1 document the application would serve
//! at `/swagger/v1/swagger.json`.
//!
//! # Usage
//!
//! ```bash
//! swagger-gen [OPTIONS] <MANIFEST>
//! ```
//!
//! # Examples
//!
//! ```bash
//! swagger-gen app.yaml -o swagger.json
//! swagger-gen app.yaml -f yaml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_gen::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger Gen starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
