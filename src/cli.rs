use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger Gen - Generate OpenAPI documentation from a web application's route table
#[derive(Parser, Debug)]
#[command(name = "swagger-gen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the application manifest (YAML or JSON)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format, as served to the documentation UI
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.is_file() {
        anyhow::bail!(
            "Manifest does not exist or is not a file: {}",
            args.manifest_path.display()
        );
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Generate the document described by the manifest and return it serialized
pub fn generate(args: &CliArgs) -> Result<String> {
    use crate::manifest::Manifest;
    use crate::route::RouteTable;
    use crate::serializer::{serialize_json, serialize_yaml};
    use crate::swagger::Swagger;

    info!("Loading manifest...");
    let manifest = Manifest::load(&args.manifest_path)?;
    info!(
        "Application '{}' with {} routes",
        manifest.app_name(),
        manifest.routes.len()
    );

    let metadata = manifest.metadata_store()?;
    info!("Registered metadata for {} views", metadata.len());

    info!("Building OpenAPI document...");
    let service = Swagger::new(&manifest, manifest.config.clone())?
        .with_metadata(metadata)
        .configure()?;
    let document = service.document();

    info!("Paths documented: {}", document.paths.len());
    info!("Component schemas: {}", document.components.schemas.len());
    info!(
        "Security schemes: {}",
        document.components.security_schemes.len()
    );

    info!("Serializing to {:?} format...", args.output_format);
    match args.output_format {
        OutputFormat::Json => serialize_json(document),
        OutputFormat::Yaml => serialize_yaml(document),
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::serializer::write_to_file;

    let content = generate(&args)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}
