use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use content_schema_core::{CollectionRegistry, SchemaPackage, UnknownFieldPolicy};
use content_schema_loader::{
    ContentLoader, DEFAULT_CONFIG_FILE, LoaderConfig, OutputFormat, ValidationReport,
    format_check, format_package, format_report,
};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Text => Self::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliUnknownFields {
    Preserve,
    Strip,
    Reject,
}

impl From<CliUnknownFields> for UnknownFieldPolicy {
    fn from(policy: CliUnknownFields) -> Self {
        match policy {
            CliUnknownFields::Preserve => Self::Preserve,
            CliUnknownFields::Strip => Self::Strip,
            CliUnknownFields::Reject => Self::Reject,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "content-check")]
#[command(about = "Validate site content front matter against collection schemas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate every document in a content directory.
    Validate(ValidateArgs),
    /// Validate a single file against a named collection.
    Check(CheckArgs),
    /// List registered collections.
    Collections,
    /// Print the schema package for authoring tools.
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Loader configuration file (default: ./.content-schema.yml if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Content directory (overrides the configuration).
    #[arg(long)]
    content_dir: Option<PathBuf>,
    /// Only check this collection; repeat for several.
    #[arg(long = "collection")]
    collections: Vec<String>,
    /// Policy for front-matter keys the schema does not declare.
    #[arg(long)]
    unknown_fields: Option<CliUnknownFields>,
    /// Number of parallel validation jobs (default: adaptive).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
    /// Also write the report to this file (YAML for .yml/.yaml, JSON otherwise).
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Collection to validate against.
    #[arg(long)]
    collection: String,
    /// Document to check.
    file: PathBuf,
    /// Policy for front-matter keys the schema does not declare.
    #[arg(long, default_value = "preserve")]
    unknown_fields: CliUnknownFields,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Check(args) => run_check(args),
        Command::Collections => run_collections(),
        Command::Schema(args) => run_schema(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn builtin_registry() -> Result<CollectionRegistry, String> {
    CollectionRegistry::builtin().map_err(|err| format!("invalid built-in schema: {err}"))
}

fn load_config(path: Option<&Path>) -> Result<LoaderConfig, String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(LoaderConfig::default());
            }
            default
        }
    };
    tracing::debug!(path = %path.display(), "loading configuration");
    LoaderConfig::load(&path)
        .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(content_dir) = args.content_dir {
        config.content_dir = content_dir;
    }
    if !args.collections.is_empty() {
        config.collections = args.collections;
    }
    if let Some(policy) = args.unknown_fields {
        config.unknown_fields = policy.into();
    }
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }

    let registry = builtin_registry()?;
    let loader = ContentLoader::new(&registry, config).map_err(|err| err.to_string())?;
    let outcome = loader.load().map_err(|err| err.to_string())?;
    let report = ValidationReport::from_outcome(&loader.config().content_dir, &outcome);

    emit(&format_report(&report, args.format.into())?);

    if let Some(path) = &args.report {
        let raw = format_report(&report, report_format(path))?;
        fs::write(path, raw)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} document(s) failed validation",
            report.summary.invalid, report.summary.total
        ))
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let registry = builtin_registry()?;
    let config = LoaderConfig {
        unknown_fields: args.unknown_fields.into(),
        ..LoaderConfig::default()
    };
    let loader = ContentLoader::new(&registry, config).map_err(|err| err.to_string())?;

    let display = args.file.display().to_string();
    let result = loader
        .check_file(&args.collection, &args.file, &display)
        .map_err(|err| err.to_string())?;
    emit(&format_check(&result, args.format.into())?);

    match result {
        Ok(_) => Ok(()),
        Err(failure) => Err(format!("{display} is not a valid '{}' document", failure.collection)),
    }
}

fn run_collections() -> Result<(), String> {
    let registry = builtin_registry()?;
    for collection in registry.all() {
        println!(
            "{:<14} {:<5} {}",
            collection.name(),
            collection.kind().to_string(),
            collection.source()
        );
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), String> {
    let registry = builtin_registry()?;
    let package = SchemaPackage::from_registry(PACKAGE_VERSION, &registry);
    emit(&format_package(&package, args.format.into())?);
    Ok(())
}

fn report_format(path: &Path) -> OutputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml" | "yaml") => OutputFormat::Yaml,
        _ => OutputFormat::Json,
    }
}

fn emit(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}
