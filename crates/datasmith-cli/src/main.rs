mod logging;
mod output;
mod settings;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use datasmith_generate::{
    CsvOptions, FieldDescriptor, GenerationError, GeneratorInfo, GeneratorRegistry, RowCountMode,
    TableEngine, decode_fields, fields_json_schema,
};
use serde::Serialize;
use thiserror::Error;

use logging::init_logging;
use output::replace_file;
use settings::{DEFAULT_SETTINGS_FILE, Settings, load_settings, save_settings};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),
    #[error("settings encode error: {0}")]
    SettingsEncode(#[from] toml::ser::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid output path: {0}")]
    InvalidOutput(String),
    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "datasmith", version, about = "Synthetic CSV/TSV table generator")]
struct Cli {
    /// Settings file (defaults to ./datasmith.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write JSON log lines to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a table and write it to stdout or --out.
    Generate(GenerateArgs),
    /// List registered generators.
    List(ListArgs),
    /// Show metadata and parameters of one generator.
    Describe(DescribeArgs),
    /// Print the JSON Schema of a fields file.
    Schema,
    /// Manage the settings file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Field descriptor as JSON, repeated in column order.
    #[arg(long = "field", value_name = "JSON")]
    fields: Vec<String>,
    /// JSON file holding an array of field descriptors.
    #[arg(long, value_name = "PATH", conflicts_with = "fields")]
    fields_file: Option<PathBuf>,
    /// Row count; by default it counts the header line.
    #[arg(long, allow_negative_numbers = true)]
    rows: Option<i64>,
    /// Column separator: ",", "tab", or a tab character.
    #[arg(long)]
    delimiter: Option<String>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Treat --rows as the number of body rows.
    #[arg(long, default_value_t = false)]
    exact_rows: bool,
    /// Output path; stdout when omitted.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only show generators in this category.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Args, Debug)]
struct DescribeArgs {
    /// Generator id.
    id: String,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a settings file with default values.
    Init {
        /// Destination path.
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(&settings.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args, &settings),
        Command::List(args) => run_list(args),
        Command::Describe(args) => run_describe(args),
        Command::Schema => run_schema(),
        Command::Config(ConfigCommand::Init { path, force }) => run_config_init(&path, force),
    }
}

fn run_generate(args: GenerateArgs, settings: &Settings) -> CliResult<()> {
    let GenerateArgs {
        fields,
        fields_file,
        rows,
        delimiter,
        seed,
        exact_rows,
        out,
    } = args;

    let fields = match fields_file {
        Some(path) => read_fields_file(&path)?,
        None => decode_fields(&fields)?,
    };

    let row_count_mode = if exact_rows {
        RowCountMode::DataRows
    } else {
        settings.row_count_mode
    };
    let options = CsvOptions {
        delimiter: delimiter.unwrap_or_else(|| settings.delimiter.clone()),
        row_count: rows.unwrap_or(settings.row_count),
        fields,
        row_count_mode,
        seed: seed.or(settings.seed),
    };

    tracing::info!(
        event = "generate_started",
        fields = options.fields.len(),
        rows = options.row_count,
        mode = ?options.row_count_mode
    );
    let timer = Instant::now();

    let registry = GeneratorRegistry::new();
    let bytes = TableEngine::new(&registry).generate_csv(&options)?;

    match &out {
        Some(path) => replace_file(path, &bytes)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    tracing::info!(
        event = "generate_finished",
        bytes = bytes.len(),
        out = ?out,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}

fn read_fields_file(path: &Path) -> CliResult<Vec<FieldDescriptor>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| {
        CliError::Generation(GenerationError::FieldDecode(format!(
            "{}: {err}",
            path.display()
        )))
    })
}

fn run_list(args: ListArgs) -> CliResult<()> {
    let registry = GeneratorRegistry::new();
    for generator in registry.generators() {
        let info = generator.info();
        if args
            .category
            .as_deref()
            .is_some_and(|category| !category.eq_ignore_ascii_case(info.category))
        {
            continue;
        }
        println!(
            "{:<14} {:<10} {}",
            generator.id(),
            info.category,
            info.description
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct DescribedGenerator<'a> {
    id: &'a str,
    #[serde(flatten)]
    info: GeneratorInfo,
}

fn run_describe(args: DescribeArgs) -> CliResult<()> {
    let registry = GeneratorRegistry::new();
    let generator = registry
        .generator(&args.id)
        .ok_or_else(|| CliError::UnknownGenerator(args.id.clone()))?;
    let described = DescribedGenerator {
        id: generator.id(),
        info: generator.info(),
    };
    println!("{}", serde_json::to_string_pretty(&described)?);
    Ok(())
}

fn run_schema() -> CliResult<()> {
    let schema = fields_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_config_init(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidConfig(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings(path, &Settings::default())?;
    tracing::info!(event = "settings_written", path = %path.display());
    Ok(())
}
