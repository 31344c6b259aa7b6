//! `cwlog` command-line entry point.

mod error;

use clap::{Parser, Subcommand};
use cwlog_config::{ConfigFormat, logging_config_schema};
use cwlog_facade::{
    FieldMap, FieldValue, LogLevel, LogRecord, LoggerFactory, load_logging_config_std_env,
};
use error::{CliError, ExitCode};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "cwlog",
    version,
    about = "Structured logging with CloudWatch-style output",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emit one event through the configured pipeline.
    Emit {
        /// Config file (`.json` or `.toml`); `CWLOG_*` env vars apply on top.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "info", value_parser = parse_level)]
        level: LogLevel,
        #[arg(long, default_value = "cwlog")]
        logger: String,
        /// Positional argument for `%` placeholders in MESSAGE.
        #[arg(long = "arg", value_name = "VALUE")]
        args: Vec<String>,
        #[arg(value_name = "MESSAGE")]
        message: String,
        #[arg(value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Inspect the logging configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective config after env overrides.
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },
    /// Print the JSON schema of the config file.
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ShowFormat {
    Json,
    Toml,
}

impl From<ShowFormat> for ConfigFormat {
    fn from(value: ShowFormat) -> Self {
        match value {
            ShowFormat::Json => Self::Json,
            ShowFormat::Toml => Self::Toml,
        }
    }
}

pub(crate) struct CliOutput {
    stdout: String,
    exit_code: ExitCode,
}

impl CliOutput {
    const fn empty() -> Self {
        Self {
            stdout: String::new(),
            exit_code: ExitCode::Ok,
        }
    }

    const fn text(stdout: String) -> Self {
        Self {
            stdout,
            exit_code: ExitCode::Ok,
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    if output.stdout.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn run(command: &Commands) -> Result<CliOutput, CliError> {
    match command {
        Commands::Emit {
            config,
            level,
            logger,
            args,
            message,
            fields,
        } => run_emit(config.as_deref(), *level, logger, args, message, fields),
        Commands::Config { command } => match command {
            ConfigCommands::Show { config, format } => {
                config_show(config.as_deref(), (*format).into())
            },
            ConfigCommands::Schema => config_schema(),
        },
    }
}

fn run_emit(
    config_path: Option<&Path>,
    level: LogLevel,
    logger_name: &str,
    args: &[String],
    message: &str,
    fields: &[String],
) -> Result<CliOutput, CliError> {
    let config = load_logging_config_std_env(config_path)?;
    let fields = parse_fields(fields)?;
    let factory = LoggerFactory::new(config);
    let record = LogRecord::new(level, message)
        .with_args(args.iter().map(String::as_str).map(parse_scalar))
        .with_fields(fields);

    factory.get_logger(logger_name).log(record)?;
    Ok(CliOutput::empty())
}

fn config_show(config_path: Option<&Path>, format: ConfigFormat) -> Result<CliOutput, CliError> {
    let config = load_logging_config_std_env(config_path)?;
    Ok(CliOutput::text(format.render(config.as_ref())?))
}

fn config_schema() -> Result<CliOutput, CliError> {
    let mut stdout = serde_json::to_string_pretty(&logging_config_schema())?;
    stdout.push('\n');
    Ok(CliOutput::text(stdout))
}

fn parse_level(input: &str) -> Result<LogLevel, String> {
    LogLevel::parse(input).ok_or_else(|| format!("unknown log level `{input}`"))
}

fn parse_fields(pairs: &[String]) -> Result<FieldMap, CliError> {
    let mut fields = FieldMap::with_capacity(pairs.len());
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::InvalidInput(format!(
                "field `{pair}` must look like KEY=VALUE"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "field `{pair}` has an empty key"
            )));
        }
        fields.insert(key, parse_scalar(value));
    }
    Ok(fields)
}

/// Typed value for a command-line string: bool, integer, float, else text.
fn parse_scalar(raw: &str) -> FieldValue {
    match raw {
        "true" => return FieldValue::Bool(true),
        "false" => return FieldValue::Bool(false),
        "null" => return FieldValue::Null,
        _ => {},
    }
    if let Ok(value) = raw.parse::<i64>() {
        return FieldValue::Int(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => FieldValue::Float(value),
        _ => FieldValue::from(raw),
    }
}
