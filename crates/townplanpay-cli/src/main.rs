// crates/townplanpay-cli/src/main.rs
// ============================================================================
// Module: TownPlanPay CLI Entry Point
// Description: Command dispatcher for the TownPlanPay service and evaluator.
// Purpose: Serve the HTTP API, evaluate evidence locally, and query a service.
// Dependencies: clap, townplanpay-config, townplanpay-core, townplanpay-server,
//               serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The `townplanpay` binary starts the HTTP service, evaluates a single
//! evidence document offline, or submits one to a running service. All
//! human-facing strings are routed through the CLI message catalog. Evidence
//! inputs are untrusted and read with a hard size limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use townplanpay_cli::client::DEFAULT_TIMEOUT_MS;
use townplanpay_cli::client::ErrorDecision;
use townplanpay_cli::client::SuggestClient;
use townplanpay_cli::client::SuggestError;
use townplanpay_cli::t;
use townplanpay_config::MAX_MAX_BODY_BYTES;
use townplanpay_config::TownPlanPayConfig;
use townplanpay_config::config_toml_example;
use townplanpay_core::CoercionMode;
use townplanpay_core::MilestoneDecision;
use townplanpay_core::MilestoneEvidence;
use townplanpay_core::evaluate_milestone;
use townplanpay_server::TownPlanPayServer;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an evidence JSON input.
const MAX_EVIDENCE_BYTES: usize = MAX_MAX_BODY_BYTES;
/// Input path that selects stdin.
const STDIN_PATH: &str = "-";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "townplanpay", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the TownPlanPay HTTP service.
    Serve(ServeCommand),
    /// Evaluate one evidence document locally.
    Evaluate(EvaluateCommand),
    /// Submit one evidence document to a running service.
    Suggest(SuggestCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
    /// Print a configuration file populated with defaults.
    Example,
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to townplanpay.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `evaluate`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Evidence JSON file, or `-` for stdin.
    #[arg(long, value_name = "PATH", default_value = STDIN_PATH)]
    input: PathBuf,
    /// Coercion policy for non-numeric evidence values.
    #[arg(long, value_enum, default_value_t = CoercionArg::Strict)]
    coercion: CoercionArg,
}

/// Arguments for `suggest`.
#[derive(Args, Debug)]
struct SuggestCommand {
    /// Base URL of the running service.
    #[arg(long, value_name = "URL")]
    url: String,
    /// Evidence JSON file, or `-` for stdin.
    #[arg(long, value_name = "PATH", default_value = STDIN_PATH)]
    input: PathBuf,
    /// Request timeout in milliseconds.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1 ..)
    )]
    timeout_ms: u64,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to townplanpay.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Coercion policies selectable on the command line.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum CoercionArg {
    /// Reject non-numeric evidence values.
    Strict,
    /// Let non-numeric values flow through as `NaN`.
    Compatible,
}

impl From<CoercionArg> for CoercionMode {
    fn from(value: CoercionArg) -> Self {
        match value {
            CoercionArg::Strict => Self::Strict,
            CoercionArg::Compatible => Self::Compatible,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Suggest(command) => command_suggest(&command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = TownPlanPayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("serve.config.load_failed", error = err)))?;
    let bind = config
        .server
        .bind_addr()
        .map_err(|err| CliError::new(t!("serve.config.load_failed", error = err)))?;
    if !bind.ip().is_loopback() {
        write_stderr_line(&t!("serve.warn.non_loopback", bind = bind))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    write_stderr_line(&t!(
        "serve.starting",
        bind = bind,
        coercion = config.evaluator.coercion.as_str(),
        balance = config.payments.starting_balance,
        currency = config.payments.currency
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;

    let server = TownPlanPayServer::from_config(config)
        .map_err(|err| CliError::new(t!("serve.init_failed", error = err)))?;
    server.serve().await.map_err(|err| CliError::new(t!("serve.failed", error = err)))?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// Executes the `evaluate` command.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let value = read_evidence(&command.input)?;
    let evidence = MilestoneEvidence::from_json(&value, command.coercion.into())
        .map_err(|err| CliError::new(t!("evaluate.evidence_invalid", error = err)))?;
    let decision = evaluate_milestone(&evidence);
    write_json_line(&decision)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Suggest Command
// ============================================================================

/// Executes the `suggest` command.
///
/// Service failures print the caller-side error decision to stdout and the
/// failure detail to stderr, then exit non-zero.
async fn command_suggest(command: &SuggestCommand) -> CliResult<ExitCode> {
    let value = read_evidence(&command.input)?;
    match request_suggestion(command, &value).await {
        Ok(decision) => {
            write_json_line(&decision)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            write_json_line(&ErrorDecision::connection())?;
            write_stderr_line(&t!("suggest.failed", error = err))
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Builds a client for the target service and submits `evidence`.
async fn request_suggestion(
    command: &SuggestCommand,
    evidence: &Value,
) -> Result<MilestoneDecision, SuggestError> {
    let client = SuggestClient::new(&command.url, Duration::from_millis(command.timeout_ms))?;
    client.suggest(evidence).await
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = TownPlanPayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the default configuration as TOML.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded reads.
#[derive(Debug)]
enum ReadLimitError {
    /// I/O failure.
    Io(std::io::Error),
    /// Input size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads and parses an evidence document from a file or stdin.
fn read_evidence(path: &Path) -> CliResult<Value> {
    let kind = t!("input.kind.evidence");
    let read = if path.as_os_str() == STDIN_PATH {
        read_stdin_with_limit(MAX_EVIDENCE_BYTES)
    } else {
        read_bytes_with_limit(path, MAX_EVIDENCE_BYTES)
    };
    let bytes = read.map_err(|err| match err {
        ReadLimitError::Io(error) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = error
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(t!("input.parse_failed", kind = kind, error = err)))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    read_limited(file, max_bytes)
}

/// Reads stdin while enforcing a hard size limit.
fn read_stdin_with_limit(max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    read_limited(std::io::stdin().lock(), max_bytes)
}

/// Reads at most one byte past `max_bytes` and rejects oversized input.
fn read_limited(reader: impl Read, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let read_limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut limited = reader.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a value as one line of compact JSON to stdout.
fn write_json_line<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_json::to_vec(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a catalog output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
