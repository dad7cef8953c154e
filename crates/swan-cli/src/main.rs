// crates/swan-cli/src/main.rs
// ============================================================================
// Module: SWAN CLI Entry Point
// Description: Command dispatcher for SWAN key, entity, and config tasks.
// Purpose: Offline tooling for operators of a participating SWAN node.
// Dependencies: clap, swan-core, swan-config, swan-node, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The `swan` binary covers the offline chores of running a node:
//! generating an ed25519 key pair, decoding a keyed entity for display,
//! verifying one against the configured trust roots, and validating the
//! node configuration file.
//!
//! Security posture: entity input and key files are untrusted and are
//! decoded through the same bounded paths the node uses.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ed25519_dalek::SigningKey;
use swan_config::SwanConfig;
use swan_core::TrustScheme;
use swan_node::Ed25519Signer;
use swan_node::InspectReport;
use swan_node::Keyring;
use swan_node::signer::generate_signing_key;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the generated secret key.
const SECRET_KEY_FILE: &str = "swan.key";
/// File name of the generated public key.
const PUBLIC_KEY_FILE: &str = "swan.pub";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "swan", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an ed25519 key pair for a node.
    Keygen(KeygenCommand),
    /// Decode a keyed entity and print it as JSON.
    Inspect(InspectCommand),
    /// Verify a keyed entity against configured issuer keys.
    Verify(VerifyCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `keygen`.
#[derive(Args, Debug)]
struct KeygenCommand {
    /// Directory receiving `swan.key` and `swan.pub`.
    #[arg(long, value_name = "DIR")]
    out: PathBuf,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
struct InspectCommand {
    /// Storage or cookie key selecting the entity decoder.
    #[arg(long, value_name = "KEY")]
    key: String,
    /// Base64 entity bytes.
    #[arg(value_name = "BASE64")]
    input: String,
}

/// Arguments for `verify`.
#[derive(Args, Debug)]
struct VerifyCommand {
    /// Node configuration file.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    /// Storage or cookie key selecting the entity decoder.
    #[arg(long, value_name = "KEY")]
    key: String,
    /// Base64 entity bytes.
    #[arg(value_name = "BASE64")]
    input: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a SWAN configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Configuration file; defaults to `SWAN_CONFIG` or `swan.toml`.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a display message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Message written to stderr.
    message: String,
}

impl CliError {
    /// Creates a new CLI error.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runs the CLI and maps failures to a non-zero exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments and dispatches the selected command.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Keygen(command) => command_keygen(&command),
        Commands::Inspect(command) => command_inspect(&command),
        Commands::Verify(command) => command_verify(&command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Writes a fresh key pair to the output directory.
fn command_keygen(command: &KeygenCommand) -> CliResult<ExitCode> {
    let key = generate_signing_key();
    let (secret_path, public_path) = write_key_pair(&command.out, &key)?;
    write_stdout_line(&format!("wrote {}", secret_path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line(&format!("wrote {}", public_path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Decodes an entity without verifying it.
fn command_inspect(command: &InspectCommand) -> CliResult<ExitCode> {
    let report = InspectReport::from_base64(&command.key, &command.input, None, &TrustScheme::AnyKnownIssuer)
        .map_err(|err| CliError::new(format!("inspect failed: {err}")))?;
    write_report(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Decodes and verifies an entity; fails unless the proof checks out.
fn command_verify(command: &VerifyCommand) -> CliResult<ExitCode> {
    let config = load_config(Some(&command.config))?;
    let keyring = keyring_for(&config)?;
    let report =
        InspectReport::from_base64(&command.key, &command.input, Some(&keyring), &TrustScheme::AnyKnownIssuer)
            .map_err(|err| CliError::new(format!("verify failed: {err}")))?;
    write_report(&report)?;
    Ok(verification_exit_code(&report))
}

/// Loads and validates a configuration file.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    write_stdout_line(&format!("config ok: node {}", config.node.domain))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration, mapping failures to a CLI error.
fn load_config(path: Option<&Path>) -> CliResult<SwanConfig> {
    SwanConfig::load(path).map_err(|err| CliError::new(format!("config invalid: {err}")))
}

/// Builds the keyring a node would verify with, including its own key.
fn keyring_for(config: &SwanConfig) -> CliResult<Keyring> {
    let mut keyring =
        Keyring::from_config(&config.trust).map_err(|err| CliError::new(format!("trust keys: {err}")))?;
    if let Some(path) = config.node.signing_key.as_deref()
        && !keyring.contains(&config.node.domain)
    {
        let signer = Ed25519Signer::load(config.node.domain.clone(), Path::new(path.trim()))
            .map_err(|err| CliError::new(format!("node key: {err}")))?;
        keyring
            .insert(config.node.domain.clone(), signer.verifying_key())
            .map_err(|err| CliError::new(format!("node key: {err}")))?;
    }
    Ok(keyring)
}

/// Maps a verification report to the process exit code.
fn verification_exit_code(report: &InspectReport) -> ExitCode {
    if report.verified == Some(true) { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Writes base64 secret and public keys, refusing to overwrite.
fn write_key_pair(dir: &Path, key: &SigningKey) -> CliResult<(PathBuf, PathBuf)> {
    let secret_path = dir.join(SECRET_KEY_FILE);
    let public_path = dir.join(PUBLIC_KEY_FILE);
    write_new_file(&secret_path, &BASE64.encode(key.to_bytes()))?;
    write_new_file(&public_path, &BASE64.encode(key.verifying_key().to_bytes()))?;
    Ok((secret_path, public_path))
}

/// Creates `path` with `contents`, failing if it already exists.
fn write_new_file(path: &Path, contents: &str) -> CliResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| CliError::new(format!("unable to create {}: {err}", path.display())))?;
    writeln!(file, "{contents}").map_err(|err| CliError::new(format!("unable to write {}: {err}", path.display())))
}

/// Serializes a report as pretty JSON to stdout.
fn write_report(report: &InspectReport) -> CliResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| CliError::new(format!("unable to render report: {err}")))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
