// crates/metrics-discovery-cli/src/main.rs
// ============================================================================
// Module: Metrics Discovery CLI Entry Point
// Description: Command dispatcher for discovery runs and document inspection.
// Purpose: Run discovery against live AWS inventory from the command line.
// Dependencies: clap, metrics-discovery-aws, metrics-discovery-config,
//               metrics-discovery-core, serde_json, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The `metrics-discovery` binary loads configuration, opens an AWS session,
//! and runs one of: a full discovery run for a stack version, a read-only
//! view of the stored document across versions, or a database lookup per
//! release. Results are printed to stdout as JSON; audit events go to the
//! configured sink.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use metrics_discovery_aws::AwsSession;
use metrics_discovery_config::DiscoveryConfig;
use metrics_discovery_config::LogConfig;
use metrics_discovery_config::LogSinkKind;
use metrics_discovery_config::config_toml_example;
use metrics_discovery_core::Category;
use metrics_discovery_core::ConfigDocument;
use metrics_discovery_core::DiscoveryAuditSink;
use metrics_discovery_core::DiscoveryEngine;
use metrics_discovery_core::DocumentStore;
use metrics_discovery_core::EnvironmentInstances;
use metrics_discovery_core::FileAuditSink;
use metrics_discovery_core::Gateway;
use metrics_discovery_core::InventoryResolver;
use metrics_discovery_core::LoadedDocument;
use metrics_discovery_core::NoopAuditSink;
use metrics_discovery_core::StackIdentity;
use metrics_discovery_core::StderrAuditSink;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "metrics-discovery", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Optional config file path (defaults to metrics-discovery.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover identifiers for a stack version and merge them into the document.
    Discover(DiscoverCommand),
    /// Print stored identifiers per category across stack versions.
    Show(ShowCommand),
    /// Print database instance ids per release and the id generator database.
    Databases(DatabasesCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Session overrides shared by commands that reach AWS.
#[derive(Args, Debug, Default)]
struct SessionArgs {
    /// Credentials profile (overrides `aws.profile`).
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,
    /// AWS region (overrides `aws.region`).
    #[arg(long, value_name = "REGION")]
    region: Option<String>,
}

/// Arguments for the `discover` command.
#[derive(Args, Debug)]
struct DiscoverCommand {
    /// Stack name (for example `prod`).
    #[arg(long, value_name = "STACK")]
    stack: String,
    /// Version label used in document keys.
    #[arg(long = "version", value_name = "VERSION")]
    stack_version: String,
    /// Instance labels as `repo,workers,portal`.
    #[arg(long, value_name = "LABELS")]
    instances: String,
    /// Resolve and report without saving the document.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Session overrides.
    #[command(flatten)]
    session: SessionArgs,
}

/// Arguments for the `show` command.
#[derive(Args, Debug)]
struct ShowCommand {
    /// Stack name.
    #[arg(long, value_name = "STACK")]
    stack: String,
    /// Comma-separated version labels, in display order.
    #[arg(long, value_name = "VERSIONS")]
    versions: String,
    /// Session overrides.
    #[command(flatten)]
    session: SessionArgs,
}

/// Arguments for the `databases` command.
#[derive(Args, Debug)]
struct DatabasesCommand {
    /// Stack name.
    #[arg(long, value_name = "STACK")]
    stack: String,
    /// Comma-separated release suffixes.
    #[arg(long, value_name = "RELEASES")]
    releases: String,
    /// Session overrides.
    #[command(flatten)]
    session: SessionArgs,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a metrics discovery configuration file.
    Validate,
    /// Print the canonical example configuration.
    Example,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Stored values of one category across versions.
#[derive(Debug, Serialize)]
struct CategoryValues<'a> {
    /// Category key suffix.
    category: &'static str,
    /// Values in version order.
    values: Vec<&'a str>,
}

/// Database instances of one release.
#[derive(Debug, Serialize)]
struct ReleaseDatabases {
    /// Release suffix.
    release: String,
    /// Matching database instance ids.
    instances: Vec<String>,
}

/// Output of the `databases` command.
#[derive(Debug, Serialize)]
struct DatabasesOutput {
    /// Stack name.
    stack: String,
    /// Per-release instances.
    releases: Vec<ReleaseDatabases>,
    /// Id generator database instance id.
    idgen: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
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
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Discover(command) => command_discover(cli.config, &command),
        Commands::Show(command) => command_show(cli.config, &command),
        Commands::Databases(command) => command_databases(cli.config, &command),
        Commands::Config {
            command,
        } => command_config(cli.config, &command),
    }
}

// ============================================================================
// SECTION: Discovery Commands
// ============================================================================

/// Executes a discovery run.
fn command_discover(
    config_path: Option<PathBuf>,
    command: &DiscoverCommand,
) -> CliResult<ExitCode> {
    let instances = EnvironmentInstances::parse(&command.instances)
        .map_err(|err| CliError::new(err.to_string()))?;
    let identity = StackIdentity::new(&command.stack, &command.stack_version, instances);
    let config = load_config(config_path, &command.session)?;
    let audit = build_audit_sink(&config.log)?;
    let gateway = connect(&config)?;
    let store = open_store(&config, &gateway, &identity.stack, audit.clone())?;
    let engine = DiscoveryEngine::new(InventoryResolver::new(gateway), store, audit);
    let report = if command.dry_run {
        let mut document = engine
            .load_document()
            .map_err(|err| CliError::new(format!("document load failed: {err}")))?
            .into_document();
        engine.collect(&mut document, &identity)
    } else {
        engine
            .discover(&identity)
            .map_err(|err| CliError::new(format!("discovery failed: {err}")))?
    };
    write_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints stored values per category across versions.
fn command_show(config_path: Option<PathBuf>, command: &ShowCommand) -> CliResult<ExitCode> {
    let versions = split_list(&command.versions);
    if versions.is_empty() {
        return Err(CliError::new("--versions must name at least one version"));
    }
    let config = load_config(config_path, &command.session)?;
    let audit = build_audit_sink(&config.log)?;
    let gateway = connect(&config)?;
    let store = open_store(&config, &gateway, &command.stack, audit)?;
    let document = stored_document(&store)?;
    write_json(&category_values(&document, &versions))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints database instance ids per release.
fn command_databases(
    config_path: Option<PathBuf>,
    command: &DatabasesCommand,
) -> CliResult<ExitCode> {
    let releases = split_list(&command.releases);
    let config = load_config(config_path, &command.session)?;
    let resolver = InventoryResolver::new(connect(&config)?);
    let output = databases_output(&resolver, &command.stack, &releases)?;
    write_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(config_path: Option<PathBuf>, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            DiscoveryConfig::load(config_path.as_deref())
                .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
            write_stdout_line("config ok").map_err(|err| output_error("stdout", &err))?;
        }
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| output_error("stdout", &err))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration and applies session overrides.
fn load_config(path: Option<PathBuf>, session: &SessionArgs) -> CliResult<DiscoveryConfig> {
    let config = DiscoveryConfig::load(path.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?
        .with_overrides(session.profile.clone(), session.region.clone());
    config.validate().map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    Ok(config)
}

/// Builds the audit sink selected by configuration.
fn build_audit_sink(log: &LogConfig) -> CliResult<Arc<dyn DiscoveryAuditSink>> {
    match (log.sink, &log.path) {
        (LogSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (LogSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (LogSinkKind::File, Some(path)) => FileAuditSink::new(path)
            .map(|sink| Arc::new(sink) as Arc<dyn DiscoveryAuditSink>)
            .map_err(|err| {
                CliError::new(format!("failed to open audit log {}: {err}", path.display()))
            }),
        (LogSinkKind::File, None) => Err(CliError::new("log.path is required for the file sink")),
    }
}

/// Opens an AWS session and returns its gateway.
fn connect(config: &DiscoveryConfig) -> CliResult<Gateway> {
    let session = AwsSession::connect(&config.aws)
        .map_err(|err| CliError::new(format!("aws session failed: {err}")))?;
    Ok(session.gateway())
}

/// Opens the document store for a stack.
fn open_store(
    config: &DiscoveryConfig,
    gateway: &Gateway,
    stack: &str,
    audit: Arc<dyn DiscoveryAuditSink>,
) -> CliResult<DocumentStore> {
    let location = config.location_for(stack).map_err(|err| CliError::new(err.to_string()))?;
    let store = DocumentStore::try_new(gateway, location, audit)
        .map_err(|err| CliError::new(err.to_string()))?;
    Ok(store.with_max_bytes(config.storage.max_document_bytes))
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|entry| !entry.is_empty()).map(String::from).collect()
}

/// Reads the stored document for display; a missing object reads as empty.
fn stored_document(store: &DocumentStore) -> CliResult<ConfigDocument> {
    store
        .load()
        .and_then(LoadedDocument::into_current)
        .map_err(|err| CliError::new(format!("document unavailable: {err}")))
}

/// Collects stored values for every category across versions.
fn category_values<'a>(
    document: &'a ConfigDocument,
    versions: &[String],
) -> Vec<CategoryValues<'a>> {
    let view = document.view();
    Category::DISCOVERY_ORDER
        .into_iter()
        .map(|category| CategoryValues {
            category: category.suffix(),
            values: view.across(versions, category),
        })
        .collect()
}

/// Resolves database ids per release plus the id generator database.
fn databases_output(
    resolver: &InventoryResolver,
    stack: &str,
    releases: &[String],
) -> CliResult<DatabasesOutput> {
    let releases = releases
        .iter()
        .map(|release| {
            resolver
                .database_instance_ids(stack, release)
                .map(|instances| ReleaseDatabases {
                    release: release.clone(),
                    instances,
                })
                .map_err(|err| CliError::new(err.to_string()))
        })
        .collect::<CliResult<Vec<_>>>()?;
    let idgen = resolver.idgen_database_id(stack).map_err(|err| CliError::new(err.to_string()))?;
    Ok(DatabasesOutput {
        stack: stack.to_string(),
        releases,
        idgen,
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value to stdout as indented JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render output: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| output_error("stdout", &err))
}

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
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::new(format!("failed to write to {stream}: {error}"))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
