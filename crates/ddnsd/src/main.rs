// # ddnsd - OVH dynamic DNS updater
//
// This binary is a THIN integration layer: it loads the configuration,
// wires the registered components together and runs exactly one
// reconciliation pass. All DNS logic lives in ddns-core.
//
// ## Usage
//
// ```bash
// ddnsd /etc/ddns/config.json
// ```
//
// ## Configuration
//
// The JSON file names the OVH credentials and the record to keep in sync.
// These environment variables override the file:
//
// - `OVH_ENDPOINT`, `OVH_APPLICATION_KEY`, `OVH_APPLICATION_SECRET`,
//   `OVH_CONSUMER_KEY`: OVH credentials
// - `DDNS_MODE=dry-run`: log the decision without changing the zone
// - `DDNS_LOG_LEVEL`: trace, debug, info (default), warn or error
//
// ## Scheduling
//
// The process exits after one pass. Run it from cron or a systemd timer.

use anyhow::{Context, Result};
use ddns_core::{DdnsConfig, ProviderRegistry, Reconciler, RecordIdentity};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: The record is in sync (created, updated or already correct)
/// - 1: Usage, configuration or startup error
/// - 2: Reconciliation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Pass completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (resolver or API failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Extract the configuration path from the command line
fn parse_args(args: &[String]) -> Result<PathBuf> {
    match args {
        [_, path] => Ok(PathBuf::from(path)),
        _ => {
            let program = args.first().map(String::as_str).unwrap_or("ddnsd");
            anyhow::bail!("Usage: {} config_file", program)
        }
    }
}

/// Map `DDNS_LOG_LEVEL` to a tracing level
fn parse_log_level(value: Option<&str>) -> Result<Level> {
    let Some(value) = value else {
        return Ok(Level::INFO);
    };

    match value.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            value
        ),
    }
}

/// Load, override and validate the configuration file
fn load_config(path: &Path) -> Result<DdnsConfig> {
    let mut config = DdnsConfig::load(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Build the reconciler from registered components
fn build_reconciler(config: &DdnsConfig) -> Result<Reconciler> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "ovh")]
    {
        ddns_provider_ovh::register(&registry)?;
    }

    #[cfg(feature = "http")]
    {
        ddns_ip_http::register(&registry)?;
    }

    let api = registry.create_provider(&config.provider())?;
    let ip_source = registry.create_ip_source(&config.ip_source)?;

    info!(
        "Using provider {} and IP source {}",
        api.provider_name(),
        ip_source.source_name()
    );

    Ok(Reconciler::new(ip_source, api, RecordIdentity::from(&config.record))
        .with_dry_run(config.dry_run))
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let path = match parse_args(&args) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let log_level = match parse_log_level(env::var("DDNS_LOG_LEVEL").ok().as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if config.dry_run {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    let reconciler = match build_reconciler(&config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(&reconciler)).into()
}

/// Run one pass and map its result to the process exit code
///
/// The reconciler logs the outcome line of a successful pass.
async fn run(reconciler: &Reconciler) -> DdnsExitCode {
    match reconciler.reconcile().await {
        Ok(_) => DdnsExitCode::Success,
        Err(e) => {
            error!("Reconciliation of {} failed: {}", reconciler.identity(), e);
            DdnsExitCode::RuntimeError
        }
    }
}
