//! cakesync: apply a declared uptime or SSL test to StatusCake.
//!
//! Loads a desired-state file, reconciles it once against the API and prints a single
//! JSON result line (`changed`, `failed`, `msg`) on stdout. Logs go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cakesync::{
    ApiClient, ClientConfig, DEFAULT_BASE_URL, DesiredConfig, Reconciler, ResourceKind, Status,
};

/// Reconcile StatusCake tests against a declared configuration
#[derive(Parser, Debug)]
#[command(name = "cakesync", version, about)]
struct Args {
    /// StatusCake API key
    #[arg(long, env = "STATUSCAKE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API origin
    #[arg(long, env = "STATUSCAKE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile an uptime test (identified by name)
    Uptime {
        /// Desired-state file (.json, .yaml or .yml)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Reconcile an SSL test (identified by website_url)
    Ssl {
        /// Desired-state file (.json, .yaml or .yml)
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Result line printed for the calling automation.
#[derive(Debug, Serialize)]
struct Report {
    changed: bool,
    failed: bool,
    msg: String,
}

impl From<&Status> for Report {
    fn from(status: &Status) -> Self {
        Self {
            changed: status.changed,
            failed: !status.success,
            msg: status.message.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cakesync=info,reqwest=warn,hyper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(status) => {
            println!("{}", serde_json::to_string(&Report::from(&status)).unwrap_or_default());
            if status.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("{:#}", e);
            let report = Report {
                changed: false,
                failed: true,
                msg: format!("{:#}", e),
            };
            println!("{}", serde_json::to_string(&report).unwrap_or_default());
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<Status> {
    let (kind, file) = match args.command {
        Command::Uptime { file } => (ResourceKind::Uptime, file),
        Command::Ssl { file } => (ResourceKind::Ssl, file),
    };

    let mut map = load_desired(&file)?;
    // A key in the file is only used when none was given on the command line.
    let file_key = map.remove("api_key").and_then(|v| v.as_str().map(str::to_string));
    let Some(api_key) = args.api_key.or(file_key) else {
        bail!("no API key: pass --api-key or set STATUSCAKE_API_KEY");
    };

    let desired = DesiredConfig::from_map(map)
        .with_context(|| format!("Invalid desired state in {}", file.display()))?;

    let config = ClientConfig::new(api_key).with_base_url(args.base_url);
    let client = ApiClient::new(&config).context("Failed to build API client")?;

    info!("Applying {} from {}", kind, file.display());
    let mut reconciler = Reconciler::new(client, kind, desired)
        .with_context(|| format!("Invalid {} configuration", kind))?;
    Ok(reconciler.sync().await)
}

/// Read a desired-state mapping, choosing the parser by file extension.
fn load_desired(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let value: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?,
        _ => serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a mapping", path.display()),
    }
}
