//! replica-health: an HTTP health check for MySQL replicas.
//!
//! This is the application entry point. It parses flags, layers them over the
//! optional TOML configuration, initializes tracing, and serves the status
//! endpoint until SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replica_health::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use replica_health::replication::MySqlStatusSource;
use replica_health::{create_router, dsn, http, AppState};

/// replica-health: report MySQL replication status as JSON over HTTP
#[derive(Parser, Debug)]
#[command(name = "replica-health", version, about)]
struct Args {
    /// Database connection string [default: root:@/mysql]
    #[arg(short = 'd', long)]
    dsn: Option<String>,

    /// Port number [default: 23306]
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Path for the monitor URL; a trailing slash serves the subtree [default: /]
    #[arg(short = 't', long)]
    path: Option<String>,

    /// Report OK when the server is not a replica [default: true]
    #[arg(
        short = 'm',
        long,
        value_name = "BOOL",
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    ignore_non_replica: Option<bool>,

    /// Lag threshold in seconds; exceeding it is logged only [default: 60]
    #[arg(short = 'l', long = "lag", value_name = "SECONDS")]
    lag_threshold: Option<u64>,

    /// Listen address [default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Give up on connect + query after this many seconds [default: wait forever]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "replica_health=debug,tower_http=info")
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Args {
    /// Flags win over the configuration file.
    fn apply(self, config: &mut AppConfig) {
        if let Some(dsn) = self.dsn {
            config.database.dsn = dsn;
        }
        if let Some(timeout) = self.timeout {
            config.database.timeout_seconds = Some(timeout);
        }
        if let Some(host) = self.host {
            config.http.host = host;
        }
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(path) = self.path {
            config.http.path = path;
        }
        if let Some(ignore) = self.ignore_non_replica {
            config.check.ignore_non_replica = ignore;
        }
        if let Some(lag) = self.lag_threshold {
            config.check.lag_threshold_seconds = lag;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    args.apply(&mut config);
    init_tracing(&log_filter, config.logging.format);

    config.validate()?;
    let options = dsn::connect_options(&config.database.dsn)?;

    tracing::info!(
        dsn = %dsn::redact(&config.database.dsn),
        ignore_non_replica = config.check.ignore_non_replica,
        lag_threshold_seconds = config.check.lag_threshold_seconds,
        timeout_seconds = ?config.database.timeout_seconds,
        "Loaded configuration"
    );
    if config.database.timeout_seconds.is_none() {
        tracing::debug!("No database timeout configured; a hung server stalls its request");
    }

    let source = MySqlStatusSource::new(options, config.query_timeout());
    let state = AppState::new(config.clone(), Arc::new(source));
    let app = create_router(state);

    http::start_server(app, &config).await?;

    Ok(())
}
