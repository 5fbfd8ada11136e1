mod config_commands;
mod state_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    relaygate_config::{
        ConfigOverrides, RelaygateConfig, Severity, apply_overrides, default_state_path,
        find_config_file, load_config, validate,
    },
    relaygate_metrics::{MetricsRecorderConfig, init_metrics},
    relaygate_store::{ConfigStore, FileStore},
    tracing::{debug, error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "relaygate", about = "relaygate: approval-gated Telegram channel relay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (default: ./relaygate.toml, then the user config dir).
    #[arg(long, global = true, env = "RELAYGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Bot token (overrides config value).
    #[arg(long, global = true, env = "BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Owner's numeric user id (overrides config value).
    #[arg(long, global = true, env = "OWNER_ID")]
    owner_id: Option<u64>,

    /// State file (overrides config value).
    #[arg(long, global = true, env = "RELAYGATE_STATE_PATH")]
    state_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (default when no subcommand is provided).
    Run,
    /// Inspect the persisted bot state.
    State {
        #[command(subcommand)]
        action: state_commands::StateAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Config file values with command-line and environment overrides applied.
pub(crate) struct ResolvedConfig {
    pub config: RelaygateConfig,
    pub path: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn state_path(&self) -> PathBuf {
        self.config
            .state
            .path
            .clone()
            .unwrap_or_else(default_state_path)
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    let path = cli.config.clone().or_else(find_config_file);
    let mut config = match &path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(path)?
        },
        None => {
            debug!("no config file found, using defaults");
            RelaygateConfig::default()
        },
    };
    apply_overrides(&mut config, ConfigOverrides {
        token: cli.token.clone(),
        owner_id: cli.owner_id,
        state_path: cli.state_path.clone(),
    });
    Ok(ResolvedConfig { config, path })
}

async fn run(resolved: ResolvedConfig) -> anyhow::Result<()> {
    let state_path = resolved.state_path();
    let ResolvedConfig { config, path } = resolved;

    let report = validate(&config, path);
    for d in &report.diagnostics {
        match d.severity {
            Severity::Error => error!(path = %d.path, "{}", d.message),
            Severity::Warning => warn!(path = %d.path, "{}", d.message),
            Severity::Info => debug!(path = %d.path, "{}", d.message),
        }
    }
    if report.has_errors() {
        anyhow::bail!("invalid configuration (run `relaygate config check` for details)");
    }

    if config.metrics.enabled {
        let listen = config
            .metrics
            .listen
            .parse()
            .with_context(|| format!("invalid metrics.listen {:?}", config.metrics.listen))?;
        init_metrics(MetricsRecorderConfig {
            enabled: true,
            listen: Some(listen),
            global_labels: Vec::new(),
        })?;
    }

    let store = Arc::new(ConfigStore::open(Arc::new(FileStore::new(state_path.clone()))).await?);
    info!(path = %state_path.display(), "state opened");

    let polling = relaygate_telegram::start_polling(&config.telegram, store).await?;
    info!(bot = polling.username().unwrap_or("?"), "relaying");
    let stopped = polling.cancel_token();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("shutting down");
        },
        () = stopped.cancelled() => warn!("telegram polling stopped on its own"),
    }

    polling.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "relaygate starting");

    let resolved = resolve_config(&cli)?;

    match cli.command {
        None | Some(Commands::Run) => run(resolved).await,
        Some(Commands::State { action }) => state_commands::handle_state(action, &resolved).await,
        Some(Commands::Config { action }) => config_commands::handle_config(action, &resolved),
    }
}
