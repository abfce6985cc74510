mod config;
mod error;
mod server;
mod snapshot;
mod store;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use config::{Config, LogConfig};
use server::{AppState, Server};
use snapshot::Snapshot;
use store::{ListStore, MemoryScalarStore};

/// In-memory list and scalar store served over HTTP
#[derive(Parser, Debug)]
#[command(name = "listkv", version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// HTTP listen address, overrides `server_addr` from the config
    #[arg(long)]
    addr: Option<String>,
}

/// Initialize logging; the returned guard must live until exit
fn init_logging(log: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
            let dir = dir.unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path {:?} has no file name", path))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            builder.init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.addr {
        config.server_addr = addr;
    }

    let _log_guard = init_logging(&config.log)?;

    info!("Starting listkv - in-memory list and scalar store");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let lists = Arc::new(ListStore::with_mode(config.list.pop_mode));
    info!("List pop mode: {:?}", lists.mode());

    let snapshot = Snapshot::new(&config.snapshot.path);
    if config.snapshot.load_on_start {
        if let Some(saved) = snapshot
            .load()
            .await
            .with_context(|| format!("Failed to load snapshot {:?}", snapshot.path()))?
        {
            lists.restore(saved)?;
        }
    }

    let state = AppState::new(lists.clone(), Arc::new(MemoryScalarStore::new()));
    let server = Server::bind(&config.server_addr, state)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    info!("Server listening on: {}", server.local_addr());

    server.run(server::shutdown_signal()).await?;

    if config.snapshot.save_on_shutdown {
        match lists.snapshot() {
            Ok(saved) => {
                if let Err(e) = snapshot.save(&saved).await {
                    warn!("Failed to save snapshot {:?}: {}", snapshot.path(), e);
                }
            }
            Err(e) => warn!("Failed to read lists for snapshot: {}", e),
        }
    }

    Ok(())
}
