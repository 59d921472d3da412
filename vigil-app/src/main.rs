use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vigil_common::observability::{init_logging, LogConfig};
use vigil_config::{StoreConfig, VigilConfig, VigilConfigLoader};
use vigil_extract::{AdvisoryExtractor, ExtractorConfig, PageExtractor};
use vigil_server::{router, spawn_sync_timer, AppState};
use vigil_store::{DocumentStore, FirestoreStore, MemoryStore};

mod snapshot;

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Watches the NDMA advisories page, serves records over HTTP, and syncs new ones into a document store"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "vigil.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API with the periodic sync timer (the default).
    Serve,
    /// Run one extraction and overwrite a local JSON snapshot.
    Fetch {
        /// Output path for the snapshot file.
        #[arg(long, default_value = "advisories.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = VigilConfigLoader::new().with_file(&cli.config).load()?;
    init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Fetch { out } => fetch(config, &out).await,
    }
}

fn build_extractor(config: &VigilConfig) -> Arc<dyn AdvisoryExtractor> {
    Arc::new(PageExtractor::new(ExtractorConfig {
        url: config.source.url.clone(),
        source_label: config.source.label.clone(),
        webdriver_url: config.browser.webdriver_url.clone(),
        headless: config.browser.headless,
        ready_timeout: Duration::from_secs(config.browser.ready_timeout_secs),
    }))
}

fn build_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    match config {
        StoreConfig::Firestore {
            project_id,
            auth_token,
            endpoint,
        } => {
            info!(target: "app", project_id = %project_id, "app.store.firestore");
            let store = FirestoreStore::new(endpoint, project_id.clone(), auth_token.clone())?;
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            // Useful for dry runs; synced documents die with the process.
            warn!(target: "app", "app.store.memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn serve(config: VigilConfig) -> Result<()> {
    let state = AppState::new(
        build_extractor(&config),
        build_store(&config.store)?,
        config.sync.collection.clone(),
    );

    let cancel = CancellationToken::new();
    let timer = spawn_sync_timer(
        state.clone(),
        Duration::from_secs(config.sync.interval_mins * 60),
        cancel.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(target: "app", addr = %config.server.bind, "app.listening");

    let shutdown = cancel.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!(target: "app", "app.shutdown_requested");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    let _ = timer.await;
    Ok(())
}

async fn fetch(config: VigilConfig, out: &Path) -> Result<()> {
    let extractor = build_extractor(&config);
    let records = extractor.extract().await?;
    snapshot::write_snapshot(out, &records)?;
    info!(
        target: "app",
        records = records.len(),
        path = %out.display(),
        "app.snapshot_written"
    );
    Ok(())
}
