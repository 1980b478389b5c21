#![forbid(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use alphadex_core::NameStore;
use alphadex_server::{ServerConfig, init_tracing, serve};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("alphadex-server: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> std::io::Result<()> {
    let store = Arc::new(NameStore::load(&config.names_file));
    info!(
        names_file = %config.names_file.display(),
        count = store.snapshot().len(),
        "name store ready"
    );
    spawn_reload_on_hangup(store.clone());

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("alphadex-server listening on http://{}", listener.local_addr()?);
    serve(listener, store, wait_for_shutdown_signal()).await
}

#[cfg(unix)]
fn spawn_reload_on_hangup(store: Arc<NameStore>) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "SIGHUP reload unavailable");
            return;
        }
    };
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            match store.reload() {
                Ok(count) => info!(count, "reloaded names on SIGHUP"),
                Err(e) => warn!(error = %e, "SIGHUP reload failed"),
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_store: Arc<NameStore>) {}

async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
