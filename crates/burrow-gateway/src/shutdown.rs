use anyhow::Context;
use burrow_storage::InMemoryRepository;
use std::path::Path;
use tracing::{error, info};

/// Resolves on ctrl-c, or on SIGTERM where the platform has it.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Writes the snapshot once serving has ended, then surfaces the serve result.
/// The snapshot is written even when `served` is an error.
pub async fn persist_on_exit<E>(
    served: Result<(), E>,
    repository: &InMemoryRepository,
    snapshot_path: Option<&Path>,
) -> anyhow::Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
{
    if let Err(e) = &served {
        error!(error = %e, "server stopped with an error");
    }

    if let Some(path) = snapshot_path {
        let saved = repository
            .save_snapshot(path)
            .await
            .with_context(|| format!("saving snapshot {}", path.display()))?;
        info!(path = %path.display(), saved, "snapshot saved");
    }

    served.context("serving requests")
}
