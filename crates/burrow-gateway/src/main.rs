use anyhow::Context;
use burrow_gateway::app::App;
use burrow_gateway::cli::CLI;
use burrow_gateway::shutdown::{persist_on_exit, shutdown_signal};
use burrow_gateway::state::AppState;
use burrow_gateway::telemetry::init_tracing;
use burrow_generator::RandomGenerator;
use burrow_ratelimit::{RateLimiter, RateLimiterConfig};
use burrow_shortener::{ShortenerConfig, ShortenerService};
use burrow_storage::{InMemoryRepository, Repository};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        domain = %config.domain,
        rate_limit = config.rate_limit,
        code_length = config.code_length,
        log_format = %config.log_format,
        "starting burrow gateway"
    );

    let repository = InMemoryRepository::new();
    if let Some(path) = &config.snapshot_path {
        repository
            .load_snapshot(path)
            .await
            .with_context(|| format!("loading snapshot {}", path.display()))?;
    }

    let shortener = ShortenerService::new(
        repository,
        RandomGenerator::new(config.code_length),
        ShortenerConfig::builder()
            .domain(config.domain.clone())
            .max_url_length(config.max_url_length)
            .build(),
    )?;
    let repository = Arc::clone(shortener.repository());

    let limiter = RateLimiter::new(
        RateLimiterConfig::builder()
            .capacity(config.rate_limit)
            .max_clients(config.max_clients)
            .build(),
    )?;

    let state = AppState::new(Arc::new(shortener), Arc::new(limiter), config.domain)
        .with_trust_forwarded_for(config.trust_forwarded_for);
    let sweeper = tokio::spawn(purge_expired(
        Arc::clone(&repository),
        Duration::from_secs(config.purge_interval_secs.max(1)),
    ));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let served = axum::serve(
        listener,
        App::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    sweeper.abort();
    persist_on_exit(served, &repository, config.snapshot_path.as_deref()).await?;

    info!("gateway stopped");
    Ok(())
}

async fn purge_expired(repository: Arc<InMemoryRepository>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match repository.purge_expired().await {
            Ok(purged) => debug!(purged, "expired record sweep finished"),
            Err(e) => warn!(error = %e, "expired record sweep failed"),
        }
    }
}
