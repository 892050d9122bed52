//! SocialHub Server
//!
//! Main entry point that wires all crates together: stores, broker,
//! publisher, consumers, sweeps and the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

use socialhub_api::{AppState, build_app};
use socialhub_consumer::{
    FriendDirectory, HttpFriendDirectory, StoreFriendDirectory, notification, search_sync,
    user_sync,
};
use socialhub_core::config::AppConfig;
use socialhub_core::error::AppError;
use socialhub_database::Stores;
use socialhub_messaging::{DomainEventPublisher, EventConsumer, MemoryBroker, MessageBroker};
use socialhub_worker::{
    CronScheduler, NotificationRetentionJob, OtpSweepJob, SearchTombstoneJob, SweepJob,
    TokenSweepJob,
};

/// Redelivery attempts for transient handler failures.
const CONSUMER_MAX_ATTEMPTS: u32 = 3;
const CONSUMER_BACKOFF: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SOCIALHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SocialHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = Stores::from_config(&config.database).await?;

    // ── Step 2: Broker and publisher ─────────────────────────────
    let broker: Arc<dyn MessageBroker> = Arc::new(MemoryBroker::from_config(&config.broker));
    let (publisher, publisher_task) =
        DomainEventPublisher::spawn(Arc::clone(&broker), config.broker.channel_capacity);
    tracing::info!(
        partitions = config.broker.partitions,
        "Message broker initialized"
    );

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Consumers ────────────────────────────────────────
    let consumer_tasks = spawn_consumers(&config, &stores, broker.as_ref(), shutdown_rx).await?;
    tracing::info!(loops = consumer_tasks.len(), "Consumers started");

    // ── Step 5: Application state ────────────────────────────────
    let state = AppState::new(config.clone(), stores, publisher)?;

    // ── Step 6: Background sweeps ────────────────────────────────
    let scheduler = if config.worker.enabled {
        let jobs: Vec<Arc<dyn SweepJob>> = vec![
            Arc::new(TokenSweepJob::new(
                state.auth.tokens().clone(),
                config.worker.token_cleanup_cron.clone(),
            )),
            Arc::new(OtpSweepJob::new(
                state.auth.otps().clone(),
                config.worker.otp_cleanup_cron.clone(),
            )),
            Arc::new(NotificationRetentionJob::new(
                state.notifications.clone(),
                config.worker.notification_cleanup_cron.clone(),
            )),
            Arc::new(SearchTombstoneJob::new(
                state.stores.clone(),
                config.worker.search_tombstone_retention_hours,
                config.worker.search_tombstone_cron.clone(),
            )),
        ];
        let mut scheduler = CronScheduler::new().await?;
        scheduler.register_all(jobs).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background sweeps disabled");
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SocialHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Drain ────────────────────────────────────────────
    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }

    let grace = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let drain = async {
        for task in consumer_tasks {
            let _ = task.await;
        }
        // The router and its publisher clones are gone; the queue drains.
        let _ = publisher_task.await;
    };
    if tokio::time::timeout(grace, drain).await.is_err() {
        tracing::warn!("Background tasks did not stop within the shutdown timeout");
    }

    tracing::info!("SocialHub server stopped");
    Ok(())
}

/// Build every consumer's registry and start one loop per subscribed topic.
async fn spawn_consumers(
    config: &AppConfig,
    stores: &Stores,
    broker: &dyn MessageBroker,
    shutdown: watch::Receiver<bool>,
) -> Result<Vec<JoinHandle<()>>, AppError> {
    let friends: Arc<dyn FriendDirectory> = if config.notification.friend_service_url.is_empty() {
        Arc::new(StoreFriendDirectory::new(stores.friendships.clone()))
    } else {
        Arc::new(HttpFriendDirectory::new(&config.notification)?)
    };

    let mut tasks = Vec::new();

    let consumer = Arc::new(
        EventConsumer::new(user_sync::registry(stores.profiles.clone())?)
            .with_retry(CONSUMER_MAX_ATTEMPTS, CONSUMER_BACKOFF),
    );
    tasks.extend(
        consumer
            .spawn(
                broker,
                &user_sync::TOPICS,
                &config.broker.group_for("user-sync"),
                shutdown.clone(),
            )
            .await?,
    );

    let consumer = Arc::new(
        EventConsumer::new(search_sync::registry(stores)?)
            .with_retry(CONSUMER_MAX_ATTEMPTS, CONSUMER_BACKOFF),
    );
    tasks.extend(
        consumer
            .spawn(
                broker,
                &search_sync::TOPICS,
                &config.broker.group_for("search-sync"),
                shutdown.clone(),
            )
            .await?,
    );

    let consumer = Arc::new(
        EventConsumer::new(notification::registry(
            stores.notifications.clone(),
            friends,
        )?)
        .with_retry(CONSUMER_MAX_ATTEMPTS, CONSUMER_BACKOFF),
    );
    tasks.extend(
        consumer
            .spawn(
                broker,
                &notification::TOPICS,
                &config.broker.group_for("notification"),
                shutdown,
            )
            .await?,
    );

    Ok(tasks)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
