//! Tipster Tracker — Entry Point
//!
//! Loads configuration, initializes all subsystems, and serves the API.
//! Handles graceful shutdown on SIGINT/SIGTERM.

mod accounts;
mod bankroll;
mod bets;
mod config;
mod db;
mod error;
mod events;
mod feed;
mod logging;
mod notify;
mod web;

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crate::accounts::service::Directory;
use crate::bets::service::BetLedger;
use crate::config::Config;
use crate::db::pool;
use crate::events::bus::EventBus;
use crate::notify::hub::SessionHub;
use crate::notify::sinks::{AudioSink, LogAudioSink, NoopNotifier, SystemNotifier, WebhookNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if missing)
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::structured::init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        web_enabled = config.web.enabled,
        "tipster-tracker starting"
    );

    // Initialize database
    let db_pool = pool::create_pool(&config.database.url).await?;
    pool::run_migrations(&db_pool).await?;
    info!("database connected and migrations applied");

    // Initialize event bus
    let event_bus = Arc::new(EventBus::new(1024));

    // Side-effect sinks for session notifications
    let audio: Arc<dyn AudioSink> = Arc::new(LogAudioSink);
    let system: Arc<dyn SystemNotifier> = match &config.notifications.alert_webhook_url {
        Some(url) => {
            info!(%url, "webhook notification channel configured");
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            warn!("no webhook configured — system notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    // Initialize session hub
    let hub = Arc::new(SessionHub::new(
        event_bus.clone(),
        audio,
        system,
        config.notifications.toast_capacity,
    ));

    // Initialize domain services
    let ledger = Arc::new(BetLedger::new(db_pool.clone(), event_bus.clone()));
    let directory = Arc::new(Directory::new(
        db_pool.clone(),
        config.accounts.pro_duration_days,
    ));

    // Spawn web API (if enabled)
    let _web_handle = if config.web.enabled {
        let web_server = web::server::WebServer::new(
            config.web.clone(),
            db_pool.clone(),
            ledger.clone(),
            directory.clone(),
            hub.clone(),
            event_bus.clone(),
            config.bankroll.clone(),
        );
        Some(tokio::spawn(async move {
            if let Err(e) = web_server.start().await {
                error!(error = %e, "web server error");
            }
        }))
    } else {
        None
    };

    info!("all subsystems started, waiting for shutdown signal");

    // Wait for shutdown signal
    let shutdown = async {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => { info!("received SIGINT"); }
            _ = sigterm.recv() => { info!("received SIGTERM"); }
        }
    };

    shutdown.await;

    info!(
        active_sessions = hub.session_count(),
        "shutdown complete"
    );
    Ok(())
}
