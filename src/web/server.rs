//! Axum HTTP API server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tracing::info;

use crate::accounts::service::Directory;
use crate::bets::service::BetLedger;
use crate::config::{BankrollDefaults, WebConfig};
use crate::events::bus::EventBus;
use crate::notify::hub::SessionHub;

use super::routes;

/// Shared state for all API routes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub ledger: Arc<BetLedger>,
    pub directory: Arc<Directory>,
    pub hub: Arc<SessionHub>,
    pub bus: Arc<EventBus>,
    pub bankroll_defaults: BankrollDefaults,
}

/// Axum server hosting the tracker API.
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: WebConfig,
        db: PgPool,
        ledger: Arc<BetLedger>,
        directory: Arc<Directory>,
        hub: Arc<SessionHub>,
        bus: Arc<EventBus>,
        bankroll_defaults: BankrollDefaults,
    ) -> Self {
        Self {
            config,
            state: AppState {
                db,
                ledger,
                directory,
                hub,
                bus,
                bankroll_defaults,
            },
        }
    }

    /// Start the HTTP server.
    pub async fn start(self) -> anyhow::Result<()> {
        let app = Router::new()
            .merge(routes::api_routes())
            .with_state(self.state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.port));
        info!(port = self.config.port, "api server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
