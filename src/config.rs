//! Configuration — TOML file defaults + environment variable overrides.
//!
//! Tunables live in `config/default.toml`.
//! Secrets (database URL, alert webhook) come from environment variables.

use serde::Deserialize;
use std::env;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bankroll: BankrollDefaults,
    pub accounts: AccountsConfig,
    pub notifications: NotificationConfig,
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

/// Seed values for accounts that have not saved bankroll settings yet.
#[derive(Debug, Clone, Deserialize)]
pub struct BankrollDefaults {
    #[serde(default = "default_start_bankroll")]
    pub start_bankroll: f64,
    #[serde(default = "default_unit_divisor")]
    pub unit_divisor: i64,
    #[serde(default = "default_profit_goal")]
    pub profit_goal: f64,
}

fn default_start_bankroll() -> f64 {
    1000.0
}
fn default_unit_divisor() -> i64 {
    30
}
fn default_profit_goal() -> f64 {
    10.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    /// How long a purchased pro plan stays active.
    #[serde(default = "default_pro_duration")]
    pub pro_duration_days: i64,
}

fn default_pro_duration() -> i64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Optional webhook pushed on every broadcast event (system notification channel).
    pub alert_webhook_url: Option<String>,
    /// Per-session toast queue capacity; oldest entries are dropped beyond it.
    #[serde(default = "default_toast_capacity")]
    pub toast_capacity: usize,
}

fn default_toast_capacity() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_true() -> bool {
    true
}
fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_output: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from `config/default.toml` merged with env vars.
    /// Overrides use env vars prefixed with `TT`.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("TT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = builder.try_deserialize()?;

        // Secrets never live in TOML
        if let Ok(v) = env::var("DATABASE_URL") {
            cfg.database.url = v;
        }
        if let Ok(v) = env::var("ALERT_WEBHOOK_URL") {
            cfg.notifications.alert_webhook_url = Some(v);
        }

        Ok(cfg)
    }
}
