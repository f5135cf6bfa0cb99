//! Database row types for all tables.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DbBet {
    pub id: i64,
    pub owner_id: String,
    pub date: chrono::NaiveDate,
    pub sport: String,
    pub market: String,
    pub selection: String,
    pub odds: f64,
    pub stake_units: f64,
    pub result: String,
    pub profit_units: f64,
    pub confidence: i32,
    pub sent_to_group: bool,
    pub tip_type: Option<String>,
    pub link: Option<String>,
    pub analysis: Option<String>,
    pub created_at: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DbSettings {
    pub owner_id: String,
    pub start_bankroll: f64,
    pub unit_divisor: i64,
    pub profit_goal: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub plan: String,
    pub status: String,
    pub joined_at: f64,
    pub subscription_ends: Option<chrono::NaiveDateTime>,
    pub last_login: Option<f64>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DbTransaction {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub amount: f64,
    pub plan_purchased: String,
    pub status: String,
    pub method: String,
    pub date: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DbBanner {
    pub id: i64,
    pub title: String,
    pub media_url: String,
    pub media_type: String,
    pub link_url: Option<String>,
    pub active: bool,
    pub created_at: f64,
}
