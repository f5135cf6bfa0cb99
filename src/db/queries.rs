//! SQL query functions for all tables.

use super::models::*;
use sqlx::PgPool;

// ── Bets ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub async fn insert_bet(
    pool: &PgPool,
    owner_id: &str,
    date: chrono::NaiveDate,
    sport: &str,
    market: &str,
    selection: &str,
    odds: f64,
    stake_units: f64,
    result: &str,
    profit_units: f64,
    confidence: i32,
    sent_to_group: bool,
    tip_type: Option<&str>,
    link: Option<&str>,
    analysis: Option<&str>,
    created_at: f64,
) -> anyhow::Result<DbBet> {
    let row = sqlx::query_as::<_, DbBet>(
        "INSERT INTO bets (owner_id, date, sport, market, selection, odds, stake_units,
         result, profit_units, confidence, sent_to_group, tip_type, link, analysis, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING *",
    )
    .bind(owner_id)
    .bind(date)
    .bind(sport)
    .bind(market)
    .bind(selection)
    .bind(odds)
    .bind(stake_units)
    .bind(result)
    .bind(profit_units)
    .bind(confidence)
    .bind(sent_to_group)
    .bind(tip_type)
    .bind(link)
    .bind(analysis)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_bet(pool: &PgPool, id: i64) -> anyhow::Result<Option<DbBet>> {
    let row = sqlx::query_as::<_, DbBet>("SELECT * FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_bet(
    pool: &PgPool,
    id: i64,
    date: chrono::NaiveDate,
    sport: &str,
    market: &str,
    selection: &str,
    odds: f64,
    stake_units: f64,
    result: &str,
    profit_units: f64,
    confidence: i32,
    tip_type: Option<&str>,
    link: Option<&str>,
    analysis: Option<&str>,
) -> anyhow::Result<Option<DbBet>> {
    let row = sqlx::query_as::<_, DbBet>(
        "UPDATE bets SET date = $2, sport = $3, market = $4, selection = $5, odds = $6,
         stake_units = $7, result = $8, profit_units = $9, confidence = $10,
         tip_type = $11, link = $12, analysis = $13
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(date)
    .bind(sport)
    .bind(market)
    .bind(selection)
    .bind(odds)
    .bind(stake_units)
    .bind(result)
    .bind(profit_units)
    .bind(confidence)
    .bind(tip_type)
    .bind(link)
    .bind(analysis)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_bet(pool: &PgPool, id: i64) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM bets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected())
}

pub async fn delete_bets_for_owner(pool: &PgPool, owner_id: &str) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM bets WHERE owner_id = $1")
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected())
}

pub async fn list_bets_for_owner(pool: &PgPool, owner_id: &str) -> anyhow::Result<Vec<DbBet>> {
    let rows = sqlx::query_as::<_, DbBet>(
        "SELECT * FROM bets WHERE owner_id = $1 ORDER BY date ASC, id ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_shared_bets(pool: &PgPool) -> anyhow::Result<Vec<DbBet>> {
    let rows = sqlx::query_as::<_, DbBet>(
        "SELECT * FROM bets WHERE sent_to_group = TRUE ORDER BY date DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ── Bankroll settings ────────────────────────────────────────────

pub async fn get_settings(pool: &PgPool, owner_id: &str) -> anyhow::Result<Option<DbSettings>> {
    let row = sqlx::query_as::<_, DbSettings>(
        "SELECT * FROM bankroll_settings WHERE owner_id = $1",
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn upsert_settings(
    pool: &PgPool,
    owner_id: &str,
    start_bankroll: f64,
    unit_divisor: i64,
    profit_goal: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO bankroll_settings (owner_id, start_bankroll, unit_divisor, profit_goal)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (owner_id)
         DO UPDATE SET start_bankroll = EXCLUDED.start_bankroll,
                       unit_divisor = EXCLUDED.unit_divisor,
                       profit_goal = EXCLUDED.profit_goal",
    )
    .bind(owner_id)
    .bind(start_bankroll)
    .bind(unit_divisor)
    .bind(profit_goal)
    .execute(pool)
    .await?;
    Ok(())
}

// ── Users ────────────────────────────────────────────────────────

pub async fn get_user(pool: &PgPool, id: &str) -> anyhow::Result<Option<DbUser>> {
    let row = sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_users(pool: &PgPool) -> anyhow::Result<Vec<DbUser>> {
    let rows = sqlx::query_as::<_, DbUser>("SELECT * FROM users ORDER BY joined_at ASC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert_user(
    pool: &PgPool,
    id: &str,
    email: &str,
    name: &str,
    role: &str,
    plan: &str,
    status: &str,
    joined_at: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO users (id, email, name, role, plan, status, joined_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id)
         DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name,
                       role = EXCLUDED.role, plan = EXCLUDED.plan, status = EXCLUDED.status",
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .bind(role)
    .bind(plan)
    .bind(status)
    .bind(joined_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_user_plan(
    pool: &PgPool,
    id: &str,
    plan: &str,
    status: &str,
    subscription_ends: Option<chrono::NaiveDateTime>,
) -> anyhow::Result<u64> {
    let done = sqlx::query(
        "UPDATE users SET plan = $2, status = $3, subscription_ends = $4 WHERE id = $1",
    )
    .bind(id)
    .bind(plan)
    .bind(status)
    .bind(subscription_ends)
    .execute(pool)
    .await?;
    Ok(done.rows_affected())
}

pub async fn delete_user(pool: &PgPool, id: &str) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected())
}

pub async fn touch_login(pool: &PgPool, id: &str, ts: f64) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
        .bind(id)
        .bind(ts)
        .execute(pool)
        .await?;
    Ok(())
}

// ── Transactions ─────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub async fn insert_transaction(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    user_name: &str,
    amount: f64,
    plan_purchased: &str,
    status: &str,
    method: &str,
    date: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO transactions (id, user_id, user_name, amount, plan_purchased, status, method, date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(id)
    .bind(user_id)
    .bind(user_name)
    .bind(amount)
    .bind(plan_purchased)
    .bind(status)
    .bind(method)
    .bind(date)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_transactions(pool: &PgPool) -> anyhow::Result<Vec<DbTransaction>> {
    let rows = sqlx::query_as::<_, DbTransaction>(
        "SELECT * FROM transactions ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ── Banners ──────────────────────────────────────────────────────

pub async fn insert_banner(
    pool: &PgPool,
    title: &str,
    media_url: &str,
    media_type: &str,
    link_url: Option<&str>,
    created_at: f64,
) -> anyhow::Result<DbBanner> {
    let row = sqlx::query_as::<_, DbBanner>(
        "INSERT INTO banners (title, media_url, media_type, link_url, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(title)
    .bind(media_url)
    .bind(media_type)
    .bind(link_url)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn list_active_banners(pool: &PgPool) -> anyhow::Result<Vec<DbBanner>> {
    let rows = sqlx::query_as::<_, DbBanner>(
        "SELECT * FROM banners WHERE active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_banner(pool: &PgPool, id: i64) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM banners WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected())
}
