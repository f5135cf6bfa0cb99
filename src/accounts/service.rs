//! Account directory — users, plans, transactions, admin rollups.
//!
//! Pro subscriptions carry an expiry; every read sweeps expired ones back
//! to the free plan so no stale entitlement survives a listing.

use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::accounts::types::{AdminStats, NewTransaction, Plan, Role, TxStatus, User, UserStatus};
use crate::db::models::DbTransaction;
use crate::db::queries;
use crate::error::{Result, TrackerError};
use crate::events::bus::now_ts;

pub struct Directory {
    db: PgPool,
    pro_duration_days: i64,
}

/// Has this user's paid plan lapsed as of `now`? Admins never expire.
fn subscription_expired(user: &User, now: NaiveDateTime) -> bool {
    user.plan != Plan::Free
        && user.role != Role::Admin
        && user.subscription_ends.is_some_and(|ends| now > ends)
}

/// Downgrade every lapsed user in place; returns the ids that changed.
fn sweep_expired(users: &mut [User], now: NaiveDateTime) -> Vec<String> {
    let mut downgraded = Vec::new();
    for user in users.iter_mut() {
        if subscription_expired(user, now) {
            user.plan = Plan::Free;
            user.subscription_ends = None;
            downgraded.push(user.id.clone());
        }
    }
    downgraded
}

/// Membership and revenue rollup over the full user/transaction sets.
fn compute_admin_stats(users: &[User], transactions: &[DbTransaction]) -> AdminStats {
    let total_users = users.len();
    let active_users = users.iter().filter(|u| u.status == UserStatus::Active).count();
    let pro_count = users.iter().filter(|u| u.plan == Plan::Pro).count();
    let total_revenue = transactions
        .iter()
        .filter(|t| t.status == TxStatus::Approved.as_str())
        .map(|t| t.amount)
        .sum();
    let churn_rate = if total_users == 0 {
        0.0
    } else {
        (total_users - active_users) as f64 / total_users as f64 * 100.0
    };

    AdminStats {
        total_users,
        active_users,
        total_revenue,
        pro_count,
        churn_rate,
    }
}

impl Directory {
    pub fn new(db: PgPool, pro_duration_days: i64) -> Self {
        Self {
            db,
            pro_duration_days,
        }
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(queries::get_user(&self.db, id).await?.map(User::from))
    }

    pub async fn require_user(&self, id: &str) -> Result<User> {
        self.get_user(id)
            .await?
            .ok_or_else(|| TrackerError::UnknownUser(id.to_string()))
    }

    /// All users, with the expiry sweep applied and persisted.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = queries::list_users(&self.db)
            .await?
            .into_iter()
            .map(User::from)
            .collect();

        let downgraded = sweep_expired(&mut users, Utc::now().naive_utc());
        for user in users.iter().filter(|u| downgraded.contains(&u.id)) {
            queries::set_user_plan(&self.db, &user.id, Plan::Free.as_str(), user.status.as_str(), None)
                .await?;
        }
        if !downgraded.is_empty() {
            info!(count = downgraded.len(), "expired subscriptions downgraded");
        }
        Ok(users)
    }

    /// Create or refresh an account record (identity collaborator hook).
    pub async fn upsert_user(
        &self,
        id: &str,
        email: &str,
        name: &str,
        role: Role,
        plan: Plan,
        status: UserStatus,
    ) -> Result<User> {
        queries::upsert_user(
            &self.db,
            id,
            email,
            name,
            role.as_str(),
            plan.as_str(),
            status.as_str(),
            now_ts(),
        )
        .await?;
        self.require_user(id).await
    }

    /// Change a user's plan. Paid plans get a fresh expiry stamp.
    pub async fn update_plan(&self, id: &str, plan: Plan, status: UserStatus) -> Result<User> {
        let subscription_ends = match plan {
            Plan::Free => None,
            _ => Some(Utc::now().naive_utc() + Duration::days(self.pro_duration_days)),
        };
        let rows = queries::set_user_plan(
            &self.db,
            id,
            plan.as_str(),
            status.as_str(),
            subscription_ends,
        )
        .await?;
        if rows == 0 {
            return Err(TrackerError::UnknownUser(id.to_string()));
        }
        info!(user_id = id, plan = plan.as_str(), "plan updated");
        self.require_user(id).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let rows = queries::delete_user(&self.db, id).await?;
        if rows == 0 {
            return Err(TrackerError::UnknownUser(id.to_string()));
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }

    pub async fn touch_login(&self, id: &str) -> Result<()> {
        queries::touch_login(&self.db, id, now_ts()).await?;
        Ok(())
    }

    /// Record a purchase. Approved transactions upgrade the buyer immediately.
    pub async fn record_transaction(&self, tx: NewTransaction) -> Result<()> {
        queries::insert_transaction(
            &self.db,
            &tx.id,
            &tx.user_id,
            &tx.user_name,
            tx.amount,
            tx.plan_purchased.as_str(),
            tx.status.as_str(),
            &tx.method,
            now_ts(),
        )
        .await?;

        if tx.status == TxStatus::Approved {
            self.update_plan(&tx.user_id, tx.plan_purchased, UserStatus::Active)
                .await?;
        }
        Ok(())
    }

    pub async fn list_transactions(&self) -> Result<Vec<DbTransaction>> {
        Ok(queries::list_transactions(&self.db).await?)
    }

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let users = self.list_users().await?;
        let transactions = self.list_transactions().await?;
        Ok(compute_admin_stats(&users, &transactions))
    }
}
