//! Account, plan, and viewer types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::models::DbUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub plan: Plan,
    pub status: UserStatus,
    pub joined_at: f64,
    pub subscription_ends: Option<NaiveDateTime>,
    pub last_login: Option<f64>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            role: Role::from_str(&row.role).unwrap_or(Role::User),
            plan: Plan::from_str(&row.plan).unwrap_or(Plan::Free),
            status: UserStatus::from_str(&row.status).unwrap_or(UserStatus::Active),
            joined_at: row.joined_at,
            subscription_ends: row.subscription_ends,
            last_login: row.last_login,
        }
    }
}

/// The identity evaluating content visibility. Supplied by the identity
/// collaborator and trusted as already authenticated.
#[derive(Debug, Clone, Serialize)]
pub struct Viewer {
    pub user_id: String,
    pub role: Role,
    pub plan: Plan,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role,
            plan: user.plan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Approved,
    Pending,
    Rejected,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

/// Payload for recording a plan purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub amount: f64,
    pub plan_purchased: Plan,
    pub status: TxStatus,
    pub method: String,
}

/// Revenue and membership rollup for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_revenue: f64,
    pub pro_count: usize,
    pub churn_rate: f64,
}
