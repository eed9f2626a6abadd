//! Account database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
