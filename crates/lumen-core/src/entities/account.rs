//! Account entity - a user of the social application

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Snowflake,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    /// Private accounts gate their content behind the follower relationship
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new Account
    pub fn new(id: Snowflake, username: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            display_name: None,
            avatar: None,
            is_private: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown in chat lists and notification titles
    pub fn visible_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Toggle account privacy
    pub fn set_private(&mut self, private: bool) {
        self.is_private = private;
        self.updated_at = Utc::now();
    }
}
