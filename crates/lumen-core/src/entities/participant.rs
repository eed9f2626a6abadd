//! Participant entity - one account's membership state within a chat

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Membership record for one account inside a chat aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub account_id: Snowflake,
    /// Active member vs. pending invite (message-request semantics)
    pub is_member: bool,
    /// Group chats only
    pub is_admin: bool,
    pub is_muted: bool,
    pub is_pinned: bool,
    /// One-to-one chats only: per-side soft-hide, not deletion
    pub is_deleted: bool,
    pub joined_at: DateTime<Utc>,
    pub invited_by: Option<Snowflake>,
}

impl Participant {
    /// An active member (used for 1:1 sides and group targets that follow the inviter)
    pub fn active(account_id: Snowflake, joined_at: DateTime<Utc>) -> Self {
        Self {
            account_id,
            is_member: true,
            is_admin: false,
            is_muted: false,
            is_pinned: false,
            is_deleted: false,
            joined_at,
            invited_by: None,
        }
    }

    /// A pending participant awaiting acceptance (target does not follow the inviter)
    pub fn invited(account_id: Snowflake, invited_by: Snowflake, joined_at: DateTime<Utc>) -> Self {
        Self {
            account_id,
            is_member: false,
            is_admin: false,
            is_muted: false,
            is_pinned: false,
            is_deleted: false,
            joined_at,
            invited_by: Some(invited_by),
        }
    }

    /// The creating admin of a group chat
    pub fn admin(account_id: Snowflake, joined_at: DateTime<Utc>) -> Self {
        Self {
            is_admin: true,
            ..Self::active(account_id, joined_at)
        }
    }

    /// Check if this side has an active, visible chat
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_member && !self.is_deleted
    }

    /// Reset the soft-hide state on new contact (1:1 only)
    ///
    /// `joined_at` moves to the triggering message's timestamp so the chat
    /// reappears from that point.
    pub fn restore(&mut self, at: DateTime<Utc>) {
        self.is_deleted = false;
        self.joined_at = at;
    }
}
