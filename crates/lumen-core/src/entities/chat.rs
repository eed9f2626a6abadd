//! Chat aggregate - a one-to-one conversation or a bounded group

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::participant::Participant;

/// Smallest valid group size, inclusive of the creator
pub const MIN_GROUP_SIZE: usize = 2;
/// Largest valid group size, inclusive of the creator
pub const MAX_GROUP_SIZE: usize = 20;

/// Kind of conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Exactly two participants, created lazily on first message
    OneToOne,
    /// 2-20 participants, created explicitly
    Group,
}

/// Chat aggregate: participants plus shared conversation metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Snowflake,
    pub kind: ChatKind,
    pub participants: Vec<Participant>,
    /// Always >= every message's sent_at; bumped atomically with each insert
    pub last_message_sent_at: Option<DateTime<Utc>>,
    /// Group only
    pub name: Option<String>,
    /// Group only
    pub display_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create a 1:1 chat between two accounts, both active from the start
    pub fn one_to_one(id: Snowflake, a: Snowflake, b: Snowflake, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: ChatKind::OneToOne,
            participants: vec![Participant::active(a, now), Participant::active(b, now)],
            last_message_sent_at: None,
            name: None,
            display_picture: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a group chat with the creator as its first member and admin
    pub fn group(
        id: Snowflake,
        creator: Snowflake,
        name: String,
        display_picture: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: ChatKind::Group,
            participants: vec![Participant::admin(creator, now)],
            last_message_sent_at: None,
            name: Some(name),
            display_picture,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == ChatKind::Group
    }

    #[inline]
    pub fn is_one_to_one(&self) -> bool {
        self.kind == ChatKind::OneToOne
    }

    /// Look up a participant by account id
    pub fn participant(&self, account_id: Snowflake) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.account_id == account_id)
    }

    /// Mutable participant lookup
    pub fn participant_mut(&mut self, account_id: Snowflake) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.account_id == account_id)
    }

    #[inline]
    pub fn is_participant(&self, account_id: Snowflake) -> bool {
        self.participant(account_id).is_some()
    }

    /// Active (non-pending) membership check
    pub fn is_active_member(&self, account_id: Snowflake) -> bool {
        self.participant(account_id).is_some_and(|p| p.is_member)
    }

    pub fn is_admin(&self, account_id: Snowflake) -> bool {
        self.participant(account_id)
            .is_some_and(|p| p.is_member && p.is_admin)
    }

    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// The other side of a 1:1 chat
    pub fn counterpart(&self, account_id: Snowflake) -> Option<&Participant> {
        if self.kind != ChatKind::OneToOne {
            return None;
        }
        self.participants
            .iter()
            .find(|p| p.account_id != account_id)
    }

    /// Add a participant, enforcing the group size bound
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), DomainError> {
        if self.is_participant(participant.account_id) {
            return Err(DomainError::AlreadyParticipant(participant.account_id));
        }
        if self.participant_count() >= MAX_GROUP_SIZE {
            return Err(DomainError::GroupFull {
                max: MAX_GROUP_SIZE,
            });
        }
        self.participants.push(participant);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove a participant (group leave)
    pub fn remove_participant(&mut self, account_id: Snowflake) -> Result<(), DomainError> {
        let before = self.participants.len();
        self.participants.retain(|p| p.account_id != account_id);
        if self.participants.len() == before {
            return Err(DomainError::NotAMember);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a new message timestamp, keeping `last_message_sent_at` monotone
    pub fn touch_last_message(&mut self, sent_at: DateTime<Utc>) {
        match self.last_message_sent_at {
            Some(current) if current >= sent_at => {}
            _ => self.last_message_sent_at = Some(sent_at),
        }
        self.updated_at = Utc::now();
    }

    /// Restore soft-deleted visibility on new contact (1:1 only)
    ///
    /// A new message un-hides the chat for whichever side hid it, the
    /// sender's own side included. Returns true when any side was reset.
    pub fn restore_hidden(&mut self, at: DateTime<Utc>) -> bool {
        if self.kind != ChatKind::OneToOne {
            return false;
        }
        let mut restored = false;
        for participant in self.participants.iter_mut().filter(|p| p.is_deleted) {
            participant.restore(at);
            restored = true;
        }
        if restored {
            self.updated_at = Utc::now();
        }
        restored
    }
}
