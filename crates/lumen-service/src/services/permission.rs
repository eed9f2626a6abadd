//! Permission predicates - block, privacy, and sharing gates
//!
//! The same predicate runs at send time (fail the write) and per
//! recipient at fan-out time (redact the payload).

use tracing::instrument;

use lumen_core::traits::{ContentOwner, ContentRef};
use lumen_core::{DomainError, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Permission service
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fail with [`DomainError::Blocked`] when either side blocked the other
    #[instrument(skip(self))]
    pub async fn require_not_blocked(&self, a: Snowflake, b: Snowflake) -> ServiceResult<()> {
        if self.ctx.social_graph().is_blocked(a, b).await? {
            return Err(DomainError::Blocked.into());
        }
        Ok(())
    }

    /// Resolve the owner of a content entity, failing if it no longer exists
    #[instrument(skip(self))]
    pub async fn resolve_owner(&self, target: ContentRef) -> ServiceResult<ContentOwner> {
        self.ctx
            .content_gateway()
            .owner_of(target)
            .await?
            .ok_or_else(|| DomainError::ContentNotFound(target).into())
    }

    /// Send-time gate for attaching content to a message
    ///
    /// The sender's own content always passes. Otherwise sharing must be
    /// enabled, the pair unblocked, and private owners followed.
    #[instrument(skip(self))]
    pub async fn require_can_send(
        &self,
        sender_id: Snowflake,
        target: ContentRef,
    ) -> ServiceResult<ContentOwner> {
        let owner = self.resolve_owner(target).await?;
        if owner.account_id == sender_id {
            return Ok(owner);
        }

        if !owner.sharing_enabled {
            return Err(DomainError::SharingDisabled.into());
        }
        if self
            .ctx
            .social_graph()
            .is_blocked(sender_id, owner.account_id)
            .await?
        {
            return Err(DomainError::Blocked.into());
        }
        if owner.is_private
            && !self
                .ctx
                .social_graph()
                .is_follower(owner.account_id, sender_id)
                .await?
        {
            return Err(DomainError::PrivateContent.into());
        }

        Ok(owner)
    }

    /// Receive-time gate: may `viewer` see content owned by `owner`?
    ///
    /// Same predicate as sending, expressed as a boolean because a failed
    /// check redacts the payload instead of failing the dispatch.
    #[instrument(skip(self, owner))]
    pub async fn can_receive(
        &self,
        viewer_id: Snowflake,
        owner: &ContentOwner,
    ) -> ServiceResult<bool> {
        if owner.account_id == viewer_id {
            return Ok(true);
        }
        if !owner.sharing_enabled {
            return Ok(false);
        }
        if self
            .ctx
            .social_graph()
            .is_blocked(viewer_id, owner.account_id)
            .await?
        {
            return Ok(false);
        }
        if owner.is_private {
            return Ok(self
                .ctx
                .social_graph()
                .is_follower(owner.account_id, viewer_id)
                .await?);
        }
        Ok(true)
    }
}
