//! Send pipeline, permission, and fan-out tests over in-memory fixtures

use integration_tests::TestWorld;
use lumen_core::entities::{ForwardedContent, Message, MessageData, ReplyContent, TextContent};
use lumen_core::notification::broadcast_topic;
use lumen_core::traits::{ContentOwner, ContentRef};
use lumen_core::{DomainError, Snowflake, TokenizedText};
use lumen_service::dto::{
    AttachmentInput, CreateGroupRequest, MessageHistoryRequest, ReactionRequest,
    SendMessageRequest,
};
use lumen_service::{ChatService, MessageService, SendTarget, ServiceError};

fn id(n: i64) -> Snowflake {
    Snowflake::new(n)
}

fn text(body: &str) -> SendMessageRequest {
    SendMessageRequest {
        text: Some(body.to_string()),
        ..SendMessageRequest::default()
    }
}

fn photo(post_id: Snowflake, caption: Option<&str>) -> SendMessageRequest {
    SendMessageRequest {
        text: caption.map(str::to_string),
        reply_to: None,
        attachment: Some(AttachmentInput::Photo { post_id }),
    }
}

/// Group of 1 (admin) + following members 2 and 3
async fn seeded_group(world: &TestWorld) -> Snowflake {
    world.account(1, "ana");
    world.account(2, "bo");
    world.account(3, "cy");
    world.social.follow(id(1), id(2));
    world.social.follow(id(1), id(3));

    ChatService::new(&world.ctx)
        .create_group(
            id(1),
            CreateGroupRequest {
                name: "trip".to_string(),
                display_picture: None,
                member_ids: vec![id(2), id(3)],
            },
        )
        .await
        .unwrap()
        .id
}

// ============================================================================
// Lazy 1:1
// ============================================================================

#[tokio::test]
async fn first_send_creates_one_to_one_atomically() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");

    let response = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Account(id(2)), text("hi"))
        .await
        .unwrap();

    assert_eq!(world.store.chat_count(), 1);
    let chat = world.store.chat(response.chat_id).unwrap();
    assert!(chat.is_one_to_one());
    assert!(chat.is_active_member(id(1)));
    assert!(chat.is_active_member(id(2)));
    assert_eq!(chat.last_message_sent_at, Some(response.sent_at));
    assert_eq!(world.store.messages_in(chat.id).len(), 1);
}

#[tokio::test]
async fn second_send_reuses_the_existing_chat() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");

    let service = MessageService::new(&world.ctx);
    let first = service
        .send(id(1), SendTarget::Account(id(2)), text("hi"))
        .await
        .unwrap();
    let second = service
        .send(id(2), SendTarget::Account(id(1)), text("hello"))
        .await
        .unwrap();

    assert_eq!(first.chat_id, second.chat_id);
    assert_eq!(world.store.chat_count(), 1);
    assert_eq!(world.store.messages_in(first.chat_id).len(), 2);
}

#[tokio::test]
async fn self_send_is_rejected() {
    let world = TestWorld::new();
    world.account(1, "ana");

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Account(id(1)), text("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(world.store.chat_count(), 0);
}

#[tokio::test]
async fn blocked_pair_cannot_start_a_chat() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.social.block(id(1), id(2));

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Account(id(2)), text("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Blocked)));
    assert_eq!(world.store.chat_count(), 0);
    assert_eq!(world.push.dispatch_count(), 0);
}

#[tokio::test]
async fn new_message_restores_soft_deleted_counterpart() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");

    let service = MessageService::new(&world.ctx);
    let first = service
        .send(id(1), SendTarget::Account(id(2)), text("hi"))
        .await
        .unwrap();

    ChatService::new(&world.ctx)
        .hide_one_to_one(id(2), first.chat_id)
        .await
        .unwrap();
    assert!(
        world
            .store
            .chat(first.chat_id)
            .unwrap()
            .participant(id(2))
            .unwrap()
            .is_deleted
    );

    let second = service
        .send(id(1), SendTarget::Account(id(2)), text("you there?"))
        .await
        .unwrap();

    let chat = world.store.chat(first.chat_id).unwrap();
    let restored = chat.participant(id(2)).unwrap();
    assert!(!restored.is_deleted);
    assert_eq!(restored.joined_at, second.sent_at);
}

#[tokio::test]
async fn sending_into_a_chat_you_hid_restores_your_own_side() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");

    let service = MessageService::new(&world.ctx);
    let first = service
        .send(id(1), SendTarget::Account(id(2)), text("hi"))
        .await
        .unwrap();

    ChatService::new(&world.ctx)
        .hide_one_to_one(id(1), first.chat_id)
        .await
        .unwrap();

    let second = service
        .send(id(1), SendTarget::Account(id(2)), text("back again"))
        .await
        .unwrap();

    let chat = world.store.chat(first.chat_id).unwrap();
    let own = chat.participant(id(1)).unwrap();
    assert!(!own.is_deleted);
    assert_eq!(own.joined_at, second.sent_at);
}

// ============================================================================
// Variant composition
// ============================================================================

#[tokio::test]
async fn empty_text_is_rejected() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("   "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::EmptyMessage)
    ));
}

#[tokio::test]
async fn reply_snapshots_the_source_text() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let service = MessageService::new(&world.ctx);
    let source = service
        .send(id(1), SendTarget::Chat(chat_id), text("original"))
        .await
        .unwrap();

    let reply = service
        .send(
            id(2),
            SendTarget::Chat(chat_id),
            SendMessageRequest {
                text: Some("agreed".to_string()),
                reply_to: Some(source.id),
                attachment: None,
            },
        )
        .await
        .unwrap();

    let MessageData::Reply(ReplyContent {
        replied,
        forwarded,
        text,
    }) = &reply.data
    else {
        panic!("expected reply variant");
    };
    assert_eq!(replied.message_id, source.id);
    assert_eq!(replied.replied_to, id(1));
    assert_eq!(text.text, "agreed");
    let ForwardedContent::Text(forwarded) = forwarded else {
        panic!("expected forwarded text snapshot");
    };
    assert_eq!(forwarded.text, "original");
}

#[tokio::test]
async fn reply_to_banner_is_rejected() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    let banner_id = world.store.messages_in(chat_id)[0].id;

    let err = MessageService::new(&world.ctx)
        .send(
            id(2),
            SendTarget::Chat(chat_id),
            SendMessageRequest {
                text: Some("hello?".to_string()),
                reply_to: Some(banner_id),
                attachment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidReply)
    ));
    assert_eq!(world.store.messages_in(chat_id).len(), 1);
}

#[tokio::test]
async fn reply_source_must_live_in_the_same_chat() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    world.account(9, "zed");

    let service = MessageService::new(&world.ctx);
    let elsewhere = service
        .send(id(1), SendTarget::Account(id(9)), text("private"))
        .await
        .unwrap();

    let err = service
        .send(
            id(2),
            SendTarget::Chat(chat_id),
            SendMessageRequest {
                text: Some("leak".to_string()),
                reply_to: Some(elsewhere.id),
                attachment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MessageNotFound(missing)) if missing == elsewhere.id
    ));
}

// ============================================================================
// Membership gates
// ============================================================================

#[tokio::test]
async fn pending_participant_cannot_send() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.account(3, "cy");
    world.social.follow(id(1), id(2));
    // 3 does not follow the creator and lands as a pending invite

    let chat = ChatService::new(&world.ctx)
        .create_group(
            id(1),
            CreateGroupRequest {
                name: "trip".to_string(),
                display_picture: None,
                member_ids: vec![id(2), id(3)],
            },
        )
        .await
        .unwrap();

    let before = world.store.messages_in(chat.id).len();
    let err = MessageService::new(&world.ctx)
        .send(id(3), SendTarget::Chat(chat.id), text("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotAMember)));
    assert_eq!(world.store.messages_in(chat.id).len(), before);
}

#[tokio::test]
async fn non_participant_cannot_read_history() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    world.account(9, "zed");

    let err = MessageService::new(&world.ctx)
        .get_messages(id(9), chat_id, MessageHistoryRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotAMember)));
}

#[tokio::test]
async fn history_pages_newest_first() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let service = MessageService::new(&world.ctx);
    let mut sent = Vec::new();
    for body in ["one", "two", "three"] {
        sent.push(service.send(id(1), SendTarget::Chat(chat_id), text(body)).await.unwrap().id);
    }

    let page = service
        .get_messages(
            id(2),
            chat_id,
            MessageHistoryRequest {
                before: None,
                limit: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, sent[2]);
    assert_eq!(page[1].id, sent[1]);

    let older = service
        .get_messages(
            id(2),
            chat_id,
            MessageHistoryRequest {
                before: Some(page[1].id),
                limit: Some(10),
            },
        )
        .await
        .unwrap();
    assert_eq!(older[0].id, sent[0]);
}

// ============================================================================
// Concurrent writers
// ============================================================================

#[tokio::test]
async fn append_never_regresses_the_chat_clock() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let latest = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("newest"))
        .await
        .unwrap();

    // A lagging writer appends with aggregate state read before that send
    let older = latest.sent_at - chrono::Duration::seconds(30);
    let mut stale = world.store.chat(chat_id).unwrap();
    stale.last_message_sent_at = Some(older);
    let laggard = Message::new(
        world.ctx.generate_id(),
        chat_id,
        id(2),
        older,
        MessageData::Text(TextContent {
            text: "laggard".to_string(),
            tokens: TokenizedText::default(),
        }),
    );
    world.ctx.message_repo().append(&stale, &laggard).await.unwrap();

    let chat = world.store.chat(chat_id).unwrap();
    assert_eq!(chat.last_message_sent_at, Some(latest.sent_at));
}

#[tokio::test]
async fn conflicting_append_retries_and_stores_one_message() {
    let (world, appends) = TestWorld::with_append_conflicts(1);
    let chat_id = seeded_group(&world).await;
    let dispatched_before = world.push.dispatch_count();

    let response = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap();

    assert_eq!(appends.append_attempts(), 2);
    // Exactly one stored message beyond the creation banner, one fan-out batch
    assert_eq!(world.store.messages_in(chat_id).len(), 2);
    assert!(world.store.message(response.id).is_some());
    assert_eq!(world.push.dispatch_count() - dispatched_before, 3);
}

#[tokio::test]
async fn exhausted_conflict_retries_surface_and_skip_fanout() {
    let (world, _appends) = TestWorld::with_append_conflicts(3);
    let chat_id = seeded_group(&world).await;
    let messages_before = world.store.messages_in(chat_id).len();
    let dispatched_before = world.push.dispatch_count();

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::WriteConflict(_))
    ));
    assert_eq!(world.store.messages_in(chat_id).len(), messages_before);
    assert_eq!(world.push.dispatch_count(), dispatched_before);
}

// ============================================================================
// Attachment permission and redaction
// ============================================================================

#[tokio::test]
async fn forbidden_attachment_writes_nothing() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    world.account(99, "owner");
    world.content.put(
        ContentRef::Post(id(500)),
        ContentOwner {
            account_id: id(99),
            is_private: true,
            sharing_enabled: true,
        },
    );

    let before = world.store.messages_in(chat_id).len();
    let dispatched = world.push.dispatch_count();

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), photo(id(500), None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::PrivateContent)
    ));
    assert_eq!(world.store.messages_in(chat_id).len(), before);
    assert_eq!(world.push.dispatch_count(), dispatched);
}

#[tokio::test]
async fn sharing_disabled_blocks_the_attachment() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    world.account(99, "owner");
    world.content.put(
        ContentRef::Post(id(500)),
        ContentOwner {
            account_id: id(99),
            is_private: false,
            sharing_enabled: false,
        },
    );

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), photo(id(500), None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::SharingDisabled)
    ));
}

#[tokio::test]
async fn vanished_attachment_target_is_not_found() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let err = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), photo(id(404), None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ContentNotFound(_))
    ));
}

#[tokio::test]
async fn attachment_redacted_per_recipient_visibility() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    // Sender 1 attaches their own private post; 2 follows them, 3 unfollowed
    // after joining the group
    world.social.unfollow(id(1), id(3));
    world.content.put(
        ContentRef::Post(id(500)),
        ContentOwner {
            account_id: id(1),
            is_private: true,
            sharing_enabled: true,
        },
    );

    MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), photo(id(500), Some("sunset")))
        .await
        .unwrap();

    let follower = world.push.payload_for(&broadcast_topic(id(2))).unwrap();
    assert!(follower.data().attachment.is_some());

    let outsider = world.push.payload_for(&broadcast_topic(id(3))).unwrap();
    let data = outsider.data();
    assert!(data.attachment.is_none());
    // Redaction strips content only; the envelope survives
    assert_eq!(data.author_id, id(1));
    assert_eq!(data.caption.as_deref(), Some("sunset"));
    assert!(outsider.is_rich());
}

// ============================================================================
// Fan-out behavior
// ============================================================================

#[tokio::test]
async fn muted_member_receives_silent_payload() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    ChatService::new(&world.ctx)
        .set_muted(id(3), chat_id, true)
        .await
        .unwrap();

    MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap();

    assert!(world.push.payload_for(&broadcast_topic(id(2))).unwrap().is_rich());
    assert!(!world.push.payload_for(&broadcast_topic(id(3))).unwrap().is_rich());
}

#[tokio::test]
async fn push_failure_never_fails_the_send() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    let dispatched_before = world.push.dispatch_count();
    world.push.fail_all();

    let response = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap();

    assert!(world.store.message(response.id).is_some());
    assert_eq!(world.push.dispatch_count(), dispatched_before);
}

// ============================================================================
// Seen and reactions
// ============================================================================

#[tokio::test]
async fn sender_is_marked_seen_on_insert() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let response = MessageService::new(&world.ctx)
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap();

    let stored = world.store.message(response.id).unwrap();
    assert_eq!(stored.seen_by, vec![id(1)]);
}

#[tokio::test]
async fn mark_seen_and_reactions_are_idempotent() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;

    let service = MessageService::new(&world.ctx);
    let response = service
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap();

    service.mark_seen(id(2), response.id).await.unwrap();
    service.mark_seen(id(2), response.id).await.unwrap();

    let heart = ReactionRequest {
        emoji: "❤️".to_string(),
    };
    service.add_reaction(id(2), response.id, heart.clone()).await.unwrap();
    service.add_reaction(id(2), response.id, heart).await.unwrap();

    let stored = world.store.message(response.id).unwrap();
    assert_eq!(stored.seen_by, vec![id(1), id(2)]);
    assert_eq!(stored.reactions.len(), 1);
}

#[tokio::test]
async fn outsiders_cannot_mark_or_react() {
    let world = TestWorld::new();
    let chat_id = seeded_group(&world).await;
    world.account(9, "zed");

    let service = MessageService::new(&world.ctx);
    let response = service
        .send(id(1), SendTarget::Chat(chat_id), text("hi"))
        .await
        .unwrap();

    let err = service.mark_seen(id(9), response.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotAMember)));
}
