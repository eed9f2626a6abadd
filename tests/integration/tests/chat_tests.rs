//! Group lifecycle tests over in-memory fixtures

use integration_tests::TestWorld;
use lumen_core::entities::{BannerContent, BannerEvent, MessageData};
use lumen_core::notification::broadcast_topic;
use lumen_core::{DomainError, Snowflake};
use lumen_service::dto::{AddParticipantsRequest, CreateGroupRequest, RenameGroupRequest};
use lumen_service::{ChatService, ServiceError};

fn id(n: i64) -> Snowflake {
    Snowflake::new(n)
}

fn group_request(name: &str, member_ids: Vec<Snowflake>) -> CreateGroupRequest {
    CreateGroupRequest {
        name: name.to_string(),
        display_picture: None,
        member_ids,
    }
}

#[tokio::test]
async fn create_group_commits_banner_with_chat() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.account(3, "cy");
    world.social.follow(id(1), id(2));
    world.social.follow(id(1), id(3));

    let chat = ChatService::new(&world.ctx)
        .create_group(id(1), group_request("trip", vec![id(2), id(3)]))
        .await
        .unwrap();

    let stored = world.store.chat(chat.id).unwrap();
    assert!(stored.is_admin(id(1)));
    assert!(stored.is_active_member(id(2)));
    assert!(stored.is_active_member(id(3)));

    let messages = world.store.messages_in(chat.id);
    assert_eq!(messages.len(), 1);
    let banner = &messages[0];
    assert!(banner.is_banner());
    assert_eq!(stored.last_message_sent_at, Some(banner.sent_at));
}

#[tokio::test]
async fn create_group_fans_out_to_every_participant() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.social.follow(id(1), id(2));

    ChatService::new(&world.ctx)
        .create_group(id(1), group_request("trip", vec![id(2)]))
        .await
        .unwrap();

    assert_eq!(world.push.dispatch_count(), 2);
    // The creator's own devices get a data-only payload
    let own = world.push.payload_for(&broadcast_topic(id(1))).unwrap();
    assert!(!own.is_rich());
    let member = world.push.payload_for(&broadcast_topic(id(2))).unwrap();
    assert!(member.is_rich());
}

#[tokio::test]
async fn create_group_enforces_size_bounds() {
    let world = TestWorld::new();
    world.account(1, "ana");

    let err = ChatService::new(&world.ctx)
        .create_group(id(1), group_request("solo", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidParticipantCount { got: 1, .. })
    ));

    let too_many: Vec<Snowflake> = (2..=21).map(id).collect();
    let err = ChatService::new(&world.ctx)
        .create_group(id(1), group_request("crowd", too_many))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidParticipantCount { got: 21, .. })
    ));
    assert_eq!(world.store.chat_count(), 0);
}

#[tokio::test]
async fn non_follower_target_joins_as_pending_invite() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.account(3, "cy");
    world.social.follow(id(1), id(2));
    // 3 does not follow the creator

    let chat = ChatService::new(&world.ctx)
        .create_group(id(1), group_request("trip", vec![id(2), id(3)]))
        .await
        .unwrap();

    let stored = world.store.chat(chat.id).unwrap();
    let pending = stored.participant(id(3)).unwrap();
    assert!(!pending.is_member);
    assert_eq!(pending.invited_by, Some(id(1)));

    // Pending invites only ever see data-only payloads
    let payload = world.push.payload_for(&broadcast_topic(id(3))).unwrap();
    assert!(!payload.is_rich());
}

#[tokio::test]
async fn blocked_target_fails_group_creation() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.social.block(id(1), id(2));

    let err = ChatService::new(&world.ctx)
        .create_group(id(1), group_request("trip", vec![id(2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Blocked)));
    assert_eq!(world.store.chat_count(), 0);
    assert_eq!(world.push.dispatch_count(), 0);
}

#[tokio::test]
async fn add_participants_rejects_duplicates() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.account(3, "cy");
    world.mutual_follow(id(1), id(2));
    world.social.follow(id(1), id(3));

    let service = ChatService::new(&world.ctx);
    let chat = service
        .create_group(id(1), group_request("trip", vec![id(2)]))
        .await
        .unwrap();

    let updated = service
        .add_participants(
            id(1),
            chat.id,
            AddParticipantsRequest {
                member_ids: vec![id(3)],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.participants.len(), 3);

    let err = service
        .add_participants(
            id(1),
            chat.id,
            AddParticipantsRequest {
                member_ids: vec![id(2)],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::AlreadyParticipant(dup)) if dup == id(2)
    ));
}

#[tokio::test]
async fn member_add_banner_names_the_added_accounts() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.account(3, "cy");
    world.social.follow(id(1), id(2));
    world.social.follow(id(1), id(3));

    let service = ChatService::new(&world.ctx);
    let chat = service
        .create_group(id(1), group_request("trip", vec![id(2)]))
        .await
        .unwrap();
    service
        .add_participants(
            id(1),
            chat.id,
            AddParticipantsRequest {
                member_ids: vec![id(3)],
            },
        )
        .await
        .unwrap();

    let messages = world.store.messages_in(chat.id);
    assert_eq!(messages.len(), 2);
    let MessageData::Banner(BannerContent { event }) = &messages[1].data else {
        panic!("expected banner message");
    };
    assert_eq!(*event, BannerEvent::GroupMemberAdd { added: vec![id(3)] });
}

#[tokio::test]
async fn leave_group_removes_participant_and_records_banner() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.social.follow(id(1), id(2));

    let service = ChatService::new(&world.ctx);
    let chat = service
        .create_group(id(1), group_request("trip", vec![id(2)]))
        .await
        .unwrap();

    service.leave_group(id(2), chat.id).await.unwrap();

    let stored = world.store.chat(chat.id).unwrap();
    assert!(!stored.is_participant(id(2)));

    let messages = world.store.messages_in(chat.id);
    let MessageData::Banner(banner) = &messages[1].data else {
        panic!("expected banner message");
    };
    assert_eq!(banner.event, BannerEvent::GroupLeave { left: id(2) });
}

#[tokio::test]
async fn rename_requires_admin() {
    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");
    world.social.follow(id(1), id(2));

    let service = ChatService::new(&world.ctx);
    let chat = service
        .create_group(id(1), group_request("trip", vec![id(2)]))
        .await
        .unwrap();

    let err = service
        .rename_group(
            id(2),
            chat.id,
            RenameGroupRequest {
                name: "new name".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotAdmin)));

    let renamed = service
        .rename_group(
            id(1),
            chat.id,
            RenameGroupRequest {
                name: "new name".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name.as_deref(), Some("new name"));
    assert_eq!(
        world.store.chat(chat.id).unwrap().name.as_deref(),
        Some("new name")
    );
}

#[tokio::test]
async fn hidden_one_to_one_disappears_from_chat_list() {
    use lumen_service::dto::SendMessageRequest;
    use lumen_service::{MessageService, SendTarget};

    let world = TestWorld::new();
    world.account(1, "ana");
    world.account(2, "bo");

    MessageService::new(&world.ctx)
        .send(
            id(1),
            SendTarget::Account(id(2)),
            SendMessageRequest {
                text: Some("hi".to_string()),
                ..SendMessageRequest::default()
            },
        )
        .await
        .unwrap();

    let service = ChatService::new(&world.ctx);
    let visible = service.list_chats(id(2)).await.unwrap();
    assert_eq!(visible.len(), 1);

    service.hide_one_to_one(id(2), visible[0].id).await.unwrap();
    assert!(service.list_chats(id(2)).await.unwrap().is_empty());
    // The other side still sees the chat
    assert_eq!(service.list_chats(id(1)).await.unwrap().len(), 1);
}
