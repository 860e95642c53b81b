//! Conversion logic between domain entities and DTOs.

use neighborly_shared::time::timestamp_to_rfc3339;

use crate::domain::{ConversationSummary, Message, Notification, PresenceChange, User};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Message> for dto::MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            conversation_id: message.conversation_id.as_str().to_string(),
            sender_id: message.sender_id.as_str().to_string(),
            recipient_id: message.recipient_id.as_str().to_string(),
            content: message.content.as_str().to_string(),
            message_type: message.kind.as_str().to_string(),
            image_url: message.image_url.clone(),
            read: message.read,
            created_at: timestamp_to_rfc3339(message.created_at.value()),
        }
    }
}

impl From<&PresenceChange> for dto::UserStatusPayload {
    fn from(change: &PresenceChange) -> Self {
        Self {
            user_id: change.user_id.as_str().to_string(),
            online: change.online,
            last_seen: change.last_seen.map(|t| timestamp_to_rfc3339(t.value())),
        }
    }
}

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Registered {
                user_id,
                online_users,
            } => Self::Registered(dto::RegisteredPayload {
                user_id: user_id.as_str().to_string(),
                online_users: online_users
                    .iter()
                    .map(|id| id.as_str().to_string())
                    .collect(),
            }),
            Notification::MessageReceived(message) => Self::ReceiveMessage(message.into()),
            Notification::MessageSent(message) => Self::MessageSent(message.into()),
            Notification::MessageFailed { error } => {
                Self::MessageError(dto::MessageErrorPayload {
                    error: error.clone(),
                })
            }
            Notification::UserTyping { sender_id } => {
                Self::UserTyping(dto::UserTypingPayload {
                    sender_id: sender_id.as_str().to_string(),
                })
            }
            Notification::PresenceChanged(change) => Self::UserStatusChange(change.into()),
            Notification::Rejected { event, error } => Self::Error(dto::RejectedPayload {
                event: event.clone(),
                error: error.clone(),
            }),
        }
    }
}

impl From<&User> for http::UserSummaryDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            profile_picture: user.profile_picture.clone(),
            online: user.online,
            last_seen: user.last_seen.map(|t| timestamp_to_rfc3339(t.value())),
        }
    }
}

impl From<&ConversationSummary> for http::ConversationDto {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            user: (&summary.peer).into(),
            last_message: summary.last_message.clone(),
            last_message_time: timestamp_to_rfc3339(summary.last_message_at.value()),
            unread_count: summary.unread_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, NewMessage, Timestamp, UserId};

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_domain_message_to_dto() {
        // テスト項目: ドメインの Message が MessageDto に変換される
        // given (前提条件):
        let message = Message::create(NewMessage::text(
            user("bob"),
            user("alice"),
            MessageContent::new("Hi!".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        ));

        // when (操作):
        let dto: dto::MessageDto = (&message).into();

        // then (期待する結果):
        assert_eq!(dto.id, message.id.to_string());
        assert_eq!(dto.conversation_id, "alice_bob");
        assert_eq!(dto.sender_id, "bob");
        assert_eq!(dto.recipient_id, "alice");
        assert_eq!(dto.content, "Hi!");
        assert_eq!(dto.message_type, "text");
        assert_eq!(dto.image_url, None);
        assert!(!dto.read);
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_offline_presence_change_to_event() {
        // テスト項目: オフライン遷移が lastSeen 付きの userStatusChange に変換される
        // given (前提条件):
        let notification = Notification::PresenceChanged(PresenceChange {
            user_id: user("bob"),
            online: false,
            last_seen: Some(Timestamp::new(1672531200000)),
        });

        // when (操作):
        let event: dto::ServerEvent = (&notification).into();

        // then (期待する結果):
        assert_eq!(
            event,
            dto::ServerEvent::UserStatusChange(dto::UserStatusPayload {
                user_id: "bob".to_string(),
                online: false,
                last_seen: Some("2023-01-01T00:00:00.000Z".to_string()),
            })
        );
    }

    #[test]
    fn test_rejected_notification_to_error_event() {
        // テスト項目: Rejected 通知が error イベントに変換される
        // given (前提条件):
        let notification = Notification::Rejected {
            event: "typing".to_string(),
            error: "not registered".to_string(),
        };

        // when (操作):
        let json = serde_json::to_value(dto::ServerEvent::from(&notification)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "event": "error",
                "data": {"event": "typing", "error": "not registered"}
            })
        );
    }
}
