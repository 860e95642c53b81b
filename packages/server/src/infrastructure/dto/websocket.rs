//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}` with
//! camelCase field names.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Register(RegisterPayload),
    SendMessage(SendMessagePayload),
    Typing(TypingPayload),
}

impl ClientEvent {
    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::SendMessage(_) => "sendMessage",
            Self::Typing(_) => "typing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub sender_id: String,
    #[serde(alias = "receiverId")]
    pub recipient_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub sender_id: String,
    #[serde(alias = "receiverId")]
    pub recipient_id: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    Registered(RegisteredPayload),
    ReceiveMessage(MessageDto),
    MessageSent(MessageDto),
    MessageError(MessageErrorPayload),
    UserTyping(UserTypingPayload),
    UserStatusChange(UserStatusPayload),
    Error(RejectedPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPayload {
    pub user_id: String,
    pub online_users: Vec<String>,
}

/// Message as delivered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub read: bool,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingPayload {
    pub sender_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusPayload {
    pub user_id: String,
    pub online: bool,
    /// RFC 3339 (UTC), only on offline transitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedPayload {
    pub event: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register_event() {
        // テスト項目: register イベントがパースされる
        // given (前提条件):
        let json = r#"{"event":"register","data":{"userId":"alice"}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Register(RegisterPayload {
                user_id: "alice".to_string()
            })
        );
        assert_eq!(event.name(), "register");
    }

    #[test]
    fn test_parse_send_message_accepts_receiver_id_alias() {
        // テスト項目: sendMessage は receiverId でも recipientId として受け付ける
        // given (前提条件):
        let json = r#"{"event":"sendMessage","data":{"senderId":"alice","receiverId":"bob","content":"hi"}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::SendMessage(SendMessagePayload {
                sender_id: "alice".to_string(),
                recipient_id: "bob".to_string(),
                content: "hi".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        // テスト項目: 未知のイベント名はパースエラーになる
        // given (前提条件):
        let json = r#"{"event":"joinRoom","data":{"room":"x"}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_user_status_change_omits_last_seen_when_online() {
        // テスト項目: オンライン遷移の userStatusChange には lastSeen が含まれない
        // given (前提条件):
        let event = ServerEvent::UserStatusChange(UserStatusPayload {
            user_id: "alice".to_string(),
            online: true,
            last_seen: None,
        });

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "event": "userStatusChange",
                "data": {"userId": "alice", "online": true}
            })
        );
    }
}
