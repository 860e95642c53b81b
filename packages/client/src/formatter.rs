//! Message formatting utilities for client display.

use chrono::{DateTime, SecondsFormat, Utc};

use neighborly_server::infrastructure::dto::websocket::{
    MessageDto, RegisteredPayload, RejectedPayload, UserStatusPayload,
};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the register acknowledgment with the users currently online
    pub fn format_registered(payload: &RegisteredPayload) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Registered as '{}'\n", payload.user_id));
        output.push_str("Online:\n");

        for user_id in &payload.online_users {
            let me_suffix = if user_id == &payload.user_id {
                " (me)"
            } else {
                ""
            };
            output.push_str(&format!("  {}{}\n", user_id, me_suffix));
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a direct message received from another user
    pub fn format_received(message: &MessageDto) -> String {
        let body = match (&message.image_url, message.message_type.as_str()) {
            (Some(url), "image") => format!("[image] {}", url),
            _ => message.content.clone(),
        };
        format!(
            "\n\n{}\n@{}: {}\nsent at {}\n{}\n",
            RULE,
            message.sender_id,
            body,
            Self::format_time(&message.created_at),
            RULE
        )
    }

    /// Format the confirmation of a message this connection sent
    pub fn format_sent(message: &MessageDto) -> String {
        format!(
            "\nsent to @{} at {}\n",
            message.recipient_id,
            Self::format_time(&message.created_at)
        )
    }

    /// Format a presence change
    pub fn format_status(payload: &UserStatusPayload) -> String {
        if payload.online {
            format!("\n+ {} is online\n", payload.user_id)
        } else {
            match &payload.last_seen {
                Some(last_seen) => format!(
                    "\n- {} is offline (last seen {})\n",
                    payload.user_id,
                    Self::format_time(last_seen)
                ),
                None => format!("\n- {} is offline\n", payload.user_id),
            }
        }
    }

    pub fn format_typing(sender_id: &str) -> String {
        format!("\n... {} is typing\n", sender_id)
    }

    pub fn format_message_error(error: &str) -> String {
        format!("\n! message not sent: {}\n", error)
    }

    pub fn format_rejected(payload: &RejectedPayload) -> String {
        format!("\n! {} rejected: {}\n", payload.event, payload.error)
    }

    /// Format an unrecognized text frame
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Normalize an RFC 3339 timestamp to UTC with second precision
    ///
    /// Unparseable input is returned unchanged.
    pub fn format_time(rfc3339: &str) -> String {
        match DateTime::parse_from_rfc3339(rfc3339) {
            Ok(time) => time
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            Err(_) => rfc3339.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(message_type: &str, image_url: Option<&str>) -> MessageDto {
        MessageDto {
            id: "m1".to_string(),
            conversation_id: "alice_bob".to_string(),
            sender_id: "alice".to_string(),
            recipient_id: "bob".to_string(),
            content: "hi".to_string(),
            message_type: message_type.to_string(),
            image_url: image_url.map(str::to_string),
            read: false,
            created_at: "2023-01-01T00:00:00.123Z".to_string(),
        }
    }

    #[test]
    fn test_format_registered_marks_me() {
        // テスト項目: 登録応答のオンライン一覧で自分に (me) が付く
        // given (前提条件):
        let payload = RegisteredPayload {
            user_id: "bob".to_string(),
            online_users: vec!["alice".to_string(), "bob".to_string()],
        };

        // when (操作):
        let output = MessageFormatter::format_registered(&payload);

        // then (期待する結果):
        assert!(output.contains("Registered as 'bob'"));
        assert!(output.contains("  alice\n"));
        assert!(output.contains("  bob (me)\n"));
    }

    #[test]
    fn test_format_received_text_and_image() {
        // テスト項目: テキストは本文、画像は画像の参照が表示される
        // given (前提条件):
        let text = message("text", None);
        let image = message("image", Some("/uploads/cat.png"));

        // when (操作):
        let text_output = MessageFormatter::format_received(&text);
        let image_output = MessageFormatter::format_received(&image);

        // then (期待する結果):
        assert!(text_output.contains("@alice: hi\n"));
        assert!(text_output.contains("sent at 2023-01-01T00:00:00Z"));
        assert!(image_output.contains("@alice: [image] /uploads/cat.png\n"));
    }

    #[test]
    fn test_format_status() {
        // テスト項目: オンライン・オフライン（lastSeen あり）の表示
        // given (前提条件):
        let online = UserStatusPayload {
            user_id: "alice".to_string(),
            online: true,
            last_seen: None,
        };
        let offline = UserStatusPayload {
            user_id: "alice".to_string(),
            online: false,
            last_seen: Some("2023-01-01T09:30:00.000Z".to_string()),
        };

        // when (操作):
        let online_output = MessageFormatter::format_status(&online);
        let offline_output = MessageFormatter::format_status(&offline);

        // then (期待する結果):
        assert_eq!(online_output, "\n+ alice is online\n");
        assert_eq!(
            offline_output,
            "\n- alice is offline (last seen 2023-01-01T09:30:00Z)\n"
        );
    }

    #[test]
    fn test_format_time_falls_back_to_input() {
        // テスト項目: 解析できない時刻はそのまま表示される
        // given (前提条件):
        let input = "yesterday";

        // when (操作):
        let output = MessageFormatter::format_time(input);

        // then (期待する結果):
        assert_eq!(output, "yesterday");
    }
}
