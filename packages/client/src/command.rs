//! Parsing of prompt input into socket events.
//!
//! - `@<user> <text>` sends a direct message
//! - `/typing <user>` sends a typing signal
//! - `/quit` ends the session

use neighborly_server::infrastructure::dto::websocket::{
    ClientEvent, SendMessagePayload, TypingPayload,
};

pub const USAGE: &str = "Usage: @<user> <message> | /typing <user> | /quit";

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send { recipient: String, content: String },
    Typing { recipient: String },
    Quit,
}

impl Command {
    /// Parse a prompt line; returns a human readable error for bad input
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();

        if line == "/quit" {
            return Ok(Self::Quit);
        }

        if let Some(rest) = line.strip_prefix("/typing") {
            let recipient = rest.trim();
            if recipient.is_empty() || recipient.contains(char::is_whitespace) {
                return Err(USAGE.to_string());
            }
            return Ok(Self::Typing {
                recipient: recipient.to_string(),
            });
        }

        if let Some(rest) = line.strip_prefix('@') {
            let Some((recipient, content)) = rest.split_once(char::is_whitespace) else {
                return Err(USAGE.to_string());
            };
            let content = content.trim();
            if recipient.is_empty() || content.is_empty() {
                return Err(USAGE.to_string());
            }
            return Ok(Self::Send {
                recipient: recipient.to_string(),
                content: content.to_string(),
            });
        }

        Err(USAGE.to_string())
    }

    /// The socket event for this command, or `None` for `/quit`
    pub fn into_event(self, sender_id: &str) -> Option<ClientEvent> {
        match self {
            Self::Send { recipient, content } => {
                Some(ClientEvent::SendMessage(SendMessagePayload {
                    sender_id: sender_id.to_string(),
                    recipient_id: recipient,
                    content,
                }))
            }
            Self::Typing { recipient } => Some(ClientEvent::Typing(TypingPayload {
                sender_id: sender_id.to_string(),
                recipient_id: recipient,
            })),
            Self::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_command() {
        // テスト項目: @<user> <text> がメッセージ送信として解釈される
        // given (前提条件):
        let line = "@bob  hello there ";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Send {
                recipient: "bob".to_string(),
                content: "hello there".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_typing_and_quit() {
        // テスト項目: /typing と /quit が解釈される
        // given (前提条件):
        let typing = "/typing bob";
        let quit = " /quit ";

        // when (操作):
        let typing_command = Command::parse(typing);
        let quit_command = Command::parse(quit);

        // then (期待する結果):
        assert_eq!(
            typing_command,
            Ok(Command::Typing {
                recipient: "bob".to_string()
            })
        );
        assert_eq!(quit_command, Ok(Command::Quit));
    }

    #[test]
    fn test_parse_invalid_input() {
        // テスト項目: 形式に合わない入力はエラー
        // given (前提条件):
        let inputs = ["hello", "@bob", "@ hi", "/typing", "/typing a b"];

        // when (操作):
        let results: Vec<_> = inputs.iter().map(|line| Command::parse(line)).collect();

        // then (期待する結果):
        assert!(results.iter().all(|r| r == &Err(USAGE.to_string())));
    }

    #[test]
    fn test_send_command_into_event_json() {
        // テスト項目: 送信コマンドが sendMessage イベントの JSON になる
        // given (前提条件):
        let command = Command::Send {
            recipient: "bob".to_string(),
            content: "hi".to_string(),
        };

        // when (操作):
        let event = command.into_event("alice").unwrap();
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "event": "sendMessage",
                "data": {"senderId": "alice", "recipientId": "bob", "content": "hi"}
            })
        );
        assert_eq!(Command::Quit.into_event("alice"), None);
    }
}
