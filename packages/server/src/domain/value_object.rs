//! Value Object 定義
//!
//! 検証済みの値だけを保持する型。生成時に不変条件をチェックし、
//! 以降は不正な値が存在しないことを型で保証します。

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// UserId の最大長
pub const MAX_USER_ID_LENGTH: usize = 128;

/// MessageContent の最大文字数
pub const MAX_MESSAGE_CONTENT_LENGTH: usize = 4000;

/// 会話 ID の区切り文字（UserId には使用できない）
const CONVERSATION_SEPARATOR: char = '_';

/// ユーザー ID
///
/// 空文字、空白、`_` を含まない 128 文字以内の文字列。
/// `_` は [`ConversationId`] の区切り文字として予約されている。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUserId);
        }
        if value.chars().count() > MAX_USER_ID_LENGTH {
            return Err(ValueObjectError::UserIdTooLong {
                max: MAX_USER_ID_LENGTH,
            });
        }
        if value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == CONVERSATION_SEPARATOR)
        {
            return Err(ValueObjectError::InvalidUserId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 接続ハンドル
///
/// 1 本の WebSocket セッションを指す不透明な ID。接続時に生成され、切断で消える。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会話 ID
///
/// 2 人の参加者 ID をソートして `_` で連結したもの。
/// どちらから会話を始めても同じ値になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn between(a: &UserId, b: &UserId) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!(
            "{}{}{}",
            first.as_str(),
            CONVERSATION_SEPARATOR,
            second.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// メッセージ ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// メッセージ本文
///
/// 前後の空白を除いて空でない、4000 文字以内の文字列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyContent);
        }
        if value.chars().count() > MAX_MESSAGE_CONTENT_LENGTH {
            return Err(ValueObjectError::ContentTooLong {
                max: MAX_MESSAGE_CONTENT_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// メッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(ValueObjectError::UnknownMessageKind(other.to_string())),
        }
    }
}

/// Unix タイムスタンプ（ミリ秒, UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
