//! 初期ユーザーデータの読み込み
//!
//! `--seed-users` で指定された JSON ファイルを読み、InMemory の
//! User Repository に投入するユーザーレコードを作る。
//!
//! ```json
//! [
//!   { "id": "alice", "email": "alice@example.com", "name": "Alice" },
//!   { "id": "bob", "email": "bob@example.com", "name": "Bob", "profilePicture": "/uploads/bob.png" }
//! ]
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{User, UserId, ValueObjectError};

/// 初期データ読み込みのエラー
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid user id in seed file: {0}")]
    InvalidUserId(#[from] ValueObjectError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedUser {
    id: String,
    email: String,
    name: String,
    #[serde(default)]
    profile_picture: Option<String>,
}

impl TryFrom<SeedUser> for User {
    type Error = ValueObjectError;

    fn try_from(seed: SeedUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(seed.id)?,
            email: seed.email,
            name: seed.name,
            profile_picture: seed.profile_picture,
            online: false,
            last_seen: None,
        })
    }
}

/// JSON 文字列からユーザーレコードを作成（全員オフラインで開始）
pub fn parse_seed_users(json: &str) -> Result<Vec<User>, SeedError> {
    let seeds: Vec<SeedUser> = serde_json::from_str(json)?;
    let users = seeds
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// ファイルからユーザーレコードを読み込む
pub async fn load_seed_users(path: impl AsRef<Path>) -> Result<Vec<User>, SeedError> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_seed_users(&json)
}
