//! Connection Registry
//!
//! ユーザー ID → 接続ハンドル集合の対応を所有するインメモリのレジストリ。
//! 1 ユーザーが複数のデバイス・タブから同時に接続できる。
//!
//! ## 並行性
//!
//! 全ての変更は 1 つの `Mutex` の中で行われ、クリティカルセクション内で
//! `.await` しない。0 → 1 / 1 → 0 の遷移判定は変更と同じクリティカル
//! セクションで計算されるため、同時接続・同時切断が競合しても
//! 「自分が最初」「自分が最後」を二重に観測することはない。
//!
//! 逆引きインデックス（ハンドル → ユーザー）を持つので `unregister` は O(1)。

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use super::{ConnectionId, RegistryError, UserId};

/// `register` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// このユーザーの最初の接続だったか（0 → 1 遷移）
    pub first: bool,
}

/// `unregister` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// ハンドルを所有していたユーザー
    pub user_id: UserId,
    /// 最後の接続だったか（1 → 0 遷移）
    pub last: bool,
}

#[derive(Debug, Default)]
struct RegistryState {
    /// ユーザーごとの接続ハンドル。空集合になってもエントリは残す
    handles: HashMap<UserId, HashSet<ConnectionId>>,
    /// 逆引き: ハンドル → 所有ユーザー
    owners: HashMap<ConnectionId, UserId>,
}

/// 接続ハンドルのレジストリ
///
/// プロセス起動時に 1 つ作成し、`Arc` で各 UseCase に注入する。
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    state: Mutex<RegistryState>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ハンドルをユーザーに登録
    ///
    /// 同じ (ユーザー, ハンドル) の再登録は冪等で、`first: false` を返す。
    /// 別のユーザーに登録済みのハンドルはエラー。
    pub async fn register(
        &self,
        user_id: UserId,
        connection_id: ConnectionId,
    ) -> Result<Registration, RegistryError> {
        let mut state = self.state.lock().await;

        if let Some(owner) = state.owners.get(&connection_id) {
            if owner != &user_id {
                return Err(RegistryError::HandleOwnedByOtherUser {
                    connection: connection_id.to_string(),
                    owner: owner.to_string(),
                });
            }
            return Ok(Registration { first: false });
        }

        let handles = state.handles.entry(user_id.clone()).or_default();
        let first = handles.is_empty();
        handles.insert(connection_id);
        state.owners.insert(connection_id, user_id);

        Ok(Registration { first })
    }

    /// ハンドルを登録解除
    ///
    /// 未登録・解除済みのハンドルは `None`（二重切断は no-op）。
    pub async fn unregister(&self, connection_id: &ConnectionId) -> Option<Removal> {
        let mut state = self.state.lock().await;

        let user_id = state.owners.remove(connection_id)?;
        let last = match state.handles.get_mut(&user_id) {
            Some(handles) => {
                handles.remove(connection_id);
                handles.is_empty()
            }
            None => true,
        };

        Some(Removal { user_id, last })
    }

    /// ユーザーの接続ハンドル（呼び出し時点のスナップショット）
    pub async fn handles_for(&self, user_id: &UserId) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state
            .handles
            .get(user_id)
            .map(|handles| handles.iter().copied().collect())
            .unwrap_or_default()
    }

    /// ユーザーに 1 つ以上の接続があるか
    pub async fn is_connected(&self, user_id: &UserId) -> bool {
        let state = self.state.lock().await;
        state
            .handles
            .get(user_id)
            .is_some_and(|handles| !handles.is_empty())
    }

    /// ハンドルを所有するユーザー
    pub async fn owner_of(&self, connection_id: &ConnectionId) -> Option<UserId> {
        let state = self.state.lock().await;
        state.owners.get(connection_id).cloned()
    }

    /// 接続中のユーザー（ID 順）
    pub async fn online_users(&self) -> Vec<UserId> {
        let state = self.state.lock().await;
        let mut users: Vec<UserId> = state
            .handles
            .iter()
            .filter(|(_, handles)| !handles.is_empty())
            .map(|(user_id, _)| user_id.clone())
            .collect();
        users.sort();
        users
    }
}
