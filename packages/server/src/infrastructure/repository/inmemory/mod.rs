//! InMemory Repository 実装
//!
//! ドメイン層が定義する Repository trait の具体的な実装。
//! ドキュメントストアの代わりにプロセス内の `HashMap` / `Vec` を使います。

pub mod message;
pub mod user;

pub use message::InMemoryMessageRepository;
pub use user::InMemoryUserRepository;
