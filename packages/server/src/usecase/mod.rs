//! UseCase layer.
//!
//! Each use case owns the `Arc`s it needs and exposes a single `execute`.
//! Use cases speak domain `Notification`s; serialization happens in the
//! message pusher.

pub mod close_connection;
pub mod error;
pub mod get_history;
pub mod list_conversations;
pub mod list_users;
pub mod mark_as_read;
pub mod notify_typing;
pub mod open_connection;
pub mod post_message;
pub mod presence;
pub mod register_user;
pub mod send_message;
mod sender;

pub use close_connection::CloseConnectionUseCase;
pub use error::{
    ConversationError, PostMessageError, RegisterError, SendMessageError, TypingError,
};
pub use get_history::GetHistoryUseCase;
pub use list_conversations::ListConversationsUseCase;
pub use list_users::ListUsersUseCase;
pub use mark_as_read::MarkAsReadUseCase;
pub use notify_typing::NotifyTypingUseCase;
pub use open_connection::OpenConnectionUseCase;
pub use post_message::{PostMessageInput, PostMessageUseCase};
pub use presence::{PresenceState, PresenceTracker};
pub use register_user::RegisterUserUseCase;
pub use send_message::SendMessageUseCase;
