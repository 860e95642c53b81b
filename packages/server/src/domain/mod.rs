//! Domain layer: value objects, entities and the interfaces the use cases
//! depend on.

pub mod connection_registry;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use connection_registry::{ConnectionRegistry, Registration, Removal};
pub use entity::{
    ConversationSummary, Message, NewMessage, PresenceChange, PresenceUpdate, User,
};
pub use error::{MessagePushError, RegistryError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use repository::{MessageRepository, UserRepository};
pub use value_object::{
    ConnectionId, ConversationId, MessageContent, MessageId, MessageKind, Timestamp, UserId,
};

#[cfg(test)]
pub use repository::{MockMessageRepository, MockUserRepository};
