//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{
    get_history, get_presence, health_check, list_conversations, list_users, mark_as_read,
    post_message,
};
pub use websocket::websocket_handler;
