//! UI layer: axum router, handlers and server lifecycle.

pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
