//! Interactive CLI client for the Neighborly messaging server.
//!
//! Connects over WebSocket, registers the user, prints incoming events and
//! sends messages and typing signals typed at the prompt.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
