//! Neighborly direct messaging and presence server.
//!
//! Users connect over WebSocket, register their identity, and exchange direct
//! messages with live fan-out to every connection of the recipient. Presence
//! (online / offline / last seen) is derived from connection occupancy.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
