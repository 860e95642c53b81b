//! Utilities shared between the Neighborly server and client.

pub mod logger;
pub mod time;
