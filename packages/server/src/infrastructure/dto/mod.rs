//! Data Transfer Objects (DTOs) for the messaging service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: socket event DTOs (`{"event": ..., "data": ...}`)
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
