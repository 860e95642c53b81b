//! Infrastructure layer: DTOs, the WebSocket message pusher, in-memory stores
//! and startup data loading.

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod seed;
